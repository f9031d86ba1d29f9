pub mod api_request;
pub mod composer;
pub mod router;
