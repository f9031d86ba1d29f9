pub mod assertions;
pub mod patterns;
pub mod schema;
