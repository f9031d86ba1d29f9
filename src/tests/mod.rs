pub mod common;

mod reqwest_transport;
mod routing_and_composition;
mod token_types;
