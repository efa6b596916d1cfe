//! Services implementing the business logic of the Pokevault. Used by the REST API.

pub mod export;
pub mod pokemon;
