//! Models used by the Pokevault service and its REST API.

pub mod ability;
pub mod poke_type;
pub mod pokemon;
pub mod stat;
pub mod validations;
