//! Database-related helpers.

pub mod paginate;
