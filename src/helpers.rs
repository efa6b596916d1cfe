//! Various helper traits, functions and macros used throughout the Pokevault code.

pub mod db;
pub mod env;
pub mod error;
#[doc(hidden)]
pub mod macros;
