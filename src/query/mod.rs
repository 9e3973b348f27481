//! What to print, and the scripts that print it.
//!
//! A [`Selector`] names one query. [`run_query`] maps it to a short script of lookups (from [`crate::select`]) and
//! reconstructions (from [`crate::output`]) and streams the result. Each global query is its own small function, so
//! each can be tested on its own.
mod error;
mod scripts;
mod selector;

pub use error::*;
pub use scripts::*;
pub use selector::*;
