//! The parsed mdoc tree that queries run against.
//!
//! Parsing mdoc source is someone else's job. What arrives here is an already-parsed tree, either as JSON (see
//! [`Document::from_json`]) or built in-process from [`MdocNode`]s. Either way it ends up as a [`Document`]: an arena
//! of [`DocumentNode`]s addressed by [`NodeId`], with parent, sibling and child links stored as ids.
mod macros;
mod tree;
mod tree_serde;

pub use macros::*;
pub use tree::*;
pub use tree_serde::*;

#[cfg(test)]
mod tree_test_utils;
#[cfg(test)]
pub(crate) use tree_test_utils::*;
