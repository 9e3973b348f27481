//! Finding things in a [`Document`](crate::mdoc::Document).
//!
//! [`find_by_macro`] and [`find_section`] search a whole subtree in document order. The list functions are
//! deliberately shallow: they only look at a list's own items.
mod list_items;
mod locate;

pub use list_items::*;
pub use locate::*;
