//! Turning parts of a [`Document`](crate::mdoc::Document) back into plain text.
//!
//! [`write_node`] is the entry point. It walks a subtree and writes each macro's text form to a [`TextWriter`], which
//! decides where separating spaces go. Raw text runs are decoded by [`decode`] on the way through.
mod deroff;
mod escape;
mod text_writer;

pub use deroff::*;
pub use escape::*;
pub use text_writer::*;
