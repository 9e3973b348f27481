//! Query mdoc manual pages for one of their parts, as plain text.
//!
//! mquery works on a document that an mdoc parser has already parsed. It finds a section or list by its heading
//! (case-insensitively, in document order), turns what it finds back into plain text, and writes that out.
//!
//! The modules, leaf first:
//!
//! - [`mdoc`]: the parsed document, as an arena of nodes.
//! - [`output`]: escape decoding and plain-text reconstruction.
//! - [`select`]: finding sections, macros and list items.
//! - [`query`]: the [`Selector`](query::Selector)s and the scripts behind them.
//! - [`run`]: end-to-end runs, like the CLI's.
pub mod mdoc;
pub mod output;
pub mod query;
pub mod run;
pub mod select;
