//! End-to-end runs.
//!
//! This module combines the [`crate::mdoc`], [`crate::query`], and [`crate::output`] mods into a single workflow.
//! It's useful for building functionality like the CLI's, but running it within-process.
//!
//! ## Example
//!
//! ```
//! # use mquery::run;
//! # use mquery::query::{GlobalQuery, QueryStatus};
//!
//! // First, let's define a mocked I/O. Replace this with whatever you need.
//! #[derive(Default)]
//! struct MockIo {
//!     stdout: Vec<u8>,
//!     stderr: Vec<u8>,
//! }
//!
//! impl run::OsFacade for MockIo {
//!     fn read_stdin(&self) -> std::io::Result<String> {
//!         Ok(r#"{"macroset": "mdoc", "nodes": [
//!             {"type": "block", "macro": "Sh",
//!              "head": [{"type": "text", "text": "NAME"}],
//!              "body": [{"type": "elem", "macro": "Nd", "children": [{"type": "text", "text": "fetch things"}]}]}
//!         ]}"#.to_string())
//!     }
//!
//!     fn read_file(&self, path: &str) -> std::io::Result<String> {
//!         Err(std::io::Error::new(std::io::ErrorKind::NotFound, path))
//!     }
//!
//!     fn streams(&mut self) -> (impl std::io::Write, impl std::io::Write) {
//!         (&mut self.stdout, &mut self.stderr)
//!     }
//! }
//!
//! // Now, use it:
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! // Ask for the blurb, reading from (mocked) stdin.
//! let options = run::RunOptionsBuilder::default()
//!     .selector(GlobalQuery::Blurb)
//!     .build()?;
//!
//! let mut os_facade = MockIo::default();
//! let status = run::run(&options, &mut os_facade);
//! let stdout_text = String::from_utf8(os_facade.stdout)?;
//!
//! assert_eq!(status, QueryStatus::Ok);
//! assert_eq!(stdout_text, "fetch things\n");
//! #
//! #     Ok(())
//! # }
//! ```
mod cli;
mod run_main;

pub use cli::*;
pub use run_main::*;
