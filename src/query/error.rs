use crate::mdoc::Macro;
use crate::output::WriteError;
use crate::query::Selector;
use std::io;
use std::process::ExitCode;

/// The outcome of a query, as a process would report it.
///
/// The discriminants are the exit codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum QueryStatus {
    Ok = 0,
    /// A required section, macro or list item wasn't in the document.
    NotFound = 1,
    /// The input wasn't a usable mdoc document.
    InvalidDocument = 2,
    /// The selector is recognized, but there's no implementation for it.
    Unsupported = 3,
    /// The arguments didn't make sense, or the input couldn't be read.
    BadArgument = 4,
    /// Writing the output failed.
    SystemError = 5,
}

impl QueryStatus {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<QueryStatus> for ExitCode {
    fn from(status: QueryStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Why a query stopped early.
///
/// Output that was already written before the failure stays written.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("section not found: {0}")]
    SectionNotFound(String),

    #[error("macro not found: {0}")]
    MacroNotFound(Macro),

    #[error("no matching items found")]
    NoMatchingItems,

    #[error("option is not implemented: {0}")]
    Unsupported(Selector),

    #[error(transparent)]
    Output(#[from] WriteError),

    /// Writing the last of the output, after every node was written, failed.
    #[error("could not finish writing output: {0}")]
    Flush(#[source] io::Error),
}

impl QueryError {
    pub fn status(&self) -> QueryStatus {
        match self {
            QueryError::SectionNotFound(_) | QueryError::MacroNotFound(_) | QueryError::NoMatchingItems => {
                QueryStatus::NotFound
            }
            QueryError::Unsupported(_) => QueryStatus::Unsupported,
            QueryError::Output(_) | QueryError::Flush(_) => QueryStatus::SystemError,
        }
    }
}
