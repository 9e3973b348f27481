use crate::mdoc::{Document, InvalidDocument};
use crate::query::{run_query, QueryError, QueryStatus};
use crate::run::RunOptions;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::{env, io};

/// The run's overall possible error.
#[derive(Debug)]
pub enum Error {
    /// The query itself failed. Some output may already have been written.
    Query(QueryError),

    /// The input wasn't a usable mdoc document.
    ///
    /// This comes from [`Document::from_json`].
    InvalidDocument(Input, InvalidDocument),

    /// Couldn't read the input.
    FileReadError(Input, io::Error),
}

impl std::error::Error for Error {}

impl Error {
    pub fn status(&self) -> QueryStatus {
        match self {
            Error::Query(err) => err.status(),
            Error::InvalidDocument(..) => QueryStatus::InvalidDocument,
            Error::FileReadError(..) => QueryStatus::BadArgument,
        }
    }
}

/// Stdin or an input file by path.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Input {
    Stdin,
    FilePath(String),
}

impl Input {
    /// Interprets a command-line path, where `"-"` means stdin.
    pub fn from_path(path: &str) -> Self {
        if path == "-" {
            Input::Stdin
        } else {
            Input::FilePath(path.to_string())
        }
    }
}

impl Display for Input {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::Stdin => f.write_str("stdin"),
            Input::FilePath(file) => write!(f, "file {file:?}"),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Query(err) => writeln!(f, "{err}"),
            Error::InvalidDocument(input, err) => {
                writeln!(f, "Document parse error in {input}:")?;
                writeln!(f, "{err}")
            }
            Error::FileReadError(input, err) => {
                if env::var("MQUERY_PORTABLE_ERRORS").unwrap_or_default().is_empty() {
                    writeln!(f, "{err} while reading {input}")
                } else {
                    writeln!(f, "{} while reading {input}", err.kind())
                }
            }
        }
    }
}

/// A simple facade for handling I/O.
///
/// This trait lets you do "I/O-y stuff" like mocking out stdin or reading files. The [`run`] method uses it.
pub trait OsFacade {
    /// Read stdin (or your mock of it) to a `String`.
    fn read_stdin(&self) -> io::Result<String>;

    /// Read a file path (or your mock of one) to a `String`.
    fn read_file(&self, path: &str) -> io::Result<String>;

    /// Get writers for stdout and stderr (or your mocks of them).
    ///
    /// They're handed out together because a query writes its results to the first while reporting skipped list
    /// items to the second.
    fn streams(&mut self) -> (impl Write, impl Write);

    /// Handle an error. By default, this writes it to the stderr from [`Self::streams`].
    fn write_error(&mut self, err: Error) {
        let (_, mut stderr) = self.streams();
        let _ = write!(stderr, "{err}");
    }

    /// Reads the input, treating [`Input::Stdin`] as a call to [`Self::read_stdin`].
    fn read_input(&self, input: &Input) -> Result<String, Error> {
        let contents = match input {
            Input::Stdin => self.read_stdin(),
            Input::FilePath(path) => self.read_file(path),
        };
        contents.map_err(|err| Error::FileReadError(input.clone(), err))
    }
}

/// Runs mquery end to end.
///
/// This reads the document named by [`RunOptions::input`], runs [`RunOptions::selector`] against it, and writes the
/// results to the given [`OsFacade`]. The returned status is what the process should exit with.
pub fn run(options: &RunOptions, os: &mut impl OsFacade) -> QueryStatus {
    match run_or_error(options, os) {
        Ok(()) => QueryStatus::Ok,
        Err(err) => {
            let status = err.status();
            os.write_error(err);
            status
        }
    }
}

fn run_or_error(options: &RunOptions, os: &mut impl OsFacade) -> Result<(), Error> {
    let input = Input::from_path(&options.input);
    let contents = os.read_input(&input)?;
    let doc = Document::from_json(&contents).map_err(|err| Error::InvalidDocument(input, err))?;

    let (stdout, mut stderr) = os.streams();
    run_query(&doc, &options.selector, stdout, &mut stderr).map_err(Error::Query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_from_path() {
        assert_eq!(Input::from_path("-"), Input::Stdin);
        assert_eq!(Input::from_path("fetch.json"), Input::FilePath("fetch.json".to_string()));
        assert_eq!(Input::from_path("fetch.json").to_string(), "file \"fetch.json\"");
    }

    #[test]
    fn statuses() {
        let read_err = Error::FileReadError(Input::Stdin, io::Error::other("closed"));
        assert_eq!(read_err.status(), QueryStatus::BadArgument);

        let parse_err = Document::from_json("{").unwrap_err();
        assert_eq!(
            Error::InvalidDocument(Input::Stdin, parse_err).status(),
            QueryStatus::InvalidDocument
        );

        assert_eq!(
            Error::Query(QueryError::NoMatchingItems).status(),
            QueryStatus::NotFound
        );
    }

    #[test]
    fn invalid_document_message() {
        let parse_err = Document::from_json(r#"{"macroset": "man"}"#).unwrap_err();
        let err = Error::InvalidDocument(Input::FilePath("git.json".to_string()), parse_err);
        assert_eq!(
            err.to_string(),
            "Document parse error in file \"git.json\":\nnot an mdoc document (macro set \"man\")\n"
        );
    }
}
