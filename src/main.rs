use clap::error::ErrorKind;
use clap::Parser;
use mquery::query::QueryStatus;
use mquery::run::{cli_args, CliOptions, OsFacade, RunOptions};
use std::io;
use std::io::{stderr, stdin, stdout, Read};
use std::process::ExitCode;

struct RealOs;

#[doc(hidden)]
impl OsFacade for RealOs {
    fn read_stdin(&self) -> io::Result<String> {
        let mut contents = String::new();
        stdin().read_to_string(&mut contents)?;
        Ok(contents)
    }

    fn read_file(&self, path: &str) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn streams(&mut self) -> (impl io::Write, impl io::Write) {
        (stdout().lock(), stderr().lock())
    }
}

fn main() -> ExitCode {
    let options = CliOptions::try_parse_from(cli_args(std::env::args_os())).and_then(RunOptions::try_from);
    let options = match options {
        Ok(options) => options,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => QueryStatus::BadArgument.into(),
            };
        }
    };
    mquery::run::run(&options, &mut RealOs).into()
}
