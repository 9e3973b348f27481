use crate::query::{FunctionQuery, GlobalQuery, Selector, VariableQuery};
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};
use derive_builder::Builder;
use paste::paste;
use std::ffi::OsString;
use std::path::Path;

/// Defines a clap group of mutually exclusive flags, one per variant of a query enum.
macro_rules! query_flags {
    ($flags:ident => $query:ident { $( $(#[$meta:meta])* $variant:ident ),+ $(,)? }) => {
        paste! {
            #[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Args)]
            #[group(required = true, multiple = false)]
            #[doc(hidden)]
            pub struct $flags {
                $(
                $(#[$meta])*
                #[arg(short = $query::$variant.flag())]
                pub(crate) [<$variant:snake>]: bool,
                )+
            }

            impl $flags {
                pub(crate) fn selected(&self) -> Option<$query> {
                    $(
                    if self.[<$variant:snake>] {
                        return Some($query::$variant);
                    }
                    )+
                    None
                }
            }
        }
    };
}

query_flags! {
    GlobalFlags => GlobalQuery {
        /// Print the one-line description from the NAME section.
        Blurb,
        /// Print the DESCRIPTION section, followed by the links listed in SEE ALSO.
        Description,
        /// List the functions in the FUNCTIONS section.
        FunctionList,
        /// List the variables in the subsections of ECLASS VARIABLES.
        VariableList,
        /// Print the AUTHORS section.
        Authors,
        /// Print the link from the REPORTING BUGS section.
        BugReportLink,
        /// Print the DEPRECATED section.
        DeprecationNotice,
        /// Print the EXAMPLES section.
        Examples,
        /// Print the MAINTAINERS section.
        Maintainers,
    }
}

query_flags! {
    FunctionFlags => FunctionQuery {
        /// Print the function's description.
        Description,
        /// Print whether the function is deprecated.
        Deprecated,
        /// Print whether the function is internal.
        Internal,
        /// Print what the function returns.
        Returns,
        /// Print the function's usage line.
        Usage,
    }
}

query_flags! {
    VariableFlags => VariableQuery {
        /// Print the variable's description.
        Description,
        /// Print whether the variable is deprecated.
        Deprecated,
        /// Print whether the variable is internal.
        Internal,
        /// Print whether the variable is set by the eclass for the ebuild to read.
        Output,
        /// Print whether the variable must be set before inheriting.
        PreInherit,
        /// Print whether the variable is required.
        Required,
        /// Print whether the variable is meant to be set by users.
        UserVariable,
    }
}

/// Query an mdoc manual page for one of its parts.
///
/// The document is read as JSON, as produced by an mdoc parser.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Parser)]
#[command(name = "mquery", about, long_about = None)]
#[command(subcommand_negates_reqs = true, args_conflicts_with_subcommands = true)]
#[doc(hidden)]
pub struct CliOptions {
    #[command(flatten)]
    pub(crate) global: GlobalFlags,

    /// The document to query. A path of "-" reads standard input.
    #[arg(required = true, value_name = "FILE")]
    pub(crate) file: Option<String>,

    #[command(subcommand)]
    pub(crate) item: Option<ItemCommand>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Subcommand)]
#[doc(hidden)]
pub enum ItemCommand {
    /// Query a single function. Also available as `mquery-function`.
    Function {
        /// The function's name.
        #[arg(short = 'F', value_name = "FUNCTION")]
        name: String,

        #[command(flatten)]
        flags: FunctionFlags,

        #[arg(value_name = "FILE")]
        file: String,
    },
    /// Query a single variable. Also available as `mquery-variable`.
    Variable {
        /// The variable's name.
        #[arg(short = 'V', value_name = "VARIABLE")]
        name: String,

        #[command(flatten)]
        flags: VariableFlags,

        #[arg(value_name = "FILE")]
        file: String,
    },
}

/// Options analogous to the mquery CLI's switches.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Builder)]
pub struct RunOptions {
    /// What to query.
    #[builder(setter(into))]
    pub selector: Selector,

    /// Path to the JSON document. `"-"` (the default) is standard input.
    #[builder(setter(into), default = "\"-\".to_string()")]
    pub input: String,
}

impl TryFrom<CliOptions> for RunOptions {
    type Error = clap::Error;

    fn try_from(cli: CliOptions) -> Result<Self, Self::Error> {
        let (selector, input) = match cli.item {
            Some(ItemCommand::Function { name, flags, file }) => {
                (flags.selected().map(|query| Selector::Function { name, query }), Some(file))
            }
            Some(ItemCommand::Variable { name, flags, file }) => {
                (flags.selected().map(|query| Selector::Variable { name, query }), Some(file))
            }
            None => (cli.global.selected().map(Selector::Global), cli.file),
        };
        // clap's own validation makes these unreachable in practice
        let Some(selector) = selector else {
            return Err(CliOptions::command().error(ErrorKind::MissingRequiredArgument, "no query flag given"));
        };
        let Some(input) = input else {
            return Err(CliOptions::command().error(ErrorKind::MissingRequiredArgument, "no input file given"));
        };
        Ok(Self { selector, input })
    }
}

/// Rewrites the command line of `mquery-function` and `mquery-variable` into the equivalent `mquery` subcommand.
///
/// Other invocations are returned unchanged.
pub fn cli_args<I: IntoIterator<Item = OsString>>(args: I) -> Vec<OsString> {
    let mut args: Vec<OsString> = args.into_iter().collect();
    let Some(program) = args.first() else {
        return args;
    };
    let stem = Path::new(program)
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let subcommand = match stem.as_str() {
        "mquery-function" => "function",
        "mquery-variable" => "variable",
        _ => return args,
    };
    args[0] = OsString::from("mquery");
    args.insert(1, OsString::from(subcommand));
    args
}
