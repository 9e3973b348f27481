use std::fmt::{Display, Formatter};

macro_rules! flag_enum {
    (
        $(#[$enum_meta:meta])*
        $enum_name:ident {
            $( $(#[$meta:meta])* $name:ident = $flag:literal ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $enum_name {
            $(
            $(#[$meta])*
            $name,
            )+
        }

        impl $enum_name {
            pub const ALL: &'static [$enum_name] = &[ $( $enum_name::$name, )+ ];

            /// The command-line flag that selects this query, without its dash.
            pub fn flag(self) -> char {
                match self {
                    $( $enum_name::$name => $flag, )+
                }
            }

            pub fn from_flag(flag: char) -> Option<Self> {
                match flag {
                    $( $flag => Some($enum_name::$name), )+
                    _ => None,
                }
            }
        }

        impl Display for $enum_name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "-{}", self.flag())
            }
        }
    };
}

flag_enum! {
    /// Queries about the document as a whole.
    GlobalQuery {
        /// The one-line description from the NAME section.
        Blurb = 'B',
        /// The DESCRIPTION section, plus the links listed under SEE ALSO.
        Description = 'D',
        /// Function names from the FUNCTIONS list.
        FunctionList = 'F',
        /// Variable names from the subsections of ECLASS VARIABLES.
        VariableList = 'V',
        Authors = 'a',
        /// The first link in REPORTING BUGS.
        BugReportLink = 'b',
        DeprecationNotice = 'd',
        Examples = 'e',
        Maintainers = 'm',
    }
}

flag_enum! {
    /// Queries about one function.
    FunctionQuery {
        Description = 'D',
        Deprecated = 'd',
        Internal = 'i',
        Returns = 'r',
        Usage = 'u',
    }
}

flag_enum! {
    /// Queries about one variable.
    VariableQuery {
        Description = 'D',
        Deprecated = 'd',
        Internal = 'i',
        Output = 'o',
        PreInherit = 'p',
        Required = 'r',
        UserVariable = 'u',
    }
}

/// What a single invocation asks for.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Selector {
    Global(GlobalQuery),
    Function { name: String, query: FunctionQuery },
    Variable { name: String, query: VariableQuery },
}

impl From<GlobalQuery> for Selector {
    fn from(query: GlobalQuery) -> Self {
        Selector::Global(query)
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Global(query) => write!(f, "{query}"),
            Selector::Function { name, query } => write!(f, "function {name} {query}"),
            Selector::Variable { name, query } => write!(f, "variable {name} {query}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_round_trip() {
        for &query in GlobalQuery::ALL {
            assert_eq!(GlobalQuery::from_flag(query.flag()), Some(query));
        }
        for &query in FunctionQuery::ALL {
            assert_eq!(FunctionQuery::from_flag(query.flag()), Some(query));
        }
        for &query in VariableQuery::ALL {
            assert_eq!(VariableQuery::from_flag(query.flag()), Some(query));
        }
    }

    #[test]
    fn unknown_flag() {
        assert_eq!(GlobalQuery::from_flag('x'), None);
        assert_eq!(FunctionQuery::from_flag('o'), None);
    }

    #[test]
    fn flags_are_case_sensitive() {
        assert_eq!(GlobalQuery::from_flag('D'), Some(GlobalQuery::Description));
        assert_eq!(GlobalQuery::from_flag('d'), Some(GlobalQuery::DeprecationNotice));
    }

    #[test]
    fn display() {
        assert_eq!(Selector::Global(GlobalQuery::BugReportLink).to_string(), "-b");
        let selector = Selector::Variable {
            name: "PYTHON_COMPAT".to_string(),
            query: VariableQuery::PreInherit,
        };
        assert_eq!(selector.to_string(), "variable PYTHON_COMPAT -p");
    }
}
