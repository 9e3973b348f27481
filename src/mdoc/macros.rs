use serde::Deserialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

macro_rules! mdoc_macros {
    ( $( $(#[$meta:meta])* $variant:ident = $name:literal ),+ $(,)? ) => {
        /// An mdoc macro, as attached to a [`DocumentNode`](crate::mdoc::DocumentNode).
        ///
        /// Variants are named after the macro itself where that's a valid identifier; the bibliographic `%X` macros
        /// get spelled-out names. Use [`Macro::name`] for the macro as it appears in the source.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
        #[serde(try_from = "String")]
        pub enum Macro {
            $(
            $(#[$meta])*
            $variant,
            )+
        }

        impl Macro {
            /// Every known macro, in mandoc's declaration order.
            pub const ALL: &'static [Macro] = &[ $( Macro::$variant, )+ ];

            /// The macro's name as written in mdoc source, without the leading dot.
            pub fn name(self) -> &'static str {
                match self {
                    $( Macro::$variant => $name, )+
                }
            }
        }

        impl FromStr for Macro {
            type Err = UnknownMacro;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $name => Ok(Macro::$variant), )+
                    _ => Err(UnknownMacro(s.to_string())),
                }
            }
        }
    };
}

mdoc_macros! {
    Ap = "Ap",
    Dd = "Dd",
    Dt = "Dt",
    Os = "Os",
    /// Section header. Its head holds the section's title.
    Sh = "Sh",
    /// Subsection header.
    Ss = "Ss",
    /// Paragraph break.
    Pp = "Pp",
    D1 = "D1",
    /// One-line literal display.
    Dl = "Dl",
    /// Display block.
    Bd = "Bd",
    Ed = "Ed",
    /// List block.
    Bl = "Bl",
    El = "El",
    /// List item.
    It = "It",
    Ad = "Ad",
    /// Author name. `.An -split` changes how subsequent authors are laid out.
    An = "An",
    Ar = "Ar",
    Cd = "Cd",
    Cm = "Cm",
    /// Defined variable or preprocessor constant.
    Dv = "Dv",
    Er = "Er",
    /// Environment variable.
    Ev = "Ev",
    Ex = "Ex",
    Fa = "Fa",
    Fd = "Fd",
    Fl = "Fl",
    Fn = "Fn",
    Ft = "Ft",
    /// Internal or interactive command; eclass manuals use it for function names.
    Ic = "Ic",
    In = "In",
    Li = "Li",
    /// One-line description in the NAME section.
    Nd = "Nd",
    /// Document name.
    Nm = "Nm",
    Op = "Op",
    Ot = "Ot",
    /// File system path.
    Pa = "Pa",
    Rv = "Rv",
    St = "St",
    /// Variable name.
    Va = "Va",
    Vt = "Vt",
    /// Cross reference to another manual page.
    Xr = "Xr",
    RsAuthor = "%A",
    RsBook = "%B",
    RsDate = "%D",
    RsIssuer = "%I",
    RsJournal = "%J",
    RsNumber = "%N",
    RsOptional = "%O",
    RsPage = "%P",
    RsReport = "%R",
    RsTitle = "%T",
    RsVolume = "%V",
    Ac = "Ac",
    Ao = "Ao",
    /// Angle-bracket enclosure.
    Aq = "Aq",
    At = "At",
    Bc = "Bc",
    Bf = "Bf",
    Bo = "Bo",
    Bq = "Bq",
    Bsx = "Bsx",
    Bx = "Bx",
    Db = "Db",
    Dc = "Dc",
    Do = "Do",
    Dq = "Dq",
    Ec = "Ec",
    Ef = "Ef",
    Em = "Em",
    Eo = "Eo",
    Fx = "Fx",
    Ms = "Ms",
    No = "No",
    /// Suppress the space before the next token.
    Ns = "Ns",
    Nx = "Nx",
    Ox = "Ox",
    Pc = "Pc",
    Pf = "Pf",
    Po = "Po",
    /// Parenthetical enclosure.
    Pq = "Pq",
    Qc = "Qc",
    Ql = "Ql",
    Qo = "Qo",
    Qq = "Qq",
    Re = "Re",
    Rs = "Rs",
    Sc = "Sc",
    So = "So",
    Sq = "Sq",
    Sm = "Sm",
    Sx = "Sx",
    Sy = "Sy",
    Tn = "Tn",
    Ux = "Ux",
    Xc = "Xc",
    Xo = "Xo",
    Fo = "Fo",
    Fc = "Fc",
    Oo = "Oo",
    Oc = "Oc",
    Bk = "Bk",
    Ek = "Ek",
    Bt = "Bt",
    Hf = "Hf",
    Fr = "Fr",
    Ud = "Ud",
    Lb = "Lb",
    /// Deprecated synonym for [`Macro::Pp`].
    Lp = "Lp",
    /// Hyperlink: the first child is the target, the rest is its description.
    Lk = "Lk",
    /// Mail address.
    Mt = "Mt",
    Brq = "Brq",
    Bro = "Bro",
    Brc = "Brc",
    RsCity = "%C",
    Es = "Es",
    En = "En",
    Dx = "Dx",
    RsInstitution = "%Q",
    RsUrl = "%U",
    Ta = "Ta",
    Tg = "Tg",
}

impl Display for Macro {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<String> for Macro {
    type Error = UnknownMacro;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Returned when a macro name isn't part of the mdoc macro set.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnknownMacro(pub String);

impl std::error::Error for UnknownMacro {}

impl Display for UnknownMacro {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown mdoc macro: {:?}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for &mac in Macro::ALL {
            assert_eq!(mac.name().parse::<Macro>(), Ok(mac));
        }
    }

    #[test]
    fn bibliographic_names() {
        assert_eq!("%A".parse::<Macro>(), Ok(Macro::RsAuthor));
        assert_eq!(Macro::RsUrl.to_string(), "%U");
    }

    #[test]
    fn unknown() {
        assert_eq!("Zz".parse::<Macro>(), Err(UnknownMacro("Zz".to_string())));
        assert_eq!(
            UnknownMacro("Zz".to_string()).to_string(),
            "unknown mdoc macro: \"Zz\""
        );
    }

    #[test]
    fn case_sensitive() {
        assert!("sh".parse::<Macro>().is_err());
    }
}
