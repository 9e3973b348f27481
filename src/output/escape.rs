use memchr::memchr;
use std::fmt;
use std::fmt::Write;

/// Whether whitespace in a text run gets normalized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FillMode {
    /// Leading spaces are stripped and runs of spaces collapse to one.
    Fill,
    /// Spaces are kept as written.
    NoFill,
}

/// Decodes a raw text run into plain text.
///
/// See [`decode_into`].
pub fn decode(raw: &str, mode: FillMode) -> String {
    let mut out = String::with_capacity(raw.len());
    decode_into(&mut out, raw, mode).expect("writing to a String can't fail");
    out
}

/// Decodes a raw text run and writes the result.
///
/// Escape sequences are replaced by the character they stand for, or dropped if they don't stand for one (font and
/// size changes, zero-width markers, and the like). Plain spaces follow the [`FillMode`]. In either mode, a single
/// trailing space is dropped. An unterminated escape ends the run: everything from its backslash on is ignored.
pub fn decode_into<W: Write>(out: &mut W, raw: &str, mode: FillMode) -> fmt::Result {
    let mut emitter = Emitter {
        out,
        mode,
        pending_spaces: 0,
        wrote_any: false,
    };
    let bytes = raw.as_bytes();
    let mut pos = 0;
    loop {
        let next_escape = memchr(b'\\', &bytes[pos..]).map(|i| pos + i);
        for ch in raw[pos..next_escape.unwrap_or(raw.len())].chars() {
            if ch == ' ' {
                emitter.pending_spaces += 1;
            } else {
                emitter.char(ch)?;
            }
        }
        let Some(backslash) = next_escape else {
            break;
        };
        let Some((escape, len)) = parse_escape(&raw[backslash + 1..]) else {
            break;
        };
        match escape {
            Escape::Char(ch) => emitter.char(ch)?,
            Escape::Str(s) => emitter.str(s)?,
            Escape::Nothing => {}
        }
        pos = backslash + 1 + len;
    }
    emitter.finish()
}

struct Emitter<'a, W> {
    out: &'a mut W,
    mode: FillMode,
    pending_spaces: usize,
    wrote_any: bool,
}

impl<W: Write> Emitter<'_, W> {
    fn char(&mut self, ch: char) -> fmt::Result {
        self.flush_spaces()?;
        self.wrote_any = true;
        self.out.write_char(ch)
    }

    fn str(&mut self, s: &str) -> fmt::Result {
        self.flush_spaces()?;
        self.wrote_any = true;
        self.out.write_str(s)
    }

    fn flush_spaces(&mut self) -> fmt::Result {
        let count = std::mem::take(&mut self.pending_spaces);
        let count = match self.mode {
            FillMode::Fill if self.wrote_any => count.min(1),
            FillMode::Fill => 0,
            FillMode::NoFill => count,
        };
        (0..count).try_for_each(|_| self.out.write_char(' '))
    }

    fn finish(mut self) -> fmt::Result {
        self.pending_spaces = match self.mode {
            FillMode::Fill => 0,
            FillMode::NoFill => self.pending_spaces.saturating_sub(1),
        };
        self.flush_spaces()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Escape {
    Char(char),
    Str(&'static str),
    Nothing,
}

/// Parses one escape sequence. `s` starts just past the backslash.
///
/// Returns the decoded escape and how many bytes of `s` it used, or `None` if the escape is unterminated.
fn parse_escape(s: &str) -> Option<(Escape, usize)> {
    let c = s.chars().next()?;
    let c_len = c.len_utf8();
    let rest = &s[c_len..];
    let one = |escape| Some((escape, c_len));
    match c {
        'e' | '\\' => one(Escape::Char('\\')),
        '-' => one(Escape::Char('-')),
        '.' => one(Escape::Char('.')),
        '\'' => one(Escape::Char('\u{b4}')),
        '`' => one(Escape::Char('`')),
        ' ' | '~' | '0' => one(Escape::Char(' ')),
        't' => one(Escape::Char('\t')),
        '&' | '|' | '^' | '%' | ':' | 'c' | ')' | 'd' | 'u' | 'r' | 'p' | '{' | '}' | 'a' => one(Escape::Nothing),
        '(' | '[' => {
            let (name, len) = read_name(s)?;
            Some((special_char(name), len))
        }
        'C' => {
            let (name, len) = read_quoted(rest)?;
            Some((special_char(name), c_len + len))
        }
        '*' => {
            let (name, len) = read_name(rest)?;
            let escape = predefined_string(name).map_or(Escape::Nothing, Escape::Str);
            Some((escape, c_len + len))
        }
        'f' | 'F' | 'g' | 'k' | 'm' | 'M' | 'Y' | 'V' | '$' => {
            let (_, len) = read_name(rest)?;
            Some((Escape::Nothing, c_len + len))
        }
        'n' => {
            let sign_len = usize::from(rest.starts_with(['+', '-']));
            let (_, len) = read_name(&rest[sign_len..])?;
            Some((Escape::Nothing, c_len + sign_len + len))
        }
        's' => {
            let len = read_size(rest)?;
            Some((Escape::Nothing, c_len + len))
        }
        'N' => {
            let (number, len) = read_quoted(rest)?;
            let escape = number
                .parse::<u32>()
                .ok()
                .and_then(char::from_u32)
                .map_or(Escape::Nothing, Escape::Char);
            Some((escape, c_len + len))
        }
        'h' | 'v' | 'w' | 'o' | 'l' | 'L' | 'D' | 'b' | 'X' | 'Z' | 'A' | 'B' | 'R' | 'x' | 'H' | 'S' => {
            let (_, len) = read_quoted(rest)?;
            Some((Escape::Nothing, c_len + len))
        }
        'z' => {
            let next = rest.chars().next()?;
            Some((Escape::Nothing, c_len + next.len_utf8()))
        }
        other => one(Escape::Char(other)),
    }
}

/// Reads an escape's name argument: `x`, `(xx` or `[name]`.
fn read_name(s: &str) -> Option<(&str, usize)> {
    let first = s.chars().next()?;
    match first {
        '(' => {
            let name_len: usize = s[1..].chars().take(2).map(char::len_utf8).sum();
            let name = &s[1..1 + name_len];
            (name.chars().count() == 2).then_some((name, 1 + name_len))
        }
        '[' => {
            let close = s.find(']')?;
            Some((&s[1..close], close + 1))
        }
        _ => Some((&s[..first.len_utf8()], first.len_utf8())),
    }
}

/// Reads a delimited argument like `'65'`. Any character can be the delimiter.
fn read_quoted(s: &str) -> Option<(&str, usize)> {
    let delim = s.chars().next()?;
    let body = &s[delim.len_utf8()..];
    let close = body.find(delim)?;
    Some((&body[..close], delim.len_utf8() + close + delim.len_utf8()))
}

/// Reads a `\s` size argument: `[+-]N`, `[+-]NN` (for 10 to 39), `(NN`, `[N]` or `'N'`.
fn read_size(s: &str) -> Option<usize> {
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let after_sign = &s[sign_len..];
    let len = match after_sign.chars().next()? {
        '(' | '[' => read_name(after_sign)?.1,
        '\'' => read_quoted(after_sign)?.1,
        '1'..='3' if after_sign[1..].starts_with(|c: char| c.is_ascii_digit()) => 2,
        d if d.is_ascii_digit() => 1,
        _ => return None,
    };
    Some(sign_len + len)
}

fn special_char(name: &str) -> Escape {
    if let Some(hex) = name.strip_prefix('u') {
        if (4..=6).contains(&hex.len()) {
            if let Some(ch) = u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
                return Escape::Char(ch);
            }
        }
    }
    lookup(SPECIAL_CHARS, name).map_or(Escape::Nothing, Escape::Str)
}

fn predefined_string(name: &str) -> Option<&'static str> {
    lookup(PREDEFINED_STRINGS, name)
}

fn lookup(table: &'static [(&'static str, &'static str)], name: &str) -> Option<&'static str> {
    table.iter().find(|(key, _)| *key == name).map(|(_, value)| *value)
}

/// Named special characters: `\(xx`, `\[xx]` and `\C'xx'`.
static SPECIAL_CHARS: &[(&str, &str)] = &[
    // quotes
    ("aq", "'"),
    ("dq", "\""),
    ("lq", "\u{201c}"),
    ("rq", "\u{201d}"),
    ("oq", "\u{2018}"),
    ("cq", "\u{2019}"),
    ("Bq", "\u{201e}"),
    ("bq", "\u{201a}"),
    ("Fo", "\u{ab}"),
    ("Fc", "\u{bb}"),
    ("fo", "\u{2039}"),
    ("fc", "\u{203a}"),
    // dashes and punctuation
    ("em", "\u{2014}"),
    ("en", "\u{2013}"),
    ("hy", "-"),
    ("mi", "-"),
    ("r!", "\u{a1}"),
    ("r?", "\u{bf}"),
    ("bu", "\u{2022}"),
    ("ci", "\u{25cb}"),
    ("sq", "\u{25a1}"),
    ("de", "\u{b0}"),
    ("dg", "\u{2020}"),
    ("dd", "\u{2021}"),
    ("sc", "\u{a7}"),
    ("ps", "\u{b6}"),
    ("lB", "["),
    ("rB", "]"),
    ("lC", "{"),
    ("rC", "}"),
    ("la", "\u{27e8}"),
    ("ra", "\u{27e9}"),
    ("ba", "|"),
    ("br", "\u{2502}"),
    ("ul", "_"),
    ("ru", "_"),
    ("rs", "\\"),
    ("sl", "/"),
    ("ti", "~"),
    ("ha", "^"),
    ("at", "@"),
    ("sh", "#"),
    ("Do", "$"),
    // arrows
    ("->", "\u{2192}"),
    ("<-", "\u{2190}"),
    ("<>", "\u{2194}"),
    ("ua", "\u{2191}"),
    ("da", "\u{2193}"),
    ("rA", "\u{21d2}"),
    ("lA", "\u{21d0}"),
    ("hA", "\u{21d4}"),
    // math
    ("pl", "+"),
    ("eq", "="),
    ("lt", "<"),
    ("gt", ">"),
    ("<=", "\u{2264}"),
    (">=", "\u{2265}"),
    ("!=", "\u{2260}"),
    ("==", "\u{2261}"),
    ("~~", "\u{2248}"),
    ("+-", "\u{b1}"),
    ("mu", "\u{d7}"),
    ("di", "\u{f7}"),
    ("if", "\u{221e}"),
    ("12", "\u{bd}"),
    ("14", "\u{bc}"),
    ("34", "\u{be}"),
    // legal and currency
    ("co", "\u{a9}"),
    ("rg", "\u{ae}"),
    ("tm", "\u{2122}"),
    ("ct", "\u{a2}"),
    ("Eu", "\u{20ac}"),
    ("eu", "\u{20ac}"),
    ("Po", "\u{a3}"),
    ("Ye", "\u{a5}"),
    // letters
    ("ss", "\u{df}"),
    ("ae", "\u{e6}"),
    ("AE", "\u{c6}"),
    ("o/", "\u{f8}"),
    ("O/", "\u{d8}"),
    (":a", "\u{e4}"),
    (":o", "\u{f6}"),
    (":u", "\u{fc}"),
    (":A", "\u{c4}"),
    (":O", "\u{d6}"),
    (":U", "\u{dc}"),
    ("'a", "\u{e1}"),
    ("'e", "\u{e9}"),
    ("`a", "\u{e0}"),
    ("`e", "\u{e8}"),
    (",c", "\u{e7}"),
    ("~n", "\u{f1}"),
    ("*a", "\u{3b1}"),
    ("*b", "\u{3b2}"),
    ("*g", "\u{3b3}"),
    ("*d", "\u{3b4}"),
    ("*l", "\u{3bb}"),
    ("*m", "\u{3bc}"),
    ("*p", "\u{3c0}"),
    ("*s", "\u{3c3}"),
];

/// Predefined strings: `\*x`, `\*(xx` and `\*[name]`.
static PREDEFINED_STRINGS: &[(&str, &str)] = &[
    ("Lq", "\u{201c}"),
    ("Rq", "\u{201d}"),
    ("lq", "\u{201c}"),
    ("rq", "\u{201d}"),
    ("q", "\""),
    ("Ba", "|"),
    ("R", "\u{ae}"),
    ("Tm", "\u{2122}"),
    ("Px", "POSIX"),
    ("Ai", "ANSI"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(raw: &str) -> String {
        decode(raw, FillMode::Fill)
    }

    fn no_fill(raw: &str) -> String {
        decode(raw, FillMode::NoFill)
    }

    #[test]
    fn plain_text_unchanged() {
        assert_eq!(fill("fetches remote archives"), "fetches remote archives");
        assert_eq!(fill(""), "");
    }

    #[test]
    fn trailing_space_dropped() {
        assert_eq!(fill("hello "), "hello");
        assert_eq!(no_fill("hello "), "hello");
        assert_eq!(no_fill("hello   "), "hello  ");
    }

    #[test]
    fn fill_collapses_and_strips() {
        assert_eq!(fill("   hello    world   "), "hello world");
    }

    #[test]
    fn no_fill_keeps_spaces() {
        assert_eq!(no_fill("    indented  code"), "    indented  code");
    }

    #[test]
    fn only_spaces() {
        assert_eq!(fill("    "), "");
        assert_eq!(no_fill("   "), "  ");
    }

    #[test]
    fn simple_escapes() {
        assert_eq!(fill(r"a\-b"), "a-b");
        assert_eq!(fill(r"C:\eWindows"), r"C:\Windows");
        assert_eq!(fill(r"\&.Pp"), ".Pp");
        assert_eq!(fill(r"no\|space"), "nospace");
        assert_eq!(fill(r"\'"), "\u{b4}");
    }

    #[test]
    fn escaped_space_is_not_collapsed() {
        assert_eq!(fill(r"a\ \ b"), "a  b");
        assert_eq!(fill(r"a\ "), "a ");
        assert_eq!(fill(r"\~lead"), " lead");
    }

    #[test]
    fn zero_width_between_spaces() {
        assert_eq!(fill(r"a \& b"), "a b");
    }

    #[test]
    fn special_characters() {
        assert_eq!(fill(r"\(em"), "\u{2014}");
        assert_eq!(fill(r"\[lq]quoted\[rq]"), "\u{201c}quoted\u{201d}");
        assert_eq!(fill(r"\(co 2021"), "\u{a9} 2021");
        assert_eq!(fill(r"\C'bu' item"), "\u{2022} item");
    }

    #[test]
    fn unknown_special_character_dropped() {
        assert_eq!(fill(r"a\(zzb"), "ab");
        assert_eq!(fill(r"a\[nothing]b"), "ab");
    }

    #[test]
    fn unicode_escape() {
        assert_eq!(fill(r"\[u00E9]t\[u00E9]"), "\u{e9}t\u{e9}");
        assert_eq!(fill(r"\[u1F600]"), "\u{1f600}");
        assert_eq!(fill(r"\[uD800]"), "");
    }

    #[test]
    fn numbered_character() {
        assert_eq!(fill(r"\N'65'BC"), "ABC");
    }

    #[test]
    fn predefined_strings() {
        assert_eq!(fill(r"\*(Lqhi\*(Rq"), "\u{201c}hi\u{201d}");
        assert_eq!(fill(r"\*[Px] says"), "POSIX says");
        assert_eq!(fill(r"\*q"), "\"");
        assert_eq!(fill(r"\*(Zzx"), "x");
    }

    #[test]
    fn fonts_and_sizes_dropped() {
        assert_eq!(fill(r"\fBbold\fR and \f(BIboth\fP"), "bold and both");
        assert_eq!(fill(r"\f[CR]mono\f[]"), "mono");
        assert_eq!(fill(r"\s-1small\s0 \s+12big\s(10x\s[12]y\s'8'z"), "small bigxyz");
        assert_eq!(fill(r"\n(.lreg\n+xr"), "regr");
    }

    #[test]
    fn quoted_argument_escapes_dropped() {
        assert_eq!(fill(r"a\h'2n'b\w'abc'c"), "abc");
    }

    #[test]
    fn unknown_single_char_escape_is_literal() {
        assert_eq!(fill(r"\q"), "q");
    }

    #[test]
    fn unterminated_escapes_stop_decoding() {
        assert_eq!(fill(r"before\"), "before");
        assert_eq!(fill(r"before\(e"), "before");
        assert_eq!(fill(r"before \[lq rest"), "before");
        assert_eq!(fill(r"before\h'2n rest"), "before");
        assert_eq!(fill(r"before\s"), "before");
        assert_eq!(fill(r"before\*"), "before");
    }

    #[test]
    fn multibyte_text() {
        assert_eq!(fill("caf\u{e9}  \u{fc}ber"), "caf\u{e9} \u{fc}ber");
        assert_eq!(fill("\\\u{e9}"), "\u{e9}");
    }
}
