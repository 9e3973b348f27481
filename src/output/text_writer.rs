use std::io;
use std::io::Write;

/// A writer that owns the spacing between words.
///
/// Word separators are never written eagerly. [`TextWriter::space`] only records that one is pending, and it gets
/// written just before the next piece of text. That lets closing punctuation, paragraph breaks and `Ns` take the
/// space back before it hits the underlying stream.
pub struct TextWriter<W> {
    underlying: W,
    pending_space: bool,
    /// Set by `Ns`: the next text gets no separator, and its own leading spaces are trimmed.
    no_space: bool,
}

impl<W: Write> TextWriter<W> {
    pub fn new(underlying: W) -> Self {
        Self {
            underlying,
            pending_space: false,
            no_space: false,
        }
    }

    /// Writes text, preceded by the pending separator (if any).
    ///
    /// Text that already starts with a space doesn't get a second one.
    pub fn write_str(&mut self, text: &str) -> io::Result<()> {
        let text = if std::mem::take(&mut self.no_space) {
            self.pending_space = false;
            text.trim_start_matches(' ')
        } else {
            text
        };
        if text.is_empty() {
            return Ok(());
        }
        if std::mem::take(&mut self.pending_space) && !text.starts_with(' ') {
            self.underlying.write_all(b" ")?;
        }
        self.underlying.write_all(text.as_bytes())
    }

    /// Writes closing text such as `)` or `>`, which attaches to the word before it.
    ///
    /// The pending separator is dropped. If the text itself ends in spaces, they become the new pending separator
    /// instead of being written.
    pub fn write_closing(&mut self, text: &str) -> io::Result<()> {
        self.pending_space = false;
        self.no_space = false;
        let trimmed = text.trim_end_matches(' ');
        if !trimmed.is_empty() {
            self.underlying.write_all(trimmed.as_bytes())?;
        }
        if trimmed.len() != text.len() {
            self.pending_space = true;
        }
        Ok(())
    }

    /// Requests a separator before the next text.
    pub fn space(&mut self) {
        self.pending_space = true;
    }

    /// Forgets the pending separator, if there is one.
    pub fn drop_space(&mut self) {
        self.pending_space = false;
    }

    /// Makes the next text attach directly to what came before it.
    pub fn suppress_space(&mut self) {
        self.no_space = true;
    }

    /// Undoes [`Self::suppress_space`]. A node that starts its own input line does this, since `Ns` only reaches
    /// within a line.
    pub fn allow_space(&mut self) {
        self.no_space = false;
    }

    /// Ends the current line. Any pending separator is dropped rather than left dangling at the end of the line.
    pub fn end_line(&mut self) -> io::Result<()> {
        self.pending_space = false;
        self.no_space = false;
        self.underlying.write_all(b"\n")
    }

    /// Writes out any pending separator and flushes the underlying stream.
    pub fn finish(&mut self) -> io::Result<()> {
        if std::mem::take(&mut self.pending_space) {
            self.underlying.write_all(b" ")?;
        }
        self.underlying.flush()
    }

    pub fn take_underlying(self) -> W {
        self.underlying
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn words_separated_once() {
        check(
            |w| {
                w.write_str("hello")?;
                w.space();
                w.space();
                w.write_str("world")
            },
            "hello world",
        );
    }

    #[test]
    fn no_leading_separator() {
        check(|w| w.write_str("hello"), "hello");
    }

    #[test]
    fn text_with_own_space() {
        check(
            |w| {
                w.write_str("see")?;
                w.space();
                w.write_str(" (link")
            },
            "see (link",
        );
    }

    #[test]
    fn closing_eats_separator() {
        check(
            |w| {
                w.write_str("(word")?;
                w.space();
                w.write_closing(") ")?;
                w.write_str("next")
            },
            "(word) next",
        );
    }

    #[test]
    fn closing_without_trailing_space() {
        check(
            |w| {
                w.write_str("<addr")?;
                w.space();
                w.write_closing(">")?;
                w.write_str("next")
            },
            "<addr>next",
        );
    }

    #[test]
    fn suppressed_space() {
        check(
            |w| {
                w.write_str("foo")?;
                w.space();
                w.suppress_space();
                w.write_str("  bar")
            },
            "foobar",
        );
    }

    #[test]
    fn empty_text_consumes_suppression() {
        check(
            |w| {
                w.write_str("a")?;
                w.suppress_space();
                w.write_str("")?;
                w.space();
                w.write_str("b")
            },
            "a b",
        );
    }

    #[test]
    fn allow_space_cancels_suppression() {
        check(
            |w| {
                w.write_str("a")?;
                w.space();
                w.suppress_space();
                w.allow_space();
                w.write_str("b")
            },
            "a b",
        );
    }

    #[test]
    fn dropped_space() {
        check(
            |w| {
                w.write_str("a")?;
                w.space();
                w.drop_space();
                w.write_str("b")
            },
            "ab",
        );
    }

    #[test]
    fn end_line_drops_separator() {
        check(
            |w| {
                w.write_str("a")?;
                w.space();
                w.end_line()?;
                w.write_str("b")
            },
            "a\nb",
        );
    }

    #[test]
    fn finish_writes_pending_separator() {
        check(
            |w| {
                w.write_str("Does things.")?;
                w.space();
                Ok(())
            },
            "Does things. ",
        );
    }

    fn check(action: impl FnOnce(&mut TextWriter<Vec<u8>>) -> io::Result<()>, expect: &str) {
        let mut writer = TextWriter::new(Vec::new());
        action(&mut writer).unwrap();
        writer.finish().unwrap();
        let actual = String::from_utf8(writer.take_underlying()).unwrap();
        assert_eq!(actual, expect);
    }
}
