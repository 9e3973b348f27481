use crate::mdoc::{Document, DocumentNode, Macro, NodeFlags, NodeId, NodeKind, Position};
use crate::output::escape::{decode, FillMode};
use crate::output::TextWriter;
use std::io;
use std::io::Write;

/// Writing reconstructed text failed.
#[derive(Debug, thiserror::Error)]
#[error("{position}: {source}")]
pub struct WriteError {
    /// Where the node being written came from.
    pub position: Position,
    #[source]
    pub source: io::Error,
}

impl WriteError {
    /// Wraps I/O errors from writing the node at `position`.
    pub fn at(position: Position) -> impl Fn(io::Error) -> Self {
        move |source| Self { position, source }
    }
}

/// The text written around a node's own content to stand in for its macro.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Enclosure {
    prefix: &'static str,
    suffix: &'static str,
}

impl Enclosure {
    const NONE: Self = Self::new("", "");
    const PARAGRAPH: Self = Self::new("\n", "\n");
    const ANGLE: Self = Self::new("<", ">\n");
    const DISPLAY: Self = Self::new("\n\n@CODE\n", "@CODE\n");
    const PARENS: Self = Self::new(" (", ") ");

    const fn new(prefix: &'static str, suffix: &'static str) -> Self {
        Self { prefix, suffix }
    }

    fn for_macro(mdoc_macro: Macro) -> Self {
        match mdoc_macro {
            Macro::Pp | Macro::Lp => Self::PARAGRAPH,
            Macro::Mt | Macro::Aq => Self::ANGLE,
            Macro::Bd | Macro::Dl | Macro::D1 => Self::DISPLAY,
            Macro::Pq => Self::PARENS,
            _ => Self::NONE,
        }
    }
}

/// Writes a node and everything under it as plain text.
///
/// Head and body regions, and the root, contribute only their children. Nodes flagged
/// [`NO_PRINT`](NodeFlags::NO_PRINT) are skipped along with their subtrees.
pub fn write_node<W: Write>(out: &mut TextWriter<W>, doc: &Document, id: NodeId) -> Result<(), WriteError> {
    let node = doc.node(id);
    if node.flags().contains(NodeFlags::NO_PRINT) {
        return Ok(());
    }
    match node.kind() {
        NodeKind::Root | NodeKind::Head | NodeKind::Body => write_children(out, doc, node),
        NodeKind::Element | NodeKind::Block => write_macro_node(out, doc, id, node),
        NodeKind::Text => write_text(out, doc, id, node),
    }
}

/// Flattens a node to a single trimmed string. This is how section headings get compared.
pub fn plain_text(doc: &Document, id: NodeId) -> String {
    let mut out = TextWriter::new(Vec::new());
    write_node(&mut out, doc, id).expect("writing to a Vec can't fail");
    String::from_utf8_lossy(&out.take_underlying()).trim().to_string()
}

fn write_children<W: Write>(out: &mut TextWriter<W>, doc: &Document, node: &DocumentNode) -> Result<(), WriteError> {
    for &child in node.children() {
        write_node(out, doc, child)?;
    }
    Ok(())
}

fn write_macro_node<W: Write>(
    out: &mut TextWriter<W>,
    doc: &Document,
    id: NodeId,
    node: &DocumentNode,
) -> Result<(), WriteError> {
    if node.flags().contains(NodeFlags::LINE) && !doc.is_in_item_head(id) {
        out.allow_space();
    }
    let Some(mdoc_macro) = node.mdoc_macro() else {
        return write_children(out, doc, node);
    };
    match mdoc_macro {
        Macro::Ns => {
            out.suppress_space();
            return Ok(());
        }
        Macro::An if node.has_arg("-split") || node.has_arg("-nosplit") || node.children().is_empty() => {
            out.drop_space();
            return Ok(());
        }
        _ => {}
    }

    let inside_angles = doc
        .enclosing_node(id)
        .and_then(DocumentNode::mdoc_macro)
        .is_some_and(|outer| Enclosure::for_macro(outer) == Enclosure::ANGLE);
    let enclosure = if inside_angles {
        Enclosure::NONE
    } else {
        Enclosure::for_macro(mdoc_macro)
    };

    let at = WriteError::at(node.position());
    if enclosure.prefix.starts_with('\n') {
        out.drop_space();
    }
    if !enclosure.prefix.is_empty() {
        out.write_str(enclosure.prefix).map_err(&at)?;
    }
    write_children(out, doc, node)?;
    if !enclosure.suffix.is_empty() {
        out.write_closing(enclosure.suffix).map_err(&at)?;
    }
    Ok(())
}

fn write_text<W: Write>(
    out: &mut TextWriter<W>,
    doc: &Document,
    id: NodeId,
    node: &DocumentNode,
) -> Result<(), WriteError> {
    let raw = node.text().unwrap_or_default();
    let mode = if doc.is_no_fill(id) {
        FillMode::NoFill
    } else {
        FillMode::Fill
    };
    let decoded = decode(raw, mode);
    let at = WriteError::at(node.position());

    let parent = node.parent().map(|parent_id| doc.node(parent_id));
    if parent.is_some_and(|p| p.is_macro(Macro::Lk)) && node.prev().is_some() {
        out.write_str(&format!(" ({decoded}")).map_err(&at)?;
        return out.write_closing(")").map_err(&at);
    }

    match mode {
        FillMode::NoFill => {
            out.write_str(&decoded).map_err(&at)?;
            out.end_line().map_err(&at)
        }
        FillMode::Fill => {
            if decoded.is_empty() {
                return Ok(());
            }
            out.write_str(&decoded).map_err(&at)?;
            if !precedes_paragraph(doc, node) {
                out.space();
            }
            Ok(())
        }
    }
}

/// Whether a paragraph break directly follows this text run, either as its next sibling or (when it's the last run)
/// as its parent's next sibling. Nodes that aren't printed don't count as either.
fn precedes_paragraph(doc: &Document, node: &DocumentNode) -> bool {
    let is_paragraph = |id: NodeId| matches!(doc.node(id).mdoc_macro(), Some(Macro::Pp | Macro::Lp));
    match next_printed(doc, node.next()) {
        Some(next) => is_paragraph(next),
        None => node
            .parent()
            .and_then(|parent| next_printed(doc, doc.node(parent).next()))
            .is_some_and(is_paragraph),
    }
}

/// The first node from `from` onward (along its siblings) that isn't flagged [`NodeFlags::NO_PRINT`].
fn next_printed(doc: &Document, from: Option<NodeId>) -> Option<NodeId> {
    let mut curr = from;
    while let Some(id) = curr {
        let node = doc.node(id);
        if !node.flags().contains(NodeFlags::NO_PRINT) {
            return Some(id);
        }
        curr = node.next();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdoc::*;

    #[test]
    fn runs_are_space_separated() {
        check_body(vec!["Does".into_node(), "X.".into_node()], "Does X. ");
    }

    #[test]
    fn paragraph_breaks() {
        check_body(
            vec!["First.".into_node(), pp(), "Second.".into_node()],
            "First.\n\nSecond. ",
        );
    }

    #[test]
    fn no_space_when_parent_precedes_paragraph() {
        check_body(
            vec![mdoc_elem!(Nm "foo"), pp(), "bar".into_node()],
            "foo\n\nbar ",
        );
    }

    #[test]
    fn mail_in_angle_group() {
        check_body(
            vec![
                "Ann Author".into_node(),
                mdoc_elem!(Aq [mdoc_elem!(Mt "ann@example.org")]),
            ],
            "Ann Author <ann@example.org>\n",
        );
    }

    #[test]
    fn bare_mail_address() {
        check_body(vec![mdoc_elem!(Mt "ann@example.org")], "<ann@example.org>\n");
    }

    #[test]
    fn parenthetical() {
        check_body(
            vec!["see".into_node(), mdoc_elem!(Pq "note"), "after".into_node()],
            "see (note) after ",
        );
    }

    #[test]
    fn display_block_is_literal() {
        let display = MdocNode::block(
            Macro::Bd,
            vec![],
            vec![MdocNode::text("  let  x = 1;"), MdocNode::text("")],
        )
        .with_flags(NodeFlags::NO_FILL);
        check_body(vec![display], "\n\n@CODE\n  let  x = 1;\n\n@CODE\n");
    }

    #[test]
    fn no_print_skipped() {
        check_body(
            vec![
                "shown".into_node(),
                mdoc_elem!(Nm "hidden").with_flags(NodeFlags::NO_PRINT),
                "also".into_node(),
            ],
            "shown also ",
        );
    }

    #[test]
    fn hidden_paragraph_is_not_a_break() {
        check_body(
            vec!["alpha".into_node(), pp().with_flags(NodeFlags::NO_PRINT), "beta".into_node()],
            "alpha beta ",
        );
    }

    #[test]
    fn hidden_node_before_paragraph() {
        check_body(
            vec![
                "alpha".into_node(),
                mdoc_elem!(Nm "hidden").with_flags(NodeFlags::NO_PRINT),
                pp(),
                "beta".into_node(),
            ],
            "alpha\n\nbeta ",
        );
    }

    #[test]
    fn hidden_node_after_parent_before_paragraph() {
        check_body(
            vec![
                mdoc_elem!(Nm "foo"),
                mdoc_elem!(Ar "hidden").with_flags(NodeFlags::NO_PRINT),
                pp(),
                "bar".into_node(),
            ],
            "foo\n\nbar ",
        );
    }

    #[test]
    fn no_trailing_space_before_display() {
        let display = MdocNode::block(Macro::Bd, vec![], vec![MdocNode::text("make")]).with_flags(NodeFlags::NO_FILL);
        check_body(vec!["Example:".into_node(), display], "Example:\n\n@CODE\nmake\n@CODE\n");
    }

    #[test]
    fn ns_joins_words() {
        check_body(
            vec!["foo".into_node(), MdocNode::elem(Macro::Ns, vec![]), "bar".into_node()],
            "foobar ",
        );
    }

    #[test]
    fn new_line_ends_ns() {
        check_body(
            vec![
                "foo".into_node(),
                MdocNode::elem(Macro::Ns, vec![]),
                mdoc_elem!(Nm "bar").with_flags(NodeFlags::LINE),
            ],
            "foo bar ",
        );
    }

    #[test]
    fn ns_reaches_across_lines_in_item_head() {
        let doc = Document::new(vec![list(vec![item(
            vec![
                "a".into_node(),
                MdocNode::elem(Macro::Ns, vec![]),
                mdoc_elem!(Ic "b").with_flags(NodeFlags::LINE),
            ],
            vec![],
        )])]);
        let head = doc.node(first_of(&doc, Macro::It)).head().unwrap();
        assert_eq!(render(&doc, head), "ab ");
    }

    #[test]
    fn author_split_prints_nothing() {
        check_body(
            vec![
                "Ann".into_node(),
                MdocNode::elem(Macro::An, vec![]).with_args(["-split"]),
                "Bob".into_node(),
            ],
            "AnnBob ",
        );
    }

    #[test]
    fn author_with_name() {
        check_body(vec![mdoc_elem!(An "Ann Author")], "Ann Author ");
    }

    #[test]
    fn link_with_description() {
        check_body(
            vec![mdoc_elem!(Lk ["https://example.org", "related tool"])],
            "https://example.org (related tool)",
        );
    }

    #[test]
    fn link_without_description() {
        check_body(vec![mdoc_elem!(Lk ["https://example.org"])], "https://example.org ");
    }

    #[test]
    fn escapes_decoded() {
        check_body(vec![r"a \(em b".into_node()], "a \u{2014} b ");
    }

    #[test]
    fn plain_text_is_trimmed() {
        let doc = Document::new(vec![MdocNode::block(
            Macro::Sh,
            vec![MdocNode::text("SEE"), MdocNode::text(r"ALSO\ ")],
            vec![],
        )]);
        let head = doc.node(first_of(&doc, Macro::Sh)).head().unwrap();
        assert_eq!(plain_text(&doc, head), "SEE ALSO");
    }

    #[test]
    fn write_error_has_position() {
        let doc = Document::new(vec![MdocNode::text("words").at(5, 3)]);
        let mut out = TextWriter::new(FailingWriter);
        let err = write_node(&mut out, &doc, text_node(&doc, "words")).unwrap_err();
        assert_eq!(err.position, Position::new(5, 3));
        assert_eq!(err.to_string(), "5:3: disk full");
    }

    fn pp() -> MdocNode {
        MdocNode::elem(Macro::Pp, vec![])
    }

    fn check_body(body: Vec<MdocNode>, expect: &str) {
        let doc = Document::new(vec![MdocNode::block(Macro::Sh, vec![MdocNode::text("TEST")], body)]);
        let body = doc.node(first_of(&doc, Macro::Sh)).body().unwrap();
        assert_eq!(render(&doc, body), expect);
    }

    fn render(doc: &Document, id: NodeId) -> String {
        let mut out = TextWriter::new(Vec::new());
        write_node(&mut out, doc, id).unwrap();
        out.finish().unwrap();
        String::from_utf8(out.take_underlying()).unwrap()
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
