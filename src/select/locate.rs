use crate::mdoc::{Document, DocumentNode, Macro, NodeId};
use crate::output::plain_text;
use crate::query::QueryError;

/// Decides whether a single node is the one being looked for.
trait NodeMatcher {
    fn matches(&self, doc: &Document, node: &DocumentNode) -> bool;
}

struct MacroMatcher(Macro);

impl NodeMatcher for MacroMatcher {
    fn matches(&self, _doc: &Document, node: &DocumentNode) -> bool {
        // head and body regions carry their block's macro, but they aren't the block
        node.is_macro(self.0) && !node.kind().is_region()
    }
}

struct HeadingMatcher {
    lowercase: String,
}

impl HeadingMatcher {
    fn new(heading: &str) -> Self {
        Self {
            lowercase: heading.trim().to_lowercase(),
        }
    }
}

impl NodeMatcher for HeadingMatcher {
    fn matches(&self, doc: &Document, node: &DocumentNode) -> bool {
        match node.head() {
            Some(head) => plain_text(doc, head).to_lowercase() == self.lowercase,
            None => false,
        }
    }
}

/// Finds the first node with the given macro, in document order, starting with `from` itself.
pub fn find_by_macro(doc: &Document, from: NodeId, mdoc_macro: Macro) -> Option<NodeId> {
    find_first(doc, from, &MacroMatcher(mdoc_macro))
}

/// Finds the first block whose heading reads `heading`, ignoring case and surrounding whitespace.
///
/// Headings are compared as plain text, after escapes have been decoded. Only blocks that have a head can match,
/// but the search still goes through the ones that don't.
pub fn find_section(doc: &Document, from: NodeId, heading: &str) -> Option<NodeId> {
    find_first(doc, from, &HeadingMatcher::new(heading))
}

/// Like [`find_by_macro`], but a missing macro is an error.
pub fn require_macro(doc: &Document, from: NodeId, mdoc_macro: Macro) -> Result<NodeId, QueryError> {
    find_by_macro(doc, from, mdoc_macro).ok_or(QueryError::MacroNotFound(mdoc_macro))
}

/// Like [`find_section`], but a missing section is an error.
pub fn require_section(doc: &Document, from: NodeId, heading: &str) -> Result<NodeId, QueryError> {
    find_section(doc, from, heading).ok_or_else(|| QueryError::SectionNotFound(heading.to_string()))
}

/// Pre-order search: the node itself, then each child's whole subtree in turn.
fn find_first(doc: &Document, id: NodeId, matcher: &impl NodeMatcher) -> Option<NodeId> {
    let node = doc.node(id);
    if matcher.matches(doc, node) {
        return Some(id);
    }
    node.children()
        .iter()
        .find_map(|&child| find_first(doc, child, matcher))
}
