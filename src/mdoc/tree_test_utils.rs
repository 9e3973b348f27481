#[cfg(test)]
pub(crate) use test_utils::*;

#[cfg(test)]
mod test_utils {
    use crate::mdoc::{Document, Macro, MdocNode, NodeId, NodeKind};

    /// `mdoc_elem!(Nd "some text")` or `mdoc_elem!(Lk ["https://example.org", "desc"])`
    macro_rules! mdoc_elem {
        ($mac:ident $text:literal) => {
            crate::mdoc::MdocNode::elem(
                crate::mdoc::Macro::$mac,
                vec![crate::mdoc::MdocNode::text($text)],
            )
        };
        ($mac:ident [$($child:expr),* $(,)?]) => {
            crate::mdoc::MdocNode::elem(
                crate::mdoc::Macro::$mac,
                vec![$(crate::mdoc::IntoMdocNode::into_node($child)),*],
            )
        };
    }
    pub(crate) use mdoc_elem;

    /// `mdoc_section!("NAME" [child, child])`
    macro_rules! mdoc_section {
        ($title:literal [$($child:expr),* $(,)?]) => {
            crate::mdoc::MdocNode::block(
                crate::mdoc::Macro::Sh,
                vec![crate::mdoc::MdocNode::text($title)],
                vec![$(crate::mdoc::IntoMdocNode::into_node($child)),*],
            )
        };
    }
    pub(crate) use mdoc_section;

    /// Lets the macros above take either string literals (as text nodes) or full nodes.
    pub(crate) trait IntoMdocNode {
        fn into_node(self) -> MdocNode;
    }

    impl IntoMdocNode for MdocNode {
        fn into_node(self) -> MdocNode {
            self
        }
    }

    impl IntoMdocNode for &str {
        fn into_node(self) -> MdocNode {
            MdocNode::text(self)
        }
    }

    pub(crate) fn subsection(title: &str, body: Vec<MdocNode>) -> MdocNode {
        MdocNode::block(Macro::Ss, vec![MdocNode::text(title)], body)
    }

    pub(crate) fn list(items: Vec<MdocNode>) -> MdocNode {
        MdocNode::block(Macro::Bl, vec![], items)
    }

    pub(crate) fn item(head: Vec<MdocNode>, body: Vec<MdocNode>) -> MdocNode {
        MdocNode::block(Macro::It, head, body)
    }

    /// The first node (in document order) with the given macro that isn't a head or body region.
    pub(crate) fn first_of(doc: &Document, mdoc_macro: Macro) -> NodeId {
        doc.iter()
            .find(|(_, node)| node.is_macro(mdoc_macro) && !node.kind().is_region())
            .map(|(id, _)| id)
            .unwrap_or_else(|| panic!("no {mdoc_macro} node in document"))
    }

    /// The text node with exactly this raw text.
    pub(crate) fn text_node(doc: &Document, text: &str) -> NodeId {
        doc.iter()
            .find(|(_, node)| node.kind() == NodeKind::Text && node.text() == Some(text))
            .map(|(id, _)| id)
            .unwrap_or_else(|| panic!("no text node {text:?} in document"))
    }
}
