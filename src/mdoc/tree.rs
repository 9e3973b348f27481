use crate::mdoc::{Macro, MdocNode, MdocNodeType};
use serde::Deserialize;
use std::fmt::{Display, Formatter};
use std::ops::BitOr;

/// Index of a node within its [`Document`].
///
/// Ids are only meaningful for the document that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const fn index(self) -> usize {
        self.0
    }
}

/// The structural category of a [`DocumentNode`].
///
/// `Head` and `Body` are the two regions of a `Block`. They carry their block's macro, and they are the block's
/// children (head first), the same as in mandoc's own tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Block,
    Head,
    Body,
    Element,
    Text,
}

impl NodeKind {
    /// Whether this kind is a block's head or body, rather than a node in its own right.
    pub fn is_region(self) -> bool {
        matches!(self, NodeKind::Head | NodeKind::Body)
    }
}

/// Per-node flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "Vec<NodeFlag>")]
pub struct NodeFlags(u8);

impl NodeFlags {
    pub const NONE: Self = Self(0);
    /// The node starts a new input line.
    pub const LINE: Self = Self(1);
    /// Literal mode: whitespace and line breaks are kept as written.
    pub const NO_FILL: Self = Self(1 << 1);
    /// The node (and its subtree) is never printed. It can still be found.
    pub const NO_PRINT: Self = Self(1 << 2);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for NodeFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// The serialized spelling of a single [`NodeFlags`] bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeFlag {
    Line,
    NoFill,
    NoPrint,
}

impl From<NodeFlag> for NodeFlags {
    fn from(value: NodeFlag) -> Self {
        match value {
            NodeFlag::Line => NodeFlags::LINE,
            NodeFlag::NoFill => NodeFlags::NO_FILL,
            NodeFlag::NoPrint => NodeFlags::NO_PRINT,
        }
    }
}

impl From<Vec<NodeFlag>> for NodeFlags {
    fn from(value: Vec<NodeFlag>) -> Self {
        value.into_iter().fold(NodeFlags::NONE, |acc, flag| acc | flag.into())
    }
}

/// A source position, for diagnostics. Zero means "unknown".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A single node of a parsed mdoc document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentNode {
    kind: NodeKind,
    mdoc_macro: Option<Macro>,
    text: Option<String>,
    args: Vec<String>,
    head: Option<NodeId>,
    body: Option<NodeId>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    flags: NodeFlags,
    position: Position,
}

impl DocumentNode {
    fn new(kind: NodeKind, mdoc_macro: Option<Macro>, flags: NodeFlags, position: Position) -> Self {
        Self {
            kind,
            mdoc_macro,
            text: None,
            args: Vec::new(),
            head: None,
            body: None,
            children: Vec::new(),
            parent: None,
            prev: None,
            next: None,
            flags,
            position,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The node's macro. Text nodes and the root have none.
    pub fn mdoc_macro(&self) -> Option<Macro> {
        self.mdoc_macro
    }

    pub fn is_macro(&self, mdoc_macro: Macro) -> bool {
        self.mdoc_macro == Some(mdoc_macro)
    }

    /// The raw text of a text node, escapes and all.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Macro arguments that don't appear as child nodes, like `-split` or `-literal`.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }

    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    pub fn body(&self) -> Option<NodeId> {
        self.body
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn first_child(&self) -> Option<NodeId> {
        self.children.first().copied()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn prev(&self) -> Option<NodeId> {
        self.prev
    }

    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

/// A parsed mdoc document, stored as an arena of [`DocumentNode`]s.
///
/// The document is immutable once built. Build one with [`Document::new`] or
/// [`Document::from_json`](crate::mdoc::Document::from_json).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<DocumentNode>,
}

impl Document {
    /// Builds the arena from a forest of top-level nodes. They become the children of a synthetic root.
    pub fn new(nodes: Vec<MdocNode>) -> Self {
        let mut doc = Self {
            nodes: Vec::with_capacity(64), // guess
        };
        let root = doc.alloc(
            DocumentNode::new(NodeKind::Root, None, NodeFlags::NONE, Position::default()),
            None,
        );
        for node in nodes {
            doc.append(root, node);
        }
        doc
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Gets a node by id.
    ///
    /// Panics if the id came from a different document.
    pub fn node(&self, id: NodeId) -> &DocumentNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&DocumentNode> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// All nodes, root first, in document order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &DocumentNode)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    /// The closest ancestor that is an element or block, skipping over head and body regions.
    pub fn enclosing_node(&self, id: NodeId) -> Option<&DocumentNode> {
        let mut curr = self.node(id).parent;
        while let Some(parent_id) = curr {
            let parent = self.node(parent_id);
            if !parent.kind.is_region() {
                return Some(parent);
            }
            curr = parent.parent;
        }
        None
    }

    /// Whether this node or any of its ancestors is in literal (no-fill) mode.
    pub fn is_no_fill(&self, id: NodeId) -> bool {
        let mut curr = Some(id);
        while let Some(node_id) = curr {
            let node = self.node(node_id);
            if node.flags.contains(NodeFlags::NO_FILL) {
                return true;
            }
            curr = node.parent;
        }
        false
    }

    /// Whether this node is somewhere within the head of a list item.
    pub fn is_in_item_head(&self, id: NodeId) -> bool {
        let mut curr = self.node(id).parent;
        while let Some(parent_id) = curr {
            let parent = self.node(parent_id);
            if parent.kind == NodeKind::Head && parent.is_macro(Macro::It) {
                return true;
            }
            curr = parent.parent;
        }
        false
    }

    fn alloc(&mut self, mut node: DocumentNode, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        if let Some(parent_id) = parent {
            let prev = self.nodes[parent_id.0].children.last().copied();
            if let Some(prev_id) = prev {
                self.nodes[prev_id.0].next = Some(id);
            }
            self.nodes[parent_id.0].children.push(id);
            node.parent = Some(parent_id);
            node.prev = prev;
        }
        self.nodes.push(node);
        id
    }

    fn append(&mut self, parent: NodeId, node: MdocNode) -> NodeId {
        let position = Position::new(node.line, node.col);
        match node.node_type {
            MdocNodeType::Text => {
                let mut text = DocumentNode::new(NodeKind::Text, None, node.flags, position);
                text.text = Some(node.text.unwrap_or_default());
                self.alloc(text, Some(parent))
            }
            MdocNodeType::Elem => {
                let mut elem = DocumentNode::new(NodeKind::Element, node.mdoc_macro, node.flags, position);
                elem.args = node.args;
                let id = self.alloc(elem, Some(parent));
                for child in node.children {
                    self.append(id, child);
                }
                id
            }
            MdocNodeType::Block => {
                let mut block = DocumentNode::new(NodeKind::Block, node.mdoc_macro, node.flags, position);
                block.args = node.args;
                let id = self.alloc(block, Some(parent));
                if let Some(head) = node.head {
                    let head_id = self.append_region(id, NodeKind::Head, node.mdoc_macro, position, head);
                    self.nodes[id.0].head = Some(head_id);
                }
                if let Some(body) = node.body {
                    let body_id = self.append_region(id, NodeKind::Body, node.mdoc_macro, position, body);
                    self.nodes[id.0].body = Some(body_id);
                }
                id
            }
        }
    }

    fn append_region(
        &mut self,
        block: NodeId,
        kind: NodeKind,
        mdoc_macro: Option<Macro>,
        position: Position,
        contents: Vec<MdocNode>,
    ) -> NodeId {
        let id = self.alloc(
            DocumentNode::new(kind, mdoc_macro, NodeFlags::NONE, position),
            Some(block),
        );
        for child in contents {
            self.append(id, child);
        }
        id
    }
}
