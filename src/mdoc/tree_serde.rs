use crate::mdoc::{Document, Macro, NodeFlags, Position};
use serde::Deserialize;

/// A node in the owned, nested form that an external mdoc parser hands over.
///
/// This is what the JSON input deserializes into; [`Document::new`] flattens it into the arena. Example:
///
/// ```json
/// {"type": "block", "macro": "Sh", "line": 3, "col": 1, "flags": ["line"],
///  "head": [{"type": "text", "text": "NAME"}],
///  "body": [{"type": "elem", "macro": "Nd", "children": [{"type": "text", "text": "frobnicate things"}]}]}
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MdocNode {
    #[serde(rename = "type")]
    pub node_type: MdocNodeType,
    #[serde(default, rename = "macro")]
    pub mdoc_macro: Option<Macro>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub children: Vec<MdocNode>,
    #[serde(default)]
    pub head: Option<Vec<MdocNode>>,
    #[serde(default)]
    pub body: Option<Vec<MdocNode>>,
    #[serde(default)]
    pub flags: NodeFlags,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub col: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MdocNodeType {
    Text,
    Elem,
    Block,
}

impl MdocNode {
    fn new(node_type: MdocNodeType, mdoc_macro: Option<Macro>) -> Self {
        Self {
            node_type,
            mdoc_macro,
            text: None,
            args: Vec::new(),
            children: Vec::new(),
            head: None,
            body: None,
            flags: NodeFlags::NONE,
            line: 0,
            col: 0,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        let mut node = Self::new(MdocNodeType::Text, None);
        node.text = Some(text.into());
        node
    }

    pub fn elem(mdoc_macro: Macro, children: Vec<MdocNode>) -> Self {
        let mut node = Self::new(MdocNodeType::Elem, Some(mdoc_macro));
        node.children = children;
        node
    }

    pub fn block(mdoc_macro: Macro, head: Vec<MdocNode>, body: Vec<MdocNode>) -> Self {
        let mut node = Self::new(MdocNodeType::Block, Some(mdoc_macro));
        node.head = Some(head);
        node.body = Some(body);
        node
    }

    /// A block with a body region but no head region.
    pub fn headless_block(mdoc_macro: Macro, body: Vec<MdocNode>) -> Self {
        let mut node = Self::new(MdocNodeType::Block, Some(mdoc_macro));
        node.body = Some(body);
        node
    }

    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags = self.flags | flags;
        self
    }

    pub fn with_args<S: Into<String>>(mut self, args: impl IntoIterator<Item = S>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn at(mut self, line: u32, col: u32) -> Self {
        self.line = line;
        self.col = col;
        self
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.col)
    }

    /// Checks the shape rules that serde can't express.
    fn validate(&self) -> Result<(), InvalidDocument> {
        let malformed = |message: &str| InvalidDocument::Malformed {
            position: self.position(),
            message: message.to_string(),
        };
        match self.node_type {
            MdocNodeType::Text => {
                if self.text.is_none() {
                    return Err(malformed("text node without text"));
                }
                if !self.children.is_empty() || self.head.is_some() || self.body.is_some() {
                    return Err(malformed("text node with children"));
                }
            }
            MdocNodeType::Elem => {
                if self.mdoc_macro.is_none() {
                    return Err(malformed("element without a macro"));
                }
                if self.head.is_some() || self.body.is_some() {
                    return Err(malformed("element with a head or body; use a block"));
                }
            }
            MdocNodeType::Block => {
                if self.mdoc_macro.is_none() {
                    return Err(malformed("block without a macro"));
                }
                if !self.children.is_empty() {
                    return Err(malformed("block with loose children; put them in its head or body"));
                }
            }
        }
        let regions = self.head.iter().chain(self.body.iter()).flatten();
        for child in self.children.iter().chain(regions) {
            child.validate()?;
        }
        Ok(())
    }
}

/// The top-level JSON object.
#[derive(Deserialize)]
struct SerdeDocument {
    macroset: String,
    #[serde(default)]
    nodes: Vec<MdocNode>,
}

const MDOC_MACROSET: &str = "mdoc";

/// The input couldn't be turned into an mdoc [`Document`].
#[derive(Debug, thiserror::Error)]
pub enum InvalidDocument {
    #[error("could not parse document: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("not an mdoc document (macro set {0:?})")]
    NotMdoc(String),

    #[error("{position}: {message}")]
    Malformed { position: Position, message: String },
}

impl Document {
    /// Reads a document from its JSON form.
    ///
    /// This is the boundary with the external parser: it fails with [`InvalidDocument`] if the JSON is malformed,
    /// names an unknown macro, isn't from the mdoc macro set, or has nodes in impossible shapes.
    pub fn from_json(json: &str) -> Result<Self, InvalidDocument> {
        let serde_doc: SerdeDocument = serde_json::from_str(json)?;
        if serde_doc.macroset != MDOC_MACROSET {
            return Err(InvalidDocument::NotMdoc(serde_doc.macroset));
        }
        for node in &serde_doc.nodes {
            node.validate()?;
        }
        Ok(Self::new(serde_doc.nodes))
    }
}
