//! Syntax tree node types

use std::fmt;

/// Coarse node category, the first level of renderer dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Document,
    Block,
    Inline,
}

/// Table column alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl From<pulldown_cmark::Alignment> for Alignment {
    fn from(align: pulldown_cmark::Alignment) -> Self {
        match align {
            pulldown_cmark::Alignment::None => Alignment::None,
            pulldown_cmark::Alignment::Left => Alignment::Left,
            pulldown_cmark::Alignment::Center => Alignment::Center,
            pulldown_cmark::Alignment::Right => Alignment::Right,
        }
    }
}

/// Kind of a syntax tree node, with the fields specific to that kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Root of a parsed document
    Document,

    /// ATX or setext heading
    Heading {
        /// Heading level (1 = h1, 2 = h2, etc.)
        level: u8,
    },

    Paragraph,

    /// An ordered or unordered list
    List {
        /// Whether items are numbered
        ordered: bool,
    },

    ListItem,

    /// A fenced code block
    FencedCode {
        /// First word of the info string, if any
        language: Option<String>,
        /// Raw code lines, newline-terminated, exactly as they appear in the source
        literal: String,
    },

    /// A code block introduced by indentation
    IndentedCode {
        /// Raw code lines
        literal: String,
    },

    /// A pipe table
    Table {
        /// Declared alignment of each column, in column order
        alignments: Vec<Alignment>,
    },

    /// The header row of a table; its children are cells
    TableHeader,

    TableRow,

    TableCell,

    BlockQuote,

    /// Raw HTML at block level
    HtmlBlock {
        /// The HTML as written
        literal: String,
    },

    /// Horizontal rule
    ThematicBreak,

    /// Plain text
    Text(String),

    /// Line break within a paragraph that was not forced
    SoftBreak,

    /// Forced line break (two trailing spaces or a backslash)
    HardBreak,

    /// Inline code span
    CodeSpan(String),

    /// Raw inline HTML
    InlineHtml(String),

    /// Emphasis (`*x*` is level 1, `**x**` is level 2)
    Emphasis {
        /// Emphasis strength
        level: u8,
    },

    Strikethrough,

    /// Hyperlink
    Link {
        /// Link target as written
        destination: String,
    },

    /// Image reference; its children hold the alt text
    Image {
        /// Image location as written (path or URL)
        destination: String,
    },

    /// Any other construct the parser reports
    Other(&'static str),
}

impl NodeKind {
    /// Category used by the renderer's first dispatch level
    pub fn category(&self) -> Category {
        match self {
            NodeKind::Document => Category::Document,
            NodeKind::Text(_)
            | NodeKind::SoftBreak
            | NodeKind::HardBreak
            | NodeKind::CodeSpan(_)
            | NodeKind::InlineHtml(_)
            | NodeKind::Emphasis { .. }
            | NodeKind::Strikethrough
            | NodeKind::Link { .. }
            | NodeKind::Image { .. } => Category::Inline,
            _ => Category::Block,
        }
    }

    /// Human-readable name, used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Heading { .. } => "heading",
            NodeKind::Paragraph => "paragraph",
            NodeKind::List { .. } => "list",
            NodeKind::ListItem => "list item",
            NodeKind::FencedCode { .. } => "fenced code block",
            NodeKind::IndentedCode { .. } => "indented code block",
            NodeKind::Table { .. } => "table",
            NodeKind::TableHeader => "table header",
            NodeKind::TableRow => "table row",
            NodeKind::TableCell => "table cell",
            NodeKind::BlockQuote => "blockquote",
            NodeKind::HtmlBlock { .. } => "html block",
            NodeKind::ThematicBreak => "thematic break",
            NodeKind::Text(_) => "text",
            NodeKind::SoftBreak => "soft break",
            NodeKind::HardBreak => "hard break",
            NodeKind::CodeSpan(_) => "code span",
            NodeKind::InlineHtml(_) => "inline html",
            NodeKind::Emphasis { .. } => "emphasis",
            NodeKind::Strikethrough => "strikethrough",
            NodeKind::Link { .. } => "link",
            NodeKind::Image { .. } => "image",
            NodeKind::Other(name) => name,
        }
    }

    /// Buffer that collects raw text for literal blocks
    pub(crate) fn literal_mut(&mut self) -> Option<&mut String> {
        match self {
            NodeKind::FencedCode { literal, .. }
            | NodeKind::IndentedCode { literal }
            | NodeKind::HtmlBlock { literal } => Some(literal),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A node of the syntax tree
///
/// Siblings are the other elements of the parent's `children`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// What this node is
    pub kind: NodeKind,

    /// Child nodes in document order
    pub children: Vec<Node>,
}

impl Node {
    /// Create a node with no children
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    /// Create a node with the given children
    pub fn with_children(kind: NodeKind, children: Vec<Node>) -> Self {
        Self { kind, children }
    }

    /// Create a text leaf
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Text(text.into()))
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }
}
