//! Event stream to tree conversion
//!
//! pulldown-cmark reports a document as a flat stream of start/end events.
//! The builder keeps a stack of open nodes: a start event pushes, the
//! matching end event pops and attaches the finished node to its parent.

use super::node::{Node, NodeKind};
use pulldown_cmark::{CodeBlockKind, Event, Tag};

/// Builder state for converting markdown events to a tree
pub struct TreeBuilder {
    /// Open nodes; the bottom entry is always the document
    stack: Vec<Node>,
}

impl TreeBuilder {
    /// Create a builder holding an empty document
    pub fn new() -> Self {
        Self {
            stack: vec![Node::new(NodeKind::Document)],
        }
    }

    /// Process a single markdown event
    pub fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.handle_start_tag(tag),
            Event::End(_) => self.close_node(),
            Event::Text(text) => self.handle_text(&text),
            Event::Code(code) => self.add_leaf(NodeKind::CodeSpan(code.to_string())),
            Event::Html(html) => self.handle_html(&html),
            Event::InlineHtml(html) => self.add_leaf(NodeKind::InlineHtml(html.to_string())),
            Event::SoftBreak => self.add_leaf(NodeKind::SoftBreak),
            Event::HardBreak => self.add_leaf(NodeKind::HardBreak),
            Event::Rule => self.add_leaf(NodeKind::ThematicBreak),
            Event::FootnoteReference(_) => self.add_leaf(NodeKind::Other("footnote reference")),
            Event::TaskListMarker(_) => self.add_leaf(NodeKind::Other("task list marker")),
            Event::InlineMath(_) | Event::DisplayMath(_) => self.add_leaf(NodeKind::Other("math")),
        }
    }

    /// Close any nodes left open and return the document
    pub fn finish(mut self) -> Node {
        while self.stack.len() > 1 {
            self.close_node();
        }
        self.stack.pop().unwrap_or_else(|| Node::new(NodeKind::Document))
    }

    /// Handle opening tags
    fn handle_start_tag(&mut self, tag: Tag<'_>) {
        let kind = match tag {
            Tag::Paragraph => NodeKind::Paragraph,
            Tag::Heading { level, .. } => NodeKind::Heading { level: level as u8 },
            Tag::BlockQuote(_) => NodeKind::BlockQuote,
            Tag::CodeBlock(CodeBlockKind::Fenced(info)) => NodeKind::FencedCode {
                language: info.split_whitespace().next().map(str::to_string),
                literal: String::new(),
            },
            Tag::CodeBlock(CodeBlockKind::Indented) => NodeKind::IndentedCode {
                literal: String::new(),
            },
            Tag::HtmlBlock => NodeKind::HtmlBlock {
                literal: String::new(),
            },
            Tag::List(start) => NodeKind::List {
                ordered: start.is_some(),
            },
            Tag::Item => NodeKind::ListItem,
            Tag::Table(alignments) => NodeKind::Table {
                alignments: alignments.into_iter().map(Into::into).collect(),
            },
            Tag::TableHead => NodeKind::TableHeader,
            Tag::TableRow => NodeKind::TableRow,
            Tag::TableCell => NodeKind::TableCell,
            Tag::Emphasis => NodeKind::Emphasis { level: 1 },
            Tag::Strong => NodeKind::Emphasis { level: 2 },
            Tag::Strikethrough => NodeKind::Strikethrough,
            Tag::Link { dest_url, .. } => NodeKind::Link {
                destination: dest_url.to_string(),
            },
            Tag::Image { dest_url, .. } => NodeKind::Image {
                destination: dest_url.to_string(),
            },
            Tag::FootnoteDefinition(_) => NodeKind::Other("footnote definition"),
            Tag::MetadataBlock(_) => NodeKind::Other("metadata block"),
            _ => NodeKind::Other("unsupported markdown construct"),
        };

        self.stack.push(Node::new(kind));
    }

    /// Handle text content
    ///
    /// Text inside literal blocks extends the block's buffer. Elsewhere,
    /// consecutive text events are merged into a single text node.
    fn handle_text(&mut self, text: &str) {
        let top = self.top_mut();
        if let Some(literal) = top.kind.literal_mut() {
            literal.push_str(text);
            return;
        }

        if let Some(Node {
            kind: NodeKind::Text(previous),
            ..
        }) = top.children.last_mut()
        {
            previous.push_str(text);
            return;
        }

        top.children.push(Node::text(text));
    }

    /// Handle HTML content
    fn handle_html(&mut self, html: &str) {
        let top = self.top_mut();
        match top.kind.literal_mut() {
            Some(literal) => literal.push_str(html),
            None => top.children.push(Node::new(NodeKind::HtmlBlock {
                literal: html.to_string(),
            })),
        }
    }

    fn add_leaf(&mut self, kind: NodeKind) {
        self.top_mut().children.push(Node::new(kind));
    }

    /// Pop the innermost open node and attach it to its parent
    fn close_node(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        if let Some(node) = self.stack.pop() {
            self.top_mut().children.push(node);
        }
    }

    fn top_mut(&mut self) -> &mut Node {
        if self.stack.is_empty() {
            self.stack.push(Node::new(NodeKind::Document));
        }
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
