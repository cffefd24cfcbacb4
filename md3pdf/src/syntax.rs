//! Markdown syntax tree
//!
//! This module folds pulldown-cmark's event stream into an owned tree of
//! typed nodes. The tree is built once per document and only ever read
//! afterwards: the LaTeX renderer borrows it and walks parent → children and
//! sibling → sibling.

// Submodules
mod builder;
mod node;

// Re-export public types
pub use builder::TreeBuilder;
pub use node::{Alignment, Category, Node, NodeKind};

/// Parse markdown source into a document tree
///
/// Only the table extension is enabled, matching the set of constructs the
/// renderer understands.
///
/// # Parameters
/// * `source` - Raw markdown content
///
/// # Returns
/// * `Node` - A node of kind [`NodeKind::Document`] holding the parsed blocks
pub fn parse(source: &str) -> Node {
    let options = pulldown_cmark::Options::ENABLE_TABLES;
    let mut builder = TreeBuilder::new();

    for event in pulldown_cmark::Parser::new_ext(source, options) {
        builder.process_event(event);
    }

    builder.finish()
}
