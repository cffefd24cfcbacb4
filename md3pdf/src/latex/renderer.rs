//! Renderer entry points and the state threaded through the tree walk

use super::error::{RenderContextExt, RenderError};
use super::writer::LatexWriter;
use super::{block, inline, CLASS_NAME};
use crate::syntax::{Category, Node};
use std::io::Write;

/// Table bookkeeping carried through the walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderState {
    /// Set while the header row of a table is being rendered
    ///
    /// Rows are emitted identically either way; the flag marks the header
    /// for styling that a replacement class file might hook, and
    /// [`RenderContext::header_row`] guarantees it is cleared afterwards.
    pub in_table_header: bool,

    /// Set once the current row has written its first cell
    pub row_cell_written: bool,
}

/// Result of rendering a document to memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// The LaTeX source
    pub latex: String,

    /// Remote figure destinations, in document order
    pub figures: Vec<String>,
}

/// Everything a render call owns: the sink, the table state and the figure list
pub(crate) struct RenderContext<W: Write> {
    pub(crate) out: LatexWriter<W>,
    pub(crate) state: RenderState,
    pub(crate) figures: Vec<String>,
}

impl<W: Write> RenderContext<W> {
    fn new(out: W) -> Self {
        Self {
            out: LatexWriter::new(out),
            state: RenderState::default(),
            figures: Vec::new(),
        }
    }

    /// Run `f` one indentation level deeper
    ///
    /// The level is restored whether or not `f` succeeds.
    pub(crate) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, RenderError>,
    ) -> Result<T, RenderError> {
        self.out.indent();
        let result = f(self);
        self.out.dedent();
        result
    }

    /// Run `f` with fresh table state, restoring the outer state afterwards
    pub(crate) fn table_scope<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, RenderError>,
    ) -> Result<T, RenderError> {
        let outer = std::mem::take(&mut self.state);
        let result = f(self);
        self.state = outer;
        result
    }

    /// Run `f` with the header flag set, clearing it afterwards
    pub(crate) fn header_row<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, RenderError>,
    ) -> Result<T, RenderError> {
        self.state.in_table_header = true;
        let result = f(self);
        self.state.in_table_header = false;
        result
    }
}

/// Render `root` as LaTeX into `out`
///
/// # Parameters
/// * `root` - Usually a document node; siblings are not visited
/// * `out` - Sink receiving the LaTeX source
///
/// # Returns
/// * `Ok(Vec<String>)` - Remote figure destinations, in document order
/// * `Err(RenderError)` - First failure, wrapped with the elements enclosing it
pub fn render<W: Write>(root: &Node, out: W) -> Result<Vec<String>, RenderError> {
    let mut cx = RenderContext::new(out);
    render_nodes(std::slice::from_ref(root), &mut cx)?;
    cx.out.flush()?;
    Ok(cx.figures)
}

/// Render `root` into a string
pub fn render_to_string(root: &Node) -> Result<Rendered, RenderError> {
    let mut buf = Vec::new();
    let figures = render(root, &mut buf)?;

    Ok(Rendered {
        latex: String::from_utf8_lossy(&buf).into_owned(),
        figures,
    })
}

/// Render each node of a sibling run, in order
pub(crate) fn render_nodes<W: Write>(
    nodes: &[Node],
    cx: &mut RenderContext<W>,
) -> Result<(), RenderError> {
    for node in nodes {
        match node.category() {
            Category::Document => render_document(node, cx)?,
            Category::Block => block::render_block(node, cx)?,
            Category::Inline => inline::render_inline(node, cx)?,
        }
    }
    Ok(())
}

fn render_document<W: Write>(node: &Node, cx: &mut RenderContext<W>) -> Result<(), RenderError> {
    writeln!(cx.out, "\\documentclass{{{CLASS_NAME}}}")?;
    cx.out.write_line("\\begin{document}")?;
    render_nodes(&node.children, cx).context("document")?;
    cx.out.write_line("\\end{document}")?;
    Ok(())
}
