//! Block-level node rendering

use super::error::{RenderContextExt, RenderError};
use super::renderer::{render_nodes, RenderContext};
use crate::syntax::{Alignment, Node, NodeKind};
use itertools::Itertools;
use std::io::Write;

/// Alternating row colours for every table
const ROW_COLORS: &str = "\\rowcolors{2}{white!80!black!50}{white!70!black!40}";

/// Render a block node, dispatching on its kind
pub(crate) fn render_block<W: Write>(
    node: &Node,
    cx: &mut RenderContext<W>,
) -> Result<(), RenderError> {
    let result = match &node.kind {
        NodeKind::Heading { level } => render_heading(*level, node, cx),
        NodeKind::Paragraph => render_paragraph(node, cx),
        NodeKind::List { ordered } => render_list(*ordered, node, cx),
        NodeKind::ListItem => render_list_item(node, cx),
        NodeKind::FencedCode { language, literal } => {
            render_fenced_code(language.as_deref(), literal, cx)
        }
        NodeKind::Table { alignments } => render_table(alignments, node, cx),
        NodeKind::TableHeader => render_table_header(node, cx),
        NodeKind::TableRow => render_table_row(node, cx),
        NodeKind::TableCell => render_table_cell(node, cx),
        NodeKind::BlockQuote => render_blockquote(node, cx),
        other => return Err(RenderError::unsupported(other.name())),
    };

    result.context(node.kind.name())
}

fn render_heading<W: Write>(
    level: u8,
    node: &Node,
    cx: &mut RenderContext<W>,
) -> Result<(), RenderError> {
    let command = match level {
        1 => "chapter",
        2 => "section",
        3 => "subsection",
        4 => "subsubsection",
        5 => "paragraph",
        6 => "subparagraph",
        _ => return Err(RenderError::unsupported(format!("heading level {level}"))),
    };

    write!(cx.out, "\\{command}{{")?;
    render_nodes(&node.children, cx)?;
    cx.out.write_line("}")?;
    Ok(())
}

fn render_paragraph<W: Write>(node: &Node, cx: &mut RenderContext<W>) -> Result<(), RenderError> {
    render_nodes(&node.children, cx)?;
    cx.out.write("\n\n")?;
    Ok(())
}

fn render_list<W: Write>(
    ordered: bool,
    node: &Node,
    cx: &mut RenderContext<W>,
) -> Result<(), RenderError> {
    let environment = if ordered { "enumerate" } else { "itemize" };

    cx.out.start_line()?;
    writeln!(cx.out, "\\begin{{{environment}}}")?;
    cx.nested(|cx| render_nodes(&node.children, cx))?;
    writeln!(cx.out, "\\end{{{environment}}}")?;
    Ok(())
}

fn render_list_item<W: Write>(node: &Node, cx: &mut RenderContext<W>) -> Result<(), RenderError> {
    cx.out.write("\\item ")?;
    render_nodes(&node.children, cx)?;
    cx.out.write("\n")?;
    Ok(())
}

/// Code content is copied verbatim: no escaping, no indentation
fn render_fenced_code<W: Write>(
    language: Option<&str>,
    literal: &str,
    cx: &mut RenderContext<W>,
) -> Result<(), RenderError> {
    cx.out.start_line()?;
    cx.out.write("\\begin{lstlisting}")?;
    if let Some(language) = language.filter(|l| !l.is_empty()) {
        write!(cx.out, "[language={language}]")?;
    }
    cx.out.write("\n")?;

    cx.out.write_raw(literal)?;
    if !literal.is_empty() && !literal.ends_with('\n') {
        cx.out.write_raw("\n")?;
    }

    cx.out.write_line("\\end{lstlisting}")?;
    Ok(())
}

/// Column specification code for one alignment
fn column_code(alignment: &Alignment) -> &'static str {
    match alignment {
        Alignment::Center => "c",
        Alignment::Right => "r",
        Alignment::None | Alignment::Left => "l",
    }
}

fn render_table<W: Write>(
    alignments: &[Alignment],
    node: &Node,
    cx: &mut RenderContext<W>,
) -> Result<(), RenderError> {
    check_column_count(alignments.len(), node)?;

    cx.out.start_line()?;
    cx.out.write_line("\\begin{table}[H]")?;
    cx.nested(|cx| {
        cx.out.write_line(ROW_COLORS)?;

        let columns = alignments.iter().map(column_code).join("|");
        writeln!(cx.out, "\\begin{{tabular}}{{|{columns}|}}")?;
        cx.nested(|cx| {
            cx.out.write_line("\\hline")?;
            cx.table_scope(|cx| render_nodes(&node.children, cx))
        })?;
        cx.out.write_line("\\end{tabular}")?;
        Ok(())
    })?;
    cx.out.write_line("\\end{table}")?;
    Ok(())
}

/// Every row must fit in the declared columns
fn check_column_count(declared: usize, table: &Node) -> Result<(), RenderError> {
    for row in &table.children {
        if row.children.len() > declared {
            return Err(RenderError::ColumnCount {
                declared,
                found: row.children.len(),
            });
        }
    }
    Ok(())
}

fn render_table_header<W: Write>(
    node: &Node,
    cx: &mut RenderContext<W>,
) -> Result<(), RenderError> {
    cx.header_row(|cx| render_table_row(node, cx))
}

fn render_table_row<W: Write>(node: &Node, cx: &mut RenderContext<W>) -> Result<(), RenderError> {
    cx.state.row_cell_written = false;
    render_nodes(&node.children, cx)?;
    cx.out.write_line("\\\\ \\hline")?;
    Ok(())
}

fn render_table_cell<W: Write>(node: &Node, cx: &mut RenderContext<W>) -> Result<(), RenderError> {
    if cx.state.row_cell_written {
        cx.out.write("& ")?;
    }
    cx.state.row_cell_written = true;

    render_nodes(&node.children, cx)
}

fn render_blockquote<W: Write>(node: &Node, cx: &mut RenderContext<W>) -> Result<(), RenderError> {
    cx.out.write("\n")?;
    cx.out.write_line("\\begin{myquote}")?;
    render_nodes(&node.children, cx)?;
    cx.out.write("\\end{myquote}\n\n")?;
    Ok(())
}
