//! Inline node rendering

use super::error::{RenderContextExt, RenderError};
use super::escape::escape;
use super::renderer::{render_nodes, RenderContext};
use crate::figures::{self, FigureLocation};
use crate::syntax::{Node, NodeKind};
use std::io::Write;

/// Size limit applied to every figure
const FIGURE_OPTIONS: &str = "[max width=0.9\\linewidth]";

/// Render an inline node, dispatching on its kind
pub(crate) fn render_inline<W: Write>(
    node: &Node,
    cx: &mut RenderContext<W>,
) -> Result<(), RenderError> {
    let result = match &node.kind {
        NodeKind::Text(text) => cx.out.write(&escape(text)).map_err(RenderError::from),
        NodeKind::SoftBreak => cx.out.write("\n").map_err(RenderError::from),
        NodeKind::Emphasis { level } => render_emphasis(*level, node, cx),
        NodeKind::Link { destination } => render_link(destination, node, cx),
        NodeKind::Image { destination } => render_image(destination, cx),
        other => return Err(RenderError::unsupported(other.name())),
    };

    result.context(node.kind.name())
}

fn render_emphasis<W: Write>(
    level: u8,
    node: &Node,
    cx: &mut RenderContext<W>,
) -> Result<(), RenderError> {
    let command = match level {
        1 => "emph",
        2 => "textbf",
        _ => return Err(RenderError::unsupported(format!("emphasis level {level}"))),
    };

    write!(cx.out, "\\{command}{{")?;
    render_nodes(&node.children, cx)?;
    cx.out.write("}")?;
    Ok(())
}

/// The destination goes out unescaped; hyperref reads it verbatim
fn render_link<W: Write>(
    destination: &str,
    node: &Node,
    cx: &mut RenderContext<W>,
) -> Result<(), RenderError> {
    write!(cx.out, "\\href{{{destination}}}{{")?;
    render_nodes(&node.children, cx)?;
    cx.out.write("}")?;
    Ok(())
}

/// Alt text is dropped; only the file reference reaches the output
fn render_image<W: Write>(destination: &str, cx: &mut RenderContext<W>) -> Result<(), RenderError> {
    let file_name = match figures::classify(destination) {
        FigureLocation::Local => destination.to_string(),
        FigureLocation::Remote(url) => {
            let name = figures::remote_file_name(&url).ok_or_else(|| RenderError::FigureName {
                destination: destination.to_string(),
            })?;
            cx.figures.push(destination.to_string());
            name
        }
    };

    let command = if figures::is_svg(&file_name) {
        "includesvg"
    } else {
        "includegraphics"
    };
    write!(cx.out, "\\{command}{FIGURE_OPTIONS}{{{file_name}}}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::latex::{render_to_string, RenderError};
    use crate::syntax::{parse, Node, NodeKind};

    fn paragraph(children: Vec<Node>) -> Node {
        Node::with_children(
            NodeKind::Document,
            vec![Node::with_children(NodeKind::Paragraph, children)],
        )
    }

    fn body(markdown: &str) -> String {
        let latex = render_to_string(&parse(markdown)).unwrap().latex;
        latex
            .strip_prefix("\\documentclass{md3pdf}\n\\begin{document}\n")
            .and_then(|s| s.strip_suffix("\\end{document}\n"))
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_emphasis_and_strong() {
        assert_eq!(
            body("*soft* and **bold**"),
            "\\emph{soft} and \\textbf{bold}\n\n"
        );
    }

    #[test]
    fn test_emphasis_level_three_is_error() {
        let doc = paragraph(vec![Node::with_children(
            NodeKind::Emphasis { level: 3 },
            vec![Node::text("x")],
        )]);

        let err = render_to_string(&doc).unwrap_err();
        assert!(matches!(
            err.root_cause(),
            RenderError::UnsupportedNodeKind { kind } if kind == "emphasis level 3"
        ));
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(body("cost: $5 & #1"), "cost: \\$5 & \\#1\n\n");
    }

    #[test]
    fn test_soft_break_keeps_line_structure() {
        assert_eq!(body("first\nsecond"), "first\nsecond\n\n");
    }

    #[test]
    fn test_link_destination_is_not_escaped() {
        assert_eq!(
            body("[the_docs](https://example.com/a_b?x=1%20)"),
            "\\href{https://example.com/a_b?x=1%20}{the\\_docs}\n\n"
        );
    }

    #[test]
    fn test_local_image_is_not_a_figure() {
        // Arrange
        let doc = parse("![alt text](./local.png)");

        // Act
        let rendered = render_to_string(&doc).unwrap();

        // Assert
        assert!(rendered
            .latex
            .contains("\\includegraphics[max width=0.9\\linewidth]{./local.png}"));
        assert!(!rendered.latex.contains("alt text"));
        assert!(rendered.figures.is_empty());
    }

    #[test]
    fn test_remote_svg_image_is_collected() {
        // Arrange
        let url = "https://host/a/b/chart.svg";
        let doc = parse(&format!("![chart]({url})"));

        // Act
        let rendered = render_to_string(&doc).unwrap();

        // Assert
        assert!(rendered
            .latex
            .contains("\\includesvg[max width=0.9\\linewidth]{chart.svg}"));
        assert_eq!(rendered.figures, vec![url.to_string()]);
    }

    #[test]
    fn test_remote_image_name_is_percent_decoded() {
        // Arrange: a raw % would start a TeX comment inside the macro argument
        let url = "https://host/img/my%20chart.png";
        let doc = parse(&format!("![c]({url})"));

        // Act
        let rendered = render_to_string(&doc).unwrap();

        // Assert
        assert!(rendered
            .latex
            .contains("\\includegraphics[max width=0.9\\linewidth]{my chart.png}"));
        assert!(!rendered.latex.contains("%20"));
        assert_eq!(rendered.figures, vec![url.to_string()]);
    }

    #[test]
    fn test_remote_image_decoding_to_percent_is_error() {
        let doc = paragraph(vec![Node::new(NodeKind::Image {
            destination: "https://host/100%25.png".to_string(),
        })]);

        let err = render_to_string(&doc).unwrap_err();

        assert!(matches!(err.root_cause(), RenderError::FigureName { .. }));
    }

    #[test]
    fn test_svg_extension_is_case_insensitive() {
        assert!(body("![d](diagram.SVG)").contains("\\includesvg"));
    }

    #[test]
    fn test_figures_keep_document_order_and_duplicates() {
        let doc = parse(
            "![a](https://h/1.png) ![b](local.png) ![c](https://h/2.png) ![d](https://h/1.png)",
        );

        let rendered = render_to_string(&doc).unwrap();

        assert_eq!(
            rendered.figures,
            vec!["https://h/1.png", "https://h/2.png", "https://h/1.png"]
        );
    }

    #[test]
    fn test_remote_image_without_file_name_is_error() {
        let doc = paragraph(vec![Node::new(NodeKind::Image {
            destination: "https://host/dir/".to_string(),
        })]);

        let err = render_to_string(&doc).unwrap_err();

        assert!(matches!(
            err.root_cause(),
            RenderError::FigureName { destination } if destination == "https://host/dir/"
        ));
    }

    #[test]
    fn test_code_span_is_unsupported() {
        let err = render_to_string(&parse("use `x`")).unwrap_err();
        assert!(matches!(
            err.root_cause(),
            RenderError::UnsupportedNodeKind { kind } if kind == "code span"
        ));
    }
}
