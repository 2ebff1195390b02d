use winnow::prelude::*;
use winnow::ascii::space0;
use winnow::combinator::{alt, eof, opt};
use winnow::token::take_while;

use crate::error::Result;
use crate::graph_ast::*;
use crate::graph_lines::{SourceLine, tokenize};

pub fn parse_flowchart(input: &str) -> Result<FlowDiagram> {
    let (direction, lines) = tokenize(input)?;
    let mut diagram = FlowDiagram::new(direction);
    for line in lines {
        collect_line(&mut diagram, line);
    }
    tracing::debug!(
        nodes = diagram.nodes.len(),
        edges = diagram.edges.len(),
        skipped = diagram.skipped.len(),
        "parsed flowchart"
    );
    Ok(diagram)
}

fn collect_line(diagram: &mut FlowDiagram, line: SourceLine<'_>) {
    if let Some(edge) = find_edge(line.text) {
        let parsed = ParsedEdge {
            from: edge.from.id.clone(),
            to: edge.to.id.clone(),
            label: edge.label,
        };
        diagram.add_node(edge.from);
        diagram.add_node(edge.to);
        diagram.edges.push(parsed);
    } else if let Some(node) = find_node(line.text) {
        diagram.add_node(node);
    } else {
        tracing::debug!(
            line = line.number,
            text = line.text,
            "skipping unrecognized flowchart statement"
        );
        diagram.skipped.push(SkippedLine {
            line: line.number,
            text: line.text.to_string(),
        });
    }
}

#[derive(Debug, PartialEq)]
struct EdgeStatement {
    from: ParsedNode,
    to: ParsedNode,
    label: Option<String>,
}

/// Leftmost edge statement anywhere in the line; text around it is ignored.
fn find_edge(line: &str) -> Option<EdgeStatement> {
    line.char_indices().find_map(|(start, _)| {
        let mut input = &line[start..];
        edge_statement(&mut input).ok()
    })
}

/// A whole line consisting of exactly one bracketed node declaration.
fn find_node(line: &str) -> Option<ParsedNode> {
    let mut input = line;
    node_statement(&mut input).ok()
}

fn edge_statement(input: &mut &str) -> winnow::Result<EdgeStatement> {
    let from = node_ref.parse_next(input)?;
    space0.parse_next(input)?;
    connector.parse_next(input)?;
    space0.parse_next(input)?;
    let label = opt(edge_label).parse_next(input)?;
    space0.parse_next(input)?;
    let to = node_ref.parse_next(input)?;
    Ok(EdgeStatement {
        from,
        to,
        label: label.and_then(normalize_label),
    })
}

fn node_statement(input: &mut &str) -> winnow::Result<ParsedNode> {
    let id = identifier.parse_next(input)?;
    let (shape, text) = shape_label.parse_next(input)?;
    eof.parse_next(input)?;
    Ok(ParsedNode {
        id: id.to_string(),
        text,
        shape,
    })
}

fn identifier<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_').parse_next(input)
}

fn node_ref(input: &mut &str) -> winnow::Result<ParsedNode> {
    let id = identifier.parse_next(input)?;
    match opt(shape_label).parse_next(input)? {
        Some((shape, text)) => Ok(ParsedNode {
            id: id.to_string(),
            text,
            shape,
        }),
        None => Ok(ParsedNode::implicit(id)),
    }
}

fn shape_label(input: &mut &str) -> winnow::Result<(NodeShape, String)> {
    alt((
        enclosed('[', ']').map(|t| (NodeShape::Rect, t)),
        enclosed('{', '}').map(|t| (NodeShape::Diamond, t)),
        enclosed('(', ')').map(|t| (NodeShape::Round, t)),
    ))
    .parse_next(input)
}

fn enclosed(
    mut open: char,
    mut close: char,
) -> impl FnMut(&mut &str) -> winnow::Result<String> {
    move |input: &mut &str| {
        open.parse_next(input)?;
        let text = take_while(1.., move |c: char| c != close).parse_next(input)?;
        close.parse_next(input)?;
        Ok(text.to_string())
    }
}

/// `-`, `--`, `---`, optionally followed by an arrowhead.
fn connector(input: &mut &str) -> winnow::Result<()> {
    take_while(1.., '-').parse_next(input)?;
    opt('>').parse_next(input)?;
    Ok(())
}

fn edge_label<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    "|".parse_next(input)?;
    let text = take_while(1.., |c: char| c != '|').parse_next(input)?;
    "|".parse_next(input)?;
    Ok(text)
}

fn normalize_label(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn node(id: &str, text: &str, shape: NodeShape) -> ParsedNode {
        ParsedNode {
            id: id.to_string(),
            text: text.to_string(),
            shape,
        }
    }

    #[test]
    fn parse_node_ref_with_label() {
        let mut input = "A[Start]";
        assert_eq!(node_ref(&mut input).unwrap(), node("A", "Start", NodeShape::Rect));
    }

    #[test]
    fn parse_node_ref_without_label() {
        let mut input = "A rest";
        assert_eq!(node_ref(&mut input).unwrap(), node("A", "A", NodeShape::Rect));
        assert_eq!(input, " rest");
    }

    #[test]
    fn parse_node_ref_diamond() {
        let mut input = "D{Ok?}";
        assert_eq!(node_ref(&mut input).unwrap(), node("D", "Ok?", NodeShape::Diamond));
    }

    #[test]
    fn parse_node_ref_round() {
        let mut input = "R(Round)";
        assert_eq!(node_ref(&mut input).unwrap(), node("R", "Round", NodeShape::Round));
    }

    #[test]
    fn parse_node_ref_unclosed_bracket_is_bare() {
        let mut input = "A[oops";
        assert_eq!(node_ref(&mut input).unwrap(), node("A", "A", NodeShape::Rect));
        assert_eq!(input, "[oops");
    }

    #[test]
    fn stadium_brackets_parse_as_round_with_inner_text() {
        let mut input = "S([Begin])";
        assert_eq!(node_ref(&mut input).unwrap(), node("S", "[Begin]", NodeShape::Round));
    }

    #[test]
    fn enclosed_consumes_both_delimiters() {
        let mut input = "{Is it?} rest";
        assert_eq!(enclosed('{', '}').parse_next(&mut input).unwrap(), "Is it?");
        assert_eq!(input, " rest");
        let mut empty = "[]";
        assert!(enclosed('[', ']').parse_next(&mut empty).is_err());
    }

    #[test]
    fn connector_variants() {
        for text in ["-", "--", "-->", "---", "----->"] {
            let mut input = text;
            assert!(connector(&mut input).is_ok(), "{text}");
            assert_eq!(input, "");
        }
        let mut input = "==>";
        assert!(connector(&mut input).is_err());
    }

    #[test]
    fn edge_with_label_and_inline_nodes() {
        let edge = find_edge("Check{OK?} -->|Yes| End([Done])").unwrap();
        assert_eq!(edge.from, node("Check", "OK?", NodeShape::Diamond));
        assert_eq!(edge.to, node("End", "[Done]", NodeShape::Round));
        assert_eq!(edge.label, Some("Yes".to_string()));
    }

    #[test]
    fn edge_label_is_trimmed() {
        let edge = find_edge("A -->|  go on  | B").unwrap();
        assert_eq!(edge.label, Some("go on".to_string()));
    }

    #[test]
    fn blank_edge_label_is_none() {
        let edge = find_edge("A -->|   | B").unwrap();
        assert_eq!(edge.label, None);
    }

    #[test]
    fn edge_without_spaces() {
        let edge = find_edge("A-->B").unwrap();
        assert_eq!(edge.from.id, "A");
        assert_eq!(edge.to.id, "B");
    }

    #[test]
    fn edge_found_after_leading_noise() {
        let edge = find_edge("click here A --> B").unwrap();
        assert_eq!(edge.from.id, "A");
        assert_eq!(edge.to.id, "B");
    }

    #[test]
    fn edge_ignores_trailing_text() {
        let edge = find_edge("A --> B & C").unwrap();
        assert_eq!(edge.to.id, "B");
    }

    #[test]
    fn thick_arrow_is_not_an_edge() {
        assert_eq!(find_edge("A ==> B"), None);
    }

    #[test]
    fn standalone_node_requires_brackets() {
        assert_eq!(find_node("A"), None);
        assert_eq!(find_node("A[Box]"), Some(node("A", "Box", NodeShape::Rect)));
    }

    #[test]
    fn standalone_node_rejects_trailing_tokens() {
        assert_eq!(find_node("A[Box] extra"), None);
    }

    #[test]
    fn parse_simple_chart() {
        let diagram = parse_flowchart("flowchart TD\n    A[Start] --> B[End]\n").unwrap();
        assert_eq!(diagram.direction, Direction::TopDown);
        let ids: Vec<&str> = diagram.nodes.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(
            diagram.edges,
            vec![ParsedEdge {
                from: "A".to_string(),
                to: "B".to_string(),
                label: None,
            }]
        );
    }

    #[test]
    fn first_declaration_wins() {
        let diagram =
            parse_flowchart("flowchart TD\nA[Box]\nA --> B\nA{Other} --> C\nA(Round)\n").unwrap();
        assert_eq!(diagram.node("A"), Some(&node("A", "Box", NodeShape::Rect)));
        assert_eq!(diagram.nodes.len(), 3);
    }

    #[test]
    fn implicit_nodes_are_created_once() {
        let diagram = parse_flowchart("flowchart LR\nX --> Y\nY --> X\n").unwrap();
        assert_eq!(diagram.nodes.len(), 2);
        assert_eq!(diagram.edges.len(), 2);
        assert!(diagram.nodes.values().all(|n| n.shape == NodeShape::Rect));
    }

    #[test]
    fn repeated_edges_are_kept() {
        let diagram = parse_flowchart("flowchart TD\nA --> B\nA -->|again| B\n").unwrap();
        assert_eq!(diagram.edges.len(), 2);
        assert_eq!(diagram.edges[1].label, Some("again".to_string()));
    }

    #[test]
    fn unrecognized_lines_are_reported() {
        let input = "flowchart TD\nA --> B\nstyle A fill:#f9f\nC\n";
        let diagram = parse_flowchart(input).unwrap();
        assert_eq!(diagram.edges.len(), 1);
        assert_eq!(
            diagram.skipped,
            vec![
                SkippedLine {
                    line: 3,
                    text: "style A fill:#f9f".to_string()
                },
                SkippedLine {
                    line: 4,
                    text: "C".to_string()
                },
            ]
        );
    }

    #[test]
    fn header_only_is_empty_diagram() {
        let diagram = parse_flowchart("flowchart RL\n").unwrap();
        assert_eq!(diagram.direction, Direction::RightLeft);
        assert!(diagram.nodes.is_empty());
        assert!(diagram.edges.is_empty());
    }
}
