use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    TopDown,
    LeftRight,
    RightLeft,
}

impl Direction {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::LeftRight | Direction::RightLeft)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    Rect,
    Round,
    Diamond,
    Stadium,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedNode {
    pub id: String,
    pub text: String,
    pub shape: NodeShape,
}

impl ParsedNode {
    /// Node created by an edge that mentions an id nobody declared.
    pub fn implicit(id: &str) -> Self {
        Self {
            id: id.to_string(),
            text: id.to_string(),
            shape: NodeShape::Rect,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEdge {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
}

/// A body line that matched neither statement rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    pub line: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowDiagram {
    pub direction: Direction,
    pub nodes: IndexMap<String, ParsedNode>,
    pub edges: Vec<ParsedEdge>,
    pub skipped: Vec<SkippedLine>,
}

impl FlowDiagram {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            nodes: IndexMap::new(),
            edges: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Registers `node` unless its id is already known. First declaration wins.
    pub fn add_node(&mut self, node: ParsedNode) {
        if !self.nodes.contains_key(&node.id) {
            self.nodes.insert(node.id.clone(), node);
        }
    }

    pub fn node(&self, id: &str) -> Option<&ParsedNode> {
        self.nodes.get(id)
    }
}
