use crate::dagre::Dagre;
use crate::graph_ast::*;

/// Spacing and sizing constants for layout. The defaults leave enough room
/// around rotated decision diamonds that neighbours never touch.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Gap between neighbouring nodes in the same rank.
    pub node_sep: f64,
    /// Gap between consecutive ranks.
    pub rank_sep: f64,
    /// Gap reserved around edges that pass through a rank.
    pub edge_sep: f64,
    pub char_width: f64,
    pub label_padding: f64,
    pub node_height: f64,
    pub diamond_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_sep: 120.0,
            rank_sep: 180.0,
            edge_sep: 40.0,
            char_width: 10.0,
            label_padding: 40.0,
            node_height: 50.0,
            diamond_height: 80.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeBox {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Input handed to a layered layout engine. Node and edge indices follow the
/// diagram's insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutGraph {
    pub direction: Direction,
    pub nodes: Vec<NodeBox>,
    pub edges: Vec<(usize, usize)>,
}

/// A layered graph layout algorithm. Returns one center point per node of
/// `graph.nodes`, in the same order. Any translation is fine; callers shift
/// the result so the top-left corner sits at the origin.
pub trait LayeredLayout {
    fn layout(&self, graph: &LayoutGraph) -> Vec<Point>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    pub id: String,
    pub text: String,
    pub shape: NodeShape,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphLayout {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<ParsedEdge>,
}

impl GraphLayout {
    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

pub fn compute(diagram: &FlowDiagram, config: &LayoutConfig) -> GraphLayout {
    compute_with(diagram, config, &Dagre::new(config))
}

pub fn compute_with(
    diagram: &FlowDiagram,
    config: &LayoutConfig,
    engine: &impl LayeredLayout,
) -> GraphLayout {
    let boxes: Vec<NodeBox> = diagram
        .nodes
        .values()
        .map(|n| node_box(n, config))
        .collect();

    // Endpoints always resolve: the parser registers both ends of every edge.
    let edges: Vec<(usize, usize)> = diagram
        .edges
        .iter()
        .filter_map(|e| {
            let from = diagram.nodes.get_index_of(&e.from)?;
            let to = diagram.nodes.get_index_of(&e.to)?;
            Some((from, to))
        })
        .collect();

    let graph = LayoutGraph {
        direction: diagram.direction,
        nodes: boxes,
        edges,
    };
    let centers = if graph.nodes.is_empty() {
        Vec::new()
    } else {
        engine.layout(&graph)
    };
    debug_assert_eq!(centers.len(), graph.nodes.len(), "one center per node");

    let mut nodes: Vec<PositionedNode> = diagram
        .nodes
        .values()
        .zip(graph.nodes.iter().zip(centers))
        .map(|(node, (b, center))| PositionedNode {
            id: node.id.clone(),
            text: node.text.clone(),
            shape: node.shape,
            x: center.x - b.width / 2.0,
            y: center.y - b.height / 2.0,
            width: b.width,
            height: b.height,
        })
        .collect();

    let min_x = nodes.iter().map(|n| n.x).fold(f64::INFINITY, f64::min);
    let min_y = nodes.iter().map(|n| n.y).fold(f64::INFINITY, f64::min);
    for node in &mut nodes {
        node.x -= min_x;
        node.y -= min_y;
    }

    tracing::debug!(
        nodes = nodes.len(),
        edges = graph.edges.len(),
        direction = ?diagram.direction,
        "computed flowchart layout"
    );

    GraphLayout {
        nodes,
        edges: diagram.edges.clone(),
    }
}

pub fn node_box(node: &ParsedNode, config: &LayoutConfig) -> NodeBox {
    let chars = node.text.chars().count() as f64;
    let height = match node.shape {
        NodeShape::Diamond => config.diamond_height,
        _ => config.node_height,
    };
    NodeBox {
        width: chars * config.char_width + config.label_padding,
        height,
    }
}
