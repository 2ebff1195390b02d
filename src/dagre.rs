use dugong::graphlib::{Graph, GraphOptions};
use dugong::{EdgeLabel, GraphLabel, NodeLabel, RankDir};

use crate::graph_ast::Direction;
use crate::graph_layout::{LayeredLayout, LayoutConfig, LayoutGraph, Point};

/// Layered layout backed by the `dugong` port of dagre.
#[derive(Debug, Clone, PartialEq)]
pub struct Dagre {
    pub node_sep: f64,
    pub rank_sep: f64,
    pub edge_sep: f64,
    /// Brandes-Köpf alignment to keep, e.g. `"UL"`. `None` balances all four.
    pub align: Option<&'static str>,
}

impl Dagre {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            node_sep: config.node_sep,
            rank_sep: config.rank_sep,
            edge_sep: config.edge_sep,
            align: Some("UL"),
        }
    }
}

impl Default for Dagre {
    fn default() -> Self {
        Self::new(&LayoutConfig::default())
    }
}

fn rank_dir(direction: Direction) -> RankDir {
    match direction {
        Direction::TopDown => RankDir::TB,
        Direction::LeftRight => RankDir::LR,
        Direction::RightLeft => RankDir::RL,
    }
}

// Vertices are keyed by index so user ids never collide with dagre's dummy names.
fn vertex_id(index: usize) -> String {
    format!("n{index}")
}

impl LayeredLayout for Dagre {
    fn layout(&self, graph: &LayoutGraph) -> Vec<Point> {
        let mut g: Graph<NodeLabel, EdgeLabel, GraphLabel> = Graph::new(GraphOptions {
            multigraph: true,
            compound: true,
            directed: true,
        });
        g.set_graph(GraphLabel {
            rankdir: rank_dir(graph.direction),
            nodesep: self.node_sep,
            ranksep: self.rank_sep,
            edgesep: self.edge_sep,
            align: self.align.map(str::to_string),
            ..Default::default()
        });

        for (index, node) in graph.nodes.iter().enumerate() {
            g.set_node(
                vertex_id(index),
                NodeLabel {
                    width: node.width,
                    height: node.height,
                    ..Default::default()
                },
            );
        }
        for (index, &(from, to)) in graph.edges.iter().enumerate() {
            let label = EdgeLabel {
                minlen: 1,
                weight: 1.0,
                ..Default::default()
            };
            g.set_edge_named(
                vertex_id(from),
                vertex_id(to),
                Some(format!("e{index}")),
                Some(label),
            );
        }

        dugong::layout_dagreish(&mut g);

        (0..graph.nodes.len())
            .map(|index| {
                let id = vertex_id(index);
                let label = g.node(&id);
                let x = label.and_then(|l| l.x);
                let y = label.and_then(|l| l.y);
                if x.is_none() || y.is_none() {
                    tracing::warn!(vertex = %id, "dagre left a vertex unplaced");
                }
                Point {
                    x: x.unwrap_or_default(),
                    y: y.unwrap_or_default(),
                }
            })
            .collect()
    }
}
