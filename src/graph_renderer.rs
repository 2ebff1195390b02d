use std::collections::HashMap;

use serde::Serialize;

use crate::graph_ast::{NodeShape, ParsedEdge, SkippedLine};
use crate::graph_layout::{GraphLayout, PositionedNode};

const MARKER_SIZE: f64 = 24.0;
const LABEL_FONT_WEIGHT: u16 = 700;
const LABEL_FONT_SIZE: u16 = 13;
const LABEL_LETTER_SPACING: &str = "0.3px";
const LABEL_TEXT_SHADOW: &str = "0 1px 2px rgba(255, 255, 255, 0.8)";
const LABEL_BG_FILL: &str = "#ffffff";
const LABEL_BG_OPACITY: f64 = 0.95;
const LABEL_BG_RADIUS: f64 = 6.0;
/// Vertical then horizontal padding around the label text.
const LABEL_BG_PADDING: [f64; 2] = [8.0, 12.0];

/// Drawing primitives for a node/edge rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowGraph {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<SkippedLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Rect,
    Round,
    Diamond,
}

impl From<NodeShape> for NodeType {
    fn from(shape: NodeShape) -> Self {
        match shape {
            NodeShape::Diamond => NodeType::Diamond,
            NodeShape::Round => NodeType::Round,
            NodeShape::Rect | NodeShape::Stadium => NodeType::Rect,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub data: NodeData,
    pub position: Position,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeData {
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// What an edge means in the flow, derived from its source shape and label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRole {
    Process,
    Affirmative,
    Alternative,
    Decision,
}

impl EdgeRole {
    /// Edges leaving a diamond are decision branches; their label picks the
    /// branch kind. "yes" is checked before "no".
    pub fn classify(source: Option<NodeShape>, label: Option<&str>) -> Self {
        if source != Some(NodeShape::Diamond) {
            return EdgeRole::Process;
        }
        let label = label.map(str::to_lowercase).unwrap_or_default();
        if label.contains("yes") {
            EdgeRole::Affirmative
        } else if label.contains("no") {
            EdgeRole::Alternative
        } else {
            EdgeRole::Decision
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            EdgeRole::Process => "#3b82f6",
            EdgeRole::Affirmative => "#10b981",
            EdgeRole::Alternative => "#f59e0b",
            EdgeRole::Decision => "#0891b2",
        }
    }

    pub fn stroke_width(self) -> f64 {
        match self {
            EdgeRole::Affirmative | EdgeRole::Alternative => 2.5,
            EdgeRole::Process | EdgeRole::Decision => 2.0,
        }
    }

    pub fn animated(self) -> bool {
        matches!(self, EdgeRole::Affirmative | EdgeRole::Alternative)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub edge_type: &'static str,
    pub animated: bool,
    pub marker_end: Marker,
    pub style: StrokeStyle,
    pub label_style: LabelStyle,
    pub label_bg_style: LabelBackground,
    pub label_bg_padding: [f64; 2],
    pub label_bg_border_radius: f64,
    #[serde(skip)]
    pub role: EdgeRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    ArrowClosed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    #[serde(rename = "type")]
    pub kind: MarkerKind,
    pub width: f64,
    pub height: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeStyle {
    pub stroke: &'static str,
    pub stroke_width: f64,
    pub stroke_linecap: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelStyle {
    pub fill: &'static str,
    pub font_weight: u16,
    pub font_size: u16,
    pub letter_spacing: &'static str,
    pub text_shadow: &'static str,
}

/// The rounded plate drawn behind an edge label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelBackground {
    pub fill: &'static str,
    pub fill_opacity: f64,
    pub rx: f64,
    pub ry: f64,
}

pub fn render(layout: &GraphLayout) -> FlowGraph {
    let shapes: HashMap<&str, NodeShape> = layout
        .nodes
        .iter()
        .map(|n| (n.id.as_str(), n.shape))
        .collect();

    let nodes = layout.nodes.iter().map(render_node).collect();
    let edges = layout
        .edges
        .iter()
        .enumerate()
        .map(|(index, edge)| render_edge(index, edge, shapes.get(edge.from.as_str()).copied()))
        .collect();

    FlowGraph {
        nodes,
        edges,
        warnings: Vec::new(),
    }
}

fn render_node(node: &PositionedNode) -> RenderNode {
    RenderNode {
        id: node.id.clone(),
        node_type: node.shape.into(),
        data: NodeData {
            label: node.text.clone(),
        },
        position: Position {
            x: node.x,
            y: node.y,
        },
        width: node.width,
        height: node.height,
    }
}

fn render_edge(index: usize, edge: &ParsedEdge, source: Option<NodeShape>) -> RenderEdge {
    let role = EdgeRole::classify(source, edge.label.as_deref());
    let color = role.color();
    RenderEdge {
        id: format!("e{index}-{}-{}", edge.from, edge.to),
        source: edge.from.clone(),
        target: edge.to.clone(),
        label: edge.label.clone(),
        edge_type: "default",
        animated: role.animated(),
        marker_end: Marker {
            kind: MarkerKind::ArrowClosed,
            width: MARKER_SIZE,
            height: MARKER_SIZE,
            color,
        },
        style: StrokeStyle {
            stroke: color,
            stroke_width: role.stroke_width(),
            stroke_linecap: "round",
        },
        label_style: LabelStyle {
            fill: color,
            font_weight: LABEL_FONT_WEIGHT,
            font_size: LABEL_FONT_SIZE,
            letter_spacing: LABEL_LETTER_SPACING,
            text_shadow: LABEL_TEXT_SHADOW,
        },
        label_bg_style: LabelBackground {
            fill: LABEL_BG_FILL,
            fill_opacity: LABEL_BG_OPACITY,
            rx: LABEL_BG_RADIUS,
            ry: LABEL_BG_RADIUS,
        },
        label_bg_padding: LABEL_BG_PADDING,
        label_bg_border_radius: LABEL_BG_RADIUS,
        role,
    }
}
