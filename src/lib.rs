pub mod dagre;
pub mod error;
pub mod graph_ast;
pub mod graph_layout;
pub mod graph_lines;
pub mod graph_parser;
pub mod graph_renderer;

pub use error::ConvertError;
pub use graph_layout::LayoutConfig;
pub use graph_renderer::FlowGraph;

/// Converts flowchart markup into positioned drawing primitives using the
/// default layout spacing.
pub fn convert(input: &str) -> Result<FlowGraph, ConvertError> {
    convert_with_config(input, &LayoutConfig::default())
}

pub fn convert_with_config(input: &str, config: &LayoutConfig) -> Result<FlowGraph, ConvertError> {
    let diagram = graph_parser::parse_flowchart(input)?;
    let layout = graph_layout::compute(&diagram, config);
    let mut graph = graph_renderer::render(&layout);
    graph.warnings = diagram.skipped;
    Ok(graph)
}

pub fn to_json(graph: &FlowGraph, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(graph)
    } else {
        serde_json::to_string(graph)
    }
}
