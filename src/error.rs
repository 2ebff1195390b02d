/// The single fatal outcome of a conversion. Everything else is parsed on a
/// best-effort basis and reported through `FlowGraph::warnings`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConvertError {
    #[error("only flowchart TD, LR, TB, and RL are supported")]
    UnsupportedHeader {
        /// First retained line, if there was one.
        line: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, ConvertError>;
