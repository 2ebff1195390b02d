use std::io::Read;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use flowmark::LayoutConfig;

#[derive(Parser)]
#[command(
    name = "flowmark",
    about = "Convert flowchart markup into positioned node/edge primitives (JSON)"
)]
struct Cli {
    /// Input file (reads from stdin if not provided)
    file: Option<std::path::PathBuf>,

    /// Gap between nodes in the same rank, in pixels
    #[arg(long)]
    node_sep: Option<f64>,

    /// Gap between ranks, in pixels
    #[arg(long)]
    rank_sep: Option<f64>,

    /// Gap reserved around edges crossing a rank, in pixels
    #[arg(long)]
    edge_sep: Option<f64>,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,

    /// Fail if any line was not understood
    #[arg(long)]
    strict: bool,

    /// Log pipeline details to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl Cli {
    fn layout_config(&self) -> LayoutConfig {
        let defaults = LayoutConfig::default();
        LayoutConfig {
            node_sep: self.node_sep.unwrap_or(defaults.node_sep),
            rank_sep: self.rank_sep.unwrap_or(defaults.rank_sep),
            edge_sep: self.edge_sep.unwrap_or(defaults.edge_sep),
            ..defaults
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let input = match &cli.file {
        Some(path) => std::fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("ERROR: failed to read {}: {e}", path.display());
            std::process::exit(1);
        }),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).unwrap_or_else(|e| {
                eprintln!("ERROR: failed to read stdin: {e}");
                std::process::exit(1);
            });
            buf
        }
    };

    let graph = match flowmark::convert_with_config(&input, &cli.layout_config()) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    };

    for skipped in &graph.warnings {
        tracing::warn!(line = skipped.line, text = %skipped.text, "unrecognized statement");
    }
    if cli.strict && !graph.warnings.is_empty() {
        eprintln!(
            "ERROR: {} unrecognized line(s), first at line {}",
            graph.warnings.len(),
            graph.warnings[0].line
        );
        std::process::exit(1);
    }

    match flowmark::to_json(&graph, !cli.compact) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    }
}
