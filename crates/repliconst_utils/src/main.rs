mod inspect;
mod replicate;

use std::{fs, path::Path};

use anyhow::Context;
use repliconst_graph::{Graph, GraphDef};
use structopt::StructOpt;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(StructOpt)]
pub enum Options {
    Replicate(replicate::ReplicateOptions),
    Inspect(inspect::InspectOptions),
}

#[derive(StructOpt)]
#[structopt(name = "repliconst-utils")]
struct Cli {
    /// Log at debug level, ignoring `RUST_LOG`.
    #[structopt(short, long, global = true)]
    verbose: bool,
    #[structopt(subcommand)]
    options: Options,
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::from_args();
    setup_logging(cli.verbose);

    match cli.options {
        Options::Replicate(options) => options.run(),
        Options::Inspect(options) => options.run(),
    }
}

fn load_graph_def(path: &Path) -> anyhow::Result<GraphDef> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    GraphDef::from_json(&json).with_context(|| format!("Failed to parse {}", path.display()))
}

fn load_graph(path: &Path) -> anyhow::Result<(Graph, GraphDef)> {
    let def = load_graph_def(path)?;
    let graph = Graph::from_graph_def(&def).with_context(|| format!("Invalid graph in {}", path.display()))?;
    debug!("loaded {} nodes and {} edges from {}", graph.num_nodes(), graph.num_edges(), path.display());
    Ok((graph, def))
}
