use std::path::PathBuf;

use anyhow::Context;
use structopt::StructOpt;

#[derive(StructOpt)]
pub struct InspectOptions {
    #[structopt(required = true, short, long)]
    input: PathBuf,
    /// Print graphviz source instead of the listing.
    #[structopt(long)]
    graphviz: bool,
}

impl InspectOptions {
    pub fn run(&self) -> anyhow::Result<()> {
        let (graph, def) = crate::load_graph(&self.input)?;

        if self.graphviz {
            println!("{}", graph.as_graphviz().with_context(|| "Failed to format graph")?);
            return Ok(());
        }

        println!("{graph}");
        println!("{} nodes, {} edges, {} library functions", graph.num_nodes(), graph.num_edges(), def.library.function.len());

        Ok(())
    }
}
