use std::{fs, path::PathBuf};

use anyhow::{bail, Context};
use repliconst_passes::{DumpConfig, ReplicateConstantsConfig, ReplicateConstantsPass};
use structopt::StructOpt;

#[derive(StructOpt)]
pub struct ReplicateOptions {
    #[structopt(required = true, short, long)]
    input: PathBuf,
    #[structopt(required = true, short, long)]
    output: PathBuf,
    /// Largest constant, in elements, that will be replicated.
    #[structopt(long)]
    max_elements: Option<i64>,
    /// Directory for before/after graph dumps, written when debug logging is on.
    #[structopt(long)]
    dump_dir: Option<PathBuf>,
    #[structopt(long)]
    graphviz: bool,
    /// Report what would be replicated without writing the output file.
    #[structopt(long)]
    dry_run: bool,
}

impl ReplicateOptions {
    fn config(&self) -> anyhow::Result<ReplicateConstantsConfig> {
        let mut config = ReplicateConstantsConfig::from_env();

        if let Some(max_elements) = self.max_elements {
            if max_elements < 0 {
                bail!("--max-elements must not be negative, got {max_elements}");
            }

            config = config.max_elements(max_elements);
        }

        if let Some(dir) = &self.dump_dir {
            let dump = DumpConfig::new(dir);
            config = config.dump(if self.graphviz { dump.graphviz() } else { dump });
        } else if self.graphviz {
            bail!("--graphviz needs --dump-dir");
        }

        Ok(config)
    }

    pub fn run(&self) -> anyhow::Result<()> {
        let config = self.config()?;
        let (mut graph, def) = crate::load_graph(&self.input)?;
        let nodes_before = graph.num_nodes();

        let pass = ReplicateConstantsPass::new(config);
        let summary = pass
            .rewrite(&mut graph, Some(&def.library))
            .with_context(|| format!("Failed to rewrite {}", self.input.display()))?;

        println!("Replicated {} constants into {} replicas", summary.replicated, summary.replicas);
        println!("{} eligible constants had consumers on a single device", summary.not_replicated);

        for (reason, count) in &summary.skipped {
            println!("Skipped {count} nodes: {reason}");
        }

        if let Some((min, max)) = summary.skipped_size_range {
            println!("Constants skipped for size had between {min} and {max} elements");
        }

        if self.dry_run {
            return Ok(());
        }

        let mut out = graph.to_graph_def()?;
        out.library = def.library;

        fs::write(&self.output, out.to_json()?).with_context(|| format!("Failed to write {}", self.output.display()))?;
        println!("Wrote {} nodes (from {nodes_before}) to {}", graph.num_nodes(), self.output.display());

        Ok(())
    }
}
