mod eligibility;
mod execute;
mod grouping;


use std::collections::BTreeMap;

use repliconst_graph::{FunctionLibrary, Graph};
use tracing::{debug, warn, Level};

pub use eligibility::{Eligibility, SkipReason, VALUE_ATTR};
pub use grouping::DeviceGroups;

use crate::{
    dump::dump_graph_to_file, GraphOptimizationPass, GraphOptimizationPassOptions, Grouping, PassError,
    ReplicateConstantsConfig,
};

/// What a single run of the pass did to a graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplicationSummary {
    /// Constants that were removed in favour of replicas.
    pub replicated: usize,
    pub replicas: usize,
    /// Eligible constants whose consumers all resolve to one CPU device.
    pub not_replicated: usize,
    pub skipped: BTreeMap<SkipReason, usize>,
    /// Smallest and largest element count among constants skipped for size.
    pub skipped_size_range: Option<(i64, i64)>,
}

impl ReplicationSummary {
    fn skip(&mut self, reason: SkipReason) {
        *self.skipped.entry(reason).or_default() += 1;
    }

    fn skip_too_large(&mut self, elements: i64) {
        self.skip(SkipReason::TooLarge);

        self.skipped_size_range = Some(match self.skipped_size_range {
            Some((min, max)) => (min.min(elements), max.max(elements)),
            None => (elements, elements),
        });
    }

    pub fn num_skipped(&self, reason: SkipReason) -> usize {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }
}

/// Replicates every small CPU constant whose consumers span several hosts.
///
/// Only nodes present when the call starts are visited. Errors abort the pass, keeping any
/// rewrites already made.
pub fn replicate_constants(
    graph: &mut Graph,
    config: &ReplicateConstantsConfig,
) -> Result<ReplicationSummary, PassError> {
    let mut summary = ReplicationSummary::default();

    for id in graph.node_ids() {
        match eligibility::check(graph, id, config.element_threshold())? {
            Eligibility::Eligible => {}
            Eligibility::TooLarge(elements) => {
                summary.skip_too_large(elements);
                continue;
            }
            Eligibility::Skip(reason) => {
                summary.skip(reason);
                continue;
            }
        }

        let groups = grouping::group_successors(graph, id)?;

        if groups.len() <= 1 {
            summary.not_replicated += 1;
            continue;
        }

        summary.replicas += execute::replicate_to_each_device(graph, id, &groups)?;
        summary.replicated += 1;
    }

    if let Some((min, max)) = summary.skipped_size_range {
        debug!("replicate_constants_pass skipped replicating constants with number of elements in the range {min} to {max}.");
    }

    Ok(summary)
}

#[derive(Clone, Debug)]
pub struct ReplicateConstantsPass {
    config: ReplicateConstantsConfig,
}

impl Default for ReplicateConstantsPass {
    fn default() -> Self {
        Self::new(ReplicateConstantsConfig::from_env())
    }
}

impl ReplicateConstantsPass {
    pub const NAME: &'static str = "replicate_constants_pass";
    pub const GROUPING: Grouping = Grouping::PostRewriteForExec;
    pub const PRIORITY: i32 = 3;

    pub fn new(config: ReplicateConstantsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReplicateConstantsConfig {
        &self.config
    }

    /// Runs the replication with the before/after dumps, and reports what it did.
    pub fn rewrite(
        &self,
        graph: &mut Graph,
        flib_def: Option<&FunctionLibrary>,
    ) -> Result<ReplicationSummary, PassError> {
        self.dump("before_replicate_constants_pass", graph, flib_def);

        let summary = replicate_constants(graph, &self.config)?;
        debug!("replicated {} constants into {} replicas", summary.replicated, summary.replicas);

        self.dump("after_replicate_constants_pass", graph, flib_def);

        Ok(summary)
    }

    fn dump(&self, name: &str, graph: &Graph, flib_def: Option<&FunctionLibrary>) {
        let Some(dump) = self.config.dump_config() else { return };

        if !tracing::enabled!(Level::DEBUG) {
            return;
        }

        match dump_graph_to_file(name, graph, flib_def, dump) {
            Ok(path) => debug!("dumped graph to {}", path.display()),
            Err(err) => warn!("failed to dump {name}: {err}"),
        }
    }
}

impl GraphOptimizationPass for ReplicateConstantsPass {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn run(&self, options: &mut GraphOptimizationPassOptions<'_>) -> Result<(), PassError> {
        debug!(
            "replicate_constants_pass will replicate constants with number-of-elements <= {}",
            self.config.element_threshold()
        );

        let Some(graph) = options.graph.as_deref_mut() else {
            debug!("No graph in replicate_constants_pass.");
            return Ok(());
        };

        self.rewrite(graph, options.flib_def).map(|_| ())
    }
}
