use std::collections::BTreeMap;

use tracing::debug;

use crate::{GraphOptimizationPass, GraphOptimizationPassOptions, PassError, ReplicateConstantsPass};

/// Points in the pipeline at which passes can be run, in pipeline order.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Grouping {
    PreRewriteForExec,
    PostPlacement,
    PostRewriteForExec,
    PostPartitioning,
}

#[derive(Debug, Default)]
pub struct OptimizationPassRegistry {
    groups: BTreeMap<Grouping, BTreeMap<i32, Vec<Box<dyn GraphOptimizationPass>>>>,
}

impl OptimizationPassRegistry {
    /// Registry holding every pass this crate provides.
    pub fn with_default_passes() -> Self {
        let mut registry = Self::default();
        registry.register(ReplicateConstantsPass::GROUPING, ReplicateConstantsPass::PRIORITY, ReplicateConstantsPass::default());
        registry
    }

    pub fn register(&mut self, grouping: Grouping, priority: i32, pass: impl GraphOptimizationPass + 'static) {
        self.groups.entry(grouping).or_default().entry(priority).or_default().push(Box::new(pass));
    }

    fn ordered(&self, grouping: Grouping) -> impl Iterator<Item = (i32, &dyn GraphOptimizationPass)> + '_ {
        self.groups
            .get(&grouping)
            .into_iter()
            .flatten()
            .flat_map(|(&priority, passes)| passes.iter().map(move |pass| (priority, pass.as_ref())))
    }

    /// Priorities and names of the passes in `grouping`, in the order they run.
    pub fn passes(&self, grouping: Grouping) -> Vec<(i32, &str)> {
        self.ordered(grouping).map(|(priority, pass)| (priority, pass.name())).collect()
    }

    /// Runs every pass in `grouping`, stopping at the first failure.
    pub fn run_grouping(
        &self,
        grouping: Grouping,
        options: &mut GraphOptimizationPassOptions<'_>,
    ) -> Result<(), PassError> {
        for (priority, pass) in self.ordered(grouping) {
            debug!("running {} ({grouping:?}, priority {priority})", pass.name());

            pass.run(options).map_err(|error| PassError::InPass { pass: pass.name().to_string(), error: Box::new(error) })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use repliconst_graph::Graph;

    use super::*;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    #[derive(Debug)]
    struct Record {
        name: &'static str,
        log: Log,
        fail: bool,
    }

    fn record(name: &'static str, log: &Log, fail: bool) -> Record {
        Record { name, log: log.clone(), fail }
    }

    impl GraphOptimizationPass for Record {
        fn name(&self) -> &str {
            self.name
        }

        fn run(&self, _: &mut GraphOptimizationPassOptions<'_>) -> Result<(), PassError> {
            self.log.borrow_mut().push(self.name);

            if self.fail {
                return Err(PassError::UnassignedDevice { node: "x".to_string() });
            }

            Ok(())
        }
    }

    #[test]
    fn default_registration() {
        let registry = OptimizationPassRegistry::with_default_passes();

        assert_eq!(registry.passes(Grouping::PostRewriteForExec), [(3, "replicate_constants_pass")]);
        assert!(registry.passes(Grouping::PostPlacement).is_empty());
    }

    #[test]
    fn runs_in_priority_order() {
        let log = Log::default();
        let mut registry = OptimizationPassRegistry::default();

        registry.register(Grouping::PostPlacement, 5, record("late", &log, false));
        registry.register(Grouping::PostPlacement, 1, record("first", &log, false));
        registry.register(Grouping::PostPlacement, 1, record("second", &log, false));
        registry.register(Grouping::PostPartitioning, 0, record("other", &log, false));

        assert_eq!(registry.passes(Grouping::PostPlacement), [(1, "first"), (1, "second"), (5, "late")]);

        let mut graph = Graph::default();
        registry.run_grouping(Grouping::PostPlacement, &mut GraphOptimizationPassOptions::new(&mut graph)).unwrap();

        assert_eq!(*log.borrow(), ["first", "second", "late"]);
    }

    #[test]
    fn stops_at_first_failure() {
        let log = Log::default();
        let mut registry = OptimizationPassRegistry::default();

        registry.register(Grouping::PostPlacement, 0, record("broken", &log, true));
        registry.register(Grouping::PostPlacement, 1, record("never", &log, false));

        let err = registry.run_grouping(Grouping::PostPlacement, &mut GraphOptimizationPassOptions::default()).unwrap_err();

        assert!(matches!(&err, PassError::InPass { pass, .. } if pass == "broken"));
        assert!(matches!(err.root(), PassError::UnassignedDevice { .. }));
        assert_eq!(*log.borrow(), ["broken"]);
    }
}
