use std::fmt;

use repliconst_graph::{FunctionLibrary, Graph};

use crate::PassError;

/// Everything a pass may look at while it runs.
///
/// A pass given no graph does nothing. The function library is only read,
/// and only for diagnostic dumps.
#[derive(Debug, Default)]
pub struct GraphOptimizationPassOptions<'a> {
    pub graph: Option<&'a mut Graph>,
    pub flib_def: Option<&'a FunctionLibrary>,
}

impl<'a> GraphOptimizationPassOptions<'a> {
    pub fn new(graph: &'a mut Graph) -> Self {
        Self { graph: Some(graph), flib_def: None }
    }

    pub fn with_flib_def(mut self, flib_def: &'a FunctionLibrary) -> Self {
        self.flib_def = Some(flib_def);
        self
    }
}

/// A graph rewrite run by an `OptimizationPassRegistry`.
///
/// On error the graph is left in whatever state the pass reached; passes do not roll back.
pub trait GraphOptimizationPass: fmt::Debug {
    fn name(&self) -> &str;

    fn run(&self, options: &mut GraphOptimizationPassOptions<'_>) -> Result<(), PassError>;
}
