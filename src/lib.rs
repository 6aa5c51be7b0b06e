pub use repliconst_graph as graph;
pub use repliconst_passes as passes;

pub use repliconst_graph::{Graph, GraphDef};
pub use repliconst_passes::{
    GraphOptimizationPass, GraphOptimizationPassOptions, Grouping, OptimizationPassRegistry, PassError,
    ReplicateConstantsConfig, ReplicateConstantsPass,
};

/// Loads a JSON `GraphDef`, runs every default pass in `grouping`, and returns the rewritten `GraphDef`.
pub fn optimize_graph_def(json: &str, grouping: Grouping) -> Result<GraphDef, Error> {
    let def = GraphDef::from_json(json)?;
    let mut graph = Graph::from_graph_def(&def)?;

    let registry = OptimizationPassRegistry::with_default_passes();
    registry.run_grouping(grouping, &mut GraphOptimizationPassOptions::new(&mut graph).with_flib_def(&def.library))?;

    let mut out = graph.to_graph_def()?;
    out.library = def.library;

    Ok(out)
}

#[derive(Debug)]
pub enum Error {
    Parse(String),
    Graph(graph::GraphError),
    Pass(PassError),
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value.to_string())
    }
}

impl From<graph::GraphError> for Error {
    fn from(value: graph::GraphError) -> Self {
        Self::Graph(value)
    }
}

impl From<PassError> for Error {
    fn from(value: PassError) -> Self {
        Self::Pass(value)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "could not parse graph: {msg}"),
            Self::Graph(error) => write!(f, "{error}"),
            Self::Pass(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for Error {}
