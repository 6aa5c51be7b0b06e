pub mod config;
pub mod dump;
mod error;
mod pass;
/// Ordering of passes into pipeline groupings and priorities.
pub mod registry;
/// Replicates small host constants onto each host that consumes them.
pub mod replicate;

pub use config::{DumpConfig, ReplicateConstantsConfig};
pub use dump::dump_graph_to_file;
pub use error::PassError;
pub use pass::{GraphOptimizationPass, GraphOptimizationPassOptions};
pub use registry::{Grouping, OptimizationPassRegistry};
pub use replicate::{replicate_constants, ReplicateConstantsPass, ReplicationSummary};
