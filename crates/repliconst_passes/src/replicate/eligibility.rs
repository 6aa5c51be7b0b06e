use std::fmt;

use repliconst_graph::{DeviceName, Graph, Node, NodeId, TensorShape};

use crate::PassError;

pub const VALUE_ATTR: &str = "value";

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum SkipReason {
    NotConstant,
    SingleConsumer,
    ControlSuccessor,
    TooLarge,
    NoAssignedDevice,
    NonCpuDevice,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotConstant => "not_constant",
            Self::SingleConsumer => "single_consumer",
            Self::ControlSuccessor => "control_successor",
            Self::TooLarge => "too_large",
            Self::NoAssignedDevice => "no_assigned_device",
            Self::NonCpuDevice => "non_cpu_device",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    /// Holds the element count of the constant.
    TooLarge(i64),
    Skip(SkipReason),
}

/// Element count of the tensor held in the `value` attribute.
pub fn num_elements(node: &Node) -> Result<i64, PassError> {
    let value = node.tensor_attr(VALUE_ATTR)?;

    TensorShape::build(&value.tensor_shape)
        .map(|shape| shape.num_elements())
        .map_err(|error| PassError::MalformedShape { node: node.name().to_string(), error })
}

/// Checks are ordered, the first failing one decides the skip reason.
pub fn check(graph: &Graph, id: NodeId, max_elements: i64) -> Result<Eligibility, PassError> {
    use Eligibility::Skip;

    let node = graph.get(id)?;

    if !node.is_constant() {
        return Ok(Skip(SkipReason::NotConstant));
    }

    let out_edges = graph.out_edges(id)?;
    let data_edges = out_edges.iter().filter(|edge| !edge.is_control_edge()).count();

    if data_edges <= 1 {
        return Ok(Skip(SkipReason::SingleConsumer));
    }

    if data_edges < out_edges.len() {
        return Ok(Skip(SkipReason::ControlSuccessor));
    }

    let elements = num_elements(node)?;
    if elements > max_elements {
        return Ok(Eligibility::TooLarge(elements));
    }

    let Some(device) = node.assigned_device() else {
        return Ok(Skip(SkipReason::NoAssignedDevice));
    };

    match device.parse::<DeviceName>() {
        Ok(device) if device.is_cpu() => Ok(Eligibility::Eligible),
        _ => Ok(Skip(SkipReason::NonCpuDevice)),
    }
}
