use std::fmt;

use repliconst_graph::{DeviceNameError, GraphError, ShapeError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PassError {
    MissingAttribute { node: String, attr: String },
    AttrTypeMismatch { node: String, attr: String, expected: &'static str, found: &'static str },
    MalformedShape { node: String, error: ShapeError },
    UnassignedDevice { node: String },
    InvalidDevice { node: String, error: DeviceNameError },
    Graph(GraphError),
    InPass { pass: String, error: Box<PassError> },
}

impl From<GraphError> for PassError {
    fn from(value: GraphError) -> Self {
        match value {
            GraphError::AttrNotFound { node, attr } => Self::MissingAttribute { node, attr },
            GraphError::AttrTypeMismatch { node, attr, expected, found } => {
                Self::AttrTypeMismatch { node, attr, expected, found }
            }
            other => Self::Graph(other),
        }
    }
}

impl PassError {
    /// The error with any pass context stripped.
    pub fn root(&self) -> &Self {
        match self {
            Self::InPass { error, .. } => error.root(),
            other => other,
        }
    }
}

impl fmt::Display for PassError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAttribute { node, attr } => write!(f, "node '{node}' has no attr named '{attr}'"),
            Self::AttrTypeMismatch { node, attr, expected, found } => {
                write!(f, "attr '{attr}' of node '{node}' has type {found}, expected {expected}")
            }
            Self::MalformedShape { node, error } => write!(f, "node '{node}' has a malformed shape: {error}"),
            Self::UnassignedDevice { node } => write!(f, "node '{node}' has no assigned device"),
            Self::InvalidDevice { node, error } => write!(f, "node '{node}': {error}"),
            Self::Graph(error) => write!(f, "{error}"),
            Self::InPass { pass, error } => write!(f, "{pass} failed: {error}"),
        }
    }
}

impl std::error::Error for PassError {}
