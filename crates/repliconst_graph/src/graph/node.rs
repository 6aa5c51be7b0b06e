use std::{collections::BTreeMap, fmt};

use crate::{
    attr::{AttrValue, TensorProto},
    graph::{EdgeId, GraphError},
};

#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodeId(pub(super) usize);

impl NodeId {
    pub fn inner(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum Op {
    Const,
    HostConst,
    Placeholder,
    Identity,
    NoOp,
    Other(String),
}

impl Op {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Const => "Const",
            Self::HostConst => "HostConst",
            Self::Placeholder => "Placeholder",
            Self::Identity => "Identity",
            Self::NoOp => "NoOp",
            Self::Other(op) => op,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Const | Self::HostConst)
    }
}

impl From<&str> for Op {
    fn from(value: &str) -> Self {
        match value {
            "Const" => Self::Const,
            "HostConst" => Self::HostConst,
            "Placeholder" => Self::Placeholder,
            "Identity" => Self::Identity,
            "NoOp" => Self::NoOp,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub(super) id: NodeId,
    pub(super) name: String,
    pub(super) op: Op,
    pub(super) attrs: BTreeMap<String, AttrValue>,
    pub(super) assigned_device: Option<String>,
    pub(super) in_edges: Vec<EdgeId>,
    pub(super) out_edges: Vec<EdgeId>,
}

impl Node {
    pub(super) fn new(id: NodeId, name: String, op: Op) -> Self {
        Self {
            id,
            name,
            op,
            attrs: BTreeMap::new(),
            assigned_device: None,
            in_edges: Vec::new(),
            out_edges: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn op(&self) -> &Op {
        &self.op
    }

    pub fn is_constant(&self) -> bool {
        self.op.is_constant()
    }

    pub fn attrs(&self) -> &BTreeMap<String, AttrValue> {
        &self.attrs
    }

    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.attrs.insert(name.into(), value.into());
    }

    pub fn tensor_attr(&self, name: &str) -> Result<&TensorProto, GraphError> {
        let value = self
            .attr(name)
            .ok_or_else(|| GraphError::AttrNotFound { node: self.name.clone(), attr: name.to_string() })?;

        value.as_tensor().ok_or_else(|| GraphError::AttrTypeMismatch {
            node: self.name.clone(),
            attr: name.to_string(),
            expected: "tensor",
            found: value.type_name(),
        })
    }

    pub fn assigned_device(&self) -> Option<&str> {
        self.assigned_device.as_deref()
    }

    pub fn has_assigned_device(&self) -> bool {
        self.assigned_device.is_some()
    }

    /// An empty device name clears the assignment.
    pub fn set_assigned_device(&mut self, device: impl Into<String>) {
        let device = device.into();
        self.assigned_device = (!device.is_empty()).then_some(device);
    }

    pub fn in_edges(&self) -> &[EdgeId] {
        &self.in_edges
    }

    pub fn out_edges(&self) -> &[EdgeId] {
        &self.out_edges
    }
}
