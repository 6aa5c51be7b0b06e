use std::fmt;

use crate::graph::NodeId;

#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct EdgeId(pub(super) usize);

impl EdgeId {
    pub fn inner(self) -> usize {
        self.0
    }
}

impl fmt::Debug for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum EdgeKind {
    Data { src_output: usize, dst_input: usize },
    Control,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub(super) id: EdgeId,
    pub(super) src: NodeId,
    pub(super) dst: NodeId,
    pub(super) kind: EdgeKind,
}

impl Edge {
    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn src(&self) -> NodeId {
        self.src
    }

    pub fn dst(&self) -> NodeId {
        self.dst
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn is_control_edge(&self) -> bool {
        self.kind == EdgeKind::Control
    }

    pub fn src_output(&self) -> Option<usize> {
        match self.kind {
            EdgeKind::Data { src_output, .. } => Some(src_output),
            EdgeKind::Control => None,
        }
    }

    pub fn dst_input(&self) -> Option<usize> {
        match self.kind {
            EdgeKind::Data { dst_input, .. } => Some(dst_input),
            EdgeKind::Control => None,
        }
    }
}
