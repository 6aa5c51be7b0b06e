mod display;
mod edge;
mod node;

#[cfg(test)]
mod tests;

use std::{collections::HashSet, fmt};

pub use edge::{Edge, EdgeId, EdgeKind};
pub use node::{Node, NodeId, Op};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphError {
    NodeDoesNotExist(NodeId),
    EdgeDoesNotExist(EdgeId),
    AttrNotFound { node: String, attr: String },
    AttrTypeMismatch { node: String, attr: String, expected: &'static str, found: &'static str },
    DuplicateNodeName(String),
    UnknownInput { node: String, input: String },
    MalformedInput { node: String, input: String },
    Invalid(String),
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeDoesNotExist(id) => write!(f, "node {id:?} does not exist"),
            Self::EdgeDoesNotExist(id) => write!(f, "edge {id:?} does not exist"),
            Self::AttrNotFound { node, attr } => write!(f, "no attr named '{attr}' on node '{node}'"),
            Self::AttrTypeMismatch { node, attr, expected, found } => {
                write!(f, "attr '{attr}' on node '{node}' has type {found}, expected {expected}")
            }
            Self::DuplicateNodeName(name) => write!(f, "node name '{name}' is used more than once"),
            Self::UnknownInput { node, input } => write!(f, "node '{node}' has unknown input '{input}'"),
            Self::MalformedInput { node, input } => write!(f, "node '{node}' has malformed input '{input}'"),
            Self::Invalid(msg) => write!(f, "invalid graph: {msg}"),
        }
    }
}

impl std::error::Error for GraphError {}

/// Arena of nodes and edges, addressed by stable handles.
///
/// Removed nodes and edges leave an empty slot behind, so handles are never reused
/// within the lifetime of a graph.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    nodes: Vec<Option<Node>>,
    edges: Vec<Option<Edge>>,
    num_nodes: usize,
    num_edges: usize,
    name_counter: usize,
}

impl Graph {
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    pub fn get(&self, id: NodeId) -> Result<&Node, GraphError> {
        self.nodes.get(id.0).and_then(Option::as_ref).ok_or(GraphError::NodeDoesNotExist(id))
    }

    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, GraphError> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut).ok_or(GraphError::NodeDoesNotExist(id))
    }

    pub fn edge(&self, id: EdgeId) -> Result<&Edge, GraphError> {
        self.edges.get(id.0).and_then(Option::as_ref).ok_or(GraphError::EdgeDoesNotExist(id))
    }

    /// Live nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().flatten()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().flatten()
    }

    /// Snapshot of the live node handles, safe to hold while mutating the graph.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes().map(Node::id).collect()
    }

    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.nodes().find(|node| node.name == name).map(Node::id)
    }

    pub fn in_edges(&self, id: NodeId) -> Result<Vec<&Edge>, GraphError> {
        self.get(id)?.in_edges.iter().map(|&edge| self.edge(edge)).collect()
    }

    pub fn out_edges(&self, id: NodeId) -> Result<Vec<&Edge>, GraphError> {
        self.get(id)?.out_edges.iter().map(|&edge| self.edge(edge)).collect()
    }

    /// Returns `"{prefix}/_{n}"`, where `n` is unique across the lifetime of the graph and
    /// the name is not held by any live node.
    pub fn new_name(&mut self, prefix: &str) -> String {
        loop {
            let name = format!("{prefix}/_{}", self.name_counter);
            self.name_counter += 1;

            if self.find_node(&name).is_none() {
                return name;
            }
        }
    }

    pub fn add_node(&mut self, name: impl Into<String>, op: impl Into<Op>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node::new(id, name.into(), op.into())));
        self.num_nodes += 1;
        id
    }

    /// Copies name, op, attributes and assigned device, but none of the edges.
    pub fn copy_node(&mut self, id: NodeId) -> Result<NodeId, GraphError> {
        let original = self.get(id)?;

        let mut copy = Node::new(NodeId(self.nodes.len()), original.name.clone(), original.op.clone());
        copy.attrs = original.attrs.clone();
        copy.assigned_device = original.assigned_device.clone();

        let copy_id = copy.id;
        self.nodes.push(Some(copy));
        self.num_nodes += 1;

        Ok(copy_id)
    }

    /// Removes the node along with every edge still attached to it.
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), GraphError> {
        let node = self.get(id)?;
        let attached = node.in_edges.iter().chain(node.out_edges.iter()).copied().collect::<HashSet<_>>();

        for edge in attached {
            self.remove_edge(edge)?;
        }

        self.nodes[id.0] = None;
        self.num_nodes -= 1;

        Ok(())
    }

    pub fn add_edge(
        &mut self,
        src: NodeId,
        src_output: usize,
        dst: NodeId,
        dst_input: usize,
    ) -> Result<EdgeId, GraphError> {
        self.insert_edge(src, dst, EdgeKind::Data { src_output, dst_input })
    }

    /// Returns `None` if an identical control edge already exists and duplicates are not allowed.
    pub fn add_control_edge(
        &mut self,
        src: NodeId,
        dst: NodeId,
        allow_duplicates: bool,
    ) -> Result<Option<EdgeId>, GraphError> {
        if !allow_duplicates {
            for edge in self.out_edges(src)? {
                if edge.is_control_edge() && edge.dst == dst {
                    return Ok(None);
                }
            }
        }

        self.insert_edge(src, dst, EdgeKind::Control).map(Some)
    }

    fn insert_edge(&mut self, src: NodeId, dst: NodeId, kind: EdgeKind) -> Result<EdgeId, GraphError> {
        self.get(dst)?;

        let id = EdgeId(self.edges.len());
        self.get_mut(src)?.out_edges.push(id);
        self.get_mut(dst)?.in_edges.push(id);

        self.edges.push(Some(Edge { id, src, dst, kind }));
        self.num_edges += 1;

        Ok(id)
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Result<(), GraphError> {
        let edge = *self.edge(id)?;

        self.get_mut(edge.src)?.out_edges.retain(|&x| x != id);
        self.get_mut(edge.dst)?.in_edges.retain(|&x| x != id);

        self.edges[id.0] = None;
        self.num_edges -= 1;

        Ok(())
    }

    /// Verifies that nodes and edges agree on how they reference each other.
    pub fn check_valid(&self) -> Result<(), GraphError> {
        fn check(cond: bool, msg: impl Into<String>) -> Result<(), GraphError> {
            cond.then_some(()).ok_or_else(|| GraphError::Invalid(msg.into()))
        }

        check(self.nodes().count() == self.num_nodes, "node count does not match live nodes")?;
        check(self.edges().count() == self.num_edges, "edge count does not match live edges")?;

        for (idx, node) in self.nodes.iter().enumerate() {
            if let Some(node) = node {
                check(node.id.0 == idx, format!("node {:?} stored in slot {idx}", node.id))?;

                for &id in &node.in_edges {
                    check(self.edge(id)?.dst == node.id, format!("in edge {id:?} of {:?} points elsewhere", node.id))?;
                }

                for &id in &node.out_edges {
                    check(self.edge(id)?.src == node.id, format!("out edge {id:?} of {:?} starts elsewhere", node.id))?;
                }
            }
        }

        let mut used_inputs = HashSet::new();

        for (idx, edge) in self.edges.iter().enumerate() {
            if let Some(edge) = edge {
                check(edge.id.0 == idx, format!("edge {:?} stored in slot {idx}", edge.id))?;

                let src = self.get(edge.src)?;
                let dst = self.get(edge.dst)?;

                let outs = src.out_edges.iter().filter(|&&x| x == edge.id).count();
                let ins = dst.in_edges.iter().filter(|&&x| x == edge.id).count();
                check(outs == 1 && ins == 1, format!("edge {:?} is not registered exactly once", edge.id))?;

                if let EdgeKind::Data { dst_input, .. } = edge.kind {
                    check(
                        used_inputs.insert((edge.dst, dst_input)),
                        format!("input {dst_input} of {:?} has more than one data edge", edge.dst),
                    )?;
                }
            }
        }

        Ok(())
    }
}
