use std::collections::BTreeMap;

use repliconst_graph::{device_name_to_cpu_device_name, Edge, Graph, NodeId};

use crate::PassError;

/// Outgoing data edges of a constant, keyed by the CPU device of the consumer's host.
pub type DeviceGroups = BTreeMap<String, Vec<Edge>>;

pub fn destination_cpu_device(graph: &Graph, dst: NodeId) -> Result<String, PassError> {
    let node = graph.get(dst)?;
    let device = node.assigned_device().ok_or_else(|| PassError::UnassignedDevice { node: node.name().to_string() })?;

    device_name_to_cpu_device_name(device).map_err(|error| PassError::InvalidDevice { node: node.name().to_string(), error })
}

pub fn group_successors(graph: &Graph, id: NodeId) -> Result<DeviceGroups, PassError> {
    let mut groups = DeviceGroups::new();

    for edge in graph.out_edges(id)? {
        if edge.is_control_edge() {
            continue;
        }

        let device = destination_cpu_device(graph, edge.dst())?;
        groups.entry(device).or_default().push(*edge);
    }

    Ok(groups)
}
