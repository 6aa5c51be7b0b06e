use repliconst_graph::{Graph, NodeId};
use tracing::trace;

use super::grouping::DeviceGroups;
use crate::PassError;

/// Creates one copy of `id` per device group, then removes `id`.
///
/// Every replica takes over the data edges of its group and receives a control edge from
/// each control predecessor of the original. Returns the number of replicas created.
pub fn replicate_to_each_device(graph: &mut Graph, id: NodeId, groups: &DeviceGroups) -> Result<usize, PassError> {
    let original = graph.get(id)?;
    let prefix = format!("{}/replicate", original.name());

    let control_preds = graph
        .in_edges(id)?
        .into_iter()
        .filter(|edge| edge.is_control_edge())
        .map(|edge| edge.src())
        .collect::<Vec<_>>();

    for (device, edges) in groups {
        let copy = graph.copy_node(id)?;
        let name = graph.new_name(&prefix);

        let node = graph.get_mut(copy)?;
        node.set_name(name.as_str());
        node.set_assigned_device(device.as_str());

        for edge in edges {
            if let (Some(src_output), Some(dst_input)) = (edge.src_output(), edge.dst_input()) {
                graph.add_edge(copy, src_output, edge.dst(), dst_input)?;
            }
        }

        for &pred in &control_preds {
            graph.add_control_edge(pred, copy, true)?;
        }

        trace!("created {name} on {device} for {} consumers", edges.len());
    }

    graph.remove_node(id)?;

    Ok(groups.len())
}
