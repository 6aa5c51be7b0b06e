use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{
    attr::AttrValue,
    graph::{EdgeKind, Graph, GraphError, NodeId},
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
    pub name: String,
    pub op: String,
    /// `"src"` or `"src:k"` for data inputs, `"^src"` for control inputs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub device: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attr: BTreeMap<String, AttrValue>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionLibrary {
    #[serde(default)]
    pub function: BTreeMap<String, GraphDef>,
}

impl FunctionLibrary {
    pub fn is_empty(&self) -> bool {
        self.function.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDef {
    #[serde(default)]
    pub node: Vec<NodeDef>,
    #[serde(default, skip_serializing_if = "FunctionLibrary::is_empty")]
    pub library: FunctionLibrary,
}

impl GraphDef {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Clone, Copy)]
enum Input<'a> {
    Data(&'a str, usize),
    Control(&'a str),
}

fn parse_input<'a>(node: &str, input: &'a str) -> Result<Input<'a>, GraphError> {
    let malformed = || GraphError::MalformedInput { node: node.to_string(), input: input.to_string() };

    if let Some(src) = input.strip_prefix('^') {
        return if src.is_empty() || src.contains(':') { Err(malformed()) } else { Ok(Input::Control(src)) };
    }

    match input.rsplit_once(':') {
        Some((src, index)) => {
            let index = index.parse().map_err(|_| malformed())?;
            if src.is_empty() {
                return Err(malformed());
            }
            Ok(Input::Data(src, index))
        }
        None if input.is_empty() => Err(malformed()),
        None => Ok(Input::Data(input, 0)),
    }
}

impl Graph {
    pub fn from_graph_def(def: &GraphDef) -> Result<Self, GraphError> {
        let mut graph = Graph::default();
        let mut ids: HashMap<&str, NodeId> = HashMap::new();

        for node_def in &def.node {
            let id = graph.add_node(node_def.name.as_str(), node_def.op.as_str());

            if ids.insert(node_def.name.as_str(), id).is_some() {
                return Err(GraphError::DuplicateNodeName(node_def.name.clone()));
            }

            let node = graph.get_mut(id)?;
            node.set_assigned_device(node_def.device.as_str());

            for (name, value) in &node_def.attr {
                node.set_attr(name.as_str(), value.clone());
            }
        }

        for node_def in &def.node {
            let dst = ids[node_def.name.as_str()];
            let mut dst_input = 0;

            for input in &node_def.input {
                let parsed = parse_input(&node_def.name, input)?;

                let src_name = match parsed {
                    Input::Data(src, _) | Input::Control(src) => src,
                };

                let &src = ids
                    .get(src_name)
                    .ok_or_else(|| GraphError::UnknownInput { node: node_def.name.clone(), input: input.clone() })?;

                match parsed {
                    Input::Data(_, src_output) => {
                        graph.add_edge(src, src_output, dst, dst_input)?;
                        dst_input += 1;
                    }
                    Input::Control(_) => {
                        graph.add_control_edge(src, dst, true)?;
                    }
                }
            }
        }

        Ok(graph)
    }

    pub fn to_graph_def(&self) -> Result<GraphDef, GraphError> {
        let mut node = Vec::with_capacity(self.num_nodes());

        for n in self.nodes() {
            let (data, control) = self.ordered_inputs(n)?;

            let mut input = Vec::with_capacity(data.len() + control.len());

            for edge in data.into_iter().chain(control) {
                let src = self.get(edge.src())?.name();

                input.push(match edge.kind() {
                    EdgeKind::Data { src_output: 0, .. } => src.to_string(),
                    EdgeKind::Data { src_output, .. } => format!("{src}:{src_output}"),
                    EdgeKind::Control => format!("^{src}"),
                });
            }

            node.push(NodeDef {
                name: n.name().to_string(),
                op: n.op().to_string(),
                input,
                device: n.assigned_device().unwrap_or_default().to_string(),
                attr: n.attrs().clone(),
            });
        }

        Ok(GraphDef { node, library: FunctionLibrary::default() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"{
        "node": [
            { "name": "p", "op": "NoOp", "device": "/job:a/replica:0/task:0/device:CPU:0" },
            {
                "name": "c",
                "op": "Const",
                "input": ["^p"],
                "device": "/job:a/replica:0/task:0/device:CPU:0",
                "attr": { "value": { "tensor": { "dtype": "DT_FLOAT", "tensor_shape": { "dim": [2] }, "float_val": [1.0, 2.0] } } }
            },
            { "name": "split", "op": "Split", "input": ["c"] },
            { "name": "sum", "op": "AddV2", "input": ["split:1", "c", "^p"], "device": "/job:a/replica:0/task:1/device:GPU:0" }
        ]
    }"#;

    #[test]
    fn import_graph_def() -> Result<(), GraphError> {
        let def = GraphDef::from_json(JSON).map_err(|e| GraphError::Invalid(e.to_string()))?;
        let graph = Graph::from_graph_def(&def)?;

        assert_eq!(graph.num_nodes(), 4);
        assert_eq!(graph.num_edges(), 5);

        let c = graph.find_node("c").unwrap();
        let sum = graph.find_node("sum").unwrap();
        let split = graph.find_node("split").unwrap();

        assert!(graph.get(c)?.is_constant());
        assert_eq!(graph.get(split)?.assigned_device(), None);
        assert_eq!(graph.get(sum)?.op(), &crate::Op::Other("AddV2".to_string()));

        let inputs = graph.in_edges(sum)?;
        assert_eq!(inputs[0].src(), split);
        assert_eq!(inputs[0].kind(), EdgeKind::Data { src_output: 1, dst_input: 0 });
        assert_eq!(inputs[1].src(), c);
        assert_eq!(inputs[1].kind(), EdgeKind::Data { src_output: 0, dst_input: 1 });
        assert!(inputs[2].is_control_edge());

        assert_eq!(graph.to_graph_def()?, def);

        graph.check_valid()
    }

    #[test]
    fn reject_bad_inputs() {
        let def = |input: &str| GraphDef {
            node: vec![
                NodeDef { name: "a".to_string(), op: "NoOp".to_string(), ..Default::default() },
                NodeDef { name: "b".to_string(), op: "Identity".to_string(), input: vec![input.to_string()], ..Default::default() },
            ],
            ..Default::default()
        };

        assert!(matches!(Graph::from_graph_def(&def("x")), Err(GraphError::UnknownInput { .. })));
        assert!(matches!(Graph::from_graph_def(&def("a:x")), Err(GraphError::MalformedInput { .. })));
        assert!(matches!(Graph::from_graph_def(&def("^")), Err(GraphError::MalformedInput { .. })));
        assert!(matches!(Graph::from_graph_def(&def("")), Err(GraphError::MalformedInput { .. })));
        assert!(Graph::from_graph_def(&def("a:2")).is_ok());
    }

    #[test]
    fn reject_duplicate_names() {
        let node = NodeDef { name: "a".to_string(), op: "NoOp".to_string(), ..Default::default() };
        let def = GraphDef { node: vec![node.clone(), node], ..Default::default() };

        assert_eq!(Graph::from_graph_def(&def).err(), Some(GraphError::DuplicateNodeName("a".to_string())));
    }
}
