use super::*;
use crate::attr::{AttrValue, TensorProto};

const CPU0: &str = "/job:w/replica:0/task:0/device:CPU:0";

#[test]
fn construct_deconstruct() -> Result<(), GraphError> {
    let mut graph = Graph::default();

    let x = graph.add_node("x", Op::Placeholder);
    let y = graph.add_node("y", Op::Placeholder);
    let z = graph.add_node("z", "AddV2");

    let e0 = graph.add_edge(x, 0, z, 0)?;
    let e1 = graph.add_edge(y, 0, z, 1)?;

    assert_eq!(graph.num_nodes(), 3);
    assert_eq!(graph.num_edges(), 2);
    assert_eq!(graph.get(z)?.in_edges(), [e0, e1]);
    assert_eq!(graph.get(x)?.out_edges(), [e0]);
    graph.check_valid()?;

    graph.remove_node(z)?;

    assert_eq!(graph.num_nodes(), 2);
    assert_eq!(graph.num_edges(), 0);
    assert!(graph.get(x)?.out_edges().is_empty());
    assert_eq!(graph.get(z).err(), Some(GraphError::NodeDoesNotExist(z)));
    assert_eq!(graph.edge(e0).err(), Some(GraphError::EdgeDoesNotExist(e0)));
    assert_eq!(graph.node_ids(), [x, y]);

    graph.remove_node(x)?;
    graph.remove_node(y)?;

    assert_eq!(graph.num_nodes(), 0);
    assert!(graph.remove_node(y).is_err());

    graph.check_valid()
}

#[test]
fn copy_node_drops_edges() -> Result<(), GraphError> {
    let mut graph = Graph::default();

    let c = graph.add_node("c", Op::Const);
    let a = graph.add_node("a", Op::Identity);
    graph.add_edge(c, 0, a, 0)?;

    let node = graph.get_mut(c)?;
    node.set_attr("value", TensorProto::f32([2], [1.0, 2.0]));
    node.set_assigned_device(CPU0);

    let copy = graph.copy_node(c)?;
    let copied = graph.get(copy)?;

    assert_ne!(copy, c);
    assert_eq!(copied.name(), "c");
    assert_eq!(copied.op(), &Op::Const);
    assert_eq!(copied.assigned_device(), Some(CPU0));
    assert_eq!(copied.attr("value"), Some(&AttrValue::Tensor(TensorProto::f32([2], [1.0, 2.0]))));
    assert!(copied.in_edges().is_empty());
    assert!(copied.out_edges().is_empty());
    assert_eq!(graph.num_edges(), 1);

    graph.check_valid()
}

#[test]
fn control_edges() -> Result<(), GraphError> {
    let mut graph = Graph::default();

    let p = graph.add_node("p", Op::NoOp);
    let c = graph.add_node("c", Op::Const);

    let first = graph.add_control_edge(p, c, false)?;
    assert!(first.is_some());
    assert_eq!(graph.add_control_edge(p, c, false)?, None);
    assert!(graph.add_control_edge(p, c, true)?.is_some());

    let edges = graph.in_edges(c)?;
    assert_eq!(edges.len(), 2);
    assert!(edges.iter().all(|edge| edge.is_control_edge() && edge.src_output().is_none()));

    graph.check_valid()
}

#[test]
fn unique_names() {
    let mut graph = Graph::default();

    assert_eq!(graph.new_name("c/replicate"), "c/replicate/_0");
    assert_eq!(graph.new_name("c/replicate"), "c/replicate/_1");
    assert_eq!(graph.new_name("d/replicate"), "d/replicate/_2");
}

#[test]
fn new_name_skips_existing_nodes() -> Result<(), GraphError> {
    let mut graph = Graph::default();
    graph.add_node("c/replicate/_0", Op::Identity);
    let taken = graph.add_node("x", Op::Identity);
    graph.get_mut(taken)?.set_name("c/replicate/_1");

    assert_eq!(graph.new_name("c/replicate"), "c/replicate/_2");
    assert_eq!(graph.new_name("c/replicate"), "c/replicate/_3");

    graph.check_valid()
}

#[test]
fn tensor_attr_errors() -> Result<(), GraphError> {
    let mut graph = Graph::default();

    let c = graph.add_node("c", Op::Const);
    assert_eq!(
        graph.get(c)?.tensor_attr("value"),
        Err(GraphError::AttrNotFound { node: "c".to_string(), attr: "value".to_string() })
    );

    graph.get_mut(c)?.set_attr("value", AttrValue::I(3));
    assert!(matches!(
        graph.get(c)?.tensor_attr("value"),
        Err(GraphError::AttrTypeMismatch { expected: "tensor", found: "int", .. })
    ));

    Ok(())
}

#[test]
fn invalid_edges() -> Result<(), GraphError> {
    let mut graph = Graph::default();

    let x = graph.add_node("x", Op::Placeholder);
    let y = graph.add_node("y", Op::Identity);
    graph.remove_node(y)?;

    assert_eq!(graph.add_edge(x, 0, y, 0), Err(GraphError::NodeDoesNotExist(y)));
    assert_eq!(graph.num_edges(), 0);
    assert!(graph.get(x)?.out_edges().is_empty());

    let z = graph.add_node("z", Op::Identity);
    graph.add_edge(x, 0, z, 0)?;
    graph.add_edge(x, 0, z, 0)?;

    assert!(matches!(graph.check_valid(), Err(GraphError::Invalid(_))));

    Ok(())
}

#[test]
fn empty_device_clears_assignment() -> Result<(), GraphError> {
    let mut graph = Graph::default();
    let x = graph.add_node("x", Op::Placeholder);

    graph.get_mut(x)?.set_assigned_device(CPU0);
    assert!(graph.get(x)?.has_assigned_device());

    graph.get_mut(x)?.set_assigned_device("");
    assert!(!graph.get(x)?.has_assigned_device());

    Ok(())
}

#[test]
fn display_listing() -> Result<(), GraphError> {
    let mut graph = Graph::default();

    let p = graph.add_node("p", Op::NoOp);
    let c = graph.add_node("c", Op::Const);
    let a = graph.add_node("a", Op::Identity);

    graph.get_mut(a)?.set_assigned_device(CPU0);
    graph.add_control_edge(p, a, false)?;
    graph.add_edge(c, 0, a, 0)?;

    let listing = graph.to_string();
    assert!(listing.contains("%2 \"a\" = Identity(%1:0, ^%0) @ /job:w/replica:0/task:0/device:CPU:0"), "{listing}");

    let dot = graph.as_graphviz().map_err(|e| GraphError::Invalid(e.to_string()))?;
    assert!(dot.contains("n0 -> n2 [style=dashed];"), "{dot}");
    assert!(dot.contains("n1 -> n2 [label=\"0:0\"];"), "{dot}");

    Ok(())
}
