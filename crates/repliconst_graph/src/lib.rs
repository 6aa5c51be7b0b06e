/// Node attribute values, including the serialized tensors held by constants.
pub mod attr;
/// Serializable `GraphDef` form of a graph, used for loading, saving and dumps.
pub mod def;
/// Structured device names and the host-level transforms used during placement rewrites.
pub mod device;
/// The mutable arena graph that rewrite passes operate on.
pub mod graph;
pub mod shape;

pub use attr::{AttrValue, DataType, TensorProto, TensorShapeProto};
pub use def::{FunctionLibrary, GraphDef, NodeDef};
pub use device::{device_name_to_cpu_device_name, DeviceName, DeviceNameError};
pub use graph::{Edge, EdgeId, EdgeKind, Graph, GraphError, Node, NodeId, Op};
pub use shape::{ShapeError, TensorShape};
