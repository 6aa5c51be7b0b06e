use std::fmt;

use super::{Edge, EdgeKind, Graph, GraphError, Node};

impl Graph {
    /// Data inputs ordered by input slot, followed by control inputs in insertion order.
    pub(crate) fn ordered_inputs(&self, node: &Node) -> Result<(Vec<&Edge>, Vec<&Edge>), GraphError> {
        let mut data = Vec::new();
        let mut control = Vec::new();

        for &id in &node.in_edges {
            let edge = self.edge(id)?;

            if edge.is_control_edge() {
                control.push(edge);
            } else {
                data.push(edge);
            }
        }

        data.sort_by_key(|edge| edge.dst_input());

        Ok((data, control))
    }

    pub fn as_graphviz(&self) -> Result<String, fmt::Error> {
        use std::fmt::Write;

        let mut s = String::new();

        writeln!(&mut s, "digraph G {{ node [style=filled,color=lightgrey];")?;

        for node in self.nodes() {
            let lbl = node.id.inner();
            let device = node.assigned_device().unwrap_or("");

            if node.is_constant() {
                writeln!(&mut s, "n{lbl} [label=\"{}\\n{}\\n{device}\", color=lightblue];", node.name, node.op)?;
            } else {
                writeln!(&mut s, "n{lbl} [label=\"{}\\n{}\\n{device}\"];", node.name, node.op)?;
            }
        }

        for edge in self.edges() {
            let (src, dst) = (edge.src.inner(), edge.dst.inner());

            match edge.kind {
                EdgeKind::Data { src_output, dst_input } => {
                    writeln!(&mut s, "n{src} -> n{dst} [label=\"{src_output}:{dst_input}\"];")?
                }
                EdgeKind::Control => writeln!(&mut s, "n{src} -> n{dst} [style=dashed];")?,
            }
        }

        write!(&mut s, "}}")?;

        Ok(s)
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn map<T>(x: Result<T, GraphError>) -> Result<T, fmt::Error> {
            x.map_err(|_| fmt::Error)
        }

        writeln!(f, "graph {{")?;

        for node in self.nodes() {
            write!(f, "    {:?} \"{}\" = {}(", node.id, node.name, node.op)?;

            let (data, control) = map(self.ordered_inputs(node))?;

            for (i, edge) in data.iter().chain(control.iter()).enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }

                match edge.kind {
                    EdgeKind::Data { src_output, .. } => write!(f, "{:?}:{src_output}", edge.src)?,
                    EdgeKind::Control => write!(f, "^{:?}", edge.src)?,
                }
            }

            write!(f, ")")?;

            if let Some(device) = node.assigned_device() {
                write!(f, " @ {device}")?;
            }

            if !node.attrs.is_empty() {
                write!(f, " {{")?;

                for (i, (name, value)) in node.attrs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }

                    write!(f, "{name}: {value}")?;
                }

                write!(f, "}}")?;
            }

            writeln!(f)?;
        }

        write!(f, "}}")
    }
}
