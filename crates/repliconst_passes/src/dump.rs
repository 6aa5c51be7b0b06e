use std::{
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use repliconst_graph::{FunctionLibrary, Graph};

use crate::DumpConfig;

fn unique_path(dir: &Path, name: &str) -> PathBuf {
    let mut path = dir.join(format!("{name}.json"));
    let mut suffix = 1;

    while path.exists() {
        path = dir.join(format!("{name}_{suffix}.json"));
        suffix += 1;
    }

    path
}

/// Writes `graph` as a `GraphDef` to `<dir>/<name>.json`, and returns the path written.
///
/// An existing dump is never overwritten, a numeric suffix is appended instead.
pub fn dump_graph_to_file(
    name: &str,
    graph: &Graph,
    flib_def: Option<&FunctionLibrary>,
    config: &DumpConfig,
) -> io::Result<PathBuf> {
    fs::create_dir_all(config.dir())?;

    let mut def = graph.to_graph_def().map_err(io::Error::other)?;
    if let Some(library) = flib_def {
        def.library = library.clone();
    }

    let json = def.to_json().map_err(|e| io::Error::new(ErrorKind::InvalidData, e))?;
    let path = unique_path(config.dir(), name);
    fs::write(&path, json)?;

    if config.emits_graphviz() {
        let dot = graph.as_graphviz().map_err(io::Error::other)?;
        fs::write(path.with_extension("dot"), dot)?;
    }

    Ok(path)
}
