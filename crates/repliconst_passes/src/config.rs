use std::{
    env,
    path::{Path, PathBuf},
};

/// Constants with more elements than this are not replicated.
pub const DEFAULT_MAX_ELEMENTS: i64 = 16;

/// Where graph dumps are written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DumpConfig {
    dir: PathBuf,
    graphviz: bool,
}

impl DumpConfig {
    pub const ENV_VAR: &'static str = "REPLICONST_DUMP_GRAPH_PREFIX";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), graphviz: false }
    }

    /// Also write a graphviz `.dot` file next to every dump.
    pub fn graphviz(mut self) -> Self {
        self.graphviz = true;
        self
    }

    /// Reads the dump directory from `REPLICONST_DUMP_GRAPH_PREFIX`, if set and non-empty.
    pub fn from_env() -> Option<Self> {
        env::var_os(Self::ENV_VAR).filter(|dir| !dir.is_empty()).map(Self::new)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn emits_graphviz(&self) -> bool {
        self.graphviz
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplicateConstantsConfig {
    max_elements: i64,
    dump: Option<DumpConfig>,
}

impl Default for ReplicateConstantsConfig {
    fn default() -> Self {
        Self { max_elements: DEFAULT_MAX_ELEMENTS, dump: None }
    }
}

impl ReplicateConstantsConfig {
    /// Default threshold, with dumps enabled if `REPLICONST_DUMP_GRAPH_PREFIX` is set.
    pub fn from_env() -> Self {
        Self { dump: DumpConfig::from_env(), ..Self::default() }
    }

    pub fn max_elements(mut self, max_elements: i64) -> Self {
        self.max_elements = max_elements;
        self
    }

    pub fn dump(mut self, dump: DumpConfig) -> Self {
        self.dump = Some(dump);
        self
    }

    pub fn element_threshold(&self) -> i64 {
        self.max_elements
    }

    pub fn dump_config(&self) -> Option<&DumpConfig> {
        self.dump.as_ref()
    }
}
