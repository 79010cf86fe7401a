//! Tool catalogs: the built-in rule tables plus any loaded from YAML.

mod afni;
mod freesurfer;
mod fsl;

use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::core::error::ResolveError;
use crate::core::record::InputRecord;
use crate::core::resolver::{ResolvedOutputs, resolve_outputs, validate_tool};
use crate::core::tool::ToolSpec;

static BUILTIN: LazyLock<Catalog> = LazyLock::new(|| {
    let mut tools = fsl::tools();
    tools.extend(afni::tools());
    tools.extend(freesurfer::tools());
    Catalog { tools }
});

/// Ordered set of tool specs, looked up by tool name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub tools: Vec<ToolSpec>,
}

impl Catalog {
    /// Immutable process-wide catalog of bundled tool wrappers.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    pub fn from_yaml(contents: &str) -> Result<Catalog, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn get(&self, name: &str) -> Result<&ToolSpec, ResolveError> {
        self.tools
            .iter()
            .find(|tool| tool.name == name)
            .ok_or_else(|| ResolveError::UnknownTool {
                tool: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    /// Add `other`'s tools; a tool with an existing name replaces the old entry.
    pub fn extend(&mut self, other: Catalog) {
        for tool in other.tools {
            match self.tools.iter_mut().find(|t| t.name == tool.name) {
                Some(slot) => *slot = tool,
                None => self.tools.push(tool),
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolSpec> {
        self.tools.iter()
    }

    /// Validate every table, collecting all problems.
    pub fn validate(&self) -> Vec<ResolveError> {
        self.tools.iter().flat_map(validate_tool).collect()
    }

    /// Resolve outputs of the tool called `tool`.
    pub fn resolve(
        &self,
        tool: &str,
        record: &InputRecord,
        out_dir: &Path,
    ) -> Result<ResolvedOutputs, ResolveError> {
        resolve_outputs(self.get(tool)?, record, out_dir)
    }
}
