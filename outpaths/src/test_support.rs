//! Test-only helpers for building tool specs and writing fixture files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::output_type::Family;
use crate::core::rule::OutputRule;
use crate::core::tool::ToolSpec;

/// A one-output FSL-style tool: `out_file` derived from `in_file` with `suffix`.
pub fn suffix_tool(name: &str, suffix: &str) -> ToolSpec {
    ToolSpec::new(name, Family::Fsl)
        .inputs(&["in_file", "out_file"])
        .rule(
            OutputRule::overridable("out_file")
                .source("in_file")
                .suffix(suffix),
        )
        .with_custom_filename()
}

/// Two outputs whose sources point at each other.
pub fn cyclic_tool(name: &str) -> ToolSpec {
    ToolSpec::new(name, Family::Generic)
        .inputs(&["a", "b"])
        .rule(OutputRule::overridable("a").source("b").suffix("_a"))
        .rule(OutputRule::overridable("b").source("a").suffix("_b"))
}

/// Write `contents` to `dir/name` and return the path.
pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

/// Serialize a catalog of `tools` as YAML into `dir/name`.
pub fn write_catalog(dir: &Path, name: &str, tools: Vec<ToolSpec>) -> PathBuf {
    let catalog = crate::catalog::Catalog { tools };
    let yaml = catalog.to_yaml().expect("serialize catalog");
    write_fixture(dir, name, &yaml)
}
