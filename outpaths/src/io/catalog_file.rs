//! Loading extra rule tables from YAML files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::catalog::Catalog;

/// Load one YAML catalog file.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read catalog {}", path.display()))?;
    let catalog =
        Catalog::from_yaml(&contents).with_context(|| format!("parse catalog {}", path.display()))?;
    debug!(path = %path.display(), tools = catalog.tools.len(), "catalog loaded");
    Ok(catalog)
}

/// Built-in catalog extended by `paths`, in order; later files win on name clashes.
///
/// Fails if any resulting table does not validate.
pub fn load_catalogs(paths: &[PathBuf]) -> Result<Catalog> {
    let mut catalog = Catalog::builtin().clone();
    for path in paths {
        catalog.extend(load_catalog(path)?);
    }
    check_catalog(&catalog)?;
    Ok(catalog)
}

/// Fail with every validation problem of `catalog`, keeping the first as source.
pub fn check_catalog(catalog: &Catalog) -> Result<()> {
    let errors = catalog.validate();
    let Some(first) = errors.first() else {
        return Ok(());
    };
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    Err(anyhow::Error::new(first.clone()).context(format!(
        "catalog validation failed:\n- {}",
        messages.join("\n- ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ResolveError;
    use crate::test_support::{cyclic_tool, suffix_tool, write_catalog, write_fixture};

    const EXTRA: &str = r#"
tools:
  - name: Reorient2Std
    family: fsl
    inputs: [in_file, out_file]
    rules:
      - name: out_file
        field: out_file
        source: in_file
        suffix: _reoriented
"#;

    #[test]
    fn loads_and_merges_extra_catalog() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = write_fixture(temp.path(), "extra.yaml", EXTRA);
        let catalog = load_catalogs(&[path]).expect("load");
        assert!(catalog.contains("Reorient2Std"));
        assert!(catalog.contains("BET"));
    }

    #[test]
    fn invalid_table_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = write_fixture(
            temp.path(),
            "bad.yaml",
            "tools:\n  - name: Bad\n    inputs: [in_file]\n    rules:\n      - name: out\n        source: nowhere\n",
        );
        let err = load_catalogs(&[path]).unwrap_err();
        assert!(err.to_string().contains("catalog validation failed"));
        assert!(err.downcast_ref::<ResolveError>().is_some());
    }

    #[test]
    fn later_files_replace_same_name() {
        let temp = tempfile::tempdir().expect("tempdir");
        let first = write_catalog(temp.path(), "a.yaml", vec![suffix_tool("Tool", "_one")]);
        let second = write_catalog(temp.path(), "b.yaml", vec![suffix_tool("Tool", "_two")]);
        let catalog = load_catalogs(&[first, second]).expect("load");
        let spec = catalog.get("Tool").expect("tool");
        assert_eq!(spec.rules[0].suffix, "_two");
    }

    #[test]
    fn cyclic_sources_still_load() {
        // Cycles surface at resolution time, not when the table loads.
        let temp = tempfile::tempdir().expect("tempdir");
        let path = write_catalog(temp.path(), "cycle.yaml", vec![cyclic_tool("Loop")]);
        assert!(load_catalogs(&[path]).expect("load").contains("Loop"));
    }

    #[test]
    fn missing_file_names_path() {
        let err = load_catalog(Path::new("/nonexistent/catalog.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/catalog.yaml"));
    }
}
