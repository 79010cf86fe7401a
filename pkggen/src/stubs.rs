//! Writers for per-interface conversion specs and callables modules.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use minijinja::context;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::manifest::Interface;
use crate::naming::module_dir;
use crate::render::{TemplateEngine, names};

/// Conversion spec written as `<snake>.yaml`; field order is the file's key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecStub {
    pub task_name: String,
    pub nipype_module: String,
    /// Output → input fields it needs.
    pub output_requirements: BTreeMap<String, Vec<String>>,
    pub inputs_metadata: BTreeMap<String, String>,
    pub inputs_drop: Vec<String>,
    /// Output → filename template.
    pub output_templates: BTreeMap<String, String>,
    /// Output → function name in the callables module.
    pub output_callables: BTreeMap<String, String>,
    pub doctest: BTreeMap<String, String>,
    pub tests_inputs: Vec<String>,
    pub tests_outputs: Vec<String>,
}

impl SpecStub {
    pub fn for_interface(interface: &Interface) -> Self {
        let output_callables = interface
            .outputs
            .iter()
            .map(|output| (output.clone(), callable_name(output)))
            .collect();
        Self {
            task_name: interface.name.clone(),
            nipype_module: format!("nipype.interfaces.{}", interface.module),
            output_requirements: interface.requirements.clone(),
            inputs_metadata: BTreeMap::new(),
            inputs_drop: Vec::new(),
            output_templates: interface.templates.clone(),
            output_callables,
            doctest: BTreeMap::new(),
            tests_inputs: interface.inputs.clone(),
            tests_outputs: interface.outputs.clone(),
        }
    }

    /// YAML text with a header naming the converted interface.
    pub fn to_yaml(&self) -> Result<String> {
        let body = serde_yaml::to_string(self).context("serialize spec stub")?;
        Ok(format!(
            "# Conversion spec for '{}.{}'.\n#\n# Edit the sections below to adjust how outputs are named and tested.\n{body}",
            self.nipype_module, self.task_name
        ))
    }
}

/// `out_file` → `out_file_callable`.
pub fn callable_name(output: &str) -> String {
    format!("{output}_callable")
}

/// Files written for one interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubFiles {
    pub spec: PathBuf,
    pub callables: PathBuf,
}

/// Directory holding specs for `module` under `specs_root`.
pub fn spec_dir(specs_root: &Path, module: &str) -> PathBuf {
    specs_root.join(module_dir(module))
}

/// Write the spec stub and callables module of `interface` under `specs_root`.
#[instrument(skip_all, fields(interface = %interface.name))]
pub fn write_stubs(
    engine: &TemplateEngine,
    specs_root: &Path,
    interface: &Interface,
) -> Result<StubFiles> {
    let dir = spec_dir(specs_root, &interface.module);
    fs::create_dir_all(&dir).with_context(|| format!("create directory {}", dir.display()))?;

    let spec = dir.join(format!("{}.yaml", interface.snake_name));
    let yaml = SpecStub::for_interface(interface).to_yaml()?;
    fs::write(&spec, yaml).with_context(|| format!("write {}", spec.display()))?;

    let callables = dir.join(format!("{}_callables.py", interface.snake_name));
    let outputs: Vec<_> = interface
        .outputs
        .iter()
        .map(|output| {
            context! {
                name => output,
                template => interface.templates.get(output),
            }
        })
        .collect();
    let module = engine.render(
        names::CALLABLES,
        context! {
            task_name => interface.snake_name,
            outputs => outputs,
        },
    )?;
    fs::write(&callables, module).with_context(|| format!("write {}", callables.display()))?;

    debug!(spec = %spec.display(), "stubs written");
    Ok(StubFiles { spec, callables })
}

/// Write stubs for every interface; returns the files in input order.
pub fn write_all_stubs(
    engine: &TemplateEngine,
    specs_root: &Path,
    interfaces: &[Interface],
) -> Result<Vec<StubFiles>> {
    interfaces
        .iter()
        .map(|interface| write_stubs(engine, specs_root, interface))
        .collect()
}

#[cfg(test)]
mod tests {
    use outpaths::catalog::Catalog;

    use super::*;
    use crate::manifest::Manifest;

    fn interfaces(yaml: &str) -> Vec<Interface> {
        Manifest::from_yaml(yaml)
            .expect("manifest")
            .interfaces(Catalog::builtin())
    }

    #[test]
    fn spec_stub_has_fixed_key_order() {
        let interfaces = interfaces("interfaces:\n  freesurfer.preprocess: [ApplyVolTransform]\n");
        let interface = &interfaces[0];
        let yaml = SpecStub::for_interface(interface).to_yaml().expect("yaml");
        let keys: Vec<&str> = yaml
            .lines()
            .filter(|line| !line.starts_with('#') && !line.starts_with(' ') && !line.starts_with('-'))
            .filter_map(|line| line.split_once(':').map(|(key, _)| key))
            .collect();
        assert_eq!(
            keys,
            vec![
                "task_name",
                "nipype_module",
                "output_requirements",
                "inputs_metadata",
                "inputs_drop",
                "output_templates",
                "output_callables",
                "doctest",
                "tests_inputs",
                "tests_outputs",
            ]
        );
        assert!(yaml.contains("nipype_module: nipype.interfaces.freesurfer.preprocess"));
    }

    #[test]
    fn writes_stub_pair_in_module_directory() {
        let temp = tempfile::tempdir().expect("tempdir");
        let engine = TemplateEngine::new();
        let interfaces = interfaces("interfaces:\n  fsl.preprocess: [BET]\n");
        let interface = &interfaces[0];
        let files = write_stubs(&engine, temp.path(), interface).expect("write");

        assert_eq!(files.spec, temp.path().join("fsl/preprocess/bet.yaml"));
        assert_eq!(
            files.callables,
            temp.path().join("fsl/preprocess/bet_callables.py")
        );
        let callables = fs::read_to_string(&files.callables).expect("read");
        assert!(callables.contains("def mask_file_callable(output_dir, inputs, stdout, stderr):"));
        assert!(callables.contains("bet.yaml"));

        let spec = fs::read_to_string(&files.spec).expect("read");
        assert!(spec.contains("out_file: out_file_callable"));
    }
}
