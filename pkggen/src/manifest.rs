//! Manifest of interfaces to convert, grouped by Python module.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use outpaths::catalog::Catalog;
use serde::Deserialize;
use tracing::debug;

use crate::naming::{is_dotted_identifier, package_of, to_snake_case};

/// Output name used when nothing else is known about an interface.
const FALLBACK_OUTPUT: &str = "out_file";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Packages to scaffold; defaults to every package named by `interfaces`.
    #[serde(default)]
    pub packages: Vec<String>,
    /// Module path (`fsl.preprocess`) → interfaces defined in it.
    #[serde(default)]
    pub interfaces: BTreeMap<String, Vec<InterfaceEntry>>,
}

/// Either a bare interface name or a name with explicit outputs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum InterfaceEntry {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        outputs: Vec<String>,
    },
}

impl InterfaceEntry {
    pub fn name(&self) -> &str {
        match self {
            InterfaceEntry::Name(name) | InterfaceEntry::Detailed { name, .. } => name,
        }
    }

    fn outputs(&self) -> &[String] {
        match self {
            InterfaceEntry::Name(_) => &[],
            InterfaceEntry::Detailed { outputs, .. } => outputs,
        }
    }
}

/// One interface with everything the stub writers need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    pub name: String,
    /// Dotted module path, e.g. `fsl.preprocess`.
    pub module: String,
    pub package: String,
    pub snake_name: String,
    pub outputs: Vec<String>,
    /// Output → filename template, for catalog tools.
    pub templates: BTreeMap<String, String>,
    /// Output → input fields it needs.
    pub requirements: BTreeMap<String, Vec<String>>,
    /// Declared input fields, for catalog tools.
    pub inputs: Vec<String>,
}

impl Manifest {
    pub fn from_yaml(contents: &str) -> Result<Manifest> {
        let manifest: Manifest = serde_yaml::from_str(contents).context("parse manifest yaml")?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> Result<()> {
        for (module, entries) in &self.interfaces {
            if !is_dotted_identifier(module) {
                bail!("interface module '{module}' is not a dotted Python module path");
            }
            let mut seen = BTreeSet::new();
            for entry in entries {
                if entry.name().trim().is_empty() {
                    bail!("{module}: interface name must not be empty");
                }
                if !seen.insert(entry.name()) {
                    bail!("{module}: interface '{}' listed more than once", entry.name());
                }
            }
        }
        let known: BTreeSet<&str> = self.interfaces.keys().map(|m| package_of(m)).collect();
        if let Some(missing) = self.packages.iter().find(|p| !known.contains(p.as_str())) {
            bail!("package '{missing}' has no interfaces in the manifest");
        }
        Ok(())
    }

    /// Packages to scaffold, in manifest order (or sorted when derived).
    pub fn package_names(&self) -> Vec<String> {
        if !self.packages.is_empty() {
            return self.packages.clone();
        }
        let derived: BTreeSet<&str> = self.interfaces.keys().map(|m| package_of(m)).collect();
        derived.into_iter().map(str::to_string).collect()
    }

    /// Every interface, enriched from `catalog` where the tool is known.
    pub fn interfaces(&self, catalog: &Catalog) -> Vec<Interface> {
        let mut interfaces = Vec::new();
        for (module, entries) in &self.interfaces {
            for entry in entries {
                interfaces.push(describe(module, entry, catalog));
            }
        }
        interfaces
    }

    /// Interfaces belonging to `package`.
    pub fn interfaces_in(&self, package: &str, catalog: &Catalog) -> Vec<Interface> {
        self.interfaces(catalog)
            .into_iter()
            .filter(|interface| interface.package == package)
            .collect()
    }
}

fn describe(module: &str, entry: &InterfaceEntry, catalog: &Catalog) -> Interface {
    let name = entry.name().to_string();
    let tool = catalog.get(&name).ok();

    let outputs: Vec<String> = match (entry.outputs(), tool) {
        (explicit, _) if !explicit.is_empty() => explicit.to_vec(),
        (_, Some(tool)) => tool.output_names().map(str::to_string).collect(),
        (_, None) => vec![FALLBACK_OUTPUT.to_string()],
    };

    let mut templates = BTreeMap::new();
    let mut requirements = BTreeMap::new();
    if let Some(tool) = tool {
        for output in &outputs {
            let Some(rule) = tool.find_rule(output) else {
                continue;
            };
            templates.insert(output.clone(), rule.effective_template().to_string());
            let mut needs: Vec<String> = rule
                .source
                .iter()
                .filter(|source| tool.declares(source))
                .chain(rule.requires.iter())
                .cloned()
                .collect();
            needs.dedup();
            if !needs.is_empty() {
                requirements.insert(output.clone(), needs);
            }
        }
    } else {
        debug!(interface = %name, "not in catalog, using manifest outputs only");
    }

    Interface {
        snake_name: to_snake_case(&name),
        package: package_of(module).to_string(),
        module: module.to_string(),
        inputs: tool.map(|t| t.declared_fields()).unwrap_or_default(),
        name,
        outputs,
        templates,
        requirements,
    }
}

/// Read and validate a manifest file.
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read manifest {}", path.display()))?;
    Manifest::from_yaml(&contents).with_context(|| format!("load manifest {}", path.display()))
}
