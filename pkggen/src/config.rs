//! Package generator configuration stored in `pkggen.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::naming::is_dotted_identifier;

/// Package generator configuration (TOML).
///
/// Missing fields fall back to the defaults below, so an empty file is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PkggenConfig {
    /// Prepended to the package name to form the distribution name.
    pub package_prefix: String,

    /// Python namespace packages live under (e.g. `pydra.tasks`).
    pub namespace: String,

    pub author_name: String,
    pub author_email: String,

    /// Python versions tested in CI; the first is the minimum supported.
    pub python_versions: Vec<String>,

    pub default_branch: String,

    pub git: GitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GitConfig {
    /// Initialise a repository and commit the generated tree.
    pub enabled: bool,
    pub commit_message: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            commit_message: "Initial commit of generated task package".to_string(),
        }
    }
}

impl Default for PkggenConfig {
    fn default() -> Self {
        Self {
            package_prefix: "pydra-".to_string(),
            namespace: "pydra.tasks".to_string(),
            author_name: "Nipype developers".to_string(),
            author_email: "neuroimaging@python.org".to_string(),
            python_versions: vec!["3.10".to_string(), "3.11".to_string(), "3.12".to_string()],
            default_branch: "main".to_string(),
            git: GitConfig::default(),
        }
    }
}

impl PkggenConfig {
    pub fn validate(&self) -> Result<()> {
        if !is_dotted_identifier(&self.namespace) {
            return Err(anyhow!(
                "namespace must be a dotted Python module path, got '{}'",
                self.namespace
            ));
        }
        if self.python_versions.is_empty() {
            return Err(anyhow!("python_versions must not be empty"));
        }
        if let Some(bad) = self
            .python_versions
            .iter()
            .find(|v| v.split('.').count() != 2 || !v.split('.').all(is_number))
        {
            return Err(anyhow!("python_versions entry '{bad}' is not MAJOR.MINOR"));
        }
        if self.default_branch.trim().is_empty() {
            return Err(anyhow!("default_branch must not be empty"));
        }
        if self.git.commit_message.trim().is_empty() {
            return Err(anyhow!("git.commit_message must not be empty"));
        }
        if self.author_name.trim().is_empty() {
            return Err(anyhow!("author_name must not be empty"));
        }
        if !self.author_email.contains('@') {
            return Err(anyhow!(
                "author_email must be an email address, got '{}'",
                self.author_email
            ));
        }
        Ok(())
    }

    /// Distribution name for `package` (`pydra-fsl`).
    pub fn dist_name(&self, package: &str) -> String {
        format!("{}{}", self.package_prefix, package)
    }

    /// Minimum supported Python version.
    pub fn min_python(&self) -> &str {
        self.python_versions
            .first()
            .map(String::as_str)
            .unwrap_or("3.10")
    }
}

fn is_number(part: &str) -> bool {
    !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `PkggenConfig::default()`.
pub fn load_config(path: &Path) -> Result<PkggenConfig> {
    if !path.exists() {
        let cfg = PkggenConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: PkggenConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
