//! Best-effort discovery of installed tool families.
//!
//! Probing never fails the caller: anything that cannot be determined is
//! reported as `None` ("unknown").

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::process::run_command_with_timeout;
use crate::core::output_type::Family;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
const PROBE_OUTPUT_LIMIT: usize = 16 * 1024;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)+").expect("version regex should be valid"));

/// What could be learned about an installed tool family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    pub family: Family,
    pub executable: Option<PathBuf>,
    pub version: Option<String>,
}

/// Probe `family`: locate its marker executable and read its version.
pub fn probe(family: Family) -> ProbeReport {
    let executable = marker_executable(family).and_then(locate_executable);
    let version = family_version(family);
    ProbeReport {
        family,
        executable,
        version,
    }
}

/// Executable whose presence indicates the family is installed.
pub fn marker_executable(family: Family) -> Option<&'static str> {
    match family {
        Family::Fsl => Some("flirt"),
        Family::Afni => Some("afni"),
        Family::Freesurfer => Some("mri_convert"),
        Family::Generic => None,
    }
}

/// Search `PATH` for an executable file called `name`.
pub fn locate_executable(name: &str) -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    let found = env::split_paths(&path)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file());
    debug!(name, found = ?found, "executable lookup");
    found
}

/// Installed version of `family`, if it can be determined.
pub fn family_version(family: Family) -> Option<String> {
    match family {
        Family::Fsl => {
            let home = env::var_os("FSLDIR")?;
            read_version_file(&Path::new(&home).join("etc").join("fslversion"))
        }
        Family::Freesurfer => env::var_os("FREESURFER_HOME")
            .and_then(|home| read_version_file(&Path::new(&home).join("build-stamp.txt")))
            .or_else(|| command_version("mri_convert", &["--version"])),
        Family::Afni => command_version("afni", &["--version"]),
        Family::Generic => None,
    }
}

fn read_version_file(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(contents) => extract_version(&contents),
        Err(err) => {
            debug!(path = %path.display(), err = %err, "version file unreadable");
            None
        }
    }
}

fn command_version(program: &str, args: &[&str]) -> Option<String> {
    locate_executable(program)?;
    let mut cmd = Command::new(program);
    cmd.args(args);
    match run_command_with_timeout(cmd, PROBE_TIMEOUT, PROBE_OUTPUT_LIMIT) {
        Ok(output) if !output.timed_out => extract_version(&output.combined_text()),
        Ok(_) => None,
        Err(err) => {
            debug!(program, err = %err, "version probe failed");
            None
        }
    }
}

/// First dotted version number in `text`.
pub fn extract_version(text: &str) -> Option<String> {
    VERSION_RE.find(text).map(|m| m.as_str().to_string())
}
