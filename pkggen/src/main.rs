//! `pkggen`: generate conversion spec stubs and task-package scaffolding.

mod config;
mod git;
mod manifest;
mod naming;
mod package;
mod render;
mod stubs;

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use outpaths::catalog::Catalog;
use outpaths::exit_codes;
use tracing::info;

use crate::config::load_config;
use crate::manifest::load_manifest;
use crate::package::{PackageOptions, SPECS_DIR, create_package};
use crate::render::TemplateEngine;
use crate::stubs::write_all_stubs;

#[derive(Parser)]
#[command(
    name = "pkggen",
    version,
    about = "Generate Pydra task-package scaffolding from Nipype interfaces"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write spec stubs and callables modules for every manifest interface.
    Stubs {
        #[arg(long, value_name = "FILE")]
        manifest: PathBuf,
        /// Output directory; stubs land in `<out>/<package>/nipype-auto-conv/specs`.
        #[arg(long, value_name = "DIR")]
        out: PathBuf,
    },
    /// Create one package directory per manifest package.
    Packages {
        #[arg(long, value_name = "FILE")]
        manifest: PathBuf,
        #[arg(long, value_name = "DIR")]
        out: PathBuf,
        /// Generator configuration; defaults apply when the file is missing.
        #[arg(long, value_name = "FILE", default_value = "pkggen.toml")]
        config: PathBuf,
        /// Skip git initialisation.
        #[arg(long)]
        no_git: bool,
        /// Write into existing package directories.
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    outpaths::logging::init(outpaths::logging::PROGRESS);
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(exit_codes::INVALID);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Stubs { manifest, out } => cmd_stubs(&manifest, &out),
        Command::Packages {
            manifest,
            out,
            config,
            no_git,
            force,
        } => cmd_packages(&manifest, &out, &config, no_git, force),
    }
}

fn cmd_stubs(manifest_path: &Path, out: &Path) -> Result<()> {
    let manifest = load_manifest(manifest_path)?;
    let engine = TemplateEngine::new();
    let catalog = Catalog::builtin();
    let mut written = 0;
    for package in manifest.package_names() {
        let interfaces = manifest.interfaces_in(&package, catalog);
        let specs_root = out.join(&package).join(SPECS_DIR);
        for files in write_all_stubs(&engine, &specs_root, &interfaces)? {
            println!("{}", files.spec.display());
            println!("{}", files.callables.display());
            written += 1;
        }
    }
    info!(interfaces = written, "stubs written");
    Ok(())
}

fn cmd_packages(
    manifest_path: &Path,
    out: &Path,
    config_path: &Path,
    no_git: bool,
    force: bool,
) -> Result<()> {
    let manifest = load_manifest(manifest_path)?;
    let config = load_config(config_path)?;
    let packages = manifest.package_names();
    if packages.is_empty() {
        bail!("manifest {} names no packages", manifest_path.display());
    }

    let engine = TemplateEngine::new();
    let options = PackageOptions {
        force,
        git: config.git.enabled && !no_git,
    };
    for package in &packages {
        let interfaces = manifest.interfaces_in(package, Catalog::builtin());
        let layout = create_package(&engine, out, package, &interfaces, &config, options)?;
        println!("{}", layout.root.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packages_defaults_config_path() {
        let cli = Cli::try_parse_from([
            "pkggen", "packages", "--manifest", "m.yaml", "--out", "out", "--no-git",
        ])
        .expect("parse");
        let Command::Packages {
            config,
            no_git,
            force,
            ..
        } = cli.command
        else {
            panic!("expected packages");
        };
        assert_eq!(config, PathBuf::from("pkggen.toml"));
        assert!(no_git);
        assert!(!force);
    }
}
