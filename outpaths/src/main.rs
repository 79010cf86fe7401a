//! `outpaths`: inspect tool rule tables and resolve output paths.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use outpaths::core::error::ResolveError;
use outpaths::core::filename::{fname_presuffix, gen_fname};
use outpaths::core::output_type::Family;
use outpaths::core::resolver::gen_filename;
use outpaths::exit_codes;
use outpaths::io::catalog_file::load_catalogs;
use outpaths::io::probe::probe;
use outpaths::io::record_file::{apply_assignments, load_record};
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "outpaths",
    version,
    about = "Resolve output file paths of neuroimaging tool wrappers"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List catalog tools with their family and outputs.
    List {
        /// Extra YAML catalog files, applied in order.
        #[arg(long = "catalog", value_name = "FILE")]
        catalogs: Vec<PathBuf>,
    },
    /// Print one tool's rule table as YAML.
    Show {
        tool: String,
        #[arg(long = "catalog", value_name = "FILE")]
        catalogs: Vec<PathBuf>,
    },
    /// Resolve a tool's outputs and print them as JSON.
    Resolve {
        tool: String,
        /// JSON object of input field values.
        #[arg(long, value_name = "FILE")]
        inputs: Option<PathBuf>,
        /// Field assignment `key=value`, applied after `--inputs`.
        #[arg(long = "set", value_name = "KEY=VALUE")]
        assignments: Vec<String>,
        /// Directory outputs are placed in (defaults to the current directory).
        #[arg(long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,
        /// Only generate the filename for this input field.
        #[arg(long, value_name = "FIELD")]
        field: Option<String>,
        #[arg(long = "catalog", value_name = "FILE")]
        catalogs: Vec<PathBuf>,
    },
    /// Validate every rule table.
    Check {
        #[arg(long = "catalog", value_name = "FILE")]
        catalogs: Vec<PathBuf>,
    },
    /// Report where a tool family is installed and which version.
    Probe {
        /// fsl, afni or freesurfer.
        family: String,
    },
    /// Add a prefix/suffix to a filename, optionally moving it to a new directory.
    Presuffix {
        path: String,
        #[arg(long, default_value = "")]
        prefix: String,
        #[arg(long, default_value = "")]
        suffix: String,
        #[arg(long, value_name = "DIR")]
        newpath: Option<PathBuf>,
        /// Drop the original extension.
        #[arg(long)]
        no_ext: bool,
    },
    /// Build `<cwd>/<stem><suffix>[<ext>]` from a basename.
    GenFname {
        basename: String,
        #[arg(long, default_value = ".")]
        cwd: PathBuf,
        #[arg(long, default_value = "")]
        suffix: String,
        /// Replace the extension with `--ext`.
        #[arg(long, value_name = "EXT")]
        ext: Option<String>,
    },
}

fn main() {
    outpaths::logging::init(outpaths::logging::QUIET);
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_code_for(&err));
        }
    }
}

/// Resolver misconfiguration maps to `CONFIG`; everything else is `INVALID`.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.chain().any(|cause| cause.is::<ResolveError>()) {
        exit_codes::CONFIG
    } else {
        exit_codes::INVALID
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::List { catalogs } => cmd_list(&catalogs),
        Command::Show { tool, catalogs } => cmd_show(&tool, &catalogs),
        Command::Resolve {
            tool,
            inputs,
            assignments,
            out_dir,
            field,
            catalogs,
        } => cmd_resolve(
            &tool,
            inputs.as_deref(),
            &assignments,
            &out_dir,
            field.as_deref(),
            &catalogs,
        ),
        Command::Check { catalogs } => cmd_check(&catalogs),
        Command::Probe { family } => cmd_probe(&family),
        Command::Presuffix {
            path,
            prefix,
            suffix,
            newpath,
            no_ext,
        } => {
            println!(
                "{}",
                fname_presuffix(&path, &prefix, &suffix, newpath.as_deref(), !no_ext)
            );
            Ok(exit_codes::OK)
        }
        Command::GenFname {
            basename,
            cwd,
            suffix,
            ext,
        } => {
            let name = gen_fname(
                &basename,
                &cwd,
                &suffix,
                ext.is_some(),
                ext.as_deref().unwrap_or_default(),
            )
            .context("basename must not be empty")?;
            println!("{}", name.display());
            Ok(exit_codes::OK)
        }
    }
}

fn cmd_list(catalogs: &[PathBuf]) -> Result<i32> {
    let catalog = load_catalogs(catalogs)?;
    for tool in catalog.iter() {
        let outputs: Vec<&str> = tool.output_names().collect();
        println!("{}\t{}\t{}", tool.name, tool.family.as_str(), outputs.join(" "));
    }
    Ok(exit_codes::OK)
}

fn cmd_show(tool: &str, catalogs: &[PathBuf]) -> Result<i32> {
    let catalog = load_catalogs(catalogs)?;
    let spec = catalog.get(tool)?;
    let yaml = serde_yaml::to_string(spec).context("serialize tool")?;
    print!("{yaml}");
    Ok(exit_codes::OK)
}

fn cmd_resolve(
    tool: &str,
    inputs: Option<&Path>,
    assignments: &[String],
    out_dir: &Path,
    field: Option<&str>,
    catalogs: &[PathBuf],
) -> Result<i32> {
    let catalog = load_catalogs(catalogs)?;
    let spec = catalog.get(tool)?;
    let mut record = match inputs {
        Some(path) => load_record(spec, path)?,
        None => spec.record(),
    };
    apply_assignments(&mut record, assignments)?;

    match field {
        Some(field) => {
            let Some(path) = gen_filename(spec, &record, out_dir, field)? else {
                bail!("{tool} does not generate a filename for '{field}'");
            };
            print_json(&path)?;
        }
        None => {
            let outputs = catalog
                .resolve(tool, &record, out_dir)
                .with_context(|| format!("resolve outputs of {tool}"))?;
            print_json(&outputs)?;
        }
    }
    Ok(exit_codes::OK)
}

fn cmd_check(catalogs: &[PathBuf]) -> Result<i32> {
    let catalog = load_catalogs(catalogs)?;
    println!("{} tools ok", catalog.tools.len());
    Ok(exit_codes::OK)
}

fn cmd_probe(family: &str) -> Result<i32> {
    let Some(family) = Family::parse(family) else {
        bail!("unknown tool family '{family}' (expected fsl, afni or freesurfer)");
    };
    let report = probe(family);
    print_json(&report)?;
    Ok(exit_codes::OK)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value).context("serialize json")?;
    println!("{payload}");
    Ok(())
}
