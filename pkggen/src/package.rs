//! Per-package scaffolding: directory layout, metadata, CI and specs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use minijinja::{Value, context};
use tracing::{info, instrument};

use crate::config::PkggenConfig;
use crate::git::Git;
use crate::manifest::Interface;
use crate::naming::python_identifier;
use crate::render::{TemplateEngine, names};
use crate::stubs::write_all_stubs;

/// Directory (relative to the package root) holding conversion specs.
pub const SPECS_DIR: &str = "nipype-auto-conv/specs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackageOptions {
    /// Write into an existing package directory.
    pub force: bool,
    /// Initialise a git repository with an initial commit.
    pub git: bool,
}

/// Paths that make up one generated package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
    pub package: String,
    pub dist_name: String,
    pub root: PathBuf,
    /// Import package directory relative to `root`, e.g. `pydra/tasks/fsl`.
    pub import_dir: PathBuf,
}

impl PackageLayout {
    pub fn new(out_dir: &Path, package: &str, config: &PkggenConfig) -> Self {
        let dist_name = config.dist_name(package);
        let mut import_dir: PathBuf = config.namespace.split('.').collect();
        import_dir.push(python_identifier(package));
        Self {
            package: package.to_string(),
            root: out_dir.join(&dist_name),
            dist_name,
            import_dir,
        }
    }

    pub fn specs_root(&self) -> PathBuf {
        self.root.join(SPECS_DIR)
    }

    fn namespace_dir(&self) -> PathBuf {
        self.import_dir
            .components()
            .next()
            .map(|first| PathBuf::from(first.as_os_str()))
            .unwrap_or_default()
    }

    fn import_dir_text(&self) -> String {
        slash_path(&self.import_dir)
    }
}

fn slash_path(path: &Path) -> String {
    path.iter()
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Create the package directory for `package` under `out_dir`.
///
/// Fails if the directory exists unless `options.force` is set.
#[instrument(skip_all, fields(package))]
pub fn create_package(
    engine: &TemplateEngine,
    out_dir: &Path,
    package: &str,
    interfaces: &[Interface],
    config: &PkggenConfig,
    options: PackageOptions,
) -> Result<PackageLayout> {
    let layout = PackageLayout::new(out_dir, package, config);
    if layout.root.exists() && !options.force {
        bail!(
            "package directory {} already exists (use --force to overwrite)",
            layout.root.display()
        );
    }

    let ctx = template_context(&layout, interfaces, config);
    let files = [
        (PathBuf::from("pyproject.toml"), names::PYPROJECT),
        (PathBuf::from("README.md"), names::README),
        (PathBuf::from(".gitignore"), names::GITIGNORE),
        (PathBuf::from(".github/workflows/ci.yml"), names::CI),
        (layout.import_dir.join("__init__.py"), names::INIT),
    ];
    for (relative, template) in &files {
        let contents = engine.render(template, ctx.clone())?;
        write_file(&layout.root.join(relative), &contents)?;
    }

    write_all_stubs(engine, &layout.specs_root(), interfaces)?;

    if options.git {
        let git = Git::new(&layout.root).with_identity(&config.author_name, &config.author_email);
        git.init(&config.default_branch)?;
        git.add_all()?;
        if git.commit_staged(&config.git.commit_message)? {
            info!(commit = %git.head_short_sha()?, "initial commit created");
        }
    }

    info!(
        package = %layout.dist_name,
        interfaces = interfaces.len(),
        "package created"
    );
    Ok(layout)
}

fn template_context(
    layout: &PackageLayout,
    interfaces: &[Interface],
    config: &PkggenConfig,
) -> Value {
    let interfaces: Vec<Value> = interfaces
        .iter()
        .map(|interface| {
            context! {
                name => interface.name,
                module => interface.module,
            }
        })
        .collect();
    context! {
        package => layout.package,
        dist_name => layout.dist_name,
        import_dir => layout.import_dir_text(),
        namespace_dir => slash_path(&layout.namespace_dir()),
        min_python => config.min_python(),
        python_versions => config.python_versions,
        author_name => config.author_name,
        author_email => config.author_email,
        default_branch => config.default_branch,
        interfaces => interfaces,
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use outpaths::catalog::Catalog;

    use super::*;
    use crate::manifest::Manifest;

    fn fsl_interfaces() -> Vec<Interface> {
        Manifest::from_yaml("interfaces:\n  fsl.preprocess: [BET, FLIRT]\n  fsl.maths: [ImageMaths]\n")
            .expect("manifest")
            .interfaces_in("fsl", Catalog::builtin())
    }

    #[test]
    fn layout_follows_namespace() {
        let layout = PackageLayout::new(Path::new("/out"), "fsl", &PkggenConfig::default());
        assert_eq!(layout.root, PathBuf::from("/out/pydra-fsl"));
        assert_eq!(layout.import_dir, PathBuf::from("pydra/tasks/fsl"));
        assert_eq!(layout.specs_root(), PathBuf::from("/out/pydra-fsl/nipype-auto-conv/specs"));
        assert_eq!(slash_path(&layout.namespace_dir()), "pydra");
    }

    #[test]
    fn creates_package_tree_without_git() {
        let temp = tempfile::tempdir().expect("tempdir");
        let engine = TemplateEngine::new();
        let config = PkggenConfig::default();
        let options = PackageOptions {
            force: false,
            git: false,
        };
        let layout =
            create_package(&engine, temp.path(), "fsl", &fsl_interfaces(), &config, options)
                .expect("create");

        for relative in [
            "pyproject.toml",
            "README.md",
            ".gitignore",
            ".github/workflows/ci.yml",
            "pydra/tasks/fsl/__init__.py",
            "nipype-auto-conv/specs/fsl/preprocess/bet.yaml",
            "nipype-auto-conv/specs/fsl/preprocess/flirt_callables.py",
            "nipype-auto-conv/specs/fsl/maths/image_maths.yaml",
        ] {
            assert!(layout.root.join(relative).is_file(), "missing {relative}");
        }
        assert!(!layout.root.join(".git").exists());

        let pyproject = fs::read_to_string(layout.root.join("pyproject.toml")).expect("read");
        assert!(pyproject.contains(r#"name = "pydra-fsl""#));
        assert!(pyproject.contains(r#"requires-python = ">=3.10""#));
        assert!(pyproject.contains(r#"packages = ["pydra"]"#));

        let readme = fs::read_to_string(layout.root.join("README.md")).expect("read");
        assert!(readme.contains("- `fsl.preprocess.BET`"));
    }

    #[test]
    fn existing_directory_requires_force() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(temp.path().join("pydra-fsl")).expect("mkdir");
        let engine = TemplateEngine::new();
        let config = PkggenConfig::default();
        let err = create_package(
            &engine,
            temp.path(),
            "fsl",
            &fsl_interfaces(),
            &config,
            PackageOptions::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("--force"));

        let forced = PackageOptions {
            force: true,
            git: false,
        };
        create_package(&engine, temp.path(), "fsl", &fsl_interfaces(), &config, forced)
            .expect("forced create");
    }
}
