//! CLI tests for `pkggen stubs` and `pkggen packages`.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use outpaths::exit_codes;

const MANIFEST: &str = r#"
packages: [fsl, freesurfer]
interfaces:
  fsl.preprocess:
    - BET
    - name: FLIRT
      outputs: [out_file, out_matrix_file]
  freesurfer.preprocess:
    - ApplyVolTransform
    - MRIConvert
"#;

fn pkggen(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pkggen"))
        .current_dir(cwd)
        .args(args)
        .output()
        .expect("run pkggen")
}

fn write_manifest(dir: &Path) {
    fs::write(dir.join("manifest.yaml"), MANIFEST).expect("write manifest");
}

#[test]
fn stubs_mirror_module_hierarchy() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_manifest(temp.path());
    let output = pkggen(
        temp.path(),
        &["stubs", "--manifest", "manifest.yaml", "--out", "out"],
    );
    assert_eq!(output.status.code(), Some(exit_codes::OK), "{output:?}");

    let specs = temp.path().join("out/freesurfer/nipype-auto-conv/specs/freesurfer/preprocess");
    assert!(specs.join("apply_vol_transform.yaml").is_file());
    assert!(specs.join("apply_vol_transform_callables.py").is_file());
    assert!(specs.join("mri_convert.yaml").is_file());

    let flirt = fs::read_to_string(
        temp.path()
            .join("out/fsl/nipype-auto-conv/specs/fsl/preprocess/flirt.yaml"),
    )
    .expect("read flirt spec");
    assert!(flirt.contains("task_name: FLIRT"));
    assert!(flirt.contains("out_matrix_file: out_matrix_file_callable"));
    assert!(!flirt.contains("out_log_callable"));
}

#[test]
fn packages_scaffold_without_git() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_manifest(temp.path());
    fs::write(
        temp.path().join("pkggen.toml"),
        "package_prefix = \"task-\"\npython_versions = [\"3.11\"]\n",
    )
    .expect("write config");

    let output = pkggen(
        temp.path(),
        &["packages", "--manifest", "manifest.yaml", "--out", "out", "--no-git"],
    );
    assert_eq!(output.status.code(), Some(exit_codes::OK), "{output:?}");

    let root = temp.path().join("out/task-fsl");
    assert!(root.join("pydra/tasks/fsl/__init__.py").is_file());
    assert!(root.join("nipype-auto-conv/specs/fsl/preprocess/bet.yaml").is_file());
    assert!(!root.join(".git").exists());
    let ci = fs::read_to_string(root.join(".github/workflows/ci.yml")).expect("read ci");
    assert!(ci.contains(r#"python-version: ["3.11"]"#));
    assert!(temp.path().join("out/task-freesurfer/pydra/tasks/freesurfer/__init__.py").is_file());

    let again = pkggen(
        temp.path(),
        &["packages", "--manifest", "manifest.yaml", "--out", "out", "--no-git"],
    );
    assert_eq!(again.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&again.stderr).contains("already exists"));

    let forced = pkggen(
        temp.path(),
        &[
            "packages",
            "--manifest",
            "manifest.yaml",
            "--out",
            "out",
            "--no-git",
            "--force",
        ],
    );
    assert_eq!(forced.status.code(), Some(exit_codes::OK));
}

#[test]
fn invalid_manifest_is_rejected() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(
        temp.path().join("manifest.yaml"),
        "packages: [spm]\ninterfaces:\n  fsl.preprocess: [BET]\n",
    )
    .expect("write manifest");
    let output = pkggen(
        temp.path(),
        &["stubs", "--manifest", "manifest.yaml", "--out", "out"],
    );
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&output.stderr).contains("spm"));
}
