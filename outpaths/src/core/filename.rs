//! Filename splitting and presuffix helpers.
//!
//! These operate on path strings and never touch the filesystem, except that
//! a replacement directory handed to [`fname_presuffix`] or [`gen_fname`] is
//! made absolute against the current directory.

use std::path::{Path, PathBuf};

/// Extensions that are split off as a single token instead of at the last dot.
pub const COMPOUND_EXTENSIONS: &[&str] = &[".nii.gz", ".tar.gz", ".niml.dset"];

/// Split `path` into `(directory, base, extension)`.
///
/// The extension keeps its leading dot. Compound extensions from
/// [`COMPOUND_EXTENSIONS`] are matched case-insensitively and only when a
/// non-empty base remains; otherwise the last dot wins. Names whose only dots
/// are leading (`.bashrc`) have no extension.
pub fn split_filename(path: &str) -> (String, String, String) {
    let (dir, name) = split_dir(path);

    for compound in COMPOUND_EXTENSIONS {
        if name.len() <= compound.len() {
            continue;
        }
        let cut = name.len() - compound.len();
        if let Some(tail) = name.get(cut..) {
            if tail.eq_ignore_ascii_case(compound) {
                return (dir.to_string(), name[..cut].to_string(), tail.to_string());
            }
        }
    }

    let (base, ext) = split_ext(name);
    (dir.to_string(), base.to_string(), ext.to_string())
}

/// Rejoin the parts produced by [`split_filename`].
pub fn join_parts(dir: &str, base: &str, ext: &str) -> String {
    if dir.is_empty() {
        return format!("{base}{ext}");
    }
    if dir.ends_with('/') {
        return format!("{dir}{base}{ext}");
    }
    format!("{dir}/{base}{ext}")
}

/// Build `prefix + base + suffix + ext`, optionally moved into `newpath`.
///
/// When `newpath` is given it replaces the original directory and is made
/// absolute first. With `use_ext == false` the original extension is dropped.
pub fn fname_presuffix(
    path: &str,
    prefix: &str,
    suffix: &str,
    newpath: Option<&Path>,
    use_ext: bool,
) -> String {
    let (dir, base, ext) = split_filename(path);
    let ext = if use_ext { ext.as_str() } else { "" };
    let name = format!("{prefix}{base}{suffix}{ext}");
    match newpath {
        Some(newpath) => absolutize(newpath).join(name).to_string_lossy().into_owned(),
        None => join_parts(&dir, &name, ""),
    }
}

/// Build `cwd/<stem><suffix><ext>` from `basename`.
///
/// With `change_ext` the original extension is replaced by `suffix + ext`;
/// without it only `suffix` is appended after the stem. Returns `None` when
/// `basename` is empty, since no name can be derived from it.
pub fn gen_fname(
    basename: &str,
    cwd: &Path,
    suffix: &str,
    change_ext: bool,
    ext: &str,
) -> Option<PathBuf> {
    if basename.is_empty() {
        return None;
    }
    let suffix = if change_ext {
        format!("{suffix}{ext}")
    } else {
        suffix.to_string()
    };
    Some(PathBuf::from(fname_presuffix(
        basename,
        "",
        &suffix,
        Some(cwd),
        false,
    )))
}

/// Make `path` absolute against the current directory without resolving links.
pub fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn split_dir(path: &str) -> (&str, &str) {
    let Some(idx) = path.rfind('/') else {
        return ("", path);
    };
    let head = &path[..=idx];
    let name = &path[idx + 1..];
    if head.chars().all(|c| c == '/') {
        return (head, name);
    }
    (head.trim_end_matches('/'), name)
}

fn split_ext(name: &str) -> (&str, &str) {
    if let Some(idx) = name.rfind('.') {
        if name[..idx].chars().any(|c| c != '.') {
            return (&name[..idx], &name[idx..]);
        }
    }
    (name, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(path: &str) -> (String, String, String) {
        split_filename(path)
    }

    fn parts(dir: &str, base: &str, ext: &str) -> (String, String, String) {
        (dir.to_string(), base.to_string(), ext.to_string())
    }

    #[test]
    fn splits_simple_extension() {
        assert_eq!(split("image.txt"), parts("", "image", ".txt"));
    }

    #[test]
    fn splits_compound_extension_as_one_token() {
        assert_eq!(split("scan.nii.gz"), parts("", "scan", ".nii.gz"));
        assert_eq!(split("/data/a.NIML.dset"), parts("/data", "a", ".NIML.dset"));
        assert_eq!(split("rel/dir/x.tar.gz"), parts("rel/dir", "x", ".tar.gz"));
    }

    #[test]
    fn compound_extension_needs_non_empty_base() {
        assert_eq!(split(".nii.gz"), parts("", ".nii", ".gz"));
    }

    #[test]
    fn leading_dot_has_no_extension() {
        assert_eq!(split("/home/.bashrc"), parts("/home", ".bashrc", ""));
        assert_eq!(split("noext"), parts("", "noext", ""));
    }

    #[test]
    fn root_directory_is_kept() {
        assert_eq!(split("/scan.nii"), parts("/", "scan", ".nii"));
    }

    #[test]
    fn split_then_join_reconstructs_path() {
        for path in [
            "image.txt",
            "scan.nii.gz",
            "/data/sub-01/anat/T1w.nii.gz",
            "rel/x.niml.dset",
            "/scan.nii",
            "plain",
        ] {
            let (dir, base, ext) = split_filename(path);
            assert_eq!(join_parts(&dir, &base, &ext), path);
        }
    }

    #[test]
    fn presuffix_composes_without_newpath() {
        let once = fname_presuffix("foo.nii.gz", "a", "", None, true);
        let twice = fname_presuffix(&once, "", "b", None, true);
        assert_eq!(twice, "afoob.nii.gz");
    }

    #[test]
    fn presuffix_drops_extension_when_asked() {
        assert_eq!(
            fname_presuffix("/in/foo.nii.gz", "", "_x", None, false),
            "/in/foo_x"
        );
    }

    #[test]
    fn presuffix_moves_into_newpath() {
        let out = fname_presuffix("/in/foo.nii", "r", "", Some(Path::new("/out")), true);
        assert_eq!(out, "/out/rfoo.nii");
    }

    #[test]
    fn gen_fname_replaces_extension() {
        let path = gen_fname("/in/sub.nii.gz", Path::new("/work"), "_brain", true, ".nii")
            .expect("name");
        assert_eq!(path, PathBuf::from("/work/sub_brain.nii"));
    }

    #[test]
    fn gen_fname_without_change_ext_appends_suffix_only() {
        let path = gen_fname("sub.nii.gz", Path::new("/work"), "_mesh.vtk", false, ".nii")
            .expect("name");
        assert_eq!(path, PathBuf::from("/work/sub_mesh.vtk"));
    }

    #[test]
    fn gen_fname_rejects_empty_basename() {
        assert!(gen_fname("", Path::new("/work"), "_x", true, ".nii").is_none());
    }
}
