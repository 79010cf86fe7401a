//! Name conversions between interface, module and package identifiers.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

static ACRONYM_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("acronym boundary regex should be valid")
});
static WORD_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([a-z0-9])([A-Z])").expect("word boundary regex should be valid")
});
static DOTTED_IDENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("dotted identifier regex should be valid")
});

/// `ApplyVolTransform` → `apply_vol_transform`, `BET` → `bet`, `MRIConvert` → `mri_convert`.
pub fn to_snake_case(name: &str) -> String {
    let name = ACRONYM_BOUNDARY.replace_all(name, "${1}_${2}");
    let name = WORD_BOUNDARY.replace_all(&name, "${1}_${2}");
    name.replace(['-', ' '], "_").to_lowercase()
}

/// True for `a.b_c.d`-style Python module paths.
pub fn is_dotted_identifier(value: &str) -> bool {
    DOTTED_IDENT.is_match(value)
}

/// `fsl.preprocess` → `fsl/preprocess`.
pub fn module_dir(module: &str) -> PathBuf {
    module.split('.').collect()
}

/// Package an interface module belongs to (its first dotted component).
pub fn package_of(module: &str) -> &str {
    module.split('.').next().unwrap_or(module)
}

/// Python identifier for a package name (`dwi-tools` → `dwi_tools`).
pub fn python_identifier(package: &str) -> String {
    package.replace('-', "_").to_lowercase()
}
