//! Output-type tokens and the file extensions they select, per tool family.

use serde::{Deserialize, Serialize};

use super::error::ResolveError;
use super::record::InputRecord;

/// Tool family; decides which [`OutputTypeTable`] applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Fsl,
    Afni,
    Freesurfer,
    #[default]
    Generic,
}

impl Family {
    pub fn as_str(self) -> &'static str {
        match self {
            Family::Fsl => "fsl",
            Family::Afni => "afni",
            Family::Freesurfer => "freesurfer",
            Family::Generic => "generic",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "fsl" => Some(Family::Fsl),
            "afni" => Some(Family::Afni),
            "freesurfer" => Some(Family::Freesurfer),
            "generic" => Some(Family::Generic),
            _ => None,
        }
    }

    /// The family's extension table; `Generic` has none.
    pub fn output_types(self) -> Option<&'static OutputTypeTable> {
        match self {
            Family::Fsl => Some(&FSL_OUTPUT_TYPES),
            Family::Afni => Some(&AFNI_OUTPUT_TYPES),
            Family::Freesurfer => Some(&FREESURFER_OUTPUT_TYPES),
            Family::Generic => None,
        }
    }
}

/// Static token → extension table plus the record field that selects a token.
#[derive(Debug)]
pub struct OutputTypeTable {
    /// Default input field holding the token.
    pub field: &'static str,
    /// Token used when the field is absent or undeclared.
    pub default_token: &'static str,
    pub entries: &'static [(&'static str, &'static str)],
}

impl OutputTypeTable {
    pub fn extension(&self, token: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, ext)| *ext)
    }

    /// Extension selected by `record[field]`, falling back to the default token.
    pub fn extension_for(
        &self,
        tool: &str,
        field: &str,
        record: &InputRecord,
    ) -> Result<&'static str, ResolveError> {
        let token = record
            .value(field)
            .as_text()
            .unwrap_or_else(|| self.default_token.to_string());
        self.extension(&token)
            .ok_or(ResolveError::UnknownOutputType {
                tool: tool.to_string(),
                token,
            })
    }
}

pub static FSL_OUTPUT_TYPES: OutputTypeTable = OutputTypeTable {
    field: "output_type",
    default_token: "NIFTI_GZ",
    entries: &[
        ("NIFTI", ".nii"),
        ("NIFTI_PAIR", ".img"),
        ("NIFTI_GZ", ".nii.gz"),
        ("NIFTI_PAIR_GZ", ".img.gz"),
    ],
};

pub static AFNI_OUTPUT_TYPES: OutputTypeTable = OutputTypeTable {
    field: "outputtype",
    default_token: "AFNI",
    entries: &[("NIFTI", ".nii"), ("AFNI", ""), ("NIFTI_GZ", ".nii.gz")],
};

pub static FREESURFER_OUTPUT_TYPES: OutputTypeTable = OutputTypeTable {
    field: "out_type",
    default_token: "niigz",
    entries: &[
        ("mgz", ".mgz"),
        ("mgh", ".mgh"),
        ("nii", ".nii"),
        ("niigz", ".nii.gz"),
        ("analyze", ".img"),
        ("spm", ".img"),
        ("minc", ".mnc"),
        ("bshort", ".bshort"),
        ("bfloat", ".bfloat"),
    ],
};
