//! Building input records from JSON files and `key=value` assignments.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use crate::core::record::{FieldValue, InputRecord};
use crate::core::tool::ToolSpec;

/// Load a JSON object of field values for `spec`.
pub fn load_record(spec: &ToolSpec, path: &Path) -> Result<InputRecord> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read inputs {}", path.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("parse inputs {}", path.display()))?;
    InputRecord::from_json(spec.declared_fields(), &value)
        .with_context(|| format!("inputs {} for {}", path.display(), spec.name))
}

/// Parse `key=value`.
///
/// `true`/`false` become booleans, `null` is absent, a value containing `,`
/// is a list, anything else is a string.
pub fn parse_assignment(raw: &str) -> Result<(String, FieldValue)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(anyhow!("empty field name in '{raw}'"));
    }
    let value = match value {
        "true" => FieldValue::Bool(true),
        "false" => FieldValue::Bool(false),
        "null" => FieldValue::Absent,
        list if list.contains(',') => FieldValue::List(
            list.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        other => FieldValue::Str(other.to_string()),
    };
    Ok((key.to_string(), value))
}

/// Apply `key=value` assignments on top of `record`.
pub fn apply_assignments(record: &mut InputRecord, assignments: &[String]) -> Result<()> {
    for raw in assignments {
        let (key, value) = parse_assignment(raw)?;
        record
            .set(&key, value)
            .with_context(|| format!("apply --set {raw}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn parses_assignment_kinds() {
        assert_eq!(
            parse_assignment("mask=true").expect("parse"),
            ("mask".to_string(), FieldValue::Bool(true))
        );
        assert_eq!(
            parse_assignment("out_file=null").expect("parse"),
            ("out_file".to_string(), FieldValue::Absent)
        );
        assert_eq!(
            parse_assignment("in_files=a.nii, b.nii").expect("parse"),
            ("in_files".to_string(), FieldValue::from(vec!["a.nii", "b.nii"]))
        );
        assert_eq!(
            parse_assignment("in_file=/d/x=y.nii").expect("parse"),
            ("in_file".to_string(), FieldValue::from("/d/x=y.nii"))
        );
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn unknown_field_assignment_fails() {
        let spec = Catalog::builtin().get("BET").expect("tool");
        let mut record = spec.record();
        let err = apply_assignments(&mut record, &["bogus=1".to_string()]).unwrap_err();
        assert!(format!("{err:#}").contains("bogus"));
    }

    #[test]
    fn loads_json_record() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("inputs.json");
        fs::write(&path, r#"{"in_file": "/d/T1w.nii.gz", "mask": true}"#).expect("write");
        let spec = Catalog::builtin().get("BET").expect("tool");
        let record = load_record(spec, &path).expect("load");
        assert_eq!(record.value("mask"), &FieldValue::Bool(true));
        assert!(record.declares("output_type"));
    }
}
