//! Typed input records.
//!
//! A record is built from the list of fields a tool declares. Every declared
//! field is always present, holding either a real value or
//! [`FieldValue::Absent`], so "not provided" is never confused with "unknown".

use std::collections::BTreeMap;

use serde_json::Value;

use super::error::RecordError;

/// Placeholder marking a string value as a name template.
pub const PLACEHOLDER: &str = "%s";

/// Value of a single input field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldValue {
    #[default]
    Absent,
    Str(String),
    Bool(bool),
    List(Vec<String>),
}

impl FieldValue {
    /// True for every value except `Absent` and `Bool(false)`.
    pub fn is_present(&self) -> bool {
        !matches!(self, FieldValue::Absent | FieldValue::Bool(false))
    }

    /// The template string if this value is a string carrying a placeholder.
    pub fn as_template(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) if s.contains(PLACEHOLDER) => Some(s),
            _ => None,
        }
    }

    /// String form used by equality guards.
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Str(s) => Some(s.clone()),
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::Absent | FieldValue::List(_) => None,
        }
    }

    /// Convert a JSON value; `field` is only used for error messages.
    pub fn from_json(field: &str, value: &Value) -> Result<Self, RecordError> {
        match value {
            Value::Null => Ok(FieldValue::Absent),
            Value::Bool(b) => Ok(FieldValue::Bool(*b)),
            Value::String(s) => Ok(FieldValue::Str(s.clone())),
            // Numeric parameters never seed names; keep their text for guards.
            Value::Number(n) => Ok(FieldValue::Str(n.to_string())),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(RecordError::UnsupportedValue {
                        field: field.to_string(),
                        kind: format!("array of {}", json_kind(other)),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(FieldValue::List),
            other => Err(RecordError::UnsupportedValue {
                field: field.to_string(),
                kind: json_kind(other).to_string(),
            }),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        FieldValue::List(value.into_iter().map(str::to_string).collect())
    }
}

/// Flat record of named input values for one tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl InputRecord {
    /// Create a record where every declared field starts out `Absent`.
    pub fn new<I, S>(declared: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: declared
                .into_iter()
                .map(|name| (name.into(), FieldValue::Absent))
                .collect(),
        }
    }

    /// Build a record from a JSON object. Keys must be declared fields.
    pub fn from_json<I, S>(declared: I, value: &Value) -> Result<Self, RecordError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let Value::Object(map) = value else {
            return Err(RecordError::NotAnObject {
                kind: json_kind(value).to_string(),
            });
        };
        let mut record = Self::new(declared);
        for (field, raw) in map {
            record.set(field, FieldValue::from_json(field, raw)?)?;
        }
        Ok(record)
    }

    /// Builder-style [`InputRecord::set`].
    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Result<Self, RecordError> {
        self.set(field, value)?;
        Ok(self)
    }

    /// Assign a declared field.
    pub fn set(&mut self, field: &str, value: impl Into<FieldValue>) -> Result<(), RecordError> {
        let slot = self
            .fields
            .get_mut(field)
            .ok_or_else(|| RecordError::UnknownField {
                field: field.to_string(),
            })?;
        *slot = value.into();
        Ok(())
    }

    pub fn declares(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Value of `field`; undeclared fields read as `Absent`.
    pub fn value(&self, field: &str) -> &FieldValue {
        static ABSENT: FieldValue = FieldValue::Absent;
        self.fields.get(field).unwrap_or(&ABSENT)
    }

    pub fn is_present(&self, field: &str) -> bool {
        self.value(field).is_present()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn declared_fields_start_absent() {
        let record = InputRecord::new(["in_file", "out_file"]);
        assert!(record.declares("in_file"));
        assert_eq!(record.value("out_file"), &FieldValue::Absent);
        assert!(!record.is_present("in_file"));
    }

    #[test]
    fn set_rejects_undeclared_field() {
        let mut record = InputRecord::new(["in_file"]);
        let err = record.set("nope", "x").unwrap_err();
        assert_eq!(
            err,
            RecordError::UnknownField {
                field: "nope".to_string()
            }
        );
    }

    #[test]
    fn bool_false_is_not_present() {
        let record = InputRecord::new(["mask"]).with("mask", false).expect("set");
        assert!(!record.is_present("mask"));
        let record = record.with("mask", true).expect("set");
        assert!(record.is_present("mask"));
    }

    #[test]
    fn template_detection() {
        assert_eq!(FieldValue::from("%s_x").as_template(), Some("%s_x"));
        assert_eq!(FieldValue::from("plain.nii").as_template(), None);
        assert_eq!(FieldValue::Bool(true).as_template(), None);
    }

    #[test]
    fn from_json_maps_value_kinds() {
        let record = InputRecord::from_json(
            ["in_file", "mask", "in_files", "out_type"],
            &json!({
                "in_file": "/data/sub.nii.gz",
                "mask": true,
                "in_files": ["a.nii", "b.nii"],
                "out_type": null
            }),
        )
        .expect("record");
        assert_eq!(record.value("in_file"), &FieldValue::from("/data/sub.nii.gz"));
        assert_eq!(record.value("mask"), &FieldValue::Bool(true));
        assert_eq!(record.value("in_files"), &FieldValue::from(vec!["a.nii", "b.nii"]));
        assert_eq!(record.value("out_type"), &FieldValue::Absent);
    }

    #[test]
    fn from_json_keeps_numbers_as_text() {
        let record = InputRecord::from_json(["fwhm"], &json!({"fwhm": 4})).expect("record");
        assert_eq!(record.value("fwhm").as_text(), Some("4".to_string()));
    }

    #[test]
    fn from_json_rejects_nested_objects_and_non_objects() {
        let err = InputRecord::from_json(["opts"], &json!({"opts": {"a": 1}})).unwrap_err();
        assert!(matches!(err, RecordError::UnsupportedValue { .. }));
        let err = InputRecord::from_json(["fwhm"], &json!([1])).unwrap_err();
        assert!(matches!(err, RecordError::NotAnObject { .. }));
    }
}
