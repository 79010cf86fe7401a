//! Declarative derivation rules for a single output file.

use serde::{Deserialize, Serialize};

use super::record::{FieldValue, InputRecord, PLACEHOLDER};

/// Template used when a rule carries neither a template nor a prefix/suffix.
pub const DEFAULT_TEMPLATE: &str = "%s_generated";

/// How the extension of a derived name is chosen.
///
/// Serialized as a plain string: `keep`, `output_type`, or a literal
/// extension such as `.aff12.1D` (an empty string strips the extension).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ExtensionPolicy {
    /// Keep the extension carried by the templated name or by the source.
    Keep,
    /// Replace the trailing extension with this literal value.
    Force(String),
    /// Replace the trailing extension with the family's output-type extension.
    #[default]
    OutputType,
}

impl TryFrom<String> for ExtensionPolicy {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "keep" => Ok(ExtensionPolicy::Keep),
            "output_type" => Ok(ExtensionPolicy::OutputType),
            "" => Ok(ExtensionPolicy::Force(String::new())),
            ext if ext.starts_with('.') => Ok(ExtensionPolicy::Force(value)),
            other => Err(format!(
                "extension must be 'keep', 'output_type' or start with '.', got '{other}'"
            )),
        }
    }
}

impl From<ExtensionPolicy> for String {
    fn from(value: ExtensionPolicy) -> Self {
        match value {
            ExtensionPolicy::Keep => "keep".to_string(),
            ExtensionPolicy::OutputType => "output_type".to_string(),
            ExtensionPolicy::Force(ext) => ext,
        }
    }
}

/// Boolean precondition over an input record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "when", rename_all = "snake_case")]
pub enum Guard {
    Present { field: String },
    Absent { field: String },
    IsTrue { field: String },
    Equals { field: String, value: String },
    AnyPresent { fields: Vec<String> },
}

impl Guard {
    pub fn present(field: &str) -> Self {
        Guard::Present {
            field: field.to_string(),
        }
    }

    pub fn absent(field: &str) -> Self {
        Guard::Absent {
            field: field.to_string(),
        }
    }

    pub fn is_true(field: &str) -> Self {
        Guard::IsTrue {
            field: field.to_string(),
        }
    }

    pub fn equals(field: &str, value: &str) -> Self {
        Guard::Equals {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn any_present(fields: &[&str]) -> Self {
        Guard::AnyPresent {
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn holds(&self, record: &InputRecord) -> bool {
        match self {
            Guard::Present { field } => record.is_present(field),
            Guard::Absent { field } => !record.is_present(field),
            Guard::IsTrue { field } => {
                matches!(record.value(field), FieldValue::Bool(true))
            }
            Guard::Equals { field, value } => {
                record.value(field).as_text().as_deref() == Some(value.as_str())
            }
            Guard::AnyPresent { fields } => fields.iter().any(|f| record.is_present(f)),
        }
    }

    /// Field names this guard reads.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Guard::Present { field }
            | Guard::Absent { field }
            | Guard::IsTrue { field }
            | Guard::Equals { field, .. } => vec![field.as_str()],
            Guard::AnyPresent { fields } => fields.iter().map(String::as_str).collect(),
        }
    }
}

/// Derivation policy for one named output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRule {
    /// Output name in the resolved mapping.
    pub name: String,
    /// Input field that may carry a user override for this output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Input field (or other output) whose value seeds the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prefix: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub suffix: String,
    #[serde(default)]
    pub extension: ExtensionPolicy,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub guards: Vec<Guard>,
    /// Fields that suppress derivation when present.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub xor: Vec<String>,
    /// Fields that must all be present for derivation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
    /// Derive one path per element of a list-valued source.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fan_out: bool,
}

impl OutputRule {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            field: None,
            source: None,
            template: None,
            prefix: String::new(),
            suffix: String::new(),
            extension: ExtensionPolicy::default(),
            guards: Vec::new(),
            xor: Vec::new(),
            requires: Vec::new(),
            fan_out: false,
        }
    }

    /// Rule whose override field shares the output's name.
    pub fn overridable(name: &str) -> Self {
        Self::new(name).field(name)
    }

    pub fn field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    pub fn source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    pub fn template(mut self, template: &str) -> Self {
        self.template = Some(template.to_string());
        self
    }

    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn suffix(mut self, suffix: &str) -> Self {
        self.suffix = suffix.to_string();
        self
    }

    pub fn keep_extension(mut self) -> Self {
        self.extension = ExtensionPolicy::Keep;
        self
    }

    pub fn force_extension(mut self, ext: &str) -> Self {
        self.extension = ExtensionPolicy::Force(ext.to_string());
        self
    }

    pub fn guard(mut self, guard: Guard) -> Self {
        self.guards.push(guard);
        self
    }

    pub fn xor(mut self, fields: &[&str]) -> Self {
        self.xor.extend(fields.iter().map(|f| f.to_string()));
        self
    }

    pub fn requires(mut self, fields: &[&str]) -> Self {
        self.requires.extend(fields.iter().map(|f| f.to_string()));
        self
    }

    pub fn fan_out(mut self) -> Self {
        self.fan_out = true;
        self
    }

    /// Template applied when no override template is supplied.
    pub fn effective_template(&self) -> &str {
        match &self.template {
            Some(template) => template,
            None if self.prefix.is_empty() && self.suffix.is_empty() => DEFAULT_TEMPLATE,
            None => PLACEHOLDER,
        }
    }

    /// True when every guard holds for `record`.
    pub fn guards_hold(&self, record: &InputRecord) -> bool {
        self.guards.iter().all(|guard| guard.holds(record))
    }

    /// Every input field name this rule reads.
    pub fn referenced_fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        fields.extend(self.field.as_deref());
        fields.extend(self.xor.iter().map(String::as_str));
        fields.extend(self.requires.iter().map(String::as_str));
        for guard in &self.guards {
            fields.extend(guard.fields());
        }
        fields
    }
}
