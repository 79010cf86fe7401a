//! Tool wrapper descriptions: declared inputs plus output rules.

use serde::{Deserialize, Serialize};

use super::output_type::Family;
use super::record::InputRecord;
use super::rule::OutputRule;

/// Declarative description of one external command-line tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    #[serde(default)]
    pub family: Family,
    /// Declared input fields.
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Output rules in declaration order.
    #[serde(default)]
    pub rules: Vec<OutputRule>,
    /// Tool answers single-field filename requests (`gen_filename`).
    #[serde(default)]
    pub custom_filename: bool,
    /// Overrides the family's output-type field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_type_field: Option<String>,
}

impl ToolSpec {
    pub fn new(name: &str, family: Family) -> Self {
        Self {
            name: name.to_string(),
            family,
            inputs: Vec::new(),
            rules: Vec::new(),
            custom_filename: false,
            output_type_field: None,
        }
    }

    pub fn inputs(mut self, inputs: &[&str]) -> Self {
        self.inputs.extend(inputs.iter().map(|i| i.to_string()));
        self
    }

    pub fn rule(mut self, rule: OutputRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_custom_filename(mut self) -> Self {
        self.custom_filename = true;
        self
    }

    pub fn with_output_type_field(mut self, field: &str) -> Self {
        self.output_type_field = Some(field.to_string());
        self
    }

    /// Field selecting the output-type token, if the family has a table.
    pub fn output_type_field(&self) -> Option<&str> {
        let table = self.family.output_types()?;
        Some(self.output_type_field.as_deref().unwrap_or(table.field))
    }

    /// True if `field` is a declared input (the output-type field always is).
    pub fn declares(&self, field: &str) -> bool {
        self.inputs.iter().any(|input| input == field) || self.output_type_field() == Some(field)
    }

    /// Every field an input record for this tool carries.
    pub fn declared_fields(&self) -> Vec<String> {
        let mut fields = self.inputs.clone();
        if let Some(field) = self.output_type_field()
            && !fields.iter().any(|f| f == field)
        {
            fields.push(field.to_string());
        }
        fields
    }

    /// An all-absent record for this tool.
    pub fn record(&self) -> InputRecord {
        InputRecord::new(self.declared_fields())
    }

    pub fn output_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.name.as_str())
    }

    pub fn find_rule(&self, name: &str) -> Option<&OutputRule> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    /// Rule producing the value of `field`: matched by override field, then by name.
    pub fn rule_for_field(&self, field: &str) -> Option<&OutputRule> {
        self.rules
            .iter()
            .find(|rule| rule.field.as_deref() == Some(field))
            .or_else(|| self.find_rule(field))
    }
}
