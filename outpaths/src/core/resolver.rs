//! Output-path resolution.
//!
//! Given a tool's rule table, an input record and an output directory, compute
//! the absolute paths the tool is expected to write. Resolution is pure: the
//! same inputs always yield the same paths and nothing touches the disk.
//!
//! Per rule, in declaration order:
//!
//! 1. Unmet guards omit the output.
//! 2. A literal value in the rule's override field wins outright.
//! 3. A present `xor` field, or a missing `requires` field, omits the output.
//! 4. Otherwise the name is derived from the source field (recursing through
//!    other rules when the source is itself a derived output), templated,
//!    wrapped in prefix/suffix and given an extension.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::ser::SerializeMap;
use tracing::{debug, instrument};

use super::error::ResolveError;
use super::filename::{absolutize, join_parts, split_filename};
use super::record::{FieldValue, InputRecord, PLACEHOLDER};
use super::rule::{ExtensionPolicy, OutputRule};
use super::tool::ToolSpec;

/// One resolved output: a single path or one path per fanned-out input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResolvedPath {
    Single(PathBuf),
    Many(Vec<PathBuf>),
}

impl ResolvedPath {
    pub fn as_single(&self) -> Option<&Path> {
        match self {
            ResolvedPath::Single(path) => Some(path),
            ResolvedPath::Many(_) => None,
        }
    }
}

/// Output name → resolved path, in rule declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedOutputs {
    entries: Vec<(String, ResolvedPath)>,
}

impl ResolvedOutputs {
    pub fn get(&self, name: &str) -> Option<&ResolvedPath> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, path)| path)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedPath)> {
        self.entries.iter().map(|(name, path)| (name.as_str(), path))
    }
}

impl Serialize for ResolvedOutputs {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, path) in &self.entries {
            map.serialize_entry(name, path)?;
        }
        map.end()
    }
}

/// Resolve every output of `spec` for `record`, placing derived names in `out_dir`.
#[instrument(skip_all, fields(tool = %spec.name))]
pub fn resolve_outputs(
    spec: &ToolSpec,
    record: &InputRecord,
    out_dir: &Path,
) -> Result<ResolvedOutputs, ResolveError> {
    let resolution = Resolution::new(spec, record, out_dir);
    let mut outputs = ResolvedOutputs::default();
    for rule in &spec.rules {
        if let Some(path) = resolution.resolve_rule(rule)? {
            outputs.entries.push((rule.name.clone(), path));
        }
    }
    debug!(resolved = outputs.len(), declared = spec.rules.len(), "outputs resolved");
    Ok(outputs)
}

/// Resolve the single output whose override field (or name) is `field`.
///
/// Returns `Ok(None)` when the tool does not generate filenames on request,
/// when no rule matches, or when the output is not produced for `record`.
pub fn gen_filename(
    spec: &ToolSpec,
    record: &InputRecord,
    out_dir: &Path,
    field: &str,
) -> Result<Option<ResolvedPath>, ResolveError> {
    if !spec.custom_filename {
        return Ok(None);
    }
    let Some(rule) = spec.rule_for_field(field) else {
        return Ok(None);
    };
    Resolution::new(spec, record, out_dir).resolve_rule(rule)
}

/// Static checks over a rule table. Returns every problem found.
pub fn validate_tool(spec: &ToolSpec) -> Vec<ResolveError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    for rule in &spec.rules {
        if !seen.insert(rule.name.as_str()) {
            errors.push(ResolveError::DuplicateOutput {
                tool: spec.name.clone(),
                output: rule.name.clone(),
            });
        }
        for field in rule.referenced_fields() {
            if !spec.declares(field) {
                errors.push(ResolveError::UnknownField {
                    tool: spec.name.clone(),
                    field: field.to_string(),
                });
            }
        }
        if let Some(source) = &rule.source
            && !spec.declares(source)
            && spec.rule_for_field(source).is_none()
        {
            errors.push(ResolveError::UnknownField {
                tool: spec.name.clone(),
                field: source.clone(),
            });
        }
        let template = rule.effective_template();
        if template.matches(PLACEHOLDER).count() > 1 {
            errors.push(ResolveError::InvalidTemplate {
                tool: spec.name.clone(),
                output: rule.name.clone(),
                template: template.to_string(),
            });
        }
    }
    errors
}

/// Name produced for a rule before it is placed in the output directory.
enum Derived {
    One(Name),
    Many(Vec<Name>),
}

/// A file name kept split into directory, base and extension.
///
/// Derived names are built from their parts and never re-split, so dots
/// inside a base (`sub.run1`) are not mistaken for an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Name {
    dir: String,
    base: String,
    ext: String,
}

impl Name {
    fn from_path(path: &str) -> Self {
        let (dir, base, ext) = split_filename(path);
        Self { dir, base, ext }
    }

    fn file_name(&self) -> String {
        join_parts(&self.dir, &self.base, &self.ext)
    }
}

/// Extension carried by the literal text after a template's placeholder.
fn template_extension(template: &str) -> String {
    let tail = template
        .split_once(PLACEHOLDER)
        .map_or(template, |(_, after)| after);
    let (_, _, ext) = split_filename(&format!("x{tail}"));
    ext
}

struct Resolution<'a> {
    spec: &'a ToolSpec,
    record: &'a InputRecord,
    out_dir: PathBuf,
}

impl<'a> Resolution<'a> {
    fn new(spec: &'a ToolSpec, record: &'a InputRecord, out_dir: &Path) -> Self {
        Self {
            spec,
            record,
            out_dir: absolutize(out_dir),
        }
    }

    fn resolve_rule(&self, rule: &OutputRule) -> Result<Option<ResolvedPath>, ResolveError> {
        let mut chain = Vec::new();
        let resolved = match self.derive(rule, &mut chain)? {
            None => None,
            Some(Derived::One(name)) => Some(ResolvedPath::Single(self.place(&name))),
            Some(Derived::Many(names)) => Some(ResolvedPath::Many(
                names.iter().map(|name| self.place(name)).collect(),
            )),
        };
        Ok(resolved)
    }

    /// Absolute location of `name`; absolute names are kept as given.
    fn place(&self, name: &Name) -> PathBuf {
        self.out_dir.join(name.file_name())
    }

    fn empty_basename(&self, rule: &OutputRule) -> ResolveError {
        ResolveError::EmptyBasename {
            tool: self.spec.name.clone(),
            field: rule_key(rule).to_string(),
        }
    }

    /// Literal override values, split into names; empty values are rejected.
    fn literal_names(
        &self,
        rule: &OutputRule,
        values: &[String],
    ) -> Result<Vec<Name>, ResolveError> {
        values
            .iter()
            .map(|value| {
                let name = Name::from_path(value);
                if name.base.is_empty() {
                    return Err(self.empty_basename(rule));
                }
                Ok(name)
            })
            .collect()
    }

    fn derive(
        &self,
        rule: &OutputRule,
        chain: &mut Vec<String>,
    ) -> Result<Option<Derived>, ResolveError> {
        if !rule.guards_hold(self.record) {
            debug!(output = %rule.name, "guard not satisfied, output omitted");
            return Ok(None);
        }

        let current = rule.field.as_deref().map(|field| self.record.value(field));
        let override_template = match current {
            Some(FieldValue::Str(value)) if !value.contains(PLACEHOLDER) => {
                let mut names = self.literal_names(rule, std::slice::from_ref(value))?;
                return Ok(names.pop().map(Derived::One));
            }
            Some(FieldValue::Str(template)) => Some(template.as_str()),
            Some(FieldValue::List(values)) => {
                return Ok(Some(Derived::Many(self.literal_names(rule, values)?)));
            }
            Some(FieldValue::Bool(false)) => return Ok(None),
            Some(FieldValue::Bool(true) | FieldValue::Absent) | None => None,
        };

        if let Some(field) = rule.xor.iter().find(|f| self.record.is_present(f)) {
            debug!(output = %rule.name, xor = %field, "excluded by present field");
            return Ok(None);
        }
        if let Some(field) = rule.requires.iter().find(|f| !self.record.is_present(f)) {
            debug!(output = %rule.name, requires = %field, "required field missing");
            return Ok(None);
        }

        let template = override_template.unwrap_or_else(|| rule.effective_template());
        let seeds = match &rule.source {
            Some(source) => match self.seeds(rule, source, chain)? {
                Some(seeds) => seeds,
                None => return Ok(None),
            },
            None => vec![Name {
                dir: String::new(),
                base: rule.name.clone(),
                ext: String::new(),
            }],
        };

        let names = seeds
            .iter()
            .map(|seed| self.build_name(rule, template, seed))
            .collect::<Result<Vec<_>, _>>()?;

        if rule.fan_out {
            return Ok(Some(Derived::Many(names)));
        }
        Ok(names.into_iter().next().map(Derived::One))
    }

    /// Seeds for `rule` from its source field, recursing into other rules.
    fn seeds(
        &self,
        rule: &OutputRule,
        source: &str,
        chain: &mut Vec<String>,
    ) -> Result<Option<Vec<Name>>, ResolveError> {
        let literal: Option<&[String]> = match self.record.value(source) {
            FieldValue::Str(value) if !value.contains(PLACEHOLDER) => {
                Some(std::slice::from_ref(value))
            }
            FieldValue::List(values) if !values.is_empty() => Some(values.as_slice()),
            _ => None,
        };

        let mut names = match literal {
            Some(values) => self.literal_names(rule, values)?,
            None => {
                let Some(upstream) = self.spec.rule_for_field(source) else {
                    debug!(output = %rule.name, source, "source absent, output omitted");
                    return Ok(None);
                };
                let key = rule_key(rule);
                if chain.iter().any(|visited| visited == key) {
                    return Err(ResolveError::Cycle {
                        tool: self.spec.name.clone(),
                        field: key.to_string(),
                    });
                }
                chain.push(key.to_string());
                match self.derive(upstream, chain)? {
                    None => return Ok(None),
                    Some(Derived::One(name)) => vec![name],
                    Some(Derived::Many(names)) => names,
                }
            }
        };

        if !rule.fan_out {
            names.truncate(1);
        }
        Ok(Some(names))
    }

    /// `prefix + template(seed.base) + suffix`, then the extension chosen by policy.
    fn build_name(
        &self,
        rule: &OutputRule,
        template: &str,
        seed: &Name,
    ) -> Result<Name, ResolveError> {
        let template_ext = template_extension(template);
        let templated = template.replacen(PLACEHOLDER, &seed.base, 1);
        let stem = templated
            .strip_suffix(template_ext.as_str())
            .unwrap_or(&templated);
        let base = format!("{}{}{}", rule.prefix, stem, rule.suffix);

        let ext = match &rule.extension {
            ExtensionPolicy::Keep if !template_ext.is_empty() => template_ext,
            ExtensionPolicy::Keep if !seed.ext.is_empty() => seed.ext.clone(),
            ExtensionPolicy::Force(forced) => forced.clone(),
            ExtensionPolicy::Keep | ExtensionPolicy::OutputType => {
                match (self.spec.family.output_types(), self.spec.output_type_field()) {
                    (Some(table), Some(field)) => table
                        .extension_for(&self.spec.name, field, self.record)?
                        .to_string(),
                    _ => template_ext,
                }
            }
        };
        Ok(Name {
            dir: String::new(),
            base,
            ext,
        })
    }
}

fn rule_key(rule: &OutputRule) -> &str {
    rule.field.as_deref().unwrap_or(&rule.name)
}
