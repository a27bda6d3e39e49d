//! Loading field sets from JSON or YAML

use super::types::{FieldDescriptor, RawField, UnknownTypePolicy};
use crate::error::{Error, Result};
use crate::ext::PathExt;
use indexmap::IndexSet;
use log::{debug, warn};
use serde::Deserialize;
use std::path::Path;

/// Entries stay untyped until each one is read on its own, so a malformed
/// entry does not fail its siblings.
#[derive(Deserialize)]
#[serde(untagged)]
enum FieldSetRepr {
    List(Vec<serde_json::Value>),
    Wrapped { fields: Vec<serde_json::Value> },
}

/// One entry of a field set.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEntry {
    Field(RawField),
    /// An entry that is not a field descriptor, with its 1-based position
    Malformed { position: usize, reason: String },
}

impl FieldEntry {
    fn from_value(position: usize, value: serde_json::Value) -> Self {
        match serde_json::from_value(value) {
            Ok(raw) => FieldEntry::Field(raw),
            Err(e) => {
                warn!("Field set entry #{position} is malformed: {e}");
                FieldEntry::Malformed { position, reason: e.to_string() }
            }
        }
    }

    /// The raw field, or a `ValidationError` for a malformed entry.
    pub fn into_raw(self) -> Result<RawField> {
        match self {
            FieldEntry::Field(raw) => Ok(raw),
            FieldEntry::Malformed { position, reason } => Err(Error::ValidationError(format!(
                "field set entry #{position}: {reason}"
            ))),
        }
    }
}

/// An ordered collection of entries, as read from a descriptor file.
///
/// Accepts either a bare list of fields or an object with a `fields` list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    entries: Vec<FieldEntry>,
}

impl FieldSet {
    pub fn new(fields: Vec<RawField>) -> Self {
        Self { entries: fields.into_iter().map(FieldEntry::Field).collect() }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let repr: FieldSetRepr = serde_json::from_str(content)?;
        Ok(repr.into_set())
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let repr: FieldSetRepr = serde_yaml::from_str(content)?;
        Ok(repr.into_set())
    }

    /// Reads a field set, picking the format from the file extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
        debug!("Loading field set from '{}'", path.display());

        match extension.to_ascii_lowercase().as_str() {
            "json" => Self::from_json_str(&content),
            "yaml" | "yml" => Self::from_yaml_str(&content),
            _ => Err(Error::ConfigParseError { path: path.to_str_checked()?.to_string() }),
        }
    }

    pub fn entries(&self) -> &[FieldEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<FieldEntry> {
        self.entries
    }

    /// The well-formed fields, in order.
    pub fn fields(&self) -> impl Iterator<Item = &RawField> {
        self.entries.iter().filter_map(|entry| match entry {
            FieldEntry::Field(raw) => Some(raw),
            FieldEntry::Malformed { .. } => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks that every field name is unique within the set. Unnamed and
    /// malformed entries are reported when they are rendered.
    pub fn validate(&self) -> Result<()> {
        let mut seen = IndexSet::new();
        for field in self.fields().filter(|field| !field.name.trim().is_empty()) {
            if !seen.insert(field.name.as_str()) {
                return Err(Error::ValidationError(format!(
                    "duplicate field name '{}'",
                    field.name
                )));
            }
        }
        Ok(())
    }

    /// Converts every entry, keeping each conversion result in place.
    pub fn descriptors(&self, policy: UnknownTypePolicy) -> Vec<Result<FieldDescriptor>> {
        self.entries
            .iter()
            .cloned()
            .map(|entry| entry.into_raw().and_then(|raw| raw.into_descriptor(policy)))
            .collect()
    }
}

impl FieldSetRepr {
    fn into_set(self) -> FieldSet {
        match self {
            FieldSetRepr::List(values) | FieldSetRepr::Wrapped { fields: values } => FieldSet {
                entries: values
                    .into_iter()
                    .enumerate()
                    .map(|(i, value)| FieldEntry::from_value(i + 1, value))
                    .collect(),
            },
        }
    }
}
