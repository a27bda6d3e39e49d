//! Field descriptor types

use crate::constants::field_types;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Value of a single HTML attribute.
///
/// Booleans render as bare attributes (`disabled`) when true and are
/// omitted when false; everything else renders as `key="value"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl AttrValue {
    /// Text form used in attribute position, before escaping.
    pub fn as_attr_text(&self) -> String {
        match self {
            AttrValue::Bool(b) => b.to_string(),
            AttrValue::Number(n) => n.to_string(),
            AttrValue::Text(s) => s.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            AttrValue::Bool(b) => serde_json::Value::Bool(*b),
            AttrValue::Number(n) => serde_json::Value::Number(n.clone()),
            AttrValue::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Number(value.into())
    }
}

/// Attributes keyed by name, kept in insertion order.
pub type Attributes = IndexMap<String, AttrValue>;

/// Reads a string, number or boolean as its text form.
fn scalar_text<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    AttrValue::deserialize(deserializer).map(|value| value.as_attr_text())
}

fn optional_scalar_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    Option::<AttrValue>::deserialize(deserializer).map(|value| value.map(|v| v.as_attr_text()))
}

/// One entry of a select field. Labels and values may be written as any
/// scalar; `[10, 20]` is read as the labels `"10"` and `"20"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectOption {
    /// Label doubling as the submitted value
    Plain(#[serde(deserialize_with = "scalar_text")] String),
    /// Label with an optional distinct value and selection flag
    Detailed {
        #[serde(deserialize_with = "scalar_text")]
        text: String,
        #[serde(
            default,
            deserialize_with = "optional_scalar_text",
            skip_serializing_if = "Option::is_none"
        )]
        value: Option<String>,
        #[serde(default)]
        selected: bool,
    },
}

impl SelectOption {
    /// Option with a distinct submitted value.
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        SelectOption::Detailed { text: text.into(), value: Some(value.into()), selected: false }
    }

    /// Marks a detailed option as selected; plain options are promoted.
    pub fn selected(self) -> Self {
        match self {
            SelectOption::Plain(text) => {
                SelectOption::Detailed { text, value: None, selected: true }
            }
            SelectOption::Detailed { text, value, .. } => {
                SelectOption::Detailed { text, value, selected: true }
            }
        }
    }

    pub fn text(&self) -> &str {
        match self {
            SelectOption::Plain(text) | SelectOption::Detailed { text, .. } => text,
        }
    }

    /// Submitted value, falling back to the label.
    pub fn value(&self) -> &str {
        match self {
            SelectOption::Plain(text) => text,
            SelectOption::Detailed { text, value, .. } => value.as_deref().unwrap_or(text),
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, SelectOption::Detailed { selected: true, .. })
    }
}

impl From<&str> for SelectOption {
    fn from(text: &str) -> Self {
        SelectOption::Plain(text.to_string())
    }
}

/// Type tag of a field as written in descriptor files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Hidden,
    Checkbox,
    Radio,
    Select,
    Textarea,
}

impl FieldType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => field_types::TEXT,
            FieldType::Hidden => field_types::HIDDEN,
            FieldType::Checkbox => field_types::CHECKBOX,
            FieldType::Radio => field_types::RADIO,
            FieldType::Select => field_types::SELECT,
            FieldType::Textarea => field_types::TEXTAREA,
        }
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = Error;

    /// Case-insensitive, accepting `check` and `radiobutton` as synonyms.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            field_types::TEXT => Ok(FieldType::Text),
            field_types::HIDDEN => Ok(FieldType::Hidden),
            field_types::CHECKBOX | field_types::CHECKBOX_SYNONYM => Ok(FieldType::Checkbox),
            field_types::RADIO | field_types::RADIO_SYNONYM => Ok(FieldType::Radio),
            field_types::SELECT => Ok(FieldType::Select),
            field_types::TEXTAREA => Ok(FieldType::Textarea),
            _ => Err(Error::UnknownFieldType {
                name: String::new(),
                type_name: s.to_string(),
            }),
        }
    }
}

/// What to do with a type name that matches no known field type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownTypePolicy {
    /// Reject the field.
    #[default]
    Strict,
    /// Render it as a text input.
    Text,
}

/// Kind of form control, with the payload each kind needs.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    Hidden,
    Checkbox,
    Radio,
    Select { options: Vec<SelectOption> },
    Textarea { value: String },
}

impl FieldKind {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldKind::Text => FieldType::Text,
            FieldKind::Hidden => FieldType::Hidden,
            FieldKind::Checkbox => FieldType::Checkbox,
            FieldKind::Radio => FieldType::Radio,
            FieldKind::Select { .. } => FieldType::Select,
            FieldKind::Textarea { .. } => FieldType::Textarea,
        }
    }
}

/// Description of one form control. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    name: String,
    kind: FieldKind,
    attributes: Attributes,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self { name: name.into(), kind, attributes: Attributes::new() }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn hidden(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Hidden)
    }

    pub fn checkbox(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Checkbox)
    }

    pub fn radio(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Radio)
    }

    pub fn select(name: impl Into<String>, options: Vec<SelectOption>) -> Self {
        Self::new(name, FieldKind::Select { options })
    }

    pub fn textarea(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Textarea { value: value.into() })
    }

    /// Adds (or replaces) an attribute, keeping its original position.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes.extend(attributes);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// The element id: the `id` attribute when given, the name otherwise.
    pub fn id(&self) -> String {
        match self.attributes.get("id") {
            Some(AttrValue::Bool(_)) | None => self.name.clone(),
            Some(id) => id.as_attr_text(),
        }
    }
}

fn get_default_field_type() -> String {
    field_types::TEXT.to_string()
}

/// A field descriptor as it appears in JSON or YAML field sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawField {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default = "get_default_field_type")]
    pub field_type: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl RawField {
    /// Resolves the type name and builds a descriptor.
    ///
    /// # Arguments
    /// * `policy` - How to treat a type name that is not recognised
    ///
    /// # Returns
    /// * `Result<FieldDescriptor>` - The descriptor, a `ValidationError` for
    ///   a missing name, or `UnknownFieldType` under the strict policy
    pub fn into_descriptor(self, policy: UnknownTypePolicy) -> Result<FieldDescriptor> {
        if self.name.trim().is_empty() {
            return Err(Error::ValidationError(format!(
                "{} field has no name",
                self.field_type
            )));
        }

        let field_type = match self.field_type.parse::<FieldType>() {
            Ok(field_type) => field_type,
            Err(_) if policy == UnknownTypePolicy::Text => {
                debug!(
                    "Field '{}' has unknown type '{}', rendering as text",
                    self.name, self.field_type
                );
                FieldType::Text
            }
            Err(_) => {
                return Err(Error::UnknownFieldType {
                    name: self.name,
                    type_name: self.field_type,
                })
            }
        };

        let kind = match field_type {
            FieldType::Text => FieldKind::Text,
            FieldType::Hidden => FieldKind::Hidden,
            FieldType::Checkbox => FieldKind::Checkbox,
            FieldType::Radio => FieldKind::Radio,
            FieldType::Select => FieldKind::Select { options: self.options },
            FieldType::Textarea => {
                FieldKind::Textarea { value: self.value.unwrap_or_default() }
            }
        };

        Ok(FieldDescriptor { name: self.name, kind, attributes: self.attributes })
    }
}

/// Markup for one field plus the attributes it was rendered with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedField {
    pub markup: String,
    pub properties: IndexMap<String, serde_json::Value>,
}

impl RenderedField {
    pub fn id(&self) -> Option<&str> {
        self.properties.get("id").and_then(|v| v.as_str())
    }

    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(|v| v.as_str())
    }
}

impl Display for RenderedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.markup)
    }
}
