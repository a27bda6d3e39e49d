use super::attributes::{escape_html, to_html_attributes};
use super::set::{FieldEntry, FieldSet};
use super::types::{
    AttrValue, Attributes, FieldDescriptor, FieldKind, FieldType, RawField, RenderedField,
    SelectOption, UnknownTypePolicy,
};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

fn get_default_escape_textarea() -> bool {
    true
}

/// Options controlling how descriptors become markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRendererConfig {
    /// Handling of unrecognised type names in raw fields
    #[serde(default)]
    pub unknown_types: UnknownTypePolicy,
    /// Escape textarea content; `false` keeps the legacy raw output
    #[serde(default = "get_default_escape_textarea")]
    pub escape_textarea: bool,
}

impl Default for FieldRendererConfig {
    fn default() -> Self {
        Self { unknown_types: UnknownTypePolicy::default(), escape_textarea: true }
    }
}

/// Turns field descriptors into HTML form controls.
#[derive(Debug, Clone, Default)]
pub struct FieldRenderer {
    config: FieldRendererConfig,
}

impl FieldRenderer {
    pub fn new(config: FieldRendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FieldRendererConfig {
        &self.config
    }

    /// Renders a single field.
    ///
    /// # Arguments
    /// * `descriptor` - The field to render
    ///
    /// # Returns
    /// * `Result<RenderedField>` - Markup and properties, or a validation
    ///   error for an unnamed field or a select without options
    pub fn render_field(&self, descriptor: &FieldDescriptor) -> Result<RenderedField> {
        let name = descriptor.name();
        if name.trim().is_empty() {
            return Err(Error::ValidationError("field name must not be empty".to_string()));
        }
        let attributes = descriptor.attributes();

        match descriptor.kind() {
            FieldKind::Text => Ok(text_field(name, attributes)),
            FieldKind::Hidden => Ok(hidden_field(name, attributes)),
            FieldKind::Checkbox => Ok(checkbox_field(name, attributes)),
            FieldKind::Radio => Ok(radio_field(name, attributes)),
            FieldKind::Select { options } => select_field(name, options, attributes),
            FieldKind::Textarea { value } => {
                Ok(textarea_field(name, value, attributes, self.config.escape_textarea))
            }
        }
    }

    /// Renders fields in order. A failing field yields its error in place
    /// and does not affect its siblings.
    pub fn render_fields(&self, descriptors: &[FieldDescriptor]) -> Vec<Result<RenderedField>> {
        descriptors
            .iter()
            .map(|descriptor| {
                self.render_field(descriptor).inspect_err(|e| {
                    warn!("Skipping field '{}': {e}", descriptor.name());
                })
            })
            .collect()
    }

    /// Converts raw fields with the configured type policy, then renders them.
    pub fn render_raw_fields(&self, fields: Vec<RawField>) -> Vec<Result<RenderedField>> {
        fields.into_iter().map(|raw| self.render_raw(Ok(raw))).collect()
    }

    /// Renders every entry of a field set in order. Malformed entries yield
    /// a validation error in their slot.
    pub fn render_set(&self, set: FieldSet) -> Vec<Result<RenderedField>> {
        set.into_entries()
            .into_iter()
            .map(|entry| self.render_raw(entry.into_raw()))
            .collect()
    }

    fn render_raw(&self, raw: Result<RawField>) -> Result<RenderedField> {
        raw.and_then(|raw| raw.into_descriptor(self.config.unknown_types))
            .and_then(|descriptor| self.render_field(&descriptor))
            .inspect_err(|e| warn!("Skipping field: {e}"))
    }

    /// Markup of every field that rendered, in order; failures are dropped.
    pub fn render_markup(&self, descriptors: &[FieldDescriptor]) -> Vec<String> {
        self.render_fields(descriptors)
            .into_iter()
            .filter_map(|rendered| rendered.ok().map(|field| field.markup))
            .collect()
    }
}

/// `{id, name}` followed by the caller's attributes. An `id` attribute
/// replaces the name-derived id in place.
fn base_attributes(name: &str, attributes: &Attributes) -> Attributes {
    let id = match attributes.get("id") {
        Some(AttrValue::Bool(_)) | None => AttrValue::from(name),
        Some(id) => id.clone(),
    };
    let mut merged = Attributes::new();
    merged.insert("id".to_string(), id);
    merged.insert("name".to_string(), AttrValue::from(name));
    for (key, value) in attributes {
        if key != "id" {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

fn to_properties(attributes: &Attributes) -> IndexMap<String, serde_json::Value> {
    attributes.iter().map(|(k, v)| (k.clone(), v.to_json())).collect()
}

fn input_field(name: &str, attributes: &Attributes, field_type: FieldType) -> RenderedField {
    let mut merged = base_attributes(name, attributes);
    merged.insert("type".to_string(), AttrValue::from(field_type.as_str()));
    debug!("Rendering {field_type} input '{name}'");

    RenderedField {
        markup: format!("<input {} />", to_html_attributes(&merged, true)),
        properties: to_properties(&merged),
    }
}

pub fn text_field(name: &str, attributes: &Attributes) -> RenderedField {
    input_field(name, attributes, FieldType::Text)
}

pub fn hidden_field(name: &str, attributes: &Attributes) -> RenderedField {
    input_field(name, attributes, FieldType::Hidden)
}

pub fn checkbox_field(name: &str, attributes: &Attributes) -> RenderedField {
    input_field(name, attributes, FieldType::Checkbox)
}

pub fn radio_field(name: &str, attributes: &Attributes) -> RenderedField {
    input_field(name, attributes, FieldType::Radio)
}

fn render_option(option: &SelectOption) -> String {
    let value = escape_html(option.value());
    let text = escape_html(option.text());
    if option.is_selected() {
        format!("<option value=\"{value}\" selected=\"selected\">{text}</option>")
    } else {
        format!("<option value=\"{value}\">{text}</option>")
    }
}

/// Renders a `<select>` with one `<option>` per entry.
///
/// # Arguments
/// * `name` - Field name, must not be empty
/// * `options` - Plain labels or `{text, value, selected}` entries
/// * `attributes` - Extra attributes for the `<select>` element
///
/// # Returns
/// * `Result<RenderedField>` - `MissingOptions` when `options` is empty
pub fn select_field(
    name: &str,
    options: &[SelectOption],
    attributes: &Attributes,
) -> Result<RenderedField> {
    if name.trim().is_empty() {
        return Err(Error::ValidationError("select field name must not be empty".to_string()));
    }
    if options.is_empty() {
        warn!("Field '{name}' has no valid options");
        return Err(Error::MissingOptions { name: name.to_string() });
    }

    let source: String = options.iter().map(render_option).collect();
    let merged = base_attributes(name, attributes);
    let markup = format!("<select {}>{source}</select>", to_html_attributes(&merged, false));

    let mut properties = to_properties(&merged);
    properties.insert(
        "options".to_string(),
        serde_json::to_value(options).unwrap_or(serde_json::Value::Null),
    );

    Ok(RenderedField { markup, properties })
}

/// Renders a `<textarea>`; `escape` controls whether `value` is escaped.
pub fn textarea_field(
    name: &str,
    value: &str,
    attributes: &Attributes,
    escape: bool,
) -> RenderedField {
    let merged = base_attributes(name, attributes);
    let content = if escape { escape_html(value) } else { value.to_string() };
    let markup = format!("<textarea {}>{content}</textarea>", to_html_attributes(&merged, true));

    let mut properties = to_properties(&merged);
    properties.insert("value".to_string(), serde_json::Value::String(value.to_string()));

    RenderedField { markup, properties }
}
