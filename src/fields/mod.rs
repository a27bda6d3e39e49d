//! Declarative HTML form fields
//!
//! This module contains the field generation components:
//! - `types`: Field descriptors, attribute values and rendered output
//! - `attributes`: Attribute serialization and HTML escaping
//! - `renderer`: Descriptor to markup conversion
//! - `set`: Field sets loaded from JSON or YAML files

pub mod attributes;
pub mod renderer;
pub mod set;
pub mod types;

pub use attributes::{escape_html, to_html_attributes};
pub use renderer::{
    checkbox_field, hidden_field, radio_field, select_field, text_field, textarea_field,
    FieldRenderer, FieldRendererConfig,
};
pub use set::{FieldEntry, FieldSet};
pub use types::{
    AttrValue, Attributes, FieldDescriptor, FieldKind, FieldType, RawField, RenderedField,
    SelectOption, UnknownTypePolicy,
};
