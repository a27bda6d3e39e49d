use super::types::{AttrValue, Attributes};
use minijinja::HtmlEscape;

/// Escapes text for use in HTML attribute values and element content.
///
/// Uses the same escaper as twig auto-escaping, so a value reads the same
/// in generated fields and in rendered templates.
pub fn escape_html(s: &str) -> String {
    HtmlEscape(s).to_string()
}

/// Serializes attributes as `key="value"` pairs joined by single spaces.
///
/// Attributes keep their insertion order. `true` renders the bare key,
/// `false` drops the attribute. When `include_value` is false a `value`
/// attribute with a non-boolean value is skipped.
pub fn to_html_attributes(list: &Attributes, include_value: bool) -> String {
    list.iter()
        .filter_map(|(key, value)| match value {
            AttrValue::Bool(true) => Some(key.clone()),
            AttrValue::Bool(false) => None,
            _ if key == "value" && !include_value => None,
            other => Some(format!("{key}=\"{}\"", escape_html(&other.as_attr_text()))),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
