//! Default casing transforms applied when no rename is configured.

use heck::{ToLowerCamelCase, ToShoutySnakeCase, ToUpperCamelCase};

/// Default class name for a type definition name.
pub fn class_name(name: &str) -> String {
    name.to_upper_camel_case()
}

/// Default attribute name for an attribute definition name.
pub fn attribute_name(name: &str) -> String {
    name.to_lower_camel_case()
}

/// Default constant name for a raw enum value.
///
/// Values that would start with a digit get a leading underscore so the
/// result is always a valid identifier.
pub fn enum_value(raw: &str) -> String {
    let value = raw.to_shouty_snake_case();
    if value.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{value}")
    } else {
        value
    }
}

/// Heuristic singular form of a plural attribute name.
///
/// Returns an empty string when the name does not look plural.
pub fn singular(name: &str) -> String {
    if let Some(stem) = name.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{stem}y");
        }
    }
    if name.ends_with("sses") {
        return name[..name.len() - 2].to_string();
    }
    for suffix in ["xes", "ches", "shes"] {
        if name.ends_with(suffix) {
            return name[..name.len() - 2].to_string();
        }
    }
    if name.ends_with("ss") || name.ends_with("us") || name.ends_with("is") {
        return String::new();
    }
    match name.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => String::new(),
    }
}
