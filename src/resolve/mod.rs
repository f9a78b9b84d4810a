//! Field normalizers.
//!
//! Pure functions mapping a declared value (plus the `metadataBase` in
//! effect) to its normalized form. [`field_resolver`] maps a declaration
//! key to the entry that writes it into the accumulator.

mod alternates;
mod basic;
mod fields;
mod icons;
mod link;
mod opengraph;
mod title;

pub use alternates::resolve_alternates;
pub use basic::{
    resolve_app_links, resolve_apple_web_app, resolve_authors, resolve_format_detection,
    resolve_itunes, resolve_robots, resolve_theme_color, resolve_verification, resolve_viewport,
};
pub use fields::{FieldContext, FieldResolver, field_resolver};
pub use icons::resolve_icons;
pub use link::{parse_metadata_base, resolve_url};
pub use opengraph::{resolve_images, resolve_open_graph, resolve_twitter};
pub use title::{TITLE_PLACEHOLDER, TitleTemplates, resolve_title};

pub(crate) use icons::static_icons;
pub(crate) use opengraph::{append_open_graph_images, append_twitter_images};

use serde_json::{Number, Value};

/// Coerce a scalar-or-list value to a list. `null` yields `None`.
pub(crate) fn as_array(value: &Value) -> Option<Vec<&Value>> {
    match value {
        Value::Null => None,
        Value::Array(items) => Some(items.iter().collect()),
        other => Some(vec![other]),
    }
}

/// Falsy values: `null`, `false`, `0`, `""`.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Non-empty string value, if present.
pub(crate) fn truthy_str(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Text of a string or number, as it would appear in a tag attribute.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        _ => None,
    }
}

/// Integral floats print without a fraction (`1.0` → `1`).
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

/// Scalar-or-list of strings. Falsy input yields `None`.
pub(crate) fn string_array(value: &Value) -> Option<Vec<String>> {
    if !is_truthy(value) {
        return None;
    }
    as_array(value).map(|items| items.into_iter().filter_map(scalar_text).collect())
}

/// Image dimension declared as a number or numeric string.
pub(crate) fn dimension(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_as_array() {
        assert!(as_array(&json!(null)).is_none());
        assert_eq!(as_array(&json!("a")).unwrap().len(), 1);
        assert_eq!(as_array(&json!(["a", "b"])).unwrap().len(), 2);
    }

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!("x")));
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar_text(&json!(1.0)).as_deref(), Some("1"));
        assert_eq!(scalar_text(&json!(0.5)).as_deref(), Some("0.5"));
        assert_eq!(scalar_text(&json!(-1)).as_deref(), Some("-1"));
        assert!(scalar_text(&json!(true)).is_none());
    }

    #[test]
    fn test_string_array() {
        assert_eq!(
            string_array(&json!("next, rust")),
            Some(vec!["next, rust".to_owned()])
        );
        assert_eq!(
            string_array(&json!(["a", 1, null])),
            Some(vec!["a".to_owned(), "1".to_owned()])
        );
        assert!(string_array(&json!("")).is_none());
    }

    #[test]
    fn test_dimension() {
        assert_eq!(dimension(&json!(1200)), Some(1200));
        assert_eq!(dimension(&json!("630")), Some(630));
        assert_eq!(dimension(&json!(-1)), None);
        assert_eq!(dimension(&json!("wide")), None);
    }
}
