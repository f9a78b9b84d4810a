//! Title resolution and template inheritance.

use serde_json::Value;

use crate::metadata::{AbsoluteTitle, ResolvedMetadata};

/// Placeholder replaced with a child's literal title.
pub const TITLE_PLACEHOLDER: &str = "%s";

/// Templates carried from one level to the next.
///
/// Each family inherits independently: a level may override the page
/// title template without touching the Open Graph one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleTemplates {
    pub title: Option<String>,
    pub open_graph: Option<String>,
    pub twitter: Option<String>,
}

impl TitleTemplates {
    /// Templates declared by the levels merged into `metadata` so far.
    pub fn from_resolved(metadata: &ResolvedMetadata) -> Self {
        Self {
            title: metadata.title.as_ref().and_then(|t| t.template.clone()),
            open_graph: metadata
                .open_graph
                .as_ref()
                .and_then(|og| og.title.template.clone()),
            twitter: metadata
                .twitter
                .as_ref()
                .and_then(|tw| tw.title.template.clone()),
        }
    }
}

fn apply_template(template: Option<&str>, title: &str) -> String {
    match template {
        Some(template) => template.replace(TITLE_PLACEHOLDER, title),
        None => title.to_owned(),
    }
}

/// Resolve a declared title against the inherited template.
///
/// - `"Page"` → template applied
/// - `{ absolute }` → taken verbatim
/// - `{ default, template }` → inherited template applied to `default`;
///   the object's own `template` only affects descendants
///
/// Returns `None` for `null` and other non-title values.
pub fn resolve_title(title: &Value, inherited: Option<&str>) -> Option<AbsoluteTitle> {
    match title {
        Value::String(text) => Some(AbsoluteTitle {
            absolute: apply_template(inherited, text),
            template: None,
        }),
        Value::Object(obj) => {
            let template = obj
                .get("template")
                .and_then(Value::as_str)
                .map(str::to_owned);
            let absolute = match obj.get("absolute").and_then(Value::as_str) {
                Some(absolute) if !absolute.is_empty() => absolute.to_owned(),
                _ => obj
                    .get("default")
                    .and_then(Value::as_str)
                    .map(|default| apply_template(inherited, default))
                    .unwrap_or_default(),
            };
            Some(AbsoluteTitle { absolute, template })
        }
        _ => None,
    }
}

/// Resolve a nested (Open Graph / Twitter) title. Absent titles stay empty.
pub(crate) fn resolve_nested_title(
    title: Option<&Value>,
    inherited: Option<&str>,
) -> AbsoluteTitle {
    title
        .and_then(|t| resolve_title(t, inherited))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_title_without_template() {
        let title = resolve_title(&json!("Page"), None).unwrap();
        assert_eq!(title.absolute, "Page");
        assert!(title.template.is_none());
    }

    #[test]
    fn test_plain_title_with_template() {
        let title = resolve_title(&json!("Page"), Some("%s | Site")).unwrap();
        assert_eq!(title.absolute, "Page | Site");
    }

    #[test]
    fn test_template_replaces_every_placeholder() {
        let title = resolve_title(&json!("A"), Some("%s - %s")).unwrap();
        assert_eq!(title.absolute, "A - A");
    }

    #[test]
    fn test_object_default_uses_inherited_template() {
        let declared = json!({"template": "%s | Blog", "default": "Blog"});
        let title = resolve_title(&declared, Some("%s | Site")).unwrap();
        assert_eq!(title.absolute, "Blog | Site");
        assert_eq!(title.template.as_deref(), Some("%s | Blog"));
    }

    #[test]
    fn test_object_absolute_wins() {
        let declared = json!({"absolute": "Standalone", "default": "ignored"});
        let title = resolve_title(&declared, Some("%s | Site")).unwrap();
        assert_eq!(title.absolute, "Standalone");
        assert!(title.template.is_none());
    }

    #[test]
    fn test_object_template_only() {
        let title = resolve_title(&json!({"template": "%s | Site"}), None).unwrap();
        assert_eq!(title.absolute, "");
        assert_eq!(title.template.as_deref(), Some("%s | Site"));
    }

    #[test]
    fn test_null_and_malformed() {
        assert!(resolve_title(&json!(null), None).is_none());
        assert!(resolve_title(&json!(42), None).is_none());
    }

    #[test]
    fn test_templates_from_resolved() {
        let metadata = ResolvedMetadata {
            title: resolve_title(&json!({"template": "%s | Site", "default": "Site"}), None),
            ..Default::default()
        };
        let templates = TitleTemplates::from_resolved(&metadata);
        assert_eq!(templates.title.as_deref(), Some("%s | Site"));
        assert!(templates.open_graph.is_none());
        assert!(templates.twitter.is_none());
    }
}
