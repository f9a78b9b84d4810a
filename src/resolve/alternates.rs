//! `alternates` normalization: canonical, languages, media and types.

use serde_json::Value;
use url::Url;

use super::link::{resolve_url, resolve_url_value};
use super::truthy_str;
use crate::metadata::{AlternateLink, AlternateLinks, MetadataError, ResolvedAlternates};

fn resolve_link(value: &Value, base: Option<&Url>) -> Result<Option<AlternateLink>, MetadataError> {
    match value {
        Value::String(url) if !url.is_empty() => Ok(Some(AlternateLink {
            url: resolve_url(url, base)?,
            title: None,
        })),
        Value::Object(obj) => {
            let Some(url) = resolve_url_value(obj.get("url").unwrap_or(&Value::Null), base)? else {
                return Ok(None);
            };
            Ok(Some(AlternateLink {
                url,
                title: truthy_str(obj.get("title")),
            }))
        }
        _ => Ok(None),
    }
}

/// `{ key: url | descriptor | [descriptor] }` → `{ key: [descriptor] }`.
fn resolve_link_map(
    value: Option<&Value>,
    base: Option<&Url>,
) -> Result<Option<AlternateLinks>, MetadataError> {
    let Some(Value::Object(obj)) = value else {
        return Ok(None);
    };

    let mut links = AlternateLinks::new();
    for (key, entry) in obj {
        let resolved = match entry {
            Value::Array(items) => {
                let mut resolved = Vec::with_capacity(items.len());
                for item in items {
                    resolved.extend(resolve_link(item, base)?);
                }
                resolved
            }
            single => resolve_link(single, base)?.into_iter().collect(),
        };
        links.insert(key.clone(), resolved);
    }
    Ok(Some(links))
}

pub fn resolve_alternates(
    value: &Value,
    base: Option<&Url>,
) -> Result<Option<ResolvedAlternates>, MetadataError> {
    let Value::Object(obj) = value else {
        return Ok(None);
    };

    let canonical = match obj.get("canonical") {
        Some(canonical) => resolve_link(canonical, base)?,
        None => None,
    };

    Ok(Some(ResolvedAlternates {
        canonical,
        languages: resolve_link_map(obj.get("languages"), base)?,
        media: resolve_link_map(obj.get("media"), base)?,
        types: resolve_link_map(obj.get("types"), base)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_alternates_resolved_against_base() {
        let base = Url::parse("https://example.com").unwrap();
        let alternates = resolve_alternates(
            &json!({
                "canonical": "/posts/1",
                "languages": {
                    "en-US": "/en-US/posts/1",
                    "de-DE": [{"url": "/de/posts/1", "title": "Deutsch"}],
                },
                "types": {"application/rss+xml": {"url": "/rss.xml", "title": "RSS"}},
            }),
            Some(&base),
        )
        .unwrap()
        .unwrap();

        assert_eq!(
            alternates.canonical.unwrap().url,
            "https://example.com/posts/1"
        );
        let languages = alternates.languages.unwrap();
        assert_eq!(languages["en-US"][0].url, "https://example.com/en-US/posts/1");
        assert_eq!(languages["de-DE"][0].title.as_deref(), Some("Deutsch"));
        assert_eq!(
            alternates.types.unwrap()["application/rss+xml"][0].url,
            "https://example.com/rss.xml"
        );
        assert!(alternates.media.is_none());
    }

    #[test]
    fn test_canonical_object_form() {
        let declared = json!({"canonical": {"url": "/a", "title": "A"}});
        let alternates = resolve_alternates(&declared, None).unwrap().unwrap();
        let canonical = alternates.canonical.unwrap();
        assert_eq!(canonical.url, "/a");
        assert_eq!(canonical.title.as_deref(), Some("A"));
    }

    #[test]
    fn test_malformed_alternates() {
        assert!(resolve_alternates(&json!(null), None).unwrap().is_none());
        let alternates = resolve_alternates(&json!({"canonical": 5, "languages": "x"}), None)
            .unwrap()
            .unwrap();
        assert!(alternates.canonical.is_none());
        assert!(alternates.languages.is_none());
    }
}
