//! URL resolution against `metadataBase`.
//!
//! - Absolute URLs are kept as declared
//! - Relative URLs are joined onto the base, preserving the base's path prefix
//! - Without a base, relative URLs pass through unchanged

use serde_json::Value;
use url::Url;

use crate::metadata::MetadataError;

/// Parse a declared `metadataBase`. `null` clears the base.
pub fn parse_metadata_base(value: &Value) -> Result<Option<Url>, MetadataError> {
    match value {
        Value::Null => Ok(None),
        Value::String(raw) => Url::parse(raw)
            .map(Some)
            .map_err(|_| MetadataError::InvalidMetadataBase(raw.clone())),
        other => Err(MetadataError::InvalidMetadataBase(other.to_string())),
    }
}

/// Resolve one declared URL.
pub fn resolve_url(raw: &str, base: Option<&Url>) -> Result<String, MetadataError> {
    if let Ok(absolute) = Url::parse(raw) {
        return Ok(absolute.into());
    }
    let Some(base) = base else {
        return Ok(raw.to_owned());
    };

    let path = posix_join(base.path(), raw);
    base.join(&path)
        .map(String::from)
        .map_err(|source| MetadataError::InvalidUrl {
            url: raw.to_owned(),
            source,
        })
}

/// Resolve a URL-valued field. Non-string and empty values yield `None`.
pub(crate) fn resolve_url_value(
    value: &Value,
    base: Option<&Url>,
) -> Result<Option<String>, MetadataError> {
    match value {
        Value::String(raw) if !raw.is_empty() => resolve_url(raw, base).map(Some),
        _ => Ok(None),
    }
}

/// `path.posix.join` semantics: collapse `.`, `..` and empty segments.
fn posix_join(base: &str, relative: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in base.split('/').chain(relative.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }

    let mut joined = format!("/{}", parts.join("/"));
    if relative.ends_with('/') && joined.len() > 1 {
        joined.push('/');
    }
    joined
}
