//! Icon normalization and static icon injection.

use serde_json::Value;
use url::Url;

use super::link::{resolve_url, resolve_url_value};
use super::{as_array, truthy_str};
use crate::metadata::{IconDescriptor, MetadataError, MetadataImage, ResolvedIcons};

fn resolve_icon(
    value: &Value,
    base: Option<&Url>,
) -> Result<Option<IconDescriptor>, MetadataError> {
    match value {
        Value::String(url) if !url.is_empty() => Ok(Some(IconDescriptor {
            url: resolve_url(url, base)?,
            ..Default::default()
        })),
        Value::Object(obj) => {
            let Some(url) = resolve_url_value(obj.get("url").unwrap_or(&Value::Null), base)? else {
                return Ok(None);
            };
            Ok(Some(IconDescriptor {
                url,
                mime: truthy_str(obj.get("type")),
                sizes: truthy_str(obj.get("sizes")),
                color: truthy_str(obj.get("color")),
                rel: truthy_str(obj.get("rel")),
                media: truthy_str(obj.get("media")),
            }))
        }
        _ => Ok(None),
    }
}

fn resolve_icon_list(
    value: Option<&Value>,
    base: Option<&Url>,
) -> Result<Option<Vec<IconDescriptor>>, MetadataError> {
    let Some(items) = value.and_then(as_array) else {
        return Ok(None);
    };
    let mut icons = Vec::with_capacity(items.len());
    for item in items {
        icons.extend(resolve_icon(item, base)?);
    }
    Ok(Some(icons))
}

/// Normalize a declared `icons` field.
///
/// Accepts a URL, a list of icons, or an object keyed by
/// `icon` / `shortcut` / `apple` / `other`.
pub fn resolve_icons(
    value: &Value,
    base: Option<&Url>,
) -> Result<Option<ResolvedIcons>, MetadataError> {
    match value {
        Value::String(_) | Value::Array(_) => Ok(Some(ResolvedIcons {
            icon: resolve_icon_list(Some(value), base)?.unwrap_or_default(),
            ..Default::default()
        })),
        Value::Object(obj) => Ok(Some(ResolvedIcons {
            icon: resolve_icon_list(obj.get("icon"), base)?.unwrap_or_default(),
            apple: resolve_icon_list(obj.get("apple"), base)?.unwrap_or_default(),
            shortcut: resolve_icon_list(obj.get("shortcut"), base)?,
            other: resolve_icon_list(obj.get("other"), base)?,
        })),
        _ => Ok(None),
    }
}

fn static_icon(image: &MetadataImage) -> IconDescriptor {
    IconDescriptor {
        url: image.url.clone(),
        mime: image.mime.clone(),
        sizes: image.sizes.clone(),
        ..Default::default()
    }
}

/// Icons built from a segment's static icon files.
///
/// Replaces any declared `icons` value; a missing family becomes empty.
pub(crate) fn static_icons(
    icon: Option<&[MetadataImage]>,
    apple: Option<&[MetadataImage]>,
) -> ResolvedIcons {
    let convert = |images: Option<&[MetadataImage]>| {
        images
            .unwrap_or_default()
            .iter()
            .map(static_icon)
            .collect::<Vec<_>>()
    };
    ResolvedIcons {
        icon: convert(icon),
        apple: convert(apple),
        shortcut: None,
        other: None,
    }
}
