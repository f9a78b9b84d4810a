//! Normalizers for the smaller field families.
//!
//! All of these degrade malformed input to `None` instead of failing.

use serde_json::Value;
use url::Url;

use super::link::resolve_url_value;
use super::{as_array, is_truthy, scalar_text, string_array, truthy_str};
use crate::metadata::{
    Author, FormatDetection, ItunesApp, MetadataError, ResolvedAppLinks, ResolvedAppleWebApp,
    ResolvedRobots, ResolvedVerification, StartupImage, ThemeColorDescriptor,
};

// ============================================================================
// Robots
// ============================================================================

/// Directives emitted as `key` (when `true`) or `key:value`.
const ROBOTS_DIRECTIVES: &[&str] = &[
    "noarchive",
    "nosnippet",
    "noimageindex",
    "nocache",
    "notranslate",
    "indexifembedded",
    "nositelinkssearchbox",
    "unavailable_after",
    "max-video-preview",
    "max-image-preview",
    "max-snippet",
];

fn robots_value(value: &Value) -> Option<String> {
    let obj = match value {
        Value::String(s) if !s.is_empty() => return Some(s.clone()),
        Value::Object(obj) => obj,
        _ => return None,
    };

    let mut directives = Vec::new();
    match obj.get("index").and_then(Value::as_bool) {
        Some(true) => directives.push("index".to_owned()),
        Some(false) => directives.push("noindex".to_owned()),
        None => {}
    }
    match obj.get("follow").and_then(Value::as_bool) {
        Some(true) => directives.push("follow".to_owned()),
        Some(false) => directives.push("nofollow".to_owned()),
        None => {}
    }
    for &key in ROBOTS_DIRECTIVES {
        match obj.get(key) {
            Some(Value::Bool(true)) => directives.push(key.to_owned()),
            Some(other) => {
                if let Some(text) = scalar_text(other) {
                    directives.push(format!("{key}:{text}"));
                }
            }
            None => {}
        }
    }

    (!directives.is_empty()).then(|| directives.join(", "))
}

/// Normalize `robots` into the `robots` and `googlebot` directive strings.
pub fn resolve_robots(value: &Value) -> Option<ResolvedRobots> {
    match value {
        Value::String(s) if !s.is_empty() => Some(ResolvedRobots {
            basic: Some(s.clone()),
            google_bot: None,
        }),
        Value::Object(obj) => Some(ResolvedRobots {
            basic: robots_value(value),
            google_bot: obj.get("googleBot").and_then(robots_value),
        }),
        _ => None,
    }
}

// ============================================================================
// Viewport
// ============================================================================

const VIEWPORT_KEYS: &[(&str, &str)] = &[
    ("width", "width"),
    ("height", "height"),
    ("initialScale", "initial-scale"),
    ("minimumScale", "minimum-scale"),
    ("maximumScale", "maximum-scale"),
    ("viewportFit", "viewport-fit"),
    ("userScalable", "user-scalable"),
    ("interactiveWidget", "interactive-widget"),
];

/// Normalize `viewport` into the `<meta name="viewport">` content string.
pub fn resolve_viewport(value: &Value) -> Option<String> {
    let obj = match value {
        Value::String(s) if !s.is_empty() => return Some(s.clone()),
        Value::Object(obj) => obj,
        _ => return None,
    };

    let parts: Vec<String> = VIEWPORT_KEYS
        .iter()
        .filter_map(|&(key, attr)| {
            let text = match obj.get(key)? {
                Value::Bool(b) => (if *b { "yes" } else { "no" }).to_owned(),
                other => scalar_text(other)?,
            };
            Some(format!("{attr}={text}"))
        })
        .collect();

    (!parts.is_empty()).then(|| parts.join(", "))
}

// ============================================================================
// Verification
// ============================================================================

pub fn resolve_verification(value: &Value) -> Option<ResolvedVerification> {
    let Value::Object(obj) = value else {
        return None;
    };
    let field = |key: &str| obj.get(key).and_then(string_array);

    let other = obj.get("other").and_then(Value::as_object).map(|other| {
        other
            .iter()
            .filter_map(|(name, values)| string_array(values).map(|v| (name.clone(), v)))
            .collect()
    });

    Some(ResolvedVerification {
        google: field("google"),
        yahoo: field("yahoo"),
        yandex: field("yandex"),
        me: field("me"),
        other,
    })
}

// ============================================================================
// Apple web app
// ============================================================================

const DEFAULT_STATUS_BAR_STYLE: &str = "default";

pub fn resolve_apple_web_app(value: &Value) -> Option<ResolvedAppleWebApp> {
    let obj = match value {
        Value::Bool(true) => {
            return Some(ResolvedAppleWebApp {
                capable: true,
                ..Default::default()
            });
        }
        Value::Object(obj) => obj,
        _ => return None,
    };

    let startup_image = obj.get("startupImage").and_then(as_array).map(|items| {
        items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(url) if !url.is_empty() => Some(StartupImage {
                    url: url.clone(),
                    media: None,
                }),
                Value::Object(image) => Some(StartupImage {
                    url: truthy_str(image.get("url"))?,
                    media: truthy_str(image.get("media")),
                }),
                _ => None,
            })
            .collect()
    });

    Some(ResolvedAppleWebApp {
        capable: obj.get("capable").is_none_or(is_truthy),
        title: truthy_str(obj.get("title")),
        startup_image,
        status_bar_style: truthy_str(obj.get("statusBarStyle"))
            .or_else(|| Some(DEFAULT_STATUS_BAR_STYLE.to_owned())),
    })
}

// ============================================================================
// App links, theme color, itunes, format detection, authors
// ============================================================================

/// Coerce every platform entry to a list of link objects.
pub fn resolve_app_links(value: &Value) -> Option<ResolvedAppLinks> {
    let Value::Object(obj) = value else {
        return None;
    };
    Some(
        obj.iter()
            .filter_map(|(platform, entries)| {
                let links = as_array(entries)?
                    .into_iter()
                    .filter(|link| link.is_object())
                    .cloned()
                    .collect();
                Some((platform.clone(), links))
            })
            .collect(),
    )
}

pub fn resolve_theme_color(value: &Value) -> Option<Vec<ThemeColorDescriptor>> {
    if !is_truthy(value) {
        return None;
    }
    let descriptors = as_array(value)?
        .into_iter()
        .filter_map(|item| match item {
            Value::String(color) if !color.is_empty() => Some(ThemeColorDescriptor {
                color: color.clone(),
                media: None,
            }),
            Value::Object(obj) => Some(ThemeColorDescriptor {
                color: truthy_str(obj.get("color"))?,
                media: truthy_str(obj.get("media")),
            }),
            _ => None,
        })
        .collect();
    Some(descriptors)
}

/// `itunes` with its `appArgument` resolved against the base.
pub fn resolve_itunes(
    value: &Value,
    base: Option<&Url>,
) -> Result<Option<ItunesApp>, MetadataError> {
    let Value::Object(obj) = value else {
        return Ok(None);
    };
    let Some(app_id) = obj.get("appId").and_then(scalar_text) else {
        return Ok(None);
    };
    Ok(Some(ItunesApp {
        app_id,
        app_argument: resolve_url_value(obj.get("appArgument").unwrap_or(&Value::Null), base)?,
    }))
}

pub fn resolve_format_detection(value: &Value) -> Option<FormatDetection> {
    value
        .is_object()
        .then(|| serde_json::from_value(value.clone()).ok())
        .flatten()
}

/// Authors as `{name, url}` objects. A bare string is taken as a name.
pub fn resolve_authors(value: &Value) -> Option<Vec<Author>> {
    let authors = as_array(value)?
        .into_iter()
        .filter_map(|item| match item {
            Value::String(name) if !name.is_empty() => Some(Author {
                name: Some(name.clone()),
                url: None,
            }),
            Value::Object(obj) => Some(Author {
                name: truthy_str(obj.get("name")),
                url: truthy_str(obj.get("url")),
            }),
            _ => None,
        })
        .collect();
    Some(authors)
}
