//! Declaration key → normalizer table.
//!
//! Each entry writes one declared field into the accumulator. Keys that
//! are not in the table are ignored by the merge.

use serde_json::Value;
use url::Url;

use super::basic::{
    resolve_app_links, resolve_apple_web_app, resolve_authors, resolve_format_detection,
    resolve_itunes, resolve_robots, resolve_theme_color, resolve_verification, resolve_viewport,
};
use super::link::resolve_url_value;
use super::{
    TitleTemplates, resolve_alternates, resolve_icons, resolve_open_graph, resolve_title,
    resolve_twitter, string_array, truthy_str,
};
use crate::metadata::{MetadataError, ResolvedMetadata};

/// Context shared by every field of one merged declaration.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    /// `metadataBase` in effect for this declaration.
    pub base: Option<&'a Url>,
    /// Templates inherited from ancestor levels.
    pub templates: &'a TitleTemplates,
}

/// Writes one declared field (`key`, `value`) into the accumulator.
pub type FieldResolver =
    fn(&mut ResolvedMetadata, &str, &Value, &FieldContext<'_>) -> Result<(), MetadataError>;

static FIELD_RESOLVERS: &[(&str, FieldResolver)] = &[
    ("metadataBase", applied_first),
    ("title", title),
    ("applicationName", scalar),
    ("description", scalar),
    ("generator", scalar),
    ("creator", scalar),
    ("publisher", scalar),
    ("category", scalar),
    ("classification", scalar),
    ("referrer", scalar),
    ("colorScheme", scalar),
    ("abstract", scalar),
    ("keywords", string_list),
    ("archives", string_list),
    ("assets", string_list),
    ("bookmarks", string_list),
    ("authors", authors),
    ("manifest", manifest),
    ("itunes", itunes),
    ("formatDetection", format_detection),
    ("alternates", alternates),
    ("openGraph", open_graph),
    ("twitter", twitter),
    ("icons", icons),
    ("robots", robots),
    ("viewport", viewport),
    ("verification", verification),
    ("appleWebApp", apple_web_app),
    ("appLinks", app_links),
    ("themeColor", theme_color),
    ("other", other),
];

/// Table entry for a declaration key.
pub fn field_resolver(key: &str) -> Option<FieldResolver> {
    FIELD_RESOLVERS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, resolve)| *resolve)
}

type FieldResult = Result<(), MetadataError>;

// The merge parses `metadataBase` before any other field.
fn applied_first(
    _: &mut ResolvedMetadata,
    _: &str,
    _: &Value,
    _: &FieldContext<'_>,
) -> FieldResult {
    Ok(())
}

fn title(
    target: &mut ResolvedMetadata,
    _: &str,
    value: &Value,
    cx: &FieldContext<'_>,
) -> FieldResult {
    target.title = resolve_title(value, cx.templates.title.as_deref());
    Ok(())
}

fn scalar(
    target: &mut ResolvedMetadata,
    key: &str,
    value: &Value,
    _: &FieldContext<'_>,
) -> FieldResult {
    if let Some(slot) = target.scalar_mut(key) {
        *slot = truthy_str(Some(value));
    }
    Ok(())
}

fn string_list(
    target: &mut ResolvedMetadata,
    key: &str,
    value: &Value,
    _: &FieldContext<'_>,
) -> FieldResult {
    let slot = match key {
        "keywords" => &mut target.keywords,
        "archives" => &mut target.archives,
        "assets" => &mut target.assets,
        "bookmarks" => &mut target.bookmarks,
        _ => return Ok(()),
    };
    *slot = string_array(value);
    Ok(())
}

fn authors(
    target: &mut ResolvedMetadata,
    _: &str,
    value: &Value,
    _: &FieldContext<'_>,
) -> FieldResult {
    target.authors = resolve_authors(value);
    Ok(())
}

fn manifest(
    target: &mut ResolvedMetadata,
    _: &str,
    value: &Value,
    cx: &FieldContext<'_>,
) -> FieldResult {
    target.manifest = resolve_url_value(value, cx.base)?;
    Ok(())
}

fn itunes(
    target: &mut ResolvedMetadata,
    _: &str,
    value: &Value,
    cx: &FieldContext<'_>,
) -> FieldResult {
    target.itunes = resolve_itunes(value, cx.base)?;
    Ok(())
}

fn format_detection(
    target: &mut ResolvedMetadata,
    _: &str,
    value: &Value,
    _: &FieldContext<'_>,
) -> FieldResult {
    target.format_detection = resolve_format_detection(value);
    Ok(())
}

fn alternates(
    target: &mut ResolvedMetadata,
    _: &str,
    value: &Value,
    cx: &FieldContext<'_>,
) -> FieldResult {
    target.alternates = resolve_alternates(value, cx.base)?;
    Ok(())
}

fn open_graph(
    target: &mut ResolvedMetadata,
    _: &str,
    value: &Value,
    cx: &FieldContext<'_>,
) -> FieldResult {
    target.open_graph = resolve_open_graph(value, cx.base, cx.templates.open_graph.as_deref())?;
    Ok(())
}

fn twitter(
    target: &mut ResolvedMetadata,
    _: &str,
    value: &Value,
    cx: &FieldContext<'_>,
) -> FieldResult {
    target.twitter = resolve_twitter(value, cx.base, cx.templates.twitter.as_deref())?;
    Ok(())
}

fn icons(
    target: &mut ResolvedMetadata,
    _: &str,
    value: &Value,
    cx: &FieldContext<'_>,
) -> FieldResult {
    target.icons = resolve_icons(value, cx.base)?;
    Ok(())
}

fn robots(
    target: &mut ResolvedMetadata,
    _: &str,
    value: &Value,
    _: &FieldContext<'_>,
) -> FieldResult {
    target.robots = resolve_robots(value);
    Ok(())
}

fn viewport(
    target: &mut ResolvedMetadata,
    _: &str,
    value: &Value,
    _: &FieldContext<'_>,
) -> FieldResult {
    target.viewport = resolve_viewport(value);
    Ok(())
}

fn verification(
    target: &mut ResolvedMetadata,
    _: &str,
    value: &Value,
    _: &FieldContext<'_>,
) -> FieldResult {
    target.verification = resolve_verification(value);
    Ok(())
}

fn apple_web_app(
    target: &mut ResolvedMetadata,
    _: &str,
    value: &Value,
    _: &FieldContext<'_>,
) -> FieldResult {
    target.apple_web_app = resolve_apple_web_app(value);
    Ok(())
}

fn app_links(
    target: &mut ResolvedMetadata,
    _: &str,
    value: &Value,
    _: &FieldContext<'_>,
) -> FieldResult {
    target.app_links = resolve_app_links(value);
    Ok(())
}

fn theme_color(
    target: &mut ResolvedMetadata,
    _: &str,
    value: &Value,
    _: &FieldContext<'_>,
) -> FieldResult {
    target.theme_color = resolve_theme_color(value);
    Ok(())
}

/// Shallow merge: declared keys overwrite, ancestor keys survive.
fn other(
    target: &mut ResolvedMetadata,
    _: &str,
    value: &Value,
    _: &FieldContext<'_>,
) -> FieldResult {
    if let Value::Object(declared) = value {
        for (key, entry) in declared {
            target.other.insert(key.clone(), entry.clone());
        }
    }
    Ok(())
}
