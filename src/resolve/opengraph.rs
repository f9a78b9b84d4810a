//! Open Graph and Twitter card normalization.

use serde_json::{Map, Value, json};
use url::Url;

use super::link::{resolve_url, resolve_url_value};
use super::title::resolve_nested_title;
use super::{as_array, dimension, truthy_str};
use crate::metadata::{
    JsonMap, MetadataError, MetadataImage, ResolvedImage, ResolvedOpenGraph, ResolvedTwitter,
};

// Array-valued properties, by `og:type`
const ARTICLE_FIELDS: &[&str] = &["authors", "tags"];
const SONG_FIELDS: &[&str] = &["albums", "musicians"];
const PLAYLIST_FIELDS: &[&str] = &["albums", "musicians"];
const RADIO_FIELDS: &[&str] = &["creators"];
const VIDEO_FIELDS: &[&str] = &["actors", "directors", "writers", "tags"];
const BASIC_FIELDS: &[&str] = &[
    "emails",
    "phoneNumbers",
    "faxNumbers",
    "alternateLocale",
    "audio",
    "videos",
];

/// Scalar properties copied verbatim when declared.
const SCALAR_FIELDS: &[&str] = &[
    "determiner",
    "countryName",
    "ttl",
    "publishedTime",
    "modifiedTime",
    "expirationTime",
    "section",
    "releaseDate",
    "duration",
    "isbn",
];

const CARD_SUMMARY: &str = "summary";
const CARD_LARGE_IMAGE: &str = "summary_large_image";

fn fields_for_type(og_type: Option<&str>) -> &'static [&'static str] {
    match og_type {
        Some("article" | "book") => ARTICLE_FIELDS,
        Some("music.song" | "music.album") => SONG_FIELDS,
        Some("music.playlist") => PLAYLIST_FIELDS,
        Some("music.radio_station") => RADIO_FIELDS,
        Some("video.movie" | "video.episode") => VIDEO_FIELDS,
        _ => BASIC_FIELDS,
    }
}

/// Coerce `images` (string, object or list of either) to descriptors.
pub fn resolve_images(
    images: Option<&Value>,
    base: Option<&Url>,
) -> Result<Option<Vec<ResolvedImage>>, MetadataError> {
    let Some(items) = images.and_then(as_array) else {
        return Ok(None);
    };

    let mut resolved = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(url) if !url.is_empty() => resolved.push(ResolvedImage {
                url: resolve_url(url, base)?,
                ..Default::default()
            }),
            Value::Object(obj) => {
                let Some(url) = resolve_url_value(obj.get("url").unwrap_or(&Value::Null), base)?
                else {
                    continue;
                };
                resolved.push(ResolvedImage {
                    url,
                    secure_url: resolve_url_value(
                        obj.get("secureUrl").unwrap_or(&Value::Null),
                        base,
                    )?,
                    alt: truthy_str(obj.get("alt")),
                    mime: truthy_str(obj.get("type")),
                    width: obj.get("width").and_then(dimension),
                    height: obj.get("height").and_then(dimension),
                });
            }
            _ => {}
        }
    }
    Ok(Some(resolved))
}

fn static_image(image: &MetadataImage, base: Option<&Url>) -> Result<ResolvedImage, MetadataError> {
    Ok(ResolvedImage {
        url: resolve_url(&image.url, base)?,
        secure_url: None,
        alt: image.alt.clone(),
        mime: image.mime.clone(),
        width: image.width,
        height: image.height,
    })
}

/// Normalize a declared `openGraph` object.
pub fn resolve_open_graph(
    value: &Value,
    base: Option<&Url>,
    title_template: Option<&str>,
) -> Result<Option<ResolvedOpenGraph>, MetadataError> {
    let Value::Object(og) = value else {
        return Ok(None);
    };

    let og_type = truthy_str(og.get("type"));
    let mut properties = JsonMap::new();
    for &key in fields_for_type(og_type.as_deref()) {
        if let Some(declared) = og.get(key) {
            let coerced = as_array(declared)
                .map(|items| Value::Array(items.into_iter().cloned().collect()))
                .unwrap_or(Value::Null);
            properties.insert(key.to_owned(), coerced);
        }
    }
    for &key in SCALAR_FIELDS {
        if let Some(declared) = og.get(key).filter(|v| v.is_string() || v.is_number()) {
            properties.insert(key.to_owned(), declared.clone());
        }
    }

    Ok(Some(ResolvedOpenGraph {
        title: resolve_nested_title(og.get("title"), title_template),
        og_type,
        url: resolve_url_value(og.get("url").unwrap_or(&Value::Null), base)?,
        description: truthy_str(og.get("description")),
        site_name: truthy_str(og.get("siteName")),
        locale: truthy_str(og.get("locale")),
        images: resolve_images(og.get("images"), base)?,
        properties,
    }))
}

/// Normalize a declared `twitter` object.
pub fn resolve_twitter(
    value: &Value,
    base: Option<&Url>,
    title_template: Option<&str>,
) -> Result<Option<ResolvedTwitter>, MetadataError> {
    let Value::Object(tw) = value else {
        return Ok(None);
    };

    let declared_card = truthy_str(tw.get("card"));
    let mut twitter = ResolvedTwitter {
        title: resolve_nested_title(tw.get("title"), title_template),
        card_declared: declared_card.is_some(),
        card: declared_card.unwrap_or_default(),
        site: truthy_str(tw.get("site")),
        site_id: truthy_str(tw.get("siteId")),
        creator: truthy_str(tw.get("creator")),
        creator_id: truthy_str(tw.get("creatorId")),
        description: truthy_str(tw.get("description")),
        images: resolve_images(tw.get("images"), base)?,
        players: None,
        app: None,
    };
    refresh_card(&mut twitter, tw);
    Ok(Some(twitter))
}

/// Infer an undeclared card from `images`, then fill card-specific fields.
fn refresh_card(twitter: &mut ResolvedTwitter, declared: &Map<String, Value>) {
    if !twitter.card_declared {
        let has_images = twitter.images.as_ref().is_some_and(|i| !i.is_empty());
        twitter.card = if has_images { CARD_LARGE_IMAGE } else { CARD_SUMMARY }.to_owned();
    }

    match twitter.card.as_str() {
        "player" if twitter.players.is_none() => {
            let players = declared.get("players").and_then(as_array).unwrap_or_default();
            twitter.players = Some(players.into_iter().cloned().collect());
        }
        "app" if twitter.app.is_none() => {
            twitter.app = Some(match declared.get("app") {
                Some(app) if app.is_object() => app.clone(),
                _ => json!({}),
            });
        }
        _ => {}
    }
}

/// Add static Open Graph images to the already-normalized value.
pub(crate) fn append_open_graph_images(
    open_graph: Option<ResolvedOpenGraph>,
    images: &[MetadataImage],
    base: Option<&Url>,
) -> Result<ResolvedOpenGraph, MetadataError> {
    let mut open_graph = open_graph.unwrap_or_default();
    let mut merged = open_graph.images.take().unwrap_or_default();
    for image in images {
        merged.push(static_image(image, base)?);
    }
    open_graph.images = Some(merged);
    Ok(open_graph)
}

/// Add static Twitter images to the already-normalized value.
///
/// An inferred card is recomputed, so a `summary` card without declared
/// images becomes `summary_large_image`.
pub(crate) fn append_twitter_images(
    twitter: Option<ResolvedTwitter>,
    images: &[MetadataImage],
    base: Option<&Url>,
) -> Result<ResolvedTwitter, MetadataError> {
    let mut twitter = twitter.unwrap_or_default();
    let mut merged = twitter.images.take().unwrap_or_default();
    for image in images {
        merged.push(static_image(image, base)?);
    }
    twitter.images = Some(merged);
    refresh_card(&mut twitter, &Map::new());
    Ok(twitter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Url {
        Url::parse("https://example.com").unwrap()
    }

    #[test]
    fn test_images_string_and_object() {
        let images = json!([
            "/a.png",
            {"url": "/b.png", "width": 1200, "height": "630", "alt": "B"},
        ]);
        let resolved = resolve_images(Some(&images), Some(&base())).unwrap().unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].url, "https://example.com/a.png");
        assert_eq!(resolved[1].width, Some(1200));
        assert_eq!(resolved[1].height, Some(630));
        assert_eq!(resolved[1].alt.as_deref(), Some("B"));
    }

    #[test]
    fn test_images_single_value_and_malformed_entries() {
        let resolved = resolve_images(Some(&json!("/only.png")), None).unwrap().unwrap();
        assert_eq!(resolved[0].url, "/only.png");

        let malformed = json!([42, {"alt": "no url"}, "/ok.png"]);
        let resolved = resolve_images(Some(&malformed), None).unwrap().unwrap();
        assert_eq!(resolved.len(), 1);

        assert!(resolve_images(Some(&json!(null)), None).unwrap().is_none());
        assert!(resolve_images(None, None).unwrap().is_none());
    }

    #[test]
    fn test_open_graph_article_fields() {
        let og = json!({
            "type": "article",
            "title": "Post",
            "authors": "Ada",
            "tags": ["rust", "web"],
            "emails": "ignored@example.com",
            "publishedTime": "2024-01-01",
            "url": "/posts/1",
        });
        let resolved = resolve_open_graph(&og, Some(&base()), Some("%s | Blog"))
            .unwrap()
            .unwrap();
        assert_eq!(resolved.title.absolute, "Post | Blog");
        assert_eq!(resolved.og_type.as_deref(), Some("article"));
        assert_eq!(resolved.url.as_deref(), Some("https://example.com/posts/1"));
        assert_eq!(resolved.properties["authors"], json!(["Ada"]));
        assert_eq!(resolved.properties["tags"], json!(["rust", "web"]));
        assert_eq!(resolved.properties["publishedTime"], json!("2024-01-01"));
        assert!(!resolved.properties.contains_key("emails"));
    }

    #[test]
    fn test_open_graph_basic_fields_without_type() {
        let og = json!({"alternateLocale": "fr_FR", "siteName": "Site"});
        let resolved = resolve_open_graph(&og, None, None).unwrap().unwrap();
        assert!(resolved.og_type.is_none());
        assert_eq!(resolved.site_name.as_deref(), Some("Site"));
        assert_eq!(resolved.properties["alternateLocale"], json!(["fr_FR"]));
        assert_eq!(resolved.title.absolute, "");
        assert!(resolved.images.is_none());
    }

    #[test]
    fn test_open_graph_non_object() {
        assert!(resolve_open_graph(&json!(null), None, None).unwrap().is_none());
        assert!(resolve_open_graph(&json!("x"), None, None).unwrap().is_none());
    }

    #[test]
    fn test_twitter_card_inference() {
        let summary = resolve_twitter(&json!({"title": "T"}), None, None).unwrap().unwrap();
        assert_eq!(summary.card, "summary");
        assert!(summary.site.is_none());

        let large = resolve_twitter(&json!({"images": "/tw.png"}), None, None)
            .unwrap()
            .unwrap();
        assert_eq!(large.card, "summary_large_image");
    }

    #[test]
    fn test_twitter_declared_card_kept() {
        let tw = json!({"card": "summary", "images": ["/tw.png"], "site": "@site"});
        let resolved = resolve_twitter(&tw, None, Some("%s on X")).unwrap().unwrap();
        assert_eq!(resolved.card, "summary");
        assert_eq!(resolved.site.as_deref(), Some("@site"));
        assert_eq!(resolved.title.absolute, "");
    }

    #[test]
    fn test_twitter_player_and_app_cards() {
        let declared = json!({"card": "player", "players": {"playerUrl": "/p"}});
        let player = resolve_twitter(&declared, None, None).unwrap().unwrap();
        assert_eq!(player.players, Some(vec![json!({"playerUrl": "/p"})]));

        let app = resolve_twitter(&json!({"card": "app"}), None, None).unwrap().unwrap();
        assert_eq!(app.app, Some(json!({})));
    }

    #[test]
    fn test_append_open_graph_images_keeps_declared() {
        let og = resolve_open_graph(&json!({"title": "T", "images": "/declared.png"}), None, None)
            .unwrap();
        let statics = [MetadataImage {
            url: "/opengraph-image.png".into(),
            width: Some(1200),
            ..Default::default()
        }];
        let merged = append_open_graph_images(og, &statics, Some(&base())).unwrap();
        let images = merged.images.unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].url, "/declared.png");
        assert_eq!(images[1].url, "https://example.com/opengraph-image.png");
        assert_eq!(merged.title.absolute, "T");
    }

    #[test]
    fn test_append_twitter_images_recomputes_inferred_card() {
        let tw = resolve_twitter(&json!({"site": "@site"}), None, None).unwrap();
        let merged =
            append_twitter_images(tw, &[MetadataImage::new("/twitter-image.png")], None).unwrap();
        assert_eq!(merged.card, "summary_large_image");
        assert_eq!(merged.site.as_deref(), Some("@site"));
    }

    #[test]
    fn test_append_twitter_images_from_nothing() {
        let merged =
            append_twitter_images(None, &[MetadataImage::new("/twitter-image.png")], None).unwrap();
        assert_eq!(merged.card, "summary_large_image");
        assert_eq!(merged.images.unwrap().len(), 1);
    }
}
