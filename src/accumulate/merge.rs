//! Merge of one level's declaration and static assets into the accumulator.

use crate::debug;
use crate::metadata::{Metadata, MetadataError, ResolvedMetadata, StaticMetadata};
use crate::resolve::{
    FieldContext, TitleTemplates, append_open_graph_images, append_twitter_images,
    field_resolver, parse_metadata_base, static_icons,
};

/// Merge `source` and `static_metadata` into `target`.
///
/// - `metadataBase` is applied first: every URL of `source` resolves against it
/// - Declared fields go through the normalizer table; undeclared fields keep
///   the ancestor value, except plain passthrough fields, which reset
/// - Static icon files replace `icons`; static Open Graph / Twitter images
///   are added to the already-merged card
pub fn merge(
    target: &mut ResolvedMetadata,
    source: Option<&Metadata>,
    static_metadata: Option<&StaticMetadata>,
    templates: &TitleTemplates,
) -> Result<(), MetadataError> {
    if let Some(source) = source {
        merge_declared(target, source, templates)?;
    }
    if let Some(static_metadata) = static_metadata {
        merge_static(target, static_metadata)?;
    }
    Ok(())
}

fn merge_declared(
    target: &mut ResolvedMetadata,
    source: &Metadata,
    templates: &TitleTemplates,
) -> Result<(), MetadataError> {
    if let Some(base) = source.get("metadataBase") {
        target.metadata_base = parse_metadata_base(base)?;
    }
    target.reset_passthrough();

    let base = target.metadata_base.clone();
    let cx = FieldContext {
        base: base.as_ref(),
        templates,
    };
    for (key, value) in source.iter() {
        match field_resolver(key) {
            Some(resolve) => resolve(target, key, value, &cx)?,
            None => debug!("merge"; "ignoring unknown field `{}`", key),
        }
    }
    Ok(())
}

fn merge_static(
    target: &mut ResolvedMetadata,
    static_metadata: &StaticMetadata,
) -> Result<(), MetadataError> {
    let StaticMetadata {
        icon,
        apple,
        open_graph,
        twitter,
    } = static_metadata;

    if icon.is_some() || apple.is_some() {
        target.icons = Some(static_icons(icon.as_deref(), apple.as_deref()));
    }

    let base = target.metadata_base.clone();
    if let Some(images) = twitter {
        target.twitter = Some(append_twitter_images(
            target.twitter.take(),
            images,
            base.as_ref(),
        )?);
    }
    if let Some(images) = open_graph {
        target.open_graph = Some(append_open_graph_images(
            target.open_graph.take(),
            images,
            base.as_ref(),
        )?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::MetadataImage;
    use serde_json::json;

    fn declared(value: serde_json::Value) -> Metadata {
        Metadata::from(value)
    }

    fn merged(levels: &[serde_json::Value]) -> ResolvedMetadata {
        let mut target = ResolvedMetadata::default();
        for level in levels {
            let templates = TitleTemplates::from_resolved(&target);
            merge(&mut target, Some(&declared(level.clone())), None, &templates).unwrap();
        }
        target
    }

    #[test]
    fn test_merge_nothing_is_identity() {
        let mut target = ResolvedMetadata::default();
        merge(&mut target, None, None, &TitleTemplates::default()).unwrap();
        assert_eq!(target, ResolvedMetadata::default());
    }

    #[test]
    fn test_empty_declaration_keeps_structured_fields() {
        let resolved = merged(&[json!({"title": "Root", "robots": "noindex"}), json!({})]);
        assert_eq!(resolved.title_text(), Some("Root"));
        assert_eq!(
            resolved.robots.and_then(|r| r.basic).as_deref(),
            Some("noindex")
        );
    }

    #[test]
    fn test_scalar_fields_do_not_inherit() {
        let resolved = merged(&[
            json!({"description": "root desc", "generator": "gen"}),
            json!({"title": "Child"}),
        ]);
        assert!(resolved.description.is_none());
        assert!(resolved.generator.is_none());
    }

    #[test]
    fn test_absent_declaration_keeps_scalars() {
        let mut target = merged(&[json!({"description": "root desc"})]);
        merge(&mut target, None, None, &TitleTemplates::default()).unwrap();
        assert_eq!(target.description.as_deref(), Some("root desc"));
    }

    #[test]
    fn test_other_accumulates() {
        let resolved = merged(&[
            json!({"other": {"custom": "root", "kept": "yes"}}),
            json!({"other": {"custom": "child"}}),
        ]);
        assert_eq!(resolved.other["custom"], "child");
        assert_eq!(resolved.other["kept"], "yes");
    }

    #[test]
    fn test_metadata_base_applies_to_same_declaration() {
        // declared after the fields that use it
        let resolved = merged(&[json!({
            "openGraph": {"images": "/og.png"},
            "manifest": "/manifest.json",
            "metadataBase": "https://example.com",
        })]);
        assert_eq!(
            resolved.open_graph.unwrap().images.unwrap()[0].url,
            "https://example.com/og.png"
        );
        assert_eq!(
            resolved.manifest.as_deref(),
            Some("https://example.com/manifest.json")
        );
    }

    #[test]
    fn test_metadata_base_inherited() {
        let resolved = merged(&[
            json!({"metadataBase": "https://example.com/docs/"}),
            json!({"alternates": {"canonical": "intro"}}),
        ]);
        assert_eq!(
            resolved.alternates.unwrap().canonical.unwrap().url,
            "https://example.com/docs/intro"
        );
    }

    #[test]
    fn test_invalid_metadata_base_fails() {
        let mut target = ResolvedMetadata::default();
        let result = merge(
            &mut target,
            Some(&declared(json!({"metadataBase": "::nope"}))),
            None,
            &TitleTemplates::default(),
        );
        assert!(matches!(result, Err(MetadataError::InvalidMetadataBase(_))));
    }

    #[test]
    fn test_open_graph_title_template() {
        let resolved = merged(&[
            json!({"openGraph": {"title": {"template": "%s | OG", "default": "OG"}}}),
            json!({"openGraph": {"title": "Post"}}),
        ]);
        assert_eq!(resolved.open_graph.unwrap().title.absolute, "Post | OG");
    }

    #[test]
    fn test_static_icons_replace_declared() {
        let mut target = ResolvedMetadata::default();
        let statics = StaticMetadata {
            icon: Some(vec![
                MetadataImage::new("/icon1.png"),
                MetadataImage::new("/icon2.png"),
            ]),
            ..Default::default()
        };
        merge(
            &mut target,
            Some(&declared(json!({"icons": {"icon": "x.png", "apple": "a.png"}}))),
            Some(&statics),
            &TitleTemplates::default(),
        )
        .unwrap();
        let icons = target.icons.unwrap();
        let urls: Vec<_> = icons.icon.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, ["/icon1.png", "/icon2.png"]);
        assert!(icons.apple.is_empty());
    }

    #[test]
    fn test_static_images_extend_merged_card() {
        let mut target = merged(&[json!({
            "openGraph": {"title": "T", "images": "/declared.png"},
            "twitter": {"site": "@site"},
        })]);
        let statics = StaticMetadata {
            open_graph: Some(vec![MetadataImage::new("/opengraph-image.png")]),
            twitter: Some(vec![MetadataImage::new("/twitter-image.png")]),
            ..Default::default()
        };
        merge(&mut target, None, Some(&statics), &TitleTemplates::default()).unwrap();

        let og = target.open_graph.unwrap();
        assert_eq!(og.title.absolute, "T");
        assert_eq!(og.images.unwrap().len(), 2);

        let twitter = target.twitter.unwrap();
        assert_eq!(twitter.site.as_deref(), Some("@site"));
        assert_eq!(twitter.card, "summary_large_image");
    }

    #[test]
    fn test_empty_static_list_still_replaces_icons() {
        let mut target = merged(&[json!({"icons": "/declared.png"})]);
        let statics = StaticMetadata {
            apple: Some(Vec::new()),
            ..Default::default()
        };
        merge(&mut target, None, Some(&statics), &TitleTemplates::default()).unwrap();
        let icons = target.icons.unwrap();
        assert!(icons.icon.is_empty());
        assert!(icons.apple.is_empty());
    }
}
