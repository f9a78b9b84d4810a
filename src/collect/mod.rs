//! Route collection: segments in, metadata items out.
//!
//! The tree walker visits segments root first. Each visit yields one
//! [`MetadataItem`]; the resulting list is what the accumulation engine folds.

mod assets;
mod segment;

pub use assets::{
    AssetProducer, StaticAssetSources, collect_static_family, collect_static_metadata, producer,
};
pub use segment::{ModuleKind, ModuleLoader, RouteSegment, SegmentModule, collect_segment_metadata};

use crate::accumulate::{AccumulateOptions, accumulate_metadata};
use crate::metadata::{MetadataError, MetadataItem, ResolvedMetadata};

/// Collect every segment of a route, root to leaf.
pub async fn collect_route(
    segments: &[RouteSegment],
    loader: &dyn ModuleLoader,
) -> Result<Vec<MetadataItem>, MetadataError> {
    let mut items = Vec::with_capacity(segments.len());
    for segment in segments {
        items.push(collect_segment_metadata(segment, loader).await?);
    }
    Ok(items)
}

/// Collect and accumulate the metadata of a route.
pub async fn resolve_metadata(
    segments: &[RouteSegment],
    loader: &dyn ModuleLoader,
    options: &AccumulateOptions,
) -> Result<ResolvedMetadata, MetadataError> {
    let items = collect_route(segments, loader).await?;
    accumulate_metadata(&items, options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{Metadata, MetadataImage};
    use serde_json::json;

    /// Loader keyed by segment position.
    struct IndexLoader(Vec<Option<(SegmentModule, ModuleKind)>>);

    impl ModuleLoader for IndexLoader {
        fn load(&self, segment: &RouteSegment) -> Option<(SegmentModule, ModuleKind)> {
            let index: usize = segment.key.parse().ok()?;
            self.0.get(index).cloned().flatten()
        }
    }

    fn segment(index: usize, route: &str, depth: usize) -> RouteSegment {
        RouteSegment {
            route: route.to_owned(),
            depth,
            key: index.to_string(),
            assets: StaticAssetSources::default(),
        }
    }

    fn declared(value: serde_json::Value, kind: ModuleKind) -> Option<(SegmentModule, ModuleKind)> {
        let module = SegmentModule {
            metadata: Some(Metadata::from(value)),
            ..Default::default()
        };
        Some((module, kind))
    }

    #[tokio::test]
    async fn test_collect_route_keeps_order() {
        let loader = IndexLoader(vec![
            declared(json!({"title": "Root"}), ModuleKind::Layout),
            None,
            declared(json!({"title": "Leaf"}), ModuleKind::Page),
        ]);
        let segments = [segment(0, "/", 0), segment(1, "/a", 1), segment(2, "/a/b", 2)];

        let items = collect_route(&segments, &loader).await.unwrap();
        let routes: Vec<_> = items.iter().map(|i| i.route.as_str()).collect();
        assert_eq!(routes, ["/", "/a", "/a/b"]);
        assert!(items[1].declaration.is_none());
    }

    #[tokio::test]
    async fn test_resolve_metadata_end_to_end() {
        let loader = IndexLoader(vec![
            declared(
                json!({
                    "metadataBase": "https://example.com",
                    "title": {"template": "%s | Site", "default": "Site"},
                    "description": "root desc",
                }),
                ModuleKind::Layout,
            ),
            declared(json!({"title": "About"}), ModuleKind::Page),
        ]);
        let mut leaf = segment(1, "/about", 1);
        leaf.assets.open_graph = vec![producer(|| async {
            anyhow::Ok(MetadataImage {
                url: "/about/opengraph-image.png".into(),
                width: Some(1200),
                height: Some(630),
                ..Default::default()
            })
        })];

        let resolved = resolve_metadata(&[segment(0, "/", 0), leaf], &loader, &Default::default())
            .await
            .unwrap();
        assert_eq!(resolved.title_text(), Some("About | Site"));
        assert!(resolved.description.is_none());
        assert_eq!(
            resolved.open_graph.unwrap().images.unwrap()[0].url,
            "https://example.com/about/opengraph-image.png"
        );
    }

    #[tokio::test]
    async fn test_asset_failure_aborts_resolution() {
        let loader = IndexLoader(vec![declared(json!({"title": "Root"}), ModuleKind::Layout)]);
        let mut root = segment(0, "/", 0);
        root.assets.icon = vec![producer(|| async {
            Err::<MetadataImage, _>(anyhow::anyhow!("icon.png is not an image"))
        })];

        let result = resolve_metadata(&[root], &loader, &Default::default()).await;
        assert!(matches!(result, Err(MetadataError::Asset(_))));
    }
}
