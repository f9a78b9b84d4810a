//! Static asset collection for one route segment.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, try_join_all};

use crate::metadata::{MetadataError, MetadataImage, StaticMetadata};

/// Lazy producer of one static asset descriptor.
///
/// Called once per resolution; typically inspects a file or asks a build
/// pipeline for the asset's public URL.
pub type AssetProducer =
    Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<MetadataImage>> + Send + Sync>;

/// Wrap an async closure as an [`AssetProducer`].
pub fn producer<F, Fut>(produce: F) -> AssetProducer
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<MetadataImage>> + Send + 'static,
{
    Arc::new(move || Box::pin(produce()))
}

/// Asset producers of one segment, per family, in file order.
#[derive(Clone, Default)]
pub struct StaticAssetSources {
    pub icon: Vec<AssetProducer>,
    pub apple: Vec<AssetProducer>,
    pub open_graph: Vec<AssetProducer>,
    pub twitter: Vec<AssetProducer>,
}

impl StaticAssetSources {
    pub fn is_empty(&self) -> bool {
        self.icon.is_empty()
            && self.apple.is_empty()
            && self.open_graph.is_empty()
            && self.twitter.is_empty()
    }
}

impl fmt::Debug for StaticAssetSources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticAssetSources")
            .field("icon", &self.icon.len())
            .field("apple", &self.apple.len())
            .field("open_graph", &self.open_graph.len())
            .field("twitter", &self.twitter.len())
            .finish()
    }
}

/// Run every producer of one family concurrently.
///
/// Returns `None` when the family has no sources, so the merge can tell
/// "no static files" apart from an empty override. Results keep source
/// order; the first failing producer fails the whole family.
pub async fn collect_static_family(
    sources: &[AssetProducer],
) -> Result<Option<Vec<MetadataImage>>, MetadataError> {
    if sources.is_empty() {
        return Ok(None);
    }
    let images = try_join_all(sources.iter().map(|produce| produce()))
        .await
        .map_err(MetadataError::from_producer)?;
    Ok(Some(images))
}

/// Collect all four families of a segment concurrently.
///
/// `None` when the segment has no static assets at all.
pub async fn collect_static_metadata(
    sources: &StaticAssetSources,
) -> Result<Option<StaticMetadata>, MetadataError> {
    if sources.is_empty() {
        return Ok(None);
    }
    let (icon, apple, open_graph, twitter) = tokio::try_join!(
        collect_static_family(&sources.icon),
        collect_static_family(&sources.apple),
        collect_static_family(&sources.open_graph),
        collect_static_family(&sources.twitter),
    )?;
    Ok(Some(StaticMetadata {
        icon,
        apple,
        open_graph,
        twitter,
    }))
}
