//! Segment metadata collection.
//!
//! Turns one route segment into a [`MetadataItem`]: the declaration exported
//! by the segment's layout or page module plus its static assets.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::assets::{StaticAssetSources, collect_static_metadata};
use crate::accumulate::ParentMetadata;
use crate::debug;
use crate::metadata::{
    Declaration, GeneratorFuture, Metadata, MetadataError, MetadataGenerator, MetadataItem,
    RouteProps,
};

/// Kind of module a segment resolves to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    #[default]
    Layout,
    Page,
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Layout => "layout",
            Self::Page => "page",
        })
    }
}

/// Metadata exports of a loaded layout or page module.
#[derive(Clone, Default)]
pub struct SegmentModule {
    /// Static `metadata` export.
    pub metadata: Option<Metadata>,
    /// `generateMetadata` export.
    pub generate_metadata: Option<Arc<dyn MetadataGenerator>>,
    /// Module is a client reference; its exports are not readable.
    pub client_reference: bool,
}

impl fmt::Debug for SegmentModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentModule")
            .field("metadata", &self.metadata)
            .field("generate_metadata", &self.generate_metadata.is_some())
            .field("client_reference", &self.client_reference)
            .finish()
    }
}

/// One node of the route hierarchy, as visited by the tree walker.
#[derive(Debug, Clone, Default)]
pub struct RouteSegment {
    pub route: String,
    pub depth: usize,
    /// Opaque key the [`ModuleLoader`] uses to locate the segment's module.
    pub key: String,
    pub assets: StaticAssetSources,
}

/// Locates the metadata-exporting module of a segment.
pub trait ModuleLoader: Send + Sync {
    /// The segment's layout or page module, if it has one.
    fn load(&self, segment: &RouteSegment) -> Option<(SegmentModule, ModuleKind)>;

    /// Client-only boundaries contribute no metadata.
    fn is_client_boundary(&self, module: &SegmentModule) -> bool {
        module.client_reference
    }
}

/// `generateMetadata` wrapper that labels invocations with the route path.
struct TracedGenerator {
    route: String,
    kind: ModuleKind,
    inner: Arc<dyn MetadataGenerator>,
}

impl MetadataGenerator for TracedGenerator {
    fn generate(&self, props: RouteProps, parent: ParentMetadata) -> GeneratorFuture {
        debug!("generate"; "{} ({})", self.route, self.kind);
        self.inner.generate(props, parent)
    }
}

fn extract_declaration(
    module: SegmentModule,
    kind: ModuleKind,
    route: &str,
) -> Option<Declaration> {
    if let Some(inner) = module.generate_metadata {
        return Some(Declaration::Dynamic(Arc::new(TracedGenerator {
            route: route.to_owned(),
            kind,
            inner,
        })));
    }
    module.metadata.map(Declaration::Static)
}

/// Collect the metadata item of one segment.
pub async fn collect_segment_metadata(
    segment: &RouteSegment,
    loader: &dyn ModuleLoader,
) -> Result<MetadataItem, MetadataError> {
    let declaration = match loader.load(segment) {
        Some((module, kind)) if loader.is_client_boundary(&module) => {
            debug!("collect"; "{} {} is a client boundary, metadata ignored", kind, segment.route);
            None
        }
        Some((module, kind)) => extract_declaration(module, kind, &segment.route),
        None => None,
    };
    let static_metadata = collect_static_metadata(&segment.assets).await?;

    Ok(MetadataItem {
        route: segment.route.clone(),
        depth: segment.depth,
        declaration,
        static_metadata,
    })
}
