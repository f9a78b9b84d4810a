//! Manifest segments as route segments and loadable modules.

use std::path::{Component, Path};
use std::sync::Arc;

use super::generate::TemplateGenerator;
use super::{AssetEntry, RouteManifest, SegmentEntry};
use crate::asset::{AssetFamily, file_producer, mime};
use crate::collect::{
    AssetProducer, ModuleKind, ModuleLoader, RouteSegment, SegmentModule, StaticAssetSources,
    producer,
};
use crate::metadata::{MetadataGenerator, MetadataImage};

/// Serves the modules declared in a manifest, keyed by segment position.
#[derive(Debug, Default)]
pub struct ManifestLoader {
    modules: Vec<(SegmentModule, ModuleKind)>,
}

impl ModuleLoader for ManifestLoader {
    fn load(&self, segment: &RouteSegment) -> Option<(SegmentModule, ModuleKind)> {
        let index: usize = segment.key.parse().ok()?;
        self.modules.get(index).cloned()
    }
}

impl RouteManifest {
    /// Segments in manifest order, plus the loader serving their modules.
    pub fn route(&self) -> (Vec<RouteSegment>, ManifestLoader) {
        let assets = self.assets_dir();
        let segments = self
            .segments
            .iter()
            .enumerate()
            .map(|(index, entry)| RouteSegment {
                route: entry.route.clone(),
                depth: entry.depth,
                key: index.to_string(),
                assets: entry_assets(entry, &assets),
            })
            .collect();
        let modules = self.segments.iter().map(entry_module).collect();
        (segments, ManifestLoader { modules })
    }
}

fn entry_module(entry: &SegmentEntry) -> (SegmentModule, ModuleKind) {
    let generate_metadata = entry.generate.clone().map(|template| {
        Arc::new(TemplateGenerator::new(template)) as Arc<dyn MetadataGenerator>
    });
    let module = SegmentModule {
        metadata: entry.metadata.clone(),
        generate_metadata,
        client_reference: entry.client,
    };
    (module, entry.kind)
}

fn entry_assets(entry: &SegmentEntry, assets: &Path) -> StaticAssetSources {
    let producers = |entries: &[AssetEntry], family| -> Vec<AssetProducer> {
        entries
            .iter()
            .map(|asset| asset_producer(asset, assets, family))
            .collect()
    };
    StaticAssetSources {
        icon: producers(&entry.icon, AssetFamily::Icon),
        apple: producers(&entry.apple, AssetFamily::Apple),
        open_graph: producers(&entry.open_graph, AssetFamily::OpenGraph),
        twitter: producers(&entry.twitter, AssetFamily::Twitter),
    }
}

fn asset_producer(entry: &AssetEntry, assets: &Path, family: AssetFamily) -> AssetProducer {
    match entry {
        AssetEntry::File(path) => file_producer(assets.join(path), public_url(path), family, None),
        AssetEntry::Inline(inline) => match &inline.path {
            Some(path) => file_producer(
                assets.join(path),
                inline.url.clone().unwrap_or_else(|| public_url(path)),
                family,
                inline.alt.clone(),
            ),
            None => {
                let url = inline.url.clone().unwrap_or_default();
                let image = MetadataImage {
                    mime: inline
                        .mime
                        .clone()
                        .or_else(|| mime::from_path(Path::new(&url)).map(str::to_owned)),
                    width: inline.width,
                    height: inline.height,
                    sizes: inline.sizes.clone(),
                    alt: inline.alt.clone(),
                    url,
                };
                producer(move || {
                    let image = image.clone();
                    async move { anyhow::Ok(image) }
                })
            }
        },
    }
}

/// Public URL of an asset file, relative to the assets directory.
fn public_url(path: &Path) -> String {
    let parts: Vec<_> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();
    format!("/{}", parts.join("/"))
}
