//! Metadata declarations exported by route segments.
//!
//! A segment declares metadata either as a static object ([`Metadata`]) or
//! as a generator ([`MetadataGenerator`]) that may depend on the resolved
//! metadata of its ancestors.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::JsonMap;
use crate::accumulate::ParentMetadata;

/// Raw metadata object as declared by a layout or page.
///
/// Keys use the declaration's field names (`title`, `openGraph`,
/// `metadataBase`, ...). Values stay raw until merged into
/// [`ResolvedMetadata`](super::ResolvedMetadata).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(JsonMap);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Declared fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<JsonMap> for Metadata {
    fn from(map: JsonMap) -> Self {
        Self(map)
    }
}

/// Non-object values carry no fields and become an empty declaration.
impl From<Value> for Metadata {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

/// Props handed to every generator of one render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RouteProps {
    pub params: FxHashMap<String, String>,
    pub search_params: FxHashMap<String, String>,
}

impl RouteProps {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Future returned by [`MetadataGenerator::generate`].
pub type GeneratorFuture = BoxFuture<'static, anyhow::Result<Metadata>>;

/// Dynamic metadata declaration (`generateMetadata`).
///
/// The returned future is spawned onto the runtime as soon as the first
/// dynamic declaration of a route is reached, so it must not borrow from
/// the generator. `parent` resolves to the merged metadata of all earlier
/// segments; a generator that never awaits it is never blocked on ancestors.
pub trait MetadataGenerator: Send + Sync {
    fn generate(&self, props: RouteProps, parent: ParentMetadata) -> GeneratorFuture;
}

impl<F, Fut> MetadataGenerator for F
where
    F: Fn(RouteProps, ParentMetadata) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Metadata>> + Send + 'static,
{
    fn generate(&self, props: RouteProps, parent: ParentMetadata) -> GeneratorFuture {
        Box::pin(self(props, parent))
    }
}

/// A segment's exported metadata.
#[derive(Clone)]
pub enum Declaration {
    Static(Metadata),
    Dynamic(Arc<dyn MetadataGenerator>),
}

impl Declaration {
    pub fn dynamic(generator: impl MetadataGenerator + 'static) -> Self {
        Self::Dynamic(Arc::new(generator))
    }
}

impl From<Metadata> for Declaration {
    fn from(metadata: Metadata) -> Self {
        Self::Static(metadata)
    }
}

impl fmt::Debug for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(metadata) => f.debug_tuple("Static").field(metadata).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Static asset descriptor produced by the image pipeline
/// (`MetadataImageModule`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataImage {
    pub url: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl MetadataImage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

/// Static assets of one segment, per family.
///
/// `None` means "no static files of this family", which is different from
/// an empty list and never clobbers declared values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticMetadata {
    pub icon: Option<Vec<MetadataImage>>,
    pub apple: Option<Vec<MetadataImage>>,
    pub open_graph: Option<Vec<MetadataImage>>,
    pub twitter: Option<Vec<MetadataImage>>,
}

/// One unit of the accumulation fold.
#[derive(Debug, Clone, Default)]
pub struct MetadataItem {
    /// Route path of the segment, used to label generator failures.
    pub route: String,
    /// Nesting level. A leaf layout and its page share one level.
    pub depth: usize,
    pub declaration: Option<Declaration>,
    pub static_metadata: Option<StaticMetadata>,
}

impl MetadataItem {
    pub fn new(route: impl Into<String>, depth: usize) -> Self {
        Self {
            route: route.into(),
            depth,
            declaration: None,
            static_metadata: None,
        }
    }

    pub fn with_declaration(mut self, declaration: impl Into<Declaration>) -> Self {
        self.declaration = Some(declaration.into());
        self
    }

    pub fn with_static(mut self, static_metadata: StaticMetadata) -> Self {
        self.static_metadata = Some(static_metadata);
        self
    }
}
