//! Metadata data model.
//!
//! - [`Metadata`] / [`Declaration`]: what a segment exports
//! - [`StaticMetadata`]: static asset descriptors discovered for a segment
//! - [`MetadataItem`]: one entry of the accumulation fold
//! - [`ResolvedMetadata`]: the merged, normalized result

mod declaration;
mod error;
mod resolved;

pub use declaration::{
    Declaration, GeneratorFuture, Metadata, MetadataGenerator, MetadataImage, MetadataItem,
    RouteProps, StaticMetadata,
};
pub use error::MetadataError;
pub use resolved::*;

/// Raw JSON object.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;
