//! Route metadata resolution.
//!
//! Layouts and pages of a route each declare metadata, statically or with a
//! generator that may read the metadata already resolved by their ancestors.
//! This crate folds those declarations, root first, into one normalized
//! [`ResolvedMetadata`](metadata::ResolvedMetadata) record for a head renderer.
//!
//! ```text
//! segments ──collect──▶ [MetadataItem] ──accumulate──▶ ResolvedMetadata
//!              │                            │
//!       static assets                 resolve (normalizers)
//! ```

pub mod accumulate;
pub mod asset;
pub mod cli;
pub mod collect;
pub mod config;
pub mod logger;
pub mod metadata;
pub mod resolve;
