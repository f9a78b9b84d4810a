//! Metadata resolution errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a metadata resolution.
///
/// Malformed field values are not represented here: normalizers degrade the
/// offending field to `null` instead of failing.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("invalid metadataBase `{0}`")]
    InvalidMetadataBase(String),

    #[error("cannot resolve `{url}` against metadataBase")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid image format for `{}`: {reason}", .path.display())]
    InvalidImageFormat { path: PathBuf, reason: String },

    #[error("IO error when reading `{}`", .0.display())]
    AssetIo(PathBuf, #[source] std::io::Error),

    #[error("static asset resolution failed")]
    Asset(#[source] anyhow::Error),

    #[error("generateMetadata failed for `{route}`")]
    Generator {
        route: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("generateMetadata panicked for `{route}`")]
    GeneratorPanicked { route: String },

    // NOTE: only observable by generators still running after the fold aborted
    #[error("parent metadata was dropped before it resolved")]
    ParentAborted,
}

impl MetadataError {
    /// Recover a typed error from a producer's `anyhow::Error`, if it carries one.
    pub(crate) fn from_producer(err: anyhow::Error) -> Self {
        match err.downcast::<MetadataError>() {
            Ok(err) => err,
            Err(err) => Self::Asset(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_producer_keeps_typed_error() {
        let err = anyhow::Error::new(MetadataError::InvalidImageFormat {
            path: PathBuf::from("icon.gif"),
            reason: "unsupported".into(),
        });
        assert!(matches!(
            MetadataError::from_producer(err),
            MetadataError::InvalidImageFormat { .. }
        ));
    }

    #[test]
    fn test_from_producer_wraps_foreign_error() {
        let err = anyhow::anyhow!("network down");
        let wrapped = MetadataError::from_producer(err);
        assert!(matches!(wrapped, MetadataError::Asset(_)));
        assert_eq!(wrapped.to_string(), "static asset resolution failed");
    }
}
