//! Single-assignment parent placeholders.
//!
//! One placeholder per dynamic declaration, created before any generator
//! runs. The fold resolves placeholder `i` exactly once, with the metadata
//! merged from every level before generator `i`.

use std::sync::Arc;

use tokio::sync::oneshot;

use crate::metadata::{MetadataError, ResolvedMetadata};

/// Promise of the parent levels' resolved metadata, handed to a generator.
#[derive(Debug)]
pub struct ParentMetadata {
    rx: oneshot::Receiver<Arc<ResolvedMetadata>>,
}

impl ParentMetadata {
    /// Wait for ancestors to be merged.
    ///
    /// Fails with [`MetadataError::ParentAborted`] if the fold was abandoned
    /// before reaching this generator's level.
    pub async fn resolve(self) -> Result<Arc<ResolvedMetadata>, MetadataError> {
        self.rx.await.map_err(|_| MetadataError::ParentAborted)
    }

    /// An already-resolved parent, for invoking a generator outside the fold.
    pub fn ready(parent: ResolvedMetadata) -> Self {
        let (resolver, parent_metadata) = placeholder();
        resolver.resolve(Arc::new(parent));
        parent_metadata
    }
}

/// Write side of a [`ParentMetadata`].
#[derive(Debug)]
pub(crate) struct ParentResolver {
    tx: oneshot::Sender<Arc<ResolvedMetadata>>,
}

impl ParentResolver {
    /// A generator that dropped its parent without awaiting it is fine.
    pub(crate) fn resolve(self, snapshot: Arc<ResolvedMetadata>) {
        let _ = self.tx.send(snapshot);
    }
}

pub(crate) fn placeholder() -> (ParentResolver, ParentMetadata) {
    let (tx, rx) = oneshot::channel();
    (ParentResolver { tx }, ParentMetadata { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ready_parent() {
        let parent = ResolvedMetadata {
            description: Some("root".into()),
            ..Default::default()
        };
        let resolved = ParentMetadata::ready(parent).resolve().await.unwrap();
        assert_eq!(resolved.description.as_deref(), Some("root"));
    }

    #[tokio::test]
    async fn test_dropped_resolver_aborts() {
        let (resolver, parent) = placeholder();
        drop(resolver);
        assert!(matches!(
            parent.resolve().await,
            Err(MetadataError::ParentAborted)
        ));
    }

    #[tokio::test]
    async fn test_resolve_after_receiver_dropped() {
        let (resolver, parent) = placeholder();
        drop(parent);
        resolver.resolve(Arc::new(ResolvedMetadata::default()));
    }
}
