//! Accumulation engine.
//!
//! Folds the ordered [`MetadataItem`] list (root first, leaf last) into one
//! [`ResolvedMetadata`].
//!
//! # Dynamic declarations
//!
//! ```text
//! items:     [static] [dyn A] [static] [dyn B] [dyn C]
//!                        |                |       |
//! launch:                +-- all three spawned at once, each with its own
//!                            parent placeholder
//! fold:      merge 0 -> resolve A's parent -> await A -> merge 1 -> merge 2
//!            -> resolve B's parent -> await B -> merge 3 -> ...
//! ```
//!
//! Generators start together, but generator `i` only ever observes the
//! state merged from levels `0..i`: its placeholder is resolved when the
//! fold reaches it, after every earlier level has been merged.

mod merge;
mod parent;


use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::debug;
use crate::metadata::{
    Declaration, Metadata, MetadataError, MetadataItem, ResolvedMetadata, RouteProps,
};
use crate::resolve::TitleTemplates;

pub use merge::merge;
pub use parent::ParentMetadata;
use parent::{ParentResolver, placeholder};

/// How the accumulator is handed to a generator's parent placeholder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotPolicy {
    /// Deep copy per placeholder. Generators never share state with the fold.
    #[default]
    Detached,
    /// Hand out the live accumulator. A later merge copies it on write if a
    /// generator still holds the snapshot.
    Shared,
}

impl SnapshotPolicy {
    fn snapshot(self, resolved: &Arc<ResolvedMetadata>) -> Arc<ResolvedMetadata> {
        match self {
            Self::Detached => Arc::new(ResolvedMetadata::clone(resolved)),
            Self::Shared => Arc::clone(resolved),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccumulateOptions {
    /// Props passed to every generator.
    pub props: RouteProps,
    pub snapshot: SnapshotPolicy,
}

struct PendingGenerator {
    route: String,
    parent: ParentResolver,
    task: JoinHandle<anyhow::Result<Metadata>>,
}

/// Generators launched on the first dynamic declaration, in list order.
struct LaunchedGenerators {
    pending: VecDeque<PendingGenerator>,
}

impl LaunchedGenerators {
    /// Spawn every dynamic declaration of `items`.
    fn launch(items: &[MetadataItem], props: &RouteProps) -> Self {
        let pending: VecDeque<_> = items
            .iter()
            .filter_map(|item| match &item.declaration {
                Some(Declaration::Dynamic(generator)) => Some((item, generator)),
                _ => None,
            })
            .map(|(item, generator)| {
                let (parent, parent_metadata) = placeholder();
                let task = tokio::spawn(generator.generate(props.clone(), parent_metadata));
                PendingGenerator {
                    route: item.route.clone(),
                    parent,
                    task,
                }
            })
            .collect();

        debug!("accumulate"; "launched {} generator(s)", pending.len());
        Self { pending }
    }

    /// Unblock the next generator with `snapshot` and wait for its result.
    async fn next(&mut self, snapshot: Arc<ResolvedMetadata>) -> Result<Metadata, MetadataError> {
        // Launch covers every dynamic item from the first one onward, and
        // items are consumed in the same order.
        let Some(PendingGenerator {
            route,
            parent,
            task,
        }) = self.pending.pop_front()
        else {
            unreachable!("dynamic declaration without a launched generator");
        };

        parent.resolve(snapshot);
        match task.await {
            Ok(Ok(metadata)) => Ok(metadata),
            Ok(Err(source)) => Err(MetadataError::Generator { route, source }),
            Err(_) => Err(MetadataError::GeneratorPanicked { route }),
        }
    }
}

/// Fold `items` into the resolved metadata of the route.
///
/// Must run inside a Tokio runtime: dynamic declarations are spawned as
/// tasks. The first failing generator aborts the fold; generators launched
/// after it are left to finish on their own and their results are dropped.
pub async fn accumulate_metadata(
    items: &[MetadataItem],
    options: &AccumulateOptions,
) -> Result<ResolvedMetadata, MetadataError> {
    let mut resolved = Arc::new(ResolvedMetadata::default());
    let mut templates = TitleTemplates::default();
    let mut launched: Option<LaunchedGenerators> = None;

    for (index, item) in items.iter().enumerate() {
        let generated: Metadata;
        let source = match &item.declaration {
            Some(Declaration::Dynamic(_)) => {
                let generators = launched.get_or_insert_with(|| {
                    LaunchedGenerators::launch(&items[index..], &options.props)
                });
                // Placeholder `i` sees exactly the merge of levels `0..i`.
                generated = generators.next(options.snapshot.snapshot(&resolved)).await?;
                Some(&generated)
            }
            Some(Declaration::Static(metadata)) => Some(metadata),
            None => None,
        };

        // Writes only happen here, after the snapshot for this level was
        // taken; `make_mut` copies if a generator still holds that snapshot.
        merge(
            Arc::make_mut(&mut resolved),
            source,
            item.static_metadata.as_ref(),
            &templates,
        )?;
        debug!("accumulate"; "merged level {} ({})", index, item.route);

        if !shares_level_with_next(items, index) {
            templates = TitleTemplates::from_resolved(&resolved);
        }
    }

    Ok(Arc::unwrap_or_clone(resolved))
}

/// A leaf layout and its page share one level: the layout's title
/// templates must not apply to the page.
fn shares_level_with_next(items: &[MetadataItem], index: usize) -> bool {
    items
        .get(index + 1)
        .is_some_and(|next| next.depth == items[index].depth)
}
