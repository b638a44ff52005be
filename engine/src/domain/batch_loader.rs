//! Best-effort batch resolution for marker sets.
//!
//! Rendering a trip needs every favorite or scheduled stop resolved at
//! once. The loader deduplicates the requested ids, resolves them
//! concurrently through the shared [`PlaceResolver`], and drops members
//! that fail rather than failing the batch. Callers key the results by
//! place id; the collection order is unspecified.

use std::collections::HashSet;
use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::domain::place::{PlaceId, PlaceRecord};
use crate::domain::place_resolver::PlaceResolver;
use crate::domain::ports::{PlaceSource, PlaceStore};

/// Resolves whole identifier sets through the shared resolver.
pub struct BatchLoader<P, S> {
    resolver: Arc<PlaceResolver<P, S>>,
}

impl<P, S> BatchLoader<P, S> {
    /// Create a loader over the shared resolver.
    pub fn new(resolver: Arc<PlaceResolver<P, S>>) -> Self {
        Self { resolver }
    }
}

impl<P, S> BatchLoader<P, S>
where
    P: PlaceSource,
    S: PlaceStore,
{
    /// Resolve every distinct id in the batch, dropping failures.
    ///
    /// Repeats within the batch are resolved once. An empty batch
    /// completes immediately without touching the resolver. Members that
    /// fail to resolve are logged and omitted so one unusable place never
    /// blocks rendering the others; callers must tolerate partial results
    /// and must not assume the collection order matches the input.
    pub async fn load_all(&self, ids: &[PlaceId]) -> Vec<PlaceRecord> {
        let mut seen = HashSet::new();
        let unique: Vec<&PlaceId> = ids.iter().filter(|id| seen.insert(*id)).collect();
        if unique.is_empty() {
            return Vec::new();
        }

        let resolutions = join_all(unique.into_iter().map(|id| {
            let resolver = &self.resolver;
            async move { (id, resolver.resolve(id).await) }
        }))
        .await;

        let mut records = Vec::with_capacity(resolutions.len());
        for (id, resolution) in resolutions {
            match resolution {
                Ok(record) => records.push(record),
                Err(err) => {
                    warn!(place_id = %id, error = %err, "dropping unresolvable batch member");
                }
            }
        }

        debug!(requested = ids.len(), resolved = records.len(), "batch resolved");
        records
    }
}
