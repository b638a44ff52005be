//! Keeps the selected place and the navigable URL in agreement.
//!
//! Selection changes arrive from two directions: the user picks a place
//! that is already resolved (map marker, search result, calendar stop),
//! or the URL changes underneath us (shared link, back/forward). The
//! synchronizer drives whichever side did not originate the change and
//! refuses to echo a change back to its origin. In-flight resolutions
//! carry a generation stamp so a completion for a superseded selection is
//! discarded instead of clobbering newer state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::domain::place::{PlaceId, PlaceRecord};
use crate::domain::place_resolver::{PlaceResolver, ResolveError};
use crate::domain::ports::{PlaceSource, PlaceStore, UrlState};

/// Where the current selection stands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionState {
    /// Nothing is selected.
    #[default]
    Idle,
    /// An id arrived from navigation and its record is being resolved.
    Resolving {
        /// The id being resolved.
        target: PlaceId,
    },
    /// A resolved record is selected and displayed.
    Selected {
        /// The selected record.
        record: PlaceRecord,
    },
}

impl SelectionState {
    /// The place id this state refers to, if any.
    #[must_use]
    pub fn place_id(&self) -> Option<&PlaceId> {
        match self {
            Self::Idle => None,
            Self::Resolving { target } => Some(target),
            Self::Selected { record } => Some(record.id()),
        }
    }
}

/// What applying a navigation change amounted to.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    /// The navigated-to place resolved and is now selected.
    Applied(PlaceRecord),
    /// The navigation echoed the current selection; nothing happened.
    Unchanged,
    /// A newer selection landed while this one was resolving; the result
    /// was discarded.
    Superseded,
    /// The navigation carried no place; the selection was cleared.
    Cleared,
}

struct SyncInner {
    state: SelectionState,
    generation: u64,
}

/// Two-way synchronizer between the selected place and the URL.
pub struct SelectionSync<P, S, U> {
    resolver: Arc<PlaceResolver<P, S>>,
    url: Arc<U>,
    inner: Mutex<SyncInner>,
}

impl<P, S, U> SelectionSync<P, S, U> {
    /// Create an idle synchronizer over the resolver and URL state.
    pub fn new(resolver: Arc<PlaceResolver<P, S>>, url: Arc<U>) -> Self {
        Self {
            resolver,
            url,
            inner: Mutex::new(SyncInner {
                state: SelectionState::Idle,
                generation: 0,
            }),
        }
    }

    fn lock_inner(&self) -> MutexGuard<'_, SyncInner> {
        // A panicking writer leaves the state usable; recover the guard
        // rather than poisoning every later call.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The current selection state.
    #[must_use]
    pub fn current(&self) -> SelectionState {
        self.lock_inner().state.clone()
    }
}

impl<P, S, U> SelectionSync<P, S, U>
where
    P: PlaceSource,
    S: PlaceStore,
    U: UrlState,
{
    /// Select a place whose record is already in hand.
    ///
    /// Used when the user picks a marker, search result, or calendar stop
    /// the engine has already resolved. The selection becomes current
    /// immediately, any in-flight navigation resolution is superseded,
    /// and the id is written into the URL so the location is shareable.
    pub fn select_resolved(&self, record: PlaceRecord) {
        let id = record.id().clone();
        {
            let mut inner = self.lock_inner();
            inner.generation += 1;
            inner.state = SelectionState::Selected { record };
        }
        self.url.set_place_param(Some(&id));
        debug!(place_id = %id, "selection applied from interaction");
    }

    /// Apply a place id observed in the URL.
    ///
    /// `None` clears the selection. An id matching the current selection
    /// is the echo of our own URL write and is ignored. A new id enters
    /// `Resolving` and resolves through the shared cache; if a newer
    /// selection lands first, the stale completion is discarded. The URL
    /// already holds the id, so no URL write happens on this path.
    ///
    /// # Errors
    ///
    /// Returns the [`ResolveError`] when the navigated-to id cannot be
    /// resolved; the selection falls back to idle.
    pub async fn apply_navigation(
        &self,
        target: Option<PlaceId>,
    ) -> Result<NavigationOutcome, ResolveError> {
        let Some(target) = target else {
            let mut inner = self.lock_inner();
            inner.generation += 1;
            inner.state = SelectionState::Idle;
            debug!("selection cleared from navigation");
            return Ok(NavigationOutcome::Cleared);
        };

        let generation = {
            let mut inner = self.lock_inner();
            if inner.state.place_id() == Some(&target) {
                return Ok(NavigationOutcome::Unchanged);
            }
            inner.generation += 1;
            inner.state = SelectionState::Resolving {
                target: target.clone(),
            };
            inner.generation
        };

        let resolution = self.resolver.resolve(&target).await;

        let mut inner = self.lock_inner();
        if inner.generation != generation {
            debug!(place_id = %target, "discarding superseded selection");
            return Ok(NavigationOutcome::Superseded);
        }
        match resolution {
            Ok(record) => {
                inner.state = SelectionState::Selected {
                    record: record.clone(),
                };
                debug!(place_id = %target, "selection applied from navigation");
                Ok(NavigationOutcome::Applied(record))
            }
            Err(err) => {
                inner.state = SelectionState::Idle;
                Err(err)
            }
        }
    }

    /// Dismiss the current selection.
    ///
    /// Returns to idle, supersedes any in-flight resolution, and clears
    /// the place parameter from the URL.
    pub fn dismiss(&self) {
        {
            let mut inner = self.lock_inner();
            inner.generation += 1;
            inner.state = SelectionState::Idle;
        }
        self.url.set_place_param(None);
        debug!("selection dismissed");
    }
}

#[cfg(test)]
#[path = "selection_tests.rs"]
mod tests;
