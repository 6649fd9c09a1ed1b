//! Filter state shared between the views.
//!
//! `Filters` owns the user's marks on sources and hashes together with the
//! listener list that is notified when they change. Every public mutation
//! fires the listeners exactly once, including bulk replacements such as
//! "filter all sources"; callers needing several edits in one notification
//! use [`Filters::update`].

use std::collections::BTreeSet;

use tracing::debug;

use crate::notify::{ChangeNotifier, ListenerId};
use crate::scan::{ScanData, SourceId};

/// Snapshot of all filter marks and settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Sources toggled in the sources list.
    pub filtered_sources: BTreeSet<SourceId>,
    /// Digests toggled from the hex view.
    pub filtered_hashes: BTreeSet<String>,
    pub ignored_sources: BTreeSet<SourceId>,
    pub ignored_hashes: BTreeSet<String>,
    pub highlighted_sources: BTreeSet<SourceId>,
    pub highlighted_hashes: BTreeSet<String>,
    /// Ignore hashes shared by more than this many sources; 0 disables the rule.
    pub ignore_max_hashes: usize,
    /// Ignore blocks carrying scanner flags.
    pub ignore_flagged_blocks: bool,
}

impl FilterState {
    pub fn is_source_filtered(&self, source_id: SourceId) -> bool {
        self.filtered_sources.contains(&source_id)
    }

    pub fn is_hash_filtered(&self, digest: &str) -> bool {
        self.filtered_hashes.contains(digest)
    }

    /// Whether a matched block with `digest` is excluded from the histogram.
    pub fn is_block_ignored(&self, digest: &str, scan: &ScanData) -> bool {
        if self.ignored_hashes.contains(digest) {
            return true;
        }
        if self.ignore_flagged_blocks && scan.flagged_hashes.contains(digest) {
            return true;
        }
        let Some(occurrences) = scan.hashes.get(digest) else {
            return false;
        };
        if self.ignore_max_hashes > 0 {
            let distinct: BTreeSet<SourceId> = occurrences.iter().map(|o| o.source_id).collect();
            if distinct.len() > self.ignore_max_hashes {
                return true;
            }
        }
        occurrences
            .iter()
            .any(|o| self.ignored_sources.contains(&o.source_id))
    }

    /// Whether a matched block with `digest` is drawn highlighted.
    pub fn is_block_highlighted(&self, digest: &str, scan: &ScanData) -> bool {
        if self.highlighted_hashes.contains(digest) {
            return true;
        }
        scan.hashes.get(digest).is_some_and(|occ| {
            occ.iter()
                .any(|o| self.highlighted_sources.contains(&o.source_id))
        })
    }
}

/// Filter state plus its change listeners.
#[derive(Debug, Default)]
pub struct Filters {
    state: FilterState,
    notifier: ChangeNotifier<FilterState>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: FilterState) -> Self {
        Self {
            state,
            notifier: ChangeNotifier::new(),
        }
    }

    /// Current state, for pull-style readers.
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Register a listener called after every change.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&FilterState) + 'static,
    {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Apply an arbitrary mutation and notify once.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut FilterState) -> R) -> R {
        let result = f(&mut self.state);
        self.fire_change();
        result
    }

    /// Apply a mutation that reports whether it changed anything; notify
    /// only if it did.
    pub fn update_if(&mut self, f: impl FnOnce(&mut FilterState) -> bool) -> bool {
        let changed = f(&mut self.state);
        if changed {
            self.fire_change();
        }
        changed
    }

    /// Notify listeners with the current state.
    pub fn fire_change(&mut self) {
        debug!(
            filtered_sources = self.state.filtered_sources.len(),
            filtered_hashes = self.state.filtered_hashes.len(),
            "filters changed"
        );
        self.notifier.fire(&self.state);
    }

    /// Toggle one source's filtered mark. Returns true if it is now filtered.
    pub fn toggle_source(&mut self, source_id: SourceId) -> bool {
        self.update(|s| {
            if s.filtered_sources.remove(&source_id) {
                false
            } else {
                s.filtered_sources.insert(source_id);
                true
            }
        })
    }

    /// Replace the filtered sources with `ids`.
    pub fn set_filtered_sources(&mut self, ids: impl IntoIterator<Item = SourceId>) {
        let ids: BTreeSet<SourceId> = ids.into_iter().collect();
        self.update(|s| s.filtered_sources = ids);
    }

    pub fn clear_filtered_sources(&mut self) {
        self.update(|s| s.filtered_sources.clear());
    }

    pub fn set_ignore_max_hashes(&mut self, max: usize) {
        self.update(|s| s.ignore_max_hashes = max);
    }

    pub fn set_ignore_flagged_blocks(&mut self, ignore: bool) {
        self.update(|s| s.ignore_flagged_blocks = ignore);
    }
}
