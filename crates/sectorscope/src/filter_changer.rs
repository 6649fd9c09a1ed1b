//! Range-driven bulk edits of the filter state.
//!
//! These back the highlight and ignore buttons of the filters panel. Each
//! operation fires at most one filter notification and reports whether the
//! state actually changed; operations that need a range do nothing while no
//! range is selected.

use std::collections::BTreeSet;

use crate::filters::{FilterState, Filters};
use crate::range::{ByteRange, RangeSelection};
use crate::scan::{ScanData, SourceId};

type SetPicker<T> = fn(&mut FilterState) -> &mut BTreeSet<T>;

/// Digests of matched blocks whose image offset lies in `range`.
pub fn hashes_in_range(scan: &ScanData, range: ByteRange) -> BTreeSet<String> {
    scan.forensic_offsets
        .range(range.start..=range.stop)
        .map(|(_, digest)| digest.clone())
        .collect()
}

/// Sources contributing any digest matched inside `range`.
pub fn sources_with_hashes_in_range(scan: &ScanData, range: ByteRange) -> BTreeSet<SourceId> {
    hashes_in_range(scan, range)
        .iter()
        .flat_map(|digest| scan.sources_of(digest))
        .collect()
}

/// Bulk filter operations over the selected range.
pub struct FilterChanger<'a> {
    scan: &'a ScanData,
    filters: &'a mut Filters,
    range_selection: &'a RangeSelection,
}

impl<'a> FilterChanger<'a> {
    pub fn new(
        scan: &'a ScanData,
        filters: &'a mut Filters,
        range_selection: &'a RangeSelection,
    ) -> Self {
        Self {
            scan,
            filters,
            range_selection,
        }
    }

    fn selected_hashes(&self) -> Option<BTreeSet<String>> {
        self.range_selection
            .range()
            .map(|r| hashes_in_range(self.scan, r))
    }

    fn selected_sources(&self) -> Option<BTreeSet<SourceId>> {
        self.range_selection
            .range()
            .map(|r| sources_with_hashes_in_range(self.scan, r))
    }

    /// Add `items` to the set chosen by `pick`; notify when it grew.
    fn extend_set<T: Ord>(&mut self, items: Option<BTreeSet<T>>, pick: SetPicker<T>) -> bool {
        let Some(items) = items else {
            return false;
        };
        self.filters.update_if(|s| {
            let set = pick(s);
            let before = set.len();
            set.extend(items);
            set.len() != before
        })
    }

    /// Empty the set chosen by `pick`; notify when it was non-empty.
    fn clear_set<T: Ord>(&mut self, pick: SetPicker<T>) -> bool {
        self.filters.update_if(|s| {
            let set = pick(s);
            let had_items = !set.is_empty();
            set.clear();
            had_items
        })
    }

    pub fn highlight_hashes_in_range(&mut self) -> bool {
        let items = self.selected_hashes();
        self.extend_set(items, |s| &mut s.highlighted_hashes)
    }

    pub fn highlight_sources_with_hashes_in_range(&mut self) -> bool {
        let items = self.selected_sources();
        self.extend_set(items, |s| &mut s.highlighted_sources)
    }

    pub fn clear_highlighted_hashes(&mut self) -> bool {
        self.clear_set(|s| &mut s.highlighted_hashes)
    }

    pub fn clear_highlighted_sources(&mut self) -> bool {
        self.clear_set(|s| &mut s.highlighted_sources)
    }

    pub fn ignore_hashes_in_range(&mut self) -> bool {
        let items = self.selected_hashes();
        self.extend_set(items, |s| &mut s.ignored_hashes)
    }

    pub fn ignore_sources_with_hashes_in_range(&mut self) -> bool {
        let items = self.selected_sources();
        self.extend_set(items, |s| &mut s.ignored_sources)
    }

    pub fn clear_ignored_hashes(&mut self) -> bool {
        self.clear_set(|s| &mut s.ignored_hashes)
    }

    pub fn clear_ignored_sources(&mut self) -> bool {
        self.clear_set(|s| &mut s.ignored_sources)
    }
}
