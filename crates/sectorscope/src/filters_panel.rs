//! State of the filters panel controls.
//!
//! The panel mirrors part of the filter state in editable controls (the max
//! duplicate hashes entry and the auto-filter checkbox). Two entry points
//! keep the mirroring from looping:
//!  - [`FiltersPanel::sync_from`] copies the filter state into the controls
//!    and never notifies,
//!  - the `commit_*` methods apply a user edit and notify only when the
//!    value really changed.

use crate::filters::{FilterState, Filters};
use crate::range::RangeSelection;

/// Text shown in the max duplicate hashes entry when the rule is off.
pub const NO_LIMIT_TEXT: &str = "None";

/// Parse the max duplicate hashes entry. Anything that is not a
/// non-negative integer turns the rule off.
pub fn parse_max_hashes(text: &str) -> usize {
    text.trim().parse().unwrap_or(0)
}

/// Render a max duplicate hashes value for the entry.
pub fn max_hashes_text(max: usize) -> String {
    if max == 0 {
        NO_LIMIT_TEXT.to_string()
    } else {
        max.to_string()
    }
}

/// Enabled state of every panel button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterButtons {
    pub highlight_hashes_in_range: bool,
    pub highlight_sources_with_hashes_in_range: bool,
    pub clear_highlighted_hashes: bool,
    pub clear_highlighted_sources: bool,
    pub ignore_hashes_in_range: bool,
    pub ignore_sources_with_hashes_in_range: bool,
    pub clear_ignored_hashes: bool,
    pub clear_ignored_sources: bool,
}

impl FilterButtons {
    pub fn derive(state: &FilterState, range: &RangeSelection) -> Self {
        let selected = range.is_selected();
        Self {
            highlight_hashes_in_range: selected,
            highlight_sources_with_hashes_in_range: selected,
            clear_highlighted_hashes: !state.highlighted_hashes.is_empty(),
            clear_highlighted_sources: !state.highlighted_sources.is_empty(),
            ignore_hashes_in_range: selected,
            ignore_sources_with_hashes_in_range: selected,
            clear_ignored_hashes: !state.ignored_hashes.is_empty(),
            clear_ignored_sources: !state.ignored_sources.is_empty(),
        }
    }
}

/// Editable controls of the filters panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiltersPanel {
    /// Text of the max duplicate hashes entry, edited in place by the UI.
    pub max_hashes_entry: String,
    /// Checkbox value, edited in place by the UI.
    pub ignore_flagged_blocks: bool,
    pub buttons: FilterButtons,
}

impl Default for FiltersPanel {
    fn default() -> Self {
        Self {
            max_hashes_entry: NO_LIMIT_TEXT.to_string(),
            ignore_flagged_blocks: false,
            buttons: FilterButtons::default(),
        }
    }
}

impl FiltersPanel {
    pub fn new(state: &FilterState, range: &RangeSelection) -> Self {
        let mut panel = Self::default();
        panel.sync_from(state);
        panel.sync_range(state, range);
        panel
    }

    /// Copy filter state into the controls. Never notifies.
    pub fn sync_from(&mut self, state: &FilterState) {
        self.max_hashes_entry = max_hashes_text(state.ignore_max_hashes);
        self.ignore_flagged_blocks = state.ignore_flagged_blocks;
    }

    /// Recompute button enablement after a filter or range change.
    pub fn sync_range(&mut self, state: &FilterState, range: &RangeSelection) {
        self.buttons = FilterButtons::derive(state, range);
    }

    /// The user finished editing the entry (return or focus lost).
    ///
    /// Normalizes the entry text and notifies only if the value changed.
    pub fn commit_max_hashes_entry(&mut self, filters: &mut Filters) -> bool {
        let max = parse_max_hashes(&self.max_hashes_entry);
        self.max_hashes_entry = max_hashes_text(max);
        if max == filters.state().ignore_max_hashes {
            return false;
        }
        filters.set_ignore_max_hashes(max);
        true
    }

    /// The user toggled the auto-filter checkbox.
    pub fn commit_ignore_flagged_blocks(&mut self, filters: &mut Filters) -> bool {
        if self.ignore_flagged_blocks == filters.state().ignore_flagged_blocks {
            return false;
        }
        filters.set_ignore_flagged_blocks(self.ignore_flagged_blocks);
        true
    }
}
