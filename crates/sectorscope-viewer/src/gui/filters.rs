//! Filters panel: range-driven highlight/ignore buttons and the ignore rules.

use eframe::egui;

use sectorscope::filter_changer::FilterChanger;
use sectorscope::filters_panel::FiltersPanel;

/// User input collected from the panel in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterAction {
    HighlightHashesInRange,
    HighlightSourcesWithHashesInRange,
    ClearHighlightedHashes,
    ClearHighlightedSources,
    IgnoreHashesInRange,
    IgnoreSourcesWithHashesInRange,
    ClearIgnoredHashes,
    ClearIgnoredSources,
    CommitMaxHashes,
    CommitIgnoreFlaggedBlocks,
}

impl FilterAction {
    /// Run a button action. Entry and checkbox commits go through the panel
    /// instead and do nothing here.
    pub fn apply(self, changer: &mut FilterChanger<'_>) -> bool {
        match self {
            FilterAction::HighlightHashesInRange => changer.highlight_hashes_in_range(),
            FilterAction::HighlightSourcesWithHashesInRange => {
                changer.highlight_sources_with_hashes_in_range()
            }
            FilterAction::ClearHighlightedHashes => changer.clear_highlighted_hashes(),
            FilterAction::ClearHighlightedSources => changer.clear_highlighted_sources(),
            FilterAction::IgnoreHashesInRange => changer.ignore_hashes_in_range(),
            FilterAction::IgnoreSourcesWithHashesInRange => {
                changer.ignore_sources_with_hashes_in_range()
            }
            FilterAction::ClearIgnoredHashes => changer.clear_ignored_hashes(),
            FilterAction::ClearIgnoredSources => changer.clear_ignored_sources(),
            FilterAction::CommitMaxHashes | FilterAction::CommitIgnoreFlaggedBlocks => false,
        }
    }
}

fn button(ui: &mut egui::Ui, enabled: bool, text: &str) -> bool {
    ui.add_enabled(enabled, egui::Button::new(text).min_size(egui::vec2(220.0, 0.0)))
        .clicked()
}

/// Draw the panel, editing `panel` in place. Returns what the user did.
pub fn show_filters(ui: &mut egui::Ui, panel: &mut FiltersPanel) -> Vec<FilterAction> {
    let mut actions = Vec::new();
    let b = panel.buttons;

    ui.heading("Highlight");
    if button(ui, b.highlight_hashes_in_range, "Hashes in range") {
        actions.push(FilterAction::HighlightHashesInRange);
    }
    if button(ui, b.highlight_sources_with_hashes_in_range, "Sources with hashes in range") {
        actions.push(FilterAction::HighlightSourcesWithHashesInRange);
    }
    if button(ui, b.clear_highlighted_hashes, "Clear highlighted hashes") {
        actions.push(FilterAction::ClearHighlightedHashes);
    }
    if button(ui, b.clear_highlighted_sources, "Clear highlighted sources") {
        actions.push(FilterAction::ClearHighlightedSources);
    }

    ui.add_space(8.0);
    ui.heading("Ignore");
    if button(ui, b.ignore_hashes_in_range, "Hashes in range") {
        actions.push(FilterAction::IgnoreHashesInRange);
    }
    if button(ui, b.ignore_sources_with_hashes_in_range, "Sources with hashes in range") {
        actions.push(FilterAction::IgnoreSourcesWithHashesInRange);
    }
    if button(ui, b.clear_ignored_hashes, "Clear ignored hashes") {
        actions.push(FilterAction::ClearIgnoredHashes);
    }
    if button(ui, b.clear_ignored_sources, "Clear ignored sources") {
        actions.push(FilterAction::ClearIgnoredSources);
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        ui.label("Max duplicate hashes:");
        let resp = ui.add(
            egui::TextEdit::singleline(&mut panel.max_hashes_entry).desired_width(60.0),
        );
        // Enter also drops focus, so this covers both ways of finishing an edit.
        if resp.lost_focus() {
            actions.push(FilterAction::CommitMaxHashes);
        }
    });
    if ui
        .checkbox(&mut panel.ignore_flagged_blocks, "Ignore flagged blocks")
        .changed()
    {
        actions.push(FilterAction::CommitIgnoreFlaggedBlocks);
    }

    actions
}
