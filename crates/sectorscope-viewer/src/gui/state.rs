//! Viewer state and the per-frame layout.
//!
//! `UiState` owns the scan, the image reader and every view model. Changes
//! to the filters and to the selected range are announced by their listeners
//! through dirty flags; `UiState::apply_changes` pulls the new state into the
//! views once per frame.

use std::cell::Cell;
use std::rc::Rc;

use eframe::egui;
use tracing::{debug, warn};

use sectorscope::digest::{HashFilterPolicy, UnsetHashFilterPolicy};
use sectorscope::filter_changer::FilterChanger;
use sectorscope::filters_panel::FiltersPanel;
use sectorscope::histogram::{Histogram, HistogramView, snap_to_block};
use sectorscope::{Filters, HexPanel, ImageReader, RangeSelection, ScanData};

use super::filters::{FilterAction, show_filters};
use super::hex::{HexAction, HexPane};
use super::histogram::{HistogramAction, HistogramPane};
use super::sources::SourcesPane;
use crate::ViewSettings;

pub struct UiState {
    scan: ScanData,
    reader: Box<dyn ImageReader>,
    filters: Filters,
    range: RangeSelection,
    hash_policy: Box<dyn HashFilterPolicy>,

    hex: HexPanel,
    hex_pane: HexPane,
    sources: SourcesPane,
    filters_panel: FiltersPanel,
    histogram_view: HistogramView,
    histogram: Histogram,
    histogram_pane: HistogramPane,

    filters_dirty: Rc<Cell<bool>>,
    range_dirty: Rc<Cell<bool>>,
    /// Last error shown in the toolbar.
    status: Option<String>,
}

impl UiState {
    pub fn new(scan: ScanData, reader: Box<dyn ImageReader>, settings: ViewSettings) -> Self {
        let mut filters = Filters::new();
        let mut range = RangeSelection::new();

        let filters_dirty = Rc::new(Cell::new(false));
        let range_dirty = Rc::new(Cell::new(false));
        {
            let dirty = Rc::clone(&filters_dirty);
            filters.subscribe(move |_| dirty.set(true));
        }
        {
            let dirty = Rc::clone(&range_dirty);
            range.subscribe(move |_| dirty.set(true));
        }

        let histogram_view = HistogramView::new(&scan, settings.buckets);
        let histogram = histogram_view.build(&scan, filters.state());

        Self {
            hex: HexPanel::new(settings.page_size, settings.line_width)
                .with_offset_format(settings.offset_format),
            hex_pane: HexPane::default(),
            sources: SourcesPane::new(&scan, filters.state()),
            filters_panel: FiltersPanel::new(filters.state(), &range),
            histogram_view,
            histogram,
            histogram_pane: HistogramPane::default(),
            scan,
            reader,
            filters,
            range,
            hash_policy: Box::new(UnsetHashFilterPolicy),
            filters_dirty,
            range_dirty,
            status: None,
        }
    }

    /// Replace the hash filter policy used by the hex view buttons.
    #[allow(dead_code)]
    pub fn set_hash_filter_policy(&mut self, policy: Box<dyn HashFilterPolicy>) {
        self.hash_policy = policy;
    }

    /// Pull filter and range changes into the views. Returns true if
    /// anything changed.
    pub fn apply_changes(&mut self) -> bool {
        let filters_changed = self.filters_dirty.replace(false);
        let range_changed = self.range_dirty.replace(false);

        if filters_changed {
            let state = self.filters.state();
            self.sources.recolor(state);
            self.hex.refresh_actions(&self.scan, &self.filters);
            self.filters_panel.sync_from(state);
            self.histogram = self.histogram_view.build(&self.scan, state);
        }
        if filters_changed || range_changed {
            self.filters_panel
                .sync_range(self.filters.state(), &self.range);
        }
        filters_changed || range_changed
    }

    fn rebuild_histogram(&mut self) {
        self.histogram = self.histogram_view.build(&self.scan, self.filters.state());
    }

    /// Show the page at `offset` (snapped to its block) in the hex view.
    fn select_offset(&mut self, offset: Option<u64>) {
        let offset = offset.map(|o| snap_to_block(o, self.scan.block_size));
        debug!(?offset, "select offset");
        if let Err(e) =
            self.hex
                .select_offset(offset, self.reader.as_mut(), &self.scan, &self.filters)
        {
            warn!("failed to read image: {}", e);
            self.status = Some(format!("failed to read image: {}", e));
            self.hex.clear();
        }
    }

    fn handle_hex(&mut self, action: HexAction) {
        match action {
            HexAction::FilterHash => {
                self.hex
                    .filter_hash(self.hash_policy.as_mut(), &mut self.filters);
            }
            HexAction::UnfilterHash => {
                self.hex
                    .unfilter_hash(self.hash_policy.as_mut(), &mut self.filters);
            }
        }
    }

    fn handle_filter(&mut self, action: FilterAction) {
        match action {
            FilterAction::CommitMaxHashes => {
                self.filters_panel.commit_max_hashes_entry(&mut self.filters);
            }
            FilterAction::CommitIgnoreFlaggedBlocks => {
                self.filters_panel
                    .commit_ignore_flagged_blocks(&mut self.filters);
            }
            _ => {
                let mut changer = FilterChanger::new(&self.scan, &mut self.filters, &self.range);
                action.apply(&mut changer);
            }
        }
    }

    fn handle_histogram(&mut self, action: HistogramAction) {
        let block_size = self.scan.block_size;
        match action {
            HistogramAction::SelectOffset(o) => self.select_offset(Some(o)),
            HistogramAction::SelectRange(a, b) => {
                // Whole blocks: from the start of the first to the last byte of the last.
                let (lo, hi) = (a.min(b), a.max(b));
                let start = snap_to_block(lo, block_size);
                let stop = snap_to_block(hi, block_size) + block_size.max(1) - 1;
                self.range.select(start, stop);
            }
            HistogramAction::ClearRange => self.range.clear(),
            HistogramAction::FitImage => {
                self.histogram_view.fit_image(&self.scan);
                self.rebuild_histogram();
            }
            HistogramAction::FitRange => {
                if self.histogram_view.fit_range(&self.range) {
                    self.rebuild_histogram();
                }
            }
        }
    }
}

/// Draw the whole window and route user input to the state.
pub fn show_ui(state: &mut UiState, ctx: &egui::Context, _frame: &mut eframe::Frame) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let name = if state.scan.image_filename.is_empty() {
                "(no image)"
            } else {
                state.scan.image_filename.as_str()
            };
            ui.strong(name);
            ui.label(format!(
                "{} bytes, block size {}, sector size {}, {} sources",
                state.scan.effective_image_size(),
                state.scan.block_size,
                state.scan.sector_size,
                state.scan.sources.len()
            ));
            if let Some(status) = &state.status {
                ui.add_space(12.0);
                let color = ui.visuals().error_fg_color;
                ui.colored_label(color, status.as_str());
            }
        });
    });

    let filter_actions = egui::SidePanel::left("filters_panel")
        .resizable(false)
        .default_width(240.0)
        .min_width(240.0)
        .max_width(240.0)
        .show(ctx, |ui| {
            ui.add_space(8.0);
            show_filters(ui, &mut state.filters_panel)
        })
        .inner;
    for action in filter_actions {
        state.handle_filter(action);
    }

    let histogram_actions = egui::TopBottomPanel::bottom("histogram_panel")
        .resizable(true)
        .default_height(160.0)
        .show(ctx, |ui| {
            let cursor = state.hex.offset();
            let fit_range_enabled = HistogramView::fit_range_enabled(&state.range);
            state.histogram_pane.show(
                ui,
                &state.histogram,
                state.range.range(),
                fit_range_enabled,
                cursor,
            )
        })
        .inner;
    for action in histogram_actions {
        state.handle_histogram(action);
    }

    let hex_action = egui::SidePanel::right("hex_panel")
        .resizable(true)
        .default_width(620.0)
        .show(ctx, |ui| {
            state
                .hex_pane
                .show(ui, &state.hex, state.scan.sector_size)
        })
        .inner;
    if let Some(action) = hex_action {
        state.handle_hex(action);
    }

    egui::CentralPanel::default().show(ctx, |ui| {
        state.sources.show(ui, &mut state.filters);
    });

    if state.apply_changes() {
        ctx.request_repaint();
    }
}
