//! Painter-based matched-sources listing.
//!
//! Rows are drawn line by line with the colors the `SourceTable` hands out.
//! The pane keeps the last color painted on every line and only ever updates
//! the lines returned by the table's event methods, so hovering does not
//! recolor the whole listing.

use std::collections::BTreeMap;

use eframe::egui;

use sectorscope::sources::{
    self, HEADER_CELLS, HEADER_LINE, LEGEND_FILTERED, LEGEND_UNFILTERED, Rgb, TITLE_BACKGROUND,
};
use sectorscope::{FilterState, Filters, RowColor, RowPaint, ScanData, SourceTable};

/// Column widths in characters: ID, %Match, #Match, Size, Repository Name.
/// The filename takes the rest of the line.
const COLUMN_CHARS: [f32; 5] = [8.0, 10.0, 8.0, 12.0, 22.0];

pub fn color32(rgb: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

/// Sources listing widget.
pub struct SourcesPane {
    table: SourceTable,
    /// Color last painted on each data line.
    painted: BTreeMap<usize, RowColor>,
    font_size: f32,
    /// Whether the pointer was over the listing last frame.
    pointer_inside: bool,
}

impl SourcesPane {
    pub fn new(scan: &ScanData, state: &FilterState) -> Self {
        let mut pane = Self {
            table: SourceTable::new(),
            painted: BTreeMap::new(),
            font_size: 13.0,
            pointer_inside: false,
        };
        pane.rebuild(scan, state);
        pane
    }

    /// Reload rows from the scan report.
    pub fn rebuild(&mut self, scan: &ScanData, state: &FilterState) {
        self.painted.clear();
        self.pointer_inside = false;
        let paints = self.table.rebuild(scan, state);
        self.apply(paints);
    }

    /// The filter state changed: recolor every row.
    pub fn recolor(&mut self, state: &FilterState) {
        let paints = self.table.recolor_all(state);
        self.apply(paints);
    }

    fn apply(&mut self, paints: Vec<RowPaint>) {
        for paint in paints {
            self.painted.insert(paint.line, paint.color);
        }
    }

    fn show_legend(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for (rgb, text) in [
                (LEGEND_FILTERED, "Filtered"),
                (LEGEND_UNFILTERED, "Not filtered"),
            ] {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                ui.painter().rect_filled(rect, 2.0, color32(rgb));
                ui.label(text);
                ui.add_space(8.0);
            }
        });
    }

    /// Draw the legend, the bulk buttons and the listing.
    pub fn show(&mut self, ui: &mut egui::Ui, filters: &mut Filters) {
        ui.horizontal(|ui| {
            ui.heading("Sources");
            ui.add_space(12.0);
            if ui.button("Select all").clicked() {
                self.table.select_all(filters);
            }
            if ui.button("Clear all").clicked() {
                self.table.clear_all(filters);
            }
        });
        self.show_legend(ui);
        ui.add_space(4.0);

        egui::ScrollArea::both()
            .id_source("sources_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| self.show_rows(ui, filters));
    }

    fn show_rows(&mut self, ui: &mut egui::Ui, filters: &mut Filters) {
        let font = egui::FontId::monospace(self.font_size);
        let row_height = (ui.text_style_height(&egui::TextStyle::Monospace).max(self.font_size)
            + 6.0)
            .max(18.0);
        let char_w = self.font_size * 0.6;

        let total_height = self.table.line_count() as f32 * row_height;
        let width = ui.available_width().max(char_w * 100.0);
        let (rect, resp) =
            ui.allocate_exact_size(egui::vec2(width, total_height), egui::Sense::click());

        // Pointer handling first so this frame already shows the new hover.
        let state = filters.state();
        match resp.hover_pos() {
            Some(pos) => {
                let line = sources::line_at(pos.y - rect.min.y, row_height);
                let paints = match line {
                    Some(line) if !self.pointer_inside => self.table.enter(line, state),
                    Some(line) => self.table.hover(line, state),
                    None => self.table.leave(state),
                };
                self.pointer_inside = true;
                self.apply(paints);
            }
            None if self.pointer_inside => {
                let paints = self.table.leave(state);
                self.pointer_inside = false;
                self.apply(paints);
            }
            None => {}
        }
        if resp.clicked() {
            let line = resp
                .interact_pointer_pos()
                .and_then(|pos| sources::line_at(pos.y - rect.min.y, row_height));
            if let Some(line) = line {
                self.table.click(line, filters);
            }
        }

        let painter = ui.painter_at(rect);
        let column_x = |col: usize| -> f32 {
            rect.min.x + 6.0 + COLUMN_CHARS[..col].iter().sum::<f32>() * char_w
        };
        let line_rect = |line: usize| -> egui::Rect {
            egui::Rect::from_min_size(
                egui::pos2(rect.min.x, rect.min.y + (line - 1) as f32 * row_height),
                egui::vec2(rect.width(), row_height),
            )
        };

        // Column titles.
        let title = line_rect(HEADER_LINE);
        painter.rect_filled(title, 0.0, color32(TITLE_BACKGROUND));
        for (col, text) in HEADER_CELLS.iter().enumerate() {
            painter.text(
                egui::pos2(column_x(col), title.min.y + 3.0),
                egui::Align2::LEFT_TOP,
                *text,
                font.clone(),
                egui::Color32::BLACK,
            );
        }

        // Only the lines inside the clip rect are drawn.
        let clip = ui.clip_rect();
        for (line, _) in self.table.row_map().iter() {
            let r = line_rect(line);
            if !clip.intersects(r) {
                continue;
            }
            let Some(row) = self.table.row_at(line) else {
                continue;
            };
            let color = self
                .painted
                .get(&line)
                .copied()
                .unwrap_or(RowColor::resolve(line, false, false));
            painter.rect_filled(r, 0.0, color32(color.background()));
            let fg = color32(color.foreground());
            for (col, text) in row.cells().iter().enumerate() {
                painter.text(
                    egui::pos2(column_x(col), r.min.y + 3.0),
                    egui::Align2::LEFT_TOP,
                    text,
                    font.clone(),
                    fg,
                );
            }
        }
    }
}
