//! Image match histogram bar.
//!
//! Click selects an offset for the hex view, drag selects a byte range.

use eframe::egui;

use sectorscope::ByteRange;
use sectorscope::histogram::Histogram;

const MATCHED_COLOR: egui::Color32 = egui::Color32::from_rgb(0x40, 0x60, 0xa0);
const HIGHLIGHT_COLOR: egui::Color32 = egui::Color32::from_rgb(0xe0, 0x80, 0x00);
const RANGE_COLOR: egui::Color32 = egui::Color32::from_rgba_premultiplied(0x30, 0x90, 0x30, 0x40);
const CURSOR_COLOR: egui::Color32 = egui::Color32::from_rgb(0xc0, 0x00, 0x00);

/// What the user did on the histogram this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistogramAction {
    SelectOffset(u64),
    SelectRange(u64, u64),
    ClearRange,
    FitImage,
    FitRange,
}

#[derive(Default)]
pub struct HistogramPane {
    /// Offset where the current drag started.
    drag_anchor: Option<u64>,
}

impl HistogramPane {
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        histogram: &Histogram,
        range: Option<ByteRange>,
        fit_range_enabled: bool,
        cursor: Option<u64>,
    ) -> Vec<HistogramAction> {
        let mut actions = Vec::new();
        let viewport = histogram.viewport();

        ui.horizontal(|ui| {
            ui.label(format!(
                "Image {}..{} ({} bytes per bucket)",
                viewport.start,
                viewport.stop,
                histogram.bytes_per_bucket()
            ));
            ui.add_space(12.0);
            if ui.button("Fit image").clicked() {
                actions.push(HistogramAction::FitImage);
            }
            if ui
                .add_enabled(fit_range_enabled, egui::Button::new("Fit range"))
                .clicked()
            {
                actions.push(HistogramAction::FitRange);
            }
            if ui
                .add_enabled(range.is_some(), egui::Button::new("Clear range"))
                .clicked()
            {
                actions.push(HistogramAction::ClearRange);
            }
            if let Some(r) = range {
                ui.label(format!("Range {}..={} ({} bytes)", r.start, r.stop, r.byte_count()));
            }
        });

        let size = egui::vec2(ui.available_width(), ui.available_height().max(60.0));
        let (rect, resp) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, ui.visuals().extreme_bg_color);

        let offset_at = |x: f32| -> u64 {
            histogram.offset_at_fraction((x - rect.min.x) / rect.width().max(1.0))
        };
        let x_of =
            |offset: u64| -> f32 { rect.min.x + histogram.fraction_of(offset) * rect.width() };

        // Bars, placed by offset so they line up with clicks and the range.
        let max = histogram.max_matched().max(1) as f32;
        for bucket in histogram.buckets() {
            if bucket.matched == 0 {
                continue;
            }
            let x0 = x_of(bucket.start);
            let end = bucket.start.saturating_add(histogram.bytes_per_bucket());
            let x1 = x_of(end).max(x0 + 1.0);
            let h = rect.height() * bucket.matched as f32 / max;
            let bar = egui::Rect::from_min_max(
                egui::pos2(x0, rect.max.y - h),
                egui::pos2(x1, rect.max.y),
            );
            painter.rect_filled(bar, 0.0, MATCHED_COLOR);
            if bucket.highlighted > 0 {
                let hh = rect.height() * bucket.highlighted as f32 / max;
                let part = egui::Rect::from_min_max(
                    egui::pos2(x0, rect.max.y - hh),
                    egui::pos2(x1, rect.max.y),
                );
                painter.rect_filled(part, 0.0, HIGHLIGHT_COLOR);
            }
        }

        // Selected range and hex view cursor.
        if let Some(r) = range {
            let span = egui::Rect::from_min_max(
                egui::pos2(x_of(r.start), rect.min.y),
                egui::pos2(x_of(r.stop.saturating_add(1)).max(x_of(r.start) + 1.0), rect.max.y),
            );
            painter.rect_filled(span, 0.0, RANGE_COLOR);
        }
        if let Some(o) = cursor {
            if o >= viewport.start && o < viewport.stop {
                let x = x_of(o);
                painter.line_segment(
                    [egui::pos2(x, rect.min.y), egui::pos2(x, rect.max.y)],
                    egui::Stroke::new(1.0, CURSOR_COLOR),
                );
            }
        }

        // Pointer.
        if resp.drag_started() {
            self.drag_anchor = resp.interact_pointer_pos().map(|p| offset_at(p.x));
        }
        if resp.dragged() {
            if let (Some(anchor), Some(pos)) = (self.drag_anchor, resp.interact_pointer_pos()) {
                actions.push(HistogramAction::SelectRange(anchor, offset_at(pos.x)));
            }
        }
        if resp.drag_released() {
            self.drag_anchor = None;
        }
        if resp.clicked() {
            if let Some(pos) = resp.interact_pointer_pos() {
                actions.push(HistogramAction::SelectOffset(offset_at(pos.x)));
            }
        }
        if let Some(pos) = resp.hover_pos() {
            let offset = offset_at(pos.x);
            resp.on_hover_text(format!("offset {}", offset));
        }

        actions
    }
}
