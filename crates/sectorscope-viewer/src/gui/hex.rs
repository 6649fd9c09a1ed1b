//! Painter-based hex view of the page at the selected offset.

use eframe::egui;

use sectorscope::HexPanel;

/// Hash action requested from the hex view buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexAction {
    FilterHash,
    UnfilterHash,
}

pub struct HexPane {
    font_size: f32,
}

impl Default for HexPane {
    fn default() -> Self {
        Self { font_size: 13.0 }
    }
}

impl HexPane {
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        panel: &HexPanel,
        sector_size: u64,
    ) -> Option<HexAction> {
        let mut action = None;

        ui.label(panel.offset_label(sector_size));
        ui.horizontal(|ui| {
            ui.label("Block hash:");
            ui.monospace(panel.digest_label());
        });
        ui.horizontal(|ui| {
            if ui
                .add_enabled(panel.filter_enabled(), egui::Button::new("Filter hash"))
                .clicked()
            {
                action = Some(HexAction::FilterHash);
            }
            if ui
                .add_enabled(panel.unfilter_enabled(), egui::Button::new("Unfilter hash"))
                .clicked()
            {
                action = Some(HexAction::UnfilterHash);
            }
        });
        ui.separator();

        egui::ScrollArea::both()
            .id_source("hex_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| self.show_lines(ui, panel.lines()));

        action
    }

    fn show_lines(&self, ui: &mut egui::Ui, lines: &[String]) {
        let font = egui::FontId::monospace(self.font_size);
        let row_height = (ui.text_style_height(&egui::TextStyle::Monospace).max(self.font_size)
            + 4.0)
            .max(16.0);
        let char_w = self.font_size * 0.6;
        let widest = lines.first().map(|l| l.len()).unwrap_or(0) as f32;

        let size = egui::vec2(
            (widest * char_w + 12.0).max(ui.available_width()),
            lines.len() as f32 * row_height,
        );
        let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
        let painter = ui.painter_at(rect);

        let bg = if ui.visuals().dark_mode {
            egui::Color32::from_rgb(28, 28, 30)
        } else {
            ui.visuals().panel_fill
        };
        painter.rect_filled(rect, 0.0, bg);

        if lines.is_empty() {
            return;
        }

        // Map the visible Y range to line indices and draw only those.
        let clip = ui.clip_rect();
        let top = clip.min.y.max(rect.min.y);
        let bottom = clip.max.y.min(rect.max.y);
        if bottom <= top {
            return;
        }
        let last_index = lines.len() - 1;
        let first = (((top - rect.min.y) / row_height).floor().max(0.0) as usize).min(last_index);
        let last = (((bottom - rect.min.y) / row_height).ceil().max(0.0) as usize).min(last_index);

        let color = ui.visuals().text_color();
        for (i, line) in lines.iter().enumerate().take(last + 1).skip(first) {
            painter.text(
                egui::pos2(rect.min.x + 6.0, rect.min.y + i as f32 * row_height + 2.0),
                egui::Align2::LEFT_TOP,
                line,
                font.clone(),
                color,
            );
        }
    }
}
