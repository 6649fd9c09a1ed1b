//! eframe application wrapper around [`UiState`].

use std::cell::RefCell;

use eframe::egui;
use eframe::{CreationContext, Frame, NativeOptions};

use sectorscope::{ImageReader, ScanData};

use super::UiState;
use crate::ViewSettings;

/// Open the viewer window on `scan` and block until it is closed.
pub fn run_gui(scan: ScanData, reader: Box<dyn ImageReader>, settings: ViewSettings) {
    let native_options = NativeOptions {
        initial_window_size: Some(egui::vec2(1400.0, 900.0)),
        min_window_size: Some(egui::vec2(960.0, 480.0)),
        ..NativeOptions::default()
    };

    let title = if scan.image_filename.is_empty() {
        "sectorscope".to_string()
    } else {
        format!("sectorscope - {}", scan.image_filename)
    };

    if let Err(err) = eframe::run_native(
        &title,
        native_options,
        Box::new(move |cc: &CreationContext| Box::new(Viewer::new(cc, scan, reader, settings))),
    ) {
        eprintln!("failed to launch native window: {:?}", err);
    }
}

pub struct Viewer {
    pub state: RefCell<UiState>,
}

impl Viewer {
    pub fn new(
        cc: &CreationContext,
        scan: ScanData,
        reader: Box<dyn ImageReader>,
        settings: ViewSettings,
    ) -> Self {
        let ctx = &cc.egui_ctx;
        ctx.set_pixels_per_point(ctx.pixels_per_point() * 1.1);

        Self {
            state: RefCell::new(UiState::new(scan, reader, settings)),
        }
    }
}

impl eframe::App for Viewer {
    fn update(&mut self, ctx: &egui::Context, frame: &mut Frame) {
        super::show_ui(&mut self.state.borrow_mut(), ctx, frame);
    }
}
