mod app;
mod filters;
mod hex;
mod histogram;
mod sources;
mod state;

pub use app::run_gui;
pub use state::{UiState, show_ui};
