//! Text renditions of the viewer panes.

pub mod hexdump;
pub mod histogram;
pub mod sources;
