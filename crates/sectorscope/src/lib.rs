#![doc = include_str!("../README.md")]
//! View state for block-hash scan results of media images.
//!
//! A block hash scan hashes a media image in fixed-size blocks and matches
//! the digests against a database of known source files. This crate holds
//! everything a viewer needs that is not drawing:
//!
//! - [`hexdump`]: page-relative hex + ASCII dump lines of image bytes.
//! - [`digest`]: zero-padded block digests and the filter/unfilter hash
//!   availability queries.
//! - [`sources`]: the matched-sources listing with completeness percentages,
//!   row colors, the line ↔ source mapping and hover/click handling.
//! - [`filters`] / [`range`]: shared filter marks and the selected byte
//!   range, each with synchronous change listeners ([`notify`]).
//! - [`filter_changer`] and [`filters_panel`]: range-driven highlight and
//!   ignore operations and the state of their controls.
//! - [`hexview`] and [`histogram`]: controllers for the hex view and the
//!   image match histogram.
//! - [`scan`] and [`image`]: the scan report and image readers the views pull
//!   data from.
//!
//! All state is meant to be owned and mutated by a single UI thread.

pub mod digest;
pub mod error;
pub mod filter_changer;
pub mod filters;
pub mod filters_panel;
pub mod hexdump;
pub mod hexview;
pub mod histogram;
pub mod image;
pub mod notify;
pub mod range;
pub mod scan;
pub mod sources;

pub use error::{Result, ScopeError};
pub use filters::{FilterState, Filters};
pub use hexview::{HexPanel, OffsetFormat};
pub use image::{FileImageReader, ImageReader, MemoryImageReader};
pub use range::{ByteRange, RangeSelection};
pub use scan::{ScanData, SourceDetail, SourceId, SourceOccurrence};
pub use sources::{RowColor, RowPaint, SourceRow, SourceTable};
