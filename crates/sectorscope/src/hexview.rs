//! Hex view of the image page at the selected byte offset.
//!
//! Selecting an offset reads one page from the image, computes the digest of
//! the block starting there and formats the page as hex dump lines. The
//! digest decides whether the "filter" and "unfilter" hash actions are
//! available.

use std::fmt;

use tracing::debug;

use crate::digest::{self, HashFilterPolicy};
use crate::error::Result;
use crate::filters::Filters;
use crate::hexdump::{self, LINE_WIDTH, PAGE_SIZE};
use crate::image::ImageReader;
use crate::scan::ScanData;

/// Text shown while no offset is selected.
pub const NOT_SELECTED: &str = "Not selected";

/// How image offsets are written in labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffsetFormat {
    #[default]
    Decimal,
    Hex,
    /// Sector number, `offset / sector_size`.
    Sector,
}

impl OffsetFormat {
    pub fn format(self, offset: u64, sector_size: u64) -> String {
        match self {
            OffsetFormat::Decimal => offset.to_string(),
            OffsetFormat::Hex => format!("0x{:08x}", offset),
            OffsetFormat::Sector if sector_size > 0 => {
                let sector = offset / sector_size;
                let rest = offset % sector_size;
                if rest == 0 {
                    format!("sector {}", sector)
                } else {
                    format!("sector {} + {}", sector, rest)
                }
            }
            OffsetFormat::Sector => offset.to_string(),
        }
    }
}

impl fmt::Display for OffsetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OffsetFormat::Decimal => write!(f, "decimal"),
            OffsetFormat::Hex => write!(f, "hex"),
            OffsetFormat::Sector => write!(f, "sector"),
        }
    }
}

/// Display state of the hex view.
#[derive(Debug, Clone)]
pub struct HexPanel {
    page_size: usize,
    line_width: usize,
    offset_format: OffsetFormat,
    offset: Option<u64>,
    digest: Option<String>,
    lines: Vec<String>,
    filter_enabled: bool,
    unfilter_enabled: bool,
}

impl Default for HexPanel {
    fn default() -> Self {
        Self::new(PAGE_SIZE, LINE_WIDTH)
    }
}

impl HexPanel {
    pub fn new(page_size: usize, line_width: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            line_width: line_width.max(1),
            offset_format: OffsetFormat::default(),
            offset: None,
            digest: None,
            lines: Vec::new(),
            filter_enabled: false,
            unfilter_enabled: false,
        }
    }

    pub fn with_offset_format(mut self, format: OffsetFormat) -> Self {
        self.offset_format = format;
        self
    }

    /// Show the page at `offset`, or clear the view for `None`.
    pub fn select_offset<R: ImageReader + ?Sized>(
        &mut self,
        offset: Option<u64>,
        reader: &mut R,
        scan: &ScanData,
        filters: &Filters,
    ) -> Result<()> {
        let Some(offset) = offset else {
            self.clear();
            return Ok(());
        };

        let buf = reader.read(offset, self.page_size)?;
        let block_size = usize::try_from(scan.block_size).unwrap_or(usize::MAX);
        let digest = digest::block_digest(&buf, block_size);

        debug!(offset, bytes = buf.len(), %digest, "hex view page read");

        self.offset = Some(offset);
        self.lines = hexdump::format_lines(offset, &buf, self.line_width);
        self.digest = Some(digest);
        self.refresh_actions(scan, filters);
        Ok(())
    }

    /// Drop the selection and every derived value.
    pub fn clear(&mut self) {
        self.offset = None;
        self.digest = None;
        self.lines.clear();
        self.filter_enabled = false;
        self.unfilter_enabled = false;
    }

    /// Re-evaluate filter/unfilter availability, e.g. after a filter change.
    pub fn refresh_actions(&mut self, scan: &ScanData, filters: &Filters) {
        match &self.digest {
            Some(d) => {
                self.filter_enabled = digest::can_filter(d, scan, filters);
                self.unfilter_enabled = digest::can_unfilter(d, filters);
            }
            None => {
                self.filter_enabled = false;
                self.unfilter_enabled = false;
            }
        }
    }

    /// Run the filter action through `policy` when it is available.
    pub fn filter_hash(&self, policy: &mut dyn HashFilterPolicy, filters: &mut Filters) -> bool {
        match (&self.digest, self.filter_enabled) {
            (Some(d), true) => {
                policy.filter_hash(d, filters);
                true
            }
            _ => false,
        }
    }

    /// Run the unfilter action through `policy` when it is available.
    pub fn unfilter_hash(&self, policy: &mut dyn HashFilterPolicy, filters: &mut Filters) -> bool {
        match (&self.digest, self.unfilter_enabled) {
            (Some(d), true) => {
                policy.unfilter_hash(d, filters);
                true
            }
            _ => false,
        }
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_width(&self) -> usize {
        self.line_width
    }

    pub fn filter_enabled(&self) -> bool {
        self.filter_enabled
    }

    pub fn unfilter_enabled(&self) -> bool {
        self.unfilter_enabled
    }

    /// "Image offset: …" label text.
    pub fn offset_label(&self, sector_size: u64) -> String {
        match self.offset {
            Some(o) => format!(
                "Image offset: {}",
                self.offset_format.format(o, sector_size)
            ),
            None => format!("Image offset: {}", NOT_SELECTED),
        }
    }

    /// Block hash label text.
    pub fn digest_label(&self) -> &str {
        self.digest.as_deref().unwrap_or(NOT_SELECTED)
    }
}
