//! Image match histogram.
//!
//! The image is shown as a bar of buckets, each covering an equal share of
//! the visible byte span (the viewport). A bucket counts the matched blocks
//! inside it that are not ignored by the current filters, and separately how
//! many of those are highlighted.

use crate::filters::FilterState;
use crate::range::{ByteRange, RangeSelection};
use crate::scan::ScanData;

/// Default number of buckets across the histogram bar.
pub const DEFAULT_BUCKETS: usize = 200;

/// Visible byte span, `start..stop` (half open).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub start: u64,
    pub stop: u64,
}

impl Viewport {
    pub fn span(&self) -> u64 {
        self.stop.saturating_sub(self.start)
    }
}

/// One bar of the histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bucket {
    /// First image offset covered by the bucket.
    pub start: u64,
    pub matched: usize,
    pub highlighted: usize,
}

/// Bucketed match counts over a viewport.
#[derive(Debug, Clone, Default)]
pub struct Histogram {
    viewport: Viewport,
    bytes_per_bucket: u64,
    buckets: Vec<Bucket>,
}

impl Histogram {
    pub fn build(
        scan: &ScanData,
        state: &FilterState,
        viewport: Viewport,
        bucket_count: usize,
    ) -> Self {
        let bucket_count = bucket_count.max(1);
        let span = viewport.span().max(1);
        let bytes_per_bucket = span.div_ceil(bucket_count as u64).max(1);
        // No bucket may start at or past the viewport stop.
        let bucket_count = span.div_ceil(bytes_per_bucket) as usize;

        let mut buckets: Vec<Bucket> = (0..bucket_count)
            .map(|i| Bucket {
                start: viewport.start + i as u64 * bytes_per_bucket,
                ..Bucket::default()
            })
            .collect();

        if viewport.stop > viewport.start {
            for (&offset, digest) in scan.forensic_offsets.range(viewport.start..viewport.stop) {
                if state.is_block_ignored(digest, scan) {
                    continue;
                }
                let index = ((offset - viewport.start) / bytes_per_bucket) as usize;
                let Some(bucket) = buckets.get_mut(index) else {
                    continue;
                };
                bucket.matched += 1;
                if state.is_block_highlighted(digest, scan) {
                    bucket.highlighted += 1;
                }
            }
        }

        Self {
            viewport,
            bytes_per_bucket,
            buckets,
        }
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn bytes_per_bucket(&self) -> u64 {
        self.bytes_per_bucket
    }

    /// Largest matched count, used to scale the bars.
    pub fn max_matched(&self) -> usize {
        self.buckets.iter().map(|b| b.matched).max().unwrap_or(0)
    }

    /// Bucket covering `offset`, if it is inside the viewport.
    pub fn bucket_at(&self, offset: u64) -> Option<usize> {
        if offset < self.viewport.start || offset >= self.viewport.stop {
            return None;
        }
        let index = ((offset - self.viewport.start) / self.bytes_per_bucket) as usize;
        (index < self.buckets.len()).then_some(index)
    }

    /// Fractional position `0.0..=1.0` of `offset` across the bar, clamped
    /// to the viewport.
    pub fn fraction_of(&self, offset: u64) -> f32 {
        let span = self.viewport.span().max(1) as f64;
        let fraction = offset.saturating_sub(self.viewport.start) as f64 / span;
        fraction.clamp(0.0, 1.0) as f32
    }

    /// Image offset at a fractional position `0.0..=1.0` across the bar.
    pub fn offset_at_fraction(&self, fraction: f32) -> u64 {
        let fraction = fraction.clamp(0.0, 1.0) as f64;
        // Rounded so that `fraction_of` maps back to the same offset.
        let offset = self.viewport.start + (self.viewport.span() as f64 * fraction).round() as u64;
        offset.min(self.viewport.stop.saturating_sub(1).max(self.viewport.start))
    }
}

/// Round `offset` down to the start of its block.
pub fn snap_to_block(offset: u64, block_size: u64) -> u64 {
    if block_size == 0 {
        offset
    } else {
        offset - offset % block_size
    }
}

/// Zoom state of the histogram bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramView {
    viewport: Viewport,
    bucket_count: usize,
}

impl HistogramView {
    pub fn new(scan: &ScanData, bucket_count: usize) -> Self {
        let mut view = Self {
            viewport: Viewport::default(),
            bucket_count: bucket_count.max(1),
        };
        view.fit_image(scan);
        view
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    /// Zoom out to the whole image.
    pub fn fit_image(&mut self, scan: &ScanData) {
        self.viewport = Viewport {
            start: 0,
            stop: scan.effective_image_size(),
        };
    }

    /// Zoom to the selected range. Returns false when nothing is selected.
    pub fn fit_range(&mut self, range: &RangeSelection) -> bool {
        match range.range() {
            Some(ByteRange { start, stop }) => {
                self.viewport = Viewport {
                    start,
                    stop: stop.saturating_add(1),
                };
                true
            }
            None => false,
        }
    }

    /// Whether the "zoom to range" control is enabled.
    pub fn fit_range_enabled(range: &RangeSelection) -> bool {
        range.is_selected()
    }

    pub fn build(&self, scan: &ScanData, state: &FilterState) -> Histogram {
        Histogram::build(scan, state, self.viewport, self.bucket_count)
    }
}
