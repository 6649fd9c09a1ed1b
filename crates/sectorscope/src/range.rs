//! Byte range selected in the histogram.

use tracing::debug;

use crate::notify::{ChangeNotifier, ListenerId};

/// Inclusive image byte range, `start <= stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ByteRange {
    pub start: u64,
    pub stop: u64,
}

impl ByteRange {
    /// Build a range from two endpoints in either order.
    pub fn new(a: u64, b: u64) -> Self {
        Self {
            start: a.min(b),
            stop: a.max(b),
        }
    }

    pub fn contains(&self, offset: u64) -> bool {
        self.start <= offset && offset <= self.stop
    }

    /// Number of bytes covered, both endpoints included.
    pub fn byte_count(&self) -> u64 {
        (self.stop - self.start).saturating_add(1)
    }
}

/// The current selection plus its listeners.
#[derive(Debug, Default)]
pub struct RangeSelection {
    range: Option<ByteRange>,
    notifier: ChangeNotifier<Option<ByteRange>>,
}

impl RangeSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self) -> bool {
        self.range.is_some()
    }

    pub fn range(&self) -> Option<ByteRange> {
        self.range
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&Option<ByteRange>) + 'static,
    {
        self.notifier.subscribe(listener)
    }

    /// Select the range between `a` and `b`. Notifies only if it changed.
    pub fn select(&mut self, a: u64, b: u64) {
        self.set(Some(ByteRange::new(a, b)));
    }

    /// Drop the selection. Notifies only if something was selected.
    pub fn clear(&mut self) {
        self.set(None);
    }

    fn set(&mut self, range: Option<ByteRange>) {
        if self.range == range {
            return;
        }
        debug!(?range, "range selection changed");
        self.range = range;
        self.notifier.fire(&self.range);
    }
}
