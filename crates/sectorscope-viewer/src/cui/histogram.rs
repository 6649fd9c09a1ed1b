use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::NOTHING};

use sectorscope::histogram::{Histogram, HistogramView};
use sectorscope::{FilterState, ScanData};

use crate::ViewSettings;

/// Width of the longest bar, in characters.
const BAR_WIDTH: usize = 50;

fn bar(matched: usize, max: usize) -> String {
    if max == 0 || matched == 0 {
        return String::new();
    }
    // Any match gets at least one mark.
    let len = (matched * BAR_WIDTH).div_ceil(max).max(1);
    "#".repeat(len)
}

pub fn histogram_table(scan: &ScanData, histogram: &Histogram, settings: ViewSettings) -> Table {
    let max = histogram.max_matched();

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![Cell::new("Offset"), Cell::new("Matched"), Cell::new("")]);

    for bucket in histogram.buckets() {
        table.add_row(vec![
            Cell::new(settings.offset_format.format(bucket.start, scan.sector_size))
                .set_alignment(CellAlignment::Right),
            Cell::new(bucket.matched).set_alignment(CellAlignment::Right),
            Cell::new(bar(bucket.matched, max)),
        ]);
    }
    table
}

pub fn print_histogram(scan: &ScanData, settings: ViewSettings) {
    let view = HistogramView::new(scan, settings.buckets);
    let histogram = view.build(scan, &FilterState::default());
    println!(
        "{} bytes in {} buckets of {} bytes",
        view.viewport().span(),
        histogram.buckets().len(),
        histogram.bytes_per_bucket()
    );
    println!();
    println!("{}", histogram_table(scan, &histogram, settings));
}
