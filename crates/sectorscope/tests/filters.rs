use std::cell::Cell;
use std::collections::BTreeSet;
use std::rc::Rc;

use sectorscope::filter_changer::{FilterChanger, hashes_in_range, sources_with_hashes_in_range};
use sectorscope::filters_panel::FiltersPanel;
use sectorscope::histogram::{Histogram, HistogramView, Viewport, snap_to_block};
use sectorscope::{ByteRange, Filters, RangeSelection, ScanData};

/// Blocks at 0, 512, 1024 and 4096 of an 8 KiB image.
fn scan() -> ScanData {
    let json = r#"{
        "image_size": 8192,
        "block_size": 512,
        "sector_size": 512,
        "sources": [
            {"source_id": 1, "filesize": 4096},
            {"source_id": 2, "filesize": 4096},
            {"source_id": 3, "filesize": 4096}
        ],
        "blocks": [
            {"offset": 0, "hash": "a0", "sources": [{"source_id": 1, "file_offset": 0}]},
            {"offset": 512, "hash": "a1", "flags": "T",
             "sources": [{"source_id": 1, "file_offset": 512}, {"source_id": 2, "file_offset": 0}]},
            {"offset": 1024, "hash": "a2", "sources": [{"source_id": 2, "file_offset": 512}]},
            {"offset": 4096, "hash": "a3",
             "sources": [{"source_id": 1, "file_offset": 0}, {"source_id": 2, "file_offset": 0},
                         {"source_id": 3, "file_offset": 0}]}
        ]
    }"#;
    ScanData::from_json_slice(json.as_bytes()).unwrap()
}

fn counting(filters: &mut Filters) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    filters.subscribe(move |_| c.set(c.get() + 1));
    count
}

#[test]
fn test_range_queries() {
    let scan = scan();
    let range = ByteRange::new(512, 1024);
    assert_eq!(
        hashes_in_range(&scan, range),
        BTreeSet::from(["a1".to_string(), "a2".to_string()])
    );
    assert_eq!(sources_with_hashes_in_range(&scan, range), BTreeSet::from([1, 2]));
    assert!(hashes_in_range(&scan, ByteRange::new(1025, 4095)).is_empty());
}

#[test]
fn test_changer_without_range_is_noop() {
    let scan = scan();
    let mut filters = Filters::new();
    let count = counting(&mut filters);
    let range = RangeSelection::new();

    let mut changer = FilterChanger::new(&scan, &mut filters, &range);
    assert!(!changer.highlight_hashes_in_range());
    assert!(!changer.ignore_sources_with_hashes_in_range());
    assert!(!changer.clear_ignored_hashes());
    assert_eq!(count.get(), 0);
}

#[test]
fn test_changer_operations_fire_once() {
    let scan = scan();
    let mut filters = Filters::new();
    let count = counting(&mut filters);
    let mut range = RangeSelection::new();
    range.select(0, 600);

    {
        let mut changer = FilterChanger::new(&scan, &mut filters, &range);
        assert!(changer.highlight_hashes_in_range());
        // Same range again adds nothing and stays silent.
        assert!(!changer.highlight_hashes_in_range());
        assert!(changer.ignore_sources_with_hashes_in_range());
    }
    assert_eq!(count.get(), 2);
    assert_eq!(filters.state().highlighted_hashes.len(), 2);
    assert_eq!(filters.state().ignored_sources, BTreeSet::from([1, 2]));

    {
        let mut changer = FilterChanger::new(&scan, &mut filters, &range);
        assert!(changer.clear_highlighted_hashes());
        assert!(changer.clear_ignored_sources());
        assert!(!changer.clear_ignored_sources());
    }
    assert_eq!(count.get(), 4);
}

#[test]
fn test_block_ignore_rules() {
    let scan = scan();
    let mut filters = Filters::new();

    assert!(!filters.state().is_block_ignored("a3", &scan));
    filters.set_ignore_max_hashes(2);
    assert!(filters.state().is_block_ignored("a3", &scan));
    assert!(!filters.state().is_block_ignored("a1", &scan));

    filters.set_ignore_flagged_blocks(true);
    assert!(filters.state().is_block_ignored("a1", &scan));

    filters.update(|s| {
        s.ignored_sources.insert(2);
    });
    assert!(filters.state().is_block_ignored("a2", &scan));
    assert!(!filters.state().is_block_ignored("a0", &scan));
}

#[test]
fn test_histogram_counts() {
    let scan = scan();
    let mut filters = Filters::new();
    let view = HistogramView::new(&scan, 8);
    assert_eq!(view.viewport(), Viewport { start: 0, stop: 8192 });

    let h = view.build(&scan, filters.state());
    assert_eq!(h.bytes_per_bucket(), 1024);
    let matched: Vec<usize> = h.buckets().iter().map(|b| b.matched).collect();
    assert_eq!(matched, vec![2, 1, 0, 0, 1, 0, 0, 0]);

    filters.update(|s| {
        s.highlighted_sources.insert(3);
        s.ignored_hashes.insert("a0".into());
    });
    let h = view.build(&scan, filters.state());
    assert_eq!(h.buckets()[0].matched, 1);
    assert_eq!(h.buckets()[4].highlighted, 1);
    assert_eq!(h.max_matched(), 1);
}

#[test]
fn test_histogram_fit_range() {
    let scan = scan();
    let mut view = HistogramView::new(&scan, 4);
    let mut range = RangeSelection::new();

    assert!(!HistogramView::fit_range_enabled(&range));
    assert!(!view.fit_range(&range));

    range.select(snap_to_block(1100, 512), 2047);
    assert!(HistogramView::fit_range_enabled(&range));
    assert!(view.fit_range(&range));
    assert_eq!(view.viewport(), Viewport { start: 1024, stop: 2048 });

    let h: Histogram = view.build(&scan, Filters::new().state());
    assert_eq!(h.buckets()[0].matched, 1);
    assert_eq!(h.bucket_at(1024), Some(0));

    view.fit_image(&scan);
    assert_eq!(view.viewport().stop, 8192);
}

#[test]
fn test_panel_commits_only_real_changes() {
    let mut filters = Filters::new();
    let count = counting(&mut filters);
    let range = RangeSelection::new();
    let mut panel = FiltersPanel::new(filters.state(), &range);
    assert_eq!(panel.max_hashes_entry, "None");

    panel.max_hashes_entry = "garbage".into();
    assert!(!panel.commit_max_hashes_entry(&mut filters));
    assert_eq!(panel.max_hashes_entry, "None");
    assert_eq!(count.get(), 0);

    panel.max_hashes_entry = " 5".into();
    assert!(panel.commit_max_hashes_entry(&mut filters));
    assert_eq!(panel.max_hashes_entry, "5");
    assert_eq!(filters.state().ignore_max_hashes, 5);
    assert_eq!(count.get(), 1);

    panel.ignore_flagged_blocks = true;
    assert!(panel.commit_ignore_flagged_blocks(&mut filters));
    assert!(!panel.commit_ignore_flagged_blocks(&mut filters));
    assert_eq!(count.get(), 2);

    // Programmatic sync never notifies.
    filters.update(|s| s.ignore_max_hashes = 0);
    panel.sync_from(filters.state());
    assert_eq!(panel.max_hashes_entry, "None");
    assert_eq!(count.get(), 3);
}
