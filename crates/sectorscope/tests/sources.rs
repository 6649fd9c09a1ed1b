use std::cell::Cell;
use std::rc::Rc;

use sectorscope::sources::{
    FIRST_DATA_LINE, HEADER_LINE, HEADER_TEXT, RowColor, RowPaint, SourceTable, UNKNOWN,
};
use sectorscope::{Filters, ScanData};

/// Five sources: ids 10..=14. Source 10 has a size of 10 sectors of 100
/// bytes and 5 distinct matched offsets; source 12 has no size.
fn scan() -> ScanData {
    let json = r#"{
        "block_size": 100,
        "sector_size": 100,
        "sources": [
            {"source_id": 10, "filesize": 1000, "repository_name": "repoA", "filename": "ten.bin"},
            {"source_id": 11, "filesize": 250, "repository_name": "repoA", "filename": "eleven.bin"},
            {"source_id": 12, "repository_name": "imported", "filename": "disk.E01"},
            {"source_id": 13, "filesize": 50, "repository_name": "repoB", "filename": "tiny"},
            {"source_id": 14, "filesize": 400, "repository_name": "repoB", "filename": "none"}
        ],
        "blocks": [
            {"offset": 0, "hash": "h0", "sources": [{"source_id": 10, "file_offset": 0}]},
            {"offset": 100, "hash": "h1", "sources": [{"source_id": 10, "file_offset": 100},
                                                    {"source_id": 11, "file_offset": 0}]},
            {"offset": 200, "hash": "h2", "sources": [{"source_id": 10, "file_offset": 200}]},
            {"offset": 300, "hash": "h3", "sources": [{"source_id": 10, "file_offset": 300},
                                                    {"source_id": 12, "file_offset": 0}]},
            {"offset": 400, "hash": "h4", "sources": [{"source_id": 10, "file_offset": 400},
                                                    {"source_id": 10, "file_offset": 0}]},
            {"offset": 500, "hash": "h5", "sources": [{"source_id": 12, "file_offset": 512},
                                                    {"source_id": 13, "file_offset": 0}]}
        ]
    }"#;
    ScanData::from_json_slice(json.as_bytes()).unwrap()
}

fn table(filters: &Filters) -> SourceTable {
    let mut table = SourceTable::new();
    table.rebuild(&scan(), filters.state());
    table
}

fn counting(filters: &mut Filters) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    filters.subscribe(move |_| c.set(c.get() + 1));
    count
}

#[test]
fn test_rows_and_percentages() {
    let filters = Filters::new();
    let table = table(&filters);
    let lines = table.lines();

    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], HEADER_TEXT);
    assert_eq!(lines[1], "\t10\t50.00%\t5\t1000\trepoA\tten.bin");
    // 250 bytes is two whole sectors.
    assert_eq!(lines[2], "\t11\t50.00%\t1\t250\trepoA\televen.bin");
    // No file size: percent and size are unknown, the count is still known.
    assert_eq!(lines[3], format!("\t12\t{UNKNOWN}\t2\t{UNKNOWN}\timported\tdisk.E01"));
    // Smaller than one sector: no division, size still shown.
    assert_eq!(lines[4], format!("\t13\t{UNKNOWN}\t1\t50\trepoB\ttiny"));
    assert_eq!(lines[5], "\t14\t0.00%\t0\t400\trepoB\tnone");
}

#[test]
fn test_line_mapping() {
    let filters = Filters::new();
    let table = table(&filters);
    let map = table.row_map();

    assert_eq!(map.len(), 5);
    assert_eq!(map.source_at(HEADER_LINE), None);
    assert_eq!(map.source_at(FIRST_DATA_LINE), Some(10));
    assert_eq!(map.source_at(6), Some(14));
    assert_eq!(map.source_at(7), None);
    for (line, id) in map.iter() {
        assert_eq!(map.line_of(id), Some(line));
        assert_eq!(table.row_at(line).map(|r| r.source_id), Some(id));
    }
}

#[test]
fn test_resting_colors_and_filter_recolor() {
    let mut filters = Filters::new();
    let table = table(&filters);

    assert_eq!(table.color_of(2, filters.state()), Some(RowColor::EvenUnfiltered));
    assert_eq!(table.color_of(3, filters.state()), Some(RowColor::OddUnfiltered));
    let before = table.recolor_all(filters.state());

    filters.toggle_source(10);
    let after = table.recolor_all(filters.state());

    for (b, a) in before.iter().zip(after.iter()) {
        assert_eq!(b.line, a.line);
        if a.line == 2 {
            assert_eq!(a.color, RowColor::EvenFiltered);
        } else {
            assert_eq!(a.color, b.color, "line {} must not change", a.line);
        }
    }
}

#[test]
fn test_click_toggles_with_one_notification_each() {
    let mut filters = Filters::new();
    let count = counting(&mut filters);
    let table = table(&filters);

    assert_eq!(table.click(4, &mut filters), Some(12));
    assert!(filters.state().is_source_filtered(12));
    assert_eq!(count.get(), 1);

    assert_eq!(table.click(4, &mut filters), Some(12));
    assert!(!filters.state().is_source_filtered(12));
    assert_eq!(count.get(), 2);
}

#[test]
fn test_click_outside_rows_is_noop() {
    let mut filters = Filters::new();
    let count = counting(&mut filters);
    let table = table(&filters);

    assert_eq!(table.click(0, &mut filters), None);
    assert_eq!(table.click(HEADER_LINE, &mut filters), None);
    assert_eq!(table.click(99, &mut filters), None);
    assert_eq!(count.get(), 0);
}

#[test]
fn test_hover_sequence_repaints_only_affected_rows() {
    let filters = Filters::new();
    let mut table = table(&filters);
    let state = filters.state();

    assert_eq!(
        table.enter(3, state),
        vec![RowPaint { line: 3, color: RowColor::HoveredUnfiltered }]
    );
    // Moving within the same row repaints nothing.
    assert!(table.hover(3, state).is_empty());

    assert_eq!(
        table.hover(5, state),
        vec![
            RowPaint { line: 3, color: RowColor::OddUnfiltered },
            RowPaint { line: 5, color: RowColor::HoveredUnfiltered },
        ]
    );
    assert_eq!(table.hovered(), Some(5));

    // Onto the header: restore row 5, hover nothing.
    assert_eq!(
        table.hover(HEADER_LINE, state),
        vec![RowPaint { line: 5, color: RowColor::OddUnfiltered }]
    );
    assert_eq!(table.hovered(), None);

    table.hover(6, state);
    assert_eq!(
        table.leave(state),
        vec![RowPaint { line: 6, color: RowColor::EvenUnfiltered }]
    );
    assert!(table.leave(state).is_empty());
}

#[test]
fn test_hovered_filtered_row() {
    let mut filters = Filters::new();
    let mut table = table(&filters);
    filters.toggle_source(11);

    assert_eq!(
        table.hover(3, filters.state()),
        vec![RowPaint { line: 3, color: RowColor::HoveredFiltered }]
    );
    let paints = table.leave(filters.state());
    assert_eq!(paints, vec![RowPaint { line: 3, color: RowColor::OddFiltered }]);
}

#[test]
fn test_rebuild_clears_hover() {
    let filters = Filters::new();
    let mut table = table(&filters);
    table.hover(4, filters.state());
    assert_eq!(table.hovered(), Some(4));

    let paints = table.rebuild(&scan(), filters.state());
    assert_eq!(table.hovered(), None);
    assert_eq!(paints.len(), 5);
    assert!(
        paints
            .iter()
            .all(|p| matches!(p.color, RowColor::EvenUnfiltered | RowColor::OddUnfiltered))
    );
}

#[test]
fn test_select_all_and_clear_all_notify_once() {
    let mut filters = Filters::new();
    let count = counting(&mut filters);
    let table = table(&filters);

    table.select_all(&mut filters);
    assert_eq!(count.get(), 1);
    assert_eq!(
        filters.state().filtered_sources.iter().copied().collect::<Vec<_>>(),
        vec![10, 11, 12, 13, 14]
    );

    table.clear_all(&mut filters);
    assert_eq!(count.get(), 2);
    assert!(filters.state().filtered_sources.is_empty());
}
