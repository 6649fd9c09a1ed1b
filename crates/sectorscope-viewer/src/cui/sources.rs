use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::NOTHING};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use sectorscope::sources::HEADER_CELLS;
use sectorscope::{FilterState, ScanData, SourceTable};

/// Widest repository name or filename printed before it is cut.
const MAX_NAME_WIDTH: usize = 48;

/// Cut `s` to at most `width` display columns, marking the cut with `…`.
///
/// Uses unicode-width so fullwidth (e.g. Japanese) filenames line up.
fn fit_to_width(s: &str, width: usize) -> String {
    if UnicodeWidthStr::width(s) <= width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Build the sources table for `scan` with nothing filtered.
pub fn sources_table(scan: &ScanData) -> Table {
    let mut rows = SourceTable::new();
    rows.rebuild(scan, &FilterState::default());

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(HEADER_CELLS.iter().map(|h| Cell::new(*h)).collect::<Vec<_>>());

    for row in rows.rows() {
        let [id, percent, matched, size, repository, filename] = row.cells();
        table.add_row(vec![
            Cell::new(id).set_alignment(CellAlignment::Right),
            Cell::new(percent).set_alignment(CellAlignment::Right),
            Cell::new(matched).set_alignment(CellAlignment::Right),
            Cell::new(size).set_alignment(CellAlignment::Right),
            Cell::new(fit_to_width(&repository, MAX_NAME_WIDTH)),
            Cell::new(fit_to_width(&filename, MAX_NAME_WIDTH)),
        ]);
    }
    table
}

pub fn print_sources(scan: &ScanData) {
    if !scan.image_filename.is_empty() {
        println!("Image: {}", scan.image_filename);
    }
    println!(
        "{} sources, {} matched blocks, block size {}, sector size {}",
        scan.sources.len(),
        scan.forensic_offsets.len(),
        scan.block_size,
        scan.sector_size
    );
    println!();
    println!("{}", sources_table(scan));
}
