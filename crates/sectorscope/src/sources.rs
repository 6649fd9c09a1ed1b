//! The matched-sources listing.
//!
//! The listing is a block of text lines:
//!  - line 1 holds the column titles and is not interactive,
//!  - lines 2.. hold one source each, in scan report order.
//!
//! Columns are tab separated: source ID, percent of the source's sectors
//! found in the image, number of distinct sector offsets found, file size,
//! repository name and filename. Every data line carries a color derived from
//! whether its source is filtered, whether the pointer hovers it and whether
//! the line number is even or odd.
//!
//! `SourceTable` keeps the line ↔ source mapping and the hovered line. Its
//! event methods return the lines whose color changed so a renderer can
//! repaint exactly those.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::filters::{FilterState, Filters};
use crate::scan::{ScanData, SourceId};

/// Column titles, tab separated with a leading tab stop like the data rows.
pub const HEADER_TEXT: &str = "\tID\t%Match\t#Match\tSize\tRepository Name\tFilename";

/// Column titles as individual cells.
pub const HEADER_CELLS: [&str; 6] = [
    "ID",
    "%Match",
    "#Match",
    "Size",
    "Repository Name",
    "Filename",
];

/// Line number of the column titles.
pub const HEADER_LINE: usize = 1;

/// Line number of the first source row.
pub const FIRST_DATA_LINE: usize = 2;

/// Marker rendered for values that cannot be derived.
pub const UNKNOWN: &str = "?";

/// 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `#rrggbb` notation.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

pub const BLACK: Rgb = Rgb(0x00, 0x00, 0x00);
pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);

/// Background of the column title line ("gray90").
pub const TITLE_BACKGROUND: Rgb = Rgb(0xe5, 0xe5, 0xe5);

/// Legend swatch for filtered sources.
pub const LEGEND_FILTERED: Rgb = Rgb(0x00, 0x66, 0x33);

/// Legend swatch for sources that are not filtered.
pub const LEGEND_UNFILTERED: Rgb = Rgb(0x99, 0x00, 0x00);

/// Resting and hovered color schemes of a source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowColor {
    EvenFiltered,
    OddFiltered,
    HoveredFiltered,
    EvenUnfiltered,
    OddUnfiltered,
    HoveredUnfiltered,
}

impl RowColor {
    pub fn resolve(line: usize, filtered: bool, hovered: bool) -> Self {
        match (filtered, hovered, line % 2 == 0) {
            (true, true, _) => RowColor::HoveredFiltered,
            (true, false, true) => RowColor::EvenFiltered,
            (true, false, false) => RowColor::OddFiltered,
            (false, true, _) => RowColor::HoveredUnfiltered,
            (false, false, true) => RowColor::EvenUnfiltered,
            (false, false, false) => RowColor::OddUnfiltered,
        }
    }

    pub fn foreground(self) -> Rgb {
        match self {
            RowColor::HoveredFiltered | RowColor::HoveredUnfiltered => WHITE,
            _ => BLACK,
        }
    }

    pub fn background(self) -> Rgb {
        match self {
            RowColor::EvenFiltered => Rgb(0xcc, 0xff, 0xcc),
            RowColor::OddFiltered => Rgb(0xaa, 0xff, 0xaa),
            RowColor::HoveredFiltered => LEGEND_FILTERED,
            RowColor::EvenUnfiltered => Rgb(0xff, 0xdd, 0xdd),
            RowColor::OddUnfiltered => Rgb(0xff, 0xcc, 0xcc),
            RowColor::HoveredUnfiltered => LEGEND_UNFILTERED,
        }
    }
}

/// Color of `line` showing `source_id`.
pub fn row_color(
    line: usize,
    source_id: SourceId,
    state: &FilterState,
    hovered_line: Option<usize>,
) -> RowColor {
    RowColor::resolve(
        line,
        state.is_source_filtered(source_id),
        hovered_line == Some(line),
    )
}

/// Percentage of a source's sectors found in the image.
///
/// `None` when the file size is unknown, the sector size is zero or the file
/// is smaller than one sector.
pub fn percent_found(
    matched_offset_count: usize,
    filesize: Option<u64>,
    sector_size: u64,
) -> Option<f64> {
    let filesize = filesize?;
    if sector_size == 0 {
        return None;
    }
    let sectors = filesize / sector_size;
    if sectors == 0 {
        return None;
    }
    Some(matched_offset_count as f64 / sectors as f64 * 100.0)
}

/// Map a vertical position inside the listing to a 1-based line number.
///
/// `y` is measured from the top of the first line. Positions above the
/// listing map to `None`.
pub fn line_at(y: f32, line_height: f32) -> Option<usize> {
    if y < 0.0 || line_height <= 0.0 || !y.is_finite() {
        return None;
    }
    Some(((y / line_height) as usize).saturating_add(1))
}

/// One formatted source line.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub source_id: SourceId,
    pub percent_found: Option<f64>,
    pub matched_offset_count: usize,
    pub filesize: Option<u64>,
    pub repository_name: String,
    pub filename: String,
}

impl SourceRow {
    pub fn percent_text(&self) -> String {
        match self.percent_found {
            Some(p) => format!("{:.2}%", p),
            None => UNKNOWN.to_string(),
        }
    }

    pub fn size_text(&self) -> String {
        match self.filesize {
            Some(size) => size.to_string(),
            None => UNKNOWN.to_string(),
        }
    }

    /// Column values in header order.
    pub fn cells(&self) -> [String; 6] {
        [
            self.source_id.to_string(),
            self.percent_text(),
            self.matched_offset_count.to_string(),
            self.size_text(),
            self.repository_name.clone(),
            self.filename.clone(),
        ]
    }

    /// Tab separated line text, matching [`HEADER_TEXT`].
    pub fn text(&self) -> String {
        let mut line = String::new();
        for cell in self.cells() {
            line.push('\t');
            line.push_str(&cell);
        }
        line
    }
}

/// Bidirectional line ↔ source mapping for the rendered rows.
///
/// Both directions are updated together so they cannot disagree.
#[derive(Debug, Clone, Default)]
pub struct RowMap {
    line_to_id: BTreeMap<usize, SourceId>,
    id_to_line: HashMap<SourceId, usize>,
}

impl RowMap {
    fn insert(&mut self, line: usize, source_id: SourceId) {
        if let Some(old_id) = self.line_to_id.insert(line, source_id) {
            self.id_to_line.remove(&old_id);
        }
        if let Some(old_line) = self.id_to_line.insert(source_id, line) {
            if old_line != line {
                self.line_to_id.remove(&old_line);
            }
        }
    }

    fn clear(&mut self) {
        self.line_to_id.clear();
        self.id_to_line.clear();
    }

    pub fn source_at(&self, line: usize) -> Option<SourceId> {
        self.line_to_id.get(&line).copied()
    }

    pub fn line_of(&self, source_id: SourceId) -> Option<usize> {
        self.id_to_line.get(&source_id).copied()
    }

    pub fn len(&self) -> usize {
        self.line_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line_to_id.is_empty()
    }

    /// `(line, source)` pairs in line order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, SourceId)> + '_ {
        self.line_to_id.iter().map(|(l, id)| (*l, *id))
    }
}

/// A line whose color must be (re)applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowPaint {
    pub line: usize,
    pub color: RowColor,
}

/// Rows, line mapping and hover state of the sources listing.
#[derive(Debug, Clone, Default)]
pub struct SourceTable {
    rows: Vec<SourceRow>,
    map: RowMap,
    hovered: Option<usize>,
}

impl SourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild every row from `scan` and return the initial colors.
    ///
    /// Any hover is cleared: the pointer is re-evaluated on its next move.
    pub fn rebuild(&mut self, scan: &ScanData, state: &FilterState) -> Vec<RowPaint> {
        let counts = scan.matched_offset_counts();

        self.rows.clear();
        self.map.clear();
        self.hovered = None;

        for (i, source) in scan.sources.iter().enumerate() {
            let matched = counts.get(&source.source_id).copied().unwrap_or(0);
            self.rows.push(SourceRow {
                source_id: source.source_id,
                percent_found: percent_found(matched, source.filesize, scan.sector_size),
                matched_offset_count: matched,
                filesize: source.filesize,
                repository_name: source.repository_name.clone(),
                filename: source.filename.clone(),
            });
            self.map.insert(FIRST_DATA_LINE + i, source.source_id);
        }

        debug!(rows = self.rows.len(), "rebuilt source table");
        self.recolor_all(state)
    }

    pub fn rows(&self) -> &[SourceRow] {
        &self.rows
    }

    pub fn row_map(&self) -> &RowMap {
        &self.map
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Row displayed at `line`, if `line` is a data line.
    pub fn row_at(&self, line: usize) -> Option<&SourceRow> {
        line.checked_sub(FIRST_DATA_LINE).and_then(|i| self.rows.get(i))
    }

    /// Total number of lines including the header.
    pub fn line_count(&self) -> usize {
        self.rows.len() + 1
    }

    /// Full listing text, header first, one entry per line.
    pub fn lines(&self) -> Vec<String> {
        std::iter::once(HEADER_TEXT.to_string())
            .chain(self.rows.iter().map(SourceRow::text))
            .collect()
    }

    /// Current color of a data line.
    pub fn color_of(&self, line: usize, state: &FilterState) -> Option<RowColor> {
        self.map
            .source_at(line)
            .map(|id| row_color(line, id, state, self.hovered))
    }

    fn paint(&self, line: usize, state: &FilterState) -> Option<RowPaint> {
        self.color_of(line, state).map(|color| RowPaint { line, color })
    }

    /// Recolor every data line, used after the filter state changed.
    pub fn recolor_all(&self, state: &FilterState) -> Vec<RowPaint> {
        self.map
            .iter()
            .map(|(line, id)| RowPaint {
                line,
                color: row_color(line, id, state, self.hovered),
            })
            .collect()
    }

    /// The pointer entered the listing at `line`.
    pub fn enter(&mut self, line: usize, state: &FilterState) -> Vec<RowPaint> {
        self.hover(line, state)
    }

    /// The pointer moved to `line`.
    ///
    /// Restores the previously hovered line and highlights `line` if it shows
    /// a source. Moving within the same line repaints nothing.
    pub fn hover(&mut self, line: usize, state: &FilterState) -> Vec<RowPaint> {
        if self.hovered == Some(line) {
            return Vec::new();
        }

        let mut paints = Vec::with_capacity(2);
        if let Some(old) = self.hovered.take() {
            paints.extend(self.paint(old, state));
        }
        if self.map.source_at(line).is_some() {
            self.hovered = Some(line);
            paints.extend(self.paint(line, state));
        }
        paints
    }

    /// The pointer left the listing.
    pub fn leave(&mut self, state: &FilterState) -> Vec<RowPaint> {
        match self.hovered.take() {
            Some(old) => self.paint(old, state).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Toggle the filtered mark of the source shown at `line`.
    ///
    /// Fires one filter notification. Lines without a source are ignored.
    pub fn click(&self, line: usize, filters: &mut Filters) -> Option<SourceId> {
        let source_id = self.map.source_at(line)?;
        filters.toggle_source(source_id);
        Some(source_id)
    }

    /// Filter every listed source.
    pub fn select_all(&self, filters: &mut Filters) {
        filters.set_filtered_sources(self.rows.iter().map(|r| r.source_id));
    }

    /// Filter no source.
    pub fn clear_all(&self, filters: &mut Filters) {
        filters.clear_filtered_sources();
    }
}
