//! Fixed-width hex + ASCII dump of a page of image bytes.
//!
//! Each produced line has three parts:
//!  - the absolute image address of the first byte, `0x` + 8 hex digits + `:`,
//!  - `line_width` hex byte cells (`"xx "`), with an extra space in front of
//!    every fourth cell so the bytes read in groups of four,
//!  - the printable-ASCII rendering of the bytes present on the line.
//!
//! Addresses are page relative: the caller passes the image offset the buffer
//! was read from and every line address is that base plus the position of the
//! line's first byte inside the buffer.
//!
//! ```
//! use sectorscope::hexdump::format_lines;
//!
//! let lines = format_lines(0x200, b"ABCD\x00", 16);
//! assert_eq!(lines.len(), 1);
//! assert!(lines[0].starts_with("0x00000200: 41 42 43 44  00 "));
//! assert!(lines[0].ends_with("ABCD."));
//! ```

/// Number of image bytes read for one hex view page.
pub const PAGE_SIZE: usize = 16384;

/// Default number of bytes rendered per line.
pub const LINE_WIDTH: usize = 16;

/// Blank placeholder emitted in the hex columns for a position with no byte.
const MISSING_CELL: &str = "   ";

/// Returns true when `byte` is rendered literally in the ASCII column.
///
/// Space (0x20) and DEL (0x7f) are excluded, everything in between is shown.
pub fn is_printable(byte: u8) -> bool {
    byte > 31 && byte < 127
}

/// Format the address label of a line starting at `address`.
pub fn address_label(address: u64) -> String {
    format!("0x{:08x}:", address)
}

/// Format one line of at most `line_width` bytes starting at image `address`.
///
/// `chunk` may be shorter than `line_width` (the last line of a short read);
/// missing positions are padded in the hex columns and omitted in the ASCII
/// column.
pub fn format_line(address: u64, chunk: &[u8], line_width: usize) -> String {
    // 11 address chars, 3 per cell, a group gap per 4 cells and the ASCII column.
    let mut line = String::with_capacity(11 + line_width * 4 + line_width / 4 + 1);
    line.push_str(&address_label(address));

    for j in 0..line_width {
        if j % 4 == 0 {
            line.push(' ');
        }
        match chunk.get(j) {
            Some(b) => line.push_str(&format!("{:02x} ", b)),
            None => line.push_str(MISSING_CELL),
        }
    }

    for &b in chunk.iter().take(line_width) {
        line.push(if is_printable(b) { b as char } else { '.' });
    }

    line
}

/// Format `buffer`, read from image offset `base_offset`, into dump lines.
///
/// Produces `ceil(buffer.len() / line_width)` lines; an empty buffer or a zero
/// `line_width` produces none.
pub fn format_lines(base_offset: u64, buffer: &[u8], line_width: usize) -> Vec<String> {
    if line_width == 0 {
        return Vec::new();
    }
    buffer
        .chunks(line_width)
        .enumerate()
        .map(|(i, chunk)| {
            let address = base_offset.saturating_add((i * line_width) as u64);
            format_line(address, chunk, line_width)
        })
        .collect()
}

/// Format `buffer` into a single string with every line newline-terminated.
pub fn format_dump(base_offset: u64, buffer: &[u8], line_width: usize) -> String {
    let mut out = String::new();
    for line in format_lines(base_offset, buffer, line_width) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_line_layout() {
        let bytes: Vec<u8> = (0x40u8..0x50).collect();
        let line = format_line(0, &bytes, 16);
        assert_eq!(
            line,
            "0x00000000: 40 41 42 43  44 45 46 47  48 49 4a 4b  4c 4d 4e 4f @ABCDEFGHIJKLMNO"
        );
    }

    #[test]
    fn test_short_line_pads_hex_but_not_ascii() {
        let line = format_line(0x10, &[0x61, 0x0a], 8);
        assert_eq!(line, format!("0x00000010: 61 0a{}a.", " ".repeat(20)));
    }

    #[test]
    fn test_group_gap_is_relative_to_line() {
        // A width that is not a multiple of four still groups from the line start.
        let line = format_line(0, &[1, 2, 3, 4, 5, 6], 6);
        assert_eq!(line, "0x00000000: 01 02 03 04  05 06 ......");
    }

    #[test]
    fn test_zero_width_produces_nothing() {
        assert!(format_lines(0, &[1, 2, 3], 0).is_empty());
    }

    #[test]
    fn test_wide_address() {
        assert_eq!(address_label(0x1_0000_0000), "0x100000000:");
    }
}
