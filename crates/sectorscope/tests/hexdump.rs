use sectorscope::digest::{block_digest, can_filter, can_unfilter, digest_input};
use sectorscope::hexdump::{LINE_WIDTH, PAGE_SIZE, format_dump, format_lines, is_printable};
use sectorscope::{Filters, HexPanel, MemoryImageReader, ScanData};

fn ascii_column(line: &str, width: usize) -> &str {
    // "0x" + 8 digits + ":" then 3 chars per cell and one gap per group.
    let hex_len = 11 + width * 3 + width.div_ceil(4);
    &line[hex_len..]
}

#[test]
fn test_line_count_is_ceil_of_len() {
    for (len, width, expected) in [
        (0usize, 16usize, 0usize),
        (1, 16, 1),
        (16, 16, 1),
        (17, 16, 2),
        (PAGE_SIZE, LINE_WIDTH, PAGE_SIZE / LINE_WIDTH),
        (10, 3, 4),
    ] {
        let buf = vec![0x30u8; len];
        assert_eq!(format_lines(0, &buf, width).len(), expected, "len={len} width={width}");
    }
}

#[test]
fn test_printable_range() {
    for v in 0u8..=255 {
        let line = &format_lines(0, &[v], 16)[0];
        let ascii = ascii_column(line, 16);
        if v > 31 && v < 127 {
            assert!(is_printable(v));
            assert_eq!(ascii, (v as char).to_string());
        } else {
            assert!(!is_printable(v));
            assert_eq!(ascii, ".");
        }
    }
}

#[test]
fn test_addresses_are_page_relative() {
    let buf = vec![0u8; 40];
    let lines = format_lines(0x7ff0, &buf, 16);
    assert!(lines[0].starts_with("0x00007ff0:"));
    assert!(lines[1].starts_with("0x00008000:"));
    assert!(lines[2].starts_with("0x00008010:"));
}

#[test]
fn test_last_line_placeholders() {
    let buf: Vec<u8> = b"0123456789abcdefXYZ".to_vec();
    let lines = format_lines(0, &buf, 16);
    assert_eq!(lines.len(), 2);

    let last = &lines[1];
    assert_eq!(
        last,
        &format!("0x00000010: 58 59 5a {}XYZ", " ".repeat(3 * 13 + 3))
    );
    // Every line has the same hex width; only the ASCII column shrinks.
    assert_eq!(ascii_column(&lines[0], 16), "0123456789abcdef");
    assert_eq!(ascii_column(last, 16), "XYZ");
}

#[test]
fn test_format_dump_terminates_lines() {
    let dump = format_dump(0, &[1, 2, 3], 16);
    assert!(dump.ends_with(".\n"));
    assert_eq!(dump.lines().count(), 1);
    assert_eq!(format_dump(0, &[], 16), "");
}

#[test]
fn test_digest_input_zero_pads_short_block() {
    let buf = [0x41, 0x42, 0x43, 0x44, 0x45];
    assert_eq!(
        digest_input(&buf, 8),
        vec![0x41, 0x42, 0x43, 0x44, 0x45, 0x00, 0x00, 0x00]
    );
}

#[test]
fn test_known_md5() {
    // md5("abc")
    assert_eq!(block_digest(b"abc", 3), "900150983cd24fb0d6963f7d28e17f72");
    // A 512 byte block of zeros, whether read fully or not at all.
    let zeros = "bf619eac0cdf3f68d496ea9344137e8b";
    assert_eq!(block_digest(&[0u8; 512], 512), zeros);
    assert_eq!(block_digest(&[], 512), zeros);
}

fn scan_with_hash(digest: &str) -> ScanData {
    let json = format!(
        r#"{{"block_size": 512, "sector_size": 512,
            "sources": [{{"source_id": 1, "filesize": 1024}}],
            "blocks": [{{"offset": 0, "hash": "{digest}",
                         "sources": [{{"source_id": 1, "file_offset": 0}}]}}]}}"#
    );
    ScanData::from_json_slice(json.as_bytes()).unwrap()
}

#[test]
fn test_filter_queries() {
    let zeros = block_digest(&[], 512);
    let scan = scan_with_hash(&zeros);
    let mut filters = Filters::new();

    assert!(can_filter(&zeros, &scan, &filters));
    assert!(!can_unfilter(&zeros, &filters));
    assert!(!can_filter("ffff", &scan, &filters));

    filters.update(|s| {
        s.filtered_hashes.insert(zeros.clone());
    });
    assert!(!can_filter(&zeros, &scan, &filters));
    assert!(can_unfilter(&zeros, &filters));
}

#[test]
fn test_hex_panel_selection() {
    let zeros = block_digest(&[], 512);
    let scan = scan_with_hash(&zeros);
    let filters = Filters::new();
    let mut reader = MemoryImageReader::new(vec![0u8; 1000]);
    let mut panel = HexPanel::default();

    panel
        .select_offset(Some(512), &mut reader, &scan, &filters)
        .unwrap();
    // 488 bytes remain past offset 512.
    assert_eq!(panel.lines().len(), 31);
    assert!(panel.lines()[0].starts_with("0x00000200:"));
    // Short block is zero-extended, so it hashes like a full zero block.
    assert_eq!(panel.digest(), Some(zeros.as_str()));
    assert!(panel.filter_enabled());
    assert!(!panel.unfilter_enabled());
    assert_eq!(panel.offset_label(512), "Image offset: 512");

    panel.select_offset(None, &mut reader, &scan, &filters).unwrap();
    assert!(panel.lines().is_empty());
    assert_eq!(panel.digest_label(), "Not selected");
    assert!(!panel.filter_enabled());
}

#[test]
fn test_hex_panel_past_end_of_image() {
    let scan = scan_with_hash("aa");
    let filters = Filters::new();
    let mut reader = MemoryImageReader::new(vec![1u8; 16]);
    let mut panel = HexPanel::default();

    panel
        .select_offset(Some(4096), &mut reader, &scan, &filters)
        .unwrap();
    assert!(panel.lines().is_empty());
    assert_eq!(panel.digest(), Some(block_digest(&[], 512).as_str()));
    assert!(!panel.filter_enabled());
}
