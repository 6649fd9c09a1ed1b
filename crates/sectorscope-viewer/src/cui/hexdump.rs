use anyhow::Result;

use sectorscope::{ImageReader, digest, hexdump};

use crate::ViewSettings;

/// Dump `length` bytes of the image at `offset` to stdout.
pub fn print_hexdump(
    reader: &mut dyn ImageReader,
    offset: u64,
    length: usize,
    settings: ViewSettings,
) -> Result<()> {
    let buf = reader.read(offset, length)?;
    if buf.is_empty() {
        eprintln!(
            "offset {} is past the end of the image ({} bytes)",
            offset,
            reader.image_size()
        );
        return Ok(());
    }
    print!("{}", hexdump::format_dump(offset, &buf, settings.line_width));
    Ok(())
}

/// One `digest  offset  bytes` line. Blocks cut short by the end of the
/// image are hashed zero-extended; `bytes` tells how much was real.
fn digest_line(buf: &[u8], offset: u64, block_size: usize) -> String {
    let digest = digest::block_digest(buf, block_size);
    let real = buf.len().min(block_size);
    if real < block_size {
        format!("{}  {}  {}/{} (zero padded)", digest, offset, real, block_size)
    } else {
        format!("{}  {}  {}", digest, offset, block_size)
    }
}

/// Print the block digest at `offset`.
pub fn print_digest(reader: &mut dyn ImageReader, offset: u64, block_size: usize) -> Result<()> {
    let buf = reader.read(offset, block_size)?;
    println!("{}", digest_line(&buf, offset, block_size));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_line_marks_padding() {
        let full = digest_line(b"abc", 7, 3);
        assert_eq!(full, "900150983cd24fb0d6963f7d28e17f72  7  3");

        let short = digest_line(&[0u8; 100], 0, 512);
        assert!(short.starts_with("bf619eac0cdf3f68d496ea9344137e8b  0  100/512"));
    }
}
