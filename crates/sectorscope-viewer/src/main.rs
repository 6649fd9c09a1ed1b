//! `sectorscope` front end.
//!
//! Without a subcommand this opens the eframe viewer on a scan report. The
//! subcommands print the same views as text for use in scripts and over ssh.

mod cui;
mod gui;

use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use flate2::read::GzDecoder;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use sectorscope::hexdump::{LINE_WIDTH, PAGE_SIZE};
use sectorscope::histogram::DEFAULT_BUCKETS;
use sectorscope::{FileImageReader, ImageReader, MemoryImageReader, OffsetFormat, ScanData};

/// How image offsets are written in labels.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OffsetFormatArg {
    #[default]
    Decimal,
    Hex,
    Sector,
}

impl From<OffsetFormatArg> for OffsetFormat {
    fn from(arg: OffsetFormatArg) -> Self {
        match arg {
            OffsetFormatArg::Decimal => OffsetFormat::Decimal,
            OffsetFormatArg::Hex => OffsetFormat::Hex,
            OffsetFormatArg::Sector => OffsetFormat::Sector,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a hex dump of image bytes
    Hexdump {
        /// Media image (raw, or gzip compressed)
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Image offset of the first byte to dump
        #[arg(long, default_value_t = 0)]
        offset: u64,

        /// Number of bytes to dump (defaults to --page-size)
        #[arg(long)]
        length: Option<usize>,
    },
    /// Print the block digest at an image offset
    Digest {
        /// Media image (raw, or gzip compressed)
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Image offset of the block
        #[arg(long, default_value_t = 0)]
        offset: u64,

        /// Block size the scanner hashed with (at most one page)
        #[arg(
            long,
            default_value_t = 512,
            value_parser = clap::value_parser!(u64).range(1..=PAGE_SIZE as u64),
        )]
        block_size: u64,
    },
    /// Print the matched sources of a scan report
    Sources {
        /// Scan report (JSON, optionally gzip compressed)
        #[arg(value_name = "SCAN")]
        scan: PathBuf,
    },
    /// Print match counts across the image
    Histogram {
        /// Scan report (JSON, optionally gzip compressed)
        #[arg(value_name = "SCAN")]
        scan: PathBuf,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "sectorscope",
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Scan report to open in the viewer
    #[arg(value_name = "SCAN")]
    scan: Option<PathBuf>,

    /// Media image for the viewer (defaults to the image named in the scan report)
    #[arg(long, value_name = "IMAGE")]
    image: Option<PathBuf>,

    /// Bytes read for one hex view page
    #[arg(long, global = true, default_value_t = PAGE_SIZE)]
    page_size: usize,

    /// Bytes per hex dump line
    #[arg(long, global = true, default_value_t = LINE_WIDTH)]
    line_width: usize,

    /// Buckets across the histogram
    #[arg(long, global = true, default_value_t = DEFAULT_BUCKETS)]
    buckets: usize,

    /// How image offsets are written
    #[arg(long, global = true, value_enum, default_value_t = OffsetFormatArg::Decimal)]
    offset_format: OffsetFormatArg,

    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Viewer settings taken from the command line.
#[derive(Debug, Clone, Copy)]
pub struct ViewSettings {
    pub page_size: usize,
    pub line_width: usize,
    pub buckets: usize,
    pub offset_format: OffsetFormat,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn is_gzip(path: &Path, data: &[u8]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
        || (data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b)
}

/// Read a whole file, decompressing it when it is gzip (by extension or by
/// the 0x1f 0x8b header).
fn load_bytes_from_path(path: &Path) -> anyhow::Result<Vec<u8>> {
    let data =
        fs::read(path).with_context(|| format!("failed to read file: {}", path.display()))?;

    if is_gzip(path, &data) {
        let mut decoder = GzDecoder::new(Cursor::new(data));
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .context("gzip decompression failed")?;
        Ok(out)
    } else {
        Ok(data)
    }
}

/// Load and index a scan report.
fn load_scan(path: &Path) -> anyhow::Result<ScanData> {
    let bytes = load_bytes_from_path(path)?;
    ScanData::from_json_slice(&bytes)
        .with_context(|| format!("invalid scan report: {}", path.display()))
}

/// Open a media image. Raw images are read on demand; compressed ones are
/// inflated into memory.
fn open_image(path: &Path) -> anyhow::Result<Box<dyn ImageReader>> {
    let mut head = [0u8; 2];
    let n = fs::File::open(path)
        .and_then(|mut f| f.read(&mut head))
        .with_context(|| format!("failed to open image: {}", path.display()))?;

    if is_gzip(path, &head[..n]) {
        let bytes = load_bytes_from_path(path)?;
        debug!(path = %path.display(), bytes = bytes.len(), "inflated image into memory");
        Ok(Box::new(MemoryImageReader::new(bytes)))
    } else {
        let reader = FileImageReader::open(path)
            .with_context(|| format!("failed to open image: {}", path.display()))?;
        Ok(Box::new(reader))
    }
}

/// The image to show next to a scan: `--image` if given, otherwise the
/// report's `image_filename` resolved against the report's directory.
fn resolve_image_path(
    explicit: Option<PathBuf>,
    scan_path: &Path,
    scan: &ScanData,
) -> Option<PathBuf> {
    if explicit.is_some() {
        return explicit;
    }
    if scan.image_filename.is_empty() {
        return None;
    }
    let named = PathBuf::from(&scan.image_filename);
    if named.is_absolute() {
        return Some(named);
    }
    Some(
        scan_path
            .parent()
            .map(|dir| dir.join(&named))
            .unwrap_or(named),
    )
}

fn exit_on_error(what: &str, result: anyhow::Result<()>) -> ! {
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{} failed: {:#}", what, e);
            std::process::exit(1);
        }
    }
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let settings = ViewSettings {
        page_size: args.page_size.max(1),
        line_width: args.line_width.max(1),
        buckets: args.buckets.max(1),
        offset_format: args.offset_format.into(),
    };

    match args.command {
        Some(Commands::Hexdump {
            image,
            offset,
            length,
        }) => {
            let length = length.unwrap_or(settings.page_size);
            let result = open_image(&image).and_then(|mut reader| {
                cui::hexdump::print_hexdump(reader.as_mut(), offset, length, settings)
            });
            exit_on_error("hexdump", result);
        }
        Some(Commands::Digest {
            image,
            offset,
            block_size,
        }) => {
            let result = open_image(&image).and_then(|mut reader| {
                cui::hexdump::print_digest(reader.as_mut(), offset, block_size as usize)
            });
            exit_on_error("digest", result);
        }
        Some(Commands::Sources { scan }) => {
            exit_on_error(
                "sources",
                load_scan(&scan).map(|s| cui::sources::print_sources(&s)),
            );
        }
        Some(Commands::Histogram { scan }) => {
            exit_on_error(
                "histogram",
                load_scan(&scan).map(|s| cui::histogram::print_histogram(&s, settings)),
            );
        }
        None => {}
    }

    // Viewer: a scan that fails to load is reported and the window opens empty.
    let mut scan = ScanData::default();
    let mut reader: Box<dyn ImageReader> = Box::new(MemoryImageReader::default());
    if let Some(path) = args.scan {
        match load_scan(&path) {
            Ok(loaded) => {
                if let Some(image_path) = resolve_image_path(args.image, &path, &loaded) {
                    match open_image(&image_path) {
                        Ok(r) => reader = r,
                        Err(e) => warn!("{:#}", e),
                    }
                }
                scan = loaded;
            }
            Err(e) => eprintln!("{:#}", e),
        }
    } else if let Some(image_path) = args.image {
        match open_image(&image_path) {
            Ok(r) => reader = r,
            Err(e) => eprintln!("{:#}", e),
        }
    }

    gui::run_gui(scan, reader, settings);
}
