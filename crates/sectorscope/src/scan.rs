//! Identified scan data: the sources, hashes and image offsets of one scan.
//!
//! A scan report is a JSON document produced by the block hash scanner. It
//! lists every known source file and every image block whose hash matched
//! the hash database, with the `(source_id, file_offset)` pairs where that
//! hash occurs in the sources:
//!
//! ```json
//! {
//!   "image_filename": "disk.img",
//!   "image_size": 1048576,
//!   "block_size": 512,
//!   "sector_size": 512,
//!   "sources": [
//!     {"source_id": 1, "filesize": 4096, "repository_name": "repo", "filename": "a.jpg"}
//!   ],
//!   "blocks": [
//!     {"offset": 0, "hash": "0f343b0931126a20f133d67c2b018a3b", "flags": "H",
//!      "sources": [{"source_id": 1, "file_offset": 0}]}
//!   ]
//! }
//! ```
//!
//! On load the blocks are folded into two lookups: `hashes` (digest → source
//! occurrences) and `forensic_offsets` (image offset → digest).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Result, ScopeError};
use crate::hexdump::PAGE_SIZE;

/// Identifier of a source file in the hash database.
pub type SourceId = u64;

/// Static attributes of one source file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceDetail {
    pub source_id: SourceId,
    /// Size of the source file in bytes. Absent when an image rather than a
    /// directory of files was imported into the hash database.
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub repository_name: String,
    #[serde(default)]
    pub filename: String,
}

/// One place a hash occurs inside a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct SourceOccurrence {
    pub source_id: SourceId,
    pub file_offset: u64,
}

#[derive(Debug, Deserialize)]
struct BlockRecord {
    offset: u64,
    hash: String,
    #[serde(default)]
    flags: String,
    #[serde(default)]
    sources: Vec<SourceOccurrence>,
}

#[derive(Debug, Deserialize)]
struct ScanReport {
    #[serde(default)]
    image_filename: String,
    #[serde(default)]
    image_size: u64,
    block_size: u64,
    sector_size: u64,
    #[serde(default)]
    sources: Vec<SourceDetail>,
    #[serde(default)]
    blocks: Vec<BlockRecord>,
}

/// Everything known about one scan, indexed for the views.
#[derive(Debug, Clone, Default)]
pub struct ScanData {
    pub image_filename: String,
    /// Image size in bytes, or 0 when the report does not carry it.
    pub image_size: u64,
    pub block_size: u64,
    pub sector_size: u64,
    /// Source details in report order.
    pub sources: Vec<SourceDetail>,
    /// Digest → every occurrence of that digest across the sources.
    pub hashes: HashMap<String, Vec<SourceOccurrence>>,
    /// Image offset of a matched block → its digest.
    pub forensic_offsets: BTreeMap<u64, String>,
    /// Digests of blocks carrying scanner flags.
    pub flagged_hashes: BTreeSet<String>,
}

impl ScanData {
    /// Parse a scan report from JSON bytes.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let report: ScanReport = serde_json::from_slice(bytes)?;
        Self::from_report(report)
    }

    /// Read and parse a scan report from a file.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_json_slice(&bytes)
    }

    fn from_report(report: ScanReport) -> Result<Self> {
        if report.block_size == 0 {
            return Err(ScopeError::InvalidScan("block_size must be non-zero".into()));
        }
        if report.block_size > PAGE_SIZE as u64 {
            return Err(ScopeError::InvalidScan(format!(
                "block_size {} is larger than a page ({} bytes)",
                report.block_size, PAGE_SIZE
            )));
        }

        let mut seen = BTreeSet::new();
        for source in &report.sources {
            if !seen.insert(source.source_id) {
                return Err(ScopeError::InvalidScan(format!(
                    "duplicate source_id {}",
                    source.source_id
                )));
            }
        }

        let mut hashes: HashMap<String, Vec<SourceOccurrence>> = HashMap::new();
        let mut forensic_offsets = BTreeMap::new();
        let mut flagged_hashes = BTreeSet::new();

        for block in report.blocks {
            let digest = block.hash.to_ascii_lowercase();
            if !block.flags.is_empty() {
                flagged_hashes.insert(digest.clone());
            }
            for occurrence in &block.sources {
                if !seen.contains(&occurrence.source_id) {
                    warn!(
                        source_id = occurrence.source_id,
                        offset = block.offset,
                        "block references a source missing from the report"
                    );
                }
            }
            // The same digest may match at several image offsets; its source
            // list is identical each time, so keep the first one.
            hashes.entry(digest.clone()).or_insert(block.sources);
            forensic_offsets.insert(block.offset, digest);
        }

        debug!(
            sources = report.sources.len(),
            hashes = hashes.len(),
            blocks = forensic_offsets.len(),
            "loaded scan report"
        );

        Ok(Self {
            image_filename: report.image_filename,
            image_size: report.image_size,
            block_size: report.block_size,
            sector_size: report.sector_size,
            sources: report.sources,
            hashes,
            forensic_offsets,
            flagged_hashes,
        })
    }

    /// Look up the detail record of a source.
    pub fn source(&self, source_id: SourceId) -> Option<&SourceDetail> {
        self.sources.iter().find(|s| s.source_id == source_id)
    }

    /// Identifiers of every listed source, in report order.
    pub fn source_ids(&self) -> impl Iterator<Item = SourceId> + '_ {
        self.sources.iter().map(|s| s.source_id)
    }

    /// Distinct source file offsets referenced by any matching hash, per source.
    ///
    /// The size of each set is the number of sectors of the source that were
    /// found in the image.
    pub fn sources_offsets(&self) -> HashMap<SourceId, BTreeSet<u64>> {
        let mut offsets: HashMap<SourceId, BTreeSet<u64>> = HashMap::new();
        for occurrences in self.hashes.values() {
            for occurrence in occurrences {
                offsets
                    .entry(occurrence.source_id)
                    .or_default()
                    .insert(occurrence.file_offset);
            }
        }
        offsets
    }

    /// `matched_offset_count` for every source that has at least one match.
    pub fn matched_offset_counts(&self) -> HashMap<SourceId, usize> {
        self.sources_offsets()
            .into_iter()
            .map(|(id, set)| (id, set.len()))
            .collect()
    }

    /// Source identifiers contributing the given digest.
    pub fn sources_of(&self, digest: &str) -> BTreeSet<SourceId> {
        self.hashes
            .get(digest)
            .map(|occ| occ.iter().map(|o| o.source_id).collect())
            .unwrap_or_default()
    }

    /// Image size, falling back to the end of the last matched block.
    pub fn effective_image_size(&self) -> u64 {
        if self.image_size > 0 {
            return self.image_size;
        }
        self.forensic_offsets
            .keys()
            .next_back()
            .map(|last| last + self.block_size)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"{
        "image_filename": "img.raw",
        "block_size": 512,
        "sector_size": 512,
        "sources": [
            {"source_id": 1, "filesize": 2048, "repository_name": "r", "filename": "a"},
            {"source_id": 2, "repository_name": "r", "filename": "b"}
        ],
        "blocks": [
            {"offset": 0, "hash": "AA", "sources": [{"source_id": 1, "file_offset": 0}]},
            {"offset": 512, "hash": "bb", "flags": "H",
             "sources": [{"source_id": 1, "file_offset": 512}, {"source_id": 2, "file_offset": 0}]},
            {"offset": 4096, "hash": "aa", "sources": [{"source_id": 1, "file_offset": 0}]}
        ]
    }"#;

    #[test]
    fn test_load_report() {
        let scan = ScanData::from_json_slice(REPORT.as_bytes()).unwrap();
        assert_eq!(scan.sources.len(), 2);
        assert_eq!(scan.hashes.len(), 2);
        assert_eq!(scan.forensic_offsets.get(&4096).map(String::as_str), Some("aa"));
        assert!(scan.flagged_hashes.contains("bb"));
        assert_eq!(scan.source(2).and_then(|s| s.filesize), None);
        assert_eq!(scan.effective_image_size(), 4608);
    }

    #[test]
    fn test_matched_offset_counts_are_distinct() {
        let scan = ScanData::from_json_slice(REPORT.as_bytes()).unwrap();
        let counts = scan.matched_offset_counts();
        assert_eq!(counts.get(&1), Some(&2));
        assert_eq!(counts.get(&2), Some(&1));
        assert_eq!(scan.sources_of("bb"), BTreeSet::from([1, 2]));
    }

    #[test]
    fn test_zero_block_size_is_rejected() {
        let err = ScanData::from_json_slice(br#"{"block_size": 0, "sector_size": 512}"#)
            .unwrap_err();
        assert!(matches!(err, ScopeError::InvalidScan(_)));
    }

    #[test]
    fn test_oversized_block_size_is_rejected() {
        let err = ScanData::from_json_slice(
            br#"{"block_size": 4294967296, "sector_size": 512}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScopeError::InvalidScan(_)));
        assert!(ScanData::from_json_slice(br#"{"block_size": 16384, "sector_size": 512}"#).is_ok());
    }

    #[test]
    fn test_duplicate_source_rejected() {
        let json = r#"{"block_size": 512, "sector_size": 512,
            "sources": [{"source_id": 3}, {"source_id": 3}]}"#;
        assert!(ScanData::from_json_slice(json.as_bytes()).is_err());
    }
}
