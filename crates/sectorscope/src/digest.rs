//! Block digests of image bytes.
//!
//! The scanner hashes the image in fixed `block_size` blocks. A block at the
//! very end of an image may be short; it is hashed as if zero-extended to the
//! full block size, so the digest shown for a selected offset is the digest
//! the scanner computed for it.

use md5::{Digest, Md5};
use tracing::warn;

use crate::filters::Filters;
use crate::scan::ScanData;

const ZERO_PAD: [u8; 4096] = [0; 4096];

/// The exact bytes hashed for a block: the first `block_size` bytes of
/// `buffer`, zero-padded on the right when the buffer is shorter.
pub fn digest_input(buffer: &[u8], block_size: usize) -> Vec<u8> {
    let mut input = Vec::with_capacity(block_size);
    input.extend_from_slice(&buffer[..buffer.len().min(block_size)]);
    input.resize(block_size, 0);
    input
}

/// Lowercase hex MD5 of the zero-padded block at the start of `buffer`.
pub fn block_digest(buffer: &[u8], block_size: usize) -> String {
    let mut hasher = Md5::new();
    let take = buffer.len().min(block_size);
    hasher.update(&buffer[..take]);
    let mut remaining = block_size - take;
    while remaining > 0 {
        let n = remaining.min(ZERO_PAD.len());
        hasher.update(&ZERO_PAD[..n]);
        remaining -= n;
    }
    hex::encode(hasher.finalize())
}

/// True when `digest` matched the hash database and is not yet filtered.
pub fn can_filter(digest: &str, scan: &ScanData, filters: &Filters) -> bool {
    scan.hashes.contains_key(digest) && !filters.state().is_hash_filtered(digest)
}

/// True when `digest` is currently filtered.
pub fn can_unfilter(digest: &str, filters: &Filters) -> bool {
    filters.state().is_hash_filtered(digest)
}

/// What to do when the user asks to filter or unfilter the selected block's
/// digest from the hex view.
///
/// The view only decides *when* the actions are available (see
/// [`can_filter`] / [`can_unfilter`]); the integrator decides what they do
/// to the filter state.
pub trait HashFilterPolicy {
    fn filter_hash(&mut self, digest: &str, filters: &mut Filters);
    fn unfilter_hash(&mut self, digest: &str, filters: &mut Filters);
}

/// Policy used until an integrator installs one: leaves the filters untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsetHashFilterPolicy;

impl HashFilterPolicy for UnsetHashFilterPolicy {
    fn filter_hash(&mut self, digest: &str, _filters: &mut Filters) {
        warn!(digest, "filter hash requested but no hash filter policy is installed");
    }

    fn unfilter_hash(&mut self, digest: &str, _filters: &mut Filters) {
        warn!(digest, "unfilter hash requested but no hash filter policy is installed");
    }
}
