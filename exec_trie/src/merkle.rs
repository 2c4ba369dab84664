//! SSZ style binary Merkleization.
//!
//! A [`Merkleizer`] owns the table of zero subtree roots
//! (`zero[0] = 0x00..00`, `zero[d + 1] = sha256(zero[d] ‖ zero[d])`), built
//! once at construction for a fixed maximum depth.

use ethereum_types::H256;
use sha2::{Digest, Sha256};

use crate::{TrieError, TrieResult};

/// Zero-hash table depth sufficient for any list indexed by a `u64`.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Binary SHA-256 Merkleization with precomputed zero subtrees.
#[derive(Clone, Debug)]
pub struct Merkleizer {
    zero_hashes: Vec<H256>,
}

impl Default for Merkleizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl Merkleizer {
    /// Builds the zero-hash table for trees of up to `max_depth` levels.
    pub fn new(max_depth: usize) -> Self {
        let mut zero_hashes = Vec::with_capacity(max_depth + 1);
        zero_hashes.push(H256::zero());

        for d in 0..max_depth {
            let z = zero_hashes[d];
            zero_hashes.push(hash_pair(&z, &z));
        }

        Self { zero_hashes }
    }

    /// The deepest tree this merkleizer can build.
    pub fn max_depth(&self) -> usize {
        self.zero_hashes.len() - 1
    }

    /// Root of an all-zero subtree of the given depth.
    pub fn zero_hash(&self, depth: usize) -> Option<H256> {
        self.zero_hashes.get(depth).copied()
    }

    /// Merkleizes `chunks`, padding with zero subtrees up to the next power of
    /// two of `limit` (or of `chunks.len()` when no limit is given).
    pub fn merkleize(&self, chunks: &[H256], limit: Option<usize>) -> TrieResult<H256> {
        let count = limit.unwrap_or(chunks.len());
        if chunks.len() > count {
            return Err(TrieError::MerkleLimitExceeded {
                len: chunks.len(),
                limit: count,
            });
        }

        let depth = ceil_log2(count);
        let max_depth = self.max_depth();
        if depth > max_depth {
            return Err(TrieError::MerkleDepthExceeded { depth, max_depth });
        }

        if chunks.is_empty() {
            return Ok(self.zero_hashes[depth]);
        }

        let mut layer = chunks.to_vec();
        for d in 0..depth {
            if layer.len() % 2 == 1 {
                layer.push(self.zero_hashes[d]);
            }

            layer = layer
                .chunks_exact(2)
                .map(|pair| hash_pair(&pair[0], &pair[1]))
                .collect();
        }

        Ok(layer[0])
    }

    /// The SSZ list root: the merkleized chunks with the unpadded length mixed
    /// in, also when the list is empty.
    pub fn list_root(&self, chunks: &[H256], limit: Option<usize>) -> TrieResult<H256> {
        let root = self.merkleize(chunks, limit)?;
        Ok(mix_in_length(root, chunks.len()))
    }
}

/// `sha256(root ‖ len)` with `len` as a 32 byte little endian integer.
pub fn mix_in_length(root: H256, len: usize) -> H256 {
    let mut len_bytes = [0; 32];
    len_bytes[..8].copy_from_slice(&(len as u64).to_le_bytes());

    hash_pair(&root, &H256(len_bytes))
}

fn hash_pair(left: &H256, right: &H256) -> H256 {
    let mut hasher = Sha256::new();
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());

    H256(hasher.finalize().into())
}

fn ceil_log2(n: usize) -> usize {
    match n {
        0 | 1 => 0,
        _ => (usize::BITS - (n - 1).leading_zeros()) as usize,
    }
}
