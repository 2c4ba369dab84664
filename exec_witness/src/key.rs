//! Addressing of leaves in the unified state tree.
//!
//! Every account owns a sequence of stems. A stem groups [`NODE_WIDTH`]
//! leaves. The first stem of an account (tree index `0`) holds its header:
//! - suffix [`BASIC_DATA_LEAF_KEY`]: version, code size, nonce and balance.
//! - suffix [`CODE_HASH_LEAF_KEY`]: the code hash.
//! - suffixes `64..128`: the first 64 storage slots.
//! - suffixes `128..256`: the first 128 code chunks.
//!
//! Later code chunks follow on the next stems, and the remaining storage
//! slots live far away at an offset of `256^31`.

use std::fmt::{self, Display};

use ethereum_types::{H160, U256};
use sha2::{Digest, Sha256};

/// Leaf holding the packed version, code size, nonce and balance.
pub const BASIC_DATA_LEAF_KEY: u8 = 0;
/// Leaf holding the code hash.
pub const CODE_HASH_LEAF_KEY: u8 = 1;
/// First header suffix holding a storage slot.
pub const HEADER_STORAGE_OFFSET: u8 = 64;
/// First header suffix holding a code chunk.
pub const CODE_OFFSET: u8 = 128;
/// Number of leaves under a stem.
pub const NODE_WIDTH: usize = 256;

/// Length of a stem in bytes.
pub const STEM_LEN: usize = 31;

/// Bytes of code per chunk. The 32nd byte of a chunk leaf counts leading push
/// data.
pub const CODE_CHUNK_SIZE: u64 = 31;

/// The branch identifier shared by [`NODE_WIDTH`] leaves.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Stem(pub [u8; STEM_LEN]);

impl Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0.iter() {
            write!(f, "{:02x}", b)?;
        }

        Ok(())
    }
}

/// A leaf: a stem and a suffix selecting one of its leaves.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TreeKey {
    /// The stem.
    pub stem: Stem,
    /// Position under the stem.
    pub suffix: u8,
}

impl TreeKey {
    /// The key of leaf `suffix` under `stem`.
    pub const fn new(stem: Stem, suffix: u8) -> Self {
        Self { stem, suffix }
    }

    /// The 32 byte key `stem ‖ suffix`.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0; 32];
        out[..STEM_LEN].copy_from_slice(&self.stem.0);
        out[STEM_LEN] = self.suffix;

        out
    }

    /// Splits a 32 byte key.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        let mut stem = [0; STEM_LEN];
        stem.copy_from_slice(&bytes[..STEM_LEN]);

        Self::new(Stem(stem), bytes[STEM_LEN])
    }
}

impl Display for TreeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}{:02x}", self.stem, self.suffix)
    }
}

/// Derives the stems of an account.
pub trait TreeKeyHasher {
    /// The stem at `tree_index` of `address`.
    fn stem(&self, address: H160, tree_index: U256) -> Stem;

    /// The key of leaf `suffix` at `tree_index` of `address`.
    fn tree_key(&self, address: H160, tree_index: U256, suffix: u8) -> TreeKey {
        TreeKey::new(self.stem(address, tree_index), suffix)
    }

    /// The basic data leaf of `address`.
    fn basic_data_key(&self, address: H160) -> TreeKey {
        self.tree_key(address, U256::zero(), BASIC_DATA_LEAF_KEY)
    }

    /// The code hash leaf of `address`.
    fn code_hash_key(&self, address: H160) -> TreeKey {
        self.tree_key(address, U256::zero(), CODE_HASH_LEAF_KEY)
    }

    /// The leaf of storage slot `slot` of `address`.
    fn storage_slot_key(&self, address: H160, slot: U256) -> TreeKey {
        let (tree_index, suffix) = storage_index(slot);
        self.tree_key(address, tree_index, suffix)
    }

    /// The leaf of code chunk `chunk` of `address`.
    fn code_chunk_key(&self, address: H160, chunk: u64) -> TreeKey {
        let (tree_index, suffix) = code_chunk_index(chunk);
        self.tree_key(address, tree_index, suffix)
    }
}

/// `sha256(address padded to 32 bytes ‖ tree_index as 32 little endian
/// bytes)`, truncated to the stem length.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256TreeKeyHasher;

impl TreeKeyHasher for Sha256TreeKeyHasher {
    fn stem(&self, address: H160, tree_index: U256) -> Stem {
        let mut input = [0u8; 64];
        input[12..32].copy_from_slice(address.as_bytes());
        tree_index.to_little_endian(&mut input[32..]);

        let digest = Sha256::digest(input);
        let mut stem = [0; STEM_LEN];
        stem.copy_from_slice(&digest[..STEM_LEN]);

        Stem(stem)
    }
}

/// Tree index and suffix of storage slot `slot`.
pub fn storage_index(slot: U256) -> (U256, u8) {
    let header_slots = U256::from(CODE_OFFSET - HEADER_STORAGE_OFFSET);
    if slot < header_slots {
        return (U256::zero(), HEADER_STORAGE_OFFSET + slot.low_u32() as u8);
    }

    // `(256^31 + slot) / 256` without overflowing.
    let main_storage_index = U256::one() << 240;
    ((slot >> 8) + main_storage_index, slot.byte(0))
}

/// Tree index and suffix of code chunk `chunk`.
pub fn code_chunk_index(chunk: u64) -> (U256, u8) {
    let pos = U256::from(CODE_OFFSET) + U256::from(chunk);
    (pos / NODE_WIDTH, pos.byte(0))
}
