//! Commitments over ordered lists of execution-layer items.
//!
//! Block headers commit to their transactions, receipts and withdrawals with
//! the root of a Merkle Patricia trie keyed by the RLP encoding of each item's
//! index, and to their requests with an SSZ list root. This crate provides:
//! - the [`DerivableList`][derive::DerivableList] protocol and
//!   [`derive_sha`][derive::derive_sha], which feeds a list into a trie
//!   accumulator in the canonical insertion order.
//! - two interchangeable accumulators implementing
//!   [`TrieHasher`][derive::TrieHasher]: the order-independent
//!   [`HashTrie`][hash_trie::HashTrie] and the streaming
//!   [`StackTrie`][stack_trie::StackTrie].
//! - SSZ [`Merkleizer`][merkle::Merkleizer] with a zero-hash table built once
//!   at construction.

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]
#![deny(missing_docs)]

pub mod derive;
pub mod hash_trie;
pub mod merkle;
pub mod nibbles;
pub mod stack_trie;
mod trie_hashing;

use thiserror::Error;

pub use derive::{derive_sha, DerivableList, TrieHasher};
pub use hash_trie::HashTrie;
pub use merkle::Merkleizer;
pub use stack_trie::StackTrie;

/// Stores the result of trie operations. Returns a [TrieError] upon failure.
pub type TrieResult<T> = Result<T, TrieError>;

/// An error type for trie and merkleization operations.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum TrieError {
    /// A streaming accumulator received a key that does not sort strictly
    /// after the previous one.
    #[error("Key {key} was inserted after {prev}, keys must be strictly increasing")]
    UnorderedKey {
        /// The previous key (hex).
        prev: String,
        /// The offending key (hex).
        key: String,
    },

    /// A streaming accumulator received a key extending the previous key,
    /// which would require a value on a branch node.
    #[error("Key {key} extends the previously inserted key {prev}")]
    PrefixKey {
        /// The previous key (hex).
        prev: String,
        /// The offending key (hex).
        key: String,
    },

    /// Empty values are deletions, which accumulators do not support.
    #[error("Attempted to insert an empty value for key {0}")]
    EmptyValue(String),

    /// An SSZ list has more chunks than its limit allows.
    #[error("Merkleizing {len} chunks exceeds the limit of {limit}")]
    MerkleLimitExceeded {
        /// Number of chunks.
        len: usize,
        /// The limit.
        limit: usize,
    },

    /// The tree is deeper than the zero-hash table of the merkleizer.
    #[error("Merkle tree depth {depth} exceeds the zero-hash table depth {max_depth}")]
    MerkleDepthExceeded {
        /// Depth required.
        depth: usize,
        /// Depth supported.
        max_depth: usize,
    },
}

#[cfg(test)]
pub(crate) mod testing_utils;
