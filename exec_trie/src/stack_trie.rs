//! A streaming trie accumulator for keys inserted in ascending order.
//!
//! Once a key is inserted, every subtree to the left of its path can no
//! longer change, so [`StackTrie`] collapses those subtrees into their
//! encodings right away. Memory use is bounded by the depth of the trie
//! rather than the number of entries.

use ethereum_types::H256;
use log::trace;

use crate::{
    derive::TrieHasher,
    nibbles::Nibbles,
    trie_hashing::{encode_branch, encode_empty, encode_extension, encode_leaf, EncodedNode},
    TrieError, TrieResult,
};

#[derive(Clone, Debug, Default)]
enum StNode {
    #[default]
    Empty,
    Leaf {
        nibbles: Nibbles,
        value: Vec<u8>,
    },
    Extension {
        nibbles: Nibbles,
        child: Box<StNode>,
    },
    Branch {
        children: Box<[StNode; 16]>,
    },
    /// A subtree that can no longer change, replaced by its encoding.
    Hashed(EncodedNode),
}

impl StNode {
    fn leaf(nibbles: Nibbles, value: Vec<u8>) -> Self {
        Self::Leaf { nibbles, value }
    }

    fn empty_branch() -> Self {
        Self::Branch {
            children: Box::new(std::array::from_fn(|_| StNode::Empty)),
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, StNode::Empty)
    }

    /// Replaces the node by its encoding.
    fn collapse(&mut self) {
        if !matches!(self, StNode::Hashed(_) | StNode::Empty) {
            *self = StNode::Hashed(self.encode());
        }
    }

    fn encode(&self) -> EncodedNode {
        match self {
            StNode::Empty => encode_empty(),
            StNode::Leaf { nibbles, value } => encode_leaf(nibbles, value),
            StNode::Extension { nibbles, child } => encode_extension(nibbles, child.encode()),
            StNode::Branch { children } => encode_branch(children.iter().map(StNode::encode), &[]),
            StNode::Hashed(enc) => enc.clone(),
        }
    }

    /// Inserts below this node. `key` must sort after every key already
    /// present and must not extend any of them.
    fn insert(&mut self, key: Nibbles, value: Vec<u8>) {
        match self {
            StNode::Empty => *self = StNode::leaf(key, value),
            StNode::Branch { children } => {
                let idx = key.get_nibble(0) as usize;

                // The closest left sibling is complete now.
                if let Some(sibling) = children[..idx].iter_mut().rev().find(|c| !c.is_empty()) {
                    sibling.collapse();
                }

                children[idx].insert(key.truncate_n_nibbles_front(1), value);
            }
            StNode::Extension { nibbles, child } => {
                let diff_idx = nibbles.find_nibble_idx_that_differs(&key);

                if diff_idx == nibbles.count() {
                    child.insert(key.truncate_n_nibbles_front(diff_idx), value);
                    return;
                }

                // Everything under the extension sorts before the new key.
                let mut existing = match diff_idx + 1 < nibbles.count() {
                    true => StNode::Extension {
                        nibbles: nibbles.truncate_n_nibbles_front(diff_idx + 1),
                        child: std::mem::take(child),
                    },
                    false => std::mem::take(&mut **child),
                };
                existing.collapse();

                let mut branch = StNode::empty_branch();
                if let StNode::Branch { children } = &mut branch {
                    children[nibbles.get_nibble(diff_idx) as usize] = existing;
                    children[key.get_nibble(diff_idx) as usize] =
                        StNode::leaf(key.truncate_n_nibbles_front(diff_idx + 1), value);
                }

                *self = wrap_in_extension_if_needed(nibbles.get_nibble_range(0..diff_idx), branch);
            }
            StNode::Leaf {
                nibbles,
                value: existing_value,
            } => {
                let diff_idx = nibbles.find_nibble_idx_that_differs(&key);

                let mut existing = StNode::leaf(
                    nibbles.truncate_n_nibbles_front(diff_idx + 1),
                    std::mem::take(existing_value),
                );
                existing.collapse();

                let mut branch = StNode::empty_branch();
                if let StNode::Branch { children } = &mut branch {
                    children[nibbles.get_nibble(diff_idx) as usize] = existing;
                    children[key.get_nibble(diff_idx) as usize] =
                        StNode::leaf(key.truncate_n_nibbles_front(diff_idx + 1), value);
                }

                *self = wrap_in_extension_if_needed(nibbles.get_nibble_range(0..diff_idx), branch);
            }
            StNode::Hashed(_) => {
                unreachable!("Ordered inserts never descend into a collapsed subtree")
            }
        }
    }
}

fn wrap_in_extension_if_needed(prefix: Nibbles, branch: StNode) -> StNode {
    match prefix.is_empty() {
        true => branch,
        false => StNode::Extension {
            nibbles: prefix,
            child: Box::new(branch),
        },
    }
}

/// Streaming accumulator requiring strictly ascending keys.
///
/// Keys must also be prefix free (no key may extend an earlier one), which
/// holds for the RLP encoded indices used by
/// [`derive_sha`](crate::derive_sha).
#[derive(Clone, Debug, Default)]
pub struct StackTrie {
    root: StNode,
    last_key: Option<Vec<u8>>,
}

impl StackTrie {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under `key`.
    pub fn insert(&mut self, key: &[u8], value: &[u8]) -> TrieResult<()> {
        if value.is_empty() {
            return Err(TrieError::EmptyValue(hex::encode(key)));
        }

        if let Some(prev) = &self.last_key {
            if key <= prev.as_slice() {
                return Err(TrieError::UnorderedKey {
                    prev: hex::encode(prev),
                    key: hex::encode(key),
                });
            }

            if key.starts_with(prev) {
                return Err(TrieError::PrefixKey {
                    prev: hex::encode(prev),
                    key: hex::encode(key),
                });
            }
        }

        trace!("Inserting key {} into stack trie", hex::encode(key));

        self.root
            .insert(Nibbles::from_bytes_be(key), value.to_vec());
        self.last_key = Some(key.to_vec());

        Ok(())
    }

    /// The root hash of everything inserted so far. The root is always
    /// hashed, even when its encoding is shorter than 32 bytes.
    pub fn root_hash(&self) -> H256 {
        (&self.root.encode()).into()
    }
}

impl TrieHasher for StackTrie {
    fn reset(&mut self) {
        *self = Self::default();
    }

    fn update(&mut self, key: &[u8], value: &[u8]) -> TrieResult<()> {
        self.insert(key, value)
    }

    fn hash(&mut self) -> H256 {
        self.root_hash()
    }
}
