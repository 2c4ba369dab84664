//! An in-memory Merkle Patricia trie that accepts inserts in any order.
//!
//! [`HashTrie`] keeps the full node structure and only hashes it when the
//! root is requested, caching the result until the next insert. It is the
//! reference accumulator the streaming [`StackTrie`](crate::StackTrie) is
//! checked against, and also supports keys that are prefixes of other keys
//! (values stored on branch nodes).

use enum_as_inner::EnumAsInner;
use ethereum_types::H256;
use log::trace;

use crate::{
    derive::TrieHasher,
    nibbles::Nibbles,
    trie_hashing::{encode_branch, encode_empty, encode_extension, encode_leaf, EncodedNode},
    TrieError, TrieResult,
};

/// A node in a [`HashTrie`].
#[derive(Clone, Debug, Default, EnumAsInner, Eq, PartialEq)]
pub enum Node {
    /// An empty trie.
    #[default]
    Empty,

    /// A branch node, which consists of 16 children and an optional value.
    Branch {
        /// A slice containing the 16 children of this branch node.
        children: Box<[Node; 16]>,
        /// The payload of this node. Empty if there is none.
        value: Vec<u8>,
    },

    /// An extension node, which consists of a list of nibbles and a single
    /// child.
    Extension {
        /// The path of this extension.
        nibbles: Nibbles,
        /// The child of this extension node.
        child: Box<Node>,
    },

    /// A leaf node, which consists of a list of nibbles and a value.
    Leaf {
        /// The path of this leaf node.
        nibbles: Nibbles,
        /// The payload of this node.
        value: Vec<u8>,
    },
}

/// Order independent trie accumulator with a cached root hash.
#[derive(Clone, Debug, Default)]
pub struct HashTrie {
    root: Node,
    hash: Option<H256>,
}

impl HashTrie {
    /// Creates an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// The root node.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Inserts `value` under `key`, replacing any existing value.
    pub fn insert(&mut self, key: &[u8], value: &[u8]) -> TrieResult<()> {
        let nibbles = Nibbles::from_bytes_be(key);
        if value.is_empty() {
            return Err(TrieError::EmptyValue(nibbles.to_string()));
        }

        trace!("Inserting new node {} into hash trie...", nibbles);

        let root = std::mem::take(&mut self.root);
        self.root = insert_into_trie_rec(root, nibbles, value.to_vec());
        self.hash = None;

        Ok(())
    }

    /// Looks up the value stored under `key`.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        let mut curr = &self.root;
        let mut k = Nibbles::from_bytes_be(key);

        loop {
            match curr {
                Node::Empty => return None,
                Node::Branch { children, value } => {
                    if k.is_empty() {
                        return (!value.is_empty()).then_some(value.as_slice());
                    }

                    curr = &children[k.get_nibble(0) as usize];
                    k = k.truncate_n_nibbles_front(1);
                }
                Node::Extension { nibbles, child } => {
                    if !nibbles.is_prefix_of(&k) {
                        return None;
                    }

                    k = k.truncate_n_nibbles_front(nibbles.count());
                    curr = child;
                }
                Node::Leaf { nibbles, value } => {
                    return (*nibbles == k).then_some(value.as_slice());
                }
            }
        }
    }

    /// Computes (or returns the cached) root hash.
    pub fn get_hash(&mut self) -> H256 {
        *self
            .hash
            .get_or_insert_with(|| (&rlp_encode_and_hash_node(&self.root)).into())
    }
}

impl TrieHasher for HashTrie {
    fn reset(&mut self) {
        *self = Self::default();
    }

    fn update(&mut self, key: &[u8], value: &[u8]) -> TrieResult<()> {
        self.insert(key, value)
    }

    fn hash(&mut self) -> H256 {
        self.get_hash()
    }
}

fn insert_into_trie_rec(node: Node, mut new_key: Nibbles, new_val: Vec<u8>) -> Node {
    match node {
        Node::Empty => {
            trace!("Insert traversed Empty");
            leaf(new_key, new_val)
        }
        Node::Branch {
            mut children,
            value,
        } => {
            if new_key.is_empty() {
                trace!("Insert traversed branch and placed value in node");
                return Node::Branch {
                    children,
                    value: new_val,
                };
            }

            let nibble = new_key.get_nibble(0) as usize;
            trace!("Insert traversed Branch (nibble: {:x})", nibble);

            new_key = new_key.truncate_n_nibbles_front(1);
            let child = std::mem::take(&mut children[nibble]);
            children[nibble] = insert_into_trie_rec(child, new_key, new_val);

            Node::Branch { children, value }
        }
        Node::Extension { nibbles, child } => {
            trace!("Insert traversed Extension (nibbles: {})", nibbles);

            let common = nibbles.find_nibble_idx_that_differs(&new_key);
            if common == nibbles.count() {
                let rest = new_key.truncate_n_nibbles_front(common);
                let child = insert_into_trie_rec(*child, rest, new_val);

                return extension(nibbles, child);
            }

            // The branch covers the nibble at `common`, whatever remains of
            // the extension hangs below it.
            let existing_postfix = nibbles.truncate_n_nibbles_front(common + 1);
            let existing = match existing_postfix.is_empty() {
                true => *child,
                false => extension(existing_postfix, *child),
            };

            split_into_branch(
                &nibbles,
                common,
                (nibbles.get_nibble(common), existing),
                new_key,
                new_val,
            )
        }
        Node::Leaf { nibbles, value } => {
            trace!("Insert traversed Leaf (nibbles: {})", nibbles);

            // Update existing node value if already present.
            if nibbles == new_key {
                return leaf(nibbles, new_val);
            }

            let common = nibbles.find_nibble_idx_that_differs(&new_key);
            let mut branch = empty_branch();

            // The existing key may end exactly at the split point.
            match nibbles.count() == common {
                true => place_value(&mut branch, Nibbles::default(), value),
                false => {
                    let existing = leaf(nibbles.truncate_n_nibbles_front(common + 1), value);
                    place_child(&mut branch, nibbles.get_nibble(common), existing);
                }
            }

            place_value(
                &mut branch,
                new_key.truncate_n_nibbles_front(common),
                new_val,
            );

            wrap_in_extension_if_needed(nibbles.get_nibble_range(0..common), branch)
        }
    }
}

/// Replaces an extension diverging at `common` with a branch (behind an
/// extension for the shared prefix, if any).
fn split_into_branch(
    existing_path: &Nibbles,
    common: usize,
    (existing_nibble, existing): (u8, Node),
    new_key: Nibbles,
    new_val: Vec<u8>,
) -> Node {
    let mut branch = empty_branch();
    place_child(&mut branch, existing_nibble, existing);
    place_value(
        &mut branch,
        new_key.truncate_n_nibbles_front(common),
        new_val,
    );

    wrap_in_extension_if_needed(existing_path.get_nibble_range(0..common), branch)
}

fn place_child(branch: &mut Node, nibble: u8, child: Node) {
    if let Node::Branch { children, .. } = branch {
        children[nibble as usize] = child;
    }
}

/// Places a value whose remaining path starts at `branch`.
fn place_value(branch: &mut Node, rest: Nibbles, val: Vec<u8>) {
    if let Node::Branch { children, value } = branch {
        match rest.is_empty() {
            true => *value = val,
            false => {
                let nibble = rest.get_nibble(0) as usize;
                children[nibble] = leaf(rest.truncate_n_nibbles_front(1), val);
            }
        }
    }
}

fn wrap_in_extension_if_needed(prefix: Nibbles, branch: Node) -> Node {
    match prefix.is_empty() {
        true => branch,
        false => extension(prefix, branch),
    }
}

fn empty_branch() -> Node {
    Node::Branch {
        children: Box::new(std::array::from_fn(|_| Node::Empty)),
        value: Vec::new(),
    }
}

fn extension(nibbles: Nibbles, child: Node) -> Node {
    Node::Extension {
        nibbles,
        child: Box::new(child),
    }
}

fn leaf(nibbles: Nibbles, value: Vec<u8>) -> Node {
    Node::Leaf { nibbles, value }
}

/// Encodes a node, hashing it if the encoding is 32 bytes or longer.
pub(crate) fn rlp_encode_and_hash_node(node: &Node) -> EncodedNode {
    match node {
        Node::Empty => encode_empty(),
        Node::Branch { children, value } => {
            encode_branch(children.iter().map(rlp_encode_and_hash_node), value)
        }
        Node::Extension { nibbles, child } => {
            encode_extension(nibbles, rlp_encode_and_hash_node(child))
        }
        Node::Leaf { nibbles, value } => encode_leaf(nibbles, value),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use eth_trie::{EthTrie, MemoryDB, Trie};
    use ethereum_types::H256;
    use exec_common::EMPTY_TRIE_HASH;
    use hex_literal::hex;

    use super::{HashTrie, Node};
    use crate::{
        testing_utils::{
            common_setup, generate_n_random_fixed_trie_value_entries,
            generate_n_random_variable_trie_value_entries, TestInsertValEntry,
        },
        TrieError, TrieResult,
    };

    const NUM_INSERTS_FOR_ETH_TRIE_CRATE_MASSIVE_TEST: usize = 1000;

    fn create_truth_trie() -> EthTrie<MemoryDB> {
        let db = Arc::new(MemoryDB::new(true));
        EthTrie::new(db)
    }

    fn insert_entries_into_our_and_lib_tries_and_assert_equal_hashes(
        entries: &[TestInsertValEntry],
    ) {
        let mut truth_trie = create_truth_trie();
        let mut our_trie = HashTrie::new();

        for (k, v) in entries {
            truth_trie.insert(k, v).unwrap();
            our_trie.insert(k, v).unwrap();

            // Kind of silly... Both of these types are identical except that one is
            // re-exported.
            let truth_hash = H256(truth_trie.root_hash().unwrap().0);
            assert_eq!(our_trie.get_hash(), truth_hash);
        }
    }

    #[test]
    fn empty_hash_is_correct() {
        common_setup();

        let mut trie = HashTrie::new();
        assert_eq!(trie.get_hash(), EMPTY_TRIE_HASH);
        assert_eq!(trie.get_hash(), keccak_hash::KECCAK_NULL_RLP);
    }

    #[test]
    fn known_trie_with_branch_values_hashes_correctly() -> TrieResult<()> {
        common_setup();

        let mut trie = HashTrie::new();
        trie.insert(b"doe", b"reindeer")?;
        trie.insert(b"dog", b"puppy")?;
        trie.insert(b"dogglesworth", b"cat")?;

        assert_eq!(
            trie.get_hash(),
            H256(hex!(
                "8aad789dff2f538bca5d8ea56e8abe10f4c7ba3a5dea95fea4cd6e7c3a1168d3"
            ))
        );

        let mut trie = HashTrie::new();
        trie.insert(b"do", b"verb")?;
        trie.insert(b"dog", b"puppy")?;
        trie.insert(b"doge", b"coin")?;
        trie.insert(b"horse", b"stallion")?;

        assert_eq!(
            trie.get_hash(),
            H256(hex!(
                "5991bb8c6514148a29db676a14ac506cd2cd5775ace63c30a4fe457715e9ac84"
            ))
        );

        Ok(())
    }

    #[test]
    fn insertion_order_does_not_matter() -> TrieResult<()> {
        common_setup();

        let entries: Vec<_> = generate_n_random_variable_trie_value_entries(100, 3).collect();

        let mut forward = HashTrie::new();
        let mut backward = HashTrie::new();
        for (k, v) in entries.iter() {
            forward.insert(k, v)?;
        }
        for (k, v) in entries.iter().rev() {
            backward.insert(k, v)?;
        }

        assert_eq!(forward.get_hash(), backward.get_hash());
        Ok(())
    }

    #[test]
    fn inserted_values_are_retrievable() -> TrieResult<()> {
        common_setup();

        let mut trie = HashTrie::new();
        trie.insert(b"do", b"verb")?;
        trie.insert(b"dog", b"puppy")?;
        trie.insert(b"horse", b"stallion")?;

        assert_eq!(trie.get(b"do"), Some(&b"verb"[..]));
        assert_eq!(trie.get(b"dog"), Some(&b"puppy"[..]));
        assert_eq!(trie.get(b"horse"), Some(&b"stallion"[..]));
        assert_eq!(trie.get(b"doge"), None);
        assert_eq!(trie.get(b"d"), None);

        Ok(())
    }

    #[test]
    fn updating_an_existing_key_replaces_value() -> TrieResult<()> {
        let mut trie = HashTrie::new();
        trie.insert(&[0x12, 0x34], &[1])?;
        let first = trie.get_hash();

        trie.insert(&[0x12, 0x34], &[2])?;
        assert_ne!(trie.get_hash(), first);
        assert_eq!(trie.get(&[0x12, 0x34]), Some(&[2][..]));
        assert!(trie.root().as_leaf().is_some());

        Ok(())
    }

    #[test]
    fn empty_values_are_rejected() {
        let mut trie = HashTrie::new();
        assert!(matches!(
            trie.insert(&[1], &[]),
            Err(TrieError::EmptyValue(_))
        ));
        assert_eq!(*trie.root(), Node::Empty);
    }

    #[test]
    fn two_keys_sharing_a_prefix_produce_extension() -> TrieResult<()> {
        let mut trie = HashTrie::new();
        trie.insert(&[0x12, 0x34], &[1])?;
        trie.insert(&[0x12, 0x56], &[2])?;

        let (nibbles, child) = trie.root().as_extension().unwrap();
        assert_eq!(nibbles.as_slice(), &[1, 2]);
        assert!(child.as_branch().is_some());

        Ok(())
    }

    #[test]
    fn massive_random_data_insert_fixed_keys_hashes_agree_with_eth_trie() {
        common_setup();
        insert_entries_into_our_and_lib_tries_and_assert_equal_hashes(
            &generate_n_random_fixed_trie_value_entries(
                NUM_INSERTS_FOR_ETH_TRIE_CRATE_MASSIVE_TEST,
                0,
            )
            .collect::<Vec<_>>(),
        );
    }

    #[test]
    fn massive_random_data_insert_variable_keys_hashes_agree_with_eth_trie() {
        common_setup();
        insert_entries_into_our_and_lib_tries_and_assert_equal_hashes(
            &generate_n_random_variable_trie_value_entries(
                NUM_INSERTS_FOR_ETH_TRIE_CRATE_MASSIVE_TEST,
                1,
            )
            .collect::<Vec<_>>(),
        );
    }
}
