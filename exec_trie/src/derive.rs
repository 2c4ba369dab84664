//! Canonical list commitments.
//!
//! Headers commit to ordered lists by inserting every item into a trie under
//! the RLP encoding of its index. Since `rlp(0) = 0x80` sorts after
//! `rlp(1..=127) = 0x01..=0x7f` but before `rlp(128..) = 0x81..`, inserting in
//! the order `1..=127, 0, 128..` presents keys in ascending byte order, which
//! is what streaming accumulators such as [`StackTrie`](crate::StackTrie)
//! require.

use ethereum_types::H256;
use log::trace;

use crate::TrieResult;

/// A trie accumulator used to compute list commitments.
pub trait TrieHasher {
    /// Discards everything inserted so far.
    fn reset(&mut self);

    /// Inserts `value` under `key`. Implementations copy both buffers.
    fn update(&mut self, key: &[u8], value: &[u8]) -> TrieResult<()>;

    /// The root of everything inserted since the last reset.
    fn hash(&mut self) -> H256;
}

/// An ordered list whose elements encode independently of each other.
pub trait DerivableList {
    /// Number of elements.
    fn len(&self) -> usize;

    /// Returns `true` if the list has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends the canonical encoding of element `i` to `buf`.
    fn encode_index(&self, i: usize, buf: &mut Vec<u8>);
}

impl DerivableList for [Vec<u8>] {
    fn len(&self) -> usize {
        <[Vec<u8>]>::len(self)
    }

    fn encode_index(&self, i: usize, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self[i]);
    }
}

impl DerivableList for Vec<Vec<u8>> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn encode_index(&self, i: usize, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self[i]);
    }
}

/// The order in which `derive_sha` inserts the elements of a list of length
/// `len`: `1..=127`, then `0`, then `128..len`.
pub fn insertion_order(len: usize) -> impl Iterator<Item = usize> {
    let head_end = len.min(128);

    (1..head_end)
        .chain((len > 0).then_some(0))
        .chain(128..len.max(128))
}

/// Computes the trie root of `list` with `hasher`.
///
/// The hasher is reset first, so it can be reused across lists.
pub fn derive_sha<L, H>(list: &L, hasher: &mut H) -> TrieResult<H256>
where
    L: DerivableList + ?Sized,
    H: TrieHasher + ?Sized,
{
    hasher.reset();

    let mut key_buf = Vec::new();
    let mut value_buf = Vec::new();

    for i in insertion_order(list.len()) {
        key_buf.clear();
        key_buf.extend_from_slice(&rlp::encode(&(i as u64)));

        value_buf.clear();
        list.encode_index(i, &mut value_buf);

        hasher.update(&key_buf, &value_buf)?;
    }

    let root = hasher.hash();
    trace!("Derived root {:x} over {} items", root, list.len());

    Ok(root)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use eth_trie::{EthTrie, MemoryDB, Trie};
    use ethereum_types::H256;
    use exec_common::EMPTY_TRIE_HASH;
    use hex_literal::hex;

    use super::{derive_sha, insertion_order};
    use crate::{
        testing_utils::{common_setup, generate_n_random_items},
        HashTrie, StackTrie, TrieResult,
    };

    const LIST_SIZES: [usize; 7] = [0, 1, 2, 127, 128, 129, 1000];

    /// A signed legacy transaction used as a list item.
    const RIGHTVRS_TX: [u8; 99] = hex!("f86103018207d094b94f5374fce5edbc8e2a8697c15331677e6ebf0b0a8255441ca098ff921201554726367d2be8c804a7ff89ccf285ebc57dff8ae4c44b9c19ac4aa08887321be575c8095f789dd4c743dfe42c1820f9231f98a962b210e3ac2452a3");

    fn truth_root(items: &[Vec<u8>]) -> H256 {
        let mut trie = EthTrie::new(Arc::new(MemoryDB::new(true)));
        for (i, item) in items.iter().enumerate() {
            trie.insert(&rlp::encode(&(i as u64)), item).unwrap();
        }

        H256(trie.root_hash().unwrap().0)
    }

    #[test]
    fn insertion_order_puts_zero_after_127() {
        assert_eq!(insertion_order(0).count(), 0);
        assert_eq!(insertion_order(1).collect::<Vec<_>>(), vec![0]);
        assert_eq!(insertion_order(3).collect::<Vec<_>>(), vec![1, 2, 0]);

        let order: Vec<_> = insertion_order(130).collect();
        assert_eq!(order.len(), 130);
        assert_eq!(order[126], 127);
        assert_eq!(order[127], 0);
        assert_eq!(&order[128..], &[128, 129]);
    }

    #[test]
    fn insertion_order_yields_ascending_keys() {
        let keys: Vec<_> = insertion_order(1000)
            .map(|i| rlp::encode(&(i as u64)).to_vec())
            .collect();

        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn empty_list_hashes_to_empty_trie() -> TrieResult<()> {
        common_setup();

        let items: Vec<Vec<u8>> = Vec::new();
        assert_eq!(derive_sha(&items, &mut StackTrie::new())?, EMPTY_TRIE_HASH);
        assert_eq!(derive_sha(&items, &mut HashTrie::new())?, EMPTY_TRIE_HASH);

        Ok(())
    }

    #[test]
    fn known_roots() -> TrieResult<()> {
        common_setup();

        let single = vec![vec![0x01; 40]];
        assert_eq!(
            derive_sha(&single, &mut StackTrie::new())?,
            H256(hex!(
                "3f77cb205bc45652fcbc26ae861f2948f44a8e6e403d2d9614178d8ef297aab7"
            ))
        );

        let one_tx = vec![RIGHTVRS_TX.to_vec()];
        assert_eq!(
            derive_sha(&one_tx, &mut StackTrie::new())?,
            H256(hex!(
                "1b983264fb521bfb0b0348c5f40a8997d64bfe2db4d983d55dacf715663a7ef0"
            ))
        );

        let three_txs = vec![RIGHTVRS_TX.to_vec(); 3];
        assert_eq!(
            derive_sha(&three_txs, &mut HashTrie::new())?,
            H256(hex!(
                "905d274bf396a4a5e4faadb7417639b8979fb5ef6e8c14301d3e9a4ed85ac183"
            ))
        );

        Ok(())
    }

    #[test]
    fn stack_and_hash_tries_agree_on_list_roots() -> TrieResult<()> {
        common_setup();

        let mut stack = StackTrie::new();
        let mut reference = HashTrie::new();

        for (seed, n) in LIST_SIZES.into_iter().enumerate() {
            let items = generate_n_random_items(n, 80, seed as u64);

            let stack_root = derive_sha(&items, &mut stack)?;
            let reference_root = derive_sha(&items, &mut reference)?;

            assert_eq!(stack_root, reference_root, "roots differ for {} items", n);
            assert_eq!(stack_root, truth_root(&items), "wrong root for {} items", n);
        }

        Ok(())
    }

    #[test]
    fn small_items_are_embedded_consistently() -> TrieResult<()> {
        common_setup();

        // Single byte items keep most nodes below the 32 byte hashing threshold.
        for n in LIST_SIZES {
            let items: Vec<Vec<u8>> = (0..n).map(|i| vec![(i % 251) as u8 + 1]).collect();

            let stack_root = derive_sha(&items, &mut StackTrie::new())?;
            let reference_root = derive_sha(&items, &mut HashTrie::new())?;

            assert_eq!(stack_root, reference_root, "roots differ for {} items", n);
            assert_eq!(stack_root, truth_root(&items));
        }

        Ok(())
    }

    #[test]
    fn slices_and_vecs_derive_the_same_root() -> TrieResult<()> {
        let items = generate_n_random_items(10, 40, 7);

        let from_vec = derive_sha(&items, &mut StackTrie::new())?;
        let from_slice = derive_sha(items.as_slice(), &mut StackTrie::new())?;
        assert_eq!(from_vec, from_slice);

        Ok(())
    }
}
