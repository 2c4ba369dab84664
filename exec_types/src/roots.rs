//! Header commitments over the lists of a block body.
//!
//! The trie roots are computed with a [`StackTrie`] unless a hasher is
//! supplied through the `_with` variants.

use ethereum_types::H256;
use exec_trie::{derive_sha, Merkleizer, StackTrie, TrieHasher, TrieResult};

use crate::{
    receipt::Receipts, request::Request, transaction::Transactions, withdrawal::Withdrawals,
};

/// `transactionsRoot` of a header.
pub fn transactions_root(txs: &Transactions) -> TrieResult<H256> {
    transactions_root_with(txs, &mut StackTrie::new())
}

/// [`transactions_root`] computed with `hasher`.
pub fn transactions_root_with<H: TrieHasher + ?Sized>(
    txs: &Transactions,
    hasher: &mut H,
) -> TrieResult<H256> {
    derive_sha(txs, hasher)
}

/// `receiptsRoot` of a header.
pub fn receipts_root(receipts: &Receipts) -> TrieResult<H256> {
    receipts_root_with(receipts, &mut StackTrie::new())
}

/// [`receipts_root`] computed with `hasher`.
pub fn receipts_root_with<H: TrieHasher + ?Sized>(
    receipts: &Receipts,
    hasher: &mut H,
) -> TrieResult<H256> {
    derive_sha(receipts, hasher)
}

/// `withdrawalsRoot` of a header.
pub fn withdrawals_root(withdrawals: &Withdrawals) -> TrieResult<H256> {
    withdrawals_root_with(withdrawals, &mut StackTrie::new())
}

/// [`withdrawals_root`] computed with `hasher`.
pub fn withdrawals_root_with<H: TrieHasher + ?Sized>(
    withdrawals: &Withdrawals,
    hasher: &mut H,
) -> TrieResult<H256> {
    derive_sha(withdrawals, hasher)
}

/// `requestsRoot` of a header. See [`crate::request::requests_root`].
pub fn requests_root(merkleizer: &Merkleizer, requests: &[Request]) -> TrieResult<H256> {
    crate::request::requests_root(merkleizer, requests)
}
