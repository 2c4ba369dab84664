//! EIP-4895 beacon chain withdrawals.

use std::ops::Deref;

use ethereum_types::H160;
use exec_trie::DerivableList;
use rlp_derive::{RlpDecodable, RlpEncodable};

/// A validator withdrawal pushed into the execution layer.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, RlpEncodable, RlpDecodable)]
pub struct Withdrawal {
    /// Monotonically increasing withdrawal index.
    pub index: u64,
    /// Index of the withdrawing validator.
    pub validator_index: u64,
    /// Recipient of the withdrawn funds.
    pub address: H160,
    /// Amount in gwei.
    pub amount: u64,
}

/// The withdrawals of a block.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Withdrawals(pub Vec<Withdrawal>);

impl Deref for Withdrawals {
    type Target = [Withdrawal];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Withdrawal>> for Withdrawals {
    fn from(v: Vec<Withdrawal>) -> Self {
        Self(v)
    }
}

impl DerivableList for Withdrawals {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn encode_index(&self, i: usize, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&rlp::encode(&self.0[i]));
    }
}
