//! Unsigned transactions issued by the protocol rather than by a user.

use ethereum_types::{H160, H256, U256};
use rlp::{Encodable, Rlp, RlpStream};

use super::rlp_utils::{
    address_at, append_optional_address, expect_fields, hash_at, optional_address_at,
};
use crate::errors::DecodeResult;

/// A deposit bridged in from L1 (type `0x7e`).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DepositTx {
    /// Uniquely identifies the L1 event that caused the deposit.
    pub source_hash: H256,
    /// The depositor.
    pub from: H160,
    /// Recipient, `None` for contract creation.
    pub to: Option<H160>,
    /// Wei minted on L2 before the value transfer.
    pub mint: U256,
    /// Wei transferred.
    pub value: U256,
    /// Gas limit.
    pub gas: u64,
    /// Whether the deposit is exempt from the block gas limit.
    pub is_system_tx: bool,
    /// Call data or init code.
    pub data: Vec<u8>,
}

impl DepositTx {
    pub(crate) const FIELDS: usize = 8;

    pub(crate) fn append_unsigned(&self, s: &mut RlpStream) {
        s.append(&self.source_hash);
        s.append(&self.from);
        append_optional_address(s, &self.to);
        s.append(&self.mint);
        s.append(&self.value);
        s.append(&self.gas);
        s.append(&self.is_system_tx);
        s.append(&self.data);
    }

    pub(crate) fn decode_fields(rlp: &Rlp) -> DecodeResult<Self> {
        expect_fields(rlp, Self::FIELDS)?;

        Ok(Self {
            source_hash: hash_at(rlp, 0, "source_hash")?,
            from: address_at(rlp, 1, "from")?,
            to: optional_address_at(rlp, 2, "to")?,
            mint: rlp.val_at(3)?,
            value: rlp.val_at(4)?,
            gas: rlp.val_at(5)?,
            is_system_tx: rlp.val_at(6)?,
            data: rlp.val_at(7)?,
        })
    }
}

impl Encodable for DepositTx {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(Self::FIELDS);
        self.append_unsigned(s);
    }
}

/// A withdrawal towards L1 executed on behalf of `from` (type `0x7d`).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WithdrawalTx {
    /// Chain the transaction is bound to.
    pub chain_id: u64,
    /// Sender nonce.
    pub nonce: u64,
    /// The withdrawing account.
    pub from: H160,
    /// The bridge contract.
    pub to: H160,
    /// Wei withdrawn.
    pub value: U256,
    /// Gas limit.
    pub gas: u64,
    /// Call data.
    pub data: Vec<u8>,
}

impl WithdrawalTx {
    pub(crate) const FIELDS: usize = 7;

    pub(crate) fn append_unsigned(&self, s: &mut RlpStream) {
        s.append(&self.chain_id);
        s.append(&self.nonce);
        s.append(&self.from);
        s.append(&self.to);
        s.append(&self.value);
        s.append(&self.gas);
        s.append(&self.data);
    }

    pub(crate) fn decode_fields(rlp: &Rlp) -> DecodeResult<Self> {
        expect_fields(rlp, Self::FIELDS)?;

        Ok(Self {
            chain_id: rlp.val_at(0)?,
            nonce: rlp.val_at(1)?,
            from: address_at(rlp, 2, "from")?,
            to: address_at(rlp, 3, "to")?,
            value: rlp.val_at(4)?,
            gas: rlp.val_at(5)?,
            data: rlp.val_at(6)?,
        })
    }
}

impl Encodable for WithdrawalTx {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(Self::FIELDS);
        self.append_unsigned(s);
    }
}
