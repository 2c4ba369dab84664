use ethereum_types::{H160, U256};
use rlp::{Encodable, Rlp, RlpStream};

use super::{
    access_list::AccessList,
    rlp_utils::{append_optional_address, expect_fields, optional_address_at},
};
use crate::errors::DecodeResult;

/// An EIP-1559 transaction (type `0x02`).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DynamicFeeTx {
    /// Chain the transaction is bound to.
    pub chain_id: u64,
    /// Sender nonce.
    pub nonce: u64,
    /// Max priority fee per gas.
    pub gas_tip_cap: U256,
    /// Max fee per gas.
    pub gas_fee_cap: U256,
    /// Gas limit.
    pub gas: u64,
    /// Recipient, `None` for contract creation.
    pub to: Option<H160>,
    /// Wei transferred.
    pub value: U256,
    /// Call data or init code.
    pub data: Vec<u8>,
    /// Accounts and slots warmed before execution.
    pub access_list: AccessList,
    /// Signature y parity.
    pub v: U256,
    /// Signature `r`.
    pub r: U256,
    /// Signature `s`.
    pub s: U256,
}

impl DynamicFeeTx {
    pub(crate) const UNSIGNED_FIELDS: usize = 9;

    pub(crate) fn append_unsigned(&self, s: &mut RlpStream) {
        s.append(&self.chain_id);
        s.append(&self.nonce);
        s.append(&self.gas_tip_cap);
        s.append(&self.gas_fee_cap);
        s.append(&self.gas);
        append_optional_address(s, &self.to);
        s.append(&self.value);
        s.append(&self.data);
        s.append(&self.access_list);
    }

    pub(crate) fn decode_fields(rlp: &Rlp) -> DecodeResult<Self> {
        expect_fields(rlp, Self::UNSIGNED_FIELDS + 3)?;

        Ok(Self {
            chain_id: rlp.val_at(0)?,
            nonce: rlp.val_at(1)?,
            gas_tip_cap: rlp.val_at(2)?,
            gas_fee_cap: rlp.val_at(3)?,
            gas: rlp.val_at(4)?,
            to: optional_address_at(rlp, 5, "to")?,
            value: rlp.val_at(6)?,
            data: rlp.val_at(7)?,
            access_list: AccessList::decode_at(rlp, 8)?,
            v: rlp.val_at(9)?,
            r: rlp.val_at(10)?,
            s: rlp.val_at(11)?,
        })
    }
}

impl Encodable for DynamicFeeTx {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(Self::UNSIGNED_FIELDS + 3);
        self.append_unsigned(s);
        s.append(&self.v);
        s.append(&self.r);
        s.append(&self.s);
    }
}
