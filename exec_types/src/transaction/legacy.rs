use ethereum_types::{H160, U256};
use rlp::{Encodable, Rlp, RlpStream};

use super::rlp_utils::{append_optional_address, expect_fields, optional_address_at};
use crate::errors::DecodeResult;

/// A pre EIP-2718 transaction, encoded as a bare RLP list.
///
/// The chain id is not a field of its own: EIP-155 signatures fold it into
/// `v` as `chain_id * 2 + 35 + y_parity`, unprotected ones use `27 +
/// y_parity`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LegacyTx {
    /// Sender nonce.
    pub nonce: u64,
    /// Price per unit of gas.
    pub gas_price: U256,
    /// Gas limit.
    pub gas: u64,
    /// Recipient, `None` for contract creation.
    pub to: Option<H160>,
    /// Wei transferred.
    pub value: U256,
    /// Call data or init code.
    pub data: Vec<u8>,
    /// Signature `v`.
    pub v: U256,
    /// Signature `r`.
    pub r: U256,
    /// Signature `s`.
    pub s: U256,
}

impl LegacyTx {
    const FIELDS: usize = 9;
    pub(crate) const UNSIGNED_FIELDS: usize = 6;

    /// Whether `v` carries an EIP-155 chain id.
    pub fn protected(&self) -> bool {
        is_protected_v(self.v)
    }

    /// The chain id folded into `v`, if the signature is replay protected.
    pub fn chain_id(&self) -> Option<u64> {
        match self.protected() && self.v >= U256::from(35) {
            true => {
                let id = (self.v - 35) / 2;
                (id.bits() <= 64).then(|| id.low_u64())
            }
            false => None,
        }
    }

    /// Appends nonce, gas price, gas, to, value and data.
    pub(crate) fn append_unsigned(&self, s: &mut RlpStream) {
        s.append(&self.nonce);
        s.append(&self.gas_price);
        s.append(&self.gas);
        append_optional_address(s, &self.to);
        s.append(&self.value);
        s.append(&self.data);
    }

    pub(crate) fn decode_fields(rlp: &Rlp) -> DecodeResult<Self> {
        expect_fields(rlp, Self::FIELDS)?;

        Ok(Self {
            nonce: rlp.val_at(0)?,
            gas_price: rlp.val_at(1)?,
            gas: rlp.val_at(2)?,
            to: optional_address_at(rlp, 3, "to")?,
            value: rlp.val_at(4)?,
            data: rlp.val_at(5)?,
            v: rlp.val_at(6)?,
            r: rlp.val_at(7)?,
            s: rlp.val_at(8)?,
        })
    }
}

impl Encodable for LegacyTx {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(Self::FIELDS);
        self.append_unsigned(s);
        s.append(&self.v);
        s.append(&self.r);
        s.append(&self.s);
    }
}

/// `v` values other than `0`, `1`, `27` and `28` encode a chain id.
pub(crate) fn is_protected_v(v: U256) -> bool {
    match v.bits() <= 8 {
        true => {
            let v = v.low_u64();
            v != 27 && v != 28 && v != 1 && v != 0
        }
        false => true,
    }
}
