use ethereum_types::H256;
use rlp::{Encodable, Rlp, RlpStream};

use super::rlp_utils::{expect_fields, fixed_bytes, hash_at};
use crate::errors::{DecodeError, DecodeResult};

/// Size of a decryption key (a compressed BLS12-381 G1 point).
pub const DECRYPTION_KEY_SIZE: usize = 48;

/// A key released by the keypers for one encryption identity.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct DecryptionKey {
    /// The identity the key decrypts.
    pub identity: H256,
    /// The key itself.
    pub key: [u8; DECRYPTION_KEY_SIZE],
}

impl Encodable for DecryptionKey {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(2);
        s.append(&self.identity);
        s.append(&self.key.as_slice());
    }
}

/// A protocol-issued transaction publishing the decryption keys of a slot
/// (type `0x7c`). It is unsigned and its sender is the system address.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BatchTx {
    /// Chain the transaction is bound to.
    pub chain_id: u64,
    /// Keys released for this slot.
    pub decryption_keys: Vec<DecryptionKey>,
    /// Slot the keys belong to.
    pub slot: u64,
    /// Position in the encrypted transaction queue after this batch.
    pub tx_pointer: u64,
    /// Gas limit.
    pub gas: u64,
}

impl BatchTx {
    pub(crate) const FIELDS: usize = 5;

    pub(crate) fn append_unsigned(&self, s: &mut RlpStream) {
        s.append(&self.chain_id);
        s.append_list(&self.decryption_keys);
        s.append(&self.slot);
        s.append(&self.tx_pointer);
        s.append(&self.gas);
    }

    pub(crate) fn decode_fields(rlp: &Rlp) -> DecodeResult<Self> {
        expect_fields(rlp, Self::FIELDS)?;

        let keys = rlp.at(1)?;
        if !keys.is_list() {
            return Err(DecodeError::Rlp(rlp::DecoderError::RlpExpectedToBeList));
        }
        let decryption_keys = keys
            .iter()
            .map(|k| {
                expect_fields(&k, 2)?;
                Ok(DecryptionKey {
                    identity: hash_at(&k, 0, "decryption_keys.identity")?,
                    key: fixed_bytes(&k.at(1)?, "decryption_keys.key")?,
                })
            })
            .collect::<DecodeResult<_>>()?;

        Ok(Self {
            chain_id: rlp.val_at(0)?,
            decryption_keys,
            slot: rlp.val_at(2)?,
            tx_pointer: rlp.val_at(3)?,
            gas: rlp.val_at(4)?,
        })
    }
}

impl Encodable for BatchTx {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(Self::FIELDS);
        self.append_unsigned(s);
    }
}
