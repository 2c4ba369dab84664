//! EIP-2930 access lists.

use std::ops::Deref;

use ethereum_types::{H160, H256};
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};
use rlp_derive::{RlpDecodable, RlpEncodable};

use super::rlp_utils::{address_at, expect_fields, hash_list_at};
use crate::errors::DecodeResult;

/// An address and the storage keys of it a transaction plans to access.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, RlpEncodable, RlpDecodable)]
pub struct AccessTuple {
    /// The accessed account.
    pub address: H160,
    /// Accessed storage slots, in order.
    pub storage_keys: Vec<H256>,
}

/// An ordered list of [`AccessTuple`]s.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct AccessList(pub Vec<AccessTuple>);

impl AccessList {
    /// Total number of storage keys across all tuples.
    pub fn storage_keys(&self) -> usize {
        self.0.iter().map(|t| t.storage_keys.len()).sum()
    }

    /// Strictly decodes the list at position `idx` of `rlp`.
    pub(crate) fn decode_at(rlp: &Rlp, idx: usize) -> DecodeResult<Self> {
        let list = rlp.at(idx)?;
        if !list.is_list() {
            return Err(DecoderError::RlpExpectedToBeList.into());
        }

        list.iter()
            .map(|tuple| {
                expect_fields(&tuple, 2)?;
                Ok(AccessTuple {
                    address: address_at(&tuple, 0, "access_list.address")?,
                    storage_keys: hash_list_at(&tuple, 1, "access_list.storage_keys")?,
                })
            })
            .collect::<DecodeResult<Vec<_>>>()
            .map(Self)
    }
}

impl Deref for AccessList {
    type Target = [AccessTuple];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<AccessTuple>> for AccessList {
    fn from(v: Vec<AccessTuple>) -> Self {
        Self(v)
    }
}

impl Encodable for AccessList {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.append_list(&self.0);
    }
}

impl Decodable for AccessList {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        Ok(Self(rlp.as_list()?))
    }
}
