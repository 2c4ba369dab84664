//! EIP-4844 blob transactions and their side-cars.
//!
//! The signed body only carries the versioned hashes of the blobs. The blobs,
//! their KZG commitments and proofs travel next to it in a side-car that is
//! part of the network encoding
//! (`0x03 ‖ rlp([body, blobs, commitments, proofs])`) but never of the
//! transaction hash.

use std::fmt::{self, Debug};

use ethereum_types::{H160, H256, U256};
use rlp::{DecoderError, Encodable, Rlp, RlpStream};
use sha2::{Digest, Sha256};

use super::{
    access_list::AccessList,
    rlp_utils::{address_at, expect_fields, fixed_bytes, hash_list_at},
};
use crate::errors::{DecodeError, DecodeResult, TxError};

/// Size of a blob in bytes (4096 field elements of 32 bytes).
pub const BLOB_SIZE: usize = 131072;

/// Size of a compressed KZG commitment or proof.
pub const KZG_POINT_SIZE: usize = 48;

/// Blob gas consumed by each blob.
pub const BLOB_GAS_PER_BLOB: u64 = 1 << 17;

/// Version byte of KZG versioned hashes.
pub const VERSIONED_HASH_VERSION_KZG: u8 = 0x01;

/// A KZG commitment to a blob.
pub type KzgCommitment = [u8; KZG_POINT_SIZE];

/// A KZG proof for a blob.
pub type KzgProof = [u8; KZG_POINT_SIZE];

/// A fixed size blob of data.
#[derive(Clone, Eq, PartialEq)]
pub struct Blob(Box<[u8; BLOB_SIZE]>);

impl Blob {
    /// Copies `bytes`, which must be exactly [`BLOB_SIZE`] long.
    pub fn from_slice(bytes: &[u8]) -> DecodeResult<Self> {
        let len = bytes.len();
        let boxed: Box<[u8]> = bytes.into();

        boxed
            .try_into()
            .map(Self)
            .map_err(|_| DecodeError::InvalidFieldLength {
                field: "blobs",
                expected: BLOB_SIZE,
                got: len,
            })
    }

    /// The blob contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0[..]
    }
}

impl Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blob(0x{}..)", hex::encode(&self.0[..8]))
    }
}

/// `0x01 ‖ sha256(commitment)[1..]`.
pub fn kzg_to_versioned_hash(commitment: &KzgCommitment) -> H256 {
    let mut h: [u8; 32] = Sha256::digest(commitment).into();
    h[0] = VERSIONED_HASH_VERSION_KZG;

    H256(h)
}

/// Blobs with their commitments and proofs.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BlobTxSidecar {
    /// The blobs.
    pub blobs: Vec<Blob>,
    /// One commitment per blob.
    pub commitments: Vec<KzgCommitment>,
    /// One proof per blob.
    pub proofs: Vec<KzgProof>,
}

impl BlobTxSidecar {
    /// The versioned hashes of the commitments.
    pub fn blob_hashes(&self) -> Vec<H256> {
        self.commitments.iter().map(kzg_to_versioned_hash).collect()
    }

    /// Checks that there is exactly one blob, commitment and proof per hash
    /// and that each commitment matches its hash.
    pub fn validate_blob_hashes(&self, hashes: &[H256]) -> Result<(), TxError> {
        let (blobs, commitments, proofs) =
            (self.blobs.len(), self.commitments.len(), self.proofs.len());

        if blobs != hashes.len() || commitments != hashes.len() || proofs != hashes.len() {
            return Err(TxError::SidecarLengthMismatch {
                blobs,
                commitments,
                proofs,
                hashes: hashes.len(),
            });
        }

        for (index, (commitment, expected)) in self.commitments.iter().zip(hashes).enumerate() {
            let computed = kzg_to_versioned_hash(commitment);
            if computed != *expected {
                return Err(TxError::BlobHashMismatch {
                    index,
                    computed,
                    expected: *expected,
                });
            }
        }

        Ok(())
    }

    fn append_fields(&self, s: &mut RlpStream) {
        s.begin_list(self.blobs.len());
        for blob in self.blobs.iter() {
            s.append(&blob.as_bytes());
        }

        s.begin_list(self.commitments.len());
        for c in self.commitments.iter() {
            s.append(&c.as_slice());
        }

        s.begin_list(self.proofs.len());
        for p in self.proofs.iter() {
            s.append(&p.as_slice());
        }
    }

    /// Decodes the three lists starting at position `start` of `rlp`.
    fn decode_at(rlp: &Rlp, start: usize) -> DecodeResult<Self> {
        let list_at = |idx: usize| -> DecodeResult<Rlp> {
            let list = rlp.at(idx)?;
            match list.is_list() {
                true => Ok(list),
                false => Err(DecoderError::RlpExpectedToBeList.into()),
            }
        };

        let blobs = list_at(start)?
            .iter()
            .map(|b| Blob::from_slice(b.data()?))
            .collect::<DecodeResult<_>>()?;
        let commitments = list_at(start + 1)?
            .iter()
            .map(|c| fixed_bytes(&c, "commitments"))
            .collect::<DecodeResult<_>>()?;
        let proofs = list_at(start + 2)?
            .iter()
            .map(|p| fixed_bytes(&p, "proofs"))
            .collect::<DecodeResult<_>>()?;

        Ok(Self {
            blobs,
            commitments,
            proofs,
        })
    }
}

/// An EIP-4844 transaction (type `0x03`).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BlobTx {
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
    /// Recipient. Blob transactions cannot create contracts.
    pub to: H160,
    /// Wei transferred.
    pub value: U256,
    /// Call data.
    pub data: Vec<u8>,
    /// Accounts and slots warmed before execution.
    pub access_list: AccessList,
    /// Max fee per unit of blob gas.
    pub blob_fee_cap: U256,
    /// Versioned hashes of the blobs.
    pub blob_hashes: Vec<H256>,
    /// Signature y parity.
    pub v: U256,
    /// Signature `r`.
    pub r: U256,
    /// Signature `s`.
    pub s: U256,
    /// Blobs travelling with the transaction. Not part of the signed body.
    pub sidecar: Option<BlobTxSidecar>,
}

impl BlobTx {
    pub(crate) const UNSIGNED_FIELDS: usize = 11;
    const NETWORK_FIELDS: usize = 4;

    /// Blob gas used by the transaction.
    pub fn blob_gas(&self) -> u64 {
        BLOB_GAS_PER_BLOB * self.blob_hashes.len() as u64
    }

    pub(crate) fn append_unsigned(&self, s: &mut RlpStream) {
        s.append(&self.chain_id);
        s.append(&self.nonce);
        s.append(&self.gas_tip_cap);
        s.append(&self.gas_fee_cap);
        s.append(&self.gas);
        s.append(&self.to);
        s.append(&self.value);
        s.append(&self.data);
        s.append(&self.access_list);
        s.append(&self.blob_fee_cap);
        s.append_list(&self.blob_hashes);
    }

    /// Appends `[body, blobs, commitments, proofs]`.
    pub(crate) fn append_network(&self, s: &mut RlpStream, sidecar: &BlobTxSidecar) {
        s.begin_list(Self::NETWORK_FIELDS);
        s.append(self);
        sidecar.append_fields(s);
    }

    /// Decodes either the canonical body or the network form. The network
    /// form is recognised by its first element being a list.
    pub(crate) fn decode_fields(rlp: &Rlp) -> DecodeResult<Self> {
        let first = rlp.at(0)?;
        match first.is_list() {
            true => {
                expect_fields(rlp, Self::NETWORK_FIELDS)?;

                let mut tx = Self::decode_body(&first)?;
                tx.sidecar = Some(BlobTxSidecar::decode_at(rlp, 1)?);
                Ok(tx)
            }
            false => Self::decode_body(rlp),
        }
    }

    fn decode_body(rlp: &Rlp) -> DecodeResult<Self> {
        expect_fields(rlp, Self::UNSIGNED_FIELDS + 3)?;

        Ok(Self {
            chain_id: rlp.val_at(0)?,
            nonce: rlp.val_at(1)?,
            gas_tip_cap: rlp.val_at(2)?,
            gas_fee_cap: rlp.val_at(3)?,
            gas: rlp.val_at(4)?,
            to: address_at(rlp, 5, "to")?,
            value: rlp.val_at(6)?,
            data: rlp.val_at(7)?,
            access_list: AccessList::decode_at(rlp, 8)?,
            blob_fee_cap: rlp.val_at(9)?,
            blob_hashes: hash_list_at(rlp, 10, "blob_hashes")?,
            v: rlp.val_at(11)?,
            r: rlp.val_at(12)?,
            s: rlp.val_at(13)?,
            sidecar: None,
        })
    }
}

impl Encodable for BlobTx {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(Self::UNSIGNED_FIELDS + 3);
        self.append_unsigned(s);
        s.append(&self.v);
        s.append(&self.r);
        s.append(&self.s);
    }
}
