//! Transactions and their binary envelope.
//!
//! Every kind of transaction is a case of the closed [`TxData`] enum. The
//! [`Transaction`] envelope wraps one case and gives it a single binary form
//! (EIP-2718):
//! - legacy transactions encode as a bare RLP list, so their first byte is
//!   always `>= 0xc0`.
//! - typed transactions encode as `type ‖ rlp(body)` with a type byte below
//!   `0x80`.
//!
//! The envelope memoises its hash, its encoded size and the last recovered
//! sender. The caches sit behind `parking_lot` locks so that a shared
//! `&Transaction` can be hashed from several threads.

use std::ops::Deref;

use enum_as_inner::EnumAsInner;
use ethereum_types::{H160, H256, U256};
use exec_trie::DerivableList;
use keccak_hash::keccak;
use log::debug;
use parking_lot::RwLock;
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};

use crate::errors::{DecodeError, DecodeResult, SignerResult, TxError};
use crate::signer::Signer;

pub mod access_list;
mod account_abstraction;
mod batch;
pub mod blob;
mod dynamic_fee;
mod eip2930;
mod legacy;
pub(crate) mod rlp_utils;
mod system;

use access_list::AccessTuple;
pub use account_abstraction::AccountAbstractionTx;
pub use batch::{BatchTx, DecryptionKey, DECRYPTION_KEY_SIZE};
pub use blob::{BlobTx, BlobTxSidecar};
pub use dynamic_fee::DynamicFeeTx;
pub use eip2930::AccessListTx;
pub use legacy::LegacyTx;
use rlp_utils::checked_rlp;
pub use system::{DepositTx, WithdrawalTx};

/// The EIP-2718 type of a transaction.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum TxType {
    /// Untyped transaction.
    Legacy = 0x00,
    /// EIP-2930.
    AccessList = 0x01,
    /// EIP-1559.
    DynamicFee = 0x02,
    /// EIP-4844.
    Blob = 0x03,
    /// Native account abstraction.
    AccountAbstraction = 0x05,
    /// Decryption-key batch.
    Batch = 0x7c,
    /// System withdrawal.
    Withdrawal = 0x7d,
    /// L1 deposit.
    Deposit = 0x7e,
}

impl TxType {
    /// Whether transactions of this type are issued by the protocol and carry
    /// no signature.
    pub fn is_system(self) -> bool {
        matches!(self, TxType::Batch | TxType::Withdrawal | TxType::Deposit)
    }
}

impl From<TxType> for u8 {
    fn from(ty: TxType) -> Self {
        ty as u8
    }
}

impl TryFrom<u8> for TxType {
    type Error = DecodeError;

    fn try_from(b: u8) -> Result<Self, Self::Error> {
        match b {
            0x00 => Ok(TxType::Legacy),
            0x01 => Ok(TxType::AccessList),
            0x02 => Ok(TxType::DynamicFee),
            0x03 => Ok(TxType::Blob),
            0x05 => Ok(TxType::AccountAbstraction),
            0x7c => Ok(TxType::Batch),
            0x7d => Ok(TxType::Withdrawal),
            0x7e => Ok(TxType::Deposit),
            _ => Err(DecodeError::UnsupportedType(b)),
        }
    }
}

/// The payload of a transaction, one case per transaction type.
///
/// Every case owns its buffers, so cloning is a deep copy.
#[derive(Clone, Debug, EnumAsInner, Eq, PartialEq)]
pub enum TxData {
    /// See [`LegacyTx`].
    Legacy(LegacyTx),
    /// See [`AccessListTx`].
    AccessList(AccessListTx),
    /// See [`DynamicFeeTx`].
    DynamicFee(DynamicFeeTx),
    /// See [`BlobTx`].
    Blob(BlobTx),
    /// See [`AccountAbstractionTx`].
    AccountAbstraction(AccountAbstractionTx),
    /// See [`BatchTx`].
    Batch(BatchTx),
    /// See [`WithdrawalTx`].
    Withdrawal(WithdrawalTx),
    /// See [`DepositTx`].
    Deposit(DepositTx),
}

impl TxData {
    /// The type tag of this case.
    pub fn tx_type(&self) -> TxType {
        match self {
            TxData::Legacy(_) => TxType::Legacy,
            TxData::AccessList(_) => TxType::AccessList,
            TxData::DynamicFee(_) => TxType::DynamicFee,
            TxData::Blob(_) => TxType::Blob,
            TxData::AccountAbstraction(_) => TxType::AccountAbstraction,
            TxData::Batch(_) => TxType::Batch,
            TxData::Withdrawal(_) => TxType::Withdrawal,
            TxData::Deposit(_) => TxType::Deposit,
        }
    }

    /// The chain the transaction is bound to. Unprotected legacy transactions
    /// and deposits are not bound to any chain.
    pub fn chain_id(&self) -> Option<u64> {
        match self {
            TxData::Legacy(tx) => tx.chain_id(),
            TxData::AccessList(tx) => Some(tx.chain_id),
            TxData::DynamicFee(tx) => Some(tx.chain_id),
            TxData::Blob(tx) => Some(tx.chain_id),
            TxData::AccountAbstraction(tx) => Some(tx.chain_id),
            TxData::Batch(tx) => Some(tx.chain_id),
            TxData::Withdrawal(tx) => Some(tx.chain_id),
            TxData::Deposit(_) => None,
        }
    }

    /// Sender nonce. Batches and deposits have none and report `0`.
    pub fn nonce(&self) -> u64 {
        match self {
            TxData::Legacy(tx) => tx.nonce,
            TxData::AccessList(tx) => tx.nonce,
            TxData::DynamicFee(tx) => tx.nonce,
            TxData::Blob(tx) => tx.nonce,
            TxData::AccountAbstraction(tx) => tx.nonce,
            TxData::Withdrawal(tx) => tx.nonce,
            TxData::Batch(_) | TxData::Deposit(_) => 0,
        }
    }

    /// Gas limit. For account abstraction this is the sum over all frames.
    pub fn gas(&self) -> u64 {
        match self {
            TxData::Legacy(tx) => tx.gas,
            TxData::AccessList(tx) => tx.gas,
            TxData::DynamicFee(tx) => tx.gas,
            TxData::Blob(tx) => tx.gas,
            TxData::AccountAbstraction(tx) => tx.total_gas(),
            TxData::Batch(tx) => tx.gas,
            TxData::Withdrawal(tx) => tx.gas,
            TxData::Deposit(tx) => tx.gas,
        }
    }

    /// The gas price, or the fee cap for fee market transactions. System
    /// transactions are free.
    pub fn gas_price(&self) -> U256 {
        match self {
            TxData::Legacy(tx) => tx.gas_price,
            TxData::AccessList(tx) => tx.gas_price,
            _ => self.gas_fee_cap(),
        }
    }

    /// Max priority fee per gas. Equal to the gas price before EIP-1559.
    pub fn gas_tip_cap(&self) -> U256 {
        match self {
            TxData::Legacy(tx) => tx.gas_price,
            TxData::AccessList(tx) => tx.gas_price,
            TxData::DynamicFee(tx) => tx.gas_tip_cap,
            TxData::Blob(tx) => tx.gas_tip_cap,
            TxData::AccountAbstraction(tx) => tx.gas_tip_cap,
            TxData::Batch(_) | TxData::Withdrawal(_) | TxData::Deposit(_) => U256::zero(),
        }
    }

    /// Max fee per gas. Equal to the gas price before EIP-1559.
    pub fn gas_fee_cap(&self) -> U256 {
        match self {
            TxData::Legacy(tx) => tx.gas_price,
            TxData::AccessList(tx) => tx.gas_price,
            TxData::DynamicFee(tx) => tx.gas_fee_cap,
            TxData::Blob(tx) => tx.gas_fee_cap,
            TxData::AccountAbstraction(tx) => tx.gas_fee_cap,
            TxData::Batch(_) | TxData::Withdrawal(_) | TxData::Deposit(_) => U256::zero(),
        }
    }

    /// Max fee per unit of blob gas, zero for non-blob transactions.
    pub fn blob_gas_fee_cap(&self) -> U256 {
        match self {
            TxData::Blob(tx) => tx.blob_fee_cap,
            _ => U256::zero(),
        }
    }

    /// The recipient, `None` for contract creation. Account abstraction
    /// transactions execute in their sender.
    pub fn to(&self) -> Option<H160> {
        match self {
            TxData::Legacy(tx) => tx.to,
            TxData::AccessList(tx) => tx.to,
            TxData::DynamicFee(tx) => tx.to,
            TxData::Blob(tx) => Some(tx.to),
            TxData::AccountAbstraction(tx) => Some(tx.sender),
            TxData::Batch(_) => None,
            TxData::Withdrawal(tx) => Some(tx.to),
            TxData::Deposit(tx) => tx.to,
        }
    }

    /// Wei transferred.
    pub fn value(&self) -> U256 {
        match self {
            TxData::Legacy(tx) => tx.value,
            TxData::AccessList(tx) => tx.value,
            TxData::DynamicFee(tx) => tx.value,
            TxData::Blob(tx) => tx.value,
            TxData::Withdrawal(tx) => tx.value,
            TxData::Deposit(tx) => tx.value,
            TxData::AccountAbstraction(_) | TxData::Batch(_) => U256::zero(),
        }
    }

    /// Call data, init code, or the execution frame data.
    pub fn data(&self) -> &[u8] {
        match self {
            TxData::Legacy(tx) => &tx.data,
            TxData::AccessList(tx) => &tx.data,
            TxData::DynamicFee(tx) => &tx.data,
            TxData::Blob(tx) => &tx.data,
            TxData::AccountAbstraction(tx) => &tx.execution_data,
            TxData::Batch(_) => &[],
            TxData::Withdrawal(tx) => &tx.data,
            TxData::Deposit(tx) => &tx.data,
        }
    }

    /// The access list, empty for types without one.
    pub fn access_list(&self) -> &[AccessTuple] {
        match self {
            TxData::AccessList(tx) => &tx.access_list,
            TxData::DynamicFee(tx) => &tx.access_list,
            TxData::Blob(tx) => &tx.access_list,
            TxData::AccountAbstraction(tx) => &tx.access_list,
            _ => &[],
        }
    }

    /// Versioned hashes of the blobs.
    pub fn blob_hashes(&self) -> &[H256] {
        match self {
            TxData::Blob(tx) => &tx.blob_hashes,
            _ => &[],
        }
    }

    /// Blob gas used.
    pub fn blob_gas(&self) -> u64 {
        match self {
            TxData::Blob(tx) => tx.blob_gas(),
            _ => 0,
        }
    }

    /// Whether the transaction carries a replay protected signature.
    pub fn protected(&self) -> bool {
        match self {
            TxData::Legacy(tx) => tx.protected(),
            TxData::AccessList(_) | TxData::DynamicFee(_) | TxData::Blob(_) => true,
            TxData::AccountAbstraction(_)
            | TxData::Batch(_)
            | TxData::Withdrawal(_)
            | TxData::Deposit(_) => false,
        }
    }

    /// The signature as `(v, r, s)`. Unsigned types report zeros.
    pub fn raw_signature_values(&self) -> (U256, U256, U256) {
        match self {
            TxData::Legacy(tx) => (tx.v, tx.r, tx.s),
            TxData::AccessList(tx) => (tx.v, tx.r, tx.s),
            TxData::DynamicFee(tx) => (tx.v, tx.r, tx.s),
            TxData::Blob(tx) => (tx.v, tx.r, tx.s),
            TxData::AccountAbstraction(_)
            | TxData::Batch(_)
            | TxData::Withdrawal(_)
            | TxData::Deposit(_) => (U256::zero(), U256::zero(), U256::zero()),
        }
    }

    /// Replaces the signature. Unsigned types are left untouched.
    pub fn set_signature_values(&mut self, v: U256, r: U256, s: U256) {
        let fields = match self {
            TxData::Legacy(tx) => (&mut tx.v, &mut tx.r, &mut tx.s),
            TxData::AccessList(tx) => (&mut tx.v, &mut tx.r, &mut tx.s),
            TxData::DynamicFee(tx) => (&mut tx.v, &mut tx.r, &mut tx.s),
            TxData::Blob(tx) => (&mut tx.v, &mut tx.r, &mut tx.s),
            TxData::AccountAbstraction(_)
            | TxData::Batch(_)
            | TxData::Withdrawal(_)
            | TxData::Deposit(_) => return,
        };

        *fields.0 = v;
        *fields.1 = r;
        *fields.2 = s;
    }

    /// The price per gas actually paid under `base_fee`.
    ///
    /// Fee market transactions pay `min(tip_cap, fee_cap - base_fee) +
    /// base_fee`, which never exceeds the fee cap. Without a base fee, or when
    /// the base fee is above the fee cap, they pay the fee cap.
    pub fn effective_gas_price(&self, base_fee: Option<U256>) -> U256 {
        match self {
            TxData::Legacy(tx) => tx.gas_price,
            TxData::AccessList(tx) => tx.gas_price,
            TxData::DynamicFee(_) | TxData::Blob(_) | TxData::AccountAbstraction(_) => {
                let (tip_cap, fee_cap) = (self.gas_tip_cap(), self.gas_fee_cap());
                match base_fee {
                    Some(base_fee) if base_fee <= fee_cap => {
                        tip_cap.min(fee_cap - base_fee) + base_fee
                    }
                    _ => fee_cap,
                }
            }
            TxData::Batch(_) | TxData::Withdrawal(_) | TxData::Deposit(_) => U256::zero(),
        }
    }

    /// Appends the fields covered by the signature, in encoding order.
    pub(crate) fn append_unsigned(&self, s: &mut RlpStream) {
        match self {
            TxData::Legacy(tx) => tx.append_unsigned(s),
            TxData::AccessList(tx) => tx.append_unsigned(s),
            TxData::DynamicFee(tx) => tx.append_unsigned(s),
            TxData::Blob(tx) => tx.append_unsigned(s),
            TxData::AccountAbstraction(tx) => tx.append_unsigned(s),
            TxData::Batch(tx) => tx.append_unsigned(s),
            TxData::Withdrawal(tx) => tx.append_unsigned(s),
            TxData::Deposit(tx) => tx.append_unsigned(s),
        }
    }

    /// Number of fields written by [`Self::append_unsigned`].
    pub(crate) fn unsigned_field_count(&self) -> usize {
        match self {
            TxData::Legacy(_) => LegacyTx::UNSIGNED_FIELDS,
            TxData::AccessList(_) => AccessListTx::UNSIGNED_FIELDS,
            TxData::DynamicFee(_) => DynamicFeeTx::UNSIGNED_FIELDS,
            TxData::Blob(_) => BlobTx::UNSIGNED_FIELDS,
            TxData::AccountAbstraction(_) => AccountAbstractionTx::FIELDS,
            TxData::Batch(_) => BatchTx::FIELDS,
            TxData::Withdrawal(_) => WithdrawalTx::FIELDS,
            TxData::Deposit(_) => DepositTx::FIELDS,
        }
    }

    fn decode_typed(ty: TxType, rlp: &Rlp) -> DecodeResult<Self> {
        Ok(match ty {
            TxType::Legacy => return Err(DecodeError::UnsupportedType(ty.into())),
            TxType::AccessList => TxData::AccessList(AccessListTx::decode_fields(rlp)?),
            TxType::DynamicFee => TxData::DynamicFee(DynamicFeeTx::decode_fields(rlp)?),
            TxType::Blob => TxData::Blob(BlobTx::decode_fields(rlp)?),
            TxType::AccountAbstraction => {
                TxData::AccountAbstraction(AccountAbstractionTx::decode_fields(rlp)?)
            }
            TxType::Batch => TxData::Batch(BatchTx::decode_fields(rlp)?),
            TxType::Withdrawal => TxData::Withdrawal(WithdrawalTx::decode_fields(rlp)?),
            TxType::Deposit => TxData::Deposit(DepositTx::decode_fields(rlp)?),
        })
    }
}

/// Appends the canonical body: the full RLP list of the case, without the
/// type byte and without any blob side-car.
impl Encodable for TxData {
    fn rlp_append(&self, s: &mut RlpStream) {
        match self {
            TxData::Legacy(tx) => s.append(tx),
            TxData::AccessList(tx) => s.append(tx),
            TxData::DynamicFee(tx) => s.append(tx),
            TxData::Blob(tx) => s.append(tx),
            TxData::AccountAbstraction(tx) => s.append(tx),
            TxData::Batch(tx) => s.append(tx),
            TxData::Withdrawal(tx) => s.append(tx),
            TxData::Deposit(tx) => s.append(tx),
        };
    }
}

/// Cache key of a recovered sender: the chain id and rule set of the signer
/// that recovered it.
pub(crate) type SenderCacheKey = (u64, u32);

/// A transaction with its cached hash, size and sender.
#[derive(Debug)]
pub struct Transaction {
    inner: TxData,
    hash: RwLock<Option<H256>>,
    size: RwLock<Option<usize>>,
    from: RwLock<Option<(SenderCacheKey, H160)>>,
}

impl Transaction {
    /// Wraps `inner` with empty caches.
    pub fn new(inner: TxData) -> Self {
        Self {
            inner,
            hash: RwLock::new(None),
            size: RwLock::new(None),
            from: RwLock::new(None),
        }
    }

    /// The wrapped payload.
    pub fn inner(&self) -> &TxData {
        &self.inner
    }

    /// Unwraps the payload, dropping the caches.
    pub fn into_inner(self) -> TxData {
        self.inner
    }

    /// The type of the transaction.
    pub fn tx_type(&self) -> TxType {
        self.inner.tx_type()
    }

    /// The binary form. A blob transaction with a side-car attached is
    /// encoded in its network form.
    pub fn encode(&self) -> Vec<u8> {
        self.encode_inner(true)
    }

    /// The binary form, never including a blob side-car. This is what the
    /// hash and the block body commitments are computed over.
    pub fn encode_without_sidecar(&self) -> Vec<u8> {
        self.encode_inner(false)
    }

    /// Same as [`Self::encode`].
    pub fn marshal_binary(&self) -> Vec<u8> {
        self.encode()
    }

    fn encode_inner(&self, with_sidecar: bool) -> Vec<u8> {
        let body = match &self.inner {
            TxData::Legacy(tx) => return rlp::encode(tx).to_vec(),
            TxData::Blob(tx) => match (&tx.sidecar, with_sidecar) {
                (Some(sidecar), true) => {
                    let mut s = RlpStream::new();
                    tx.append_network(&mut s, sidecar);
                    s.out()
                }
                _ => rlp::encode(tx),
            },
            typed => rlp::encode(typed),
        };

        let mut out = Vec::with_capacity(body.len() + 1);
        out.push(self.tx_type().into());
        out.extend_from_slice(&body);

        out
    }

    /// Decodes the binary form produced by [`Self::encode`].
    ///
    /// Blob transactions are accepted both with and without side-car.
    pub fn decode(bytes: &[u8]) -> DecodeResult<Self> {
        Self::decode_inner(bytes)
            .map(Self::new)
            .map_err(|e| {
                debug!("Rejected transaction encoding: {}", e);
                e
            })
    }

    /// Same as [`Self::decode`].
    pub fn unmarshal_binary(bytes: &[u8]) -> DecodeResult<Self> {
        Self::decode(bytes)
    }

    fn decode_inner(bytes: &[u8]) -> DecodeResult<TxData> {
        let first = *bytes.first().ok_or(DecodeError::TruncatedEnvelope)?;

        if first > 0x7f {
            return Ok(TxData::Legacy(LegacyTx::decode_fields(&checked_rlp(
                bytes,
            )?)?));
        }

        let ty = TxType::try_from(first)?;
        if bytes.len() < 2 {
            return Err(DecodeError::TruncatedEnvelope);
        }

        TxData::decode_typed(ty, &checked_rlp(&bytes[1..])?)
    }

    /// Keccak-256 of [`Self::encode_without_sidecar`], computed once.
    pub fn hash(&self) -> H256 {
        if let Some(hash) = *self.hash.read() {
            return hash;
        }

        let hash = keccak(self.encode_without_sidecar());
        *self.hash.write() = Some(hash);

        hash
    }

    /// Length of [`Self::encode`], computed once.
    pub fn size(&self) -> usize {
        if let Some(size) = *self.size.read() {
            return size;
        }

        let size = self.encode().len();
        *self.size.write() = Some(size);

        size
    }

    /// The attached blob side-car, if any.
    pub fn blob_sidecar(&self) -> Option<&BlobTxSidecar> {
        self.inner.as_blob().and_then(|tx| tx.sidecar.as_ref())
    }

    /// A copy with `sidecar` attached. The hash is unchanged, so its cache is
    /// carried over; the size is not.
    pub fn with_blob_sidecar(&self, sidecar: BlobTxSidecar) -> Result<Self, TxError> {
        let mut inner = self.inner.clone();
        match &mut inner {
            TxData::Blob(tx) => tx.sidecar = Some(sidecar),
            other => return Err(TxError::NotABlobTx(other.tx_type())),
        }

        Ok(self.derive_with(inner))
    }

    /// A copy with any blob side-car removed. The hash cache is carried over.
    pub fn without_blob_sidecar(&self) -> Self {
        let mut inner = self.inner.clone();
        if let TxData::Blob(tx) = &mut inner {
            tx.sidecar = None;
        }

        self.derive_with(inner)
    }

    fn derive_with(&self, inner: TxData) -> Self {
        Self {
            inner,
            hash: RwLock::new(*self.hash.read()),
            size: RwLock::new(None),
            from: RwLock::new(*self.from.read()),
        }
    }

    /// See [`TxData::effective_gas_price`].
    pub fn effective_gas_price(&self, base_fee: Option<U256>) -> U256 {
        self.inner.effective_gas_price(base_fee)
    }

    /// The priority fee per gas paid to the block producer under
    /// `base_fee`.
    pub fn effective_gas_tip(&self, base_fee: Option<U256>) -> Result<U256, TxError> {
        let (tip_cap, fee_cap) = (self.inner.gas_tip_cap(), self.inner.gas_fee_cap());

        match base_fee {
            None => Ok(tip_cap),
            Some(base_fee) if fee_cap < base_fee => Err(TxError::FeeCapTooLow { fee_cap, base_fee }),
            Some(base_fee) => Ok(tip_cap.min(fee_cap - base_fee)),
        }
    }

    /// Upper bound of the wei spent: `gas * fee_cap + value`, plus
    /// `blob_gas * blob_fee_cap` for blob transactions. Saturates.
    pub fn cost(&self) -> U256 {
        let gas = U256::from(self.inner.gas()).saturating_mul(self.inner.gas_fee_cap());
        let blob = U256::from(self.inner.blob_gas()).saturating_mul(self.inner.blob_gas_fee_cap());

        gas.saturating_add(blob).saturating_add(self.inner.value())
    }

    /// See [`TxData::protected`].
    pub fn protected(&self) -> bool {
        self.inner.protected()
    }

    /// See [`TxData::raw_signature_values`].
    pub fn raw_signature_values(&self) -> (U256, U256, U256) {
        self.inner.raw_signature_values()
    }

    /// A copy carrying the 65 byte `[r ‖ s ‖ recovery id]` signature `sig`,
    /// converted to this transaction's `v` convention by `signer`.
    pub fn with_signature(&self, signer: &Signer, sig: &[u8; 65]) -> SignerResult<Self> {
        let (r, s, v) = signer.signature_values(self, sig)?;

        let mut inner = self.inner.clone();
        inner.set_signature_values(v, r, s);

        Ok(Self::new(inner))
    }

    pub(crate) fn cached_sender(&self, key: SenderCacheKey) -> Option<H160> {
        match *self.from.read() {
            Some((k, addr)) if k == key => Some(addr),
            _ => None,
        }
    }

    pub(crate) fn cache_sender(&self, key: SenderCacheKey, addr: H160) {
        *self.from.write() = Some((key, addr));
    }
}

impl Clone for Transaction {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            hash: RwLock::new(*self.hash.read()),
            size: RwLock::new(*self.size.read()),
            from: RwLock::new(*self.from.read()),
        }
    }
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Transaction {}

impl From<TxData> for Transaction {
    fn from(inner: TxData) -> Self {
        Self::new(inner)
    }
}

/// Block body form: legacy transactions as a list, typed ones as a byte
/// string wrapping their binary form.
impl Encodable for Transaction {
    fn rlp_append(&self, s: &mut RlpStream) {
        match &self.inner {
            TxData::Legacy(tx) => s.append(tx),
            _ => s.append(&self.encode_without_sidecar()),
        };
    }
}

impl Decodable for Transaction {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        match rlp.is_list() {
            true => Ok(Self::new(TxData::Legacy(LegacyTx::decode_fields(rlp)?))),
            false => {
                let data = rlp.data()?;
                match data.first() {
                    Some(b) if *b > 0x7f => {
                        Err(DecoderError::Custom("typed transaction expected"))
                    }
                    _ => Ok(Transaction::decode(data)?),
                }
            }
        }
    }
}

/// The transactions of a block.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Transactions(pub Vec<Transaction>);

impl Deref for Transactions {
    type Target = [Transaction];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Transaction>> for Transactions {
    fn from(v: Vec<Transaction>) -> Self {
        Self(v)
    }
}

impl DerivableList for Transactions {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn encode_index(&self, i: usize, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.0[i].encode_without_sidecar());
    }
}
