//! Error types for decoding, signature handling and fee computations.

use ethereum_types::{H256, U256};
use rlp::DecoderError;
use thiserror::Error;

use crate::transaction::TxType;

/// Stores the result of decoding. Returns a [DecodeError] upon failure.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Stores the result of signer operations. Returns a [SignatureError] upon
/// failure.
pub type SignerResult<T> = Result<T, SignatureError>;

/// Structural errors met while decoding an envelope or one of its parts.
///
/// Decoding never recovers from any of these.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DecodeError {
    /// The underlying RLP is malformed.
    #[error("Malformed RLP: {0}")]
    Rlp(#[from] DecoderError),

    /// The type byte does not belong to any known variant.
    #[error("Transaction type {0:#04x} is not supported")]
    UnsupportedType(u8),

    /// Fewer than two bytes were given for a typed envelope.
    #[error("Typed transaction too short")]
    TruncatedEnvelope,

    /// Bytes follow the end of the encoded item.
    #[error("Found {0} trailing bytes after the encoded item")]
    TrailingBytes(usize),

    /// A list has the wrong number of elements.
    #[error("Expected a list of {expected} fields, got {got}")]
    FieldCount {
        /// Number of fields the item has.
        expected: usize,
        /// Number of fields found.
        got: usize,
    },

    /// A fixed size field has the wrong length.
    #[error("Field `{field}` must be {expected} bytes long, got {got}")]
    InvalidFieldLength {
        /// Name of the field.
        field: &'static str,
        /// Required length.
        expected: usize,
        /// Length found.
        got: usize,
    },
}

// Lets strict decoders back `rlp::Decodable` impls.
impl From<DecodeError> for DecoderError {
    fn from(e: DecodeError) -> Self {
        match e {
            DecodeError::Rlp(e) => e,
            _ => DecoderError::Custom("invalid typed item"),
        }
    }
}

/// Errors met while hashing for, recovering or injecting signatures.
///
/// A transaction failing with any of these is rejected.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SignatureError {
    /// `s` is above half the curve order (EIP-2).
    #[error("Signature `s` value is above the secp256k1 half order")]
    NonCanonicalS,

    /// `r` or `s` is zero or not below the curve order.
    #[error("Invalid transaction v, r, s values")]
    InvalidSignatureValues,

    /// `v` is not valid for the transaction type.
    #[error("Invalid `v` value {0} for this transaction type")]
    InvalidV(U256),

    /// A replay protected legacy signature reached a signer without EIP-155.
    #[error("Transaction type does not support EIP-155 protected signatures")]
    UnexpectedProtection,

    /// The transaction is bound to another chain.
    #[error("Invalid chain id for signer: have {got}, want {expected}")]
    ChainIdMismatch {
        /// Chain id of the signer.
        expected: u64,
        /// Chain id of the transaction.
        got: u64,
    },

    /// No fork rule of the signer handles this transaction type.
    #[error("Transaction type {0:?} not supported by this signer")]
    UnsupportedTxType(TxType),

    /// The public key could not be recovered.
    #[error("Public key recovery failed: {0}")]
    Recovery(#[from] secp256k1::Error),
}

/// Errors related to fees and blob side-cars.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TxError {
    /// The fee cap does not cover the base fee.
    #[error("Fee cap {fee_cap} less than base fee {base_fee}")]
    FeeCapTooLow {
        /// The transaction's fee cap.
        fee_cap: U256,
        /// The block's base fee.
        base_fee: U256,
    },

    /// Side-car blobs, commitments and proofs are not the same count, or
    /// differ from the number of versioned hashes.
    #[error("Side-car has {blobs} blobs, {commitments} commitments and {proofs} proofs for {hashes} hashes")]
    SidecarLengthMismatch {
        /// Number of blobs.
        blobs: usize,
        /// Number of commitments.
        commitments: usize,
        /// Number of proofs.
        proofs: usize,
        /// Number of versioned hashes of the transaction.
        hashes: usize,
    },

    /// A commitment does not match its versioned hash.
    #[error("Blob {index}: computed versioned hash {computed:x}, transaction has {expected:x}")]
    BlobHashMismatch {
        /// Position of the blob.
        index: usize,
        /// The hash derived from the commitment.
        computed: H256,
        /// The hash in the transaction.
        expected: H256,
    },

    /// The operation requires a blob transaction.
    #[error("Transaction of type {0:?} cannot carry blobs")]
    NotABlobTx(TxType),
}
