//! The data model of an Ethereum execution layer block body.
//!
//! - [`transaction`]: the closed set of transaction variants ([`TxData`]) and
//!   the [`Transaction`] envelope that gives them a self describing binary
//!   form, a cached hash and a cached size.
//! - [`signer`]: fork aware signature hashing, sender recovery and signing,
//!   composed from an ordered list of fork rules.
//! - [`receipt`], [`withdrawal`], [`request`]: the other lists committed to by
//!   a block header.
//! - [`roots`]: the header commitments over all of the above.

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]
#![deny(missing_docs)]

pub mod errors;
pub mod receipt;
pub mod request;
pub mod roots;
pub mod signer;
pub mod transaction;
pub mod withdrawal;

pub use errors::{DecodeError, DecodeResult, SignatureError, SignerResult, TxError};
pub use receipt::{Log, Receipt, ReceiptOutcome, Receipts};
pub use request::Request;
pub use signer::{ForkRule, Signer};
pub use transaction::{
    access_list::{AccessList, AccessTuple},
    Transaction, Transactions, TxData, TxType,
};
pub use withdrawal::{Withdrawal, Withdrawals};

#[cfg(test)]
pub(crate) mod testing_utils;
