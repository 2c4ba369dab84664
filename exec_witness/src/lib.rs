//! Stateless access witness for a unified state tree.
//!
//! A witness records every leaf a transaction (or a whole block) reads or
//! writes, and charges gas the first time a branch or a leaf chunk is
//! touched. The pieces are:
//! - [`key`]: how account headers, storage slots and code chunks map to
//!   32 byte tree keys.
//! - [`gas`]: the schedule of witness costs.
//! - [`witness`]: the [`AccessWitness`] itself.
//! - [`events`]: account level helpers charging the costs of common EVM
//!   events (calls, value transfers, contract creation, `SLOAD`, ...).
//!
//! Deleted leaves are not tracked. Callers must not rely on a witness to
//! learn that a key was removed.

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]
#![deny(missing_docs)]

pub mod events;
pub mod gas;
pub mod key;
pub mod witness;

use thiserror::Error;

pub use events::WitnessEvents;
pub use gas::WitnessGasSchedule;
pub use key::{Sha256TreeKeyHasher, Stem, TreeKey, TreeKeyHasher};
pub use witness::{AccessMode, AccessWitness, Charge, EmptyLeaves, LeafReader};

/// Stores the result of witness operations. Returns a [WitnessError] upon
/// failure.
pub type WitnessResult<T> = Result<T, WitnessError>;

/// An error type for witness operations.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum WitnessError {
    /// A key that must have been touched earlier is absent from the witness.
    #[error("Key {0} was expected to be in the witness")]
    InvariantViolation(TreeKey),

    /// The accumulated charge does not fit in a `u64`.
    #[error("Witness gas overflowed")]
    GasOverflow,
}

#[cfg(test)]
pub(crate) mod testing_utils;
