//! Witness gas costs.

use serde::{Deserialize, Serialize};

/// Costs charged by an [`AccessWitness`][crate::AccessWitness].
///
/// Missing fields fall back to their EIP-4762 values, so a schedule can be
/// given as a partial JSON object:
///
/// ```json
/// { "chunkFillCost": 0 }
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WitnessGasSchedule {
    /// First access to a stem.
    pub branch_read_cost: u64,
    /// First write under a stem.
    pub branch_write_cost: u64,
    /// First access to a leaf.
    pub chunk_read_cost: u64,
    /// First write to a leaf.
    pub chunk_write_cost: u64,
    /// First write to a leaf that was absent from the pre-state.
    pub chunk_fill_cost: u64,
    /// Charged by the event helpers when an access costs nothing else.
    pub warm_storage_read_cost: u64,
}

impl WitnessGasSchedule {
    /// The EIP-4762 schedule.
    pub const EIP4762: Self = Self {
        branch_read_cost: 1900,
        branch_write_cost: 3000,
        chunk_read_cost: 200,
        chunk_write_cost: 500,
        chunk_fill_cost: 6200,
        warm_storage_read_cost: 100,
    };
}

impl Default for WitnessGasSchedule {
    fn default() -> Self {
        Self::EIP4762
    }
}
