//! Witness charges of account level EVM events.
//!
//! Each helper touches the leaves an event needs through
//! [`AccessWitness::try_touch`] and returns the resulting [`Charge`]. A helper
//! stops at the first leaf it cannot afford, so an out of gas charge leaves
//! the later leaves unrecorded.
//!
//! Helpers taking `charge_warm` fall back to the warm storage read cost when
//! every leaf they touch was already in the witness.

use std::fmt::{self, Debug};

use ethereum_types::{H160, U256};

use crate::{
    key::{TreeKey, TreeKeyHasher, CODE_CHUNK_SIZE},
    witness::{AccessWitness, Charge, LeafReader},
    WitnessError, WitnessResult,
};

impl Charge {
    fn and(self, next: Charge) -> WitnessResult<Charge> {
        Ok(Charge {
            consumed: self
                .consumed
                .checked_add(next.consumed)
                .ok_or(WitnessError::GasOverflow)?,
            expected: self
                .expected
                .checked_add(next.expected)
                .ok_or(WitnessError::GasOverflow)?,
        })
    }
}

/// Charges account level events against a witness.
pub struct WitnessEvents<'a> {
    witness: &'a mut AccessWitness,
    hasher: &'a dyn TreeKeyHasher,
    reader: &'a dyn LeafReader,
}

impl Debug for WitnessEvents<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WitnessEvents")
            .field("witness", &self.witness)
            .finish_non_exhaustive()
    }
}

impl<'a> WitnessEvents<'a> {
    /// Charges events against `witness`, deriving keys with `hasher` and
    /// reading pre-state leaves from `reader`.
    pub fn new(
        witness: &'a mut AccessWitness,
        hasher: &'a dyn TreeKeyHasher,
        reader: &'a dyn LeafReader,
    ) -> Self {
        Self {
            witness,
            hasher,
            reader,
        }
    }

    /// The underlying witness.
    pub fn witness(&self) -> &AccessWitness {
        &*self.witness
    }

    fn touch(&mut self, key: TreeKey, is_write: bool, available_gas: u64) -> WitnessResult<Charge> {
        self.witness
            .try_touch(key, is_write, self.reader, available_gas)
    }

    fn warm(&self, charge: Charge, available_gas: u64) -> Charge {
        if charge.expected != 0 {
            return charge;
        }

        let cost = self.witness.schedule().warm_storage_read_cost;
        Charge {
            consumed: cost.min(available_gas),
            expected: cost,
        }
    }

    /// Touches both header leaves of `address`.
    pub fn add_account(
        &mut self,
        address: H160,
        is_write: bool,
        available_gas: u64,
    ) -> WitnessResult<Charge> {
        let basic = self.touch(self.hasher.basic_data_key(address), is_write, available_gas)?;
        if basic.out_of_gas() {
            return Ok(basic);
        }

        let code_hash = self.touch(
            self.hasher.code_hash_key(address),
            is_write,
            available_gas - basic.consumed,
        )?;
        basic.and(code_hash)
    }

    /// Records the sender of a transaction. Paid by the intrinsic gas, so
    /// nothing is returned.
    pub fn add_tx_origin(&mut self, origin: H160) -> WitnessResult<()> {
        self.touch(self.hasher.basic_data_key(origin), true, u64::MAX)?;
        self.touch(self.hasher.code_hash_key(origin), false, u64::MAX)?;

        Ok(())
    }

    /// Records the recipient of a transaction. Paid by the intrinsic gas, so
    /// nothing is returned.
    pub fn add_tx_destination(
        &mut self,
        destination: H160,
        sends_value: bool,
        does_not_exist: bool,
    ) -> WitnessResult<()> {
        self.touch(
            self.hasher.basic_data_key(destination),
            sends_value,
            u64::MAX,
        )?;
        self.touch(
            self.hasher.code_hash_key(destination),
            does_not_exist,
            u64::MAX,
        )?;

        Ok(())
    }

    /// A `CALL` family opcode reaching `destination`.
    pub fn message_call_gas(
        &mut self,
        destination: H160,
        available_gas: u64,
    ) -> WitnessResult<Charge> {
        let charge = self.touch(
            self.hasher.basic_data_key(destination),
            false,
            available_gas,
        )?;

        Ok(self.warm(charge, available_gas))
    }

    /// A value transfer from `caller` to `target`: both balances are written.
    pub fn value_transfer_gas(
        &mut self,
        caller: H160,
        target: H160,
        available_gas: u64,
    ) -> WitnessResult<Charge> {
        let from = self.touch(self.hasher.basic_data_key(caller), true, available_gas)?;
        if from.out_of_gas() {
            return Ok(from);
        }

        let to = self.touch(
            self.hasher.basic_data_key(target),
            true,
            available_gas - from.consumed,
        )?;
        let charge = from.and(to)?;

        Ok(self.warm(charge, available_gas))
    }

    /// The collision check made before creating a contract at `address`.
    pub fn contract_create_pre_check_gas(
        &mut self,
        address: H160,
        available_gas: u64,
    ) -> WitnessResult<Charge> {
        self.touch(self.hasher.basic_data_key(address), false, available_gas)
    }

    /// Initialization of the header of a contract created at `address`.
    pub fn contract_create_init_gas(
        &mut self,
        address: H160,
        available_gas: u64,
    ) -> WitnessResult<Charge> {
        self.add_account(address, true, available_gas)
    }

    /// An `SLOAD` or `SSTORE` of `slot` in `address`.
    pub fn slot_gas(
        &mut self,
        address: H160,
        slot: U256,
        is_write: bool,
        available_gas: u64,
        charge_warm: bool,
    ) -> WitnessResult<Charge> {
        let charge = self.touch(
            self.hasher.storage_slot_key(address, slot),
            is_write,
            available_gas,
        )?;

        Ok(match charge_warm {
            true => self.warm(charge, available_gas),
            false => charge,
        })
    }

    /// An access to the version, code size, nonce or balance of `address`.
    pub fn basic_data_gas(
        &mut self,
        address: H160,
        is_write: bool,
        available_gas: u64,
        charge_warm: bool,
    ) -> WitnessResult<Charge> {
        let charge = self.touch(self.hasher.basic_data_key(address), is_write, available_gas)?;

        Ok(match charge_warm {
            true => self.warm(charge, available_gas),
            false => charge,
        })
    }

    /// An access to the code hash of `address`.
    pub fn code_hash_gas(
        &mut self,
        address: H160,
        is_write: bool,
        available_gas: u64,
        charge_warm: bool,
    ) -> WitnessResult<Charge> {
        let charge = self.touch(self.hasher.code_hash_key(address), is_write, available_gas)?;

        Ok(match charge_warm {
            true => self.warm(charge, available_gas),
            false => charge,
        })
    }

    /// Touches the code chunks covering bytes `start_pc..start_pc + size` of
    /// the `code_len` bytes of code of `address`.
    ///
    /// Bytes past the end of the code live in no chunk and are free.
    pub fn code_chunks_range_gas(
        &mut self,
        address: H160,
        start_pc: u64,
        size: u64,
        code_len: u64,
        is_write: bool,
        available_gas: u64,
    ) -> WitnessResult<Charge> {
        if size == 0 || start_pc >= code_len {
            return Ok(Charge::default());
        }

        let last_pc = start_pc.saturating_add(size).min(code_len) - 1;
        let mut total = Charge::default();
        for chunk in start_pc / CODE_CHUNK_SIZE..=last_pc / CODE_CHUNK_SIZE {
            let charge = self.touch(
                self.hasher.code_chunk_key(address, chunk),
                is_write,
                available_gas - total.consumed,
            )?;
            total = total.and(charge)?;
            if charge.out_of_gas() {
                break;
            }
        }

        Ok(total)
    }
}
