use ethereum_types::{H160, U256};
use rlp::{Encodable, Rlp, RlpStream};

use super::{
    access_list::AccessList,
    rlp_utils::{address_at, append_optional_address, expect_fields, optional_address_at},
};
use crate::errors::DecodeResult;

/// A native account abstraction transaction (type `0x05`).
///
/// The sender authorises the transaction in its own validation frame, so
/// there is no top-level signature. Total gas is the sum of the validation,
/// paymaster, post-op and execution allowances.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AccountAbstractionTx {
    /// Chain the transaction is bound to.
    pub chain_id: u64,
    /// Sender nonce.
    pub nonce: u64,
    /// The smart account executing the transaction.
    pub sender: H160,
    /// Data handed to the sender's validation entry point.
    pub sender_validation_data: Vec<u8>,
    /// Factory deploying the sender, if it does not exist yet.
    pub deployer: Option<H160>,
    /// Call data for the deployer.
    pub deployer_data: Vec<u8>,
    /// Account paying for gas instead of the sender.
    pub paymaster: Option<H160>,
    /// Call data for the paymaster.
    pub paymaster_data: Vec<u8>,
    /// Call data of the execution frame.
    pub execution_data: Vec<u8>,
    /// Extra fee paid to the block builder.
    pub builder_fee: U256,
    /// Max priority fee per gas.
    pub gas_tip_cap: U256,
    /// Max fee per gas.
    pub gas_fee_cap: U256,
    /// Gas for the sender validation frame.
    pub validation_gas: u64,
    /// Gas for the paymaster validation frame.
    pub paymaster_validation_gas: u64,
    /// Gas for the paymaster post-op frame.
    pub post_op_gas: u64,
    /// Gas for the execution frame.
    pub gas: u64,
    /// Accounts and slots warmed before execution.
    pub access_list: AccessList,
}

impl AccountAbstractionTx {
    pub(crate) const FIELDS: usize = 17;

    /// Gas limit across all frames, saturating at `u64::MAX`.
    pub fn total_gas(&self) -> u64 {
        self.validation_gas
            .saturating_add(self.paymaster_validation_gas)
            .saturating_add(self.post_op_gas)
            .saturating_add(self.gas)
    }

    pub(crate) fn append_unsigned(&self, s: &mut RlpStream) {
        s.append(&self.chain_id);
        s.append(&self.nonce);
        s.append(&self.sender);
        s.append(&self.sender_validation_data);
        append_optional_address(s, &self.deployer);
        s.append(&self.deployer_data);
        append_optional_address(s, &self.paymaster);
        s.append(&self.paymaster_data);
        s.append(&self.execution_data);
        s.append(&self.builder_fee);
        s.append(&self.gas_tip_cap);
        s.append(&self.gas_fee_cap);
        s.append(&self.validation_gas);
        s.append(&self.paymaster_validation_gas);
        s.append(&self.post_op_gas);
        s.append(&self.gas);
        s.append(&self.access_list);
    }

    pub(crate) fn decode_fields(rlp: &Rlp) -> DecodeResult<Self> {
        expect_fields(rlp, Self::FIELDS)?;

        Ok(Self {
            chain_id: rlp.val_at(0)?,
            nonce: rlp.val_at(1)?,
            sender: address_at(rlp, 2, "sender")?,
            sender_validation_data: rlp.val_at(3)?,
            deployer: optional_address_at(rlp, 4, "deployer")?,
            deployer_data: rlp.val_at(5)?,
            paymaster: optional_address_at(rlp, 6, "paymaster")?,
            paymaster_data: rlp.val_at(7)?,
            execution_data: rlp.val_at(8)?,
            builder_fee: rlp.val_at(9)?,
            gas_tip_cap: rlp.val_at(10)?,
            gas_fee_cap: rlp.val_at(11)?,
            validation_gas: rlp.val_at(12)?,
            paymaster_validation_gas: rlp.val_at(13)?,
            post_op_gas: rlp.val_at(14)?,
            gas: rlp.val_at(15)?,
            access_list: AccessList::decode_at(rlp, 16)?,
        })
    }
}

impl Encodable for AccountAbstractionTx {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(Self::FIELDS);
        self.append_unsigned(s);
    }
}
