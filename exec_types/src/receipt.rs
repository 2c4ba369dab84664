//! Transaction receipts in their consensus encoding.

use std::ops::Deref;

use ethereum_types::{Bloom, BloomInput, H160, H256};
use exec_trie::DerivableList;
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};
use rlp_derive::{RlpDecodable, RlpEncodable};

use crate::{
    errors::{DecodeError, DecodeResult},
    transaction::{
        rlp_utils::{checked_rlp, expect_fields},
        TxType,
    },
};

/// A log emitted during execution.
#[derive(Clone, Debug, Default, Eq, PartialEq, RlpEncodable, RlpDecodable)]
pub struct Log {
    /// The emitting contract.
    pub address: H160,
    /// Indexed topics.
    pub topics: Vec<H256>,
    /// Unindexed data.
    pub data: Vec<u8>,
}

/// The first field of a receipt.
///
/// Receipts before Byzantium carry the state root after the transaction,
/// later ones a success flag.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ReceiptOutcome {
    /// EIP-658 status: `true` on success.
    Status(bool),
    /// Intermediate state root.
    PostState(H256),
}

impl From<bool> for ReceiptOutcome {
    fn from(status: bool) -> Self {
        Self::Status(status)
    }
}

impl From<H256> for ReceiptOutcome {
    fn from(root: H256) -> Self {
        Self::PostState(root)
    }
}

impl Encodable for ReceiptOutcome {
    fn rlp_append(&self, s: &mut RlpStream) {
        match self {
            ReceiptOutcome::Status(status) => s.append(status),
            ReceiptOutcome::PostState(root) => s.append(root),
        };
    }
}

/// Told apart by payload length: 32 bytes for a root, at most one for a
/// status.
impl Decodable for ReceiptOutcome {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        let data = rlp.data()?;
        match data {
            [] => Ok(Self::Status(false)),
            [1] => Ok(Self::Status(true)),
            _ if data.len() == 32 => Ok(Self::PostState(H256::from_slice(data))),
            _ => Err(DecoderError::Custom("invalid receipt status or post state")),
        }
    }
}

/// The outcome of a transaction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Receipt {
    /// Type of the transaction the receipt belongs to.
    pub tx_type: TxType,
    /// Success flag or post-transaction state root.
    pub outcome: ReceiptOutcome,
    /// Gas used in the block up to and including this transaction.
    pub cumulative_gas_used: u64,
    /// Bloom filter over the addresses and topics of `logs`.
    pub logs_bloom: Bloom,
    /// Logs emitted by the transaction.
    pub logs: Vec<Log>,
}

impl Receipt {
    const FIELDS: usize = 4;

    /// A receipt with its bloom computed from `logs`. `outcome` is a status
    /// flag or a post-state root.
    pub fn new(
        tx_type: TxType,
        outcome: impl Into<ReceiptOutcome>,
        cumulative_gas_used: u64,
        logs: Vec<Log>,
    ) -> Self {
        Self {
            tx_type,
            outcome: outcome.into(),
            cumulative_gas_used,
            logs_bloom: logs_bloom(&logs),
            logs,
        }
    }

    /// The success flag, `None` for post-state receipts.
    pub fn status(&self) -> Option<bool> {
        match self.outcome {
            ReceiptOutcome::Status(status) => Some(status),
            ReceiptOutcome::PostState(_) => None,
        }
    }

    /// RLP encodes the receipt and prepends the transaction type, unless it
    /// is a legacy one.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = rlp::encode(self).to_vec();
        if self.tx_type != TxType::Legacy {
            bytes.insert(0, self.tx_type.into());
        }

        bytes
    }

    /// Decodes the output of [`Self::encode`].
    pub fn decode(bytes: &[u8]) -> DecodeResult<Self> {
        let first = *bytes.first().ok_or(DecodeError::TruncatedEnvelope)?;
        let (tx_type, payload) = match first {
            b if b > 0x7f => (TxType::Legacy, bytes),
            0 => return Err(DecodeError::UnsupportedType(0)),
            b => (TxType::try_from(b)?, &bytes[1..]),
        };

        let rlp = checked_rlp(payload)?;
        expect_fields(&rlp, Self::FIELDS)?;

        Ok(Self {
            tx_type,
            outcome: rlp.val_at(0)?,
            cumulative_gas_used: rlp.val_at(1)?,
            logs_bloom: rlp.val_at(2)?,
            logs: rlp.list_at(3)?,
        })
    }
}

/// Body only, without the type byte.
impl Encodable for Receipt {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(Self::FIELDS);
        s.append(&self.outcome);
        s.append(&self.cumulative_gas_used);
        s.append(&self.logs_bloom);
        s.append_list(&self.logs);
    }
}

/// The bloom of `logs`: every address and topic is accrued.
pub fn logs_bloom(logs: &[Log]) -> Bloom {
    let mut bloom = Bloom::zero();
    for log in logs {
        bloom.accrue(BloomInput::Raw(log.address.as_bytes()));
        for topic in log.topics.iter() {
            bloom.accrue(BloomInput::Raw(topic.as_bytes()));
        }
    }

    bloom
}

/// The receipts of a block.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Receipts(pub Vec<Receipt>);

impl Deref for Receipts {
    type Target = [Receipt];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Receipt>> for Receipts {
    fn from(v: Vec<Receipt>) -> Self {
        Self(v)
    }
}

impl DerivableList for Receipts {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn encode_index(&self, i: usize, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.0[i].encode());
    }
}
