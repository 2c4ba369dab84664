//! Chain configuration: the chain id, the activation points of the protocol
//! upgrades this workspace knows about, and which deployment-specific system
//! transaction kinds are enabled.
//!
//! The JSON layout follows the `config` object of a genesis file:
//!
//! ```json
//! {
//!   "chainId": 1,
//!   "homesteadBlock": 1150000,
//!   "eip155Block": 2675000,
//!   "berlinBlock": 12244000,
//!   "londonBlock": 12965000,
//!   "cancunTime": 1710338135
//! }
//! ```

use std::fmt::{self, Display};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors encountered while loading a [`ChainConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON could not be parsed.
    #[error("Failed to parse chain config: {0}")]
    Json(#[from] serde_json::Error),

    /// A fork is scheduled while an earlier one is not.
    #[error("Fork {later} is scheduled but the earlier fork {missing} is not")]
    MissingFork {
        /// The unscheduled fork.
        missing: Fork,
        /// The scheduled fork that depends on it.
        later: Fork,
    },

    /// A fork is scheduled before an earlier one.
    #[error("Fork {later} (at {later_at}) is scheduled before {earlier} (at {earlier_at})")]
    OutOfOrder {
        /// The fork that should activate first.
        earlier: Fork,
        /// Its activation point.
        earlier_at: u64,
        /// The fork activating too early.
        later: Fork,
        /// Its activation point.
        later_at: u64,
    },
}

/// Protocol upgrades that change transaction or witness handling, oldest
/// first.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub enum Fork {
    /// Genesis rules.
    Frontier,
    /// EIP-2: upper bound on `s`.
    Homestead,
    /// EIP-155: replay-protected legacy signatures.
    SpuriousDragon,
    /// EIP-2718/2930: typed envelopes, access lists.
    Berlin,
    /// EIP-1559: dynamic fee transactions.
    London,
    /// EIP-4844: blob transactions.
    Cancun,
    /// EIP-4762: stateless gas costs via the access witness.
    Verkle,
}

impl Display for Fork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Fork::Frontier => "Frontier",
            Fork::Homestead => "Homestead",
            Fork::SpuriousDragon => "SpuriousDragon",
            Fork::Berlin => "Berlin",
            Fork::London => "London",
            Fork::Cancun => "Cancun",
            Fork::Verkle => "Verkle",
        };

        write!(f, "{}", s)
    }
}

/// Chain id, fork schedule and system transaction switches.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    /// The EIP-155 chain id.
    pub chain_id: u64,

    /// Block activating [`Fork::Homestead`].
    pub homestead_block: Option<u64>,
    /// Block activating [`Fork::SpuriousDragon`].
    #[serde(rename = "eip155Block")]
    pub eip155_block: Option<u64>,
    /// Block activating [`Fork::Berlin`].
    pub berlin_block: Option<u64>,
    /// Block activating [`Fork::London`].
    pub london_block: Option<u64>,
    /// Timestamp activating [`Fork::Cancun`].
    pub cancun_time: Option<u64>,
    /// Timestamp activating [`Fork::Verkle`].
    pub verkle_time: Option<u64>,

    /// L1 deposit transactions are accepted.
    #[serde(default)]
    pub deposit_txs: bool,
    /// System withdrawal transactions are accepted.
    #[serde(default)]
    pub withdrawal_txs: bool,
    /// Decryption-key batch transactions are accepted.
    #[serde(default)]
    pub batch_txs: bool,
    /// Account abstraction transactions are accepted.
    #[serde(default)]
    pub account_abstraction_txs: bool,
}

/// The fork and switches in effect at a given block.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Rules {
    /// Chain id.
    pub chain_id: u64,
    /// Newest active fork.
    pub fork: Fork,
    /// See [`ChainConfig::deposit_txs`].
    pub deposit_txs: bool,
    /// See [`ChainConfig::withdrawal_txs`].
    pub withdrawal_txs: bool,
    /// See [`ChainConfig::batch_txs`].
    pub batch_txs: bool,
    /// See [`ChainConfig::account_abstraction_txs`].
    pub account_abstraction_txs: bool,
}

impl Rules {
    /// Whether `fork` is active.
    pub fn is_active(&self, fork: Fork) -> bool {
        self.fork >= fork
    }
}

impl ChainConfig {
    /// Parses and validates a config from its JSON form.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        debug!(
            "Loaded chain config for chain {} (forks: {:?})",
            config.chain_id,
            config.schedule().collect::<Vec<_>>()
        );

        Ok(config)
    }

    /// A config with every fork active from genesis.
    pub fn all_forks(chain_id: u64) -> Self {
        Self {
            chain_id,
            homestead_block: Some(0),
            eip155_block: Some(0),
            berlin_block: Some(0),
            london_block: Some(0),
            cancun_time: Some(0),
            verkle_time: Some(0),
            ..Default::default()
        }
    }

    /// Checks that forks are scheduled in order and without gaps. Block
    /// scheduled forks and time scheduled forks are ordered separately.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let block_forks = [
            (Fork::Homestead, self.homestead_block),
            (Fork::SpuriousDragon, self.eip155_block),
            (Fork::Berlin, self.berlin_block),
            (Fork::London, self.london_block),
        ];
        let time_forks = [
            (Fork::Cancun, self.cancun_time),
            (Fork::Verkle, self.verkle_time),
        ];

        check_fork_order(&block_forks)?;
        check_fork_order(&time_forks)?;

        if self.cancun_time.is_some() && self.london_block.is_none() {
            return Err(ConfigError::MissingFork {
                missing: Fork::London,
                later: Fork::Cancun,
            });
        }

        Ok(())
    }

    /// The newest fork active at `block`/`timestamp`.
    pub fn fork_at(&self, block: u64, timestamp: u64) -> Fork {
        let by_time = [
            (Fork::Verkle, self.verkle_time),
            (Fork::Cancun, self.cancun_time),
        ]
        .map(|(fork, at)| (fork, at, timestamp));
        let by_block = [
            (Fork::London, self.london_block),
            (Fork::Berlin, self.berlin_block),
            (Fork::SpuriousDragon, self.eip155_block),
            (Fork::Homestead, self.homestead_block),
        ]
        .map(|(fork, at)| (fork, at, block));

        by_time
            .into_iter()
            .chain(by_block)
            .find(|(_, at, now)| at.is_some_and(|at| at <= *now))
            .map_or(Fork::Frontier, |(fork, _, _)| fork)
    }

    /// Resolves the [`Rules`] in effect at `block`/`timestamp`.
    pub fn rules(&self, block: u64, timestamp: u64) -> Rules {
        Rules {
            chain_id: self.chain_id,
            fork: self.fork_at(block, timestamp),
            deposit_txs: self.deposit_txs,
            withdrawal_txs: self.withdrawal_txs,
            batch_txs: self.batch_txs,
            account_abstraction_txs: self.account_abstraction_txs,
        }
    }

    fn schedule(&self) -> impl Iterator<Item = (Fork, u64)> {
        [
            (Fork::Homestead, self.homestead_block),
            (Fork::SpuriousDragon, self.eip155_block),
            (Fork::Berlin, self.berlin_block),
            (Fork::London, self.london_block),
            (Fork::Cancun, self.cancun_time),
            (Fork::Verkle, self.verkle_time),
        ]
        .into_iter()
        .filter_map(|(fork, at)| at.map(|at| (fork, at)))
    }
}

fn check_fork_order(forks: &[(Fork, Option<u64>)]) -> Result<(), ConfigError> {
    let mut prev: Option<(Fork, Option<u64>)> = None;

    for &(fork, at) in forks {
        if let Some((prev_fork, prev_at)) = prev {
            match (prev_at, at) {
                (None, Some(_)) => {
                    return Err(ConfigError::MissingFork {
                        missing: prev_fork,
                        later: fork,
                    })
                }
                (Some(earlier_at), Some(later_at)) if later_at < earlier_at => {
                    return Err(ConfigError::OutOfOrder {
                        earlier: prev_fork,
                        earlier_at,
                        later: fork,
                        later_at,
                    })
                }
                _ => (),
            }
        }

        prev = Some((fork, at));
    }

    Ok(())
}
