//! Fork aware signature hashing, sender recovery and signing.
//!
//! A [`Signer`] is a chain id plus an ordered list of [`ForkRule`]s, oldest
//! first. Each rule handles a set of transaction types. A transaction is
//! handed to the newest rule that handles it; if none does, the signer
//! rejects it. Replay protected legacy transactions are the one case that
//! moves between rules: [`ForkRule::Eip155`] takes them, and unprotected ones
//! fall through to [`ForkRule::Homestead`].

use ethereum_types::{H160, H256, U256};
use exec_common::{ChainConfig, Fork, SYSTEM_ADDRESS};
use keccak_hash::keccak;
use log::debug;
use rlp::RlpStream;
use secp256k1::{
    ecdsa::{RecoverableSignature, RecoveryId},
    All, Message, PublicKey, Secp256k1, SecretKey,
};

use crate::{
    errors::{SignatureError, SignerResult},
    transaction::{LegacyTx, Transaction, TxData, TxType},
};

/// The secp256k1 curve order.
const SECP256K1_N: U256 = U256([
    0xbfd25e8cd0364141,
    0xbaaedce6af48a03b,
    0xfffffffffffffffe,
    0xffffffffffffffff,
]);

/// Half the secp256k1 curve order, the largest `s` allowed by EIP-2.
const SECP256K1_HALF_N: U256 = U256([
    0xdfe92f46681b20a0,
    0x5d576e7357a4501d,
    0xffffffffffffffff,
    0x7fffffffffffffff,
]);

/// A set of transaction types a signer learns to handle at some fork.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ForkRule {
    /// Unprotected legacy signatures, `v ∈ {27, 28}`, low `s`.
    Homestead,
    /// Replay protected legacy signatures, `v = chain_id * 2 + 35 + parity`.
    Eip155,
    /// Access list transactions.
    Eip2930,
    /// Dynamic fee transactions.
    London,
    /// Blob transactions.
    Cancun,
    /// Unsigned deposit, withdrawal and batch transactions.
    SystemTxs,
    /// Account abstraction transactions.
    AccountAbstraction,
}

impl ForkRule {
    const ALL: [ForkRule; 7] = [
        ForkRule::Homestead,
        ForkRule::Eip155,
        ForkRule::Eip2930,
        ForkRule::London,
        ForkRule::Cancun,
        ForkRule::SystemTxs,
        ForkRule::AccountAbstraction,
    ];

    fn handles(self, tx: &TxData) -> bool {
        match (self, tx) {
            (ForkRule::Homestead, TxData::Legacy(tx)) => !tx.protected(),
            (ForkRule::Eip155, TxData::Legacy(tx)) => tx.protected(),
            (ForkRule::Eip2930, TxData::AccessList(_))
            | (ForkRule::London, TxData::DynamicFee(_))
            | (ForkRule::Cancun, TxData::Blob(_))
            | (ForkRule::AccountAbstraction, TxData::AccountAbstraction(_)) => true,
            (ForkRule::SystemTxs, tx) => tx.tx_type().is_system(),
            _ => false,
        }
    }
}

/// Hashes, recovers and injects transaction signatures for one chain.
#[derive(Clone, Debug)]
pub struct Signer {
    chain_id: u64,
    rules: Vec<ForkRule>,
    secp: Secp256k1<All>,
}

impl PartialEq for Signer {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id && self.rules == other.rules
    }
}

impl Eq for Signer {}

impl Signer {
    fn with_rules(chain_id: u64, mut rules: Vec<ForkRule>) -> Self {
        rules.sort();
        rules.dedup();

        Self {
            chain_id,
            rules,
            secp: Secp256k1::new(),
        }
    }

    /// Only unprotected legacy transactions, no chain id.
    pub fn homestead() -> Self {
        Self::with_rules(0, vec![ForkRule::Homestead])
    }

    /// Legacy transactions, protected for `chain_id` or not.
    pub fn eip155(chain_id: u64) -> Self {
        Self::with_rules(chain_id, vec![ForkRule::Homestead, ForkRule::Eip155])
    }

    /// The signer in effect once `fork` is active.
    pub fn for_fork(chain_id: u64, fork: Fork) -> Self {
        let rules = match fork {
            Fork::Frontier | Fork::Homestead => 1,
            Fork::SpuriousDragon => 2,
            Fork::Berlin => 3,
            Fork::London => 4,
            Fork::Cancun | Fork::Verkle => 5,
        };

        Self::with_rules(chain_id, ForkRule::ALL[..rules].to_vec())
    }

    /// Every rule, system and account abstraction transactions included.
    pub fn latest(chain_id: u64) -> Self {
        Self::with_rules(chain_id, ForkRule::ALL.to_vec())
    }

    /// The signer for `config` at `block`/`timestamp`. System and account
    /// abstraction rules are added when the chain enables them.
    pub fn from_config(config: &ChainConfig, block: u64, timestamp: u64) -> Self {
        let rules = config.rules(block, timestamp);
        let mut signer = Self::for_fork(rules.chain_id, rules.fork);

        if rules.deposit_txs || rules.withdrawal_txs || rules.batch_txs {
            signer.rules.push(ForkRule::SystemTxs);
        }
        if rules.account_abstraction_txs {
            signer.rules.push(ForkRule::AccountAbstraction);
        }

        signer
    }

    /// The chain id transactions are checked against.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// The active rules, oldest first.
    pub fn rules(&self) -> &[ForkRule] {
        &self.rules
    }

    fn has_rule(&self, rule: ForkRule) -> bool {
        self.rules.contains(&rule)
    }

    fn cache_key(&self) -> (u64, u32) {
        let mask = self.rules.iter().fold(0, |m, r| m | 1 << *r as u32);
        (self.chain_id, mask)
    }

    /// The newest rule handling `tx`.
    fn rule_for(&self, tx: &TxData) -> SignerResult<ForkRule> {
        match self.rules.iter().rev().find(|r| r.handles(tx)) {
            Some(rule) => Ok(*rule),
            None if tx.as_legacy().is_some_and(LegacyTx::protected) => {
                Err(SignatureError::UnexpectedProtection)
            }
            None => Err(SignatureError::UnsupportedTxType(tx.tx_type())),
        }
    }

    fn check_chain_id(&self, tx: &TxData) -> SignerResult<()> {
        match tx.chain_id() {
            Some(got) if got != self.chain_id => Err(SignatureError::ChainIdMismatch {
                expected: self.chain_id,
                got,
            }),
            _ => Ok(()),
        }
    }

    /// The hash signed by the sender of `tx`.
    ///
    /// Legacy transactions are hashed over their six unsigned fields, plus
    /// `(chain_id, 0, 0)` when the signer has [`ForkRule::Eip155`]. Typed
    /// transactions are hashed as `type ‖ rlp(unsigned fields)`.
    pub fn sig_hash(&self, tx: &Transaction) -> SignerResult<H256> {
        let inner = tx.inner();
        self.rule_for(inner)?;

        match inner {
            TxData::Legacy(legacy) => Ok(legacy_sig_hash(
                legacy,
                self.has_rule(ForkRule::Eip155).then_some(self.chain_id),
            )),
            inner => {
                self.check_chain_id(inner)?;
                Ok(typed_sig_hash(inner))
            }
        }
    }

    /// Recovers the address that signed `tx`. System transactions report
    /// their declared sender, or the system address for batches.
    ///
    /// The result is cached on `tx` for this signer.
    pub fn sender(&self, tx: &Transaction) -> SignerResult<H160> {
        let key = self.cache_key();
        if let Some(addr) = tx.cached_sender(key) {
            return Ok(addr);
        }

        let addr = self.recover_sender(tx.inner()).map_err(|e| {
            debug!("Rejected signature of tx {:x}: {}", tx.hash(), e);
            e
        })?;
        tx.cache_sender(key, addr);

        Ok(addr)
    }

    fn recover_sender(&self, tx: &TxData) -> SignerResult<H160> {
        let rule = self.rule_for(tx)?;

        let (hash, recovery_id) = match (rule, tx) {
            (ForkRule::SystemTxs, TxData::Deposit(tx)) => return Ok(tx.from),
            (ForkRule::SystemTxs, TxData::Withdrawal(tx)) => return Ok(tx.from),
            (ForkRule::SystemTxs, _) => return Ok(SYSTEM_ADDRESS),
            (ForkRule::AccountAbstraction, TxData::AccountAbstraction(aa)) => {
                self.check_chain_id(tx)?;
                return Ok(aa.sender);
            }
            (ForkRule::Homestead, TxData::Legacy(legacy)) => {
                let recovery_id = match legacy.v.low_u64() {
                    v @ (27 | 28) if legacy.v.bits() <= 8 => v - 27,
                    _ => return Err(SignatureError::InvalidV(legacy.v)),
                };
                (legacy_sig_hash(legacy, None), recovery_id)
            }
            (ForkRule::Eip155, TxData::Legacy(legacy)) => {
                let chain_id = legacy
                    .chain_id()
                    .ok_or(SignatureError::InvalidV(legacy.v))?;
                if chain_id != self.chain_id {
                    return Err(SignatureError::ChainIdMismatch {
                        expected: self.chain_id,
                        got: chain_id,
                    });
                }
                let recovery_id = (legacy.v - 35 - U256::from(chain_id) * 2).low_u64();
                (legacy_sig_hash(legacy, Some(chain_id)), recovery_id)
            }
            (_, typed) => {
                self.check_chain_id(typed)?;
                let (v, _, _) = typed.raw_signature_values();
                if v > U256::one() {
                    return Err(SignatureError::InvalidV(v));
                }
                (typed_sig_hash(typed), v.low_u64())
            }
        };

        let (_, r, s) = tx.raw_signature_values();
        self.recover_plain(hash, r, s, recovery_id)
    }

    fn recover_plain(&self, hash: H256, r: U256, s: U256, recovery_id: u64) -> SignerResult<H160> {
        validate_signature_values(r, s)?;

        let mut compact = [0u8; 64];
        r.to_big_endian(&mut compact[..32]);
        s.to_big_endian(&mut compact[32..]);

        let recovery_id = RecoveryId::from_i32(recovery_id as i32)?;
        let sig = RecoverableSignature::from_compact(&compact, recovery_id)?;
        let public = self
            .secp
            .recover_ecdsa(&Message::from_digest(hash.0), &sig)?;

        Ok(public_key_to_address(&public))
    }

    /// Splits a 65 byte `[r ‖ s ‖ recovery id]` signature into the `(r, s,
    /// v)` values `tx` carries under this signer.
    pub fn signature_values(
        &self,
        tx: &Transaction,
        sig: &[u8; 65],
    ) -> SignerResult<(U256, U256, U256)> {
        let r = U256::from_big_endian(&sig[..32]);
        let s = U256::from_big_endian(&sig[32..64]);
        let recovery_id = sig[64];
        if recovery_id > 1 {
            return Err(SignatureError::InvalidV(U256::from(recovery_id)));
        }

        let v = match tx.inner() {
            TxData::Legacy(_) => match self.has_rule(ForkRule::Eip155) {
                true => U256::from(recovery_id) + 35 + U256::from(self.chain_id) * 2,
                false => U256::from(recovery_id) + 27,
            },
            inner => {
                self.rule_for(inner)?;
                self.check_chain_id(inner)?;
                U256::from(recovery_id)
            }
        };

        Ok((r, s, v))
    }
}

/// Signs `tx` with `key` under `signer`, returning the signed copy.
pub fn sign_tx(tx: &Transaction, key: &SecretKey, signer: &Signer) -> SignerResult<Transaction> {
    let hash = signer.sig_hash(tx)?;
    let sig = signer
        .secp
        .sign_ecdsa_recoverable(&Message::from_digest(hash.0), key);
    let (recovery_id, compact) = sig.serialize_compact();

    let mut bytes = [0u8; 65];
    bytes[..64].copy_from_slice(&compact);
    bytes[64] = recovery_id.to_i32() as u8;

    tx.with_signature(signer, &bytes)
}

/// The address of `public`: the last 20 bytes of the keccak of its
/// uncompressed form.
pub fn public_key_to_address(public: &PublicKey) -> H160 {
    let uncompressed = public.serialize_uncompressed();
    H160::from_slice(&keccak(&uncompressed[1..])[12..])
}

fn validate_signature_values(r: U256, s: U256) -> SignerResult<()> {
    if r.is_zero() || s.is_zero() || r >= SECP256K1_N || s >= SECP256K1_N {
        return Err(SignatureError::InvalidSignatureValues);
    }

    match s > SECP256K1_HALF_N {
        true => Err(SignatureError::NonCanonicalS),
        false => Ok(()),
    }
}

fn legacy_sig_hash(tx: &LegacyTx, chain_id: Option<u64>) -> H256 {
    let extra = if chain_id.is_some() { 3 } else { 0 };

    let mut s = RlpStream::new_list(LegacyTx::UNSIGNED_FIELDS + extra);
    tx.append_unsigned(&mut s);
    if let Some(chain_id) = chain_id {
        s.append(&chain_id);
        s.append(&0u8);
        s.append(&0u8);
    }

    keccak(s.out())
}

fn typed_sig_hash(tx: &TxData) -> H256 {
    let mut s = RlpStream::new_list(tx.unsigned_field_count());
    tx.append_unsigned(&mut s);

    let mut payload = vec![u8::from(tx.tx_type())];
    payload.extend_from_slice(&s.out());

    keccak(payload)
}

#[cfg(test)]
mod tests {
    use ethereum_types::{H160, H256, U256};
    use exec_common::{ChainConfig, Fork, SYSTEM_ADDRESS};
    use hex_literal::hex;
    use secp256k1::SecretKey;

    use super::{sign_tx, ForkRule, Signer};
    use crate::{
        errors::SignatureError,
        testing_utils::{
            common_setup, signing_key, ACCESS_LIST_TX, DYNAMIC_FEE_TX, EIP155_TX,
            HIGH_S_HOMESTEAD_TX, HOMESTEAD_TX, RIGHTVRS_TX, SIGNER_ADDRESS,
        },
        transaction::{
            AccountAbstractionTx, BatchTx, BlobTx, DepositTx, DynamicFeeTx, LegacyTx,
            Transaction, TxData, TxType, WithdrawalTx,
        },
    };

    fn to_addr() -> H160 {
        H160(hex!("095e7baea6a6c7c4c2dfeb977efac326af552d87"))
    }

    fn unsigned_homestead_tx() -> Transaction {
        Transaction::new(TxData::Legacy(LegacyTx {
            nonce: 0,
            gas_price: U256::from(10),
            gas: 50000,
            to: Some(to_addr()),
            value: U256::from(10),
            ..Default::default()
        }))
    }

    fn flip_s(tx: &Transaction) -> Transaction {
        let mut inner = tx.inner().clone();
        let (v, r, s) = inner.raw_signature_values();
        inner.set_signature_values(v, r, super::SECP256K1_N - s);
        Transaction::new(inner)
    }

    #[test]
    fn homestead_scenario() {
        common_setup();

        let signer = Signer::homestead();
        let tx = Transaction::decode(&HOMESTEAD_TX).unwrap();

        assert_eq!(
            signer.sig_hash(&tx).unwrap(),
            H256(hex!("569c8ae964e73a99756c4f1e5bc03ca6b414d850c506421d8bae735a311cb173"))
        );
        assert_eq!(signer.sender(&tx).unwrap(), SIGNER_ADDRESS);
        // Cached path.
        assert_eq!(signer.sender(&tx).unwrap(), SIGNER_ADDRESS);

        let signed = sign_tx(&unsigned_homestead_tx(), &signing_key(), &signer).unwrap();
        assert_eq!(signed.encode(), HOMESTEAD_TX);
        assert_eq!(signed.raw_signature_values().0, U256::from(27));
    }

    #[test]
    fn eip155_sign_and_recover() {
        let signer = Signer::eip155(1);
        let signed = sign_tx(&unsigned_homestead_tx(), &signing_key(), &signer).unwrap();

        assert_eq!(signed.encode(), EIP155_TX);
        assert!(signed.protected());
        assert_eq!(signer.sender(&signed).unwrap(), SIGNER_ADDRESS);

        // An EIP-155 signer still accepts unprotected signatures.
        let unprotected = Transaction::decode(&HOMESTEAD_TX).unwrap();
        assert_eq!(signer.sender(&unprotected).unwrap(), SIGNER_ADDRESS);
    }

    #[test]
    fn rightvrs_vector() {
        let tx = Transaction::decode(&RIGHTVRS_TX).unwrap();
        let signer = Signer::homestead();

        assert_eq!(
            signer.sig_hash(&tx).unwrap(),
            H256(hex!("fe7a79529ed5f7c3375d06b26b186a8644e0e16c373d7a12be41c62d6042b77a"))
        );
        assert_eq!(
            signer.sender(&tx).unwrap(),
            H160(hex!("5ba306ae3650c72c3586da6f1dbac3c9fa7e529e"))
        );
    }

    #[test]
    fn typed_vectors_recover() {
        let signer = Signer::latest(1);

        let dynamic_fee = Transaction::decode(&DYNAMIC_FEE_TX).unwrap();
        assert_eq!(
            signer.sig_hash(&dynamic_fee).unwrap(),
            H256(hex!("351de06ab1f472dc7731fb7e37ea966413950bba578f0051cdc9e738b54b6d81"))
        );
        assert_eq!(signer.sender(&dynamic_fee).unwrap(), SIGNER_ADDRESS);

        let access_list = Transaction::decode(&ACCESS_LIST_TX).unwrap();
        assert_eq!(signer.sender(&access_list).unwrap(), SIGNER_ADDRESS);
    }

    #[test]
    fn typed_sign_round_trip() {
        let signer = Signer::latest(1);
        let tx = Transaction::decode(&DYNAMIC_FEE_TX).unwrap();
        let mut inner = tx.inner().clone();
        inner.set_signature_values(U256::zero(), U256::zero(), U256::zero());

        let signed = sign_tx(&Transaction::new(inner), &signing_key(), &signer).unwrap();
        assert_eq!(signed.encode(), DYNAMIC_FEE_TX);
    }

    #[test]
    fn high_s_is_rejected_for_every_signed_type() {
        common_setup();

        let raw = Transaction::decode(&HIGH_S_HOMESTEAD_TX).unwrap();
        assert_eq!(
            Signer::homestead().sender(&raw),
            Err(SignatureError::NonCanonicalS)
        );

        let signer = Signer::latest(1);
        for bytes in [&EIP155_TX[..], &ACCESS_LIST_TX[..], &DYNAMIC_FEE_TX[..]] {
            let tx = flip_s(&Transaction::decode(bytes).unwrap());
            assert_eq!(signer.sender(&tx), Err(SignatureError::NonCanonicalS));
        }

        let blob = Transaction::new(TxData::Blob(BlobTx {
            chain_id: 1,
            nonce: 3,
            gas_tip_cap: U256::from(1),
            gas_fee_cap: U256::from(10),
            gas: 21000,
            to: to_addr(),
            blob_fee_cap: U256::from(1),
            blob_hashes: vec![H256::repeat_byte(1)],
            ..Default::default()
        }));
        let signed = sign_tx(&blob, &signing_key(), &signer).unwrap();
        assert_eq!(signer.sender(&signed), Ok(SIGNER_ADDRESS));
        assert_eq!(
            signer.sender(&flip_s(&signed)),
            Err(SignatureError::NonCanonicalS)
        );
    }

    #[test]
    fn sig_hash_rejects_protection_the_signer_cannot_handle() {
        let eip155 = Transaction::decode(&EIP155_TX).unwrap();

        assert_eq!(
            Signer::homestead().sig_hash(&eip155),
            Err(SignatureError::UnexpectedProtection)
        );
        assert!(Signer::eip155(1).sig_hash(&eip155).is_ok());
        assert!(Signer::homestead()
            .sig_hash(&Transaction::decode(&HOMESTEAD_TX).unwrap())
            .is_ok());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let tx = Transaction::decode(&HOMESTEAD_TX).unwrap();
        let (v, r, _) = tx.raw_signature_values();

        for s in [U256::zero(), super::SECP256K1_N] {
            let mut inner = tx.inner().clone();
            inner.set_signature_values(v, r, s);
            assert_eq!(
                Signer::homestead().sender(&Transaction::new(inner)),
                Err(SignatureError::InvalidSignatureValues)
            );
        }
    }

    #[test]
    fn typed_v_must_be_a_parity() {
        let tx = Transaction::decode(&DYNAMIC_FEE_TX).unwrap();
        let (_, r, s) = tx.raw_signature_values();
        let mut inner = tx.inner().clone();
        inner.set_signature_values(U256::from(27), r, s);

        assert_eq!(
            Signer::latest(1).sender(&Transaction::new(inner)),
            Err(SignatureError::InvalidV(U256::from(27)))
        );
    }

    #[test]
    fn chain_mismatch_is_rejected() {
        let signer = Signer::latest(5);

        assert_eq!(
            signer.sender(&Transaction::decode(&DYNAMIC_FEE_TX).unwrap()),
            Err(SignatureError::ChainIdMismatch {
                expected: 5,
                got: 1
            })
        );
        assert_eq!(
            signer.sender(&Transaction::decode(&EIP155_TX).unwrap()),
            Err(SignatureError::ChainIdMismatch {
                expected: 5,
                got: 1
            })
        );
    }

    #[test]
    fn older_signers_reject_newer_types() {
        let eip155 = Transaction::decode(&EIP155_TX).unwrap();
        assert_eq!(
            Signer::homestead().sender(&eip155),
            Err(SignatureError::UnexpectedProtection)
        );

        let dynamic_fee = Transaction::decode(&DYNAMIC_FEE_TX).unwrap();
        assert_eq!(
            Signer::for_fork(1, Fork::Berlin).sender(&dynamic_fee),
            Err(SignatureError::UnsupportedTxType(TxType::DynamicFee))
        );
        assert_eq!(
            Signer::for_fork(1, Fork::London).sender(&dynamic_fee),
            Ok(SIGNER_ADDRESS)
        );
    }

    #[test]
    fn system_senders() {
        let signer = Signer::latest(1);

        let deposit = Transaction::new(TxData::Deposit(DepositTx {
            from: H160::repeat_byte(0xd0),
            ..Default::default()
        }));
        let withdrawal = Transaction::new(TxData::Withdrawal(WithdrawalTx {
            chain_id: 1,
            from: H160::repeat_byte(0xe0),
            ..Default::default()
        }));
        let batch = Transaction::new(TxData::Batch(BatchTx {
            chain_id: 1,
            ..Default::default()
        }));
        let aa = Transaction::new(TxData::AccountAbstraction(AccountAbstractionTx {
            chain_id: 1,
            sender: H160::repeat_byte(0xaa),
            ..Default::default()
        }));

        assert_eq!(signer.sender(&deposit), Ok(H160::repeat_byte(0xd0)));
        assert_eq!(signer.sender(&withdrawal), Ok(H160::repeat_byte(0xe0)));
        assert_eq!(signer.sender(&batch), Ok(SYSTEM_ADDRESS));
        assert_eq!(signer.sender(&aa), Ok(H160::repeat_byte(0xaa)));

        assert_eq!(
            Signer::for_fork(1, Fork::Cancun).sender(&deposit),
            Err(SignatureError::UnsupportedTxType(TxType::Deposit))
        );

        // Signing an unsigned type leaves it untouched.
        let signed = sign_tx(&batch, &signing_key(), &signer).unwrap();
        assert_eq!(signed, batch);
    }

    #[test]
    fn signer_from_config() {
        let mut config = ChainConfig::all_forks(10);
        config.deposit_txs = true;

        let signer = Signer::from_config(&config, 0, 0);
        assert_eq!(signer.chain_id(), 10);
        assert!(signer.rules().contains(&ForkRule::SystemTxs));
        assert!(!signer.rules().contains(&ForkRule::AccountAbstraction));

        let frontier = Signer::from_config(&ChainConfig::default(), 0, 0);
        assert_eq!(frontier.rules(), &[ForkRule::Homestead]);
    }

    #[test]
    fn signer_from_json_config() -> anyhow::Result<()> {
        let config = ChainConfig::from_json_str(
            r#"{"chainId": 1, "homesteadBlock": 0, "eip155Block": 10, "berlinBlock": 20}"#,
        )?;

        let tx = Transaction::decode(&EIP155_TX)?;
        assert_eq!(
            Signer::from_config(&config, 5, 0).sender(&tx),
            Err(SignatureError::UnexpectedProtection)
        );
        assert_eq!(Signer::from_config(&config, 10, 0).sender(&tx)?, SIGNER_ADDRESS);

        let access_list = Transaction::decode(&ACCESS_LIST_TX)?;
        assert!(Signer::from_config(&config, 19, 0).sender(&access_list).is_err());
        assert_eq!(
            Signer::from_config(&config, 20, 0).sender(&access_list)?,
            SIGNER_ADDRESS
        );

        Ok(())
    }

    #[test]
    fn sender_cache_is_per_signer() {
        let tx = Transaction::decode(&DYNAMIC_FEE_TX).unwrap();

        assert_eq!(Signer::latest(1).sender(&tx), Ok(SIGNER_ADDRESS));
        assert_eq!(
            Signer::eip155(1).sender(&tx),
            Err(SignatureError::UnsupportedTxType(TxType::DynamicFee))
        );
    }

    #[test]
    fn wrong_key_recovers_another_address() {
        let key = SecretKey::from_slice(&[0x11; 32]).unwrap();
        let signer = Signer::latest(1);
        let tx = Transaction::new(TxData::DynamicFee(DynamicFeeTx {
            chain_id: 1,
            to: Some(to_addr()),
            ..Default::default()
        }));

        let signed = sign_tx(&tx, &key, &signer).unwrap();
        let sender = signer.sender(&signed).unwrap();
        assert_ne!(sender, SIGNER_ADDRESS);
        assert_eq!(
            sender,
            super::public_key_to_address(&key.public_key(&secp256k1::Secp256k1::new()))
        );
    }
}
