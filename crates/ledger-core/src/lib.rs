pub mod chain;
pub mod constants;
pub mod error;
pub mod pow;
pub mod shared;

pub use chain::Ledger;
pub use error::{ChainFault, LedgerError, MiningError};
pub use shared::SharedLedger;

use constants::GENESIS_HASH;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

/// The single transfer sealed into a block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

impl Transaction {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}

/// One hash-sealed record of the ledger.
///
/// Fields are only writable inside the crate: once a block has been mined and
/// handed out it is read-only to callers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    payload: Option<Transaction>,
    prior_hash: String,
    created_at: u64,
    proof: u64,
    hash: String,
}

impl Block {
    /// An unmined block linked to `prior_hash`, stamped with the current time.
    pub fn new(prior_hash: impl Into<String>, payload: Transaction) -> Self {
        Self {
            payload: Some(payload),
            prior_hash: prior_hash.into(),
            created_at: now_nanos(),
            proof: 0,
            hash: String::new(),
        }
    }

    /// The sentinel first block. It carries no payload and is never mined.
    pub fn genesis() -> Self {
        Self {
            payload: None,
            prior_hash: String::new(),
            created_at: now_nanos(),
            proof: 0,
            hash: GENESIS_HASH.to_string(),
        }
    }

    /// Hex SHA-256 over `prior_hash ++ payload json ++ created_at ++ proof`.
    pub fn compute_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.prior_hash.as_bytes());
        hasher.update(payload_bytes(&self.payload));
        hasher.update(self.created_at.to_string().as_bytes());
        hasher.update(self.proof.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Search for a proof meeting `difficulty`; returns the number of hashes tried.
    pub fn mine(&mut self, difficulty: u32) -> u64 {
        pow::mine(self, difficulty)
    }

    pub fn has_valid_hash(&self) -> bool {
        self.hash == self.compute_hash()
    }

    pub fn payload(&self) -> Option<&Transaction> {
        self.payload.as_ref()
    }

    pub fn prior_hash(&self) -> &str {
        &self.prior_hash
    }

    /// Nanoseconds since the Unix epoch.
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn proof(&self) -> u64 {
        self.proof
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }
}

fn payload_bytes(payload: &Option<Transaction>) -> Vec<u8> {
    // Strings and finite floats only; the ledger rejects NaN and infinities.
    serde_json::to_vec(payload).expect("transaction payload is always serializable")
}

fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
