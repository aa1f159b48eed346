use thiserror::Error;

/// Rejected input to a [`Ledger`](crate::chain::Ledger) operation.
///
/// These are caller mistakes, not integrity failures; a tampered chain is
/// reported by [`ChainFault`] instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("difficulty {difficulty} exceeds the maximum of {max}")]
    InvalidDifficulty { difficulty: u32, max: u32 },
    #[error("transaction `{0}` party must not be empty")]
    EmptyParty(&'static str),
    #[error("transaction amount must be a finite number")]
    NonFiniteAmount,
    #[error("ledger must contain at least the genesis block")]
    EmptyChain,
    #[error(transparent)]
    Mining(#[from] MiningError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MiningError {
    #[error("no proof found within {attempts} attempts")]
    Exhausted { attempts: u64 },
}

/// First integrity violation found while walking the chain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainFault {
    #[error("block {index}: recorded hash does not match its contents")]
    HashMismatch { index: usize },
    #[error("block {index}: prior hash does not match block {}", .index - 1)]
    BrokenLink { index: usize },
}

impl ChainFault {
    pub fn index(&self) -> usize {
        match self {
            ChainFault::HashMismatch { index } | ChainFault::BrokenLink { index } => *index,
        }
    }
}
