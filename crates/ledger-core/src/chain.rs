use crate::{
    constants::MAX_DIFFICULTY,
    error::{ChainFault, LedgerError},
    pow, Block, Transaction,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// An append-only sequence of mined blocks anchored by a genesis block.
///
/// Appending needs `&mut self`, so a `Ledger` cannot be extended from two
/// threads without external locking. Use [`SharedLedger`](crate::SharedLedger)
/// when several callers append concurrently.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "LedgerRepr", into = "LedgerRepr")]
pub struct Ledger {
    blocks: Vec<Block>,
    difficulty: u32,
}

/// Wire shape of a ledger. Loading checks the shape only; the chain itself
/// is left for [`Ledger::verify`] to judge.
#[derive(Serialize, Deserialize)]
struct LedgerRepr {
    difficulty: u32,
    blocks: Vec<Block>,
}

impl Ledger {
    /// Create a ledger holding only the genesis block.
    pub fn new(difficulty: u32) -> Result<Self, LedgerError> {
        check_difficulty(difficulty)?;
        Ok(Self {
            blocks: vec![Block::genesis()],
            difficulty,
        })
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    /// The block the next append will link to.
    pub fn tip(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// True while nothing but the genesis block is present.
    pub fn has_only_genesis(&self) -> bool {
        self.blocks.len() == 1
    }

    /// Seal one transfer into a new block mined at the ledger difficulty.
    pub fn append_transaction(
        &mut self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<&Block, LedgerError> {
        let mut block = self.next_block(from, to, amount)?;
        block.mine(self.difficulty);
        Ok(self.push(block))
    }

    /// Like [`append_transaction`](Self::append_transaction) but stops mining
    /// after `max_attempts` hashes. Nothing is appended on failure.
    pub fn try_append_transaction(
        &mut self,
        from: &str,
        to: &str,
        amount: f64,
        max_attempts: u64,
    ) -> Result<&Block, LedgerError> {
        let mut block = self.next_block(from, to, amount)?;
        pow::mine_bounded(&mut block, self.difficulty, max_attempts)?;
        Ok(self.push(block))
    }

    pub fn is_valid(&self) -> bool {
        match self.verify() {
            Ok(()) => true,
            Err(fault) => {
                warn!(%fault, "ledger failed validation");
                false
            }
        }
    }

    /// Walk every adjacent pair after genesis and report the first block whose
    /// hash no longer matches its contents or whose link to its predecessor
    /// is broken. Genesis itself is trusted.
    pub fn verify(&self) -> Result<(), ChainFault> {
        for (offset, pair) in self.blocks.windows(2).enumerate() {
            let (previous, current) = (&pair[0], &pair[1]);
            let index = offset + 1;
            if !current.has_valid_hash() {
                return Err(ChainFault::HashMismatch { index });
            }
            if current.prior_hash != previous.hash {
                return Err(ChainFault::BrokenLink { index });
            }
        }
        Ok(())
    }

    fn next_block(&self, from: &str, to: &str, amount: f64) -> Result<Block, LedgerError> {
        if from.is_empty() {
            return Err(LedgerError::EmptyParty("from"));
        }
        if to.is_empty() {
            return Err(LedgerError::EmptyParty("to"));
        }
        // NaN and both infinities all serialise as `null` and would hash alike.
        if !amount.is_finite() {
            return Err(LedgerError::NonFiniteAmount);
        }
        let payload = Transaction::new(from, to, amount);
        Ok(Block::new(self.tip().hash.clone(), payload))
    }

    fn push(&mut self, block: Block) -> &Block {
        let index = self.blocks.len();
        info!(index, proof = block.proof, hash = %block.hash, "appended block");
        self.blocks.push(block);
        &self.blocks[index]
    }
}

fn check_difficulty(difficulty: u32) -> Result<(), LedgerError> {
    if difficulty > MAX_DIFFICULTY {
        return Err(LedgerError::InvalidDifficulty {
            difficulty,
            max: MAX_DIFFICULTY,
        });
    }
    Ok(())
}

impl TryFrom<LedgerRepr> for Ledger {
    type Error = LedgerError;

    fn try_from(repr: LedgerRepr) -> Result<Self, Self::Error> {
        check_difficulty(repr.difficulty)?;
        if repr.blocks.is_empty() {
            return Err(LedgerError::EmptyChain);
        }
        Ok(Self {
            blocks: repr.blocks,
            difficulty: repr.difficulty,
        })
    }
}

impl From<Ledger> for LedgerRepr {
    fn from(ledger: Ledger) -> Self {
        Self {
            difficulty: ledger.difficulty,
            blocks: ledger.blocks,
        }
    }
}
