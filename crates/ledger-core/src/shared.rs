use crate::{
    chain::Ledger,
    error::{ChainFault, LedgerError},
    Block,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cloneable handle that serialises access to one [`Ledger`].
///
/// The lock is held from reading the tip until the mined block is pushed, so
/// two appends can never be mined against the same prior hash.
#[derive(Clone, Debug)]
pub struct SharedLedger {
    inner: Arc<Mutex<Ledger>>,
}

impl SharedLedger {
    pub fn new(difficulty: u32) -> Result<Self, LedgerError> {
        Ok(Self::from(Ledger::new(difficulty)?))
    }

    pub fn append_transaction(
        &self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<Block, LedgerError> {
        self.lock()
            .append_transaction(from, to, amount)
            .map(Block::clone)
    }

    pub fn is_valid(&self) -> bool {
        self.lock().is_valid()
    }

    pub fn verify(&self) -> Result<(), ChainFault> {
        self.lock().verify()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn has_only_genesis(&self) -> bool {
        self.lock().has_only_genesis()
    }

    /// Copy of the ledger as it stands now.
    pub fn snapshot(&self) -> Ledger {
        self.lock().clone()
    }

    // A panicking holder can only have died before `push`, so the ledger
    // behind a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, Ledger> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<Ledger> for SharedLedger {
    fn from(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }
}
