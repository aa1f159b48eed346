use ledger_core::{pow, ChainFault, Ledger, LedgerError, SharedLedger};
use serde_json::{json, Value};
use tokio::task;

fn demo_ledger() -> anyhow::Result<Ledger> {
    let mut ledger = Ledger::new(2)?;
    ledger.append_transaction("Alice", "Bob", 5.0)?;
    ledger.append_transaction("John", "Bob", 2.0)?;
    Ok(ledger)
}

#[test]
fn test_demo_chain() -> anyhow::Result<()> {
    let ledger = demo_ledger()?;
    assert!(ledger.is_valid());
    assert_eq!(ledger.len(), 3);
    for block in &ledger.blocks()[1..] {
        assert!(block.hash().starts_with(&pow::target_prefix(2)));
        assert_eq!(block.hash(), block.compute_hash());
    }
    Ok(())
}

#[test]
fn test_tampered_dump_is_rejected() -> anyhow::Result<()> {
    let ledger = demo_ledger()?;
    let mut dump: Value = serde_json::to_value(&ledger)?;
    dump["blocks"][1]["payload"]["amount"] = json!(999.0);

    let loaded: Ledger = serde_json::from_value(dump)?;
    assert_eq!(loaded.len(), 3);
    assert!(!loaded.is_valid());
    assert_eq!(loaded.verify(), Err(ChainFault::HashMismatch { index: 1 }));
    Ok(())
}

#[test]
fn test_reordered_dump_is_rejected() -> anyhow::Result<()> {
    let mut ledger = demo_ledger()?;
    ledger.append_transaction("Bob", "Carol", 3.0)?;
    let mut dump: Value = serde_json::to_value(&ledger)?;
    let blocks = dump["blocks"]
        .as_array_mut()
        .expect("blocks serialise as an array");
    blocks.swap(1, 3);

    let loaded: Ledger = serde_json::from_value(dump)?;
    assert!(!loaded.is_valid());
    Ok(())
}

#[test]
fn test_honest_dump_reloads_valid() -> anyhow::Result<()> {
    let mut ledger = Ledger::new(1)?;
    for i in 0..200u64 {
        let amount = (i * 7_919 % 100_000_000) as f64 / 1000.0 * 1.0000001;
        ledger.append_transaction("Alice", "Bob", amount)?;
    }
    ledger.append_transaction("John", "Bob", 9741.022974102201)?;

    let json = serde_json::to_string(&ledger)?;
    let loaded: Ledger = serde_json::from_str(&json)?;
    assert_eq!(loaded.blocks(), ledger.blocks());
    assert!(loaded.is_valid());
    Ok(())
}

#[test]
fn test_invalid_difficulty() {
    let err = Ledger::new(100).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::InvalidDifficulty {
            difficulty: 100,
            ..
        }
    ));
}

#[tokio::test]
async fn test_concurrent_appends() -> anyhow::Result<()> {
    let shared = SharedLedger::new(2)?;
    let num_tasks = 8;
    let mut handles = Vec::new();
    for i in 0..num_tasks {
        let shared = shared.clone();
        handles.push(task::spawn_blocking(move || {
            shared.append_transaction(&format!("sender-{i}"), "receiver", i as f64)
        }));
    }
    for handle in handles {
        handle.await??;
    }

    let ledger = shared.snapshot();
    assert_eq!(ledger.len(), num_tasks + 1);
    assert!(ledger.is_valid());
    let mut priors: Vec<&str> = ledger.blocks()[1..].iter().map(|b| b.prior_hash()).collect();
    priors.sort_unstable();
    priors.dedup();
    assert_eq!(priors.len(), num_tasks);
    Ok(())
}
