use anyhow::{anyhow, Context, Result};
use clap::Parser;
use ledger_core::{constants::DEFAULT_DIFFICULTY, Ledger};
use std::str::FromStr;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "ledger-cli")]
#[command(about = "Mine transactions into a hash-linked ledger and check it")]
struct Cli {
    /// Leading zero hex digits every block hash must carry
    #[arg(long, env = "LEDGER_DIFFICULTY", default_value_t = DEFAULT_DIFFICULTY)]
    difficulty: u32,

    /// Transaction as FROM:TO:AMOUNT; repeat for more blocks
    #[arg(long = "tx", value_name = "FROM:TO:AMOUNT", default_values = ["Alice:Bob:5", "John:Bob:2"])]
    txs: Vec<TxArg>,

    /// Print the whole chain as JSON before the verdict
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Debug, PartialEq)]
struct TxArg {
    from: String,
    to: String,
    amount: f64,
}

impl FromStr for TxArg {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, ':');
        let (Some(from), Some(to), Some(amount)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(anyhow!("expected FROM:TO:AMOUNT, got `{s}`"));
        };
        let amount = amount
            .trim()
            .parse()
            .with_context(|| format!("invalid amount `{amount}`"))?;
        Ok(Self {
            from: from.trim().to_string(),
            to: to.trim().to_string(),
            amount,
        })
    }
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut ledger = Ledger::new(cli.difficulty).context("creating ledger")?;
    info!(difficulty = cli.difficulty, "ledger created");

    for tx in &cli.txs {
        ledger
            .append_transaction(&tx.from, &tx.to, tx.amount)
            .with_context(|| format!("recording {} -> {}", tx.from, tx.to))?;
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&ledger)?);
    }
    println!("{}", ledger.is_valid());
    Ok(())
}
