use std::{env, fs::File};

use anyhow::{Context, Result};
use meter_ingest_rs::{InMemoryAccountStore, ingest, read_accounts, setup_logging};

fn main() -> Result<()> {
    setup_logging()?;

    let (accounts_path, readings_path) = get_paths()?;

    let accounts_file =
        File::open(&accounts_path).with_context(|| format!("opening {accounts_path}"))?;
    let seeds = read_accounts(accounts_file)
        .with_context(|| format!("reading account seeds from {accounts_path}"))?;
    let mut store = InMemoryAccountStore::seeded(seeds);

    let readings_file =
        File::open(&readings_path).with_context(|| format!("opening {readings_path}"))?;
    let totals = ingest(readings_file, &mut store, handle_row_error);

    println!("{totals}");
    Ok(())
}

fn get_paths() -> Result<(String, String)> {
    let mut args = env::args().skip(1);
    match (args.next(), args.next()) {
        (Some(accounts), Some(readings)) => Ok((accounts, readings)),
        _ => Err(anyhow::anyhow!(
            "Usage: meter-ingest-rs <accounts.csv> <readings.csv>"
        )),
    }
}

// Just logs rejected rows here; swap in dead-lettering or retries as needed.
fn handle_row_error(error: meter_ingest_rs::Error) {
    tracing::warn!("{error}")
}
