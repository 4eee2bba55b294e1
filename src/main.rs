use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use folio_recon::journal::SqliteTradeJournal;
use folio_recon::orchestration::{HoldingSyncer, SyncReport};
use folio_recon::sink::SqliteHoldingSink;
use folio_recon::{config::Config, db::init_db, export, Repository};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env().context("loading configuration")?;

    let pool = init_db(&config.database_path)
        .await
        .with_context(|| format!("initializing database at {}", config.database_path))?;
    let repo = Arc::new(Repository::new(pool));

    let journal = Arc::new(SqliteTradeJournal::new(
        repo.clone(),
        config.journal_page_size,
    ));
    let sink = Arc::new(SqliteHoldingSink::new(repo));
    let syncer = HoldingSyncer::new(journal, sink);

    if config.sync_accounts.is_empty() {
        tracing::warn!("no accounts configured, nothing to sync");
        return Ok(());
    }

    let reports = syncer
        .sync_accounts(&config.sync_accounts)
        .await
        .context("syncing holdings")?;

    for report in &reports {
        tracing::info!(
            account_id = %report.account_id,
            run_id = %report.run_id,
            trades_replayed = report.trades_replayed,
            holdings_written = report.holdings_written,
            "account synced"
        );
    }

    if let Some(export_dir) = &config.export_dir {
        export_reports(export_dir, &reports)?;
    }

    Ok(())
}

fn export_reports(export_dir: &str, reports: &[SyncReport]) -> anyhow::Result<()> {
    std::fs::create_dir_all(export_dir)
        .with_context(|| format!("creating export directory {}", export_dir))?;

    for report in reports {
        let path = Path::new(export_dir).join(format!("holdings-{}.csv", report.account_id));
        let file = File::create(&path)
            .with_context(|| format!("creating export file {}", path.display()))?;
        export::write_holdings_csv(file, &report.positions)
            .with_context(|| format!("writing holdings for account {}", report.account_id))?;
        tracing::info!(account_id = %report.account_id, path = %path.display(), "holdings exported");
    }

    Ok(())
}
