//! `sync` and `runs` command handlers.
//!
//! A non-dry sync is recorded in `sync_runs`: the row is opened before the
//! first fetch and closed with the cycle's counters, succeeded or failed.

use std::io::Write;

use anyhow::Context as _;
use catmirror_core::{AppConfig, Environment};
use catmirror_db::{DbError, MemoryCatalogStore, PgCatalogStore};
use catmirror_pipeline::{CatalogSyncJob, SyncReport};

pub(crate) async fn run_sync(config: &AppConfig, dry_run: bool, json: bool) -> anyhow::Result<()> {
    let client = crate::build_client(config)?;

    let (report, recorded) = if dry_run {
        let store = MemoryCatalogStore::new();
        let report = CatalogSyncJob::new(&client, &store).run().await;
        tracing::info!(
            categories = store.categories().len(),
            products = store.products().len(),
            "dry-run: nothing written to the database"
        );
        (report, Ok(()))
    } else {
        let pool = crate::connect(config).await?;
        let run = catmirror_db::start_sync_run(&pool, &trigger_source(&config.env)).await?;
        let store = PgCatalogStore::new(pool.clone());
        let report = CatalogSyncJob::new(&client, &store).run().await;

        let recorded = match &report.failure {
            None => catmirror_db::complete_sync_run(&pool, run.id, &report.counts).await,
            Some(failure) => {
                fail_run_best_effort(&pool, run.id, &report, &failure.message).await;
                Ok(())
            }
        };
        if let Err(err) = &recorded {
            tracing::error!(run_id = run.id, error = %err, "failed to record sync run");
        }
        (report, recorded)
    };

    conclude(&report, recorded, json, dry_run, &mut std::io::stdout().lock())
}

/// `sync_runs.trigger_source` for a CLI-started run.
pub(crate) fn trigger_source(env: &Environment) -> String {
    format!("cli:{env}")
}

/// Prints the report, then surfaces the sync failure or a failure to record
/// the run. The report is printed in every case.
pub(crate) fn conclude(
    report: &SyncReport,
    recorded: Result<(), DbError>,
    json: bool,
    dry_run: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
    } else {
        print_report(report, dry_run, out)?;
    }

    if let Some(failure) = &report.failure {
        anyhow::bail!("sync failed at {} step: {}", failure.step, failure.message);
    }
    recorded.context("sync finished but the run could not be recorded")
}

pub(crate) async fn run_list_runs(config: &AppConfig, limit: i64) -> anyhow::Result<()> {
    let pool = crate::connect(config).await?;
    let runs = catmirror_db::list_sync_runs(&pool, limit.max(1)).await?;
    if runs.is_empty() {
        println!("no sync runs recorded");
        return Ok(());
    }

    for run in runs {
        let started = run.started_at.format("%Y-%m-%d %H:%M:%S");
        println!(
            "{started}  {:<9}  categories +{}/~{}/-{}  products +{}/~{}/-{}  write failures {}",
            run.status,
            run.categories_created,
            run.categories_updated,
            run.categories_skipped,
            run.products_created,
            run.products_updated,
            run.products_skipped,
            run.write_failures,
        );
        if let Some(message) = run.error_message {
            println!("    error: {message}");
        }
    }
    Ok(())
}

fn print_report(report: &SyncReport, dry_run: bool, out: &mut impl Write) -> std::io::Result<()> {
    let counts = &report.counts;
    let prefix = if dry_run { "dry-run: " } else { "" };
    writeln!(
        out,
        "{prefix}categories: {} created, {} updated, {} skipped",
        counts.categories_created, counts.categories_updated, counts.categories_skipped
    )?;
    writeln!(
        out,
        "{prefix}products: {} created, {} updated, {} skipped",
        counts.products_created, counts.products_updated, counts.products_skipped
    )?;
    writeln!(out, "{prefix}records written: {}", counts.records_written())?;
    if counts.write_failures > 0 {
        writeln!(out, "{prefix}write failures: {}", counts.write_failures)?;
    }
    for skipped in &report.skipped {
        writeln!(out, "  skipped {skipped}")?;
    }
    Ok(())
}

/// Attempt to mark a sync run as failed, logging any secondary error.
async fn fail_run_best_effort(pool: &sqlx::PgPool, run_id: i64, report: &SyncReport, message: &str) {
    if let Err(mark_err) = catmirror_db::fail_sync_run(pool, run_id, &report.counts, message).await {
        tracing::error!(run_id, error = %mark_err, "failed to mark sync run as failed");
    }
}
