use anyhow::{Context, Result};
use clap::Parser;
use cleaner::{Cleaner, CleanupOptions, CleanupReport, DEFAULT_MIN_RATINGS};
use database::{
    ensure_schema, get_database_size, get_table_row_counts, open_connection, verify_schema,
    DEFAULT_DATABASE_URL,
};
use diesel::sqlite::SqliteConnection;
use dotenvy::dotenv;
use std::process::ExitCode;
use tracing::info;
use utils::{init_tracing, DEFAULT_LOG_FILTER};

#[derive(Parser, Debug)]
#[command(name = "vintner")]
#[command(version, about = "Removes poorly rated vintages from the wine catalog", long_about = None)]
struct Cli {
    /// Path of the SQLite catalog store
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    database_url: String,

    /// Vintages with fewer ratings than this are removed
    #[arg(
        long,
        env = "MIN_RATINGS",
        default_value_t = DEFAULT_MIN_RATINGS,
        value_parser = clap::value_parser!(i32).range(0..)
    )]
    min_ratings: i32,

    /// Only count what would be removed, and check the schema without creating it
    #[arg(long, env = "DRY_RUN")]
    dry_run: bool,

    /// Log row counts and store size before and after the pass
    #[arg(long)]
    stats: bool,
}

fn main() -> ExitCode {
    dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = init_tracing(DEFAULT_LOG_FILTER) {
        eprintln!("{e}");
    }

    let version = env!("CARGO_PKG_VERSION");
    info!("Vintner v{version}");

    match run(&cli) {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("\nError: {e:#}\n");
            ExitCode::FAILURE
        }
    }
}

/// connect -> schema -> delete -> commit. The connection is dropped on every
/// return path.
fn run(cli: &Cli) -> Result<CleanupReport> {
    let mut conn = open_connection(&cli.database_url).context("connect phase failed")?;

    let schema = if cli.dry_run {
        verify_schema(&mut conn)
    } else {
        ensure_schema(&mut conn)
    };
    schema.context("schema phase failed")?;

    if cli.stats {
        log_stats(&mut conn, "before cleanup")?;
    }

    let cleaner = Cleaner::new(CleanupOptions {
        min_ratings: cli.min_ratings,
        dry_run: cli.dry_run,
    });
    let report = cleaner.run(&mut conn)?;

    if cli.stats && !report.dry_run {
        log_stats(&mut conn, "after cleanup")?;
    }

    Ok(report)
}

fn log_stats(conn: &mut SqliteConnection, when: &str) -> Result<()> {
    let counts = get_table_row_counts(conn)
        .context("stats phase failed: cannot read table row counts")?;
    for count in counts {
        info!(table = %count.table_name, rows = count.row_count, "{when}");
    }

    let size =
        get_database_size(conn).context("stats phase failed: cannot read the store size")?;
    info!(bytes = size, "{when}");
    Ok(())
}

fn print_report(report: &CleanupReport) {
    if report.dry_run {
        println!(
            "Would remove {} vintages and {} top-list rankings (dry run)",
            report.vintages_removed, report.rankings_removed
        );
    } else {
        println!(
            "Removed {} vintages and {} top-list rankings",
            report.vintages_removed, report.rankings_removed
        );
    }
}
