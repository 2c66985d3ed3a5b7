use crate::error::CleanupError;
use database::schema::{vintage_toplists_rankings, vintages};
use diesel::dsl;
use diesel::prelude::*;
use tracing::{info, instrument};

/// Vintages with fewer ratings than this are removed by default.
pub const DEFAULT_MIN_RATINGS: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupOptions {
    pub min_ratings: i32,
    /// Count what would be removed without writing anything.
    pub dry_run: bool,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            min_ratings: DEFAULT_MIN_RATINGS,
            dry_run: false,
        }
    }
}

/// Outcome of a cleanup pass. In a dry run the counts are what would have
/// been removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CleanupReport {
    pub vintages_removed: usize,
    pub rankings_removed: usize,
    pub dry_run: bool,
}

type BelowThreshold = dsl::And<
    dsl::IsNotNull<vintages::ratings_count>,
    dsl::Lt<vintages::ratings_count, i32>,
>;

/// Vintages whose rating count is known and below `min_ratings`.
/// A null rating count never matches.
fn below_threshold(min_ratings: i32) -> BelowThreshold {
    vintages::ratings_count
        .is_not_null()
        .and(vintages::ratings_count.lt(min_ratings))
}

pub struct Cleaner {
    options: CleanupOptions,
}

impl Cleaner {
    pub fn new(options: CleanupOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> CleanupOptions {
        self.options
    }

    /// Remove every vintage below the rating threshold, with its top-list
    /// rankings, in a single transaction.
    pub fn run(&self, conn: &mut SqliteConnection) -> Result<CleanupReport, CleanupError> {
        self.run_with_commit_check(conn, |_, _| Ok(()))
    }

    /// Same as [`Cleaner::run`], but `check` is called after the deletes and
    /// before the commit. An error from `check` rolls the whole pass back.
    #[instrument(skip(self, conn, check), fields(min_ratings = self.options.min_ratings))]
    pub fn run_with_commit_check<F>(
        &self,
        conn: &mut SqliteConnection,
        check: F,
    ) -> Result<CleanupReport, CleanupError>
    where
        F: FnOnce(&mut SqliteConnection, &CleanupReport) -> Result<(), String>,
    {
        if self.options.dry_run {
            let report = self.preview(conn).map_err(CleanupError::Delete)?;
            info!(
                vintages = report.vintages_removed,
                rankings = report.rankings_removed,
                "dry run, nothing removed"
            );
            return Ok(report);
        }

        let report = conn.transaction::<_, CleanupError, _>(|conn| {
            let report = self.delete(conn).map_err(CleanupError::Delete)?;
            check(conn, &report).map_err(CleanupError::Aborted)?;
            Ok(report)
        })?;

        info!(
            vintages = report.vintages_removed,
            rankings = report.rankings_removed,
            "cleanup committed"
        );
        Ok(report)
    }

    fn preview(&self, conn: &mut SqliteConnection) -> QueryResult<CleanupReport> {
        let doomed = vintages::table
            .filter(below_threshold(self.options.min_ratings))
            .select(vintages::id.nullable());

        let vintages_removed: i64 = vintages::table
            .filter(below_threshold(self.options.min_ratings))
            .count()
            .get_result(conn)?;
        let rankings_removed: i64 = vintage_toplists_rankings::table
            .filter(vintage_toplists_rankings::vintage_id.eq_any(doomed))
            .count()
            .get_result(conn)?;

        Ok(CleanupReport {
            vintages_removed: vintages_removed as usize,
            rankings_removed: rankings_removed as usize,
            dry_run: true,
        })
    }

    fn delete(&self, conn: &mut SqliteConnection) -> QueryResult<CleanupReport> {
        let doomed = vintages::table
            .filter(below_threshold(self.options.min_ratings))
            .select(vintages::id.nullable());

        // Rankings go first so stores created without ON DELETE CASCADE
        // never hold a dangling vintage_id.
        let rankings_removed = diesel::delete(
            vintage_toplists_rankings::table
                .filter(vintage_toplists_rankings::vintage_id.eq_any(doomed)),
        )
        .execute(conn)?;

        let vintages_removed =
            diesel::delete(vintages::table.filter(below_threshold(self.options.min_ratings)))
                .execute(conn)?;

        Ok(CleanupReport {
            vintages_removed,
            rankings_removed,
            dry_run: false,
        })
    }
}
