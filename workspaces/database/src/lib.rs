use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sqlite::SqliteConnection;
use tracing::{debug, instrument};

pub mod ddl;
pub mod error;
pub mod models;
pub mod schema;
pub mod types;

pub use ddl::{ensure_schema, verify_schema};
pub use error::{DatabaseError, DatabaseResult};

pub const DEFAULT_DATABASE_URL: &str = "vivino.db";

/// Open the catalog store and turn on foreign-key enforcement.
///
/// The connection is closed when the returned value is dropped.
#[instrument]
pub fn open_connection(db_url: &str) -> DatabaseResult<SqliteConnection> {
    let mut conn =
        SqliteConnection::establish(db_url).map_err(|source| DatabaseError::Connect {
            url: db_url.to_string(),
            source,
        })?;

    conn.batch_execute("PRAGMA foreign_keys = ON")?;

    debug!("connected to the catalog store");
    Ok(conn)
}

#[derive(QueryableByName, Debug, PartialEq)]
pub struct TableRowCount {
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub table_name: String,
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub row_count: i64,
}

/// Row count of every catalog table, largest first.
pub fn get_table_row_counts(conn: &mut SqliteConnection) -> DatabaseResult<Vec<TableRowCount>> {
    let mut counts = Vec::with_capacity(ddl::TABLES.len());

    for table in ddl::TABLES {
        // Table names come from the static catalog, never from input.
        let count = sql_query(format!(
            "SELECT '{0}' AS table_name, COUNT(*) AS row_count FROM {0}",
            table.name
        ))
        .get_result::<TableRowCount>(conn)?;
        counts.push(count);
    }

    counts.sort_by(|a, b| {
        b.row_count
            .cmp(&a.row_count)
            .then(a.table_name.cmp(&b.table_name))
    });
    Ok(counts)
}

#[derive(QueryableByName)]
pub struct DbSize {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub size: i64,
}

/// Size of the store in bytes.
pub fn get_database_size(conn: &mut SqliteConnection) -> QueryResult<i64> {
    let result = sql_query(
        "SELECT page_count * page_size AS size FROM pragma_page_count(), pragma_page_size()",
    )
    .get_result::<DbSize>(conn)?;
    Ok(result.size)
}
