//! Idempotent creation and verification of the catalog tables.
//!
//! Tables are created with `CREATE TABLE IF NOT EXISTS`, so a store that
//! already holds them is left untouched. After creation every table is read
//! back through `pragma_table_info` and compared with [`TABLES`]; a table with
//! a different shape is reported, never altered.

use crate::error::{DatabaseError, DatabaseResult};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Text;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [(&'static str, &'static str)],
    pub constraints: &'static [&'static str],
}

/// Catalog tables in dependency order (referenced tables first).
pub const TABLES: &[TableDef] = &[
    TableDef {
        name: "countries",
        columns: &[
            ("code", "VARCHAR NOT NULL"),
            ("name", "VARCHAR"),
            ("regions_count", "INTEGER"),
            ("users_count", "INTEGER"),
            ("wines_count", "INTEGER"),
            ("wineries_count", "INTEGER"),
        ],
        constraints: &["PRIMARY KEY (code)"],
    },
    TableDef {
        name: "regions",
        columns: &[
            ("id", "INTEGER NOT NULL"),
            ("name", "VARCHAR"),
            ("country_code", "VARCHAR"),
        ],
        constraints: &[
            "PRIMARY KEY (id)",
            "FOREIGN KEY(country_code) REFERENCES countries (code)",
        ],
    },
    TableDef {
        name: "wineries",
        columns: &[("id", "INTEGER NOT NULL"), ("name", "VARCHAR")],
        constraints: &["PRIMARY KEY (id)"],
    },
    TableDef {
        name: "wines",
        columns: &[
            ("id", "INTEGER NOT NULL"),
            ("name", "VARCHAR"),
            ("is_natural", "BOOLEAN"),
            ("region_id", "INTEGER"),
            ("winery_id", "INTEGER"),
            ("ratings_average", "FLOAT"),
            ("ratings_count", "INTEGER"),
            ("url", "VARCHAR"),
            ("acidity", "FLOAT"),
            ("fizziness", "FLOAT"),
            ("intensity", "FLOAT"),
            ("sweetness", "FLOAT"),
            ("tannin", "FLOAT"),
            ("user_structure_count", "INTEGER"),
        ],
        constraints: &[
            "PRIMARY KEY (id)",
            "FOREIGN KEY(region_id) REFERENCES regions (id)",
            "FOREIGN KEY(winery_id) REFERENCES wineries (id)",
        ],
    },
    TableDef {
        name: "vintages",
        columns: &[
            ("id", "INTEGER NOT NULL"),
            ("name", "VARCHAR"),
            ("wine_id", "INTEGER"),
            ("ratings_average", "FLOAT"),
            ("ratings_count", "INTEGER"),
            ("year", "INTEGER"),
            ("price_euros", "FLOAT"),
            ("price_discounted_from", "FLOAT"),
            ("price_discount_percentage", "FLOAT"),
            ("bottle_volume_ml", "INTEGER"),
        ],
        constraints: &[
            "PRIMARY KEY (id)",
            "FOREIGN KEY(wine_id) REFERENCES wines (id)",
        ],
    },
    TableDef {
        name: "grapes",
        columns: &[
            ("id", "INTEGER NOT NULL"),
            ("name", "VARCHAR"),
            ("wines_count", "INTEGER"),
        ],
        constraints: &["PRIMARY KEY (id)"],
    },
    TableDef {
        name: "toplists",
        columns: &[
            ("id", "INTEGER NOT NULL"),
            ("name", "VARCHAR"),
            ("country_code", "VARCHAR"),
        ],
        constraints: &[
            "PRIMARY KEY (id)",
            "FOREIGN KEY(country_code) REFERENCES countries (code)",
        ],
    },
    TableDef {
        name: "vintage_toplists_rankings",
        columns: &[
            ("id", "INTEGER NOT NULL"),
            ("top_list_id", "INTEGER"),
            ("vintage_id", "INTEGER"),
            ("rank", "INTEGER"),
            ("previous_rank", "INTEGER"),
        ],
        constraints: &[
            "PRIMARY KEY (id)",
            "FOREIGN KEY(top_list_id) REFERENCES toplists (id)",
            "FOREIGN KEY(vintage_id) REFERENCES vintages (id) ON DELETE CASCADE",
        ],
    },
    TableDef {
        name: "most_used_grapes_per_country",
        columns: &[
            ("id", "INTEGER NOT NULL"),
            ("country_code", "VARCHAR"),
            ("grape_id", "INTEGER"),
        ],
        constraints: &[
            "PRIMARY KEY (id)",
            "FOREIGN KEY(country_code) REFERENCES countries (code)",
            "FOREIGN KEY(grape_id) REFERENCES grapes (id)",
        ],
    },
    TableDef {
        name: "keywords",
        columns: &[("id", "INTEGER NOT NULL"), ("name", "VARCHAR")],
        constraints: &["PRIMARY KEY (id)"],
    },
    TableDef {
        name: "keywords_wine",
        columns: &[
            ("id", "INTEGER NOT NULL"),
            ("keyword_type", "VARCHAR"),
            ("count", "INTEGER"),
            ("keyword_id", "INTEGER"),
            ("wine_id", "INTEGER"),
            ("group_name", "VARCHAR"),
        ],
        constraints: &[
            "PRIMARY KEY (id)",
            "FOREIGN KEY(keyword_id) REFERENCES keywords (id)",
            "FOREIGN KEY(wine_id) REFERENCES wines (id)",
        ],
    },
];

/// Index backing the cleanup filter on large stores.
pub const RATINGS_COUNT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS ix_vintages_ratings_count ON vintages (ratings_count)";

impl TableDef {
    pub fn create_statement(&self) -> String {
        let body = self
            .columns
            .iter()
            .map(|(name, decl)| format!("\t{name} {decl}"))
            .chain(self.constraints.iter().map(|c| format!("\t{c}")))
            .collect::<Vec<_>>()
            .join(",\n");

        format!("CREATE TABLE IF NOT EXISTS {} (\n{}\n)", self.name, body)
    }
}

/// SQLite column affinity, derived from a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affinity {
    Integer,
    Text,
    Blob,
    Real,
    Numeric,
}

impl Affinity {
    /// Same rules SQLite applies, in the same order.
    pub fn of(declared: &str) -> Self {
        let declared = declared.to_ascii_uppercase();

        if declared.contains("INT") {
            Affinity::Integer
        } else if ["CHAR", "CLOB", "TEXT"].iter().any(|t| declared.contains(t)) {
            Affinity::Text
        } else if declared.is_empty() || declared.contains("BLOB") {
            Affinity::Blob
        } else if ["REAL", "FLOA", "DOUB"].iter().any(|t| declared.contains(t)) {
            Affinity::Real
        } else {
            Affinity::Numeric
        }
    }
}

#[derive(QueryableByName)]
struct ColumnInfo {
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Text, column_name = "type")]
    declared_type: String,
}

#[derive(QueryableByName)]
struct TableCount {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    count: i64,
}

fn table_exists(conn: &mut SqliteConnection, name: &str) -> DatabaseResult<bool> {
    let found = sql_query(
        "SELECT COUNT(*) AS count FROM sqlite_master WHERE type = 'table' AND name = ?",
    )
    .bind::<Text, _>(name)
    .get_result::<TableCount>(conn)?;
    Ok(found.count > 0)
}

/// Create the missing catalog tables and check the existing ones.
///
/// Creation and verification run in one transaction. On a conflict, tables
/// created by this call are rolled back as well. Tables that already exist
/// are left exactly as they are, indexes included: the ratings index is only
/// added together with a freshly created `vintages` table.
#[instrument(skip(conn))]
pub fn ensure_schema(conn: &mut SqliteConnection) -> DatabaseResult<()> {
    conn.transaction::<_, DatabaseError, _>(|conn| {
        let had_vintages = table_exists(conn, "vintages")?;

        for table in TABLES {
            conn.batch_execute(&table.create_statement())?;
        }
        verify_schema(conn)?;

        if had_vintages {
            debug!("vintages already present, leaving its indexes untouched");
        } else {
            conn.batch_execute(RATINGS_COUNT_INDEX)?;
        }
        Ok(())
    })?;

    info!(tables = TABLES.len(), "catalog schema ensured");
    Ok(())
}

/// Check every catalog table without creating anything.
#[instrument(skip(conn))]
pub fn verify_schema(conn: &mut SqliteConnection) -> DatabaseResult<()> {
    for table in TABLES {
        verify_table(conn, table)?;
    }

    Ok(())
}

fn verify_table(conn: &mut SqliteConnection, table: &TableDef) -> DatabaseResult<()> {
    let found = sql_query("SELECT name, type FROM pragma_table_info(?)")
        .bind::<Text, _>(table.name)
        .load::<ColumnInfo>(conn)?;

    if found.is_empty() {
        return Err(DatabaseError::MissingTable(table.name.to_string()));
    }

    let conflict = |reason: String| DatabaseError::SchemaConflict {
        table: table.name.to_string(),
        reason,
    };

    let mut found: HashMap<String, String> = found
        .into_iter()
        .map(|c| (c.name, c.declared_type))
        .collect();

    for (column, decl) in table.columns {
        let Some(actual) = found.remove(*column) else {
            return Err(conflict(format!("missing column {column}")));
        };

        let expected = Affinity::of(decl);
        if Affinity::of(&actual) != expected {
            return Err(conflict(format!(
                "column {column} is declared {actual}, expected {expected:?} affinity"
            )));
        }
    }

    if let Some(extra) = found.keys().min() {
        return Err(conflict(format!("unexpected column {extra}")));
    }

    debug!(table = table.name, "table matches");
    Ok(())
}

#[derive(QueryableByName, Debug, PartialEq)]
pub struct SchemaObject {
    #[diesel(sql_type = Text, column_name = "type")]
    pub kind: String,
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = diesel::sql_types::Nullable<Text>)]
    pub sql: Option<String>,
}

/// Every table and index recorded in `sqlite_master`, ordered by name.
pub fn get_schema_objects(conn: &mut SqliteConnection) -> DatabaseResult<Vec<SchemaObject>> {
    let objects = sql_query("SELECT type, name, sql FROM sqlite_master ORDER BY name")
        .load::<SchemaObject>(conn)?;
    Ok(objects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::open_connection;

    fn memory() -> SqliteConnection {
        open_connection(":memory:").unwrap()
    }

    #[test]
    fn test_affinity() {
        assert_eq!(Affinity::of("INTEGER NOT NULL"), Affinity::Integer);
        assert_eq!(Affinity::of("BIGINT"), Affinity::Integer);
        assert_eq!(Affinity::of("VARCHAR"), Affinity::Text);
        assert_eq!(Affinity::of("varchar(255)"), Affinity::Text);
        assert_eq!(Affinity::of("FLOAT"), Affinity::Real);
        assert_eq!(Affinity::of("DOUBLE"), Affinity::Real);
        assert_eq!(Affinity::of("BOOLEAN"), Affinity::Numeric);
        assert_eq!(Affinity::of(""), Affinity::Blob);
    }

    #[test]
    fn test_create_statement() {
        let sql = TABLES[2].create_statement();
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS wineries (\n\tid INTEGER NOT NULL,\n\tname VARCHAR,\n\tPRIMARY KEY (id)\n)"
        );
    }

    #[test]
    fn test_ensure_schema_creates_all_tables() {
        let mut conn = memory();
        ensure_schema(&mut conn).unwrap();

        let tables = get_schema_objects(&mut conn)
            .unwrap()
            .into_iter()
            .filter(|o| o.kind == "table")
            .count();
        assert_eq!(tables, TABLES.len());
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let mut conn = memory();
        ensure_schema(&mut conn).unwrap();
        let before = get_schema_objects(&mut conn).unwrap();

        ensure_schema(&mut conn).unwrap();
        let after = get_schema_objects(&mut conn).unwrap();

        assert_eq!(before, after);
    }

    /// Tables as the ingestion process lays them out: no cascade on
    /// rankings and no ratings index.
    const INGESTED_LAYOUT: &str = "
        CREATE TABLE countries (code VARCHAR NOT NULL, name VARCHAR, regions_count INTEGER, users_count INTEGER, wines_count INTEGER, wineries_count INTEGER, PRIMARY KEY (code));
        CREATE TABLE regions (id INTEGER NOT NULL, name VARCHAR, country_code VARCHAR, PRIMARY KEY (id), FOREIGN KEY(country_code) REFERENCES countries (code));
        CREATE TABLE wineries (id INTEGER NOT NULL, name VARCHAR, PRIMARY KEY (id));
        CREATE TABLE wines (id INTEGER NOT NULL, name VARCHAR, is_natural BOOLEAN, region_id INTEGER, winery_id INTEGER, ratings_average FLOAT, ratings_count INTEGER, url VARCHAR, acidity FLOAT, fizziness FLOAT, intensity FLOAT, sweetness FLOAT, tannin FLOAT, user_structure_count INTEGER, PRIMARY KEY (id), FOREIGN KEY(region_id) REFERENCES regions (id), FOREIGN KEY(winery_id) REFERENCES wineries (id));
        CREATE TABLE vintages (id INTEGER NOT NULL, name VARCHAR, wine_id INTEGER, ratings_average FLOAT, ratings_count INTEGER, year INTEGER, price_euros FLOAT, price_discounted_from FLOAT, price_discount_percentage FLOAT, bottle_volume_ml INTEGER, PRIMARY KEY (id), FOREIGN KEY(wine_id) REFERENCES wines (id));
        CREATE TABLE grapes (id INTEGER NOT NULL, name VARCHAR, wines_count INTEGER, PRIMARY KEY (id));
        CREATE TABLE toplists (id INTEGER NOT NULL, name VARCHAR, country_code VARCHAR, PRIMARY KEY (id), FOREIGN KEY(country_code) REFERENCES countries (code));
        CREATE TABLE vintage_toplists_rankings (id INTEGER NOT NULL, top_list_id INTEGER, vintage_id INTEGER, rank INTEGER, previous_rank INTEGER, PRIMARY KEY (id), FOREIGN KEY(top_list_id) REFERENCES toplists (id), FOREIGN KEY(vintage_id) REFERENCES vintages (id));
        CREATE TABLE most_used_grapes_per_country (id INTEGER NOT NULL, country_code VARCHAR, grape_id INTEGER, PRIMARY KEY (id), FOREIGN KEY(country_code) REFERENCES countries (code), FOREIGN KEY(grape_id) REFERENCES grapes (id));
        CREATE TABLE keywords (id INTEGER NOT NULL, name VARCHAR, PRIMARY KEY (id));
        CREATE TABLE keywords_wine (id INTEGER NOT NULL, keyword_type VARCHAR, count INTEGER, keyword_id INTEGER, wine_id INTEGER, group_name VARCHAR, PRIMARY KEY (id), FOREIGN KEY(keyword_id) REFERENCES keywords (id), FOREIGN KEY(wine_id) REFERENCES wines (id));
    ";

    #[test]
    fn test_ensure_schema_leaves_ingested_store_unchanged() {
        let mut conn = memory();
        conn.batch_execute(INGESTED_LAYOUT).unwrap();
        let before = get_schema_objects(&mut conn).unwrap();

        ensure_schema(&mut conn).unwrap();

        assert_eq!(get_schema_objects(&mut conn).unwrap(), before);
        assert!(before.iter().all(|o| o.name != "ix_vintages_ratings_count"));
    }

    #[test]
    fn test_fresh_store_gets_ratings_index() {
        let mut conn = memory();
        ensure_schema(&mut conn).unwrap();

        let objects = get_schema_objects(&mut conn).unwrap();
        assert!(objects
            .iter()
            .any(|o| o.kind == "index" && o.name == "ix_vintages_ratings_count"));
    }

    #[test]
    fn test_verify_schema_reports_missing_table() {
        let mut conn = memory();
        match verify_schema(&mut conn) {
            Err(DatabaseError::MissingTable(table)) => assert_eq!(table, "countries"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_conflicting_table_is_not_altered() {
        let mut conn = memory();
        conn.batch_execute("CREATE TABLE vintages (id INTEGER PRIMARY KEY, label TEXT)")
            .unwrap();

        match ensure_schema(&mut conn) {
            Err(DatabaseError::SchemaConflict { table, reason }) => {
                assert_eq!(table, "vintages");
                assert_eq!(reason, "missing column name");
            }
            other => panic!("unexpected result: {other:?}"),
        }

        // Rolled back: only the pre-existing table is left, with its own shape.
        let objects = get_schema_objects(&mut conn).unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].name, "vintages");
        assert_eq!(
            objects[0].sql.as_deref(),
            Some("CREATE TABLE vintages (id INTEGER PRIMARY KEY, label TEXT)")
        );
    }

    #[test]
    fn test_wrong_affinity_is_a_conflict() {
        let mut conn = memory();
        conn.batch_execute("CREATE TABLE keywords (id INTEGER NOT NULL, name BLOB, PRIMARY KEY (id))")
            .unwrap();

        match ensure_schema(&mut conn) {
            Err(DatabaseError::SchemaConflict { table, reason }) => {
                assert_eq!(table, "keywords");
                assert_eq!(
                    reason,
                    "column name is declared BLOB, expected Text affinity"
                );
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_extra_column_is_a_conflict() {
        let mut conn = memory();
        conn.batch_execute(
            "CREATE TABLE wineries (id INTEGER NOT NULL, name VARCHAR, founded INTEGER, PRIMARY KEY (id))",
        )
        .unwrap();

        match ensure_schema(&mut conn) {
            Err(DatabaseError::SchemaConflict { table, reason }) => {
                assert_eq!(table, "wineries");
                assert_eq!(reason, "unexpected column founded");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
