use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Cannot connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: diesel::ConnectionError,
    },

    #[error("Query failed: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("Table {table} conflicts with the catalog schema: {reason}")]
    SchemaConflict { table: String, reason: String },

    #[error("Table {0} is missing")]
    MissingTable(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_conflict_display() {
        let err = DatabaseError::SchemaConflict {
            table: "vintages".to_string(),
            reason: "missing column year".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Table vintages conflicts with the catalog schema: missing column year"
        );
    }

    #[test]
    fn test_missing_table_display() {
        let err = DatabaseError::MissingTable("grapes".to_string());
        assert_eq!(err.to_string(), "Table grapes is missing");
    }
}
