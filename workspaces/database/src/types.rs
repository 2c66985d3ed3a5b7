use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::Text;
use std::fmt;

// KeywordType //

/// How a keyword was attached to a wine in `keywords_wine`.
///
/// The ingestion side writes free text, so unknown values are kept as-is
/// instead of failing the whole row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, FromSqlRow, AsExpression)]
#[diesel(sql_type = Text)]
pub enum KeywordType {
    Primary,
    Secondary,
    Other(String),
}

impl KeywordType {
    pub fn as_str(&self) -> &str {
        match self {
            KeywordType::Primary => "primary",
            KeywordType::Secondary => "secondary",
            KeywordType::Other(value) => value,
        }
    }
}

impl From<String> for KeywordType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "primary" => KeywordType::Primary,
            "secondary" => KeywordType::Secondary,
            _ => KeywordType::Other(value),
        }
    }
}

impl fmt::Display for KeywordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<DB> FromSql<Text, DB> for KeywordType
where
    DB: Backend,
    String: FromSql<Text, DB>,
{
    fn from_sql(bytes: DB::RawValue<'_>) -> deserialize::Result<Self> {
        Ok(KeywordType::from(String::from_sql(bytes)?))
    }
}

impl<DB> ToSql<Text, DB> for KeywordType
where
    DB: Backend,
    str: ToSql<Text, DB>,
{
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, DB>) -> serialize::Result {
        self.as_str().to_sql(out)
    }
}
