//! One service module per entity. Every operation is a single statement.

mod comments;
mod messages;
mod metadata;
mod pingpongs;
mod posts;
mod users;

use std::str::FromStr;

use anyhow::Result;
use pingpong_types::models::UnknownVariant;
use rusqlite::types::{Type, Value};
use rusqlite::{Row, params_from_iter};
use tracing::warn;

use crate::Database;
use crate::sql::Changeset;

impl Database {
    /// Delete one row by id. Storage errors are logged and reported as `false`;
    /// `true` means a row was actually removed.
    fn delete_row(&self, table: &'static str, id: i64) -> bool {
        let sql = format!("DELETE FROM {} WHERE id = ?1", table);
        match self.with_conn(|conn| Ok(conn.execute(&sql, [id])?)) {
            Ok(removed) => removed > 0,
            Err(e) => {
                warn!("Failed to delete {} row {}: {}", table, id, e);
                false
            }
        }
    }

    fn count_rows(&self, table: &'static str) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        self.with_conn(|conn| Ok(conn.query_row(&sql, [], |row| row.get(0))?))
    }

    fn update_returning<T, F>(
        &self,
        changes: Changeset,
        id: i64,
        columns: &str,
        map: F,
    ) -> Result<Option<T>>
    where
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        let (sql, values) = changes.into_statement(id, columns);
        self.with_conn(|conn| conn.query_row(&sql, params_from_iter(values.iter()), map).optional())
    }

    fn query_rows<T, F>(&self, sql: &str, values: Vec<Value>, map: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt
                .query_map(params_from_iter(values.iter()), map)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

/// Read a text column holding one of a closed set of values.
fn enum_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = UnknownVariant>,
{
    let text: String = row.get(idx)?;
    text.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn optional_enum_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr<Err = UnknownVariant>,
{
    match row.get::<_, Option<String>>(idx)? {
        Some(text) => text
            .parse()
            .map(Some)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
        None => Ok(None),
    }
}

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
