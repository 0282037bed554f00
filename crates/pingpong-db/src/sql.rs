//! Small builders for the statements whose shape depends on the input:
//! partial updates and optionally-filtered listings.

use rusqlite::types::Value;

/// Collects `column = ?N` assignments for a single-row `UPDATE ... RETURNING`.
/// Every changeset also rewrites `updated_at`.
pub struct Changeset {
    table: &'static str,
    assignments: Vec<String>,
    values: Vec<Value>,
}

impl Changeset {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            assignments: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn set(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.values.push(value.into());
        self.assignments
            .push(format!("{} = ?{}", column, self.values.len()));
        self
    }

    pub fn set_if<V: Into<Value>>(&mut self, column: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.set(column, value);
        }
        self
    }

    /// `Some(None)` writes NULL; `None` leaves the column alone.
    pub fn set_nullable<V: Into<Value>>(
        &mut self,
        column: &str,
        value: Option<Option<V>>,
    ) -> &mut Self {
        if let Some(value) = value {
            self.set(column, value.map_or(Value::Null, Into::into));
        }
        self
    }

    /// Assign a raw SQL expression. Only ever called with literals.
    pub fn set_expr(&mut self, column: &str, expr: &'static str) -> &mut Self {
        self.assignments.push(format!("{} = {}", column, expr));
        self
    }

    pub fn into_statement(mut self, id: i64, returning: &str) -> (String, Vec<Value>) {
        self.assignments.push("updated_at = datetime('now')".to_string());
        self.values.push(Value::Integer(id));
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{} RETURNING {}",
            self.table,
            self.assignments.join(", "),
            self.values.len(),
            returning
        );
        (sql, self.values)
    }
}

/// `WHERE a = ?1 AND b = ?2` built from whichever filters are present.
#[derive(Default)]
pub struct Conditions {
    clauses: Vec<String>,
    values: Vec<Value>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.values.push(value.into());
        self.clauses.push(format!("{} = ?{}", column, self.values.len()));
        self
    }

    pub fn eq_if<V: Into<Value>>(&mut self, column: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.eq(column, value);
        }
        self
    }

    /// Paged `SELECT` over `table` honoring the collected conditions.
    pub fn select(
        mut self,
        table: &str,
        columns: &str,
        order_by: &str,
        limit: u32,
        offset: u32,
    ) -> (String, Vec<Value>) {
        let filter = if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        };
        self.values.push(Value::Integer(i64::from(limit)));
        self.values.push(Value::Integer(i64::from(offset)));
        let sql = format!(
            "SELECT {} FROM {}{} ORDER BY {} LIMIT ?{} OFFSET ?{}",
            columns,
            table,
            filter,
            order_by,
            self.values.len() - 1,
            self.values.len()
        );
        (sql, self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changeset_numbers_placeholders_and_stamps() {
        let mut changes = Changeset::new("users");
        changes
            .set("username", "bob".to_string())
            .set_if::<String>("email", None)
            .set_if("avatar", Some("a.png".to_string()));
        let (sql, values) = changes.into_statement(7, "id");

        assert_eq!(
            sql,
            "UPDATE users SET username = ?1, avatar = ?2, updated_at = datetime('now') WHERE id = ?3 RETURNING id"
        );
        assert_eq!(values.len(), 3);
        assert_eq!(values[2], Value::Integer(7));
    }

    #[test]
    fn nullable_assignment_binds_null() {
        let mut changes = Changeset::new("metadata");
        changes
            .set_nullable::<String>("value", Some(None))
            .set_nullable::<i64>("eta", None);
        let (sql, values) = changes.into_statement(2, "id");

        assert_eq!(
            sql,
            "UPDATE metadata SET value = ?1, updated_at = datetime('now') WHERE id = ?2 RETURNING id"
        );
        assert_eq!(values, vec![Value::Null, Value::Integer(2)]);
    }

    #[test]
    fn empty_changeset_only_stamps() {
        let (sql, values) = Changeset::new("posts").into_statement(1, "id");
        assert_eq!(
            sql,
            "UPDATE posts SET updated_at = datetime('now') WHERE id = ?1 RETURNING id"
        );
        assert_eq!(values, vec![Value::Integer(1)]);
    }

    #[test]
    fn conditions_without_filters() {
        let (sql, values) = Conditions::new().select("posts", "id", "id DESC", 10, 0);
        assert_eq!(sql, "SELECT id FROM posts ORDER BY id DESC LIMIT ?1 OFFSET ?2");
        assert_eq!(values, vec![Value::Integer(10), Value::Integer(0)]);
    }

    #[test]
    fn conditions_with_filters() {
        let mut conds = Conditions::new();
        conds.eq("author_id", 3i64).eq_if::<bool>("published", None).eq_if("published", Some(true));
        let (sql, values) = conds.select("posts", "id", "id DESC", 5, 10);
        assert_eq!(
            sql,
            "SELECT id FROM posts WHERE author_id = ?1 AND published = ?2 ORDER BY id DESC LIMIT ?3 OFFSET ?4"
        );
        assert_eq!(values.len(), 4);
    }
}
