use anyhow::Result;
use rusqlite::{Connection, Row};

use super::OptionalExt;
use crate::Database;
use crate::models::{NewUser, UserChanges, UserRow};
use crate::sql::Changeset;

const USER_COLUMNS: &str = "id, username, email, password, avatar, created_at, updated_at";

impl Database {
    /// Insert a user and return the stored row. Duplicate usernames or
    /// emails fail on the UNIQUE constraints.
    pub fn create_user(&self, new: &NewUser) -> Result<UserRow> {
        self.with_conn(|conn| {
            let row = conn.query_row(
                &format!(
                    "INSERT INTO users (username, email, password, avatar) VALUES (?1, ?2, ?3, ?4) RETURNING {}",
                    USER_COLUMNS
                ),
                rusqlite::params![new.username, new.email, new.password, new.avatar],
                map_user,
            )?;
            Ok(row)
        })
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by(conn, "id", &id))
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by(conn, "email", &email))
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by(conn, "username", &username))
    }

    /// Users in insertion order.
    pub fn list_users(&self, limit: u32, offset: u32) -> Result<Vec<UserRow>> {
        self.query_rows(
            &format!("SELECT {} FROM users ORDER BY id LIMIT ?1 OFFSET ?2", USER_COLUMNS),
            vec![i64::from(limit).into(), i64::from(offset).into()],
            map_user,
        )
    }

    pub fn update_user(&self, id: i64, changes: UserChanges) -> Result<Option<UserRow>> {
        let mut set = Changeset::new("users");
        set.set_if("username", changes.username)
            .set_if("email", changes.email)
            .set_if("password", changes.password)
            .set_nullable("avatar", changes.avatar);
        self.update_returning(set, id, USER_COLUMNS, map_user)
    }

    /// Removes the user together with everything they authored, requested,
    /// answered or annotated (cascade).
    pub fn delete_user(&self, id: i64) -> bool {
        self.delete_row("users", id)
    }

    pub fn count_users(&self) -> Result<i64> {
        self.count_rows("users")
    }
}

fn query_user_by(
    conn: &Connection,
    column: &str,
    value: &dyn rusqlite::ToSql,
) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM users WHERE {} = ?1",
        USER_COLUMNS, column
    ))?;

    stmt.query_row([value], map_user).optional()
}

fn map_user(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        avatar: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
