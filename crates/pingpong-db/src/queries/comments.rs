use anyhow::Result;
use rusqlite::Row;

use super::OptionalExt;
use crate::Database;
use crate::models::{CommentChanges, CommentRow, NewComment};
use crate::sql::{Changeset, Conditions};

const COMMENT_COLUMNS: &str = "id, content, post_id, author_id, created_at, updated_at";

impl Database {
    pub fn create_comment(&self, new: &NewComment) -> Result<CommentRow> {
        self.with_conn(|conn| {
            let row = conn.query_row(
                &format!(
                    "INSERT INTO comments (content, post_id, author_id) VALUES (?1, ?2, ?3) RETURNING {}",
                    COMMENT_COLUMNS
                ),
                rusqlite::params![new.content, new.post_id, new.author_id],
                map_comment,
            )?;
            Ok(row)
        })
    }

    pub fn get_comment_by_id(&self, id: i64) -> Result<Option<CommentRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {} FROM comments WHERE id = ?1", COMMENT_COLUMNS),
                [id],
                map_comment,
            )
            .optional()
        })
    }

    /// Newest first.
    pub fn list_comments_by_post(
        &self,
        post_id: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<CommentRow>> {
        let mut conds = Conditions::new();
        conds.eq("post_id", post_id);
        let (sql, values) = conds.select(
            "comments",
            COMMENT_COLUMNS,
            "created_at DESC, id DESC",
            limit,
            offset,
        );
        self.query_rows(&sql, values, map_comment)
    }

    /// Everything one user has written, newest first.
    pub fn list_comments_by_author(
        &self,
        author_id: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<CommentRow>> {
        let mut conds = Conditions::new();
        conds.eq("author_id", author_id);
        let (sql, values) = conds.select(
            "comments",
            COMMENT_COLUMNS,
            "created_at DESC, id DESC",
            limit,
            offset,
        );
        self.query_rows(&sql, values, map_comment)
    }

    pub fn update_comment(&self, id: i64, changes: CommentChanges) -> Result<Option<CommentRow>> {
        let mut set = Changeset::new("comments");
        set.set_if("content", changes.content);
        self.update_returning(set, id, COMMENT_COLUMNS, map_comment)
    }

    pub fn delete_comment(&self, id: i64) -> bool {
        self.delete_row("comments", id)
    }

    pub fn count_comments(&self) -> Result<i64> {
        self.count_rows("comments")
    }
}

fn map_comment(row: &Row<'_>) -> rusqlite::Result<CommentRow> {
    Ok(CommentRow {
        id: row.get(0)?,
        content: row.get(1)?,
        post_id: row.get(2)?,
        author_id: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::fixtures;

    fn comment(db: &Database, post_id: i64, author_id: i64, content: &str) -> CommentRow {
        db.create_comment(&NewComment {
            content: content.into(),
            post_id,
            author_id,
        })
        .unwrap()
    }

    #[test]
    fn comments_are_scoped_to_their_post() {
        let db = Database::open_in_memory().unwrap();
        let alice = fixtures::user(&db, "alice");
        let bob = fixtures::user(&db, "bob");
        let a = fixtures::post(&db, alice.id, "a");
        let b = fixtures::post(&db, alice.id, "b");

        let c1 = comment(&db, a.id, bob.id, "nice");
        let c2 = comment(&db, a.id, alice.id, "thanks");
        comment(&db, b.id, bob.id, "elsewhere");

        let on_a = db.list_comments_by_post(a.id, 50, 0).unwrap();
        assert_eq!(on_a.iter().map(|c| c.id).collect::<Vec<_>>(), vec![c2.id, c1.id]);
        assert_eq!(db.count_comments().unwrap(), 3);
    }

    #[test]
    fn comments_by_author_span_posts() {
        let db = Database::open_in_memory().unwrap();
        let alice = fixtures::user(&db, "alice");
        let bob = fixtures::user(&db, "bob");
        let a = fixtures::post(&db, alice.id, "a");
        let b = fixtures::post(&db, alice.id, "b");

        let first = comment(&db, a.id, bob.id, "first");
        comment(&db, a.id, alice.id, "reply");
        let second = comment(&db, b.id, bob.id, "second");

        let by_bob = db.list_comments_by_author(bob.id, 10, 0).unwrap();
        assert_eq!(
            by_bob.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![second.id, first.id]
        );
        assert_eq!(db.list_comments_by_author(bob.id, 1, 1).unwrap()[0].id, first.id);
        assert!(db.list_comments_by_author(9999, 10, 0).unwrap().is_empty());
    }

    #[test]
    fn update_and_delete() {
        let db = Database::open_in_memory().unwrap();
        let alice = fixtures::user(&db, "alice");
        let post = fixtures::post(&db, alice.id, "p");
        let c = comment(&db, post.id, alice.id, "typo");

        let fixed = db
            .update_comment(
                c.id,
                CommentChanges {
                    content: Some("fixed".into()),
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(fixed.content, "fixed");

        assert!(db.delete_comment(c.id));
        assert!(db.get_comment_by_id(c.id).unwrap().is_none());
    }

    #[test]
    fn deleting_post_or_author_cascades() {
        let db = Database::open_in_memory().unwrap();
        let alice = fixtures::user(&db, "alice");
        let bob = fixtures::user(&db, "bob");
        let post = fixtures::post(&db, alice.id, "p");
        let by_bob = comment(&db, post.id, bob.id, "hi");

        assert!(db.delete_user(bob.id));
        assert!(db.get_comment_by_id(by_bob.id).unwrap().is_none());

        let by_alice = comment(&db, post.id, alice.id, "still here");
        assert!(db.delete_post(post.id));
        assert!(db.get_comment_by_id(by_alice.id).unwrap().is_none());
    }
}
