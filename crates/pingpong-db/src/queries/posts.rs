use anyhow::Result;
use rusqlite::Row;

use super::OptionalExt;
use crate::Database;
use crate::models::{NewPost, PostChanges, PostFilter, PostRow};
use crate::sql::{Changeset, Conditions};

const POST_COLUMNS: &str = "id, title, content, author_id, published, created_at, updated_at";

impl Database {
    pub fn create_post(&self, new: &NewPost) -> Result<PostRow> {
        self.with_conn(|conn| {
            let row = conn.query_row(
                &format!(
                    "INSERT INTO posts (title, content, author_id, published) VALUES (?1, ?2, ?3, ?4) RETURNING {}",
                    POST_COLUMNS
                ),
                rusqlite::params![new.title, new.content, new.author_id, new.published],
                map_post,
            )?;
            Ok(row)
        })
    }

    pub fn get_post_by_id(&self, id: i64) -> Result<Option<PostRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {} FROM posts WHERE id = ?1", POST_COLUMNS),
                [id],
                map_post,
            )
            .optional()
        })
    }

    /// Newest first, optionally narrowed to one author and/or publication state.
    pub fn list_posts(&self, filter: PostFilter, limit: u32, offset: u32) -> Result<Vec<PostRow>> {
        let mut conds = Conditions::new();
        conds
            .eq_if("author_id", filter.author_id)
            .eq_if("published", filter.published);
        let (sql, values) = conds.select(
            "posts",
            POST_COLUMNS,
            "created_at DESC, id DESC",
            limit,
            offset,
        );
        self.query_rows(&sql, values, map_post)
    }

    pub fn update_post(&self, id: i64, changes: PostChanges) -> Result<Option<PostRow>> {
        let mut set = Changeset::new("posts");
        set.set_if("title", changes.title)
            .set_if("content", changes.content)
            .set_if("published", changes.published);
        self.update_returning(set, id, POST_COLUMNS, map_post)
    }

    pub fn publish_post(&self, id: i64) -> Result<Option<PostRow>> {
        self.update_post(
            id,
            PostChanges {
                published: Some(true),
                ..Default::default()
            },
        )
    }

    pub fn unpublish_post(&self, id: i64) -> Result<Option<PostRow>> {
        self.update_post(
            id,
            PostChanges {
                published: Some(false),
                ..Default::default()
            },
        )
    }

    pub fn delete_post(&self, id: i64) -> bool {
        self.delete_row("posts", id)
    }

    pub fn count_posts(&self) -> Result<i64> {
        self.count_rows("posts")
    }
}

fn map_post(row: &Row<'_>) -> rusqlite::Result<PostRow> {
    Ok(PostRow {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        author_id: row.get(3)?,
        published: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::fixtures;

    #[test]
    fn create_requires_existing_author() {
        let db = Database::open_in_memory().unwrap();
        let res = db.create_post(&NewPost {
            title: "orphan".into(),
            content: "no author".into(),
            author_id: 77,
            published: false,
        });
        assert!(res.is_err());
    }

    #[test]
    fn newest_first_with_filters() {
        let db = Database::open_in_memory().unwrap();
        let alice = fixtures::user(&db, "alice");
        let bob = fixtures::user(&db, "bob");

        let first = fixtures::post(&db, alice.id, "first");
        let second = fixtures::post(&db, bob.id, "second");
        let third = fixtures::post(&db, alice.id, "third");
        db.publish_post(third.id).unwrap().unwrap();

        let all = db.list_posts(PostFilter::default(), 10, 0).unwrap();
        assert_eq!(
            all.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![third.id, second.id, first.id]
        );

        let by_alice = db
            .list_posts(
                PostFilter {
                    author_id: Some(alice.id),
                    ..Default::default()
                },
                10,
                0,
            )
            .unwrap();
        assert_eq!(by_alice.len(), 2);

        let published = db
            .list_posts(
                PostFilter {
                    published: Some(true),
                    ..Default::default()
                },
                10,
                0,
            )
            .unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].id, third.id);
    }

    #[test]
    fn publish_toggles() {
        let db = Database::open_in_memory().unwrap();
        let alice = fixtures::user(&db, "alice");
        let post = fixtures::post(&db, alice.id, "draft");
        assert!(!post.published);

        assert!(db.publish_post(post.id).unwrap().unwrap().published);
        assert!(!db.unpublish_post(post.id).unwrap().unwrap().published);
        assert!(db.publish_post(999).unwrap().is_none());
    }

    #[test]
    fn deleting_author_cascades_to_posts() {
        let db = Database::open_in_memory().unwrap();
        let alice = fixtures::user(&db, "alice");
        let post = fixtures::post(&db, alice.id, "mine");

        assert!(db.delete_user(alice.id));
        assert!(db.get_post_by_id(post.id).unwrap().is_none());
        assert_eq!(db.count_posts().unwrap(), 0);
    }
}
