use anyhow::Result;
use rusqlite::Row;

use super::OptionalExt;
use crate::Database;
use crate::models::{MetadataChanges, MetadataRow, NewMetadata};
use crate::sql::{Changeset, Conditions};

const METADATA_COLUMNS: &str = "id, pingpong_id, user_id, name, value, created_at, updated_at";

impl Database {
    /// A (user, work item, name) triple may exist only once.
    pub fn create_metadata(&self, new: &NewMetadata) -> Result<MetadataRow> {
        self.with_conn(|conn| {
            let row = conn.query_row(
                &format!(
                    "INSERT INTO metadata (pingpong_id, user_id, name, value) VALUES (?1, ?2, ?3, ?4) RETURNING {}",
                    METADATA_COLUMNS
                ),
                rusqlite::params![new.pingpong_id, new.user_id, new.name, new.value],
                map_metadata,
            )?;
            Ok(row)
        })
    }

    pub fn get_metadata_by_id(&self, id: i64) -> Result<Option<MetadataRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {} FROM metadata WHERE id = ?1", METADATA_COLUMNS),
                [id],
                map_metadata,
            )
            .optional()
        })
    }

    pub fn list_metadata_by_pingpong(
        &self,
        pingpong_id: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<MetadataRow>> {
        let mut conds = Conditions::new();
        conds.eq("pingpong_id", pingpong_id);
        let (sql, values) = conds.select("metadata", METADATA_COLUMNS, "id ASC", limit, offset);
        self.query_rows(&sql, values, map_metadata)
    }

    pub fn update_metadata(&self, id: i64, changes: MetadataChanges) -> Result<Option<MetadataRow>> {
        let mut set = Changeset::new("metadata");
        set.set_nullable("value", changes.value);
        self.update_returning(set, id, METADATA_COLUMNS, map_metadata)
    }

    pub fn delete_metadata(&self, id: i64) -> bool {
        self.delete_row("metadata", id)
    }

    pub fn count_metadata(&self) -> Result<i64> {
        self.count_rows("metadata")
    }
}

fn map_metadata(row: &Row<'_>) -> rusqlite::Result<MetadataRow> {
    Ok(MetadataRow {
        id: row.get(0)?,
        pingpong_id: row.get(1)?,
        user_id: row.get(2)?,
        name: row.get(3)?,
        value: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::fixtures;

    fn tag(pingpong_id: i64, user_id: i64, name: &str, value: &str) -> NewMetadata {
        NewMetadata {
            pingpong_id,
            user_id,
            name: name.into(),
            value: Some(value.into()),
        }
    }

    #[test]
    fn triple_is_unique() {
        let db = Database::open_in_memory().unwrap();
        let alice = fixtures::user(&db, "alice");
        let bob = fixtures::user(&db, "bob");
        let item = fixtures::pingpong(&db, alice.id, bob.id);

        db.create_metadata(&tag(item.id, alice.id, "category", "frontend")).unwrap();
        assert!(db.create_metadata(&tag(item.id, alice.id, "category", "backend")).is_err());

        // different name, same pair
        db.create_metadata(&tag(item.id, alice.id, "stack", "rust")).unwrap();
        // same name, different user
        db.create_metadata(&tag(item.id, bob.id, "category", "backend")).unwrap();

        assert_eq!(db.count_metadata().unwrap(), 3);
        assert_eq!(db.list_metadata_by_pingpong(item.id, 10, 0).unwrap().len(), 3);
    }

    #[test]
    fn update_value() {
        let db = Database::open_in_memory().unwrap();
        let alice = fixtures::user(&db, "alice");
        let item = fixtures::pingpong(&db, alice.id, alice.id);
        let meta = db.create_metadata(&tag(item.id, alice.id, "doc", "draft")).unwrap();

        let updated = db
            .update_metadata(
                meta.id,
                MetadataChanges {
                    value: Some(Some("OpenAPI 3.0".into())),
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.value.as_deref(), Some("OpenAPI 3.0"));
        assert_eq!(updated.name, "doc");

        let untouched = db
            .update_metadata(meta.id, MetadataChanges::default())
            .unwrap()
            .unwrap();
        assert_eq!(untouched.value.as_deref(), Some("OpenAPI 3.0"));

        let cleared = db
            .update_metadata(meta.id, MetadataChanges { value: Some(None) })
            .unwrap()
            .unwrap();
        assert!(cleared.value.is_none());
    }

    #[test]
    fn cascades_from_user_and_work_item() {
        let db = Database::open_in_memory().unwrap();
        let alice = fixtures::user(&db, "alice");
        let bob = fixtures::user(&db, "bob");
        let item = fixtures::pingpong(&db, alice.id, alice.id);
        let by_bob = db.create_metadata(&tag(item.id, bob.id, "k", "v")).unwrap();
        let by_alice = db.create_metadata(&tag(item.id, alice.id, "k", "v")).unwrap();

        assert!(db.delete_user(bob.id));
        assert!(db.get_metadata_by_id(by_bob.id).unwrap().is_none());
        assert!(db.get_metadata_by_id(by_alice.id).unwrap().is_some());

        assert!(db.delete_pingpong(item.id));
        assert!(db.get_metadata_by_id(by_alice.id).unwrap().is_none());
    }
}
