use anyhow::Result;
use rusqlite::Row;

use super::{OptionalExt, enum_column};
use crate::Database;
use crate::models::{MessageRow, NewMessage};
use crate::sql::Conditions;

const MESSAGE_COLUMNS: &str = "id, pingpong_id, sender_id, content, message_type, created_at";

impl Database {
    pub fn create_message(&self, new: &NewMessage) -> Result<MessageRow> {
        self.with_conn(|conn| {
            let row = conn.query_row(
                &format!(
                    "INSERT INTO messages (pingpong_id, sender_id, content, message_type) VALUES (?1, ?2, ?3, ?4) RETURNING {}",
                    MESSAGE_COLUMNS
                ),
                rusqlite::params![new.pingpong_id, new.sender_id, new.content, new.kind.as_str()],
                map_message,
            )?;
            Ok(row)
        })
    }

    pub fn get_message_by_id(&self, id: i64) -> Result<Option<MessageRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {} FROM messages WHERE id = ?1", MESSAGE_COLUMNS),
                [id],
                map_message,
            )
            .optional()
        })
    }

    /// Conversation order: oldest first.
    pub fn list_messages_by_pingpong(
        &self,
        pingpong_id: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<MessageRow>> {
        let mut conds = Conditions::new();
        conds.eq("pingpong_id", pingpong_id);
        let (sql, values) = conds.select(
            "messages",
            MESSAGE_COLUMNS,
            "created_at ASC, id ASC",
            limit,
            offset,
        );
        self.query_rows(&sql, values, map_message)
    }

    pub fn delete_message(&self, id: i64) -> bool {
        self.delete_row("messages", id)
    }

    pub fn count_messages(&self) -> Result<i64> {
        self.count_rows("messages")
    }
}

fn map_message(row: &Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        pingpong_id: row.get(1)?,
        sender_id: row.get(2)?,
        content: row.get(3)?,
        kind: enum_column(row, 4)?,
        created_at: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::fixtures;
    use pingpong_types::models::MessageKind;

    fn say(db: &Database, pingpong_id: i64, sender_id: i64, content: &str, kind: MessageKind) -> MessageRow {
        db.create_message(&NewMessage {
            pingpong_id,
            sender_id,
            content: content.into(),
            kind,
        })
        .unwrap()
    }

    #[test]
    fn conversation_reads_oldest_first() {
        let db = Database::open_in_memory().unwrap();
        let alice = fixtures::user(&db, "alice");
        let bob = fixtures::user(&db, "bob");
        let item = fixtures::pingpong(&db, alice.id, bob.id);

        let m1 = say(&db, item.id, bob.id, "got it", MessageKind::Text);
        let m2 = say(&db, item.id, alice.id, "thanks", MessageKind::Text);
        let m3 = say(&db, item.id, bob.id, "closed", MessageKind::System);

        let thread = db.list_messages_by_pingpong(item.id, 50, 0).unwrap();
        assert_eq!(
            thread.iter().map(|m| m.id).collect::<Vec<_>>(),
            vec![m1.id, m2.id, m3.id]
        );
        assert_eq!(thread[2].kind, MessageKind::System);

        let tail = db.list_messages_by_pingpong(item.id, 50, 2).unwrap();
        assert_eq!(tail.len(), 1);
    }

    #[test]
    fn message_needs_existing_work_item() {
        let db = Database::open_in_memory().unwrap();
        let alice = fixtures::user(&db, "alice");
        let res = db.create_message(&NewMessage {
            pingpong_id: 404,
            sender_id: alice.id,
            content: "hello?".into(),
            kind: MessageKind::Text,
        });
        assert!(res.is_err());
    }

    #[test]
    fn deleting_work_item_drops_its_messages() {
        let db = Database::open_in_memory().unwrap();
        let alice = fixtures::user(&db, "alice");
        let bob = fixtures::user(&db, "bob");
        let item = fixtures::pingpong(&db, alice.id, bob.id);
        let m = say(&db, item.id, bob.id, "hi", MessageKind::Text);

        assert!(db.delete_pingpong(item.id));
        assert!(db.get_message_by_id(m.id).unwrap().is_none());
        assert_eq!(db.count_messages().unwrap(), 0);
    }

    #[test]
    fn delete_single_message() {
        let db = Database::open_in_memory().unwrap();
        let alice = fixtures::user(&db, "alice");
        let item = fixtures::pingpong(&db, alice.id, alice.id);
        let m = say(&db, item.id, alice.id, "note to self", MessageKind::Text);

        assert!(db.delete_message(m.id));
        assert!(!db.delete_message(m.id));
    }
}
