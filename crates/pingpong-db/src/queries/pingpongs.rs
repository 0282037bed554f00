use anyhow::Result;
use pingpong_types::models::PingPongStatus;
use rusqlite::Row;

use super::{OptionalExt, enum_column, optional_enum_column, text};
use crate::Database;
use crate::models::{NewPingPong, PingPongChanges, PingPongFilter, PingPongRow};
use crate::sql::{Changeset, Conditions};

const PINGPONG_COLUMNS: &str = "id, title, description, requester_id, responder_id, status, priority, eta, created_at, updated_at, closed_at";

const UNIX_NOW: &str = "CAST(strftime('%s', 'now') AS INTEGER)";

impl Database {
    /// Insert a work item. Items created already closed get `closed_at` stamped.
    pub fn create_pingpong(&self, new: &NewPingPong) -> Result<PingPongRow> {
        self.with_conn(|conn| {
            let row = conn.query_row(
                &format!(
                    "INSERT INTO pingpongs (title, description, requester_id, responder_id, status, priority, eta, closed_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, CASE WHEN ?5 = 'closed' THEN {} END)
                     RETURNING {}",
                    UNIX_NOW, PINGPONG_COLUMNS
                ),
                rusqlite::params![
                    new.title,
                    new.description,
                    new.requester_id,
                    new.responder_id,
                    new.status.as_str(),
                    new.priority.map(|p| p.as_str()),
                    new.eta,
                ],
                map_pingpong,
            )?;
            Ok(row)
        })
    }

    pub fn get_pingpong_by_id(&self, id: i64) -> Result<Option<PingPongRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {} FROM pingpongs WHERE id = ?1", PINGPONG_COLUMNS),
                [id],
                map_pingpong,
            )
            .optional()
        })
    }

    /// Newest first.
    pub fn list_pingpongs(
        &self,
        filter: PingPongFilter,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<PingPongRow>> {
        let mut conds = Conditions::new();
        conds
            .eq_if("status", filter.status.map(|s| text(s.as_str())))
            .eq_if("requester_id", filter.requester_id)
            .eq_if("responder_id", filter.responder_id);
        let (sql, values) = conds.select(
            "pingpongs",
            PINGPONG_COLUMNS,
            "created_at DESC, id DESC",
            limit,
            offset,
        );
        self.query_rows(&sql, values, map_pingpong)
    }

    /// Any status may replace any other. Moving to `closed` stamps `closed_at`
    /// unless it is already set.
    pub fn update_pingpong(&self, id: i64, changes: PingPongChanges) -> Result<Option<PingPongRow>> {
        let mut set = Changeset::new("pingpongs");
        set.set_if("title", changes.title)
            .set_nullable("description", changes.description)
            .set_if("status", changes.status.map(|s| text(s.as_str())))
            .set_nullable(
                "priority",
                changes.priority.map(|p| p.map(|p| text(p.as_str()))),
            )
            .set_nullable("eta", changes.eta);
        if changes.status == Some(PingPongStatus::Closed) {
            set.set_expr(
                "closed_at",
                "COALESCE(closed_at, CAST(strftime('%s', 'now') AS INTEGER))",
            );
        }
        self.update_returning(set, id, PINGPONG_COLUMNS, map_pingpong)
    }

    pub fn delete_pingpong(&self, id: i64) -> bool {
        self.delete_row("pingpongs", id)
    }

    pub fn count_pingpongs(&self) -> Result<i64> {
        self.count_rows("pingpongs")
    }
}

fn map_pingpong(row: &Row<'_>) -> rusqlite::Result<PingPongRow> {
    Ok(PingPongRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        requester_id: row.get(3)?,
        responder_id: row.get(4)?,
        status: enum_column(row, 5)?,
        priority: optional_enum_column(row, 6)?,
        eta: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
        closed_at: row.get(10)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::fixtures;
    use pingpong_types::models::Priority;

    #[test]
    fn create_defaults() {
        let db = Database::open_in_memory().unwrap();
        let alice = fixtures::user(&db, "alice");
        let bob = fixtures::user(&db, "bob");

        let item = fixtures::pingpong(&db, alice.id, bob.id);
        assert_eq!(item.status, PingPongStatus::Ping);
        assert!(item.priority.is_none());
        assert!(item.closed_at.is_none());
        assert_eq!(item.requester_id, alice.id);
        assert_eq!(item.responder_id, bob.id);
    }

    #[test]
    fn created_closed_is_stamped() {
        let db = Database::open_in_memory().unwrap();
        let alice = fixtures::user(&db, "alice");

        let item = db
            .create_pingpong(&NewPingPong {
                title: "Write the API docs".into(),
                description: Some("OpenAPI".into()),
                requester_id: alice.id,
                responder_id: alice.id,
                status: PingPongStatus::Closed,
                priority: Some(Priority::Low),
                eta: Some(1_700_000_000),
            })
            .unwrap();
        assert!(item.closed_at.is_some());
        assert_eq!(item.priority, Some(Priority::Low));
        assert_eq!(item.eta, Some(1_700_000_000));
    }

    #[test]
    fn any_status_may_overwrite_any_other() {
        let db = Database::open_in_memory().unwrap();
        let alice = fixtures::user(&db, "alice");
        let bob = fixtures::user(&db, "bob");
        let item = fixtures::pingpong(&db, alice.id, bob.id);

        let closed = db
            .update_pingpong(
                item.id,
                PingPongChanges {
                    status: Some(PingPongStatus::Closed),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(closed.status, PingPongStatus::Closed);
        let closed_at = closed.closed_at.expect("closed_at stamped");

        let reopened = db
            .update_pingpong(
                item.id,
                PingPongChanges {
                    status: Some(PingPongStatus::Ping),
                    priority: Some(Some(Priority::Urgent)),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(reopened.status, PingPongStatus::Ping);
        assert_eq!(reopened.priority, Some(Priority::Urgent));
        assert_eq!(reopened.closed_at, Some(closed_at));
    }

    #[test]
    fn optional_fields_can_be_cleared() {
        let db = Database::open_in_memory().unwrap();
        let alice = fixtures::user(&db, "alice");
        let item = db
            .create_pingpong(&NewPingPong {
                title: "Ship it".into(),
                description: Some("before friday".into()),
                requester_id: alice.id,
                responder_id: alice.id,
                status: PingPongStatus::Ping,
                priority: Some(Priority::High),
                eta: Some(1_700_000_000),
            })
            .unwrap();

        let cleared = db
            .update_pingpong(
                item.id,
                PingPongChanges {
                    description: Some(None),
                    priority: Some(None),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert!(cleared.description.is_none());
        assert!(cleared.priority.is_none());
        assert_eq!(cleared.eta, Some(1_700_000_000));
    }

    #[test]
    fn filters_by_status_and_participants() {
        let db = Database::open_in_memory().unwrap();
        let alice = fixtures::user(&db, "alice");
        let bob = fixtures::user(&db, "bob");
        let carol = fixtures::user(&db, "carol");

        let a = fixtures::pingpong(&db, alice.id, bob.id);
        let b = fixtures::pingpong(&db, bob.id, carol.id);
        db.update_pingpong(
            b.id,
            PingPongChanges {
                status: Some(PingPongStatus::Pong),
                ..Default::default()
            },
        )
        .unwrap();

        let pongs = db
            .list_pingpongs(
                PingPongFilter {
                    status: Some(PingPongStatus::Pong),
                    ..Default::default()
                },
                10,
                0,
            )
            .unwrap();
        assert_eq!(pongs.iter().map(|p| p.id).collect::<Vec<_>>(), vec![b.id]);

        let for_bob = db
            .list_pingpongs(
                PingPongFilter {
                    responder_id: Some(bob.id),
                    ..Default::default()
                },
                10,
                0,
            )
            .unwrap();
        assert_eq!(for_bob.iter().map(|p| p.id).collect::<Vec<_>>(), vec![a.id]);

        let all = db.list_pingpongs(PingPongFilter::default(), 10, 0).unwrap();
        assert_eq!(all.iter().map(|p| p.id).collect::<Vec<_>>(), vec![b.id, a.id]);
    }

    #[test]
    fn status_column_rejects_unknown_values() {
        let db = Database::open_in_memory().unwrap();
        let alice = fixtures::user(&db, "alice");
        let res = db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO pingpongs (title, requester_id, responder_id, status) VALUES ('x', ?1, ?1, 'lost')",
                [alice.id],
            )?;
            Ok(())
        });
        assert!(res.is_err());
    }

    #[test]
    fn deleting_requester_or_responder_cascades() {
        let db = Database::open_in_memory().unwrap();
        let alice = fixtures::user(&db, "alice");
        let bob = fixtures::user(&db, "bob");
        let carol = fixtures::user(&db, "carol");
        let requested = fixtures::pingpong(&db, alice.id, bob.id);
        let answered = fixtures::pingpong(&db, carol.id, alice.id);
        let unrelated = fixtures::pingpong(&db, bob.id, carol.id);

        assert!(db.delete_user(alice.id));
        assert!(db.get_pingpong_by_id(requested.id).unwrap().is_none());
        assert!(db.get_pingpong_by_id(answered.id).unwrap().is_none());
        assert!(db.get_pingpong_by_id(unrelated.id).unwrap().is_some());
    }
}
