use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

use pingpong_db::models::{CommentRow, MessageRow, MetadataRow, PingPongRow, PostRow, UserRow};
use pingpong_types::models::{Comment, Message, Metadata, PingPong, Post, User};

/// Row → API model.
pub trait IntoModel {
    type Model;

    fn into_model(self) -> Self::Model;
}

pub fn into_models<R: IntoModel>(rows: Vec<R>) -> Vec<R::Model> {
    rows.into_iter().map(IntoModel::into_model).collect()
}

fn timestamp(raw: &str, column: &str, table: &str, id: i64) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt {} '{}' on {} {}: {}", column, raw, table, id, e);
            DateTime::default()
        })
}

impl IntoModel for UserRow {
    type Model = User;

    fn into_model(self) -> User {
        User {
            created_at: timestamp(&self.created_at, "created_at", "user", self.id),
            updated_at: timestamp(&self.updated_at, "updated_at", "user", self.id),
            id: self.id,
            username: self.username,
            email: self.email,
            avatar: self.avatar,
        }
    }
}

impl IntoModel for PostRow {
    type Model = Post;

    fn into_model(self) -> Post {
        Post {
            created_at: timestamp(&self.created_at, "created_at", "post", self.id),
            updated_at: timestamp(&self.updated_at, "updated_at", "post", self.id),
            id: self.id,
            title: self.title,
            content: self.content,
            author_id: self.author_id,
            published: self.published,
        }
    }
}

impl IntoModel for CommentRow {
    type Model = Comment;

    fn into_model(self) -> Comment {
        Comment {
            created_at: timestamp(&self.created_at, "created_at", "comment", self.id),
            updated_at: timestamp(&self.updated_at, "updated_at", "comment", self.id),
            id: self.id,
            content: self.content,
            post_id: self.post_id,
            author_id: self.author_id,
        }
    }
}

impl IntoModel for PingPongRow {
    type Model = PingPong;

    fn into_model(self) -> PingPong {
        PingPong {
            created_at: timestamp(&self.created_at, "created_at", "pingpong", self.id),
            updated_at: timestamp(&self.updated_at, "updated_at", "pingpong", self.id),
            id: self.id,
            title: self.title,
            description: self.description,
            requester_id: self.requester_id,
            responder_id: self.responder_id,
            status: self.status,
            priority: self.priority,
            eta: self.eta,
            closed_at: self.closed_at,
        }
    }
}

impl IntoModel for MessageRow {
    type Model = Message;

    fn into_model(self) -> Message {
        Message {
            created_at: timestamp(&self.created_at, "created_at", "message", self.id),
            id: self.id,
            pingpong_id: self.pingpong_id,
            sender_id: self.sender_id,
            content: self.content,
            kind: self.kind,
        }
    }
}

impl IntoModel for MetadataRow {
    type Model = Metadata;

    fn into_model(self) -> Metadata {
        Metadata {
            created_at: timestamp(&self.created_at, "created_at", "metadata", self.id),
            updated_at: timestamp(&self.updated_at, "updated_at", "metadata", self.id),
            id: self.id,
            pingpong_id: self.pingpong_id,
            user_id: self.user_id,
            name: self.name,
            value: self.value,
        }
    }
}
