//! Database row types: these map directly to SQLite rows.
//! Distinct from pingpong-types API models to keep the DB layer independent.
//! Timestamps stay in SQLite's `YYYY-MM-DD HH:MM:SS` text form.

use pingpong_types::models::{MessageKind, PingPongStatus, Priority};

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub avatar: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct PostRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub published: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct CommentRow {
    pub id: i64,
    pub content: String,
    pub post_id: i64,
    pub author_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct PingPongRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub requester_id: i64,
    pub responder_id: i64,
    pub status: PingPongStatus,
    pub priority: Option<Priority>,
    pub eta: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
    pub closed_at: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct MessageRow {
    pub id: i64,
    pub pingpong_id: i64,
    pub sender_id: i64,
    pub content: String,
    pub kind: MessageKind,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct MetadataRow {
    pub id: i64,
    pub pingpong_id: i64,
    pub user_id: i64,
    pub name: String,
    pub value: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

// -- Inserts --

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub published: bool,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
    pub post_id: i64,
    pub author_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewPingPong {
    pub title: String,
    pub description: Option<String>,
    pub requester_id: i64,
    pub responder_id: i64,
    pub status: PingPongStatus,
    pub priority: Option<Priority>,
    pub eta: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub pingpong_id: i64,
    pub sender_id: i64,
    pub content: String,
    pub kind: MessageKind,
}

#[derive(Debug, Clone)]
pub struct NewMetadata {
    pub pingpong_id: i64,
    pub user_id: i64,
    pub name: String,
    pub value: Option<String>,
}

// -- Partial updates: `None` leaves the column untouched. On nullable
// columns `Some(None)` clears it. --

#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub avatar: Option<Option<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct CommentChanges {
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PingPongChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<PingPongStatus>,
    pub priority: Option<Option<Priority>>,
    pub eta: Option<Option<i64>>,
}

#[derive(Debug, Clone, Default)]
pub struct MetadataChanges {
    pub value: Option<Option<String>>,
}

// -- Listing filters --

#[derive(Debug, Clone, Copy, Default)]
pub struct PostFilter {
    pub author_id: Option<i64>,
    pub published: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PingPongFilter {
    pub status: Option<PingPongStatus>,
    pub requester_id: Option<i64>,
    pub responder_id: Option<i64>,
}
