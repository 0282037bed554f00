//! Populates a database with a handful of illustrative rows for manual testing.
//! Not used by the server; run it once against an empty database.

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use pingpong_db::Database;
use pingpong_db::models::{
    NewComment, NewMessage, NewMetadata, NewPingPong, NewPost, NewUser,
};
use pingpong_types::models::{MessageKind, PingPongStatus, Priority};

const DAY: i64 = 24 * 60 * 60;

#[derive(Debug, PartialEq, Eq)]
struct SeedSummary {
    users: i64,
    posts: i64,
    comments: i64,
    pingpongs: i64,
    messages: i64,
    metadata: i64,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pingpong_seed=info,pingpong_db=info".into()),
        )
        .init();

    let db_path: PathBuf = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "./data/dev.db".into())
        .into();
    let db = Database::open(&db_path)?;

    info!("Seeding database at {}", db_path.display());
    let summary = seed(&db, chrono::Utc::now().timestamp())?;

    info!(
        "Database seeded: {} users, {} posts, {} comments, {} pingpongs, {} messages, {} metadata",
        summary.users,
        summary.posts,
        summary.comments,
        summary.pingpongs,
        summary.messages,
        summary.metadata
    );
    Ok(())
}

fn user(db: &Database, username: &str, email: &str, password: &str) -> Result<i64> {
    Ok(db
        .create_user(&NewUser {
            username: username.into(),
            email: email.into(),
            // Stored as-is; nothing in this system hashes passwords
            password: password.into(),
            avatar: None,
        })?
        .id)
}

fn seed(db: &Database, now: i64) -> Result<SeedSummary> {
    let admin = user(db, "admin", "admin@pingpong.com", "hashed_password_123")?;
    let alice = user(db, "alice", "alice@example.com", "hashed_password_456")?;
    let bob = user(db, "bob", "bob@example.com", "hashed_password_789")?;
    info!("Created 3 users");

    // -- Blog --

    let welcome = db.create_post(&NewPost {
        title: "Welcome to PingPong".into(),
        content: "A tiny demo of users, posts and comments.".into(),
        author_id: admin,
        published: true,
    })?;
    db.create_post(&NewPost {
        title: "Drafting the roadmap".into(),
        content: "Realtime messages, docs, a nicer UI.".into(),
        author_id: alice,
        published: false,
    })?;
    db.create_comment(&NewComment {
        content: "Looks great!".into(),
        post_id: welcome.id,
        author_id: bob,
    })?;
    info!("Created 2 posts and 1 comment");

    // -- Work items --

    let ui = db.create_pingpong(&NewPingPong {
        title: "Design the new user interface".into(),
        description: Some(
            "A modern UI for the PingPong system: task list, detail page and creation form.".into(),
        ),
        requester_id: admin,
        responder_id: alice,
        status: PingPongStatus::Ping,
        priority: Some(Priority::High),
        eta: Some(now + 7 * DAY),
    })?;
    let realtime = db.create_pingpong(&NewPingPong {
        title: "Implement realtime messaging".into(),
        description: Some("Push new messages to clients over WebSocket.".into()),
        requester_id: alice,
        responder_id: bob,
        status: PingPongStatus::Pong,
        priority: Some(Priority::Medium),
        eta: Some(now + 3 * DAY),
    })?;
    let docs = db.create_pingpong(&NewPingPong {
        title: "Write the API documentation".into(),
        description: Some("Document every endpoint with request and response formats.".into()),
        requester_id: admin,
        responder_id: bob,
        status: PingPongStatus::Closed,
        priority: None,
        eta: Some(now - 2 * DAY),
    })?;
    info!("Created 3 pingpongs");

    let messages = [
        (ui.id, alice, "Got it, analysing the requirements. What style do you have in mind?", MessageKind::Text),
        (ui.id, admin, "Clean and modern, in the spirit of the popular design systems.", MessageKind::Text),
        (realtime.id, bob, "I'll start with the basic push flow, should land tomorrow.", MessageKind::Text),
        (docs.id, bob, "The API docs are deployed under /docs.", MessageKind::Text),
        (docs.id, bob, "Task completed and closed.", MessageKind::System),
    ];
    for (pingpong_id, sender_id, content, kind) in messages {
        db.create_message(&NewMessage {
            pingpong_id,
            sender_id,
            content: content.into(),
            kind,
        })?;
    }
    info!("Created {} messages", messages.len());

    let metadata = [
        (admin, ui.id, "category", "frontend"),
        (alice, realtime.id, "stack", "WebSocket"),
        (bob, docs.id, "doc type", "OpenAPI 3.0"),
    ];
    for (user_id, pingpong_id, name, value) in metadata {
        db.create_metadata(&NewMetadata {
            pingpong_id,
            user_id,
            name: name.into(),
            value: Some(value.into()),
        })?;
    }
    info!("Created {} metadata items", metadata.len());

    Ok(SeedSummary {
        users: db.count_users()?,
        posts: db.count_posts()?,
        comments: db.count_comments()?,
        pingpongs: db.count_pingpongs()?,
        messages: db.count_messages()?,
        metadata: db.count_metadata()?,
    })
}
