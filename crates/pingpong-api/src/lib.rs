pub mod comments;
pub mod convert;
pub mod error;
pub mod extract;
pub mod health;
pub mod messages;
pub mod metadata;
pub mod pingpongs;
pub mod posts;
pub mod routes;
pub mod state;
pub mod users;

pub use routes::router;
pub use state::{AppState, AppStateInner};
