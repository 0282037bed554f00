use axum::{Json, body::Bytes, extract::State};
use chrono::Utc;

use pingpong_types::api::{DataResponse, EchoResponse, HealthResponse, PingResponse, StatsResponse};

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, db_call};

/// Static liveness payload. The database indicator is not a probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "PingPong server is running!".to_string(),
        timestamp: Utc::now(),
        database: "connected".to_string(),
    })
}

pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        message: "pong".to_string(),
    })
}

/// Any JSON document is echoed back. The content type is not checked.
pub async fn echo(body: Bytes) -> ApiResult<Json<EchoResponse>> {
    let echo: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))?;

    Ok(Json(EchoResponse {
        echo,
        timestamp: Utc::now(),
    }))
}

/// Row counts of every table, queried concurrently.
pub async fn stats(State(state): State<AppState>) -> ApiResult<Json<DataResponse<StatsResponse>>> {
    let (users, posts, comments, pingpongs, messages, metadata) = tokio::try_join!(
        db_call(&state, |db| db.count_users()),
        db_call(&state, |db| db.count_posts()),
        db_call(&state, |db| db.count_comments()),
        db_call(&state, |db| db.count_pingpongs()),
        db_call(&state, |db| db.count_messages()),
        db_call(&state, |db| db.count_metadata()),
    )?;

    Ok(Json(DataResponse::new(StatsResponse {
        users,
        posts,
        comments,
        pingpongs,
        messages,
        metadata,
    })))
}
