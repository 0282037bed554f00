use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use pingpong_db::models::NewMessage;
use pingpong_types::api::{
    CreateMessageRequest, DataResponse, DeleteResponse, ListResponse, ThreadQuery,
};
use pingpong_types::models::Message;

use crate::convert::{IntoModel, into_models};
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::{AppState, db_call};

/// The conversation on a work item, oldest first.
pub async fn list_pingpong_messages(
    State(state): State<AppState>,
    ApiPath(pingpong_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<ThreadQuery>,
) -> ApiResult<Json<ListResponse<Message>>> {
    let rows = db_call(&state, move |db| {
        if db.get_pingpong_by_id(pingpong_id)?.is_none() {
            return Ok(None);
        }
        db.list_messages_by_pingpong(pingpong_id, query.limit, query.offset)
            .map(Some)
    })
    .await?
    .ok_or_else(|| ApiError::not_found("PingPong"))?;

    Ok(Json(ListResponse {
        data: into_models(rows),
        pagination: query.pagination(),
    }))
}

pub async fn create_pingpong_message(
    State(state): State<AppState>,
    ApiPath(pingpong_id): ApiPath<i64>,
    ApiJson(req): ApiJson<CreateMessageRequest>,
) -> ApiResult<impl IntoResponse> {
    let new = NewMessage {
        pingpong_id,
        sender_id: req.sender_id,
        content: req.content,
        kind: req.kind,
    };
    let row = db_call(&state, move |db| {
        if db.get_pingpong_by_id(pingpong_id)?.is_none() {
            return Ok(None);
        }
        db.create_message(&new).map(Some)
    })
    .await?
    .ok_or_else(|| ApiError::not_found("PingPong"))?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(row.into_model()))))
}

pub async fn get_message(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<DataResponse<Message>>> {
    let row = db_call(&state, move |db| db.get_message_by_id(id))
        .await?
        .ok_or_else(|| ApiError::not_found("Message"))?;

    Ok(Json(DataResponse::new(row.into_model())))
}

pub async fn delete_message(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<DataResponse<DeleteResponse>>> {
    let deleted = db_call(&state, move |db| Ok(db.delete_message(id))).await?;

    Ok(Json(DataResponse::new(DeleteResponse { id, deleted })))
}
