use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use pingpong_db::models::{NewPingPong, PingPongChanges, PingPongFilter};
use pingpong_types::api::{
    CreatePingPongRequest, DataResponse, DeleteResponse, ListResponse, PingPongListQuery,
    UpdatePingPongRequest,
};
use pingpong_types::models::PingPong;

use crate::convert::{IntoModel, into_models};
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::{AppState, db_call};

pub async fn list_pingpongs(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PingPongListQuery>,
) -> ApiResult<Json<ListResponse<PingPong>>> {
    let filter = PingPongFilter {
        status: query.status,
        requester_id: query.requester_id,
        responder_id: query.responder_id,
    };
    let rows =
        db_call(&state, move |db| db.list_pingpongs(filter, query.limit, query.offset)).await?;

    Ok(Json(ListResponse {
        data: into_models(rows),
        pagination: query.pagination(),
    }))
}

pub async fn create_pingpong(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreatePingPongRequest>,
) -> ApiResult<impl IntoResponse> {
    let new = NewPingPong {
        title: req.title,
        description: req.description,
        requester_id: req.requester_id,
        responder_id: req.responder_id,
        status: req.status,
        priority: req.priority,
        eta: req.eta,
    };
    let row = db_call(&state, move |db| db.create_pingpong(&new)).await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(row.into_model()))))
}

pub async fn get_pingpong(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<DataResponse<PingPong>>> {
    let row = db_call(&state, move |db| db.get_pingpong_by_id(id))
        .await?
        .ok_or_else(|| ApiError::not_found("PingPong"))?;

    Ok(Json(DataResponse::new(row.into_model())))
}

pub async fn update_pingpong(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdatePingPongRequest>,
) -> ApiResult<Json<DataResponse<PingPong>>> {
    let changes = PingPongChanges {
        title: req.title,
        description: req.description,
        status: req.status,
        priority: req.priority,
        eta: req.eta,
    };
    let row = db_call(&state, move |db| db.update_pingpong(id, changes))
        .await?
        .ok_or_else(|| ApiError::not_found("PingPong"))?;

    Ok(Json(DataResponse::new(row.into_model())))
}

pub async fn delete_pingpong(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<DataResponse<DeleteResponse>>> {
    let deleted = db_call(&state, move |db| Ok(db.delete_pingpong(id))).await?;

    Ok(Json(DataResponse::new(DeleteResponse { id, deleted })))
}
