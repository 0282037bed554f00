use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use pingpong_db::models::{MetadataChanges, NewMetadata};
use pingpong_types::api::{
    CreateMetadataRequest, DataResponse, DeleteResponse, ListQuery, ListResponse,
    UpdateMetadataRequest,
};
use pingpong_types::models::Metadata;

use crate::convert::{IntoModel, into_models};
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::{AppState, db_call};

pub async fn list_pingpong_metadata(
    State(state): State<AppState>,
    ApiPath(pingpong_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Json<ListResponse<Metadata>>> {
    let rows = db_call(&state, move |db| {
        if db.get_pingpong_by_id(pingpong_id)?.is_none() {
            return Ok(None);
        }
        db.list_metadata_by_pingpong(pingpong_id, query.limit, query.offset)
            .map(Some)
    })
    .await?
    .ok_or_else(|| ApiError::not_found("PingPong"))?;

    Ok(Json(ListResponse {
        data: into_models(rows),
        pagination: query.pagination(),
    }))
}

/// A repeated (user, work item, name) triple fails as a storage error.
pub async fn create_pingpong_metadata(
    State(state): State<AppState>,
    ApiPath(pingpong_id): ApiPath<i64>,
    ApiJson(req): ApiJson<CreateMetadataRequest>,
) -> ApiResult<impl IntoResponse> {
    let new = NewMetadata {
        pingpong_id,
        user_id: req.user_id,
        name: req.name,
        value: req.value,
    };
    let row = db_call(&state, move |db| {
        if db.get_pingpong_by_id(pingpong_id)?.is_none() {
            return Ok(None);
        }
        db.create_metadata(&new).map(Some)
    })
    .await?
    .ok_or_else(|| ApiError::not_found("PingPong"))?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(row.into_model()))))
}

pub async fn get_metadata(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<DataResponse<Metadata>>> {
    let row = db_call(&state, move |db| db.get_metadata_by_id(id))
        .await?
        .ok_or_else(|| ApiError::not_found("Metadata"))?;

    Ok(Json(DataResponse::new(row.into_model())))
}

pub async fn update_metadata(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateMetadataRequest>,
) -> ApiResult<Json<DataResponse<Metadata>>> {
    let changes = MetadataChanges { value: req.value };
    let row = db_call(&state, move |db| db.update_metadata(id, changes))
        .await?
        .ok_or_else(|| ApiError::not_found("Metadata"))?;

    Ok(Json(DataResponse::new(row.into_model())))
}

pub async fn delete_metadata(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<DataResponse<DeleteResponse>>> {
    let deleted = db_call(&state, move |db| Ok(db.delete_metadata(id))).await?;

    Ok(Json(DataResponse::new(DeleteResponse { id, deleted })))
}
