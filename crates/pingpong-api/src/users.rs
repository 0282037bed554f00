use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use pingpong_db::models::{NewUser, UserChanges};
use pingpong_types::api::{
    CreateUserRequest, DataResponse, DeleteResponse, ListQuery, ListResponse, UpdateUserRequest,
};
use pingpong_types::models::User;

use crate::convert::{IntoModel, into_models};
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::{AppState, db_call};

pub async fn list_users(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Json<ListResponse<User>>> {
    let rows = db_call(&state, move |db| db.list_users(query.limit, query.offset)).await?;

    Ok(Json(ListResponse {
        data: into_models(rows),
        pagination: query.pagination(),
    }))
}

pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    let new = NewUser {
        username: req.username,
        email: req.email,
        password: req.password,
        avatar: req.avatar,
    };
    let row = db_call(&state, move |db| db.create_user(&new)).await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(row.into_model()))))
}

pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<DataResponse<User>>> {
    let row = db_call(&state, move |db| db.get_user_by_id(id))
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    Ok(Json(DataResponse::new(row.into_model())))
}

pub async fn update_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> ApiResult<Json<DataResponse<User>>> {
    let changes = UserChanges {
        username: req.username,
        email: req.email,
        password: req.password,
        avatar: req.avatar,
    };
    let row = db_call(&state, move |db| db.update_user(id, changes))
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    Ok(Json(DataResponse::new(row.into_model())))
}

pub async fn delete_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<DataResponse<DeleteResponse>>> {
    let deleted = db_call(&state, move |db| Ok(db.delete_user(id))).await?;

    Ok(Json(DataResponse::new(DeleteResponse { id, deleted })))
}
