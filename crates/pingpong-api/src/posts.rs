use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use pingpong_db::models::{NewPost, PostChanges, PostFilter};
use pingpong_types::api::{
    CreatePostRequest, DataResponse, DeleteResponse, ListResponse, PostListQuery,
    UpdatePostRequest,
};
use pingpong_types::models::Post;

use crate::convert::{IntoModel, into_models};
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::{AppState, db_call};

pub async fn list_posts(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PostListQuery>,
) -> ApiResult<Json<ListResponse<Post>>> {
    let filter = PostFilter {
        author_id: query.author_id,
        published: query.published,
    };
    let rows = db_call(&state, move |db| db.list_posts(filter, query.limit, query.offset)).await?;

    Ok(Json(ListResponse {
        data: into_models(rows),
        pagination: query.pagination(),
    }))
}

pub async fn create_post(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreatePostRequest>,
) -> ApiResult<impl IntoResponse> {
    let new = NewPost {
        title: req.title,
        content: req.content,
        author_id: req.author_id,
        published: req.published,
    };
    let row = db_call(&state, move |db| db.create_post(&new)).await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(row.into_model()))))
}

pub async fn get_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<DataResponse<Post>>> {
    let row = db_call(&state, move |db| db.get_post_by_id(id))
        .await?
        .ok_or_else(|| ApiError::not_found("Post"))?;

    Ok(Json(DataResponse::new(row.into_model())))
}

pub async fn update_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdatePostRequest>,
) -> ApiResult<Json<DataResponse<Post>>> {
    let changes = PostChanges {
        title: req.title,
        content: req.content,
        published: req.published,
    };
    let row = db_call(&state, move |db| db.update_post(id, changes))
        .await?
        .ok_or_else(|| ApiError::not_found("Post"))?;

    Ok(Json(DataResponse::new(row.into_model())))
}

pub async fn publish_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<DataResponse<Post>>> {
    let row = db_call(&state, move |db| db.publish_post(id))
        .await?
        .ok_or_else(|| ApiError::not_found("Post"))?;

    Ok(Json(DataResponse::new(row.into_model())))
}

pub async fn unpublish_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<DataResponse<Post>>> {
    let row = db_call(&state, move |db| db.unpublish_post(id))
        .await?
        .ok_or_else(|| ApiError::not_found("Post"))?;

    Ok(Json(DataResponse::new(row.into_model())))
}

pub async fn delete_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<DataResponse<DeleteResponse>>> {
    let deleted = db_call(&state, move |db| Ok(db.delete_post(id))).await?;

    Ok(Json(DataResponse::new(DeleteResponse { id, deleted })))
}
