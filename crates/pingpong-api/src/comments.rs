use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use pingpong_db::models::{CommentChanges, NewComment};
use pingpong_types::api::{
    CreateCommentRequest, DataResponse, DeleteResponse, ListQuery, ListResponse, ThreadQuery,
    UpdateCommentRequest,
};
use pingpong_types::models::Comment;

use crate::convert::{IntoModel, into_models};
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::{AppState, db_call};

/// GET /api/posts/{id}/comments: newest first, 404 when the post is gone.
pub async fn list_post_comments(
    State(state): State<AppState>,
    ApiPath(post_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<ThreadQuery>,
) -> ApiResult<Json<ListResponse<Comment>>> {
    let rows = db_call(&state, move |db| {
        if db.get_post_by_id(post_id)?.is_none() {
            return Ok(None);
        }
        db.list_comments_by_post(post_id, query.limit, query.offset).map(Some)
    })
    .await?
    .ok_or_else(|| ApiError::not_found("Post"))?;

    Ok(Json(ListResponse {
        data: into_models(rows),
        pagination: query.pagination(),
    }))
}

/// GET /api/users/{id}/comments: a user's comments across all posts.
pub async fn list_user_comments(
    State(state): State<AppState>,
    ApiPath(author_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Json<ListResponse<Comment>>> {
    let rows = db_call(&state, move |db| {
        if db.get_user_by_id(author_id)?.is_none() {
            return Ok(None);
        }
        db.list_comments_by_author(author_id, query.limit, query.offset)
            .map(Some)
    })
    .await?
    .ok_or_else(|| ApiError::not_found("User"))?;

    Ok(Json(ListResponse {
        data: into_models(rows),
        pagination: query.pagination(),
    }))
}

pub async fn create_post_comment(
    State(state): State<AppState>,
    ApiPath(post_id): ApiPath<i64>,
    ApiJson(req): ApiJson<CreateCommentRequest>,
) -> ApiResult<impl IntoResponse> {
    let new = NewComment {
        content: req.content,
        post_id,
        author_id: req.author_id,
    };
    let row = db_call(&state, move |db| {
        if db.get_post_by_id(post_id)?.is_none() {
            return Ok(None);
        }
        db.create_comment(&new).map(Some)
    })
    .await?
    .ok_or_else(|| ApiError::not_found("Post"))?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(row.into_model()))))
}

pub async fn get_comment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<DataResponse<Comment>>> {
    let row = db_call(&state, move |db| db.get_comment_by_id(id))
        .await?
        .ok_or_else(|| ApiError::not_found("Comment"))?;

    Ok(Json(DataResponse::new(row.into_model())))
}

pub async fn update_comment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateCommentRequest>,
) -> ApiResult<Json<DataResponse<Comment>>> {
    let changes = CommentChanges {
        content: req.content,
    };
    let row = db_call(&state, move |db| db.update_comment(id, changes))
        .await?
        .ok_or_else(|| ApiError::not_found("Comment"))?;

    Ok(Json(DataResponse::new(row.into_model())))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<DataResponse<DeleteResponse>>> {
    let deleted = db_call(&state, move |db| Ok(db.delete_comment(id))).await?;

    Ok(Json(DataResponse::new(DeleteResponse { id, deleted })))
}
