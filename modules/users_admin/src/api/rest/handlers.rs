use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query},
    response::Json,
    Extension,
};
use tracing::info;

use crate::api::rest::dto::{
    DeleteUserResponse, ListUsersParams, UpdateUserReq, UpdateUserResponse, UserDto,
    UserListResponse, UserStatsResponse, USER_DELETED_MESSAGE, USER_UPDATED_MESSAGE,
};
use crate::api::rest::error::ApiError;
use crate::contract::model::UserId;
use crate::domain::service::Service;

/// List one page of users matching the optional search and status filter
pub async fn list_users(
    Extension(svc): Extension<Arc<Service>>,
    Query(params): Query<ListUsersParams>,
) -> Result<Json<UserListResponse>, ApiError> {
    let query = params.into_query(svc.config().default_page_size);
    info!(
        page = query.page,
        page_size = query.page_size,
        search = %query.search_text,
        status = %query.status_filter,
        "Listing users"
    );

    let page = svc.list_users(query).await?;
    Ok(Json(UserListResponse::from(page)))
}

/// Aggregate counts over the whole user set
pub async fn user_stats(
    Extension(svc): Extension<Arc<Service>>,
) -> Result<Json<UserStatsResponse>, ApiError> {
    let stats = svc.user_stats().await?;
    Ok(Json(UserStatsResponse {
        success: true,
        data: stats.into(),
    }))
}

/// Apply a partial update to an existing user
pub async fn update_user(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserReq>, JsonRejection>,
) -> Result<Json<UpdateUserResponse>, ApiError> {
    let Json(req) = payload?;
    let id = UserId::from(id);
    info!(user_id = %id, "Updating user");

    let user = svc.update_user(&id, req.into()).await?;
    Ok(Json(UpdateUserResponse {
        success: true,
        data: UserDto::from(user),
        message: USER_UPDATED_MESSAGE.to_string(),
    }))
}

/// Remove a user
pub async fn delete_user(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteUserResponse>, ApiError> {
    let id = UserId::from(id);
    info!(user_id = %id, "Deleting user");

    svc.delete_user(&id).await?;
    Ok(Json(DeleteUserResponse {
        success: true,
        message: USER_DELETED_MESSAGE.to_string(),
    }))
}
