// rest/routes/tasks.rs — task CRUD routes.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::rest::auth;
use crate::rest::error::ApiError;
use crate::tasks::{schema, TaskFilter};
use crate::AppContext;

#[derive(Deserialize)]
pub struct ListTasksQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

pub async fn list_tasks(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<Value>, ApiError> {
    auth::authorize(&ctx.config, &headers)?;
    info!(user_id = ?query.user_id, "Received request to get all tasks");

    let tasks = ctx
        .tasks
        .list_tasks(TaskFilter {
            user_id: query.user_id,
        })
        .await?;

    Ok(Json(json!({ "tasks": tasks, "count": tasks.len() })))
}

pub async fn get_task(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    auth::authorize(&ctx.config, &headers)?;
    info!(id, "Received request to get task");

    let task = ctx.tasks.get_task(&id).await?;
    Ok(Json(json!({ "task": task })))
}

pub async fn create_task(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let requester_id = auth::authorize(&ctx.config, &headers)?;
    info!("Received request to create new task");

    let input = schema::validate_create(&body).map_err(ApiError::Validation)?;
    let task = ctx.tasks.create_task(input, &requester_id).await?;

    Ok((StatusCode::CREATED, Json(json!({ "task": task }))))
}

pub async fn update_task(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    auth::authorize(&ctx.config, &headers)?;
    info!(id, "Received request to update task");

    let input = schema::validate_update(&body).map_err(ApiError::Validation)?;
    let task = ctx.tasks.update_task(&id, input).await?;

    Ok(Json(json!({ "task": task })))
}

pub async fn delete_task(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    auth::authorize(&ctx.config, &headers)?;
    info!(id, "Received request to delete task");

    ctx.tasks.delete_task(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
