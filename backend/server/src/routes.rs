use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use crate::{
    error::AppError,
    models::{Envelope, Todo, TodoInput, TodoRecord},
    state::AppState,
    utils::{OriginIp, get_content, parse_id},
};

pub async fn list_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<Vec<Todo>>>, AppError> {
    let records = state
        .store
        .list()
        .await
        .map_err(AppError::store("Error fetching todos"))?;

    Ok(Json(Envelope::data(
        records.into_iter().map(Todo::from).collect(),
    )))
}

pub async fn create_handler(
    State(state): State<Arc<AppState>>,
    OriginIp(origin_ip): OriginIp,
    payload: Result<Json<TodoInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(input) = payload.map_err(|_| AppError::MalformedPayload)?;
    let content = get_content(input)?;

    let record = state
        .store
        .insert(TodoRecord::new(content, origin_ip))
        .await
        .map_err(AppError::store("Error adding todo"))?;

    info!(id = %record.key, "Todo added");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(Todo::from(record)).with_message("Todo added")),
    ))
}

pub async fn update_handler(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<TodoInput>, JsonRejection>,
) -> Result<Json<Envelope<Todo>>, AppError> {
    let Json(input) = payload.map_err(|_| AppError::MalformedPayload)?;
    let content = get_content(input)?;
    let id = path_id(path)?;
    let key = parse_id(&id)?;

    let record = state
        .store
        .update(key, content)
        .await
        .map_err(AppError::store("Error updating todo"))?
        .ok_or(AppError::NotFound)?;

    info!(%id, "Todo updated");

    Ok(Json(Envelope::data(Todo::from(record))))
}

pub async fn delete_handler(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Envelope<()>>, AppError> {
    let id = path_id(path)?;
    let key = parse_id(&id)?;

    let removed = state
        .store
        .delete(key)
        .await
        .map_err(AppError::store("Error deleting todo"))?;

    if !removed {
        return Err(AppError::NotFound);
    }

    info!(%id, "Todo deleted");

    Ok(Json(Envelope::message("Todo deleted")))
}

/// An id that does not even decode cannot name a record.
fn path_id(path: Result<Path<String>, PathRejection>) -> Result<String, AppError> {
    path.map(|Path(id)| id).map_err(|_| AppError::NotFound)
}

pub async fn not_found_handler() -> AppError {
    AppError::RouteNotFound
}
