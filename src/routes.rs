use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use sea_orm::DbErr;
use serde_json::{Value, json};

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{ErrorBody, Film},
    validation::{
        FavoritePayload, FilmPayload, RatingPayload, ensure_positive_id, ensure_same_id,
        stored_id,
    },
};

type FilmId = WithRejection<Path<i64>, AppError>;

/// Raw query pairs. Only the first `filter` counts; repeats and unknown keys are ignored.
type ListQuery = WithRejection<Query<Vec<(String, String)>>, AppError>;

pub async fn list_films(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(params), _): ListQuery,
) -> AppResult<Json<Vec<Film>>> {
    let filter = params.iter().find(|(key, _)| key == "filter").map(|(_, value)| value.as_str());
    let films = state.films.list(filter).await.map_err(|err| {
        AppError::read_failure(err, |e| format!("Database error while retrieving films: {e}"))
    })?;
    Ok(Json(films))
}

pub async fn get_film(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): FilmId,
) -> AppResult<Json<Film>> {
    let id = ensure_positive_id(id)?;
    let row = stored_id(id).ok_or(AppError::NotFound)?;
    let film = state.films.get(row).await.map_err(|err| {
        AppError::read_failure(err, |e| format!("Database error while retrieving film {id}: {e}"))
    })?;
    Ok(Json(film))
}

pub async fn create_film(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(payload), _): WithRejection<Json<FilmPayload>, AppError>,
) -> AppResult<Json<Film>> {
    let draft = payload.into_draft()?;
    let film = state.films.create(draft).await.map_err(|err| {
        AppError::write_failure(err, |e| {
            format!("Database error during the creation of new film: {e}")
        })
    })?;
    Ok(Json(film))
}

pub async fn update_film(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): FilmId,
    WithRejection(Json(payload), _): WithRejection<Json<FilmPayload>, AppError>,
) -> AppResult<Json<Film>> {
    let body_id = payload.id;
    let draft = payload.into_draft()?;
    ensure_same_id(id, body_id)?;
    let row = stored_id(id).ok_or(AppError::NotFound)?;

    let film = state.films.update(row, draft).await.map_err(|err| {
        AppError::write_failure(err, |e| {
            format!("Database error during the update of film {id}: {e}")
        })
    })?;
    Ok(Json(film))
}

pub async fn set_favorite(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): FilmId,
    WithRejection(Json(payload), _): WithRejection<Json<FavoritePayload>, AppError>,
) -> AppResult<Json<Film>> {
    let favorite = payload.favorite()?;
    ensure_same_id(id, payload.id)?;
    let row = stored_id(id).ok_or(AppError::NotFound)?;

    let describe =
        |_: &DbErr| format!("Database error during the favorite update of film {id}");
    let mut film =
        state.films.get(row).await.map_err(|err| AppError::write_failure(err, describe))?;
    film.favorite = favorite;
    let film = state
        .films
        .update(row, film.draft())
        .await
        .map_err(|err| AppError::write_failure(err, describe))?;
    Ok(Json(film))
}

pub async fn set_rating(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): FilmId,
    WithRejection(Json(payload), _): WithRejection<Json<RatingPayload>, AppError>,
) -> AppResult<Json<Film>> {
    let rating = payload.rating()?;
    ensure_same_id(id, payload.id)?;
    let row = stored_id(id).ok_or(AppError::NotFound)?;

    let describe = |_: &DbErr| format!("Database error during the rating update of film {id}");
    let mut film =
        state.films.get(row).await.map_err(|err| AppError::write_failure(err, describe))?;
    film.rating = rating;
    let film = state
        .films
        .update(row, film.draft())
        .await
        .map_err(|err| AppError::write_failure(err, describe))?;
    Ok(Json(film))
}

/// Deleting an id that cannot exist is the same no-op as deleting a missing film.
pub async fn delete_film(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): FilmId,
) -> AppResult<Json<Value>> {
    if let Some(row) = stored_id(id) {
        state.films.delete(row).await.map_err(|err| {
            AppError::write_failure(err, |e| {
                format!("Database error during the deletion of film {id}: {e}")
            })
        })?;
    }
    Ok(Json(json!({})))
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorBody { error: "Not found.".to_string() }))
}

pub async fn method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, Json(ErrorBody { error: "Method not allowed.".to_string() }))
}
