pub mod client;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod library;
pub mod models;
pub mod routes;
pub mod service;
pub mod store;
pub mod validation;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, put},
};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::Config, service::FilmService, store::FilmStore};

pub struct AppState {
    pub config: Arc<Config>,
    pub films: FilmService,
}

impl AppState {
    pub fn new(config: Arc<Config>, db: DatabaseConnection) -> Self {
        let films = FilmService::new(FilmStore::new(db), config.owner_id);
        Self { config, films }
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    let cors = match state.config.cors_origin.clone() {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_headers([CONTENT_TYPE])
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE]),
        None => CorsLayer::new().allow_origin(Any).allow_headers(Any).allow_methods(Any),
    };

    let api = Router::new()
        .route("/films", get(routes::list_films).post(routes::create_film))
        .route(
            "/films/{id}",
            get(routes::get_film).put(routes::update_film).delete(routes::delete_film),
        )
        .route("/films/{id}/favorite", put(routes::set_favorite))
        .route("/films/{id}/rating", put(routes::set_rating))
        .method_not_allowed_fallback(routes::method_not_allowed);

    Router::new()
        .nest("/api", api)
        .fallback(routes::not_found)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
