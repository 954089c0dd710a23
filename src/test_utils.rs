use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;

use crate::{AppState, config::Config, db::connect_and_migrate, models::OwnerId};

pub fn test_config() -> Config {
    Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        database_url: "sqlite::memory:".to_string(),
        owner_id: OwnerId(1),
        cors_origin: None,
    }
}

/// Router over a fresh in-memory database.
pub async fn test_app() -> (Router, Arc<AppState>) {
    let config = Arc::new(test_config());
    let db = connect_and_migrate(&config.database_url).await.expect("in-memory database");
    let state = Arc::new(AppState::new(config, db));
    (crate::app(state.clone()), state)
}

/// Like [`test_app`], but also hands back the connection the router writes through.
pub async fn test_app_with_db() -> (Router, DatabaseConnection) {
    let config = Arc::new(test_config());
    let db = connect_and_migrate(&config.database_url).await.expect("in-memory database");
    let state = Arc::new(AppState::new(config, db.clone()));
    (crate::app(state), db)
}

/// Serves the router on an ephemeral local port and returns its API base URL.
pub async fn spawn_server() -> String {
    let (app, _) = test_app().await;
    serve(app).await
}

/// Serves any router on an ephemeral local port and returns its `/api/` base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api/")
}
