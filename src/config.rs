use std::net::SocketAddr;

use anyhow::Context;
use axum::http::HeaderValue;

use crate::models::OwnerId;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    /// Owner assigned to every film written by this deployment.
    pub owner_id: OwnerId,
    /// Browser origin allowed by CORS; `None` allows any origin.
    pub cors_origin: Option<HeaderValue>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3001".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://films.db?mode=rwc".to_string());

        let owner_id: i32 = std::env::var("FILMS_OWNER_ID")
            .unwrap_or_else(|_| "1".to_string())
            .parse()
            .context("FILMS_OWNER_ID")?;

        let cors_origin =
            std::env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let cors_origin = match cors_origin.trim() {
            "*" => None,
            origin => Some(HeaderValue::from_str(origin).context("CORS_ORIGIN")?),
        };

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            owner_id: OwnerId(owner_id),
            cors_origin,
        })
    }
}
