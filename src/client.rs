//! Typed access to the films API for Rust consumers.
//!
//! Dates are [`jiff::civil::Date`] in memory and `YYYY-MM-DD` on the wire.
//! Every failure is reported as a [`ClientError`], which renders to the same
//! `{"error": "..."}` shape the server uses.

use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::json;
use tracing::debug;

use crate::models::{ErrorBody, Film, FilmDraft, FilmFilter};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001/api/";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("Cannot communicate")]
    Unreachable,
    /// A response arrived but its body was not the expected JSON.
    #[error("Cannot parse server response")]
    Parse,
    /// The server answered with an error object.
    #[error("{message}")]
    Server { status: u16, message: String },
}

impl ClientError {
    pub fn body(&self) -> ErrorBody {
        ErrorBody { error: self.to_string() }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Clone)]
pub struct FilmClient {
    http: wreq::Client,
    base_url: String,
}

impl FilmClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, wreq::Error> {
        let http = wreq::Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: wreq::Client, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Lists films under a raw filter name. The server treats names it does
    /// not know, legacy `filter-*` aliases aside, as no filter at all.
    pub async fn list(&self, filter: Option<&str>) -> ClientResult<Vec<Film>> {
        let mut req = self.http.get(self.url("films"));
        if let Some(name) = filter {
            req = req.query(&[("filter", name)]);
        }
        read_json(req.send().await).await
    }

    pub async fn list_by(&self, filter: FilmFilter) -> ClientResult<Vec<Film>> {
        let name = (filter != FilmFilter::All).then_some(filter.name());
        self.list(name).await
    }

    pub async fn get(&self, id: i32) -> ClientResult<Film> {
        read_json(self.http.get(self.url(&format!("films/{id}"))).send().await).await
    }

    pub async fn create(&self, draft: &FilmDraft) -> ClientResult<Film> {
        read_json(self.http.post(self.url("films")).json(draft).send().await).await
    }

    pub async fn update(&self, film: &Film) -> ClientResult<Film> {
        self.put(&format!("films/{}", film.id), film).await
    }

    pub async fn set_favorite(&self, id: i32, favorite: bool) -> ClientResult<Film> {
        self.put(&format!("films/{id}/favorite"), &json!({ "id": id, "favorite": favorite })).await
    }

    pub async fn set_rating(&self, id: i32, rating: u8) -> ClientResult<Film> {
        self.put(&format!("films/{id}/rating"), &json!({ "id": id, "rating": rating })).await
    }

    pub async fn delete(&self, id: i32) -> ClientResult<()> {
        let _: serde_json::Value =
            read_json(self.http.delete(self.url(&format!("films/{id}"))).send().await).await?;
        Ok(())
    }

    async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<Film> {
        read_json(self.http.put(self.url(path)).json(body).send().await).await
    }
}

/// The server always answers with JSON, so a body that fails to parse is a
/// protocol error in both the success and the failure case.
async fn read_json<T: DeserializeOwned>(
    sent: Result<wreq::Response, wreq::Error>,
) -> ClientResult<T> {
    let resp = sent.map_err(|err| {
        debug!(error = %err, "request failed");
        ClientError::Unreachable
    })?;

    let status = resp.status();
    if status.is_success() {
        return resp.json::<T>().await.map_err(|err| {
            debug!(error = %err, "unreadable response");
            ClientError::Parse
        });
    }

    let body: ErrorBody = resp.json().await.map_err(|_| ClientError::Parse)?;
    Err(ClientError::Server { status: status.as_u16(), message: body.error })
}
