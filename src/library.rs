use crate::{
    client::{ClientError, ClientResult, FilmClient},
    models::{Film, FilmDraft, FilmFilter},
};

/// Client-side view of the film list.
///
/// Mutations never patch `films` in place. They mark the view dirty and the
/// next [`FilmLibrary::refresh`] re-fetches the list for the active filter.
pub struct FilmLibrary {
    client: FilmClient,
    filter: FilmFilter,
    films: Vec<Film>,
    dirty: bool,
    message: Option<String>,
}

impl FilmLibrary {
    pub fn new(client: FilmClient) -> Self {
        Self {
            client,
            filter: FilmFilter::All,
            films: Vec::new(),
            dirty: true,
            message: None,
        }
    }

    pub fn films(&self) -> &[Film] {
        &self.films
    }

    pub fn filter(&self) -> FilmFilter {
        self.filter
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Last error reported by any operation, cleared once taken.
    pub fn take_message(&mut self) -> Option<String> {
        self.message.take()
    }

    pub fn select_filter(&mut self, filter: FilmFilter) {
        if self.filter != filter {
            self.filter = filter;
            self.dirty = true;
        }
    }

    /// Re-fetches the list if needed. Returns whether a fetch succeeded.
    pub async fn refresh(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        match self.client.list_by(self.filter).await {
            Ok(films) => {
                self.films = films;
                self.dirty = false;
                true
            },
            Err(err) => {
                self.record(&err);
                false
            },
        }
    }

    pub async fn add(&mut self, mut draft: FilmDraft) -> ClientResult<Film> {
        draft.title = draft.title.trim().to_string();
        let result = self.client.create(&draft).await;
        self.settle(result)
    }

    pub async fn edit(&mut self, mut film: Film) -> ClientResult<Film> {
        film.title = film.title.trim().to_string();
        let result = self.client.update(&film).await;
        self.settle(result)
    }

    pub async fn set_favorite(&mut self, id: i32, favorite: bool) -> ClientResult<Film> {
        let result = self.client.set_favorite(id, favorite).await;
        self.settle(result)
    }

    pub async fn rate(&mut self, id: i32, rating: u8) -> ClientResult<Film> {
        let result = self.client.set_rating(id, rating).await;
        self.settle(result)
    }

    pub async fn remove(&mut self, id: i32) -> ClientResult<()> {
        let result = self.client.delete(id).await;
        self.settle(result)
    }

    fn settle<T>(&mut self, result: ClientResult<T>) -> ClientResult<T> {
        match &result {
            Ok(_) => self.dirty = true,
            Err(err) => self.record(err),
        }
        result
    }

    fn record(&mut self, err: &ClientError) {
        tracing::warn!(error = %err, "film library operation failed");
        self.message = Some(err.to_string());
    }
}
