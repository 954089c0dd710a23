use jiff::civil::Date;
use tracing::debug;

use crate::{
    error::{FilmError, FilmResult},
    models::{Film, FilmDraft, FilmFilter, OwnerId},
    store::FilmStore,
};

/// Translates between storage rows and wire films and applies the named
/// list filters.
#[derive(Clone)]
pub struct FilmService {
    store: FilmStore,
    owner: OwnerId,
}

impl FilmService {
    pub fn new(store: FilmStore, owner: OwnerId) -> Self {
        Self { store, owner }
    }

    pub async fn list(&self, filter: Option<&str>) -> FilmResult<Vec<Film>> {
        let today: Date = jiff::Zoned::now().into();
        self.list_as_of(filter, today).await
    }

    /// Unknown filter names fall back to the full list.
    pub async fn list_as_of(&self, filter: Option<&str>, today: Date) -> FilmResult<Vec<Film>> {
        let films = self.store.list_all().await?.into_iter().map(Film::from);

        let filter = match filter {
            Some(name) => FilmFilter::from_name(name).unwrap_or_else(|| {
                debug!(filter = %name, "unknown filter, listing all films");
                FilmFilter::All
            }),
            None => FilmFilter::All,
        };

        let films: Vec<Film> = films.filter(|film| filter.matches(film, today)).collect();
        debug!(filter = filter.name(), count = films.len(), "listed films");
        Ok(films)
    }

    pub async fn get(&self, id: i32) -> FilmResult<Film> {
        self.store.get_by_id(id).await?.map(Film::from).ok_or(FilmError::NotFound)
    }

    pub async fn create(&self, draft: FilmDraft) -> FilmResult<Film> {
        let id = self.store.insert(draft.into_row(self.owner)).await?;
        debug!(film_id = id, "created film");
        self.get(id).await
    }

    pub async fn update(&self, id: i32, draft: FilmDraft) -> FilmResult<Film> {
        let changed = self.store.update(id, draft.into_row(self.owner)).await?;
        if changed != 1 {
            return Err(FilmError::NotFound);
        }
        debug!(film_id = id, "updated film");
        self.get(id).await
    }

    /// Succeeds whether or not a film with `id` existed.
    pub async fn delete(&self, id: i32) -> FilmResult<()> {
        self.store.delete(id).await?;
        debug!(film_id = id, "deleted film");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;
    use crate::db::connect_and_migrate;

    async fn service() -> FilmService {
        let db = connect_and_migrate("sqlite::memory:").await.unwrap();
        FilmService::new(FilmStore::new(db), OwnerId(1))
    }

    fn draft(title: &str, favorite: bool, watch_date: Option<Date>, rating: u8) -> FilmDraft {
        FilmDraft {
            title: title.to_string(),
            favorite,
            watch_date,
            rating,
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let service = service().await;
        let input = draft("Pulp Fiction", true, Some(date(2024, 3, 10)), 5);

        let created = service.create(input.clone()).await.unwrap();
        let fetched = service.get(created.id).await.unwrap();

        assert_eq!(created, fetched);
        assert_eq!(fetched.draft(), input);
        assert_eq!(fetched.user, 1);
    }

    #[tokio::test]
    async fn zero_rating_reads_back_as_zero() {
        let service = service().await;
        let created = service.create(draft("Shrek", false, None, 0)).await.unwrap();
        assert_eq!(created.rating, 0);
        assert_eq!(service.get(created.id).await.unwrap().rating, 0);
    }

    #[tokio::test]
    async fn update_missing_film_leaves_store_untouched() {
        let service = service().await;
        let existing = service.create(draft("Heat", false, None, 3)).await.unwrap();

        let err = service.update(existing.id + 1, draft("Ghost", true, None, 1)).await.unwrap_err();
        assert!(matches!(err, FilmError::NotFound));

        let all = service.list(None).await.unwrap();
        assert_eq!(all, vec![existing]);
    }

    #[tokio::test]
    async fn update_overwrites_every_field() {
        let service = service().await;
        let film = service.create(draft("Heat", false, Some(date(2023, 5, 1)), 3)).await.unwrap();

        let updated = service.update(film.id, draft("Heat (1995)", true, None, 0)).await.unwrap();
        assert_eq!(updated.title, "Heat (1995)");
        assert!(updated.favorite);
        assert_eq!(updated.watch_date, None);
        assert_eq!(updated.rating, 0);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let service = service().await;
        let film = service.create(draft("Matrix", false, None, 0)).await.unwrap();

        service.delete(film.id).await.unwrap();
        service.delete(film.id).await.unwrap();
        service.delete(12_345).await.unwrap();
        assert!(matches!(service.get(film.id).await, Err(FilmError::NotFound)));
    }

    #[tokio::test]
    async fn list_applies_named_filters() {
        let service = service().await;
        let today = date(2024, 3, 20);
        service.create(draft("Pulp Fiction", true, Some(date(2024, 3, 10)), 5)).await.unwrap();
        service.create(draft("21 Grams", true, Some(date(2024, 1, 17)), 4)).await.unwrap();
        service.create(draft("Star Wars", false, None, 0)).await.unwrap();
        service.create(draft("Matrix", false, None, 0)).await.unwrap();
        service.create(draft("Shrek", false, Some(date(2024, 2, 21)), 3)).await.unwrap();

        let titles = |films: Vec<Film>| films.into_iter().map(|f| f.title).collect::<Vec<_>>();

        assert_eq!(
            titles(service.list_as_of(Some("favorites"), today).await.unwrap()),
            vec!["Pulp Fiction", "21 Grams"]
        );
        assert_eq!(
            titles(service.list_as_of(Some("best"), today).await.unwrap()),
            vec!["Pulp Fiction"]
        );
        assert_eq!(
            titles(service.list_as_of(Some("seen-last-month"), today).await.unwrap()),
            vec!["Pulp Fiction", "Shrek"]
        );
        assert_eq!(
            titles(service.list_as_of(Some("unseen"), today).await.unwrap()),
            vec!["Star Wars", "Matrix"]
        );
        assert_eq!(service.list_as_of(None, today).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn unknown_filter_lists_everything() {
        let service = service().await;
        service.create(draft("Pulp Fiction", true, None, 5)).await.unwrap();
        service.create(draft("Matrix", false, None, 0)).await.unwrap();

        let all = service.list(None).await.unwrap();
        assert_eq!(service.list(Some("constructor")).await.unwrap(), all);
        assert_eq!(service.list(Some("")).await.unwrap(), all);
    }
}
