use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::film;

/// A film row as written to storage, without the store-assigned id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilmRow {
    pub title: String,
    pub favorite: bool,
    pub watchdate: Option<String>,
    pub rating: Option<i32>,
    pub user: i32,
}

/// Row-level access to the `films` table. Every call is a single statement;
/// errors are handed back untouched and never retried here.
#[derive(Clone)]
pub struct FilmStore {
    db: DatabaseConnection,
}

impl FilmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_all(&self) -> Result<Vec<film::Model>, DbErr> {
        film::Entity::find().order_by_asc(film::Column::Id).all(&self.db).await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<film::Model>, DbErr> {
        film::Entity::find_by_id(id).one(&self.db).await
    }

    pub async fn insert(&self, row: FilmRow) -> Result<i32, DbErr> {
        let model = film::ActiveModel {
            id: NotSet,
            title: Set(row.title),
            favorite: Set(row.favorite),
            watchdate: Set(row.watchdate),
            rating: Set(row.rating),
            user: Set(row.user),
        };

        let res = film::Entity::insert(model).exec(&self.db).await?;
        Ok(res.last_insert_id)
    }

    /// Overwrites the editable columns of `id`. The owning user is left as stored.
    pub async fn update(&self, id: i32, row: FilmRow) -> Result<u64, DbErr> {
        let model = film::ActiveModel {
            id: NotSet,
            title: Set(row.title),
            favorite: Set(row.favorite),
            watchdate: Set(row.watchdate),
            rating: Set(row.rating),
            user: NotSet,
        };

        let res = film::Entity::update_many()
            .set(model)
            .filter(film::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected)
    }

    pub async fn delete(&self, id: i32) -> Result<(), DbErr> {
        film::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}
