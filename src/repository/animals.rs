use chrono::{NaiveDate, NaiveDateTime};
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::error::AppResult;
use crate::filter::AnimalFilter;
use crate::models::{Animal, AnimalDraft};
use crate::pagination::{Page, PageRequest};
use crate::query::{self, Predicate};

/// An animal joined with the shelter that houses it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnimalWithShelter {
    #[sqlx(flatten)]
    pub animal: Animal,
    pub shelter_name: String,
    pub shelter_address: String,
}

const SELECT_WITH_SHELTER: &str = "SELECT a.id AS id, a.shelter_id AS shelter_id, a.name AS name, \
     a.birth_date AS birth_date, a.animal_type AS animal_type, a.breed AS breed, a.gender AS gender, \
     a.is_neutered AS is_neutered, a.active AS active, a.weight AS weight, a.information AS information, \
     a.is_adopted AS is_adopted, a.image_urls AS image_urls, a.created_at AS created_at, \
     s.name AS shelter_name, s.address AS shelter_address \
     FROM animals a JOIN shelters s ON s.id = a.shelter_id";

const COUNT_WITH_SHELTER: &str = "SELECT COUNT(*) FROM animals a JOIN shelters s ON s.id = a.shelter_id";

#[derive(Clone)]
pub struct AnimalRepository {
    db: SqlitePool,
}

impl AnimalRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn insert(&self, shelter_id: i64, draft: &AnimalDraft, created_at: NaiveDateTime) -> AppResult<i64> {
        let res = sqlx::query(
            r#"INSERT INTO animals
                (shelter_id, name, birth_date, animal_type, breed, gender, is_neutered, active,
                 weight, information, is_adopted, image_urls, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 0, ?11, ?12)"#,
        )
        .bind(shelter_id)
        .bind(&draft.name)
        .bind(draft.birth_date)
        .bind(draft.animal_type)
        .bind(&draft.breed)
        .bind(draft.gender)
        .bind(draft.is_neutered)
        .bind(draft.active)
        .bind(draft.weight)
        .bind(&draft.information)
        .bind(Json(&draft.image_urls))
        .bind(created_at)
        .execute(&self.db)
        .await?;
        Ok(res.last_insert_rowid())
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<AnimalWithShelter>> {
        let mut qb = query::select_where(SELECT_WITH_SHELTER, &Predicate::eq("a.id", id));
        let row = qb.build_query_as::<AnimalWithShelter>().fetch_optional(&self.db).await?;
        Ok(row)
    }

    pub async fn find_by_id_and_shelter(&self, id: i64, shelter_id: i64) -> AppResult<Option<Animal>> {
        let row = sqlx::query_as::<_, Animal>("SELECT * FROM animals WHERE id = ?1 AND shelter_id = ?2")
            .bind(id)
            .bind(shelter_id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    /// Filtered animals, newest first. `adoptable_only` hides adopted animals.
    pub async fn find_animals(
        &self,
        shelter_id: Option<i64>,
        adoptable_only: bool,
        filter: &AnimalFilter,
        today: NaiveDate,
        page: &PageRequest,
    ) -> AppResult<Page<AnimalWithShelter>> {
        let predicate = filter.to_predicate(shelter_id, adoptable_only, today);
        let mut qb = query::select_where(SELECT_WITH_SHELTER, &predicate);
        qb.push(" ORDER BY a.created_at DESC, a.id DESC LIMIT ")
            .push_bind(page.fetch_limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        tracing::debug!(sql = qb.sql(), "animal search");
        let rows = qb.build_query_as::<AnimalWithShelter>().fetch_all(&self.db).await?;
        Ok(Page::from_overfetch(rows, page))
    }

    pub async fn count_animals(
        &self,
        shelter_id: Option<i64>,
        adoptable_only: bool,
        filter: &AnimalFilter,
        today: NaiveDate,
    ) -> AppResult<i64> {
        let predicate = filter.to_predicate(shelter_id, adoptable_only, today);
        let mut qb = query::select_where(COUNT_WITH_SHELTER, &predicate);
        let count: i64 = qb.build_query_scalar().fetch_one(&self.db).await?;
        Ok(count)
    }

    /// Replaces every mutable field, including the image list.
    pub async fn update(&self, id: i64, draft: &AnimalDraft) -> AppResult<()> {
        sqlx::query(
            r#"UPDATE animals
               SET name = ?2, birth_date = ?3, animal_type = ?4, breed = ?5, gender = ?6,
                   is_neutered = ?7, active = ?8, weight = ?9, information = ?10, image_urls = ?11
               WHERE id = ?1"#,
        )
        .bind(id)
        .bind(&draft.name)
        .bind(draft.birth_date)
        .bind(draft.animal_type)
        .bind(&draft.breed)
        .bind(draft.gender)
        .bind(draft.is_neutered)
        .bind(draft.active)
        .bind(draft.weight)
        .bind(&draft.information)
        .bind(Json(&draft.image_urls))
        .execute(&self.db)
        .await?;
        Ok(())
    }

    pub async fn update_adopt_status(&self, id: i64, is_adopted: bool) -> AppResult<()> {
        sqlx::query("UPDATE animals SET is_adopted = ?2 WHERE id = ?1")
            .bind(id)
            .bind(is_adopted)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM animals WHERE id = ?1").bind(id).execute(&self.db).await?;
        Ok(())
    }
}
