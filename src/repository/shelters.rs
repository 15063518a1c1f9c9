use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use crate::error::AppResult;
use crate::models::{NewShelter, Shelter};

#[derive(Clone)]
pub struct ShelterRepository {
    db: SqlitePool,
}

impl ShelterRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn insert(&self, shelter: &NewShelter, created_at: NaiveDateTime) -> AppResult<i64> {
        let res = sqlx::query(
            r#"INSERT INTO shelters
                (email, name, address, address_detail, is_opened_address, phone_number, image_url, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
        )
        .bind(&shelter.email)
        .bind(&shelter.name)
        .bind(&shelter.address.address)
        .bind(&shelter.address.address_detail)
        .bind(shelter.address.is_opened_address)
        .bind(&shelter.phone_number)
        .bind(&shelter.image_url)
        .bind(created_at)
        .execute(&self.db)
        .await?;
        Ok(res.last_insert_rowid())
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Shelter>> {
        let row = sqlx::query_as::<_, Shelter>("SELECT * FROM shelters WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }
}
