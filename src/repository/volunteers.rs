use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use crate::error::AppResult;
use crate::models::{ApplicantStatus, NewVolunteer, Volunteer, VolunteerProfile};

#[derive(Clone)]
pub struct VolunteerRepository {
    db: SqlitePool,
}

impl VolunteerRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn insert(&self, volunteer: &NewVolunteer, created_at: NaiveDateTime) -> AppResult<i64> {
        let profile = &volunteer.profile;
        let res = sqlx::query(
            r#"INSERT INTO volunteers
                (email, name, birth_date, phone_number, gender, temperature, image_url, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
        )
        .bind(&volunteer.email)
        .bind(&profile.name)
        .bind(profile.birth_date)
        .bind(&profile.phone_number)
        .bind(profile.gender)
        .bind(NewVolunteer::INITIAL_TEMPERATURE)
        .bind(&profile.image_url)
        .bind(created_at)
        .execute(&self.db)
        .await?;
        Ok(res.last_insert_rowid())
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Volunteer>> {
        let row = sqlx::query_as::<_, Volunteer>("SELECT * FROM volunteers WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    pub async fn update_profile(&self, id: i64, profile: &VolunteerProfile) -> AppResult<()> {
        sqlx::query(
            r#"UPDATE volunteers
               SET name = ?2, birth_date = ?3, phone_number = ?4, gender = ?5, image_url = ?6
               WHERE id = ?1"#,
        )
        .bind(id)
        .bind(&profile.name)
        .bind(profile.birth_date)
        .bind(&profile.phone_number)
        .bind(profile.gender)
        .bind(&profile.image_url)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    /// Number of applications of this volunteer in `status`.
    pub async fn count_applications_with_status(&self, id: i64, status: ApplicantStatus) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM applicants WHERE volunteer_id = ?1 AND status = ?2")
                .bind(id)
                .bind(status)
                .fetch_one(&self.db)
                .await?;
        Ok(count)
    }
}
