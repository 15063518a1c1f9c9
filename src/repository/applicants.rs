use chrono::{NaiveDate, NaiveDateTime};
use sqlx::SqlitePool;

use crate::error::AppResult;
use crate::models::{Applicant, ApplicantStatus, Gender};

/// One application of a volunteer, with the recruitment and shelter it targets.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApplyingRecruitment {
    pub applicant_id: i64,
    pub recruitment_id: i64,
    pub shelter_id: i64,
    pub title: String,
    pub shelter_name: String,
    pub start_time: NaiveDateTime,
    pub status: ApplicantStatus,
    pub is_review_written: bool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApprovedApplicant {
    pub applicant_id: i64,
    pub volunteer_id: i64,
    pub name: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub phone_number: String,
    pub status: ApplicantStatus,
}

#[derive(Clone)]
pub struct ApplicantRepository {
    db: SqlitePool,
}

impl ApplicantRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn exists(&self, recruitment_id: i64, volunteer_id: i64) -> AppResult<bool> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM applicants WHERE recruitment_id = ?1 AND volunteer_id = ?2")
                .bind(recruitment_id)
                .bind(volunteer_id)
                .fetch_optional(&self.db)
                .await?;
        Ok(found.is_some())
    }

    pub async fn insert(&self, recruitment_id: i64, volunteer_id: i64, created_at: NaiveDateTime) -> AppResult<i64> {
        let res = sqlx::query(
            "INSERT INTO applicants (recruitment_id, volunteer_id, status, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(recruitment_id)
        .bind(volunteer_id)
        .bind(ApplicantStatus::Pending)
        .bind(created_at)
        .execute(&self.db)
        .await?;
        Ok(res.last_insert_rowid())
    }

    /// Applications of a volunteer, most recent recruitment first.
    pub async fn find_applying(&self, volunteer_id: i64) -> AppResult<Vec<ApplyingRecruitment>> {
        let rows = sqlx::query_as::<_, ApplyingRecruitment>(
            r#"SELECT ap.id AS applicant_id, r.id AS recruitment_id, s.id AS shelter_id,
                      r.title AS title, s.name AS shelter_name, r.start_time AS start_time,
                      ap.status AS status,
                      EXISTS(SELECT 1 FROM reviews rv WHERE rv.applicant_id = ap.id) AS is_review_written
               FROM applicants ap
               JOIN recruitments r ON r.id = ap.recruitment_id
               JOIN shelters s ON s.id = r.shelter_id
               WHERE ap.volunteer_id = ?1
               ORDER BY r.start_time DESC, ap.id DESC"#,
        )
        .bind(volunteer_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    /// Approved applicants of a recruitment, only when the shelter owns it.
    pub async fn find_approved(&self, recruitment_id: i64, shelter_id: i64) -> AppResult<Vec<ApprovedApplicant>> {
        let rows = sqlx::query_as::<_, ApprovedApplicant>(
            r#"SELECT ap.id AS applicant_id, v.id AS volunteer_id, v.name AS name,
                      v.birth_date AS birth_date, v.gender AS gender, v.phone_number AS phone_number,
                      ap.status AS status
               FROM applicants ap
               JOIN recruitments r ON r.id = ap.recruitment_id
               JOIN volunteers v ON v.id = ap.volunteer_id
               WHERE ap.recruitment_id = ?1 AND r.shelter_id = ?2 AND ap.status = ?3
               ORDER BY ap.id"#,
        )
        .bind(recruitment_id)
        .bind(shelter_id)
        .bind(ApplicantStatus::Approved)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id_and_shelter(&self, id: i64, shelter_id: i64) -> AppResult<Option<Applicant>> {
        let row = sqlx::query_as::<_, Applicant>(
            r#"SELECT ap.* FROM applicants ap
               JOIN recruitments r ON r.id = ap.recruitment_id
               WHERE ap.id = ?1 AND r.shelter_id = ?2"#,
        )
        .bind(id)
        .bind(shelter_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    pub async fn find_by_id_and_volunteer(&self, id: i64, volunteer_id: i64) -> AppResult<Option<Applicant>> {
        let row = sqlx::query_as::<_, Applicant>("SELECT * FROM applicants WHERE id = ?1 AND volunteer_id = ?2")
            .bind(id)
            .bind(volunteer_id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    pub async fn update_status(&self, id: i64, status: ApplicantStatus) -> AppResult<()> {
        sqlx::query("UPDATE applicants SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}
