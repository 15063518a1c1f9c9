use chrono::NaiveDateTime;
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::error::AppResult;
use crate::models::{NewReview, Review};
use crate::pagination::{Page, PageRequest};

/// A review as listed on a shelter page, with the volunteer who wrote it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShelterReview {
    #[sqlx(flatten)]
    pub review: Review,
    pub volunteer_id: i64,
    pub volunteer_name: String,
    pub volunteer_temperature: i64,
    pub volunteer_image_url: Option<String>,
}

/// A review as listed on a volunteer page, with the shelter it concerns.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VolunteerReview {
    #[sqlx(flatten)]
    pub review: Review,
    pub shelter_id: i64,
    pub shelter_name: String,
}

const REVIEW_COLUMNS: &str = "rv.id AS id, rv.applicant_id AS applicant_id, rv.content AS content, \
     rv.image_urls AS image_urls, rv.created_at AS created_at";

#[derive(Clone)]
pub struct ReviewRepository {
    db: SqlitePool,
}

impl ReviewRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn insert(&self, applicant_id: i64, review: &NewReview, created_at: NaiveDateTime) -> AppResult<i64> {
        let res = sqlx::query(
            "INSERT INTO reviews (applicant_id, content, image_urls, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(applicant_id)
        .bind(&review.content)
        .bind(Json(&review.image_urls))
        .bind(created_at)
        .execute(&self.db)
        .await?;
        Ok(res.last_insert_rowid())
    }

    pub async fn exists_for_applicant(&self, applicant_id: i64) -> AppResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM reviews WHERE applicant_id = ?1")
            .bind(applicant_id)
            .fetch_optional(&self.db)
            .await?;
        Ok(found.is_some())
    }

    pub async fn find_by_id_and_volunteer(&self, id: i64, volunteer_id: i64) -> AppResult<Option<Review>> {
        let sql = format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews rv \
             JOIN applicants ap ON ap.id = rv.applicant_id \
             WHERE rv.id = ?1 AND ap.volunteer_id = ?2"
        );
        let row = sqlx::query_as::<_, Review>(&sql)
            .bind(id)
            .bind(volunteer_id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    pub async fn find_by_shelter(&self, shelter_id: i64, page: &PageRequest) -> AppResult<Page<ShelterReview>> {
        let sql = format!(
            "SELECT {REVIEW_COLUMNS}, v.id AS volunteer_id, v.name AS volunteer_name, \
                    v.temperature AS volunteer_temperature, v.image_url AS volunteer_image_url \
             FROM reviews rv \
             JOIN applicants ap ON ap.id = rv.applicant_id \
             JOIN recruitments r ON r.id = ap.recruitment_id \
             JOIN volunteers v ON v.id = ap.volunteer_id \
             WHERE r.shelter_id = ?1 \
             ORDER BY rv.created_at DESC, rv.id DESC LIMIT ?2 OFFSET ?3"
        );
        let rows = sqlx::query_as::<_, ShelterReview>(&sql)
            .bind(shelter_id)
            .bind(page.fetch_limit())
            .bind(page.offset())
            .fetch_all(&self.db)
            .await?;
        Ok(Page::from_overfetch(rows, page))
    }

    pub async fn count_by_shelter(&self, shelter_id: i64) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM reviews rv
               JOIN applicants ap ON ap.id = rv.applicant_id
               JOIN recruitments r ON r.id = ap.recruitment_id
               WHERE r.shelter_id = ?1"#,
        )
        .bind(shelter_id)
        .fetch_one(&self.db)
        .await?;
        Ok(count)
    }

    pub async fn find_by_volunteer(&self, volunteer_id: i64, page: &PageRequest) -> AppResult<Page<VolunteerReview>> {
        let sql = format!(
            "SELECT {REVIEW_COLUMNS}, s.id AS shelter_id, s.name AS shelter_name \
             FROM reviews rv \
             JOIN applicants ap ON ap.id = rv.applicant_id \
             JOIN recruitments r ON r.id = ap.recruitment_id \
             JOIN shelters s ON s.id = r.shelter_id \
             WHERE ap.volunteer_id = ?1 \
             ORDER BY rv.created_at DESC, rv.id DESC LIMIT ?2 OFFSET ?3"
        );
        let rows = sqlx::query_as::<_, VolunteerReview>(&sql)
            .bind(volunteer_id)
            .bind(page.fetch_limit())
            .bind(page.offset())
            .fetch_all(&self.db)
            .await?;
        Ok(Page::from_overfetch(rows, page))
    }

    pub async fn count_by_volunteer(&self, volunteer_id: i64) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reviews rv JOIN applicants ap ON ap.id = rv.applicant_id WHERE ap.volunteer_id = ?1",
        )
        .bind(volunteer_id)
        .fetch_one(&self.db)
        .await?;
        Ok(count)
    }
}
