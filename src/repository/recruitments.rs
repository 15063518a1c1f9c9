use chrono::NaiveDateTime;
use sqlx::types::Json;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

use crate::error::AppResult;
use crate::filter::{RecruitmentCursor, RecruitmentFilter};
use crate::models::{ApplicantStatus, CompletedRecruitment, NewRecruitment, Recruitment, RecruitmentWithShelter};
use crate::pagination::{Page, PageRequest};
use crate::query::{self, Predicate};

const SELECT_WITH_SHELTER: &str = "SELECT r.id AS id, r.shelter_id AS shelter_id, r.title AS title, \
     r.content AS content, r.capacity AS capacity, r.start_time AS start_time, r.end_time AS end_time, \
     r.deadline AS deadline, r.is_closed AS is_closed, r.image_urls AS image_urls, r.created_at AS created_at, \
     s.name AS shelter_name, s.image_url AS shelter_image_url \
     FROM recruitments r JOIN shelters s ON s.id = r.shelter_id";

const COUNT_WITH_SHELTER: &str =
    "SELECT COUNT(*) FROM recruitments r JOIN shelters s ON s.id = r.shelter_id";

#[derive(Clone)]
pub struct RecruitmentRepository {
    db: SqlitePool,
}

impl RecruitmentRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Opens a transaction for writes that must commit together with a recount.
    pub async fn begin(&self) -> AppResult<Transaction<'static, Sqlite>> {
        Ok(self.db.begin().await?)
    }

    pub async fn insert(
        &self,
        conn: &mut SqliteConnection,
        shelter_id: i64,
        recruitment: &NewRecruitment,
        created_at: NaiveDateTime,
    ) -> AppResult<i64> {
        let res = sqlx::query(
            r#"INSERT INTO recruitments
                (shelter_id, title, content, capacity, start_time, end_time, deadline, is_closed, image_urls, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, ?9)"#,
        )
        .bind(shelter_id)
        .bind(&recruitment.title)
        .bind(&recruitment.content)
        .bind(recruitment.capacity)
        .bind(recruitment.start_time)
        .bind(recruitment.end_time)
        .bind(recruitment.deadline)
        .bind(Json(&recruitment.image_urls))
        .bind(created_at)
        .execute(&mut *conn)
        .await?;
        Ok(res.last_insert_rowid())
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<RecruitmentWithShelter>> {
        let mut qb = query::select_where(SELECT_WITH_SHELTER, &Predicate::eq("r.id", id));
        let row = qb.build_query_as::<RecruitmentWithShelter>().fetch_optional(&self.db).await?;
        Ok(row)
    }

    pub async fn find_by_id_and_shelter(&self, id: i64, shelter_id: i64) -> AppResult<Option<Recruitment>> {
        let row = sqlx::query_as::<_, Recruitment>(
            "SELECT * FROM recruitments WHERE id = ?1 AND shelter_id = ?2",
        )
        .bind(id)
        .bind(shelter_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    pub async fn close(&self, id: i64) -> AppResult<()> {
        sqlx::query("UPDATE recruitments SET is_closed = 1 WHERE id = ?1").bind(id).execute(&self.db).await?;
        Ok(())
    }

    pub async fn delete(&self, conn: &mut SqliteConnection, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM recruitments WHERE id = ?1").bind(id).execute(&mut *conn).await?;
        Ok(())
    }

    /// Matching recruitments, newest first, scoped to `shelter_id` when given.
    pub async fn find_recruitments(
        &self,
        shelter_id: Option<i64>,
        filter: &RecruitmentFilter,
        page: &PageRequest,
    ) -> AppResult<Page<RecruitmentWithShelter>> {
        let predicate = filter.to_predicate(shelter_id);
        let mut qb = query::select_where(SELECT_WITH_SHELTER, &predicate);
        qb.push(" ORDER BY r.created_at DESC, r.id DESC LIMIT ")
            .push_bind(page.fetch_limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        tracing::debug!(sql = qb.sql(), "recruitment search");
        let rows = qb.build_query_as::<RecruitmentWithShelter>().fetch_all(&self.db).await?;
        Ok(Page::from_overfetch(rows, page))
    }

    /// Matching recruitments after `cursor`, newest first. Only the page size of `page` is used.
    pub async fn find_recruitments_after(
        &self,
        filter: &RecruitmentFilter,
        cursor: Option<&RecruitmentCursor>,
        page: &PageRequest,
    ) -> AppResult<Page<RecruitmentWithShelter>> {
        let mut predicate = filter.to_predicate(None);
        if let Some(cursor) = cursor {
            predicate = predicate.and(cursor.to_predicate());
        }
        let mut qb = query::select_where(SELECT_WITH_SHELTER, &predicate);
        qb.push(" ORDER BY r.created_at DESC, r.id DESC LIMIT ").push_bind(page.fetch_limit());
        tracing::debug!(sql = qb.sql(), "recruitment cursor search");
        let rows = qb.build_query_as::<RecruitmentWithShelter>().fetch_all(&self.db).await?;
        Ok(Page::from_overfetch(rows, page))
    }

    pub async fn count_recruitments(&self, shelter_id: Option<i64>, filter: &RecruitmentFilter) -> AppResult<i64> {
        let predicate = filter.to_predicate(shelter_id);
        let mut qb = query::select_where(COUNT_WITH_SHELTER, &predicate);
        let count: i64 = qb.build_query_scalar().fetch_one(&self.db).await?;
        Ok(count)
    }

    /// Recruitments the volunteer attended, latest start first.
    pub async fn find_completed(&self, volunteer_id: i64, page: &PageRequest) -> AppResult<Page<CompletedRecruitment>> {
        let rows = sqlx::query_as::<_, CompletedRecruitment>(
            r#"SELECT r.id AS id, r.shelter_id AS shelter_id, r.title AS title, r.content AS content,
                      r.capacity AS capacity, r.start_time AS start_time, r.end_time AS end_time,
                      r.deadline AS deadline, r.is_closed AS is_closed, r.image_urls AS image_urls,
                      r.created_at AS created_at, s.name AS shelter_name, s.image_url AS shelter_image_url,
                      ap.id AS applicant_id,
                      EXISTS(SELECT 1 FROM reviews rv WHERE rv.applicant_id = ap.id) AS is_review_written
               FROM applicants ap
               JOIN recruitments r ON r.id = ap.recruitment_id
               JOIN shelters s ON s.id = r.shelter_id
               WHERE ap.volunteer_id = ?1 AND ap.status = ?2
               ORDER BY r.start_time DESC, r.id DESC
               LIMIT ?3 OFFSET ?4"#,
        )
        .bind(volunteer_id)
        .bind(ApplicantStatus::Attendance)
        .bind(page.fetch_limit())
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;
        Ok(Page::from_overfetch(rows, page))
    }

    pub async fn count_completed(&self, volunteer_id: i64) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM applicants WHERE volunteer_id = ?1 AND status = ?2")
            .bind(volunteer_id)
            .bind(ApplicantStatus::Attendance)
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    /// Unscoped total number of recruitment rows.
    pub async fn count_all(&self) -> AppResult<i64> {
        let mut conn = self.db.acquire().await?;
        self.count_all_in(&mut conn).await
    }

    /// [`Self::count_all`] on a caller-held connection, seeing its uncommitted writes.
    pub async fn count_all_in(&self, conn: &mut SqliteConnection) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recruitments").fetch_one(&mut *conn).await?;
        Ok(count)
    }
}
