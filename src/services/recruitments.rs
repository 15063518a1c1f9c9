use crate::cache::RecruitmentCountCache;
use crate::error::{AppResult, OptionExt};
use crate::filter::{RecruitmentCursor, RecruitmentFilter};
use crate::metrics::Metrics;
use crate::models::NewRecruitment;
use crate::pagination::{PageInfo, PageRequest};
use crate::repository::{RecruitmentRepository, ShelterRepository, VolunteerRepository};
use crate::types::{
    CompletedRecruitmentPageResponse, RecruitmentDetailResponse, RecruitmentPageResponse, RegisterRecruitmentRequest,
};

use super::now;

#[derive(Clone)]
pub struct RecruitmentService {
    recruitments: RecruitmentRepository,
    shelters: ShelterRepository,
    volunteers: VolunteerRepository,
    count_cache: RecruitmentCountCache,
    count_key: String,
    metrics: Metrics,
}

impl RecruitmentService {
    pub fn new(
        recruitments: RecruitmentRepository,
        shelters: ShelterRepository,
        volunteers: VolunteerRepository,
        count_cache: RecruitmentCountCache,
        count_key: String,
        metrics: Metrics,
    ) -> Self {
        Self { recruitments, shelters, volunteers, count_cache, count_key, metrics }
    }

    /// Inserts the recruitment and recounts in one transaction; the cache is written after commit.
    pub async fn register_recruitment(&self, shelter_id: i64, request: RegisterRecruitmentRequest) -> AppResult<i64> {
        self.shelters.find_by_id(shelter_id).await?.ok_or_not_found("Shelter")?;
        let recruitment = NewRecruitment::new(
            &request.title,
            &request.content,
            request.capacity,
            request.start_time,
            request.end_time,
            request.deadline,
            request.image_urls,
        )?;

        let mut tx = self.recruitments.begin().await?;
        let id = self.recruitments.insert(&mut tx, shelter_id, &recruitment, now()).await?;
        let count = self.recruitments.count_all_in(&mut tx).await?;
        tx.commit().await?;

        self.count_cache.register_recruitment_count(&self.count_key, count).await;
        self.metrics.inc_recruitments_registered();
        tracing::info!(shelter_id, recruitment_id = id, count, "recruitment registered");
        Ok(id)
    }

    pub async fn find_recruitment_detail(&self, recruitment_id: i64) -> AppResult<RecruitmentDetailResponse> {
        let row = self.recruitments.find_by_id(recruitment_id).await?.ok_or_not_found("Recruitment")?;
        Ok(row.into())
    }

    /// A shelter's own recruitments.
    pub async fn find_recruitments_by_shelter(
        &self,
        shelter_id: i64,
        filter: &RecruitmentFilter,
        page: &PageRequest,
    ) -> AppResult<RecruitmentPageResponse> {
        let rows = self.recruitments.find_recruitments(Some(shelter_id), filter, page).await?;
        let total = self.recruitments.count_recruitments(Some(shelter_id), filter).await?;
        Ok(RecruitmentPageResponse {
            page_info: PageInfo::of(total, rows.has_next),
            recruitments: rows.items.into_iter().map(Into::into).collect(),
        })
    }

    /// Recruitments of every shelter. The unfiltered total is served from the count cache.
    pub async fn find_recruitments(
        &self,
        filter: &RecruitmentFilter,
        page: &PageRequest,
    ) -> AppResult<RecruitmentPageResponse> {
        let rows = self.recruitments.find_recruitments(None, filter, page).await?;
        let total = self.count_recruitments(filter).await?;
        Ok(RecruitmentPageResponse {
            page_info: PageInfo::of(total, rows.has_next),
            recruitments: rows.items.into_iter().map(Into::into).collect(),
        })
    }

    /// Cursor-paged variant of [`Self::find_recruitments`]. The total ignores the cursor.
    pub async fn find_recruitments_v2(
        &self,
        filter: &RecruitmentFilter,
        cursor: Option<RecruitmentCursor>,
        page: &PageRequest,
    ) -> AppResult<RecruitmentPageResponse> {
        let rows = self.recruitments.find_recruitments_after(filter, cursor.as_ref(), page).await?;
        let total = self.count_recruitments(filter).await?;
        Ok(RecruitmentPageResponse {
            page_info: PageInfo::of(total, rows.has_next),
            recruitments: rows.items.into_iter().map(Into::into).collect(),
        })
    }

    async fn count_recruitments(&self, filter: &RecruitmentFilter) -> AppResult<i64> {
        if filter.is_unfiltered() {
            self.count_cache.get_or_recount(&self.count_key).await
        } else {
            self.recruitments.count_recruitments(None, filter).await
        }
    }

    /// Recruitments the volunteer attended.
    pub async fn find_completed_recruitments(
        &self,
        volunteer_id: i64,
        page: &PageRequest,
    ) -> AppResult<CompletedRecruitmentPageResponse> {
        self.volunteers.find_by_id(volunteer_id).await?.ok_or_not_found("Volunteer")?;
        let rows = self.recruitments.find_completed(volunteer_id, page).await?;
        let total = self.recruitments.count_completed(volunteer_id).await?;
        Ok(CompletedRecruitmentPageResponse {
            page_info: PageInfo::of(total, rows.has_next),
            recruitments: rows.items.into_iter().map(Into::into).collect(),
        })
    }

    pub async fn close_recruitment(&self, shelter_id: i64, recruitment_id: i64) -> AppResult<()> {
        self.recruitments
            .find_by_id_and_shelter(recruitment_id, shelter_id)
            .await?
            .ok_or_not_found("Recruitment")?;
        self.recruitments.close(recruitment_id).await?;
        tracing::info!(shelter_id, recruitment_id, "recruitment closed");
        Ok(())
    }

    pub async fn delete_recruitment(&self, shelter_id: i64, recruitment_id: i64) -> AppResult<()> {
        self.recruitments
            .find_by_id_and_shelter(recruitment_id, shelter_id)
            .await?
            .ok_or_not_found("Recruitment")?;

        let mut tx = self.recruitments.begin().await?;
        self.recruitments.delete(&mut tx, recruitment_id).await?;
        let count = self.recruitments.count_all_in(&mut tx).await?;
        tx.commit().await?;

        self.count_cache.register_recruitment_count(&self.count_key, count).await;
        tracing::info!(shelter_id, recruitment_id, count, "recruitment deleted");
        Ok(())
    }
}
