use crate::error::{AppError, AppResult, OptionExt};
use crate::metrics::Metrics;
use crate::models::{ApplicantStatus, NewReview};
use crate::pagination::{PageInfo, PageRequest};
use crate::repository::{ApplicantRepository, ReviewRepository, ShelterRepository, VolunteerRepository};
use crate::types::{
    RegisterReviewRequest, ReviewPageResponse, ReviewResponse, ShelterReviewResponse, VolunteerReviewResponse,
};

use super::now;

#[derive(Clone)]
pub struct ReviewService {
    reviews: ReviewRepository,
    applicants: ApplicantRepository,
    shelters: ShelterRepository,
    volunteers: VolunteerRepository,
    metrics: Metrics,
}

impl ReviewService {
    pub fn new(
        reviews: ReviewRepository,
        applicants: ApplicantRepository,
        shelters: ShelterRepository,
        volunteers: VolunteerRepository,
        metrics: Metrics,
    ) -> Self {
        Self { reviews, applicants, shelters, volunteers, metrics }
    }

    pub async fn find_review(&self, volunteer_id: i64, review_id: i64) -> AppResult<ReviewResponse> {
        let review = self.reviews.find_by_id_and_volunteer(review_id, volunteer_id).await?.ok_or_not_found("Review")?;
        Ok(review.into())
    }

    pub async fn find_shelter_reviews(
        &self,
        shelter_id: i64,
        page: &PageRequest,
    ) -> AppResult<ReviewPageResponse<ShelterReviewResponse>> {
        self.shelters.find_by_id(shelter_id).await?.ok_or_not_found("Shelter")?;
        let rows = self.reviews.find_by_shelter(shelter_id, page).await?;
        let total = self.reviews.count_by_shelter(shelter_id).await?;
        Ok(ReviewPageResponse {
            page_info: PageInfo::of(total, rows.has_next),
            reviews: rows.items.into_iter().map(Into::into).collect(),
        })
    }

    pub async fn find_volunteer_reviews(
        &self,
        volunteer_id: i64,
        page: &PageRequest,
    ) -> AppResult<ReviewPageResponse<VolunteerReviewResponse>> {
        self.volunteers.find_by_id(volunteer_id).await?.ok_or_not_found("Volunteer")?;
        let rows = self.reviews.find_by_volunteer(volunteer_id, page).await?;
        let total = self.reviews.count_by_volunteer(volunteer_id).await?;
        Ok(ReviewPageResponse {
            page_info: PageInfo::of(total, rows.has_next),
            reviews: rows.items.into_iter().map(Into::into).collect(),
        })
    }

    /// Only an attended application can be reviewed, and only once.
    pub async fn register_review(&self, volunteer_id: i64, request: RegisterReviewRequest) -> AppResult<i64> {
        let applicant = self
            .applicants
            .find_by_id_and_volunteer(request.applicant_id, volunteer_id)
            .await?
            .ok_or_not_found("Applicant")?;
        if applicant.status != ApplicantStatus::Attendance {
            return Err(AppError::BadRequest("Only attended volunteering can be reviewed".to_string()));
        }
        if self.reviews.exists_for_applicant(applicant.id).await? {
            return Err(AppError::Conflict("Review already exists for this application".to_string()));
        }
        let review = NewReview::new(&request.content, request.image_urls)?;
        let id = self.reviews.insert(applicant.id, &review, now()).await?;
        self.metrics.inc_reviews_registered();
        tracing::info!(volunteer_id, applicant_id = applicant.id, review_id = id, "review registered");
        Ok(id)
    }
}
