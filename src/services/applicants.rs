use crate::error::{AppError, AppResult, OptionExt};
use crate::metrics::Metrics;
use crate::models::ApplicantStatus;
use crate::repository::{ApplicantRepository, RecruitmentRepository, VolunteerRepository};
use crate::types::{ApplyingVolunteersResponse, ApprovedApplicantsResponse};

use super::now;

#[derive(Clone)]
pub struct ApplicantService {
    applicants: ApplicantRepository,
    recruitments: RecruitmentRepository,
    volunteers: VolunteerRepository,
    metrics: Metrics,
}

impl ApplicantService {
    pub fn new(
        applicants: ApplicantRepository,
        recruitments: RecruitmentRepository,
        volunteers: VolunteerRepository,
        metrics: Metrics,
    ) -> Self {
        Self { applicants, recruitments, volunteers, metrics }
    }

    /// Records a pending application of `volunteer_id` to `recruitment_id`.
    ///
    /// Applying twice is a conflict. The check runs first; the UNIQUE constraint on
    /// `(recruitment_id, volunteer_id)` catches a concurrent duplicate.
    pub async fn register_applicant(&self, recruitment_id: i64, volunteer_id: i64) -> AppResult<i64> {
        let recruitment = self.recruitments.find_by_id(recruitment_id).await?.ok_or_not_found("Recruitment")?;
        self.volunteers.find_by_id(volunteer_id).await?.ok_or_not_found("Volunteer")?;

        if self.applicants.exists(recruitment_id, volunteer_id).await? {
            self.metrics.inc_application_conflicts();
            return Err(already_applied());
        }
        if recruitment.recruitment.is_closed {
            return Err(AppError::BadRequest("Recruitment is closed".to_string()));
        }

        let id = match self.applicants.insert(recruitment_id, volunteer_id, now()).await {
            Ok(id) => id,
            Err(AppError::Conflict(_)) => {
                self.metrics.inc_application_conflicts();
                return Err(already_applied());
            }
            Err(e) => return Err(e),
        };
        self.metrics.inc_applications_registered();
        tracing::info!(recruitment_id, volunteer_id, applicant_id = id, "application registered");
        Ok(id)
    }

    pub async fn find_applying_volunteers(&self, volunteer_id: i64) -> AppResult<ApplyingVolunteersResponse> {
        self.volunteers.find_by_id(volunteer_id).await?.ok_or_not_found("Volunteer")?;
        let rows = self.applicants.find_applying(volunteer_id).await?;
        Ok(ApplyingVolunteersResponse { applications: rows.into_iter().map(Into::into).collect() })
    }

    pub async fn find_applicants_approved(
        &self,
        shelter_id: i64,
        recruitment_id: i64,
    ) -> AppResult<ApprovedApplicantsResponse> {
        let rows = self.applicants.find_approved(recruitment_id, shelter_id).await?;
        Ok(ApprovedApplicantsResponse { applicants: rows.into_iter().map(Into::into).collect() })
    }

    pub async fn update_applicant_status(
        &self,
        shelter_id: i64,
        applicant_id: i64,
        status: ApplicantStatus,
    ) -> AppResult<()> {
        self.applicants.find_by_id_and_shelter(applicant_id, shelter_id).await?.ok_or_not_found("Applicant")?;
        self.applicants.update_status(applicant_id, status).await?;
        tracing::info!(shelter_id, applicant_id, status = status.as_str(), "applicant status updated");
        Ok(())
    }
}

fn already_applied() -> AppError {
    AppError::Conflict("Volunteer already applied to this recruitment".to_string())
}
