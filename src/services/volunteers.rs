use crate::error::{AppError, AppResult, OptionExt};
use crate::models::{ApplicantStatus, NewVolunteer, VolunteerProfile};
use crate::repository::VolunteerRepository;
use crate::types::{RegisterVolunteerRequest, UpdateVolunteerInfoRequest, VolunteerMyPageResponse};

use super::{now, today};

#[derive(Clone)]
pub struct VolunteerService {
    volunteers: VolunteerRepository,
}

impl VolunteerService {
    pub fn new(volunteers: VolunteerRepository) -> Self {
        Self { volunteers }
    }

    pub async fn register_volunteer(&self, request: RegisterVolunteerRequest) -> AppResult<i64> {
        let profile = VolunteerProfile::new(
            &request.name,
            request.birth_date,
            &request.phone_number,
            request.gender,
            request.image_url,
            today(),
        )?;
        let volunteer = NewVolunteer::new(&request.email, profile)?;
        let id = self.volunteers.insert(&volunteer, now()).await.map_err(|e| match e {
            AppError::Conflict(_) => AppError::Conflict("Email is already registered".to_string()),
            other => other,
        })?;
        tracing::info!(volunteer_id = id, "volunteer registered");
        Ok(id)
    }

    /// Profile plus the number of recruitments the volunteer attended.
    pub async fn find_volunteer_my_page(&self, volunteer_id: i64) -> AppResult<VolunteerMyPageResponse> {
        let volunteer = self.volunteers.find_by_id(volunteer_id).await?.ok_or_not_found("Volunteer")?;
        let volunteer_count =
            self.volunteers.count_applications_with_status(volunteer_id, ApplicantStatus::Attendance).await?;
        Ok(VolunteerMyPageResponse {
            volunteer_id: volunteer.id,
            email: volunteer.email,
            name: volunteer.name,
            birth_date: volunteer.birth_date,
            gender: volunteer.gender,
            phone_number: volunteer.phone_number,
            temperature: volunteer.temperature,
            volunteer_count,
            image_url: volunteer.image_url,
        })
    }

    pub async fn update_volunteer_info(&self, volunteer_id: i64, request: UpdateVolunteerInfoRequest) -> AppResult<()> {
        self.volunteers.find_by_id(volunteer_id).await?.ok_or_not_found("Volunteer")?;
        let profile = VolunteerProfile::new(
            &request.name,
            request.birth_date,
            &request.phone_number,
            request.gender,
            request.image_url,
            today(),
        )?;
        self.volunteers.update_profile(volunteer_id, &profile).await
    }
}
