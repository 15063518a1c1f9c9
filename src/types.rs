use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::filter::{AnimalFilter, KeywordCondition, RecruitmentCursor, RecruitmentFilter};
use crate::models::{
    AnimalActive, AnimalAge, AnimalSize, AnimalType, ApplicantStatus, CompletedRecruitment, Gender,
    RecruitmentWithShelter, Review,
};
use crate::pagination::PageInfo;
use crate::repository::animals::AnimalWithShelter;
use crate::repository::applicants::{ApplyingRecruitment, ApprovedApplicant};
use crate::repository::reviews::{ShelterReview, VolunteerReview};

// ---- requests ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterShelterRequest {
    pub email: String,
    pub name: String,
    pub address: String,
    pub address_detail: String,
    #[serde(default)]
    pub is_opened_address: bool,
    pub phone_number: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterVolunteerRequest {
    pub email: String,
    pub name: String,
    pub birth_date: NaiveDate,
    pub phone_number: String,
    pub gender: Gender,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateVolunteerInfoRequest {
    pub name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub phone_number: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRecruitmentRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub capacity: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub deadline: NaiveDateTime,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

/// Query string of the recruitment searches.
///
/// `title`, `content` and `shelter_name` select the fields the keyword is matched
/// against. When none of them is present the caller's default applies; once any
/// is present the missing ones count as `false`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecruitmentSearchParams {
    pub keyword: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_closed: Option<bool>,
    pub title: Option<bool>,
    pub content: Option<bool>,
    pub shelter_name: Option<bool>,
}

impl RecruitmentSearchParams {
    pub fn into_filter(self, default_condition: KeywordCondition) -> RecruitmentFilter {
        let keyword_condition = if self.title.is_none() && self.content.is_none() && self.shelter_name.is_none() {
            default_condition
        } else {
            KeywordCondition {
                title: self.title.unwrap_or(false),
                content: self.content.unwrap_or(false),
                shelter_name: self.shelter_name.unwrap_or(false),
            }
        };
        RecruitmentFilter {
            keyword: self.keyword,
            start_date: self.start_date,
            end_date: self.end_date,
            is_closed: self.is_closed,
            keyword_condition,
        }
    }
}

/// Cursor of `GET /api/v2/recruitments`: the `created_at` and id of the last row seen.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RecruitmentCursorParams {
    pub created_at: Option<NaiveDateTime>,
    pub recruitment_id: Option<i64>,
}

impl RecruitmentCursorParams {
    /// `None` for the first slice. Both parts must be given together.
    pub fn into_cursor(self) -> AppResult<Option<RecruitmentCursor>> {
        match (self.created_at, self.recruitment_id) {
            (None, None) => Ok(None),
            (Some(created_at), Some(recruitment_id)) if recruitment_id > 0 => {
                Ok(Some(RecruitmentCursor { created_at, recruitment_id }))
            }
            (Some(_), Some(_)) => Err(AppError::ValidationError {
                field: "recruitment_id".to_string(),
                message: "must be a positive id".to_string(),
            }),
            (None, Some(_)) => Err(AppError::ValidationError {
                field: "created_at".to_string(),
                message: "required together with recruitment_id".to_string(),
            }),
            (Some(_), None) => Err(AppError::ValidationError {
                field: "recruitment_id".to_string(),
                message: "required together with created_at".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateApplicantStatusRequest {
    pub status: ApplicantStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterReviewRequest {
    pub applicant_id: i64,
    pub content: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

/// Body of animal registration and of the full animal update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimalRequest {
    pub name: String,
    pub birth_date: NaiveDate,
    pub animal_type: AnimalType,
    pub breed: String,
    pub gender: Gender,
    pub is_neutered: bool,
    pub active: AnimalActive,
    pub weight: f64,
    #[serde(default)]
    pub information: String,
    pub image_urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAnimalAdoptStatusRequest {
    pub is_adopted: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnimalSearchParams {
    pub keyword: Option<String>,
    #[serde(rename = "type")]
    pub animal_type: Option<AnimalType>,
    pub gender: Option<Gender>,
    pub is_neutered: Option<bool>,
    pub active: Option<AnimalActive>,
    pub size: Option<AnimalSize>,
    pub age: Option<AnimalAge>,
}

impl From<AnimalSearchParams> for AnimalFilter {
    fn from(p: AnimalSearchParams) -> Self {
        AnimalFilter {
            keyword: p.keyword,
            animal_type: p.animal_type,
            gender: p.gender,
            is_neutered: p.is_neutered,
            active: p.active,
            size: p.size,
            age: p.age,
        }
    }
}

// ---- responses ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelterDetailResponse {
    pub shelter_id: i64,
    pub email: String,
    pub name: String,
    pub address: String,
    /// Present only when the shelter made its address public.
    pub address_detail: Option<String>,
    pub phone_number: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolunteerMyPageResponse {
    pub volunteer_id: i64,
    pub email: String,
    pub name: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub phone_number: String,
    pub temperature: i64,
    pub volunteer_count: i64,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecruitmentDetailResponse {
    pub recruitment_id: i64,
    pub title: String,
    pub content: String,
    pub capacity: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub deadline: NaiveDateTime,
    pub is_closed: bool,
    pub created_at: NaiveDateTime,
    pub image_urls: Vec<String>,
    pub shelter_id: i64,
    pub shelter_name: String,
    pub shelter_image_url: Option<String>,
}

impl From<RecruitmentWithShelter> for RecruitmentDetailResponse {
    fn from(row: RecruitmentWithShelter) -> Self {
        let r = row.recruitment;
        Self {
            recruitment_id: r.id,
            title: r.title,
            content: r.content,
            capacity: r.capacity,
            start_time: r.start_time,
            end_time: r.end_time,
            deadline: r.deadline,
            is_closed: r.is_closed,
            created_at: r.created_at,
            image_urls: r.image_urls.0,
            shelter_id: r.shelter_id,
            shelter_name: row.shelter_name,
            shelter_image_url: row.shelter_image_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecruitmentSummary {
    pub recruitment_id: i64,
    pub title: String,
    pub capacity: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub deadline: NaiveDateTime,
    pub is_closed: bool,
    pub created_at: NaiveDateTime,
    pub shelter_id: i64,
    pub shelter_name: String,
    pub shelter_image_url: Option<String>,
}

impl From<RecruitmentWithShelter> for RecruitmentSummary {
    fn from(row: RecruitmentWithShelter) -> Self {
        let r = row.recruitment;
        Self {
            recruitment_id: r.id,
            title: r.title,
            capacity: r.capacity,
            start_time: r.start_time,
            end_time: r.end_time,
            deadline: r.deadline,
            is_closed: r.is_closed,
            created_at: r.created_at,
            shelter_id: r.shelter_id,
            shelter_name: row.shelter_name,
            shelter_image_url: row.shelter_image_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecruitmentPageResponse {
    pub recruitments: Vec<RecruitmentSummary>,
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedRecruitmentResponse {
    pub applicant_id: i64,
    pub recruitment_id: i64,
    pub title: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub shelter_id: i64,
    pub shelter_name: String,
    pub shelter_image_url: Option<String>,
    pub is_review_written: bool,
}

impl From<CompletedRecruitment> for CompletedRecruitmentResponse {
    fn from(row: CompletedRecruitment) -> Self {
        let r = row.recruitment.recruitment;
        Self {
            applicant_id: row.applicant_id,
            recruitment_id: r.id,
            title: r.title,
            start_time: r.start_time,
            end_time: r.end_time,
            shelter_id: r.shelter_id,
            shelter_name: row.recruitment.shelter_name,
            shelter_image_url: row.recruitment.shelter_image_url,
            is_review_written: row.is_review_written,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedRecruitmentPageResponse {
    pub recruitments: Vec<CompletedRecruitmentResponse>,
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyingRecruitmentResponse {
    pub applicant_id: i64,
    pub recruitment_id: i64,
    pub shelter_id: i64,
    pub title: String,
    pub shelter_name: String,
    pub start_time: NaiveDateTime,
    pub status: ApplicantStatus,
    pub is_review_written: bool,
}

impl From<ApplyingRecruitment> for ApplyingRecruitmentResponse {
    fn from(row: ApplyingRecruitment) -> Self {
        Self {
            applicant_id: row.applicant_id,
            recruitment_id: row.recruitment_id,
            shelter_id: row.shelter_id,
            title: row.title,
            shelter_name: row.shelter_name,
            start_time: row.start_time,
            status: row.status,
            is_review_written: row.is_review_written,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyingVolunteersResponse {
    pub applications: Vec<ApplyingRecruitmentResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovedApplicantResponse {
    pub applicant_id: i64,
    pub volunteer_id: i64,
    pub name: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub phone_number: String,
    pub status: ApplicantStatus,
}

impl From<ApprovedApplicant> for ApprovedApplicantResponse {
    fn from(row: ApprovedApplicant) -> Self {
        Self {
            applicant_id: row.applicant_id,
            volunteer_id: row.volunteer_id,
            name: row.name,
            birth_date: row.birth_date,
            gender: row.gender,
            phone_number: row.phone_number,
            status: row.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovedApplicantsResponse {
    pub applicants: Vec<ApprovedApplicantResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub review_id: i64,
    pub content: String,
    pub image_urls: Vec<String>,
    pub created_at: NaiveDateTime,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            review_id: review.id,
            content: review.content,
            image_urls: review.image_urls.0,
            created_at: review.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelterReviewResponse {
    pub review_id: i64,
    pub content: String,
    pub image_urls: Vec<String>,
    pub created_at: NaiveDateTime,
    pub volunteer_id: i64,
    pub volunteer_name: String,
    pub volunteer_temperature: i64,
    pub volunteer_image_url: Option<String>,
}

impl From<ShelterReview> for ShelterReviewResponse {
    fn from(row: ShelterReview) -> Self {
        Self {
            review_id: row.review.id,
            content: row.review.content,
            image_urls: row.review.image_urls.0,
            created_at: row.review.created_at,
            volunteer_id: row.volunteer_id,
            volunteer_name: row.volunteer_name,
            volunteer_temperature: row.volunteer_temperature,
            volunteer_image_url: row.volunteer_image_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolunteerReviewResponse {
    pub review_id: i64,
    pub content: String,
    pub image_urls: Vec<String>,
    pub created_at: NaiveDateTime,
    pub shelter_id: i64,
    pub shelter_name: String,
}

impl From<VolunteerReview> for VolunteerReviewResponse {
    fn from(row: VolunteerReview) -> Self {
        Self {
            review_id: row.review.id,
            content: row.review.content,
            image_urls: row.review.image_urls.0,
            created_at: row.review.created_at,
            shelter_id: row.shelter_id,
            shelter_name: row.shelter_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewPageResponse<T> {
    pub reviews: Vec<T>,
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimalDetailResponse {
    pub animal_id: i64,
    pub name: String,
    pub birth_date: NaiveDate,
    pub animal_type: AnimalType,
    pub breed: String,
    pub gender: Gender,
    pub is_neutered: bool,
    pub active: AnimalActive,
    pub weight: f64,
    pub information: String,
    pub is_adopted: bool,
    pub image_urls: Vec<String>,
    pub shelter_id: i64,
    pub shelter_name: String,
    pub shelter_address: String,
}

impl From<AnimalWithShelter> for AnimalDetailResponse {
    fn from(row: AnimalWithShelter) -> Self {
        let a = row.animal;
        Self {
            animal_id: a.id,
            name: a.name,
            birth_date: a.birth_date,
            animal_type: a.animal_type,
            breed: a.breed,
            gender: a.gender,
            is_neutered: a.is_neutered,
            active: a.active,
            weight: a.weight,
            information: a.information,
            is_adopted: a.is_adopted,
            image_urls: a.image_urls.0,
            shelter_id: a.shelter_id,
            shelter_name: row.shelter_name,
            shelter_address: row.shelter_address,
        }
    }
}

/// Row of a shelter's own animal listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelterAnimalSummary {
    pub animal_id: i64,
    pub name: String,
    pub animal_type: AnimalType,
    pub breed: String,
    pub gender: Gender,
    pub is_neutered: bool,
    pub active: AnimalActive,
    pub weight: f64,
    pub birth_date: NaiveDate,
    pub is_adopted: bool,
    pub image_url: Option<String>,
}

impl From<AnimalWithShelter> for ShelterAnimalSummary {
    fn from(row: AnimalWithShelter) -> Self {
        let a = row.animal;
        Self {
            animal_id: a.id,
            name: a.name,
            animal_type: a.animal_type,
            breed: a.breed,
            gender: a.gender,
            is_neutered: a.is_neutered,
            active: a.active,
            weight: a.weight,
            birth_date: a.birth_date,
            is_adopted: a.is_adopted,
            image_url: a.image_urls.0.into_iter().next(),
        }
    }
}

/// Row of the public adoptable-animal listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdoptableAnimalSummary {
    pub animal_id: i64,
    pub name: String,
    pub image_url: Option<String>,
    pub shelter_name: String,
    pub shelter_address: String,
}

impl From<AnimalWithShelter> for AdoptableAnimalSummary {
    fn from(row: AnimalWithShelter) -> Self {
        Self {
            animal_id: row.animal.id,
            name: row.animal.name,
            image_url: row.animal.image_urls.0.into_iter().next(),
            shelter_name: row.shelter_name,
            shelter_address: row.shelter_address,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimalPageResponse<T> {
    pub animals: Vec<T>,
    pub page_info: PageInfo,
}
