//! Persistent entities and the invariants they carry.
//!
//! Row types derive [`sqlx::FromRow`] and mirror the tables created in [`crate::db`].
//! `New*` types are validated drafts: constructing one checks every field rule, so a
//! value that reaches a repository insert is already known to be well-formed.

use chrono::{Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

/// Violation of an entity invariant. Surfaces to clients as `400 Bad Request`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("{field} must be between {min} and {max} characters")]
    OutOfRange { field: &'static str, min: usize, max: usize },
    #[error("{field} is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("{0}")]
    Schedule(&'static str),
}

fn check_length(field: &'static str, value: &str, min: usize, max: usize) -> Result<(), DomainError> {
    let len = value.chars().count();
    if (min > 0 && value.trim().is_empty()) || len < min || len > max {
        return Err(DomainError::OutOfRange { field, min, max });
    }
    Ok(())
}

fn check_image_urls(urls: &[String], max: usize) -> Result<(), DomainError> {
    if urls.len() > max {
        return Err(DomainError::Invalid {
            field: "image_urls",
            reason: format!("at most {} images are allowed", max),
        });
    }
    if urls.iter().any(|u| u.trim().is_empty()) {
        return Err(DomainError::Invalid { field: "image_urls", reason: "empty image url".to_string() });
    }
    Ok(())
}

fn check_phone_number(value: &str) -> Result<(), DomainError> {
    let len = value.chars().count();
    if !(9..=15).contains(&len) || !value.chars().all(|c| c.is_ascii_digit() || c == '-') {
        return Err(DomainError::Invalid {
            field: "phone_number",
            reason: "expected 9 to 15 digits or '-'".to_string(),
        });
    }
    Ok(())
}

fn check_email(value: &str) -> Result<(), DomainError> {
    let valid = match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    };
    if !valid || value.chars().count() > 100 {
        return Err(DomainError::Invalid { field: "email", reason: "not an e-mail address".to_string() });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
        }
    }
}

/// Lifecycle of an application. New applications start as `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicantStatus {
    Pending,
    Approved,
    Refused,
    Attendance,
    NoShow,
}

impl ApplicantStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicantStatus::Pending => "PENDING",
            ApplicantStatus::Approved => "APPROVED",
            ApplicantStatus::Refused => "REFUSED",
            ApplicantStatus::Attendance => "ATTENDANCE",
            ApplicantStatus::NoShow => "NO_SHOW",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnimalType {
    Dog,
    Cat,
    Etc,
}

impl AnimalType {
    pub fn as_str(self) -> &'static str {
        match self {
            AnimalType::Dog => "DOG",
            AnimalType::Cat => "CAT",
            AnimalType::Etc => "ETC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnimalActive {
    Active,
    Quiet,
    Normal,
    Shy,
}

impl AnimalActive {
    pub fn as_str(self) -> &'static str {
        match self {
            AnimalActive::Active => "ACTIVE",
            AnimalActive::Quiet => "QUIET",
            AnimalActive::Normal => "NORMAL",
            AnimalActive::Shy => "SHY",
        }
    }
}

/// Weight class used as a search filter; not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnimalSize {
    Small,
    Medium,
    Large,
}

impl AnimalSize {
    /// Weight range in kilograms, `[min, max)`.
    pub fn weight_range(self) -> (f64, Option<f64>) {
        match self {
            AnimalSize::Small => (0.0, Some(7.0)),
            AnimalSize::Medium => (7.0, Some(15.0)),
            AnimalSize::Large => (15.0, None),
        }
    }
}

/// Age class used as a search filter; derived from the birth date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnimalAge {
    Baby,
    Adult,
    Senior,
}

impl AnimalAge {
    /// Age range in months, `[min, max)`.
    pub fn month_range(self) -> (u32, Option<u32>) {
        match self {
            AnimalAge::Baby => (0, Some(12)),
            AnimalAge::Adult => (12, Some(84)),
            AnimalAge::Senior => (84, None),
        }
    }

    /// Birth-date window for animals of this age on `today`:
    /// `(born strictly after, born on or before)`.
    pub fn birth_date_bounds(self, today: NaiveDate) -> (Option<NaiveDate>, NaiveDate) {
        let (min, max) = self.month_range();
        let latest = today.checked_sub_months(Months::new(min)).unwrap_or(NaiveDate::MIN);
        let earliest = max.and_then(|m| today.checked_sub_months(Months::new(m)));
        (earliest, latest)
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Shelter {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub address: String,
    pub address_detail: String,
    pub is_opened_address: bool,
    pub phone_number: String,
    pub image_url: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Validated shelter address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelterAddressInfo {
    pub address: String,
    pub address_detail: String,
    pub is_opened_address: bool,
}

impl ShelterAddressInfo {
    const MAX_ADDRESS_LENGTH: usize = 100;
    const MAX_ADDRESS_DETAIL_LENGTH: usize = 100;

    pub fn new(address: &str, address_detail: &str, is_opened_address: bool) -> Result<Self, DomainError> {
        check_length("address", address, 1, Self::MAX_ADDRESS_LENGTH)?;
        check_length("address_detail", address_detail, 1, Self::MAX_ADDRESS_DETAIL_LENGTH)?;
        Ok(Self {
            address: address.to_string(),
            address_detail: address_detail.to_string(),
            is_opened_address,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewShelter {
    pub email: String,
    pub name: String,
    pub address: ShelterAddressInfo,
    pub phone_number: String,
    pub image_url: Option<String>,
}

impl NewShelter {
    pub fn new(
        email: &str,
        name: &str,
        address: ShelterAddressInfo,
        phone_number: &str,
        image_url: Option<String>,
    ) -> Result<Self, DomainError> {
        check_email(email)?;
        check_length("name", name, 1, 50)?;
        check_phone_number(phone_number)?;
        Ok(Self {
            email: email.to_string(),
            name: name.to_string(),
            address,
            phone_number: phone_number.to_string(),
            image_url,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Volunteer {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub birth_date: NaiveDate,
    pub phone_number: String,
    pub gender: Gender,
    pub temperature: i64,
    pub image_url: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Validated volunteer profile fields, shared by registration and profile updates.
#[derive(Debug, Clone)]
pub struct VolunteerProfile {
    pub name: String,
    pub birth_date: NaiveDate,
    pub phone_number: String,
    pub gender: Gender,
    pub image_url: Option<String>,
}

impl VolunteerProfile {
    const MAX_NAME_LENGTH: usize = 10;

    pub fn new(
        name: &str,
        birth_date: NaiveDate,
        phone_number: &str,
        gender: Gender,
        image_url: Option<String>,
        today: NaiveDate,
    ) -> Result<Self, DomainError> {
        check_length("name", name, 1, Self::MAX_NAME_LENGTH)?;
        if birth_date > today {
            return Err(DomainError::Invalid {
                field: "birth_date",
                reason: "must not be in the future".to_string(),
            });
        }
        check_phone_number(phone_number)?;
        Ok(Self { name: name.to_string(), birth_date, phone_number: phone_number.to_string(), gender, image_url })
    }
}

#[derive(Debug, Clone)]
pub struct NewVolunteer {
    pub email: String,
    pub profile: VolunteerProfile,
}

impl NewVolunteer {
    pub const INITIAL_TEMPERATURE: i64 = 36;

    pub fn new(email: &str, profile: VolunteerProfile) -> Result<Self, DomainError> {
        check_email(email)?;
        Ok(Self { email: email.to_string(), profile })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Recruitment {
    pub id: i64,
    pub shelter_id: i64,
    pub title: String,
    pub content: String,
    pub capacity: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub deadline: NaiveDateTime,
    pub is_closed: bool,
    pub image_urls: Json<Vec<String>>,
    pub created_at: NaiveDateTime,
}

/// A recruitment joined with the shelter that owns it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecruitmentWithShelter {
    #[sqlx(flatten)]
    pub recruitment: Recruitment,
    pub shelter_name: String,
    pub shelter_image_url: Option<String>,
}

/// A recruitment the volunteer attended, with the application it was attended through.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CompletedRecruitment {
    #[sqlx(flatten)]
    pub recruitment: RecruitmentWithShelter,
    pub applicant_id: i64,
    pub is_review_written: bool,
}

#[derive(Debug, Clone)]
pub struct NewRecruitment {
    pub title: String,
    pub content: String,
    pub capacity: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub deadline: NaiveDateTime,
    pub image_urls: Vec<String>,
}

impl NewRecruitment {
    const MAX_TITLE_LENGTH: usize = 100;
    const MAX_CONTENT_LENGTH: usize = 1000;
    const MAX_CAPACITY: i64 = 99;
    const MAX_IMAGES: usize = 5;

    pub fn new(
        title: &str,
        content: &str,
        capacity: i64,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        deadline: NaiveDateTime,
        image_urls: Vec<String>,
    ) -> Result<Self, DomainError> {
        check_length("title", title, 1, Self::MAX_TITLE_LENGTH)?;
        check_length("content", content, 0, Self::MAX_CONTENT_LENGTH)?;
        if !(1..=Self::MAX_CAPACITY).contains(&capacity) {
            return Err(DomainError::Invalid {
                field: "capacity",
                reason: format!("must be between 1 and {}", Self::MAX_CAPACITY),
            });
        }
        if start_time > end_time {
            return Err(DomainError::Schedule("start_time must not be after end_time"));
        }
        if deadline > start_time {
            return Err(DomainError::Schedule("deadline must not be after start_time"));
        }
        check_image_urls(&image_urls, Self::MAX_IMAGES)?;
        Ok(Self {
            title: title.to_string(),
            content: content.to_string(),
            capacity,
            start_time,
            end_time,
            deadline,
            image_urls,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Applicant {
    pub id: i64,
    pub recruitment_id: i64,
    pub volunteer_id: i64,
    pub status: ApplicantStatus,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Review {
    pub id: i64,
    pub applicant_id: i64,
    pub content: String,
    pub image_urls: Json<Vec<String>>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub content: String,
    pub image_urls: Vec<String>,
}

impl NewReview {
    const MIN_CONTENT_LENGTH: usize = 10;
    const MAX_CONTENT_LENGTH: usize = 300;
    const MAX_IMAGES: usize = 5;

    pub fn new(content: &str, image_urls: Vec<String>) -> Result<Self, DomainError> {
        check_length("content", content, Self::MIN_CONTENT_LENGTH, Self::MAX_CONTENT_LENGTH)?;
        check_image_urls(&image_urls, Self::MAX_IMAGES)?;
        Ok(Self { content: content.to_string(), image_urls })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Animal {
    pub id: i64,
    pub shelter_id: i64,
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
    pub image_urls: Json<Vec<String>>,
    pub created_at: NaiveDateTime,
}

/// Validated animal fields, shared by registration and full updates.
#[derive(Debug, Clone)]
pub struct AnimalDraft {
    pub name: String,
    pub birth_date: NaiveDate,
    pub animal_type: AnimalType,
    pub breed: String,
    pub gender: Gender,
    pub is_neutered: bool,
    pub active: AnimalActive,
    pub weight: f64,
    pub information: String,
    pub image_urls: Vec<String>,
}

impl AnimalDraft {
    const MAX_NAME_LENGTH: usize = 20;
    const MAX_BREED_LENGTH: usize = 20;
    const MAX_INFORMATION_LENGTH: usize = 1000;
    const MAX_WEIGHT: f64 = 100.0;
    const MAX_IMAGES: usize = 5;

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        birth_date: NaiveDate,
        animal_type: AnimalType,
        breed: &str,
        gender: Gender,
        is_neutered: bool,
        active: AnimalActive,
        weight: f64,
        information: &str,
        image_urls: Vec<String>,
    ) -> Result<Self, DomainError> {
        check_length("name", name, 1, Self::MAX_NAME_LENGTH)?;
        check_length("breed", breed, 1, Self::MAX_BREED_LENGTH)?;
        check_length("information", information, 0, Self::MAX_INFORMATION_LENGTH)?;
        if !(weight > 0.0 && weight <= Self::MAX_WEIGHT) {
            return Err(DomainError::Invalid {
                field: "weight",
                reason: format!("must be in (0, {}]", Self::MAX_WEIGHT),
            });
        }
        if image_urls.is_empty() {
            return Err(DomainError::Invalid { field: "image_urls", reason: "at least one image is required".to_string() });
        }
        check_image_urls(&image_urls, Self::MAX_IMAGES)?;
        Ok(Self {
            name: name.to_string(),
            birth_date,
            animal_type,
            breed: breed.to_string(),
            gender,
            is_neutered,
            active,
            weight,
            information: information.to_string(),
            image_urls,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn address_rejects_blank_and_overlong_values() {
        assert!(ShelterAddressInfo::new("Seoul", "3F", true).is_ok());
        assert_eq!(
            ShelterAddressInfo::new("   ", "3F", true),
            Err(DomainError::OutOfRange { field: "address", min: 1, max: 100 })
        );
        let long = "a".repeat(101);
        assert!(ShelterAddressInfo::new("Seoul", &long, false).is_err());
        assert!(ShelterAddressInfo::new(&"a".repeat(100), &"b".repeat(100), false).is_ok());
    }

    #[test]
    fn recruitment_schedule_invariants() {
        let walk = |start, end, deadline| NewRecruitment::new("walk", "dogs", 3, start, end, deadline, vec![]);

        assert!(walk(at(2030, 1, 10, 9), at(2030, 1, 10, 12), at(2030, 1, 5, 0)).is_ok());

        let reversed = walk(at(2030, 1, 10, 12), at(2030, 1, 10, 9), at(2030, 1, 5, 0));
        assert!(matches!(reversed, Err(DomainError::Schedule(_))));

        let late_deadline = walk(at(2030, 1, 10, 9), at(2030, 1, 10, 12), at(2030, 1, 11, 0));
        assert!(matches!(late_deadline, Err(DomainError::Schedule(_))));

        let empty =
            NewRecruitment::new("walk", "dogs", 0, at(2030, 1, 10, 9), at(2030, 1, 10, 12), at(2030, 1, 5, 0), vec![]);
        assert!(matches!(empty, Err(DomainError::Invalid { field: "capacity", .. })));
    }

    #[test]
    fn recruitment_images_are_optional_but_bounded() {
        let with = |urls: Vec<String>| {
            NewRecruitment::new("walk", "dogs", 3, at(2030, 1, 10, 9), at(2030, 1, 10, 12), at(2030, 1, 5, 0), urls)
        };
        let urls = |n: usize| (0..n).map(|i| format!("https://img.example/{}.jpg", i)).collect::<Vec<_>>();

        assert!(with(vec![]).is_ok());
        assert_eq!(with(urls(5)).unwrap().image_urls.len(), 5);
        assert!(matches!(with(urls(6)), Err(DomainError::Invalid { field: "image_urls", .. })));
        assert!(matches!(with(vec![" ".to_string()]), Err(DomainError::Invalid { field: "image_urls", .. })));
    }

    #[test]
    fn volunteer_profile_rejects_future_birth_date() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let tomorrow = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let res = VolunteerProfile::new("kim", tomorrow, "010-1234-5678", Gender::Female, None, today);
        assert!(matches!(res, Err(DomainError::Invalid { field: "birth_date", .. })));
        let res = VolunteerProfile::new("kim", today, "010-1234-5678", Gender::Female, None, today);
        assert!(res.is_ok());
        let res = VolunteerProfile::new("kim", today, "phone", Gender::Female, None, today);
        assert!(matches!(res, Err(DomainError::Invalid { field: "phone_number", .. })));
    }

    #[test]
    fn review_content_bounds() {
        assert!(NewReview::new("too short", vec![]).is_err());
        assert!(NewReview::new("long enough review", vec![]).is_ok());
        let images = (0..6).map(|i| format!("https://img/{}", i)).collect();
        assert!(NewReview::new("long enough review", images).is_err());
    }

    #[test]
    fn animal_age_bounds() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let (earliest, latest) = AnimalAge::Adult.birth_date_bounds(today);
        assert_eq!(latest, NaiveDate::from_ymd_opt(2023, 6, 15).unwrap());
        assert_eq!(earliest, Some(NaiveDate::from_ymd_opt(2017, 6, 15).unwrap()));
        let (earliest, latest) = AnimalAge::Senior.birth_date_bounds(today);
        assert_eq!(earliest, None);
        assert_eq!(latest, NaiveDate::from_ymd_opt(2017, 6, 15).unwrap());
    }

    #[test]
    fn animal_requires_an_image_and_sane_weight() {
        let birth = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        let mk = |weight: f64, images: Vec<String>| {
            AnimalDraft::new("bori", birth, AnimalType::Dog, "jindo", Gender::Male, true, AnimalActive::Quiet, weight, "", images)
        };
        assert!(mk(4.2, vec!["https://img/1".into()]).is_ok());
        assert!(mk(4.2, vec![]).is_err());
        assert!(mk(0.0, vec!["https://img/1".into()]).is_err());
        assert!(mk(120.0, vec!["https://img/1".into()]).is_err());
    }
}
