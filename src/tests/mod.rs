//! Tests that exercise more than one module: repositories against an in-memory
//! SQLite database, services, the HTTP router and configuration loading.
//!
//! - **search_tests**: recruitment and animal searches
//! - **service_tests**: application, review, recruitment and profile workflows
//! - **api_tests**: the router end to end through `oneshot`
//! - **config_tests**: configuration layering and validation

pub mod api_tests;
pub mod config_tests;

use crate::config::AppConfig;
use crate::state::AppState;

/// State over a fresh in-memory database with default configuration.
pub(crate) async fn test_state() -> AppState {
    AppState::new(crate::db::test_pool().await, AppConfig::default())
}

/// Rows inserted through the repositories, with valid defaults for every field
/// a test does not care about.
pub(crate) mod fixtures {
    use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
    use sqlx::SqlitePool;

    use crate::models::{
        AnimalActive, AnimalDraft, AnimalType, ApplicantStatus, Gender, NewRecruitment, NewShelter, NewVolunteer,
        ShelterAddressInfo, VolunteerProfile,
    };
    use crate::repository::{
        AnimalRepository, ApplicantRepository, RecruitmentRepository, ShelterRepository, VolunteerRepository,
    };
    use crate::services::{now, today};

    pub fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    pub async fn insert_shelter(pool: &SqlitePool, email: &str) -> i64 {
        insert_shelter_named(pool, email, "Happy Paws").await
    }

    pub async fn insert_shelter_named(pool: &SqlitePool, email: &str, name: &str) -> i64 {
        let address = ShelterAddressInfo::new("12 Shelter-ro, Seoul", "Building B", false).unwrap();
        let shelter = NewShelter::new(email, name, address, "02-123-4567", None).unwrap();
        ShelterRepository::new(pool.clone()).insert(&shelter, now()).await.unwrap()
    }

    pub async fn insert_volunteer(pool: &SqlitePool, email: &str) -> i64 {
        let birth = NaiveDate::from_ymd_opt(1996, 4, 2).unwrap();
        let profile = VolunteerProfile::new("minji", birth, "010-1234-5678", Gender::Female, None, today()).unwrap();
        let volunteer = NewVolunteer::new(email, profile).unwrap();
        VolunteerRepository::new(pool.clone()).insert(&volunteer, now()).await.unwrap()
    }

    /// Recruitment starting `start_in_days` from today at 10:00.
    pub async fn insert_recruitment(
        pool: &SqlitePool,
        shelter_id: i64,
        title: &str,
        content: &str,
        start_in_days: i64,
    ) -> i64 {
        let start = (today() + Duration::days(start_in_days)).and_time(NaiveTime::MIN) + Duration::hours(10);
        insert_recruitment_at(pool, shelter_id, title, content, start).await
    }

    pub async fn insert_recruitment_at(
        pool: &SqlitePool,
        shelter_id: i64,
        title: &str,
        content: &str,
        start: NaiveDateTime,
    ) -> i64 {
        let recruitment =
            NewRecruitment::new(title, content, 5, start, start + Duration::hours(3), start - Duration::days(1), vec![])
                .unwrap();
        let repo = RecruitmentRepository::new(pool.clone());
        let mut tx = repo.begin().await.unwrap();
        let id = repo.insert(&mut tx, shelter_id, &recruitment, now()).await.unwrap();
        tx.commit().await.unwrap();
        id
    }

    pub async fn insert_applicant(
        pool: &SqlitePool,
        recruitment_id: i64,
        volunteer_id: i64,
        status: ApplicantStatus,
    ) -> i64 {
        let repo = ApplicantRepository::new(pool.clone());
        let id = repo.insert(recruitment_id, volunteer_id, now()).await.unwrap();
        if status != ApplicantStatus::Pending {
            repo.update_status(id, status).await.unwrap();
        }
        id
    }

    pub async fn insert_animal(pool: &SqlitePool, shelter_id: i64, name: &str, weight: f64, birth_date: NaiveDate) -> i64 {
        let draft = AnimalDraft::new(
            name,
            birth_date,
            AnimalType::Dog,
            "mixed",
            Gender::Male,
            true,
            AnimalActive::Active,
            weight,
            "friendly",
            vec![format!("https://img.example/{}.jpg", name)],
        )
        .unwrap();
        AnimalRepository::new(pool.clone()).insert(shelter_id, &draft, now()).await.unwrap()
    }
}
