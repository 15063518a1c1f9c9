//! SQL access, one repository per table.
//!
//! Each repository owns a clone of the pool and returns [`crate::error::AppResult`];
//! sqlx errors are converted at the `?` sites. Searches take filters and a
//! [`crate::pagination::PageRequest`] and return a [`crate::pagination::Page`].

pub mod animals;
pub mod applicants;
pub mod recruitments;
pub mod reviews;
pub mod shelters;
pub mod volunteers;

pub use animals::AnimalRepository;
pub use applicants::ApplicantRepository;
pub use recruitments::RecruitmentRepository;
pub use reviews::ReviewRepository;
pub use shelters::ShelterRepository;
pub use volunteers::VolunteerRepository;
