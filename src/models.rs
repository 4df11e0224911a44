//! Domain models and wire types

pub mod application;
pub mod user;
pub mod vacancy;

pub use application::{Application, ApplicationStatus};
pub use user::{User, UserBrief, UserSummary, UserUpdate};
pub use vacancy::{JobVacancy, VacancyStatus, VacancySummary, VacancyUpdate};

use serde::Serialize;

/// Plain acknowledgement body, `{"message": "..."}`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
