//! Job application model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Review state of an application. New applications start `PENDING`;
/// transitions are unrestricted beyond the enum itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    /// Parse a client-supplied status string, case-insensitively. Unknown
    /// values are rejected rather than coerced.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "REVIEWED" => Some(Self::Reviewed),
            "ACCEPTED" => Some(Self::Accepted),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Reviewed => write!(f, "REVIEWED"),
            Self::Accepted => write!(f, "ACCEPTED"),
            Self::Rejected => write!(f, "REJECTED"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_vacancy_id: Uuid,
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    pub fn new(user_id: Uuid, job_vacancy_id: Uuid, cover_letter: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            job_vacancy_id,
            cover_letter,
            status: ApplicationStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            ApplicationStatus::parse("PENDING"),
            Some(ApplicationStatus::Pending)
        );
        assert_eq!(
            ApplicationStatus::parse("reviewed"),
            Some(ApplicationStatus::Reviewed)
        );
        assert_eq!(
            ApplicationStatus::parse("Accepted"),
            Some(ApplicationStatus::Accepted)
        );
        assert_eq!(
            ApplicationStatus::parse("REJECTED"),
            Some(ApplicationStatus::Rejected)
        );
        assert_eq!(ApplicationStatus::parse("APPROVED"), None);
        assert_eq!(ApplicationStatus::parse(""), None);
    }

    #[test]
    fn test_new_applications_start_pending() {
        let app = Application::new(Uuid::new_v4(), Uuid::new_v4(), None);
        assert_eq!(app.status, ApplicationStatus::Pending);
        assert!(app.cover_letter.is_none());
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let app = Application::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Some("I am keen".to_string()),
        );
        let json = serde_json::to_value(&app).unwrap();
        assert!(json.get("jobVacancyId").is_some());
        assert!(json.get("coverLetter").is_some());
        assert!(json.get("userId").is_some());
        assert_eq!(json["status"], "PENDING");
    }
}
