//! Job vacancy model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle state of a vacancy. Only `ACTIVE` vacancies accept
/// applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VacancyStatus {
    #[default]
    Active,
    Closed,
}

impl VacancyStatus {
    /// Parse a client-supplied status string, case-insensitively. Unknown
    /// values are rejected rather than coerced.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "ACTIVE" => Some(Self::Active),
            "CLOSED" => Some(Self::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for VacancyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Closed => write!(f, "CLOSED"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobVacancy {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub requirements: String,
    pub salary: Option<String>,
    pub status: VacancyStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobVacancy {
    pub fn is_accepting_applications(&self) -> bool {
        self.status == VacancyStatus::Active
    }
}

/// Compact vacancy view embedded in application listings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VacancySummary {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
}

impl From<&JobVacancy> for VacancySummary {
    fn from(vacancy: &JobVacancy) -> Self {
        Self {
            id: vacancy.id,
            title: vacancy.title.clone(),
            company: vacancy.company.clone(),
            location: vacancy.location.clone(),
        }
    }
}

/// Partial update applied to a stored vacancy. `None` fields keep their
/// current value; `salary` uses a nested Option so it can be cleared.
#[derive(Debug, Default)]
pub struct VacancyUpdate {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub salary: Option<Option<String>>,
    pub status: Option<VacancyStatus>,
}
