//! Member route handlers
//!
//! Everything here runs behind the session resolver and the member guard,
//! and every lookup is scoped to the signed-in member. Another member's
//! application is indistinguishable from one that does not exist.

use crate::error::{not_found_error, ApiResult};
use crate::models::{Application, JobVacancy, User, VacancySummary};
use crate::routes::parse_id;
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;

// ============================================
// Response Types
// ============================================

/// List entry: the application with a slim view of its vacancy. The vacancy
/// serializes as null if an admin removed it without cascading.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationEntry {
    #[serde(flatten)]
    pub application: Application,
    pub job_vacancy: Option<VacancySummary>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationListResponse {
    pub applications: Vec<ApplicationEntry>,
}

/// Detail view embeds the full vacancy record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDetail {
    #[serde(flatten)]
    pub application: Application,
    pub job_vacancy: Option<JobVacancy>,
}

// ============================================
// Route Handlers
// ============================================

/// GET /api/member/applications
///
/// All of the signed-in member's applications, newest first.
pub async fn list_applications(
    State(state): State<SharedState>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<ApplicationListResponse>> {
    let mut applications = Vec::new();
    for application in state.applications.list_for_user(user.id).await {
        let job_vacancy = state
            .vacancies
            .find_by_id(application.job_vacancy_id)
            .await
            .map(|v| VacancySummary::from(&v));
        applications.push(ApplicationEntry {
            application,
            job_vacancy,
        });
    }

    Ok(Json(ApplicationListResponse { applications }))
}

/// GET /api/member/applications/{id}
///
/// One of the signed-in member's applications with its vacancy.
pub async fn application_details(
    State(state): State<SharedState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApplicationDetail>> {
    let id = parse_id(&id, "Application not found")?;

    let application = state
        .applications
        .find_for_user(id, user.id)
        .await
        .ok_or_else(|| not_found_error("Application not found"))?;

    let job_vacancy = state.vacancies.find_by_id(application.job_vacancy_id).await;

    Ok(Json(ApplicationDetail {
        application,
        job_vacancy,
    }))
}
