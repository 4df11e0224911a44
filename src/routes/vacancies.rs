//! Public vacancy route handlers
//!
//! Listings and details are open to anyone; applying is member-only and the
//! router layers the session resolver and member guard in front of it.

use crate::error::{not_found_error, validation_error, ApiResult, AppError};
use crate::models::{Application, JobVacancy, User, UserBrief, VacancyStatus};
use crate::pagination::{ListQuery, Pagination};
use crate::routes::parse_id;
use crate::state::SharedState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

// ============================================
// Request/Response Types
// ============================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub cover_letter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VacancyListResponse {
    pub vacancies: Vec<JobVacancy>,
    pub pagination: Pagination,
}

/// Vacancy detail with its creator embedded. A creator removed after the
/// fact serializes as null.
#[derive(Debug, Serialize)]
pub struct VacancyDetail {
    #[serde(flatten)]
    pub vacancy: JobVacancy,
    pub creator: Option<UserBrief>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationCreated {
    pub message: String,
    pub application: Application,
}

// ============================================
// Route Handlers
// ============================================

/// GET /api/vacancies
///
/// Public paginated listing, newest first, optionally filtered by status.
pub async fn list_vacancies(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<VacancyListResponse>> {
    query.validate().map_err(|e| validation_error(e.to_string()))?;

    let status = match &query.status {
        None => None,
        Some(raw) => Some(
            VacancyStatus::parse(raw).ok_or_else(|| validation_error("Invalid status filter"))?,
        ),
    };

    let vacancies = state
        .vacancies
        .list(status, query.offset(), query.limit() as usize)
        .await;
    let total = state.vacancies.count(status).await;

    Ok(Json(VacancyListResponse {
        vacancies,
        pagination: Pagination::new(total, &query),
    }))
}

/// GET /api/vacancies/{id}
///
/// Public vacancy detail with creator info.
pub async fn vacancy_details(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<VacancyDetail>> {
    let id = parse_id(&id, "Job vacancy not found")?;

    let vacancy = state
        .vacancies
        .find_by_id(id)
        .await
        .ok_or_else(|| not_found_error("Job vacancy not found"))?;

    let creator = state
        .users
        .find_by_id(vacancy.created_by)
        .await
        .map(|u| UserBrief::from(&u));

    Ok(Json(VacancyDetail { vacancy, creator }))
}

/// POST /api/vacancies/{id}/apply
///
/// Submit an application to an active vacancy. One application per member
/// and vacancy; the cover letter is optional.
pub async fn apply(
    State(state): State<SharedState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    body: Option<Json<ApplyRequest>>,
) -> ApiResult<(StatusCode, Json<ApplicationCreated>)> {
    let req = body.map(|Json(b)| b).unwrap_or_default();
    let id = parse_id(&id, "Job vacancy not found")?;

    let vacancy = state
        .vacancies
        .find_by_id(id)
        .await
        .ok_or_else(|| not_found_error("Job vacancy not found"))?;

    if !vacancy.is_accepting_applications() {
        return Err(validation_error(
            "This job vacancy is not accepting applications",
        ));
    }

    // Fast-path duplicate check; the store enforces the rule under its lock
    if state
        .applications
        .find_by_user_and_vacancy(user.id, vacancy.id)
        .await
        .is_some()
    {
        return Err(AppError::Conflict(
            "You have already applied to this job".to_string(),
        ));
    }

    // An empty cover letter reads as none at all
    let cover_letter = req.cover_letter.filter(|c| !c.is_empty());
    let application = state
        .applications
        .create(Application::new(user.id, vacancy.id, cover_letter))
        .await?;

    info!("User {} applied to vacancy {}", user.id, vacancy.id);

    Ok((
        StatusCode::CREATED,
        Json(ApplicationCreated {
            message: "Application submitted successfully".to_string(),
            application,
        }),
    ))
}
