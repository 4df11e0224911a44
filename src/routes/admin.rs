//! Admin route handlers
//!
//! Full management surface for users, vacancies, and applications. Every
//! route here sits behind the session resolver and the admin guard. Updates
//! resolve the target record before validating the payload, so a missing
//! record answers 404 even when the payload is also bad.

use crate::auth::{hash_password, Role};
use crate::error::{not_found_error, validation_error, ApiResult};
use crate::models::{
    Application, ApplicationStatus, JobVacancy, MessageResponse, User, UserBrief, UserUpdate,
    VacancyStatus, VacancySummary, VacancyUpdate,
};
use crate::pagination::{ListQuery, Pagination};
use crate::routes::vacancies::VacancyListResponse;
use crate::routes::{non_empty, parse_id};
use crate::state::SharedState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

// ============================================
// Request/Response Types
// ============================================

#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateVacancyRequest {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub salary: Option<String>,
    pub status: Option<String>,
}

/// Update payload for a vacancy. `salary` distinguishes an absent field
/// (keep the current value) from an explicit null (clear it).
#[derive(Debug, Default, Deserialize)]
pub struct UpdateVacancyRequest {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub salary: Option<Option<String>>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateApplicationRequest {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct UserMutated {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct VacancyMutated {
    pub message: String,
    pub vacancy: JobVacancy,
}

/// Application as admins see it, with applicant and vacancy embedded.
/// Either embed serializes as null when its record has been removed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminApplication {
    #[serde(flatten)]
    pub application: Application,
    pub user: Option<UserBrief>,
    pub job_vacancy: Option<VacancySummary>,
}

#[derive(Debug, Serialize)]
pub struct AdminApplicationList {
    pub applications: Vec<AdminApplication>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct ApplicationMutated {
    pub message: String,
    pub application: Application,
}

/// Deserialize a field so that absent, null, and a value are all distinct.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

// ============================================
// User Management
// ============================================

/// GET /api/admin/users
///
/// Paginated user listing, newest first, optionally filtered by role.
pub async fn list_users(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<UserListResponse>> {
    query.validate().map_err(|e| validation_error(e.to_string()))?;

    let role = match &query.role {
        None => None,
        Some(raw) => {
            Some(Role::parse(raw).ok_or_else(|| validation_error("Invalid role filter"))?)
        }
    };

    let users = state
        .users
        .list(role, query.offset(), query.limit() as usize)
        .await;
    let total = state.users.count(role).await;

    Ok(Json(UserListResponse {
        users,
        pagination: Pagination::new(total, &query),
    }))
}

/// GET /api/admin/users/{id}
pub async fn user_details(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    let id = parse_id(&id, "User not found")?;

    let user = state
        .users
        .find_by_id(id)
        .await
        .ok_or_else(|| not_found_error("User not found"))?;

    Ok(Json(user))
}

/// POST /api/admin/users
///
/// Create an account directly. Role defaults to MEMBER when not given.
pub async fn create_user(
    State(state): State<SharedState>,
    Extension(admin): Extension<User>,
    body: Option<Json<CreateUserRequest>>,
) -> ApiResult<(StatusCode, Json<UserMutated>)> {
    let req = body.map(|Json(b)| b).unwrap_or_default();

    let (name, email, password) = match (
        non_empty(&req.name),
        non_empty(&req.email),
        non_empty(&req.password),
    ) {
        (Some(name), Some(email), Some(password)) => (name, email, password),
        _ => return Err(validation_error("Name, email, and password are required")),
    };

    let role = match non_empty(&req.role) {
        None => Role::Member,
        Some(raw) => {
            Role::parse(raw).ok_or_else(|| validation_error("Role must be either ADMIN or MEMBER"))?
        }
    };

    let password_hash = hash_password(password)?;
    let user = state
        .users
        .create(User::new(email, password_hash, name, role))
        .await?;

    info!("Admin {} created {} account {}", admin.email, user.role, user.email);

    Ok((
        StatusCode::CREATED,
        Json(UserMutated {
            message: "User created successfully".to_string(),
            user,
        }),
    ))
}

/// PUT /api/admin/users/{id}
///
/// Partial update. Admins cannot change their own role.
pub async fn update_user(
    State(state): State<SharedState>,
    Extension(admin): Extension<User>,
    Path(id): Path<String>,
    body: Option<Json<UpdateUserRequest>>,
) -> ApiResult<Json<UserMutated>> {
    let req = body.map(|Json(b)| b).unwrap_or_default();
    let id = parse_id(&id, "User not found")?;

    let target = state
        .users
        .find_by_id(id)
        .await
        .ok_or_else(|| not_found_error("User not found"))?;

    if non_empty(&req.role).is_some() && target.id == admin.id {
        return Err(validation_error("Cannot change your own role"));
    }

    let role = match non_empty(&req.role) {
        None => None,
        Some(raw) => Some(
            Role::parse(raw)
                .ok_or_else(|| validation_error("Role must be either ADMIN or MEMBER"))?,
        ),
    };

    let password_hash = match non_empty(&req.password) {
        None => None,
        Some(password) => Some(hash_password(password)?),
    };

    let user = state
        .users
        .update(
            id,
            UserUpdate {
                name: non_empty(&req.name).map(str::to_string),
                email: non_empty(&req.email).map(str::to_string),
                password_hash,
                role,
            },
        )
        .await?;

    info!("Admin {} updated user {}", admin.email, user.email);

    Ok(Json(UserMutated {
        message: "User updated successfully".to_string(),
        user,
    }))
}

/// DELETE /api/admin/users/{id}
///
/// Remove an account and its applications. Admins cannot delete themselves.
pub async fn delete_user(
    State(state): State<SharedState>,
    Extension(admin): Extension<User>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id, "User not found")?;

    let target = state
        .users
        .find_by_id(id)
        .await
        .ok_or_else(|| not_found_error("User not found"))?;

    if target.id == admin.id {
        return Err(validation_error("Cannot delete your own account"));
    }

    state.users.delete(id).await?;
    let removed = state.applications.delete_for_user(id).await;

    info!(
        "Admin {} deleted user {} and {} of their applications",
        admin.email, target.email, removed
    );

    Ok(Json(MessageResponse::new("User deleted successfully")))
}

// ============================================
// Vacancy Management
// ============================================

/// GET /api/admin/vacancies
///
/// Same listing as the public one, kept under the admin prefix so the
/// management UI can stay inside it.
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

/// POST /api/admin/vacancies
pub async fn create_vacancy(
    State(state): State<SharedState>,
    Extension(admin): Extension<User>,
    body: Option<Json<CreateVacancyRequest>>,
) -> ApiResult<(StatusCode, Json<VacancyMutated>)> {
    let req = body.map(|Json(b)| b).unwrap_or_default();

    let (title, company, location, description, requirements) = match (
        non_empty(&req.title),
        non_empty(&req.company),
        non_empty(&req.location),
        non_empty(&req.description),
        non_empty(&req.requirements),
    ) {
        (Some(t), Some(c), Some(l), Some(d), Some(r)) => (t, c, l, d, r),
        _ => {
            return Err(validation_error(
                "Title, company, location, description, and requirements are required",
            ))
        }
    };

    let status = match non_empty(&req.status) {
        None => VacancyStatus::default(),
        Some(raw) => VacancyStatus::parse(raw)
            .ok_or_else(|| validation_error("Status must be either ACTIVE or CLOSED"))?,
    };

    let now = Utc::now();
    let vacancy = state
        .vacancies
        .create(JobVacancy {
            id: Uuid::new_v4(),
            title: title.to_string(),
            company: company.to_string(),
            location: location.to_string(),
            description: description.to_string(),
            requirements: requirements.to_string(),
            salary: non_empty(&req.salary).map(str::to_string),
            status,
            created_by: admin.id,
            created_at: now,
            updated_at: now,
        })
        .await?;

    info!("Admin {} posted vacancy '{}'", admin.email, vacancy.title);

    Ok((
        StatusCode::CREATED,
        Json(VacancyMutated {
            message: "Job vacancy created successfully".to_string(),
            vacancy,
        }),
    ))
}

/// PUT /api/admin/vacancies/{id}
pub async fn update_vacancy(
    State(state): State<SharedState>,
    Extension(admin): Extension<User>,
    Path(id): Path<String>,
    body: Option<Json<UpdateVacancyRequest>>,
) -> ApiResult<Json<VacancyMutated>> {
    let req = body.map(|Json(b)| b).unwrap_or_default();
    let id = parse_id(&id, "Job vacancy not found")?;

    state
        .vacancies
        .find_by_id(id)
        .await
        .ok_or_else(|| not_found_error("Job vacancy not found"))?;

    let status = match non_empty(&req.status) {
        None => None,
        Some(raw) => Some(
            VacancyStatus::parse(raw)
                .ok_or_else(|| validation_error("Status must be either ACTIVE or CLOSED"))?,
        ),
    };

    // An explicit empty or null salary clears the stored one
    let salary = req.salary.map(|s| s.filter(|s| !s.is_empty()));

    let vacancy = state
        .vacancies
        .update(
            id,
            VacancyUpdate {
                title: non_empty(&req.title).map(str::to_string),
                company: non_empty(&req.company).map(str::to_string),
                location: non_empty(&req.location).map(str::to_string),
                description: non_empty(&req.description).map(str::to_string),
                requirements: non_empty(&req.requirements).map(str::to_string),
                salary,
                status,
            },
        )
        .await?;

    info!("Admin {} updated vacancy '{}'", admin.email, vacancy.title);

    Ok(Json(VacancyMutated {
        message: "Job vacancy updated successfully".to_string(),
        vacancy,
    }))
}

/// DELETE /api/admin/vacancies/{id}
///
/// Remove a vacancy and every application submitted to it.
pub async fn delete_vacancy(
    State(state): State<SharedState>,
    Extension(admin): Extension<User>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id, "Job vacancy not found")?;

    let vacancy = state
        .vacancies
        .find_by_id(id)
        .await
        .ok_or_else(|| not_found_error("Job vacancy not found"))?;

    state.vacancies.delete(id).await?;
    let removed = state.applications.delete_for_vacancy(id).await;

    info!(
        "Admin {} deleted vacancy '{}' and {} applications",
        admin.email, vacancy.title, removed
    );

    Ok(Json(MessageResponse::new("Job vacancy deleted successfully")))
}

// ============================================
// Application Management
// ============================================

/// GET /api/admin/applications
///
/// All applications across vacancies with applicant and vacancy embedded,
/// newest first, optionally filtered by status.
pub async fn list_applications(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<AdminApplicationList>> {
    query.validate().map_err(|e| validation_error(e.to_string()))?;

    let status = match &query.status {
        None => None,
        Some(raw) => Some(
            ApplicationStatus::parse(raw)
                .ok_or_else(|| validation_error("Invalid status filter"))?,
        ),
    };

    let total = state.applications.count(status).await;
    let mut applications = Vec::new();
    for application in state
        .applications
        .list(status, query.offset(), query.limit() as usize)
        .await
    {
        let user = state
            .users
            .find_by_id(application.user_id)
            .await
            .map(|u| UserBrief::from(&u));
        let job_vacancy = state
            .vacancies
            .find_by_id(application.job_vacancy_id)
            .await
            .map(|v| VacancySummary::from(&v));
        applications.push(AdminApplication {
            application,
            user,
            job_vacancy,
        });
    }

    Ok(Json(AdminApplicationList {
        applications,
        pagination: Pagination::new(total, &query),
    }))
}

/// PUT /api/admin/applications/{id}
///
/// Move an application through the review pipeline.
pub async fn update_application(
    State(state): State<SharedState>,
    Extension(admin): Extension<User>,
    Path(id): Path<String>,
    body: Option<Json<UpdateApplicationRequest>>,
) -> ApiResult<Json<ApplicationMutated>> {
    let req = body.map(|Json(b)| b).unwrap_or_default();
    let id = parse_id(&id, "Application not found")?;

    state
        .applications
        .find_by_id(id)
        .await
        .ok_or_else(|| not_found_error("Application not found"))?;

    let status = non_empty(&req.status)
        .and_then(ApplicationStatus::parse)
        .ok_or_else(|| validation_error("Valid status is required"))?;

    let application = state.applications.update_status(id, status).await?;

    info!(
        "Admin {} moved application {} to {}",
        admin.email, application.id, application.status
    );

    Ok(Json(ApplicationMutated {
        message: "Application status updated successfully".to_string(),
        application,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use crate::routes::create_router;
    use crate::routes::testing::{json_request, seed_user, send, test_state};
    use axum::http::Method;
    use serde_json::json;

    async fn seed_vacancy(
        state: &SharedState,
        title: &str,
        status: VacancyStatus,
        created_by: Uuid,
    ) -> JobVacancy {
        let now = Utc::now();
        state
            .vacancies
            .create(JobVacancy {
                id: Uuid::new_v4(),
                title: title.to_string(),
                company: "Acme".to_string(),
                location: "Remote".to_string(),
                description: "Build things".to_string(),
                requirements: "Rust".to_string(),
                salary: None,
                status,
                created_by,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap()
    }

    async fn seed_application(state: &SharedState, user_id: Uuid, vacancy_id: Uuid) -> Application {
        state
            .applications
            .create(Application::new(user_id, vacancy_id, None))
            .await
            .unwrap()
    }

    // ============================================
    // Guards
    // ============================================

    #[tokio::test]
    async fn test_admin_routes_require_an_admin_session() {
        let state = test_state();
        let (_, member_token) = seed_user(&state, "m@test.com", "p", "M", Role::Member).await;
        let router = create_router(state);

        for uri in ["/api/admin/users", "/api/admin/vacancies", "/api/admin/applications"] {
            let (status, body) =
                send(router.clone(), json_request(Method::GET, uri, None, None)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body["error"], "Access token required");

            let (status, body) = send(
                router.clone(),
                json_request(Method::GET, uri, Some(member_token.as_str()), None),
            )
            .await;
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert_eq!(body["error"], "Admin access required");
        }
    }

    // ============================================
    // Users
    // ============================================

    #[tokio::test]
    async fn test_list_users_with_role_filter() {
        let state = test_state();
        let (_, token) = seed_user(&state, "a@test.com", "p", "A", Role::Admin).await;
        seed_user(&state, "m1@test.com", "p", "M1", Role::Member).await;
        seed_user(&state, "m2@test.com", "p", "M2", Role::Member).await;
        let router = create_router(state);

        let (status, body) = send(
            router.clone(),
            json_request(Method::GET, "/api/admin/users", Some(token.as_str()), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["users"].as_array().unwrap().len(), 3);
        assert_eq!(body["pagination"]["total"], 3);
        // The hash never leaves the store
        assert!(body["users"][0]["passwordHash"].is_null());
        assert!(body["users"][0]["password"].is_null());

        let (status, body) = send(
            router.clone(),
            json_request(
                Method::GET,
                "/api/admin/users?role=member",
                Some(token.as_str()),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["users"].as_array().unwrap().len(), 2);
        assert_eq!(body["pagination"]["total"], 2);

        let (status, body) = send(
            router,
            json_request(
                Method::GET,
                "/api/admin/users?role=wizard",
                Some(token.as_str()),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid role filter");
    }

    #[tokio::test]
    async fn test_user_details_by_id() {
        let state = test_state();
        let (_, token) = seed_user(&state, "a@test.com", "p", "A", Role::Admin).await;
        let (member, _) = seed_user(&state, "m@test.com", "p", "Mia", Role::Member).await;
        let router = create_router(state);

        let (status, body) = send(
            router.clone(),
            json_request(
                Method::GET,
                &format!("/api/admin/users/{}", member.id),
                Some(token.as_str()),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        // Bare record, no wrapper
        assert_eq!(body["id"], member.id.to_string());
        assert_eq!(body["name"], "Mia");
        assert_eq!(body["role"], "MEMBER");
        assert!(body["createdAt"].is_string());

        for uri in [
            format!("/api/admin/users/{}", Uuid::new_v4()),
            "/api/admin/users/99999".to_string(),
        ] {
            let (status, body) = send(
                router.clone(),
                json_request(Method::GET, &uri, Some(token.as_str()), None),
            )
            .await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body["error"], "User not found");
        }
    }

    #[tokio::test]
    async fn test_create_user() {
        let state = test_state();
        let (_, token) = seed_user(&state, "a@test.com", "p", "A", Role::Admin).await;
        let router = create_router(state.clone());

        let (status, body) = send(
            router,
            json_request(
                Method::POST,
                "/api/admin/users",
                Some(token.as_str()),
                Some(json!({"name": "New", "email": "new@test.com", "password": "pass123"})),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "User created successfully");
        assert_eq!(body["user"]["email"], "new@test.com");
        assert_eq!(body["user"]["role"], "MEMBER");

        let stored = state.users.find_by_email("new@test.com").await.unwrap();
        assert!(verify_password("pass123", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_create_user_validation() {
        let state = test_state();
        let (_, token) = seed_user(&state, "a@test.com", "p", "A", Role::Admin).await;
        let router = create_router(state);

        for body in [
            None,
            Some(json!({})),
            Some(json!({"email": "x@test.com", "password": "p"})),
            Some(json!({"name": "", "email": "x@test.com", "password": "p"})),
        ] {
            let (status, response) = send(
                router.clone(),
                json_request(Method::POST, "/api/admin/users", Some(token.as_str()), body),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(response["error"], "Name, email, and password are required");
        }

        let (status, body) = send(
            router.clone(),
            json_request(
                Method::POST,
                "/api/admin/users",
                Some(token.as_str()),
                Some(json!({"name": "X", "email": "a@test.com", "password": "p"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "User with this email already exists");

        let (status, body) = send(
            router.clone(),
            json_request(
                Method::POST,
                "/api/admin/users",
                Some(token.as_str()),
                Some(json!({"name": "X", "email": "x@test.com", "password": "p", "role": "SUPER"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Role must be either ADMIN or MEMBER");

        // Role parsing is case-insensitive
        let (status, body) = send(
            router,
            json_request(
                Method::POST,
                "/api/admin/users",
                Some(token.as_str()),
                Some(json!({"name": "X", "email": "x@test.com", "password": "p", "role": "admin"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["role"], "ADMIN");
    }

    #[tokio::test]
    async fn test_update_user() {
        let state = test_state();
        let (_, token) = seed_user(&state, "a@test.com", "p", "A", Role::Admin).await;
        let (member, _) = seed_user(&state, "m@test.com", "old", "Old Name", Role::Member).await;
        let router = create_router(state.clone());

        let (status, body) = send(
            router,
            json_request(
                Method::PUT,
                &format!("/api/admin/users/{}", member.id),
                Some(token.as_str()),
                Some(json!({"name": "New Name", "password": "fresh", "role": "ADMIN"})),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "User updated successfully");
        assert_eq!(body["user"]["name"], "New Name");
        assert_eq!(body["user"]["role"], "ADMIN");
        assert_eq!(body["user"]["email"], "m@test.com");

        let stored = state.users.find_by_id(member.id).await.unwrap();
        assert!(verify_password("fresh", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_update_user_resolves_the_target_first() {
        let state = test_state();
        let (_, token) = seed_user(&state, "a@test.com", "p", "A", Role::Admin).await;
        let router = create_router(state);

        // Missing target beats a bad payload
        let (status, body) = send(
            router,
            json_request(
                Method::PUT,
                &format!("/api/admin/users/{}", Uuid::new_v4()),
                Some(token.as_str()),
                Some(json!({"role": "SUPER"})),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "User not found");
    }

    #[tokio::test]
    async fn test_admins_cannot_change_their_own_role() {
        let state = test_state();
        let (admin, token) = seed_user(&state, "a@test.com", "p", "A", Role::Admin).await;
        let router = create_router(state);
        let uri = format!("/api/admin/users/{}", admin.id);

        let (status, body) = send(
            router.clone(),
            json_request(
                Method::PUT,
                &uri,
                Some(token.as_str()),
                Some(json!({"role": "MEMBER"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Cannot change your own role");

        // Even a no-op role is rejected but other fields are fine
        let (status, body) = send(
            router.clone(),
            json_request(
                Method::PUT,
                &uri,
                Some(token.as_str()),
                Some(json!({"role": "ADMIN"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Cannot change your own role");

        let (status, body) = send(
            router,
            json_request(
                Method::PUT,
                &uri,
                Some(token.as_str()),
                Some(json!({"name": "Renamed"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["name"], "Renamed");
    }

    #[tokio::test]
    async fn test_update_user_rejects_a_taken_email() {
        let state = test_state();
        let (_, token) = seed_user(&state, "a@test.com", "p", "A", Role::Admin).await;
        let (member, _) = seed_user(&state, "m@test.com", "p", "M", Role::Member).await;
        let router = create_router(state);

        let (status, body) = send(
            router,
            json_request(
                Method::PUT,
                &format!("/api/admin/users/{}", member.id),
                Some(token.as_str()),
                Some(json!({"email": "a@test.com"})),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "User with this email already exists");
    }

    #[tokio::test]
    async fn test_delete_user_cascades_applications() {
        let state = test_state();
        let (admin, token) = seed_user(&state, "a@test.com", "p", "A", Role::Admin).await;
        let (member, _) = seed_user(&state, "m@test.com", "p", "M", Role::Member).await;
        let vacancy = seed_vacancy(&state, "Engineer", VacancyStatus::Active, admin.id).await;
        seed_application(&state, member.id, vacancy.id).await;
        let router = create_router(state.clone());

        let (status, body) = send(
            router,
            json_request(
                Method::DELETE,
                &format!("/api/admin/users/{}", member.id),
                Some(token.as_str()),
                None,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "User deleted successfully");
        assert!(state.users.find_by_id(member.id).await.is_none());
        assert!(state.applications.list_for_user(member.id).await.is_empty());
    }

    #[tokio::test]
    async fn test_admins_cannot_delete_themselves() {
        let state = test_state();
        let (admin, token) = seed_user(&state, "a@test.com", "p", "A", Role::Admin).await;
        let router = create_router(state.clone());

        let (status, body) = send(
            router,
            json_request(
                Method::DELETE,
                &format!("/api/admin/users/{}", admin.id),
                Some(token.as_str()),
                None,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Cannot delete your own account");
        assert!(state.users.find_by_id(admin.id).await.is_some());
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let state = test_state();
        let (_, token) = seed_user(&state, "a@test.com", "p", "A", Role::Admin).await;
        let router = create_router(state);

        let (status, body) = send(
            router,
            json_request(
                Method::DELETE,
                &format!("/api/admin/users/{}", Uuid::new_v4()),
                Some(token.as_str()),
                None,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "User not found");
    }

    // ============================================
    // Vacancies
    // ============================================

    #[tokio::test]
    async fn test_admin_listing_covers_closed_vacancies() {
        let state = test_state();
        let (admin, token) = seed_user(&state, "a@test.com", "p", "A", Role::Admin).await;
        seed_vacancy(&state, "Open", VacancyStatus::Active, admin.id).await;
        seed_vacancy(&state, "Done", VacancyStatus::Closed, admin.id).await;
        let router = create_router(state);

        let (status, body) = send(
            router.clone(),
            json_request(Method::GET, "/api/admin/vacancies", Some(token.as_str()), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["vacancies"].as_array().unwrap().len(), 2);

        let (status, body) = send(
            router,
            json_request(
                Method::GET,
                "/api/admin/vacancies?status=closed",
                Some(token.as_str()),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let vacancies = body["vacancies"].as_array().unwrap();
        assert_eq!(vacancies.len(), 1);
        assert_eq!(vacancies[0]["title"], "Done");
    }

    #[tokio::test]
    async fn test_create_vacancy() {
        let state = test_state();
        let (admin, token) = seed_user(&state, "a@test.com", "p", "A", Role::Admin).await;
        let router = create_router(state);

        let (status, body) = send(
            router,
            json_request(
                Method::POST,
                "/api/admin/vacancies",
                Some(token.as_str()),
                Some(json!({
                    "title": "Engineer",
                    "company": "Acme",
                    "location": "Remote",
                    "description": "Build things",
                    "requirements": "Rust",
                    "salary": "$90,000"
                })),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Job vacancy created successfully");
        assert_eq!(body["vacancy"]["status"], "ACTIVE");
        assert_eq!(body["vacancy"]["salary"], "$90,000");
        assert_eq!(body["vacancy"]["createdBy"], admin.id.to_string());
    }

    #[tokio::test]
    async fn test_create_vacancy_validation() {
        let state = test_state();
        let (_, token) = seed_user(&state, "a@test.com", "p", "A", Role::Admin).await;
        let router = create_router(state);

        for body in [
            None,
            Some(json!({"title": "Engineer"})),
            Some(json!({
                "title": "Engineer",
                "company": "Acme",
                "location": "Remote",
                "description": "Build things",
                "requirements": ""
            })),
        ] {
            let (status, response) = send(
                router.clone(),
                json_request(Method::POST, "/api/admin/vacancies", Some(token.as_str()), body),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(
                response["error"],
                "Title, company, location, description, and requirements are required"
            );
        }

        let (status, body) = send(
            router.clone(),
            json_request(
                Method::POST,
                "/api/admin/vacancies",
                Some(token.as_str()),
                Some(json!({
                    "title": "Engineer",
                    "company": "Acme",
                    "location": "Remote",
                    "description": "Build things",
                    "requirements": "Rust",
                    "status": "PAUSED"
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Status must be either ACTIVE or CLOSED");

        let (status, body) = send(
            router,
            json_request(
                Method::POST,
                "/api/admin/vacancies",
                Some(token.as_str()),
                Some(json!({
                    "title": "Archived",
                    "company": "Acme",
                    "location": "Remote",
                    "description": "Old role",
                    "requirements": "Rust",
                    "status": "closed"
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["vacancy"]["status"], "CLOSED");
    }

    #[tokio::test]
    async fn test_update_vacancy() {
        let state = test_state();
        let (admin, token) = seed_user(&state, "a@test.com", "p", "A", Role::Admin).await;
        let vacancy = seed_vacancy(&state, "Engineer", VacancyStatus::Active, admin.id).await;
        let router = create_router(state.clone());
        let uri = format!("/api/admin/vacancies/{}", vacancy.id);

        let (status, body) = send(
            router.clone(),
            json_request(
                Method::PUT,
                &uri,
                Some(token.as_str()),
                Some(json!({"title": "Senior Engineer", "status": "CLOSED"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Job vacancy updated successfully");
        assert_eq!(body["vacancy"]["title"], "Senior Engineer");
        assert_eq!(body["vacancy"]["status"], "CLOSED");
        // Untouched fields survive
        assert_eq!(body["vacancy"]["company"], "Acme");

        let (status, body) = send(
            router,
            json_request(
                Method::PUT,
                &uri,
                Some(token.as_str()),
                Some(json!({"status": "PAUSED"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Status must be either ACTIVE or CLOSED");
    }

    #[tokio::test]
    async fn test_update_vacancy_salary_semantics() {
        let state = test_state();
        let (admin, token) = seed_user(&state, "a@test.com", "p", "A", Role::Admin).await;
        let vacancy = seed_vacancy(&state, "Engineer", VacancyStatus::Active, admin.id).await;
        state
            .vacancies
            .update(
                vacancy.id,
                VacancyUpdate {
                    salary: Some(Some("$80,000".to_string())),
                    ..VacancyUpdate::default()
                },
            )
            .await
            .unwrap();
        let router = create_router(state.clone());
        let uri = format!("/api/admin/vacancies/{}", vacancy.id);

        // Absent salary keeps the current value
        let (status, body) = send(
            router.clone(),
            json_request(
                Method::PUT,
                &uri,
                Some(token.as_str()),
                Some(json!({"title": "Still Engineer"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["vacancy"]["salary"], "$80,000");

        // Explicit null clears it
        let (status, body) = send(
            router,
            json_request(
                Method::PUT,
                &uri,
                Some(token.as_str()),
                Some(json!({"salary": null})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["vacancy"]["salary"].is_null());
    }

    #[tokio::test]
    async fn test_update_missing_vacancy() {
        let state = test_state();
        let (_, token) = seed_user(&state, "a@test.com", "p", "A", Role::Admin).await;
        let router = create_router(state);

        for uri in [
            format!("/api/admin/vacancies/{}", Uuid::new_v4()),
            "/api/admin/vacancies/99999".to_string(),
        ] {
            let (status, body) = send(
                router.clone(),
                json_request(
                    Method::PUT,
                    &uri,
                    Some(token.as_str()),
                    Some(json!({"status": "PAUSED"})),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body["error"], "Job vacancy not found");
        }
    }

    #[tokio::test]
    async fn test_delete_vacancy_cascades_applications() {
        let state = test_state();
        let (admin, token) = seed_user(&state, "a@test.com", "p", "A", Role::Admin).await;
        let (member, _) = seed_user(&state, "m@test.com", "p", "M", Role::Member).await;
        let vacancy = seed_vacancy(&state, "Engineer", VacancyStatus::Active, admin.id).await;
        let application = seed_application(&state, member.id, vacancy.id).await;
        let router = create_router(state.clone());

        let (status, body) = send(
            router,
            json_request(
                Method::DELETE,
                &format!("/api/admin/vacancies/{}", vacancy.id),
                Some(token.as_str()),
                None,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Job vacancy deleted successfully");
        assert!(state.vacancies.find_by_id(vacancy.id).await.is_none());
        assert!(state.applications.find_by_id(application.id).await.is_none());
    }

    // ============================================
    // Applications
    // ============================================

    #[tokio::test]
    async fn test_list_applications_with_embeds() {
        let state = test_state();
        let (admin, token) = seed_user(&state, "a@test.com", "p", "A", Role::Admin).await;
        let (member, _) = seed_user(&state, "m@test.com", "p", "Mia", Role::Member).await;
        let vacancy = seed_vacancy(&state, "Engineer", VacancyStatus::Active, admin.id).await;
        seed_application(&state, member.id, vacancy.id).await;
        let router = create_router(state);

        let (status, body) = send(
            router.clone(),
            json_request(
                Method::GET,
                "/api/admin/applications",
                Some(token.as_str()),
                None,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let applications = body["applications"].as_array().unwrap();
        assert_eq!(applications.len(), 1);
        assert_eq!(applications[0]["status"], "PENDING");
        assert_eq!(applications[0]["user"]["name"], "Mia");
        assert_eq!(applications[0]["user"]["email"], "m@test.com");
        assert_eq!(applications[0]["jobVacancy"]["title"], "Engineer");
        assert_eq!(body["pagination"]["total"], 1);

        let (status, body) = send(
            router.clone(),
            json_request(
                Method::GET,
                "/api/admin/applications?status=accepted",
                Some(token.as_str()),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["applications"].as_array().unwrap().is_empty());

        let (status, body) = send(
            router,
            json_request(
                Method::GET,
                "/api/admin/applications?status=bogus",
                Some(token.as_str()),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid status filter");
    }

    #[tokio::test]
    async fn test_update_application_status() {
        let state = test_state();
        let (admin, token) = seed_user(&state, "a@test.com", "p", "A", Role::Admin).await;
        let (member, _) = seed_user(&state, "m@test.com", "p", "M", Role::Member).await;
        let vacancy = seed_vacancy(&state, "Engineer", VacancyStatus::Active, admin.id).await;
        let application = seed_application(&state, member.id, vacancy.id).await;
        let router = create_router(state.clone());
        let uri = format!("/api/admin/applications/{}", application.id);

        let (status, body) = send(
            router.clone(),
            json_request(
                Method::PUT,
                &uri,
                Some(token.as_str()),
                Some(json!({"status": "REVIEWED"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Application status updated successfully");
        assert_eq!(body["application"]["status"], "REVIEWED");

        // Case-insensitive like the other enums
        let (status, body) = send(
            router,
            json_request(
                Method::PUT,
                &uri,
                Some(token.as_str()),
                Some(json!({"status": "accepted"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["application"]["status"], "ACCEPTED");

        let stored = state.applications.find_by_id(application.id).await.unwrap();
        assert_eq!(stored.status, ApplicationStatus::Accepted);
    }

    #[tokio::test]
    async fn test_update_application_validation() {
        let state = test_state();
        let (admin, token) = seed_user(&state, "a@test.com", "p", "A", Role::Admin).await;
        let (member, _) = seed_user(&state, "m@test.com", "p", "M", Role::Member).await;
        let vacancy = seed_vacancy(&state, "Engineer", VacancyStatus::Active, admin.id).await;
        let application = seed_application(&state, member.id, vacancy.id).await;
        let router = create_router(state);
        let uri = format!("/api/admin/applications/{}", application.id);

        for body in [None, Some(json!({})), Some(json!({"status": ""})), Some(json!({"status": "WRONG"}))] {
            let (status, response) = send(
                router.clone(),
                json_request(Method::PUT, &uri, Some(token.as_str()), body),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(response["error"], "Valid status is required");
        }

        // Missing target beats a bad payload
        let (status, body) = send(
            router,
            json_request(
                Method::PUT,
                &format!("/api/admin/applications/{}", Uuid::new_v4()),
                Some(token.as_str()),
                Some(json!({"status": "WRONG"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Application not found");
    }
}
