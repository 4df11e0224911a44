//! Job application storage
//!
//! Enforces the one-application-per-vacancy rule and owns the ownership
//! predicate used by member-scoped reads.

use crate::error::AppError;
use crate::models::{Application, ApplicationStatus};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory application store
pub struct ApplicationStore {
    applications: Arc<RwLock<HashMap<Uuid, Application>>>,
}

impl ApplicationStore {
    pub fn new() -> Self {
        Self {
            applications: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a new application
    pub async fn create(&self, application: Application) -> Result<Application, AppError> {
        let mut applications = self.applications.write().await;

        // One application per user and vacancy
        let duplicate = applications.values().any(|a| {
            a.user_id == application.user_id && a.job_vacancy_id == application.job_vacancy_id
        });
        if duplicate {
            return Err(AppError::Conflict(
                "You have already applied to this job".to_string(),
            ));
        }

        applications.insert(application.id, application.clone());
        Ok(application)
    }

    /// Find application by ID
    pub async fn find_by_id(&self, id: Uuid) -> Option<Application> {
        let applications = self.applications.read().await;
        applications.get(&id).cloned()
    }

    /// Find application by ID, only if owned by the given user
    ///
    /// Ownership is part of the lookup, so callers cannot fetch first and
    /// filter later. A non-owned id is indistinguishable from a missing one.
    pub async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> Option<Application> {
        let applications = self.applications.read().await;
        applications
            .get(&id)
            .filter(|a| a.user_id == user_id)
            .cloned()
    }

    /// Find the application a user submitted for a vacancy, if any
    pub async fn find_by_user_and_vacancy(
        &self,
        user_id: Uuid,
        job_vacancy_id: Uuid,
    ) -> Option<Application> {
        let applications = self.applications.read().await;
        applications
            .values()
            .find(|a| a.user_id == user_id && a.job_vacancy_id == job_vacancy_id)
            .cloned()
    }

    /// List applications, newest first, optionally filtered by status
    pub async fn list(
        &self,
        status: Option<ApplicationStatus>,
        offset: usize,
        limit: usize,
    ) -> Vec<Application> {
        let applications = self.applications.read().await;
        let mut matched: Vec<Application> = applications
            .values()
            .filter(|a| status.map_or(true, |s| a.status == s))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched.into_iter().skip(offset).take(limit).collect()
    }

    /// List a user's applications, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> Vec<Application> {
        let applications = self.applications.read().await;
        let mut matched: Vec<Application> = applications
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched
    }

    /// Count applications matching the status filter
    pub async fn count(&self, status: Option<ApplicationStatus>) -> u64 {
        let applications = self.applications.read().await;
        applications
            .values()
            .filter(|a| status.map_or(true, |s| a.status == s))
            .count() as u64
    }

    /// Update application status
    pub async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application, AppError> {
        let mut applications = self.applications.write().await;

        let application = applications
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

        application.status = status;
        application.updated_at = Utc::now();

        Ok(application.clone())
    }

    /// Remove all applications for a vacancy, returning how many were removed
    pub async fn delete_for_vacancy(&self, job_vacancy_id: Uuid) -> usize {
        let mut applications = self.applications.write().await;
        let before = applications.len();
        applications.retain(|_, a| a.job_vacancy_id != job_vacancy_id);
        before - applications.len()
    }

    /// Remove all applications submitted by a user, returning how many were removed
    pub async fn delete_for_user(&self, user_id: Uuid) -> usize {
        let mut applications = self.applications.write().await;
        let before = applications.len();
        applications.retain(|_, a| a.user_id != user_id);
        before - applications.len()
    }
}

impl Default for ApplicationStore {
    fn default() -> Self {
        Self::new()
    }
}
