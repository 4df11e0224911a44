//! Job vacancy storage

use crate::error::AppError;
use crate::models::{JobVacancy, VacancyStatus, VacancyUpdate};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory vacancy store
pub struct VacancyStore {
    vacancies: Arc<RwLock<HashMap<Uuid, JobVacancy>>>,
}

impl VacancyStore {
    pub fn new() -> Self {
        Self {
            vacancies: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a new vacancy
    pub async fn create(&self, vacancy: JobVacancy) -> Result<JobVacancy, AppError> {
        let mut vacancies = self.vacancies.write().await;
        vacancies.insert(vacancy.id, vacancy.clone());
        Ok(vacancy)
    }

    /// Find vacancy by ID
    pub async fn find_by_id(&self, id: Uuid) -> Option<JobVacancy> {
        let vacancies = self.vacancies.read().await;
        vacancies.get(&id).cloned()
    }

    /// List vacancies, newest first, optionally filtered by status
    pub async fn list(
        &self,
        status: Option<VacancyStatus>,
        offset: usize,
        limit: usize,
    ) -> Vec<JobVacancy> {
        let vacancies = self.vacancies.read().await;
        let mut matched: Vec<JobVacancy> = vacancies
            .values()
            .filter(|v| status.map_or(true, |s| v.status == s))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched.into_iter().skip(offset).take(limit).collect()
    }

    /// Count vacancies matching the status filter
    pub async fn count(&self, status: Option<VacancyStatus>) -> u64 {
        let vacancies = self.vacancies.read().await;
        vacancies
            .values()
            .filter(|v| status.map_or(true, |s| v.status == s))
            .count() as u64
    }

    /// Update vacancy fields
    pub async fn update(&self, id: Uuid, updates: VacancyUpdate) -> Result<JobVacancy, AppError> {
        let mut vacancies = self.vacancies.write().await;

        let vacancy = vacancies
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Job vacancy not found".to_string()))?;

        if let Some(title) = updates.title {
            vacancy.title = title;
        }
        if let Some(company) = updates.company {
            vacancy.company = company;
        }
        if let Some(location) = updates.location {
            vacancy.location = location;
        }
        if let Some(description) = updates.description {
            vacancy.description = description;
        }
        if let Some(requirements) = updates.requirements {
            vacancy.requirements = requirements;
        }
        if let Some(salary) = updates.salary {
            vacancy.salary = salary;
        }
        if let Some(status) = updates.status {
            vacancy.status = status;
        }

        vacancy.updated_at = Utc::now();

        Ok(vacancy.clone())
    }

    /// Delete vacancy
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut vacancies = self.vacancies.write().await;
        vacancies
            .remove(&id)
            .ok_or_else(|| AppError::NotFound("Job vacancy not found".to_string()))?;
        Ok(())
    }
}

impl Default for VacancyStore {
    fn default() -> Self {
        Self::new()
    }
}
