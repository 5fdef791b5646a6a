//! Payroll repository
//!
//! Access to the document store that owns employees and time records.

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Employee, NewEmployee, NewTimeRecord, TimeRecord, TimeRecordQuery};

/// Repository errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Store operations the payroll core relies on.
///
/// Failures are opaque to callers; they are passed on, not interpreted.
#[async_trait]
pub trait PayrollRepository: Send + Sync {
    /// List employees belonging to an owner account
    async fn list_employees(&self, owner_id: &str) -> Result<Vec<Employee>>;

    /// Find an employee by ID
    async fn get_employee(&self, employee_id: &str) -> Result<Option<Employee>>;

    /// Create a new employee
    async fn create_employee(&self, employee: &NewEmployee) -> Result<Employee>;

    /// Replace an existing employee's fields
    async fn update_employee(&self, employee: &Employee) -> Result<Employee>;

    /// List time records matching an employee and work-date filter
    async fn list_time_records(&self, query: &TimeRecordQuery) -> Result<Vec<TimeRecord>>;

    /// Create a new time record
    async fn create_time_record(&self, record: &NewTimeRecord) -> Result<TimeRecord>;
}

/// In-memory repository for testing and development
pub struct InMemoryRepository {
    employees: std::sync::RwLock<Vec<Employee>>,
    records: std::sync::RwLock<Vec<TimeRecord>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            employees: std::sync::RwLock::new(Vec::new()),
            records: std::sync::RwLock::new(Vec::new()),
        }
    }

    /// Start from existing documents, e.g. an export of the store
    pub fn with_data(employees: Vec<Employee>, records: Vec<TimeRecord>) -> Self {
        Self {
            employees: std::sync::RwLock::new(employees),
            records: std::sync::RwLock::new(records),
        }
    }

    pub fn record_count(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow::anyhow!("in-memory store lock poisoned")
}

#[async_trait]
impl PayrollRepository for InMemoryRepository {
    async fn list_employees(&self, owner_id: &str) -> Result<Vec<Employee>> {
        let employees = self.employees.read().map_err(poisoned)?;
        Ok(employees
            .iter()
            .filter(|e| e.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn get_employee(&self, employee_id: &str) -> Result<Option<Employee>> {
        let employees = self.employees.read().map_err(poisoned)?;
        Ok(employees.iter().find(|e| e.id == employee_id).cloned())
    }

    async fn create_employee(&self, employee: &NewEmployee) -> Result<Employee> {
        let mut employees = self.employees.write().map_err(poisoned)?;
        let created = Employee {
            id: Uuid::new_v4().to_string(),
            owner_id: employee.owner_id.clone(),
            full_name: employee.full_name.clone(),
            position: employee.position.clone(),
            daily_rate: employee.daily_rate,
        };
        employees.push(created.clone());
        Ok(created)
    }

    async fn update_employee(&self, employee: &Employee) -> Result<Employee> {
        let mut employees = self.employees.write().map_err(poisoned)?;
        if let Some(existing) = employees.iter_mut().find(|e| e.id == employee.id) {
            if existing.owner_id != employee.owner_id {
                return Err(RepositoryError::ValidationError(format!(
                    "Employee {} cannot change owner",
                    employee.id
                ))
                .into());
            }
            *existing = employee.clone();
            return Ok(existing.clone());
        }
        Err(RepositoryError::NotFound(format!("Employee with id {}", employee.id)).into())
    }

    async fn list_time_records(&self, query: &TimeRecordQuery) -> Result<Vec<TimeRecord>> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect())
    }

    async fn create_time_record(&self, record: &NewTimeRecord) -> Result<TimeRecord> {
        let mut records = self.records.write().map_err(poisoned)?;
        let mut created = record.clone().into_record(Uuid::new_v4().to_string());
        created.created_at = Some(chrono::Utc::now());
        records.push(created.clone());
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn new_record(employee: &Employee, day: u32) -> NewTimeRecord {
        let date = NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        NewTimeRecord::snapshot(
            employee,
            date,
            date.and_time(NaiveTime::from_hms_opt(8, 0, 0).unwrap()),
            date.and_time(NaiveTime::from_hms_opt(17, 0, 0).unwrap()),
        )
    }

    #[tokio::test]
    async fn test_create_and_list_employees() {
        let repo = InMemoryRepository::new();
        let created = repo
            .create_employee(&NewEmployee::new("owner-1", "Maria Santos", "Cashier", 800.0))
            .await
            .unwrap();
        repo.create_employee(&NewEmployee::new("owner-2", "Jose Cruz", "Cook", 700.0))
            .await
            .unwrap();

        assert!(!created.id.is_empty());
        let mine = repo.list_employees("owner-1").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].full_name, "Maria Santos");

        let found = repo.get_employee(&created.id).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_update_employee() {
        let repo = InMemoryRepository::new();
        let mut employee = repo
            .create_employee(&NewEmployee::new("owner-1", "Maria Santos", "Cashier", 800.0))
            .await
            .unwrap();

        employee.daily_rate = 900.0;
        let updated = repo.update_employee(&employee).await.unwrap();
        assert_eq!(updated.daily_rate, 900.0);

        employee.id = "missing".to_string();
        assert!(repo.update_employee(&employee).await.is_err());
    }

    #[tokio::test]
    async fn test_create_and_query_time_records() {
        let repo = InMemoryRepository::new();
        let employee = repo
            .create_employee(&NewEmployee::new("owner-1", "Maria Santos", "Cashier", 800.0))
            .await
            .unwrap();

        for day in [14, 15, 21] {
            let created = repo.create_time_record(&new_record(&employee, day)).await.unwrap();
            assert!(created.created_at.is_some());
        }
        assert_eq!(repo.record_count(), 3);

        let week = TimeRecordQuery::for_employee(&employee.id).between(
            NaiveDate::from_ymd_opt(2024, 1, 14).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
        );
        assert_eq!(repo.list_time_records(&week).await.unwrap().len(), 2);

        let day = TimeRecordQuery::for_employee(&employee.id).on(NaiveDate::from_ymd_opt(2024, 1, 21).unwrap());
        assert_eq!(repo.list_time_records(&day).await.unwrap().len(), 1);

        let other = TimeRecordQuery::for_employee("someone-else");
        assert!(repo.list_time_records(&other).await.unwrap().is_empty());
    }
}
