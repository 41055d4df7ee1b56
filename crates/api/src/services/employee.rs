use async_trait::async_trait;
use idm_core::employee::{CreateEmployeeRequest, EmployeeResponse};
use idm_core::error::CoreError;
use idm_core::types::DbId;
use idm_core::validation::validate;
use idm_db::models::employee::Employee;
use idm_db::repositories::EmployeeRepository;

use super::{classify_write, finish, EmployeeService};

/// [`EmployeeService`] over any [`EmployeeRepository`].
pub struct EmployeeManager<R> {
    repo: R,
}

impl<R: EmployeeRepository> EmployeeManager<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    async fn insert(&self, tx: &mut R::Tx, input: CreateEmployeeRequest) -> Result<DbId, CoreError> {
        let existing = self
            .repo
            .find_by_email_with_transaction(tx, &input.email)
            .await
            .map_err(|e| CoreError::internal("look up employee by email", e))?;
        if existing.is_some() {
            return Err(email_taken(&input.email));
        }

        let email = input.email.clone();
        let mut employee = Employee::new(
            input.name,
            input.email,
            Some(input.position),
            Some(input.department),
            input.role_id,
        );
        self.repo
            .add_with_transaction(tx, &mut employee)
            .await
            .map_err(|e| {
                classify_write(
                    e,
                    "insert employee",
                    || email_taken(&email),
                    || CoreError::validation("role_id does not exist"),
                )
            })?;
        Ok(employee.id)
    }
}

fn email_taken(email: &str) -> CoreError {
    CoreError::AlreadyExists(format!("Employee with email {email} already exists"))
}

fn to_response(employee: Employee) -> EmployeeResponse {
    EmployeeResponse {
        id: employee.id,
        name: employee.name,
        email: employee.email,
        position: employee.position.unwrap_or_default(),
        department: employee.department.unwrap_or_default(),
        role_id: employee.role_id,
        created_at: employee.created_at,
        updated_at: employee.updated_at,
    }
}

#[async_trait]
impl<R: EmployeeRepository> EmployeeService for EmployeeManager<R> {
    async fn find_by_id(&self, id: DbId) -> Result<EmployeeResponse, CoreError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| CoreError::internal("find employee", e))?
            .map(to_response)
            .ok_or(CoreError::NotFound {
                entity: "Employee",
                id,
            })
    }

    async fn create_employee(&self, input: CreateEmployeeRequest) -> Result<DbId, CoreError> {
        validate(&input)?;

        let mut tx = self
            .repo
            .begin_transaction()
            .await
            .map_err(|e| CoreError::internal("begin employee transaction", e))?;
        let result = self.insert(&mut tx, input).await;
        let id = finish(tx, result, "commit employee").await?;

        tracing::info!(employee_id = id, "Employee created");
        Ok(id)
    }

    async fn find_all(&self) -> Result<Vec<EmployeeResponse>, CoreError> {
        let employees = self
            .repo
            .find_all()
            .await
            .map_err(|e| CoreError::internal("list employees", e))?;
        Ok(employees.into_iter().map(to_response).collect())
    }

    async fn find_by_ids(&self, ids: &[DbId]) -> Result<Vec<EmployeeResponse>, CoreError> {
        let employees = self
            .repo
            .find_by_ids(ids)
            .await
            .map_err(|e| CoreError::internal("find employees by ids", e))?;
        Ok(employees.into_iter().map(to_response).collect())
    }

    async fn delete_by_id(&self, id: DbId) -> Result<(), CoreError> {
        let removed = self
            .repo
            .delete_by_id(id)
            .await
            .map_err(|e| CoreError::internal("delete employee", e))?;
        tracing::info!(employee_id = id, removed, "Employee delete");
        Ok(())
    }

    async fn delete_by_ids(&self, ids: &[DbId]) -> Result<(), CoreError> {
        if ids.is_empty() {
            return Ok(());
        }
        let removed = self
            .repo
            .delete_by_ids(ids)
            .await
            .map_err(|e| CoreError::internal("delete employees", e))?;
        tracing::info!(requested = ids.len(), removed, "Employee bulk delete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::services::fakes::{db_error, MemoryEmployeeRepo, Violation};

    fn request(email: &str) -> CreateEmployeeRequest {
        CreateEmployeeRequest {
            name: "John Doe".into(),
            email: email.into(),
            position: "Developer".into(),
            department: "IT".into(),
            role_id: 1,
        }
    }

    #[tokio::test]
    async fn create_commits_and_returns_id() {
        let repo = MemoryEmployeeRepo::default();
        let service = EmployeeManager::new(repo.clone());

        let id = service
            .create_employee(request("john.doe@example.com"))
            .await
            .unwrap();

        assert!(id > 0);
        assert_eq!(repo.journal(), vec!["begin", "commit"]);
        let found = service.find_by_id(id).await.unwrap();
        assert_eq!(found.email, "john.doe@example.com");
        assert_eq!(found.position, "Developer");
    }

    #[tokio::test]
    async fn invalid_input_never_opens_a_transaction() {
        let repo = MemoryEmployeeRepo::default();
        let service = EmployeeManager::new(repo.clone());
        let input = CreateEmployeeRequest {
            name: String::new(),
            email: "invalid".into(),
            position: String::new(),
            department: String::new(),
            role_id: 0,
        };

        let err = service.create_employee(input).await.unwrap_err();
        let CoreError::Validation { details, .. } = err else {
            panic!("expected a validation error");
        };
        let tags: Vec<&str> = details.iter().map(|d| d.tag.as_str()).collect();
        assert_eq!(tags, vec!["required", "email", "required", "required", "required"]);
        assert!(repo.journal().is_empty());
    }

    #[tokio::test]
    async fn taken_email_is_already_exists_and_rolls_back() {
        let repo = MemoryEmployeeRepo::default();
        let service = EmployeeManager::new(repo.clone());
        service.create_employee(request("a@example.com")).await.unwrap();

        let err = service
            .create_employee(request("a@example.com"))
            .await
            .unwrap_err();

        assert_matches!(err, CoreError::AlreadyExists(msg) if msg.contains("already exists"));
        assert_eq!(repo.journal(), vec!["begin", "commit", "begin", "rollback"]);
        assert_eq!(service.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unique_violation_on_insert_is_already_exists() {
        let repo = MemoryEmployeeRepo::default();
        repo.fail_next_insert(db_error(Violation::Unique, "uq_employee_email"));
        let service = EmployeeManager::new(repo.clone());

        let err = service
            .create_employee(request("race@example.com"))
            .await
            .unwrap_err();

        assert_matches!(err, CoreError::AlreadyExists(_));
        assert_eq!(repo.journal(), vec!["begin", "rollback"]);
    }

    #[tokio::test]
    async fn missing_role_is_validation_error() {
        let repo = MemoryEmployeeRepo::default();
        repo.fail_next_insert(db_error(Violation::ForeignKey, "fk_employee_role"));
        let service = EmployeeManager::new(repo.clone());

        let err = service
            .create_employee(request("b@example.com"))
            .await
            .unwrap_err();

        assert_matches!(err, CoreError::Validation { message, .. } if message == "role_id does not exist");
        assert!(service.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn other_insert_failures_are_internal() {
        let repo = MemoryEmployeeRepo::default();
        repo.fail_next_insert(sqlx::Error::PoolTimedOut);
        let service = EmployeeManager::new(repo.clone());

        let err = service
            .create_employee(request("c@example.com"))
            .await
            .unwrap_err();

        assert_matches!(err, CoreError::Internal(msg) if msg.starts_with("insert employee: "));
        assert_eq!(repo.journal(), vec!["begin", "rollback"]);
    }

    #[tokio::test]
    async fn failed_commit_is_internal() {
        let repo = MemoryEmployeeRepo::default();
        repo.fail_next_commit();
        let service = EmployeeManager::new(repo.clone());

        let err = service
            .create_employee(request("d@example.com"))
            .await
            .unwrap_err();

        assert_matches!(err, CoreError::Internal(msg) if msg.starts_with("commit employee: "));
        assert!(service.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_employee_is_not_found() {
        let service = EmployeeManager::new(MemoryEmployeeRepo::default());
        assert_matches!(
            service.find_by_id(99).await,
            Err(CoreError::NotFound { entity: "Employee", id: 99 })
        );
    }

    #[tokio::test]
    async fn deletes_are_idempotent() {
        let repo = MemoryEmployeeRepo::default();
        let service = EmployeeManager::new(repo.clone());
        let id = service.create_employee(request("e@example.com")).await.unwrap();

        service.delete_by_id(id).await.unwrap();
        service.delete_by_id(id).await.unwrap();
        service.delete_by_ids(&[]).await.unwrap();
        service.delete_by_ids(&[id, 1234]).await.unwrap();
        assert!(service.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_by_ids_returns_only_existing_rows() {
        let service = EmployeeManager::new(MemoryEmployeeRepo::default());
        let a = service.create_employee(request("f@example.com")).await.unwrap();
        let b = service.create_employee(request("g@example.com")).await.unwrap();

        let found = service.find_by_ids(&[b, 777, a]).await.unwrap();
        let ids: Vec<DbId> = found.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![a, b]);
        assert!(service.find_by_ids(&[]).await.unwrap().is_empty());
    }
}
