//! In-memory repository doubles for service tests.

use std::fmt;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use idm_core::types::DbId;
use idm_db::models::employee::Employee;
use idm_db::models::role::Role;
use idm_db::repositories::{EmployeeRepository, RoleRepository, UnitOfWork};
use sqlx::error::{DatabaseError, ErrorKind};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Violation {
    Unique,
    ForeignKey,
}

#[derive(Debug)]
struct FakeDbError {
    violation: Violation,
    constraint: &'static str,
}

impl fmt::Display for FakeDbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} violation on {}", self.violation, self.constraint)
    }
}

impl std::error::Error for FakeDbError {}

impl DatabaseError for FakeDbError {
    fn message(&self) -> &str {
        "constraint violation"
    }

    fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self
    }

    fn kind(&self) -> ErrorKind {
        match self.violation {
            Violation::Unique => ErrorKind::UniqueViolation,
            Violation::ForeignKey => ErrorKind::ForeignKeyViolation,
        }
    }

    fn constraint(&self) -> Option<&str> {
        Some(self.constraint)
    }
}

/// A driver error reporting a constraint violation.
pub(crate) fn db_error(violation: Violation, constraint: &'static str) -> sqlx::Error {
    sqlx::Error::Database(Box::new(FakeDbError {
        violation,
        constraint,
    }))
}

pub(crate) trait Row: Clone + Send + Sync + 'static {
    fn id(&self) -> DbId;
    fn set_id(&mut self, id: DbId);
}

impl Row for Employee {
    fn id(&self) -> DbId {
        self.id
    }
    fn set_id(&mut self, id: DbId) {
        self.id = id;
    }
}

impl Row for Role {
    fn id(&self) -> DbId {
        self.id
    }
    fn set_id(&mut self, id: DbId) {
        self.id = id;
    }
}

struct Shared<T> {
    rows: Vec<T>,
    next_id: DbId,
    /// `begin`, `commit` and `rollback` in call order.
    journal: Vec<&'static str>,
    insert_error: Option<sqlx::Error>,
    delete_error: Option<sqlx::Error>,
    commit_error: bool,
}

type Store<T> = Arc<Mutex<Shared<T>>>;

/// Transaction over a [`MemoryRepo`]: inserts are staged until commit.
pub(crate) struct MemoryTx<T> {
    store: Store<T>,
    staged: Vec<T>,
}

#[async_trait]
impl<T: Row> UnitOfWork for MemoryTx<T> {
    async fn commit(self) -> Result<(), sqlx::Error> {
        let MemoryTx { store, staged } = self;
        let mut shared = store.lock().unwrap();
        shared.journal.push("commit");
        if std::mem::take(&mut shared.commit_error) {
            return Err(sqlx::Error::PoolClosed);
        }
        shared.rows.extend(staged);
        Ok(())
    }

    async fn rollback(self) -> Result<(), sqlx::Error> {
        self.store.lock().unwrap().journal.push("rollback");
        Ok(())
    }
}

pub(crate) struct MemoryRepo<T> {
    store: Store<T>,
}

pub(crate) type MemoryEmployeeRepo = MemoryRepo<Employee>;
pub(crate) type MemoryRoleRepo = MemoryRepo<Role>;

impl<T> Clone for MemoryRepo<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<T> Default for MemoryRepo<T> {
    fn default() -> Self {
        Self {
            store: Arc::new(Mutex::new(Shared {
                rows: Vec::new(),
                next_id: 0,
                journal: Vec::new(),
                insert_error: None,
                delete_error: None,
                commit_error: false,
            })),
        }
    }
}

impl<T: Row> MemoryRepo<T> {
    pub(crate) fn journal(&self) -> Vec<&'static str> {
        self.store.lock().unwrap().journal.clone()
    }

    pub(crate) fn fail_next_insert(&self, err: sqlx::Error) {
        self.store.lock().unwrap().insert_error = Some(err);
    }

    pub(crate) fn fail_next_delete(&self, err: sqlx::Error) {
        self.store.lock().unwrap().delete_error = Some(err);
    }

    pub(crate) fn fail_next_commit(&self) {
        self.store.lock().unwrap().commit_error = true;
    }

    fn get(&self, id: DbId) -> Option<T> {
        let shared = self.store.lock().unwrap();
        shared.rows.iter().find(|r| r.id() == id).cloned()
    }

    fn all(&self) -> Vec<T> {
        let mut rows = self.store.lock().unwrap().rows.clone();
        rows.sort_by_key(|r| r.id());
        rows
    }

    fn with_ids(&self, ids: &[DbId]) -> Vec<T> {
        self.all()
            .into_iter()
            .filter(|r| ids.contains(&r.id()))
            .collect()
    }

    /// Committed or staged row matching `pred`.
    fn find_in(&self, tx: &MemoryTx<T>, pred: impl Fn(&T) -> bool) -> Option<T> {
        let shared = self.store.lock().unwrap();
        shared
            .rows
            .iter()
            .chain(tx.staged.iter())
            .find(|r| pred(r))
            .cloned()
    }

    fn assign(&self, row: &mut T) -> Result<(), sqlx::Error> {
        let mut shared = self.store.lock().unwrap();
        if let Some(err) = shared.insert_error.take() {
            return Err(err);
        }
        shared.next_id += 1;
        row.set_id(shared.next_id);
        Ok(())
    }

    fn insert(&self, row: &mut T) -> Result<(), sqlx::Error> {
        self.assign(row)?;
        self.store.lock().unwrap().rows.push(row.clone());
        Ok(())
    }

    fn stage(&self, tx: &mut MemoryTx<T>, row: &mut T) -> Result<(), sqlx::Error> {
        self.assign(row)?;
        tx.staged.push(row.clone());
        Ok(())
    }

    fn remove(&self, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let mut shared = self.store.lock().unwrap();
        if let Some(err) = shared.delete_error.take() {
            return Err(err);
        }
        let before = shared.rows.len();
        shared.rows.retain(|r| !ids.contains(&r.id()));
        Ok((before - shared.rows.len()) as u64)
    }

    fn begin(&self) -> MemoryTx<T> {
        self.store.lock().unwrap().journal.push("begin");
        MemoryTx {
            store: Arc::clone(&self.store),
            staged: Vec::new(),
        }
    }
}

#[async_trait]
impl EmployeeRepository for MemoryRepo<Employee> {
    type Tx = MemoryTx<Employee>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Employee>, sqlx::Error> {
        Ok(self.get(id))
    }

    async fn find_all(&self) -> Result<Vec<Employee>, sqlx::Error> {
        Ok(self.all())
    }

    async fn find_by_ids(&self, ids: &[DbId]) -> Result<Vec<Employee>, sqlx::Error> {
        Ok(self.with_ids(ids))
    }

    async fn add(&self, employee: &mut Employee) -> Result<(), sqlx::Error> {
        self.insert(employee)
    }

    async fn delete_by_id(&self, id: DbId) -> Result<u64, sqlx::Error> {
        self.remove(&[id])
    }

    async fn delete_by_ids(&self, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        self.remove(ids)
    }

    async fn begin_transaction(&self) -> Result<Self::Tx, sqlx::Error> {
        Ok(self.begin())
    }

    async fn add_with_transaction(
        &self,
        tx: &mut Self::Tx,
        employee: &mut Employee,
    ) -> Result<(), sqlx::Error> {
        self.stage(tx, employee)
    }

    async fn find_by_email_with_transaction(
        &self,
        tx: &mut Self::Tx,
        email: &str,
    ) -> Result<Option<Employee>, sqlx::Error> {
        Ok(self.find_in(tx, |e| e.email == email))
    }
}

#[async_trait]
impl RoleRepository for MemoryRepo<Role> {
    type Tx = MemoryTx<Role>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Role>, sqlx::Error> {
        Ok(self.get(id))
    }

    async fn find_all(&self) -> Result<Vec<Role>, sqlx::Error> {
        Ok(self.all())
    }

    async fn find_by_ids(&self, ids: &[DbId]) -> Result<Vec<Role>, sqlx::Error> {
        Ok(self.with_ids(ids))
    }

    async fn add(&self, role: &mut Role) -> Result<(), sqlx::Error> {
        self.insert(role)
    }

    async fn delete_by_id(&self, id: DbId) -> Result<u64, sqlx::Error> {
        self.remove(&[id])
    }

    async fn delete_by_ids(&self, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        self.remove(ids)
    }

    async fn begin_transaction(&self) -> Result<Self::Tx, sqlx::Error> {
        Ok(self.begin())
    }

    async fn add_with_transaction(&self, tx: &mut Self::Tx, role: &mut Role) -> Result<(), sqlx::Error> {
        self.stage(tx, role)
    }

    async fn find_by_name_with_transaction(
        &self,
        tx: &mut Self::Tx,
        name: &str,
    ) -> Result<Option<Role>, sqlx::Error> {
        Ok(self.find_in(tx, |r| r.name == name))
    }
}
