//! In-memory store for tests, fixtures and offline demos. Mirrors the
//! Postgres store's observable behavior, including delete re-parenting and
//! the manager-email join on reads.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::models::{Department, DepartmentId, DepartmentInput, Identity};
use crate::store::{DepartmentStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    departments: Vec<Department>,
    identities: Vec<Identity>,
    next_id: DepartmentId,
    mutation_calls: usize,
    offline: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a department row directly, bypassing permission checks.
    pub fn seed_department(
        &self,
        name: &str,
        parent_id: Option<DepartmentId>,
        manager_user_id: Option<i64>,
    ) -> DepartmentId {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = inner.next_id;
        let now = Utc::now();
        inner.departments.push(Department {
            id,
            name: name.to_string(),
            description: None,
            parent_id,
            manager_user_id,
            manager_email: None,
            created_at: now,
            updated_at: now,
        });
        id
    }

    pub fn seed_identity(&self, identity: Identity) {
        self.inner.lock().unwrap().identities.push(identity);
    }

    /// How many create/update/delete calls reached this store. Lets tests
    /// assert that client-side validation short-circuits before any store
    /// contact.
    pub fn mutation_calls(&self) -> usize {
        self.inner.lock().unwrap().mutation_calls
    }

    /// Simulate a transport fault: every subsequent call fails.
    pub fn set_offline(&self, offline: bool) {
        self.inner.lock().unwrap().offline = offline;
    }

    pub fn department(&self, id: DepartmentId) -> Option<Department> {
        self.inner
            .lock()
            .unwrap()
            .departments
            .iter()
            .find(|d| d.id == id)
            .cloned()
    }

    fn ensure_online(inner: &Inner) -> Result<(), StoreError> {
        if inner.offline {
            Err(StoreError::Unavailable("memory store offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DepartmentStore for MemoryStore {
    async fn list_departments(&self) -> Result<Vec<Department>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Self::ensure_online(&inner)?;
        let mut rows: Vec<Department> = inner
            .departments
            .iter()
            .cloned()
            .map(|mut d| {
                d.manager_email = d.manager_user_id.and_then(|uid| {
                    inner
                        .identities
                        .iter()
                        .find(|i| i.id == uid)
                        .map(|i| i.email.clone())
                });
                d
            })
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn list_identities(&self) -> Result<Vec<Identity>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Self::ensure_online(&inner)?;
        Ok(inner.identities.clone())
    }

    async fn create_department(&self, input: &DepartmentInput) -> Result<DepartmentId, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.mutation_calls += 1;
        Self::ensure_online(&inner)?;
        inner.next_id += 1;
        let id = inner.next_id;
        let now = Utc::now();
        inner.departments.push(Department {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
            parent_id: input.parent_id,
            manager_user_id: input.manager_user_id,
            manager_email: None,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn update_department(
        &self,
        id: DepartmentId,
        input: &DepartmentInput,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.mutation_calls += 1;
        Self::ensure_online(&inner)?;
        let dep = inner
            .departments
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(StoreError::NotFound(id))?;
        dep.name = input.name.clone();
        dep.description = input.description.clone();
        dep.parent_id = input.parent_id;
        dep.manager_user_id = input.manager_user_id;
        dep.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_department(&self, id: DepartmentId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.mutation_calls += 1;
        Self::ensure_online(&inner)?;
        let pos = inner
            .departments
            .iter()
            .position(|d| d.id == id)
            .ok_or(StoreError::NotFound(id))?;
        let removed = inner.departments.remove(pos);
        for dep in inner.departments.iter_mut() {
            if dep.parent_id == Some(id) {
                dep.parent_id = removed.parent_id;
            }
        }
        Ok(())
    }
}
