//! Department store and permission oracle seams.
//!
//! The view core only ever sees these traits; the concrete store behind
//! them is the Postgres pool (server side), the HTTP API (client side) or
//! an in-memory table (tests, fixtures). All implementations are cheap to
//! clone: they wrap a pool, a client or an `Arc`.

pub mod http;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::models::{Department, DepartmentId, DepartmentInput, Identity};

pub use http::HttpStore;
pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("department not found: {0}")]
    NotFound(DepartmentId),

    /// The store refused the request with a business-rule code. Produced by
    /// the HTTP store when the server re-check rejects what the client-side
    /// gateway let through.
    #[error("store rejected request: {code}")]
    Rejected { code: String },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Flat-list persistence for departments plus the identity list used to
/// populate manager pickers. Mutations persist exactly one row; callers are
/// expected to reload the full list afterwards (full-refresh consistency,
/// no incremental patch contract).
#[async_trait]
pub trait DepartmentStore: Send + Sync {
    async fn list_departments(&self) -> Result<Vec<Department>, StoreError>;

    async fn list_identities(&self) -> Result<Vec<Identity>, StoreError>;

    async fn create_department(&self, input: &DepartmentInput) -> Result<DepartmentId, StoreError>;

    async fn update_department(
        &self,
        id: DepartmentId,
        input: &DepartmentInput,
    ) -> Result<(), StoreError>;

    /// Children of the deleted department are re-parented to its parent in
    /// the same transaction.
    async fn delete_department(&self, id: DepartmentId) -> Result<(), StoreError>;

    /// Single-row convenience over [`list_departments`]. Implementations
    /// with a cheaper direct lookup override this.
    async fn get_department(&self, id: DepartmentId) -> Result<Department, StoreError> {
        self.list_departments()
            .await?
            .into_iter()
            .find(|d| d.id == id)
            .ok_or(StoreError::NotFound(id))
    }
}

/// Answers the two permission questions the mutation rules are built on.
#[async_trait]
pub trait PermissionOracle: Send + Sync {
    async fn can_manage_all_departments(&self, acting: &Identity) -> Result<bool, StoreError>;

    async fn is_manager_of(
        &self,
        acting: &Identity,
        department_id: DepartmentId,
    ) -> Result<bool, StoreError>;
}

/// Oracle backed by department rows in any store: manager facts come from
/// `manager_user_id`, the elevated capability from the identity itself.
#[derive(Debug, Clone)]
pub struct StoreOracle<S> {
    store: S,
}

impl<S> StoreOracle<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: DepartmentStore + Clone> PermissionOracle for StoreOracle<S> {
    async fn can_manage_all_departments(&self, acting: &Identity) -> Result<bool, StoreError> {
        Ok(acting.can_manage_all_departments())
    }

    async fn is_manager_of(
        &self,
        acting: &Identity,
        department_id: DepartmentId,
    ) -> Result<bool, StoreError> {
        match self.store.get_department(department_id).await {
            Ok(dep) => Ok(dep.manager_user_id == Some(acting.id)),
            // nobody manages a department that does not exist
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
