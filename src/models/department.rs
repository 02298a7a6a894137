use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::identity::UserId;

pub type DepartmentId = i64;

/// One node of the org chart, as stored and as served by
/// `GET /api/structure/departments`. `manager_email` is denormalized into
/// list responses from the users table; it is never written back.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub description: Option<String>,
    /// `None` marks a root. A value that does not resolve to an existing
    /// department is tolerated at read time (the row renders as a root).
    pub parent_id: Option<DepartmentId>,
    pub manager_user_id: Option<UserId>,
    #[serde(default)]
    pub manager_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a caller may set when creating or updating a department.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepartmentInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_id: Option<DepartmentId>,
    #[serde(default)]
    pub manager_user_id: Option<UserId>,
}

impl DepartmentInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_parent(mut self, parent_id: DepartmentId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_manager(mut self, manager_user_id: UserId) -> Self {
        self.manager_user_id = Some(manager_user_id);
        self
    }
}
