//! Server-side store over the portal's Postgres database.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::models::{Department, DepartmentId, DepartmentInput, Identity, Role};
use crate::store::{DepartmentStore, StoreError};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw users row; `role` stays a string until it has been through
/// [`Role::from_db`].
#[derive(Debug, FromRow)]
struct IdentityRow {
    id: i64,
    email: String,
    full_name: Option<String>,
    role: String,
    can_manage_structure: bool,
}

impl From<IdentityRow> for Identity {
    fn from(row: IdentityRow) -> Self {
        Identity {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            role: Role::from_db(&row.role),
            can_manage_structure: row.can_manage_structure,
        }
    }
}

const SELECT_DEPARTMENTS: &str = r#"
SELECT d.id, d.name, d.description, d.parent_id, d.manager_user_id,
       u.email AS manager_email,
       d.created_at, d.updated_at
FROM departments d
LEFT JOIN users u ON u.id = d.manager_user_id
"#;

#[async_trait]
impl DepartmentStore for PgStore {
    async fn list_departments(&self) -> Result<Vec<Department>, StoreError> {
        let sql = format!("{} ORDER BY d.name ASC, d.id ASC", SELECT_DEPARTMENTS);
        let rows = sqlx::query_as::<_, Department>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_department(&self, id: DepartmentId) -> Result<Department, StoreError> {
        let sql = format!("{} WHERE d.id = $1", SELECT_DEPARTMENTS);
        sqlx::query_as::<_, Department>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    async fn list_identities(&self) -> Result<Vec<Identity>, StoreError> {
        let rows = sqlx::query_as::<_, IdentityRow>(
            "SELECT id, email, full_name, role, can_manage_structure
             FROM users
             ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Identity::from).collect())
    }

    async fn create_department(&self, input: &DepartmentInput) -> Result<DepartmentId, StoreError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO departments (name, description, parent_id, manager_user_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.parent_id)
        .bind(input.manager_user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn update_department(
        &self,
        id: DepartmentId,
        input: &DepartmentInput,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE departments
             SET name = $1, description = $2, parent_id = $3, manager_user_id = $4,
                 updated_at = now()
             WHERE id = $5",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.parent_id)
        .bind(input.manager_user_id)
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn delete_department(&self, id: DepartmentId) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let parent_id: Option<i64> =
            sqlx::query_scalar("SELECT parent_id FROM departments WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(StoreError::NotFound(id))?;

        // children move up to the deleted department's parent
        sqlx::query("UPDATE departments SET parent_id = $1, updated_at = now() WHERE parent_id = $2")
            .bind(parent_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
