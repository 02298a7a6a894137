//! Mutation gateway: validates and submits department mutations against
//! the permission rules, through whichever store backs it. Used on both
//! sides of the wire: over [`HttpStore`](crate::store::HttpStore) as the
//! client's pre-check, over [`PgStore`](crate::store::PgStore) as the
//! server's authoritative check.
//!
//! A failed mutation never leaves a partial write behind: every check runs
//! before the single store call.

pub mod policy;

use crate::error::StructureError;
use crate::models::{DepartmentId, DepartmentInput, Identity};
use crate::store::{DepartmentStore, PermissionOracle};

#[derive(Debug, Clone)]
pub struct MutationGateway<S, O> {
    store: S,
    oracle: O,
}

impl<S, O> MutationGateway<S, O>
where
    S: DepartmentStore + Clone,
    O: PermissionOracle + Clone,
{
    pub fn new(store: S, oracle: O) -> Self {
        Self { store, oracle }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn create_department(
        &self,
        input: DepartmentInput,
        acting: &Identity,
    ) -> Result<DepartmentId, StructureError> {
        // name validation must not touch the store
        let name = policy::normalized_name(&input.name)?;

        if let Some(parent_id) = input.parent_id {
            policy::validate_id(parent_id)?;
        }

        let elevated = self.oracle.can_manage_all_departments(acting).await?;
        let manages_parent = match input.parent_id {
            Some(parent_id) if !elevated => self.oracle.is_manager_of(acting, parent_id).await?,
            _ => false,
        };
        policy::authorize_create(elevated, manages_parent, input.parent_id)?;

        if let Some(parent_id) = input.parent_id {
            // dangling parents are tolerated at read time, not at write time
            self.store.get_department(parent_id).await?;
        }

        let input = DepartmentInput { name, ..input };
        tracing::info!(parent_id = ?input.parent_id, "creating department '{}'", input.name);
        Ok(self.store.create_department(&input).await?)
    }

    pub async fn update_department(
        &self,
        id: DepartmentId,
        input: DepartmentInput,
        acting: &Identity,
    ) -> Result<(), StructureError> {
        policy::validate_id(id)?;
        let name = policy::normalized_name(&input.name)?;

        let current = self.store.get_department(id).await?;

        let elevated = self.oracle.can_manage_all_departments(acting).await?;
        let manages_target = if elevated {
            false
        } else {
            self.oracle.is_manager_of(acting, id).await?
        };
        policy::authorize_update(elevated, manages_target, current.parent_id, input.parent_id)?;

        if input.parent_id != current.parent_id {
            // only an elevated actor gets this far
            if let Some(new_parent) = input.parent_id {
                policy::validate_id(new_parent)?;
                let all = self.store.list_departments().await?;
                if !all.iter().any(|d| d.id == new_parent) {
                    return Err(StructureError::NotFound);
                }
                policy::ensure_no_cycle(&all, id, Some(new_parent))?;
            }
        }

        let input = DepartmentInput { name, ..input };
        tracing::info!(id, "updating department '{}'", input.name);
        self.store.update_department(id, &input).await?;
        Ok(())
    }

    pub async fn delete_department(
        &self,
        id: DepartmentId,
        acting: &Identity,
    ) -> Result<(), StructureError> {
        policy::validate_id(id)?;
        self.store.get_department(id).await?;

        let elevated = self.oracle.can_manage_all_departments(acting).await?;
        let manages_target = if elevated {
            false
        } else {
            self.oracle.is_manager_of(acting, id).await?
        };
        policy::authorize_delete(elevated, manages_target)?;

        tracing::info!(id, "deleting department");
        self.store.delete_department(id).await?;
        Ok(())
    }
}
