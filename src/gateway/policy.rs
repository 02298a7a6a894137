//! Pure permission and validation rules. Both the client-side gateway and
//! the server handlers run these; the server remains authoritative.

use std::collections::{HashMap, HashSet};

use crate::error::StructureError;
use crate::models::{Department, DepartmentId};

/// Trim and require a non-empty name.
pub fn normalized_name(raw: &str) -> Result<String, StructureError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(StructureError::NameRequired);
    }
    Ok(trimmed.to_string())
}

pub fn validate_id(id: DepartmentId) -> Result<(), StructureError> {
    if id <= 0 {
        return Err(StructureError::InvalidId);
    }
    Ok(())
}

/// Creation: unconditional with the elevated capability; otherwise only
/// under a parent the actor manages. Root creation always needs elevation.
pub fn authorize_create(
    elevated: bool,
    manages_parent: bool,
    parent_id: Option<DepartmentId>,
) -> Result<(), StructureError> {
    if elevated {
        return Ok(());
    }
    match parent_id {
        None => Err(StructureError::ForbiddenParentRequired),
        Some(_) if manages_parent => Ok(()),
        Some(_) => Err(StructureError::Forbidden),
    }
}

/// Update: elevated, or manager of the target, and a manager may not move
/// their department to a different parent.
pub fn authorize_update(
    elevated: bool,
    manages_target: bool,
    current_parent: Option<DepartmentId>,
    requested_parent: Option<DepartmentId>,
) -> Result<(), StructureError> {
    if elevated {
        return Ok(());
    }
    if !manages_target {
        return Err(StructureError::Forbidden);
    }
    if requested_parent != current_parent {
        return Err(StructureError::ForbiddenParentChange);
    }
    Ok(())
}

/// Deletion: same actor check as update.
pub fn authorize_delete(elevated: bool, manages_target: bool) -> Result<(), StructureError> {
    if elevated || manages_target {
        Ok(())
    } else {
        Err(StructureError::Forbidden)
    }
}

/// Reject a relocation that would make `id` its own ancestor: walk up from
/// the requested parent and fail if the walk reaches `id`.
pub fn ensure_no_cycle(
    departments: &[Department],
    id: DepartmentId,
    requested_parent: Option<DepartmentId>,
) -> Result<(), StructureError> {
    let parent_by_id: HashMap<DepartmentId, Option<DepartmentId>> =
        departments.iter().map(|d| (d.id, d.parent_id)).collect();

    let mut seen = HashSet::new();
    let mut cur = requested_parent;
    while let Some(pid) = cur {
        if pid == id {
            return Err(StructureError::ParentCycle);
        }
        if !seen.insert(pid) {
            break;
        }
        cur = parent_by_id.get(&pid).copied().flatten();
    }
    Ok(())
}
