#![allow(dead_code)]

use chrono::Utc;

use orgchart_api::gateway::MutationGateway;
use orgchart_api::models::{Department, DepartmentId, Identity, Role, UserId};
use orgchart_api::store::{MemoryStore, StoreOracle};

pub fn department(id: DepartmentId, name: &str, parent_id: Option<DepartmentId>) -> Department {
    Department {
        id,
        name: name.to_string(),
        description: None,
        parent_id,
        manager_user_id: None,
        manager_email: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn identity(id: UserId, role: Role, can_manage_structure: bool) -> Identity {
    Identity {
        id,
        email: format!("user{}@example.com", id),
        full_name: None,
        role,
        can_manage_structure,
    }
}

pub fn owner(id: UserId) -> Identity {
    identity(id, Role::Owner, false)
}

pub fn employee(id: UserId) -> Identity {
    identity(id, Role::Employee, false)
}

pub fn memory_gateway(store: &MemoryStore) -> MutationGateway<MemoryStore, StoreOracle<MemoryStore>> {
    MutationGateway::new(store.clone(), StoreOracle::new(store.clone()))
}
