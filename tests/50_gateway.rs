mod common;

use common::{employee, memory_gateway, owner};
use orgchart_api::error::StructureError;
use orgchart_api::models::{DepartmentInput, Role};
use orgchart_api::store::MemoryStore;

/// The permission fixture: Mike (user 2) manages department 5 ("Dept A")
/// but not department 9 ("Dept B"). Department 5 sits under department 1.
fn permission_fixture() -> MemoryStore {
    let store = MemoryStore::new();
    store.seed_identity(owner(1));
    store.seed_identity(employee(2));
    store.seed_identity(employee(3));

    store.seed_department("Head Office", None, None); // id 1
    for i in 2..=4 {
        store.seed_department(&format!("Filler {}", i), Some(1), None);
    }
    let a = store.seed_department("Dept A", Some(1), Some(2)); // id 5
    for i in 6..=8 {
        store.seed_department(&format!("Filler {}", i), Some(1), None);
    }
    let b = store.seed_department("Dept B", Some(1), None); // id 9
    assert_eq!((a, b), (5, 9));
    store
}

#[tokio::test]
async fn manager_creates_under_their_own_department() {
    let store = permission_fixture();
    let gateway = memory_gateway(&store);
    let mike = employee(2);

    let id = gateway
        .create_department(DepartmentInput::named("X").with_parent(5), &mike)
        .await
        .expect("manager of the parent may create a child");
    assert_eq!(store.department(id).unwrap().parent_id, Some(5));
}

#[tokio::test]
async fn manager_cannot_create_under_someone_elses_department() {
    let store = permission_fixture();
    let gateway = memory_gateway(&store);
    let mike = employee(2);

    let err = gateway
        .create_department(DepartmentInput::named("X").with_parent(9), &mike)
        .await
        .unwrap_err();
    assert!(matches!(err, StructureError::Forbidden));
}

#[tokio::test]
async fn root_creation_requires_elevation() {
    let store = permission_fixture();
    let gateway = memory_gateway(&store);

    let err = gateway
        .create_department(DepartmentInput::named("X"), &employee(2))
        .await
        .unwrap_err();
    assert!(matches!(err, StructureError::ForbiddenParentRequired));

    // the owner can, unconditionally
    let id = gateway
        .create_department(DepartmentInput::named("X"), &owner(1))
        .await
        .expect("owner creates roots");
    assert_eq!(store.department(id).unwrap().parent_id, None);
}

#[tokio::test]
async fn manager_may_edit_but_not_relocate_their_department() {
    let store = permission_fixture();
    let gateway = memory_gateway(&store);
    let mike = employee(2);

    // moving Dept A under Dept B is a relocation
    let err = gateway
        .update_department(5, DepartmentInput::named("Y").with_parent(9), &mike)
        .await
        .unwrap_err();
    assert!(matches!(err, StructureError::ForbiddenParentChange));

    // same parent as before: a plain edit, allowed
    gateway
        .update_department(5, DepartmentInput::named("Y").with_parent(1), &mike)
        .await
        .expect("manager edits name/description in place");
    assert_eq!(store.department(5).unwrap().name, "Y");

    // dropping the parent entirely would also relocate
    let err = gateway
        .update_department(5, DepartmentInput::named("Y"), &mike)
        .await
        .unwrap_err();
    assert!(matches!(err, StructureError::ForbiddenParentChange));
}

#[tokio::test]
async fn manager_may_hand_over_their_own_department() {
    let store = permission_fixture();
    let gateway = memory_gateway(&store);
    let mike = employee(2);

    gateway
        .update_department(
            5,
            DepartmentInput::named("Dept A").with_parent(1).with_manager(3),
            &mike,
        )
        .await
        .expect("manager reassignment of one's own department is allowed");
    assert_eq!(store.department(5).unwrap().manager_user_id, Some(3));
}

#[tokio::test]
async fn empty_name_is_rejected_before_any_store_contact() {
    let store = permission_fixture();
    let gateway = memory_gateway(&store);

    let err = gateway
        .create_department(DepartmentInput::named("   "), &owner(1))
        .await
        .unwrap_err();
    assert!(matches!(err, StructureError::NameRequired));
    assert_eq!(store.mutation_calls(), 0);

    let err = gateway
        .update_department(5, DepartmentInput::named(""), &owner(1))
        .await
        .unwrap_err();
    assert!(matches!(err, StructureError::NameRequired));
    assert_eq!(store.mutation_calls(), 0);
}

#[tokio::test]
async fn names_are_trimmed_on_the_way_in() {
    let store = permission_fixture();
    let gateway = memory_gateway(&store);

    let id = gateway
        .create_department(DepartmentInput::named("  Logistics  "), &owner(1))
        .await
        .unwrap();
    assert_eq!(store.department(id).unwrap().name, "Logistics");
}

#[tokio::test]
async fn deletion_uses_the_update_actor_rule() {
    let store = permission_fixture();
    let gateway = memory_gateway(&store);

    let err = gateway.delete_department(9, &employee(2)).await.unwrap_err();
    assert!(matches!(err, StructureError::Forbidden));

    gateway
        .delete_department(5, &employee(2))
        .await
        .expect("manager may delete their own department");
    assert!(store.department(5).is_none());
}

#[tokio::test]
async fn delete_reparents_children_to_the_grandparent() {
    let store = permission_fixture();
    let gateway = memory_gateway(&store);
    let child = store.seed_department("Team under A", Some(5), None);

    gateway.delete_department(5, &owner(1)).await.unwrap();

    // Dept A's parent was 1, so its orphaned child moves up to 1
    assert_eq!(store.department(child).unwrap().parent_id, Some(1));
}

#[tokio::test]
async fn relocation_under_a_descendant_is_rejected() {
    let store = permission_fixture();
    let gateway = memory_gateway(&store);
    let grandchild = store.seed_department("Team under A", Some(5), None);

    let err = gateway
        .update_department(
            1,
            DepartmentInput::named("Head Office").with_parent(grandchild),
            &owner(1),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StructureError::ParentCycle));
}

#[tokio::test]
async fn unknown_targets_and_bad_ids_are_distinct_kinds() {
    let store = permission_fixture();
    let gateway = memory_gateway(&store);

    let err = gateway
        .update_department(4242, DepartmentInput::named("Z"), &owner(1))
        .await
        .unwrap_err();
    assert!(matches!(err, StructureError::NotFound));

    let err = gateway
        .update_department(0, DepartmentInput::named("Z"), &owner(1))
        .await
        .unwrap_err();
    assert!(matches!(err, StructureError::InvalidId));

    let err = gateway.delete_department(-3, &owner(1)).await.unwrap_err();
    assert!(matches!(err, StructureError::InvalidId));
}

#[tokio::test]
async fn transport_faults_are_distinguishable_and_retryable() {
    let store = permission_fixture();
    let gateway = memory_gateway(&store);

    store.set_offline(true);
    let err = gateway
        .create_department(DepartmentInput::named("X"), &owner(1))
        .await
        .unwrap_err();
    assert!(matches!(err, StructureError::Transport(_)));
    assert!(err.is_retryable());

    // a business rejection is not retryable
    store.set_offline(false);
    let err = gateway
        .create_department(DepartmentInput::named("X"), &employee(3))
        .await
        .unwrap_err();
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn identities_list_serves_the_manager_picker() {
    let store = permission_fixture();
    let identities = orgchart_api::store::DepartmentStore::list_identities(&store)
        .await
        .unwrap();
    assert_eq!(identities.len(), 3);
    assert!(identities.iter().any(|i| matches!(i.role, Role::Owner)));
}
