mod common;

use common::{employee, memory_gateway, owner};
use orgchart_api::config::ViewConfig;
use orgchart_api::error::StructureError;
use orgchart_api::models::DepartmentInput;
use orgchart_api::render::Point;
use orgchart_api::session::{StructureSession, SubmitOutcome, Submission};
use orgchart_api::store::MemoryStore;
use orgchart_api::view::{InteractionEvent, ZoomDirection};

fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.seed_identity(owner(1));
    store.seed_identity(employee(2));
    let hq = store.seed_department("Head Office", None, None);
    store.seed_department("Engineering", Some(hq), Some(2));
    store.seed_department("Sales", Some(hq), None);
    store
}

#[tokio::test]
async fn open_loads_and_starts_fully_expanded() {
    let store = seeded_store();
    let session = StructureSession::open(memory_gateway(&store), owner(1), ViewConfig::default())
        .await
        .unwrap();

    assert_eq!(session.departments().len(), 3);
    assert_eq!(session.identities().len(), 2);
    assert_eq!(session.view().selected_id, None);
    assert_eq!(session.view().expanded.len(), 3);

    let tree = session.render_tree();
    assert_eq!(tree.nodes.len(), 3);
}

#[tokio::test]
async fn local_interactions_flow_through_the_session() {
    let store = seeded_store();
    let mut session =
        StructureSession::open(memory_gateway(&store), owner(1), ViewConfig::default())
            .await
            .unwrap();

    session.handle(InteractionEvent::Select(2));
    session.handle(InteractionEvent::Zoom {
        pointer: Point::new(50.0, 50.0),
        direction: ZoomDirection::In,
    });

    assert_eq!(session.view().selected_id, Some(2));
    assert!(session.view().camera.scale > 1.0);
    assert!(session.render_tree().node(2).unwrap().is_selected);
}

#[tokio::test]
async fn successful_create_reloads_and_resets_the_view() {
    let store = seeded_store();
    let mut session =
        StructureSession::open(memory_gateway(&store), owner(1), ViewConfig::default())
            .await
            .unwrap();

    session.handle(InteractionEvent::Select(2));
    let outcome = session
        .submit_create_now(DepartmentInput::named("Support").with_parent(1))
        .await;

    let SubmitOutcome::Applied { created } = outcome else {
        panic!("expected Applied, got {:?}", outcome);
    };
    let created = created.expect("create returns the new id");

    assert_eq!(session.departments().len(), 4);
    assert!(session.departments().iter().any(|d| d.id == created));
    // full-refresh model: the view resets like a first load
    assert_eq!(session.view().selected_id, None);
    assert!(session.view().expanded.contains(&created));
    assert!(session.status().is_none());
}

#[tokio::test]
async fn rejected_mutation_leaves_the_tree_untouched() {
    let store = seeded_store();
    let mut session =
        StructureSession::open(memory_gateway(&store), employee(9), ViewConfig::default())
            .await
            .unwrap();

    let before = session.departments().len();
    let outcome = session
        .submit_create_now(DepartmentInput::named("Rogue Root"))
        .await;

    assert!(matches!(
        outcome,
        SubmitOutcome::Rejected(StructureError::ForbiddenParentRequired)
    ));
    assert_eq!(session.departments().len(), before);

    let status = session.status().expect("rejection surfaces as status text");
    assert!(!status.retryable);
}

#[tokio::test]
async fn transport_failures_surface_as_retryable_status() {
    let store = seeded_store();
    let mut session =
        StructureSession::open(memory_gateway(&store), owner(1), ViewConfig::default())
            .await
            .unwrap();

    store.set_offline(true);
    let outcome = session
        .submit_create_now(DepartmentInput::named("Support").with_parent(1))
        .await;

    assert!(matches!(
        outcome,
        SubmitOutcome::Rejected(StructureError::Transport(_))
    ));
    assert!(session.status().unwrap().retryable);
}

#[tokio::test]
async fn second_submission_for_the_same_target_is_ignored() {
    let store = seeded_store();
    let mut session =
        StructureSession::open(memory_gateway(&store), owner(1), ViewConfig::default())
            .await
            .unwrap();

    let first = session.submit_update(2, DepartmentInput::named("Engineering II").with_parent(1));
    let Submission::Started(fut) = first else {
        panic!("first submission should start");
    };

    // while the first round-trip is out, an update and a delete aimed at
    // the same department are both ignored
    assert!(matches!(
        session.submit_update(2, DepartmentInput::named("Engineering III").with_parent(1)),
        Submission::InFlight
    ));
    assert!(matches!(session.submit_delete(2), Submission::InFlight));

    // a different target is unaffected
    assert!(session.is_pending(&orgchart_api::session::MutationTarget::Department(2)));

    let outcome = fut.await;
    let applied = session.complete(outcome).await;
    assert!(matches!(applied, SubmitOutcome::Applied { created: None }));
    assert!(!session.is_pending(&orgchart_api::session::MutationTarget::Department(2)));

    assert!(session
        .departments()
        .iter()
        .any(|d| d.name == "Engineering II"));
}

#[tokio::test]
async fn pan_and_zoom_remain_live_while_a_mutation_is_in_flight() {
    let store = seeded_store();
    let mut session =
        StructureSession::open(memory_gateway(&store), owner(1), ViewConfig::default())
            .await
            .unwrap();

    let Submission::Started(fut) =
        session.submit_update(2, DepartmentInput::named("Engineering II").with_parent(1))
    else {
        panic!("submission should start");
    };

    // the pending round-trip blocks neither selection nor camera moves
    session.handle(InteractionEvent::Select(3));
    session.handle(InteractionEvent::BeginPan {
        pointer: Point::new(0.0, 0.0),
        over_node: false,
    });
    session.handle(InteractionEvent::Pan {
        pointer: Point::new(25.0, 0.0),
    });
    assert_eq!(session.view().selected_id, Some(3));
    assert_eq!(session.view().camera.offset, Point::new(25.0, 0.0));

    let _ = session.complete(fut.await).await;
}

#[tokio::test]
async fn outcomes_after_close_are_discarded() {
    let store = seeded_store();
    let mut session =
        StructureSession::open(memory_gateway(&store), owner(1), ViewConfig::default())
            .await
            .unwrap();

    let Submission::Started(fut) =
        session.submit_update(2, DepartmentInput::named("Engineering II").with_parent(1))
    else {
        panic!("submission should start");
    };

    session.close();
    let outcome = fut.await;
    assert!(matches!(
        session.complete(outcome).await,
        SubmitOutcome::Closed
    ));

    // torn-down session state was not touched (still the initial load)
    assert!(session
        .departments()
        .iter()
        .any(|d| d.name == "Engineering"));
    assert!(matches!(
        session.submit_delete(2),
        Submission::Closed
    ));
}

#[tokio::test]
async fn refresh_resets_view_state() {
    let store = seeded_store();
    let mut session =
        StructureSession::open(memory_gateway(&store), owner(1), ViewConfig::default())
            .await
            .unwrap();

    session.handle(InteractionEvent::Select(2));
    session.handle(InteractionEvent::ToggleExpand(3));
    session.refresh().await.unwrap();

    assert_eq!(session.view().selected_id, None);
    assert!(session.view().expanded.contains(&3));
}
