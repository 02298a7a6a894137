//! One user's structure-view session: the fetched department list, the
//! built forest, the view state and the pending-mutation bookkeeping.
//!
//! Mutations are two-phase so a round-trip in flight never blocks the
//! purely local interactions (pan, zoom, select): `submit_*` validates the
//! in-flight guard and hands back a future that does NOT borrow the
//! session; the host drives it and feeds the outcome to [`complete`],
//! which is where state is applied, or discarded when the session was
//! closed while the request was out.
//!
//! [`complete`]: StructureSession::complete

use std::collections::HashSet;
use std::future::Future;

use crate::config::ViewConfig;
use crate::error::StructureError;
use crate::gateway::MutationGateway;
use crate::models::{Department, DepartmentId, DepartmentInput, Identity};
use crate::render::{render, RenderTree};
use crate::store::{DepartmentStore, PermissionOracle};
use crate::tree::{build_forest, TreeNode};
use crate::view::{InteractionEvent, ViewState};

/// What a mutation was aimed at. At most one mutation per target may be in
/// flight; update and delete share the per-department slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MutationTarget {
    Create { parent_id: Option<DepartmentId> },
    Department(DepartmentId),
}

/// Result of asking the session to start a mutation.
pub enum Submission<F> {
    /// Drive this future, then pass its output to
    /// [`StructureSession::complete`].
    Started(F),
    /// A mutation for the same target is already in flight; the request is
    /// ignored, not queued.
    InFlight,
    /// The session was closed; nothing was submitted.
    Closed,
}

/// Carries a finished round-trip back to the session.
#[derive(Debug)]
pub struct MutationOutcome {
    target: MutationTarget,
    result: Result<Option<DepartmentId>, StructureError>,
}

/// Terminal state of one mutation attempt, after completion.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The store accepted the mutation and the session reloaded.
    Applied { created: Option<DepartmentId> },
    /// The gateway or the server rejected it; the tree is untouched.
    Rejected(StructureError),
    /// Same target already in flight; nothing was sent.
    InFlight,
    /// The session is closed; the result (if any) was discarded.
    Closed,
}

/// Transient status text scoped to the open dialog or action.
#[derive(Debug, Clone)]
pub struct StatusLine {
    pub message: String,
    /// Offer "retry" only for transport faults.
    pub retryable: bool,
}

impl StatusLine {
    fn from_error(err: &StructureError) -> Self {
        Self {
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

pub struct StructureSession<S, O> {
    gateway: MutationGateway<S, O>,
    acting: Identity,
    cfg: ViewConfig,
    departments: Vec<Department>,
    identities: Vec<Identity>,
    forest: Vec<TreeNode>,
    view: ViewState,
    pending: HashSet<MutationTarget>,
    status: Option<StatusLine>,
    closed: bool,
}

impl<S, O> StructureSession<S, O>
where
    S: DepartmentStore + Clone + 'static,
    O: PermissionOracle + Clone + 'static,
{
    /// Mount: perform the initial load and hand back a ready session.
    pub async fn open(
        gateway: MutationGateway<S, O>,
        acting: Identity,
        cfg: ViewConfig,
    ) -> Result<Self, StructureError> {
        let mut session = Self {
            gateway,
            acting,
            cfg,
            departments: Vec::new(),
            identities: Vec::new(),
            forest: Vec::new(),
            view: ViewState::initial([]),
            pending: HashSet::new(),
            status: None,
            closed: false,
        };
        session.reload().await?;
        Ok(session)
    }

    /// Refetch everything and rebuild the forest. The new forest replaces
    /// the old one atomically from the renderer's point of view, and the
    /// view state resets as on first load.
    async fn reload(&mut self) -> Result<(), StructureError> {
        let departments = self.gateway.store().list_departments().await?;
        let identities = self.gateway.store().list_identities().await?;
        self.forest = build_forest(&departments);
        self.view = ViewState::initial(departments.iter().map(|d| d.id));
        self.departments = departments;
        self.identities = identities;
        Ok(())
    }

    /// Manual refresh, e.g. the toolbar button. No-op once closed.
    pub async fn refresh(&mut self) -> Result<(), StructureError> {
        if self.closed {
            return Ok(());
        }
        self.reload().await
    }

    /// Apply one local interaction. Always available, even while a
    /// mutation round-trip is in flight.
    pub fn handle(&mut self, event: InteractionEvent) {
        if self.closed {
            return;
        }
        self.view.apply(event, &self.cfg);
    }

    pub fn render_tree(&self) -> RenderTree {
        render(&self.forest, &self.view, &self.cfg)
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    /// Identity list for the manager picker.
    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }

    pub fn acting(&self) -> &Identity {
        &self.acting
    }

    pub fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }

    pub fn is_pending(&self, target: &MutationTarget) -> bool {
        self.pending.contains(target)
    }

    /// Tear down. Outstanding round-trips may still resolve; their
    /// outcomes will be discarded by [`complete`](Self::complete).
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn submit_create(
        &mut self,
        input: DepartmentInput,
    ) -> Submission<impl Future<Output = MutationOutcome>> {
        let target = MutationTarget::Create {
            parent_id: input.parent_id,
        };
        if self.closed {
            return Submission::Closed;
        }
        if !self.pending.insert(target.clone()) {
            return Submission::InFlight;
        }
        let gateway = self.gateway.clone();
        let acting = self.acting.clone();
        Submission::Started(async move {
            let result = gateway
                .create_department(input, &acting)
                .await
                .map(Some);
            MutationOutcome { target, result }
        })
    }

    pub fn submit_update(
        &mut self,
        id: DepartmentId,
        input: DepartmentInput,
    ) -> Submission<impl Future<Output = MutationOutcome>> {
        let target = MutationTarget::Department(id);
        if self.closed {
            return Submission::Closed;
        }
        if !self.pending.insert(target.clone()) {
            return Submission::InFlight;
        }
        let gateway = self.gateway.clone();
        let acting = self.acting.clone();
        Submission::Started(async move {
            let result = gateway
                .update_department(id, input, &acting)
                .await
                .map(|()| None);
            MutationOutcome { target, result }
        })
    }

    pub fn submit_delete(
        &mut self,
        id: DepartmentId,
    ) -> Submission<impl Future<Output = MutationOutcome>> {
        let target = MutationTarget::Department(id);
        if self.closed {
            return Submission::Closed;
        }
        if !self.pending.insert(target.clone()) {
            return Submission::InFlight;
        }
        let gateway = self.gateway.clone();
        let acting = self.acting.clone();
        Submission::Started(async move {
            let result = gateway
                .delete_department(id, &acting)
                .await
                .map(|()| None);
            MutationOutcome { target, result }
        })
    }

    /// Apply a finished round-trip. On success the dialog closes, status
    /// clears and the whole list reloads; on rejection only the status line
    /// changes; no optimistic update was applied, so there is nothing to
    /// roll back. After [`close`](Self::close), outcomes are dropped on the
    /// floor instead of mutating torn-down state.
    pub async fn complete(&mut self, outcome: MutationOutcome) -> SubmitOutcome {
        self.pending.remove(&outcome.target);
        if self.closed {
            return SubmitOutcome::Closed;
        }
        match outcome.result {
            Ok(created) => {
                self.status = None;
                self.view.dialog = None;
                if let Err(e) = self.reload().await {
                    self.status = Some(StatusLine::from_error(&e));
                }
                SubmitOutcome::Applied { created }
            }
            Err(e) => {
                self.status = Some(StatusLine::from_error(&e));
                SubmitOutcome::Rejected(e)
            }
        }
    }

    /// Submit and complete in one call, for hosts without their own
    /// executor plumbing (CLI, tests).
    pub async fn submit_create_now(&mut self, input: DepartmentInput) -> SubmitOutcome {
        match self.submit_create(input) {
            Submission::Started(fut) => {
                let outcome = fut.await;
                self.complete(outcome).await
            }
            Submission::InFlight => SubmitOutcome::InFlight,
            Submission::Closed => SubmitOutcome::Closed,
        }
    }

    pub async fn submit_update_now(
        &mut self,
        id: DepartmentId,
        input: DepartmentInput,
    ) -> SubmitOutcome {
        match self.submit_update(id, input) {
            Submission::Started(fut) => {
                let outcome = fut.await;
                self.complete(outcome).await
            }
            Submission::InFlight => SubmitOutcome::InFlight,
            Submission::Closed => SubmitOutcome::Closed,
        }
    }

    pub async fn submit_delete_now(&mut self, id: DepartmentId) -> SubmitOutcome {
        match self.submit_delete(id) {
            Submission::Started(fut) => {
                let outcome = fut.await;
                self.complete(outcome).await
            }
            Submission::InFlight => SubmitOutcome::InFlight,
            Submission::Closed => SubmitOutcome::Closed,
        }
    }
}
