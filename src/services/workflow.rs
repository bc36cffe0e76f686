use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{
    BalanceKind, Gender, LeaveRequest, LeaveRequestInput, LeaveStatus, LeaveType, Role,
    SubstitutionStatus, User,
};
use crate::database::repositories::{
    LeaveRequestRepository, SubstitutionRepository, UserRepository,
};
use crate::error::AppError;
use crate::services::ledger::BalanceLedger;

/// At most this many custom (1-hour) leaves per user per calendar
/// month, counting pending and approved requests.
const CUSTOM_LEAVES_PER_MONTH: i64 = 2;

/// The workflow transitions an actor can attempt on a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowAction {
    Create,
    ApproveHod,
    ApprovePrincipal,
    Reject,
    Cancel,
}

/// Single role × action dispatch table. Every transition consults this
/// before anything else, so the role rules live in one place.
pub fn permitted(role: Role, action: WorkflowAction) -> bool {
    use WorkflowAction::*;

    match (role, action) {
        (Role::Staff, Create | Cancel) => true,
        (Role::Hod, Create | Cancel | ApproveHod | Reject) => true,
        (Role::Principal, ApprovePrincipal | Reject) => true,
        _ => false,
    }
}

/// Validates and transitions leave requests through the two-gate
/// approval pipeline, consulting the balance ledger and the
/// substitution negotiator on the way.
#[derive(Clone)]
pub struct LeaveWorkflow {
    pool: SqlitePool,
    users: UserRepository,
    leaves: LeaveRequestRepository,
    substitutions: SubstitutionRepository,
    ledger: BalanceLedger,
}

impl LeaveWorkflow {
    pub fn new(
        pool: SqlitePool,
        users: UserRepository,
        leaves: LeaveRequestRepository,
        substitutions: SubstitutionRepository,
        ledger: BalanceLedger,
    ) -> Self {
        Self {
            pool,
            users,
            leaves,
            substitutions,
            ledger,
        }
    }

    /// File a new leave request. Staff requests must carry an accepted
    /// substitution owned by the actor and enter at `pending`; HOD
    /// requests have no substitution requirement and enter directly at
    /// `pending_principal` since there is no higher department
    /// authority.
    pub async fn create(
        &self,
        actor_id: Uuid,
        mut input: LeaveRequestInput,
    ) -> Result<LeaveRequest, AppError> {
        let actor = self.require_user(actor_id).await?;

        if !permitted(actor.role, WorkflowAction::Create) {
            return Err(AppError::Authorization(format!(
                "role {} may not file leave requests",
                actor.role
            )));
        }

        self.validate_input(&actor, &input).await?;

        let status = match actor.role {
            Role::Staff => {
                self.require_accepted_substitution(&actor, input.substitution_id)
                    .await?;
                LeaveStatus::Pending
            }
            _ => {
                // No cover gate for HOD requests; an unchecked
                // reference must not be persisted either.
                input.substitution_id = None;
                LeaveStatus::PendingPrincipal
            }
        };

        let request = self.leaves.create(actor.id, input, status).await?;

        Ok(request)
    }

    /// HOD gate: department-scoped approval of a pending staff
    /// request. For balance-tracked leave types the ledger is
    /// consulted first and an empty counter aborts the transition with
    /// no state change.
    pub async fn approve_as_hod(
        &self,
        actor_id: Uuid,
        leave_id: Uuid,
    ) -> Result<LeaveRequest, AppError> {
        let actor = self.require_user(actor_id).await?;

        if !permitted(actor.role, WorkflowAction::ApproveHod) {
            return Err(AppError::Authorization(
                "only the HOD can approve at this gate".to_string(),
            ));
        }

        let leave = self.require_leave(leave_id).await?;
        let owner = self.require_user_ref(leave.user_id).await?;

        if owner.department != actor.department {
            return Err(AppError::Authorization(format!(
                "leave request {} is not from your department",
                leave_id
            )));
        }

        if leave.status != LeaveStatus::Pending {
            return Err(AppError::StateConflict(format!(
                "leave request {} is {}, not pending",
                leave_id, leave.status
            )));
        }

        if let Some(kind) = BalanceKind::for_leave_type(leave.leave_type) {
            if !self.ledger.has_sufficient(owner.id, kind).await? {
                return Err(AppError::InsufficientBalance(format!(
                    "user {} has no {} leave left",
                    owner.id,
                    kind.label()
                )));
            }
        }

        let approved = self.leaves.set_hod_approved(leave_id).await?.ok_or_else(|| {
            AppError::StateConflict(format!(
                "leave request {} is no longer pending",
                leave_id
            ))
        })?;

        Ok(approved)
    }

    /// Principal gate: final approval. Staff-authored requests must
    /// have cleared the HOD gate first. The status change and the
    /// balance debit commit together; the debit itself is
    /// unconditional; this gate does not re-check sufficiency.
    pub async fn approve_as_principal(
        &self,
        actor_id: Uuid,
        leave_id: Uuid,
    ) -> Result<LeaveRequest, AppError> {
        let actor = self.require_user(actor_id).await?;

        if !permitted(actor.role, WorkflowAction::ApprovePrincipal) {
            return Err(AppError::Authorization(
                "only the principal can approve at this gate".to_string(),
            ));
        }

        let leave = self.require_leave(leave_id).await?;
        let owner = self.require_user_ref(leave.user_id).await?;

        if leave.status.is_terminal() {
            return Err(AppError::StateConflict(format!(
                "leave request {} is already {}",
                leave_id, leave.status
            )));
        }

        if owner.role == Role::Staff && !leave.hod_approval {
            return Err(AppError::Validation(
                "HOD approval required before principal approval".to_string(),
            ));
        }

        let kind = BalanceKind::for_leave_type(leave.leave_type);
        if kind.is_some() {
            self.ledger.get_or_create(owner.id).await?;
        }

        let mut tx = self.pool.begin().await?;
        let approved = self
            .leaves
            .set_principal_approved_tx(&mut tx, leave_id)
            .await?
            .ok_or_else(|| {
                AppError::StateConflict(format!(
                    "leave request {} is already settled",
                    leave_id
                ))
            })?;
        if let Some(kind) = kind {
            self.ledger.debit_tx(&mut tx, owner.id, kind).await?;
        }
        tx.commit().await?;

        Ok(approved)
    }

    /// Terminal rejection from any non-terminal state. Approval flags
    /// and balances stay exactly as they were.
    pub async fn reject(&self, actor_id: Uuid, leave_id: Uuid) -> Result<LeaveRequest, AppError> {
        let actor = self.require_user(actor_id).await?;

        if !permitted(actor.role, WorkflowAction::Reject) {
            return Err(AppError::Authorization(format!(
                "role {} may not reject leave requests",
                actor.role
            )));
        }

        let leave = self.require_leave(leave_id).await?;

        if actor.role == Role::Hod {
            let owner = self.require_user_ref(leave.user_id).await?;
            if owner.department != actor.department {
                return Err(AppError::Authorization(format!(
                    "leave request {} is not from your department",
                    leave_id
                )));
            }
        }

        if leave.status.is_terminal() {
            return Err(AppError::StateConflict(format!(
                "leave request {} is already {}",
                leave_id, leave.status
            )));
        }

        let rejected = self
            .leaves
            .set_status_from(
                leave_id,
                LeaveStatus::Rejected,
                &[LeaveStatus::Pending, LeaveStatus::PendingPrincipal],
            )
            .await?
            .ok_or_else(|| {
                AppError::StateConflict(format!(
                    "leave request {} is already settled",
                    leave_id
                ))
            })?;

        Ok(rejected)
    }

    /// Owner self-service: withdraw a request that has not yet entered
    /// the approval pipeline.
    pub async fn cancel(&self, actor_id: Uuid, leave_id: Uuid) -> Result<LeaveRequest, AppError> {
        let actor = self.require_user(actor_id).await?;

        if !permitted(actor.role, WorkflowAction::Cancel) {
            return Err(AppError::Authorization(format!(
                "role {} may not cancel leave requests",
                actor.role
            )));
        }

        let leave = self.require_leave(leave_id).await?;

        if leave.user_id != actor.id {
            return Err(AppError::Authorization(
                "only the owner may cancel a leave request".to_string(),
            ));
        }

        if leave.status != LeaveStatus::Pending {
            return Err(AppError::StateConflict(format!(
                "leave request {} is {}, only pending requests can be cancelled",
                leave_id, leave.status
            )));
        }

        let cancelled = self
            .leaves
            .set_status_from(leave_id, LeaveStatus::Cancelled, &[LeaveStatus::Pending])
            .await?
            .ok_or_else(|| {
                AppError::StateConflict(format!(
                    "leave request {} is no longer pending",
                    leave_id
                ))
            })?;

        Ok(cancelled)
    }

    /// Role-scoped listing: staff see their own requests, the HOD
    /// sees their department, the principal sees everything.
    pub async fn list_visible(&self, actor_id: Uuid) -> Result<Vec<LeaveRequest>, AppError> {
        let actor = self.require_user(actor_id).await?;

        let requests = match (actor.role, actor.department.as_deref()) {
            (Role::Principal, _) => self.leaves.list_all().await?,
            (Role::Hod, Some(department)) => self.leaves.list_for_department(department).await?,
            _ => self.leaves.list_for_user(actor.id).await?,
        };

        Ok(requests)
    }

    /// Single-request read with the same visibility scoping as
    /// `list_visible`.
    pub async fn get_visible(
        &self,
        actor_id: Uuid,
        leave_id: Uuid,
    ) -> Result<LeaveRequest, AppError> {
        let actor = self.require_user(actor_id).await?;
        let leave = self.require_leave(leave_id).await?;

        let visible = match actor.role {
            Role::Principal => true,
            Role::Hod => {
                let owner = self.require_user_ref(leave.user_id).await?;
                owner.department == actor.department
            }
            Role::Staff => leave.user_id == actor.id,
        };

        if !visible {
            return Err(AppError::Authorization(format!(
                "leave request {} is not visible to you",
                leave_id
            )));
        }

        Ok(leave)
    }

    async fn require_user(&self, id: Uuid) -> Result<User, AppError> {
        self.users.find_by_id(id).await?.ok_or(AppError::Unauthorized)
    }

    /// Like `require_user`, but for users referenced by a request
    /// rather than acting: absence is a missing entity, not an auth
    /// failure.
    async fn require_user_ref(&self, id: Uuid) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))
    }

    async fn require_leave(&self, id: Uuid) -> Result<LeaveRequest, AppError> {
        self.leaves
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("leave request {}", id)))
    }

    async fn validate_input(
        &self,
        actor: &User,
        input: &LeaveRequestInput,
    ) -> Result<(), AppError> {
        if input.end_date < input.start_date {
            return Err(AppError::Validation(
                "end date cannot be before start date".to_string(),
            ));
        }

        if input.hours < 0 {
            return Err(AppError::Validation("hours cannot be negative".to_string()));
        }

        match input.leave_type {
            LeaveType::Maternity if actor.gender != Gender::Female => {
                return Err(AppError::Validation(
                    "maternity leave is only for female staff".to_string(),
                ));
            }
            LeaveType::Paternity if actor.gender != Gender::Male => {
                return Err(AppError::Validation(
                    "paternity leave is only for male staff".to_string(),
                ));
            }
            LeaveType::Custom => {
                if !input.is_hourly || input.hours != 1 {
                    return Err(AppError::Validation(
                        "custom leave must be exactly 1 hour".to_string(),
                    ));
                }

                let taken = self
                    .leaves
                    .count_custom_in_month(actor.id, Utc::now())
                    .await?;
                if taken >= CUSTOM_LEAVES_PER_MONTH {
                    return Err(AppError::Validation(format!(
                        "only {} custom leaves allowed per month",
                        CUSTOM_LEAVES_PER_MONTH
                    )));
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Staff leave creation is gated on a cover arrangement: the
    /// substitution must exist, belong to the actor and already be
    /// accepted by the peer.
    async fn require_accepted_substitution(
        &self,
        actor: &User,
        substitution_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        let id = substitution_id.ok_or_else(|| {
            AppError::Validation("a substitution is required to create a leave request".to_string())
        })?;

        let substitution = self
            .substitutions
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Validation(format!("substitution {} does not exist", id)))?;

        if substitution.requested_by != actor.id {
            return Err(AppError::Validation(
                "you can only use your own substitution requests".to_string(),
            ));
        }

        if substitution.status != SubstitutionStatus::Accepted {
            return Err(AppError::Validation(format!(
                "substitution {} is {}, it must be accepted",
                id, substitution.status
            )));
        }

        Ok(())
    }
}
