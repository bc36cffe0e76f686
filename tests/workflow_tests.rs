use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use serial_test::serial;

use leavedesk::AppError;
use leavedesk::database::models::{Gender, LeaveStatus, LeaveType, Role};

mod common;

use common::{TestContext, custom_leave_input, leave_input};

#[actix_web::test]
#[serial]
async fn staff_creation_requires_accepted_substitution() {
    let ctx = TestContext::new().await.unwrap();
    let staff = ctx.seed_staff("alice", "cs").await;

    // No substitution at all
    let err = ctx
        .workflow
        .create(staff.id, leave_input(LeaveType::Casual, None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // A substitution that is still pending
    let peer = ctx.seed_staff("bob", "cs").await;
    let pending = ctx
        .substitution_service
        .create(
            staff.id,
            leavedesk::database::models::SubstitutionInput {
                requested_to: peer.id,
                date: Utc::now().date_naive(),
                period: "Morning".to_string(),
                time: chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                class_label: None,
                message: None,
            },
        )
        .await
        .unwrap();
    let err = ctx
        .workflow
        .create(staff.id, leave_input(LeaveType::Casual, Some(pending.id)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // A substitution accepted for somebody else
    let other = ctx.seed_staff("carol", "cs").await;
    let someone_elses = ctx.accepted_substitution(&other, &peer).await;
    let err = ctx
        .workflow
        .create(
            staff.id,
            leave_input(LeaveType::Casual, Some(someone_elses.id)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // The real thing
    let substitution = ctx.accepted_substitution(&staff, &peer).await;
    let request = ctx
        .workflow
        .create(staff.id, leave_input(LeaveType::Casual, Some(substitution.id)))
        .await
        .unwrap();
    assert_eq!(request.status, LeaveStatus::Pending);
    assert_eq!(request.substitution_id, Some(substitution.id));
}

#[actix_web::test]
#[serial]
async fn hod_requests_skip_the_hod_gate() {
    let ctx = TestContext::new().await.unwrap();
    let hod = ctx.seed_hod("dora", "cs").await;

    let request = ctx
        .workflow
        .create(hod.id, leave_input(LeaveType::Casual, None))
        .await
        .unwrap();

    assert_eq!(request.status, LeaveStatus::PendingPrincipal);
    assert!(!request.hod_approval);
}

#[actix_web::test]
#[serial]
async fn hod_requests_never_store_a_substitution_reference() {
    let ctx = TestContext::new().await.unwrap();
    let hod = ctx.seed_hod("dora", "cs").await;

    // A dangling id the gate never checked must not be persisted
    let request = ctx
        .workflow
        .create(
            hod.id,
            leave_input(LeaveType::Casual, Some(uuid::Uuid::new_v4())),
        )
        .await
        .unwrap();

    assert_eq!(request.substitution_id, None);
}

#[actix_web::test]
#[serial]
async fn principal_may_not_create_leave() {
    let ctx = TestContext::new().await.unwrap();
    let principal = ctx.seed_principal("prisha").await;

    let err = ctx
        .workflow
        .create(principal.id, leave_input(LeaveType::Casual, None))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Authorization(_)));
}

#[actix_web::test]
#[serial]
async fn date_ordering_is_validated() {
    let ctx = TestContext::new().await.unwrap();
    let hod = ctx.seed_hod("dora", "cs").await;

    let mut input = leave_input(LeaveType::Casual, None);
    input.end_date = input.start_date - Duration::days(2);

    let err = ctx.workflow.create(hod.id, input).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[actix_web::test]
#[serial]
async fn gender_gated_leave_types() {
    let ctx = TestContext::new().await.unwrap();
    // seed_hod creates a male user, seed_staff a female one
    let hod = ctx.seed_hod("dan", "cs").await;
    let staff = ctx.seed_staff("alice", "cs").await;
    let peer = ctx.seed_staff("bob", "cs").await;

    // Maternity for a male user fails
    let err = ctx
        .workflow
        .create(hod.id, leave_input(LeaveType::Maternity, None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Paternity for a female user fails
    let substitution = ctx.accepted_substitution(&staff, &peer).await;
    let err = ctx
        .workflow
        .create(
            staff.id,
            leave_input(LeaveType::Paternity, Some(substitution.id)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Matching gender passes validation
    let request = ctx
        .workflow
        .create(
            staff.id,
            leave_input(LeaveType::Maternity, Some(substitution.id)),
        )
        .await
        .unwrap();
    assert_eq!(request.leave_type, LeaveType::Maternity);
}

#[actix_web::test]
#[serial]
async fn custom_leave_quota_is_two_per_month() {
    let ctx = TestContext::new().await.unwrap();
    let hod = ctx.seed_hod("dora", "cs").await;

    // Custom leave must be hourly and exactly one hour
    let mut wrong = custom_leave_input(None);
    wrong.hours = 2;
    let err = ctx.workflow.create(hod.id, wrong).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    ctx.workflow
        .create(hod.id, custom_leave_input(None))
        .await
        .unwrap();
    ctx.workflow
        .create(hod.id, custom_leave_input(None))
        .await
        .unwrap();

    // Third one in the same month is over quota
    let err = ctx
        .workflow
        .create(hod.id, custom_leave_input(None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[actix_web::test]
#[serial]
async fn rejected_custom_leaves_do_not_count_against_quota() {
    let ctx = TestContext::new().await.unwrap();
    let hod = ctx.seed_hod("dora", "cs").await;
    let principal = ctx.seed_principal("prisha").await;

    let first = ctx
        .workflow
        .create(hod.id, custom_leave_input(None))
        .await
        .unwrap();
    ctx.workflow.reject(principal.id, first.id).await.unwrap();

    ctx.workflow
        .create(hod.id, custom_leave_input(None))
        .await
        .unwrap();
    let third = ctx.workflow.create(hod.id, custom_leave_input(None)).await;
    assert!(third.is_ok());
}

#[actix_web::test]
#[serial]
async fn hod_gate_rejects_on_empty_balance() {
    let ctx = TestContext::new().await.unwrap();
    let staff = ctx.seed_staff("alice", "cs").await;
    let peer = ctx.seed_staff("bob", "cs").await;
    let hod = ctx.seed_hod("dora", "cs").await;

    // Earned leave defaults to zero
    let substitution = ctx.accepted_substitution(&staff, &peer).await;
    let request = ctx
        .workflow
        .create(staff.id, leave_input(LeaveType::Earned, Some(substitution.id)))
        .await
        .unwrap();

    let err = ctx
        .workflow
        .approve_as_hod(hod.id, request.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InsufficientBalance(_)));

    // No state change
    let unchanged = ctx.leaves.find_by_id(request.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, LeaveStatus::Pending);
    assert!(!unchanged.hod_approval);
}

#[actix_web::test]
#[serial]
async fn full_pipeline_debits_exactly_one_day() {
    let ctx = TestContext::new().await.unwrap();
    let staff = ctx.seed_staff("alice", "cs").await;
    let peer = ctx.seed_staff("bob", "cs").await;
    let hod = ctx.seed_hod("dora", "cs").await;
    let principal = ctx.seed_principal("prisha").await;

    ctx.ledger.get_or_create(staff.id).await.unwrap();
    ctx.balances.set_earned_leave(staff.id, 1).await.unwrap();

    let substitution = ctx.accepted_substitution(&staff, &peer).await;
    let request = ctx
        .workflow
        .create(staff.id, leave_input(LeaveType::Earned, Some(substitution.id)))
        .await
        .unwrap();

    let after_hod = ctx.workflow.approve_as_hod(hod.id, request.id).await.unwrap();
    assert_eq!(after_hod.status, LeaveStatus::PendingPrincipal);
    assert!(after_hod.hod_approval);
    assert!(after_hod.hod_approval_date.is_some());

    let approved = ctx
        .workflow
        .approve_as_principal(principal.id, request.id)
        .await
        .unwrap();
    assert_eq!(approved.status, LeaveStatus::Approved);
    assert!(approved.principal_approval);

    let balance = ctx.ledger.get_or_create(staff.id).await.unwrap();
    assert_eq!(balance.earned_leave, 0);
}

#[actix_web::test]
#[serial]
async fn concurrent_principal_approvals_settle_once() {
    let ctx = TestContext::new().await.unwrap();
    let hod = ctx.seed_hod("dora", "cs").await;
    let principal = ctx.seed_principal("prisha").await;

    ctx.ledger.get_or_create(hod.id).await.unwrap();
    ctx.balances.set_earned_leave(hod.id, 2).await.unwrap();

    let request = ctx
        .workflow
        .create(hod.id, leave_input(LeaveType::Earned, None))
        .await
        .unwrap();

    // Whichever call lands second must see the settled state and
    // leave the balance alone.
    let (first, second) = tokio::join!(
        ctx.workflow.approve_as_principal(principal.id, request.id),
        ctx.workflow.approve_as_principal(principal.id, request.id)
    );
    let successes = first.is_ok() as usize + second.is_ok() as usize;
    assert_eq!(successes, 1);

    let leave = ctx.leaves.find_by_id(request.id).await.unwrap().unwrap();
    assert_eq!(leave.status, LeaveStatus::Approved);

    let balance = ctx.ledger.get_or_create(hod.id).await.unwrap();
    assert_eq!(balance.earned_leave, 1);
}

#[actix_web::test]
#[serial]
async fn concurrent_hod_approvals_stamp_once() {
    let ctx = TestContext::new().await.unwrap();
    let staff = ctx.seed_staff("alice", "cs").await;
    let peer = ctx.seed_staff("bob", "cs").await;
    let hod = ctx.seed_hod("dora", "cs").await;

    let substitution = ctx.accepted_substitution(&staff, &peer).await;
    let request = ctx
        .workflow
        .create(staff.id, leave_input(LeaveType::Casual, Some(substitution.id)))
        .await
        .unwrap();

    let (first, second) = tokio::join!(
        ctx.workflow.approve_as_hod(hod.id, request.id),
        ctx.workflow.approve_as_hod(hod.id, request.id)
    );
    let successes = first.is_ok() as usize + second.is_ok() as usize;
    assert_eq!(successes, 1);

    let leave = ctx.leaves.find_by_id(request.id).await.unwrap().unwrap();
    assert_eq!(leave.status, LeaveStatus::PendingPrincipal);
    assert!(leave.hod_approval);
}

#[actix_web::test]
#[serial]
async fn cross_department_hod_approval_is_forbidden() {
    let ctx = TestContext::new().await.unwrap();
    let staff = ctx.seed_staff("alice", "cs").await;
    let peer = ctx.seed_staff("bob", "cs").await;
    let other_hod = ctx.seed_hod("maya", "math").await;

    let substitution = ctx.accepted_substitution(&staff, &peer).await;
    let request = ctx
        .workflow
        .create(staff.id, leave_input(LeaveType::Casual, Some(substitution.id)))
        .await
        .unwrap();

    let err = ctx
        .workflow
        .approve_as_hod(other_hod.id, request.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Authorization(_)));

    let unchanged = ctx.leaves.find_by_id(request.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, LeaveStatus::Pending);
    assert!(!unchanged.hod_approval);
    assert!(unchanged.hod_approval_date.is_none());
}

#[actix_web::test]
#[serial]
async fn principal_requires_hod_approval_for_staff_requests() {
    let ctx = TestContext::new().await.unwrap();
    let staff = ctx.seed_staff("alice", "cs").await;
    let peer = ctx.seed_staff("bob", "cs").await;
    let principal = ctx.seed_principal("prisha").await;

    let substitution = ctx.accepted_substitution(&staff, &peer).await;
    let request = ctx
        .workflow
        .create(staff.id, leave_input(LeaveType::Casual, Some(substitution.id)))
        .await
        .unwrap();

    let err = ctx
        .workflow
        .approve_as_principal(principal.id, request.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[actix_web::test]
#[serial]
async fn principal_debit_is_unconditional_but_clamped() {
    let ctx = TestContext::new().await.unwrap();
    let hod = ctx.seed_hod("dora", "cs").await;
    let principal = ctx.seed_principal("prisha").await;

    // HOD-authored request goes straight to the principal, and that
    // gate never re-checks sufficiency. Earned balance is zero, the
    // debit still proceeds, storage clamps at zero.
    let request = ctx
        .workflow
        .create(hod.id, leave_input(LeaveType::Earned, None))
        .await
        .unwrap();

    let approved = ctx
        .workflow
        .approve_as_principal(principal.id, request.id)
        .await
        .unwrap();
    assert_eq!(approved.status, LeaveStatus::Approved);

    let balance = ctx.ledger.get_or_create(hod.id).await.unwrap();
    assert_eq!(balance.earned_leave, 0);
}

#[actix_web::test]
#[serial]
async fn untracked_types_never_touch_the_ledger() {
    let ctx = TestContext::new().await.unwrap();
    let hod = ctx.seed_hod("dora", "cs").await;
    let principal = ctx.seed_principal("prisha").await;

    let request = ctx
        .workflow
        .create(hod.id, leave_input(LeaveType::OnDuty, None))
        .await
        .unwrap();
    ctx.workflow
        .approve_as_principal(principal.id, request.id)
        .await
        .unwrap();

    let balance = ctx.ledger.get_or_create(hod.id).await.unwrap();
    assert_eq!(balance.casual_leave, 12);
    assert_eq!(balance.medical_leave, 12);
    assert_eq!(balance.earned_leave, 0);
}

#[actix_web::test]
#[serial]
async fn rejection_preserves_approval_flags() {
    let ctx = TestContext::new().await.unwrap();
    let staff = ctx.seed_staff("alice", "cs").await;
    let peer = ctx.seed_staff("bob", "cs").await;
    let hod = ctx.seed_hod("dora", "cs").await;
    let principal = ctx.seed_principal("prisha").await;

    ctx.ledger.get_or_create(staff.id).await.unwrap();
    ctx.balances.set_earned_leave(staff.id, 5).await.unwrap();

    let substitution = ctx.accepted_substitution(&staff, &peer).await;
    let request = ctx
        .workflow
        .create(staff.id, leave_input(LeaveType::Earned, Some(substitution.id)))
        .await
        .unwrap();
    let after_hod = ctx.workflow.approve_as_hod(hod.id, request.id).await.unwrap();
    assert!(after_hod.hod_approval);

    let rejected = ctx.workflow.reject(principal.id, request.id).await.unwrap();
    assert_eq!(rejected.status, LeaveStatus::Rejected);
    assert!(rejected.hod_approval);
    assert!(!rejected.principal_approval);

    // Balance untouched by rejection
    let balance = ctx.ledger.get_or_create(staff.id).await.unwrap();
    assert_eq!(balance.earned_leave, 5);
}

#[actix_web::test]
#[serial]
async fn terminal_states_admit_no_transitions() {
    let ctx = TestContext::new().await.unwrap();
    let hod = ctx.seed_hod("dora", "cs").await;
    let principal = ctx.seed_principal("prisha").await;

    let request = ctx
        .workflow
        .create(hod.id, leave_input(LeaveType::OnDuty, None))
        .await
        .unwrap();
    ctx.workflow.reject(principal.id, request.id).await.unwrap();

    let err = ctx
        .workflow
        .approve_as_principal(principal.id, request.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::StateConflict(_)));

    let err = ctx
        .workflow
        .reject(principal.id, request.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::StateConflict(_)));
}

#[actix_web::test]
#[serial]
async fn cancel_is_owner_only_and_pending_only() {
    let ctx = TestContext::new().await.unwrap();
    let staff = ctx.seed_staff("alice", "cs").await;
    let peer = ctx.seed_staff("bob", "cs").await;
    let hod = ctx.seed_hod("dora", "cs").await;

    let substitution = ctx.accepted_substitution(&staff, &peer).await;
    let request = ctx
        .workflow
        .create(staff.id, leave_input(LeaveType::Casual, Some(substitution.id)))
        .await
        .unwrap();

    // Somebody else cannot cancel
    let err = ctx.workflow.cancel(peer.id, request.id).await.unwrap_err();
    assert!(matches!(err, AppError::Authorization(_)));

    // Owner can, while pending
    let cancelled = ctx.workflow.cancel(staff.id, request.id).await.unwrap();
    assert_eq!(cancelled.status, LeaveStatus::Cancelled);

    // Once past the HOD gate cancellation is closed
    let substitution = ctx.accepted_substitution(&staff, &peer).await;
    let request = ctx
        .workflow
        .create(staff.id, leave_input(LeaveType::Casual, Some(substitution.id)))
        .await
        .unwrap();
    ctx.workflow.approve_as_hod(hod.id, request.id).await.unwrap();
    let err = ctx.workflow.cancel(staff.id, request.id).await.unwrap_err();
    assert!(matches!(err, AppError::StateConflict(_)));
}

#[actix_web::test]
#[serial]
async fn principal_may_not_cancel() {
    let ctx = TestContext::new().await.unwrap();
    let hod = ctx.seed_hod("dora", "cs").await;
    let principal = ctx.seed_principal("prisha").await;

    let request = ctx
        .workflow
        .create(hod.id, leave_input(LeaveType::Casual, None))
        .await
        .unwrap();

    let err = ctx
        .workflow
        .cancel(principal.id, request.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Authorization(_)));
}

#[actix_web::test]
#[serial]
async fn visibility_is_role_scoped() {
    let ctx = TestContext::new().await.unwrap();
    let staff = ctx.seed_staff("alice", "cs").await;
    let peer = ctx.seed_staff("bob", "cs").await;
    let outsider = ctx.seed_user("eve", Role::Staff, Some("math"), Gender::Female).await;
    let hod = ctx.seed_hod("dora", "cs").await;
    let principal = ctx.seed_principal("prisha").await;

    let substitution = ctx.accepted_substitution(&staff, &peer).await;
    let request = ctx
        .workflow
        .create(staff.id, leave_input(LeaveType::Casual, Some(substitution.id)))
        .await
        .unwrap();

    assert!(ctx.workflow.get_visible(staff.id, request.id).await.is_ok());
    assert!(ctx.workflow.get_visible(hod.id, request.id).await.is_ok());
    assert!(ctx.workflow.get_visible(principal.id, request.id).await.is_ok());

    let err = ctx
        .workflow
        .get_visible(outsider.id, request.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Authorization(_)));

    // Department listing includes staff requests, principal sees all
    let dept = ctx.workflow.list_visible(hod.id).await.unwrap();
    assert_eq!(dept.len(), 1);
    let all = ctx.workflow.list_visible(principal.id).await.unwrap();
    assert_eq!(all.len(), 1);
    let own = ctx.workflow.list_visible(outsider.id).await.unwrap();
    assert!(own.is_empty());
}

#[actix_web::test]
#[serial]
async fn pending_principal_listing_includes_hod_authored_pending() {
    let ctx = TestContext::new().await.unwrap();
    let staff = ctx.seed_staff("alice", "cs").await;
    let peer = ctx.seed_staff("bob", "cs").await;
    let hod = ctx.seed_hod("dora", "cs").await;

    // Staff request that has not cleared the HOD gate is not listed
    let substitution = ctx.accepted_substitution(&staff, &peer).await;
    ctx.workflow
        .create(staff.id, leave_input(LeaveType::Casual, Some(substitution.id)))
        .await
        .unwrap();

    // HOD request enters at pending_principal
    ctx.workflow
        .create(hod.id, leave_input(LeaveType::OnDuty, None))
        .await
        .unwrap();

    let pending = ctx.leaves.list_pending_principal().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].user_id, hod.id);
}
