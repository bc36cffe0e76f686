use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::database::models::{DepartmentCounts, LeaveRequestInput, Role};
use crate::database::repositories::{LeaveRequestRepository, UserRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{Actor, LeaveWorkflow};

/// Create a new leave request
pub async fn create_leave_request(
    actor: Actor,
    workflow: web::Data<LeaveWorkflow>,
    input: web::Json<LeaveRequestInput>,
) -> Result<HttpResponse, AppError> {
    let request = workflow.create(actor.id, input.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(request)))
}

/// List leave requests visible to the actor
pub async fn get_leave_requests(
    actor: Actor,
    workflow: web::Data<LeaveWorkflow>,
) -> Result<HttpResponse, AppError> {
    let requests = workflow.list_visible(actor.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(requests)))
}

/// Get a single leave request
pub async fn get_leave_request(
    actor: Actor,
    workflow: web::Data<LeaveWorkflow>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let request = workflow.get_visible(actor.id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(request)))
}

/// HOD approval gate
pub async fn approve_as_hod(
    actor: Actor,
    workflow: web::Data<LeaveWorkflow>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let request = workflow.approve_as_hod(actor.id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(request)))
}

/// Principal approval gate
pub async fn approve_as_principal(
    actor: Actor,
    workflow: web::Data<LeaveWorkflow>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let request = workflow
        .approve_as_principal(actor.id, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(request)))
}

/// Reject a leave request
pub async fn reject_leave(
    actor: Actor,
    workflow: web::Data<LeaveWorkflow>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let request = workflow.reject(actor.id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(request)))
}

/// Cancel an own pending leave request
pub async fn cancel_leave(
    actor: Actor,
    workflow: web::Data<LeaveWorkflow>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let request = workflow.cancel(actor.id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(request)))
}

/// Raw workflow counts for the actor's own requests
pub async fn get_leave_counts(
    actor: Actor,
    leaves: web::Data<LeaveRequestRepository>,
) -> Result<HttpResponse, AppError> {
    let counts = leaves.counts_for_user(actor.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(counts)))
}

/// Department-level counts, HOD only
pub async fn get_department_counts(
    actor: Actor,
    users: web::Data<UserRepository>,
    leaves: web::Data<LeaveRequestRepository>,
) -> Result<HttpResponse, AppError> {
    let actor = actor.load(&users).await?;

    if actor.role != Role::Hod {
        return Err(AppError::Authorization(
            "only the HOD can view department counts".to_string(),
        ));
    }

    let department = actor.department.as_deref().ok_or_else(|| {
        AppError::Validation("acting HOD has no department assigned".to_string())
    })?;

    let counts = DepartmentCounts {
        leaves: leaves.counts_for_department(department).await?,
        staff_count: users.count_staff_in_department(department).await?,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(counts)))
}

/// Everything awaiting the principal, principal only
pub async fn get_pending_principal(
    actor: Actor,
    users: web::Data<UserRepository>,
    leaves: web::Data<LeaveRequestRepository>,
) -> Result<HttpResponse, AppError> {
    let actor = actor.load(&users).await?;

    if actor.role != Role::Principal {
        return Err(AppError::Authorization(
            "only the principal can view pending approvals".to_string(),
        ));
    }

    let requests = leaves.list_pending_principal().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(requests)))
}
