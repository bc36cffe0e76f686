use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::database::models::Role;
use crate::database::repositories::UserRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{Actor, BalanceLedger};

/// Get the actor's own leave balance, creating it on first read
pub async fn get_my_balance(
    actor: Actor,
    ledger: web::Data<BalanceLedger>,
) -> Result<HttpResponse, AppError> {
    let balance = ledger.get_or_create(actor.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(balance)))
}

/// Get another user's balance: self always, HOD for their own
/// department's staff, principal for anyone
pub async fn get_user_balance(
    actor: Actor,
    users: web::Data<UserRepository>,
    ledger: web::Data<BalanceLedger>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    let actor = actor.load(&users).await?;

    let visible = match actor.role {
        Role::Principal => true,
        _ if actor.id == user_id => true,
        Role::Hod => {
            let target = users
                .find_by_id(user_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))?;
            target.department == actor.department
        }
        Role::Staff => false,
    };

    if !visible {
        return Err(AppError::Authorization(format!(
            "balance of user {} is not visible to you",
            user_id
        )));
    }

    let balance = ledger.get_or_create(user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(balance)))
}

/// Recompute the actor's monthly earned-leave accrual
pub async fn refresh_earned_leave(
    actor: Actor,
    users: web::Data<UserRepository>,
    ledger: web::Data<BalanceLedger>,
) -> Result<HttpResponse, AppError> {
    let actor = actor.load(&users).await?;
    let balance = ledger.update_earned_leave(&actor).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(balance)))
}
