use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::database::models::{CompensatoryWorkInput, NightWorkInput};
use crate::database::repositories::{CompensatoryWorkRepository, NightWorkRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{Actor, CreditAccrualEngine};

fn require_positive_hours(hours: i64) -> Result<(), AppError> {
    if hours <= 0 {
        return Err(AppError::Validation("hours must be positive".to_string()));
    }
    Ok(())
}

/// Record night work for the actor; triggers credit recomputation
pub async fn create_night_work(
    actor: Actor,
    repo: web::Data<NightWorkRepository>,
    engine: web::Data<CreditAccrualEngine>,
    input: web::Json<NightWorkInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();
    require_positive_hours(input.hours)?;

    let record = repo.create(actor.id, input).await?;
    engine.recalculate_night_work(record.user_id).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(record)))
}

/// List the actor's night-work records
pub async fn get_night_work(
    actor: Actor,
    repo: web::Data<NightWorkRepository>,
) -> Result<HttpResponse, AppError> {
    let records = repo.list_for_user(actor.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(records)))
}

/// Update an own night-work record; triggers credit recomputation
pub async fn update_night_work(
    actor: Actor,
    repo: web::Data<NightWorkRepository>,
    engine: web::Data<CreditAccrualEngine>,
    path: web::Path<Uuid>,
    input: web::Json<NightWorkInput>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let input = input.into_inner();
    require_positive_hours(input.hours)?;

    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("night work record {}", id)))?;

    if existing.user_id != actor.id {
        return Err(AppError::Authorization(
            "cannot update other users' night work".to_string(),
        ));
    }

    let record = repo.update(id, input).await?;
    engine.recalculate_night_work(record.user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(record)))
}

/// Delete an own night-work record. Recomputation runs after removal
/// so the balance reflects the records that still exist.
pub async fn delete_night_work(
    actor: Actor,
    repo: web::Data<NightWorkRepository>,
    engine: web::Data<CreditAccrualEngine>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("night work record {}", id)))?;

    if existing.user_id != actor.id {
        return Err(AppError::Authorization(
            "cannot delete other users' night work".to_string(),
        ));
    }

    repo.delete(id).await?;
    engine.recalculate_night_work(existing.user_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Record compensatory work for the actor; approved hours convert to
/// compensatory days immediately
pub async fn create_compensatory_work(
    actor: Actor,
    repo: web::Data<CompensatoryWorkRepository>,
    engine: web::Data<CreditAccrualEngine>,
    input: web::Json<CompensatoryWorkInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();
    require_positive_hours(input.hours)?;

    let record = repo.create(actor.id, input).await?;
    engine.grant_compensatory(&record).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(record)))
}

/// List the actor's compensatory-work records
pub async fn get_compensatory_work(
    actor: Actor,
    repo: web::Data<CompensatoryWorkRepository>,
) -> Result<HttpResponse, AppError> {
    let records = repo.list_for_user(actor.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(records)))
}

/// Update an own compensatory-work record. Each approved save grants
/// again; past grants are never recomputed.
pub async fn update_compensatory_work(
    actor: Actor,
    repo: web::Data<CompensatoryWorkRepository>,
    engine: web::Data<CreditAccrualEngine>,
    path: web::Path<Uuid>,
    input: web::Json<CompensatoryWorkInput>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let input = input.into_inner();
    require_positive_hours(input.hours)?;

    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("compensatory work record {}", id)))?;

    if existing.user_id != actor.id {
        return Err(AppError::Authorization(
            "cannot update other users' compensatory work".to_string(),
        ));
    }

    let record = repo.update(id, input).await?;
    engine.grant_compensatory(&record).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(record)))
}
