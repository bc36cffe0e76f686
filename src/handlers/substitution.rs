use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::database::models::SubstitutionInput;
use crate::database::repositories::SubstitutionRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{Actor, SubstitutionService};

/// Request cover from a peer
pub async fn create_substitution(
    actor: Actor,
    service: web::Data<SubstitutionService>,
    input: web::Json<SubstitutionInput>,
) -> Result<HttpResponse, AppError> {
    let substitution = service.create(actor.id, input.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(substitution)))
}

/// Pending requests awaiting the actor's answer
pub async fn get_received_substitutions(
    actor: Actor,
    repo: web::Data<SubstitutionRepository>,
) -> Result<HttpResponse, AppError> {
    let substitutions = repo.list_received(actor.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(substitutions)))
}

/// Requests the actor has sent
pub async fn get_sent_substitutions(
    actor: Actor,
    repo: web::Data<SubstitutionRepository>,
) -> Result<HttpResponse, AppError> {
    let substitutions = repo.list_sent(actor.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(substitutions)))
}

/// Accept a substitution request addressed to the actor
pub async fn accept_substitution(
    actor: Actor,
    service: web::Data<SubstitutionService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let substitution = service.accept(actor.id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(substitution)))
}

/// Reject a substitution request addressed to the actor
pub async fn reject_substitution(
    actor: Actor,
    service: web::Data<SubstitutionService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let substitution = service.reject(actor.id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(substitution)))
}
