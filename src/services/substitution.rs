use uuid::Uuid;

use crate::database::models::{Substitution, SubstitutionInput, SubstitutionStatus};
use crate::database::repositories::{SubstitutionRepository, UserRepository};
use crate::error::AppError;

/// Peer-to-peer cover arrangements. Only the requested peer may answer,
/// and only while the request is still pending; accepted and rejected
/// are terminal.
#[derive(Clone)]
pub struct SubstitutionService {
    users: UserRepository,
    substitutions: SubstitutionRepository,
}

impl SubstitutionService {
    pub fn new(users: UserRepository, substitutions: SubstitutionRepository) -> Self {
        Self {
            users,
            substitutions,
        }
    }

    pub async fn create(
        &self,
        actor_id: Uuid,
        input: SubstitutionInput,
    ) -> Result<Substitution, AppError> {
        if input.requested_to == actor_id {
            return Err(AppError::Validation(
                "cannot request a substitution from yourself".to_string(),
            ));
        }

        self.users
            .find_by_id(input.requested_to)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", input.requested_to)))?;

        let substitution = self.substitutions.create(actor_id, input).await?;

        Ok(substitution)
    }

    pub async fn accept(&self, actor_id: Uuid, id: Uuid) -> Result<Substitution, AppError> {
        self.respond(actor_id, id, SubstitutionStatus::Accepted).await
    }

    pub async fn reject(&self, actor_id: Uuid, id: Uuid) -> Result<Substitution, AppError> {
        self.respond(actor_id, id, SubstitutionStatus::Rejected).await
    }

    async fn respond(
        &self,
        actor_id: Uuid,
        id: Uuid,
        status: SubstitutionStatus,
    ) -> Result<Substitution, AppError> {
        let substitution = self
            .substitutions
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("substitution {}", id)))?;

        if substitution.requested_to != actor_id {
            return Err(AppError::Authorization(format!(
                "substitution {} was not requested to you",
                id
            )));
        }

        if substitution.status != SubstitutionStatus::Pending {
            return Err(AppError::StateConflict(format!(
                "substitution {} is already {}",
                id, substitution.status
            )));
        }

        let updated = self.substitutions.set_status(id, status).await?;

        Ok(updated)
    }
}
