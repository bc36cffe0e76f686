use actix_web::{
    Error as ActixError, FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized,
};
use std::future::{Ready, ready};
use std::str::FromStr;
use uuid::Uuid;

use crate::database::models::User;
use crate::database::repositories::UserRepository;
use crate::error::AppError;

/// Explicit actor identity for every operation. Authentication lives
/// outside this service; the transport forwards the caller's id in the
/// `X-Actor-Id` header and everything downstream works with it
/// directly.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: Uuid,
}

impl Actor {
    /// Resolve the actor to a full user record. An id that doesn't
    /// resolve is an authentication problem, not a missing entity.
    pub async fn load(&self, users: &UserRepository) -> Result<User, AppError> {
        users
            .find_by_id(self.id)
            .await?
            .ok_or(AppError::Unauthorized)
    }
}

impl FromRequest for Actor {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let header = req.headers().get("X-Actor-Id");

        if let Some(header) = header {
            if let Ok(value) = header.to_str() {
                if let Ok(id) = Uuid::from_str(value) {
                    return ready(Ok(Actor { id }));
                }
                return ready(Err(ErrorUnauthorized("Invalid actor id")));
            }
        }

        ready(Err(ErrorUnauthorized("Missing actor id")))
    }
}
