pub mod auth;
pub mod chat;
pub mod games;
pub mod rsvps;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use crate::error::AppError;

/// The numeric `{id}` segment of a `/games/{id}...` route. A segment that
/// is not an integer is answered with the 400 error page.
pub struct GameId(pub i64);

impl<S> FromRequestParts<S> for GameId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<i64>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(GameId(id)),
            Err(rejection) => {
                tracing::debug!(path = %parts.uri.path(), "bad game id: {rejection}");
                Err(AppError::BadRequest("Invalid Game ID format.".to_string()))
            }
        }
    }
}
