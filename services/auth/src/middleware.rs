//! Authorization guard: JWT bearer validation for protected routes

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::{debug, error};

use crate::{AuthState, error::AuthError, models::CurrentUser};

/// Verify the bearer token and attach the resolved [`CurrentUser`]
///
/// A missing or malformed `Authorization` header, a token that fails
/// validation, and a token whose subject no longer resolves to a user all
/// yield [`AuthError::Unauthenticated`]. Nothing is written to any store.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AuthError::Unauthenticated)?;

    let claims = state
        .jwt_service
        .validate_token(bearer.token())
        .map_err(|e| {
            debug!("Rejected bearer token: {}", e);
            AuthError::Unauthenticated
        })?;

    let user = state
        .users
        .find_by_id(claims.sub)
        .await
        .map_err(|e| {
            error!("Failed to resolve token subject: {}", e);
            AuthError::InternalServerError
        })?
        .ok_or_else(|| {
            debug!("Token subject {} does not exist", claims.sub);
            AuthError::Unauthenticated
        })?;

    req.extensions_mut().insert(CurrentUser::from(user));

    Ok(next.run(req).await)
}
