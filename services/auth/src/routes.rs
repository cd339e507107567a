//! Authentication routes: registration, login and the current user

use axum::{
    Extension, Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{error, info, warn};

use crate::{
    AuthState,
    error::AuthError,
    middleware::auth_middleware,
    models::{AuthResponse, CurrentUser, LoginRequest, NewUser, RegisterRequest, UserResponse},
    password::{hash_password_blocking, verify_dummy_password_blocking, verify_password_blocking},
    validation::{normalize_email, validate_email, validate_name, validate_password},
};

/// Create the router for the authentication endpoints
///
/// Meant to be nested under `/api/auth`. The returned router has its state
/// already applied, so it can be nested into a router of any state type.
pub fn create_router<S>(state: AuthState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let protected_routes = Router::new()
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected_routes)
        .with_state(state)
}

/// User registration endpoint
pub async fn register(
    State(state): State<AuthState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let Json(payload) = payload?;

    let (Some(name), Some(email), Some(password)) =
        (payload.name, payload.email, payload.password)
    else {
        return Err(AuthError::Validation("Please add all fields".to_string()));
    };

    let name = name.trim().to_string();
    let email = normalize_email(&email);

    validate_name(&name).map_err(AuthError::Validation)?;
    validate_email(&email).map_err(AuthError::Validation)?;
    validate_password(&password).map_err(AuthError::Validation)?;

    info!("Registration attempt for {}", email);

    let existing = state.users.find_by_email(&email).await.map_err(|e| {
        error!("Failed to look up user: {}", e);
        AuthError::InternalServerError
    })?;
    if existing.is_some() {
        return Err(AuthError::Validation("User already exists".to_string()));
    }

    let password_hash = hash_password_blocking(password).await.map_err(|e| {
        error!("Failed to hash password: {}", e);
        AuthError::InternalServerError
    })?;

    let new_user = NewUser {
        name,
        email,
        password_hash,
    };

    // The lookup above races with concurrent registrations; the store has the final say
    let user = state.users.create(&new_user).await.map_err(|e| {
        if e.is_conflict() {
            AuthError::Validation("User already exists".to_string())
        } else {
            error!("Failed to create user: {}", e);
            AuthError::InternalServerError
        }
    })?;

    let response = issue_token(&state, CurrentUser::from(user))?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// User login endpoint
pub async fn login(
    State(state): State<AuthState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let Json(payload) = payload?;

    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(AuthError::Validation(
            "Please add email and password".to_string(),
        ));
    };
    let email = normalize_email(&email);

    info!("Login attempt for {}", email);

    if state.rate_limiter.is_locked(&email).await {
        warn!("Login for {} refused: locked out", email);
        return Err(AuthError::TooManyAttempts);
    }

    let user = state.users.find_by_email(&email).await.map_err(|e| {
        error!("Failed to look up user: {}", e);
        AuthError::InternalServerError
    })?;

    let Some(user) = user else {
        // Unknown emails pay the same argon2 cost as a wrong password
        if let Err(e) = verify_dummy_password_blocking(password).await {
            error!("Failed to run dummy password check: {}", e);
        }
        state.rate_limiter.record_failure(&email).await;
        return Err(AuthError::InvalidCredentials);
    };

    let valid = verify_password_blocking(user.password_hash.clone(), password)
        .await
        .map_err(|e| {
            error!("Failed to verify password for {}: {}", email, e);
            AuthError::InternalServerError
        })?;

    if !valid {
        state.rate_limiter.record_failure(&email).await;
        return Err(AuthError::InvalidCredentials);
    }

    state.rate_limiter.reset(&email).await;

    let response = issue_token(&state, CurrentUser::from(user))?;

    Ok((StatusCode::OK, Json(response)))
}

/// Current user endpoint
pub async fn me(Extension(user): Extension<CurrentUser>) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

fn issue_token(state: &AuthState, user: CurrentUser) -> Result<AuthResponse, AuthError> {
    let token = state.jwt_service.generate_token(user.id).map_err(|e| {
        error!("Failed to generate token: {}", e);
        AuthError::InternalServerError
    })?;

    Ok(AuthResponse {
        user: UserResponse::from(user),
        token,
    })
}
