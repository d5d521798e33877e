use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use rollcall_core::{AppError, ErrorResponse};
use rollcall_models::{
    AuthResponse, IdentityId, LoginRequest, Principal, ProbeResponse, RegisterRequest,
    TokenResponse,
};
use tracing::instrument;

use crate::middleware::guard::CurrentPrincipal;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::error::AuthError;
use super::service::issue_token;
use super::validators::PasswordCredentials;

/// Register a new account
///
/// Students must supply `studentCode` and `classroomId`; teachers and
/// admins ignore them.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account registered", body = AuthResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Email or student code already in use", body = ErrorResponse),
        (status = 429, description = "Too many requests", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let registration = state
        .provisioner()
        .register(dto)
        .await
        .map_err(AuthError::into_app_error)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token: registration.token,
            user: Principal::from(registration.account),
        }),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 429, description = "Too many requests", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let outcome = state
        .authenticator()
        .login(PasswordCredentials::new(dto.email, dto.password))
        .await
        .map_err(AuthError::into_app_error)?;

    Ok(Json(AuthResponse {
        token: outcome.token,
        user: outcome.principal,
    }))
}

/// Current principal with profile
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Authenticated principal", body = Principal),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn me(CurrentPrincipal(principal): CurrentPrincipal) -> Json<Principal> {
    Json(principal)
}

/// Issue a fresh token for the current principal
///
/// Earlier tokens stay valid until they expire.
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    responses(
        (status = 200, description = "New token issued", body = TokenResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip_all, fields(identity_id = %principal.id))]
pub async fn refresh(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
) -> Result<Json<TokenResponse>, AppError> {
    let token =
        issue_token(&state.token_codec, &principal).map_err(AuthError::into_app_error)?;
    Ok(Json(TokenResponse { token }))
}

/// Admin-only probe
#[utoipa::path(
    get,
    path = "/api/auth/probe/admin",
    responses(
        (status = 200, description = "Caller is an admin", body = ProbeResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authorization"
)]
pub async fn admin_probe(CurrentPrincipal(principal): CurrentPrincipal) -> Json<ProbeResponse> {
    Json(probe("admin access granted", &principal))
}

/// Staff probe (admins and teachers)
#[utoipa::path(
    get,
    path = "/api/auth/probe/staff",
    responses(
        (status = 200, description = "Caller is staff", body = ProbeResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is a student", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authorization"
)]
pub async fn staff_probe(CurrentPrincipal(principal): CurrentPrincipal) -> Json<ProbeResponse> {
    Json(probe("staff access granted", &principal))
}

fn probe(message: &str, principal: &Principal) -> ProbeResponse {
    ProbeResponse {
        message: message.to_string(),
        principal_id: principal.id,
        role: principal.role,
    }
}

/// Delete an account and its profile
#[utoipa::path(
    delete,
    path = "/api/auth/accounts/{id}",
    params(
        ("id" = String, Path, description = "Identity ID")
    ),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip_all, fields(identity_id = %id, actor = %actor.id))]
pub async fn delete_account(
    State(state): State<AppState>,
    CurrentPrincipal(actor): CurrentPrincipal,
    Path(id): Path<IdentityId>,
) -> Result<StatusCode, AppError> {
    state
        .provisioner()
        .delete(id)
        .await
        .map_err(AuthError::into_app_error)?;

    Ok(StatusCode::NO_CONTENT)
}
