//! Per-route authorization.
//!
//! Every route declares a [`RoutePolicy`]. The guard evaluates it in three
//! steps: a public route is admitted without looking at any token; any other
//! route needs `Authorization: Bearer <token>` that resolves to a
//! [`Principal`]; a role-restricted route additionally needs the principal's
//! role in its allowed set. Admitted principals are stored in the request
//! extensions and read back with [`CurrentPrincipal`].
//!
//! ```rust,ignore
//! use axum::routing::get;
//! use rollcall::middleware::guard::{RouteAuth, RoutePolicy, guard};
//! use rollcall_models::Role;
//!
//! let policy = RoutePolicy::new(RouteAuth::AuthenticatedOnly)
//!     .with_handler(RouteAuth::require_any([Role::Teacher]));
//! let router = Router::new().route("/sessions", guard(get(list_sessions), &state, policy));
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};
use rollcall_core::AppError;
use rollcall_models::{Principal, Role};
use rollcall_observability::track_guard_rejection;
use tracing::warn;

use crate::modules::auth::error::AuthError;
use crate::modules::auth::validators::{BearerToken, TokenValidator, Validator};
use crate::state::AppState;

const MISSING_HEADER: &str = "Missing authorization header";
const MALFORMED_HEADER: &str = "Invalid authorization header format";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAuth {
    Public,
    AuthenticatedOnly,
    RequireRole(HashSet<Role>),
}

impl RouteAuth {
    pub fn require_any(roles: impl IntoIterator<Item = Role>) -> Self {
        RouteAuth::RequireRole(roles.into_iter().collect())
    }

    /// Role check only. Authentication is assumed to have passed.
    pub fn admits(&self, principal: &Principal) -> bool {
        match self {
            RouteAuth::Public | RouteAuth::AuthenticatedOnly => true,
            RouteAuth::RequireRole(roles) => roles.contains(&principal.role),
        }
    }
}

/// Router-level declaration plus an optional handler-level override.
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    controller: RouteAuth,
    handler: Option<RouteAuth>,
}

impl RoutePolicy {
    pub fn new(controller: RouteAuth) -> Self {
        Self {
            controller,
            handler: None,
        }
    }

    pub fn with_handler(mut self, handler: RouteAuth) -> Self {
        self.handler = Some(handler);
        self
    }

    /// The handler-level declaration when present, else the controller's.
    pub fn effective(&self) -> &RouteAuth {
        self.handler.as_ref().unwrap_or(&self.controller)
    }
}

#[derive(Debug)]
pub enum GuardRejection {
    MissingHeader,
    MalformedHeader,
    Rejected(AuthError),
    Forbidden { role: Role },
}

impl GuardRejection {
    /// Metric label.
    pub fn reason(&self) -> &'static str {
        match self {
            GuardRejection::Forbidden { .. } => "forbidden",
            _ => "unauthenticated",
        }
    }

    pub fn into_app_error(self) -> AppError {
        match self {
            GuardRejection::MissingHeader => AppError::unauthorized(MISSING_HEADER),
            GuardRejection::MalformedHeader => AppError::unauthorized(MALFORMED_HEADER),
            GuardRejection::Rejected(err) => err.into_app_error(),
            GuardRejection::Forbidden { .. } => {
                AppError::forbidden("Access denied for this role")
            }
        }
    }
}

/// Extracts the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<BearerToken, GuardRejection> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(GuardRejection::MissingHeader)?
        .to_str()
        .map_err(|_| GuardRejection::MalformedHeader)?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(GuardRejection::MalformedHeader)?;

    Ok(BearerToken(token.to_string()))
}

/// Runs the chain for `auth`. `Ok(None)` means a public route was admitted
/// without authentication.
pub async fn evaluate(
    state: &AppState,
    auth: &RouteAuth,
    headers: &HeaderMap,
) -> Result<Option<Principal>, GuardRejection> {
    if matches!(auth, RouteAuth::Public) {
        return Ok(None);
    }

    let token = bearer_token(headers)?;
    let principal = TokenValidator::new(state.resolver())
        .validate(token)
        .await
        .map_err(GuardRejection::Rejected)?;

    if !auth.admits(&principal) {
        return Err(GuardRejection::Forbidden {
            role: principal.role,
        });
    }

    Ok(Some(principal))
}

#[derive(Clone)]
struct Guard {
    state: AppState,
    policy: Arc<RoutePolicy>,
}

async fn guard_chain(
    State(guard): State<Guard>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    match evaluate(&guard.state, guard.policy.effective(), req.headers()).await {
        Ok(Some(principal)) => {
            req.extensions_mut().insert(principal);
        }
        Ok(None) => {}
        Err(rejection) => {
            track_guard_rejection(rejection.reason());
            match &rejection {
                GuardRejection::Rejected(err) => {
                    warn!(path = %req.uri().path(), reason = err.reason(), "Token rejected")
                }
                GuardRejection::Forbidden { role } => {
                    warn!(path = %req.uri().path(), %role, "Role not permitted")
                }
                _ => warn!(path = %req.uri().path(), "Authorization header missing or malformed"),
            }
            return Err(rejection.into_app_error());
        }
    }

    Ok(next.run(req).await)
}

/// Wraps `route` in the guard chain for `policy`.
pub fn guard<S>(route: MethodRouter<S>, state: &AppState, policy: RoutePolicy) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    let guard = Guard {
        state: state.clone(),
        policy: Arc::new(policy),
    };
    route.route_layer(middleware::from_fn_with_state(guard, guard_chain))
}

/// The principal admitted by the guard. Only available on guarded,
/// non-public routes.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Principal);

impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(CurrentPrincipal)
            .ok_or_else(|| AppError::unauthorized(MISSING_HEADER))
    }
}
