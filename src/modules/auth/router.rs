use axum::routing::{delete, get, post};
use axum::{Router, middleware};
use rollcall_models::Role;

use crate::middleware::guard::{RouteAuth, RoutePolicy, guard};
use crate::middleware::rate_limit::rate_limit_auth;
use crate::state::AppState;

use super::controller::{admin_probe, delete_account, login, me, refresh, register, staff_probe};

/// Routes under `/api/auth`. Authenticated unless a route says otherwise.
pub fn init_auth_router(state: &AppState) -> Router<AppState> {
    let controller = RoutePolicy::new(RouteAuth::AuthenticatedOnly);
    let public = controller.clone().with_handler(RouteAuth::Public);
    let admin_only = controller
        .clone()
        .with_handler(RouteAuth::require_any([Role::Admin]));
    let staff = controller
        .clone()
        .with_handler(RouteAuth::require_any([Role::Admin, Role::Teacher]));

    let rate_limited = middleware::from_fn_with_state(state.clone(), rate_limit_auth);

    Router::new()
        .route(
            "/register",
            guard(post(register), state, public.clone()).route_layer(rate_limited.clone()),
        )
        .route(
            "/login",
            guard(post(login), state, public).route_layer(rate_limited),
        )
        .route("/me", guard(get(me), state, controller.clone()))
        .route("/refresh", guard(post(refresh), state, controller))
        .route("/probe/admin", guard(get(admin_probe), state, admin_only.clone()))
        .route("/probe/staff", guard(get(staff_probe), state, staff))
        .route(
            "/accounts/{id}",
            guard(delete(delete_account), state, admin_only),
        )
}
