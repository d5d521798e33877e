use rollcall_core::ErrorResponse;
use rollcall_models::{
    AuthResponse, Classroom, LoginRequest, Principal, ProbeResponse, Profile, RegisterRequest,
    Role, StudentProfile, TeacherProfile, TokenResponse,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::router::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::me,
        crate::modules::auth::controller::refresh,
        crate::modules::auth::controller::admin_probe,
        crate::modules::auth::controller::staff_probe,
        crate::modules::auth::controller::delete_account,
        crate::router::health,
    ),
    components(
        schemas(
            Role,
            Principal,
            Profile,
            StudentProfile,
            TeacherProfile,
            Classroom,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            TokenResponse,
            ProbeResponse,
            ErrorResponse,
            HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and token endpoints"),
        (name = "Authorization", description = "Role probes"),
        (name = "Health", description = "Service health")
    ),
    info(
        title = "Rollcall API",
        version = "0.1.0",
        description = "Identity and access control for the Rollcall attendance platform.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
