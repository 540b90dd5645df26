//! OpenAPI documentation for the REST API.
//!
//! Registers every inbound path, the error payload mirrors from
//! [`crate::inbound::http::schemas`] and the bearer security scheme. Swagger
//! UI serves the document in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Adds the `BearerToken` security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/v1/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Job board API",
        description = "Registration, login, job applications with resume upload and favorite jobs."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::identity::register,
        crate::inbound::http::identity::login,
        crate::inbound::http::identity::me,
        crate::inbound::http::applications::submit_application,
        crate::inbound::http::applications::list_my_applications,
        crate::inbound::http::applications::list_applications,
        crate::inbound::http::favorites::add_favorite,
        crate::inbound::http::favorites::remove_favorite,
        crate::inbound::http::favorites::list_favorites,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "auth", description = "Registration, login and the caller's profile"),
        (name = "applications", description = "Job applications"),
        (name = "favorites", description = "Favorite jobs"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
