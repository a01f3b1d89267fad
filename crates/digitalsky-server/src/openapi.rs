use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "DigitalSky API",
        version = "0.1.0",
        description = "Drone import applications: drafting, submission, and admin approval."
    ),
    paths(
        crate::routes::create_application,
        crate::routes::update_application,
        crate::routes::approve_application,
        crate::routes::list_mine,
        crate::routes::list_all,
        crate::routes::get_application,
        crate::routes::get_document,
        crate::routes::health,
    ),
    components(schemas(
        crate::dto::ApplicationBody,
        crate::dto::UpdateApplicationForm,
        crate::dto::ApproveRequestBody,
        crate::dto::HealthResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "applications", description = "Drone import applications"),
        (name = "system", description = "Health and system status"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Adds Bearer token security scheme to the OpenAPI spec.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "HS256 access token. Mint one with `digitalsky-server issue-token`.",
                        ))
                        .build(),
                ),
            );
        }
    }
}
