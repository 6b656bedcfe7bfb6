//! OpenAPI documentation for the series tracking API.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::api;

/// Security scheme for series routes (Bearer JWT only).
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "bearer_token".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Session token from `POST /api/login`. Include it in the `Authorization` header:\n\n\
                            ```\nAuthorization: Bearer YOUR_TOKEN\n```",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "serietrack",
        description = "REST API for tracking TV series watch progress, scoped per authenticated user."
    ),
    paths(
        api::handlers::auth::register,
        api::handlers::auth::login,
        api::handlers::auth::protected,
        api::handlers::series::create_series,
        api::handlers::series::list_series,
        api::handlers::series::get_series,
        api::handlers::series::update_series,
        api::handlers::series::patch_series,
        api::handlers::series::delete_series,
    ),
    components(schemas(
        api::models::MessageResponse,
        api::models::auth::RegisterRequest,
        api::models::auth::LoginRequest,
        api::models::auth::RegisterResponse,
        api::models::auth::LoginResponse,
        api::models::auth::ProtectedResponse,
        api::models::users::CurrentUser,
        api::models::users::UserResponse,
        api::models::series::SeriesStatus,
        api::models::series::SeriesCreate,
        api::models::series::SeriesPatch,
        api::models::series::SeriesResponse,
        api::models::series::SeriesEnvelope,
        api::models::series::SeriesListResponse,
        api::models::series::SeriesItemResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login and identity"),
        (name = "series", description = "Per-user series watch progress")
    )
)]
pub struct ApiDoc;
