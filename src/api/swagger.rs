use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Plate Share Service API",
        version = "1.0.0",
        description = "Backend for the Plate Share food-donation marketplace: donors list surplus food, requesters browse and request it.\n\n**Authentication:** Write operations and request listings require a Firebase ID token passed as a Bearer token.",
    ),
    paths(
        // Health
        crate::api::health::health_check,

        // Users
        crate::api::users::create_user,

        // Foods
        crate::api::foods::featured_foods,
        crate::api::foods::list_foods,
        crate::api::foods::available_foods,
        crate::api::foods::get_food,
        crate::api::foods::create_food,
        crate::api::foods::update_food,
        crate::api::foods::delete_food,

        // Food requests
        crate::api::food_requests::requests_for_food,
        crate::api::food_requests::create_request,
        crate::api::food_requests::update_request_status,
        crate::api::food_requests::delete_request,
        crate::api::food_requests::my_requests,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and health reporting."),
        (name = "Users", description = "User registration. Users are immutable once created."),
        (name = "Foods", description = "Food listings: featured and available browsing, donor CRUD."),
        (name = "Food Requests", description = "Requests made against food listings, including per-requester listings."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Firebase ID token"))
                        .build(),
                ),
            );
        }
    }
}
