mod api;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use std::env;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::services::firebase::{FirebaseAuth, TokenVerifier};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "5100".to_string());
    let mongodb_uri = env::var("MONGODB_URI").expect("MONGODB_URI must be set");
    let database_name =
        env::var("MONGODB_DATABASE").unwrap_or_else(|_| "plate_share".to_string());

    log::info!("🍽️ Starting Plate Share Service...");

    // Initialize MongoDB connection (single long-lived client, injected into
    // every handler below instead of living in a global)
    let db = database::MongoDB::new(&mongodb_uri, &database_name)
        .await
        .expect("Failed to connect to MongoDB");
    let db_data = web::Data::new(db);

    log::info!("✅ MongoDB connected successfully");

    // Identity verifier, behind the trait object the auth extractor looks up
    let verifier: Arc<dyn TokenVerifier> = Arc::new(FirebaseAuth::from_env());
    let verifier_data: web::Data<dyn TokenVerifier> = web::Data::from(verifier);

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server. One flat route table; routes requiring auth declare
    // the AuthenticatedUser extractor in their handler, nothing is duplicated.
    HttpServer::new(move || {
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .app_data(verifier_data.clone())
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi),
            )
            // Liveness & health
            .route("/", web::get().to(api::health::index))
            .route("/health", web::get().to(api::health::health_check))
            // Users
            .route("/api/users", web::post().to(api::users::create_user))
            // Foods
            .route("/api/featured-foods", web::get().to(api::foods::featured_foods))
            .route("/api/foods", web::get().to(api::foods::list_foods))
            .route("/api/foods", web::post().to(api::foods::create_food))
            .route("/api/foods/availables", web::get().to(api::foods::available_foods))
            // {id} routes MUST come after /availables (catch-all segment)
            .route("/api/foods/{id}", web::get().to(api::foods::get_food))
            .route("/api/foods/{id}", web::patch().to(api::foods::update_food))
            .route("/api/foods/{id}", web::delete().to(api::foods::delete_food))
            // Food requests
            .route("/api/food-req", web::post().to(api::food_requests::create_request))
            .route(
                "/api/food-req/{food_id}",
                web::get().to(api::food_requests::requests_for_food),
            )
            .route(
                "/api/food-req/{id}",
                web::patch().to(api::food_requests::update_request_status),
            )
            .route(
                "/api/food-req/{id}",
                web::delete().to(api::food_requests::delete_request),
            )
            .route("/api/my-requests", web::get().to(api::food_requests::my_requests))
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
