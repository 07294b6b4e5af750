use actix_web::{web, HttpResponse, Responder};
use futures::stream::StreamExt;
use mongodb::bson::{doc, Document};
use serde::Deserialize;

use crate::api::{delete_ack, insert_ack, internal_server_error, parse_object_id};
use crate::database::MongoDB;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{Food, FoodResponse, STATUS_AVAILABLE};

/// How many foods the featured listing returns
const FEATURED_LIMIT: i64 = 6;

#[derive(Debug, Deserialize)]
pub struct FoodListQuery {
    pub email: Option<String>,
}

async fn collect_foods(mut cursor: mongodb::Cursor<Food>) -> Vec<FoodResponse> {
    let mut foods = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(food) => foods.push(FoodResponse::from(food)),
            Err(e) => log::error!("❌ Failed to decode food document: {}", e),
        }
    }
    foods
}

/// GET /api/featured-foods - Top available foods by quantity
#[utoipa::path(
    get,
    path = "/api/featured-foods",
    tag = "Foods",
    responses(
        (status = 200, description = "At most 6 available foods, largest quantity first"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn featured_foods(db: web::Data<MongoDB>) -> impl Responder {
    match db
        .foods()
        .find(doc! { "food_status": STATUS_AVAILABLE })
        .sort(doc! { "food_quantity": -1 })
        .limit(FEATURED_LIMIT)
        .await
    {
        Ok(cursor) => HttpResponse::Ok().json(collect_foods(cursor).await),
        Err(e) => {
            log::error!("❌ GET /api/featured-foods - {}", e);
            internal_server_error()
        }
    }
}

/// GET /api/foods - List foods, optionally filtered by donor email
#[utoipa::path(
    get,
    path = "/api/foods",
    tag = "Foods",
    security(("bearer_auth" = [])),
    params(
        ("email" = Option<String>, Query, description = "Restrict to foods donated by this email")
    ),
    responses(
        (status = 200, description = "Food documents"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn list_foods(
    user: AuthenticatedUser,
    db: web::Data<MongoDB>,
    query: web::Query<FoodListQuery>,
) -> impl Responder {
    log::info!("📋 GET /api/foods - requested by {}", user.email());

    let filter = match &query.email {
        Some(email) => doc! { "donator_email": email },
        None => doc! {},
    };

    match db.foods().find(filter).await {
        Ok(cursor) => HttpResponse::Ok().json(collect_foods(cursor).await),
        Err(e) => {
            log::error!("❌ GET /api/foods - {}", e);
            internal_server_error()
        }
    }
}

/// GET /api/foods/availables - All foods currently marked "Available"
#[utoipa::path(
    get,
    path = "/api/foods/availables",
    tag = "Foods",
    responses(
        (status = 200, description = "Available food documents"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn available_foods(db: web::Data<MongoDB>) -> impl Responder {
    match db
        .foods()
        .find(doc! { "food_status": STATUS_AVAILABLE })
        .await
    {
        Ok(cursor) => HttpResponse::Ok().json(collect_foods(cursor).await),
        Err(e) => {
            log::error!("❌ GET /api/foods/availables - {}", e);
            internal_server_error()
        }
    }
}

/// GET /api/foods/{id} - Fetch one food by id
///
/// A miss answers 200 with a null body; only the PATCH routes report 404.
#[utoipa::path(
    get,
    path = "/api/foods/{id}",
    tag = "Foods",
    params(("id" = String, Path, description = "Food document id")),
    responses(
        (status = 200, description = "The food document, or null when nothing matches"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn get_food(db: web::Data<MongoDB>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();

    let object_id = match parse_object_id("GET /api/foods/{id}", &id) {
        Ok(oid) => oid,
        Err(response) => return response,
    };

    match db.foods().find_one(doc! { "_id": object_id }).await {
        Ok(Some(food)) => HttpResponse::Ok().json(FoodResponse::from(food)),
        Ok(None) => HttpResponse::Ok().json(serde_json::Value::Null),
        Err(e) => {
            log::error!("❌ GET /api/foods/{} - {}", id, e);
            internal_server_error()
        }
    }
}

/// POST /api/foods - Create a food listing
#[utoipa::path(
    post,
    path = "/api/foods",
    tag = "Foods",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Insert acknowledgment with the new id"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn create_food(
    user: AuthenticatedUser,
    db: web::Data<MongoDB>,
    body: web::Json<Food>,
) -> impl Responder {
    log::info!("📝 POST /api/foods - listing from {}", user.email());

    match db.foods().insert_one(body.into_inner()).await {
        Ok(result) => HttpResponse::Ok().json(insert_ack(&result)),
        Err(e) => {
            log::error!("❌ POST /api/foods - {}", e);
            internal_server_error()
        }
    }
}

/// PATCH /api/foods/{id} - Partial update of a food document
#[utoipa::path(
    patch,
    path = "/api/foods/{id}",
    tag = "Foods",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Food document id")),
    request_body = Object,
    responses(
        (status = 200, description = "Fields updated"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "No document matched, or nothing changed"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn update_food(
    user: AuthenticatedUser,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    body: web::Json<Document>,
) -> impl Responder {
    let id = path.into_inner();

    log::info!("✏️ PATCH /api/foods/{} - by {}", id, user.email());

    let object_id = match parse_object_id("PATCH /api/foods/{id}", &id) {
        Ok(oid) => oid,
        Err(response) => return response,
    };

    match db
        .foods()
        .update_one(doc! { "_id": object_id }, doc! { "$set": body.into_inner() })
        .await
    {
        Ok(result) if result.modified_count > 0 => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Food updated successfully"
        })),
        Ok(_) => HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "message": "Food not found or no changes made"
        })),
        Err(e) => {
            log::error!("❌ PATCH /api/foods/{} - {}", id, e);
            internal_server_error()
        }
    }
}

/// DELETE /api/foods/{id} - Delete a food document
#[utoipa::path(
    delete,
    path = "/api/foods/{id}",
    tag = "Foods",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Food document id")),
    responses(
        (status = 200, description = "Delete acknowledgment"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn delete_food(
    user: AuthenticatedUser,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();

    log::info!("🗑️ DELETE /api/foods/{} - by {}", id, user.email());

    let object_id = match parse_object_id("DELETE /api/foods/{id}", &id) {
        Ok(oid) => oid,
        Err(response) => return response,
    };

    match db.foods().delete_one(doc! { "_id": object_id }).await {
        Ok(result) => HttpResponse::Ok().json(delete_ack(&result)),
        Err(e) => {
            log::error!("❌ DELETE /api/foods/{} - {}", id, e);
            internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{test, web, App};
    use async_trait::async_trait;
    use mongodb::bson::oid::ObjectId;

    use crate::database::MongoDB;
    use crate::services::firebase::{TokenClaims, TokenVerifier};
    use crate::utils::error::AppError;

    struct StaticVerifier;

    #[async_trait]
    impl TokenVerifier for StaticVerifier {
        async fn verify(&self, token: &str) -> Result<TokenClaims, AppError> {
            if token == "good-token" {
                Ok(TokenClaims {
                    sub: "uid-1".to_string(),
                    email: Some("donor@example.com".to_string()),
                    exp: 0,
                })
            } else {
                Err(AppError::AuthError("token rejected".to_string()))
            }
        }
    }

    fn verifier_data() -> web::Data<dyn TokenVerifier> {
        web::Data::from(Arc::new(StaticVerifier) as Arc<dyn TokenVerifier>)
    }

    async fn test_db() -> MongoDB {
        dotenv::dotenv().ok();
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        MongoDB::new(&uri, "plate_share_test").await.unwrap()
    }

    #[actix_web::test]
    #[ignore] // Requires MongoDB to be running
    async fn created_food_comes_back_intact() {
        let db = test_db().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .app_data(verifier_data())
                .route("/api/foods", web::post().to(super::create_food))
                .route("/api/foods/{id}", web::get().to(super::get_food)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/foods")
            .insert_header(("Authorization", "Bearer good-token"))
            .set_json(serde_json::json!({
                "food_name": "Vegetable soup",
                "food_quantity": 4,
                "food_status": "Available",
                "donator_email": "donor@example.com"
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 200);
        let ack: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(ack["acknowledged"], true);
        let id = ack["insertedId"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri(&format!("/api/foods/{}", id))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 200);
        let food: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(food["_id"], serde_json::json!(id));
        assert_eq!(food["food_name"], "Vegetable soup");
        assert_eq!(food["donator_email"], "donor@example.com");
    }

    #[actix_web::test]
    #[ignore] // Requires MongoDB to be running
    async fn featured_foods_are_capped_available_and_sorted() {
        let db = test_db().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db.clone()))
                .route(
                    "/api/featured-foods",
                    web::get().to(super::featured_foods),
                ),
        )
        .await;

        // Seed more than the cap; the asserted properties hold regardless of
        // whatever else the collection already contains.
        for quantity in [3, 11, 7, 2, 9, 5, 8, 1] {
            db.foods()
                .insert_one(
                    serde_json::from_value::<crate::models::Food>(serde_json::json!({
                        "food_name": format!("seed-{}", quantity),
                        "food_quantity": quantity,
                        "food_status": "Available"
                    }))
                    .unwrap(),
                )
                .await
                .unwrap();
        }

        let req = test::TestRequest::get().uri("/api/featured-foods").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 200);
        let foods: Vec<serde_json::Value> = test::read_body_json(res).await;

        assert!(foods.len() <= 6);
        let quantities: Vec<i64> = foods
            .iter()
            .map(|food| {
                assert_eq!(food["food_status"], "Available");
                food["food_quantity"].as_i64().unwrap()
            })
            .collect();
        let mut sorted = quantities.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(quantities, sorted);
    }

    #[actix_web::test]
    #[ignore] // Requires MongoDB to be running
    async fn availables_returns_only_available_foods() {
        let db = test_db().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db.clone()))
                .route(
                    "/api/foods/availables",
                    web::get().to(super::available_foods),
                ),
        )
        .await;

        db.foods()
            .insert_one(
                serde_json::from_value::<crate::models::Food>(serde_json::json!({
                    "food_name": "claimed loaf",
                    "food_status": "Donated"
                }))
                .unwrap(),
            )
            .await
            .unwrap();

        let req = test::TestRequest::get()
            .uri("/api/foods/availables")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 200);
        let foods: Vec<serde_json::Value> = test::read_body_json(res).await;

        for food in foods {
            assert_eq!(food["food_status"], "Available");
        }
    }

    #[actix_web::test]
    #[ignore] // Requires MongoDB to be running
    async fn patch_reports_404_on_missing_food_and_persists_on_hit() {
        let db = test_db().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db.clone()))
                .app_data(verifier_data())
                .route("/api/foods", web::post().to(super::create_food))
                .route("/api/foods/{id}", web::get().to(super::get_food))
                .route("/api/foods/{id}", web::patch().to(super::update_food)),
        )
        .await;

        let req = test::TestRequest::patch()
            .uri(&format!("/api/foods/{}", ObjectId::new().to_hex()))
            .insert_header(("Authorization", "Bearer good-token"))
            .set_json(serde_json::json!({ "food_status": "Donated" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 404);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["success"], false);

        let req = test::TestRequest::post()
            .uri("/api/foods")
            .insert_header(("Authorization", "Bearer good-token"))
            .set_json(serde_json::json!({
                "food_name": "Apples",
                "food_status": "Available"
            }))
            .to_request();
        let ack: serde_json::Value =
            test::read_body_json(test::call_service(&app, req).await).await;
        let id = ack["insertedId"].as_str().unwrap().to_string();

        let req = test::TestRequest::patch()
            .uri(&format!("/api/foods/{}", id))
            .insert_header(("Authorization", "Bearer good-token"))
            .set_json(serde_json::json!({ "food_status": "Donated" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 200);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["success"], true);

        let req = test::TestRequest::get()
            .uri(&format!("/api/foods/{}", id))
            .to_request();
        let food: serde_json::Value =
            test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(food["food_status"], "Donated");
    }

    #[actix_web::test]
    #[ignore] // Requires MongoDB to be running
    async fn guarded_routes_reject_missing_authorization_header() {
        let db = test_db().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .app_data(verifier_data())
                .route("/api/foods", web::get().to(super::list_foods))
                .route("/api/foods", web::post().to(super::create_food))
                .route("/api/foods/{id}", web::patch().to(super::update_food))
                .route("/api/foods/{id}", web::delete().to(super::delete_food)),
        )
        .await;

        let id = ObjectId::new().to_hex();
        let requests = vec![
            test::TestRequest::get().uri("/api/foods").to_request(),
            test::TestRequest::post()
                .uri("/api/foods")
                .set_json(serde_json::json!({ "food_name": "Bread" }))
                .to_request(),
            test::TestRequest::patch()
                .uri(&format!("/api/foods/{}", id))
                .set_json(serde_json::json!({ "food_status": "Donated" }))
                .to_request(),
            test::TestRequest::delete()
                .uri(&format!("/api/foods/{}", id))
                .to_request(),
        ];

        for req in requests {
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), 401);
            let body: serde_json::Value = test::read_body_json(res).await;
            assert_eq!(body["message"], "unauthorized");
        }
    }
}
