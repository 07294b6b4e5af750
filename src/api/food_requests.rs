use actix_web::{web, HttpResponse, Responder};
use futures::stream::StreamExt;
use mongodb::bson::doc;
use serde::Deserialize;

use crate::api::{delete_ack, insert_ack, internal_server_error, parse_object_id};
use crate::database::MongoDB;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{FoodRequest, FoodRequestResponse, UpdateRequestStatus};

#[derive(Debug, Deserialize)]
pub struct MyRequestsQuery {
    pub email: Option<String>,
}

async fn collect_requests(mut cursor: mongodb::Cursor<FoodRequest>) -> Vec<FoodRequestResponse> {
    let mut requests = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(request) => requests.push(FoodRequestResponse::from(request)),
            Err(e) => log::error!("❌ Failed to decode food request document: {}", e),
        }
    }
    requests
}

/// GET /api/food-req/{foodId} - All requests made against one food listing
#[utoipa::path(
    get,
    path = "/api/food-req/{food_id}",
    tag = "Food Requests",
    security(("bearer_auth" = [])),
    params(("food_id" = String, Path, description = "Food id the requests reference")),
    responses(
        (status = 200, description = "Request documents"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn requests_for_food(
    user: AuthenticatedUser,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> impl Responder {
    let food_id = path.into_inner();

    log::info!(
        "📋 GET /api/food-req/{} - requested by {}",
        food_id,
        user.email()
    );

    // food_id is matched as the plain string the requester stored, not an
    // ObjectId: there is no enforced integrity against the foods collection.
    match db.food_requests().find(doc! { "food_id": &food_id }).await {
        Ok(cursor) => HttpResponse::Ok().json(collect_requests(cursor).await),
        Err(e) => {
            log::error!("❌ GET /api/food-req/{} - {}", food_id, e);
            internal_server_error()
        }
    }
}

/// POST /api/food-req - Create a food request
#[utoipa::path(
    post,
    path = "/api/food-req",
    tag = "Food Requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Insert acknowledgment with the new id"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn create_request(
    user: AuthenticatedUser,
    db: web::Data<MongoDB>,
    body: web::Json<FoodRequest>,
) -> impl Responder {
    log::info!("📝 POST /api/food-req - request from {}", user.email());

    match db.food_requests().insert_one(body.into_inner()).await {
        Ok(result) => HttpResponse::Ok().json(insert_ack(&result)),
        Err(e) => {
            log::error!("❌ POST /api/food-req - {}", e);
            internal_server_error()
        }
    }
}

/// PATCH /api/food-req/{id} - Overwrite the request status
///
/// The status is free text and the overwrite is unconditional; there is no
/// transition table, so "Approved" back to "Pending" is permitted.
#[utoipa::path(
    patch,
    path = "/api/food-req/{id}",
    tag = "Food Requests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Request document id")),
    responses(
        (status = 200, description = "Status updated"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "No request matched"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn update_request_status(
    user: AuthenticatedUser,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    body: web::Json<UpdateRequestStatus>,
) -> impl Responder {
    let id = path.into_inner();
    let status = body.into_inner().status;

    log::info!(
        "✏️ PATCH /api/food-req/{} - \"{}\" by {}",
        id,
        status,
        user.email()
    );

    let object_id = match parse_object_id("PATCH /api/food-req/{id}", &id) {
        Ok(oid) => oid,
        Err(response) => return response,
    };

    match db
        .food_requests()
        .update_one(doc! { "_id": object_id }, doc! { "$set": { "status": &status } })
        .await
    {
        Ok(result) if result.modified_count > 0 => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": format!("Request {}", status)
        })),
        Ok(_) => HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "message": "Request not found"
        })),
        Err(e) => {
            log::error!("❌ PATCH /api/food-req/{} - {}", id, e);
            internal_server_error()
        }
    }
}

/// DELETE /api/food-req/{id} - Delete a food request
#[utoipa::path(
    delete,
    path = "/api/food-req/{id}",
    tag = "Food Requests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Request document id")),
    responses(
        (status = 200, description = "Delete acknowledgment"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn delete_request(
    user: AuthenticatedUser,
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();

    log::info!("🗑️ DELETE /api/food-req/{} - by {}", id, user.email());

    let object_id = match parse_object_id("DELETE /api/food-req/{id}", &id) {
        Ok(oid) => oid,
        Err(response) => return response,
    };

    match db.food_requests().delete_one(doc! { "_id": object_id }).await {
        Ok(result) => HttpResponse::Ok().json(delete_ack(&result)),
        Err(e) => {
            log::error!("❌ DELETE /api/food-req/{} - {}", id, e);
            internal_server_error()
        }
    }
}

/// GET /api/my-requests - Requests created by the given requester email
#[utoipa::path(
    get,
    path = "/api/my-requests",
    tag = "Food Requests",
    security(("bearer_auth" = [])),
    params(
        ("email" = Option<String>, Query, description = "Requester email, required")
    ),
    responses(
        (status = 200, description = "Request documents for the requester"),
        (status = 400, description = "Email query parameter absent"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn my_requests(
    user: AuthenticatedUser,
    db: web::Data<MongoDB>,
    query: web::Query<MyRequestsQuery>,
) -> impl Responder {
    let Some(email) = &query.email else {
        return HttpResponse::BadRequest().json(serde_json::json!({ "message": "Email is required" }));
    };

    log::info!(
        "📋 GET /api/my-requests - {} requested by {}",
        email,
        user.email()
    );

    match db
        .food_requests()
        .find(doc! { "requester_email": email })
        .await
    {
        Ok(cursor) => HttpResponse::Ok().json(collect_requests(cursor).await),
        Err(e) => {
            log::error!("❌ GET /api/my-requests - {}", e);
            internal_server_error()
        }
    }
}
