pub mod food_requests;
pub mod foods;
pub mod health;
pub mod swagger;
pub mod users;

use actix_web::HttpResponse;
use mongodb::bson::oid::ObjectId;
use mongodb::results::{DeleteResult, InsertOneResult};

/// Uniform failure shape: unexpected store errors surface as a generic 500,
/// the cause stays in the server log.
pub(crate) fn internal_server_error() -> HttpResponse {
    HttpResponse::InternalServerError()
        .json(serde_json::json!({ "message": "Internal Server Error" }))
}

/// Parses a path id, sending malformed values down the generic failure
/// path: the wire contract only distinguishes 400 (missing query param),
/// 401 and 404, never an invalid-id shape.
pub(crate) fn parse_object_id(route: &str, id: &str) -> Result<ObjectId, HttpResponse> {
    ObjectId::parse_str(id).map_err(|e| {
        log::error!("❌ {} - invalid id {:?}: {}", route, id, e);
        internal_server_error()
    })
}

pub(crate) fn insert_ack(result: &InsertOneResult) -> serde_json::Value {
    let inserted_id = result
        .inserted_id
        .as_object_id()
        .map(|id| id.to_hex())
        .unwrap_or_else(|| result.inserted_id.to_string());
    serde_json::json!({ "acknowledged": true, "insertedId": inserted_id })
}

pub(crate) fn delete_ack(result: &DeleteResult) -> serde_json::Value {
    serde_json::json!({ "acknowledged": true, "deletedCount": result.deleted_count })
}
