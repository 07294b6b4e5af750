use actix_web::{web, HttpResponse, Responder};
use mongodb::bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};

use crate::api::{insert_ack, internal_server_error};
use crate::database::MongoDB;
use crate::models::User;

const DUPLICATE_KEY: i32 = 11000;

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_err)) if write_err.code == DUPLICATE_KEY
    )
}

/// POST /api/users - Create a user unless the email is already registered
///
/// An existing email answers 200 with a message, not an error: clients call
/// this on every sign-in.
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Insert acknowledgment, or a message when the email already exists"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn create_user(db: web::Data<MongoDB>, body: web::Json<User>) -> impl Responder {
    let new_user = body.into_inner();

    log::info!("📝 POST /api/users - {}", new_user.email);

    match db.users().find_one(doc! { "email": &new_user.email }).await {
        Ok(Some(_)) => {
            return HttpResponse::Ok().json(serde_json::json!({ "message": "User already exists" }));
        }
        Ok(None) => {}
        Err(e) => {
            log::error!("❌ POST /api/users - lookup failed: {}", e);
            return internal_server_error();
        }
    }

    match db.users().insert_one(&new_user).await {
        Ok(result) => HttpResponse::Ok().json(insert_ack(&result)),
        // The unique index on users(email) closes the check-then-insert race;
        // a concurrent duplicate resolves the same way as a lookup hit.
        Err(ref e) if is_duplicate_key(e) => {
            HttpResponse::Ok().json(serde_json::json!({ "message": "User already exists" }))
        }
        Err(e) => {
            log::error!("❌ POST /api/users - insert failed: {}", e);
            internal_server_error()
        }
    }
}
