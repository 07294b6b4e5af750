use mongodb::bson::{oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

/// User profile (stored in the `users` collection)
///
/// Only `email` is typed; the rest of the profile is whatever the client
/// sent and round-trips through `extra` untouched. Uniqueness of `email`
/// is enforced by a unique index created at startup.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub id: Option<ObjectId>,

    pub email: String,

    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Document,
}
