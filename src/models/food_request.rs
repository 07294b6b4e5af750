use mongodb::bson::{oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

/// Food request document (stored in the `food_request` collection)
///
/// `food_id` is the plain hex string the client sent, not an ObjectId:
/// there is no enforced integrity against the `foods` collection and
/// deleting a food does not cascade here.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FoodRequest {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub id: Option<ObjectId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_email: Option<String>,

    /// Free text by design ("Pending", "Approved", ...); the update endpoint
    /// overwrites it unconditionally, no transition table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Document,
}

/// Wire shape for a food request: `_id` rendered as a hex string
#[derive(Debug, Serialize)]
pub struct FoodRequestResponse {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(flatten)]
    pub extra: Document,
}

impl From<FoodRequest> for FoodRequestResponse {
    fn from(request: FoodRequest) -> Self {
        Self {
            id: request.id.map(|id| id.to_hex()).unwrap_or_default(),
            food_id: request.food_id,
            requester_email: request.requester_email,
            status: request.status,
            extra: request.extra,
        }
    }
}

/// Body for PATCH /api/food-req/{id}
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateRequestStatus {
    pub status: String,
}
