use mongodb::bson::{oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

/// Status string a food must carry to show up in the public listings
pub const STATUS_AVAILABLE: &str = "Available";

/// Food listing document (stored in the `foods` collection)
///
/// The collection is schema-flexible: only the fields the server filters on
/// are typed, everything else (name, image, `food_quantity`, pickup
/// location, ...) flattens into `extra`. Sorting on `food_quantity` is done
/// by the store, so the app never types it.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Food {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub id: Option<ObjectId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub donator_email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_status: Option<String>,

    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Document,
}

/// Wire shape for a food document: `_id` rendered as a hex string
#[derive(Debug, Serialize)]
pub struct FoodResponse {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub donator_email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_status: Option<String>,

    #[serde(flatten)]
    pub extra: Document,
}

impl From<Food> for FoodResponse {
    fn from(food: Food) -> Self {
        Self {
            id: food.id.map(|id| id.to_hex()).unwrap_or_default(),
            donator_email: food.donator_email,
            food_status: food.food_status,
            extra: food.extra,
        }
    }
}
