use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};

use crate::models::{Food, FoodRequest, User};
use crate::utils::error::AppError;

pub const USERS: &str = "users";
pub const FOODS: &str = "foods";
pub const FOOD_REQUESTS: &str = "food_request";

/// Long-lived MongoDB handle, created once at startup and injected into
/// every handler via `web::Data`.
#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, AppError> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));
        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the indexes the service relies on
    async fn ensure_indexes(&self) -> Result<(), AppError> {
        log::info!("🔧 Creating database indexes...");

        // users(email) unique: the create-user check-then-insert alone can
        // race, so uniqueness lives at the store level.
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match self.users().create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email) unique"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // foods(food_status, food_quantity): featured and availables queries
        let foods_index = IndexModel::builder()
            .keys(doc! { "food_status": 1, "food_quantity": -1 })
            .build();

        match self.foods().create_index(foods_index).await {
            Ok(_) => log::info!("   ✅ Index created: foods(food_status, food_quantity)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // food_request(food_id): requests listed per food
        let food_id_index = IndexModel::builder().keys(doc! { "food_id": 1 }).build();

        match self.food_requests().create_index(food_id_index).await {
            Ok(_) => log::info!("   ✅ Index created: food_request(food_id)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // food_request(requester_email): my-requests queries
        let requester_index = IndexModel::builder()
            .keys(doc! { "requester_email": 1 })
            .build();

        match self.food_requests().create_index(requester_index).await {
            Ok(_) => log::info!("   ✅ Index created: food_request(requester_email)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn users(&self) -> Collection<User> {
        self.db.collection(USERS)
    }

    pub fn foods(&self) -> Collection<Food> {
        self.db.collection(FOODS)
    }

    pub fn food_requests(&self) -> Collection<FoodRequest> {
        self.db.collection(FOOD_REQUESTS)
    }

    /// Check if the connection is healthy
    pub async fn health_check(&self) -> Result<bool, AppError> {
        self.db.list_collection_names().await?;
        Ok(true)
    }
}
