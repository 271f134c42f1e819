pub mod store;
pub mod user_store;

#[cfg(test)]
pub mod memory;

pub use store::*;
pub use user_store::*;

use crate::config::InsertMode;
use mongodb::{Client, Collection, Database};
use std::error::Error;
use std::time::Duration;

pub const USERS_COLLECTION: &str = "users";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    /// Builds the client without contacting the server.
    /// Fails only when the connection string itself is invalid.
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(Duration::from_secs(300));

        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        Ok(Self {
            db: client.database(db_name),
        })
    }

    /// Round-trips to the server to confirm it is reachable
    pub async fn ping(&self) -> Result<(), mongodb::error::Error> {
        use mongodb::bson::doc;

        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    /// Creates the `users(email)` index. Unique in atomic mode so the
    /// store rejects a second document for the same email.
    pub async fn ensure_indexes(&self, mode: InsertMode) -> Result<(), mongodb::error::Error> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let users = self.collection::<mongodb::bson::Document>(USERS_COLLECTION);

        let unique = mode == InsertMode::Atomic;
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(unique).build())
            .build();

        users.create_index(email_index).await?;
        log::info!(
            "   ✅ Index ready: users(email){}",
            if unique { " [unique]" } else { "" }
        );

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_uri_is_rejected_without_network() {
        let result = MongoDB::new("not-a-mongodb-uri", "test").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        dotenv::dotenv().ok();

        let uri = std::env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let db = MongoDB::new(&uri, "user_registry_test").await.unwrap();

        assert!(db.ping().await.is_ok());
        assert!(db.ensure_indexes(InsertMode::Atomic).await.is_ok());
    }
}
