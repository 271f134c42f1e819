use super::{MongoDB, StoreInsert, UserStore, USERS_COLLECTION};
use crate::models::User;
use crate::utils::AppError;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{self, doc, Bson};
use mongodb::Collection;

/// `UserStore` backed by the MongoDB `users` collection
pub struct MongoUserStore {
    db: MongoDB,
}

impl MongoUserStore {
    pub fn new(db: MongoDB) -> Self {
        Self { db }
    }

    fn users(&self) -> Collection<User> {
        self.db.collection::<User>(USERS_COLLECTION)
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users().find_one(doc! { "email": email }).await?)
    }

    async fn insert(&self, mut user: User) -> Result<User, AppError> {
        let result = self.users().insert_one(&user).await?;
        user.id = result.inserted_id.as_object_id();
        Ok(user)
    }

    async fn insert_if_absent(&self, mut user: User) -> Result<StoreInsert, AppError> {
        let mut fields = bson::to_document(&user)
            .map_err(|e| AppError::Store(format!("Failed to encode user: {}", e)))?;
        // The upsert assigns `_id` and copies `email` from the filter
        fields.remove("_id");
        fields.remove("email");

        let result = self
            .users()
            .update_one(
                doc! { "email": &user.email },
                doc! { "$setOnInsert": fields },
            )
            .upsert(true)
            .await;

        match result {
            Ok(update) => match update.upserted_id {
                Some(Bson::ObjectId(id)) => {
                    user.id = Some(id);
                    Ok(StoreInsert::Inserted(user))
                }
                Some(_) => Ok(StoreInsert::Inserted(user)),
                None => Ok(StoreInsert::Existing),
            },
            // A concurrent upsert for the same email lost the race on the unique index
            Err(e) if AppError::is_duplicate_key(&e) => Ok(StoreInsert::Existing),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_all(&self) -> Result<Vec<User>, AppError> {
        let cursor = self.users().find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(self.db.ping().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InsertMode;
    use crate::models::NewUser;
    use futures::future::join_all;

    async fn live_store() -> MongoUserStore {
        dotenv::dotenv().ok();

        let uri = std::env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let db = MongoDB::new(&uri, "user_registry_test").await.unwrap();
        db.collection::<User>(USERS_COLLECTION).drop().await.unwrap();
        db.ensure_indexes(InsertMode::Atomic).await.unwrap();
        MongoUserStore::new(db)
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_insert_if_absent_inserts_once() {
        let store = live_store().await;
        let user = User::new(NewUser::new("Ravi", "ravi@example.com", "pw"), "pw".into());

        let first = store.insert_if_absent(user.clone()).await.unwrap();
        let second = store.insert_if_absent(user).await.unwrap();

        assert!(matches!(first, StoreInsert::Inserted(u) if u.id.is_some()));
        assert!(matches!(second, StoreInsert::Existing));
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_unique_index_rejects_plain_duplicate_insert() {
        let store = live_store().await;
        let user = User::new(NewUser::new("Ravi", "ravi@example.com", "pw"), "pw".into());

        store.insert(user.clone()).await.unwrap();
        let err = store.insert(user).await.unwrap_err();

        assert_eq!(err.kind(), "already_exists");
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_concurrent_insert_if_absent_keeps_one_document() {
        let store = live_store().await;

        let attempts = (0..16).map(|i| {
            let user = User::new(
                NewUser::new(format!("Ravi {}", i), "ravi@example.com", "pw"),
                "pw".into(),
            );
            store.insert_if_absent(user)
        });
        let results: Vec<StoreInsert> = join_all(attempts)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        let inserted = results
            .iter()
            .filter(|r| matches!(r, StoreInsert::Inserted(_)))
            .count();
        assert_eq!(inserted, 1);
        assert_eq!(results.len() - inserted, 15);
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }
}
