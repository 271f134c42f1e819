use super::{StoreInsert, UserStore};
use crate::models::User;
use crate::utils::AppError;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::Mutex;

/// In-process `UserStore` for tests
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.users.lock().await.len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, mut user: User) -> Result<User, AppError> {
        user.id = Some(ObjectId::new());
        self.users.lock().await.push(user.clone());
        Ok(user)
    }

    async fn insert_if_absent(&self, mut user: User) -> Result<StoreInsert, AppError> {
        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.email == user.email) {
            return Ok(StoreInsert::Existing);
        }

        user.id = Some(ObjectId::new());
        users.push(user.clone());
        Ok(StoreInsert::Inserted(user))
    }

    async fn find_all(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.lock().await.clone())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
