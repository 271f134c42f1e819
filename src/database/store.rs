use crate::models::User;
use crate::utils::AppError;
use async_trait::async_trait;

/// Result of a conditional insert at the store level
#[derive(Debug, Clone)]
pub enum StoreInsert {
    Inserted(User),
    Existing,
}

/// Capability interface over the users collection
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Unconditional insert; returns the document with its assigned id
    async fn insert(&self, user: User) -> Result<User, AppError>;

    /// Inserts only when no document has `user.email`, as one store operation
    async fn insert_if_absent(&self, user: User) -> Result<StoreInsert, AppError>;

    async fn find_all(&self) -> Result<Vec<User>, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

/// Stand-in used when no store connection could be built at startup
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> AppError {
        AppError::StoreUnavailable(self.reason.clone())
    }
}

#[async_trait]
impl UserStore for UnavailableStore {
    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, AppError> {
        Err(self.error())
    }

    async fn insert(&self, _user: User) -> Result<User, AppError> {
        Err(self.error())
    }

    async fn insert_if_absent(&self, _user: User) -> Result<StoreInsert, AppError> {
        Err(self.error())
    }

    async fn find_all(&self) -> Result<Vec<User>, AppError> {
        Err(self.error())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(self.error())
    }
}
