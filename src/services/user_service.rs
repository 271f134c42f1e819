use crate::{
    config::{InsertMode, PasswordPolicy},
    database::{StoreInsert, UserStore},
    models::{NewUser, User},
    utils::AppError,
};
use std::sync::Arc;

/// Logical result of an insert attempt
#[derive(Debug, Clone)]
pub enum InsertOutcome {
    Created(User),
    AlreadyExists,
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    mode: InsertMode,
    passwords: PasswordPolicy,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, mode: InsertMode, passwords: PasswordPolicy) -> Self {
        Self {
            store,
            mode,
            passwords,
        }
    }

    /// Inserts `new_user` unless a user with the same email is already stored.
    /// Performs at most one write and never retries.
    pub async fn insert_user(&self, new_user: NewUser) -> Result<InsertOutcome, AppError> {
        let email = new_user.email.clone();

        let outcome = match self.mode {
            InsertMode::CheckThenInsert => {
                let existing = self.store.find_by_email(&email).await?;
                log::debug!("🔍 Existing user for '{}': {}", email, existing.is_some());

                if existing.is_some() {
                    InsertOutcome::AlreadyExists
                } else {
                    let user = self.build_user(new_user).await?;
                    InsertOutcome::Created(self.store.insert(user).await?)
                }
            }
            InsertMode::Atomic => {
                // Cheap lookup first so duplicates skip the bcrypt hash;
                // the conditional upsert remains the uniqueness guard.
                if self.store.find_by_email(&email).await?.is_some() {
                    InsertOutcome::AlreadyExists
                } else {
                    let user = self.build_user(new_user).await?;
                    match self.store.insert_if_absent(user).await? {
                        StoreInsert::Inserted(user) => InsertOutcome::Created(user),
                        StoreInsert::Existing => InsertOutcome::AlreadyExists,
                    }
                }
            }
        };

        match &outcome {
            InsertOutcome::Created(user) => {
                log::info!("✅ New user '{}' inserted with email '{}'", user.name, user.email)
            }
            InsertOutcome::AlreadyExists => {
                log::warn!("⚠️  User with email '{}' already exists, skipping insertion", email)
            }
        }

        Ok(outcome)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.store.find_all().await
    }

    pub async fn store_reachable(&self) -> bool {
        self.store.ping().await.is_ok()
    }

    async fn build_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let password = if self.passwords.hash {
            hash_password(new_user.password.clone(), self.passwords.bcrypt_cost).await?
        } else {
            new_user.password.clone()
        };

        Ok(User::new(new_user, password))
    }
}

/// bcrypt is CPU-bound, so it runs on the blocking pool
async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Store(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| AppError::Store(format!("Failed to hash password: {}", e)))
}
