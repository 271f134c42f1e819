use crate::models::NewUser;
use crate::services::{InsertOutcome, UserService};

/// Inserts the sample user through the idempotent insert.
/// Never aborts startup: failures are only logged. Returns whether the
/// sample user is present afterwards.
pub async fn seed_sample_user(service: &UserService) -> bool {
    let sample = NewUser::new("Ravi", "ravi@example.com", "ravi98768");
    let email = sample.email.clone();

    log::info!("🌱 Seeding sample user '{}'...", email);

    match service.insert_user(sample).await {
        Ok(InsertOutcome::Created(_)) => {
            log::info!("   ✅ Sample user inserted");
            true
        }
        Ok(InsertOutcome::AlreadyExists) => {
            log::info!("   📋 Sample user already present — skipping seed");
            true
        }
        Err(e) => {
            log::error!("   ❌ Failed to seed sample user: {}", e);
            false
        }
    }
}
