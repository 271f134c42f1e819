pub mod health;
pub mod sample_data;
pub mod swagger;
pub mod users;

use actix_web::{error::InternalError, web, HttpResponse};

/// Registers every route of the service
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Health check
        .route("/", web::get().to(health::root))
        .route("/health", web::get().to(health::health_check))
        // Users
        .service(
            web::scope("/api/users")
                .route("/register", web::post().to(users::register))
                .route("", web::get().to(users::list_users))
                .route("/", web::get().to(users::list_users))
        )
        .route("/api/insert-user", web::post().to(users::insert_user))
        // Static sample payload
        .route("/api/data", web::get().to(sample_data::get_sample_data));
}

/// JSON body limits and the error body for payloads that fail to parse
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| {
            log::warn!("❌ Malformed JSON payload: {}", err);
            let response = HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Malformed JSON payload",
                "error": err.to_string()
            }));
            InternalError::from_response(err, response).into()
        })
}
