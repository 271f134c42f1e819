mod api;
mod config;
mod database;
mod middleware;
mod models;
mod seeds;
mod services;
mod utils;

use actix_web::{middleware::{Condition, Logger}, web, App, HttpServer};
use config::{redact_uri, Config};
use database::{MongoDB, MongoUserStore, UnavailableStore, UserStore};
use dotenv::dotenv;
use services::UserService;
use std::io;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let security_headers = middleware::SecurityHeaders::new(&config.security_headers)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("CONTENT_SECURITY_POLICY: {}", e)))?;

    log::info!("🚀 Starting User Registry Service...");
    log::info!("🔐 Insert mode: {}", config.insert_mode);
    if !config.passwords.hash {
        log::warn!("⚠️  HASH_PASSWORDS=false — passwords are stored as plain text");
    }

    let (store, connected) = connect_store(&config).await;
    let service = UserService::new(store, config.insert_mode, config.passwords.clone());

    if config.seed_sample_user {
        if connected {
            if !seeds::sample_user_seed::seed_sample_user(&service).await {
                log::warn!("⚠️  Sample user is not available; continuing without it");
            }
        } else {
            log::warn!("⚠️  Skipping sample user seed: store is not reachable");
        }
    }

    let service_data = web::Data::new(service);
    let cors_origins = config.cors_origins.clone();
    let headers_enabled = config.security_headers.enabled;

    log::info!("🌐 Server starting on {}:{}", config.host, config.port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", config.host, config.port);

    HttpServer::new(move || {
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(service_data.clone())
            .app_data(api::json_config())
            .wrap(middleware::cors_policy(&cors_origins))
            .wrap(Condition::new(headers_enabled, security_headers.clone()))
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi)
            )
            .configure(api::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

/// Opens the store. A missing or unreachable database is logged and the
/// server still starts; user endpoints then answer with store errors.
async fn connect_store(config: &Config) -> (Arc<dyn UserStore>, bool) {
    let Some(uri) = config.mongo_uri.as_deref() else {
        log::error!("❌ MONGO_URI is not set — user endpoints will fail until it is configured");
        return (Arc::new(UnavailableStore::new("MONGO_URI is not set")), false);
    };

    log::info!("📊 MongoDB URI: {}", redact_uri(uri));

    let db = match MongoDB::new(uri, &config.database_name).await {
        Ok(db) => db,
        Err(e) => {
            log::error!("❌ Invalid MongoDB connection string: {}", e);
            let reason = format!("Invalid MongoDB connection string: {}", e);
            return (Arc::new(UnavailableStore::new(reason)), false);
        }
    };

    let connected = match db.ping().await {
        Ok(()) => {
            log::info!("✅ MongoDB connected: {}", config.database_name);
            if let Err(e) = db.ensure_indexes(config.insert_mode).await {
                log::warn!("⚠️  Could not create users(email) index: {}", e);
            }
            true
        }
        Err(e) => {
            log::error!("❌ MongoDB Connection Error: {}", e);
            false
        }
    };

    (Arc::new(MongoUserStore::new(db)), connected)
}
