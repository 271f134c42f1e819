use actix_web::{web, HttpResponse};
use crate::models::{NewUser, UserPayload, UserView};
use crate::services::{InsertOutcome, UserService};
use crate::utils::{AppError, ErrorPayload};
use serde::Serialize;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserView,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct InsertUserResponse {
    pub message: String,
    /// `created` or `skipped`
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserView>,
}

#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "Users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Missing field or user already exists", body = MessageResponse),
        (status = 500, description = "Store failure", body = ErrorPayload)
    )
)]
pub async fn register(
    service: web::Data<UserService>,
    payload: web::Json<UserPayload>,
) -> HttpResponse {
    let email_str = payload.email.clone().unwrap_or_else(|| "N/A".to_string());
    log::info!("📝 POST /api/users/register - email: {}", email_str);

    let result = match NewUser::try_from(payload.into_inner()) {
        Ok(new_user) => service.insert_user(new_user).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(InsertOutcome::Created(user)) => {
            log::info!("✅ Registration successful: {}", email_str);
            HttpResponse::Created().json(RegisterResponse {
                message: "User registered successfully".to_string(),
                user: user.into(),
            })
        }
        Ok(InsertOutcome::AlreadyExists) | Err(AppError::AlreadyExists(_)) => {
            log::warn!("❌ Registration rejected: {} already exists", email_str);
            HttpResponse::BadRequest().json(MessageResponse {
                message: "User already exists".to_string(),
            })
        }
        Err(AppError::Validation(msg)) => {
            log::warn!("❌ Registration rejected: {}", msg);
            HttpResponse::BadRequest().json(MessageResponse { message: msg })
        }
        Err(e) => {
            log::error!("❌ Error registering user {}: {}", email_str, e);
            HttpResponse::build(e.status_code()).json(serde_json::json!({
                "message": "Error registering user",
                "error": e.payload()
            }))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/users/",
    tag = "Users",
    responses(
        (status = 200, description = "Every stored user", body = Vec<UserView>),
        (status = 500, description = "Store failure", body = ErrorPayload)
    )
)]
pub async fn list_users(service: web::Data<UserService>) -> HttpResponse {
    log::info!("👥 GET /api/users - fetching all users");

    match service.list_users().await {
        Ok(users) => {
            log::info!("✅ Retrieved {} users", users.len());
            let users: Vec<UserView> = users.into_iter().map(UserView::from).collect();
            HttpResponse::Ok().json(users)
        }
        Err(e) => {
            log::error!("❌ Error fetching users: {}", e);
            HttpResponse::build(e.status_code()).json(serde_json::json!({
                "message": "Error fetching users",
                "error": e.payload()
            }))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/insert-user",
    tag = "Users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created", body = InsertUserResponse),
        (status = 200, description = "Email already stored, insertion skipped", body = InsertUserResponse),
        (status = 400, description = "Missing required field", body = MessageResponse),
        (status = 500, description = "Store failure")
    )
)]
pub async fn insert_user(
    service: web::Data<UserService>,
    payload: web::Json<UserPayload>,
) -> HttpResponse {
    log::info!("➕ POST /api/insert-user");

    let new_user = match NewUser::try_from(payload.into_inner()) {
        Ok(new_user) => new_user,
        Err(e) => {
            log::warn!("❌ Insert rejected: {}", e);
            return HttpResponse::BadRequest().json(MessageResponse {
                message: "Name, email, and password are required.".to_string(),
            });
        }
    };

    let name = new_user.name.clone();
    let email = new_user.email.clone();

    match service.insert_user(new_user).await {
        Ok(InsertOutcome::Created(user)) => HttpResponse::Created().json(InsertUserResponse {
            message: format!("User '{}' added successfully!", name),
            outcome: "created".to_string(),
            user: Some(user.into()),
        }),
        Ok(InsertOutcome::AlreadyExists) | Err(AppError::AlreadyExists(_)) => {
            HttpResponse::Ok().json(InsertUserResponse {
                message: format!(
                    "User with email '{}' already exists, skipping insertion.",
                    email
                ),
                outcome: "skipped".to_string(),
                user: None,
            })
        }
        Err(e) => {
            log::error!("❌ Error inserting user {}: {}", email, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to add user",
                "details": e.payload()
            }))
        }
    }
}
