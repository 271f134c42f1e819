use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Registry Service API",
        version = "1.0.0",
        description = "Create and list user records backed by MongoDB.\n\n**Inserts are idempotent by email:** a second insert for a stored email performs no write."
    ),
    paths(
        // Health
        crate::api::health::root,
        crate::api::health::health_check,

        // Users
        crate::api::users::register,
        crate::api::users::list_users,
        crate::api::users::insert_user,

        // Sample
        crate::api::sample_data::get_sample_data,
    ),
    components(
        schemas(
            crate::models::UserPayload,
            crate::models::UserView,
            crate::api::users::MessageResponse,
            crate::api::users::RegisterResponse,
            crate::api::users::InsertUserResponse,
            crate::api::health::HealthResponse,
            crate::api::sample_data::SampleEntry,
            crate::utils::ErrorPayload,
        )
    ),
    tags(
        (name = "Users", description = "Idempotent user registration and listing."),
        (name = "Health", description = "Liveness text and store health."),
        (name = "Sample", description = "Static sample payload."),
    )
)]
pub struct ApiDoc;
