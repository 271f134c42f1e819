use actix_web::HttpResponse;
use serde::Serialize;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SampleEntry {
    pub id: u32,
    #[schema(value_type = String)]
    pub name: &'static str,
    #[schema(value_type = String)]
    pub email: &'static str,
}

const SAMPLE_DATA: [SampleEntry; 2] = [
    SampleEntry {
        id: 1,
        name: "John Doe",
        email: "john@example.com",
    },
    SampleEntry {
        id: 2,
        name: "Jane Smith",
        email: "jane@example.com",
    },
];

/// Fixed payload, independent of the store
#[utoipa::path(
    get,
    path = "/api/data",
    tag = "Sample",
    responses(
        (status = 200, description = "Static sample entries", body = Vec<SampleEntry>)
    )
)]
pub async fn get_sample_data() -> HttpResponse {
    HttpResponse::Ok().json(SAMPLE_DATA)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InsertMode, PasswordPolicy};
    use crate::database::UnavailableStore;
    use crate::services::UserService;
    use actix_web::{test, web, App};
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_sample_data_ignores_store_state() {
        let service = UserService::new(
            Arc::new(UnavailableStore::new("down")),
            InsertMode::Atomic,
            PasswordPolicy::default(),
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service))
                .configure(crate::api::configure),
        )
        .await;

        for _ in 0..2 {
            let req = test::TestRequest::get().uri("/api/data").to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;

            assert_eq!(
                body,
                json!([
                    { "id": 1, "name": "John Doe", "email": "john@example.com" },
                    { "id": 2, "name": "Jane Smith", "email": "jane@example.com" }
                ])
            );
        }
    }
}
