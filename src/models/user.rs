use crate::utils::AppError;
use chrono::{DateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Stored document in the `users` collection
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub password: String,
    // Absent on documents written without schema timestamping
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<BsonDateTime>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<BsonDateTime>,
}

impl User {
    pub fn new(new_user: NewUser, password: String) -> Self {
        let now = BsonDateTime::now();

        Self {
            id: None,
            name: new_user.name,
            email: new_user.email,
            password,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

/// Request body accepted by both insert endpoints.
/// Fields stay optional so presence can be reported per field.
#[derive(Debug, Deserialize, Default, utoipa::ToSchema)]
pub struct UserPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Payload that passed the required-field check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

impl TryFrom<UserPayload> for NewUser {
    type Error = AppError;

    fn try_from(payload: UserPayload) -> Result<Self, Self::Error> {
        let name = payload.name.filter(|v| !v.is_empty());
        let email = payload.email.filter(|v| !v.is_empty());
        let password = payload.password.filter(|v| !v.is_empty());

        let missing: Vec<&str> = [
            ("name", name.is_none()),
            ("email", email.is_none()),
            ("password", password.is_none()),
        ]
        .iter()
        .filter(|(_, is_missing)| *is_missing)
        .map(|(field, _)| *field)
        .collect();

        match (name, email, password) {
            (Some(name), Some(email), Some(password)) => Ok(NewUser { name, email, password }),
            _ => Err(AppError::Validation(format!(
                "User validation failed: {} {} required",
                missing.join(", "),
                if missing.len() == 1 { "is" } else { "are" }
            ))),
        }
    }
}

/// Public representation of a user. Never carries the password.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, utoipa::ToSchema)]
pub struct UserView {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "createdAt")]
    #[schema(value_type = Option<String>)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt")]
    #[schema(value_type = Option<String>)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: user.name,
            email: user.email,
            created_at: user.created_at.and_then(to_chrono),
            updated_at: user.updated_at.and_then(to_chrono),
        }
    }
}

fn to_chrono(date: BsonDateTime) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(date.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, doc};

    fn payload(name: Option<&str>, email: Option<&str>, password: Option<&str>) -> UserPayload {
        UserPayload {
            name: name.map(String::from),
            email: email.map(String::from),
            password: password.map(String::from),
        }
    }

    #[test]
    fn test_complete_payload_is_accepted() {
        let user = NewUser::try_from(payload(
            Some("Ravi"),
            Some("ravi@example.com"),
            Some("ravi98768"),
        ))
        .unwrap();

        assert_eq!(user, NewUser::new("Ravi", "ravi@example.com", "ravi98768"));
    }

    #[test]
    fn test_missing_field_is_named() {
        let err = NewUser::try_from(payload(Some("Ravi"), None, Some("pw"))).unwrap_err();
        assert_eq!(
            err,
            AppError::Validation("User validation failed: email is required".into())
        );
    }

    #[test]
    fn test_empty_strings_count_as_missing() {
        let err = NewUser::try_from(payload(Some(""), Some("a@b.c"), Some(""))).unwrap_err();
        assert_eq!(
            err,
            AppError::Validation("User validation failed: name, password are required".into())
        );
    }

    #[test]
    fn test_payload_deserializes_with_absent_fields() {
        let parsed: UserPayload = serde_json::from_str(r#"{"name":"Ravi"}"#).unwrap();
        assert_eq!(parsed.name.as_deref(), Some("Ravi"));
        assert!(parsed.email.is_none());
        assert!(parsed.password.is_none());
    }

    #[test]
    fn test_view_omits_password() {
        let mut user = User::new(NewUser::new("Ravi", "ravi@example.com", "secret"), "secret".into());
        user.id = Some(ObjectId::new());

        let json = serde_json::to_value(UserView::from(user.clone())).unwrap();

        assert_eq!(json["_id"], user.id.unwrap().to_hex());
        assert_eq!(json["name"], "Ravi");
        assert_eq!(json["email"], "ravi@example.com");
        assert!(json["createdAt"].is_string());
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_document_without_timestamps_is_readable() {
        let id = ObjectId::new();
        let document = doc! {
            "_id": id,
            "name": "Ravi",
            "email": "ravi@example.com",
            "password": "ravi98768",
            "__v": 0,
        };

        let user: User = bson::from_document(document).unwrap();
        assert_eq!(user.id, Some(id));
        assert!(user.created_at.is_none());
        assert!(user.updated_at.is_none());

        let view = UserView::from(user);
        assert_eq!(view.email, "ravi@example.com");
        assert!(view.created_at.is_none());

        let json = serde_json::to_value(view).unwrap();
        assert!(json["createdAt"].is_null());
    }

    #[test]
    fn test_new_user_round_trips_through_bson() {
        let user = User::new(NewUser::new("Ravi", "ravi@example.com", "pw"), "pw".into());

        let document = bson::to_document(&user).unwrap();
        assert!(document.get_datetime("createdAt").is_ok());
        assert!(!document.contains_key("_id"));

        let decoded: User = bson::from_document(document).unwrap();
        assert_eq!(decoded.created_at, user.created_at);
    }
}
