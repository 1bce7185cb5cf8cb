// Authentication data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::businesses::models::Business;

/// Account role controlling route access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Business,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Business => "business",
            Role::Admin => "admin",
        }
    }

    /// Parse a role from its wire representation
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "customer" => Ok(Role::Customer),
            "business" => Ok(Role::Business),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid user type: {}", s)),
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Customer
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Account status; only active accounts may authenticate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User database model
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    #[sqlx(rename = "user_type")]
    pub role: Role,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User response model (never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    #[serde(rename = "user_type")]
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Registration request DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Full name cannot be empty"))]
    pub full_name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    /// Optional role; defaults to customer
    #[serde(default, rename = "user_type")]
    #[schema(example = "business")]
    pub role: Option<String>,
}

/// Login request DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request DTO
#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Profile update request DTO; all fields optional
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Authentication response DTO (register and login)
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
    pub refresh_token: String,
}

/// Rotated token pair returned by the refresh endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenPairResponse {
    pub token: String,
    pub refresh_token: String,
}

/// Profile payload; business owners get their business record attached
/// (null when they have not created one yet)
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub business: Option<Business>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::from_str("customer").unwrap(), Role::Customer);
        assert_eq!(Role::from_str("BUSINESS").unwrap(), Role::Business);
        assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
        assert!(Role::from_str("superuser").is_err());
        assert!(Role::from_str("").is_err());
    }

    #[test]
    fn test_role_defaults_to_customer() {
        assert_eq!(Role::default(), Role::Customer);
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Business).unwrap(), "\"business\"");
        let parsed: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(parsed, Role::Admin);
    }

    #[test]
    fn test_user_response_drops_password_hash() {
        let user = User {
            id: 7,
            full_name: "Ada".to_string(),
            email: "ada@x.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::Business,
            status: UserStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let response: UserResponse = user.into();
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"user_type\":\"business\""));
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_register_request_validation() {
        use validator::Validate;

        let valid: RegisterRequest = serde_json::from_str(
            r#"{"full_name":"Ada","email":"ada@x.com","password":"secret1","user_type":"business"}"#,
        )
        .unwrap();
        assert!(valid.validate().is_ok());
        assert_eq!(valid.role.as_deref(), Some("business"));

        let bad_email: RegisterRequest = serde_json::from_str(
            r#"{"full_name":"Ada","email":"not-an-email","password":"secret1"}"#,
        )
        .unwrap();
        assert!(bad_email.validate().is_err());

        let short_password: RegisterRequest = serde_json::from_str(
            r#"{"full_name":"Ada","email":"ada@x.com","password":"abc"}"#,
        )
        .unwrap();
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_register_request_role_optional() {
        let request: RegisterRequest =
            serde_json::from_str(r#"{"full_name":"Ada","email":"ada@x.com","password":"secret1"}"#)
                .unwrap();
        assert!(request.role.is_none());
    }
}
