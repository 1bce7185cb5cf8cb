// JWT issuance and verification for access and refresh tokens

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::auth::error::AuthError;
use crate::auth::models::Role;
use crate::config::AuthConfig;

/// Access tokens live for one hour
pub const ACCESS_TOKEN_TTL_SECS: i64 = 3600;
/// Refresh tokens live for seven days
pub const REFRESH_TOKEN_TTL_SECS: i64 = 604_800;

/// Claims carried by an access token
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: i32,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Claims carried by a refresh token; identity only
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: i32,
    pub iat: i64,
    pub exp: i64,
}

/// Token service for JWT operations. The two secrets are independent, so a
/// refresh token never validates as an access token.
pub struct TokenService {
    access_secret: String,
    refresh_secret: String,
}

impl TokenService {
    /// Create a TokenService from injected secrets
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_secret: config.access_secret.clone(),
            refresh_secret: config.refresh_secret.clone(),
        }
    }

    /// Generate an access token carrying identity, email and role
    pub fn generate_access_token(
        &self,
        user_id: i32,
        email: &str,
        role: Role,
    ) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            sub: user_id,
            email: email.to_string(),
            role,
            iat: now,
            exp: now + ACCESS_TOKEN_TTL_SECS,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.access_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Generate a refresh token carrying only the user id
    pub fn generate_refresh_token(&self, user_id: i32) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = RefreshClaims {
            sub: user_id,
            iat: now,
            exp: now + REFRESH_TOKEN_TTL_SECS,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.refresh_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Validate an access token
    pub fn validate_access_token(&self, token: &str) -> Result<AccessClaims, AuthError> {
        decode_claims(token, &self.access_secret)
    }

    /// Validate a refresh token
    pub fn validate_refresh_token(&self, token: &str) -> Result<RefreshClaims, AuthError> {
        decode_claims(token, &self.refresh_secret)
    }

    /// Expiry timestamp for a refresh token issued now; used when
    /// registering the token in the store
    pub fn refresh_expires_at(&self) -> DateTime<Utc> {
        Utc::now() + Duration::seconds(REFRESH_TOKEN_TTL_SECS)
    }
}

fn decode_claims<T: DeserializeOwned>(token: &str, secret: &str) -> Result<T, AuthError> {
    decode::<T>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use proptest::prelude::*;

    // Helper to create a test token service
    fn test_token_service() -> TokenService {
        TokenService::new(&AuthConfig {
            access_secret: "test_access_secret_for_testing".to_string(),
            refresh_secret: "test_refresh_secret_for_testing".to_string(),
        })
    }

    #[test]
    fn test_access_token_expiration_is_one_hour() {
        let service = test_token_service();
        let token = service
            .generate_access_token(1, "test@example.com", Role::Customer)
            .unwrap();
        let claims = service.validate_access_token(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_refresh_token_expiration_is_seven_days() {
        let service = test_token_service();
        let token = service.generate_refresh_token(1).unwrap();
        let claims = service.validate_refresh_token(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 604_800);
    }

    #[test]
    fn test_access_claims_roundtrip() {
        let service = test_token_service();
        let token = service
            .generate_access_token(42, "ada@x.com", Role::Business)
            .unwrap();
        let claims = service.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "ada@x.com");
        assert_eq!(claims.role, Role::Business);
    }

    #[test]
    fn test_refresh_claims_carry_identity_only() {
        let service = test_token_service();
        let token = service.generate_refresh_token(42).unwrap();
        let claims = service.validate_refresh_token(&token).unwrap();

        assert_eq!(claims.sub, 42);
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        // Distinct secrets and claim shapes: a refresh token must never
        // pass access validation
        let service = test_token_service();
        let refresh = service.generate_refresh_token(1).unwrap();
        assert!(service.validate_access_token(&refresh).is_err());

        let access = service
            .generate_access_token(1, "test@example.com", Role::Customer)
            .unwrap();
        assert!(service.validate_refresh_token(&access).is_err());
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let service = test_token_service();

        assert!(service.validate_access_token("").is_err());
        assert!(service.validate_access_token("not.a.token").is_err());
        assert!(service.validate_access_token("invalid_token_format").is_err());
        assert!(service
            .validate_access_token("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.invalid.signature")
            .is_err());
    }

    #[test]
    fn test_token_signature_verification() {
        let service1 = TokenService::new(&AuthConfig {
            access_secret: "secret1".to_string(),
            refresh_secret: "refresh1".to_string(),
        });
        let service2 = TokenService::new(&AuthConfig {
            access_secret: "secret2".to_string(),
            refresh_secret: "refresh2".to_string(),
        });

        let token = service1
            .generate_access_token(1, "test@example.com", Role::Customer)
            .unwrap();

        assert!(service1.validate_access_token(&token).is_ok());
        assert!(service2.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        use jsonwebtoken::{encode, EncodingKey, Header};

        let service = test_token_service();
        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            sub: 1,
            email: "test@example.com".to_string(),
            role: Role::Customer,
            iat: now - 4600,
            exp: now - 1000,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test_access_secret_for_testing".as_bytes()),
        )
        .unwrap();

        let result = service.validate_access_token(&token);
        assert!(matches!(result, Err(AuthError::ExpiredToken)));
    }

    proptest! {
        #[test]
        fn prop_access_claims_roundtrip(
            user_id in 1i32..1000000,
            email in "[a-z]{3,10}@[a-z]{3,10}\\.(com|org|net)"
        ) {
            let service = test_token_service();
            let token = service.generate_access_token(user_id, &email, Role::Business).unwrap();
            let claims = service.validate_access_token(&token).unwrap();

            prop_assert_eq!(claims.sub, user_id);
            prop_assert_eq!(claims.email, email);
            prop_assert_eq!(claims.role, Role::Business);
            prop_assert_eq!(claims.exp - claims.iat, ACCESS_TOKEN_TTL_SECS);
        }

        #[test]
        fn prop_refresh_token_expiration(user_id in 1i32..1000000) {
            let service = test_token_service();
            let token = service.generate_refresh_token(user_id).unwrap();
            let claims = service.validate_refresh_token(&token).unwrap();

            prop_assert_eq!(claims.sub, user_id);
            prop_assert_eq!(claims.exp - claims.iat, REFRESH_TOKEN_TTL_SECS);
        }

        #[test]
        fn prop_malformed_tokens_rejected(malformed in "[a-zA-Z0-9]{10,50}") {
            let service = test_token_service();
            prop_assert!(service.validate_access_token(&malformed).is_err());
            prop_assert!(service.validate_refresh_token(&malformed).is_err());
        }
    }
}
