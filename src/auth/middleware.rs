// Access and role guards for protected routes
//
// The access guard resolves the bearer token to an active user; the role
// guards wrap it with a static allow-list check. Handlers declare the guard
// they need as an extractor, so the role check always runs after
// authentication.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::{debug, warn};

use crate::auth::error::AuthError;
use crate::auth::models::{Role, UserStatus};
use crate::auth::repository::UserRepository;
use crate::AppState;

/// Identity attached to the request once the access guard has run.
/// Downstream code may trust `user_id` as an authenticated, active user.
/// Never carries the password hash.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // A previous guard on the same request already resolved the identity
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(user.clone());
        }

        let token = bearer_token(&parts.headers)?.to_string();
        let claims = state.token_service.validate_access_token(&token)?;

        // The token may outlive the account; re-load and re-check status.
        // This is the single place inactive accounts are shut out.
        let users = UserRepository::new(state.db.clone());
        let user = users.find_by_id(claims.sub).await?.ok_or_else(|| {
            warn!("Token presented for nonexistent user {}", claims.sub);
            AuthError::InvalidToken
        })?;

        if user.status != UserStatus::Active {
            warn!("Inactive account {} attempted access", user.id);
            return Err(AuthError::InactiveAccount);
        }

        let identity = AuthenticatedUser {
            user_id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
        };
        parts.extensions.insert(identity.clone());

        Ok(identity)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    value.strip_prefix("Bearer ").ok_or(AuthError::InvalidToken)
}

/// Role guard allowing business owners and admins
#[derive(Debug, Clone)]
pub struct BusinessAccess(pub AuthenticatedUser);

#[async_trait]
impl FromRequestParts<AppState> for BusinessAccess {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        check_role(&user, &[Role::Business, Role::Admin], "business")?;
        Ok(Self(user))
    }
}

/// Role guard allowing admins only
#[derive(Debug, Clone)]
pub struct AdminAccess(pub AuthenticatedUser);

#[async_trait]
impl FromRequestParts<AppState> for AdminAccess {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        check_role(&user, &[Role::Admin], "admin")?;
        Ok(Self(user))
    }
}

/// Stateless allow-list check, evaluated only on an authenticated identity
fn check_role(
    user: &AuthenticatedUser,
    allowed: &[Role],
    required: &'static str,
) -> Result<(), AuthError> {
    if allowed.contains(&user.role) {
        debug!(
            "Authorization successful: user_id={}, role={}",
            user.user_id, user.role
        );
        Ok(())
    } else {
        warn!(
            "Authorization failed: user_id={}, role={}, required={}",
            user.user_id, user.role, required
        );
        Err(AuthError::InsufficientPermissions {
            required,
            actual: user.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: 1,
            email: "test@example.com".to_string(),
            full_name: "Test User".to_string(),
            role,
        }
    }

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        let headers = headers_with_auth("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_authorization_header() {
        let headers = HeaderMap::new();
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn test_non_bearer_schemes_rejected() {
        for value in ["Basic dXNlcjpwYXNz", "token_without_bearer", "bearer abc"] {
            let headers = headers_with_auth(value);
            assert!(matches!(
                bearer_token(&headers),
                Err(AuthError::InvalidToken)
            ));
        }
    }

    #[test]
    fn test_business_allow_list() {
        assert!(check_role(&identity(Role::Business), &[Role::Business, Role::Admin], "business").is_ok());
        assert!(check_role(&identity(Role::Admin), &[Role::Business, Role::Admin], "business").is_ok());

        let denied = check_role(
            &identity(Role::Customer),
            &[Role::Business, Role::Admin],
            "business",
        );
        assert!(matches!(
            denied,
            Err(AuthError::InsufficientPermissions { actual: Role::Customer, .. })
        ));
    }

    #[test]
    fn test_admin_allow_list() {
        assert!(check_role(&identity(Role::Admin), &[Role::Admin], "admin").is_ok());
        assert!(check_role(&identity(Role::Business), &[Role::Admin], "admin").is_err());
        assert!(check_role(&identity(Role::Customer), &[Role::Admin], "admin").is_err());
    }
}
