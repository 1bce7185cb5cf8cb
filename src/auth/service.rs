// Authentication service - business logic layer

use std::sync::Arc;

use tracing::info;
use validator::Validate;

use crate::auth::{
    error::AuthError,
    models::{AuthResponse, RegisterRequest, Role, TokenPairResponse, UpdateProfileRequest, User, UserStatus},
    password::PasswordService,
    repository::{RefreshTokenStore, UserRepository},
    token::TokenService,
};

/// Authentication service coordinating registration, login, token rotation
/// and account maintenance
pub struct AuthService {
    users: UserRepository,
    refresh_tokens: RefreshTokenStore,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(
        users: UserRepository,
        refresh_tokens: RefreshTokenStore,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            tokens,
        }
    }

    /// Register a new user and log them in
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        request
            .validate()
            .map_err(|e| AuthError::ValidationError(e.to_string()))?;

        let role = match request.role.as_deref() {
            Some(raw) => Role::from_str(raw).map_err(AuthError::ValidationError)?,
            None => Role::default(),
        };

        if self.users.email_exists(&request.email).await? {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = PasswordService::hash_password(&request.password)?;
        let user = self
            .users
            .create_user(&request.full_name, &request.email, &password_hash, role)
            .await?;

        let (token, refresh_token) = self.issue_pair(&user).await?;
        info!("Registered user {} with role {}", user.id, user.role);

        Ok(AuthResponse {
            user: user.into(),
            token,
            refresh_token,
        })
    }

    /// Authenticate by email and password.
    /// Unknown email and wrong password collapse into the same error; the
    /// inactive check only runs once the credentials are correct.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !PasswordService::verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        if user.status != UserStatus::Active {
            return Err(AuthError::InactiveAccount);
        }

        let (token, refresh_token) = self.issue_pair(&user).await?;
        info!("User {} logged in", user.id);

        Ok(AuthResponse {
            user: user.into(),
            token,
            refresh_token,
        })
    }

    /// Rotate a refresh token into a fresh pair.
    /// The presented token must carry a valid signature AND still be present
    /// in the registry; rotation removes it, so replaying an old token fails.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPairResponse, AuthError> {
        let claims = self.tokens.validate_refresh_token(refresh_token)?;

        self.refresh_tokens
            .verify(refresh_token)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.refresh_tokens.invalidate(refresh_token).await?;
        self.refresh_tokens.purge_expired().await?;

        let (token, refresh_token) = self.issue_pair(&user).await?;

        Ok(TokenPairResponse {
            token,
            refresh_token,
        })
    }

    /// Partially update the caller's profile; a supplied password is
    /// re-hashed, and a changed email is re-checked for uniqueness
    pub async fn update_profile(
        &self,
        user_id: i32,
        patch: UpdateProfileRequest,
    ) -> Result<crate::auth::models::UserResponse, AuthError> {
        if let Some(email) = &patch.email {
            if self.users.email_taken_by_other(email, user_id).await? {
                return Err(AuthError::EmailAlreadyExists);
            }
        }

        let password_hash = match patch.password.as_deref() {
            Some(password) => {
                if password.len() < 6 {
                    return Err(AuthError::ValidationError(
                        "Password must be at least 6 characters".to_string(),
                    ));
                }
                Some(PasswordService::hash_password(password)?)
            }
            None => None,
        };

        let user = self
            .users
            .update_user(user_id, patch.full_name, patch.email, password_hash)
            .await?;
        info!("User {} updated their profile", user_id);

        Ok(user.into())
    }

    /// Hard-delete the caller's account; owned businesses and their products
    /// cascade in the schema
    pub async fn delete_account(&self, user_id: i32) -> Result<(), AuthError> {
        let deleted = self.users.delete_user(user_id).await?;
        if deleted == 0 {
            return Err(AuthError::UserNotFound);
        }

        info!("User {} deleted their account", user_id);
        Ok(())
    }

    async fn issue_pair(&self, user: &User) -> Result<(String, String), AuthError> {
        let token = self
            .tokens
            .generate_access_token(user.id, &user.email, user.role)?;
        let refresh_token = self.tokens.generate_refresh_token(user.id)?;

        self.refresh_tokens
            .store(user.id, &refresh_token, self.tokens.refresh_expires_at())
            .await?;

        Ok((token, refresh_token))
    }
}
