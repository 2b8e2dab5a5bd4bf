//! Authentication service
//!
//! Registration, login, session issuance and revocation, plus the
//! superadmin-gated user management operations.

use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{
    AccountStatus, AuthSession, AuthTokensResponse, RegisterRequest, User, UserRole,
};

use super::jwt::{generate_access_token, generate_refresh_token, verify_token, JwtError};

/// Auth service errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Email is already registered")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is suspended")]
    AccountSuspended,

    #[error("Cannot self-register with that role")]
    RoleNotAllowed,

    #[error("User not found")]
    UserNotFound,

    #[error("Session not found or revoked")]
    SessionNotFound,

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

impl From<sqlx::Error> for AuthError {
    fn from(e: sqlx::Error) -> Self {
        AuthError::DatabaseError(e.to_string())
    }
}

impl From<JwtError> for AuthError {
    fn from(e: JwtError) -> Self {
        AuthError::TokenError(e.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::EmailTaken => ApiError::Conflict(e.to_string()),
            AuthError::InvalidCredentials => ApiError::Unauthorized(e.to_string()),
            AuthError::AccountSuspended => ApiError::Forbidden(e.to_string()),
            AuthError::RoleNotAllowed => ApiError::ValidationError(e.to_string()),
            AuthError::UserNotFound => ApiError::NotFound(e.to_string()),
            AuthError::SessionNotFound
            | AuthError::InvalidRefreshToken
            | AuthError::TokenError(_) => ApiError::Unauthorized(e.to_string()),
            AuthError::DatabaseError(msg) => ApiError::DatabaseError(msg),
            AuthError::HashingFailed(msg) => ApiError::InternalError(msg),
        }
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db_pool: PgPool,
    jwt_secret: String,
    access_token_ttl_seconds: i64,
    refresh_token_ttl_days: i64,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        db_pool: PgPool,
        jwt_secret: String,
        access_token_ttl_seconds: i64,
        refresh_token_ttl_days: i64,
    ) -> Self {
        Self {
            db_pool,
            jwt_secret,
            access_token_ttl_seconds,
            refresh_token_ttl_days,
        }
    }

    /// Self-registration. A `public` account starts active; an `admin`
    /// account starts pending until a superadmin approves it; the
    /// `superadmin` role cannot be self-assigned.
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthTokensResponse, AuthError> {
        let status = match req.role {
            UserRole::Public => AccountStatus::Active,
            UserRole::Admin => AccountStatus::Pending,
            UserRole::SuperAdmin => return Err(AuthError::RoleNotAllowed),
        };

        let password_hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AuthError::HashingFailed(e.to_string()))?;

        let user_id = Uuid::new_v4();
        let now = Utc::now();

        let insert = sqlx::query(
            r#"
            INSERT INTO users (id, email, name, password_hash, role, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user_id)
        .bind(req.email.to_lowercase())
        .bind(&req.name)
        .bind(&password_hash)
        .bind(req.role)
        .bind(status)
        .bind(now)
        .bind(now)
        .execute(&self.db_pool)
        .await;

        if let Err(e) = insert {
            if e.as_database_error()
                .map(|d| d.is_unique_violation())
                .unwrap_or(false)
            {
                return Err(AuthError::EmailTaken);
            }
            return Err(e.into());
        }

        let user = self.get_user_by_id(user_id).await?;
        tracing::info!(user_id = %user.id, role = %user.role.as_str(), "User registered");

        self.issue_tokens(&user).await
    }

    /// Login with email and password
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthTokensResponse, AuthError> {
        let user: User = sqlx::query_as(
            r#"
            SELECT id, email, name, password_hash, role, status, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.to_lowercase())
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

        let valid = bcrypt::verify(password, &user.password_hash)
            .map_err(|e| AuthError::HashingFailed(e.to_string()))?;
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        if user.status == AccountStatus::Suspended {
            return Err(AuthError::AccountSuspended);
        }

        self.issue_tokens(&user).await
    }

    /// Issue an access/refresh token pair and record the session
    async fn issue_tokens(&self, user: &User) -> Result<AuthTokensResponse, AuthError> {
        let jti = Uuid::new_v4().to_string();
        let access_token =
            generate_access_token(user, &jti, &self.jwt_secret, self.access_token_ttl_seconds)?;

        let refresh_jti = Uuid::new_v4().to_string();
        let refresh_token = generate_refresh_token(
            user,
            &refresh_jti,
            &self.jwt_secret,
            self.refresh_token_ttl_days,
        )?;

        let refresh_token_hash = hash_token(&refresh_token);
        let session_expires_at = Utc::now() + Duration::days(self.refresh_token_ttl_days);

        sqlx::query(
            r#"
            INSERT INTO auth_sessions (id, user_id, jti, refresh_token_hash, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.id)
        .bind(&jti)
        .bind(&refresh_token_hash)
        .bind(session_expires_at)
        .execute(&self.db_pool)
        .await?;

        Ok(AuthTokensResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_ttl_seconds,
            user: user.clone().into(),
        })
    }

    /// Refresh tokens using a valid refresh token
    pub async fn refresh_tokens(
        &self,
        refresh_token: &str,
    ) -> Result<AuthTokensResponse, AuthError> {
        let claims = verify_token(refresh_token, &self.jwt_secret)?;

        if claims.token_type != "refresh" {
            return Err(AuthError::InvalidRefreshToken);
        }

        let refresh_token_hash = hash_token(refresh_token);

        let session: AuthSession = sqlx::query_as(
            r#"
            SELECT id, user_id, jti, refresh_token_hash, expires_at, revoked, revoked_at,
                   created_at, updated_at
            FROM auth_sessions
            WHERE refresh_token_hash = $1 AND revoked = FALSE AND expires_at > NOW()
            "#,
        )
        .bind(&refresh_token_hash)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(AuthError::SessionNotFound)?;

        let user = self.get_user_by_id(session.user_id).await?;
        if user.status == AccountStatus::Suspended {
            return Err(AuthError::AccountSuspended);
        }

        let jti = Uuid::new_v4().to_string();
        let access_token =
            generate_access_token(&user, &jti, &self.jwt_secret, self.access_token_ttl_seconds)?;

        let refresh_jti = Uuid::new_v4().to_string();
        let new_refresh_token = generate_refresh_token(
            &user,
            &refresh_jti,
            &self.jwt_secret,
            self.refresh_token_ttl_days,
        )?;

        let new_refresh_token_hash = hash_token(&new_refresh_token);
        let session_expires_at = Utc::now() + Duration::days(self.refresh_token_ttl_days);

        sqlx::query(
            r#"
            UPDATE auth_sessions
            SET jti = $1, refresh_token_hash = $2, expires_at = $3, updated_at = NOW()
            WHERE id = $4
            "#,
        )
        .bind(&jti)
        .bind(&new_refresh_token_hash)
        .bind(session_expires_at)
        .bind(session.id)
        .execute(&self.db_pool)
        .await?;

        Ok(AuthTokensResponse {
            access_token,
            refresh_token: new_refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_ttl_seconds,
            user: user.into(),
        })
    }

    /// Revoke a session (logout)
    pub async fn revoke_session(&self, jti: &str) -> Result<(), AuthError> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE auth_sessions
            SET revoked = TRUE, revoked_at = NOW()
            WHERE jti = $1 AND revoked = FALSE
            "#,
        )
        .bind(jti)
        .execute(&self.db_pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AuthError::SessionNotFound);
        }

        Ok(())
    }

    /// Verify a session is valid (not revoked)
    pub async fn verify_session(&self, jti: &str) -> Result<AuthSession, AuthError> {
        sqlx::query_as(
            r#"
            SELECT id, user_id, jti, refresh_token_hash, expires_at, revoked, revoked_at,
                   created_at, updated_at
            FROM auth_sessions
            WHERE jti = $1 AND revoked = FALSE AND expires_at > NOW()
            "#,
        )
        .bind(jti)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(AuthError::SessionNotFound)
    }

    /// Get a user by ID
    pub async fn get_user_by_id(&self, user_id: Uuid) -> Result<User, AuthError> {
        sqlx::query_as(
            r#"
            SELECT id, email, name, password_hash, role, status, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(AuthError::UserNotFound)
    }

    // ===== Superadmin user management =====

    /// List all users
    pub async fn list_users(&self) -> Result<Vec<User>, AuthError> {
        let users = sqlx::query_as(
            r#"
            SELECT id, email, name, password_hash, role, status, created_at, updated_at
            FROM users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.db_pool)
        .await?;

        Ok(users)
    }

    /// Update role, status, or name of a user. Used for approving
    /// pending admins and suspending accounts.
    pub async fn update_user(
        &self,
        user_id: Uuid,
        role: Option<UserRole>,
        status: Option<AccountStatus>,
        name: Option<String>,
    ) -> Result<User, AuthError> {
        let user = self.get_user_by_id(user_id).await?;

        sqlx::query(
            r#"
            UPDATE users
            SET role = $1, status = $2, name = $3, updated_at = NOW()
            WHERE id = $4
            "#,
        )
        .bind(role.unwrap_or(user.role))
        .bind(status.unwrap_or(user.status))
        .bind(name.unwrap_or(user.name))
        .bind(user_id)
        .execute(&self.db_pool)
        .await?;

        self.get_user_by_id(user_id).await
    }

    /// Delete a user and (via cascade) its sessions
    pub async fn delete_user(&self, user_id: Uuid) -> Result<(), AuthError> {
        let rows_affected = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.db_pool)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(AuthError::UserNotFound);
        }

        Ok(())
    }

    /// Seed the bootstrap superadmin account if it does not exist yet
    pub async fn ensure_superadmin(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
            .bind(email.to_lowercase())
            .fetch_optional(&self.db_pool)
            .await?;

        if existing.is_some() {
            return Ok(());
        }

        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| AuthError::HashingFailed(e.to_string()))?;
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, password_hash, role, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email.to_lowercase())
        .bind("Super Admin")
        .bind(&password_hash)
        .bind(UserRole::SuperAdmin)
        .bind(AccountStatus::Active)
        .bind(now)
        .bind(now)
        .execute(&self.db_pool)
        .await?;

        tracing::info!(email = %email, "Bootstrap superadmin created");
        Ok(())
    }

    /// Get JWT secret (for middleware access)
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }
}

/// Hash a token for storage
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_token_is_stable_hex() {
        let a = hash_token("some-token");
        let b = hash_token("some-token");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(hash_token("other-token"), a);
    }
}
