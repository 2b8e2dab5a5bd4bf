//! Authentication extractors
//!
//! Verify the Bearer token, check the session is still live, and gate
//! admin surfaces on role *and* account status — a pending or suspended
//! admin holds a valid token but may not manage anything.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{verify_token, AuthService};
use crate::models::{AccountStatus, Actor, UserRole};

/// Authenticated user extracted from a verified access token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub jti: String,
}

impl AuthenticatedUser {
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.user_id,
            role: self.role,
        }
    }
}

/// Error response for authentication failures
#[derive(Debug, Serialize)]
struct AuthRejection {
    error: AuthRejectionDetails,
}

#[derive(Debug, Serialize)]
struct AuthRejectionDetails {
    code: String,
    message: String,
}

impl AuthRejection {
    fn respond(status: StatusCode, code: &str, message: &str) -> Response {
        let body = Self {
            error: AuthRejectionDetails {
                code: code.to_string(),
                message: message.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }

    fn unauthorized(code: &str, message: &str) -> Response {
        Self::respond(StatusCode::UNAUTHORIZED, code, message)
    }

    fn forbidden(message: &str) -> Response {
        Self::respond(StatusCode::FORBIDDEN, "FORBIDDEN", message)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AuthRejection::unauthorized(
                        "MISSING_TOKEN",
                        "Authorization header with Bearer token required",
                    )
                })?;

        let auth_service = Arc::<AuthService>::from_ref(state);

        let claims = verify_token(bearer.token(), auth_service.jwt_secret()).map_err(|e| {
            if e.to_string().contains("expired") {
                AuthRejection::unauthorized("TOKEN_EXPIRED", "Token has expired")
            } else {
                AuthRejection::unauthorized("INVALID_TOKEN", "Invalid token")
            }
        })?;

        if claims.token_type != "access" {
            return Err(AuthRejection::unauthorized(
                "INVALID_TOKEN_TYPE",
                "Expected access token",
            ));
        }

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
            AuthRejection::unauthorized("INVALID_TOKEN", "Invalid user ID in token")
        })?;

        let role = UserRole::parse(&claims.role).ok_or_else(|| {
            AuthRejection::unauthorized("INVALID_TOKEN", "Invalid role in token")
        })?;

        // Logout revokes the session; a revoked jti must stop working
        // before the token itself expires.
        auth_service.verify_session(&claims.jti).await.map_err(|_| {
            AuthRejection::unauthorized("SESSION_REVOKED", "Session has been revoked")
        })?;

        Ok(AuthenticatedUser {
            user_id,
            email: claims.email,
            role,
            jti: claims.jti,
        })
    }
}

/// Extractor requiring an active admin or superadmin account
pub struct AdminUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        if !user.role.is_admin() {
            return Err(AuthRejection::forbidden("Admin access required"));
        }

        // Role and status are server-owned facts: re-read the row so a
        // suspension or a still-pending approval takes effect
        // immediately, not at token expiry.
        let auth_service = Arc::<AuthService>::from_ref(state);
        let record = auth_service
            .get_user_by_id(user.user_id)
            .await
            .map_err(|_| AuthRejection::forbidden("Account no longer exists"))?;

        if !record.role.is_admin() {
            return Err(AuthRejection::forbidden("Admin access required"));
        }
        match record.status {
            AccountStatus::Active => {}
            AccountStatus::Pending => {
                return Err(AuthRejection::forbidden(
                    "Admin account is awaiting superadmin approval",
                ))
            }
            AccountStatus::Suspended => {
                return Err(AuthRejection::forbidden("Account is suspended"))
            }
        }

        Ok(AdminUser(AuthenticatedUser {
            role: record.role,
            ..user
        }))
    }
}

/// Extractor requiring an active superadmin account
pub struct SuperAdminUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for SuperAdminUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AdminUser(user) = AdminUser::from_request_parts(parts, state).await?;

        if user.role != UserRole::SuperAdmin {
            return Err(AuthRejection::forbidden("Superadmin access required"));
        }

        Ok(SuperAdminUser(user))
    }
}
