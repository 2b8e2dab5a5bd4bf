//! Data models for the PUKATU backend

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod auth;
pub use auth::*;

/// User model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: UserRole,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User roles
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Public,
    Admin,
    SuperAdmin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Public => "public",
            UserRole::Admin => "admin",
            UserRole::SuperAdmin => "superadmin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "public" => Some(UserRole::Public),
            "admin" => Some(UserRole::Admin),
            "superadmin" => Some(UserRole::SuperAdmin),
            _ => None,
        }
    }

    /// Whether this role may manage raffles at all
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::SuperAdmin)
    }
}

/// Account status. Self-registered admins start `Pending` and must be
/// approved by a superadmin before they can manage raffles.
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "account_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Suspended,
    Pending,
}

/// Acting identity for admin-gated mutations. Built from the verified
/// token by the auth extractors, never from request payloads.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl Actor {
    /// SuperAdmin acts on everything; an Admin only on what it owns.
    pub fn may_manage(&self, owner: Uuid) -> bool {
        match self.role {
            UserRole::SuperAdmin => true,
            UserRole::Admin => self.user_id == owner,
            UserRole::Public => false,
        }
    }
}

/// Dashboard statistics (superadmin overview)
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct SystemStats {
    pub total_users: i64,
    pub total_admins: i64,
    pub total_lotteries: i64,
    pub active_lotteries: i64,
    pub total_revenue_cents: i64,
    pub pending_payments: i64,
}

/// Request to update a user (superadmin only)
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub role: Option<UserRole>,
    pub status: Option<AccountStatus>,
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [UserRole::Public, UserRole::Admin, UserRole::SuperAdmin] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::parse("root"), None);
    }

    #[test]
    fn test_actor_scoping() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();

        let superadmin = Actor {
            user_id: other,
            role: UserRole::SuperAdmin,
        };
        let admin = Actor {
            user_id: owner,
            role: UserRole::Admin,
        };
        let stranger = Actor {
            user_id: other,
            role: UserRole::Admin,
        };
        let buyer = Actor {
            user_id: owner,
            role: UserRole::Public,
        };

        assert!(superadmin.may_manage(owner));
        assert!(admin.may_manage(owner));
        assert!(!stranger.may_manage(owner));
        assert!(!buyer.may_manage(owner));
    }
}
