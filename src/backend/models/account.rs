// src/backend/models/account.rs
use crate::models::common::{AccountId, Role, Timestamp};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A staff account. Passwords are kept and compared in plaintext.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct UserAccount {
    pub id: AccountId,
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub role: Role,
    /// Forces a password change on the next session; cleared by a successful change.
    pub first_login: bool,
    pub created_at: Timestamp,
    pub last_login_at: Option<Timestamp>,
}

/// The authenticated user of the current session.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Session {
    pub account_id: AccountId,
    pub username: String,
    pub role: Role,
    pub started_at: Timestamp,
}

impl Session {
    pub fn for_account(account: &UserAccount, started_at: Timestamp) -> Self {
        Self {
            account_id: account.id.clone(),
            username: account.username.clone(),
            role: account.role,
            started_at,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct LoginOutcome {
    pub session: Session,
    pub must_change_password: bool,
}

#[derive(Deserialize, Serialize, Clone, Debug, Validate)]
pub struct NewAccount {
    #[validate(length(min = 1, max = 50, message = "username must be 1 to 50 characters"))]
    pub username: String,
    pub password: String,
    #[validate(length(max = 50, message = "display name must be at most 50 characters"))]
    pub display_name: String,
    pub role: Role,
}

/// Account row as configured for first start.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct SeedAccount {
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub role: Role,
    pub first_login: bool,
}
