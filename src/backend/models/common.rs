// src/backend/models/common.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type DocumentId = String; // Random hex token, see utils::crypto::generate_id
pub type AccountId = String;
pub type Timestamp = DateTime<Utc>;
pub type CalendarDate = NaiveDate;

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    User,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Manager, Role::User];

    /// Name shown to staff in account lists and exports.
    pub fn display_name(self) -> &'static str {
        match self {
            Role::Admin => "总管理员",
            Role::Manager => "普通管理员",
            Role::User => "普通账号",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::User => "user",
        };
        f.write_str(key)
    }
}

/// Named features a role may see. Checked through utils::guards.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    AccessRegistration,
    AccessInfo,
    AccessProcessing,
    AccessSettings,
    ManageUsers,
    EditFiles,
    DeleteFiles,
    ExportFiles,
}

impl Capability {
    pub const ALL: [Capability; 8] = [
        Capability::AccessRegistration,
        Capability::AccessInfo,
        Capability::AccessProcessing,
        Capability::AccessSettings,
        Capability::ManageUsers,
        Capability::EditFiles,
        Capability::DeleteFiles,
        Capability::ExportFiles,
    ];
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}
