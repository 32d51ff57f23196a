use crate::error::RegistryError;
use crate::models::account::Session;
use crate::models::common::{Capability, Role};

/// Static role → capability table.
pub fn role_allows(role: Role, capability: Capability) -> bool {
    use Capability::*;
    match role {
        Role::Admin => true,
        Role::Manager => !matches!(capability, AccessSettings | ManageUsers),
        Role::User => matches!(capability, AccessRegistration | AccessInfo),
    }
}

/// Looks up the session's role. No session denies everything.
pub fn check_permission(session: Option<&Session>, capability: Capability) -> bool {
    session.map_or(false, |s| role_allows(s.role, capability))
}

/// Returns the session or `NotAuthenticated`.
///
/// # Errors
///
/// Returns `RegistryError::NotAuthenticated` when there is no session.
pub fn require_session(session: Option<&Session>) -> Result<&Session, RegistryError> {
    session.ok_or(RegistryError::NotAuthenticated)
}
