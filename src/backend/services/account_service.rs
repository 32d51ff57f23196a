// src/backend/services/account_service.rs
// Accounts, sessions and roles.

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::models::account::{LoginOutcome, NewAccount, Session, UserAccount};
use crate::models::common::{AccountId, Role};
use crate::services::audit_service;
use crate::storage::Storage;
use crate::utils::crypto::{generate_id, generate_temporary_password};
use crate::utils::guards::require_session;
use crate::utils::time::now;
use ic_stable_structures::Memory;
use validator::Validate;

fn position_of(accounts: &[UserAccount], id: &str) -> Result<usize, RegistryError> {
    accounts
        .iter()
        .position(|account| account.id == id)
        .ok_or_else(|| RegistryError::NotFound(format!("account {}", id)))
}

pub fn list<M: Memory>(storage: &Storage<M>) -> Vec<UserAccount> {
    storage.accounts()
}

pub fn get<M: Memory>(storage: &Storage<M>, id: &str) -> Result<UserAccount, RegistryError> {
    let accounts = storage.accounts();
    let index = position_of(&accounts, id)?;
    Ok(accounts[index].clone())
}

/// Case-insensitive match on username, display name or role display name.
/// A blank keyword returns every account.
pub fn search<M: Memory>(storage: &Storage<M>, keyword: &str) -> Vec<UserAccount> {
    let keyword = keyword.trim().to_lowercase();
    storage
        .accounts()
        .into_iter()
        .filter(|account| {
            keyword.is_empty()
                || account.username.to_lowercase().contains(&keyword)
                || account.display_name.to_lowercase().contains(&keyword)
                || account.role.display_name().contains(&keyword)
        })
        .collect()
}

/// Authenticates by exact, plaintext match and persists the new session.
///
/// # Errors
///
/// `InvalidCredentials` for an unknown username and for a wrong password alike.
pub fn login<M: Memory>(
    storage: &mut Storage<M>,
    config: &RegistryConfig,
    username: &str,
    password: &str,
) -> Result<LoginOutcome, RegistryError> {
    let mut accounts = storage.accounts();
    let Some(account) = accounts
        .iter_mut()
        .find(|account| account.username == username && account.password == password)
    else {
        tracing::debug!("login rejected");
        return Err(RegistryError::InvalidCredentials);
    };

    let at = now();
    account.last_login_at = Some(at);
    let session = Session::for_account(account, at);
    let must_change_password = account.first_login;
    storage.save_accounts(&accounts)?;
    storage.save_session(Some(&session))?;

    audit_service::append(storage, config, Some(&session), "用户登录")?;
    tracing::info!(user = %session.username, must_change_password, "login");
    Ok(LoginOutcome { session, must_change_password })
}

/// Clears the persisted session. Logs only when someone was logged in.
pub fn logout<M: Memory>(
    storage: &mut Storage<M>,
    config: &RegistryConfig,
    session: Option<&Session>,
) -> Result<(), RegistryError> {
    if let Some(session) = session {
        audit_service::append(storage, config, Some(session), "用户登出")?;
        tracing::info!(user = %session.username, "logout");
    }
    storage.save_session(None)
}

/// Replaces the password of `username` and clears its first-login flag.
///
/// # Errors
///
/// `InvalidCredentials` when the account is unknown or `old_password` does
/// not match, `WeakPassword` when `new_password` fails the policy.
pub fn change_password<M: Memory>(
    storage: &mut Storage<M>,
    config: &RegistryConfig,
    actor: Option<&Session>,
    username: &str,
    old_password: &str,
    new_password: &str,
) -> Result<(), RegistryError> {
    let mut accounts = storage.accounts();
    let account = accounts
        .iter_mut()
        .find(|account| account.username == username && account.password == old_password)
        .ok_or(RegistryError::InvalidCredentials)?;
    config.password_policy.check(new_password)?;

    account.password = new_password.to_string();
    account.first_login = false;
    storage.save_accounts(&accounts)?;

    audit_service::append(storage, config, actor, format!("修改密码：{}", username))?;
    tracing::info!(username, "password changed");
    Ok(())
}

/// Creates an account that must change its password on first login.
///
/// # Errors
///
/// `Validation` for a bad username, `DuplicateUsername`, `WeakPassword`.
pub fn add_account<M: Memory>(
    storage: &mut Storage<M>,
    config: &RegistryConfig,
    actor: Option<&Session>,
    new_account: NewAccount,
) -> Result<UserAccount, RegistryError> {
    let new_account = NewAccount {
        username: new_account.username.trim().to_string(),
        display_name: new_account.display_name.trim().to_string(),
        ..new_account
    };
    new_account.validate()?;

    let mut accounts = storage.accounts();
    if accounts.iter().any(|account| account.username == new_account.username) {
        return Err(RegistryError::DuplicateUsername(new_account.username));
    }
    config.password_policy.check(&new_account.password)?;

    let display_name = if new_account.display_name.is_empty() {
        new_account.username.clone()
    } else {
        new_account.display_name
    };
    let account = UserAccount {
        id: generate_id(),
        username: new_account.username,
        password: new_account.password,
        display_name,
        role: new_account.role,
        first_login: true,
        created_at: now(),
        last_login_at: None,
    };
    accounts.push(account.clone());
    storage.save_accounts(&accounts)?;

    audit_service::append(
        storage,
        config,
        actor,
        format!("添加用户：{}，角色：{}", account.username, account.role.display_name()),
    )?;
    tracing::info!(username = %account.username, role = %account.role, "account added");
    Ok(account)
}

/// Removes an account other than the acting one.
///
/// # Errors
///
/// `NotAuthenticated` without a session, `SelfDeletionForbidden` when `id`
/// is the session's own account, `NotFound` when absent.
pub fn delete_account<M: Memory>(
    storage: &mut Storage<M>,
    config: &RegistryConfig,
    actor: Option<&Session>,
    id: &str,
) -> Result<UserAccount, RegistryError> {
    let session = require_session(actor)?;
    if session.account_id == id {
        return Err(RegistryError::SelfDeletionForbidden);
    }
    let mut accounts = storage.accounts();
    let index = position_of(&accounts, id)?;
    let removed = accounts.remove(index);
    storage.save_accounts(&accounts)?;

    audit_service::append(storage, config, actor, format!("删除用户：{}", removed.username))?;
    tracing::info!(username = %removed.username, "account deleted");
    Ok(removed)
}

/// Changes the role of `id`. When `id` is the acting account the persisted
/// session is rewritten with the new role and returned.
pub fn set_role<M: Memory>(
    storage: &mut Storage<M>,
    config: &RegistryConfig,
    actor: Option<&Session>,
    id: &AccountId,
    role: Role,
) -> Result<Option<Session>, RegistryError> {
    let mut accounts = storage.accounts();
    let index = position_of(&accounts, id)?;
    accounts[index].role = role;
    let username = accounts[index].username.clone();
    storage.save_accounts(&accounts)?;

    let refreshed = match actor {
        Some(session) if session.account_id == *id => {
            let refreshed = Session { role, ..session.clone() };
            storage.save_session(Some(&refreshed))?;
            Some(refreshed)
        }
        _ => None,
    };

    audit_service::append(
        storage,
        config,
        refreshed.as_ref().or(actor),
        format!("修改用户角色：{}，新角色：{}", username, role.display_name()),
    )?;
    tracing::info!(username = %username, role = %role, "role changed");
    Ok(refreshed)
}

/// Replaces the password of `id` with a random one that satisfies the
/// policy and forces a change on next login. Returns the new password.
pub fn reset_password<M: Memory>(
    storage: &mut Storage<M>,
    config: &RegistryConfig,
    actor: Option<&Session>,
    id: &str,
) -> Result<String, RegistryError> {
    let mut accounts = storage.accounts();
    let index = position_of(&accounts, id)?;
    let length = config.temporary_password_length.max(config.password_policy.min_length);
    let temporary = generate_temporary_password(length);
    config.password_policy.check(&temporary)?;

    accounts[index].password = temporary.clone();
    accounts[index].first_login = true;
    let username = accounts[index].username.clone();
    storage.save_accounts(&accounts)?;

    audit_service::append(storage, config, actor, format!("重置密码：{}", username))?;
    tracing::info!(username = %username, "password reset");
    Ok(temporary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ic_stable_structures::DefaultMemoryImpl;
    use pretty_assertions::assert_eq;

    fn setup() -> (Storage<DefaultMemoryImpl>, RegistryConfig) {
        let config = RegistryConfig::default();
        (Storage::open(DefaultMemoryImpl::default(), &config).unwrap(), config)
    }

    fn admin_login(storage: &mut Storage<DefaultMemoryImpl>, config: &RegistryConfig) -> Session {
        login(storage, config, "TYL2025", "941314aA").unwrap().session
    }

    fn new_account(username: &str, password: &str) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            password: password.to_string(),
            display_name: String::new(),
            role: Role::User,
        }
    }

    #[test]
    fn login_persists_session_and_reports_first_login() {
        let (mut storage, config) = setup();
        let outcome = login(&mut storage, &config, "8888", "8888").unwrap();
        assert!(outcome.must_change_password);
        assert_eq!(outcome.session.role, Role::Manager);
        assert_eq!(storage.session(), Some(outcome.session.clone()));

        let account = search(&storage, "8888").remove(0);
        assert_eq!(account.last_login_at, Some(outcome.session.started_at));
        let last = storage.operation_log().pop().unwrap();
        assert_eq!((last.action.as_str(), last.user.as_str()), ("用户登录", "8888"));
    }

    #[test]
    fn login_failures_are_indistinguishable() {
        let (mut storage, config) = setup();
        let wrong_password = login(&mut storage, &config, "1001", "wrongpass").unwrap_err();
        let unknown_user = login(&mut storage, &config, "nonexistent", "x").unwrap_err();
        assert_eq!(wrong_password, RegistryError::InvalidCredentials);
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert_eq!(storage.session(), None);
    }

    #[test]
    fn logout_clears_session() {
        let (mut storage, config) = setup();
        let session = admin_login(&mut storage, &config);
        logout(&mut storage, &config, Some(&session)).unwrap();
        assert_eq!(storage.session(), None);
        assert_eq!(storage.operation_log().pop().unwrap().action, "用户登出");
    }

    #[test]
    fn change_password_checks_old_and_policy() {
        let (mut storage, config) = setup();
        assert_eq!(
            change_password(&mut storage, &config, None, "1001", "bad", "abc12345").unwrap_err(),
            RegistryError::InvalidCredentials
        );
        assert!(matches!(
            change_password(&mut storage, &config, None, "1001", "1001", "short1"),
            Err(RegistryError::WeakPassword(_))
        ));
        assert!(matches!(
            change_password(&mut storage, &config, None, "1001", "1001", "onlyletters"),
            Err(RegistryError::WeakPassword(_))
        ));

        change_password(&mut storage, &config, None, "1001", "1001", "abc12345").unwrap();
        let outcome = login(&mut storage, &config, "1001", "abc12345").unwrap();
        assert!(!outcome.must_change_password);
    }

    #[test]
    fn add_account_enforces_uniqueness_and_policy() {
        let (mut storage, config) = setup();
        let account = add_account(&mut storage, &config, None, new_account("2002", "pass2002")).unwrap();
        assert!(account.first_login);
        assert_eq!(account.display_name, "2002");

        assert_eq!(
            add_account(&mut storage, &config, None, new_account("2002", "pass2002")).unwrap_err(),
            RegistryError::DuplicateUsername("2002".into())
        );
        assert!(matches!(
            add_account(&mut storage, &config, None, new_account("3003", "1234")),
            Err(RegistryError::WeakPassword(_))
        ));
        assert_eq!(
            add_account(&mut storage, &config, None, new_account(" ", "pass2002")).unwrap_err().to_string(),
            "username must be 1 to 50 characters"
        );
        assert_eq!(list(&storage).len(), 4);
    }

    #[test]
    fn self_deletion_is_forbidden_for_every_role() {
        let (mut storage, config) = setup();
        for (username, password) in [("TYL2025", "941314aA"), ("8888", "8888"), ("1001", "1001")] {
            let session = login(&mut storage, &config, username, password).unwrap().session;
            let err = delete_account(&mut storage, &config, Some(&session), &session.account_id).unwrap_err();
            assert_eq!(err, RegistryError::SelfDeletionForbidden);
        }
        assert_eq!(list(&storage).len(), 3);
    }

    #[test]
    fn delete_needs_a_session() {
        let (mut storage, config) = setup();
        let target = search(&storage, "1001").remove(0);
        assert_eq!(
            delete_account(&mut storage, &config, None, &target.id).unwrap_err(),
            RegistryError::NotAuthenticated
        );
        assert_eq!(list(&storage).len(), 3);
    }

    #[test]
    fn delete_other_account() {
        let (mut storage, config) = setup();
        let admin = admin_login(&mut storage, &config);
        let target = add_account(&mut storage, &config, Some(&admin), new_account("2002", "pass2002")).unwrap();
        delete_account(&mut storage, &config, Some(&admin), &target.id).unwrap();
        assert!(matches!(get(&storage, &target.id), Err(RegistryError::NotFound(_))));
        assert!(matches!(
            delete_account(&mut storage, &config, Some(&admin), &target.id),
            Err(RegistryError::NotFound(_))
        ));
    }

    #[test]
    fn set_role_refreshes_own_session() {
        let (mut storage, config) = setup();
        let admin = admin_login(&mut storage, &config);
        let refreshed = set_role(&mut storage, &config, Some(&admin), &admin.account_id, Role::Manager).unwrap();
        let refreshed = refreshed.unwrap();
        assert_eq!(refreshed.role, Role::Manager);
        assert_eq!(storage.session(), Some(refreshed));

        let other = search(&storage, "1001").remove(0);
        assert_eq!(set_role(&mut storage, &config, Some(&admin), &other.id, Role::Manager).unwrap(), None);
        assert_eq!(get(&storage, &other.id).unwrap().role, Role::Manager);
    }

    #[test]
    fn reset_password_issues_policy_compliant_temporary() {
        let (mut storage, config) = setup();
        let admin = admin_login(&mut storage, &config);
        let target = search(&storage, "1001").remove(0);
        change_password(&mut storage, &config, None, "1001", "1001", "abc12345").unwrap();

        let temporary = reset_password(&mut storage, &config, Some(&admin), &target.id).unwrap();
        assert_eq!(temporary.len(), config.temporary_password_length);
        assert!(config.password_policy.check(&temporary).is_ok());
        assert!(login(&mut storage, &config, "1001", &temporary).unwrap().must_change_password);
    }

    #[test]
    fn search_matches_role_display_name() {
        let (storage, _) = setup();
        let managers: Vec<String> = search(&storage, "普通管理员").into_iter().map(|a| a.username).collect();
        assert_eq!(managers, vec!["8888".to_string()]);
        assert_eq!(search(&storage, "tyl").len(), 1);
        assert_eq!(search(&storage, "").len(), 3);
    }
}
