//! Account service - registration, bootstrap and profile updates

use std::sync::Arc;

use tracing::{info, instrument};

use wordforge_db::{CreateAccount, DbError, UserRepository};
use wordforge_types::{Account, BillingProfile, NotificationPrefs, Role, UserId};

use crate::error::AccountError;

const MAX_EMAIL_LEN: usize = 254;

/// Shape check for email addresses
///
/// The auth layer owns real deliverability concerns; this only rejects
/// input that cannot be an address at all.
fn validate_email(email: &str) -> Result<(), AccountError> {
    let invalid = || AccountError::InvalidEmail(email.to_string());

    if email.is_empty() || email.len() > MAX_EMAIL_LEN {
        return Err(invalid());
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(invalid());
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(invalid());
    }
    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    Ok(())
}

/// Account service
pub struct AccountService<U: UserRepository> {
    users: Arc<U>,
}

impl<U: UserRepository> AccountService<U> {
    /// Create a new account service
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// Register a customer account
    ///
    /// The password arrives pre-hashed from the auth layer; this system
    /// never sees plaintext credentials.
    #[instrument(skip(self, password_hash), fields(email = %email))]
    pub async fn register_account(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Account, AccountError> {
        validate_email(email)?;

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AccountError::EmailTaken);
        }

        let account = self
            .users
            .create(CreateAccount {
                id: UserId::new(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                role: Role::Customer,
            })
            .await
            .map_err(|e| match e {
                // The unique index caught a concurrent registration.
                DbError::Conflict => AccountError::EmailTaken,
                other => other.into(),
            })?;

        info!(user_id = %account.id, "Account registered");
        Ok(account)
    }

    /// One-time administrator bootstrap
    ///
    /// Creates a single admin with zero balances if none exists; safe to
    /// re-run, the existing admin is returned unchanged.
    #[instrument(skip(self, password_hash), fields(email = %email))]
    pub async fn bootstrap_admin(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Account, AccountError> {
        if let Some(admin) = self.users.find_admin().await? {
            return Ok(admin);
        }

        validate_email(email)?;

        let created = self
            .users
            .create(CreateAccount {
                id: UserId::new(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                role: Role::Admin,
            })
            .await;

        match created {
            Ok(admin) => {
                info!(user_id = %admin.id, "Administrator bootstrapped");
                Ok(admin)
            }
            // A concurrent bootstrap won; take its admin.
            Err(DbError::Conflict) => self
                .users
                .find_admin()
                .await?
                .ok_or(AccountError::EmailTaken),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the billing profile; fields are independently optional and
    /// never gate order creation
    #[instrument(skip(self, profile), fields(user_id = %user_id))]
    pub async fn update_billing_profile(
        &self,
        user_id: UserId,
        profile: BillingProfile,
    ) -> Result<Account, AccountError> {
        self.require_account(user_id).await?;
        self.users.update_billing_profile(user_id, &profile).await?;
        self.require_account(user_id).await
    }

    /// Replace the notification preferences
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn update_notification_prefs(
        &self,
        user_id: UserId,
        prefs: NotificationPrefs,
    ) -> Result<Account, AccountError> {
        self.require_account(user_id).await?;
        self.users.update_notification_prefs(user_id, prefs).await?;
        self.require_account(user_id).await
    }

    /// Mark the account's email as verified
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn set_verified(&self, user_id: UserId, verified: bool) -> Result<Account, AccountError> {
        self.require_account(user_id).await?;
        self.users.set_verified(user_id, verified).await?;
        self.require_account(user_id).await
    }

    /// Fetch an account by ID
    pub async fn get_account(&self, user_id: UserId) -> Result<Account, AccountError> {
        self.require_account(user_id).await
    }

    async fn require_account(&self, user_id: UserId) -> Result<Account, AccountError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AccountError::NotFound)
    }
}

impl<U: UserRepository> std::fmt::Debug for AccountService<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService").finish_non_exhaustive()
    }
}
