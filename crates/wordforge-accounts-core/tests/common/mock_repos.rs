//! Mock account repository for testing

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use wordforge_db::{CreateAccount, DbError, DbResult, UserRepository};
use wordforge_types::{Account, BillingProfile, NotificationPrefs, UserId};

/// In-memory account repository for testing
#[derive(Default, Clone)]
pub struct MockUserRepository {
    accounts: Arc<DashMap<Uuid, Account>>,
    by_email: Arc<DashMap<String, Uuid>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch an account without going through the trait
    pub fn find_by_id_direct(&self, id: UserId) -> Account {
        self.accounts.get(&id.0).expect("account exists").value().clone()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: UserId) -> DbResult<Option<Account>> {
        Ok(self.accounts.get(&id.0).map(|r| r.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<Account>> {
        Ok(self
            .by_email
            .get(email)
            .and_then(|id| self.accounts.get(id.value()).map(|r| r.value().clone())))
    }

    async fn find_admin(&self) -> DbResult<Option<Account>> {
        Ok(self
            .accounts
            .iter()
            .filter(|r| r.value().is_admin())
            .min_by_key(|r| r.value().created_at)
            .map(|r| r.value().clone()))
    }

    async fn create(&self, account: CreateAccount) -> DbResult<Account> {
        if self.by_email.contains_key(&account.email) {
            return Err(DbError::Conflict);
        }
        let row = Account {
            id: account.id,
            email: account.email.clone(),
            password_hash: account.password_hash,
            role: account.role,
            verified: false,
            balance_cents: 0,
            total_spent_cents: 0,
            billing: BillingProfile::default(),
            notifications: NotificationPrefs::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.by_email.insert(account.email, row.id.0);
        self.accounts.insert(row.id.0, row.clone());
        Ok(row)
    }

    async fn update_billing_profile(&self, id: UserId, profile: &BillingProfile) -> DbResult<()> {
        if let Some(mut account) = self.accounts.get_mut(&id.0) {
            account.billing = profile.clone();
            account.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_notification_prefs(
        &self,
        id: UserId,
        prefs: NotificationPrefs,
    ) -> DbResult<()> {
        if let Some(mut account) = self.accounts.get_mut(&id.0) {
            account.notifications = prefs;
            account.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_verified(&self, id: UserId, verified: bool) -> DbResult<()> {
        if let Some(mut account) = self.accounts.get_mut(&id.0) {
            account.verified = verified;
            account.updated_at = Utc::now();
        }
        Ok(())
    }
}
