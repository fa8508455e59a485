//! PostgreSQL account repository implementation

use async_trait::async_trait;
use sqlx::PgPool;

use wordforge_types::{Account, BillingProfile, NotificationPrefs, UserId};

use crate::error::DbResult;
use crate::models::UserRow;
use crate::repo::{CreateAccount, UserRepository};

const USER_COLUMNS: &str = r#"
    id, email, password_hash, role, verified, balance_cents, total_spent_cents,
    company_name, tax_id, address, postal_code, city, building_no,
    notify_order_updates, notify_payment_receipts, notify_marketing,
    created_at, updated_at
"#;

/// PostgreSQL account repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new account repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: UserId) -> DbResult<Option<Account>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Account::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<Account>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Account::try_from).transpose()
    }

    async fn find_admin(&self) -> DbResult<Option<Account>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = 'admin' ORDER BY created_at LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;

        row.map(Account::try_from).transpose()
    }

    async fn create(&self, account: CreateAccount) -> DbResult<Account> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(account.id.0)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.role.to_string())
        .fetch_one(&self.pool)
        .await?;

        Account::try_from(row)
    }

    async fn update_billing_profile(&self, id: UserId, profile: &BillingProfile) -> DbResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET company_name = $2, tax_id = $3, address = $4, postal_code = $5,
                city = $6, building_no = $7, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(&profile.company_name)
        .bind(&profile.tax_id)
        .bind(&profile.address)
        .bind(&profile.postal_code)
        .bind(&profile.city)
        .bind(&profile.building_no)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_notification_prefs(
        &self,
        id: UserId,
        prefs: NotificationPrefs,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET notify_order_updates = $2, notify_payment_receipts = $3,
                notify_marketing = $4, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(prefs.order_updates)
        .bind(prefs.payment_receipts)
        .bind(prefs.marketing)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_verified(&self, id: UserId, verified: bool) -> DbResult<()> {
        sqlx::query("UPDATE users SET verified = $1, updated_at = now() WHERE id = $2")
            .bind(verified)
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
