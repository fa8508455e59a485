//! Account management integration tests

mod common;

use std::sync::Arc;

use common::mock_repos::MockUserRepository;
use wordforge_accounts_core::{AccountError, AccountService};
use wordforge_db::UserRepository;
use wordforge_types::{BillingProfile, NotificationPrefs, Role};

fn service() -> (AccountService<MockUserRepository>, Arc<MockUserRepository>) {
    let users = Arc::new(MockUserRepository::new());
    (AccountService::new(Arc::clone(&users)), users)
}

#[tokio::test]
async fn register_creates_unverified_customer_with_zero_balances() {
    let (service, _) = service();

    let account = service
        .register_account("writer@example.com", "$argon2id$hash")
        .await
        .unwrap();

    assert_eq!(account.role, Role::Customer);
    assert!(!account.verified);
    assert_eq!(account.balance_cents, 0);
    assert_eq!(account.total_spent_cents, 0);
    assert_eq!(account.billing, BillingProfile::default());
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let (service, _) = service();

    service
        .register_account("writer@example.com", "$argon2id$hash")
        .await
        .unwrap();
    let second = service
        .register_account("writer@example.com", "$argon2id$other")
        .await;

    assert!(matches!(second, Err(AccountError::EmailTaken)));
}

#[tokio::test]
async fn register_rejects_malformed_email() {
    let (service, _) = service();

    for email in ["", "plainaddress", "user@nodot", "a b@example.com"] {
        let result = service.register_account(email, "$argon2id$hash").await;
        assert!(
            matches!(result, Err(AccountError::InvalidEmail(_))),
            "should reject {email:?}"
        );
    }
}

#[tokio::test]
async fn bootstrap_admin_runs_once() {
    let (service, users) = service();

    let first = service
        .bootstrap_admin("admin@example.com", "$argon2id$hash")
        .await
        .unwrap();
    assert_eq!(first.role, Role::Admin);
    assert_eq!(first.balance_cents, 0);

    // Re-running is a no-op returning the same admin, even with a
    // different email.
    let second = service
        .bootstrap_admin("other-admin@example.com", "$argon2id$hash")
        .await
        .unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.email, "admin@example.com");

    let admin = users.find_admin().await.unwrap().unwrap();
    assert_eq!(admin.id, first.id);
}

#[tokio::test]
async fn billing_profile_update_never_touches_balances() {
    let (service, users) = service();

    let account = service
        .register_account("writer@example.com", "$argon2id$hash")
        .await
        .unwrap();

    let profile = BillingProfile {
        company_name: Some("Acme Copy sp. z o.o.".to_string()),
        tax_id: Some("PL1234567890".to_string()),
        address: Some("Main St".to_string()),
        postal_code: Some("00-001".to_string()),
        city: Some("Warsaw".to_string()),
        building_no: Some("12A".to_string()),
    };
    let updated = service
        .update_billing_profile(account.id, profile.clone())
        .await
        .unwrap();

    assert_eq!(updated.billing, profile);
    assert!(updated.billing.invoiceable());

    let stored = users.find_by_id_direct(account.id);
    assert_eq!(stored.balance_cents, 0);
    assert_eq!(stored.total_spent_cents, 0);
}

#[tokio::test]
async fn partial_billing_profile_is_allowed() {
    let (service, _) = service();

    let account = service
        .register_account("writer@example.com", "$argon2id$hash")
        .await
        .unwrap();

    let partial = BillingProfile {
        company_name: Some("Freelance".to_string()),
        ..BillingProfile::default()
    };
    let updated = service
        .update_billing_profile(account.id, partial)
        .await
        .unwrap();

    assert!(!updated.billing.invoiceable());
}

#[tokio::test]
async fn notification_prefs_round_trip() {
    let (service, _) = service();

    let account = service
        .register_account("writer@example.com", "$argon2id$hash")
        .await
        .unwrap();

    let prefs = NotificationPrefs {
        order_updates: false,
        payment_receipts: true,
        marketing: true,
    };
    let updated = service
        .update_notification_prefs(account.id, prefs)
        .await
        .unwrap();

    assert_eq!(updated.notifications, prefs);
}

#[tokio::test]
async fn set_verified_flips_the_flag() {
    let (service, _) = service();

    let account = service
        .register_account("writer@example.com", "$argon2id$hash")
        .await
        .unwrap();
    let verified = service.set_verified(account.id, true).await.unwrap();

    assert!(verified.verified);
}

#[tokio::test]
async fn unknown_account_is_not_found() {
    let (service, _) = service();

    let result = service.get_account(wordforge_types::UserId::new()).await;
    assert!(matches!(result, Err(AccountError::NotFound)));
}
