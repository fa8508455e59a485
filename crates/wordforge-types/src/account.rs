//! Account types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique account identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Create a new random account ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an account ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for UserId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Staff administrator
    Admin,
    /// Regular customer
    Customer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Customer => write!(f, "customer"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "customer" | "user" => Ok(Self::Customer),
            _ => Err(RoleParseError(s.to_string())),
        }
    }
}

/// Error parsing a role string
#[derive(Debug, Clone)]
pub struct RoleParseError(pub String);

impl std::fmt::Display for RoleParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid role: {}", self.0)
    }
}

impl std::error::Error for RoleParseError {}

/// Company billing details, required only for invoicing
///
/// Every field is independently optional; an incomplete profile never
/// blocks order creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingProfile {
    /// Company name
    pub company_name: Option<String>,
    /// Tax identification number
    pub tax_id: Option<String>,
    /// Street address
    pub address: Option<String>,
    /// Postal code
    pub postal_code: Option<String>,
    /// City
    pub city: Option<String>,
    /// Building number
    pub building_no: Option<String>,
}

impl BillingProfile {
    /// Whether the profile carries enough detail to issue an invoice
    pub fn invoiceable(&self) -> bool {
        self.company_name.is_some()
            && self.tax_id.is_some()
            && self.address.is_some()
            && self.postal_code.is_some()
            && self.city.is_some()
    }
}

/// Per-channel notification opt-ins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPrefs {
    /// Order status change notifications
    pub order_updates: bool,
    /// Payment receipt notifications
    pub payment_receipts: bool,
    /// Marketing messages
    pub marketing: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            order_updates: true,
            payment_receipts: true,
            marketing: false,
        }
    }
}

/// Customer or staff account
///
/// `balance_cents` and `total_spent_cents` move only through payment
/// settlement; profile code never edits them directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Account ID
    pub id: UserId,
    /// Unique email address
    pub email: String,
    /// Password hash (opaque; hashing happens in the auth layer)
    pub password_hash: String,
    /// Account role
    pub role: Role,
    /// Whether the email address has been verified
    pub verified: bool,
    /// Account balance in minor currency units
    pub balance_cents: i64,
    /// Lifetime spend in minor currency units
    pub total_spent_cents: i64,
    /// Company billing details
    pub billing: BillingProfile,
    /// Notification preferences
    pub notifications: NotificationPrefs,
    /// When the account was created
    pub created_at: DateTime<Utc>,
    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Whether this account has staff privileges
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
