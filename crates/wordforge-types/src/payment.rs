//! Payment types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{OrderId, UserId};

/// Unique payment identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentId(pub Uuid);

impl PaymentId {
    /// Create a new random payment ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a payment ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for PaymentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PaymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for PaymentId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// What a payment settles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    /// Adds to the account balance
    TopUp,
    /// Settles a specific order
    OrderPayment,
}

impl std::fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TopUp => write!(f, "top_up"),
            Self::OrderPayment => write!(f, "order_payment"),
        }
    }
}

impl std::str::FromStr for PaymentKind {
    type Err = PaymentKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "top_up" | "topup" => Ok(Self::TopUp),
            "order_payment" => Ok(Self::OrderPayment),
            _ => Err(PaymentKindParseError(s.to_string())),
        }
    }
}

/// Error parsing a payment kind string
#[derive(Debug, Clone)]
pub struct PaymentKindParseError(pub String);

impl std::fmt::Display for PaymentKindParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid payment kind: {}", self.0)
    }
}

impl std::error::Error for PaymentKindParseError {}

/// Payment record lifecycle state
///
/// `Completed` and `Failed` are both terminal; the model defines no
/// automatic retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    /// Checkout started, awaiting the processor
    Pending,
    /// Settled; side effects applied
    Completed,
    /// Terminally failed; no side effects
    Failed,
}

impl PaymentState {
    /// Whether the record has reached a terminal state
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for PaymentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for PaymentState {
    type Err = PaymentKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(PaymentKindParseError(s.to_string())),
        }
    }
}

/// Monetary transaction record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Payment ID
    pub id: PaymentId,
    /// Owning account
    pub user_id: UserId,
    /// Related order; present iff `kind` is `OrderPayment`
    pub order_id: Option<OrderId>,
    /// Top-up or order payment
    pub kind: PaymentKind,
    /// Lifecycle state
    pub status: PaymentState,
    /// Requested amount in minor currency units
    pub amount_cents: i64,
    /// Amount actually paid; may diverge from the request when a
    /// discount applies
    pub paid_cents: Option<i64>,
    /// Recorded discount, `amount_cents - paid_cents` on completion
    pub discount_cents: i64,
    /// Payment-processor checkout session ID
    pub processor_session_id: Option<String>,
    /// Payment-processor invoice ID
    pub processor_invoice_id: Option<String>,
    /// Free-form processor detail bag
    pub metadata: serde_json::Value,
    /// Why the payment failed, when it did
    pub failure_reason: Option<String>,
    /// When the payment attempt started
    pub created_at: DateTime<Utc>,
    /// When the payment reached a terminal state
    pub completed_at: Option<DateTime<Utc>>,
}
