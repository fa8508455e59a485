//! Order types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Attachment, UserId};

/// Unique order identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub Uuid);

impl OrderId {
    /// Create a new random order ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an order ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for OrderId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Order lifecycle status
///
/// `Completed` and `Cancelled` are terminal; no transition leaves either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Submitted, not yet picked up by staff
    Pending,
    /// Staff are writing
    InProgress,
    /// Delivered; status frozen
    Completed,
    /// Withdrawn before completion
    Cancelled,
}

impl OrderStatus {
    /// Whether the lifecycle has reached a terminal state
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether the order can still be cancelled
    pub const fn cancellable(&self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(StatusParseError(s.to_string())),
        }
    }
}

/// Payment settlement status of an order
///
/// Independent axis from [`OrderStatus`]; an order may complete while its
/// payment is still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Not yet settled
    Pending,
    /// Settled by a completed payment
    Paid,
    /// Marked failed during reconciliation
    Failed,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Paid => write!(f, "paid"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            _ => Err(StatusParseError(s.to_string())),
        }
    }
}

/// Error parsing a status string
#[derive(Debug, Clone)]
pub struct StatusParseError(pub String);

impl std::fmt::Display for StatusParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid status: {}", self.0)
    }
}

impl std::error::Error for StatusParseError {}

/// One billable unit of content within an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Globally unique item number, assigned from the shared sequence
    pub item_number: i64,
    /// Subject of the piece
    pub topic: String,
    /// Requested length in words
    pub length_words: i32,
    /// Content type, e.g. "article", "product_description"
    pub content_type: String,
    /// Target language code
    pub language: String,
    /// Price for this item in minor currency units
    pub unit_price_cents: i64,
    /// Optional writer guidelines
    pub guidelines: Option<String>,
}

/// Content order aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Order ID
    pub id: OrderId,
    /// Globally unique sequential order number, never reused
    pub order_number: i64,
    /// Owning account
    pub user_id: UserId,
    /// Line items, at least one
    pub items: Vec<OrderItem>,
    /// Sum of item prices in minor currency units
    pub total_price_cents: i64,
    /// Lifecycle status
    pub status: OrderStatus,
    /// Settlement status
    pub payment_status: PaymentStatus,
    /// Delivery date promised at creation
    pub declared_delivery_date: DateTime<Utc>,
    /// Actual delivery date, set on completion
    pub actual_delivery_date: Option<DateTime<Utc>>,
    /// Staff deliveries made while the order was still open
    pub deliveries: Vec<Attachment>,
    /// Deliveries recorded once the order was completed
    pub completion_deliveries: Vec<Attachment>,
    /// Files the customer uploaded, append-only
    pub customer_uploads: Vec<Attachment>,
    /// External invoicing-system reference
    pub invoice_ref: Option<String>,
    /// When the order was created
    pub created_at: DateTime<Utc>,
    /// When the order was last updated
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Sum of item prices; must equal `total_price_cents`
    pub fn item_total_cents(&self) -> i64 {
        self.items.iter().map(|i| i.unit_price_cents).sum()
    }
}
