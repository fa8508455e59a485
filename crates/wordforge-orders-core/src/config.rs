//! Orders configuration

/// Order service configuration
#[derive(Debug, Clone)]
pub struct OrdersConfig {
    /// Maximum number of line items accepted per order
    pub max_items_per_order: usize,
    /// Attempts at number allocation before giving up with a conflict
    pub create_retry_attempts: u32,
    /// Cap applied to list queries
    pub max_list_limit: i64,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            max_items_per_order: 50,
            create_retry_attempts: 3,
            max_list_limit: 100,
        }
    }
}

impl OrdersConfig {
    /// Set the per-order item cap
    pub fn with_max_items(mut self, max: usize) -> Self {
        self.max_items_per_order = max;
        self
    }

    /// Set the number-allocation retry budget
    pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.create_retry_attempts = attempts;
        self
    }
}
