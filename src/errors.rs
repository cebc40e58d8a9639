use sea_orm::error::DbErr;
use serde::Serialize;

/// Reasons an order candidate can be rejected before any write happens.
///
/// The `Display` text is the message shown verbatim to the submitting user;
/// the variant itself is what callers and tests match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationFailure {
    #[error("customer_id is required")]
    MissingCustomerId,

    #[error("total_amount must be greater than 0")]
    NonPositiveAmount,

    #[error("ship_date cannot be earlier than order_date")]
    ShipBeforeOrder,

    #[error("discount_pct must be between 0 and 100")]
    DiscountOutOfRange,
}

/// Error taxonomy for the order store.
///
/// `ValidationError` is caller-correctable and never persisted. `SchemaError`
/// is fatal at startup; callers are expected to halt rather than run against
/// an unknown schema. `DatabaseError` and `StoreUnavailable` are transient or
/// environmental; the store never retries them silently so callers keep
/// control over duplicate-submission risk on insert.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationFailure),

    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Database error: {0}")]
    DatabaseError(DbErr),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => {
                StoreError::StoreUnavailable(err.to_string())
            }
            other => StoreError::DatabaseError(other),
        }
    }
}

impl StoreError {
    /// Wraps a schema-lifecycle failure, preserving the underlying detail for logs.
    pub fn schema(err: impl std::fmt::Display) -> Self {
        StoreError::SchemaError(err.to_string())
    }

    /// True when the caller can fix the request and resubmit.
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::ValidationError(_))
    }

    /// Returns the message suitable for end users.
    ///
    /// Validation failures are reported verbatim; store-side failures return a
    /// generic message so operators see the detail (via logs) but users don't.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::ValidationError(reason) => reason.to_string(),
            StoreError::SchemaError(_) => "Database initialization failed".to_string(),
            StoreError::DatabaseError(_) | StoreError::StoreUnavailable(_) => {
                "The order could not be saved; please try again later".to_string()
            }
        }
    }
}
