use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an order.
///
/// Stored lowercase; the values match the options the order form offers.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "shipped")]
    Shipped,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Sales channel the order came in through.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[sea_orm(string_value = "website")]
    Website,
    #[sea_orm(string_value = "social")]
    Social,
    #[sea_orm(string_value = "marketplace")]
    Marketplace,
    #[sea_orm(string_value = "partner")]
    Partner,
}

/// How the order was paid.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "card")]
    Card,
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    #[sea_orm(string_value = "e-wallet")]
    #[strum(serialize = "e-wallet")]
    #[serde(rename = "e-wallet")]
    EWallet,
}

/// The `orders` table.
///
/// Rows are created exactly once by a validated insert and never mutated or
/// deleted afterwards. `order_id` is assigned by the store and never reused;
/// `(created_at, order_id)` gives the total order used for latest-N queries.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub order_id: i64,

    /// Customer reference, stored trimmed / whitespace-collapsed / uppercased.
    pub customer_id: String,

    pub order_date: NaiveDate,

    /// When present, never earlier than `order_date`.
    pub ship_date: Option<NaiveDate>,

    pub status: OrderStatus,

    pub channel: Channel,

    /// Free-form product category, used only for aggregation.
    pub category: Option<String>,

    /// Order total; always > 0 for a persisted row.
    pub total_amount: Decimal,

    /// Discount percentage, 0–100 when present.
    pub discount_pct: Option<f64>,

    pub payment_method: PaymentMethod,

    /// Stored trimmed / whitespace-collapsed / title-cased.
    pub region: String,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
