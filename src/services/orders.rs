use crate::{
    db::DbPool,
    entities::order::{self, ActiveModel as OrderActiveModel, Entity as OrderEntity},
    entities::{Channel, OrderStatus, PaymentMethod},
    errors::{StoreError, ValidationFailure},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, EntityTrait, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// A candidate order as gathered by the order form, before the store has
/// assigned it an identifier or a creation timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer_id: String,
    pub order_date: NaiveDate,
    #[serde(default)]
    pub ship_date: Option<NaiveDate>,
    pub status: OrderStatus,
    pub channel: Channel,
    #[serde(default)]
    pub category: Option<String>,
    pub total_amount: Decimal,
    #[serde(default)]
    pub discount_pct: Option<f64>,
    pub payment_method: PaymentMethod,
    pub region: String,
}

/// Trims, collapses inner whitespace runs to single spaces.
fn clean_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Title-cases each whitespace-separated word ("phnom penh" -> "Phnom Penh").
fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl OrderDraft {
    /// Returns the draft with its string fields normalized: `customer_id`
    /// trimmed / collapsed / uppercased, `region` trimmed / collapsed /
    /// title-cased, empty `category` treated as absent.
    ///
    /// Deterministic and idempotent: normalizing an already-normalized draft
    /// changes nothing, so identical logical values compare equal once stored.
    pub fn normalized(mut self) -> Self {
        self.customer_id = clean_text(&self.customer_id).to_uppercase();
        self.region = title_case(&self.region);
        self.category = self
            .category
            .map(|c| clean_text(&c))
            .filter(|c| !c.is_empty());
        self
    }

    /// Validates the draft, first failing check wins.
    ///
    /// The check order is part of the contract: a draft that is wrong in
    /// several ways reports the missing customer first, then the amount, then
    /// the date ordering, then the discount bounds.
    pub fn validate(&self) -> Result<(), ValidationFailure> {
        if self.customer_id.trim().is_empty() {
            return Err(ValidationFailure::MissingCustomerId);
        }
        if self.total_amount <= Decimal::ZERO {
            return Err(ValidationFailure::NonPositiveAmount);
        }
        if let Some(ship_date) = self.ship_date {
            if ship_date < self.order_date {
                return Err(ValidationFailure::ShipBeforeOrder);
            }
        }
        if let Some(pct) = self.discount_pct {
            if !(0.0..=100.0).contains(&pct) {
                return Err(ValidationFailure::DiscountOutOfRange);
            }
        }
        Ok(())
    }
}

/// Service for persisting and retrieving orders.
///
/// Each call is an independent, short-lived operation against the shared
/// pool; there is no cross-call transaction between `insert` and a subsequent
/// `fetch_latest`.
#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
}

impl OrderService {
    /// Creates a new order service instance
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Validates and persists a candidate order, returning the assigned id.
    ///
    /// The draft is normalized and validated before any write; a rejected
    /// draft leaves the store unchanged. On success the row is committed and
    /// the store-assigned `order_id` is returned; id assignment and
    /// durability are atomic, so no caller ever observes an id for a row
    /// that did not survive the commit.
    #[instrument(skip(self, draft), fields(customer_id = %draft.customer_id))]
    pub async fn insert(&self, draft: OrderDraft) -> Result<i64, StoreError> {
        let draft = draft.normalized();
        draft.validate()?;

        let db = &*self.db_pool;
        let now = Utc::now();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for order insert");
            StoreError::from(e)
        })?;

        let order_active_model = OrderActiveModel {
            order_id: NotSet,
            customer_id: Set(draft.customer_id.clone()),
            order_date: Set(draft.order_date),
            ship_date: Set(draft.ship_date),
            status: Set(draft.status),
            channel: Set(draft.channel),
            category: Set(draft.category),
            total_amount: Set(draft.total_amount),
            discount_pct: Set(draft.discount_pct),
            payment_method: Set(draft.payment_method),
            region: Set(draft.region),
            created_at: Set(now),
        };

        let order_model = order_active_model.insert(&txn).await.map_err(|e| {
            error!(error = %e, "Failed to insert order");
            StoreError::from(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = order_model.order_id, "Failed to commit order insert");
            StoreError::from(e)
        })?;

        info!(order_id = order_model.order_id, "Order persisted");

        Ok(order_model.order_id)
    }

    /// Returns the `limit` most recently created orders, newest first.
    ///
    /// Ordering is `created_at` descending with ties broken by `order_id`
    /// descending. Returns fewer rows when the store holds fewer, and an
    /// empty vec (not an error) when it is empty. Reflects every insert that
    /// committed before this call.
    #[instrument(skip(self))]
    pub async fn fetch_latest(&self, limit: u64) -> Result<Vec<order::Model>, StoreError> {
        let db = &*self.db_pool;

        let orders = OrderEntity::find()
            .order_by_desc(order::Column::CreatedAt)
            .order_by_desc(order::Column::OrderId)
            .limit(limit)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, limit, "Failed to fetch latest orders");
                StoreError::from(e)
            })?;

        info!(returned_count = orders.len(), limit, "Latest orders fetched");

        Ok(orders)
    }
}
