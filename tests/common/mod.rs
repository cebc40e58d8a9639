use std::sync::Arc;

use chrono::NaiveDate;
use orderdesk::db::{self, DbConfig};
use orderdesk::entities::{Channel, OrderStatus, PaymentMethod};
use orderdesk::services::orders::{OrderDraft, OrderService};
use orderdesk::OrderStore;
use rust_decimal_macros::dec;

/// Helper harness spinning up an order store backed by a file-based SQLite
/// database with a fresh schema.
pub struct TestStore {
    pub store: OrderStore,
}

impl TestStore {
    /// Construct a new test store with fresh database state.
    ///
    /// `name` keys the database file so concurrently running tests don't
    /// share state.
    pub async fn new(name: &str) -> Self {
        let db_file = format!("orderdesk_test_{name}.db");
        let _ = std::fs::remove_file(&db_file);

        let cfg = DbConfig {
            url: format!("sqlite://{db_file}?mode=rwc"),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };

        let pool = db::establish_connection_with_config(&cfg)
            .await
            .expect("failed to create test database");

        let store = OrderStore::from_pool(Arc::new(pool));
        store
            .ensure_schema()
            .await
            .expect("failed to apply migrations");

        Self { store }
    }

    pub fn orders(&self) -> &OrderService {
        self.store.orders()
    }
}

/// A draft that passes every validation check.
pub fn valid_draft() -> OrderDraft {
    OrderDraft {
        customer_id: "C1023".to_string(),
        order_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        ship_date: None,
        status: OrderStatus::Pending,
        channel: Channel::Website,
        category: None,
        total_amount: dec!(49.50),
        discount_pct: None,
        payment_method: PaymentMethod::Card,
        region: "Phnom Penh".to_string(),
    }
}
