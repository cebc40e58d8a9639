mod common;

use chrono::NaiveDate;
use futures::future::join_all;
use orderdesk::aggregate::{self, DashboardBreakdown};
use orderdesk::entities::PaymentMethod;
use orderdesk::errors::{StoreError, ValidationFailure};
use orderdesk::services::orders::OrderDraft;
use rust_decimal_macros::dec;
use std::collections::HashSet;

use common::{valid_draft, TestStore};

#[tokio::test]
async fn ensure_schema_is_idempotent() {
    let app = TestStore::new("schema_idempotent").await;

    // Already applied once by the harness; repeating must be a no-op.
    app.store.ensure_schema().await.expect("second run");
    app.store.ensure_schema().await.expect("third run");

    let order_id = app.orders().insert(valid_draft()).await.expect("insert");
    assert!(order_id >= 1);
}

#[tokio::test]
async fn insert_then_fetch_latest_round_trips_normalized_fields() {
    let app = TestStore::new("round_trip").await;

    let draft = OrderDraft {
        customer_id: " c1023 ".to_string(),
        region: "phnom penh".to_string(),
        total_amount: dec!(49.5),
        ..valid_draft()
    };
    let order_id = app.orders().insert(draft).await.expect("insert");

    let rows = app.orders().fetch_latest(1).await.expect("fetch");
    assert_eq!(rows.len(), 1);

    let saved = &rows[0];
    assert_eq!(saved.order_id, order_id);
    assert_eq!(saved.customer_id, "C1023");
    assert_eq!(saved.region, "Phnom Penh");
    assert_eq!(saved.total_amount, dec!(49.5));
    assert_eq!(saved.ship_date, None);
}

#[tokio::test]
async fn insert_rejects_non_positive_amount_without_phantom_row() {
    let app = TestStore::new("non_positive_amount").await;

    for amount in [dec!(0), dec!(-10)] {
        let err = app
            .orders()
            .insert(OrderDraft {
                total_amount: amount,
                ..valid_draft()
            })
            .await
            .expect_err("must reject");
        assert!(matches!(
            err,
            StoreError::ValidationError(ValidationFailure::NonPositiveAmount)
        ));
    }

    let rows = app.orders().fetch_latest(10).await.expect("fetch");
    assert!(rows.is_empty(), "rejected insert must not leave a row");
}

#[tokio::test]
async fn insert_rejects_ship_date_before_order_date() {
    let app = TestStore::new("ship_before_order").await;

    let err = app
        .orders()
        .insert(OrderDraft {
            order_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            ship_date: Some(NaiveDate::from_ymd_opt(2024, 3, 3).unwrap()),
            ..valid_draft()
        })
        .await
        .expect_err("must reject");

    assert!(matches!(
        err,
        StoreError::ValidationError(ValidationFailure::ShipBeforeOrder)
    ));
}

#[tokio::test]
async fn missing_customer_takes_precedence_over_bad_amount() {
    let app = TestStore::new("validation_precedence").await;

    let err = app
        .orders()
        .insert(OrderDraft {
            customer_id: "   ".to_string(),
            total_amount: dec!(-1),
            ..valid_draft()
        })
        .await
        .expect_err("must reject");

    assert!(matches!(
        err,
        StoreError::ValidationError(ValidationFailure::MissingCustomerId)
    ));
}

#[tokio::test]
async fn fetch_latest_respects_limit_and_recency() {
    let app = TestStore::new("latest_ordering").await;

    for i in 1..=5 {
        let draft = OrderDraft {
            customer_id: format!("C{i}"),
            ..valid_draft()
        };
        app.orders().insert(draft).await.expect("insert");
    }

    let rows = app.orders().fetch_latest(3).await.expect("fetch");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].customer_id, "C5");
    assert!(
        rows.windows(2).all(|w| w[0].order_id > w[1].order_id),
        "rows must come back newest first"
    );

    let all = app.orders().fetch_latest(10).await.expect("fetch");
    assert_eq!(all.len(), 5);
}

#[tokio::test]
async fn fetch_latest_on_empty_store_returns_empty() {
    let app = TestStore::new("empty_store").await;

    let rows = app.orders().fetch_latest(200).await.expect("fetch");
    assert!(rows.is_empty());
}

#[tokio::test]
async fn concurrent_inserts_assign_distinct_ids() {
    let app = TestStore::new("concurrent_ids").await;

    let tasks: Vec<_> = (0..12)
        .map(|i| {
            let orders = app.orders().clone();
            tokio::spawn(async move {
                orders
                    .insert(OrderDraft {
                        customer_id: format!("C{i}"),
                        ..valid_draft()
                    })
                    .await
            })
        })
        .collect();

    let ids: Vec<i64> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.expect("task").expect("insert"))
        .collect();

    let distinct: HashSet<i64> = ids.iter().copied().collect();
    assert_eq!(distinct.len(), 12, "order ids must never collide");
}

#[tokio::test]
async fn dashboard_breakdown_over_fetched_records() {
    let app = TestStore::new("dashboard_breakdown").await;

    let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
    let tuesday = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    let fixtures = [
        (monday, PaymentMethod::Card, dec!(10)),
        (monday, PaymentMethod::Cash, dec!(5)),
        (tuesday, PaymentMethod::Card, dec!(7)),
    ];
    for (day, payment_method, amount) in fixtures {
        app.orders()
            .insert(OrderDraft {
                order_date: day,
                payment_method,
                total_amount: amount,
                ..valid_draft()
            })
            .await
            .expect("insert");
    }

    let rows = app.orders().fetch_latest(200).await.expect("fetch");
    let breakdown = DashboardBreakdown::from_orders(&rows);

    assert_eq!(
        breakdown.revenue_by_day,
        vec![(monday, dec!(15)), (tuesday, dec!(7))]
    );
    assert_eq!(breakdown.orders_by_day, vec![(monday, 2), (tuesday, 1)]);
    assert_eq!(
        breakdown.revenue_by_payment_method[&PaymentMethod::Card],
        dec!(17)
    );
    assert_eq!(
        breakdown.revenue_by_payment_method[&PaymentMethod::Cash],
        dec!(5)
    );
    // No fixture carries a category: empty mapping, not an error.
    assert!(breakdown.revenue_by_category.is_empty());

    let by_day = aggregate::count_by(&rows, |o| Some(o.order_date));
    assert_eq!(by_day.len(), 2);
}

#[tokio::test]
async fn unreachable_store_reports_unavailable() {
    // A read-only URL pointing into a directory that doesn't exist cannot be
    // opened, and must fail fast as StoreUnavailable rather than hang.
    let err = orderdesk::db::establish_connection("sqlite://no_such_dir/missing.db?mode=ro")
        .await
        .expect_err("connection must fail");

    assert!(matches!(err, StoreError::StoreUnavailable(_)));
}
