//! Pure grouping helpers over an in-memory order set.
//!
//! These take the slice produced by `fetch_latest` and never touch the store;
//! absence of data is a valid result (empty mapping), distinct from a store
//! failure. The generic maps are order-irrelevant — the day-series helpers
//! sort chronologically because the dashboard consumes them as time series.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::entities::order;
use crate::entities::PaymentMethod;

/// Sums `value` per distinct key across the records.
///
/// Records for which `key` returns `None` are skipped, so optional grouping
/// fields (like category) simply drop out. The result's key domain is exactly
/// the distinct keys present in the input; no zero-fill for absent keys.
pub fn sum_by<K, KF, VF>(records: &[order::Model], key: KF, value: VF) -> HashMap<K, Decimal>
where
    K: Eq + Hash,
    KF: Fn(&order::Model) -> Option<K>,
    VF: Fn(&order::Model) -> Decimal,
{
    let mut totals: HashMap<K, Decimal> = HashMap::new();
    for record in records {
        if let Some(k) = key(record) {
            *totals.entry(k).or_insert(Decimal::ZERO) += value(record);
        }
    }
    totals
}

/// Counts records per distinct key; `None` keys are skipped as in [`sum_by`].
pub fn count_by<K, KF>(records: &[order::Model], key: KF) -> HashMap<K, u64>
where
    K: Eq + Hash,
    KF: Fn(&order::Model) -> Option<K>,
{
    let mut counts: HashMap<K, u64> = HashMap::new();
    for record in records {
        if let Some(k) = key(record) {
            *counts.entry(k).or_insert(0) += 1;
        }
    }
    counts
}

/// Revenue bucketed by calendar order date, chronologically sorted.
pub fn revenue_by_day(records: &[order::Model]) -> Vec<(NaiveDate, Decimal)> {
    let totals = sum_by(records, |o| Some(o.order_date), |o| o.total_amount);
    let mut series: Vec<(NaiveDate, Decimal)> = totals.into_iter().collect();
    series.sort_by_key(|(day, _)| *day);
    series
}

/// Order count bucketed by calendar order date, chronologically sorted.
pub fn orders_by_day(records: &[order::Model]) -> Vec<(NaiveDate, u64)> {
    let counts = count_by(records, |o| Some(o.order_date));
    let mut series: Vec<(NaiveDate, u64)> = counts.into_iter().collect();
    series.sort_by_key(|(day, _)| *day);
    series
}

/// Revenue per payment method.
pub fn revenue_by_payment_method(records: &[order::Model]) -> HashMap<PaymentMethod, Decimal> {
    sum_by(records, |o| Some(o.payment_method), |o| o.total_amount)
}

/// Revenue per category.
///
/// Records without a category are skipped; when no record carries one the
/// result is empty, signaling the caller to render a placeholder.
pub fn revenue_by_category(records: &[order::Model]) -> HashMap<String, Decimal> {
    sum_by(records, |o| o.category.clone(), |o| o.total_amount)
}

/// The grouped views the dashboard renders from one `fetch_latest` batch.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardBreakdown {
    pub revenue_by_day: Vec<(NaiveDate, Decimal)>,
    pub orders_by_day: Vec<(NaiveDate, u64)>,
    pub revenue_by_payment_method: HashMap<PaymentMethod, Decimal>,
    pub revenue_by_category: HashMap<String, Decimal>,
}

impl DashboardBreakdown {
    pub fn from_orders(records: &[order::Model]) -> Self {
        Self {
            revenue_by_day: revenue_by_day(records),
            orders_by_day: orders_by_day(records),
            revenue_by_payment_method: revenue_by_payment_method(records),
            revenue_by_category: revenue_by_category(records),
        }
    }
}
