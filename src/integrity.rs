//! Cross-entity consistency checks on a generated [`Dataset`].

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::error::{IngestError, IngestResult};
use crate::generator::{cities_for, round2};
use crate::models::Dataset;

/// Allowed gap between a payment amount and its recomputed order total.
pub const AMOUNT_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("duplicate {entity} id {id}")]
    DuplicateId { entity: &'static str, id: String },

    #[error("customer {customer_id} lives in {city}, which is not a city of {country}")]
    CityOutsideCountry {
        customer_id: String,
        country: String,
        city: String,
    },

    #[error("order {order_id} references unknown customer {customer_id}")]
    UnknownCustomer {
        order_id: String,
        customer_id: String,
    },

    #[error("order item references unknown order {order_id}")]
    ItemForUnknownOrder { order_id: String },

    #[error("order item of {order_id} references unknown product {product_id}")]
    UnknownProduct {
        order_id: String,
        product_id: String,
    },

    #[error("payment references unknown order {order_id}")]
    PaymentForUnknownOrder { order_id: String },

    #[error("cancelled order {order_id} has a payment")]
    PaymentForCancelledOrder { order_id: String },

    #[error("order {order_id} has {count} payments, expected 1")]
    PaymentCount { order_id: String, count: usize },

    #[error("payment for {order_id} is {actual}, order total is {expected}")]
    AmountMismatch {
        order_id: String,
        expected: f64,
        actual: f64,
    },

    #[error("payment for {order_id} predates its order")]
    PaidBeforeOrdered { order_id: String },
}

/// Every violation found, in entity order. Empty for a consistent dataset.
pub fn find_violations(dataset: &Dataset) -> Vec<Violation> {
    let mut violations = Vec::new();

    let customer_ids = unique_ids(
        "customer",
        dataset.customers.iter().map(|c| c.customer_id.as_str()),
        &mut violations,
    );
    let product_ids = unique_ids(
        "product",
        dataset.products.iter().map(|p| p.product_id.as_str()),
        &mut violations,
    );
    unique_ids(
        "order",
        dataset.orders.iter().map(|o| o.order_id.as_str()),
        &mut violations,
    );

    for customer in &dataset.customers {
        let known = cities_for(&customer.country)
            .is_some_and(|cities| cities.contains(&customer.city.as_str()));
        if !known {
            violations.push(Violation::CityOutsideCountry {
                customer_id: customer.customer_id.clone(),
                country: customer.country.clone(),
                city: customer.city.clone(),
            });
        }
    }

    let orders: HashMap<&str, _> = dataset
        .orders
        .iter()
        .map(|o| (o.order_id.as_str(), o))
        .collect();

    for order in &dataset.orders {
        if !customer_ids.contains(order.customer_id.as_str()) {
            violations.push(Violation::UnknownCustomer {
                order_id: order.order_id.clone(),
                customer_id: order.customer_id.clone(),
            });
        }
    }

    let mut totals: HashMap<&str, f64> = HashMap::new();
    for item in &dataset.order_items {
        if !orders.contains_key(item.order_id.as_str()) {
            violations.push(Violation::ItemForUnknownOrder {
                order_id: item.order_id.clone(),
            });
        }
        if !product_ids.contains(item.product_id.as_str()) {
            violations.push(Violation::UnknownProduct {
                order_id: item.order_id.clone(),
                product_id: item.product_id.clone(),
            });
        }
        *totals.entry(item.order_id.as_str()).or_default() +=
            f64::from(item.quantity) * item.unit_price;
    }

    let mut payment_counts: HashMap<&str, usize> = HashMap::new();
    for payment in &dataset.payments {
        *payment_counts.entry(payment.order_id.as_str()).or_default() += 1;

        let Some(order) = orders.get(payment.order_id.as_str()) else {
            violations.push(Violation::PaymentForUnknownOrder {
                order_id: payment.order_id.clone(),
            });
            continue;
        };

        if !order.status.is_payable() {
            violations.push(Violation::PaymentForCancelledOrder {
                order_id: payment.order_id.clone(),
            });
        }
        if payment.paid_ts < order.order_ts {
            violations.push(Violation::PaidBeforeOrdered {
                order_id: payment.order_id.clone(),
            });
        }

        let expected = round2(totals.get(payment.order_id.as_str()).copied().unwrap_or(0.0));
        if (expected - payment.amount).abs() > AMOUNT_TOLERANCE {
            violations.push(Violation::AmountMismatch {
                order_id: payment.order_id.clone(),
                expected,
                actual: payment.amount,
            });
        }
    }

    for order in dataset.orders.iter().filter(|o| o.status.is_payable()) {
        let count = payment_counts
            .get(order.order_id.as_str())
            .copied()
            .unwrap_or(0);
        if count != 1 {
            violations.push(Violation::PaymentCount {
                order_id: order.order_id.clone(),
                count,
            });
        }
    }

    violations
}

/// Fails with the first violation, if any.
pub fn verify(dataset: &Dataset) -> IngestResult<()> {
    let violations = find_violations(dataset);
    let count = violations.len();
    match violations.into_iter().next() {
        Some(first) => Err(IngestError::Integrity { first, count }),
        None => Ok(()),
    }
}

fn unique_ids<'a>(
    entity: &'static str,
    ids: impl Iterator<Item = &'a str>,
    violations: &mut Vec<Violation>,
) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            violations.push(Violation::DuplicateId {
                entity,
                id: id.to_string(),
            });
        }
    }
    seen
}
