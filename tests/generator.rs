use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, TimeZone, Utc};
use ecom_ingest::{
    error::IngestError,
    generator::{self, GenerationParams, WINDOW_DAYS, cities_for, round2},
    integrity,
    models::{Dataset, OrderItem, OrderStatus},
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn params(seed: u64, customers: usize, products: usize, orders: usize) -> GenerationParams {
    GenerationParams {
        seed,
        customers,
        products,
        orders,
    }
}

fn generate(seed: u64, customers: usize, products: usize, orders: usize) -> Dataset {
    generator::generate(&params(seed, customers, products, orders), anchor()).unwrap()
}

fn items_by_order(items: &[OrderItem]) -> HashMap<&str, Vec<&OrderItem>> {
    let mut grouped: HashMap<&str, Vec<&OrderItem>> = HashMap::new();
    for item in items {
        grouped.entry(item.order_id.as_str()).or_default().push(item);
    }
    grouped
}

#[test]
fn same_seed_and_counts_give_identical_datasets() {
    let first = generate(42, 50, 20, 200);
    let second = generate(42, 50, 20, 200);
    assert_eq!(first, second);
}

#[test]
fn different_seeds_give_different_datasets() {
    let first = generate(1, 50, 20, 200);
    let second = generate(2, 50, 20, 200);
    assert_ne!(first, second);
}

#[test]
fn injected_rng_matches_seeded_generation() {
    let p = params(7, 30, 10, 80);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let injected = generator::generate_with_rng(&mut rng, &p, anchor()).unwrap();
    assert_eq!(injected, generator::generate(&p, anchor()).unwrap());
}

#[test]
fn seed_42_small_run_has_expected_shape() {
    let dataset = generate(42, 10, 5, 20);

    assert_eq!(dataset.customers.len(), 10);
    assert_eq!(dataset.products.len(), 5);
    assert_eq!(dataset.orders.len(), 20);
    assert!((20..=100).contains(&dataset.order_items.len()));
    assert!(
        (16..=20).contains(&dataset.payments.len()),
        "got {} payments",
        dataset.payments.len()
    );

    let payable = dataset
        .orders
        .iter()
        .filter(|o| o.status.is_payable())
        .count();
    assert_eq!(dataset.payments.len(), payable);
}

#[test]
fn ids_are_sequential_and_zero_padded() {
    let dataset = generate(3, 3, 3, 3);
    assert_eq!(dataset.customers[2].customer_id, "C000002");
    assert_eq!(dataset.products[0].product_id, "P000000");
    assert_eq!(dataset.orders[1].order_id, "O0000001");
}

#[test]
fn every_city_belongs_to_its_country() {
    let dataset = generate(11, 500, 5, 5);
    for customer in &dataset.customers {
        let cities = cities_for(&customer.country)
            .unwrap_or_else(|| panic!("unknown country {}", customer.country));
        assert!(
            cities.contains(&customer.city.as_str()),
            "{} is not in {}",
            customer.city,
            customer.country
        );
    }
}

#[test]
fn order_items_reference_orders_and_products_of_the_run() {
    let dataset = generate(5, 40, 30, 300);
    let order_ids: HashSet<_> = dataset.orders.iter().map(|o| o.order_id.as_str()).collect();
    let product_ids: HashSet<_> = dataset
        .products
        .iter()
        .map(|p| p.product_id.as_str())
        .collect();
    let customer_ids: HashSet<_> = dataset
        .customers
        .iter()
        .map(|c| c.customer_id.as_str())
        .collect();

    for item in &dataset.order_items {
        assert!(order_ids.contains(item.order_id.as_str()));
        assert!(product_ids.contains(item.product_id.as_str()));
    }
    for order in &dataset.orders {
        assert!(customer_ids.contains(order.customer_id.as_str()));
    }
}

#[test]
fn exactly_one_payment_per_payable_order() {
    let dataset = generate(9, 40, 30, 500);
    let mut payments: HashMap<&str, usize> = HashMap::new();
    for payment in &dataset.payments {
        *payments.entry(payment.order_id.as_str()).or_default() += 1;
    }

    for order in &dataset.orders {
        let count = payments.get(order.order_id.as_str()).copied().unwrap_or(0);
        match order.status {
            OrderStatus::Cancelled => assert_eq!(count, 0, "{}", order.order_id),
            _ => assert_eq!(count, 1, "{}", order.order_id),
        }
    }
}

#[test]
fn payment_amount_is_rounded_sum_of_lines() {
    let dataset = generate(13, 40, 30, 500);
    let grouped = items_by_order(&dataset.order_items);

    for payment in &dataset.payments {
        let total: f64 = grouped[payment.order_id.as_str()]
            .iter()
            .map(|i| f64::from(i.quantity) * i.unit_price)
            .sum();
        assert!(
            (round2(total) - payment.amount).abs() <= 0.01,
            "{}: {} vs {}",
            payment.order_id,
            total,
            payment.amount
        );
    }
}

#[test]
fn lines_are_distinct_bounded_and_priced_from_catalogue() {
    let dataset = generate(21, 40, 30, 400);
    let prices: HashMap<_, _> = dataset
        .products
        .iter()
        .map(|p| (p.product_id.as_str(), p.price))
        .collect();

    let grouped = items_by_order(&dataset.order_items);
    assert_eq!(grouped.len(), dataset.orders.len());
    for (order_id, lines) in grouped {
        assert!((1..=5).contains(&lines.len()), "{order_id}");
        let distinct: HashSet<_> = lines.iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(distinct.len(), lines.len(), "{order_id}");
        for line in lines {
            assert!((1..=3).contains(&line.quantity));
            assert_eq!(line.unit_price, prices[line.product_id.as_str()]);
        }
    }
}

#[test]
fn line_count_is_clamped_to_small_catalogue() {
    let dataset = generate(4, 5, 2, 200);
    for (order_id, lines) in items_by_order(&dataset.order_items) {
        assert!(lines.len() <= 2, "{order_id} has {} lines", lines.len());
        let distinct: HashSet<_> = lines.iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(distinct.len(), lines.len());
    }
}

#[test]
fn prices_are_floored_and_rounded() {
    let dataset = generate(8, 1, 1000, 1);
    for product in &dataset.products {
        assert!(product.price >= 5.0);
        assert_eq!(round2(product.price), product.price);
    }
}

#[test]
fn timestamps_stay_in_trailing_window() {
    let dataset = generate(17, 300, 20, 1000);
    let start = anchor() - Duration::days(WINDOW_DAYS);

    for customer in &dataset.customers {
        assert!(customer.created_at >= start && customer.created_at <= anchor());
    }
    for order in &dataset.orders {
        assert!(order.order_ts >= start && order.order_ts <= anchor());
    }

    let order_ts: HashMap<_, _> = dataset
        .orders
        .iter()
        .map(|o| (o.order_id.as_str(), o.order_ts))
        .collect();
    for payment in &dataset.payments {
        let delay = payment.paid_ts - order_ts[payment.order_id.as_str()];
        assert!(delay >= Duration::minutes(1) && delay <= Duration::minutes(180));
    }
}

#[test]
fn orders_skew_toward_end_of_window() {
    let dataset = generate(23, 50, 20, 2000);
    let midpoint = anchor() - Duration::days(WINDOW_DAYS / 2);
    let late = dataset
        .orders
        .iter()
        .filter(|o| o.order_ts >= midpoint)
        .count();
    assert!(late > dataset.orders.len() * 3 / 5, "only {late} late orders");
}

#[test]
fn generated_dataset_passes_integrity_check() {
    let dataset = generate(31, 200, 60, 1500);
    assert!(integrity::find_violations(&dataset).is_empty());
}

#[test]
fn zero_counts_are_rejected() {
    for p in [params(1, 0, 5, 5), params(1, 5, 0, 5), params(1, 5, 5, 0)] {
        let err = generator::generate(&p, anchor()).unwrap_err();
        assert!(matches!(err, IngestError::InvalidParams(_)), "{err}");
    }
}
