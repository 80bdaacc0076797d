//! Deterministic synthetic e-commerce data.
//!
//! All draws come from one RNG, so a seed, a set of counts and an anchor
//! time fully determine the generated [`Dataset`].

use chrono::{DateTime, Duration, Utc};
use rand::distr::weighted::WeightedIndex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, LogNormal, Triangular};

use crate::error::{IngestError, IngestResult};
use crate::models::{
    Category, Customer, Dataset, Order, OrderItem, OrderStatus, Payment, PaymentMethod, Product,
};

/// Length of the trailing window that customer and order timestamps fall in.
pub const WINDOW_DAYS: i64 = 365;

/// Countries and the cities a customer from each may live in.
pub static COUNTRY_CITIES: [(&str, [&str; 5]); 7] = [
    ("FR", ["Paris", "Lyon", "Marseille", "Lille", "Toulouse"]),
    ("BE", ["Bruxelles", "Anvers", "Gand", "Liège", "Charleroi"]),
    ("DZ", ["Alger", "Oran", "Constantine", "Annaba", "Sétif"]),
    ("DE", ["Berlin", "Munich", "Hamburg", "Cologne", "Frankfurt"]),
    ("NL", ["Amsterdam", "Rotterdam", "Utrecht", "Eindhoven", "The Hague"]),
    ("ES", ["Madrid", "Barcelona", "Valencia", "Seville", "Bilbao"]),
    ("IT", ["Milan", "Rome", "Turin", "Naples", "Bologna"]),
];

const LAST_DAY: i64 = WINDOW_DAYS - 1;
const SECONDS_PER_DAY: i64 = 86_400;

const PRICE_LOG_MEAN: f64 = 3.2;
const PRICE_LOG_SIGMA: f64 = 0.5;
const PRICE_FLOOR: f64 = 5.0;

/// Order days skew toward the end of the window.
const ORDER_DAY_MODE: f64 = 320.0;

const MAX_ITEMS_PER_ORDER: usize = 5;
const MAX_QUANTITY: u32 = 3;
const MAX_PAYMENT_DELAY_MINUTES: i64 = 180;

const ORDER_STATUS_WEIGHTS: [(OrderStatus, f64); 4] = [
    (OrderStatus::Paid, 0.35),
    (OrderStatus::Shipped, 0.25),
    (OrderStatus::Delivered, 0.30),
    (OrderStatus::Cancelled, 0.10),
];

const PAYMENT_METHOD_WEIGHTS: [(PaymentMethod, f64); 3] = [
    (PaymentMethod::Card, 0.75),
    (PaymentMethod::Paypal, 0.20),
    (PaymentMethod::BankTransfer, 0.05),
];

pub fn cities_for(country: &str) -> Option<&'static [&'static str]> {
    COUNTRY_CITIES
        .iter()
        .find(|(code, _)| *code == country)
        .map(|(_, cities)| cities.as_slice())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationParams {
    pub seed: u64,
    pub customers: usize,
    pub products: usize,
    pub orders: usize,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            seed: 42,
            customers: 5000,
            products: 800,
            orders: 20000,
        }
    }
}

impl GenerationParams {
    pub fn validate(&self) -> IngestResult<()> {
        for (name, count) in [
            ("customers", self.customers),
            ("products", self.products),
            ("orders", self.orders),
        ] {
            if count == 0 {
                return Err(IngestError::InvalidParams(format!(
                    "{name} count must be positive"
                )));
            }
        }
        Ok(())
    }
}

/// Generate a dataset whose timestamps trail `anchor`, seeding a fresh
/// `ChaCha8Rng` from `params.seed`.
pub fn generate(params: &GenerationParams, anchor: DateTime<Utc>) -> IngestResult<Dataset> {
    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
    generate_with_rng(&mut rng, params, anchor)
}

/// Like [`generate`], drawing from a caller-supplied RNG. `params.seed` is ignored.
pub fn generate_with_rng<R: Rng + ?Sized>(
    rng: &mut R,
    params: &GenerationParams,
    anchor: DateTime<Utc>,
) -> IngestResult<Dataset> {
    params.validate()?;
    let window_start = anchor - Duration::days(WINDOW_DAYS);

    let customers = generate_customers(rng, params.customers, window_start);
    let products = generate_products(rng, params.products)?;
    let (orders, order_items, payments) =
        generate_orders(rng, params.orders, &customers, &products, window_start)?;

    tracing::debug!(
        customers = customers.len(),
        products = products.len(),
        orders = orders.len(),
        order_items = order_items.len(),
        payments = payments.len(),
        "generated dataset"
    );

    Ok(Dataset {
        customers,
        products,
        orders,
        order_items,
        payments,
    })
}

fn generate_customers<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    window_start: DateTime<Utc>,
) -> Vec<Customer> {
    (0..count)
        .map(|i| {
            let (country, cities) = &COUNTRY_CITIES[rng.random_range(0..COUNTRY_CITIES.len())];
            let city = cities[rng.random_range(0..cities.len())];
            let created_at = window_start
                + Duration::days(rng.random_range(0..=LAST_DAY))
                + Duration::seconds(rng.random_range(0..=SECONDS_PER_DAY));

            Customer {
                customer_id: format!("C{i:06}"),
                created_at,
                country: country.to_string(),
                city: city.to_string(),
            }
        })
        .collect()
}

fn generate_products<R: Rng + ?Sized>(rng: &mut R, count: usize) -> IngestResult<Vec<Product>> {
    let price_dist = LogNormal::new(PRICE_LOG_MEAN, PRICE_LOG_SIGMA)
        .map_err(|e| IngestError::Generation(format!("price distribution: {e}")))?;

    let products = (0..count)
        .map(|i| {
            let price = round2(price_dist.sample(rng).max(PRICE_FLOOR));
            let category = Category::ALL[rng.random_range(0..Category::ALL.len())];
            Product {
                product_id: format!("P{i:06}"),
                category,
                price,
            }
        })
        .collect();

    Ok(products)
}

/// Orders together with their line items and, unless cancelled, their payment.
fn generate_orders<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    customers: &[Customer],
    products: &[Product],
    window_start: DateTime<Utc>,
) -> IngestResult<(Vec<Order>, Vec<OrderItem>, Vec<Payment>)> {
    let day_dist = Triangular::new(0.0, LAST_DAY as f64, ORDER_DAY_MODE)
        .map_err(|e| IngestError::Generation(format!("order day distribution: {e}")))?;
    let status_dist = WeightedIndex::new(ORDER_STATUS_WEIGHTS.iter().map(|(_, w)| *w))
        .map_err(|e| IngestError::Generation(format!("order status weights: {e}")))?;
    let method_dist = WeightedIndex::new(PAYMENT_METHOD_WEIGHTS.iter().map(|(_, w)| *w))
        .map_err(|e| IngestError::Generation(format!("payment method weights: {e}")))?;

    // More than the catalogue holds cannot be drawn without replacement.
    let max_items = MAX_ITEMS_PER_ORDER.min(products.len());

    let mut orders = Vec::with_capacity(count);
    let mut order_items = Vec::with_capacity(count * 3);
    let mut payments = Vec::with_capacity(count);

    for i in 0..count {
        let order_id = format!("O{i:07}");
        let customer = &customers[rng.random_range(0..customers.len())];
        let day_offset = day_dist.sample(rng).floor() as i64;
        let order_ts = window_start
            + Duration::days(day_offset)
            + Duration::seconds(rng.random_range(0..=SECONDS_PER_DAY));
        let status = ORDER_STATUS_WEIGHTS[status_dist.sample(rng)].0;

        let line_count = rng.random_range(1..=max_items);
        let mut total = 0.0;
        for index in rand::seq::index::sample(rng, products.len(), line_count) {
            let product = &products[index];
            let quantity = rng.random_range(1..=MAX_QUANTITY);
            total += f64::from(quantity) * product.price;
            order_items.push(OrderItem {
                order_id: order_id.clone(),
                product_id: product.product_id.clone(),
                quantity,
                unit_price: product.price,
            });
        }

        if status.is_payable() {
            let payment_method = PAYMENT_METHOD_WEIGHTS[method_dist.sample(rng)].0;
            let delay = Duration::minutes(rng.random_range(1..=MAX_PAYMENT_DELAY_MINUTES));
            payments.push(Payment {
                order_id: order_id.clone(),
                payment_method,
                amount: round2(total),
                paid_ts: order_ts + delay,
            });
        }

        orders.push(Order {
            order_id,
            customer_id: customer.customer_id.clone(),
            order_ts,
            status,
        });
    }

    Ok((orders, order_items, payments))
}

/// Round half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
