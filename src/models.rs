use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{RawRecord, TableSpec, Value};
use crate::tables;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Electronics,
    Fashion,
    Home,
    Beauty,
    Sports,
    Books,
    Grocery,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Electronics,
        Category::Fashion,
        Category::Home,
        Category::Beauty,
        Category::Sports,
        Category::Books,
        Category::Grocery,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Electronics => "electronics",
            Category::Fashion => "fashion",
            Category::Home => "home",
            Category::Beauty => "beauty",
            Category::Sports => "sports",
            Category::Books => "books",
            Category::Grocery => "grocery",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Cancelled orders never receive a payment.
    pub fn is_payable(self) -> bool {
        self != OrderStatus::Cancelled
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    Paypal,
    BankTransfer,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::BankTransfer => "bank_transfer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: String,
    pub created_at: DateTime<Utc>,
    pub country: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    pub category: Category,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub customer_id: String,
    pub order_ts: DateTime<Utc>,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub order_id: String,
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub order_id: String,
    pub payment_method: PaymentMethod,
    pub amount: f64,
    pub paid_ts: DateTime<Utc>,
}

/// The five collections produced by one generation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub customers: Vec<Customer>,
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
    pub payments: Vec<Payment>,
}

impl Dataset {
    pub fn counts(&self) -> TableCounts {
        TableCounts {
            customers: self.customers.len() as u64,
            products: self.products.len() as u64,
            orders: self.orders.len() as u64,
            order_items: self.order_items.len() as u64,
            payments: self.payments.len() as u64,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub customers: u64,
    pub products: u64,
    pub orders: u64,
    pub order_items: u64,
    pub payments: u64,
}

impl TableCounts {
    pub fn total(&self) -> u64 {
        self.customers + self.products + self.orders + self.order_items + self.payments
    }
}

impl RawRecord for Customer {
    fn table() -> &'static TableSpec {
        &tables::RAW_CUSTOMERS
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.customer_id.clone()),
            Value::Timestamp(self.created_at),
            Value::Text(self.country.clone()),
            Value::Text(self.city.clone()),
        ]
    }
}

impl RawRecord for Product {
    fn table() -> &'static TableSpec {
        &tables::RAW_PRODUCTS
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.product_id.clone()),
            Value::Text(self.category.as_str().to_string()),
            Value::Float(self.price),
        ]
    }
}

impl RawRecord for Order {
    fn table() -> &'static TableSpec {
        &tables::RAW_ORDERS
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.order_id.clone()),
            Value::Text(self.customer_id.clone()),
            Value::Timestamp(self.order_ts),
            Value::Text(self.status.as_str().to_string()),
        ]
    }
}

impl RawRecord for OrderItem {
    fn table() -> &'static TableSpec {
        &tables::RAW_ORDER_ITEMS
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.order_id.clone()),
            Value::Text(self.product_id.clone()),
            Value::Integer(i64::from(self.quantity)),
            Value::Float(self.unit_price),
        ]
    }
}

impl RawRecord for Payment {
    fn table() -> &'static TableSpec {
        &tables::RAW_PAYMENTS
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.order_id.clone()),
            Value::Text(self.payment_method.as_str().to_string()),
            Value::Float(self.amount),
            Value::Timestamp(self.paid_ts),
        ]
    }
}
