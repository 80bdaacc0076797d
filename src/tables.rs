//! Layout of the raw tables consumed by the downstream transformations.
//!
//! Column order here matches both the CSV headers and the `values()` order of
//! each [`RawRecord`](crate::store::RawRecord) implementation.

use crate::store::{ColumnSpec, ColumnType, IndexSpec, TableSpec};

pub const RAW_SCHEMA: &str = "raw";

pub const RAW_CUSTOMERS: TableSpec = TableSpec {
    schema: RAW_SCHEMA,
    name: "raw_customers",
    columns: &[
        ColumnSpec::new("customer_id", ColumnType::Text),
        ColumnSpec::new("created_at", ColumnType::Timestamp),
        ColumnSpec::new("country", ColumnType::Text),
        ColumnSpec::new("city", ColumnType::Text),
    ],
};

pub const RAW_PRODUCTS: TableSpec = TableSpec {
    schema: RAW_SCHEMA,
    name: "raw_products",
    columns: &[
        ColumnSpec::new("product_id", ColumnType::Text),
        ColumnSpec::new("category", ColumnType::Text),
        ColumnSpec::new("price", ColumnType::Float),
    ],
};

pub const RAW_ORDERS: TableSpec = TableSpec {
    schema: RAW_SCHEMA,
    name: "raw_orders",
    columns: &[
        ColumnSpec::new("order_id", ColumnType::Text),
        ColumnSpec::new("customer_id", ColumnType::Text),
        ColumnSpec::new("order_ts", ColumnType::Timestamp),
        ColumnSpec::new("status", ColumnType::Text),
    ],
};

pub const RAW_ORDER_ITEMS: TableSpec = TableSpec {
    schema: RAW_SCHEMA,
    name: "raw_order_items",
    columns: &[
        ColumnSpec::new("order_id", ColumnType::Text),
        ColumnSpec::new("product_id", ColumnType::Text),
        ColumnSpec::new("quantity", ColumnType::Integer),
        ColumnSpec::new("unit_price", ColumnType::Float),
    ],
};

pub const RAW_PAYMENTS: TableSpec = TableSpec {
    schema: RAW_SCHEMA,
    name: "raw_payments",
    columns: &[
        ColumnSpec::new("order_id", ColumnType::Text),
        ColumnSpec::new("payment_method", ColumnType::Text),
        ColumnSpec::new("amount", ColumnType::Float),
        ColumnSpec::new("paid_ts", ColumnType::Timestamp),
    ],
};

/// Tables in load order: parents before children.
pub const ALL_TABLES: [&TableSpec; 5] = [
    &RAW_CUSTOMERS,
    &RAW_PRODUCTS,
    &RAW_ORDERS,
    &RAW_ORDER_ITEMS,
    &RAW_PAYMENTS,
];

pub const RAW_INDEXES: [IndexSpec; 3] = [
    IndexSpec {
        name: "idx_raw_orders_customer",
        table: &RAW_ORDERS,
        column: "customer_id",
    },
    IndexSpec {
        name: "idx_raw_items_order",
        table: &RAW_ORDER_ITEMS,
        column: "order_id",
    },
    IndexSpec {
        name: "idx_raw_payments_order",
        table: &RAW_PAYMENTS,
        column: "order_id",
    },
];
