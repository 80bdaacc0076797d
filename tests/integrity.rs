use chrono::{Duration, TimeZone, Utc};
use ecom_ingest::{
    error::IngestError,
    generator::{self, GenerationParams},
    integrity::{self, Violation},
    models::{Dataset, OrderStatus},
};

fn dataset() -> Dataset {
    let params = GenerationParams {
        seed: 99,
        customers: 20,
        products: 15,
        orders: 60,
    };
    let anchor = Utc.with_ymd_and_hms(2025, 1, 15, 8, 30, 0).unwrap();
    generator::generate(&params, anchor).unwrap()
}

#[test]
fn clean_dataset_verifies() {
    assert!(integrity::verify(&dataset()).is_ok());
}

#[test]
fn detects_city_outside_country() {
    let mut data = dataset();
    data.customers[0].country = "FR".into();
    data.customers[0].city = "Berlin".into();

    let violations = integrity::find_violations(&data);
    assert!(violations.contains(&Violation::CityOutsideCountry {
        customer_id: data.customers[0].customer_id.clone(),
        country: "FR".into(),
        city: "Berlin".into(),
    }));
}

#[test]
fn detects_dangling_references() {
    let mut data = dataset();
    data.order_items[0].product_id = "P999999".into();
    data.orders[0].customer_id = "C999999".into();

    let violations = integrity::find_violations(&data);
    assert!(violations.iter().any(|v| matches!(
        v,
        Violation::UnknownProduct { product_id, .. } if product_id == "P999999"
    )));
    assert!(violations.iter().any(|v| matches!(
        v,
        Violation::UnknownCustomer { customer_id, .. } if customer_id == "C999999"
    )));
}

#[test]
fn detects_payment_on_cancelled_order() {
    let mut data = dataset();
    let paid_order = data.payments[0].order_id.clone();
    let order = data
        .orders
        .iter_mut()
        .find(|o| o.order_id == paid_order)
        .unwrap();
    order.status = OrderStatus::Cancelled;

    let violations = integrity::find_violations(&data);
    assert!(violations.contains(&Violation::PaymentForCancelledOrder {
        order_id: paid_order
    }));
}

#[test]
fn detects_missing_payment_and_wrong_amount() {
    let mut data = dataset();
    let dropped = data.payments.remove(0);
    data.payments[0].amount += 1.0;
    let mismatched = data.payments[0].order_id.clone();

    let violations = integrity::find_violations(&data);
    assert!(violations.contains(&Violation::PaymentCount {
        order_id: dropped.order_id,
        count: 0,
    }));
    assert!(violations.iter().any(|v| matches!(
        v,
        Violation::AmountMismatch { order_id, .. } if *order_id == mismatched
    )));
}

#[test]
fn detects_payment_before_order() {
    let mut data = dataset();
    data.payments[0].paid_ts -= Duration::days(2);
    let order_id = data.payments[0].order_id.clone();

    let violations = integrity::find_violations(&data);
    assert!(violations.contains(&Violation::PaidBeforeOrdered { order_id }));
}

#[test]
fn verify_reports_first_violation_and_count() {
    let mut data = dataset();
    data.customers.push(data.customers[0].clone());
    data.customers[1].city = "Atlantis".into();

    match integrity::verify(&data) {
        Err(IngestError::Integrity { first, count }) => {
            assert!(matches!(first, Violation::DuplicateId { entity: "customer", .. }));
            assert_eq!(count, 2);
        }
        other => panic!("expected integrity error, got {other:?}"),
    }
}
