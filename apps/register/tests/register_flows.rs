//! End-to-end register flows through the command layer.

use std::sync::Arc;

use tally_core::{Catalog, Customer, PaymentMethod, ReportPeriod, TransactionStatus};
use tally_register::commands::{cart, customer, product, refund, report, sale, session};
use tally_register::error::ErrorCode;
use tally_register::seed;
use tally_register::state::{CartState, ConfigState, SessionState, StoreState};

struct Register {
    store: StoreState,
    cart: CartState,
    session: SessionState,
    config: ConfigState,
}

fn register() -> Register {
    Register {
        store: StoreState::new(seed::demo_store().unwrap()),
        cart: CartState::new(),
        session: SessionState::new(),
        config: ConfigState::default(),
    }
}

fn stock_of(r: &Register, product_id: &str) -> i64 {
    r.store
        .with_store(|s| s.catalog.get(product_id).map(|p| p.stock))
        .unwrap()
}

#[test]
fn test_scan_and_checkout() {
    let r = register();
    session::sign_in(&r.store, &r.session, "cashier").unwrap();

    let response = cart::scan_barcode(&r.store, &r.cart, "123456789015").unwrap();
    assert_eq!(response.lines.len(), 1);
    assert_eq!(response.totals.grand_total.cents(), 1455);

    let receipt =
        sale::checkout(&r.store, &r.cart, &r.session, &r.config, PaymentMethod::Cash).unwrap();

    assert_eq!(receipt.total_cents, 1455);
    assert_eq!(receipt.total, "$14.55");
    assert_eq!(receipt.cashier, "Cashier User");
    assert_eq!(receipt.items[0].hsn_code.as_deref(), Some("6912"));
    assert!(receipt.receipt_number.ends_with("-0001"));
    assert_eq!(stock_of(&r, "4"), 24);
    assert!(cart::get_cart(&r.cart).lines.is_empty());

    let again = sale::get_receipt(&r.store, &r.config, &receipt.transaction_id).unwrap();
    assert_eq!(again.receipt_number, receipt.receipt_number);
    assert_eq!(sale::list_transactions(&r.store).len(), 1);
}

#[test]
fn test_checkout_requires_cashier() {
    let r = register();
    cart::add_to_cart(&r.store, &r.cart, "4", None).unwrap();

    let err = sale::checkout(&r.store, &r.cart, &r.session, &r.config, PaymentMethod::Card)
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::NoActiveCashier);
    assert_eq!(cart::get_cart(&r.cart).lines.len(), 1);
    assert_eq!(stock_of(&r, "4"), 25);
    assert!(sale::list_transactions(&r.store).is_empty());
}

#[test]
fn test_checkout_empty_cart() {
    let r = register();
    session::sign_in(&r.store, &r.session, "cashier").unwrap();

    let err = sale::checkout(&r.store, &r.cart, &r.session, &r.config, PaymentMethod::Upi)
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::EmptyCart);
}

#[test]
fn test_sign_out_clears_cart() {
    let r = register();
    session::sign_in(&r.store, &r.session, "cashier").unwrap();
    cart::add_to_cart(&r.store, &r.cart, "6", Some(3)).unwrap();

    let previous = session::sign_out(&r.session, &r.cart).unwrap();

    assert_eq!(previous.username, "cashier");
    assert!(cart::get_cart(&r.cart).lines.is_empty());
    assert!(r.session.current_user().is_none());
}

#[test]
fn test_unknown_user_and_product() {
    let r = register();

    let err = session::sign_in(&r.store, &r.session, "nobody").unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    let err = cart::add_to_cart(&r.store, &r.cart, "missing", None).unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[test]
fn test_partial_then_full_refund() {
    let r = register();
    session::sign_in(&r.store, &r.session, "cashier").unwrap();
    cart::add_to_cart(&r.store, &r.cart, "4", None).unwrap();
    let receipt =
        sale::checkout(&r.store, &r.cart, &r.session, &r.config, PaymentMethod::Card).unwrap();
    let tx_id = receipt.transaction_id.as_str();

    session::sign_in(&r.store, &r.session, "admin").unwrap();

    let partial = refund::refund_transaction(&r.store, &r.session, tx_id, 500, "Scratched").unwrap();
    assert_eq!(partial.status, TransactionStatus::PartiallyRefunded);
    assert_eq!(partial.remaining.cents(), 955);
    assert_eq!(partial.record.refunded_by, "1");
    assert_eq!(stock_of(&r, "4"), 24);

    let err = refund::refund_transaction(&r.store, &r.session, tx_id, 1_000, "Too much").unwrap_err();
    assert_eq!(err.code, ErrorCode::OverRefund);

    let full = refund::refund_transaction(&r.store, &r.session, tx_id, 955, "Returned").unwrap();
    assert_eq!(full.status, TransactionStatus::Refunded);
    assert!(full.remaining.is_zero());
    assert_eq!(stock_of(&r, "4"), 25);

    assert_eq!(refund::refunds_for(&r.store, tx_id).len(), 2);
    assert_eq!(refund::list_refunds(&r.store)[0].amount.cents(), 955);
    assert!(refund::refundable_transactions(&r.store).is_empty());
}

#[test]
fn test_refund_requires_signed_in_actor() {
    let r = register();
    session::sign_in(&r.store, &r.session, "cashier").unwrap();
    cart::add_to_cart(&r.store, &r.cart, "4", None).unwrap();
    let receipt =
        sale::checkout(&r.store, &r.cart, &r.session, &r.config, PaymentMethod::Cash).unwrap();
    session::sign_out(&r.session, &r.cart);

    let err = refund::refund_transaction(&r.store, &r.session, &receipt.transaction_id, 100, "x")
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NoActiveCashier);
    assert!(refund::list_refunds(&r.store).is_empty());
}

#[test]
fn test_product_search() {
    let r = register();

    let by_barcode = product::search_products(&r.store, "123456789014", None);
    assert_eq!(by_barcode.len(), 1);
    assert_eq!(by_barcode[0].name, "MacBook Air M2");

    let by_name = product::search_products(&r.store, "  mug ", None);
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].id, "4");

    let by_category = product::search_products(&r.store, "electronics", Some(2));
    assert_eq!(by_category.len(), 2);

    assert_eq!(product::search_products(&r.store, "", None).len(), 6);
}

#[test]
fn test_inventory_commands() {
    let r = register();

    let low: Vec<String> = product::low_stock_products(&r.store)
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(low, vec!["5".to_string()]);

    product::adjust_stock(&r.store, "5", 0).unwrap();
    let summary = product::inventory_summary(&r.store);
    assert_eq!(summary.product_count, 6);
    assert_eq!(summary.out_of_stock_count, 1);

    let logs = product::stock_logs(&r.store, Some("5"));
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].quantity, 2);

    let err = product::adjust_stock(&r.store, "5", -1).unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}

#[test]
fn test_report_after_sale() {
    let r = register();
    session::sign_in(&r.store, &r.session, "cashier").unwrap();
    cart::add_to_cart(&r.store, &r.cart, "4", Some(2)).unwrap();
    sale::checkout(&r.store, &r.cart, &r.session, &r.config, PaymentMethod::Upi).unwrap();

    let today = report::sales_report(&r.store, ReportPeriod::Today);
    assert_eq!(today.orders, 1);
    assert_eq!(today.top_products[0].quantity, 2);

    let all = report::sales_report(&r.store, ReportPeriod::All);
    assert_eq!(all.revenue, today.revenue);
}

fn walk_in(id: &str) -> Customer {
    Customer {
        id: id.to_string(),
        name: "Priya Patel".to_string(),
        phone: "+1-555-0199".to_string(),
        email: "priya@email.com".to_string(),
        loyalty_points: 0,
    }
}

#[test]
fn test_create_and_update_customer() {
    let r = register();

    let created = customer::create_customer(&r.store, walk_in("4")).unwrap();
    assert_eq!(created.name, "Priya Patel");
    assert_eq!(customer::list_customers(&r.store).len(), 4);

    let err = customer::create_customer(&r.store, walk_in("4")).unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
    assert!(err.message.contains("already exists"));

    // Edits keep the loyalty balance already on file.
    let mut edited = walk_in("3");
    edited.email = "mike.johnson@email.com".to_string();
    let updated = customer::update_customer(&r.store, edited).unwrap();
    assert_eq!(updated.email, "mike.johnson@email.com");
    assert_eq!(updated.loyalty_points, 245);
    assert_eq!(
        customer::get_customer(&r.store, "3").unwrap().name,
        "Priya Patel"
    );

    let err = customer::update_customer(&r.store, walk_in("missing")).unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    cart::set_customer(&r.store, &r.cart, Some("4")).unwrap();
    assert_eq!(cart::get_cart(&r.cart).customer.unwrap().name, "Priya Patel");
}

#[test]
fn test_invalid_customer_is_rejected() {
    let r = register();

    let mut nameless = walk_in("4");
    nameless.name = "  ".to_string();
    let mut bad_email = walk_in("5");
    bad_email.email = "priya.email.com".to_string();
    let mut bad_phone = walk_in("6");
    bad_phone.phone = "12-34".to_string();
    let mut blank_id = walk_in("");
    blank_id.id = " ".to_string();

    for candidate in [nameless, bad_email, bad_phone, blank_id] {
        let err = customer::create_customer(&r.store, candidate).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
    assert_eq!(customer::list_customers(&r.store).len(), 3);

    let mut edit = walk_in("1");
    edit.email = "john".to_string();
    let err = customer::update_customer(&r.store, edit).unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
    assert_eq!(
        customer::get_customer(&r.store, "1").unwrap().email,
        "john.doe@email.com"
    );
}

#[test]
fn test_create_product_rejects_huge_price() {
    let r = register();
    let mut product = product::get_product(&r.store, "4").unwrap();
    product.id = "7".to_string();
    product.barcode = None;
    product.price_cents = 5_000_000_000_000_000;

    let err = product::create_product(&r.store, product).unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
    assert!(product::get_product(&r.store, "7").is_err());
}

/// Two registers race for the last two notebooks. The store lock makes
/// each checkout atomic, so exactly one sale goes through.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_checkouts_cannot_oversell() {
    let store = Arc::new(StoreState::new(seed::demo_store().unwrap()));
    let config = Arc::new(ConfigState::default());

    let mut handles = Vec::new();
    for _ in 0..2 {
        let store = Arc::clone(&store);
        let config = Arc::clone(&config);
        handles.push(tokio::task::spawn_blocking(move || {
            let till = CartState::new();
            let user = SessionState::new();
            session::sign_in(&store, &user, "cashier").unwrap();
            // The loser may already see zero stock when adding to its cart.
            cart::add_to_cart(&store, &till, "5", Some(2))
                .and_then(|_| sale::checkout(&store, &till, &user, &config, PaymentMethod::Cash))
        }));
    }

    let mut accepted = 0;
    let mut out_of_stock = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(e) if e.code == ErrorCode::OutOfStock => out_of_stock += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(out_of_stock, 1);
    assert_eq!(
        store.with_store(|s| s.catalog.get("5").map(|p| p.stock)),
        Some(0)
    );
    assert_eq!(sale::list_transactions(&store).len(), 1);
}
