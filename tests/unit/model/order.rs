use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::json;

use storefront::api::web::dto::{OrderCreateReqData, ShippingAddrReqDto};
use storefront::model::{
    OrderAmountsModel, OrderDraftModel, OrderIntakeError, OrderModel, OrderStatus, PaymentMethod,
    ShippingAddrModel,
};

#[test]
fn status_parse() {
    let ok_cases = [
        ("pending", OrderStatus::Pending),
        ("processing", OrderStatus::Processing),
        ("shipped", OrderStatus::Shipped),
        ("delivered", OrderStatus::Delivered),
        ("cancelled", OrderStatus::Cancelled),
    ];
    for (raw, expect) in ok_cases {
        assert_eq!(OrderStatus::from_str(raw).unwrap(), expect);
    }
    for raw in ["Pending", "refunded", "", "shipped "] {
        assert!(OrderStatus::from_str(raw).is_err());
    }
}

#[test]
fn status_transition_graph() {
    let allowed = [
        (OrderStatus::Pending, OrderStatus::Processing),
        (OrderStatus::Processing, OrderStatus::Shipped),
        (OrderStatus::Shipped, OrderStatus::Delivered),
        (OrderStatus::Pending, OrderStatus::Cancelled),
        (OrderStatus::Processing, OrderStatus::Cancelled),
        (OrderStatus::Shipped, OrderStatus::Cancelled),
    ];
    for (from, to) in allowed {
        assert!(from.accepts(to), "{} -> {}", from.as_str(), to.as_str());
    }
    let denied = [
        (OrderStatus::Pending, OrderStatus::Shipped),
        (OrderStatus::Pending, OrderStatus::Delivered),
        (OrderStatus::Processing, OrderStatus::Pending),
        (OrderStatus::Shipped, OrderStatus::Pending),
        (OrderStatus::Shipped, OrderStatus::Processing),
        (OrderStatus::Delivered, OrderStatus::Cancelled),
        (OrderStatus::Delivered, OrderStatus::Pending),
        (OrderStatus::Cancelled, OrderStatus::Pending),
        (OrderStatus::Cancelled, OrderStatus::Processing),
        (OrderStatus::Pending, OrderStatus::Pending),
    ];
    for (from, to) in denied {
        assert!(!from.accepts(to), "{} -> {}", from.as_str(), to.as_str());
    }
}

#[test]
fn payment_method_parse() {
    for (raw, expect) in [
        ("card", PaymentMethod::Card),
        ("cod", PaymentMethod::CashOnDelivery),
        ("gcash", PaymentMethod::GCash),
        ("paymaya", PaymentMethod::PayMaya),
    ] {
        let m = PaymentMethod::from_str(raw).unwrap();
        assert_eq!(m, expect);
        assert_eq!(m.as_str(), raw);
    }
    for raw in ["paypal", "CASH", ""] {
        assert!(PaymentMethod::from_str(raw).is_err());
    }
}

fn ut_req_data(raw: serde_json::Value) -> OrderCreateReqData {
    serde_json::from_value(raw).unwrap()
}

fn ut_valid_req() -> serde_json::Value {
    json!({
        "user": {"username": "alice", "email": "alice@example.com"},
        "items": [
            {"productId": "1a2b", "name": "linen shirt", "price": 24.99, "quantity": 2,
             "selectedColor": "white", "selectedSize": "S", "category": "Women"},
            {"name": "giftwrap", "price": 5.0, "quantity": 1}
        ],
        "shippingAddress": {
            "fullName": "A", "phoneNumber": "1", "streetName": "S",
            "region": "R", "postalCode": "Z", "label": "home"
        },
        "paymentMethod": "cod",
        "subtotal": 54.98,
        "shipping": 10,
        "tax": 0,
        "total": 64.98
    })
}

#[test]
fn draft_from_req_ok() {
    let req = ut_req_data(ut_valid_req());
    let draft = OrderDraftModel::try_from(req).unwrap();
    assert_eq!(draft.buyer.username.as_str(), "alice");
    assert_eq!(draft.buyer.email.as_deref(), Some("alice@example.com"));
    assert_eq!(draft.lines.len(), 2);
    assert_eq!(draft.lines[0].product_id.as_deref(), Some("1a2b"));
    assert_eq!(draft.lines[0].quantity, 2u32);
    assert!(draft.lines[1].product_id.is_none());
    assert_eq!(draft.payment_method, PaymentMethod::CashOnDelivery);
    assert_eq!(draft.total, Decimal::new(6498, 2));
    assert_eq!(draft.shipping_address.postal_code.as_str(), "Z");
}

#[test]
fn draft_missing_required_fields() {
    for field in ["user", "items", "paymentMethod", "total"] {
        let mut raw = ut_valid_req();
        raw.as_object_mut().unwrap().remove(field);
        let result = OrderDraftModel::try_from(ut_req_data(raw));
        let e = result.err().unwrap();
        assert_eq!(e, OrderIntakeError::MissingRequiredFields);
        assert_eq!(e.message(), "missing required order fields");
    }
    // username nested inside the buyer snapshot is required as well
    let mut raw = ut_valid_req();
    raw["user"].as_object_mut().unwrap().remove("username");
    let result = OrderDraftModel::try_from(ut_req_data(raw));
    assert_eq!(result.err().unwrap(), OrderIntakeError::MissingRequiredFields);
}

#[test]
fn draft_empty_item_sequence() {
    let mut raw = ut_valid_req();
    raw["items"] = json!([]);
    let result = OrderDraftModel::try_from(ut_req_data(raw));
    let e = result.err().unwrap();
    assert_eq!(e, OrderIntakeError::EmptyItemSequence);
    assert_eq!(e.message(), "order must contain at least one item");
}

#[test]
fn draft_bad_item_quantity() {
    for qty in [json!(0), json!(-3), serde_json::Value::Null] {
        let mut raw = ut_valid_req();
        raw["items"][0]["quantity"] = qty;
        let result = OrderDraftModel::try_from(ut_req_data(raw));
        assert_eq!(result.err().unwrap(), OrderIntakeError::BadItemQuantity);
    }
}

#[test]
fn draft_incomplete_shipping_addr() {
    for field in ["fullName", "phoneNumber", "streetName", "region", "postalCode"] {
        let mut raw = ut_valid_req();
        raw["shippingAddress"].as_object_mut().unwrap().remove(field);
        let result = OrderDraftModel::try_from(ut_req_data(raw));
        let e = result.err().unwrap();
        assert_eq!(e, OrderIntakeError::IncompleteShippingAddr);
        assert_eq!(e.message(), "missing required shipping address fields");
    }
    let mut raw = ut_valid_req();
    raw.as_object_mut().unwrap().remove("shippingAddress");
    let result = OrderDraftModel::try_from(ut_req_data(raw));
    assert_eq!(result.err().unwrap(), OrderIntakeError::IncompleteShippingAddr);
    // whitespace-only value is as bad as an absent one
    let mut raw = ut_valid_req();
    raw["shippingAddress"]["region"] = json!("   ");
    let result = OrderDraftModel::try_from(ut_req_data(raw));
    assert_eq!(result.err().unwrap(), OrderIntakeError::IncompleteShippingAddr);
}

#[test]
fn draft_unknown_payment_method() {
    let mut raw = ut_valid_req();
    raw["paymentMethod"] = json!("paypal");
    let result = OrderDraftModel::try_from(ut_req_data(raw));
    let e = result.err().unwrap();
    assert_eq!(e, OrderIntakeError::UnknownPaymentMethod);
    assert_eq!(e.message(), "invalid payment method");
}

#[test]
fn draft_bad_buyer_email() {
    let mut raw = ut_valid_req();
    raw["user"]["email"] = json!("not-an-email");
    let result = OrderDraftModel::try_from(ut_req_data(raw));
    assert_eq!(result.err().unwrap(), OrderIntakeError::BadBuyerEmail);
}

#[test]
fn addr_label_is_optional() {
    let d = ShippingAddrReqDto {
        full_name: Some("A".to_string()),
        phone_number: Some("1".to_string()),
        region: Some("R".to_string()),
        postal_code: Some("Z".to_string()),
        street_name: Some("S".to_string()),
        label: None,
    };
    let m = ShippingAddrModel::try_from(d).unwrap();
    assert!(m.label.is_none());
}

#[test]
fn amounts_apply_defaults() {
    let subtotal = Decimal::new(4998, 2);
    let m = OrderAmountsModel::try_build(subtotal, None, None, Decimal::new(5998, 2)).unwrap();
    assert_eq!(m.shipping, Decimal::new(10, 0));
    assert_eq!(m.tax, Decimal::ZERO);
    assert_eq!(m.total, Decimal::new(5998, 2));
}

#[test]
fn amounts_total_verification() {
    let subtotal = Decimal::new(4998, 2);
    // within the rounding tolerance
    let result = OrderAmountsModel::try_build(
        subtotal,
        Some(Decimal::new(10, 0)),
        Some(Decimal::ZERO),
        Decimal::new(5999, 2),
    );
    assert!(result.is_ok());
    // off by more than one cent
    let result = OrderAmountsModel::try_build(
        subtotal,
        Some(Decimal::new(10, 0)),
        Some(Decimal::ZERO),
        Decimal::new(100, 0),
    );
    let e = result.err().unwrap();
    assert_eq!(e, OrderIntakeError::TotalMismatch);
    assert_eq!(e.message(), "order total mismatch");
}

#[test]
fn amounts_deny_negative() {
    let result = OrderAmountsModel::try_build(
        Decimal::new(4998, 2),
        Some(Decimal::new(-10, 0)),
        None,
        Decimal::new(3998, 2),
    );
    assert_eq!(result.err().unwrap(), OrderIntakeError::NegativeAmount);
}

#[test]
fn generated_id_is_hex() {
    let id = OrderModel::generate_id(1);
    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    let another = OrderModel::generate_id(1);
    assert_ne!(id, another);
}
