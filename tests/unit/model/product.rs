use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::json;

use storefront::api::web::dto::{
    OrderLineStockErrorReason, ProductCreateReqData, ProductEditReqData,
};
use storefront::model::{
    try_adjust_inventory, ProductCategory, ProductIntakeError, ProductModel,
};

use super::{ut_default_order, ut_default_product, ut_oline, ut_time};

fn ut_req_data(raw: serde_json::Value) -> ProductCreateReqData {
    serde_json::from_value(raw).unwrap()
}

#[test]
fn category_parse() {
    for (raw, expect) in [
        ("Women", ProductCategory::Women),
        ("Men", ProductCategory::Men),
        ("Kids", ProductCategory::Kids),
        ("Baby", ProductCategory::Baby),
    ] {
        assert_eq!(ProductCategory::from_str(raw).unwrap(), expect);
    }
    for raw in ["women", "Shoes", ""] {
        assert!(ProductCategory::from_str(raw).is_err());
    }
}

#[test]
fn build_ok_with_defaults() {
    let req = ut_req_data(json!({"name": "  canvas tote ", "price": 15.5, "stock": 40}));
    let t = ut_time("2025-11-03T09:41:00+08:00");
    let m = ProductModel::try_build(req, "a1".to_string(), t).unwrap();
    assert_eq!(m.name.as_str(), "canvas tote");
    assert_eq!(m.price, Decimal::new(155, 1));
    assert_eq!(m.stock, 40u32);
    assert_eq!(m.sold_count, 0u32);
    assert_eq!(m.category, ProductCategory::Women);
    assert!(m.image.is_empty());
    assert!(m.colors.is_empty());
    assert!(m.sizes.is_empty());
}

#[test]
fn build_missing_required_fields() {
    for raw in [
        json!({"price": 15.5, "stock": 40}),
        json!({"name": "canvas tote", "stock": 40}),
        json!({"name": "canvas tote", "price": 15.5}),
        json!({"name": "  ", "price": 15.5, "stock": 40}),
    ] {
        let result = ProductModel::try_build(
            ut_req_data(raw),
            "a1".to_string(),
            ut_time("2025-11-03T09:41:00+08:00"),
        );
        let e = result.err().unwrap();
        assert_eq!(e, ProductIntakeError::MissingRequiredFields);
        assert_eq!(e.message(), "please provide name, price and stock");
    }
}

#[test]
fn build_deny_negative_price_stock() {
    for raw in [
        json!({"name": "canvas tote", "price": -0.5, "stock": 40}),
        json!({"name": "canvas tote", "price": 15.5, "stock": -1}),
    ] {
        let result = ProductModel::try_build(
            ut_req_data(raw),
            "a1".to_string(),
            ut_time("2025-11-03T09:41:00+08:00"),
        );
        assert_eq!(result.err().unwrap(), ProductIntakeError::NegativeAmount);
    }
}

#[test]
fn build_unknown_category() {
    let req = ut_req_data(json!({"name": "rattle", "price": 3.25, "stock": 7, "category": "Toys"}));
    let result =
        ProductModel::try_build(req, "a1".to_string(), ut_time("2025-11-03T09:41:00+08:00"));
    let e = result.err().unwrap();
    assert_eq!(e, ProductIntakeError::UnknownCategory);
}

#[test]
fn patch_partial_update() {
    let mut m = ut_default_product(
        "a1",
        Decimal::new(155, 1),
        40,
        "2025-11-03T09:41:00+08:00",
    );
    let req: ProductEditReqData =
        serde_json::from_value(json!({"price": 18.0, "category": "Kids", "sizes": ["S","M"]}))
            .unwrap();
    let t2 = ut_time("2025-11-04T10:00:00+08:00");
    m.apply_patch(req, t2).unwrap();
    assert_eq!(m.price, Decimal::new(18, 0));
    assert_eq!(m.category, ProductCategory::Kids);
    assert_eq!(m.sizes, vec!["S".to_string(), "M".to_string()]);
    // untouched fields survive
    assert_eq!(m.stock, 40u32);
    assert_eq!(m.name.as_str(), "item-a1");
    assert_eq!(m.update_time, t2);

    let req: ProductEditReqData = serde_json::from_value(json!({"stock": -4})).unwrap();
    let result = m.apply_patch(req, t2);
    assert_eq!(result.err().unwrap(), ProductIntakeError::NegativeAmount);
}

#[test]
fn adjust_inventory_ok() {
    let t = "2025-11-03T09:41:00+08:00";
    let mut products = vec![
        ut_default_product("a1", Decimal::new(2499, 2), 10, t),
        ut_default_product("b2", Decimal::new(900, 2), 4, t),
    ];
    let lines = vec![
        ut_oline(Some("a1"), Decimal::new(2499, 2), 3),
        ut_oline(Some("b2"), Decimal::new(900, 2), 4),
        ut_oline(None, Decimal::new(500, 2), 9),
    ];
    let order = ut_default_order("o1", "alice", lines, t);
    let result = try_adjust_inventory(&mut products, &order);
    assert!(result.is_ok());
    assert_eq!(products[0].stock, 7u32);
    assert_eq!(products[0].sold_count, 3u32);
    assert_eq!(products[1].stock, 0u32);
    assert_eq!(products[1].sold_count, 4u32);
}

#[test]
fn adjust_inventory_shortage() {
    let t = "2025-11-03T09:41:00+08:00";
    let mut products = vec![ut_default_product("a1", Decimal::new(2499, 2), 1, t)];
    let lines = vec![ut_oline(Some("a1"), Decimal::new(2499, 2), 2)];
    let order = ut_default_order("o1", "alice", lines, t);
    let result = try_adjust_inventory(&mut products, &order);
    let errors = result.err().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].product_id.as_str(), "a1");
    assert_eq!(errors[0].reason, OrderLineStockErrorReason::OutOfStock);
    assert_eq!(errors[0].shortage, Some(1u32));
}

#[test]
fn adjust_inventory_unknown_product() {
    let t = "2025-11-03T09:41:00+08:00";
    let mut products = Vec::new();
    let lines = vec![ut_oline(Some("dead"), Decimal::new(2499, 2), 1)];
    let order = ut_default_order("o1", "alice", lines, t);
    let result = try_adjust_inventory(&mut products, &order);
    let errors = result.err().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].reason, OrderLineStockErrorReason::NotExist);
    assert!(errors[0].shortage.is_none());
}

#[test]
fn adjust_inventory_same_product_twice() {
    // two lines hitting the same product apply sequentially
    let t = "2025-11-03T09:41:00+08:00";
    let mut products = vec![ut_default_product("a1", Decimal::new(2499, 2), 5, t)];
    let lines = vec![
        ut_oline(Some("a1"), Decimal::new(2499, 2), 3),
        ut_oline(Some("a1"), Decimal::new(2499, 2), 3),
    ];
    let order = ut_default_order("o1", "alice", lines, t);
    let result = try_adjust_inventory(&mut products, &order);
    let errors = result.err().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].shortage, Some(1u32));
}
