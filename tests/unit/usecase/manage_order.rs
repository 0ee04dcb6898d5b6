use rust_decimal::Decimal;
use serde_json::json;

use storefront::api::web::dto::{OrderCreateReqData, OrderLineStockErrorReason};
use storefront::model::OrderIntakeError;
use storefront::repository::{app_repo_order, app_repo_product};
use storefront::usecase::{
    CreateOrderUsKsErr, CreateOrderUseCase, DiscardOrderUseCase, OrderAccessUcError,
    ReadOrdersUseCase, UpdateOrderStatusUcError, UpdateOrderStatusUseCase,
};
use storefront::AppSharedState;

use super::ut_usecase_shared_state;
use crate::model::{ut_default_product, ut_oline};

async fn ut_seed_product(shr_state: &AppSharedState, pid: &str, price: Decimal, stock: u32) {
    let repo = app_repo_product(shr_state.datastore()).await.unwrap();
    let m = ut_default_product(pid, price, stock, "2025-11-01T08:00:00+00:00");
    repo.create(m).await.unwrap();
}

fn ut_req_data(raw: serde_json::Value) -> OrderCreateReqData {
    serde_json::from_value(raw).unwrap()
}

fn ut_valid_req(pid: &str, quantity: u32, total: f64) -> serde_json::Value {
    json!({
        "user": {"username": "alice"},
        "items": [{"productId": pid, "name": "linen shirt", "price": 24.99, "quantity": quantity}],
        "shippingAddress": {
            "fullName": "A", "phoneNumber": "1", "streetName": "S",
            "region": "R", "postalCode": "Z"
        },
        "paymentMethod": "cod",
        "total": total
    })
}

#[tokio::test]
async fn create_order_ok() {
    let shr_state = ut_usecase_shared_state();
    let price = Decimal::new(2499, 2);
    ut_seed_product(&shr_state, "1a2b", price, 5).await;
    let uc = CreateOrderUseCase {
        glb_state: shr_state.clone(),
        repo_order: app_repo_order(shr_state.datastore()).await.unwrap(),
        repo_product: app_repo_product(shr_state.datastore()).await.unwrap(),
    };
    // 24.99 x 2 + default shipping fee 10 + tax 0
    let req = ut_req_data(ut_valid_req("1a2b", 2, 59.98));
    let resp = uc.execute(req).await.ok().unwrap();
    assert_eq!(resp.status.as_str(), "pending");
    assert_eq!(resp.subtotal, Decimal::new(4998, 2));
    assert_eq!(resp.shipping, Decimal::new(10, 0));
    assert_eq!(resp.tax, Decimal::ZERO);
    assert_eq!(resp.total, Decimal::new(5998, 2));
    assert_eq!(resp.id.len(), 32);
    assert_eq!(resp.items.len(), 1);

    let repo_p = app_repo_product(shr_state.datastore()).await.unwrap();
    let p = repo_p.fetch_by_id("1a2b").await.unwrap();
    assert_eq!(p.stock, 3u32);
    assert_eq!(p.sold_count, 2u32);

    let repo_o = app_repo_order(shr_state.datastore()).await.unwrap();
    let saved = repo_o.fetch_by_id(resp.id.as_str()).await.unwrap();
    assert_eq!(saved.buyer.username.as_str(), "alice");
}

#[tokio::test]
async fn create_order_req_content_errors() {
    let shr_state = ut_usecase_shared_state();
    let cases = [
        (
            json!({"items": [{"productId": "1a2b", "quantity": 1}],
                   "shippingAddress": {"fullName": "A", "phoneNumber": "1", "streetName": "S",
                                       "region": "R", "postalCode": "Z"},
                   "paymentMethod": "cod", "total": 34.99}),
            OrderIntakeError::MissingRequiredFields,
        ),
        (
            {
                let mut raw = ut_valid_req("1a2b", 1, 34.99);
                raw["items"] = json!([]);
                raw
            },
            OrderIntakeError::EmptyItemSequence,
        ),
        (
            {
                let mut raw = ut_valid_req("1a2b", 1, 34.99);
                raw["paymentMethod"] = json!("bitcoin");
                raw
            },
            OrderIntakeError::UnknownPaymentMethod,
        ),
    ];
    for (raw, expect) in cases {
        let uc = CreateOrderUseCase {
            glb_state: shr_state.clone(),
            repo_order: app_repo_order(shr_state.datastore()).await.unwrap(),
            repo_product: app_repo_product(shr_state.datastore()).await.unwrap(),
        };
        let result = uc.execute(ut_req_data(raw)).await;
        match result.err().unwrap() {
            CreateOrderUsKsErr::ReqContent(e) => assert_eq!(e, expect),
            _others => panic!("expected request-content error"),
        }
    }
    // nothing was persisted along the way
    let repo_o = app_repo_order(shr_state.datastore()).await.unwrap();
    assert!(repo_o.fetch_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_order_total_mismatch() {
    let shr_state = ut_usecase_shared_state();
    ut_seed_product(&shr_state, "1a2b", Decimal::new(2499, 2), 5).await;
    let uc = CreateOrderUseCase {
        glb_state: shr_state.clone(),
        repo_order: app_repo_order(shr_state.datastore()).await.unwrap(),
        repo_product: app_repo_product(shr_state.datastore()).await.unwrap(),
    };
    // authoritative subtotal is 49.98, submitted total claims 20
    let req = ut_req_data(ut_valid_req("1a2b", 2, 20.0));
    let result = uc.execute(req).await;
    match result.err().unwrap() {
        CreateOrderUsKsErr::ReqContent(e) => {
            assert_eq!(e, OrderIntakeError::TotalMismatch);
        }
        _others => panic!("expected total-mismatch error"),
    }
    // the submitted per-line price is overridden by the stored price, a
    // client lying about unit price still has to match the real total
    let uc = CreateOrderUseCase {
        glb_state: shr_state.clone(),
        repo_order: app_repo_order(shr_state.datastore()).await.unwrap(),
        repo_product: app_repo_product(shr_state.datastore()).await.unwrap(),
    };
    let mut raw = ut_valid_req("1a2b", 2, 30.0);
    raw["items"][0]["price"] = json!(10.0);
    let result = uc.execute(ut_req_data(raw)).await;
    assert!(matches!(
        result.err().unwrap(),
        CreateOrderUsKsErr::ReqContent(OrderIntakeError::TotalMismatch)
    ));
}

#[tokio::test]
async fn create_order_unknown_product() {
    let shr_state = ut_usecase_shared_state();
    let uc = CreateOrderUseCase {
        glb_state: shr_state.clone(),
        repo_order: app_repo_order(shr_state.datastore()).await.unwrap(),
        repo_product: app_repo_product(shr_state.datastore()).await.unwrap(),
    };
    let req = ut_req_data(ut_valid_req("dead", 1, 34.99));
    let result = uc.execute(req).await;
    match result.err().unwrap() {
        CreateOrderUsKsErr::Inventory(lines) => {
            assert_eq!(lines.len(), 1);
            assert_eq!(lines[0].product_id.as_str(), "dead");
            assert_eq!(lines[0].reason, OrderLineStockErrorReason::NotExist);
        }
        _others => panic!("expected inventory error"),
    }
}

#[tokio::test]
async fn create_order_insufficient_stock() {
    let shr_state = ut_usecase_shared_state();
    ut_seed_product(&shr_state, "1a2b", Decimal::new(2499, 2), 1).await;
    let uc = CreateOrderUseCase {
        glb_state: shr_state.clone(),
        repo_order: app_repo_order(shr_state.datastore()).await.unwrap(),
        repo_product: app_repo_product(shr_state.datastore()).await.unwrap(),
    };
    let req = ut_req_data(ut_valid_req("1a2b", 2, 59.98));
    let result = uc.execute(req).await;
    match result.err().unwrap() {
        CreateOrderUsKsErr::Inventory(lines) => {
            assert_eq!(lines[0].reason, OrderLineStockErrorReason::OutOfStock);
            assert_eq!(lines[0].shortage, Some(1u32));
        }
        _others => panic!("expected inventory error"),
    }
    // stock untouched, order not persisted
    let repo_p = app_repo_product(shr_state.datastore()).await.unwrap();
    assert_eq!(repo_p.fetch_by_id("1a2b").await.unwrap().stock, 1u32);
    let repo_o = app_repo_order(shr_state.datastore()).await.unwrap();
    assert!(repo_o.fetch_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_status_walk_through() {
    let shr_state = ut_usecase_shared_state();
    ut_seed_product(&shr_state, "1a2b", Decimal::new(2499, 2), 5).await;
    let uc = CreateOrderUseCase {
        glb_state: shr_state.clone(),
        repo_order: app_repo_order(shr_state.datastore()).await.unwrap(),
        repo_product: app_repo_product(shr_state.datastore()).await.unwrap(),
    };
    let resp = uc
        .execute(ut_req_data(ut_valid_req("1a2b", 1, 34.99)))
        .await
        .ok()
        .unwrap();
    let oid = resp.id;

    // pending -> processing -> shipped follows the forward path
    for expect in ["processing", "shipped"] {
        let uc = UpdateOrderStatusUseCase {
            repo_order: app_repo_order(shr_state.datastore()).await.unwrap(),
        };
        let updated = uc.execute(oid.clone(), expect.to_string()).await.ok().unwrap();
        assert_eq!(updated.status.as_str(), expect);
    }
    // moving a shipped order back to pending is denied
    let uc = UpdateOrderStatusUseCase {
        repo_order: app_repo_order(shr_state.datastore()).await.unwrap(),
    };
    let result = uc.execute(oid.clone(), "pending".to_string()).await;
    assert!(matches!(
        result.err().unwrap(),
        UpdateOrderStatusUcError::IllegalTransition { .. }
    ));
    // unrecognized status label
    let uc = UpdateOrderStatusUseCase {
        repo_order: app_repo_order(shr_state.datastore()).await.unwrap(),
    };
    let result = uc.execute(oid.clone(), "refunded".to_string()).await;
    assert!(matches!(
        result.err().unwrap(),
        UpdateOrderStatusUcError::UnknownStatus
    ));
    // unknown order identifier
    let uc = UpdateOrderStatusUseCase {
        repo_order: app_repo_order(shr_state.datastore()).await.unwrap(),
    };
    let result = uc
        .execute("beefbeefbeefbeef".to_string(), "processing".to_string())
        .await;
    assert!(matches!(
        result.err().unwrap(),
        UpdateOrderStatusUcError::NotFound
    ));
}

#[tokio::test]
async fn read_and_discard_orders() {
    let shr_state = ut_usecase_shared_state();
    ut_seed_product(&shr_state, "1a2b", Decimal::new(2499, 2), 9).await;
    let mut order_ids = Vec::new();
    for _ in 0..2 {
        let uc = CreateOrderUseCase {
            glb_state: shr_state.clone(),
            repo_order: app_repo_order(shr_state.datastore()).await.unwrap(),
            repo_product: app_repo_product(shr_state.datastore()).await.unwrap(),
        };
        let resp = uc
            .execute(ut_req_data(ut_valid_req("1a2b", 1, 34.99)))
            .await
            .ok()
            .unwrap();
        order_ids.push(resp.id);
    }
    let uc = ReadOrdersUseCase {
        repo_order: app_repo_order(shr_state.datastore()).await.unwrap(),
    };
    let found = uc.execute_by_buyer("alice".to_string()).await.unwrap();
    assert_eq!(found.len(), 2);
    let uc = ReadOrdersUseCase {
        repo_order: app_repo_order(shr_state.datastore()).await.unwrap(),
    };
    let found = uc.execute_by_buyer("mallory".to_string()).await.unwrap();
    assert!(found.is_empty());

    let uc = DiscardOrderUseCase {
        repo_order: app_repo_order(shr_state.datastore()).await.unwrap(),
    };
    uc.execute(order_ids[0].clone()).await.ok().unwrap();
    let uc = ReadOrdersUseCase {
        repo_order: app_repo_order(shr_state.datastore()).await.unwrap(),
    };
    let result = uc.execute_single(order_ids[0].clone()).await;
    assert!(matches!(
        result.err().unwrap(),
        OrderAccessUcError::NotFound
    ));
    // deleting an order does not give the sold units back
    let repo_p = app_repo_product(shr_state.datastore()).await.unwrap();
    let p = repo_p.fetch_by_id("1a2b").await.unwrap();
    assert_eq!(p.stock, 7u32);
    assert_eq!(p.sold_count, 2u32);
}

#[test]
fn reprice_lines_pure() {
    let price_stored = Decimal::new(2499, 2);
    let products = vec![ut_default_product(
        "1a2b",
        price_stored,
        5,
        "2025-11-01T08:00:00+00:00",
    )];
    let mut lines = vec![
        ut_oline(Some("1a2b"), Decimal::new(100, 2), 2),
        ut_oline(None, Decimal::new(500, 2), 1),
    ];
    let subtotal = CreateOrderUseCase::reprice_lines(&mut lines, &products).unwrap();
    // stored price wins over the submitted one, detached line keeps its own
    assert_eq!(lines[0].price, price_stored);
    assert_eq!(subtotal, Decimal::new(5498, 2));

    let mut lines = vec![ut_oline(Some("dead"), Decimal::new(100, 2), 2)];
    let errors = CreateOrderUseCase::reprice_lines(&mut lines, &products).err().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].reason, OrderLineStockErrorReason::NotExist);
}
