use rust_decimal::Decimal;
use serde_json::json;

use storefront::api::web::dto::{ProductCreateReqData, ProductEditReqData};
use storefront::model::ProductIntakeError;
use storefront::repository::app_repo_product;
use storefront::usecase::{
    CreateProductUseCase, DiscardProductUseCase, EditProductUseCase, ProductUcError,
    ReadProductsUseCase,
};

use super::ut_usecase_shared_state;

fn ut_req_data(raw: serde_json::Value) -> ProductCreateReqData {
    serde_json::from_value(raw).unwrap()
}

#[tokio::test]
async fn create_product_ok() {
    let shr_state = ut_usecase_shared_state();
    let uc = CreateProductUseCase {
        repo_product: app_repo_product(shr_state.datastore()).await.unwrap(),
    };
    let req = ut_req_data(json!({
        "name": "denim overalls", "price": 39.5, "stock": 12,
        "category": "Kids", "colors": ["indigo"], "sizes": ["4T"],
        "description": "double-stitched"
    }));
    let resp = uc.execute(req).await.ok().unwrap();
    assert_eq!(resp.name.as_str(), "denim overalls");
    assert_eq!(resp.price, Decimal::new(395, 1));
    assert_eq!(resp.stock, 12u32);
    assert_eq!(resp.sold_count, 0u32);
    assert_eq!(resp.category.as_str(), "Kids");
    assert_eq!(resp.id.len(), 32);

    let repo = app_repo_product(shr_state.datastore()).await.unwrap();
    let saved = repo.fetch_by_id(resp.id.as_str()).await.unwrap();
    assert_eq!(saved.colors, vec!["indigo".to_string()]);
}

#[tokio::test]
async fn create_product_bad_request() {
    let shr_state = ut_usecase_shared_state();
    let cases = [
        (
            json!({"price": 39.5, "stock": 12}),
            ProductIntakeError::MissingRequiredFields,
        ),
        (
            json!({"name": "denim overalls", "price": -1.0, "stock": 12}),
            ProductIntakeError::NegativeAmount,
        ),
        (
            json!({"name": "denim overalls", "price": 39.5, "stock": 12, "category": "Pets"}),
            ProductIntakeError::UnknownCategory,
        ),
    ];
    for (raw, expect) in cases {
        let uc = CreateProductUseCase {
            repo_product: app_repo_product(shr_state.datastore()).await.unwrap(),
        };
        let result = uc.execute(ut_req_data(raw)).await;
        match result.err().unwrap() {
            ProductUcError::ReqContent(e) => assert_eq!(e, expect),
            _others => panic!("expected request-content error"),
        }
    }
}

#[tokio::test]
async fn edit_product_partial() {
    let shr_state = ut_usecase_shared_state();
    let uc = CreateProductUseCase {
        repo_product: app_repo_product(shr_state.datastore()).await.unwrap(),
    };
    let resp = uc
        .execute(ut_req_data(json!({"name": "rattle", "price": 3.25, "stock": 7})))
        .await
        .ok()
        .unwrap();
    let pid = resp.id;

    let uc = EditProductUseCase {
        repo_product: app_repo_product(shr_state.datastore()).await.unwrap(),
    };
    let patch: ProductEditReqData =
        serde_json::from_value(json!({"stock": 30, "category": "Baby"})).unwrap();
    let updated = uc.execute(pid.clone(), patch).await.ok().unwrap();
    assert_eq!(updated.stock, 30u32);
    assert_eq!(updated.category.as_str(), "Baby");
    assert_eq!(updated.name.as_str(), "rattle");
    assert_eq!(updated.price, Decimal::new(325, 2));

    let uc = EditProductUseCase {
        repo_product: app_repo_product(shr_state.datastore()).await.unwrap(),
    };
    let patch: ProductEditReqData = serde_json::from_value(json!({"stock": 1})).unwrap();
    let result = uc.execute("beef".to_string(), patch).await;
    assert!(matches!(result.err().unwrap(), ProductUcError::NotFound));
}

#[tokio::test]
async fn list_products_by_category() {
    let shr_state = ut_usecase_shared_state();
    for raw in [
        json!({"name": "rattle", "price": 3.25, "stock": 7, "category": "Baby"}),
        json!({"name": "denim overalls", "price": 39.5, "stock": 12, "category": "Kids"}),
        json!({"name": "bib set", "price": 6.0, "stock": 20, "category": "Baby"}),
    ] {
        let uc = CreateProductUseCase {
            repo_product: app_repo_product(shr_state.datastore()).await.unwrap(),
        };
        uc.execute(ut_req_data(raw)).await.ok().unwrap();
    }
    let uc = ReadProductsUseCase {
        repo_product: app_repo_product(shr_state.datastore()).await.unwrap(),
    };
    let found = uc.execute_by_category("Baby".to_string()).await.ok().unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|p| p.category.as_str() == "Baby"));

    let uc = ReadProductsUseCase {
        repo_product: app_repo_product(shr_state.datastore()).await.unwrap(),
    };
    let result = uc.execute_by_category("Everything".to_string()).await;
    match result.err().unwrap() {
        ProductUcError::ReqContent(e) => {
            assert_eq!(e, ProductIntakeError::UnknownCategory);
            assert_eq!(
                e.message(),
                "invalid category, must be one of: Women, Men, Kids, Baby"
            );
        }
        _others => panic!("expected unknown-category error"),
    }

    let uc = ReadProductsUseCase {
        repo_product: app_repo_product(shr_state.datastore()).await.unwrap(),
    };
    let found = uc.execute_all().await.unwrap();
    assert_eq!(found.len(), 3);
}

#[tokio::test]
async fn discard_product_ok() {
    let shr_state = ut_usecase_shared_state();
    let uc = CreateProductUseCase {
        repo_product: app_repo_product(shr_state.datastore()).await.unwrap(),
    };
    let resp = uc
        .execute(ut_req_data(json!({"name": "rattle", "price": 3.25, "stock": 7})))
        .await
        .ok()
        .unwrap();
    let uc = DiscardProductUseCase {
        repo_product: app_repo_product(shr_state.datastore()).await.unwrap(),
    };
    uc.execute(resp.id.clone()).await.ok().unwrap();
    let uc = ReadProductsUseCase {
        repo_product: app_repo_product(shr_state.datastore()).await.unwrap(),
    };
    let result = uc.execute_single(resp.id).await;
    assert!(matches!(result.err().unwrap(), ProductUcError::NotFound));
}
