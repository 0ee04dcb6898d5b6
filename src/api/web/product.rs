use axum::debug_handler;
use axum::extract::{Json as ExtractJson, Path as ExtractPath, State as ExtractState};
use axum::http::StatusCode as HttpStatusCode;
use axum::response::IntoResponse;

use crate::api::web::dto::{
    ProductCreateReqData, ProductCreateRespDto, ProductEditReqData, ProductEditedRespDto,
    ProductListRespDto, ProductSingleRespDto, SimpleRespDto,
};
use crate::logging::{app_log_event, AppLogLevel};
use crate::repository::app_repo_product;
use crate::usecase::{
    CreateProductUseCase, DiscardProductUseCase, EditProductUseCase, ProductUcError,
    ReadProductsUseCase,
};
use crate::AppSharedState;

use super::{error_body, resp_pack, serialize_or_fallback};

#[debug_handler(state = AppSharedState)]
pub(super) async fn create_handler(
    ExtractState(_appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<ProductCreateReqData>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let (status, body) = match app_repo_product(ds).await {
        Ok(repo_p) => {
            let uc = CreateProductUseCase { repo_product: repo_p };
            match uc.execute(req_body).await {
                Ok(product_d) => {
                    let obj = ProductCreateRespDto {
                        success: true,
                        message: "product created successfully",
                        product: product_d,
                    };
                    let (ok, serial) = serialize_or_fallback(&obj);
                    let code = if ok {
                        HttpStatusCode::CREATED
                    } else {
                        HttpStatusCode::INTERNAL_SERVER_ERROR
                    };
                    (code, serial)
                }
                Err(ProductUcError::ReqContent(ve)) => {
                    (HttpStatusCode::BAD_REQUEST, error_body(ve.message()))
                }
                Err(ProductUcError::NotFound) => {
                    (HttpStatusCode::NOT_FOUND, error_body("product not found"))
                }
                Err(ProductUcError::Server(e)) => {
                    app_log_event!(log_ctx, AppLogLevel::ERROR, "create-product: {e}");
                    (HttpStatusCode::INTERNAL_SERVER_ERROR, error_body("server error"))
                }
            }
        }
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "repo-init: {e}");
            (HttpStatusCode::INTERNAL_SERVER_ERROR, error_body("server error"))
        }
    };
    resp_pack(status, body)
} // end of create_handler

#[debug_handler(state = AppSharedState)]
pub(super) async fn list_all_handler(
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let (status, body) = match app_repo_product(ds).await {
        Ok(repo_p) => {
            let uc = ReadProductsUseCase { repo_product: repo_p };
            match uc.execute_all().await {
                Ok(products) => {
                    let obj = ProductListRespDto {
                        success: true,
                        products,
                    };
                    let (ok, serial) = serialize_or_fallback(&obj);
                    let code = if ok {
                        HttpStatusCode::OK
                    } else {
                        HttpStatusCode::INTERNAL_SERVER_ERROR
                    };
                    (code, serial)
                }
                Err(e) => {
                    app_log_event!(log_ctx, AppLogLevel::ERROR, "fetch-all-products: {e}");
                    (HttpStatusCode::INTERNAL_SERVER_ERROR, error_body("server error"))
                }
            }
        }
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "repo-init: {e}");
            (HttpStatusCode::INTERNAL_SERVER_ERROR, error_body("server error"))
        }
    };
    resp_pack(status, body)
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn list_by_category_handler(
    ExtractPath(category): ExtractPath<String>,
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let (status, body) = match app_repo_product(ds).await {
        Ok(repo_p) => {
            let uc = ReadProductsUseCase { repo_product: repo_p };
            match uc.execute_by_category(category).await {
                Ok(products) => {
                    let obj = ProductListRespDto {
                        success: true,
                        products,
                    };
                    let (ok, serial) = serialize_or_fallback(&obj);
                    let code = if ok {
                        HttpStatusCode::OK
                    } else {
                        HttpStatusCode::INTERNAL_SERVER_ERROR
                    };
                    (code, serial)
                }
                Err(ProductUcError::ReqContent(ve)) => {
                    (HttpStatusCode::BAD_REQUEST, error_body(ve.message()))
                }
                Err(ProductUcError::NotFound) => {
                    (HttpStatusCode::NOT_FOUND, error_body("product not found"))
                }
                Err(ProductUcError::Server(e)) => {
                    app_log_event!(log_ctx, AppLogLevel::ERROR, "fetch-category: {e}");
                    (HttpStatusCode::INTERNAL_SERVER_ERROR, error_body("server error"))
                }
            }
        }
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "repo-init: {e}");
            (HttpStatusCode::INTERNAL_SERVER_ERROR, error_body("server error"))
        }
    };
    resp_pack(status, body)
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn read_handler(
    ExtractPath(pid): ExtractPath<String>,
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let (status, body) = match app_repo_product(ds).await {
        Ok(repo_p) => {
            let uc = ReadProductsUseCase { repo_product: repo_p };
            match uc.execute_single(pid).await {
                Ok(product_d) => {
                    let obj = ProductSingleRespDto {
                        success: true,
                        product: product_d,
                    };
                    let (ok, serial) = serialize_or_fallback(&obj);
                    let code = if ok {
                        HttpStatusCode::OK
                    } else {
                        HttpStatusCode::INTERNAL_SERVER_ERROR
                    };
                    (code, serial)
                }
                Err(ProductUcError::NotFound) => {
                    (HttpStatusCode::NOT_FOUND, error_body("product not found"))
                }
                Err(ProductUcError::ReqContent(ve)) => {
                    (HttpStatusCode::BAD_REQUEST, error_body(ve.message()))
                }
                Err(ProductUcError::Server(e)) => {
                    app_log_event!(log_ctx, AppLogLevel::ERROR, "fetch-product: {e}");
                    (HttpStatusCode::INTERNAL_SERVER_ERROR, error_body("server error"))
                }
            }
        }
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "repo-init: {e}");
            (HttpStatusCode::INTERNAL_SERVER_ERROR, error_body("server error"))
        }
    };
    resp_pack(status, body)
}

#[debug_handler(state = AppSharedState)]
pub(super) async fn edit_handler(
    ExtractPath(pid): ExtractPath<String>,
    ExtractState(_appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<ProductEditReqData>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let (status, body) = match app_repo_product(ds).await {
        Ok(repo_p) => {
            let uc = EditProductUseCase { repo_product: repo_p };
            match uc.execute(pid, req_body).await {
                Ok(product_d) => {
                    let obj = ProductEditedRespDto {
                        success: true,
                        message: "product updated successfully",
                        product: product_d,
                    };
                    let (ok, serial) = serialize_or_fallback(&obj);
                    let code = if ok {
                        HttpStatusCode::OK
                    } else {
                        HttpStatusCode::INTERNAL_SERVER_ERROR
                    };
                    (code, serial)
                }
                Err(ProductUcError::ReqContent(ve)) => {
                    (HttpStatusCode::BAD_REQUEST, error_body(ve.message()))
                }
                Err(ProductUcError::NotFound) => {
                    (HttpStatusCode::NOT_FOUND, error_body("product not found"))
                }
                Err(ProductUcError::Server(e)) => {
                    app_log_event!(log_ctx, AppLogLevel::ERROR, "edit-product: {e}");
                    (HttpStatusCode::INTERNAL_SERVER_ERROR, error_body("server error"))
                }
            }
        }
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "repo-init: {e}");
            (HttpStatusCode::INTERNAL_SERVER_ERROR, error_body("server error"))
        }
    };
    resp_pack(status, body)
} // end of edit_handler

#[debug_handler(state = AppSharedState)]
pub(super) async fn discard_handler(
    ExtractPath(pid): ExtractPath<String>,
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let (status, body) = match app_repo_product(ds).await {
        Ok(repo_p) => {
            let uc = DiscardProductUseCase { repo_product: repo_p };
            match uc.execute(pid).await {
                Ok(_) => {
                    let obj = SimpleRespDto {
                        success: true,
                        message: "product deleted successfully",
                    };
                    let (_ok, serial) = serialize_or_fallback(&obj);
                    (HttpStatusCode::OK, serial)
                }
                Err(ProductUcError::NotFound) => {
                    (HttpStatusCode::NOT_FOUND, error_body("product not found"))
                }
                Err(ProductUcError::ReqContent(ve)) => {
                    (HttpStatusCode::BAD_REQUEST, error_body(ve.message()))
                }
                Err(ProductUcError::Server(e)) => {
                    app_log_event!(log_ctx, AppLogLevel::ERROR, "discard-product: {e}");
                    (HttpStatusCode::INTERNAL_SERVER_ERROR, error_body("server error"))
                }
            }
        }
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "repo-init: {e}");
            (HttpStatusCode::INTERNAL_SERVER_ERROR, error_body("server error"))
        }
    };
    resp_pack(status, body)
}
