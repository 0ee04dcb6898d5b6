use axum::debug_handler;
use axum::extract::{Json as ExtractJson, Path as ExtractPath, State as ExtractState};
use axum::http::StatusCode as HttpStatusCode;
use axum::response::IntoResponse;

use crate::api::web::dto::{
    OrderCreateReqData, OrderCreateRespDto, OrderEditedRespDto, OrderLineStockErrorReason,
    OrderListRespDto, OrderSingleRespDto, OrderStatusReqDto, SimpleRespDto,
};
use crate::logging::{app_log_event, AppLogLevel};
use crate::repository::{app_repo_order, app_repo_product};
use crate::usecase::{
    CreateOrderUsKsErr, CreateOrderUseCase, DiscardOrderUseCase, OrderAccessUcError,
    ReadOrdersUseCase, UpdateOrderStatusUcError, UpdateOrderStatusUseCase,
};
use crate::AppSharedState;

use super::{error_body, resp_pack, serialize_or_fallback};

// always to specify state type explicitly to the debug macro
#[debug_handler(state = AppSharedState)]
pub(super) async fn create_handler(
    ExtractState(_appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<OrderCreateReqData>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let results = (
        app_repo_order(ds.clone()).await,
        app_repo_product(ds).await,
    );
    let (resp_status_code, serial_resp_body) = if let (Ok(repo_o), Ok(repo_p)) = results {
        let uc = CreateOrderUseCase {
            glb_state: _appstate,
            repo_order: repo_o,
            repo_product: repo_p,
        };
        match uc.execute(req_body).await {
            Ok(order_d) => {
                let obj = OrderCreateRespDto {
                    success: true,
                    message: "order created successfully",
                    order: order_d,
                };
                let (ok, serial) = serialize_or_fallback(&obj);
                let code = if ok {
                    HttpStatusCode::CREATED
                } else {
                    HttpStatusCode::INTERNAL_SERVER_ERROR
                };
                (code, serial)
            }
            Err(CreateOrderUsKsErr::ReqContent(ve)) => {
                (HttpStatusCode::BAD_REQUEST, error_body(ve.message()))
            }
            Err(CreateOrderUsKsErr::Inventory(lines)) => {
                let any_missing = lines
                    .iter()
                    .any(|l| matches!(l.reason, OrderLineStockErrorReason::NotExist));
                let msg = if any_missing {
                    "product not found"
                } else {
                    "insufficient stock"
                };
                (HttpStatusCode::CONFLICT, error_body(msg))
            }
            Err(CreateOrderUsKsErr::Server(errors)) => {
                let msg = errors
                    .into_iter()
                    .map(|e| format!("{:?}", e))
                    .collect::<Vec<_>>()
                    .join(", ");
                app_log_event!(log_ctx, AppLogLevel::ERROR, "{msg}");
                (
                    HttpStatusCode::INTERNAL_SERVER_ERROR,
                    error_body("server error during order creation"),
                )
            }
        }
    } else {
        let mut errmsgs = Vec::new();
        if let Err(e) = results.0 {
            errmsgs.push(e.to_string());
        }
        if let Err(e) = results.1 {
            errmsgs.push(e.to_string());
        }
        app_log_event!(
            log_ctx,
            AppLogLevel::ERROR,
            "repository init failure, reason: {:?}",
            errmsgs
        );
        (
            HttpStatusCode::INTERNAL_SERVER_ERROR,
            error_body("server error during order creation"),
        )
    };
    resp_pack(resp_status_code, serial_resp_body)
} // end of create_handler

#[debug_handler(state = AppSharedState)]
pub(super) async fn list_all_handler(
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let (status, body) = match app_repo_order(ds).await {
        Ok(repo_o) => {
            let uc = ReadOrdersUseCase { repo_order: repo_o };
            match uc.execute_all().await {
                Ok(orders) => {
                    let obj = OrderListRespDto {
                        success: true,
                        orders,
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
                    app_log_event!(log_ctx, AppLogLevel::ERROR, "fetch-all-orders: {e}");
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
pub(super) async fn list_by_buyer_handler(
    ExtractPath(username): ExtractPath<String>,
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let (status, body) = match app_repo_order(ds).await {
        Ok(repo_o) => {
            let uc = ReadOrdersUseCase { repo_order: repo_o };
            match uc.execute_by_buyer(username).await {
                Ok(orders) => {
                    let obj = OrderListRespDto {
                        success: true,
                        orders,
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
                    app_log_event!(log_ctx, AppLogLevel::ERROR, "fetch-buyer-orders: {e}");
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
    ExtractPath(oid): ExtractPath<String>,
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let (status, body) = match app_repo_order(ds).await {
        Ok(repo_o) => {
            let uc = ReadOrdersUseCase { repo_order: repo_o };
            match uc.execute_single(oid).await {
                Ok(order_d) => {
                    let obj = OrderSingleRespDto {
                        success: true,
                        order: order_d,
                    };
                    let (ok, serial) = serialize_or_fallback(&obj);
                    let code = if ok {
                        HttpStatusCode::OK
                    } else {
                        HttpStatusCode::INTERNAL_SERVER_ERROR
                    };
                    (code, serial)
                }
                Err(OrderAccessUcError::NotFound) => {
                    (HttpStatusCode::NOT_FOUND, error_body("order not found"))
                }
                Err(OrderAccessUcError::Server(e)) => {
                    app_log_event!(log_ctx, AppLogLevel::ERROR, "fetch-order: {e}");
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
pub(super) async fn update_status_handler(
    ExtractPath(oid): ExtractPath<String>,
    ExtractState(_appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<OrderStatusReqDto>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let status_label = match req_body.status {
        Some(v) => v,
        None => {
            let (status, body) = (HttpStatusCode::BAD_REQUEST, error_body("invalid status"));
            return resp_pack(status, body);
        }
    };
    let (status, body) = match app_repo_order(ds).await {
        Ok(repo_o) => {
            let uc = UpdateOrderStatusUseCase { repo_order: repo_o };
            match uc.execute(oid, status_label).await {
                Ok(order_d) => {
                    let obj = OrderEditedRespDto {
                        success: true,
                        message: "order status updated successfully",
                        order: order_d,
                    };
                    let (ok, serial) = serialize_or_fallback(&obj);
                    let code = if ok {
                        HttpStatusCode::OK
                    } else {
                        HttpStatusCode::INTERNAL_SERVER_ERROR
                    };
                    (code, serial)
                }
                Err(UpdateOrderStatusUcError::UnknownStatus) => {
                    (HttpStatusCode::BAD_REQUEST, error_body("invalid status"))
                }
                Err(UpdateOrderStatusUcError::IllegalTransition { from, to }) => {
                    app_log_event!(
                        log_ctx,
                        AppLogLevel::INFO,
                        "status transition denied, from:{}, to:{}",
                        from.as_str(),
                        to.as_str()
                    );
                    (
                        HttpStatusCode::CONFLICT,
                        error_body("invalid status transition"),
                    )
                }
                Err(UpdateOrderStatusUcError::NotFound) => {
                    (HttpStatusCode::NOT_FOUND, error_body("order not found"))
                }
                Err(UpdateOrderStatusUcError::Server(e)) => {
                    app_log_event!(log_ctx, AppLogLevel::ERROR, "update-status: {e}");
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
} // end of update_status_handler

#[debug_handler(state = AppSharedState)]
pub(super) async fn discard_handler(
    ExtractPath(oid): ExtractPath<String>,
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let (status, body) = match app_repo_order(ds).await {
        Ok(repo_o) => {
            let uc = DiscardOrderUseCase { repo_order: repo_o };
            match uc.execute(oid).await {
                Ok(_) => {
                    let obj = SimpleRespDto {
                        success: true,
                        message: "order deleted successfully",
                    };
                    let (_ok, serial) = serialize_or_fallback(&obj);
                    (HttpStatusCode::OK, serial)
                }
                Err(OrderAccessUcError::NotFound) => {
                    (HttpStatusCode::NOT_FOUND, error_body("order not found"))
                }
                Err(OrderAccessUcError::Server(e)) => {
                    app_log_event!(log_ctx, AppLogLevel::ERROR, "discard-order: {e}");
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
