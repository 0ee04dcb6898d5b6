use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::str::FromStr;

use chrono::Local as LocalTime;
use rust_decimal::Decimal;

use crate::api::web::dto::{
    OrderCreateReqData, OrderLineStockErrorDto, OrderLineStockErrorReason, OrderRespDto,
};
use crate::constant::app_meta;
use crate::error::{AppError, AppErrorCode};
use crate::logging::{app_log_event, AppLogLevel};
use crate::model::{
    try_adjust_inventory, OrderAmountsModel, OrderDraftModel, OrderIntakeError, OrderLineModel,
    OrderModel, OrderStatus, ProductModel,
};
use crate::repository::{AbsOrderRepo, AbsProductRepo};
use crate::AppSharedState;

pub enum CreateOrderUsKsErr {
    ReqContent(OrderIntakeError),
    // per-line inventory failures, the order was NOT persisted
    Inventory(Vec<OrderLineStockErrorDto>),
    Server(Vec<AppError>),
}

pub enum UpdateOrderStatusUcError {
    UnknownStatus,
    IllegalTransition { from: OrderStatus, to: OrderStatus },
    NotFound,
    Server(AppError),
}

pub enum OrderAccessUcError {
    NotFound,
    Server(AppError),
}

impl From<AppError> for OrderAccessUcError {
    fn from(value: AppError) -> Self {
        if matches!(value.code, AppErrorCode::OrderNotExist) {
            Self::NotFound
        } else {
            Self::Server(value)
        }
    }
}

pub struct CreateOrderUseCase {
    pub glb_state: AppSharedState,
    pub repo_order: Box<dyn AbsOrderRepo>,
    pub repo_product: Box<dyn AbsProductRepo>,
}

pub struct UpdateOrderStatusUseCase {
    pub repo_order: Box<dyn AbsOrderRepo>,
}

pub struct ReadOrdersUseCase {
    pub repo_order: Box<dyn AbsOrderRepo>,
}

pub struct DiscardOrderUseCase {
    pub repo_order: Box<dyn AbsOrderRepo>,
}

impl CreateOrderUseCase {
    pub async fn execute(
        self,
        req: OrderCreateReqData,
    ) -> DefaultResult<OrderRespDto, CreateOrderUsKsErr> {
        let mut draft = OrderDraftModel::try_from(req).map_err(CreateOrderUsKsErr::ReqContent)?;
        let pids = draft
            .lines
            .iter()
            .filter_map(|l| l.product_id.clone())
            .collect::<Vec<_>>();
        let products = self
            .repo_product
            .fetch_many(pids)
            .await
            .map_err(|e| CreateOrderUsKsErr::Server(vec![e]))?;
        let subtotal = Self::reprice_lines(&mut draft.lines, &products)
            .map_err(CreateOrderUsKsErr::Inventory)?;
        let amounts =
            OrderAmountsModel::try_build(subtotal, draft.shipping, draft.tax, draft.total)
                .map_err(CreateOrderUsKsErr::ReqContent)?;
        let oid = OrderModel::generate_id(app_meta::MACHINE_CODE);
        let timenow = LocalTime::now().fixed_offset();
        let order = OrderModel::from_draft(draft, amounts, oid, timenow);
        match self.repo_order.create(&order, try_adjust_inventory).await {
            Ok(()) => Ok(OrderRespDto::from(&order)),
            Err(Ok(line_errors)) => {
                let logctx_p = self.glb_state.log_context().clone();
                app_log_event!(
                    logctx_p,
                    AppLogLevel::WARNING,
                    "inventory rejected order, buyer:{}, lines:{:?}",
                    order.buyer.username.as_str(),
                    line_errors
                );
                Err(CreateOrderUsKsErr::Inventory(line_errors))
            }
            Err(Err(e)) => {
                let logctx_p = self.glb_state.log_context().clone();
                app_log_event!(logctx_p, AppLogLevel::ERROR, "repo-fail-save: {e}");
                Err(CreateOrderUsKsErr::Server(vec![e]))
            }
        }
    } // end of fn execute

    // overwrite per-line unit prices with the authoritative stored product
    // price, lines without a product identifier keep the submitted price.
    // Returns the recomputed subtotal.
    pub fn reprice_lines(
        lines: &mut [OrderLineModel],
        products: &[ProductModel],
    ) -> DefaultResult<Decimal, Vec<OrderLineStockErrorDto>> {
        let mut missing = Vec::new();
        for line in lines.iter_mut() {
            if let Some(pid) = line.product_id.as_ref() {
                let found = products.iter().find(|p| p.id.as_str() == pid.as_str());
                match found {
                    Some(p) => {
                        line.price = p.price;
                    }
                    None => missing.push(OrderLineStockErrorDto {
                        product_id: pid.clone(),
                        reason: OrderLineStockErrorReason::NotExist,
                        shortage: None,
                    }),
                }
            }
        }
        if missing.is_empty() {
            let subtotal = lines
                .iter()
                .map(|l| l.price * Decimal::from(l.quantity))
                .sum::<Decimal>();
            Ok(subtotal)
        } else {
            Err(missing)
        }
    } // end of fn reprice_lines
} // end of impl CreateOrderUseCase

impl UpdateOrderStatusUseCase {
    pub async fn execute(
        self,
        oid: String,
        status_label: String,
    ) -> DefaultResult<OrderRespDto, UpdateOrderStatusUcError> {
        let next = OrderStatus::from_str(status_label.as_str())
            .map_err(|_e| UpdateOrderStatusUcError::UnknownStatus)?;
        let saved = self.repo_order.fetch_by_id(oid.as_str()).await.map_err(|e| {
            if matches!(e.code, AppErrorCode::OrderNotExist) {
                UpdateOrderStatusUcError::NotFound
            } else {
                UpdateOrderStatusUcError::Server(e)
            }
        })?;
        if !saved.status.accepts(next) {
            return Err(UpdateOrderStatusUcError::IllegalTransition {
                from: saved.status,
                to: next,
            });
        }
        let timenow = LocalTime::now().fixed_offset();
        let updated = self
            .repo_order
            .save_status(oid.as_str(), next, timenow)
            .await
            .map_err(UpdateOrderStatusUcError::Server)?;
        Ok(OrderRespDto::from(&updated))
    }
} // end of impl UpdateOrderStatusUseCase

impl ReadOrdersUseCase {
    pub async fn execute_all(self) -> DefaultResult<Vec<OrderRespDto>, AppError> {
        let ms = self.repo_order.fetch_all().await?;
        Ok(ms.iter().map(OrderRespDto::from).collect())
    }

    pub async fn execute_by_buyer(
        self,
        username: String,
    ) -> DefaultResult<Vec<OrderRespDto>, AppError> {
        let ms = self.repo_order.fetch_by_buyer(username.as_str()).await?;
        Ok(ms.iter().map(OrderRespDto::from).collect())
    }

    pub async fn execute_single(
        self,
        oid: String,
    ) -> DefaultResult<OrderRespDto, OrderAccessUcError> {
        let m = self.repo_order.fetch_by_id(oid.as_str()).await?;
        Ok(OrderRespDto::from(&m))
    }
} // end of impl ReadOrdersUseCase

impl DiscardOrderUseCase {
    pub async fn execute(self, oid: String) -> DefaultResult<(), OrderAccessUcError> {
        self.repo_order.delete(oid.as_str()).await?;
        Ok(())
    }
}
