mod in_mem;

// make in-memory repo visible only for testing purpose
pub use in_mem::order::OrderInMemRepo;
pub use in_mem::product::ProductInMemRepo;

#[cfg(feature = "mariadb")]
mod mariadb;

#[cfg(feature = "mariadb")]
use mariadb::order::OrderMariaDbRepo;

#[cfg(feature = "mariadb")]
use mariadb::product::ProductMariaDbRepo;

use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;
use std::vec::Vec;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

use crate::api::web::dto::OrderLineStockErrorDto;
use crate::error::{AppError, AppErrorCode};
use crate::model::{OrderModel, OrderStatus, ProductCategory, ProductModel, StockAdjustResult};
use crate::AppDataStoreContext;

// creation outcome, the outer error distinguishes per-line inventory
// failures reported back to the client from low-level storage failures
pub type AppOrderCreateReturn =
    DefaultResult<(), DefaultResult<Vec<OrderLineStockErrorDto>, AppError>>;

// domain rule invoked inside the repository's atomic section, if the
// function pointer type were declared directly in the trait method it
// would be viewed as a closure block
pub type AppStockAdjustUserFunc = fn(&mut Vec<ProductModel>, &OrderModel) -> StockAdjustResult;

// the repository instance may be used across an await,
// the future created by app callers has to be able to pass to different
// threads, it is the reason to add `Send` and `Sync` as super-traits
#[async_trait]
pub trait AbsOrderRepo: Sync + Send {
    // persist the given order and apply `usr_cb` to the products referenced
    // by its lines, both as one atomic unit, nothing is persisted when the
    // callback reports any line error
    async fn create(&self, order: &OrderModel, usr_cb: AppStockAdjustUserFunc)
        -> AppOrderCreateReturn;

    // full result sets sorted newest-first, no pagination
    async fn fetch_all(&self) -> DefaultResult<Vec<OrderModel>, AppError>;

    async fn fetch_by_buyer(&self, username: &str) -> DefaultResult<Vec<OrderModel>, AppError>;

    async fn fetch_by_id(&self, oid: &str) -> DefaultResult<OrderModel, AppError>;

    async fn save_status(
        &self,
        oid: &str,
        new_status: OrderStatus,
        time: DateTime<FixedOffset>,
    ) -> DefaultResult<OrderModel, AppError>;

    // removal is an administrative purge, inventory adjustments previously
    // applied by this order are NOT compensated
    async fn delete(&self, oid: &str) -> DefaultResult<(), AppError>;
} // end of trait AbsOrderRepo

#[async_trait]
pub trait AbsProductRepo: Sync + Send {
    async fn create(&self, item: ProductModel) -> DefaultResult<ProductModel, AppError>;

    async fn fetch_all(&self) -> DefaultResult<Vec<ProductModel>, AppError>;

    async fn fetch_by_category(
        &self,
        category: ProductCategory,
    ) -> DefaultResult<Vec<ProductModel>, AppError>;

    async fn fetch_by_id(&self, pid: &str) -> DefaultResult<ProductModel, AppError>;

    // identifiers which do not resolve are silently absent from the result
    async fn fetch_many(&self, pids: Vec<String>) -> DefaultResult<Vec<ProductModel>, AppError>;

    async fn save(&self, item: ProductModel) -> DefaultResult<ProductModel, AppError>;

    async fn delete(&self, pid: &str) -> DefaultResult<(), AppError>;
} // end of trait AbsProductRepo

pub async fn app_repo_order(
    ds: Arc<AppDataStoreContext>,
) -> DefaultResult<Box<dyn AbsOrderRepo>, AppError> {
    #[cfg(feature = "mariadb")]
    if let Some(dbs) = ds.sql_dbs.as_ref() {
        let obj = OrderMariaDbRepo::new(dbs)?;
        Ok(Box::new(obj))
    } else {
        Err(AppError {
            code: AppErrorCode::FeatureDisabled,
            detail: Some("mariadb".to_string()),
        })
    }
    #[cfg(not(feature = "mariadb"))]
    if let Some(m) = &ds.in_mem {
        let obj = OrderInMemRepo::new(m.clone()).await?;
        Ok(Box::new(obj))
    } else {
        Err(AppError {
            code: AppErrorCode::MissingDataStore,
            detail: Some("unknown-type".to_string()),
        })
    }
}

pub async fn app_repo_product(
    ds: Arc<AppDataStoreContext>,
) -> DefaultResult<Box<dyn AbsProductRepo>, AppError> {
    #[cfg(feature = "mariadb")]
    if let Some(dbs) = ds.sql_dbs.as_ref() {
        let obj = ProductMariaDbRepo::new(dbs)?;
        Ok(Box::new(obj))
    } else {
        Err(AppError {
            code: AppErrorCode::FeatureDisabled,
            detail: Some("mariadb".to_string()),
        })
    }
    #[cfg(not(feature = "mariadb"))]
    if let Some(m) = &ds.in_mem {
        let obj = ProductInMemRepo::new(m.clone()).await?;
        Ok(Box::new(obj))
    } else {
        Err(AppError {
            code: AppErrorCode::MissingDataStore,
            detail: Some("unknown-type".to_string()),
        })
    }
}
