use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::str::FromStr;

use chrono::Local as LocalTime;

use crate::api::web::dto::{ProductCreateReqData, ProductEditReqData, ProductRespDto};
use crate::constant::app_meta;
use crate::error::{AppError, AppErrorCode};
use crate::model::{ProductCategory, ProductIntakeError, ProductModel};
use crate::repository::AbsProductRepo;

pub enum ProductUcError {
    ReqContent(ProductIntakeError),
    NotFound,
    Server(AppError),
}

impl From<AppError> for ProductUcError {
    fn from(value: AppError) -> Self {
        if matches!(value.code, AppErrorCode::ProductNotExist) {
            Self::NotFound
        } else {
            Self::Server(value)
        }
    }
}

pub struct CreateProductUseCase {
    pub repo_product: Box<dyn AbsProductRepo>,
}

pub struct EditProductUseCase {
    pub repo_product: Box<dyn AbsProductRepo>,
}

pub struct DiscardProductUseCase {
    pub repo_product: Box<dyn AbsProductRepo>,
}

pub struct ReadProductsUseCase {
    pub repo_product: Box<dyn AbsProductRepo>,
}

impl CreateProductUseCase {
    pub async fn execute(
        self,
        req: ProductCreateReqData,
    ) -> DefaultResult<ProductRespDto, ProductUcError> {
        let pid = ProductModel::generate_id(app_meta::MACHINE_CODE);
        let timenow = LocalTime::now().fixed_offset();
        let item =
            ProductModel::try_build(req, pid, timenow).map_err(ProductUcError::ReqContent)?;
        let saved = self
            .repo_product
            .create(item)
            .await
            .map_err(ProductUcError::Server)?;
        Ok(ProductRespDto::from(&saved))
    }
}

impl EditProductUseCase {
    pub async fn execute(
        self,
        pid: String,
        req: ProductEditReqData,
    ) -> DefaultResult<ProductRespDto, ProductUcError> {
        let mut saved = self.repo_product.fetch_by_id(pid.as_str()).await?;
        let timenow = LocalTime::now().fixed_offset();
        saved
            .apply_patch(req, timenow)
            .map_err(ProductUcError::ReqContent)?;
        let saved = self
            .repo_product
            .save(saved)
            .await
            .map_err(ProductUcError::Server)?;
        Ok(ProductRespDto::from(&saved))
    }
}

impl DiscardProductUseCase {
    pub async fn execute(self, pid: String) -> DefaultResult<(), ProductUcError> {
        self.repo_product.delete(pid.as_str()).await?;
        Ok(())
    }
}

impl ReadProductsUseCase {
    pub async fn execute_all(self) -> DefaultResult<Vec<ProductRespDto>, AppError> {
        let ms = self.repo_product.fetch_all().await?;
        Ok(ms.iter().map(ProductRespDto::from).collect())
    }

    pub async fn execute_by_category(
        self,
        label: String,
    ) -> DefaultResult<Vec<ProductRespDto>, ProductUcError> {
        let category = ProductCategory::from_str(label.as_str())
            .map_err(|_e| ProductUcError::ReqContent(ProductIntakeError::UnknownCategory))?;
        let ms = self
            .repo_product
            .fetch_by_category(category)
            .await
            .map_err(ProductUcError::Server)?;
        Ok(ms.iter().map(ProductRespDto::from).collect())
    }

    pub async fn execute_single(
        self,
        pid: String,
    ) -> DefaultResult<ProductRespDto, ProductUcError> {
        let m = self.repo_product.fetch_by_id(pid.as_str()).await?;
        Ok(ProductRespDto::from(&m))
    }
} // end of impl ReadProductsUseCase
