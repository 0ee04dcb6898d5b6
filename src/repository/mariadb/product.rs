use std::ops::DerefMut;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::mysql::MySqlRow;
use sqlx::Row;

use crate::datastore::AppMariaDbStore;
use crate::error::{AppError, AppErrorCode};
use crate::model::{ProductCategory, ProductModel};

use super::super::AbsProductRepo;
use super::OidBytes;

const COL_SEQ: &str = "`id_`,`name`,`price`,`stock`,`sold_count`,`image`,`category`,`colors`,`sizes`,`description`,`created_at`,`updated_at`";

pub(super) fn try_into_product_model(row: MySqlRow) -> DefaultResult<ProductModel, AppError> {
    let id = OidBytes::to_app_oid(&row, 0)?;
    let name = row.try_get::<String, usize>(1)?;
    let price = row.try_get::<Decimal, usize>(2)?;
    let stock = row.try_get::<u32, usize>(3)?;
    let sold_count = row.try_get::<u32, usize>(4)?;
    let image = row.try_get::<String, usize>(5)?;
    let category = row.try_get::<&str, usize>(6)?.parse::<ProductCategory>()?;
    let colors = serde_json::from_str::<Vec<String>>(row.try_get::<&str, usize>(7)?)
        .map_err(|e| AppError {
            code: AppErrorCode::DataCorruption,
            detail: Some(e.to_string() + ", store-product-colors"),
        })?;
    let sizes = serde_json::from_str::<Vec<String>>(row.try_get::<&str, usize>(8)?)
        .map_err(|e| AppError {
            code: AppErrorCode::DataCorruption,
            detail: Some(e.to_string() + ", store-product-sizes"),
        })?;
    let description = row.try_get::<String, usize>(9)?;
    let create_time = row.try_get::<DateTime<Utc>, usize>(10)?.into();
    let update_time = row.try_get::<DateTime<Utc>, usize>(11)?.into();
    Ok(ProductModel {
        id,
        name,
        price,
        stock,
        sold_count,
        image,
        category,
        colors,
        sizes,
        description,
        create_time,
        update_time,
    })
} // end of fn try_into_product_model

fn in_placeholders(num: usize) -> String {
    (0..num).map(|_n| "?").collect::<Vec<_>>().join(",")
}

pub struct ProductMariaDbRepo {
    _db: Arc<AppMariaDbStore>,
}

impl ProductMariaDbRepo {
    pub(crate) fn new(dbs: &Vec<Arc<AppMariaDbStore>>) -> DefaultResult<Self, AppError> {
        if let Some(db) = dbs.first() {
            Ok(Self { _db: db.clone() })
        } else {
            Err(AppError {
                code: AppErrorCode::MissingDataStore,
                detail: Some("mariadb".to_string()),
            })
        } // TODO, currently this repo always grabs the first db pool,
          // consider to balance loading when the app scales
    }

    async fn fetch_with_condition(
        &self,
        condition: &str,
        bind_oids: Vec<OidBytes>,
        bind_text: Option<String>,
    ) -> DefaultResult<Vec<ProductModel>, AppError> {
        let sql_patt = format!(
            "SELECT {COL_SEQ} FROM `store_product` {} ORDER BY `created_at` DESC",
            condition
        );
        let mut query = sqlx::query(sql_patt.as_str());
        for oid in bind_oids.iter() {
            query = query.bind(oid.as_column());
        }
        if let Some(t) = bind_text.as_ref() {
            query = query.bind(t.as_str());
        }
        let mut conn = self._db.acquire().await?;
        let rows = query.fetch_all(conn.deref_mut()).await?;
        rows.into_iter()
            .map(try_into_product_model)
            .collect::<DefaultResult<Vec<_>, AppError>>()
    }
} // end of impl ProductMariaDbRepo

#[async_trait]
impl AbsProductRepo for ProductMariaDbRepo {
    async fn create(&self, item: ProductModel) -> DefaultResult<ProductModel, AppError> {
        let oid = OidBytes::try_from(item.id.as_str())?;
        let sql_patt = format!(
            "INSERT INTO `store_product`({COL_SEQ}) VALUES (?,?,?,?,?,?,?,?,?,?,?,?)"
        );
        let query = sqlx::query(sql_patt.as_str())
            .bind(oid.as_column())
            .bind(item.name.as_str())
            .bind(item.price)
            .bind(item.stock)
            .bind(item.sold_count)
            .bind(item.image.as_str())
            .bind(item.category.as_str())
            .bind(serde_json::to_string(&item.colors).unwrap())
            .bind(serde_json::to_string(&item.sizes).unwrap())
            .bind(item.description.as_str())
            .bind(item.create_time.with_timezone(&Utc))
            .bind(item.update_time.with_timezone(&Utc));
        let mut conn = self._db.acquire().await?;
        let rs = query.execute(conn.deref_mut()).await?;
        if rs.rows_affected() != 1 {
            let detail = format!("product-insert, id:{}", item.id.as_str());
            return Err(AppError {
                code: AppErrorCode::DataCorruption,
                detail: Some(detail),
            });
        }
        Ok(item)
    }

    async fn fetch_all(&self) -> DefaultResult<Vec<ProductModel>, AppError> {
        self.fetch_with_condition("", Vec::new(), None).await
    }

    async fn fetch_by_category(
        &self,
        category: ProductCategory,
    ) -> DefaultResult<Vec<ProductModel>, AppError> {
        self.fetch_with_condition(
            "WHERE `category`=?",
            Vec::new(),
            Some(category.as_str().to_string()),
        )
        .await
    }

    async fn fetch_by_id(&self, pid: &str) -> DefaultResult<ProductModel, AppError> {
        let mut found = self.fetch_many(vec![pid.to_string()]).await?;
        found.pop().ok_or(AppError {
            code: AppErrorCode::ProductNotExist,
            detail: Some(pid.to_string()),
        })
    }

    async fn fetch_many(&self, pids: Vec<String>) -> DefaultResult<Vec<ProductModel>, AppError> {
        if pids.is_empty() {
            return Ok(Vec::new());
        }
        let oids = pids
            .iter()
            .map(|p| OidBytes::try_from(p.as_str()))
            .collect::<DefaultResult<Vec<_>, AppError>>()?;
        let condition = format!("WHERE `id_` IN ({})", in_placeholders(oids.len()));
        self.fetch_with_condition(condition.as_str(), oids, None).await
    }

    async fn save(&self, item: ProductModel) -> DefaultResult<ProductModel, AppError> {
        let oid = OidBytes::try_from(item.id.as_str())?;
        let sql_patt = "UPDATE `store_product` SET `name`=?,`price`=?,`stock`=?,`sold_count`=?,\
             `image`=?,`category`=?,`colors`=?,`sizes`=?,`description`=?,`updated_at`=? WHERE `id_`=?";
        let query = sqlx::query(sql_patt)
            .bind(item.name.as_str())
            .bind(item.price)
            .bind(item.stock)
            .bind(item.sold_count)
            .bind(item.image.as_str())
            .bind(item.category.as_str())
            .bind(serde_json::to_string(&item.colors).unwrap())
            .bind(serde_json::to_string(&item.sizes).unwrap())
            .bind(item.description.as_str())
            .bind(item.update_time.with_timezone(&Utc))
            .bind(oid.as_column());
        let mut conn = self._db.acquire().await?;
        let rs = query.execute(conn.deref_mut()).await?;
        drop(conn);
        if rs.rows_affected() == 0 {
            // rows_affected counts changed rows only, the row may exist yet
            // hold identical content, distinguish before reporting not-found
            let _found = self.fetch_by_id(item.id.as_str()).await?;
        }
        Ok(item)
    }

    async fn delete(&self, pid: &str) -> DefaultResult<(), AppError> {
        let oid = OidBytes::try_from(pid)?;
        let query = sqlx::query("DELETE FROM `store_product` WHERE `id_`=?").bind(oid.as_column());
        let mut conn = self._db.acquire().await?;
        let rs = query.execute(conn.deref_mut()).await?;
        if rs.rows_affected() == 0 {
            return Err(AppError {
                code: AppErrorCode::ProductNotExist,
                detail: Some(pid.to_string()),
            });
        }
        Ok(())
    }
} // end of impl AbsProductRepo for ProductMariaDbRepo
