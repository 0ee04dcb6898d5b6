use std::boxed::Box;
use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use rust_decimal::Decimal;

use crate::datastore::{
    AbsDStoreFilterKeyOp, AbstInMemoryDStore, AppInMemFetchedSingleRow, AppInMemFetchedSingleTable,
};
use crate::error::{AppError, AppErrorCode};
use crate::model::{ProductCategory, ProductModel};

use super::super::AbsProductRepo;

pub(super) mod _productm {
    pub(crate) const TABLE_LABEL: &str = "store_product";

    pub(super) enum InMemColIdx {
        Name,
        Price,
        Stock,
        SoldCount,
        Image,
        Category,
        Colors,
        Sizes,
        Description,
        CreateTime,
        UpdateTime,
        TotNumColumns,
    }
    impl From<InMemColIdx> for usize {
        fn from(value: InMemColIdx) -> usize {
            match value {
                InMemColIdx::Name => 0,
                InMemColIdx::Price => 1,
                InMemColIdx::Stock => 2,
                InMemColIdx::SoldCount => 3,
                InMemColIdx::Image => 4,
                InMemColIdx::Category => 5,
                InMemColIdx::Colors => 6,
                InMemColIdx::Sizes => 7,
                InMemColIdx::Description => 8,
                InMemColIdx::CreateTime => 9,
                InMemColIdx::UpdateTime => 10,
                InMemColIdx::TotNumColumns => 11,
            }
        }
    }
}

fn _corrupt_err(pid: &str, what: &str) -> AppError {
    AppError {
        code: AppErrorCode::DataCorruption,
        detail: Some(format!("store-product, id:{}, field:{}", pid, what)),
    }
}

fn _col<'a>(row: &'a AppInMemFetchedSingleRow, idx: _productm::InMemColIdx) -> &'a str {
    let idx: usize = idx.into();
    row[idx].as_str()
}

pub(super) fn parse_row(
    pid: String,
    row: AppInMemFetchedSingleRow,
) -> DefaultResult<ProductModel, AppError> {
    let num_cols: usize = _productm::InMemColIdx::TotNumColumns.into();
    if row.len() != num_cols {
        return Err(_corrupt_err(pid.as_str(), "num-columns"));
    }
    let price = Decimal::from_str(_col(&row, _productm::InMemColIdx::Price))
        .map_err(|_e| _corrupt_err(pid.as_str(), "price"))?;
    let stock = _col(&row, _productm::InMemColIdx::Stock)
        .parse::<u32>()
        .map_err(|_e| _corrupt_err(pid.as_str(), "stock"))?;
    let sold_count = _col(&row, _productm::InMemColIdx::SoldCount)
        .parse::<u32>()
        .map_err(|_e| _corrupt_err(pid.as_str(), "sold-count"))?;
    let category = ProductCategory::from_str(_col(&row, _productm::InMemColIdx::Category))
        .map_err(|_e| _corrupt_err(pid.as_str(), "category"))?;
    let colors = serde_json::from_str::<Vec<String>>(_col(&row, _productm::InMemColIdx::Colors))
        .map_err(|_e| _corrupt_err(pid.as_str(), "colors"))?;
    let sizes = serde_json::from_str::<Vec<String>>(_col(&row, _productm::InMemColIdx::Sizes))
        .map_err(|_e| _corrupt_err(pid.as_str(), "sizes"))?;
    let create_time = DateTime::parse_from_rfc3339(_col(&row, _productm::InMemColIdx::CreateTime))
        .map_err(|_e| _corrupt_err(pid.as_str(), "create-time"))?;
    let update_time = DateTime::parse_from_rfc3339(_col(&row, _productm::InMemColIdx::UpdateTime))
        .map_err(|_e| _corrupt_err(pid.as_str(), "update-time"))?;
    let name_idx: usize = _productm::InMemColIdx::Name.into();
    let image_idx: usize = _productm::InMemColIdx::Image.into();
    let descr_idx: usize = _productm::InMemColIdx::Description.into();
    let mut row = row;
    Ok(ProductModel {
        id: pid,
        description: std::mem::take(&mut row[descr_idx]),
        image: std::mem::take(&mut row[image_idx]),
        name: std::mem::take(&mut row[name_idx]),
        price,
        stock,
        sold_count,
        category,
        colors,
        sizes,
        create_time,
        update_time,
    })
} // end of fn parse_row

pub(super) fn to_row(item: &ProductModel) -> AppInMemFetchedSingleRow {
    let num_cols: usize = _productm::InMemColIdx::TotNumColumns.into();
    let mut row = (0..num_cols).map(|_n| String::new()).collect::<Vec<String>>();
    [
        (_productm::InMemColIdx::Name, item.name.clone()),
        (_productm::InMemColIdx::Price, item.price.to_string()),
        (_productm::InMemColIdx::Stock, item.stock.to_string()),
        (
            _productm::InMemColIdx::SoldCount,
            item.sold_count.to_string(),
        ),
        (_productm::InMemColIdx::Image, item.image.clone()),
        (
            _productm::InMemColIdx::Category,
            item.category.as_str().to_string(),
        ),
        (
            _productm::InMemColIdx::Colors,
            serde_json::to_string(&item.colors).unwrap(),
        ),
        (
            _productm::InMemColIdx::Sizes,
            serde_json::to_string(&item.sizes).unwrap(),
        ),
        (
            _productm::InMemColIdx::Description,
            item.description.clone(),
        ),
        (
            _productm::InMemColIdx::CreateTime,
            item.create_time.to_rfc3339(),
        ),
        (
            _productm::InMemColIdx::UpdateTime,
            item.update_time.to_rfc3339(),
        ),
    ]
    .into_iter()
    .map(|(idx, val)| {
        let idx: usize = idx.into();
        row[idx] = val;
    })
    .count();
    row
} // end of fn to_row

pub(super) fn sort_newest_first(items: &mut [ProductModel]) {
    items.sort_by(|a, b| b.create_time.cmp(&a.create_time));
}

struct CategoryFiltKeyOp {
    category: Option<ProductCategory>,
}
impl AbsDStoreFilterKeyOp for CategoryFiltKeyOp {
    fn filter(&self, _key: &String, row: &AppInMemFetchedSingleRow) -> bool {
        match self.category.as_ref() {
            Some(c) => {
                let idx: usize = _productm::InMemColIdx::Category.into();
                row.get(idx).map(|v| v.as_str() == c.as_str()).unwrap_or(false)
            }
            None => true,
        }
    }
}

pub struct ProductInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
}

impl ProductInMemRepo {
    pub async fn new(m: Arc<Box<dyn AbstInMemoryDStore>>) -> DefaultResult<Self, AppError> {
        m.create_table(_productm::TABLE_LABEL).await?;
        Ok(Self { datastore: m })
    }

    async fn fetch_filtered(
        &self,
        category: Option<ProductCategory>,
    ) -> DefaultResult<Vec<ProductModel>, AppError> {
        let op = CategoryFiltKeyOp { category };
        let pids = self
            .datastore
            .filter_keys(_productm::TABLE_LABEL.to_string(), &op)
            .await?;
        self.fetch_many(pids).await
    }
} // end of impl ProductInMemRepo

#[async_trait]
impl AbsProductRepo for ProductInMemRepo {
    async fn create(&self, item: ProductModel) -> DefaultResult<ProductModel, AppError> {
        let rows = HashMap::from([(item.id.clone(), to_row(&item))]);
        let data = HashMap::from([(_productm::TABLE_LABEL.to_string(), rows)]);
        let _num_saved = self.datastore.save(data).await?;
        Ok(item)
    }

    async fn fetch_all(&self) -> DefaultResult<Vec<ProductModel>, AppError> {
        self.fetch_filtered(None).await
    }

    async fn fetch_by_category(
        &self,
        category: ProductCategory,
    ) -> DefaultResult<Vec<ProductModel>, AppError> {
        self.fetch_filtered(Some(category)).await
    }

    async fn fetch_by_id(&self, pid: &str) -> DefaultResult<ProductModel, AppError> {
        let mut found = self.fetch_many(vec![pid.to_string()]).await?;
        found.pop().ok_or(AppError {
            code: AppErrorCode::ProductNotExist,
            detail: Some(pid.to_string()),
        })
    }

    async fn fetch_many(&self, pids: Vec<String>) -> DefaultResult<Vec<ProductModel>, AppError> {
        let keys = HashMap::from([(_productm::TABLE_LABEL.to_string(), pids)]);
        let mut tableset = self.datastore.fetch(keys).await?;
        let rows = tableset
            .remove(_productm::TABLE_LABEL)
            .unwrap_or(AppInMemFetchedSingleTable::new());
        let mut items = rows
            .into_iter()
            .map(|(pid, row)| parse_row(pid, row))
            .collect::<DefaultResult<Vec<_>, AppError>>()?;
        sort_newest_first(&mut items);
        Ok(items)
    }

    async fn save(&self, item: ProductModel) -> DefaultResult<ProductModel, AppError> {
        let _saved = self.fetch_by_id(item.id.as_str()).await?;
        self.create(item).await
    }

    async fn delete(&self, pid: &str) -> DefaultResult<(), AppError> {
        let _saved = self.fetch_by_id(pid).await?;
        let info = HashMap::from([(_productm::TABLE_LABEL.to_string(), vec![pid.to_string()])]);
        let _num = self.datastore.delete(info).await?;
        Ok(())
    }
} // end of impl AbsProductRepo for ProductInMemRepo
