use std::boxed::Box;
use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

use crate::api::web::dto::OrderLineRespDto;
use crate::datastore::{
    AbsDStoreFilterKeyOp, AbstInMemoryDStore, AppInMemFetchedSingleRow, AppInMemFetchedSingleTable,
};
use crate::error::{AppError, AppErrorCode};
use crate::model::{
    BuyerSnapshotModel, OrderAmountsModel, OrderLineModel, OrderModel, OrderStatus, PaymentMethod,
    ShippingAddrModel,
};

use super::super::{AbsOrderRepo, AppOrderCreateReturn, AppStockAdjustUserFunc};
use super::product::{_productm, parse_row as parse_product_row, to_row as product_to_row};

mod _orderm {
    pub(super) const TABLE_LABEL: &str = "order_toplvl";

    pub(super) enum InMemColIdx {
        BuyerUsername,
        BuyerEmail,
        BuyerFirstName,
        BuyerLastName,
        Lines,
        AddrFullName,
        AddrPhoneNumber,
        AddrRegion,
        AddrPostalCode,
        AddrStreetName,
        AddrLabel,
        PaymentMethod,
        Subtotal,
        Shipping,
        Tax,
        Total,
        Status,
        CreateTime,
        UpdateTime,
        TotNumColumns,
    }
    impl From<InMemColIdx> for usize {
        fn from(value: InMemColIdx) -> usize {
            match value {
                InMemColIdx::BuyerUsername => 0,
                InMemColIdx::BuyerEmail => 1,
                InMemColIdx::BuyerFirstName => 2,
                InMemColIdx::BuyerLastName => 3,
                InMemColIdx::Lines => 4,
                InMemColIdx::AddrFullName => 5,
                InMemColIdx::AddrPhoneNumber => 6,
                InMemColIdx::AddrRegion => 7,
                InMemColIdx::AddrPostalCode => 8,
                InMemColIdx::AddrStreetName => 9,
                InMemColIdx::AddrLabel => 10,
                InMemColIdx::PaymentMethod => 11,
                InMemColIdx::Subtotal => 12,
                InMemColIdx::Shipping => 13,
                InMemColIdx::Tax => 14,
                InMemColIdx::Total => 15,
                InMemColIdx::Status => 16,
                InMemColIdx::CreateTime => 17,
                InMemColIdx::UpdateTime => 18,
                InMemColIdx::TotNumColumns => 19,
            }
        }
    }
}

fn _corrupt_err(oid: &str, what: &str) -> AppError {
    AppError {
        code: AppErrorCode::DataCorruption,
        detail: Some(format!("order-toplvl, id:{}, field:{}", oid, what)),
    }
}

fn _col<'a>(row: &'a AppInMemFetchedSingleRow, idx: _orderm::InMemColIdx) -> &'a str {
    let idx: usize = idx.into();
    row[idx].as_str()
}

fn _opt_col(row: &AppInMemFetchedSingleRow, idx: _orderm::InMemColIdx) -> Option<String> {
    let v = _col(row, idx);
    if v.is_empty() {
        None
    } else {
        Some(v.to_string())
    }
}

fn order_to_row(order: &OrderModel) -> AppInMemFetchedSingleRow {
    let num_cols: usize = _orderm::InMemColIdx::TotNumColumns.into();
    let mut row = (0..num_cols).map(|_n| String::new()).collect::<Vec<String>>();
    let lines_serial = {
        let dtos = order
            .lines
            .iter()
            .map(OrderLineRespDto::from)
            .collect::<Vec<_>>();
        serde_json::to_string(&dtos).unwrap()
    };
    [
        (
            _orderm::InMemColIdx::BuyerUsername,
            order.buyer.username.clone(),
        ),
        (
            _orderm::InMemColIdx::BuyerEmail,
            order.buyer.email.clone().unwrap_or_default(),
        ),
        (
            _orderm::InMemColIdx::BuyerFirstName,
            order.buyer.first_name.clone().unwrap_or_default(),
        ),
        (
            _orderm::InMemColIdx::BuyerLastName,
            order.buyer.last_name.clone().unwrap_or_default(),
        ),
        (_orderm::InMemColIdx::Lines, lines_serial),
        (
            _orderm::InMemColIdx::AddrFullName,
            order.shipping_address.full_name.clone(),
        ),
        (
            _orderm::InMemColIdx::AddrPhoneNumber,
            order.shipping_address.phone_number.clone(),
        ),
        (
            _orderm::InMemColIdx::AddrRegion,
            order.shipping_address.region.clone(),
        ),
        (
            _orderm::InMemColIdx::AddrPostalCode,
            order.shipping_address.postal_code.clone(),
        ),
        (
            _orderm::InMemColIdx::AddrStreetName,
            order.shipping_address.street_name.clone(),
        ),
        (
            _orderm::InMemColIdx::AddrLabel,
            order.shipping_address.label.clone().unwrap_or_default(),
        ),
        (
            _orderm::InMemColIdx::PaymentMethod,
            order.payment_method.as_str().to_string(),
        ),
        (
            _orderm::InMemColIdx::Subtotal,
            order.amounts.subtotal.to_string(),
        ),
        (
            _orderm::InMemColIdx::Shipping,
            order.amounts.shipping.to_string(),
        ),
        (_orderm::InMemColIdx::Tax, order.amounts.tax.to_string()),
        (_orderm::InMemColIdx::Total, order.amounts.total.to_string()),
        (
            _orderm::InMemColIdx::Status,
            order.status.as_str().to_string(),
        ),
        (
            _orderm::InMemColIdx::CreateTime,
            order.create_time.to_rfc3339(),
        ),
        (
            _orderm::InMemColIdx::UpdateTime,
            order.update_time.to_rfc3339(),
        ),
    ]
    .into_iter()
    .map(|(idx, val)| {
        let idx: usize = idx.into();
        row[idx] = val;
    })
    .count();
    row
} // end of fn order_to_row

fn order_from_row(oid: String, row: AppInMemFetchedSingleRow) -> DefaultResult<OrderModel, AppError> {
    let num_cols: usize = _orderm::InMemColIdx::TotNumColumns.into();
    if row.len() != num_cols {
        return Err(_corrupt_err(oid.as_str(), "num-columns"));
    }
    let lines = serde_json::from_str::<Vec<OrderLineRespDto>>(_col(&row, _orderm::InMemColIdx::Lines))
        .map_err(|_e| _corrupt_err(oid.as_str(), "lines"))?
        .into_iter()
        .map(OrderLineModel::from)
        .collect::<Vec<_>>();
    let buyer = BuyerSnapshotModel {
        username: _col(&row, _orderm::InMemColIdx::BuyerUsername).to_string(),
        email: _opt_col(&row, _orderm::InMemColIdx::BuyerEmail),
        first_name: _opt_col(&row, _orderm::InMemColIdx::BuyerFirstName),
        last_name: _opt_col(&row, _orderm::InMemColIdx::BuyerLastName),
    };
    let shipping_address = ShippingAddrModel {
        full_name: _col(&row, _orderm::InMemColIdx::AddrFullName).to_string(),
        phone_number: _col(&row, _orderm::InMemColIdx::AddrPhoneNumber).to_string(),
        region: _col(&row, _orderm::InMemColIdx::AddrRegion).to_string(),
        postal_code: _col(&row, _orderm::InMemColIdx::AddrPostalCode).to_string(),
        street_name: _col(&row, _orderm::InMemColIdx::AddrStreetName).to_string(),
        label: _opt_col(&row, _orderm::InMemColIdx::AddrLabel),
    };
    let payment_method = PaymentMethod::from_str(_col(&row, _orderm::InMemColIdx::PaymentMethod))
        .map_err(|_e| _corrupt_err(oid.as_str(), "payment-method"))?;
    let amounts = {
        let mut parsed = [Decimal::ZERO; 4];
        let src = [
            _orderm::InMemColIdx::Subtotal,
            _orderm::InMemColIdx::Shipping,
            _orderm::InMemColIdx::Tax,
            _orderm::InMemColIdx::Total,
        ];
        for (dst, idx) in parsed.iter_mut().zip(src) {
            *dst = Decimal::from_str(_col(&row, idx))
                .map_err(|_e| _corrupt_err(oid.as_str(), "amounts"))?;
        }
        OrderAmountsModel {
            subtotal: parsed[0],
            shipping: parsed[1],
            tax: parsed[2],
            total: parsed[3],
        }
    };
    let status = OrderStatus::from_str(_col(&row, _orderm::InMemColIdx::Status))
        .map_err(|_e| _corrupt_err(oid.as_str(), "status"))?;
    let create_time = DateTime::parse_from_rfc3339(_col(&row, _orderm::InMemColIdx::CreateTime))
        .map_err(|_e| _corrupt_err(oid.as_str(), "create-time"))?;
    let update_time = DateTime::parse_from_rfc3339(_col(&row, _orderm::InMemColIdx::UpdateTime))
        .map_err(|_e| _corrupt_err(oid.as_str(), "update-time"))?;
    Ok(OrderModel {
        id: oid,
        buyer,
        lines,
        shipping_address,
        payment_method,
        amounts,
        status,
        create_time,
        update_time,
    })
} // end of fn order_from_row

struct BuyerFiltKeyOp {
    username: Option<String>,
}
impl AbsDStoreFilterKeyOp for BuyerFiltKeyOp {
    fn filter(&self, _key: &String, row: &AppInMemFetchedSingleRow) -> bool {
        match self.username.as_ref() {
            Some(u) => {
                let idx: usize = _orderm::InMemColIdx::BuyerUsername.into();
                row.get(idx).map(|v| v.as_str() == u.as_str()).unwrap_or(false)
            }
            None => true,
        }
    }
}

// in-memory repo is unable to do concurrency test against separate
// processes, also it shouldn't be deployed in production environment
pub struct OrderInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
}

impl OrderInMemRepo {
    pub async fn new(m: Arc<Box<dyn AbstInMemoryDStore>>) -> DefaultResult<Self, AppError> {
        m.create_table(_orderm::TABLE_LABEL).await?;
        // order creation locks the product table together with its own,
        // ensure it exists even when no product repo was built yet
        m.create_table(_productm::TABLE_LABEL).await?;
        Ok(Self { datastore: m })
    }

    async fn fetch_filtered(
        &self,
        username: Option<String>,
    ) -> DefaultResult<Vec<OrderModel>, AppError> {
        let op = BuyerFiltKeyOp { username };
        let oids = self
            .datastore
            .filter_keys(_orderm::TABLE_LABEL.to_string(), &op)
            .await?;
        let keys = HashMap::from([(_orderm::TABLE_LABEL.to_string(), oids)]);
        let mut tableset = self.datastore.fetch(keys).await?;
        let rows = tableset
            .remove(_orderm::TABLE_LABEL)
            .unwrap_or(AppInMemFetchedSingleTable::new());
        let mut items = rows
            .into_iter()
            .map(|(oid, row)| order_from_row(oid, row))
            .collect::<DefaultResult<Vec<_>, AppError>>()?;
        items.sort_by(|a, b| b.create_time.cmp(&a.create_time));
        Ok(items)
    }
} // end of impl OrderInMemRepo

#[async_trait]
impl AbsOrderRepo for OrderInMemRepo {
    async fn create(&self, order: &OrderModel, usr_cb: AppStockAdjustUserFunc)
        -> AppOrderCreateReturn
    {
        let pids = order
            .lines
            .iter()
            .filter_map(|l| l.product_id.clone())
            .collect::<Vec<_>>();
        let keys = HashMap::from([(_productm::TABLE_LABEL.to_string(), pids)]);
        let (mut tableset, d_lock) = match self.datastore.fetch_acquire(keys).await {
            Ok(v) => v,
            Err(e) => {
                return Err(Err(e));
            }
        };
        let rows = tableset
            .remove(_productm::TABLE_LABEL)
            .unwrap_or(AppInMemFetchedSingleTable::new());
        let mut products = Vec::with_capacity(rows.len());
        for (pid, row) in rows {
            match parse_product_row(pid, row) {
                Ok(m) => products.push(m),
                Err(e) => {
                    return Err(Err(e));
                }
            }
        }
        if let Err(line_errors) = usr_cb(&mut products, order) {
            return Err(Ok(line_errors));
        }
        let prod_rows = products
            .iter()
            .map(|p| (p.id.clone(), product_to_row(p)))
            .collect::<AppInMemFetchedSingleTable>();
        let order_rows = HashMap::from([(order.id.clone(), order_to_row(order))]);
        let data = HashMap::from([
            (_productm::TABLE_LABEL.to_string(), prod_rows),
            (_orderm::TABLE_LABEL.to_string(), order_rows),
        ]);
        if let Err(e) = self.datastore.save_release(data, d_lock) {
            Err(Err(e))
        } else {
            Ok(())
        }
    } // end of fn create

    async fn fetch_all(&self) -> DefaultResult<Vec<OrderModel>, AppError> {
        self.fetch_filtered(None).await
    }

    async fn fetch_by_buyer(&self, username: &str) -> DefaultResult<Vec<OrderModel>, AppError> {
        self.fetch_filtered(Some(username.to_string())).await
    }

    async fn fetch_by_id(&self, oid: &str) -> DefaultResult<OrderModel, AppError> {
        let keys = HashMap::from([(_orderm::TABLE_LABEL.to_string(), vec![oid.to_string()])]);
        let mut tableset = self.datastore.fetch(keys).await?;
        let mut rows = tableset
            .remove(_orderm::TABLE_LABEL)
            .unwrap_or(AppInMemFetchedSingleTable::new());
        match rows.remove(oid) {
            Some(row) => order_from_row(oid.to_string(), row),
            None => Err(AppError {
                code: AppErrorCode::OrderNotExist,
                detail: Some(oid.to_string()),
            }),
        }
    }

    async fn save_status(
        &self,
        oid: &str,
        new_status: OrderStatus,
        time: DateTime<FixedOffset>,
    ) -> DefaultResult<OrderModel, AppError> {
        let mut saved = self.fetch_by_id(oid).await?;
        saved.status = new_status;
        saved.update_time = time;
        let rows = HashMap::from([(saved.id.clone(), order_to_row(&saved))]);
        let data = HashMap::from([(_orderm::TABLE_LABEL.to_string(), rows)]);
        let _num_saved = self.datastore.save(data).await?;
        Ok(saved)
    }

    async fn delete(&self, oid: &str) -> DefaultResult<(), AppError> {
        let _saved = self.fetch_by_id(oid).await?;
        let info = HashMap::from([(_orderm::TABLE_LABEL.to_string(), vec![oid.to_string()])]);
        let _num = self.datastore.delete(info).await?;
        Ok(())
    }
} // end of impl AbsOrderRepo for OrderInMemRepo
