use std::collections::HashMap;
use std::ops::DerefMut;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use sqlx::mysql::MySqlRow;
use sqlx::{Connection, MySql, Row, Transaction};

use crate::datastore::AppMariaDbStore;
use crate::error::{AppError, AppErrorCode};
use crate::model::{
    BuyerSnapshotModel, OrderAmountsModel, OrderLineModel, OrderModel, OrderStatus, PaymentMethod,
    ProductModel, ShippingAddrModel,
};

use super::super::{AbsOrderRepo, AppOrderCreateReturn, AppStockAdjustUserFunc};
use super::product::try_into_product_model;
use super::{run_query_once, OidBytes};

const TOPLVL_COL_SEQ: &str = "`id_`,`buyer_username`,`buyer_email`,`buyer_first_name`,`buyer_last_name`,\
     `addr_full_name`,`addr_phone_number`,`addr_region`,`addr_postal_code`,`addr_street_name`,`addr_label`,\
     `payment_method`,`subtotal`,`shipping`,`tax`,`total`,`status`,`created_at`,`updated_at`";
const PRODUCT_COL_SEQ: &str = "`id_`,`name`,`price`,`stock`,`sold_count`,`image`,`category`,`colors`,`sizes`,`description`,`created_at`,`updated_at`";
const LINE_COL_SEQ: &str = "`o_id`,`product_id`,`name`,`price`,`quantity`,`image`,`category`,`selected_color`,`selected_size`";

fn in_placeholders(num: usize) -> String {
    (0..num).map(|_n| "?").collect::<Vec<_>>().join(",")
}

fn try_into_toplvl(row: MySqlRow) -> DefaultResult<OrderModel, AppError> {
    let id = OidBytes::to_app_oid(&row, 0)?;
    let buyer = BuyerSnapshotModel {
        username: row.try_get::<String, usize>(1)?,
        email: row.try_get::<Option<String>, usize>(2)?,
        first_name: row.try_get::<Option<String>, usize>(3)?,
        last_name: row.try_get::<Option<String>, usize>(4)?,
    };
    let shipping_address = ShippingAddrModel {
        full_name: row.try_get::<String, usize>(5)?,
        phone_number: row.try_get::<String, usize>(6)?,
        region: row.try_get::<String, usize>(7)?,
        postal_code: row.try_get::<String, usize>(8)?,
        street_name: row.try_get::<String, usize>(9)?,
        label: row.try_get::<Option<String>, usize>(10)?,
    };
    let payment_method = row.try_get::<&str, usize>(11)?.parse::<PaymentMethod>()?;
    let amounts = OrderAmountsModel {
        subtotal: row.try_get::<Decimal, usize>(12)?,
        shipping: row.try_get::<Decimal, usize>(13)?,
        tax: row.try_get::<Decimal, usize>(14)?,
        total: row.try_get::<Decimal, usize>(15)?,
    };
    let status = row.try_get::<&str, usize>(16)?.parse::<OrderStatus>()?;
    let create_time = row.try_get::<DateTime<Utc>, usize>(17)?.into();
    let update_time = row.try_get::<DateTime<Utc>, usize>(18)?.into();
    Ok(OrderModel {
        id,
        buyer,
        lines: Vec::new(),
        shipping_address,
        payment_method,
        amounts,
        status,
        create_time,
        update_time,
    })
} // end of fn try_into_toplvl

fn try_into_line(row: &MySqlRow) -> DefaultResult<(String, OrderLineModel), AppError> {
    let oid = OidBytes::to_app_oid(row, 0)?;
    let product_id = match row.try_get::<Option<Vec<u8>>, usize>(1)? {
        Some(raw) => Some(OidBytes::raw_to_app_oid(raw)?),
        None => None,
    };
    let m = OrderLineModel {
        product_id,
        name: row.try_get::<String, usize>(2)?,
        price: row.try_get::<Decimal, usize>(3)?,
        quantity: row.try_get::<u32, usize>(4)?,
        image: row.try_get::<Option<String>, usize>(5)?,
        category: row.try_get::<Option<String>, usize>(6)?,
        selected_color: row.try_get::<Option<String>, usize>(7)?,
        selected_size: row.try_get::<Option<String>, usize>(8)?,
    };
    Ok((oid, m))
}

pub struct OrderMariaDbRepo {
    _db: Arc<AppMariaDbStore>,
}

impl OrderMariaDbRepo {
    pub(crate) fn new(dbs: &Vec<Arc<AppMariaDbStore>>) -> DefaultResult<Self, AppError> {
        if let Some(db) = dbs.first() {
            Ok(Self { _db: db.clone() })
        } else {
            Err(AppError {
                code: AppErrorCode::MissingDataStore,
                detail: Some("mariadb".to_string()),
            })
        }
    }

    // lock the affected product rows for the rest of the transaction, so
    // concurrent orders against the same product serialize at here instead
    // of racing the decrement
    async fn lock_products(
        tx: &mut Transaction<'_, MySql>,
        pids: &[String],
    ) -> DefaultResult<Vec<ProductModel>, AppError> {
        if pids.is_empty() {
            return Ok(Vec::new());
        }
        let oids = pids
            .iter()
            .map(|p| OidBytes::try_from(p.as_str()))
            .collect::<DefaultResult<Vec<_>, AppError>>()?;
        let sql_patt = format!(
            "SELECT {PRODUCT_COL_SEQ} FROM `store_product` WHERE `id_` IN ({}) FOR UPDATE",
            in_placeholders(oids.len())
        );
        let mut query = sqlx::query(sql_patt.as_str());
        for oid in oids.iter() {
            query = query.bind(oid.as_column());
        }
        let exec = tx.deref_mut();
        let rows = query.fetch_all(exec).await?;
        rows.into_iter()
            .map(try_into_product_model)
            .collect::<DefaultResult<Vec<_>, AppError>>()
    }

    async fn save_adjusted_stock(
        tx: &mut Transaction<'_, MySql>,
        products: &[ProductModel],
    ) -> DefaultResult<(), AppError> {
        for p in products {
            let oid = OidBytes::try_from(p.id.as_str())?;
            let query = sqlx::query(
                "UPDATE `store_product` SET `stock`=?,`sold_count`=?,`updated_at`=? WHERE `id_`=?",
            )
            .bind(p.stock)
            .bind(p.sold_count)
            .bind(p.update_time.with_timezone(&Utc))
            .bind(oid.as_column());
            let _rs = run_query_once(tx, query, None).await?;
        }
        Ok(())
    }

    async fn insert_toplvl(
        tx: &mut Transaction<'_, MySql>,
        order: &OrderModel,
    ) -> DefaultResult<(), AppError> {
        let oid = OidBytes::try_from(order.id.as_str())?;
        let sql_patt = format!(
            "INSERT INTO `order_toplvl`({TOPLVL_COL_SEQ}) VALUES (?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?,?)"
        );
        let query = sqlx::query(sql_patt.as_str())
            .bind(oid.as_column())
            .bind(order.buyer.username.as_str())
            .bind(order.buyer.email.as_deref())
            .bind(order.buyer.first_name.as_deref())
            .bind(order.buyer.last_name.as_deref())
            .bind(order.shipping_address.full_name.as_str())
            .bind(order.shipping_address.phone_number.as_str())
            .bind(order.shipping_address.region.as_str())
            .bind(order.shipping_address.postal_code.as_str())
            .bind(order.shipping_address.street_name.as_str())
            .bind(order.shipping_address.label.as_deref())
            .bind(order.payment_method.as_str())
            .bind(order.amounts.subtotal)
            .bind(order.amounts.shipping)
            .bind(order.amounts.tax)
            .bind(order.amounts.total)
            .bind(order.status.as_str())
            .bind(order.create_time.with_timezone(&Utc))
            .bind(order.update_time.with_timezone(&Utc));
        let _rs = run_query_once(tx, query, Some(1)).await?;
        Ok(())
    }

    async fn insert_lines(
        tx: &mut Transaction<'_, MySql>,
        order: &OrderModel,
    ) -> DefaultResult<(), AppError> {
        let oid = OidBytes::try_from(order.id.as_str())?;
        let num_batch = order.lines.len();
        if num_batch == 0 {
            return Ok(());
        }
        let items = (0..num_batch)
            .map(|_| "(?,?,?,?,?,?,?,?,?,?)")
            .collect::<Vec<_>>();
        let sql_patt = format!(
            "INSERT INTO `order_line`({LINE_COL_SEQ},`seq`) VALUES {}",
            items.join(",")
        );
        let mut query = sqlx::query(sql_patt.as_str());
        for (seq, line) in order.lines.iter().enumerate() {
            let p_oid = match line.product_id.as_ref() {
                Some(p) => Some(OidBytes::try_from(p.as_str())?.as_column()),
                None => None,
            };
            query = query
                .bind(oid.as_column())
                .bind(p_oid)
                .bind(line.name.as_str())
                .bind(line.price)
                .bind(line.quantity)
                .bind(line.image.as_deref())
                .bind(line.category.as_deref())
                .bind(line.selected_color.as_deref())
                .bind(line.selected_size.as_deref())
                .bind(seq as u16);
        }
        let _rs = run_query_once(tx, query, Some(num_batch)).await?;
        Ok(())
    }

    async fn fetch_toplvl_with_condition(
        &self,
        condition: &str,
        bind_oid: Option<OidBytes>,
        bind_text: Option<String>,
    ) -> DefaultResult<Vec<OrderModel>, AppError> {
        let sql_patt = format!(
            "SELECT {TOPLVL_COL_SEQ} FROM `order_toplvl` {} ORDER BY `created_at` DESC",
            condition
        );
        let mut query = sqlx::query(sql_patt.as_str());
        if let Some(oid) = bind_oid.as_ref() {
            query = query.bind(oid.as_column());
        }
        if let Some(t) = bind_text.as_ref() {
            query = query.bind(t.as_str());
        }
        let mut conn = self._db.acquire().await?;
        let rows = query.fetch_all(conn.deref_mut()).await?;
        let mut orders = rows
            .into_iter()
            .map(try_into_toplvl)
            .collect::<DefaultResult<Vec<_>, AppError>>()?;
        self.fill_lines(&mut orders).await?;
        Ok(orders)
    }

    async fn fill_lines(&self, orders: &mut [OrderModel]) -> DefaultResult<(), AppError> {
        if orders.is_empty() {
            return Ok(());
        }
        let oids = orders
            .iter()
            .map(|o| OidBytes::try_from(o.id.as_str()))
            .collect::<DefaultResult<Vec<_>, AppError>>()?;
        let sql_patt = format!(
            "SELECT {LINE_COL_SEQ} FROM `order_line` WHERE `o_id` IN ({}) ORDER BY `o_id`,`seq`",
            in_placeholders(oids.len())
        );
        let mut query = sqlx::query(sql_patt.as_str());
        for oid in oids.iter() {
            query = query.bind(oid.as_column());
        }
        let mut conn = self._db.acquire().await?;
        let rows = query.fetch_all(conn.deref_mut()).await?;
        let mut grouped: HashMap<String, Vec<OrderLineModel>> = HashMap::new();
        for row in rows.iter() {
            let (oid, m) = try_into_line(row)?;
            grouped.entry(oid).or_default().push(m);
        }
        for o in orders.iter_mut() {
            if let Some(lines) = grouped.remove(o.id.as_str()) {
                o.lines = lines;
            }
        }
        Ok(())
    } // end of fn fill_lines
} // end of impl OrderMariaDbRepo

#[async_trait]
impl AbsOrderRepo for OrderMariaDbRepo {
    async fn create(&self, order: &OrderModel, usr_cb: AppStockAdjustUserFunc)
        -> AppOrderCreateReturn
    {
        let pids = order
            .lines
            .iter()
            .filter_map(|l| l.product_id.clone())
            .collect::<Vec<_>>();
        let mut conn = match self._db.acquire().await {
            Ok(c) => c,
            Err(e) => {
                return Err(Err(e));
            }
        };
        let mut tx = match conn.begin().await {
            Ok(t) => t,
            Err(e) => {
                return Err(Err(e.into()));
            }
        };
        let mut products = match Self::lock_products(&mut tx, &pids).await {
            Ok(v) => v,
            Err(e) => {
                return Err(Err(e));
            }
        };
        if let Err(line_errors) = usr_cb(&mut products, order) {
            // transaction rolls back on drop, the row locks are released
            return Err(Ok(line_errors));
        }
        let result = async {
            Self::save_adjusted_stock(&mut tx, &products).await?;
            Self::insert_toplvl(&mut tx, order).await?;
            Self::insert_lines(&mut tx, order).await?;
            tx.commit().await?;
            Ok::<(), AppError>(())
        }
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) => Err(Err(e)),
        }
    } // end of fn create

    async fn fetch_all(&self) -> DefaultResult<Vec<OrderModel>, AppError> {
        self.fetch_toplvl_with_condition("", None, None).await
    }

    async fn fetch_by_buyer(&self, username: &str) -> DefaultResult<Vec<OrderModel>, AppError> {
        self.fetch_toplvl_with_condition(
            "WHERE `buyer_username`=?",
            None,
            Some(username.to_string()),
        )
        .await
    }

    async fn fetch_by_id(&self, oid: &str) -> DefaultResult<OrderModel, AppError> {
        let oid_b = OidBytes::try_from(oid)?;
        let mut found = self
            .fetch_toplvl_with_condition("WHERE `id_`=?", Some(oid_b), None)
            .await?;
        found.pop().ok_or(AppError {
            code: AppErrorCode::OrderNotExist,
            detail: Some(oid.to_string()),
        })
    }

    async fn save_status(
        &self,
        oid: &str,
        new_status: OrderStatus,
        time: DateTime<FixedOffset>,
    ) -> DefaultResult<OrderModel, AppError> {
        let mut saved = self.fetch_by_id(oid).await?;
        let oid_b = OidBytes::try_from(oid)?;
        let query = sqlx::query("UPDATE `order_toplvl` SET `status`=?,`updated_at`=? WHERE `id_`=?")
            .bind(new_status.as_str())
            .bind(time.with_timezone(&Utc))
            .bind(oid_b.as_column());
        let mut conn = self._db.acquire().await?;
        let _rs = query.execute(conn.deref_mut()).await?;
        saved.status = new_status;
        saved.update_time = time;
        Ok(saved)
    }

    async fn delete(&self, oid: &str) -> DefaultResult<(), AppError> {
        let oid_b = OidBytes::try_from(oid)?;
        let mut conn = self._db.acquire().await?;
        let mut tx = conn.begin().await?;
        let q_line = sqlx::query("DELETE FROM `order_line` WHERE `o_id`=?").bind(oid_b.as_column());
        let _rs = run_query_once(&mut tx, q_line, None).await?;
        let q_top = sqlx::query("DELETE FROM `order_toplvl` WHERE `id_`=?").bind(oid_b.as_column());
        let rs = run_query_once(&mut tx, q_top, None).await?;
        if rs.rows_affected() == 0 {
            return Err(AppError {
                code: AppErrorCode::OrderNotExist,
                detail: Some(oid.to_string()),
            });
        }
        tx.commit().await?;
        Ok(())
    }
} // end of impl AbsOrderRepo for OrderMariaDbRepo
