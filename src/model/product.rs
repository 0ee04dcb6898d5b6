use std::result::Result as DefaultResult;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

use crate::api::web::dto::{
    OrderLineStockErrorDto, OrderLineStockErrorReason, ProductCreateReqData, ProductEditReqData,
    ProductRespDto,
};
use crate::error::{AppError, AppErrorCode};

use super::OrderModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductCategory {
    Women,
    Men,
    Kids,
    Baby,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Women => "Women",
            Self::Men => "Men",
            Self::Kids => "Kids",
            Self::Baby => "Baby",
        }
    }
}

impl FromStr for ProductCategory {
    type Err = AppError;
    fn from_str(s: &str) -> DefaultResult<Self, Self::Err> {
        match s {
            "Women" => Ok(Self::Women),
            "Men" => Ok(Self::Men),
            "Kids" => Ok(Self::Kids),
            "Baby" => Ok(Self::Baby),
            _others => Err(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(format!("product-category, actual:{}", s)),
            }),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ProductIntakeError {
    MissingRequiredFields,
    NegativeAmount,
    UnknownCategory,
}

impl ProductIntakeError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingRequiredFields => "please provide name, price and stock",
            Self::NegativeAmount => "price and stock must be non-negative",
            Self::UnknownCategory => "invalid category, must be one of: Women, Men, Kids, Baby",
        }
    }
}

// the single mutable source of truth for inventory levels, `stock` and
// `sold_count` also move as a side effect of order creation
pub struct ProductModel {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
    pub sold_count: u32,
    pub image: String,
    pub category: ProductCategory,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub description: String,
    pub create_time: DateTime<FixedOffset>,
    pub update_time: DateTime<FixedOffset>,
}

impl ProductModel {
    pub fn generate_id(machine_code: u8) -> String {
        super::generate_hex_id(machine_code)
    }

    pub fn try_build(
        d: ProductCreateReqData,
        id: String,
        time: DateTime<FixedOffset>,
    ) -> DefaultResult<Self, ProductIntakeError> {
        let name = match d.name {
            Some(n) if !n.trim().is_empty() => n.trim().to_string(),
            _others => {
                return Err(ProductIntakeError::MissingRequiredFields);
            }
        };
        let (price, stock) = match (d.price, d.stock) {
            (Some(p), Some(s)) => (p, s),
            _others => {
                return Err(ProductIntakeError::MissingRequiredFields);
            }
        };
        if price.is_sign_negative() || stock < 0 {
            return Err(ProductIntakeError::NegativeAmount);
        }
        let category = match d.category {
            Some(c) if !c.is_empty() => ProductCategory::from_str(c.as_str())
                .map_err(|_e| ProductIntakeError::UnknownCategory)?,
            _others => ProductCategory::Women,
        };
        Ok(Self {
            id,
            name,
            price,
            stock: stock as u32,
            sold_count: 0,
            image: d.image.unwrap_or_default(),
            category,
            colors: d.colors.unwrap_or_default(),
            sizes: d.sizes.unwrap_or_default(),
            description: d.description.unwrap_or_default(),
            create_time: time,
            update_time: time,
        })
    } // end of fn try_build

    // partial edit, only the fields supplied in the request move
    pub fn apply_patch(
        &mut self,
        d: ProductEditReqData,
        time: DateTime<FixedOffset>,
    ) -> DefaultResult<(), ProductIntakeError> {
        if let Some(p) = d.price.as_ref() {
            if p.is_sign_negative() {
                return Err(ProductIntakeError::NegativeAmount);
            }
        }
        if let Some(s) = d.stock.as_ref() {
            if *s < 0 {
                return Err(ProductIntakeError::NegativeAmount);
            }
        }
        let category = match d.category {
            Some(c) if !c.is_empty() => Some(
                ProductCategory::from_str(c.as_str())
                    .map_err(|_e| ProductIntakeError::UnknownCategory)?,
            ),
            _others => None,
        };
        if let Some(n) = d.name {
            if !n.trim().is_empty() {
                self.name = n.trim().to_string();
            }
        }
        if let Some(p) = d.price {
            self.price = p;
        }
        if let Some(s) = d.stock {
            self.stock = s as u32;
        }
        if let Some(i) = d.image {
            self.image = i;
        }
        if let Some(c) = category {
            self.category = c;
        }
        if let Some(cs) = d.colors {
            self.colors = cs;
        }
        if let Some(ss) = d.sizes {
            self.sizes = ss;
        }
        if let Some(ds) = d.description {
            self.description = ds;
        }
        self.update_time = time;
        Ok(())
    } // end of fn apply_patch
}

impl From<&ProductModel> for ProductRespDto {
    fn from(value: &ProductModel) -> Self {
        Self {
            id: value.id.clone(),
            name: value.name.clone(),
            price: value.price,
            stock: value.stock,
            sold_count: value.sold_count,
            image: value.image.clone(),
            category: value.category.as_str().to_string(),
            colors: value.colors.clone(),
            sizes: value.sizes.clone(),
            description: value.description.clone(),
            created_at: value.create_time.to_rfc3339(),
            updated_at: value.update_time.to_rfc3339(),
        }
    }
}

pub type StockAdjustResult = DefaultResult<(), Vec<OrderLineStockErrorDto>>;

// inventory rule shared by every repository backend, the backend supplies
// atomicity around this call, the rule itself only mutates the given models.
// Lines without a product identifier carry no inventory effect.
pub fn try_adjust_inventory(products: &mut Vec<ProductModel>, order: &OrderModel) -> StockAdjustResult {
    let mut errors = Vec::new();
    for line in order.lines.iter() {
        let pid = match line.product_id.as_ref() {
            Some(v) => v,
            None => continue,
        };
        let found = products.iter_mut().find(|p| p.id.as_str() == pid.as_str());
        match found {
            None => {
                errors.push(OrderLineStockErrorDto {
                    product_id: pid.clone(),
                    reason: OrderLineStockErrorReason::NotExist,
                    shortage: None,
                });
            }
            Some(p) => {
                if p.stock < line.quantity {
                    errors.push(OrderLineStockErrorDto {
                        product_id: pid.clone(),
                        reason: OrderLineStockErrorReason::OutOfStock,
                        shortage: Some(line.quantity - p.stock),
                    });
                } else {
                    p.stock -= line.quantity;
                    p.sold_count += line.quantity;
                    p.update_time = order.create_time;
                }
            }
        }
    } // end of loop
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
} // end of fn try_adjust_inventory
