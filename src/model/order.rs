use std::result::Result as DefaultResult;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use rust_decimal::Decimal;

use crate::api::web::dto::{
    BuyerReqDto, BuyerRespDto, OrderCreateReqData, OrderLineReqDto, OrderLineRespDto,
    OrderRespDto, ShippingAddrReqDto, ShippingAddrRespDto,
};
use crate::constant::{hard_limit, pricing, REGEX_EMAIL_RFC5322};
use crate::error::{AppError, AppErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    // the fulfilment workflow moves forward only, `cancelled` is reachable
    // from every non-terminal state, terminal states accept nothing
    pub fn accepts(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Processing, Self::Shipped)
                | (Self::Shipped, Self::Delivered)
                | (Self::Pending, Self::Cancelled)
                | (Self::Processing, Self::Cancelled)
                | (Self::Shipped, Self::Cancelled)
        )
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;
    fn from_str(s: &str) -> DefaultResult<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _others => Err(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(format!("order-status, actual:{}", s)),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Card,
    CashOnDelivery,
    GCash,
    PayMaya,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::CashOnDelivery => "cod",
            Self::GCash => "gcash",
            Self::PayMaya => "paymaya",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = AppError;
    fn from_str(s: &str) -> DefaultResult<Self, Self::Err> {
        match s {
            "card" => Ok(Self::Card),
            "cod" => Ok(Self::CashOnDelivery),
            "gcash" => Ok(Self::GCash),
            "paymaya" => Ok(Self::PayMaya),
            _others => Err(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(format!("payment-method, actual:{}", s)),
            }),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum OrderIntakeError {
    MissingRequiredFields,
    EmptyItemSequence,
    TooManyItems,
    BadItemQuantity,
    IncompleteShippingAddr,
    UnknownPaymentMethod,
    BadBuyerEmail,
    NegativeAmount,
    TotalMismatch,
}

impl OrderIntakeError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingRequiredFields => "missing required order fields",
            Self::EmptyItemSequence => "order must contain at least one item",
            Self::TooManyItems => "too many items in one order",
            Self::BadItemQuantity => "invalid item quantity",
            Self::IncompleteShippingAddr => "missing required shipping address fields",
            Self::UnknownPaymentMethod => "invalid payment method",
            Self::BadBuyerEmail => "invalid buyer email",
            Self::NegativeAmount => "amounts must be non-negative",
            Self::TotalMismatch => "order total mismatch",
        }
    }
}

fn trimmed_or_none(value: Option<String>) -> Option<String> {
    match value {
        Some(s) => {
            let t = s.trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        }
        None => None,
    }
}

// buyer data is copied into the order at intake time, profile edits made
// afterwards must not alter the record of who placed this order
pub struct BuyerSnapshotModel {
    pub username: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl TryFrom<BuyerReqDto> for BuyerSnapshotModel {
    type Error = OrderIntakeError;
    fn try_from(value: BuyerReqDto) -> DefaultResult<Self, Self::Error> {
        let username = trimmed_or_none(value.username)
            .ok_or(OrderIntakeError::MissingRequiredFields)?;
        let email = trimmed_or_none(value.email);
        if let Some(em) = email.as_ref() {
            let re = Regex::new(REGEX_EMAIL_RFC5322).unwrap();
            let exact = re
                .find(em.as_str())
                .map(|v| v.start() == 0 && v.end() == em.len())
                .unwrap_or(false);
            if !exact {
                return Err(OrderIntakeError::BadBuyerEmail);
            }
        }
        Ok(Self {
            username,
            email,
            first_name: trimmed_or_none(value.first_name),
            last_name: trimmed_or_none(value.last_name),
        })
    }
}

pub struct ShippingAddrModel {
    pub full_name: String,
    pub phone_number: String,
    pub region: String,
    pub postal_code: String,
    pub street_name: String,
    pub label: Option<String>,
}

impl TryFrom<ShippingAddrReqDto> for ShippingAddrModel {
    type Error = OrderIntakeError;
    fn try_from(value: ShippingAddrReqDto) -> DefaultResult<Self, Self::Error> {
        let required = (
            trimmed_or_none(value.full_name),
            trimmed_or_none(value.phone_number),
            trimmed_or_none(value.region),
            trimmed_or_none(value.postal_code),
            trimmed_or_none(value.street_name),
        );
        if let (Some(full_name), Some(phone_number), Some(region), Some(postal_code), Some(street_name)) =
            required
        {
            Ok(Self {
                full_name,
                phone_number,
                region,
                postal_code,
                street_name,
                label: trimmed_or_none(value.label),
            })
        } else {
            Err(OrderIntakeError::IncompleteShippingAddr)
        }
    }
}

// one product-variant-quantity entry, all product attributes denormalized
// from whatever catalog the client browsed, `product_id` absent for catalog
// entries which are not backed by a stored product
pub struct OrderLineModel {
    pub product_id: Option<String>,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub image: Option<String>,
    pub category: Option<String>,
    pub selected_color: Option<String>,
    pub selected_size: Option<String>,
}

impl TryFrom<OrderLineReqDto> for OrderLineModel {
    type Error = OrderIntakeError;
    fn try_from(value: OrderLineReqDto) -> DefaultResult<Self, Self::Error> {
        let quantity = match value.quantity {
            Some(q) if q > 0 && q <= (u32::MAX as i64) => q as u32,
            _others => {
                return Err(OrderIntakeError::BadItemQuantity);
            }
        };
        let price = value.price.unwrap_or(Decimal::ZERO);
        if price.is_sign_negative() {
            return Err(OrderIntakeError::NegativeAmount);
        }
        Ok(Self {
            product_id: trimmed_or_none(value.product_id),
            name: value.name.unwrap_or_default(),
            price,
            quantity,
            image: value.image,
            category: value.category,
            selected_color: value.selected_color,
            selected_size: value.selected_size,
        })
    }
}

impl From<&OrderLineModel> for OrderLineRespDto {
    fn from(value: &OrderLineModel) -> Self {
        Self {
            product_id: value.product_id.clone(),
            name: value.name.clone(),
            price: value.price,
            quantity: value.quantity,
            image: value.image.clone(),
            category: value.category.clone(),
            selected_color: value.selected_color.clone(),
            selected_size: value.selected_size.clone(),
        }
    }
}

impl From<OrderLineRespDto> for OrderLineModel {
    fn from(value: OrderLineRespDto) -> Self {
        Self {
            product_id: value.product_id,
            name: value.name,
            price: value.price,
            quantity: value.quantity,
            image: value.image,
            category: value.category,
            selected_color: value.selected_color,
            selected_size: value.selected_size,
        }
    }
}

pub struct OrderAmountsModel {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl OrderAmountsModel {
    // `subtotal` comes from authoritative per-line prices, never from the
    // request, the submitted grand total has to agree with the recomputed
    // one within a small rounding tolerance
    pub fn try_build(
        subtotal: Decimal,
        shipping: Option<Decimal>,
        tax: Option<Decimal>,
        total_submitted: Decimal,
    ) -> DefaultResult<Self, OrderIntakeError> {
        let shipping = shipping.unwrap_or(Decimal::new(pricing::DEFAULT_SHIPPING_FEE, 0));
        let tax = tax.unwrap_or(Decimal::ZERO);
        if shipping.is_sign_negative() || tax.is_sign_negative() || total_submitted.is_sign_negative()
        {
            return Err(OrderIntakeError::NegativeAmount);
        }
        let expect = subtotal + shipping + tax;
        let tolerance = Decimal::new(pricing::TOTAL_MISMATCH_TOLERANCE_CENTS, 2);
        let diff = (total_submitted - expect).abs();
        if diff > tolerance {
            Err(OrderIntakeError::TotalMismatch)
        } else {
            Ok(Self {
                subtotal,
                shipping,
                tax,
                total: total_submitted,
            })
        }
    }
}

// intake draft, everything validated except the parts which require the
// product records (authoritative prices, stock levels)
pub struct OrderDraftModel {
    pub buyer: BuyerSnapshotModel,
    pub lines: Vec<OrderLineModel>,
    pub shipping_address: ShippingAddrModel,
    pub payment_method: PaymentMethod,
    pub shipping: Option<Decimal>,
    pub tax: Option<Decimal>,
    pub total: Decimal,
}

impl TryFrom<OrderCreateReqData> for OrderDraftModel {
    type Error = OrderIntakeError;
    fn try_from(value: OrderCreateReqData) -> DefaultResult<Self, Self::Error> {
        let (buyer_d, items_d, pay_d, total) = match (
            value.user,
            value.items,
            value.payment_method,
            value.total,
        ) {
            (Some(u), Some(i), Some(p), Some(t)) => (u, i, p, t),
            _others => {
                return Err(OrderIntakeError::MissingRequiredFields);
            }
        };
        if items_d.is_empty() {
            return Err(OrderIntakeError::EmptyItemSequence);
        }
        if items_d.len() > hard_limit::MAX_ORDER_LINES_PER_REQUEST {
            return Err(OrderIntakeError::TooManyItems);
        }
        let lines = items_d
            .into_iter()
            .map(OrderLineModel::try_from)
            .collect::<DefaultResult<Vec<_>, _>>()?;
        let addr_d = value
            .shipping_address
            .ok_or(OrderIntakeError::IncompleteShippingAddr)?;
        let buyer = BuyerSnapshotModel::try_from(buyer_d)?;
        let shipping_address = ShippingAddrModel::try_from(addr_d)?;
        let payment_method = PaymentMethod::from_str(pay_d.as_str())
            .map_err(|_e| OrderIntakeError::UnknownPaymentMethod)?;
        Ok(Self {
            buyer,
            lines,
            shipping_address,
            payment_method,
            shipping: value.shipping,
            tax: value.tax,
            total,
        })
    } // end of fn try_from
}

pub struct OrderModel {
    pub id: String,
    pub buyer: BuyerSnapshotModel,
    pub lines: Vec<OrderLineModel>,
    pub shipping_address: ShippingAddrModel,
    pub payment_method: PaymentMethod,
    pub amounts: OrderAmountsModel,
    pub status: OrderStatus,
    pub create_time: DateTime<FixedOffset>,
    pub update_time: DateTime<FixedOffset>,
}

impl OrderModel {
    pub fn generate_id(machine_code: u8) -> String {
        super::generate_hex_id(machine_code)
    }

    pub fn from_draft(
        draft: OrderDraftModel,
        amounts: OrderAmountsModel,
        id: String,
        time: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id,
            buyer: draft.buyer,
            lines: draft.lines,
            shipping_address: draft.shipping_address,
            payment_method: draft.payment_method,
            amounts,
            status: OrderStatus::Pending,
            create_time: time,
            update_time: time,
        }
    }
}

impl From<&BuyerSnapshotModel> for BuyerRespDto {
    fn from(value: &BuyerSnapshotModel) -> Self {
        Self {
            username: value.username.clone(),
            email: value.email.clone(),
            first_name: value.first_name.clone(),
            last_name: value.last_name.clone(),
        }
    }
}

impl From<&ShippingAddrModel> for ShippingAddrRespDto {
    fn from(value: &ShippingAddrModel) -> Self {
        Self {
            full_name: value.full_name.clone(),
            phone_number: value.phone_number.clone(),
            region: value.region.clone(),
            postal_code: value.postal_code.clone(),
            street_name: value.street_name.clone(),
            label: value.label.clone(),
        }
    }
}

impl From<&OrderModel> for OrderRespDto {
    fn from(value: &OrderModel) -> Self {
        Self {
            id: value.id.clone(),
            user: (&value.buyer).into(),
            items: value.lines.iter().map(OrderLineRespDto::from).collect(),
            shipping_address: (&value.shipping_address).into(),
            payment_method: value.payment_method.as_str().to_string(),
            subtotal: value.amounts.subtotal,
            shipping: value.amounts.shipping,
            tax: value.amounts.tax,
            total: value.amounts.total,
            status: value.status.as_str().to_string(),
            created_at: value.create_time.to_rfc3339(),
            updated_at: value.update_time.to_rfc3339(),
        }
    }
}
