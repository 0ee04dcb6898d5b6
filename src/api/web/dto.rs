use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---- order intake ----
//
// every field the storefront client may omit is optional at this layer,
// presence and content rules are enforced by the model conversions, so the
// HTTP boundary can keep reporting the stable `{success:false, error:..}`
// body instead of letting the JSON extractor reject the request

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerReqDto {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineReqDto {
    pub product_id: Option<String>,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    // declared signed so a negative quantity reaches model validation
    // instead of failing inside the JSON extractor
    pub quantity: Option<i64>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub selected_color: Option<String>,
    pub selected_size: Option<String>,
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddrReqDto {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub street_name: Option<String>,
    pub label: Option<String>,
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateReqData {
    pub user: Option<BuyerReqDto>,
    pub items: Option<Vec<OrderLineReqDto>>,
    pub shipping_address: Option<ShippingAddrReqDto>,
    pub payment_method: Option<String>,
    pub subtotal: Option<Decimal>,
    pub shipping: Option<Decimal>,
    pub tax: Option<Decimal>,
    pub total: Option<Decimal>,
}

#[derive(Deserialize)]
pub struct OrderStatusReqDto {
    pub status: Option<String>,
}

// ---- order responses ----

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerRespDto {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRespDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub image: Option<String>,
    pub category: Option<String>,
    pub selected_color: Option<String>,
    pub selected_size: Option<String>,
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddrRespDto {
    pub full_name: String,
    pub phone_number: String,
    pub region: String,
    pub postal_code: String,
    pub street_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRespDto {
    pub id: String,
    pub user: BuyerRespDto,
    pub items: Vec<OrderLineRespDto>,
    pub shipping_address: ShippingAddrRespDto,
    pub payment_method: String,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

// ---- product administration ----

#[derive(Deserialize, Serialize)]
pub struct ProductCreateReqData {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub colors: Option<Vec<String>>,
    pub sizes: Option<Vec<String>>,
    pub description: Option<String>,
}

// partial edit, only the supplied fields get overwritten
pub type ProductEditReqData = ProductCreateReqData;

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRespDto {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
    pub sold_count: u32,
    pub image: String,
    pub category: String,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

// ---- per-line inventory failures surfaced on order creation ----

#[derive(Serialize, Debug, PartialEq, Eq)]
pub enum OrderLineStockErrorReason {
    NotExist,
    OutOfStock,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineStockErrorDto {
    pub product_id: String,
    pub reason: OrderLineStockErrorReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortage: Option<u32>,
}

// ---- response envelopes, `{success, ...}` body on every route ----

#[derive(Serialize)]
pub struct OrderCreateRespDto {
    pub success: bool,
    pub message: &'static str,
    pub order: OrderRespDto,
}

#[derive(Serialize)]
pub struct OrderListRespDto {
    pub success: bool,
    pub orders: Vec<OrderRespDto>,
}

#[derive(Serialize)]
pub struct OrderSingleRespDto {
    pub success: bool,
    pub order: OrderRespDto,
}

#[derive(Serialize)]
pub struct OrderEditedRespDto {
    pub success: bool,
    pub message: &'static str,
    pub order: OrderRespDto,
}

#[derive(Serialize)]
pub struct ProductCreateRespDto {
    pub success: bool,
    pub message: &'static str,
    pub product: ProductRespDto,
}

#[derive(Serialize)]
pub struct ProductListRespDto {
    pub success: bool,
    pub products: Vec<ProductRespDto>,
}

#[derive(Serialize)]
pub struct ProductSingleRespDto {
    pub success: bool,
    pub product: ProductRespDto,
}

#[derive(Serialize)]
pub struct ProductEditedRespDto {
    pub success: bool,
    pub message: &'static str,
    pub product: ProductRespDto,
}

#[derive(Serialize)]
pub struct SimpleRespDto {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct ErrorRespDto {
    pub success: bool,
    pub error: String,
}
