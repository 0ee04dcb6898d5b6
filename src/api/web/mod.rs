use std::collections::HashMap;

use axum::http::{
    header as HttpHeader, HeaderMap as HttpHeaderMap, HeaderValue as HttpHeaderValue,
    StatusCode as HttpStatusCode,
};
use axum::routing::{delete, get, post, put, MethodRouter};
use http_body::Body as HttpBody;

use crate::constant as AppConst;
use crate::constant::api::web as WebConst;
use crate::{AppSharedState, WebApiHdlrLabel};

pub mod dto;
mod order;
mod product;

use dto::ErrorRespDto;

// type parameter `HB` for http body of the method router has to match the
// same type parameter in `axum::Router`
pub type ApiRouteType<HB> = MethodRouter<AppSharedState, HB>;
pub type ApiRouteTableType<HB> = HashMap<WebApiHdlrLabel, ApiRouteType<HB>>;

pub fn route_table<HB>() -> ApiRouteTableType<HB>
where
    HB: HttpBody + Send + 'static,
    <HB as HttpBody>::Data: Send,
    <HB as HttpBody>::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let mut out: ApiRouteTableType<HB> = HashMap::new();
    out.insert(WebConst::CREATE_NEW_ORDER, post(order::create_handler));
    out.insert(WebConst::LIST_ALL_ORDERS, get(order::list_all_handler));
    out.insert(WebConst::LIST_BUYER_ORDERS, get(order::list_by_buyer_handler));
    out.insert(WebConst::READ_ORDER, get(order::read_handler));
    out.insert(
        WebConst::UPDATE_ORDER_STATUS,
        put(order::update_status_handler),
    );
    out.insert(WebConst::DISCARD_ORDER, delete(order::discard_handler));
    out.insert(WebConst::CREATE_NEW_PRODUCT, post(product::create_handler));
    out.insert(WebConst::LIST_ALL_PRODUCTS, get(product::list_all_handler));
    out.insert(
        WebConst::LIST_CATEGORY_PRODUCTS,
        get(product::list_by_category_handler),
    );
    out.insert(WebConst::READ_PRODUCT, get(product::read_handler));
    out.insert(WebConst::EDIT_PRODUCT, put(product::edit_handler));
    out.insert(WebConst::DISCARD_PRODUCT, delete(product::discard_handler));
    out
}

// every response body in this API is JSON, including the stable error
// shape `{"success":false, "error":<message>}`
pub(super) fn resp_pack(
    status: HttpStatusCode,
    serial_body: String,
) -> (HttpStatusCode, HttpHeaderMap, String) {
    let resp_ctype_val = HttpHeaderValue::from_str(AppConst::HTTP_CONTENT_TYPE_JSON).unwrap();
    let mut hdr_map = HttpHeaderMap::new();
    hdr_map.insert(HttpHeader::CONTENT_TYPE, resp_ctype_val);
    (status, hdr_map, serial_body)
}

pub(super) fn error_body(msg: &str) -> String {
    let obj = ErrorRespDto {
        success: false,
        error: msg.to_string(),
    };
    serde_json::to_string(&obj).unwrap()
}

pub(super) fn serialize_or_fallback<T: serde::Serialize>(value: &T) -> (bool, String) {
    match serde_json::to_string(value) {
        Ok(s) => (true, s),
        Err(_e) => (false, error_body("serialization failure")),
    }
}
