use crate::WebApiHdlrLabel;

pub mod app_meta {
    pub const LABEL: &str = "storefront";
    // TODO, machine code to UUID generator should be configurable
    pub const MACHINE_CODE: u8 = 1;
}

pub const ENV_VAR_SYS_BASE_PATH: &str = "SYS_BASE_PATH";
pub const ENV_VAR_SERVICE_BASE_PATH: &str = "SERVICE_BASE_PATH";
pub const ENV_VAR_CONFIG_FILE_PATH: &str = "CONFIG_FILE_PATH";

pub const EXPECTED_ENV_VAR_LABELS: [&str; 3] = [
    ENV_VAR_SYS_BASE_PATH,
    ENV_VAR_SERVICE_BASE_PATH,
    ENV_VAR_CONFIG_FILE_PATH,
];

pub mod hard_limit {
    pub const MAX_ITEMS_STORED_PER_MODEL: u32 = 2200u32;
    pub const MAX_ORDER_LINES_PER_REQUEST: usize = 255;
    pub const MAX_DB_CONNECTIONS: u32 = 10000u32;
    pub const MAX_SECONDS_DB_IDLE: u16 = 600u16;
}

pub mod pricing {
    // flat shipping fee applied when the client omits the field
    pub const DEFAULT_SHIPPING_FEE: i64 = 10;
    // tolerance when comparing a submitted order total against the amount
    // recomputed from authoritative per-line prices, expressed in cents
    pub const TOTAL_MISMATCH_TOLERANCE_CENTS: i64 = 1;
}

pub(crate) mod api {
    use super::WebApiHdlrLabel;

    #[allow(non_camel_case_types)]
    pub(crate) struct web {}

    impl web {
        pub(crate) const CREATE_NEW_ORDER: WebApiHdlrLabel = "create_new_order";
        pub(crate) const LIST_ALL_ORDERS: WebApiHdlrLabel = "list_all_orders";
        pub(crate) const LIST_BUYER_ORDERS: WebApiHdlrLabel = "list_buyer_orders";
        pub(crate) const READ_ORDER: WebApiHdlrLabel = "read_order";
        pub(crate) const UPDATE_ORDER_STATUS: WebApiHdlrLabel = "update_order_status";
        pub(crate) const DISCARD_ORDER: WebApiHdlrLabel = "discard_order";
        pub(crate) const CREATE_NEW_PRODUCT: WebApiHdlrLabel = "create_new_product";
        pub(crate) const LIST_ALL_PRODUCTS: WebApiHdlrLabel = "list_all_products";
        pub(crate) const LIST_CATEGORY_PRODUCTS: WebApiHdlrLabel = "list_category_products";
        pub(crate) const READ_PRODUCT: WebApiHdlrLabel = "read_product";
        pub(crate) const EDIT_PRODUCT: WebApiHdlrLabel = "edit_product";
        pub(crate) const DISCARD_PRODUCT: WebApiHdlrLabel = "discard_product";
    }
}

pub(crate) const HTTP_CONTENT_TYPE_JSON: &str = "application/json";

pub(crate) const REGEX_EMAIL_RFC5322 : &str = r#"(?:[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21\x23-\x5b\x5d-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")@(?:(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?|\[(?:(?:(2(5[0-5]|[0-4][0-9])|1[0-9][0-9]|[1-9]?[0-9]))\.){3}(?:(2(5[0-5]|[0-4][0-9])|1[0-9][0-9]|[1-9]?[0-9])|[a-z0-9-]*[a-z0-9]:(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21-\x5a\x53-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])+)\])"#;

pub mod logging {
    use serde::Deserialize;

    #[allow(clippy::upper_case_acronyms)]
    #[derive(Deserialize)]
    pub enum Level {
        TRACE,
        DEBUG,
        INFO,
        WARNING,
        ERROR,
        FATAL,
    }

    #[allow(clippy::upper_case_acronyms)]
    #[derive(Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Destination {
        CONSOLE,
        LOCALFS,
    }
}
