mod order;
mod product;

// render a generated UUID as the 32-hex-char identifier format every
// stored record uses
pub(crate) fn generate_hex_id(machine_code: u8) -> String {
    let uid = crate::generate_custom_uid(machine_code);
    let bs = uid.into_bytes();
    bs.into_iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<String>>()
        .join("")
}

pub use order::{
    BuyerSnapshotModel, OrderAmountsModel, OrderDraftModel, OrderIntakeError, OrderLineModel,
    OrderModel, OrderStatus, PaymentMethod, ShippingAddrModel,
};
pub use product::{
    try_adjust_inventory, ProductCategory, ProductIntakeError, ProductModel, StockAdjustResult,
};
