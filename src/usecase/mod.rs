mod edit_product;
mod manage_order;

pub use edit_product::{
    CreateProductUseCase, DiscardProductUseCase, EditProductUseCase, ProductUcError,
    ReadProductsUseCase,
};
pub use manage_order::{
    CreateOrderUsKsErr, CreateOrderUseCase, DiscardOrderUseCase, OrderAccessUcError,
    ReadOrdersUseCase, UpdateOrderStatusUcError, UpdateOrderStatusUseCase,
};
