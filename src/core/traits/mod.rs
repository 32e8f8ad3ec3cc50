pub mod audit;
pub mod identity;
pub mod shop_store;
