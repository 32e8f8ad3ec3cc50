pub mod json_shop_store;
pub mod memory_shop_store;
pub mod shop_table;
