pub mod actor;
pub mod audit_entry;
pub mod shop;
pub mod tier;
