pub mod audit;
pub mod discord;
pub mod store;
