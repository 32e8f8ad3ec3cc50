pub mod cipher;
pub mod log;
pub mod register;
pub mod serve;
pub mod shop;
