pub mod shop_service;
pub mod substitution_cipher;
