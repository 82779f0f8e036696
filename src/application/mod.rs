pub mod app_error;
pub mod data_store;
pub mod ports;
pub mod use_cases;
