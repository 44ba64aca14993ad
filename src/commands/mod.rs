pub mod app_info;
pub mod borrow;
pub mod health;
pub mod kyc;
pub mod market_data;
pub mod market_detail;
