pub mod auth;
pub mod credit_service;
pub mod produce_service;
pub mod report_service;
pub mod sales_service;
mod stock;
