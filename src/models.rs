pub mod auth;
pub mod credit;
pub mod produce;
pub mod reports;
pub mod sales;
