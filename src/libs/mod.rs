pub mod config;
pub mod eth;
pub mod units;
pub mod writing;
