pub mod cache;
pub mod config;
pub mod token;

pub use config::AppConfig;
