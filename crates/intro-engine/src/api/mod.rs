pub mod config;
pub mod error;
pub mod ports;
pub mod theme;
pub mod types;
