// src/lib.rs

pub mod display;
pub mod error;
pub mod metrics;
pub mod models;
pub mod registry;
pub mod services;
pub mod storage;

pub use error::Error;
pub use registry::WinnerRegistry;
pub use services::RaffleService;
