// src/services/mod.rs

pub mod raffle_service;

pub use raffle_service::{RaffleService, STORAGE_KEY};
