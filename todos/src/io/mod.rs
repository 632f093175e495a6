//! Side-effecting helpers: the record store and configuration loading.

pub mod config;
pub mod store;
