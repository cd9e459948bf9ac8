// The infra module contains implementations of core traits.

#[path = "knowledge/mod.rs"]
pub mod knowledge;

#[path = "config/config_loader.rs"]
pub mod config;
