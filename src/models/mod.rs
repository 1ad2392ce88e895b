pub mod config;
pub mod strategy;
