//! Command implementations.

pub mod analyze;
pub mod cache;
pub mod config;
pub mod models;
pub mod settings;
pub mod terms;
pub mod theme;
