pub mod build;
pub mod clean;
pub mod config;
pub mod core;
pub mod serve;
