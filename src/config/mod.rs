//! Application configuration: the user facing model and the runtime model derived from it.

pub mod models;
pub mod rt;

pub use models::*;

pub(crate) const DIST_DIR: &str = "dist";
pub(crate) const STAGE_DIR: &str = ".stage";
