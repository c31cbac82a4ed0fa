mod build;
mod clean;
mod core;
mod serve;

pub use build::*;
pub use clean::*;
pub use self::core::*;
pub use serve::*;
