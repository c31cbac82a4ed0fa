//! Post-processing of generated pages.

pub mod minify;
