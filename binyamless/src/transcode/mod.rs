//! Output transcoders for formats with their own crates.

pub mod toml;
pub mod yaml;
