#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

pub mod config;
pub mod error;
pub mod geo;
pub mod loaders;
pub mod package;

pub use error::{CifpResult, Error};

#[cfg(test)]
mod tests;
