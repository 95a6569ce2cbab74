pub mod browse;
pub mod catalog;
pub mod config;
pub mod hash;
pub mod profile;
pub mod scoring;
pub mod storage;
pub mod theme;

mod error;
mod market;
mod utils;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use market::{LoadTicket, Marketplace};

pub use bazaar_types::*;
