// Engine library root: session, favorites synchronization and backend services

pub mod client;
pub mod config;
pub mod data;
pub mod error;
pub mod resolver;
pub mod services;
pub mod session;
pub mod watchlist;

pub use client::GuardianClient;
pub use error::{GuardianError, Result};

#[cfg(test)]
mod test_support;
