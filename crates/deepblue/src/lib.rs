//! `deepblue` - shipboard compliance records, calculators, and inspection heuristics
//!
//! This library provides the core functionality behind the DeepBlue Mate
//! crew toolkit: a durable record store for inventory, certificates, and
//! rest hours; pure maritime calculators; a pixel-heuristic rust estimator;
//! a typed sensor capability layer; and the companion chat client.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod assistant;
pub mod calc;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod records;
pub mod sensors;
pub mod store;

pub use assistant::{AssistantClient, AssistantSettings};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use records::{Certificate, InventoryItem, RestLog};
pub use store::{Store, StoreStats};
