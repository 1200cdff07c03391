pub mod calculator;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod confirm;
pub mod domain;
pub mod error;
pub mod notes;
pub mod pipeline;
pub mod runner;
pub mod state;
pub mod sync;
pub mod ui;

pub use error::{AutoFlowError, Result};
