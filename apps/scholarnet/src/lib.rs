//! # Scholarnet
//!
//! Library half of the Scholarnet binary: dataset loading and the CLI.
//! Exposed so integration tests can drive commands without a subprocess.

pub mod cli;
pub mod dataset;
