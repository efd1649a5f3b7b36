//! `ideal-fit` library crate.
//!
//! The `ideal-fit` viewer and the `generate_dataset` tool are thin binaries
//! over these modules.

pub mod app;
pub mod cli;
pub mod color;
pub mod data;
pub mod fit;
pub mod nanofluid;
pub mod pipeline;
pub mod sink;
pub mod state;
pub mod ui;
