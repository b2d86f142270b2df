//! Command implementations for the autobase binary

mod context;
mod run;
pub mod style;

pub use run::{run_once, run_watch};
