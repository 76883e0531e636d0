pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod golang;
pub mod gomod;
pub mod gowork;
pub mod ui;

pub use error::{BuoyError, Result};
