// src/lib.rs

pub mod config;
pub mod current;
pub mod diffusion;
pub mod error;
pub mod grid;
pub mod material;
pub mod params;
pub mod report;
pub mod scalar_field;
pub mod simulate;
pub mod snapshot;
pub mod summary;
pub mod visualisation;

pub use error::{EddyError, Result};
