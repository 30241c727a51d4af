//! Shared types and models for the Farm Advisory service
//!
//! This crate contains the advisory domain records (location, soil, weather,
//! context, prompts) shared between the backend pipeline and its tests.
//! Nothing in here performs I/O.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
