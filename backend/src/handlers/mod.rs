//! HTTP request handlers

pub mod advisory;
pub mod farm;
pub mod health;
pub mod upload;

pub use advisory::{fertilizer_recommendation, govscheme, postharvest};
pub use farm::farm_data;
pub use health::{health_check, root};
pub use upload::{plant_disease, translate};
