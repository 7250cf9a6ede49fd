//! Client library for the Nature Remo cloud API and the Remo local API.

pub mod models {
    pub mod remo;
}

pub mod client;
pub mod error;
pub mod local;
pub mod utils;

pub use crate::client::{AirConSettings, NatureRemoAPI, RateLimit};
pub use crate::error::NatureRemoError;
pub use crate::local::NatureRemoLocalAPI;
pub use crate::models::remo::*;
