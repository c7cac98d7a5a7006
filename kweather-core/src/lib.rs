//! Core library for the `kweather` forecast tool.
//!
//! This crate defines:
//! - The supported region table and its KMA grid coordinates
//! - Issuance batch selection and the KMA forecast client
//! - Decoding of raw grid records into hourly slots and a current snapshot
//! - The `get_weather` tool contract used by chat agents
//!
//! It is used by `kweather-cli`, but can also be embedded in other binaries or agents.

pub mod batch;
pub mod config;
pub mod decode;
pub mod error;
pub mod model;
pub mod provider;
pub mod region;
pub mod service;
pub mod tool;

pub use batch::{IssuanceBatch, kst_now, select_batch};
pub use config::Config;
pub use error::{ErrorKind, ForecastError, ServiceFault};
pub use model::{
    Category, CurrentSnapshot, ForecastSlot, NO_DATA, RawForecastItem, ToolPayload,
    WeatherReport, WeatherResult,
};
pub use provider::{ForecastSource, KmaClient};
pub use region::{GridPoint, REGIONS, SupportedLocation};
pub use service::WeatherService;
