//! Core library for the `countries` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Clients for the country and weather providers
//! - The suggestion, search and detail pipelines
//! - Plain-text rendering of their results
//!
//! It is used by `country-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod render;

pub use config::Config;
pub use error::LookupError;
pub use model::{CountryDetail, CountrySummary, Suggestions, WeatherQuery, WeatherSnapshot};
pub use pipeline::Lookup;
pub use provider::{CountryProvider, WeatherProvider};
