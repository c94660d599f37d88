use crate::{
    Config, CountrySummary, LookupError, WeatherQuery, WeatherSnapshot,
    provider::{openweather::OpenWeatherProvider, restcountries::RestCountriesProvider},
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;

pub mod openweather;
pub mod restcountries;

const USER_AGENT: &str = concat!("country-lookup/", env!("CARGO_PKG_VERSION"));

/// Source of country records.
#[async_trait]
pub trait CountryProvider: Send + Sync + Debug {
    /// Countries whose name matches `name`, in provider order.
    ///
    /// A "no match" answer is [`LookupError::NotFound`]; anything that keeps
    /// us from reading an answer is [`LookupError::Transport`].
    async fn find_by_name(&self, name: &str) -> Result<Vec<CountrySummary>, LookupError>;
}

/// Source of current weather conditions.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, query: &WeatherQuery) -> anyhow::Result<WeatherSnapshot>;
}

/// Stand-in used when no weather API key is configured: every lookup fails,
/// so details render without weather.
#[derive(Debug, Clone, Default)]
pub struct DisabledWeather;

#[async_trait]
impl WeatherProvider for DisabledWeather {
    async fn current(&self, _query: &WeatherQuery) -> anyhow::Result<WeatherSnapshot> {
        Err(anyhow::anyhow!("No weather API key configured"))
    }
}

/// HTTP client shared by both providers, with the configured timeout.
pub fn http_client(config: &Config) -> anyhow::Result<Client> {
    Client::builder()
        .timeout(config.timeout())
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

pub fn country_provider_from_config(
    config: &Config,
    http: Client,
) -> Box<dyn CountryProvider> {
    Box::new(RestCountriesProvider::new(config.countries.base_url.clone(), http))
}

/// Construct the weather provider; fails when no API key is configured.
pub fn weather_provider_from_config(
    config: &Config,
    http: Client,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.weather_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for the weather provider.\n\
                 Hint: run `countries configure` or set {}.",
            crate::config::WEATHER_API_KEY_ENV
        )
    })?;

    Ok(Box::new(OpenWeatherProvider::new(
        config.weather.base_url.clone(),
        api_key.to_owned(),
        http,
    )))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

/// Trims a trailing `/` so paths can be appended.
pub(crate) fn base_url(url: &str) -> &str {
    url.trim_end_matches('/')
}
