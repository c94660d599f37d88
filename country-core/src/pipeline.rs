//! Suggestion, search and detail pipelines.
//!
//! Each pipeline takes plain input, awaits its provider calls in sequence and
//! returns plain data for a view to render. Nothing is cached between calls.

use tracing::{debug, info, warn};

use crate::{
    Config, CountryDetail, CountrySummary, LookupError, Suggestions, WeatherQuery,
    provider::{
        CountryProvider, DisabledWeather, WeatherProvider, country_provider_from_config,
        http_client, weather_provider_from_config,
    },
};

/// Inputs shorter than this (after trimming) produce no suggestions.
pub const MIN_SUGGEST_CHARS: usize = 2;

#[derive(Debug)]
pub struct Lookup {
    countries: Box<dyn CountryProvider>,
    weather: Box<dyn WeatherProvider>,
}

impl Lookup {
    pub fn new(countries: Box<dyn CountryProvider>, weather: Box<dyn WeatherProvider>) -> Self {
        Self { countries, weather }
    }

    /// Wire both HTTP providers from config. Without a weather API key the
    /// lookup still works; details just come back without weather.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = http_client(config)?;
        let countries = country_provider_from_config(config, http.clone());

        let weather = weather_provider_from_config(config, http).unwrap_or_else(|err| {
            warn!("{err:#}");
            Box::new(DisabledWeather) as Box<dyn WeatherProvider>
        });

        Ok(Self::new(countries, weather))
    }

    /// Best-effort name completion; never fails.
    pub async fn suggest(&self, partial: &str) -> Suggestions {
        let partial = partial.trim();
        if partial.chars().count() < MIN_SUGGEST_CHARS {
            return Suggestions::empty();
        }

        match self.countries.find_by_name(partial).await {
            Ok(found) => Suggestions::from_names(found.into_iter().map(|c| c.name_common)),
            Err(err) => {
                debug!(%partial, error = %err, "no suggestions");
                Suggestions::empty()
            }
        }
    }

    /// All countries matching `name`, in provider order.
    pub async fn search(&self, name: &str) -> Result<Vec<CountrySummary>, LookupError> {
        let name = validated(name)?;

        let found = self.countries.find_by_name(name).await?;
        info!(%name, matches = found.len(), "search complete");
        Ok(found)
    }

    /// Fresh country record for `name`, enriched with current weather at its
    /// capital when the weather provider can deliver it.
    pub async fn detail(&self, name: &str) -> Result<CountryDetail, LookupError> {
        let name = validated(name)?;

        let found = self.countries.find_by_name(name).await?;
        let country = pick_record(found, name).ok_or_else(|| LookupError::not_found(name))?;

        let query = WeatherQuery::for_country(&country);
        let weather = match self.weather.current(&query).await {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                warn!(location = %query.location(), "weather unavailable: {err:#}");
                None
            }
        };

        Ok(CountryDetail { country, weather_city: query.city, weather })
    }
}

fn validated(name: &str) -> Result<&str, LookupError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LookupError::Validation);
    }
    Ok(name)
}

/// The record whose common name is exactly `name`, else the first one.
fn pick_record(found: Vec<CountrySummary>, name: &str) -> Option<CountrySummary> {
    let exact = found
        .iter()
        .position(|c| c.name_common.eq_ignore_ascii_case(name))
        .unwrap_or(0);

    found.into_iter().nth(exact)
}
