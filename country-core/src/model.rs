use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of entries in a [`Suggestions`] list.
pub const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub name: Option<String>,
    pub symbol: Option<String>,
}

/// A country record as shown in a result card and in the detail view.
///
/// Only `name_common` is guaranteed; everything else may be missing and is
/// replaced by a placeholder when rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountrySummary {
    pub name_common: String,
    pub name_official: Option<String>,
    pub capitals: Vec<String>,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub population: Option<u64>,
    pub flag_png: Option<String>,
    pub languages: BTreeMap<String, String>,
    pub currencies: BTreeMap<String, Currency>,
    pub area_km2: Option<f64>,
    pub latlng: Option<(f64, f64)>,
    pub landlocked: Option<bool>,
    pub independent: Option<bool>,
    pub demonym: Option<String>,
    pub timezones: Vec<String>,
    /// ISO 3166-1 alpha-2 code.
    pub country_code: Option<String>,
}

impl CountrySummary {
    /// First listed capital, ignoring blank entries.
    pub fn capital(&self) -> Option<&str> {
        self.capitals
            .first()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
    }

    /// City used to look up current weather: the capital, or the country's
    /// own name when it has none.
    pub fn weather_city(&self) -> &str {
        self.capital().unwrap_or(&self.name_common)
    }
}

/// Current conditions as reported by the weather provider, unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub condition_id: Option<u32>,
    pub description: String,
    pub icon: Option<String>,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub pressure_hpa: f64,
    pub observation_time: DateTime<Utc>,
}

/// Key for a weather lookup: a city name plus an optional two-letter code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: String,
    pub country_code: Option<String>,
}

impl WeatherQuery {
    pub fn for_country(country: &CountrySummary) -> Self {
        Self {
            city: country.weather_city().to_string(),
            country_code: country.country_code.clone(),
        }
    }

    /// Provider-side location string, e.g. `Paris,FR`.
    pub fn location(&self) -> String {
        match &self.country_code {
            Some(code) => format!("{},{}", self.city, code),
            None => self.city.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryDetail {
    pub country: CountrySummary,
    /// City the weather was (or would have been) looked up for.
    pub weather_city: String,
    /// `None` when the weather provider could not deliver.
    pub weather: Option<WeatherSnapshot>,
}

/// Up to [`MAX_SUGGESTIONS`] distinct common names in provider order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestions(Vec<String>);

impl Suggestions {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Keeps the first occurrence of each name; repeats do not use up a
    /// slot, so more than five names may be read to fill the list.
    pub fn from_names<I>(names: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut out: Vec<String> = Vec::with_capacity(MAX_SUGGESTIONS);
        for name in names {
            if out.len() == MAX_SUGGESTIONS {
                break;
            }
            if !out.contains(&name) {
                out.push(name);
            }
        }
        Self(out)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl IntoIterator for Suggestions {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
