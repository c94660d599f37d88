use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{CountrySummary, LookupError, model::Currency};

use super::{CountryProvider, base_url, truncate_body};

/// REST Countries v3.1 client.
#[derive(Debug, Clone)]
pub struct RestCountriesProvider {
    base_url: String,
    http: Client,
}

impl RestCountriesProvider {
    pub fn new(base_url: String, http: Client) -> Self {
        Self { base_url, http }
    }

    fn name_url(&self, name: &str) -> Result<Url, LookupError> {
        let mut url = Url::parse(&format!("{}/name/", base_url(&self.base_url))).map_err(|e| {
            LookupError::transport(format!("Invalid REST Countries URL '{}': {e}", self.base_url))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                LookupError::transport(format!(
                    "REST Countries URL '{}' cannot take a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push(name);

        Ok(url)
    }
}

#[async_trait]
impl CountryProvider for RestCountriesProvider {
    async fn find_by_name(&self, name: &str) -> Result<Vec<CountrySummary>, LookupError> {
        let url = self.name_url(name)?;
        debug!(%url, "querying REST Countries");

        let res = self.http.get(url).send().await.map_err(|e| {
            LookupError::transport(format!("Failed to send request to REST Countries: {e}"))
        })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            LookupError::transport(format!("Failed to read REST Countries response body: {e}"))
        })?;

        if !status.is_success() {
            if status != StatusCode::NOT_FOUND {
                warn!(%status, body = %truncate_body(&body), "REST Countries request failed");
            }
            return Err(LookupError::not_found(name));
        }

        parse_countries(&body, name)
    }
}

/// Parses a `/name/{name}` response body into summaries, in response order.
pub fn parse_countries(body: &str, name: &str) -> Result<Vec<CountrySummary>, LookupError> {
    let parsed: RcResponse = serde_json::from_str(body).map_err(|e| {
        LookupError::transport(format!("Failed to parse REST Countries JSON: {e}"))
    })?;

    match parsed {
        RcResponse::Countries(records) => Ok(records
            .into_iter()
            .filter_map(|record| {
                let summary = record.into_summary();
                if summary.is_none() {
                    warn!("skipping REST Countries record without a common name");
                }
                summary
            })
            .collect()),
        RcResponse::Status { status, message } => {
            debug!(status, ?message, "REST Countries reported an error in the body");
            Err(LookupError::not_found(name))
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RcResponse {
    Countries(Vec<RcCountry>),
    Status { status: u16, message: Option<String> },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RcName {
    common: Option<String>,
    official: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RcFlags {
    png: Option<String>,
    svg: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RcCurrency {
    name: Option<String>,
    symbol: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RcDemonym {
    f: Option<String>,
    m: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RcCountry {
    name: Option<RcName>,
    capital: Option<Vec<String>>,
    region: Option<String>,
    subregion: Option<String>,
    population: Option<u64>,
    flags: Option<RcFlags>,
    languages: Option<BTreeMap<String, String>>,
    currencies: Option<BTreeMap<String, RcCurrency>>,
    area: Option<f64>,
    latlng: Option<Vec<f64>>,
    landlocked: Option<bool>,
    independent: Option<bool>,
    demonyms: Option<BTreeMap<String, RcDemonym>>,
    timezones: Option<Vec<String>>,
    cca2: Option<String>,
}

impl RcCountry {
    fn into_summary(self) -> Option<CountrySummary> {
        let name = self.name.unwrap_or_default();
        let name_common = name.common.filter(|n| !n.trim().is_empty())?;

        let latlng = match self.latlng.as_deref() {
            Some([lat, lng, ..]) => Some((*lat, *lng)),
            _ => None,
        };

        let demonym = self
            .demonyms
            .and_then(|mut d| d.remove("eng"))
            .and_then(|d| d.f.or(d.m));

        let currencies = self
            .currencies
            .unwrap_or_default()
            .into_iter()
            .map(|(code, c)| (code, Currency { name: c.name, symbol: c.symbol }))
            .collect();

        Some(CountrySummary {
            name_common,
            name_official: name.official,
            capitals: self.capital.unwrap_or_default(),
            region: self.region.filter(|r| !r.is_empty()),
            subregion: self.subregion.filter(|r| !r.is_empty()),
            population: self.population,
            flag_png: self.flags.and_then(|f| f.png.or(f.svg)),
            languages: self.languages.unwrap_or_default(),
            currencies,
            area_km2: self.area.filter(|a| *a >= 0.0),
            latlng,
            landlocked: self.landlocked,
            independent: self.independent,
            demonym,
            timezones: self.timezones.unwrap_or_default(),
            country_code: self.cca2.filter(|c| !c.is_empty()),
        })
    }
}
