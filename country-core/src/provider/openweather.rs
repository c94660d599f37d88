use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::model::{WeatherQuery, WeatherSnapshot};

use super::{WeatherProvider, base_url, truncate_body};

/// Base for condition icon images; see [`icon_url`].
const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// OpenWeatherMap current-weather client (metric units).
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    base_url: String,
    api_key: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(base_url: String, api_key: String, http: Client) -> Self {
        Self { base_url, api_key, http }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, query: &WeatherQuery) -> Result<WeatherSnapshot> {
        let url = format!("{}/weather", base_url(&self.base_url));
        let location = query.location();
        debug!(%location, "querying OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", location.as_str()),
                ("units", "metric"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (current weather)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather current response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather current request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        parse_current(&body)
    }
}

/// Parses an OpenWeather `/weather` response body.
pub fn parse_current(body: &str) -> Result<WeatherSnapshot> {
    let parsed: OwCurrentResponse =
        serde_json::from_str(body).context("Failed to parse OpenWeather current JSON")?;

    let observation_time = DateTime::<Utc>::from_timestamp(parsed.dt, 0)
        .ok_or_else(|| anyhow!("OpenWeather observation time {} is out of range", parsed.dt))?;

    let condition = parsed.weather.into_iter().next();

    Ok(WeatherSnapshot {
        location_name: parsed.name,
        condition_id: condition.as_ref().map(|w| w.id),
        description: condition
            .as_ref()
            .map(|w| w.description.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
        icon: condition.and_then(|w| w.icon),
        temperature_c: parsed.main.temp,
        feels_like_c: parsed.main.feels_like,
        humidity_pct: parsed.main.humidity,
        wind_speed_mps: parsed.wind.speed,
        pressure_hpa: parsed.main.pressure,
        observation_time,
    })
}

/// Image URL for an OpenWeather icon id, e.g. `10d`.
pub fn icon_url(icon: &str) -> String {
    format!("{ICON_BASE_URL}/{icon}@2x.png")
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: u32,
    description: String,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
}
