//! Plain-text views of pipeline results.
//!
//! Every missing field renders as [`PLACEHOLDER`]; numbers are rounded or
//! grouped here and nowhere upstream.

use std::fmt::{self, Display, Formatter};

use crate::{CountryDetail, CountrySummary, WeatherSnapshot, provider::openweather::icon_url};

pub const PLACEHOLDER: &str = "N/A";
pub const WEATHER_UNAVAILABLE: &str = "Weather data not available";

/// Groups an integer's digits in threes: `1000000` -> `1,000,000`.
pub fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Grouped decimal with at most three fraction digits, trailing zeros
/// dropped: `551695.0` -> `551,695`, `1234.5678` -> `1,234.568`.
pub fn format_decimal(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }

    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let grouped = int_part
        .parse::<u64>()
        .map(group_digits)
        .unwrap_or_else(|_| int_part.to_string());

    let sign = if value < 0.0 && (grouped != "0" || !frac.is_empty()) { "-" } else { "" };

    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

/// Rounds to the nearest whole unit, halves towards positive infinity.
pub fn round_whole(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

fn or_placeholder(value: Option<&str>) -> &str {
    value.unwrap_or(PLACEHOLDER)
}

fn yes_no(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "Yes",
        Some(false) => "No",
        None => PLACEHOLDER,
    }
}

fn joined_or_placeholder<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let parts: Vec<String> = items.into_iter().map(|s| s.as_ref().to_string()).collect();
    if parts.is_empty() { PLACEHOLDER.to_string() } else { parts.join(", ") }
}

pub fn capital(country: &CountrySummary) -> &str {
    or_placeholder(country.capital())
}

pub fn population(country: &CountrySummary) -> String {
    country.population.map(group_digits).unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn languages(country: &CountrySummary) -> String {
    joined_or_placeholder(country.languages.values())
}

/// Currency names only, as shown on a result card.
pub fn currency_names(country: &CountrySummary) -> String {
    joined_or_placeholder(
        country.currencies.iter().map(|(code, c)| c.name.as_deref().unwrap_or(code)),
    )
}

/// `Euro (€)` style, as shown in the detail view.
pub fn currencies_with_symbols(country: &CountrySummary) -> String {
    joined_or_placeholder(country.currencies.iter().map(|(code, c)| {
        format!("{} ({})", c.name.as_deref().unwrap_or(code), or_placeholder(c.symbol.as_deref()))
    }))
}

pub fn region(country: &CountrySummary) -> String {
    let region = or_placeholder(country.region.as_deref());
    match country.subregion.as_deref() {
        Some(sub) => format!("{region} ({sub})"),
        None => region.to_string(),
    }
}

pub fn area(country: &CountrySummary) -> String {
    match country.area_km2 {
        Some(a) => format!("{} km²", format_decimal(a)),
        None => PLACEHOLDER.to_string(),
    }
}

pub fn coordinates(country: &CountrySummary) -> String {
    match country.latlng {
        Some((lat, lng)) => format!("{lat}, {lng}"),
        None => PLACEHOLDER.to_string(),
    }
}

/// A result card.
pub struct SummaryCard<'a>(pub &'a CountrySummary);

impl Display for SummaryCard<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let c = self.0;
        writeln!(f, "{}", c.name_common)?;
        writeln!(f, "  Official Name: {}", or_placeholder(c.name_official.as_deref()))?;
        writeln!(f, "  Capital:       {}", capital(c))?;
        writeln!(f, "  Region:        {}", or_placeholder(c.region.as_deref()))?;
        writeln!(f, "  Population:    {}", population(c))?;
        writeln!(f, "  Languages:     {}", languages(c))?;
        writeln!(f, "  Currencies:    {}", currency_names(c))?;
        write!(f, "  Flag:          {}", or_placeholder(c.flag_png.as_deref()))
    }
}

/// Result cards separated by blank lines.
pub struct ResultList<'a>(pub &'a [CountrySummary]);

impl Display for ResultList<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, country) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
                writeln!(f)?;
            }
            write!(f, "{}", SummaryCard(country))?;
        }
        Ok(())
    }
}

/// Current-weather block, or the unavailable notice.
pub struct WeatherPanel<'a>(pub Option<&'a WeatherSnapshot>);

impl Display for WeatherPanel<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Some(w) = self.0 else {
            return write!(f, "  {WEATHER_UNAVAILABLE}");
        };

        writeln!(f, "  {}°C, {}", round_whole(w.temperature_c), w.description)?;
        writeln!(f, "  Feels Like:   {}°C", round_whole(w.feels_like_c))?;
        writeln!(f, "  Humidity:     {}%", w.humidity_pct)?;
        writeln!(f, "  Wind:         {} m/s", w.wind_speed_mps)?;
        writeln!(f, "  Pressure:     {} hPa", w.pressure_hpa)?;
        if let Some(icon) = &w.icon {
            writeln!(f, "  Icon:         {}", icon_url(icon))?;
        }
        write!(f, "  Last updated: {}", w.observation_time.format("%Y-%m-%d"))
    }
}

/// Full detail view.
pub struct DetailView<'a>(pub &'a CountryDetail);

impl Display for DetailView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let d = self.0;
        let c = &d.country;

        writeln!(f, "{}", c.name_common)?;
        writeln!(f, "Flag: {}", or_placeholder(c.flag_png.as_deref()))?;
        writeln!(f)?;

        writeln!(f, "Basic Information")?;
        writeln!(f, "  Official Name: {}", or_placeholder(c.name_official.as_deref()))?;
        writeln!(f, "  Capital:       {}", capital(c))?;
        writeln!(f, "  Region:        {}", region(c))?;
        writeln!(f, "  Population:    {}", population(c))?;
        writeln!(f)?;

        writeln!(f, "Geography")?;
        writeln!(f, "  Area:          {}", area(c))?;
        writeln!(f, "  Timezone:      {}", joined_or_placeholder(&c.timezones))?;
        writeln!(f, "  Lat/Lng:       {}", coordinates(c))?;
        writeln!(f, "  Landlocked:    {}", yes_no(c.landlocked))?;
        writeln!(f)?;

        writeln!(f, "Culture")?;
        writeln!(f, "  Languages:     {}", languages(c))?;
        writeln!(f, "  Currencies:    {}", currencies_with_symbols(c))?;
        writeln!(f, "  Demonym:       {}", or_placeholder(c.demonym.as_deref()))?;
        writeln!(f, "  Independent:   {}", yes_no(c.independent))?;
        writeln!(f)?;

        writeln!(f, "Weather in {}", d.weather_city)?;
        write!(f, "{}", WeatherPanel(d.weather.as_ref()))
    }
}
