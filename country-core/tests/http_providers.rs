//! Pipelines driven through the real HTTP providers against mock servers.

use country_core::{Config, Lookup, LookupError, render};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn testland(capital: Option<&str>) -> Value {
    let mut record = json!({
        "name": {"common": "Testland", "official": "Republic of Testland"},
        "region": "Testregion",
        "population": 1000000,
        "flags": {"png": "https://flags.example/tl.png"},
        "languages": {"tst": "Testish"},
        "currencies": {"TLD": {"name": "Test dollar", "symbol": "T$"}},
        "area": 1234.5,
        "latlng": [10.0, 20.0],
        "landlocked": true,
        "independent": true,
        "demonyms": {"eng": {"f": "Testish", "m": "Testish"}},
        "timezones": ["UTC+01:00"],
        "cca2": "TL"
    });
    if let Some(capital) = capital {
        record["capital"] = json!([capital]);
    }
    record
}

fn weather_body() -> Value {
    json!({
        "weather": [{"id": 801, "main": "Clouds", "description": "few clouds", "icon": "02d"}],
        "main": {"temp": 18.5, "feels_like": 17.2, "pressure": 1016, "humidity": 55},
        "wind": {"speed": 2.57},
        "dt": 1700000000,
        "name": "Testville"
    })
}

fn config(countries: &MockServer, weather_base: &str) -> Config {
    let mut cfg = Config::default();
    cfg.countries.base_url = countries.uri();
    cfg.weather.base_url = weather_base.to_string();
    cfg.set_weather_api_key("TEST_KEY".into());
    cfg.http.timeout_secs = 5;
    cfg
}

#[tokio::test]
async fn detail_requests_weather_for_capital_and_code() {
    let countries = MockServer::start().await;
    let weather = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/name/Testland"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([testland(Some("Testville"))])))
        .expect(1)
        .mount(&countries)
        .await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Testville,TL"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body()))
        .expect(1)
        .mount(&weather)
        .await;

    let lookup = Lookup::from_config(&config(&countries, &weather.uri())).expect("lookup");
    let detail = lookup.detail("Testland").await.expect("detail");

    assert_eq!(detail.weather_city, "Testville");
    let snapshot = detail.weather.as_ref().expect("weather present");
    assert_eq!(snapshot.temperature_c, 18.5);
    assert_eq!(snapshot.description, "few clouds");

    let out = render::DetailView(&detail).to_string();
    assert!(out.contains("19°C, few clouds"));
    assert!(out.contains("Population:    1,000,000"));
}

#[tokio::test]
async fn detail_without_capital_uses_common_name() {
    let countries = MockServer::start().await;
    let weather = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/name/Testland"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([testland(None)])))
        .mount(&countries)
        .await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Testland,TL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body()))
        .expect(1)
        .mount(&weather)
        .await;

    let lookup = Lookup::from_config(&config(&countries, &weather.uri())).expect("lookup");
    let detail = lookup.detail("Testland").await.expect("detail");

    assert_eq!(render::capital(&detail.country), render::PLACEHOLDER);
    assert!(detail.weather.is_some());
}

#[tokio::test]
async fn detail_survives_weather_server_error() {
    let countries = MockServer::start().await;
    let weather = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/name/Testland"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([testland(Some("Testville"))])))
        .mount(&countries)
        .await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&weather)
        .await;

    let lookup = Lookup::from_config(&config(&countries, &weather.uri())).expect("lookup");
    let detail = lookup.detail("Testland").await.expect("weather failure is absorbed");

    assert!(detail.weather.is_none());
    assert_eq!(detail.country.name_common, "Testland");
    assert_eq!(detail.country.population, Some(1_000_000));
    assert!(render::DetailView(&detail).to_string().ends_with(render::WEATHER_UNAVAILABLE));
}

#[tokio::test]
async fn detail_survives_unreachable_weather_provider() {
    let countries = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/name/Testland"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([testland(Some("Testville"))])))
        .mount(&countries)
        .await;

    // Nothing listens on port 1.
    let lookup = Lookup::from_config(&config(&countries, "http://127.0.0.1:1")).expect("lookup");
    let detail = lookup.detail("Testland").await.expect("weather failure is absorbed");

    assert!(detail.weather.is_none());
    assert_eq!(detail.country.capital(), Some("Testville"));
}

#[tokio::test]
async fn detail_without_api_key_has_no_weather() {
    let countries = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/name/Testland"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([testland(Some("Testville"))])))
        .mount(&countries)
        .await;

    let mut cfg = config(&countries, "http://127.0.0.1:1");
    cfg.weather.api_key = None;

    let lookup = Lookup::from_config(&cfg).expect("lookup");
    let detail = lookup.detail("Testland").await.expect("detail");
    assert!(detail.weather.is_none());
}

#[tokio::test]
async fn detail_not_found_never_reaches_weather() {
    let countries = MockServer::start().await;
    let weather = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/name/Atlantis"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"status": 404, "message": "Not Found"})),
        )
        .mount(&countries)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body()))
        .expect(0)
        .mount(&weather)
        .await;

    let lookup = Lookup::from_config(&config(&countries, &weather.uri())).expect("lookup");
    let err = lookup.detail("Atlantis").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Country not found: Atlantis");
}

#[tokio::test]
async fn search_maps_statuses_and_transport_failures() {
    let countries = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/name/Atlantis"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&countries)
        .await;

    Mock::given(method("GET"))
        .and(path("/name/Garbled"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&countries)
        .await;

    let lookup = Lookup::from_config(&config(&countries, "http://127.0.0.1:1")).expect("lookup");

    assert!(lookup.search("Atlantis").await.unwrap_err().is_not_found());

    let err = lookup.search("Garbled").await.unwrap_err();
    assert!(matches!(err, LookupError::Transport { .. }));

    let mut cfg = Config::default();
    cfg.countries.base_url = "http://127.0.0.1:1".into();
    let offline = Lookup::from_config(&cfg).expect("lookup");
    let err = offline.search("Testland").await.unwrap_err();
    assert!(matches!(err, LookupError::Transport { .. }));
    assert!(err.to_string().contains("Failed to send request to REST Countries"));
}

#[tokio::test]
async fn search_returns_records_in_provider_order() {
    let countries = MockServer::start().await;

    let body = json!([
        {"name": {"common": "Niger"}, "cca2": "NE"},
        {"name": {"common": "Nigeria"}, "cca2": "NG"}
    ]);
    Mock::given(method("GET"))
        .and(path("/name/nig"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&countries)
        .await;

    let lookup = Lookup::from_config(&config(&countries, "http://127.0.0.1:1")).expect("lookup");
    let found = lookup.search("  nig  ").await.expect("search");

    let names: Vec<_> = found.iter().map(|c| c.name_common.as_str()).collect();
    assert_eq!(names, vec!["Niger", "Nigeria"]);
}

#[tokio::test]
async fn suggest_caps_results_and_skips_short_input() {
    let countries = MockServer::start().await;

    let body: Vec<Value> = (0..7)
        .map(|i| json!({"name": {"common": format!("Land {i}")}}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/name/la"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&countries)
        .await;

    let lookup = Lookup::from_config(&config(&countries, "http://127.0.0.1:1")).expect("lookup");

    assert!(lookup.suggest("l").await.is_empty());

    let names = lookup.suggest("la").await.into_vec();
    assert_eq!(names, (0..5).map(|i| format!("Land {i}")).collect::<Vec<_>>());
}

#[tokio::test]
async fn suggest_treats_errors_as_no_results() {
    let countries = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/name/zz"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&countries)
        .await;

    Mock::given(method("GET"))
        .and(path("/name/xx"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{"))
        .mount(&countries)
        .await;

    let lookup = Lookup::from_config(&config(&countries, "http://127.0.0.1:1")).expect("lookup");

    assert!(lookup.suggest("zz").await.is_empty());
    assert!(lookup.suggest("xx").await.is_empty());
}
