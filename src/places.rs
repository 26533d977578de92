//! Places search: the wire model and the HTTP client for `/v2/places`

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ExplorerConfig;
use crate::error::{ConfigError, PlacesError};
use crate::filters::SearchFilters;
use crate::geo::{LatLng, Viewport};

/// A point of interest as returned by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub place_id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Dot-segmented, e.g. `accommodation.hotel`
    #[serde(default)]
    pub categories: Vec<String>,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub formatted: Option<String>,
}

impl Place {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lon)
    }
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: Place,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Option<Vec<Feature>>,
}

/// Parse a GeoJSON feature collection body; a missing `features` array is empty
pub fn parse_features(body: &str) -> Result<Vec<Place>, PlacesError> {
    let collection: FeatureCollection =
        serde_json::from_str(body).map_err(|e| PlacesError::Decode(e.to_string()))?;
    Ok(collection
        .features
        .unwrap_or_default()
        .into_iter()
        .map(|f| f.properties)
        .collect())
}

/// One search, derived from the viewport and filters at fire time
#[derive(Debug, Clone, PartialEq)]
pub struct SearchIntent {
    pub center: LatLng,
    pub radius_m: f64,
    pub categories: Vec<String>,
}

impl SearchIntent {
    /// `None` when no category is enabled; nothing should be requested then
    pub fn from_viewport(viewport: &Viewport, filters: &SearchFilters) -> Option<Self> {
        let categories = filters.service_terms();
        if categories.is_empty() {
            return None;
        }
        Some(Self {
            center: viewport.center,
            radius_m: viewport.search_radius(),
            categories,
        })
    }
}

/// Client for the places-search HTTP API
#[derive(Debug, Clone)]
pub struct PlacesClient {
    client: Client,
    endpoint: String,
    api_key: String,
    limit: u32,
}

impl PlacesClient {
    pub fn new(endpoint: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            limit: crate::config::DEFAULT_RESULT_LIMIT,
        }
    }

    pub fn from_config(config: &ExplorerConfig) -> Result<Self, ConfigError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ConfigError::MissingApiKey("configuration".to_string()))?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
            limit: config.result_limit,
        })
    }

    pub fn query(&self, intent: &SearchIntent) -> Vec<(&'static str, String)> {
        let LatLng { lat, lon } = intent.center;
        vec![
            ("categories", intent.categories.join(",")),
            ("filter", format!("circle:{},{},{}", lon, lat, intent.radius_m)),
            ("bias", format!("proximity:{},{}", lon, lat)),
            ("limit", self.limit.to_string()),
            ("apiKey", self.api_key.clone()),
        ]
    }

    /// Run one search. Non-2xx statuses and undecodable bodies are errors.
    pub async fn search(&self, intent: &SearchIntent) -> Result<Vec<Place>, PlacesError> {
        tracing::debug!(
            "GET {} categories={} radius={:.0}m",
            self.endpoint,
            intent.categories.join(","),
            intent.radius_m
        );

        let response = self
            .client
            .get(&self.endpoint)
            .query(&self.query(intent))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlacesError::Status(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default().to_string(),
            ));
        }

        let body = response.text().await?;
        parse_features(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned HTTP response and hand back the request head
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
            String::from_utf8_lossy(&head).to_string()
        });
        (format!("http://{}/v2/places", addr), handle)
    }

    fn query_of(head: &str) -> HashMap<String, String> {
        let target = head.split_whitespace().nth(1).unwrap();
        let url = reqwest::Url::parse(&format!("http://localhost{}", target)).unwrap();
        url.query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn intent() -> SearchIntent {
        SearchIntent {
            center: LatLng::new(12.9716, 77.5946),
            radius_m: 1500.0,
            categories: vec!["catering.restaurant".into(), "tourism.attraction".into()],
        }
    }

    const CAFE_X: &str = r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"place_id":"p1","name":"Cafe X","categories":["catering.restaurant"],"lat":12.97,"lon":77.60,"datasource":{"sourcename":"openstreetmap"}}}]}"#;

    #[test]
    fn test_parse_features() {
        let places = parse_features(CAFE_X).unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].place_id, "p1");
        assert_eq!(places[0].name.as_deref(), Some("Cafe X"));
        assert_eq!(places[0].formatted, None);
        assert_eq!(places[0].position(), LatLng::new(12.97, 77.60));
    }

    #[test]
    fn test_parse_missing_features_is_empty() {
        assert!(parse_features("{}").unwrap().is_empty());
        assert!(parse_features(r#"{"features":null}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(parse_features("<html>"), Err(PlacesError::Decode(_))));
        // place without coordinates
        assert!(matches!(
            parse_features(r#"{"features":[{"properties":{"place_id":"x"}}]}"#),
            Err(PlacesError::Decode(_))
        ));
    }

    #[test]
    fn test_intent_from_viewport() {
        let viewport = Viewport::new(LatLng::new(12.9716, 77.5946), 13.0, 800.0, 600.0);
        let intent = SearchIntent::from_viewport(&viewport, &SearchFilters::default()).unwrap();
        assert_eq!(intent.center, viewport.center);
        assert_eq!(intent.radius_m, viewport.search_radius());
        assert_eq!(intent.categories.len(), 3);

        assert!(SearchIntent::from_viewport(&viewport, &SearchFilters::none()).is_none());
    }

    #[test]
    fn test_query_params() {
        let client = PlacesClient::new("http://localhost/v2/places", "secret");
        let query: HashMap<_, _> = client.query(&intent()).into_iter().collect();
        assert_eq!(query["categories"], "catering.restaurant,tourism.attraction");
        assert_eq!(query["filter"], "circle:77.5946,12.9716,1500");
        assert_eq!(query["bias"], "proximity:77.5946,12.9716");
        assert_eq!(query["limit"], "50");
        assert_eq!(query["apiKey"], "secret");
    }

    #[tokio::test]
    async fn test_search_success() {
        let (endpoint, server) = serve_once("200 OK", CAFE_X).await;
        let client = PlacesClient::new(&endpoint, "secret");

        let places = client.search(&intent()).await.unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name.as_deref(), Some("Cafe X"));

        let head = server.await.unwrap();
        assert!(head.starts_with("GET /v2/places?"));
        let query = query_of(&head);
        assert_eq!(query["categories"], "catering.restaurant,tourism.attraction");
        assert_eq!(query["filter"], "circle:77.5946,12.9716,1500");
        assert_eq!(query["limit"], "50");
    }

    #[tokio::test]
    async fn test_search_server_error() {
        let (endpoint, server) = serve_once("500 Internal Server Error", "{}").await;
        let client = PlacesClient::new(&endpoint, "secret");

        let err = client.search(&intent()).await.unwrap_err();
        assert_eq!(err, PlacesError::Status(500, "Internal Server Error".to_string()));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_search_bad_body() {
        let (endpoint, server) = serve_once("200 OK", "not json").await;
        let client = PlacesClient::new(&endpoint, "secret");

        let err = client.search(&intent()).await.unwrap_err();
        assert!(matches!(err, PlacesError::Decode(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_search_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = PlacesClient::new(&format!("http://{}/v2/places", addr), "secret");

        let err = client.search(&intent()).await.unwrap_err();
        assert!(matches!(err, PlacesError::Request(_)));
    }

    #[test]
    fn test_from_config_requires_key() {
        let err = PlacesClient::from_config(&ExplorerConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey(_)));

        let config = ExplorerConfig::default()
            .with_api_key("k")
            .with_request_timeout(5);
        let client = PlacesClient::from_config(&config).unwrap();
        assert_eq!(client.limit, 50);
    }
}
