use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    error::FetchError,
    models::{CatalogRecord, TrackRecord},
    tle::parse_tracks,
};

pub const CATALOG_ENDPOINT: &str =
    "https://celestrak.org/satcat/records.php?GROUP=active&FORMAT=JSON";
pub const TRACKS_ENDPOINT: &str =
    "https://celestrak.org/NORAD/elements/gp.php?GROUP=active&FORMAT=tle";

/// The two upstream feeds.
#[async_trait]
pub trait SatelliteSource: Send + Sync {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogRecord>, FetchError>;

    /// Positions every element set at `at`.
    async fn fetch_tracks(&self, at: DateTime<Utc>) -> Result<Vec<TrackRecord>, FetchError>;
}

pub struct Celestrak {
    client: Client,
    catalog_url: String,
    tracks_url: String,
}

impl Celestrak {
    pub fn new(catalog_url: &str, tracks_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("satcache/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            catalog_url: catalog_url.to_string(),
            tracks_url: tracks_url.to_string(),
        })
    }

    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        check_status(response.status())?;

        Ok(response.text().await?)
    }
}

#[async_trait]
impl SatelliteSource for Celestrak {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogRecord>, FetchError> {
        let body = self.get_text(&self.catalog_url).await?;
        let records = parse_catalog(&body)?;

        info!("Fetched {} catalog records", records.len());
        Ok(records)
    }

    async fn fetch_tracks(&self, at: DateTime<Utc>) -> Result<Vec<TrackRecord>, FetchError> {
        let body = self.get_text(&self.tracks_url).await?;
        let tracks = parse_track_body(&body, at)?;

        info!("Parsed {} element sets", tracks.len());
        Ok(tracks)
    }
}

pub fn check_status(status: StatusCode) -> Result<(), FetchError> {
    match status {
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => Err(FetchError::RateLimited {
            status: status.as_u16(),
        }),
        status if !status.is_success() => Err(FetchError::Status {
            status: status.as_u16(),
        }),
        _ => Ok(()),
    }
}

pub fn parse_catalog(body: &str) -> Result<Vec<CatalogRecord>, FetchError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(FetchError::Malformed("expected a JSON array".to_string()));
    };

    let total = items.len();
    let records: Vec<CatalogRecord> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();

    if records.len() < total {
        warn!("Dropped {} malformed catalog rows", total - records.len());
    }

    Ok(records)
}

/// A body that yields no element sets is treated as malformed so an empty
/// set never replaces a cached one.
pub fn parse_track_body(body: &str, at: DateTime<Utc>) -> Result<Vec<TrackRecord>, FetchError> {
    let tracks = parse_tracks(body, at);

    if tracks.is_empty() && !body.trim().is_empty() {
        return Err(FetchError::Malformed(
            "no element sets in tracks payload".to_string(),
        ));
    }

    Ok(tracks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(check_status(StatusCode::OK).is_ok());
        assert!(check_status(StatusCode::FORBIDDEN).unwrap_err().is_rate_limited());
        assert!(check_status(StatusCode::TOO_MANY_REQUESTS).unwrap_err().is_rate_limited());
        assert!(matches!(
            check_status(StatusCode::BAD_GATEWAY),
            Err(FetchError::Status { status: 502 })
        ));
    }

    #[test]
    fn test_catalog_rows() {
        let body = r#"[
            {"OBJECT_NAME": "ISS (ZARYA)", "NORAD_CAT_ID": 25544, "OWNER": "ISS",
             "OBJECT_TYPE": "PAY", "OPS_STATUS_CODE": "+", "LAUNCH_DATE": "1998-11-20",
             "LAUNCH_SITE": "TTMTR", "DECAY_DATE": null, "PERIOD": 92.9,
             "INCLINATION": 51.64, "APOGEE": 422, "PERIGEE": 417},
            {"OBJECT_NAME": "NO ID"}
        ]"#;

        let records = parse_catalog(body).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].norad_cat_id, 25544);
        assert_eq!(records[0].owner.as_deref(), Some("ISS"));
        assert_eq!(records[0].decay_date, None);
        assert_eq!(records[0].apogee, Some(422.0));
    }

    #[test]
    fn test_catalog_not_an_array() {
        let err = parse_catalog(r#"{"error": "GROUP not found"}"#).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));

        let err = parse_catalog("<html>").unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn test_track_body_without_element_sets() {
        let err = parse_track_body("No GP data found\n", Utc::now()).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));

        assert!(parse_track_body("", Utc::now()).unwrap().is_empty());
    }
}
