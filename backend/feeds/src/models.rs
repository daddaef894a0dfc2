use serde::{Deserialize, Serialize};

pub const UNKNOWN: &str = "Unknown";

/// One SATCAT row as published by the catalog feed.
///
/// Field names follow the upstream JSON so the same struct is used for the
/// remote payload and the cached copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct CatalogRecord {
    pub norad_cat_id: u32,
    #[serde(default)]
    pub object_name: Option<String>,
    #[serde(default)]
    pub object_id: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub object_type: Option<String>,
    #[serde(default)]
    pub ops_status_code: Option<String>,
    #[serde(default)]
    pub launch_date: Option<String>,
    #[serde(default)]
    pub launch_site: Option<String>,
    #[serde(default)]
    pub decay_date: Option<String>,
    #[serde(default)]
    pub orbit_type: Option<String>,
    #[serde(default)]
    pub period: Option<f64>,
    #[serde(default)]
    pub inclination: Option<f64>,
    #[serde(default)]
    pub apogee: Option<f64>,
    #[serde(default)]
    pub perigee: Option<f64>,
}

impl CatalogRecord {
    pub fn new(norad_cat_id: u32) -> Self {
        Self {
            norad_cat_id,
            object_name: None,
            object_id: None,
            owner: None,
            object_type: None,
            ops_status_code: None,
            launch_date: None,
            launch_site: None,
            decay_date: None,
            orbit_type: None,
            period: None,
            inclination: None,
            apogee: None,
            perigee: None,
        }
    }
}

/// Position of one object derived from its element set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRecord {
    pub name: String,
    pub catalog_number: u32,
    pub cospar_id: String,
    pub tle1: String,
    pub tle2: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

/// A track joined with its catalog entry.
///
/// Every enrichable field is always present: strings default to
/// [`UNKNOWN`] and numerics to `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedRecord {
    #[serde(flatten)]
    pub track: TrackRecord,
    pub owner: String,
    pub owner_name: String,
    pub object_type: String,
    pub ops_status: String,
    pub launch_date: String,
    pub launch_site: String,
    pub decay_date: String,
    pub orbit_type: String,
    pub period: Option<f64>,
    pub inclination: Option<f64>,
    pub apogee: Option<f64>,
    pub perigee: Option<f64>,
    pub flag_path: String,
}

/// Number of merged records per owner code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCount {
    pub code: String,
    pub name: String,
    pub count: usize,
}
