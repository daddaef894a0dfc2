//! # Two-line element sets
//!
//! The tracks feed is plain text, three lines per object:
//!
//! ```text
//! ISS (ZARYA)
//! 1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
//! 2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
//! ```
//!
//! Groups are read positionally. A group with any blank or missing line is
//! skipped, as is any group whose elements fail to parse or propagate.
//!
//! Positions are propagated with SGP4 at one instant per refresh cycle and
//! converted from TEME to WGS-84 geodetic coordinates.
use std::f64::consts::PI;

use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::TrackRecord;

const WGS84_A: f64 = 6378.137;
const WGS84_F: f64 = 1.0 / 298.257_223_563;
const J2000_JD: f64 = 2_451_545.0;
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

#[derive(Error, Debug)]
pub enum TleError {
    #[error("Invalid element set: {0}")]
    Elements(String),

    #[error("Propagation failed: {0}")]
    Propagation(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triplet<'a> {
    pub name: &'a str,
    pub line1: &'a str,
    pub line2: &'a str,
}

pub fn triplets(text: &str) -> Vec<Triplet<'_>> {
    let lines: Vec<&str> = text.lines().collect();

    lines
        .chunks(3)
        .filter_map(|chunk| match chunk {
            [name, line1, line2]
                if !name.trim().is_empty()
                    && !line1.trim().is_empty()
                    && !line2.trim().is_empty() =>
            {
                Some(Triplet {
                    name: clean_name(name),
                    line1: line1.trim(),
                    line2: line2.trim(),
                })
            }
            _ => None,
        })
        .collect()
}

fn clean_name(line: &str) -> &str {
    let line = line.trim();
    line.strip_prefix("0 ").unwrap_or(line).trim()
}

/// Parses every group in `text` and positions it at `at`.
pub fn parse_tracks(text: &str, at: DateTime<Utc>) -> Vec<TrackRecord> {
    let groups = triplets(text);
    let total = groups.len();

    let tracks: Vec<TrackRecord> = groups
        .into_iter()
        .filter_map(|triplet| match track_at(&triplet, at) {
            Ok(track) => Some(track),
            Err(e) => {
                debug!("Skipping {}: {e}", triplet.name);
                None
            }
        })
        .collect();

    if tracks.len() < total {
        warn!("Skipped {} of {total} element sets", total - tracks.len());
    }

    tracks
}

pub fn track_at(triplet: &Triplet<'_>, at: DateTime<Utc>) -> Result<TrackRecord, TleError> {
    let elements = Elements::from_tle(
        Some(triplet.name.to_string()),
        triplet.line1.as_bytes(),
        triplet.line2.as_bytes(),
    )
    .map_err(|e| TleError::Elements(e.to_string()))?;

    let catalog_number = u32::try_from(elements.norad_id)
        .map_err(|_| TleError::Elements(format!("catalog number {} out of range", elements.norad_id)))?;

    let constants =
        Constants::from_elements(&elements).map_err(|e| TleError::Elements(e.to_string()))?;

    let minutes = elements
        .datetime_to_minutes_since_epoch(&at.naive_utc())
        .map_err(|e| TleError::Propagation(e.to_string()))?;

    let prediction = constants
        .propagate(minutes)
        .map_err(|e| TleError::Propagation(e.to_string()))?;

    let (latitude, longitude, altitude) = teme_to_geodetic(prediction.position, sidereal_time(at));

    Ok(TrackRecord {
        name: triplet.name.to_string(),
        catalog_number,
        cospar_id: cospar_id(triplet.line1),
        tle1: triplet.line1.to_string(),
        tle2: triplet.line2.to_string(),
        latitude,
        longitude,
        altitude,
    })
}

/// Renders the international designator from line 1 as `YYYY-NNNP`.
pub fn cospar_id(line1: &str) -> String {
    let designator = line1.get(9..17).unwrap_or_default().trim();

    let (Some(year), Some(launch)) = (designator.get(..2), designator.get(2..5)) else {
        return designator.to_string();
    };
    let piece = designator.get(5..).unwrap_or_default();

    match year.parse::<u32>() {
        Ok(yy) if yy >= 57 => format!("19{year}-{launch}{piece}"),
        Ok(_) => format!("20{year}-{launch}{piece}"),
        Err(_) => designator.to_string(),
    }
}

fn sidereal_time(at: DateTime<Utc>) -> f64 {
    let julian_date = at.timestamp_millis() as f64 / 86_400_000.0 + UNIX_EPOCH_JD;

    sgp4::iau_epoch_to_sidereal_time((julian_date - J2000_JD) / 365.25)
}

/// Returns degrees latitude, degrees longitude in `[-180, 180]` and km altitude.
fn teme_to_geodetic(position: [f64; 3], sidereal: f64) -> (f64, f64, f64) {
    let [x, y, z] = position;
    let e2 = WGS84_F * (2.0 - WGS84_F);

    let mut longitude = y.atan2(x) - sidereal;
    longitude = (longitude + PI).rem_euclid(2.0 * PI) - PI;

    let r = x.hypot(y);
    let mut latitude = z.atan2(r);
    let mut c = 1.0;

    for _ in 0..20 {
        c = 1.0 / (1.0 - e2 * latitude.sin().powi(2)).sqrt();
        latitude = (z + WGS84_A * c * e2 * latitude.sin()).atan2(r);
    }

    let altitude = r / latitude.cos() - WGS84_A * c;

    (latitude.to_degrees(), longitude.to_degrees(), altitude)
}
