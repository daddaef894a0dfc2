//! # Satellite Feeds
//!
//! Everything that touches the two upstream feeds without touching the cache.
//!
//! ## Sources
//! - Catalog (SATCAT): bulk JSON array, one row per object, changes rarely
//! - Tracks (GP elements): plain text triplets, volatile and rate limited
//!
//! Both are keyed by the NORAD catalog number.
//!
//! ## Join
//! Tracks drive the output. Each track picks up its catalog row if one
//! exists, coded fields go through the static tables in [`tables`], and
//! anything missing becomes `"Unknown"` or `null`. Output order is track
//! order.
//!
//! ## Notes
//! - Positions are computed once per tracks refresh, not per request
//! - Either dataset may be empty while the other is populated

pub mod enrich;
pub mod error;
pub mod models;
pub mod remote;
pub mod tables;
pub mod tle;

pub use enrich::{Catalog, country_counts, enrich, index_catalog, top_owners};
pub use error::FetchError;
pub use models::{CatalogRecord, CountryCount, MergedRecord, TrackRecord, UNKNOWN};
pub use remote::{Celestrak, SatelliteSource};
pub use tables::resolve;
