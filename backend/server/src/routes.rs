use std::sync::Arc;

use axum::{
    Json,
    extract::{self, Path, Query},
    response::IntoResponse,
};
use feeds::{CountryCount, MergedRecord, country_counts, enrich, index_catalog, top_owners};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    state::{RefreshReport, RegionName, State},
};

#[derive(Deserialize, Default)]
pub struct SatelliteQuery {
    pub country: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SatellitesResponse {
    pub satellites: Vec<MergedRecord>,
    pub top_owners: Vec<(String, usize)>,
}

/// Merged tracks plus the top owners over the whole catalog.
///
/// Degraded regions come back as empty collections, never as an error.
pub async fn satellites_handler(
    extract::State(state): extract::State<Arc<State>>,
    Query(query): Query<SatelliteQuery>,
) -> impl IntoResponse {
    let (satellites, top_owners) = merged(&state).await;

    let satellites = match query.country.as_deref().map(str::trim) {
        Some(country) if !country.is_empty() => satellites
            .into_iter()
            .filter(|record| record.owner.eq_ignore_ascii_case(country))
            .collect(),
        _ => satellites,
    };

    Json(SatellitesResponse {
        satellites,
        top_owners,
    })
}

pub async fn countries_handler(
    extract::State(state): extract::State<Arc<State>>,
) -> Json<Vec<CountryCount>> {
    let (satellites, _) = merged(&state).await;

    Json(country_counts(&satellites))
}

pub async fn refresh_handler(
    extract::State(state): extract::State<Arc<State>>,
    Path(region): Path<String>,
) -> Result<Json<RefreshReport>, AppError> {
    let region: RegionName = region.parse()?;

    Ok(Json(state.refresh(region).await?))
}

pub async fn refresh_catalog_handler(
    extract::State(state): extract::State<Arc<State>>,
) -> Result<Json<RefreshReport>, AppError> {
    Ok(Json(state.refresh(RegionName::Catalog).await?))
}

async fn merged(state: &State) -> (Vec<MergedRecord>, Vec<(String, usize)>) {
    let (tracks, catalog) = tokio::join!(state.tracks(), state.catalog());

    let catalog = catalog.into_value();
    let top_owners = top_owners(&catalog);
    let satellites = enrich(&tracks.into_value(), &index_catalog(catalog));

    (satellites, top_owners)
}
