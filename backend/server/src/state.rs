use std::{str::FromStr, sync::Arc};

use chrono::Utc;
use feeds::{CatalogRecord, Celestrak, SatelliteSource, TrackRecord};
use serde::Serialize;
use tracing::info;

use super::{
    config::{CacheBackend, Config},
    database::init_redis,
    error::AppError,
    refresh::{Degraded, RefreshPolicy, Refreshed, Region},
    store::{CacheStore, MemoryStore},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionName {
    Catalog,
    Tracks,
}

impl RegionName {
    pub const ALL: [RegionName; 2] = [RegionName::Catalog, RegionName::Tracks];

    pub fn as_str(&self) -> &'static str {
        match self {
            RegionName::Catalog => "catalog",
            RegionName::Tracks => "tracks",
        }
    }
}

impl FromStr for RegionName {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "catalog" => Ok(RegionName::Catalog),
            "tracks" => Ok(RegionName::Tracks),
            other => Err(AppError::UnknownRegion(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshReport {
    pub region: &'static str,
    pub key: &'static str,
    pub source: &'static str,
    pub degraded: Option<Degraded>,
    pub records: usize,
}

impl RefreshReport {
    fn new<T>(region: RegionName, key: &'static str, refreshed: &Refreshed<Vec<T>>) -> Self {
        Self {
            region: region.as_str(),
            key,
            source: refreshed.source(),
            degraded: refreshed.degraded(),
            records: refreshed.value().map_or(0, Vec::len),
        }
    }
}

pub struct State {
    pub config: Config,
    pub policy: RefreshPolicy,
    pub source: Arc<dyn SatelliteSource>,
}

impl State {
    pub async fn new() -> Result<Arc<Self>, AppError> {
        let config = Config::load()?;

        let store = open_store(&config).await?;
        let source = Arc::new(Celestrak::new(
            &config.catalog_url,
            &config.tracks_url,
            config.http_timeout,
        )?);

        Ok(Self::with_parts(config, store, source))
    }

    pub fn with_parts(
        config: Config,
        store: Arc<dyn CacheStore>,
        source: Arc<dyn SatelliteSource>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            policy: RefreshPolicy::new(store),
            source,
        })
    }

    pub fn region(&self, name: RegionName) -> Region {
        match name {
            RegionName::Catalog => self.config.catalog_region(),
            RegionName::Tracks => self.config.tracks_region(),
        }
    }

    pub async fn catalog(&self) -> Refreshed<Vec<CatalogRecord>> {
        let region = self.config.catalog_region();

        self.policy
            .get_or_refresh(&region, || self.source.fetch_catalog())
            .await
    }

    /// Every track in one refresh shares the same propagation instant.
    pub async fn tracks(&self) -> Refreshed<Vec<TrackRecord>> {
        let region = self.config.tracks_region();
        let at = Utc::now();

        self.policy
            .get_or_refresh(&region, || self.source.fetch_tracks(at))
            .await
    }

    /// Reads a region through the cache, fetching only on a miss.
    pub async fn warm(&self, name: RegionName) -> RefreshReport {
        let key = self.region(name).key;

        match name {
            RegionName::Catalog => RefreshReport::new(name, key, &self.catalog().await),
            RegionName::Tracks => RefreshReport::new(name, key, &self.tracks().await),
        }
    }

    pub async fn refresh(&self, name: RegionName) -> Result<RefreshReport, AppError> {
        let region = self.region(name);

        let report = match name {
            RegionName::Catalog => {
                let refreshed = self
                    .policy
                    .refresh(&region, || self.source.fetch_catalog())
                    .await?;
                RefreshReport::new(name, region.key, &refreshed)
            }
            RegionName::Tracks => {
                let at = Utc::now();
                let refreshed = self
                    .policy
                    .refresh(&region, || self.source.fetch_tracks(at))
                    .await?;
                RefreshReport::new(name, region.key, &refreshed)
            }
        };

        info!(
            region = report.region,
            source = report.source,
            records = report.records,
            "Cache region refreshed"
        );

        Ok(report)
    }
}

pub async fn open_store(config: &Config) -> Result<Arc<dyn CacheStore>, AppError> {
    let store: Arc<dyn CacheStore> = match config.cache_backend {
        CacheBackend::Redis => Arc::new(init_redis(&config.redis_url).await?),
        CacheBackend::Memory => {
            info!("Using in-process cache store");
            Arc::new(MemoryStore::new())
        }
    };

    Ok(store)
}
