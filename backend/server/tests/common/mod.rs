#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use feeds::{CatalogRecord, FetchError, SatelliteSource, TrackRecord};
use server::{
    config::Config,
    state::State,
    store::{CacheStore, MemoryStore},
};

/// What the next fetch returns.
#[derive(Clone)]
pub enum Reply<T> {
    Data(T),
    RateLimited,
    Status(u16),
    Malformed,
}

impl<T: Clone> Reply<T> {
    fn produce(&self) -> Result<T, FetchError> {
        match self {
            Reply::Data(data) => Ok(data.clone()),
            Reply::RateLimited => Err(FetchError::RateLimited { status: 403 }),
            Reply::Status(status) => Err(FetchError::Status { status: *status }),
            Reply::Malformed => Err(FetchError::Malformed("expected a JSON array".to_string())),
        }
    }
}

pub struct ScriptedSource {
    catalog: Mutex<Reply<Vec<CatalogRecord>>>,
    tracks: Mutex<Reply<Vec<TrackRecord>>>,
    catalog_calls: AtomicUsize,
    tracks_calls: AtomicUsize,
    last_instant: Mutex<Option<DateTime<Utc>>>,
}

impl ScriptedSource {
    pub fn new(catalog: Vec<CatalogRecord>, tracks: Vec<TrackRecord>) -> Self {
        Self {
            catalog: Mutex::new(Reply::Data(catalog)),
            tracks: Mutex::new(Reply::Data(tracks)),
            catalog_calls: AtomicUsize::new(0),
            tracks_calls: AtomicUsize::new(0),
            last_instant: Mutex::new(None),
        }
    }

    pub fn set_catalog(&self, reply: Reply<Vec<CatalogRecord>>) {
        *self.catalog.lock().unwrap() = reply;
    }

    pub fn set_tracks(&self, reply: Reply<Vec<TrackRecord>>) {
        *self.tracks.lock().unwrap() = reply;
    }

    pub fn catalog_calls(&self) -> usize {
        self.catalog_calls.load(Ordering::SeqCst)
    }

    pub fn tracks_calls(&self) -> usize {
        self.tracks_calls.load(Ordering::SeqCst)
    }

    pub fn last_instant(&self) -> Option<DateTime<Utc>> {
        *self.last_instant.lock().unwrap()
    }
}

#[async_trait]
impl SatelliteSource for ScriptedSource {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogRecord>, FetchError> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        self.catalog.lock().unwrap().produce()
    }

    async fn fetch_tracks(&self, at: DateTime<Utc>) -> Result<Vec<TrackRecord>, FetchError> {
        self.tracks_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_instant.lock().unwrap() = Some(at);
        self.tracks.lock().unwrap().produce()
    }
}

pub fn track(id: u32, name: &str) -> TrackRecord {
    TrackRecord {
        name: name.to_string(),
        catalog_number: id,
        cospar_id: "2020-001A".to_string(),
        tle1: format!("1 {id:05}U"),
        tle2: format!("2 {id:05}"),
        latitude: 12.5,
        longitude: -45.25,
        altitude: 540.0,
    }
}

pub fn catalog_row(id: u32, owner: &str, object_type: &str) -> CatalogRecord {
    CatalogRecord {
        owner: Some(owner.to_string()),
        object_type: Some(object_type.to_string()),
        ..CatalogRecord::new(id)
    }
}

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "CACHE_BACKEND" => Some("memory".to_string()),
        _ => None,
    })
    .unwrap()
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub source: Arc<ScriptedSource>,
    pub state: Arc<State>,
}

pub fn harness(catalog: Vec<CatalogRecord>, tracks: Vec<TrackRecord>) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let source = Arc::new(ScriptedSource::new(catalog, tracks));
    let state = State::with_parts(
        test_config(),
        store.clone() as Arc<dyn CacheStore>,
        source.clone() as Arc<dyn SatelliteSource>,
    );

    Harness {
        store,
        source,
        state,
    }
}
