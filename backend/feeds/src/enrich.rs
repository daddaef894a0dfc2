use std::collections::HashMap;

use indexmap::IndexMap;

use crate::{
    models::{CatalogRecord, CountryCount, MergedRecord, TrackRecord, UNKNOWN},
    tables::{
        LAUNCH_SITES, OBJECT_TYPES, OPS_STATUSES, ORBIT_TYPES, OWNER_COUNTRY_CODES, OWNERS,
        resolve, resolve_opt,
    },
};

pub const TOP_OWNERS_LIMIT: usize = 10;

pub type Catalog = HashMap<u32, CatalogRecord>;

pub fn index_catalog(records: Vec<CatalogRecord>) -> Catalog {
    records
        .into_iter()
        .map(|record| (record.norad_cat_id, record))
        .collect()
}

/// Joins each track with its catalog entry, preserving track order.
pub fn enrich(tracks: &[TrackRecord], catalog: &Catalog) -> Vec<MergedRecord> {
    tracks
        .iter()
        .map(|track| merge(track, catalog.get(&track.catalog_number)))
        .collect()
}

fn merge(track: &TrackRecord, entry: Option<&CatalogRecord>) -> MergedRecord {
    let owner = entry
        .and_then(|e| e.owner.as_deref())
        .map(str::trim)
        .filter(|code| !code.is_empty());

    let text = |field: Option<&String>| -> String {
        field
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN)
            .to_string()
    };

    MergedRecord {
        track: track.clone(),
        owner: owner.unwrap_or(UNKNOWN).to_string(),
        owner_name: resolve_opt(owner, &OWNERS).to_string(),
        object_type: resolve_opt(entry.and_then(|e| e.object_type.as_deref()), &OBJECT_TYPES)
            .to_string(),
        ops_status: resolve_opt(
            entry.and_then(|e| e.ops_status_code.as_deref()),
            &OPS_STATUSES,
        )
        .to_string(),
        launch_date: text(entry.and_then(|e| e.launch_date.as_ref())),
        launch_site: resolve_opt(entry.and_then(|e| e.launch_site.as_deref()), &LAUNCH_SITES)
            .to_string(),
        decay_date: text(entry.and_then(|e| e.decay_date.as_ref())),
        orbit_type: resolve_opt(entry.and_then(|e| e.orbit_type.as_deref()), &ORBIT_TYPES)
            .to_string(),
        period: entry.and_then(|e| e.period),
        inclination: entry.and_then(|e| e.inclination),
        apogee: entry.and_then(|e| e.apogee),
        perigee: entry.and_then(|e| e.perigee),
        flag_path: flag_path(owner),
    }
}

pub fn flag_path(owner: Option<&str>) -> String {
    let country = owner
        .and_then(|code| OWNER_COUNTRY_CODES.get(code).copied())
        .unwrap_or("unk");

    format!("/flags/{country}.png")
}

/// Ten most common owners, by resolved name.
///
/// Ties keep the order in which each owner was first seen.
pub fn top_owners(records: &[CatalogRecord]) -> Vec<(String, usize)> {
    let mut counts: IndexMap<&'static str, usize> = IndexMap::new();

    for record in records {
        let owner = resolve_opt(record.owner.as_deref(), &OWNERS);
        *counts.entry(owner).or_insert(0) += 1;
    }

    let mut sorted: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(owner, count)| (owner.to_string(), count))
        .collect();

    // stable
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted.truncate(TOP_OWNERS_LIMIT);

    sorted
}

/// Per owner code counts over merged records, sorted by code.
pub fn country_counts(records: &[MergedRecord]) -> Vec<CountryCount> {
    let mut counts: HashMap<&str, (&str, usize)> = HashMap::new();

    for record in records {
        counts
            .entry(record.owner.as_str())
            .or_insert((record.owner_name.as_str(), 0))
            .1 += 1;
    }

    let mut sorted: Vec<CountryCount> = counts
        .into_iter()
        .map(|(code, (name, count))| CountryCount {
            code: code.to_string(),
            name: name.to_string(),
            count,
        })
        .collect();

    sorted.sort_by(|a, b| a.code.cmp(&b.code));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: u32, name: &str) -> TrackRecord {
        TrackRecord {
            name: name.to_string(),
            catalog_number: id,
            cospar_id: "2020-001A".to_string(),
            tle1: "1".to_string(),
            tle2: "2".to_string(),
            latitude: 10.5,
            longitude: -20.25,
            altitude: 550.0,
        }
    }

    fn owned(id: u32, owner: &str) -> CatalogRecord {
        CatalogRecord {
            owner: Some(owner.to_string()),
            ..CatalogRecord::new(id)
        }
    }

    #[test]
    fn test_enrich_empty_tracks() {
        let catalog = index_catalog(vec![owned(1, "US")]);
        assert!(enrich(&[], &catalog).is_empty());
    }

    #[test]
    fn test_enrich_payload() {
        let catalog = index_catalog(vec![CatalogRecord {
            object_type: Some("PAY".to_string()),
            ..owned(100, "US")
        }]);

        let merged = enrich(&[track(100, "SAT-A")], &catalog);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].track.name, "SAT-A");
        assert_eq!(merged[0].owner, "US");
        assert_eq!(merged[0].owner_name, "United States");
        assert_eq!(merged[0].object_type, "Payload");
        assert_eq!(merged[0].flag_path, "/flags/us.png");
    }

    #[test]
    fn test_enrich_without_catalog() {
        let tracks = vec![track(3, "C"), track(1, "A"), track(2, "B")];
        let merged = enrich(&tracks, &Catalog::new());

        let names: Vec<&str> = merged.iter().map(|m| m.track.name.as_str()).collect();
        assert_eq!(names, ["C", "A", "B"]);

        for record in &merged {
            assert_eq!(record.owner, UNKNOWN);
            assert_eq!(record.owner_name, UNKNOWN);
            assert_eq!(record.object_type, UNKNOWN);
            assert_eq!(record.ops_status, UNKNOWN);
            assert_eq!(record.launch_date, UNKNOWN);
            assert_eq!(record.launch_site, UNKNOWN);
            assert_eq!(record.decay_date, UNKNOWN);
            assert_eq!(record.orbit_type, UNKNOWN);
            assert_eq!(record.period, None);
            assert_eq!(record.inclination, None);
            assert_eq!(record.apogee, None);
            assert_eq!(record.perigee, None);
            assert_eq!(record.flag_path, "/flags/unk.png");
        }
    }

    #[test]
    fn test_enrich_partial_catalog() {
        let catalog = index_catalog(vec![CatalogRecord {
            launch_date: Some("1998-11-20".to_string()),
            launch_site: Some("TTMTR".to_string()),
            period: Some(92.9),
            ..owned(25544, "ISS")
        }]);

        let merged = enrich(&[track(25544, "ISS"), track(7, "X")], &catalog);

        assert_eq!(merged[0].launch_date, "1998-11-20");
        assert_eq!(merged[0].launch_site, UNKNOWN);
        assert_eq!(merged[0].period, Some(92.9));
        assert_eq!(merged[0].decay_date, UNKNOWN);
        assert_eq!(merged[1].owner, UNKNOWN);
    }

    #[test]
    fn test_top_owners_order() {
        let records = vec![
            owned(1, "PRC"),
            owned(2, "US"),
            owned(3, "US"),
            owned(4, "UK"),
            owned(5, "PRC"),
            owned(6, "FR"),
        ];

        assert_eq!(
            top_owners(&records),
            vec![
                ("People's Republic of China".to_string(), 2),
                ("United States".to_string(), 2),
                ("United Kingdom".to_string(), 1),
                ("France".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_top_owners_limit() {
        let codes = ["US", "UK", "FR", "GER", "IT", "JPN", "IND", "PRC", "CIS", "ESA", "CA", "AUS"];
        let records: Vec<CatalogRecord> = codes
            .iter()
            .enumerate()
            .map(|(i, code)| owned(i as u32, code))
            .collect();

        assert_eq!(top_owners(&records).len(), TOP_OWNERS_LIMIT);
    }

    #[test]
    fn test_country_counts() {
        let catalog = index_catalog(vec![owned(1, "US"), owned(2, "US"), owned(3, "FR")]);
        let tracks = vec![track(1, "A"), track(2, "B"), track(3, "C"), track(4, "D")];

        let counts = country_counts(&enrich(&tracks, &catalog));
        let codes: Vec<(&str, usize)> = counts.iter().map(|c| (c.code.as_str(), c.count)).collect();

        assert_eq!(codes, [("FR", 1), ("US", 2), ("Unknown", 1)]);
        assert_eq!(counts[1].name, "United States");
    }
}
