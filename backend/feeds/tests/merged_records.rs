use feeds::{
    CatalogRecord, MergedRecord, TrackRecord, UNKNOWN, enrich, index_catalog, resolve,
    tables::OBJECT_TYPES,
};

fn track(id: u32, name: &str) -> TrackRecord {
    TrackRecord {
        name: name.to_string(),
        catalog_number: id,
        cospar_id: "1998-067A".to_string(),
        tle1: "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927".to_string(),
        tle2: "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537".to_string(),
        latitude: 51.25,
        longitude: -0.125,
        altitude: 412.5,
    }
}

fn catalog() -> Vec<CatalogRecord> {
    vec![CatalogRecord {
        owner: Some("US".to_string()),
        object_type: Some("PAY".to_string()),
        ops_status_code: Some("+".to_string()),
        launch_site: Some("AFETR".to_string()),
        period: Some(95.5),
        ..CatalogRecord::new(100)
    }]
}

#[test]
fn test_single_payload_scenario() {
    let merged = enrich(&[track(100, "SAT-A")], &index_catalog(catalog()));

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].track.name, "SAT-A");
    assert_eq!(merged[0].owner, "US");
    assert_eq!(merged[0].object_type, "Payload");
    assert_eq!(merged[0].ops_status, "Operational");
    assert_eq!(merged[0].launch_site, "Air Force Eastern Test Range");
}

#[test]
fn test_unknown_object_type() {
    assert_eq!(resolve("ZZZ", &OBJECT_TYPES), UNKNOWN);
}

#[test]
fn test_store_format_round_trip() {
    let tracks = vec![track(100, "SAT-A"), track(200, "SAT-B")];
    let merged = enrich(&tracks, &index_catalog(catalog()));

    let payload = serde_json::to_string(&merged).unwrap();
    let decoded: Vec<MergedRecord> = serde_json::from_str(&payload).unwrap();

    assert_eq!(decoded, merged);
}

#[test]
fn test_wire_field_names() {
    let merged = enrich(&[track(100, "SAT-A")], &index_catalog(catalog()));
    let value = serde_json::to_value(&merged[0]).unwrap();

    for field in [
        "name",
        "catalogNumber",
        "cosparId",
        "tle1",
        "tle2",
        "latitude",
        "longitude",
        "altitude",
        "owner",
        "ownerName",
        "objectType",
        "opsStatus",
        "launchDate",
        "launchSite",
        "decayDate",
        "orbitType",
        "period",
        "inclination",
        "apogee",
        "perigee",
        "flagPath",
    ] {
        assert!(value.get(field).is_some(), "missing {field}");
    }

    assert!(value["inclination"].is_null());
}

#[test]
fn test_catalog_cache_round_trip() {
    let records = catalog();

    let payload = serde_json::to_string(&records).unwrap();
    assert!(payload.contains("\"NORAD_CAT_ID\":100"));

    let decoded: Vec<CatalogRecord> = serde_json::from_str(&payload).unwrap();
    assert_eq!(decoded, records);
}
