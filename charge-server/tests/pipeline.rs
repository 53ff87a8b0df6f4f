//! End-to-end pipeline tests over the bundled mock data.

use std::path::PathBuf;

use charge_server::domain::{Coordinate, SpeedTier, StationId, Status};
use charge_server::ocm::{
    CacheConfig, CachedStationSource, FetchError, FetchRequest, MockStationSource,
};
use charge_server::pipeline::{
    FilterCriteria, FinderError, ResultView, SortOrder, StationFinder, cities,
};

fn mock_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/mock_stations")
}

fn finder() -> StationFinder<MockStationSource> {
    StationFinder::new(MockStationSource::new(mock_dir()).unwrap())
}

fn bengaluru() -> Coordinate {
    Coordinate::new(12.97, 77.60).unwrap()
}

async fn query(criteria: FilterCriteria) -> ResultView {
    finder()
        .query(&FetchRequest::new("in"), bengaluru(), &criteria, SortOrder::Upstream)
        .await
        .unwrap()
}

#[tokio::test]
async fn loads_and_normalizes_bundled_data() {
    let stations = finder().load(&FetchRequest::new("IN")).await.unwrap();

    // The record without a latitude is dropped.
    let ids: Vec<&str> = stations.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["190001", "190002", "190003", "190005"]);

    let mg_road = &stations[0];
    assert_eq!(mg_road.city, "Bengaluru");
    assert_eq!(mg_road.address, "MG Road, Near Trinity Circle, 560001");
    assert_eq!(mg_road.speed_tier, SpeedTier::Fast);
    assert_eq!(mg_road.status, Status::Operational);
    assert_eq!(mg_road.price_per_kwh, Some(18.0));
    assert_eq!(mg_road.rating, Some(4.5));
    assert!(!mg_road.estimates.price && !mg_road.estimates.rating);

    assert_eq!(stations[1].status, Status::Offline);
    assert_eq!(stations[1].speed_tier, SpeedTier::Slow);
    assert!(stations[1].estimates.price && stations[1].estimates.rating);

    assert_eq!(stations[2].speed_tier, SpeedTier::UltraFast);
    assert_eq!(stations[2].status, Status::Operational);
    assert_eq!(stations[2].price_per_kwh, Some(0.0));

    assert_eq!(stations[3].speed_tier, SpeedTier::Fast);
    assert_eq!(stations[3].status, Status::Unknown);
}

#[tokio::test]
async fn nearest_to_bengaluru_reference() {
    let view = query(FilterCriteria::any()).await;

    assert_eq!(view.nearest.id, StationId::new("190001"));
    assert!((0.9..=1.2).contains(&view.nearest.distance_km));
    assert!(view.nearest_included);
    assert_eq!(view.len(), 4);
}

#[tokio::test]
async fn city_filter_excludes_nearest() {
    let view = query(FilterCriteria::any().with_city("DELHI")).await;

    let ids: Vec<&str> = view.entries.iter().map(|e| e.station.id.as_str()).collect();
    assert_eq!(ids, vec!["190002", "190003"]);
    assert_eq!(view.nearest.id, StationId::new("190001"));
    assert!(!view.nearest_included);
    assert!(view.entries.iter().all(|e| !e.is_nearest));
}

#[tokio::test]
async fn tier_filter() {
    let view = query(FilterCriteria::any().with_speed_tiers([SpeedTier::Fast])).await;

    let ids: Vec<&str> = view.entries.iter().map(|e| e.station.id.as_str()).collect();
    assert_eq!(ids, vec!["190001", "190005"]);
}

#[tokio::test]
async fn rating_filter_can_empty_the_result() {
    let view = query(FilterCriteria::any().with_min_rating(5.1)).await;

    assert!(view.is_empty());
    assert_eq!(view.nearest.id, StationId::new("190001"));
}

#[tokio::test]
async fn distance_ranking() {
    let view = finder()
        .query(
            &FetchRequest::new("IN"),
            bengaluru(),
            &FilterCriteria::any(),
            SortOrder::Distance,
        )
        .await
        .unwrap();

    let ids: Vec<&str> = view.entries.iter().map(|e| e.station.id.as_str()).collect();
    assert_eq!(ids[0], "190001");
    assert_eq!(ids[1], "190005");
    let distances: Vec<f64> = view.entries.iter().filter_map(|e| e.distance_km).collect();
    assert_eq!(distances.len(), 4);
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn enrichment_is_stable_across_loads() {
    let finder = finder();
    let first = finder.load(&FetchRequest::new("IN")).await.unwrap();
    let second = finder.load(&FetchRequest::new("IN")).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn city_list() {
    let stations = finder().load(&FetchRequest::new("IN")).await.unwrap();
    assert_eq!(cities(&stations), vec!["Bengaluru", "Delhi", "Mumbai"]);
}

#[tokio::test]
async fn unknown_region_is_a_fetch_error() {
    let err = finder()
        .query(
            &FetchRequest::new("GB"),
            bengaluru(),
            &FilterCriteria::any(),
            SortOrder::Upstream,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, FinderError::Fetch(FetchError::Upstream { status: 404, .. })));
}

#[tokio::test]
async fn malformed_records_do_not_fail_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("IN.json"),
        r#"[
            {"ID": 1, "AddressInfo": {"Town": "Delhi", "Latitude": 28.61, "Longitude": 77.21}},
            {"ID": 2, "AddressInfo": {"Town": "Delhi", "Longitude": 77.21}},
            {"ID": 3, "AddressInfo": {"Town": "Delhi", "Latitude": 95.0, "Longitude": 77.21}},
            {"ID": 4, "AddressInfo": "not an object"},
            "not a station",
            {"AddressInfo": {"Latitude": 28.0, "Longitude": 77.0}}
        ]"#,
    )
    .unwrap();

    let finder = StationFinder::new(MockStationSource::new(dir.path()).unwrap());
    let stations = finder.load(&FetchRequest::new("IN")).await.unwrap();

    assert_eq!(stations.len(), 1);
    assert_eq!(stations[0].id, StationId::new("1"));
    assert_eq!(stations[0].name, "Unnamed station");
}

#[tokio::test]
async fn empty_region_file_is_empty_set() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("IN.json"), "[]").unwrap();

    let finder = StationFinder::new(MockStationSource::new(dir.path()).unwrap());
    let err = finder
        .query(
            &FetchRequest::new("IN"),
            bengaluru(),
            &FilterCriteria::any(),
            SortOrder::Upstream,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, FinderError::EmptySet(_)));
}

#[tokio::test]
async fn cached_source_serves_repeat_queries() {
    let source = CachedStationSource::new(
        MockStationSource::new(mock_dir()).unwrap(),
        &CacheConfig::default(),
    );
    let finder = StationFinder::new(source);
    let request = FetchRequest::new("IN");

    let all = finder
        .query(&request, bengaluru(), &FilterCriteria::any(), SortOrder::Upstream)
        .await
        .unwrap();
    let delhi = finder
        .query(
            &request,
            bengaluru(),
            &FilterCriteria::any().with_city("Delhi"),
            SortOrder::Upstream,
        )
        .await
        .unwrap();

    assert_eq!(all.len(), 4);
    assert_eq!(delhi.len(), 2);

    let first = finder.source().fetch_shared(&request).await.unwrap();
    let second = finder.source().fetch_shared(&request).await.unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
}
