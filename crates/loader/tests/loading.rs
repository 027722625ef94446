use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use geofacet_loader::{
    load_catalog, load_features, load_map_catalog, load_province_counts, FileAdapter, LoadError,
    SourceAdapter,
};

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, body).unwrap();
}

fn sources(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Serves canned documents after per-location delays.
struct DelayedAdapter {
    docs: HashMap<String, (u64, String)>,
}

#[async_trait]
impl SourceAdapter for DelayedAdapter {
    async fn fetch_text(&self, location: &str) -> Result<String, LoadError> {
        let (delay, body) = self.docs.get(location).ok_or_else(|| LoadError::NotFound {
            location: location.to_string(),
        })?;
        tokio::time::sleep(Duration::from_millis(*delay)).await;
        Ok(body.clone())
    }

    fn adapter_id(&self) -> &str {
        "delayed"
    }
}

#[tokio::test]
async fn catalog_sources_concatenate_in_declared_order() {
    let mut docs = HashMap::new();
    docs.insert("slow.json".to_string(), (60, r#"[{"title": "a"}, {"title": "b"}]"#.to_string()));
    docs.insert("fast.json".to_string(), (0, r#"[{"title": "c"}]"#.to_string()));
    let adapter: Arc<dyn SourceAdapter> = Arc::new(DelayedAdapter { docs });

    let entries = load_catalog(adapter, &sources(&["slow.json", "fast.json"]))
        .await
        .unwrap();
    let titles: Vec<_> = entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn one_failed_source_fails_the_whole_catalog() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "data/a.json", r#"[{"type": "POI"}]"#);
    let adapter: Arc<dyn SourceAdapter> = Arc::new(FileAdapter::new(dir.path()));

    let err = load_catalog(adapter, &sources(&["data/a.json", "data/missing.json"]))
        .await
        .unwrap_err();
    assert_eq!(err.location(), Some("data/missing.json"));
}

#[tokio::test]
async fn malformed_catalog_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "bad.json", "{not json");
    write(dir.path(), "object.json", r#"{"type": "POI"}"#);
    let adapter: Arc<dyn SourceAdapter> = Arc::new(FileAdapter::new(dir.path()));

    let err = load_catalog(Arc::clone(&adapter), &sources(&["bad.json"]))
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }));

    let err = load_catalog(adapter, &sources(&["object.json"])).await.unwrap_err();
    assert!(matches!(err, LoadError::Parse { ref location, .. } if location == "object.json"));
}

#[tokio::test]
async fn empty_source_list_loads_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let adapter: Arc<dyn SourceAdapter> = Arc::new(FileAdapter::new(dir.path()));
    assert!(load_catalog(adapter, &[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn features_and_map_catalog_load_from_files() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "geodata/od/成都.geojson",
        r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": null, "properties": {"num": 4}}
        ]}"#,
    );
    write(
        dir.path(),
        "data/map_data.json",
        r#"[{"type": "OD流", "title": ["成都"], "description": "流量"}]"#,
    );
    let adapter = FileAdapter::new(dir.path());

    let features = load_features(&adapter, "geodata/od/成都.geojson").await.unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features.features[0].property_number("num"), Some(4.0));

    let groups = load_map_catalog(&adapter, "data/map_data.json").await.unwrap();
    assert_eq!(groups[0].data_type, "OD流");
    assert_eq!(groups[0].title, vec!["成都".to_string()]);
}

#[tokio::test]
async fn missing_province_counts_read_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "geodata/poi/全国(2020).json", r#"{"四川省": 12, "西藏自治区": "n/a"}"#);
    let adapter = FileAdapter::new(dir.path());

    let counts = load_province_counts(&adapter, "geodata/poi/全国(2020).json")
        .await
        .unwrap();
    assert_eq!(counts["四川省"], 12.0);
    assert_eq!(counts["西藏自治区"], 0.0);

    let none = load_province_counts(&adapter, "geodata/poi/全国(1999).json")
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn malformed_province_counts_still_fail() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "counts.json", "[1, 2]");
    let adapter = FileAdapter::new(dir.path());
    let err = load_province_counts(&adapter, "counts.json").await.unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }));
}
