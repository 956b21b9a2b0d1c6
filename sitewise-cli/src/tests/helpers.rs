//! Test helpers for writing datasets and requests into temporary workspaces.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// Centre of the fixture town.
pub(super) const CENTRE: (f64, f64) = (-6.732, 108.552);

/// A small town: schools, an office and a bank within 500 m of the centre,
/// a cafe about 330 m south, and a lone restaurant far to the north.
const TOWN_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "id": 1, "geometry": {"type": "Point", "coordinates": [108.552, -6.731]}, "properties": {"amenity": "school"}},
    {"type": "Feature", "id": 2, "geometry": {"type": "Point", "coordinates": [108.553, -6.732]}, "properties": {"amenity": "office"}},
    {"type": "Feature", "id": 3, "geometry": {"type": "Point", "coordinates": [108.5515, -6.7325]}, "properties": {"amenity": "bank"}},
    {"type": "Feature", "id": 4, "geometry": {"type": "Point", "coordinates": [108.552, -6.735]}, "properties": {"amenity": "cafe"}},
    {"type": "Feature", "id": 5, "geometry": {"type": "Point", "coordinates": [108.552, -6.632]}, "properties": {"amenity": "restaurant"}},
    {"type": "Feature", "id": 6, "geometry": {"type": "LineString", "coordinates": [[108.55, -6.73], [108.56, -6.74]]}, "properties": {"highway": "residential"}}
  ]
}"#;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write fixture file");
}

/// Temporary directory holding a dataset and a request path.
pub(super) struct Workspace {
    _tmp: TempDir,
    pub(super) root: Utf8PathBuf,
    pub(super) dataset: Utf8PathBuf,
    pub(super) request_path: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        let dataset = root.join("town.geojson");
        let request_path = root.join("request.json");
        Self {
            _tmp: tmp,
            root,
            dataset,
            request_path,
        }
    }

    pub(super) fn with_town(self) -> Self {
        self.write_town();
        self
    }

    pub(super) fn write_town(&self) {
        write_utf8(&self.dataset, TOWN_GEOJSON.as_bytes());
    }

    pub(super) fn write_request(&self, json: &str) {
        write_utf8(&self.request_path, json.as_bytes());
    }
}
