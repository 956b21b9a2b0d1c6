//! GeoJSON point dataset loading.
//!
//! Streams a `FeatureCollection` one feature at a time, keeps every `Point`
//! feature whose position projects cleanly, and carries over its `amenity`
//! and `shop` properties. Only the converted points are retained, so peak
//! memory tracks the index rather than the document.

use std::fmt;
use std::io::{self, BufReader, Read};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use geojson::{Feature, Value, feature::Id};
use log::{info, warn};
use serde::de::{DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use thiserror::Error;

use crate::{Categories, GeoPoint, PointOfInterest};

const FEATURE_COLLECTION: &str = "FeatureCollection";

/// Errors raised while loading a POI dataset.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// The file could not be opened or read.
    #[error("failed to read POI dataset {path}: {source}")]
    Io {
        /// Dataset location.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The file is not valid GeoJSON.
    #[error("failed to parse GeoJSON in {path}: {source}")]
    Parse {
        /// Dataset location.
        path: Utf8PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
    /// The document is valid JSON but not a `FeatureCollection`.
    #[error("POI dataset {path} is not a GeoJSON FeatureCollection")]
    NotFeatureCollection {
        /// Dataset location.
        path: Utf8PathBuf,
    },
    /// No feature carried a usable point geometry.
    #[error("POI dataset {path} has no usable point features ({skipped} skipped)")]
    Empty {
        /// Dataset location.
        path: Utf8PathBuf,
        /// Number of features rejected.
        skipped: usize,
    },
}

/// Read and project every usable point feature in the GeoJSON file at
/// `path`.
///
/// Features without a `Point` geometry, or whose position lies outside the
/// Web Mercator domain, are skipped; the count is logged at `warn` level.
///
/// # Errors
/// Returns [`DataLoadError`] when the file is missing or unreadable, is not
/// a GeoJSON `FeatureCollection`, or contains no usable points.
pub fn read_points(path: &Utf8Path) -> Result<Vec<PointOfInterest>, DataLoadError> {
    let file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(|source| {
        DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let document = stream_collection(BufReader::new(file)).map_err(|source| {
        if source.is_io() {
            DataLoadError::Io {
                path: path.to_path_buf(),
                source: source.into(),
            }
        } else {
            DataLoadError::Parse {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    if document.kind.as_deref() != Some(FEATURE_COLLECTION) {
        return Err(DataLoadError::NotFeatureCollection {
            path: path.to_path_buf(),
        });
    }

    let batch = document.batch;
    if batch.skipped > 0 {
        warn!(
            "skipped {} features without a usable point geometry in {path}",
            batch.skipped
        );
    }
    if batch.points.is_empty() {
        return Err(DataLoadError::Empty {
            path: path.to_path_buf(),
            skipped: batch.skipped,
        });
    }
    info!("loaded {} points of interest from {path}", batch.points.len());
    Ok(batch.points)
}

/// Top-level members of a streamed GeoJSON document.
#[derive(Debug, Default)]
struct StreamedDocument {
    kind: Option<String>,
    batch: PointBatch,
}

#[derive(Debug, Default)]
struct PointBatch {
    points: Vec<PointOfInterest>,
    skipped: usize,
}

impl PointBatch {
    fn push(&mut self, feature: &Feature) {
        let position = self.points.len().saturating_add(self.skipped);
        match to_point(feature, position) {
            Some(poi) => self.points.push(poi),
            None => self.skipped = self.skipped.saturating_add(1),
        }
    }
}

fn stream_collection<R: Read>(reader: R) -> serde_json::Result<StreamedDocument> {
    let mut deserializer = serde_json::Deserializer::from_reader(reader);
    let document = (&mut deserializer).deserialize_map(DocumentVisitor)?;
    deserializer.end()?;
    Ok(document)
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = StreamedDocument;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a GeoJSON object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut document = StreamedDocument::default();
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "type" => document.kind = Some(map.next_value()?),
                "features" => map.next_value_seed(FeaturesSeed(&mut document.batch))?,
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(document)
    }
}

/// Converts each element of a `features` array as soon as it is parsed.
struct FeaturesSeed<'a>(&'a mut PointBatch);

impl<'de> DeserializeSeed<'de> for FeaturesSeed<'_> {
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for FeaturesSeed<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an array of GeoJSON features")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while let Some(feature) = seq.next_element::<Feature>()? {
            self.0.push(&feature);
        }
        Ok(())
    }
}

fn to_point(feature: &Feature, position: usize) -> Option<PointOfInterest> {
    let geometry = feature.geometry.as_ref()?;
    let Value::Point(coordinates) = &geometry.value else {
        return None;
    };
    let [lon, lat, ..] = coordinates.as_slice() else {
        return None;
    };
    let location = GeoPoint::new(*lat, *lon).ok()?.to_planar();
    let categories = Categories::new(
        string_property(feature, "amenity"),
        string_property(feature, "shop"),
    );
    Some(PointOfInterest::new(
        feature_id(feature, position),
        location,
        categories,
    ))
}

fn string_property<'a>(feature: &'a Feature, key: &str) -> Option<&'a str> {
    feature.property(key).and_then(|value| value.as_str())
}

/// Feature `id`, else a numeric `osm_id` property, else the load position.
fn feature_id(feature: &Feature, position: usize) -> u64 {
    let declared = match &feature.id {
        Some(Id::Number(number)) => number.as_u64(),
        Some(Id::String(text)) => text.parse().ok(),
        None => None,
    };
    declared
        .or_else(|| {
            feature.property("osm_id").and_then(|value| {
                value
                    .as_u64()
                    .or_else(|| value.as_str().and_then(|text| text.parse().ok()))
            })
        })
        .unwrap_or_else(|| u64::try_from(position).unwrap_or(u64::MAX))
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    reason = "assertions compare floating-point values"
)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_dataset(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write dataset");
        file
    }

    fn utf8_path(file: &NamedTempFile) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(file.path().to_path_buf()).expect("utf-8 temp path")
    }

    const MIXED: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "id": 42,
             "geometry": {"type": "Point", "coordinates": [108.55, -6.73]},
             "properties": {"amenity": "restaurant"}},
            {"type": "Feature",
             "geometry": {"type": "Point", "coordinates": [108.56, -6.74]},
             "properties": {"shop": "convenience", "osm_id": "9001"}},
            {"type": "Feature",
             "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]},
             "properties": {"amenity": "bank"}},
            {"type": "Feature",
             "geometry": {"type": "Point", "coordinates": [0.0, 89.0]},
             "properties": {"amenity": "bank"}},
            {"type": "Feature", "geometry": null, "properties": {}},
            {"type": "Feature",
             "geometry": {"type": "Point", "coordinates": [108.57, -6.75]},
             "properties": null}
        ]
    }"#;

    #[rstest]
    fn keeps_usable_points_and_counts_skips() {
        let document = stream_collection(MIXED.as_bytes()).expect("parse");
        assert_eq!(document.kind.as_deref(), Some(FEATURE_COLLECTION));
        let batch = document.batch;
        assert_eq!(batch.skipped, 3);
        let ids: Vec<u64> = batch.points.iter().map(|poi| poi.id).collect();
        assert_eq!(ids, vec![42, 9001, 5]);
        assert_eq!(
            batch.points[0].categories.amenity.as_deref(),
            Some("restaurant")
        );
        assert_eq!(batch.points[1].categories.shop.as_deref(), Some("convenience"));
        assert_eq!(batch.points[2].categories, Categories::default());
    }

    #[rstest]
    fn members_before_features_do_not_disturb_streaming() {
        let contents = r#"{
            "bbox": [108.0, -7.0, 109.0, -6.0],
            "name": "town",
            "features": [
                {"type": "Feature", "id": 7,
                 "geometry": {"type": "Point", "coordinates": [108.55, -6.73]},
                 "properties": {"amenity": "cafe"}}
            ],
            "type": "FeatureCollection"
        }"#;
        let file = write_dataset(contents);
        let points = read_points(&utf8_path(&file)).expect("load dataset");
        let ids: Vec<u64> = points.iter().map(|poi| poi.id).collect();
        assert_eq!(ids, vec![7]);
    }

    #[rstest]
    fn trailing_content_is_parse_error() {
        let file = write_dataset(r#"{"type": "FeatureCollection", "features": []} []"#);
        assert!(matches!(
            read_points(&utf8_path(&file)),
            Err(DataLoadError::Parse { .. })
        ));
    }

    #[rstest]
    fn projects_positions_into_meters() {
        let file = write_dataset(MIXED);
        let points = read_points(&utf8_path(&file)).expect("load dataset");
        let expected = GeoPoint::new(-6.73, 108.55).expect("valid").to_planar();
        assert!((points[0].location.x - expected.x).abs() < 1e-6);
        assert!((points[0].location.y - expected.y).abs() < 1e-6);
    }

    #[rstest]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.geojson"))
            .expect("utf-8 temp path");
        assert!(matches!(read_points(&path), Err(DataLoadError::Io { .. })));
    }

    #[rstest]
    #[case("not json at all")]
    #[case(r#"{"type": "FeatureCollection", "features": ["#)]
    fn malformed_document_is_parse_error(#[case] contents: &str) {
        let file = write_dataset(contents);
        assert!(matches!(
            read_points(&utf8_path(&file)),
            Err(DataLoadError::Parse { .. })
        ));
    }

    #[rstest]
    fn bare_geometry_is_rejected() {
        let file = write_dataset(r#"{"type": "Point", "coordinates": [0.0, 0.0]}"#);
        assert!(matches!(
            read_points(&utf8_path(&file)),
            Err(DataLoadError::NotFeatureCollection { .. })
        ));
    }

    #[rstest]
    #[case(r#"{"type": "FeatureCollection", "features": []}"#, 0)]
    #[case(
        r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": null, "properties": {}}]}"#,
        1
    )]
    fn collection_without_points_is_empty_error(#[case] contents: &str, #[case] skipped: usize) {
        let file = write_dataset(contents);
        match read_points(&utf8_path(&file)) {
            Err(DataLoadError::Empty { skipped: actual, .. }) => assert_eq!(actual, skipped),
            other => panic!("expected Empty, got {other:?}"),
        }
    }
}
