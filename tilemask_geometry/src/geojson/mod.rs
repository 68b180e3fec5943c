//! GeoJSON input documents for the vector-source path.
//!
//! Parsing is strict about the document shell (it must be a
//! FeatureCollection) and lenient about individual features: a feature
//! whose geometry cannot be parsed is skipped with a warning, never
//! failing the document. Geometry types outside the surfacic set are kept
//! as [`Geometry::Unsupported`] so the indexer can report them per feature.

mod parse;

pub use parse::{parse_geometry, parse_geometry_str};

use crate::geo::Geometry;
use anyhow::{Context, Result, anyhow, ensure};
use serde_json::Value;
use std::{fs, path::Path};

/// The EPSG code GeoJSON documents default to.
const DEFAULT_SRID: u32 = 4326;

/// One feature of an input document, keeping its position in the document
/// for warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
	pub index: usize,
	pub geometry: Geometry,
}

/// A parsed FeatureCollection with its declared CRS resolved to an EPSG
/// code.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonDocument {
	pub srid: u32,
	pub features: Vec<GeoFeature>,
}

impl GeoJsonDocument {
	pub fn from_path(path: &Path) -> Result<GeoJsonDocument> {
		let text =
			fs::read_to_string(path).with_context(|| format!("Failed to read GeoJSON file {path:?}"))?;
		Self::from_string(&text).with_context(|| format!("Failed to parse GeoJSON file {path:?}"))
	}

	pub fn from_string(json: &str) -> Result<GeoJsonDocument> {
		let root: Value = serde_json::from_str(json)?;

		let object_type = root
			.get("type")
			.and_then(Value::as_str)
			.ok_or_else(|| anyhow!("document must have a type"))?;
		ensure!(
			object_type == "FeatureCollection",
			"type must be 'FeatureCollection', got '{object_type}'"
		);

		let srid = parse_srid(&root);

		let feature_values = root
			.get("features")
			.and_then(Value::as_array)
			.ok_or_else(|| anyhow!("document must have a 'features' array"))?;

		let mut features = Vec::with_capacity(feature_values.len());
		for (index, feature) in feature_values.iter().enumerate() {
			match feature.get("geometry").map(parse_geometry) {
				Some(Ok(geometry)) => features.push(GeoFeature { index, geometry }),
				Some(Err(error)) => log::warn!("invalid feature {index}, skipping: {error}"),
				None => log::warn!("invalid feature {index}, skipping: no geometry"),
			}
		}

		Ok(GeoJsonDocument { srid, features })
	}
}

/// Resolves the document's declared CRS to an EPSG code.
///
/// The last `:`-separated token of `crs.properties.name` is matched against
/// the legacy short names (`CRS84` is 4326, `900913` is 3857) or parsed as
/// a bare integer code. A missing `crs` member means the GeoJSON default
/// 4326; a present but unresolvable one falls back to 4326 with a warning.
fn parse_srid(root: &Value) -> u32 {
	let Some(crs) = root.get("crs") else {
		return DEFAULT_SRID;
	};

	let name = crs
		.get("properties")
		.and_then(|properties| properties.get("name"))
		.and_then(Value::as_str);

	let resolved = name.and_then(|name| {
		let code = name.rsplit(':').next().unwrap_or(name);
		match code {
			"CRS84" => Some(DEFAULT_SRID),
			"900913" => Some(3857),
			_ => code.parse::<u32>().ok(),
		}
	});

	resolved.unwrap_or_else(|| {
		log::warn!(
			"unresolvable crs {:?}, assuming EPSG:{DEFAULT_SRID}",
			name.unwrap_or("<missing name>")
		);
		DEFAULT_SRID
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn document(crs: &str) -> String {
		format!(
			r#"{{"type": "FeatureCollection", {crs} "features": [
				{{"type": "Feature", "properties": {{}}, "geometry":
					{{"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}}}}
			]}}"#
		)
	}

	#[test]
	fn missing_crs_defaults_to_4326() {
		let doc = GeoJsonDocument::from_string(&document("")).unwrap();
		assert_eq!(doc.srid, 4326);
		assert_eq!(doc.features.len(), 1);
	}

	#[test]
	fn legacy_crs_names() {
		let crs84 = r#""crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:OGC:1.3:CRS84"}},"#;
		assert_eq!(GeoJsonDocument::from_string(&document(crs84)).unwrap().srid, 4326);

		let webmerc = r#""crs": {"type": "name", "properties": {"name": "EPSG:900913"}},"#;
		assert_eq!(GeoJsonDocument::from_string(&document(webmerc)).unwrap().srid, 3857);

		let numeric = r#""crs": {"type": "name", "properties": {"name": "EPSG:3857"}},"#;
		assert_eq!(GeoJsonDocument::from_string(&document(numeric)).unwrap().srid, 3857);
	}

	#[test]
	fn unresolvable_crs_falls_back() {
		let garbage = r#""crs": {"type": "name", "properties": {"name": "EPSG:wat"}},"#;
		assert_eq!(GeoJsonDocument::from_string(&document(garbage)).unwrap().srid, 4326);

		let empty = r#""crs": {},"#;
		assert_eq!(GeoJsonDocument::from_string(&document(empty)).unwrap().srid, 4326);
	}

	#[test]
	fn rejects_non_feature_collection() {
		let json = r#"{"type": "Feature", "features": []}"#;
		assert!(GeoJsonDocument::from_string(json).is_err());
		assert!(GeoJsonDocument::from_string("[1,2,3]").is_err());
	}

	#[test]
	fn broken_feature_is_skipped() {
		let json = r#"{"type": "FeatureCollection", "features": [
			{"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[0],[1,0],[1,1],[0,0]]]}},
			{"type": "Feature"},
			{"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}}
		]}"#;
		let doc = GeoJsonDocument::from_string(json).unwrap();
		assert_eq!(doc.features.len(), 1);
		assert_eq!(doc.features[0].index, 2);
	}

	#[test]
	fn unsupported_geometry_is_kept_for_dispatch() {
		let json = r#"{"type": "FeatureCollection", "features": [
			{"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[0,0],[1,1]]}}
		]}"#;
		let doc = GeoJsonDocument::from_string(json).unwrap();
		assert_eq!(doc.features[0].geometry.type_name(), "LineString");
	}
}
