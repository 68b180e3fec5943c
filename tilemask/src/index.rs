//! The vector-source path: a two-phase spatial index.
//!
//! [`SpatialIndexBuilder`] owns the mutable tile-to-geometry mapping while
//! documents are ingested; [`SpatialIndexBuilder::build`] freezes it into a
//! [`SpatialIndex`] that only serves lookups. The cover writer never sees
//! the mutable half.

use crate::source::FeatureSource;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tilemask_core::{TileCoord, progress::ProgressBar};
use tilemask_geometry::{
	Geometry, GeoJsonDocument, Polygon, covering_tiles,
	proj::{EPSG_WGS84, reproject_polygon},
};

pub struct SpatialIndexBuilder {
	zoom: u8,
	buckets: HashMap<TileCoord, Vec<Polygon>>,
}

impl SpatialIndexBuilder {
	pub fn new(zoom: u8) -> SpatialIndexBuilder {
		SpatialIndexBuilder {
			zoom,
			buckets: HashMap::new(),
		}
	}

	/// Ingests every feature of a document.
	///
	/// Broken features (unsupported type, failed reprojection, malformed
	/// ring) are logged and skipped; they never abort the run.
	pub fn add_document(&mut self, document: &GeoJsonDocument) {
		let mut progress = ProgressBar::new("indexing features", document.features.len() as u64);
		for feature in &document.features {
			self.add_geometry(&feature.geometry, document.srid, feature.index);
			progress.inc(1);
		}
		progress.finish();
	}

	fn add_geometry(&mut self, geometry: &Geometry, srid: u32, index: usize) {
		match geometry {
			Geometry::Polygon(polygon) => self.add_polygon(polygon, srid, index),
			Geometry::MultiPolygon(polygons) => {
				for polygon in polygons {
					self.add_polygon(polygon, srid, index);
				}
			}
			Geometry::GeometryCollection(members) => {
				for member in members {
					self.add_geometry(member, srid, index);
				}
			}
			Geometry::Unsupported(name) => {
				log::warn!("{name} is a non surfacic geometry type, skipping feature {index}");
			}
		}
	}

	fn add_polygon(&mut self, polygon: &Polygon, srid: u32, index: usize) {
		let normalized = if srid == EPSG_WGS84 {
			polygon.clone()
		} else {
			match reproject_polygon(polygon, srid, EPSG_WGS84) {
				Ok(normalized) => normalized,
				Err(error) => {
					log::warn!("invalid feature {index}, skipping: {error}");
					return;
				}
			}
		};

		// degenerate after normalization, contributes to no bucket
		if normalized.is_empty() {
			return;
		}

		let tiles = match covering_tiles(&normalized, self.zoom) {
			Ok(tiles) => tiles,
			Err(error) => {
				log::warn!("invalid feature {index}, skipping: {error}");
				return;
			}
		};
		for tile in tiles {
			self.buckets.entry(tile).or_default().push(normalized.clone());
		}
	}

	/// Freezes the index; no mutation is possible afterwards.
	pub fn build(self) -> SpatialIndex {
		SpatialIndex {
			buckets: self.buckets,
		}
	}
}

/// Immutable tile-to-geometry mapping for the vector-source path.
pub struct SpatialIndex {
	buckets: HashMap<TileCoord, Vec<Polygon>>,
}

impl SpatialIndex {
	/// Number of tiles with at least one geometry.
	pub fn tile_count(&self) -> usize {
		self.buckets.len()
	}

	pub fn get(&self, tile: &TileCoord) -> &[Polygon] {
		self.buckets.get(tile).map_or(&[], Vec::as_slice)
	}
}

#[async_trait]
impl FeatureSource for SpatialIndex {
	async fn fetch(&mut self, tile: &TileCoord) -> Result<Vec<Polygon>> {
		Ok(self.get(tile).to_vec())
	}
}
