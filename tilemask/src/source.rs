use anyhow::Result;
use async_trait::async_trait;
use tilemask_core::TileCoord;
use tilemask_geometry::Polygon;

/// The seam between the cover writer and its geometry source.
///
/// Exactly one implementation is active per run: the frozen spatial index
/// (vector-source path) or the per-tile database window query. Fetching
/// takes `&mut self` because the database source owns a connection it may
/// have to replace.
#[async_trait]
pub trait FeatureSource {
	/// All geometries intersecting the tile, normalized to EPSG:4326.
	///
	/// Per-tile retrieval problems are handled inside the source (warn,
	/// recover, return empty); an error from this method is fatal for the
	/// run.
	async fn fetch(&mut self, tile: &TileCoord) -> Result<Vec<Polygon>>;
}
