//! The tile burner: one tile's geometry set into one label raster.

use anyhow::Result;
use tilemask_core::TileCoord;
use tilemask_geometry::{
	LabelRaster, Polygon,
	proj::{EPSG_WEB_MERCATOR, reproject_polygon},
	rasterize_polygons,
};

/// Burns `burn_value` into every pixel of a `size` x `size` raster covered
/// by any of the polygons, which are reprojected from `source_srid` onto
/// the tile's Web-Mercator pixel grid.
///
/// Returns `None` when rasterization fails for the geometry set; callers
/// substitute an all-background raster and report the tile's feature count
/// as zero. Burn success, not retrieval success, gates the count.
pub fn burn(
	tile: &TileCoord,
	polygons: &[Polygon],
	source_srid: u32,
	size: u32,
	burn_value: u8,
) -> Option<LabelRaster> {
	match try_burn(tile, polygons, source_srid, size, burn_value) {
		Ok(raster) => Some(raster),
		Err(error) => {
			log::warn!("rasterization failed for {tile:?}: {error}");
			None
		}
	}
}

fn try_burn(
	tile: &TileCoord,
	polygons: &[Polygon],
	source_srid: u32,
	size: u32,
	burn_value: u8,
) -> Result<LabelRaster> {
	let mercator = polygons
		.iter()
		.map(|polygon| reproject_polygon(polygon, source_srid, EPSG_WEB_MERCATOR))
		.collect::<Result<Vec<Polygon>>>()?;

	rasterize_polygons(&mercator, tile.as_mercator_bounds(), size, burn_value)
}
