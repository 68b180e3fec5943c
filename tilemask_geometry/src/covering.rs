//! Tile covering: which tiles of a zoom level does a polygon touch.
//!
//! The cover is computed from the polygon's extent in geographic
//! coordinates, so geometries MUST be normalized to EPSG:4326 before they
//! are passed in. Every tile whose bounding box intersects the extent is
//! returned; tiles only ever add no-op work downstream, missing tiles
//! would lose labels.

use crate::geo::Polygon;
use anyhow::{Result, ensure};
use itertools::Itertools;
use tilemask_core::{MAX_ZOOM, TileCoord};

// Latitudes beyond the mercator domain clamp onto the edge tile rows.
const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Returns all tiles at `zoom` whose extent intersects the polygon's
/// extent, row-major ordered. An empty polygon covers nothing.
pub fn covering_tiles(polygon: &Polygon, zoom: u8) -> Result<Vec<TileCoord>> {
	ensure!(zoom <= MAX_ZOOM, "zoom ({zoom}) must be <= {MAX_ZOOM}");

	let Some([x_min, y_min, x_max, y_max]) = polygon.extent() else {
		return Ok(Vec::new());
	};
	ensure!(
		[x_min, y_min, x_max, y_max].iter().all(|value| value.is_finite()),
		"polygon extent contains non-finite coordinates"
	);

	let max_index = (1u32 << zoom) - 1;
	let clamp = |fraction: f64| (fraction.floor().max(0.0) as u32).min(max_index);

	let tile_x_min = clamp(lon_to_tile_x(x_min, zoom));
	let tile_x_max = clamp(lon_to_tile_x(x_max, zoom));
	// north edge has the smaller tile y
	let tile_y_min = clamp(lat_to_tile_y(y_max, zoom));
	let tile_y_max = clamp(lat_to_tile_y(y_min, zoom));

	(tile_y_min..=tile_y_max)
		.cartesian_product(tile_x_min..=tile_x_max)
		.map(|(y, x)| TileCoord::new(x, y, zoom))
		.collect()
}

fn lon_to_tile_x(lon: f64, zoom: u8) -> f64 {
	let size = 2.0f64.powi(zoom as i32);
	(lon + 180.0) / 360.0 * size
}

fn lat_to_tile_y(lat: f64, zoom: u8) -> f64 {
	let size = 2.0f64.powi(zoom as i32);
	let phi = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
	(1.0 - phi.tan().asinh() / std::f64::consts::PI) / 2.0 * size
}
