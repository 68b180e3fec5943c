//! Burning polygons into a fixed-size label grid.
//!
//! [`PixelTransform`] is the affine map from world coordinates onto the
//! pixel grid of one tile (the `from_bounds` construction of GDAL-style
//! rasterizers). [`rasterize_polygons`] scanline-fills polygons with the
//! even-odd rule, sampling at pixel centers: a pixel receives the burn
//! value iff its center lies inside the polygon (holes subtract).

use crate::geo::Polygon;
use anyhow::{Result, ensure};

/// A square single-band label grid; cells hold either 0 (background) or
/// the burn value.
#[derive(Clone, PartialEq, Debug)]
pub struct LabelRaster {
	size: u32,
	data: Vec<u8>,
}

impl LabelRaster {
	/// An all-background raster of side `size`.
	pub fn new(size: u32) -> LabelRaster {
		LabelRaster {
			size,
			data: vec![0u8; (size as usize) * (size as usize)],
		}
	}

	pub fn size(&self) -> u32 {
		self.size
	}

	pub fn data(&self) -> &[u8] {
		&self.data
	}

	pub fn get(&self, x: u32, y: u32) -> u8 {
		self.data[(y as usize) * (self.size as usize) + (x as usize)]
	}

	fn set(&mut self, x: u32, y: u32, value: u8) {
		self.data[(y as usize) * (self.size as usize) + (x as usize)] = value;
	}

	/// Number of non-background cells.
	pub fn count_burned(&self) -> usize {
		self.data.iter().filter(|&&value| value != 0).count()
	}
}

/// Affine map from world coordinates (the CRS of `bounds`) to fractional
/// pixel coordinates of a `size` x `size` grid. Row 0 is the northern edge.
#[derive(Clone, Copy, Debug)]
pub struct PixelTransform {
	west: f64,
	north: f64,
	x_res: f64,
	y_res: f64,
}

impl PixelTransform {
	pub fn from_bounds([west, south, east, north]: [f64; 4], size: u32) -> Result<PixelTransform> {
		ensure!(size > 0, "raster size must be > 0");
		ensure!(
			[west, south, east, north].iter().all(|value| value.is_finite()),
			"tile bounds contain non-finite values"
		);
		ensure!(east > west, "tile bounds have no width");
		ensure!(north > south, "tile bounds have no height");

		Ok(PixelTransform {
			west,
			north,
			x_res: (east - west) / size as f64,
			y_res: (north - south) / size as f64,
		})
	}

	/// World point to fractional `(column, row)`.
	pub fn apply(&self, [x, y]: [f64; 2]) -> [f64; 2] {
		[(x - self.west) / self.x_res, (self.north - y) / self.y_res]
	}
}

/// Burns all polygons into a fresh raster, writing `burn_value` into every
/// cell whose center is covered by any polygon.
///
/// Polygons must already be in the CRS of `bounds`. Malformed input (a ring
/// with fewer than 4 coordinates, non-finite values) is an error; the
/// caller decides how to degrade.
pub fn rasterize_polygons(
	polygons: &[Polygon],
	bounds: [f64; 4],
	size: u32,
	burn_value: u8,
) -> Result<LabelRaster> {
	let transform = PixelTransform::from_bounds(bounds, size)?;
	let mut raster = LabelRaster::new(size);

	for polygon in polygons {
		polygon.verify()?;
		let rings: Vec<Vec<[f64; 2]>> = polygon
			.rings()
			.iter()
			.map(|ring| ring.iter().map(|&point| transform.apply(point)).collect())
			.collect();
		fill_polygon(&mut raster, &rings, burn_value);
	}

	Ok(raster)
}

/// Even-odd scanline fill over all rings of one polygon, in pixel space.
fn fill_polygon(raster: &mut LabelRaster, rings: &[Vec<[f64; 2]>], burn_value: u8) {
	let mut edges: Vec<([f64; 2], [f64; 2])> = Vec::new();
	for ring in rings {
		for pair in ring.windows(2) {
			edges.push((pair[0], pair[1]));
		}
		// tolerate unclosed rings
		if let (Some(&first), Some(&last)) = (ring.first(), ring.last())
			&& first != last
		{
			edges.push((last, first));
		}
	}
	// horizontal edges never cross a scanline
	edges.retain(|(a, b)| a[1] != b[1]);
	if edges.is_empty() {
		return;
	}

	let size = raster.size();
	let y_min = edges.iter().map(|(a, b)| a[1].min(b[1])).fold(f64::MAX, f64::min);
	let y_max = edges.iter().map(|(a, b)| a[1].max(b[1])).fold(f64::MIN, f64::max);
	let row_start = (y_min.floor().max(0.0)) as u32;
	let row_end = (y_max.ceil().min(size as f64)) as u32;

	let mut crossings: Vec<f64> = Vec::new();
	for row in row_start..row_end {
		let center = row as f64 + 0.5;

		crossings.clear();
		for &([x0, y0], [x1, y1]) in &edges {
			if (y0 <= center && center < y1) || (y1 <= center && center < y0) {
				crossings.push(x0 + (center - y0) / (y1 - y0) * (x1 - x0));
			}
		}
		crossings.sort_unstable_by(|a, b| a.total_cmp(b));

		for span in crossings.chunks(2) {
			let &[enter, exit] = span else { continue };
			let column_start = ((enter - 0.5).ceil().max(0.0)) as u32;
			let column_end = ((exit - 0.5).ceil().min(size as f64).max(0.0)) as u32;
			for column in column_start..column_end {
				raster.set(column, row, burn_value);
			}
		}
	}
}
