use crate::GeoBBox;
use anyhow::{Result, ensure};
use std::fmt::{self, Debug, Display};

/// Maximum zoom level accepted for a tile coordinate.
pub const MAX_ZOOM: u8 = 22;

/// Identifier of one quadrant of the global XYZ tile pyramid at zoom `z`.
///
/// Tiles are immutable; equality and hashing cover all three fields.
///
/// # Examples
///
/// ```
/// use tilemask_core::TileCoord;
///
/// let coord = TileCoord::new(8192, 5461, 14).unwrap();
/// assert_eq!(coord.z, 14);
/// let bbox = coord.as_geo_bbox();
/// assert!(bbox.x_min < bbox.x_max);
/// ```
#[derive(Eq, PartialEq, Clone, Copy, Hash)]
pub struct TileCoord {
	pub x: u32,
	pub y: u32,
	pub z: u8,
}

impl TileCoord {
	pub fn new(x: u32, y: u32, z: u8) -> Result<TileCoord> {
		ensure!(z <= MAX_ZOOM, "zoom ({z}) must be <= {MAX_ZOOM}");
		let max = 1u32 << z;
		ensure!(x < max, "x ({x}) must be < {max} at zoom {z}");
		ensure!(y < max, "y ({y}) must be < {max} at zoom {z}");
		Ok(TileCoord { x, y, z })
	}

	/// The tile's bounding box in WGS84 degrees.
	pub fn as_geo_bbox(&self) -> GeoBBox {
		let size = 2.0f64.powi(self.z as i32);

		let lon = |x: f64| x / size * 360.0 - 180.0;
		let lat = |y: f64| {
			let n = std::f64::consts::PI * (1.0 - 2.0 * y / size);
			n.sinh().atan().to_degrees()
		};

		GeoBBox {
			x_min: lon(self.x as f64),
			y_min: lat((self.y + 1) as f64),
			x_max: lon((self.x + 1) as f64),
			y_max: lat(self.y as f64),
		}
	}

	/// The tile's bounding box in Web-Mercator meters, `[west, south, east, north]`.
	pub fn as_mercator_bounds(&self) -> [f64; 4] {
		self.as_geo_bbox().to_mercator()
	}
}

impl Display for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{},{},{}", self.x, self.y, self.z)
	}
}

impl Debug for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TileCoord({}, [{}, {}])", self.z, self.x, self.y)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_abs_diff_eq;
	use std::collections::HashSet;

	#[test]
	fn new_validates() {
		assert!(TileCoord::new(0, 0, 0).is_ok());
		assert!(TileCoord::new(1, 0, 0).is_err());
		assert!(TileCoord::new(0, 4, 2).is_err());
		assert!(TileCoord::new(0, 0, 23).is_err());
	}

	#[test]
	fn equality_and_hash() {
		let a = TileCoord::new(3, 4, 5).unwrap();
		let b = TileCoord::new(3, 4, 5).unwrap();
		let c = TileCoord::new(4, 3, 5).unwrap();
		assert_eq!(a, b);
		assert_ne!(a, c);

		let set: HashSet<TileCoord> = [a, b, c].into_iter().collect();
		assert_eq!(set.len(), 2);
	}

	#[test]
	fn world_tile_bbox() {
		let bbox = TileCoord::new(0, 0, 0).unwrap().as_geo_bbox();
		assert_abs_diff_eq!(bbox.x_min, -180.0);
		assert_abs_diff_eq!(bbox.x_max, 180.0);
		assert_abs_diff_eq!(bbox.y_max, 85.05112877980659, epsilon = 1e-9);
		assert_abs_diff_eq!(bbox.y_min, -85.05112877980659, epsilon = 1e-9);
	}

	#[test]
	fn zoom5_tile_bbox() {
		let bbox = TileCoord::new(3, 4, 5).unwrap().as_geo_bbox();
		assert_abs_diff_eq!(bbox.x_min, -146.25);
		assert_abs_diff_eq!(bbox.x_max, -135.0);
		assert_abs_diff_eq!(bbox.y_max, 79.17133464081945, epsilon = 1e-9);
		assert_abs_diff_eq!(bbox.y_min, 76.84081641443098, epsilon = 1e-9);
	}

	#[test]
	fn mercator_bounds_are_ordered() {
		let [w, s, e, n] = TileCoord::new(8192, 5461, 14).unwrap().as_mercator_bounds();
		assert!(w < e);
		assert!(s < n);
	}

	#[test]
	fn display_is_csv_order() {
		let coord = TileCoord::new(8192, 5461, 14).unwrap();
		assert_eq!(coord.to_string(), "8192,5461,14");
		assert_eq!(format!("{coord:?}"), "TileCoord(14, [8192, 5461])");
	}
}
