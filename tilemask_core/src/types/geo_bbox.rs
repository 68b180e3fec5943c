use anyhow::{Result, ensure};
use std::fmt::Debug;

static MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;
static MAX_MERCATOR_LNG: f64 = 180.0;
static RADIUS: f64 = 6_378_137.0; // meters

/// A geographical bounding box in WGS84 degrees, stored as
/// `x_min` (west), `y_min` (south), `x_max` (east), `y_max` (north).
///
/// Coordinates are validated on construction; use [`GeoBBox::new_clamped`]
/// for inputs that may stick out of the valid range.
///
/// # Examples
///
/// ```
/// use tilemask_core::GeoBBox;
///
/// let bbox = GeoBBox::new(-10.0, -5.0, 10.0, 5.0).unwrap();
/// assert_eq!(bbox.as_tuple(), (-10.0, -5.0, 10.0, 5.0));
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct GeoBBox {
	pub x_min: f64,
	pub y_min: f64,
	pub x_max: f64,
	pub y_max: f64,
}

impl GeoBBox {
	/// Creates a new `GeoBBox` from `west, south, east, north` degrees.
	pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<GeoBBox> {
		GeoBBox {
			x_min,
			y_min,
			x_max,
			y_max,
		}
		.checked()
	}

	/// Like [`GeoBBox::new`], but swaps and clamps the coordinates into the
	/// valid range instead of failing.
	pub fn new_clamped(x0: f64, y0: f64, x1: f64, y1: f64) -> Result<GeoBBox> {
		GeoBBox {
			x_min: x0.min(x1).clamp(-180.0, 180.0),
			y_min: y0.min(y1).clamp(-90.0, 90.0),
			x_max: x0.max(x1).clamp(-180.0, 180.0),
			y_max: y0.max(y1).clamp(-90.0, 90.0),
		}
		.checked()
	}

	#[must_use]
	pub fn as_array(&self) -> [f64; 4] {
		[self.x_min, self.y_min, self.x_max, self.y_max]
	}

	#[must_use]
	pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
		(self.x_min, self.y_min, self.x_max, self.y_max)
	}

	/// Expands the bounding box in place so that it includes `other`.
	pub fn extend(&mut self, other: &GeoBBox) {
		self.x_min = self.x_min.min(other.x_min);
		self.y_min = self.y_min.min(other.y_min);
		self.x_max = self.x_max.max(other.x_max);
		self.y_max = self.y_max.max(other.y_max);
	}

	/// Non-mutating version of [`extend`](Self::extend).
	#[must_use]
	pub fn extended(mut self, other: &GeoBBox) -> GeoBBox {
		self.extend(other);
		self
	}

	/// Convert this WGS84 (EPSG:4326) bounding box to Web-Mercator meters
	/// (EPSG:3857), as `[west, south, east, north]`.
	///
	/// Latitudes are clamped to the valid Web-Mercator domain
	/// (`±85.05112877980659°`) before projecting.
	#[must_use]
	pub fn to_mercator(&self) -> [f64; 4] {
		fn x_from_lon(lon_deg: f64) -> f64 {
			let lon = lon_deg.clamp(-MAX_MERCATOR_LNG, MAX_MERCATOR_LNG);
			RADIUS * lon.to_radians()
		}
		fn y_from_lat(lat_deg: f64) -> f64 {
			let lat = lat_deg.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
			let phi = lat.to_radians();
			RADIUS * ((std::f64::consts::FRAC_PI_4 + phi / 2.0).tan()).ln()
		}

		[
			x_from_lon(self.x_min),
			y_from_lat(self.y_min),
			x_from_lon(self.x_max),
			y_from_lat(self.y_max),
		]
	}

	fn checked(self) -> Result<Self> {
		ensure!(self.x_min >= -180., "x_min ({}) must be >= -180", self.x_min);
		ensure!(self.y_min >= -90., "y_min ({}) must be >= -90", self.y_min);
		ensure!(self.x_max <= 180., "x_max ({}) must be <= 180", self.x_max);
		ensure!(self.y_max <= 90., "y_max ({}) must be <= 90", self.y_max);
		ensure!(
			self.x_min <= self.x_max,
			"x_min ({}) must be <= x_max ({})",
			self.x_min,
			self.x_max
		);
		ensure!(
			self.y_min <= self.y_max,
			"y_min ({}) must be <= y_max ({})",
			self.y_min,
			self.y_max
		);
		Ok(self)
	}
}

impl Debug for GeoBBox {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"GeoBBox({}, {}, {}, {})",
			self.x_min, self.y_min, self.x_max, self.y_max
		)
	}
}
