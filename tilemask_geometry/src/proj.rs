//! Point-wise reprojection between the two coordinate reference systems the
//! tile pipeline works in: WGS84 (EPSG:4326) and Web-Mercator (EPSG:3857).
//!
//! Every other CRS pair is an error. The covering algorithm assumes
//! geographic coordinates, so upstream code normalizes everything to 4326
//! before indexing; the burner transforms into 3857 for the pixel grid.

use crate::geo::Polygon;
use anyhow::{Result, bail, ensure};
use std::f64::consts::FRAC_PI_4;

/// WGS84 geographic coordinates (longitude/latitude in degrees).
pub const EPSG_WGS84: u32 = 4326;
/// Web-Mercator (spherical mercator), the tile grid CRS.
pub const EPSG_WEB_MERCATOR: u32 = 3857;

/// Spherical mercator radius (WGS84 semi-major axis), meters.
const RADIUS: f64 = 6_378_137.0;

/// Forward spherical mercator: degrees to meters.
pub fn wgs84_to_mercator([lon, lat]: [f64; 2]) -> [f64; 2] {
	[
		RADIUS * lon.to_radians(),
		RADIUS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln(),
	]
}

/// Inverse spherical mercator: meters to degrees.
pub fn mercator_to_wgs84([x, y]: [f64; 2]) -> [f64; 2] {
	[
		(x / RADIUS).to_degrees(),
		(2.0 * (y / RADIUS).exp().atan() - 2.0 * FRAC_PI_4).to_degrees(),
	]
}

/// Reprojects a polygon point-wise from `from` to `to`.
///
/// Returns a structurally identical polygon. A failed transform (an
/// unsupported CRS pair or a non-finite result) is an error; the caller
/// decides whether to skip the geometry or abort the run.
pub fn reproject_polygon(polygon: &Polygon, from: u32, to: u32) -> Result<Polygon> {
	let transform: fn([f64; 2]) -> [f64; 2] = match (from, to) {
		(EPSG_WGS84, EPSG_WEB_MERCATOR) => wgs84_to_mercator,
		(EPSG_WEB_MERCATOR, EPSG_WGS84) => mercator_to_wgs84,
		(a, b) if a == b => return Ok(polygon.clone()),
		(a, b) => bail!("unsupported reprojection EPSG:{a} -> EPSG:{b}"),
	};

	let result = polygon.map_coordinates(transform);
	ensure!(
		result
			.rings()
			.iter()
			.all(|ring| ring.iter().all(|&[x, y]| x.is_finite() && y.is_finite())),
		"reprojection EPSG:{from} -> EPSG:{to} produced non-finite coordinates"
	);
	Ok(result)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::geo::Ring;
	use approx::assert_abs_diff_eq;
	use rstest::rstest;

	#[rstest]
	#[case([0.0, 0.0])]
	#[case([13.4, 52.5])]
	#[case([-122.42, 37.77])]
	#[case([179.9, -85.0])]
	fn round_trip(#[case] point: [f64; 2]) {
		let [x, y] = wgs84_to_mercator(point);
		let [lon, lat] = mercator_to_wgs84([x, y]);
		assert_abs_diff_eq!(lon, point[0], epsilon = 1e-6);
		assert_abs_diff_eq!(lat, point[1], epsilon = 1e-6);
	}

	#[test]
	fn known_forward_values() {
		let [x, y] = wgs84_to_mercator([180.0, 0.0]);
		assert_abs_diff_eq!(x, 20_037_508.342789244, epsilon = 1e-3);
		assert_abs_diff_eq!(y, 0.0, epsilon = 1e-9);
	}

	fn square(a: f64, b: f64) -> Polygon {
		Polygon::new(vec![Ring::new(vec![[a, a], [b, a], [b, b], [a, b], [a, a]])])
	}

	#[test]
	fn reproject_polygon_is_structural() {
		let polygon = square(0.0, 1.0);
		let projected = reproject_polygon(&polygon, EPSG_WGS84, EPSG_WEB_MERCATOR).unwrap();
		assert_eq!(projected.rings().len(), polygon.rings().len());
		assert_eq!(projected.rings()[0].len(), polygon.rings()[0].len());

		let back = reproject_polygon(&projected, EPSG_WEB_MERCATOR, EPSG_WGS84).unwrap();
		for (a, b) in back.rings()[0].iter().zip(polygon.rings()[0].iter()) {
			assert_abs_diff_eq!(a[0], b[0], epsilon = 1e-6);
			assert_abs_diff_eq!(a[1], b[1], epsilon = 1e-6);
		}
	}

	#[test]
	fn same_code_is_identity() {
		let polygon = square(3.0, 5.0);
		let result = reproject_polygon(&polygon, EPSG_WGS84, EPSG_WGS84).unwrap();
		assert_eq!(result, polygon);
	}

	#[test]
	fn unsupported_pair_fails() {
		let polygon = square(0.0, 1.0);
		let err = reproject_polygon(&polygon, 2154, EPSG_WGS84).unwrap_err();
		assert!(err.to_string().contains("unsupported reprojection"));
	}

	#[test]
	fn pole_is_rejected() {
		// ln(tan(0)) is -inf; the south pole cannot be projected
		let polygon = Polygon::new(vec![Ring::new(vec![
			[0.0, -90.0],
			[1.0, -90.0],
			[1.0, -89.0],
			[0.0, -90.0],
		])]);
		assert!(reproject_polygon(&polygon, EPSG_WGS84, EPSG_WEB_MERCATOR).is_err());
	}
}
