use anyhow::{Result, ensure};
use std::fmt::Debug;

/// A single coordinate ring of a polygon.
///
/// Coordinates are `[x, y]` pairs; for a well-formed GeoJSON ring the last
/// pair repeats the first. Validity beyond the minimum length is checked by
/// the rasterizer, which is where malformed rings actually hurt.
#[derive(Clone, PartialEq, Default)]
pub struct Ring(pub Vec<[f64; 2]>);

impl Ring {
	pub fn new(coordinates: Vec<[f64; 2]>) -> Ring {
		Ring(coordinates)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, [f64; 2]> {
		self.0.iter()
	}

	/// A closed ring needs the closing coordinate, hence at least 4 entries.
	pub fn verify(&self) -> Result<()> {
		ensure!(self.0.len() >= 4, "ring must have at least 4 coordinates");
		ensure!(
			self.0.iter().all(|&[x, y]| x.is_finite() && y.is_finite()),
			"ring contains non-finite coordinates"
		);
		Ok(())
	}

	/// Applies `f` to every coordinate, producing a new ring.
	pub fn map_coordinates(&self, mut f: impl FnMut([f64; 2]) -> [f64; 2]) -> Ring {
		Ring(self.0.iter().map(|&point| f(point)).collect())
	}
}

impl Debug for Ring {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(self.0.iter()).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn verify_minimum_length() {
		assert!(Ring::new(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]).verify().is_err());
		assert!(
			Ring::new(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]])
				.verify()
				.is_ok()
		);
	}

	#[test]
	fn verify_rejects_non_finite() {
		let ring = Ring::new(vec![[0.0, 0.0], [f64::NAN, 0.0], [1.0, 1.0], [0.0, 0.0]]);
		assert!(ring.verify().is_err());
	}

	#[test]
	fn map_coordinates() {
		let ring = Ring::new(vec![[1.0, 2.0], [3.0, 4.0]]);
		let shifted = ring.map_coordinates(|[x, y]| [x + 1.0, y - 1.0]);
		assert_eq!(shifted.0, vec![[2.0, 1.0], [4.0, 3.0]]);
	}
}
