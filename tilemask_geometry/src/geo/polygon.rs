use super::Ring;
use anyhow::Result;
use std::fmt::Debug;

/// A polygon as a list of rings: the first ring is the outer boundary, any
/// further rings are holes.
#[derive(Clone, PartialEq, Default)]
pub struct Polygon(pub Vec<Ring>);

impl Polygon {
	pub fn new(rings: Vec<Ring>) -> Polygon {
		Polygon(rings)
	}

	pub fn rings(&self) -> &[Ring] {
		&self.0
	}

	/// A polygon with no rings carries no area; the indexer drops these.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty() || self.0.iter().all(Ring::is_empty)
	}

	pub fn verify(&self) -> Result<()> {
		for ring in &self.0 {
			ring.verify()?;
		}
		Ok(())
	}

	/// The raw coordinate extent `[x_min, y_min, x_max, y_max]`, or `None`
	/// for an empty polygon.
	pub fn extent(&self) -> Option<[f64; 4]> {
		let mut extent: Option<[f64; 4]> = None;
		for ring in &self.0 {
			for &[x, y] in ring.iter() {
				extent = Some(match extent {
					None => [x, y, x, y],
					Some([x_min, y_min, x_max, y_max]) => {
						[x_min.min(x), y_min.min(y), x_max.max(x), y_max.max(y)]
					}
				});
			}
		}
		extent
	}

	/// Applies `f` to every coordinate of every ring.
	pub fn map_coordinates(&self, mut f: impl FnMut([f64; 2]) -> [f64; 2]) -> Polygon {
		Polygon(self.0.iter().map(|ring| ring.map_coordinates(&mut f)).collect())
	}
}

impl Debug for Polygon {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(self.0.iter()).finish()
	}
}
