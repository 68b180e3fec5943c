mod polygon;
mod ring;

pub use polygon::Polygon;
pub use ring::Ring;

use std::fmt::Debug;

/// A parsed input geometry, dispatched by tag.
///
/// Only surfacic geometries take part in the pipeline; everything else is
/// kept as [`Geometry::Unsupported`] so that callers can skip it with a
/// warning instead of failing the run.
#[derive(Clone, PartialEq)]
pub enum Geometry {
	Polygon(Polygon),
	MultiPolygon(Vec<Polygon>),
	GeometryCollection(Vec<Geometry>),
	Unsupported(String),
}

impl Geometry {
	/// The GeoJSON type name of this geometry.
	pub fn type_name(&self) -> &str {
		match self {
			Geometry::Polygon(_) => "Polygon",
			Geometry::MultiPolygon(_) => "MultiPolygon",
			Geometry::GeometryCollection(_) => "GeometryCollection",
			Geometry::Unsupported(name) => name,
		}
	}
}

impl Debug for Geometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Geometry::Polygon(polygon) => f.debug_tuple("Polygon").field(polygon).finish(),
			Geometry::MultiPolygon(polygons) => f.debug_tuple("MultiPolygon").field(polygons).finish(),
			Geometry::GeometryCollection(members) => {
				f.debug_tuple("GeometryCollection").field(members).finish()
			}
			Geometry::Unsupported(name) => f.debug_tuple("Unsupported").field(name).finish(),
		}
	}
}
