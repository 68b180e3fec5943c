use crate::geo::{Geometry, Polygon, Ring};
use anyhow::{Result, anyhow, bail, ensure};
use serde_json::Value;

/// Parses one GeoJSON geometry object.
///
/// Surfacic types become their typed variants; every other type tag is kept
/// as [`Geometry::Unsupported`] for the caller to dispatch on. Structural
/// problems (missing coordinates, malformed positions) are errors.
pub fn parse_geometry(value: &Value) -> Result<Geometry> {
	let geometry_type = value
		.get("type")
		.and_then(Value::as_str)
		.ok_or_else(|| anyhow!("geometry must have a type"))?;

	Ok(match geometry_type {
		"Polygon" => Geometry::Polygon(parse_polygon(coordinates_of(value)?)?),
		"MultiPolygon" => {
			let polygons = coordinates_of(value)?
				.as_array()
				.ok_or_else(|| anyhow!("MultiPolygon coordinates must be an array"))?
				.iter()
				.map(parse_polygon)
				.collect::<Result<Vec<Polygon>>>()?;
			Geometry::MultiPolygon(polygons)
		}
		"GeometryCollection" => {
			let members = value
				.get("geometries")
				.and_then(Value::as_array)
				.ok_or_else(|| anyhow!("GeometryCollection must have a 'geometries' array"))?
				.iter()
				.map(parse_geometry)
				.collect::<Result<Vec<Geometry>>>()?;
			Geometry::GeometryCollection(members)
		}
		other => Geometry::Unsupported(other.to_string()),
	})
}

/// Convenience wrapper for geometry objects arriving as text, e.g. from
/// `ST_AsGeoJSON` database rows.
pub fn parse_geometry_str(json: &str) -> Result<Geometry> {
	let value: Value = serde_json::from_str(json)?;
	parse_geometry(&value)
}

fn coordinates_of(value: &Value) -> Result<&Value> {
	value
		.get("coordinates")
		.ok_or_else(|| anyhow!("geometry must have coordinates"))
}

fn parse_polygon(value: &Value) -> Result<Polygon> {
	let rings = value
		.as_array()
		.ok_or_else(|| anyhow!("Polygon coordinates must be an array of rings"))?
		.iter()
		.map(parse_ring)
		.collect::<Result<Vec<Ring>>>()?;
	Ok(Polygon::new(rings))
}

fn parse_ring(value: &Value) -> Result<Ring> {
	let positions = value
		.as_array()
		.ok_or_else(|| anyhow!("ring must be an array of positions"))?;

	let mut coordinates = Vec::with_capacity(positions.len());
	for position in positions {
		coordinates.push(parse_position(position)?);
	}
	Ok(Ring::new(coordinates))
}

// Positions may carry more than two values (elevation etc.); everything
// past x and y is dropped.
fn parse_position(value: &Value) -> Result<[f64; 2]> {
	let Some(values) = value.as_array() else {
		bail!("position must be an array");
	};
	ensure!(values.len() >= 2, "position must have at least two values");

	let number = |v: &Value| v.as_f64().ok_or_else(|| anyhow!("position values must be numbers"));
	Ok([number(&values[0])?, number(&values[1])?])
}
