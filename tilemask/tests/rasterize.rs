//! End-to-end checks of the rasterize tool against a filesystem fixture.

use anyhow::Result;
use assert_fs::prelude::*;
use std::{fs, path::PathBuf};
use tilemask::tools::rasterize;
use tilemask_core::TileCoord;

const CONFIG: &str = r##"
classes:
  - title: Background
    color: "#000000"
  - title: Building
    color: "#e53935"
"##;

/// A polygon ring fully inside the tile, as GeoJSON coordinate text.
fn inner_ring_json(tile: &TileCoord) -> String {
	let bbox = tile.as_geo_bbox();
	let dx = (bbox.x_max - bbox.x_min) * 0.25;
	let dy = (bbox.y_max - bbox.y_min) * 0.25;
	let (x0, y0) = (bbox.x_min + dx, bbox.y_min + dy);
	let (x1, y1) = (bbox.x_max - dx, bbox.y_max - dy);
	format!("[[[{x0},{y0}],[{x1},{y0}],[{x1},{y1}],[{x0},{y1}],[{x0},{y0}]]]")
}

struct Fixture {
	temp_dir: assert_fs::TempDir,
	out: PathBuf,
}

impl Fixture {
	fn new(cover: &str) -> Result<Fixture> {
		let temp_dir = assert_fs::TempDir::new()?;

		let tile = TileCoord::new(8192, 5461, 14)?;
		let geojson = format!(
			r#"{{"type": "FeatureCollection", "features": [
				{{"type": "Feature", "properties": {{}}, "geometry":
					{{"type": "Polygon", "coordinates": {}}}}}
			]}}"#,
			inner_ring_json(&tile)
		);
		temp_dir.child("features.geojson").write_str(&geojson)?;
		temp_dir.child("cover.csv").write_str(cover)?;
		temp_dir.child("config.yaml").write_str(CONFIG)?;

		let out = temp_dir.path().join("labels");
		Ok(Fixture { temp_dir, out })
	}

	fn arguments(&self) -> rasterize::Subcommand {
		rasterize::Subcommand {
			out: self.out.clone(),
			cover: self.temp_dir.path().join("cover.csv"),
			config: self.temp_dir.path().join("config.yaml"),
			class_title: "Building".to_string(),
			geojson: vec![self.temp_dir.path().join("features.geojson")],
			pg: None,
			sql: None,
			ts: 64,
		}
	}
}

#[test]
fn geojson_cover_run() -> Result<()> {
	let fixture = Fixture::new("8192,5461,14\n0,0,14\n")?;
	rasterize::run(&fixture.arguments())?;

	// one manifest line per cover tile, in cover order
	let manifest = fs::read_to_string(fixture.out.join("instances.cover"))?;
	assert_eq!(manifest, "8192,5461,14  1\n0,0,14  0\n");

	// the covered tile contains burned pixels in the class color
	let burned = image::open(fixture.out.join("14/8192/5461.png"))?.to_rgb8();
	assert_eq!(burned.dimensions(), (64, 64));
	assert!(burned.pixels().any(|pixel| pixel.0 == [229, 57, 53]));
	assert!(burned.pixels().any(|pixel| pixel.0 == [0, 0, 0]));

	// the disjoint tile is all background
	let background = image::open(fixture.out.join("14/0/0.png"))?.to_rgb8();
	assert_eq!(background.dimensions(), (64, 64));
	assert!(background.pixels().all(|pixel| pixel.0 == [0, 0, 0]));

	Ok(())
}

#[test]
fn mixed_zoom_cover_fails_at_startup() -> Result<()> {
	let fixture = Fixture::new("512,341,10\n8192,5461,14\n")?;
	let err = rasterize::run(&fixture.arguments()).unwrap_err().to_string();
	assert!(err.contains("single-zoom cover"), "{err}");
	assert!(!fixture.out.join("instances.cover").exists());
	Ok(())
}

#[test]
fn unknown_class_fails_at_startup() -> Result<()> {
	let fixture = Fixture::new("8192,5461,14\n")?;
	let mut arguments = fixture.arguments();
	arguments.class_title = "Road".to_string();

	let err = rasterize::run(&arguments).unwrap_err();
	assert!(format!("{err:#}").contains("not defined"), "{err:#}");
	Ok(())
}

#[test]
fn ambiguous_sources_fail_at_startup() -> Result<()> {
	let fixture = Fixture::new("8192,5461,14\n")?;

	let mut arguments = fixture.arguments();
	arguments.pg = Some("postgres://localhost/gis".to_string());
	arguments.sql = Some("SELECT geom FROM buildings".to_string());
	let err = rasterize::run(&arguments).unwrap_err().to_string();
	assert!(err.contains("only one at once"), "{err}");

	let mut arguments = fixture.arguments();
	arguments.geojson.clear();
	let err = rasterize::run(&arguments).unwrap_err().to_string();
	assert!(err.contains("input is required"), "{err}");

	let mut arguments = fixture.arguments();
	arguments.geojson.clear();
	arguments.pg = Some("postgres://localhost/gis".to_string());
	let err = rasterize::run(&arguments).unwrap_err().to_string();
	assert!(err.contains("--sql must be provided"), "{err}");

	Ok(())
}

#[test]
fn limit_clause_fails_before_any_tile() -> Result<()> {
	let fixture = Fixture::new("8192,5461,14\n")?;
	let mut arguments = fixture.arguments();
	arguments.geojson.clear();
	arguments.pg = Some("postgres://localhost/gis".to_string());
	arguments.sql = Some("SELECT geom FROM t LIMIT 5".to_string());

	// rejected by query validation, before any connection is dialed
	let err = rasterize::run(&arguments).unwrap_err().to_string();
	assert!(err.contains("LIMIT is not supported"), "{err}");
	assert!(!fixture.out.join("instances.cover").exists());
	Ok(())
}
