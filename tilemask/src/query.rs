//! The database-source path: per-tile geometry windows from PostGIS.
//!
//! [`TileQuery`] owns its connection outright. The caller supplies one base
//! geometry query; a spatial predicate against the tile envelope is
//! appended once at startup, and every tile issues a CTE that windows the
//! base query to the tile's bounding box and dumps single-part geometries
//! as GeoJSON. A failed tile query is recovered by replacing the
//! connection and reporting the tile as empty; the cover run continues.

use crate::source::FeatureSource;
use anyhow::{Context, Result, ensure};
use async_trait::async_trait;
use regex::Regex;
use sqlx::{Connection, PgConnection, Row};
use tilemask_core::{GeoBBox, TileCoord};
use tilemask_geometry::{Geometry, Polygon, parse_geometry_str};

const SPATIAL_PREDICATE: &str = "ST_Intersects(tile.geom, geom)";

/// Rejects base queries carrying a row-limiting clause; a `LIMIT` would
/// silently truncate coverage per tile.
pub fn ensure_no_limit(base_sql: &str) -> Result<()> {
	let limit = Regex::new(r"(?i)\blimit\b")?;
	ensure!(
		!limit.is_match(base_sql),
		"LIMIT is not supported in the base query"
	);
	Ok(())
}

/// Appends the tile-window predicate to the base query: with `AND` if the
/// query already filters, with `WHERE` otherwise (case-insensitive check).
pub fn compose_spatial_predicate(base_sql: &str) -> Result<String> {
	let filter = Regex::new(r"(?i)\bwhere\b")?;
	let keyword = if filter.is_match(base_sql) { "AND" } else { "WHERE" };
	Ok(format!("{base_sql} {keyword} {SPATIAL_PREDICATE}"))
}

/// The per-tile window query: envelope in the source SRID, intersection
/// with the base query, single parts dumped back as WGS84 GeoJSON.
fn tile_window_sql(filtered_sql: &str, srid: u32, bbox: &GeoBBox) -> String {
	let (west, south, east, north) = bbox.as_tuple();
	format!(
		"WITH \
		tile AS (SELECT ST_Transform(ST_MakeEnvelope({west},{south},{east},{north}, 4326), {srid}) AS geom), \
		geom AS (SELECT ST_Intersection(tile.geom, sql.geom) AS geom FROM tile CROSS JOIN LATERAL ({filtered_sql}) sql) \
		SELECT ST_AsGeoJSON((ST_Dump(ST_Transform(ST_Force2D(geom.geom), 4326))).geom, 6) AS geometry FROM geom"
	)
}

/// Owned database window fetcher; see the module docs.
pub struct TileQuery {
	dsn: String,
	filtered_sql: String,
	srid: u32,
	connection: PgConnection,
}

impl TileQuery {
	/// Validates the base query, connects and introspects the source SRID.
	/// All failures here are startup-fatal.
	pub async fn connect(dsn: &str, base_sql: &str) -> Result<TileQuery> {
		ensure_no_limit(base_sql)?;
		let filtered_sql = compose_spatial_predicate(base_sql)?;

		let mut connection = PgConnection::connect(dsn)
			.await
			.context("Failed to connect to the database")?;
		let srid = introspect_srid(&mut connection, base_sql).await?;
		log::debug!("source geometry SRID is {srid}");

		Ok(TileQuery {
			dsn: dsn.to_string(),
			filtered_sql,
			srid,
			connection,
		})
	}

	pub fn srid(&self) -> u32 {
		self.srid
	}

	async fn query_tile(&mut self, tile: &TileCoord) -> Result<Vec<Polygon>> {
		let sql = tile_window_sql(&self.filtered_sql, self.srid, &tile.as_geo_bbox());
		let rows = sqlx::query(&sql).fetch_all(&mut self.connection).await?;

		let mut polygons = Vec::new();
		for row in rows {
			let Some(text) = row.try_get::<Option<String>, _>("geometry")? else {
				continue;
			};
			match parse_geometry_str(&text)? {
				Geometry::Polygon(polygon) => polygons.push(polygon),
				Geometry::MultiPolygon(parts) => polygons.extend(parts),
				other => {
					// envelope intersections can degenerate into lines/points
					log::debug!("dropping {} sliver in {tile:?}", other.type_name());
				}
			}
		}
		Ok(polygons)
	}

	/// Replaces, never reuses, a broken connection.
	async fn reconnect(&mut self) -> Result<()> {
		self.connection = PgConnection::connect(&self.dsn)
			.await
			.context("Failed to re-establish the database connection")?;
		Ok(())
	}
}

#[async_trait]
impl FeatureSource for TileQuery {
	async fn fetch(&mut self, tile: &TileCoord) -> Result<Vec<Polygon>> {
		match self.query_tile(tile).await {
			Ok(polygons) => Ok(polygons),
			Err(error) => {
				log::warn!("invalid geometries, skipping {tile:?}: {error}");
				self.reconnect().await?;
				Ok(Vec::new())
			}
		}
	}
}

async fn introspect_srid(connection: &mut PgConnection, base_sql: &str) -> Result<u32> {
	let sql = format!("SELECT ST_SRID(geom) AS srid FROM ({base_sql} LIMIT 1) AS sub");
	let row = sqlx::query(&sql)
		.fetch_one(connection)
		.await
		.context("Failed to introspect the source geometry SRID")?;
	let srid: i32 = row.try_get("srid")?;
	ensure!(srid > 0, "unable to retrieve a geometry SRID from the source query");
	Ok(srid as u32)
}
