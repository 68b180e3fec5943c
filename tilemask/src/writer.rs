//! The cover writer: drives the per-tile pipeline.
//!
//! For every tile of the cover, in cover order: fetch the tile's
//! geometries from the active source, burn them (or substitute an
//! all-background raster), persist the raster, append one manifest line.
//! Tiles are independent; a tile that degrades to background never stops
//! the run, and output already written is never touched again.

use crate::{burn::burn, source::FeatureSource, store::LabelStore};
use anyhow::{Context, Result};
use std::{
	fs::File,
	io::{BufWriter, Write},
};
use tilemask_core::{Cover, progress::ProgressBar};
use tilemask_geometry::LabelRaster;

/// Per-tile feature counts, one line per tile: `x,y,z  feature_count`.
pub const MANIFEST_FILENAME: &str = "instances.cover";

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

pub struct CoverWriter {
	source: Box<dyn FeatureSource>,
	store: LabelStore,
	source_srid: u32,
	tile_size: u32,
	burn_value: u8,
}

impl CoverWriter {
	pub fn new(
		source: Box<dyn FeatureSource>,
		store: LabelStore,
		source_srid: u32,
		tile_size: u32,
		burn_value: u8,
	) -> CoverWriter {
		CoverWriter {
			source,
			store,
			source_srid,
			tile_size,
			burn_value,
		}
	}

	/// Processes the whole cover; the manifest is complete and flushed when
	/// this returns.
	pub async fn write(&mut self, cover: &Cover) -> Result<()> {
		let manifest_path = self.store.root().join(MANIFEST_FILENAME);
		let file = File::create(&manifest_path)
			.with_context(|| format!("Failed to create manifest {manifest_path:?}"))?;
		let mut manifest = BufWriter::new(file);

		let mut progress = ProgressBar::new("rasterizing cover", cover.len() as u64);
		for tile in cover {
			let polygons = self.source.fetch(tile).await?;

			// burn success, not retrieval success, gates the reported count
			let (raster, feature_count) = if polygons.is_empty() {
				(LabelRaster::new(self.tile_size), 0)
			} else {
				match burn(tile, &polygons, self.source_srid, self.tile_size, self.burn_value) {
					Some(raster) => (raster, polygons.len()),
					None => (LabelRaster::new(self.tile_size), 0),
				}
			};

			self.store.write(tile, &raster)?;
			write!(manifest, "{},{},{}  {feature_count}{LINE_ENDING}", tile.x, tile.y, tile.z)?;
			progress.inc(1);
		}

		manifest.flush()?;
		progress.finish();
		Ok(())
	}
}
