//! Writing label rasters as `<root>/<z>/<x>/<y>.png`.
//!
//! The directory layout is the usual slippy-map convention, so label tiles
//! line up file-for-file with the imagery tiles they annotate. Class
//! indices are colorized through the palette of the class table.

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use std::{
	fs,
	path::{Path, PathBuf},
};
use tilemask_core::TileCoord;
use tilemask_geometry::LabelRaster;

pub struct LabelStore {
	root: PathBuf,
	palette: Vec<[u8; 3]>,
}

impl LabelStore {
	pub fn new(root: PathBuf, palette: Vec<[u8; 3]>) -> LabelStore {
		LabelStore { root, palette }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Writes one tile, creating the `z/x/` directories as needed.
	pub fn write(&self, tile: &TileCoord, raster: &LabelRaster) -> Result<PathBuf> {
		let path = self
			.root
			.join(tile.z.to_string())
			.join(tile.x.to_string())
			.join(format!("{}.png", tile.y));

		if let Some(parent) = path.parent()
			&& !parent.exists()
		{
			fs::create_dir_all(parent)?;
		}

		let size = raster.size();
		let image = RgbImage::from_fn(size, size, |x, y| {
			let class = raster.get(x, y) as usize;
			Rgb(self.palette.get(class).copied().unwrap_or([0, 0, 0]))
		});
		image
			.save(&path)
			.with_context(|| format!("Failed to write label tile {path:?}"))?;

		Ok(path)
	}
}
