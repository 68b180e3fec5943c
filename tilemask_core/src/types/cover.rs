use crate::TileCoord;
use anyhow::{Context, Result, ensure};
use std::{fs::File, io::Read, path::Path, slice};

/// An ordered list of tiles describing the area of interest, loaded from a
/// `x,y,z` CSV file.
///
/// The order of the file is preserved; it is the order tiles are processed
/// and recorded in.
#[derive(Clone, Debug, PartialEq)]
pub struct Cover {
	tiles: Vec<TileCoord>,
}

impl Cover {
	pub fn from_path(path: &Path) -> Result<Cover> {
		let file = File::open(path).with_context(|| format!("Failed to open cover file {path:?}"))?;
		Self::from_reader(file).with_context(|| format!("Failed to read cover file {path:?}"))
	}

	pub fn from_reader(reader: impl Read) -> Result<Cover> {
		let mut csv_reader = csv::ReaderBuilder::new()
			.has_headers(false)
			.trim(csv::Trim::All)
			.from_reader(reader);

		let mut tiles = Vec::new();
		for (index, record) in csv_reader.records().enumerate() {
			let record = record?;
			ensure!(
				record.len() == 3,
				"cover line {}: expected 3 fields (x,y,z), got {}",
				index + 1,
				record.len()
			);
			let x = record[0].parse::<u32>().with_context(|| format!("cover line {}: invalid x", index + 1))?;
			let y = record[1].parse::<u32>().with_context(|| format!("cover line {}: invalid y", index + 1))?;
			let z = record[2].parse::<u8>().with_context(|| format!("cover line {}: invalid z", index + 1))?;
			tiles.push(TileCoord::new(x, y, z).with_context(|| format!("cover line {}", index + 1))?);
		}
		ensure!(!tiles.is_empty(), "cover is empty");

		Ok(Cover { tiles })
	}

	pub fn len(&self) -> usize {
		self.tiles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tiles.is_empty()
	}

	pub fn iter(&self) -> slice::Iter<'_, TileCoord> {
		self.tiles.iter()
	}

	/// The single zoom level shared by every tile of the cover.
	///
	/// Fails if the cover mixes zoom levels; the vector-source path requires
	/// a uniform zoom.
	pub fn uniform_zoom(&self) -> Result<u8> {
		let zoom = self.tiles[0].z;
		ensure!(
			self.tiles.iter().all(|tile| tile.z == zoom),
			"cover mixes zoom levels (found {} and {})",
			zoom,
			self.tiles.iter().find(|tile| tile.z != zoom).unwrap().z
		);
		Ok(zoom)
	}
}

impl<'a> IntoIterator for &'a Cover {
	type Item = &'a TileCoord;
	type IntoIter = slice::Iter<'a, TileCoord>;

	fn into_iter(self) -> Self::IntoIter {
		self.tiles.iter()
	}
}
