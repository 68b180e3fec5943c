//! Run configuration: the ordered class table.
//!
//! The config file is YAML:
//!
//! ```yaml
//! classes:
//!   - title: Background
//!     color: "#ffffff"
//!   - title: Building
//!     color: "#e53935"
//! ```
//!
//! The burn value for a run is the 0-based index of the class matching the
//! requested title; a missing title fails the run before any tile is
//! processed.

use anyhow::{Context, Result, anyhow, bail, ensure};
use itertools::Itertools;
use serde::Deserialize;
use std::{fs::File, io::{BufReader, Read}, path::Path};

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Class {
	pub title: String,
	pub color: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ClassConfig {
	pub classes: Vec<Class>,
}

impl ClassConfig {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		let config: ClassConfig = serde_yaml_ng::from_reader(reader)?;
		config.checked()
	}

	pub fn from_string(text: &str) -> Result<Self> {
		let config: ClassConfig = serde_yaml_ng::from_str(text)?;
		config.checked()
	}

	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("Failed to open config file {path:?}"))?;
		Self::from_reader(BufReader::new(file)).with_context(|| format!("Failed to parse config file {path:?}"))
	}

	fn checked(self) -> Result<Self> {
		ensure!(!self.classes.is_empty(), "config must define at least one class");
		if let Some(duplicate) = self.classes.iter().map(|class| &class.title).duplicates().next() {
			bail!("class title {duplicate:?} is not unique");
		}
		for class in &self.classes {
			parse_color(&class.color)
				.with_context(|| format!("class {:?} has an invalid color", class.title))?;
		}
		Ok(self)
	}

	/// The 0-based class index to burn for the requested title.
	pub fn burn_value(&self, title: &str) -> Result<u8> {
		let index = self
			.classes
			.iter()
			.position(|class| class.title == title)
			.ok_or_else(|| anyhow!("class {title:?} is not defined in the config"))?;
		u8::try_from(index).context("class table too large for a single-byte label")
	}

	/// RGB palette in class order, used to colorize label tiles.
	pub fn palette(&self) -> Vec<[u8; 3]> {
		self
			.classes
			.iter()
			.map(|class| parse_color(&class.color).unwrap_or([0, 0, 0]))
			.collect()
	}
}

fn parse_color(color: &str) -> Result<[u8; 3]> {
	let hex = color.strip_prefix('#').unwrap_or(color);
	ensure!(hex.len() == 6, "color {color:?} must be 6 hex digits");
	let channel = |range| u8::from_str_radix(&hex[range], 16).with_context(|| format!("color {color:?}"));
	Ok([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}
