use anyhow::{Context, Result, anyhow, ensure};
use std::{fs, path::{Path, PathBuf}};
use tilemask_core::{Cover, TileCoord, progress::ProgressBar};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// path to XYZ tiles input dir
	#[arg(long, value_name = "DIR")]
	pub dir: PathBuf,

	/// path to csv cover file to filter dir by
	#[arg(long, value_name = "FILE")]
	pub cover: PathBuf,

	/// move tiles from input to output instead of copying
	#[arg(long = "move", conflicts_with = "delete")]
	pub move_tiles: bool,

	/// delete tiles listed in the cover
	#[arg(long)]
	pub delete: bool,

	/// output dir path (required for copy or move)
	#[arg()]
	pub out: Option<PathBuf>,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	ensure!(
		arguments.out.is_some() || arguments.delete,
		"out parameter is required"
	);

	let cover = Cover::from_path(&arguments.cover)?;
	let mut progress = ProgressBar::new("subsetting tiles", cover.len() as u64);

	for tile in &cover {
		let src = find_tile_file(&arguments.dir, tile)?;

		if arguments.delete {
			fs::remove_file(&src).with_context(|| format!("Failed to delete {src:?}"))?;
		} else {
			let out = arguments.out.as_ref().unwrap();
			let dst_dir = out.join(tile.z.to_string()).join(tile.x.to_string());
			if !dst_dir.is_dir() {
				fs::create_dir_all(&dst_dir)?;
			}
			let dst = dst_dir.join(src.file_name().unwrap());

			if arguments.move_tiles {
				fs::rename(&src, &dst).with_context(|| format!("Failed to move {src:?} to {dst:?}"))?;
			} else {
				fs::copy(&src, &dst).with_context(|| format!("Failed to copy {src:?} to {dst:?}"))?;
			}
		}
		progress.inc(1);
	}
	progress.finish();

	Ok(())
}

/// Locates the tile's file in the slippy map dir, whatever its extension.
fn find_tile_file(dir: &Path, tile: &TileCoord) -> Result<PathBuf> {
	let tile_dir = dir.join(tile.z.to_string()).join(tile.x.to_string());
	let stem = tile.y.to_string();

	let entries =
		fs::read_dir(&tile_dir).with_context(|| format!("no tile directory {tile_dir:?}"))?;
	for entry in entries {
		let path = entry?.path();
		if path.is_file() && path.file_stem().is_some_and(|s| *s == *stem.as_str()) {
			return Ok(path);
		}
	}
	Err(anyhow!("no tile file for {tile} in {tile_dir:?}"))
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_fs::prelude::*;

	fn fixture() -> (assert_fs::TempDir, PathBuf, PathBuf) {
		let temp_dir = assert_fs::TempDir::new().unwrap();
		temp_dir.child("tiles/14/8192/5461.png").write_str("a").unwrap();
		temp_dir.child("tiles/14/8192/5462.png").write_str("b").unwrap();
		temp_dir.child("cover.csv").write_str("8192,5461,14\n").unwrap();
		let dir = temp_dir.path().join("tiles");
		let cover = temp_dir.path().join("cover.csv");
		(temp_dir, dir, cover)
	}

	#[test]
	fn copy_keeps_source() {
		let (temp_dir, dir, cover) = fixture();
		let out = temp_dir.path().join("out");

		run(&Subcommand {
			dir: dir.clone(),
			cover,
			move_tiles: false,
			delete: false,
			out: Some(out.clone()),
		})
		.unwrap();

		assert!(out.join("14/8192/5461.png").is_file());
		assert!(!out.join("14/8192/5462.png").exists()); // not in the cover
		assert!(dir.join("14/8192/5461.png").is_file());
	}

	#[test]
	fn move_removes_source() {
		let (temp_dir, dir, cover) = fixture();
		let out = temp_dir.path().join("out");

		run(&Subcommand {
			dir: dir.clone(),
			cover,
			move_tiles: true,
			delete: false,
			out: Some(out.clone()),
		})
		.unwrap();

		assert!(out.join("14/8192/5461.png").is_file());
		assert!(!dir.join("14/8192/5461.png").exists());
	}

	#[test]
	fn delete_needs_no_out() {
		let (_temp_dir, dir, cover) = fixture();

		run(&Subcommand {
			dir: dir.clone(),
			cover,
			move_tiles: false,
			delete: true,
			out: None,
		})
		.unwrap();

		assert!(!dir.join("14/8192/5461.png").exists());
		assert!(dir.join("14/8192/5462.png").is_file());
	}

	#[test]
	fn copy_without_out_fails() {
		let (_temp_dir, dir, cover) = fixture();

		let err = run(&Subcommand {
			dir,
			cover,
			move_tiles: false,
			delete: false,
			out: None,
		})
		.unwrap_err();
		assert!(err.to_string().contains("out parameter"));
	}

	#[test]
	fn missing_tile_fails() {
		let (temp_dir, dir, _cover) = fixture();
		temp_dir.child("cover2.csv").write_str("1,1,14\n").unwrap();

		let err = run(&Subcommand {
			dir,
			cover: temp_dir.path().join("cover2.csv"),
			move_tiles: false,
			delete: false,
			out: Some(temp_dir.path().join("out")),
		})
		.unwrap_err();
		assert!(err.to_string().contains("no tile"));
	}
}
