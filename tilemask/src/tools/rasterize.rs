use crate::{
	config::ClassConfig,
	index::SpatialIndexBuilder,
	query::TileQuery,
	source::FeatureSource,
	store::LabelStore,
	writer::CoverWriter,
};
use anyhow::{Context, Result, bail, ensure};
use std::{fs, path::PathBuf};
use tilemask_core::Cover;
use tilemask_geometry::{GeoJsonDocument, proj::EPSG_WGS84};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// output directory path
	#[arg()]
	pub out: PathBuf,

	/// path to csv tiles cover file
	#[arg(long, value_name = "FILE")]
	pub cover: PathBuf,

	/// path to the classes config file
	#[arg(long, value_name = "FILE")]
	pub config: PathBuf,

	/// title of the class to rasterize (e.g. Building)
	#[arg(long = "type", value_name = "CLASS")]
	pub class_title: String,

	/// paths to GeoJSON feature files
	#[arg(long, value_name = "FILE", num_args = 1.., display_order = 1)]
	pub geojson: Vec<PathBuf>,

	/// PostgreSQL connection string (e.g. 'postgres://user@host/db')
	#[arg(long, value_name = "DSN", display_order = 1)]
	pub pg: Option<String>,

	/// SQL query returning geometry features (e.g. 'SELECT geom FROM table')
	#[arg(long, value_name = "SQL", display_order = 1)]
	pub sql: Option<String>,

	/// output tile size in pixels
	#[arg(long, value_name = "int", default_value_t = 512, display_order = 2)]
	pub ts: u32,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	// exactly one input path may be active
	if arguments.pg.is_some() && arguments.sql.is_none() {
		bail!("with a PostgreSQL db, --sql must be provided");
	}
	if arguments.sql.is_some() && arguments.pg.is_none() {
		bail!("--sql requires --pg");
	}
	match (arguments.pg.is_some(), arguments.geojson.is_empty()) {
		(true, false) => bail!("use either --pg or --geojson inputs, but only one at once"),
		(false, true) => bail!("either --pg or --geojson input is required"),
		_ => {}
	}
	ensure!(arguments.ts > 0, "tile size must be a positive number of pixels");

	let config = ClassConfig::from_path(&arguments.config)?;
	let burn_value = config
		.burn_value(&arguments.class_title)
		.context("the requested type is not rasterizable")?;

	let cover = Cover::from_path(&arguments.cover)?;
	fs::create_dir_all(&arguments.out)
		.with_context(|| format!("Failed to create output directory {:?}", arguments.out))?;

	let source: Box<dyn FeatureSource> = if let Some(dsn) = &arguments.pg {
		let base_sql = arguments.sql.as_deref().unwrap_or_default();
		Box::new(TileQuery::connect(dsn, base_sql).await?)
	} else {
		Box::new(build_index(arguments, &cover)?)
	};

	// both paths deliver geometries normalized to WGS84
	let store = LabelStore::new(arguments.out.clone(), config.palette());
	let mut writer = CoverWriter::new(source, store, EPSG_WGS84, arguments.ts, burn_value);
	writer.write(&cover).await?;

	log::info!(
		"rasterized {:?} on {} cover tiles into {:?}",
		arguments.class_title,
		cover.len(),
		arguments.out
	);
	Ok(())
}

fn build_index(arguments: &Subcommand, cover: &Cover) -> Result<crate::index::SpatialIndex> {
	let zoom = cover
		.uniform_zoom()
		.context("the vector-source path needs a single-zoom cover; use PostGIS instead")?;

	let mut builder = SpatialIndexBuilder::new(zoom);
	for path in &arguments.geojson {
		log::info!("indexing {path:?}");
		let document = GeoJsonDocument::from_path(path)?;
		builder.add_document(&document);
	}
	let index = builder.build();

	log::info!("spatial index covers {} tiles", index.tile_count());
	Ok(index)
}
