mod cover;
mod geo_bbox;
mod tile_coord;

pub use cover::Cover;
pub use geo_bbox::GeoBBox;
pub use tile_coord::{MAX_ZOOM, TileCoord};
