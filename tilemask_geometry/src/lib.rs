//! Geometry model and spatial math for the tilemask label pipeline:
//! surfacic geometries, GeoJSON parsing, reprojection, tile covering and
//! polygon rasterization.

mod covering;
mod geo;
pub mod geojson;
pub mod proj;
mod raster;

pub use covering::covering_tiles;
pub use geo::{Geometry, Polygon, Ring};
pub use geojson::{GeoFeature, GeoJsonDocument, parse_geometry, parse_geometry_str};
pub use raster::{LabelRaster, PixelTransform, rasterize_polygons};
