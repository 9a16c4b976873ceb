pub mod overlay;
pub mod raster;
pub mod scene;
