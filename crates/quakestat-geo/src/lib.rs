//! quakestat geo - Grid binning, geometry adaptation, and spatial aggregation
//!
//! This crate holds the geospatial operations: building the world grid,
//! turning coordinate tables into point features, buffering polygons, and
//! joining earthquake points onto country polygons.

pub mod adapter;
pub mod aggregate;
pub mod grid;
pub mod index;
pub mod spatial;

pub use adapter::{buffer_polygons, to_point_geometry};
pub use aggregate::{
    count_in_country_year, count_in_country_year_with, max_magnitude_per_country,
    max_magnitude_per_country_with, AggregateOptions, JoinPolicy, BORDER_LABEL_DEGREES,
};
pub use grid::{bin_id_for, build_world_grid, count_per_bin, grid_geo_table};
