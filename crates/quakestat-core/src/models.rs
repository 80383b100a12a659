pub mod bin;
pub mod crs;
pub mod geo_table;
pub mod table;
pub mod value;

pub use bin::Bin;
pub use crs::Crs;
pub use geo_table::GeoTable;
pub use table::Table;
pub use value::Value;
