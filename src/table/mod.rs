mod price_table;
mod snapshot;

pub use price_table::PriceTable;
pub use snapshot::{PriceTableSnapshot, PriceTableSnapshotPackage, SNAPSHOT_FORMAT_VERSION};
