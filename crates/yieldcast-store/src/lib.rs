//! Historical observation storage for yieldcast.
//!
//! - [`RecordStore`]: immutable, ordered records with sorted area/crop sets.
//! - [`loader`]: CSV parsing with per-row recovery and a sentinel-default table.
//! - [`synthetic`]: seeded demo dataset used when no source is readable.

pub mod loader;
pub mod record_store;
pub mod synthetic;

pub use loader::{LoadReport, RowRejection, load_csv_path, load_csv_str, parse_csv_line};
pub use record_store::{DataSource, RecordStore};
pub use synthetic::{DEMO_AREAS, DEMO_CROPS, DEMO_YEARS, demo_records};
