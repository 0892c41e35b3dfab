//! Data ingestion

mod loader;

pub use loader::{CellValue, DataLoader};
