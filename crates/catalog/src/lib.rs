pub mod client;
pub mod error;
pub mod model;

pub use client::CatalogClient;
pub use error::CatalogError;
pub use model::{LookupResult, RawLinesResponse, RawStationRecord, RawStationsResponse};
