pub mod loader;
pub mod topology;

pub use loader::{RawLineFile, RawRingLines, RawStationEntry, RawStationsFile, RawSynonymsFile};
pub use topology::Topology;
