pub mod candidate;
pub mod config;
pub mod error;
pub mod ids;
pub mod line;
pub mod report;
pub mod risk;
pub mod segment;
pub mod station;
pub mod synonym;

pub use candidate::Candidate;
pub use config::{
    ChannelConstants, Config, DecayConstants, RiskConfig, SpatialDecayParams, TemporalDecayParams,
};
pub use error::FfError;
pub use ids::{LineId, StationId};
pub use line::{Line, LineKind};
pub use report::Report;
pub use risk::SegmentRisk;
pub use segment::Segment;
pub use station::{Coordinates, Station};
pub use synonym::SynonymTable;
