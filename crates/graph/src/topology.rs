use std::collections::{BTreeMap, BTreeSet, HashMap};

use freifahren_core::{FfError, Line, LineId, LineKind, Segment, Station, StationId, SynonymTable};

use crate::loader::{RawLineFile, RawRingLines, RawStationsFile, RawSynonymsFile};

/// The static transit network: stations, lines, synonyms and segments,
/// loaded once at startup and immutable thereafter. Segments are kept as a
/// flat vector with two precomputed indices rather than a general graph
/// structure — `line_index` for per-line traversal in rank order,
/// `colocation_index` for overlap propagation in the risk engine.
///
/// Stations and lines live in sorted maps so that every iteration-order-
/// dependent choice downstream (candidate pools, first-match-wins ties)
/// is reproducible across process restarts.
#[derive(Debug)]
pub struct Topology {
    stations: BTreeMap<StationId, Station>,
    lines: BTreeMap<LineId, Line>,
    synonyms: SynonymTable,
    segments: Vec<Segment>,
    line_index: HashMap<LineId, Vec<usize>>,
    colocation_index: HashMap<(StationId, StationId), Vec<usize>>,
}

impl Topology {
    /// Builds a topology from already-parsed raw files, validating all
    /// cross-references up-front. Any violation is a programmer error in
    /// the data-prep pipeline and is surfaced as
    /// `FfError::TopologyInvariant` for the caller to treat as fatal.
    pub fn build(
        raw_stations: RawStationsFile,
        raw_lines: RawLineFile,
        raw_synonyms: RawSynonymsFile,
        ring_lines: &RawRingLines,
    ) -> Result<Self, FfError> {
        let mut lines = BTreeMap::new();
        for (line_id_str, station_ids) in &raw_lines {
            let line_id = LineId::new(line_id_str.clone());
            if station_ids.len() < 2 {
                return Err(FfError::TopologyInvariant(format!(
                    "line {line_id} has fewer than two stations"
                )));
            }
            let kind = if ring_lines.0.contains(&line_id) {
                LineKind::Ring
            } else {
                LineKind::Standard
            };
            lines.insert(
                line_id.clone(),
                Line {
                    line_id,
                    kind,
                    stations: station_ids.iter().map(|s| StationId::new(s.clone())).collect(),
                },
            );
        }

        let mut stations = BTreeMap::new();
        for (station_id_str, entry) in &raw_stations {
            let station_id = StationId::new(station_id_str.clone());
            let station_lines: BTreeSet<LineId> =
                entry.lines.iter().map(|l| LineId::new(l.clone())).collect();
            for line_id in &station_lines {
                if !lines.contains_key(line_id) {
                    return Err(FfError::TopologyInvariant(format!(
                        "station {station_id} references unknown line {line_id}"
                    )));
                }
            }
            stations.insert(
                station_id.clone(),
                Station {
                    station_id,
                    name: entry.name.clone(),
                    coordinates: entry.coordinates,
                    lines: station_lines,
                },
            );
        }

        let mut synonyms = SynonymTable::new();
        for (canonical_name, alt_spellings) in &raw_synonyms {
            let canonical_id = stations
                .values()
                .find(|s| &s.name == canonical_name)
                .map(|s| s.station_id.clone())
                .ok_or_else(|| {
                    FfError::TopologyInvariant(format!(
                        "synonym table references unknown station name '{canonical_name}'"
                    ))
                })?;
            for alt in alt_spellings {
                synonyms.insert(alt, canonical_id.clone());
            }
        }

        let mut segments = Vec::new();
        let mut line_index: HashMap<LineId, Vec<usize>> = HashMap::new();
        let mut colocation_index: HashMap<(StationId, StationId), Vec<usize>> = HashMap::new();

        for line in lines.values() {
            let mut idxs = Vec::with_capacity(line.stations.len().saturating_sub(1));
            for (rank, pair) in line.stations.windows(2).enumerate() {
                let segment = Segment {
                    line_id: line.line_id.clone(),
                    from_station_id: pair[0].clone(),
                    to_station_id: pair[1].clone(),
                    rank,
                };
                let idx = segments.len();
                colocation_index
                    .entry(segment.endpoint_key())
                    .or_default()
                    .push(idx);
                segments.push(segment);
                idxs.push(idx);
            }
            line_index.insert(line.line_id.clone(), idxs);
        }

        tracing::debug!(
            stations = stations.len(),
            lines = lines.len(),
            segments = segments.len(),
            "topology built"
        );
        Ok(Self {
            stations,
            lines,
            synonyms,
            segments,
            line_index,
            colocation_index,
        })
    }

    pub fn station(&self, id: &StationId) -> Option<&Station> {
        self.stations.get(id)
    }

    pub fn line(&self, id: &LineId) -> Option<&Line> {
        self.lines.get(id)
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.values()
    }

    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Segment indices on `line_id`, sorted by rank.
    pub fn segments_on_line(&self, line_id: &LineId) -> &[usize] {
        self.line_index.get(line_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Indices of every segment colocated with the given one (sharing the
    /// same unordered endpoint pair), excluding none — the segment itself
    /// is included.
    pub fn colocated(&self, segment: &Segment) -> &[usize] {
        self.colocation_index
            .get(&segment.endpoint_key())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Rank of the first (in rank order) segment on `line_id` whose
    /// endpoints include `station_id`, used as the anchor a report's
    /// spatial falloff is measured from.
    pub fn anchor_rank(&self, line_id: &LineId, station_id: &StationId) -> Option<usize> {
        self.segments_on_line(line_id)
            .iter()
            .map(|&idx| &self.segments[idx])
            .find(|seg| seg.has_endpoint(station_id))
            .map(|seg| seg.rank)
    }

    /// Lines a station lies on, empty if the station is unknown.
    pub fn lines_for_station(&self, station_id: &StationId) -> BTreeSet<LineId> {
        self.stations
            .get(station_id)
            .map(|s| s.lines.clone())
            .unwrap_or_default()
    }

    /// Candidate pool for station detection: all stations on `line_id`
    /// if given, else every station in the topology.
    pub fn station_pool(&self, line_id: Option<&LineId>) -> Vec<&Station> {
        match line_id {
            Some(line_id) => self
                .stations
                .values()
                .filter(|s| s.serves(line_id))
                .collect(),
            None => self.stations.values().collect(),
        }
    }
}
