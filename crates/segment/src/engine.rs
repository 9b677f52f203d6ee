use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use freifahren_core::{ChannelConstants, DecayConstants, Report, SegmentRisk};
use freifahren_topology::Topology;

use crate::decay::{spatial_decay, temporal_decay};
use crate::quantize::quantize;

/// Scores every topology segment from the live report set: a pure function
/// of `(reports, topology, t_now)`. Holds no mutable state of its own —
/// the decay constants are the only configuration it needs.
#[derive(Debug, Clone)]
pub struct RiskEngine {
    decay: DecayConstants,
}

impl RiskEngine {
    pub fn new(decay: DecayConstants) -> Self {
        Self { decay }
    }

    /// Returns `sid -> "#RRGGBB"` for every segment whose color is not
    /// green. Never panics: malformed reports are silently degraded to
    /// whatever subset of their fields is usable.
    pub fn predict(
        &self,
        topology: &Topology,
        reports: &[Report],
        t_now: DateTime<Utc>,
    ) -> BTreeMap<String, String> {
        let mut risks: BTreeMap<usize, SegmentRisk> = BTreeMap::new();

        for report in reports {
            self.accumulate_report(topology, report, t_now, &mut risks);
        }

        let propagated = self.propagate_colocation(topology, risks);

        let colors: BTreeMap<String, String> = propagated
            .into_iter()
            .filter_map(|(idx, risk)| {
                let color = quantize(risk);
                if color.is_green() {
                    None
                } else {
                    Some((topology.segments()[idx].sid(), color.hex().to_string()))
                }
            })
            .collect();
        tracing::debug!(reports = reports.len(), colored_segments = colors.len(), "risk prediction computed");
        colors
    }

    fn accumulate_report(
        &self,
        topology: &Topology,
        report: &Report,
        t_now: DateTime<Utc>,
        risks: &mut BTreeMap<usize, SegmentRisk>,
    ) {
        let delta_s = (t_now - report.timestamp).num_seconds() as f64;
        if delta_s < 0.0 {
            return;
        }

        let direct_base = if report.has_direction() { 0.8 } else { 0.0 };
        let bidirect_base = {
            let base = if report.has_direction() { 0.2 } else { 1.0 };
            if report.is_multi_line() {
                base * 0.2
            } else {
                base
            }
        };

        for line_id in &report.lines {
            // A line absent from the topology is silently dropped:
            // `segments_on_line` returns an empty slice for it.
            let segment_idxs = topology.segments_on_line(line_id);
            if segment_idxs.is_empty() {
                continue;
            }

            let anchor_rank = report
                .station_id
                .as_ref()
                .and_then(|sid| topology.anchor_rank(line_id, sid));

            let line_base = if report.station_id.is_none() || anchor_rank.is_none() {
                0.1
            } else {
                0.05
            };

            match anchor_rank {
                Some(anchor) => {
                    for &idx in segment_idxs {
                        let segment = &topology.segments()[idx];
                        let distance = segment.rank as i64 - anchor as i64;
                        let entry = risks.entry(idx).or_default();

                        entry.add_direct(
                            direct_base
                                * temporal_decay(delta_s, &self.decay.direct.temporal)
                                * spatial(distance, &self.decay.direct),
                        );
                        entry.add_bidirect(
                            bidirect_base
                                * temporal_decay(delta_s, &self.decay.bidirect.temporal)
                                * spatial(distance, &self.decay.bidirect),
                        );
                        entry.add_line(
                            line_base
                                * temporal_decay(delta_s, &self.decay.line.temporal)
                                * spatial(distance, &self.decay.line),
                        );
                    }
                }
                None => {
                    // No valid anchor on this line: only the line-wide
                    // channel applies, uniformly, with no spatial falloff.
                    let f_t = temporal_decay(delta_s, &self.decay.line.temporal);
                    for &idx in segment_idxs {
                        risks.entry(idx).or_default().add_line(line_base * f_t);
                    }
                }
            }
        }
    }

    /// Every segment with a given unordered endpoint pair receives the max
    /// risk among all segments sharing that pair — a sighting on one
    /// physical track affects every line running over it.
    fn propagate_colocation(
        &self,
        topology: &Topology,
        risks: BTreeMap<usize, SegmentRisk>,
    ) -> BTreeMap<usize, f64> {
        let mut totals: BTreeMap<usize, f64> = (0..topology.segments().len())
            .map(|idx| (idx, risks.get(&idx).map(SegmentRisk::total).unwrap_or(0.0)))
            .collect();

        for (&idx, &own) in totals.clone().iter() {
            let segment = &topology.segments()[idx];
            let best = topology
                .colocated(segment)
                .iter()
                .map(|&other| totals[&other])
                .fold(own, f64::max);
            totals.insert(idx, best);
        }
        totals
    }
}

fn spatial(distance: i64, channel: &ChannelConstants) -> f64 {
    spatial_decay(distance, &channel.spatial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use freifahren_core::{Coordinates, LineId, StationId};
    use freifahren_topology::{RawLineFile, RawRingLines, RawStationEntry, RawStationsFile, RawSynonymsFile};

    fn station(name: &str, line: &str) -> RawStationEntry {
        RawStationEntry {
            name: name.to_string(),
            coordinates: Coordinates { latitude: 0.0, longitude: 0.0 },
            lines: vec![line.to_string()],
        }
    }

    fn long_line_topology() -> Topology {
        let mut stations = RawStationsFile::new();
        let names = ["a", "b", "c", "d", "e", "f", "g", "h"];
        for n in names {
            stations.insert(n.to_string(), station(n, "U8"));
        }
        let mut lines = RawLineFile::new();
        lines.insert("U8".to_string(), names.iter().map(|s| s.to_string()).collect());
        Topology::build(stations, lines, RawSynonymsFile::new(), &RawRingLines::default()).unwrap()
    }

    fn sample_report(station_id: &str, direction: Option<&str>, t: DateTime<Utc>) -> Report {
        Report {
            station_id: Some(StationId::new(station_id)),
            timestamp: t,
            direction_id: direction.map(StationId::new),
            lines: vec![LineId::new("U8")],
        }
    }

    #[test]
    fn empty_reports_yield_empty_map() {
        let topo = long_line_topology();
        let engine = RiskEngine::new(DecayConstants::default());
        let colors = engine.predict(&topo, &[], Utc::now());
        assert!(colors.is_empty());
    }

    #[test]
    fn fresh_directed_report_colors_its_own_segment_and_fades_with_distance() {
        let topo = long_line_topology();
        let engine = RiskEngine::new(DecayConstants::default());
        let now = DateTime::<Utc>::from_timestamp(1_000_000, 0).unwrap();
        let report = sample_report("a", Some("h"), now);
        let colors = engine.predict(&topo, &[report], now);

        let near_sid = topo.segments()[0].sid();
        assert!(colors.contains_key(&near_sid));

        let far_idx = topo.segments().len() - 1;
        let far_sid = topo.segments()[far_idx].sid();
        assert!(!colors.contains_key(&far_sid));
    }

    #[test]
    fn two_reports_one_hour_apart_sum_higher_than_either_alone() {
        let topo = long_line_topology();
        let engine = RiskEngine::new(DecayConstants::default());
        let now = DateTime::<Utc>::from_timestamp(10_000, 0).unwrap();
        let hour_ago = now - chrono::Duration::hours(1);

        let single = engine.predict(&topo, &[sample_report("a", None, now)], now);
        let double = engine.predict(
            &topo,
            &[sample_report("a", None, now), sample_report("a", None, hour_ago)],
            now,
        );

        let sid = topo.segments()[0].sid();
        assert!(single.contains_key(&sid));
        assert!(double.contains_key(&sid));
    }

    #[test]
    fn colocated_segments_share_color() {
        let mut stations = RawStationsFile::new();
        stations.insert("a".into(), station("a", "U1"));
        stations.insert("b".into(), station("b", "U1"));
        stations.get_mut("a").unwrap().lines.push("U2".to_string());
        stations.get_mut("b").unwrap().lines.push("U2".to_string());

        let mut lines = RawLineFile::new();
        lines.insert("U1".into(), vec!["a".into(), "b".into()]);
        lines.insert("U2".into(), vec!["a".into(), "b".into()]);
        let topo = Topology::build(stations, lines, RawSynonymsFile::new(), &RawRingLines::default()).unwrap();

        let engine = RiskEngine::new(DecayConstants::default());
        let now = Utc::now();
        let report = Report {
            station_id: Some(StationId::new("a")),
            timestamp: now,
            direction_id: Some(StationId::new("b")),
            lines: vec![LineId::new("U1")],
        };
        let colors = engine.predict(&topo, &[report], now);

        let sid_u1 = topo.segments().iter().find(|s| s.line_id == LineId::new("U1")).unwrap().sid();
        let sid_u2 = topo.segments().iter().find(|s| s.line_id == LineId::new("U2")).unwrap().sid();
        assert_eq!(colors.get(&sid_u1), colors.get(&sid_u2));
    }

    #[test]
    fn report_order_does_not_change_the_output() {
        let topo = long_line_topology();
        let engine = RiskEngine::new(DecayConstants::default());
        let now = DateTime::<Utc>::from_timestamp(1_000_000, 0).unwrap();
        let reports = vec![
            sample_report("a", Some("h"), now),
            sample_report("d", None, now - chrono::Duration::minutes(10)),
            sample_report("g", None, now - chrono::Duration::minutes(30)),
        ];
        let mut shuffled = reports.clone();
        shuffled.reverse();
        shuffled.swap(0, 1);

        assert_eq!(
            engine.predict(&topo, &reports, now),
            engine.predict(&topo, &shuffled, now)
        );
    }

    #[test]
    fn unknown_line_in_report_is_silently_dropped() {
        let topo = long_line_topology();
        let engine = RiskEngine::new(DecayConstants::default());
        let now = Utc::now();
        let report = Report {
            station_id: Some(StationId::new("a")),
            timestamp: now,
            direction_id: None,
            lines: vec![LineId::new("U999")],
        };
        let colors = engine.predict(&topo, &[report], now);
        assert!(colors.is_empty());
    }
}
