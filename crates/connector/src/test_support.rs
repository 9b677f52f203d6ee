//! Small fixture topology shared by this crate's unit tests. Not the real
//! Berlin dataset (topology files are a startup input produced by an
//! external data-prep pipeline) — just enough lines and stations to
//! exercise the detection algorithms end to end.
#![cfg(test)]

use std::collections::BTreeSet;

use freifahren_core::Coordinates;
use freifahren_topology::{RawLineFile, RawRingLines, RawStationEntry, RawStationsFile, RawSynonymsFile, Topology};

fn station(name: &str, lines: &[&str]) -> RawStationEntry {
    RawStationEntry {
        name: name.to_string(),
        coordinates: Coordinates { latitude: 0.0, longitude: 0.0 },
        lines: lines.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn fixture_topology() -> Topology {
    let mut stations = RawStationsFile::new();
    stations.insert("alt-mariendorf".into(), station("Alt-Mariendorf", &["U6"]));
    stations.insert("mehringdamm".into(), station("Mehringdamm", &["U6"]));
    stations.insert("naturkundemuseum".into(), station("Naturkundemuseum", &["U6"]));
    stations.insert("alt-tegel".into(), station("Alt-Tegel", &["U6"]));

    stations.insert("wittenau".into(), station("Wittenau", &["U8"]));
    stations.insert("pankstrasse".into(), station("Pankstraße", &["U8"]));
    stations.insert("hermannplatz".into(), station("Hermannplatz", &["U8"]));
    stations.insert("hermannstrasse".into(), station("Hermannstraße", &["U8"]));

    stations.insert("osloerstrasse".into(), station("Osloerstraße", &["U9"]));
    stations.insert("pankow".into(), station("Pankow", &["U9"]));
    stations.insert("hansaplatz".into(), station("Hansaplatz", &["U9"]));
    stations.insert("rathaus-steglitz".into(), station("Rathaus Steglitz", &["U9"]));

    stations.insert("tempelhof".into(), station("Tempelhof", &["S41"]));
    stations.insert("neukoelln".into(), station("Neukölln", &["S41"]));
    stations.insert("ostkreuz".into(), station("Ostkreuz", &["S41"]));
    stations.insert("westend".into(), station("Westend", &["S41"]));

    stations.insert("zoologischer-garten".into(), station("Zoologischer Garten", &["S9"]));
    stations.insert("rathaus-steglitz-s9".into(), station("Rathaus Steglitz Süd", &["S9"]));

    stations.insert("am-kupfergraben".into(), station("Am Kupfergraben", &["12"]));
    stations.insert("pasedagplatz".into(), station("Pasedagplatz", &["12"]));

    let mut lines = RawLineFile::new();
    lines.insert(
        "U6".into(),
        vec!["alt-mariendorf", "mehringdamm", "naturkundemuseum", "alt-tegel"]
            .into_iter()
            .map(String::from)
            .collect(),
    );
    lines.insert(
        "U8".into(),
        vec!["wittenau", "pankstrasse", "hermannplatz", "hermannstrasse"]
            .into_iter()
            .map(String::from)
            .collect(),
    );
    lines.insert(
        "U9".into(),
        vec!["osloerstrasse", "pankow", "hansaplatz", "rathaus-steglitz"]
            .into_iter()
            .map(String::from)
            .collect(),
    );
    lines.insert(
        "S41".into(),
        vec!["tempelhof", "neukoelln", "ostkreuz", "westend"]
            .into_iter()
            .map(String::from)
            .collect(),
    );
    lines.insert(
        "S9".into(),
        vec!["zoologischer-garten", "rathaus-steglitz-s9"]
            .into_iter()
            .map(String::from)
            .collect(),
    );
    lines.insert(
        "12".into(),
        vec!["am-kupfergraben", "pasedagplatz"]
            .into_iter()
            .map(String::from)
            .collect(),
    );

    let mut synonyms = RawSynonymsFile::new();
    synonyms.insert("Zoologischer Garten".into(), BTreeSet::from(["zoo".to_string()]));
    synonyms.insert("Osloerstraße".into(), BTreeSet::from(["osloer".to_string(), "osloer straße".to_string()]));
    synonyms.insert("Rathaus Steglitz".into(), BTreeSet::from(["steglitz".to_string()]));
    synonyms.insert("Mehringdamm".into(), BTreeSet::new());

    Topology::build(stations, lines, synonyms, &RawRingLines::default()).expect("fixture topology builds")
}
