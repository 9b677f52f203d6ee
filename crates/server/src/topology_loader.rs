use std::path::Path;

use freifahren_catalog::CatalogClient;
use freifahren_core::FfError;
use freifahren_topology::{
    RawLineFile, RawRingLines, RawStationEntry, RawStationsFile, RawSynonymsFile, Topology,
};

/// Loads the three static topology files from `dir` (`lines.json`,
/// `stations.json`, `synonyms.json`) and builds the in-process `Topology`.
/// Any parse or invariant failure here is a startup-time programmer error
/// and aborts the process.
pub fn load_topology(dir: &Path, ring_lines: &RawRingLines) -> Result<Topology, FfError> {
    let lines: RawLineFile = read_json(&dir.join("lines.json"))?;
    let stations: RawStationsFile = read_json(&dir.join("stations.json"))?;
    let synonyms_path = dir.join("synonyms.json");
    let synonyms: RawSynonymsFile = if synonyms_path.exists() {
        read_json(&synonyms_path)?
    } else {
        RawSynonymsFile::new()
    };

    Topology::build(stations, lines, synonyms, ring_lines)
}

/// File-first topology load with a catalog fallback: when the local files
/// are absent, the station and line definitions are fetched from the
/// backend catalog instead. Synonyms stay file-only — the catalog does not
/// serve them.
pub async fn load_topology_with_fallback(
    dir: &Path,
    ring_lines: &RawRingLines,
    catalog: &CatalogClient,
) -> Result<Topology, FfError> {
    match load_topology(dir, ring_lines) {
        Ok(topology) => Ok(topology),
        Err(FfError::Io(err)) => {
            tracing::info!(
                error = %err,
                dir = %dir.display(),
                "topology files unavailable, fetching definitions from the backend catalog"
            );
            let lines: RawLineFile = catalog
                .lines()
                .await
                .map_err(|e| FfError::Other(format!("catalog lines fetch failed: {e}")))?;
            let stations: RawStationsFile = catalog
                .stations()
                .await
                .map_err(|e| FfError::Other(format!("catalog stations fetch failed: {e}")))?
                .into_iter()
                .map(|(id, record)| {
                    (
                        id,
                        RawStationEntry {
                            name: record.name,
                            coordinates: record.coordinates,
                            lines: record.lines,
                        },
                    )
                })
                .collect();
            let synonyms_path = dir.join("synonyms.json");
            let synonyms: RawSynonymsFile = if synonyms_path.exists() {
                read_json(&synonyms_path)?
            } else {
                RawSynonymsFile::new()
            };
            Topology::build(stations, lines, synonyms, ring_lines)
        }
        Err(err) => Err(err),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, FfError> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}
