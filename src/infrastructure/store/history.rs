//! Flat-file JSON store for rate history and run-to-run state.
//!
//! Reads degrade: a missing or unparseable file is treated as empty state and
//! logged, so a corrupted data directory never blocks a collection run.
//! Writes propagate errors because losing an observation is worth failing for.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::shared::errors::StoreError;
use crate::shared::types::{MarketSnapshot, RateMap, RateObservation};

const HISTORY_FILE: &str = "history.json";
const MARKET_HISTORY_FILE: &str = "market_rates_history.json";
const LAST_RATES_FILE: &str = "last_rates.json";

pub struct HistoryStore {
    data_dir: PathBuf,
}

impl HistoryStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn read_json<T: DeserializeOwned + Default>(&self, file: &str) -> T {
        let path = self.data_dir.join(file);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => {
                debug!("No {} yet, starting from empty state", file);
                return T::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                warn!("Could not parse {}: {}. Treating as empty.", file, e);
                T::default()
            }
        }
    }

    fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir).map_err(|e| StoreError::Io(e.to_string()))?;
        let content =
            serde_json::to_string_pretty(value).map_err(|e| StoreError::Serialize(e.to_string()))?;
        fs::write(self.data_dir.join(file), content).map_err(|e| StoreError::Io(e.to_string()))
    }

    pub fn load_history(&self) -> Vec<RateObservation> {
        self.read_json(HISTORY_FILE)
    }

    pub fn append_history(&self, observation: RateObservation) -> Result<(), StoreError> {
        let mut history = self.load_history();
        history.push(observation);
        self.write_json(HISTORY_FILE, &history)
    }

    pub fn load_market_history(&self) -> Vec<MarketSnapshot> {
        self.read_json(MARKET_HISTORY_FILE)
    }

    pub fn append_market_snapshot(&self, snapshot: MarketSnapshot) -> Result<(), StoreError> {
        let mut history = self.load_market_history();
        history.push(snapshot);
        self.write_json(MARKET_HISTORY_FILE, &history)
    }

    /// The previous run's tracked rates, used for delta arrows and the
    /// drop detector.
    pub fn load_last_rates(&self) -> RateMap {
        self.read_json(LAST_RATES_FILE)
    }

    pub fn save_last_rates(&self, rates: &RateMap) -> Result<(), StoreError> {
        self.write_json(LAST_RATES_FILE, rates)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn rates(pairs: &[(&str, f64)]) -> RateMap {
        pairs.iter().map(|(b, r)| (b.to_string(), *r)).collect()
    }

    #[test]
    fn test_history_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path());

        assert!(store.load_history().is_empty());

        let obs = RateObservation {
            timestamp: Local.with_ymd_and_hms(2025, 6, 9, 9, 0, 0).unwrap(),
            rates: rates(&[("Ally", 4.20), ("Sofi", 3.80)]),
        };
        store.append_history(obs.clone()).unwrap();
        store
            .append_history(RateObservation {
                timestamp: Local.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap(),
                rates: rates(&[("Ally", 4.25)]),
            })
            .unwrap();

        let loaded = store.load_history();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], obs);
    }

    #[test]
    fn test_market_snapshot_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path());

        store
            .append_market_snapshot(MarketSnapshot {
                timestamp: Local.with_ymd_and_hms(2025, 6, 9, 9, 0, 0).unwrap(),
                banks: rates(&[("UFB", 4.55)]),
            })
            .unwrap();

        let loaded = store.load_market_history();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].banks.get("UFB"), Some(&4.55));
    }

    #[test]
    fn test_last_rates_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path());

        assert!(store.load_last_rates().is_empty());
        store.save_last_rates(&rates(&[("Ally", 4.20)])).unwrap();
        assert_eq!(store.load_last_rates().get("Ally"), Some(&4.20));
    }

    #[test]
    fn test_malformed_file_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("history.json"), "{not json").unwrap();

        let store = HistoryStore::new(dir.path());
        assert!(store.load_history().is_empty());

        // and a subsequent write recovers the file
        store
            .append_history(RateObservation {
                timestamp: Local.with_ymd_and_hms(2025, 6, 9, 9, 0, 0).unwrap(),
                rates: rates(&[("Ally", 4.20)]),
            })
            .unwrap();
        assert_eq!(store.load_history().len(), 1);
    }
}
