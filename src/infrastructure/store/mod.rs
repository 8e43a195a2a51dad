//! Persistence: JSON files under the data directory

pub mod history;

pub use history::HistoryStore;
