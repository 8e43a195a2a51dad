//! Infrastructure layer - HTTP sources, persistence, alert delivery

pub mod sources;
pub mod store;
pub mod notify;
