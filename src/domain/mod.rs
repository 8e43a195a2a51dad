//! Domain layer - core analysis and decision logic

pub mod analysis;
pub mod notification;
pub mod report;
pub mod cycle;
