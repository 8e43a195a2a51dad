//! Alert delivery

pub mod slack;

pub use slack::SlackNotifier;
