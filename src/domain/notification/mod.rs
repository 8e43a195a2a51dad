//! Notification policy - pure decision logic over collected rates

pub mod policy;

pub use policy::{decide, NotificationDecision, NotificationMode, PolicyInputs};
