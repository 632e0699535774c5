//! Command-line workflow support

pub mod orchestration;

pub use orchestration::{plan_upgrade, UpgradePlan, UpgradeWorkflowArgs};
