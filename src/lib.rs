pub mod catalog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod installer;
pub mod resolver;
pub mod skip;
pub mod source;
pub mod ui;

pub use catalog::Catalog;
pub use error::{Result, UpgradeError};
pub use resolver::{ReleaseResolver, ResolutionOptions, UpdateStatus};
