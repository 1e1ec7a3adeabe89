//! Configuration system for global-logrotate
//!
//! Built-in defaults, then the main config file, then sorted drop-ins, then
//! the command line. The result is an immutable [`EffectiveConfig`].

pub use app::{EffectiveConfig, Overrides};
pub use file::{parse_pairs, ConfigPaths, FileConfig};

mod app;
pub mod defaults;
mod file;

use chrono::Local;

/// Load every config layer from `paths` and apply `overrides` at the current time
pub fn load(paths: &ConfigPaths, overrides: &Overrides) -> EffectiveConfig {
    let file = FileConfig::load(paths);
    EffectiveConfig::resolve(&file, overrides, Local::now())
}
