//! Configuration loading
//!
//! The configuration is machine.toml, embedded at compile time and parsed
//! by the allocation-free parser in almonry-core. A broken file never stops
//! the box from booting: it runs on the built-in defaults instead.

use defmt::*;

use almonry_core::config::toml::parse_config;
use almonry_core::config::MachineConfig;

/// Embedded configuration. Edit machine.toml and rebuild to customize.
const EMBEDDED_CONFIG: &str = include_str!("../../machine.toml");

/// Parse and validate the embedded configuration
pub fn load() -> MachineConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("machine.toml line {}: {:?}", e.line, e.kind);
            error!("Using built-in defaults");
            return MachineConfig::default();
        }
    };

    match config.validate() {
        Ok(()) => {
            info!("Configuration loaded from machine.toml");
            config
        }
        Err(e) => {
            error!("machine.toml rejected: {:?}", e);
            error!("Using built-in defaults");
            MachineConfig::default()
        }
    }
}
