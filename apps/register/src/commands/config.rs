//! # Config Commands

use crate::state::ConfigState;

/// The register configuration, for the settings and receipt screens.
pub fn get_config(config: &ConfigState) -> ConfigState {
    config.clone()
}
