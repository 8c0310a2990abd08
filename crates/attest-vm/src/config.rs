//! Engine resource limits, loaded from TOML.
//!
//! Every field is optional in the TOML document; missing fields take their
//! defaults.
//!
//! ```toml
//! max_steps = 4096
//! max_stack_size = 2048
//! max_item_size = 65535
//! max_multisig_keys = 1024
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use attest_contracts::ConfigError;

/// Bounds that guarantee `SignatureEngine::execute` terminates and stays
/// within a fixed memory budget. Exceeding any of them faults the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Instructions executed across all segments of one program.
    pub max_steps: u64,
    /// Items on the evaluation stack at any time.
    pub max_stack_size: usize,
    /// Bytes in a single stack item.
    pub max_item_size: usize,
    /// Public keys accepted by one `CHECKMULTISIG`.
    pub max_multisig_keys: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_steps: 4096,
            max_stack_size: 2048,
            max_item_size: 65_535,
            max_multisig_keys: 1024,
        }
    }
}

impl EngineConfig {
    /// Parse `s` as TOML and validate the limits.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(s).map_err(|e| ConfigError {
            reason: format!("failed to parse engine config TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file at `path` and parse it as engine configuration.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError {
            reason: format!("failed to read engine config '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Every limit must be non-zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let zero = [
            ("max_steps", self.max_steps == 0),
            ("max_stack_size", self.max_stack_size == 0),
            ("max_item_size", self.max_item_size == 0),
            ("max_multisig_keys", self.max_multisig_keys == 0),
        ];
        match zero.iter().find(|(_, is_zero)| *is_zero) {
            Some((name, _)) => Err(ConfigError {
                reason: format!("{name} must be greater than zero"),
            }),
            None => Ok(()),
        }
    }
}
