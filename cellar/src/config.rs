//! Run configuration
//!
//! Loaded from a TOML file (`cellar.toml` by convention) and then adjusted
//! by command-line overrides:
//!
//! ```toml
//! store_capacity = 16
//! max_recursion_depth = 2000
//! ```

use crate::error::{CompileError, Result};
use crate::interp::DEFAULT_CAPACITY;
use serde::Deserialize;
use std::path::Path;

/// Nested closure applications allowed before a run fails
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 10_000;

/// Settings for one program run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Number of cells in the store
    pub store_capacity: usize,
    /// Limit on nested closure applications
    pub max_recursion_depth: usize,
}

impl RunConfig {
    /// Parse a configuration from TOML text; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: RunConfig =
            toml::from_str(text).map_err(|e| CompileError::config_error(e.to_string()))?;
        config.validate()
    }

    /// Read and parse a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CompileError::io_error(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Reject settings no run could use
    pub fn validate(self) -> Result<Self> {
        if self.store_capacity == 0 {
            return Err(CompileError::config_error("store_capacity must be at least 1"));
        }
        if self.max_recursion_depth == 0 {
            return Err(CompileError::config_error(
                "max_recursion_depth must be at least 1",
            ));
        }
        Ok(self)
    }

    /// Set the store capacity
    pub fn store_capacity(mut self, capacity: usize) -> Self {
        self.store_capacity = capacity;
        self
    }

    /// Set the recursion limit
    pub fn max_recursion_depth(mut self, depth: usize) -> Self {
        self.max_recursion_depth = depth;
        self
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            store_capacity: DEFAULT_CAPACITY,
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
        }
    }
}
