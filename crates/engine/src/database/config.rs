//! Database configuration via `covenant.toml`
//!
//! Every key is optional; missing keys take their defaults. To change
//! settings, edit the file and reopen the database.

use serde::{Deserialize, Serialize};
use std::path::Path;

use covenant_core::{CovenantError, CovenantResult, Limits};

/// Config file name
pub const CONFIG_FILE_NAME: &str = "covenant.toml";

/// Default listing page size
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Database configuration loaded from `covenant.toml`.
///
/// # Example
///
/// ```toml
/// page_size = 20
/// self_application_ids = ["covenant", "covenant-contract"]
/// log_filter = "info"
///
/// [limits]
/// min_signers = 2
/// max_signers = 128
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CovenantConfig {
    /// Records per listing page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Application ids under which the engine itself is deployed.
    ///
    /// Calls arriving from these ids may not create or cancel contracts.
    #[serde(default = "default_self_application_ids")]
    pub self_application_ids: Vec<String>,
    /// `tracing-subscriber` filter directive used by `init_tracing`.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Signer and expiry limits.
    #[serde(default)]
    pub limits: Limits,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_self_application_ids() -> Vec<String> {
    vec!["covenant".to_string(), "covenant-contract".to_string()]
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for CovenantConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            self_application_ids: default_self_application_ids(),
            log_filter: default_log_filter(),
            limits: Limits::default(),
        }
    }
}

impl CovenantConfig {
    /// Whether `application_id` is one of the engine's own ids
    pub fn is_self_application(&self, application_id: &str) -> bool {
        self.self_application_ids.iter().any(|id| id == application_id)
    }

    /// Check values that parse but make no sense.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a zero page size or an empty signer range.
    pub fn validate(&self) -> CovenantResult<()> {
        if self.page_size == 0 {
            return Err(CovenantError::invalid_input(
                "page_size in covenant.toml must be at least 1",
            ));
        }
        if self.limits.min_signers > self.limits.max_signers {
            return Err(CovenantError::invalid_input(format!(
                "limits.min_signers ({}) exceeds limits.max_signers ({}) in covenant.toml",
                self.limits.min_signers, self.limits.max_signers
            )));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Covenant configuration

# Records per listing page
page_size = 20

# Application ids the engine itself runs under. Calls from these ids
# may not create or cancel contracts.
self_application_ids = ["covenant", "covenant-contract"]

# tracing-subscriber filter (RUST_LOG syntax)
log_filter = "info"

[limits]
min_signers = 2
max_signers = 128
# Shorter expiry requests fall back to default_expiry_days
min_expiry_secs = 600
default_expiry_days = 15
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> CovenantResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CovenantError::internal(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: CovenantConfig = toml::from_str(&content).map_err(|e| {
            CovenantError::invalid_input(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default(path: &Path) -> CovenantResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                CovenantError::internal(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> CovenantResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CovenantError::internal(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            CovenantError::internal(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
