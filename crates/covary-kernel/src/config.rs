//! Conformance run configuration.
//!
//! Loaded from TOML:
//!
//! ```toml
//! [conformance]
//! profile = "sanity"
//! array_length = 2
//! target_index = 1
//! invocation_count = 2
//! ```
//!
//! Every key is optional; missing keys take the defaults shown.

use crate::error::CovaryError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "covary.toml";

/// Largest `array_length` accepted; every sweep case allocates an array this long.
pub const MAX_ARRAY_LENGTH: usize = 1 << 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConformanceConfig {
    /// Label carried into the report.
    pub profile: String,
    /// Length of every freshly allocated test array.
    pub array_length: usize,
    /// In-range slot targeted by the first store of each case.
    pub target_index: usize,
    /// How many times the whole sweep runs.
    pub invocation_count: usize,
}

impl Default for ConformanceConfig {
    fn default() -> Self {
        Self {
            profile: "sanity".to_string(),
            array_length: 2,
            target_index: 1,
            invocation_count: 2,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    conformance: ConformanceConfig,
}

impl ConformanceConfig {
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self, CovaryError> {
        let file: ConfigFile = toml::from_str(text).map_err(|source| CovaryError::ConfigParse {
            path: origin.to_string(),
            source,
        })?;
        file.conformance.validate()?;
        Ok(file.conformance)
    }

    pub fn load(path: &Path) -> Result<Self, CovaryError> {
        let text = std::fs::read_to_string(path).map_err(|source| CovaryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text, &path.display().to_string())
    }

    /// Load `path` if given, else `covary.toml` if present, else defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self, CovaryError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_PATH);
                if fallback.exists() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), CovaryError> {
        if self.profile.trim().is_empty() {
            return Err(CovaryError::InvalidConfig("profile must not be empty".into()));
        }
        if self.array_length > MAX_ARRAY_LENGTH {
            return Err(CovaryError::InvalidConfig(format!(
                "array_length {} exceeds the maximum of {MAX_ARRAY_LENGTH}",
                self.array_length
            )));
        }
        if self.target_index >= self.array_length {
            return Err(CovaryError::InvalidConfig(format!(
                "target_index {} must be below array_length {}",
                self.target_index, self.array_length
            )));
        }
        if self.invocation_count == 0 {
            return Err(CovaryError::InvalidConfig(
                "invocation_count must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
