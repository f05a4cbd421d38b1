//! Pass pipeline configuration.
//!
//! ```yaml
//! devirtualize: true
//! remove_unused_functions: true
//! entry_point: __CPROVER__start
//! ```
//!
//! Every field is optional; missing fields take the defaults below.

use crate::errors::ConfigError;
use crate::ir::class_identifier::CLASS_IDENTIFIER_FIELD;
use crate::ir::functions::ENTRY_POINT;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PassConfig {
    /// Lower virtual calls to explicit dispatch.
    pub devirtualize: bool,
    /// Drop functions unreachable from `entry_point` after devirtualization.
    pub remove_unused_functions: bool,
    /// Name of the program entry point in the function table.
    pub entry_point: String,
    /// Name of the struct member holding an object's runtime class.
    pub class_identifier_field: String,
    /// Emit `ASSERT false` for dispatch cases with no definition instead of `SKIP`.
    pub assert_on_missing_definition: bool,
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            devirtualize: true,
            remove_unused_functions: false,
            entry_point: ENTRY_POINT.to_string(),
            class_identifier_field: CLASS_IDENTIFIER_FIELD.to_string(),
            assert_on_missing_definition: true,
        }
    }
}

impl PassConfig {
    /// Load a config file, choosing the format from its extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        let config = match extension {
            "yaml" | "yml" => Self::from_yaml_str(&text)?,
            "json" => Self::from_json_str(&text)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };

        tracing::debug!(path = %path.display(), ?config, "loaded pass config");
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: PassConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: PassConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entry_point.trim().is_empty() {
            return Err(ConfigError::Invalid("entry_point must not be empty".into()));
        }
        if self.class_identifier_field.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "class_identifier_field must not be empty".into(),
            ));
        }
        Ok(())
    }
}
