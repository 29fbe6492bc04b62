//! Configuration for a datagrid instance.
//!
//! ```
//! use horizon_datagrid::GridConfig;
//!
//! let config = GridConfig::new().page_size(25);
//! assert_eq!(config.page_size, 25);
//!
//! let config = GridConfig::from_toml_str(r#"
//!     strict_width_class = "grid-fixed"
//!     page_size = 10
//! "#).unwrap();
//! assert_eq!(config.strict_width_class, "grid-fixed");
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Class toggled on the table wrapper while natural column widths are measured.
pub const COMPUTE_WIDTH_CLASS: &str = "datagrid-computing-columns-width";
/// Class marking a header or cell whose width must not flex.
pub const STRICT_WIDTH_CLASS: &str = "datagrid-fixed-width";
/// Inline style property the width engine writes.
pub const WIDTH_PROPERTY: &str = "width";

/// Settings shared by every component of a datagrid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Class applied to the table wrapper during the measurement phase.
    pub compute_width_class: String,
    /// Class marking strict (fixed-width) headers and cells.
    pub strict_width_class: String,
    /// Style property used for column widths.
    pub width_property: String,
    /// Initial page size. `0` disables paging.
    pub page_size: usize,
    /// Re-measure on pure header reordering instead of permuting widths.
    pub stabilize_on_reorder: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            compute_width_class: COMPUTE_WIDTH_CLASS.to_string(),
            strict_width_class: STRICT_WIDTH_CLASS.to_string(),
            width_property: WIDTH_PROPERTY.to_string(),
            page_size: 0,
            stabilize_on_reorder: false,
        }
    }
}

impl GridConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the measurement class.
    pub fn compute_width_class(mut self, class: impl Into<String>) -> Self {
        self.compute_width_class = class.into();
        self
    }

    /// Set the strict width class.
    pub fn strict_width_class(mut self, class: impl Into<String>) -> Self {
        self.strict_width_class = class.into();
        self
    }

    /// Set the width style property.
    pub fn width_property(mut self, property: impl Into<String>) -> Self {
        self.width_property = property.into();
        self
    }

    /// Set the initial page size.
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Re-stabilize when headers are only reordered.
    pub fn stabilize_on_reorder(mut self, enabled: bool) -> Self {
        self.stabilize_on_reorder = enabled;
        self
    }

    /// Parse and validate a configuration from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(target: "horizon_datagrid::config", path = %path.display(), "loaded grid configuration");
        Ok(config)
    }

    /// Check that class names and the style property are usable.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("compute_width_class", &self.compute_width_class),
            ("strict_width_class", &self.strict_width_class),
            ("width_property", &self.width_property),
        ] {
            if value.is_empty() {
                return Err(Error::invalid_value(field, "must not be empty"));
            }
            if value.chars().any(char::is_whitespace) {
                return Err(Error::invalid_value(
                    field,
                    format!("'{value}' must not contain whitespace"),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = GridConfig::default();
        assert_eq!(config.compute_width_class, COMPUTE_WIDTH_CLASS);
        assert_eq!(config.strict_width_class, STRICT_WIDTH_CLASS);
        assert_eq!(config.width_property, "width");
        assert_eq!(config.page_size, 0);
        assert!(!config.stabilize_on_reorder);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = GridConfig::new()
            .strict_width_class("fixed")
            .page_size(20)
            .stabilize_on_reorder(true);
        assert_eq!(config.strict_width_class, "fixed");
        assert_eq!(config.page_size, 20);
        assert!(config.stabilize_on_reorder);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GridConfig::from_toml_str("page_size = 10").unwrap();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.compute_width_class, COMPUTE_WIDTH_CLASS);
    }

    #[test]
    fn test_invalid_toml() {
        let err = GridConfig::from_toml_str("page_size = \"ten\"").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_validate_rejects_whitespace() {
        let err = GridConfig::from_toml_str("strict_width_class = \"a b\"").unwrap_err();
        match err {
            Error::InvalidValue { field, .. } => assert_eq!(field, "strict_width_class"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "width_property = \"min-width\"").unwrap();

        let config = GridConfig::load(file.path()).unwrap();
        assert_eq!(config.width_property, "min-width");
    }

    #[test]
    fn test_load_missing_file() {
        let err = GridConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
