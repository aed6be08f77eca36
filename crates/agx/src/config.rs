//! Configuration for reading agx documents.
//!
//! [`ReaderConfig`] implements [`serde::Deserialize`], so it can be embedded
//! in an application's own configuration file.
//!
//! # Example
//!
//! ```
//! # use agx::config::ReaderConfig;
//! let config = ReaderConfig::default();
//! assert!(config.validate());
//! ```

use serde::Deserialize;

/// Options controlling how a document becomes a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ReaderConfig {
    /// Run semantic validation before building the graph.
    #[serde(default = "default_validate")]
    validate: bool,
}

impl ReaderConfig {
    /// Creates a new [`ReaderConfig`].
    ///
    /// # Arguments
    ///
    /// * `validate` - Whether semantic validation runs before the graph is
    ///   built. When false, documents that break validation rules still
    ///   produce a graph.
    pub fn new(validate: bool) -> Self {
        Self { validate }
    }

    /// Returns whether semantic validation is enabled.
    pub fn validate(&self) -> bool {
        self.validate
    }

    /// Returns a copy with validation switched on or off.
    pub fn with_validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            validate: default_validate(),
        }
    }
}

fn default_validate() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(ReaderConfig::default().validate());
    }

    #[test]
    fn test_missing_field_defaults_to_true() {
        let config: ReaderConfig = toml::from_str("").unwrap();
        assert!(config.validate());
    }

    #[test]
    fn test_deserialize_disabled() {
        let config: ReaderConfig = toml::from_str("validate = false").unwrap();
        assert_eq!(config, ReaderConfig::new(false));
    }

    #[test]
    fn test_with_validate() {
        let config = ReaderConfig::default().with_validate(false);
        assert!(!config.validate());
    }
}
