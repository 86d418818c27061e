//! Parameters of a preprocessing run.
//!
//! A [`ProcessingConfig`] can only exist in a valid state: every constructor
//! and the serde path go through the same checks.

use std::convert::TryFrom;

use serde_derive::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::trim::DEFAULT_ADAPTER_TOLERANCE;

/// Smallest accepted lower length bound
pub const MIN_LENGTH_FLOOR: usize = 3;
/// Largest accepted upper length bound
pub const MAX_LENGTH_CEILING: usize = 500;
/// Smallest accepted maximum mean error
pub const MIN_MAX_ERROR: f64 = 0.001;
/// Largest accepted maximum mean error
pub const MAX_MAX_ERROR: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConfigFields", into = "ConfigFields")]
pub struct ProcessingConfig {
    const5p: String,
    const3p: String,
    min_length: usize,
    max_length: usize,
    max_error: f64,
    adapter_tolerance: f64,
}

/// Wire form of [`ProcessingConfig`]; adapters and tolerance may be omitted
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFields {
    #[serde(default)]
    const5p: String,
    #[serde(default)]
    const3p: String,
    min_length: usize,
    max_length: usize,
    max_error: f64,
    #[serde(default = "default_tolerance")]
    adapter_tolerance: f64,
}

fn default_tolerance() -> f64 {
    DEFAULT_ADAPTER_TOLERANCE
}

impl ProcessingConfig {
    /// A config without adapters.
    ///
    /// ```
    /// use readprep::ProcessingConfig;
    ///
    /// let config = ProcessingConfig::new(10, 20, 0.005).unwrap().with_const5p("ACGT");
    /// assert_eq!(config.const5p(), "ACGT");
    /// assert!(ProcessingConfig::new(100, 10, 0.005).is_err());
    /// ```
    pub fn new(min_length: usize, max_length: usize, max_error: f64) -> Result<Self> {
        check_lengths(min_length, max_length)?;
        check_max_error(max_error)?;
        Ok(Self {
            const5p: String::new(),
            const3p: String::new(),
            min_length,
            max_length,
            max_error,
            adapter_tolerance: DEFAULT_ADAPTER_TOLERANCE,
        })
    }

    /// 5' adapter to trim; empty means no 5' trimming
    pub fn with_const5p<S: Into<String>>(mut self, adapter: S) -> Self {
        self.const5p = adapter.into();
        self
    }

    /// 3' adapter to trim; empty means no 3' trimming
    pub fn with_const3p<S: Into<String>>(mut self, adapter: S) -> Self {
        self.const3p = adapter.into();
        self
    }

    /// Fraction of an adapter's length that may mismatch, in `[0, 1]`
    pub fn with_adapter_tolerance(mut self, tolerance: f64) -> Result<Self> {
        check_tolerance(tolerance)?;
        self.adapter_tolerance = tolerance;
        Ok(self)
    }

    pub fn const5p(&self) -> &str {
        &self.const5p
    }

    pub fn const3p(&self) -> &str {
        &self.const3p
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn max_error(&self) -> f64 {
        self.max_error
    }

    pub fn adapter_tolerance(&self) -> f64 {
        self.adapter_tolerance
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::InvalidConfig(e.to_string()))
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            const5p: String::new(),
            const3p: String::new(),
            min_length: 10,
            max_length: 100,
            max_error: 0.005,
            adapter_tolerance: DEFAULT_ADAPTER_TOLERANCE,
        }
    }
}

impl TryFrom<ConfigFields> for ProcessingConfig {
    type Error = Error;

    fn try_from(fields: ConfigFields) -> Result<Self> {
        ProcessingConfig::new(fields.min_length, fields.max_length, fields.max_error)?
            .with_const5p(fields.const5p)
            .with_const3p(fields.const3p)
            .with_adapter_tolerance(fields.adapter_tolerance)
    }
}

impl From<ProcessingConfig> for ConfigFields {
    fn from(config: ProcessingConfig) -> Self {
        Self {
            const5p: config.const5p,
            const3p: config.const3p,
            min_length: config.min_length,
            max_length: config.max_length,
            max_error: config.max_error,
            adapter_tolerance: config.adapter_tolerance,
        }
    }
}

fn check_lengths(min_length: usize, max_length: usize) -> Result<()> {
    if min_length < MIN_LENGTH_FLOOR || max_length > MAX_LENGTH_CEILING {
        return Err(Error::InvalidConfig(format!(
            "Length range must be between {} and {}",
            MIN_LENGTH_FLOOR, MAX_LENGTH_CEILING
        )));
    }
    if min_length > max_length {
        return Err(Error::InvalidConfig(
            "Minimum length cannot be greater than maximum length".to_string(),
        ));
    }
    Ok(())
}

fn check_max_error(max_error: f64) -> Result<()> {
    // written so that NaN fails too
    if !(MIN_MAX_ERROR..=MAX_MAX_ERROR).contains(&max_error) {
        return Err(Error::InvalidConfig(format!(
            "Max error must be between {} and {}",
            MIN_MAX_ERROR, MAX_MAX_ERROR
        )));
    }
    Ok(())
}

fn check_tolerance(tolerance: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&tolerance) {
        return Err(Error::InvalidConfig(
            "Adapter tolerance must be between 0 and 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_length_bounds() {
        assert!(ProcessingConfig::new(3, 500, 0.5).is_ok());
        assert!(ProcessingConfig::new(20, 20, 0.5).is_ok());
        assert_eq!(
            ProcessingConfig::new(2, 10, 0.5).unwrap_err().kind(),
            ErrorKind::InvalidConfig
        );
        assert_eq!(
            ProcessingConfig::new(10, 501, 0.5).unwrap_err().kind(),
            ErrorKind::InvalidConfig
        );
        let e = ProcessingConfig::new(100, 10, 0.005).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidConfig);
        assert_eq!(
            e.to_string(),
            "Invalid configuration: Minimum length cannot be greater than maximum length"
        );
    }

    #[test]
    fn test_max_error_bounds() {
        assert!(ProcessingConfig::new(10, 20, 0.001).is_ok());
        assert!(ProcessingConfig::new(10, 20, 1.0).is_ok());
        assert!(ProcessingConfig::new(10, 20, 0.0009).is_err());
        assert!(ProcessingConfig::new(10, 20, 1.01).is_err());
        assert!(ProcessingConfig::new(10, 20, f64::NAN).is_err());
    }

    #[test]
    fn test_tolerance_bounds() {
        let config = ProcessingConfig::default();
        assert_eq!(config.adapter_tolerance(), DEFAULT_ADAPTER_TOLERANCE);
        assert!(config.clone().with_adapter_tolerance(0.0).is_ok());
        assert!(config.clone().with_adapter_tolerance(1.0).is_ok());
        assert!(config.clone().with_adapter_tolerance(-0.1).is_err());
        assert!(config.with_adapter_tolerance(f64::NAN).is_err());
    }

    #[test]
    fn test_from_toml() {
        let config = ProcessingConfig::from_toml_str(
            r#"
            const5p = "ACGT"
            min_length = 12
            max_length = 40
            max_error = 0.01
            "#,
        )
        .unwrap();
        assert_eq!(config.const5p(), "ACGT");
        assert_eq!(config.const3p(), "");
        assert_eq!(config.min_length(), 12);
        assert_eq!(config.max_length(), 40);
        assert_eq!(config.max_error(), 0.01);
        assert_eq!(config.adapter_tolerance(), DEFAULT_ADAPTER_TOLERANCE);
    }

    #[test]
    fn test_from_toml_is_validated() {
        let e = ProcessingConfig::from_toml_str(
            r#"
            min_length = 100
            max_length = 10
            max_error = 0.005
            "#,
        )
        .unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidConfig);
        assert!(e.to_string().contains("Minimum length cannot be greater"));
    }

    #[test]
    fn test_json_round_trip() {
        let config = ProcessingConfig::new(5, 50, 0.01)
            .unwrap()
            .with_const3p("TTTT");
        let json = serde_json::to_string(&config).unwrap();
        let back: ProcessingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
