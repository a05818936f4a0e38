//! Run-level configuration.
//!
//! The perspective selector is fixed for the duration of one simulation run;
//! an unrecognized value is rejected here, before any computation starts.
use crate::space::Perspective;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("malformed run configuration: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub perspective: Perspective,
}

impl RunConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_both_perspectives() {
        let config = RunConfig::from_json_str(r#"{"perspective": "comprehensive"}"#).unwrap();
        assert_eq!(config.perspective, Perspective::Comprehensive);
        let config = RunConfig::from_json_str(r#"{"perspective": "uniformity"}"#).unwrap();
        assert_eq!(config.perspective, Perspective::Uniformity);
    }

    #[test]
    fn test_rejects_unknown_perspective() {
        let err = RunConfig::from_json_str(r#"{"perspective": "holistic"}"#).unwrap_err();
        assert!(err.to_string().contains("malformed run configuration"));
    }
}
