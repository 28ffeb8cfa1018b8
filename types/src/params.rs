//! Deployment parameters for a token instance and its claim registry.
//!
//! Can be loaded from a TOML file via [`TokenParams::from_toml_file`] or built
//! programmatically (e.g. for tests). Missing keys fall back to the defaults of
//! the reference deployment.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// All tunables for one ledger + registry deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenParams {
    /// Human-readable token name (owner can change it later).
    #[serde(default = "default_name")]
    pub name: String,

    /// Capacity of the top-holder heap (`TOP_SIZE`).
    #[serde(default = "default_top_size")]
    pub top_size: usize,

    /// Fee divisor applied to both burn and reward (100 = 1% each).
    #[serde(default = "default_fee_divisor")]
    pub fee_divisor: u64,

    /// Tokens transferred per voted unit of the previous generation.
    #[serde(default = "default_claim_ratio")]
    pub claim_ratio: u64,

    /// Default per-account ceiling on the sum of voted amounts claimed.
    #[serde(default = "default_max_claimed")]
    pub default_max_claimed: u128,

    /// Extra gas budget forwarded to heap maintenance. Kept for parity with
    /// the on-chain deployment; the ledger only stores it.
    #[serde(default)]
    pub extra_gas: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_name() -> String {
    "Shuffle Monster V3".to_string()
}

fn default_top_size() -> usize {
    512
}

fn default_fee_divisor() -> u64 {
    100
}

fn default_claim_ratio() -> u64 {
    150
}

fn default_max_claimed() -> u128 {
    (1u128 << 96) - 1
}

impl Default for TokenParams {
    fn default() -> Self {
        Self {
            name: default_name(),
            top_size: default_top_size(),
            fee_divisor: default_fee_divisor(),
            claim_ratio: default_claim_ratio(),
            default_max_claimed: default_max_claimed(),
            extra_gas: 0,
        }
    }
}

impl TokenParams {
    /// Parse parameters from a TOML string and validate them.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let params: Self = toml::from_str(raw)?;
        params.validate()?;
        Ok(params)
    }

    /// Read, parse and validate a TOML parameters file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Reject parameter sets the ledger cannot operate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fee_divisor == 0 {
            return Err(ConfigError::Invalid {
                field: "fee_divisor",
                reason: "must be non-zero".into(),
            });
        }
        if self.claim_ratio == 0 {
            return Err(ConfigError::Invalid {
                field: "claim_ratio",
                reason: "must be non-zero".into(),
            });
        }
        Ok(())
    }

    /// Builder-style override of the heap capacity, handy in tests.
    pub fn with_top_size(mut self, top_size: usize) -> Self {
        self.top_size = top_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_reference_deployment() {
        let params = TokenParams::default();
        assert_eq!(params.top_size, 512);
        assert_eq!(params.fee_divisor, 100);
        assert_eq!(params.claim_ratio, 150);
        assert_eq!(params.default_max_claimed, (1u128 << 96) - 1);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let params = TokenParams::from_toml_str("top_size = 16\nname = \"Test\"\n").unwrap();
        assert_eq!(params.top_size, 16);
        assert_eq!(params.name, "Test");
        assert_eq!(params.fee_divisor, 100);
        assert_eq!(params.claim_ratio, 150);
    }

    #[test]
    fn zero_fee_divisor_rejected() {
        let err = TokenParams::from_toml_str("fee_divisor = 0").unwrap_err();
        match err {
            ConfigError::Invalid { field, .. } => assert_eq!(field, "fee_divisor"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = TokenParams::from_toml_str("top_size = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "claim_ratio = 200").unwrap();
        writeln!(file, "extra_gas = 90").unwrap();
        let params = TokenParams::from_toml_file(file.path()).unwrap();
        assert_eq!(params.claim_ratio, 200);
        assert_eq!(params.extra_gas, 90);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = TokenParams::from_toml_file("/nonexistent/shuffle.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
