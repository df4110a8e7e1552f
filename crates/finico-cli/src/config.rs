use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::OutputFormat;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "finico.yaml";

/// CLI settings read from `finico.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Ceiling on `simulations` for Monte Carlo commands.
    pub max_simulations: u32,
    /// Used when `--output` is not passed.
    pub default_output: Option<OutputFormat>,
    /// Filter directive applied when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            max_simulations: 20_000,
            default_output: None,
            log_level: "warn".to_string(),
        }
    }
}

impl CliConfig {
    /// Load an explicit config file, or `finico.yaml` if present, or defaults.
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file is not.
    pub fn load(path: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        match path {
            Some(p) => Self::from_file(Path::new(p)),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config '{}': {}", path.display(), e))?;
        let config: CliConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config '{}': {}", path.display(), e))?;
        if config.max_simulations == 0 {
            return Err(format!("{}: max_simulations must be at least 1", path.display()).into());
        }
        Ok(config)
    }

    /// Reject Monte Carlo requests above the configured ceiling.
    pub fn check_simulations(&self, requested: u32) -> Result<(), Box<dyn std::error::Error>> {
        if requested > self.max_simulations {
            return Err(format!(
                "simulations {} exceeds the configured maximum of {}",
                requested, self.max_simulations
            )
            .into());
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
        let config = CliConfig::default();
        assert_eq!(config.max_simulations, 20_000);
        assert!(config.default_output.is_none());
        assert!(config.check_simulations(20_000).is_ok());
        assert!(config.check_simulations(20_001).is_err());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_simulations: 500\ndefault_output: table").unwrap();
        let config = CliConfig::load(file.path().to_str()).unwrap();
        assert_eq!(config.max_simulations, 500);
        assert!(matches!(config.default_output, Some(OutputFormat::Table)));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        assert!(CliConfig::load(Some("/definitely/not/here/finico.yaml")).is_err());
    }

    #[test]
    fn test_zero_ceiling_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_simulations: 0").unwrap();
        assert!(CliConfig::load(file.path().to_str()).is_err());
    }
}
