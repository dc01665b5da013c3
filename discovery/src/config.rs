//! YAML configuration for summary runs.
//!
//! A config file picks a base dialect and overrides a few of its settings.
//! Every key is optional.
//!
//! # Example YAML
//!
//! ```yaml
//! dialect: extended
//! sample_label: "{id}_liver"
//! cpg_denominator: 28000000
//! layout:
//!   aligned: Aligned
//!   deduplicated: Deduplicated
//!   methylation: Methylation
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use bsqc_core::{CpgShareRule, Dialect, DialectConfig, Layout};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SummaryError};

/// On-disk form of a run configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Base dialect; falls back to the one chosen on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<Dialect>,
    /// Template for the `Sample` column; `{id}` expands to the sample id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_label: Option<String>,
    /// Denominator for `% of total CpGs`. Extended dialect only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpg_denominator: Option<u64>,
    /// Report subdirectory names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
}

impl ConfigFile {
    /// Loads a config file.
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError::Io`] if the file cannot be opened, or
    /// [`SummaryError::Yaml`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SummaryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_yaml::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Applies the overrides on top of the rules for `fallback` (or the
    /// file's own `dialect`, when set).
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError::InvalidConfig`] for a zero denominator, a
    /// denominator on a dialect without a CpG share column, or an empty
    /// subdirectory name.
    pub fn resolve(self, fallback: Dialect) -> Result<DialectConfig> {
        let mut config = DialectConfig::for_dialect(self.dialect.unwrap_or(fallback));

        if let Some(label) = self.sample_label {
            config.sample_label = label;
        }

        if let Some(denominator) = self.cpg_denominator {
            if denominator == 0 {
                return Err(SummaryError::InvalidConfig(
                    "cpg_denominator must be greater than zero".to_string(),
                ));
            }
            match config.cpg_share {
                CpgShareRule::FixedDenominator(_) => {
                    config.cpg_share = CpgShareRule::FixedDenominator(denominator);
                }
                CpgShareRule::Placeholder => {
                    return Err(SummaryError::InvalidConfig(format!(
                        "cpg_denominator is not used by the {} dialect",
                        config.dialect
                    )));
                }
            }
        }

        if let Some(layout) = self.layout {
            for name in [&layout.aligned, &layout.deduplicated, &layout.methylation] {
                if name.trim().is_empty() {
                    return Err(SummaryError::InvalidConfig(
                        "layout directory names cannot be empty".to_string(),
                    ));
                }
            }
            config.layout = layout;
        }

        Ok(config)
    }
}

/// Loads `path` and resolves it against `fallback`.
pub fn load_config(path: impl AsRef<Path>, fallback: Dialect) -> Result<DialectConfig> {
    ConfigFile::load(path)?.resolve(fallback)
}
