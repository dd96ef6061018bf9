use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::aggregate::AggregationPolicy;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "SPECTRAL_MATTERS_CONFIG";
/// Config file looked up in the working directory when [`CONFIG_ENV`] is unset.
pub const DEFAULT_CONFIG_FILE: &str = "spectral-matters.json";

// ---------------------------------------------------------------------------
// Analyzer settings
// ---------------------------------------------------------------------------

/// User-tunable processing settings.
///
/// ```json
/// {
///   "axis_tolerance": 0.01,
///   "aggregation": "sum",
///   "pick_tolerance": 0.05,
///   "measurement_extension": "txt"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Allowed energy disagreement between measurements, as a fraction of the
    /// smallest energy step.
    pub axis_tolerance: f64,
    /// How repeated measurements are combined.
    pub aggregation: AggregationPolicy,
    /// Largest distance between a clicked point and the curve, as a fraction
    /// of the largest |intensity|.
    pub pick_tolerance: f64,
    /// Extension of measurement files inside a data folder.
    pub measurement_extension: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            axis_tolerance: 0.01,
            aggregation: AggregationPolicy::Sum,
            pick_tolerance: 0.05,
            measurement_extension: "txt".to_string(),
        }
    }
}

impl AnalyzerConfig {
    /// Where the config is read from: `$SPECTRAL_MATTERS_CONFIG`, else
    /// `spectral-matters.json` in the working directory.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load and validate the config at `path`. A missing file gives the
    /// defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Like [`AnalyzerConfig::load`], but logs the failure and falls back to
    /// the defaults.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{e:#}; using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("encoding config")?;
        std::fs::write(path, json).with_context(|| format!("writing config {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.axis_tolerance.is_finite() && self.axis_tolerance > 0.0) {
            bail!("axis_tolerance must be positive, got {}", self.axis_tolerance);
        }
        if !(self.pick_tolerance.is_finite() && self.pick_tolerance > 0.0) {
            bail!("pick_tolerance must be positive, got {}", self.pick_tolerance);
        }
        if self.measurement_extension.trim().is_empty() {
            bail!("measurement_extension must not be empty");
        }
        Ok(())
    }
}
