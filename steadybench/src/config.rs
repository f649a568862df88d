//! Harness configuration
//!
//! A `BenchConfig` can be built in code or loaded from a TOML table such as
//!
//! ```toml
//! confidence_level = 0.99
//! measurement_time = "10s"
//! warm_up_time = "500ms"
//! sample_size = 50
//! ```
//!
//! Keys that are left out keep their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use steadybench_core::{DEFAULT_SAMPLE_SIZE, MAX_SAMPLE_SIZE, MIN_SAMPLE_SIZE};
use steadybench_stats::{DEFAULT_CONFIDENCE_LEVEL, DEFAULT_NRESAMPLES};
use thiserror::Error;

/// Invalid configuration value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Confidence level outside the open interval (0, 1)
    #[error("confidence level must lie strictly between 0 and 1, got {0}")]
    InvalidConfidenceLevel(f64),
    /// `nresamples` was zero
    #[error("nresamples must be at least 1")]
    ZeroResamples,
    /// Fewer samples than a regression needs
    #[error("sample_size must be at least {min}, got {got}")]
    SampleSizeTooSmall {
        /// Requested sample count
        got: u64,
        /// Smallest accepted sample count
        min: u64,
    },
    /// More samples than the planner accepts
    #[error("sample_size must be at most {max}, got {got}")]
    SampleSizeTooLarge {
        /// Requested sample count
        got: u64,
        /// Largest accepted sample count
        max: u64,
    },
    /// A duration option was zero
    #[error("{field} must be longer than zero")]
    ZeroDuration {
        /// Name of the offending option
        field: &'static str,
    },
    /// A duration string could not be parsed
    #[error("invalid duration: {0}")]
    Duration(String),
}

/// Options governing warm-up, sampling and analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    /// Confidence level of every reported interval
    pub confidence_level: f64,
    /// Target total time of the sampling phase
    #[serde(with = "duration_str")]
    pub measurement_time: Duration,
    /// Bootstrap resamples per statistic
    pub nresamples: usize,
    /// Number of samples, each with its own iteration count
    pub sample_size: u64,
    /// Time spent warming up before sampling
    #[serde(with = "duration_str")]
    pub warm_up_time: Duration,
    /// Estimate the per-iteration slope over `(iters, time)` pairs
    pub regression: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            measurement_time: Duration::from_secs(5),
            nresamples: DEFAULT_NRESAMPLES,
            sample_size: DEFAULT_SAMPLE_SIZE,
            warm_up_time: Duration::from_secs(3),
            regression: true,
        }
    }
}

impl BenchConfig {
    /// Check every option against its accepted range
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cl = self.confidence_level;
        if !(cl > 0.0 && cl < 1.0) {
            return Err(ConfigError::InvalidConfidenceLevel(cl));
        }
        if self.nresamples == 0 {
            return Err(ConfigError::ZeroResamples);
        }
        if self.sample_size < MIN_SAMPLE_SIZE {
            return Err(ConfigError::SampleSizeTooSmall {
                got: self.sample_size,
                min: MIN_SAMPLE_SIZE,
            });
        }
        if self.sample_size > MAX_SAMPLE_SIZE {
            return Err(ConfigError::SampleSizeTooLarge {
                got: self.sample_size,
                max: MAX_SAMPLE_SIZE,
            });
        }
        if self.measurement_time.is_zero() {
            return Err(ConfigError::ZeroDuration {
                field: "measurement_time",
            });
        }
        if self.warm_up_time.is_zero() {
            return Err(ConfigError::ZeroDuration {
                field: "warm_up_time",
            });
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Set the confidence level of every interval
    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    /// Set the target sampling time
    pub fn with_measurement_time(mut self, measurement_time: Duration) -> Self {
        self.measurement_time = measurement_time;
        self
    }

    /// Set the bootstrap resample count
    pub fn with_nresamples(mut self, nresamples: usize) -> Self {
        self.nresamples = nresamples;
        self
    }

    /// Set the number of samples
    pub fn with_sample_size(mut self, sample_size: u64) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Set the warm-up time
    pub fn with_warm_up_time(mut self, warm_up_time: Duration) -> Self {
        self.warm_up_time = warm_up_time;
        self
    }

    /// Enable or disable the slope estimate
    pub fn with_regression(mut self, regression: bool) -> Self {
        self.regression = regression;
        self
    }
}

/// Parse a duration string such as "3s", "500ms", "1.5s" or "2m"
///
/// A bare number is taken as seconds.
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ConfigError::Duration("empty duration string".to_string()));
    }

    let (num_part, unit_part) = s
        .char_indices()
        .find(|(_, c)| c.is_alphabetic())
        .map(|(i, _)| s.split_at(i))
        .unwrap_or((s, "s"));

    let value: f64 = num_part
        .trim()
        .parse()
        .map_err(|_| ConfigError::Duration(format!("invalid number `{num_part}`")))?;
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Duration(format!("out of range `{s}`")));
    }

    let multiplier: f64 = match unit_part.to_lowercase().as_str() {
        "ns" => 1.0,
        "us" | "µs" => 1e3,
        "ms" => 1e6,
        "s" | "" => 1e9,
        "m" | "min" => 60e9,
        other => return Err(ConfigError::Duration(format!("unknown unit `{other}`"))),
    };

    Ok(Duration::from_nanos((value * multiplier) as u64))
}

/// Render a duration in the largest unit that keeps it integral
pub fn format_duration(d: Duration) -> String {
    let ns = d.as_nanos();
    if ns % 1_000_000_000 == 0 {
        format!("{}s", ns / 1_000_000_000)
    } else if ns % 1_000_000 == 0 {
        format!("{}ms", ns / 1_000_000)
    } else if ns % 1_000 == 0 {
        format!("{}us", ns / 1_000)
    } else {
        format!("{ns}ns")
    }
}

mod duration_str {
    use super::{format_duration, parse_duration};
    use serde::{Deserialize, Deserializer, Serializer, de};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_duration(*d))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(de::Error::custom)
    }
}
