//! Host-facing chart settings
//!
//! [`BoxPlotSettings`] is the property record a host edits. Missing fields
//! fall back to their defaults, so partial JSON or TOML documents load.

use serde::{Deserialize, Serialize};

use boxwhisker_stats::{QuantileConfig, StatsResult};

use crate::config::ChartConfig;
use crate::error::{ChartError, ChartResult};
use crate::input::DEFAULT_TIME_BUCKET;

/// Chart settings as exposed to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxPlotSettings {
    /// Low whisker probability
    pub q1: f64,
    /// First quartile probability
    pub q2: f64,
    /// Third quartile probability
    pub q3: f64,
    /// High whisker probability
    pub q4: f64,
    /// IQR multiple widening the whisker band for the outlier walk
    pub outlier_factor: f64,
    /// Y-axis title
    pub y_title: String,
    /// Modulus selecting active series columns; 0 keeps every column
    pub time_bucket: u32,
    /// Goal line value
    pub goal: Option<f64>,
    pub show_labels: bool,
    pub show_data_points: bool,
    pub transition_duration_ms: f64,
}

impl Default for BoxPlotSettings {
    fn default() -> Self {
        Self {
            q1: 0.05,
            q2: 0.25,
            q3: 0.75,
            q4: 0.95,
            outlier_factor: 0.0,
            y_title: String::new(),
            time_bucket: DEFAULT_TIME_BUCKET,
            goal: None,
            show_labels: true,
            show_data_points: true,
            transition_duration_ms: 1000.0,
        }
    }
}

impl BoxPlotSettings {
    /// Load settings from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize settings to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Serialize settings to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load settings from a file, picking the format by extension
    pub fn load(path: &std::path::Path) -> ChartResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ChartError::Settings(format!("{}: {e}", path.display())))?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml(&text).map_err(|e| ChartError::Settings(e.to_string()))
        } else {
            Self::from_json(&text).map_err(|e| ChartError::Settings(e.to_string()))
        }
    }

    /// Quantile configuration of the statistics engine
    pub fn quantile_config(&self) -> QuantileConfig {
        QuantileConfig::new(self.q1, self.q2, self.q3, self.q4).with_outlier_factor(self.outlier_factor)
    }

    /// Validate the quantile probabilities
    pub fn validate(&self) -> StatsResult<()> {
        self.quantile_config().validate()
    }

    /// Copy the display toggles and transition timing into `config`
    pub fn apply_to(&self, config: &mut ChartConfig) {
        config
            .set_show_labels(self.show_labels)
            .set_show_data_points(self.show_data_points)
            .set_transition_duration_ms(self.transition_duration_ms.max(0.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxwhisker_stats::StatsError;

    #[test]
    fn test_defaults() {
        let settings = BoxPlotSettings::default();
        assert_eq!(settings.quantile_config(), QuantileConfig::default());
        assert_eq!(settings.time_bucket, 60);
        assert_eq!(settings.transition_duration_ms, 1000.0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let settings = BoxPlotSettings::from_json(r#"{"q2": 0.1, "goal": 12.5}"#).unwrap();
        assert_eq!(settings.q2, 0.1);
        assert_eq!(settings.q3, 0.75);
        assert_eq!(settings.goal, Some(12.5));
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut settings = BoxPlotSettings::default();
        settings.y_title = "latency".into();
        settings.time_bucket = 0;
        let text = settings.to_toml().unwrap();
        assert_eq!(BoxPlotSettings::from_toml(&text).unwrap(), settings);
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = BoxPlotSettings::default();
        let json = settings.to_json().unwrap();
        assert_eq!(BoxPlotSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_invalid_order_rejected() {
        let settings = BoxPlotSettings {
            q2: 0.8,
            ..BoxPlotSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(StatsError::ProbabilitiesOutOfOrder { .. })
        ));
    }

    #[test]
    fn test_apply_to_config() {
        let settings = BoxPlotSettings {
            show_labels: false,
            transition_duration_ms: 250.0,
            ..BoxPlotSettings::default()
        };
        let mut config = ChartConfig::new();
        settings.apply_to(&mut config);
        assert!(!config.show_labels());
        assert!(config.show_data_points());
        assert_eq!(config.transition_duration_ms(), 250.0);
    }
}
