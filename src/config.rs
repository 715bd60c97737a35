// Engine configuration - Session defaults and ambient tunables
// Loaded from RON; every field is optional and falls back to its default

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Probabilities and thresholds for the pad and riser effects
///
/// Defaults only; none of these are tuned per genre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    /// Minimum intensity for the bar-start pad chord
    pub pad_min_intensity: f32,
    /// Chance of the alternate pad voicing (never on step 0)
    pub pad_alt_chord_probability: f64,
    /// Minimum intensity for the riser
    pub riser_min_intensity: f32,
    pub riser_probability: f64,
    /// Steps before the end of the playback sequence at which the riser fires
    pub riser_lead_steps: usize,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            pad_min_intensity: 0.6,
            pad_alt_chord_probability: 0.3,
            riser_min_intensity: 0.4,
            riser_probability: 0.6,
            riser_lead_steps: 16,
        }
    }
}

/// Engine-wide configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub default_bpm: f64,
    pub default_loop_bars: usize,
    pub default_intensity: f32,
    /// Upper bound for loop length, bridges included
    pub max_bars: usize,
    /// Most ticks emitted by one `process_until` call before re-anchoring
    pub max_catch_up_ticks: usize,
    pub ambient: AmbientConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_bpm: 128.0,
            default_loop_bars: 2,
            default_intensity: 0.5,
            max_bars: 64,
            max_catch_up_ticks: 64,
            ambient: AmbientConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate RON text
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_ron_str(&text)?;
        log::info!("Loaded engine config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Check ranges that cannot be clamped sensibly
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.default_bpm.is_finite() {
            return Err(ConfigError::Invalid("default_bpm must be finite".to_string()));
        }

        if self.default_loop_bars == 0 || self.max_bars == 0 {
            return Err(ConfigError::Invalid("bar counts must be at least 1".to_string()));
        }

        if self.default_loop_bars > self.max_bars {
            return Err(ConfigError::Invalid(format!(
                "default_loop_bars {} exceeds max_bars {}",
                self.default_loop_bars, self.max_bars
            )));
        }

        if self.max_catch_up_ticks == 0 {
            return Err(ConfigError::Invalid(
                "max_catch_up_ticks must be at least 1".to_string(),
            ));
        }

        let unit = 0.0..=1.0;
        let fractions = [
            ("default_intensity", self.default_intensity as f64),
            ("pad_min_intensity", self.ambient.pad_min_intensity as f64),
            ("pad_alt_chord_probability", self.ambient.pad_alt_chord_probability),
            ("riser_min_intensity", self.ambient.riser_min_intensity as f64),
            ("riser_probability", self.ambient.riser_probability),
        ];
        for (name, value) in fractions {
            if !unit.contains(&value) {
                return Err(ConfigError::Invalid(format!("{} must be in [0, 1], got {}", name, value)));
            }
        }

        Ok(())
    }
}
