use serde::{Deserialize, Serialize};

use crate::settings::CanvasSettings;

/// Startup configuration for a drawing canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
    /// Quality used for JPEG export (1-100)
    pub jpeg_quality: u8,
    /// Initial drawing settings
    pub settings: CanvasSettings,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 400,
            jpeg_quality: 90,
            settings: CanvasSettings::default(),
        }
    }
}

impl CanvasConfig {
    /// Parse a JSON config; missing fields fall back to their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn sanitized(mut self) -> Self {
        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
        self.settings = self.settings.sanitized();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = CanvasConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CanvasConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = CanvasConfig::from_json_str(r#"{ "width": 1024, "jpeg_quality": 0 }"#).unwrap();
        assert_eq!(config.width, 1024);
        assert_eq!(config.height, 400);
        assert_eq!(config.jpeg_quality, 1);
    }

    #[test]
    fn test_round_trips_through_json() {
        let mut config = CanvasConfig::default();
        config.settings.set_stroke_width(17.0);
        let json = config.to_json_string().unwrap();
        assert_eq!(CanvasConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(CanvasConfig::from_json_str("{ width: }").is_err());
    }
}
