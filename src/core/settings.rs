use serde::{Deserialize, Serialize};

use crate::core::NamingOptions;

pub const DEFAULT_QUALITY: u8 = 85;

/// Settings applied to a conversion run.
///
/// A run reads these once when it takes its snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionSettings {
    /// User-facing quality percentage (1-100)
    pub quality: u8,
    /// Output naming policy
    #[serde(default)]
    pub naming: NamingOptions,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            naming: NamingOptions::default(),
        }
    }
}

impl ConversionSettings {
    /// Quality as the fraction handed to the conversion service.
    pub fn normalized_quality(&self) -> f32 {
        f32::from(self.quality.clamp(1, 100)) / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_is_normalized_to_fraction() {
        let mut settings = ConversionSettings::default();
        assert!((settings.normalized_quality() - 0.85).abs() < f32::EPSILON);
        settings.quality = 100;
        assert_eq!(settings.normalized_quality(), 1.0);
        settings.quality = 1;
        assert!((settings.normalized_quality() - 0.01).abs() < f32::EPSILON);
    }

    #[test]
    fn naming_defaults_when_omitted() {
        let parsed: ConversionSettings = serde_json::from_str(r#"{"quality":60}"#).unwrap();
        assert_eq!(parsed.quality, 60);
        assert_eq!(parsed.naming, NamingOptions::keep_original());
    }
}
