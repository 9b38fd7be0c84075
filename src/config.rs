//! Configuration persistence for snipmark settings
//!
//! Settings are read once when a session opens and treated as read-only for
//! its duration; the magnifier zoom factor is the one value written back on
//! change.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Serializable color representation for config storage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for ShapeColor {
    fn default() -> Self {
        // Default red annotation color
        Self {
            r: 0.9,
            g: 0.1,
            b: 0.1,
        }
    }
}

impl ShapeColor {
    /// Convert to image crate RGBA format (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        self.to_rgba_u8_with_alpha(1.0)
    }

    /// Convert with an explicit opacity (used by the watermark stamp)
    pub fn to_rgba_u8_with_alpha(self, alpha: f32) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }
}

/// Export quality tier: a named bundle of encoding format, compression
/// strength and optional downscale applied at export time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QualityTier {
    #[default]
    Maximum,
    Medium,
    Minimum,
}

impl QualityTier {
    /// Lossless tiers encode to PNG, lossy tiers to JPEG
    pub fn is_lossy(self) -> bool {
        !matches!(self, QualityTier::Maximum)
    }

    /// JPEG quality factor for the lossy tiers
    pub fn jpeg_quality(self) -> u8 {
        match self {
            QualityTier::Maximum => 100,
            QualityTier::Medium => 80,
            QualityTier::Minimum => 50,
        }
    }

    /// Whether this tier downscales 50% per axis when the downscale
    /// setting is enabled
    pub fn downscales(self) -> bool {
        matches!(self, QualityTier::Minimum)
    }
}

/// Magnifier zoom factor, limited to three discrete steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ZoomFactor {
    #[default]
    X1_5,
    X2,
    X4,
}

impl ZoomFactor {
    pub fn factor(self) -> f32 {
        match self {
            ZoomFactor::X1_5 => 1.5,
            ZoomFactor::X2 => 2.0,
            ZoomFactor::X4 => 4.0,
        }
    }

    /// Get the next zoom factor in the cycle (modifier-scroll gesture)
    pub fn next(self) -> Self {
        match self {
            ZoomFactor::X1_5 => ZoomFactor::X2,
            ZoomFactor::X2 => ZoomFactor::X4,
            ZoomFactor::X4 => ZoomFactor::X1_5,
        }
    }

    /// Step up without wrapping (stepper control)
    pub fn step_up(self) -> Self {
        match self {
            ZoomFactor::X1_5 => ZoomFactor::X2,
            ZoomFactor::X2 | ZoomFactor::X4 => ZoomFactor::X4,
        }
    }

    /// Step down without wrapping (stepper control)
    pub fn step_down(self) -> Self {
        match self {
            ZoomFactor::X4 => ZoomFactor::X2,
            ZoomFactor::X2 | ZoomFactor::X1_5 => ZoomFactor::X1_5,
        }
    }
}

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Export quality tier for file delivery
    pub quality: QualityTier,
    /// Whether the minimum tier additionally downscales 50% per axis
    pub downscale_minimum: bool,
    /// Default color for new annotation shapes
    pub shape_color: ShapeColor,
    /// Default stroke/fill width for new shapes, in view-space units
    pub stroke_width: f32,
    /// Whether to stamp a formatted date/time bottom-right in the selection
    pub timestamp_enabled: bool,
    /// chrono format string for the timestamp stamp
    pub timestamp_format: String,
    /// Whether to stamp the watermark text centered in the selection
    pub watermark_enabled: bool,
    /// Watermark text content
    pub watermark_text: String,
    /// Watermark point size
    pub watermark_size: u32,
    /// Last-used magnifier zoom factor, written back on change
    pub magnifier_zoom: ZoomFactor,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityTier::Maximum,
            downscale_minimum: true,
            shape_color: ShapeColor::default(),
            stroke_width: 4.0,
            timestamp_enabled: false,
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
            watermark_enabled: false,
            watermark_text: String::new(),
            watermark_size: 24,
            magnifier_zoom: ZoomFactor::default(),
        }
    }
}

impl Settings {
    fn path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("snipmark").join("settings.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            log::warn!("No config directory available, using default settings");
            return Self::default();
        };
        match fs::read_to_string(&path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(settings) => settings,
                Err(err) => {
                    log::warn!("Error parsing config, using defaults: {err:?}");
                    Self::default()
                }
            },
            Err(err) => {
                log::debug!("Could not read config at {path:?}: {err:?}");
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::path() else {
            log::error!("No config directory available, settings not saved");
            return;
        };
        let write = || -> anyhow::Result<()> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, serde_json::to_string_pretty(self)?)?;
            Ok(())
        };
        if let Err(err) = write() {
            log::error!("Failed to save config: {err:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_factor_cycles_through_all_three() {
        let mut z = ZoomFactor::X1_5;
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(z.factor());
            z = z.next();
        }
        assert_eq!(seen, vec![1.5, 2.0, 4.0]);
        assert_eq!(z, ZoomFactor::X1_5);
    }

    #[test]
    fn zoom_stepper_clamps_at_ends() {
        assert_eq!(ZoomFactor::X4.step_up(), ZoomFactor::X4);
        assert_eq!(ZoomFactor::X1_5.step_down(), ZoomFactor::X1_5);
        assert_eq!(ZoomFactor::X2.step_down(), ZoomFactor::X1_5);
    }

    #[test]
    fn only_maximum_tier_is_lossless() {
        assert!(!QualityTier::Maximum.is_lossy());
        assert!(QualityTier::Medium.is_lossy());
        assert!(QualityTier::Minimum.is_lossy());
        assert!(QualityTier::Minimum.downscales());
        assert!(!QualityTier::Medium.downscales());
    }

    #[test]
    fn settings_round_trip_through_json() {
        let settings = Settings {
            quality: QualityTier::Minimum,
            watermark_text: "internal use only".to_string(),
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
