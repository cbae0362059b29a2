//! Game settings, loaded once at startup.
//!
//! Every key in `settings.toml` is required. A missing or misspelled key is a
//! packaging error, so loading fails instead of falling back to a default.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Settings compiled into the binary.
const EMBEDDED_SETTINGS: &str = include_str!("../settings.toml");
/// Environment variable naming an override settings file.
pub const SETTINGS_ENV: &str = "BIGFISH_SETTINGS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub screen: ScreenSettings,
    pub map: MapSettings,
    pub simulation: SimulationSettings,
    pub experience: ExperienceSettings,
    pub player: PlayerSettings,
    pub thrust: ThrustSettings,
    pub enemies: EnemySettings,
    pub school: SchoolSettings,
    pub barracuda: BarracudaSettings,
    pub spawn: SpawnSettings,
    pub camera: CameraSettings,
    pub text: TextSettings,
    pub hud: HudSettings,
}

/// Window size in pixels.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScreenSettings {
    pub width: u32,
    pub height: u32,
}

/// Playable area. The camera never scrolls past its edges.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapSettings {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSettings {
    /// Fixed logical frames per second. Timed transitions are converted to ticks with it.
    pub tick_rate: f64,
    /// Per-frame probability of a spawn roll.
    pub spawn_rate: f32,
    /// Creatures farther than this from the player are despawned.
    pub removal_distance: f64,
}

/// `total_factor * (exp_factor * level^exponent)`
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperienceSettings {
    pub total_factor: f64,
    pub exp_factor: f64,
    pub exponent: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerSettings {
    pub start_size: f64,
    pub start_level: u32,
    pub max_velocity: f64,
    pub steer_smoothing: f64,
    pub mouth_size_factor: f64,
    pub max_level: u32,
    pub initial_xp_to_next_level: u64,
    pub xp_growth_factor: u64,
    pub size_growth_factor: f64,
    pub respawn_invulnerability_secs: f64,
    pub blink_secs: f64,
    pub blink_frequency: f64,
    pub win_exit_delay_secs: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThrustSettings {
    pub speed: f64,
    pub duration: f64,
    /// Burst time advanced per sub-step.
    pub time_increment: f64,
    pub substeps_per_tick: u32,
    /// The burst ends once its speed drops below this.
    pub min_speed: f64,
    /// Multiplier applied to burst displacement before it is fed to the camera.
    pub camera_weight: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnemySettings {
    pub speed: f64,
    pub y_velocity_offset: f64,
    /// Distance off-screen at which new creatures appear.
    pub screen_margin: f64,
    pub tiers: Vec<EnemyTier>,
}

/// Size and collider layout of a basic enemy of one level.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnemyTier {
    pub level: u32,
    pub width: f64,
    pub height: f64,
    pub mouth_size: f64,
    pub body_height: f64,
    pub body_offset_y: f64,
    pub mouth_offset_y: f64,
    pub sprite: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchoolSettings {
    pub min_count: u32,
    pub max_count: u32,
    pub spacing: f64,
    pub displacement_factor: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BarracudaSettings {
    pub level: u32,
    pub lives: u32,
    pub speed: f64,
    pub width: f64,
    pub height: f64,
    pub body_width: f64,
    pub body_height: f64,
    pub body_offset_x: f64,
    pub body_offset_y: f64,
    pub mouth_size: f64,
    pub mouth_offset_x: f64,
    pub mouth_offset_y: f64,
    pub spawn_margin: f64,
    pub wait_secs: f64,
    pub chase_secs: f64,
    pub chase_speed: f64,
    pub cruise_speed: f64,
    pub tail_bite_xp: u64,
    pub tail_bite_text_offset_y: f64,
}

/// Cumulative probability bands for the per-roll creature choice.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpawnSettings {
    pub barracuda_chance: f64,
    pub large_band: f32,
    pub medium_band: f32,
    pub school_band: f32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraSettings {
    pub return_velocity: f64,
    pub max_samples: usize,
    pub return_distance: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextSettings {
    pub xp_speed: f64,
    pub xp_size: f32,
    pub oh_no_speed: f64,
    pub oh_no_size: f32,
    pub win_size: f32,
    pub reach_margin: f64,
    pub approach_smoothing: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HudSettings {
    pub progress_x: f32,
    pub progress_y: f32,
    pub progress_width: f32,
    pub progress_height: f32,
    pub progress_border: f32,
    pub score_right_margin: f64,
    pub score_top_margin: f64,
    pub score_increment: u64,
    pub score_text_size: f32,
}

impl Settings {
    /// Load settings from `$BIGFISH_SETTINGS` if set, else the embedded defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(SETTINGS_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                log::info!("Loading settings from {}", path.display());
                Self::from_file(&path)
            }
            None => {
                log::info!("Using embedded settings");
                Self::embedded()
            }
        }
    }

    pub fn embedded() -> Result<Self, ConfigError> {
        Self::parse(EMBEDDED_SETTINGS)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation.tick_rate <= 0.0 {
            return Err(invalid("simulation.tick_rate", "must be positive"));
        }
        if self.enemies.tiers.is_empty() {
            return Err(invalid("enemies.tiers", "at least one tier is required"));
        }
        if self.camera.max_samples == 0 {
            return Err(invalid("camera.max_samples", "must be at least 1"));
        }
        if self.school.min_count > self.school.max_count {
            return Err(invalid("school.min_count", "exceeds school.max_count"));
        }
        let s = &self.spawn;
        if !(s.large_band <= s.medium_band && s.medium_band <= s.school_band && s.school_band <= 1.0) {
            return Err(invalid("spawn", "bands must be ascending and at most 1.0"));
        }
        if self.player.max_level < self.player.start_level {
            return Err(invalid("player.max_level", "below player.start_level"));
        }
        if self.thrust.duration <= 0.0 {
            return Err(invalid("thrust.duration", "must be positive"));
        }
        Ok(())
    }

    /// Convert a duration to a whole number of ticks (at least one).
    pub fn ticks(&self, secs: f64) -> u64 {
        ((secs * self.simulation.tick_rate).round() as u64).max(1)
    }

    /// Tier for a basic enemy level, if one is configured.
    pub fn tier(&self, level: u32) -> Option<&EnemyTier> {
        self.enemies.tiers.iter().find(|t| t.level == level)
    }
}

fn invalid(key: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: reason.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_settings_parse() {
        let s = Settings::embedded().unwrap();
        assert_eq!(s.screen.width, 1000);
        assert_eq!(s.barracuda.level, 15);
        assert_eq!(s.enemies.tiers.len(), 3);
        assert_eq!(s.tier(3).unwrap().sprite, "LARGE FISH");
        assert!(s.tier(7).is_none());
    }

    #[test]
    fn missing_key_is_fatal() {
        let text = EMBEDDED_SETTINGS.replace("tick_rate = 60.0\n", "");
        let err = Settings::parse(&text).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("tick_rate"));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let text = EMBEDDED_SETTINGS.replace("[map]\n", "[map]\ndepth = 3\n");
        assert!(matches!(Settings::parse(&text), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn out_of_order_spawn_bands_are_invalid() {
        let text = EMBEDDED_SETTINGS.replace("medium_band = 0.6", "medium_band = 0.1");
        assert!(matches!(
            Settings::parse(&text),
            Err(ConfigError::Invalid { key: "spawn", .. })
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Settings::from_file(Path::new("/nonexistent/bigfish.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/bigfish.toml"));
    }

    #[test]
    fn durations_convert_to_ticks() {
        let s = Settings::embedded().unwrap();
        assert_eq!(s.ticks(3.0), 180);
        assert_eq!(s.ticks(0.0), 1);
    }
}
