//! Global tunables and table presets
//!
//! Loaded from JSON when a path is given, otherwise the classic table defaults.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Built-in table configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Preset {
    /// Full pinball table with bumpers, flippers and a drain
    #[default]
    Classic,
    /// Balls bouncing in space with no friction or gravity
    Frictionless,
    /// Balls dropping under gravity
    Dropping,
    /// Balls dropping onto slanted lines
    Lines,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Classic => "classic",
            Preset::Frictionless => "frictionless",
            Preset::Dropping => "dropping",
            Preset::Lines => "lines",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "pinball" => Some(Preset::Classic),
            "frictionless" | "space" => Some(Preset::Frictionless),
            "dropping" | "drop" => Some(Preset::Dropping),
            "lines" => Some(Preset::Lines),
            _ => None,
        }
    }

    /// Tunables matching this preset's table
    pub fn tunables(&self) -> Tunables {
        let base = Tunables::default();
        match self {
            Preset::Classic => base,
            Preset::Frictionless => Tunables {
                friction: 1.0,
                gravity: 0.0,
                bumper_multiplier: 1.0,
                max_speed: 50.0,
                ..base
            },
            Preset::Dropping => Tunables {
                friction: 0.995,
                gravity: 0.1,
                bumper_multiplier: 1.0,
                max_speed: 50.0,
                ..base
            },
            Preset::Lines => Tunables {
                friction: 0.99,
                gravity: 0.1,
                bumper_multiplier: 1.0,
                max_speed: 50.0,
                ..base
            },
        }
    }
}

/// False for NaN as well as for out-of-range values
fn positive(v: f32) -> bool {
    v > 0.0
}

fn non_negative(v: f32) -> bool {
    v >= 0.0
}

/// Global simulation tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunables {
    // === Table ===
    /// Outer bound width
    pub width: f32,
    /// Outer bound height
    pub height: f32,

    // === Environment ===
    /// Friction coefficient outside friction regions
    pub friction: f32,
    /// Gravity increment per tick outside gravity regions
    pub gravity: f32,
    /// Bumper factor the built-in tables give their bumpers
    pub bumper_multiplier: f32,
    /// Per-axis velocity cap
    pub max_speed: f32,

    // === Collisions ===
    /// Multiplier applied to an actuator's bumper factor while extended
    pub actuator_boost: f32,
    /// Uniform jitter (+/-) added per axis after a segment bounce
    pub line_jitter: f32,

    // === Launching ===
    /// Balls the player may launch
    pub spawn_limit: u32,
    /// Key that launches a ball
    pub spawn_key: char,
    /// Top-left of a launched ball's bounding box
    pub launch_position: Vec2,
    /// Initial velocity of a launched ball
    pub launch_velocity: Vec2,
    /// Nominal diameter of a launched ball
    pub launch_diameter: f32,
    /// Random size multiplier range (min, max)
    pub launch_scale: (f32, f32),

    // === Input ===
    /// Capacity of the key queue
    pub input_capacity: usize,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            width: TABLE_WIDTH,
            height: TABLE_HEIGHT,

            friction: FRICTION,
            gravity: GRAVITY,
            bumper_multiplier: BUMPER_MULTIPLIER,
            max_speed: MAX_SPEED,

            actuator_boost: ACTUATOR_BOOST,
            line_jitter: LINE_JITTER,

            spawn_limit: BALL_LIMIT,
            spawn_key: SPAWN_KEY,
            launch_position: Vec2::new(LAUNCH_X, LAUNCH_Y),
            launch_velocity: Vec2::new(0.0, -LAUNCH_SPEED),
            launch_diameter: LAUNCH_DIAMETER,
            launch_scale: (0.5, 1.5),

            input_capacity: INPUT_CAPACITY,
        }
    }
}

impl Tunables {
    /// Check ranges that would otherwise surface as NaNs mid-simulation
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !positive(self.width) {
            return Err(ConfigError::tunable("width", self.width));
        }
        if !positive(self.height) {
            return Err(ConfigError::tunable("height", self.height));
        }
        if !non_negative(self.friction) {
            return Err(ConfigError::tunable("friction", self.friction));
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::tunable("gravity", self.gravity));
        }
        if !positive(self.max_speed) {
            return Err(ConfigError::tunable("max_speed", self.max_speed));
        }
        // Jitter is sampled from a range of width 2 * line_jitter
        if !non_negative(self.line_jitter) || !(2.0 * self.line_jitter).is_finite() {
            return Err(ConfigError::tunable("line_jitter", self.line_jitter));
        }
        if !positive(self.launch_diameter) || !self.launch_diameter.is_finite() {
            return Err(ConfigError::tunable("launch_diameter", self.launch_diameter));
        }
        let (lo, hi) = self.launch_scale;
        if !positive(lo) || lo > hi || !(self.launch_diameter * hi).is_finite() {
            return Err(ConfigError::tunable("launch_scale", format!("{lo}..{hi}")));
        }
        if self.input_capacity == 0 {
            return Err(ConfigError::tunable("input_capacity", self.input_capacity));
        }
        Ok(())
    }

    /// Load tunables from a JSON file, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            log::info!("Using default tunables");
            return Ok(Self::default());
        };

        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tunables: Self = serde_json::from_str(&json)?;
        tunables.validate()?;
        log::info!("Loaded tunables from {}", path.display());
        Ok(tunables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tunables::default().validate().is_ok());
        for preset in [
            Preset::Classic,
            Preset::Frictionless,
            Preset::Dropping,
            Preset::Lines,
        ] {
            assert!(preset.tunables().validate().is_ok(), "{}", preset.as_str());
        }
    }

    #[test]
    fn test_preset_names_round_trip() {
        for preset in [
            Preset::Classic,
            Preset::Frictionless,
            Preset::Dropping,
            Preset::Lines,
        ] {
            assert_eq!(Preset::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(Preset::from_str("SPACE"), Some(Preset::Frictionless));
        assert_eq!(Preset::from_str("pong"), None);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = Tunables {
            max_speed: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(ConfigError::InvalidTunable { name: "max_speed", .. })
        ));

        let bad = Tunables {
            friction: -0.5,
            ..Default::default()
        };
        assert!(bad.validate().is_err());

        let bad = Tunables {
            launch_scale: (1.5, 0.5),
            ..Default::default()
        };
        assert!(bad.validate().is_err());

        for jitter in [f32::INFINITY, f32::NAN, 3.0e38, -0.1] {
            let bad = Tunables {
                line_jitter: jitter,
                ..Default::default()
            };
            assert!(matches!(
                bad.validate(),
                Err(ConfigError::InvalidTunable { name: "line_jitter", .. })
            ));
        }

        for diameter in [f32::INFINITY, f32::NAN, 0.0] {
            let bad = Tunables {
                launch_diameter: diameter,
                ..Default::default()
            };
            assert!(matches!(
                bad.validate(),
                Err(ConfigError::InvalidTunable { name: "launch_diameter", .. })
            ));
        }

        let bad = Tunables {
            launch_diameter: 3.0e38,
            launch_scale: (0.5, 1.5),
            ..Default::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(ConfigError::InvalidTunable { name: "launch_scale", .. })
        ));
    }

    #[test]
    fn test_overflowing_json_jitter_rejected() {
        // 1e39 does not fit in an f32 and parses as infinity
        let tunables: Tunables = serde_json::from_str(r#"{ "line_jitter": 1e39 }"#).unwrap();
        assert!(tunables.line_jitter.is_infinite());
        assert!(tunables.validate().is_err());

        let near_max = Tunables {
            line_jitter: f32::MAX / 4.0,
            ..Default::default()
        };
        assert!(near_max.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let tunables: Tunables =
            serde_json::from_str(r#"{ "friction": 1.0, "gravity": 0.0 }"#).unwrap();
        assert_eq!(tunables.friction, 1.0);
        assert_eq!(tunables.gravity, 0.0);
        assert_eq!(tunables.max_speed, MAX_SPEED);
        assert_eq!(tunables.spawn_key, SPAWN_KEY);
    }

    #[test]
    fn test_load_without_path_uses_defaults() {
        let tunables = Tunables::load(None).unwrap();
        assert_eq!(tunables.spawn_limit, BALL_LIMIT);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Tunables::load(Some(Path::new("/definitely/not/here.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
