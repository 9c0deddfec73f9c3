//! Game configuration
//!
//! Layers, lowest priority first:
//! 1. built-in defaults ([`GameConfig::default`])
//! 2. a TOML file (`--config <path>`, or `bird-flop.toml` in the working directory)
//! 3. environment variables prefixed `BIRD_FLOP_`, with `__` between nested
//!    keys (e.g. `BIRD_FLOP_PHYSICS__GRAVITY=0.6`)

use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Rgb;
use crate::error::{Error, Result};

/// File stem searched in the working directory when no path is given.
pub const DEFAULT_FILE: &str = "bird-flop";

/// Simulation constants, in logical pixels and ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Physics {
    /// Velocity added every tick (positive = downward)
    pub gravity: f64,
    /// Velocity set by a flap
    pub jump_strength: f64,
    /// Fixed horizontal position of the bird's center
    pub bird_x: f64,
    pub bird_radius: f64,
    pub pipe_width: f64,
    /// Height of the passable gap between the two pipe segments
    pub pipe_gap: f64,
    /// Leftward scroll per tick, also the distance gained per tick
    pub pipe_speed: f64,
    /// A new pipe spawns once the rightmost one is this far from the right edge
    pub pipe_spacing: f64,
    /// Minimum clearance between the gap and the top edge / the ground
    pub gap_margin: f64,
    /// Ground band at the bottom of the viewport
    pub ground_height: f64,
    /// score = floor(distance / score_divisor)
    pub score_divisor: f64,
    /// Time-of-day progress gained per tick
    pub transition_speed: f64,
}

impl Physics {
    /// Y coordinate of the ground line for a viewport of the given height.
    pub fn ground_y(&self, height: f64) -> f64 {
        height - self.ground_height
    }
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            jump_strength: -10.0,
            bird_x: 100.0,
            bird_radius: 20.0,
            pipe_width: 80.0,
            pipe_gap: 200.0,
            pipe_speed: 3.0,
            pipe_spacing: 300.0,
            gap_margin: 100.0,
            ground_height: 100.0,
            score_divisor: 30.0,
            transition_speed: 0.002,
        }
    }
}

/// Entity colors and start screen text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub bird: Rgb,
    pub beak: Rgb,
    pub pipe: Rgb,
    pub ground: Rgb,
    pub title: String,
    pub instruction: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bird: Rgb(0xFF, 0xD7, 0x00),
            beak: Rgb(0xFF, 0x63, 0x47),
            pipe: Rgb(0x22, 0x8B, 0x22),
            ground: Rgb(0x8B, 0x45, 0x13),
            title: "Bird Flopping Game".to_string(),
            instruction: "Click, tap, or press SPACE to flap!".to_string(),
        }
    }
}

/// Terminal host settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Host {
    /// Target frames (ticks) per second
    pub fps: u32,
    /// Logical height the terminal is scaled to; width follows the aspect ratio
    pub logical_height: f64,
}

impl Default for Host {
    fn default() -> Self {
        Self {
            fps: 60,
            logical_height: 600.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub physics: Physics,
    pub theme: Theme,
    pub host: Host,
}

impl GameConfig {
    /// Loads the layered configuration. An explicit `path` must exist; the
    /// default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Config::try_from(&GameConfig::default())?;
        let file = match path {
            Some(p) => {
                debug!(path = %p.display(), "Loading config file");
                File::from(p).required(true)
            }
            None => File::with_name(DEFAULT_FILE).required(false),
        };

        let config = Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(
                Environment::with_prefix("BIRD_FLOP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let game: GameConfig = config.try_deserialize()?;
        game.validate()?;
        Ok(game)
    }

    /// Rejects values that would stall or destabilize the simulation.
    pub fn validate(&self) -> Result<()> {
        let p = &self.physics;
        let finite = [
            ("gravity", p.gravity),
            ("jump_strength", p.jump_strength),
            ("bird_x", p.bird_x),
            ("gap_margin", p.gap_margin),
            ("ground_height", p.ground_height),
            ("pipe_spacing", p.pipe_spacing),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(invalid(format!("physics.{name} must be finite")));
            }
        }

        let positive = [
            ("bird_radius", p.bird_radius),
            ("pipe_width", p.pipe_width),
            ("pipe_gap", p.pipe_gap),
            ("pipe_speed", p.pipe_speed),
            ("score_divisor", p.score_divisor),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("physics.{name} must be positive")));
            }
        }

        if !(p.transition_speed > 0.0 && p.transition_speed <= 1.0) {
            return Err(invalid("physics.transition_speed must be in (0, 1]".into()));
        }
        if self.host.fps == 0 {
            return Err(invalid("host.fps must be at least 1".into()));
        }
        if !(self.host.logical_height.is_finite() && self.host.logical_height > 0.0) {
            return Err(invalid("host.logical_height must be positive".into()));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> Error {
    Error::InvalidConfig(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = Physics::default();
        assert_eq!(p.gravity, 0.5);
        assert_eq!(p.jump_strength, -10.0);
        assert_eq!(p.bird_x, 100.0);
        assert_eq!(p.bird_radius, 20.0);
        assert_eq!(p.pipe_width, 80.0);
        assert_eq!(p.pipe_gap, 200.0);
        assert_eq!(p.pipe_speed, 3.0);
        assert_eq!(p.pipe_spacing, 300.0);
        assert_eq!(p.ground_height, 100.0);
        assert_eq!(p.score_divisor, 30.0);
        assert_eq!(p.transition_speed, 0.002);
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_ground_y() {
        assert_eq!(Physics::default().ground_y(600.0), 500.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut cfg = GameConfig::default();
        cfg.physics.pipe_speed = 0.0;
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));

        let mut cfg = GameConfig::default();
        cfg.physics.gravity = f64::NAN;
        assert!(cfg.validate().is_err());

        let mut cfg = GameConfig::default();
        cfg.physics.transition_speed = 1.5;
        assert!(cfg.validate().is_err());

        let mut cfg = GameConfig::default();
        cfg.host.fps = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_load_without_file_yields_defaults() {
        // The default file is optional, a missing one is fine.
        let cfg = GameConfig::load(None).unwrap();
        assert_eq!(cfg.physics, Physics::default());
    }

    #[test]
    fn test_load_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("bird-flop-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[physics]\ngravity = 0.75\n\n[theme]\nbird = \"#FF0000\"\n",
        )
        .unwrap();

        let cfg = GameConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(cfg.physics.gravity, 0.75);
        assert_eq!(cfg.physics.jump_strength, -10.0);
        assert_eq!(cfg.theme.bird, Rgb(255, 0, 0));
        assert_eq!(cfg.theme.pipe, Theme::default().pipe);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let path = std::env::temp_dir().join("bird-flop-does-not-exist.toml");
        assert!(matches!(
            GameConfig::load(Some(&path)),
            Err(Error::Config(_))
        ));
    }
}
