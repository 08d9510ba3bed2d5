use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    COLLISION_MARGIN, DEFAULT_FPS, EATEN_SPEED, FRIGHTENED_SPEED, GHOST_RESPAWN_SECS,
    GHOST_SPEED, PLAYER_SPEED, POWER_DURATION_SECS, STARTING_LIVES, TILE_SIZE,
};
use crate::error::ConfigError;

const CONFIG_PATH_VAR: &str = "MAZE_CHASE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/maze_chase.toml";

/// Smallest tile that still gives both agents a positive radius.
const MIN_TILE_SIZE: i32 = 8;
/// Upper bound for power and respawn timers, in seconds.
const MAX_TIMER_SECS: f32 = 3600.0;

/// Tunable game parameters, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub tile_size: i32,
    pub player_speed: i32,
    pub ghost_speed: i32,
    pub frightened_speed: i32,
    pub eaten_speed: i32,
    pub power_duration_secs: f32,
    pub ghost_respawn_secs: f32,
    pub starting_lives: u32,
    pub collision_margin: i32,
    pub fps: u64,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            player_speed: PLAYER_SPEED,
            ghost_speed: GHOST_SPEED,
            frightened_speed: FRIGHTENED_SPEED,
            eaten_speed: EATEN_SPEED,
            power_duration_secs: POWER_DURATION_SECS,
            ghost_respawn_secs: GHOST_RESPAWN_SECS,
            starting_lives: STARTING_LIVES,
            collision_margin: COLLISION_MARGIN,
            fps: DEFAULT_FPS,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is missing
    /// or unparseable, then applies environment overrides.
    pub fn load() -> Self {
        let path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    GameConfig::default()
                }
            },
            Err(_) => GameConfig::default(),
        };
        config.apply_env_overrides();
        config
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(fps) = std::env::var("MAZE_CHASE_FPS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
        {
            self.fps = fps;
        }
        if let Some(seed) = std::env::var("MAZE_CHASE_SEED")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.seed = Some(seed);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_size < MIN_TILE_SIZE {
            return Err(ConfigError::TileTooSmall(self.tile_size));
        }
        for (name, value) in [
            ("player_speed", self.player_speed),
            ("ghost_speed", self.ghost_speed),
            ("frightened_speed", self.frightened_speed),
            ("eaten_speed", self.eaten_speed),
        ] {
            if value < 1 || value > self.tile_size {
                return Err(ConfigError::BadSpeed {
                    name,
                    value,
                    tile_size: self.tile_size,
                });
            }
        }
        if self.frightened_speed >= self.ghost_speed || self.eaten_speed <= self.ghost_speed {
            return Err(ConfigError::SpeedOrder {
                frightened: self.frightened_speed,
                chase: self.ghost_speed,
                eaten: self.eaten_speed,
            });
        }
        for (name, value) in [
            ("power_duration_secs", self.power_duration_secs),
            ("ghost_respawn_secs", self.ghost_respawn_secs),
        ] {
            let in_range = value <= MAX_TIMER_SECS
                && Duration::try_from_secs_f32(value).is_ok_and(|d| !d.is_zero());
            if !in_range {
                return Err(ConfigError::BadDuration {
                    name,
                    value,
                    max: MAX_TIMER_SECS,
                });
            }
        }
        if self.fps == 0 {
            return Err(ConfigError::NoFrameRate);
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::NoLives);
        }
        if self.collision_margin < 0 {
            return Err(ConfigError::NegativeMargin(self.collision_margin));
        }
        let reach = self.collision_reach();
        if reach < 1 {
            return Err(ConfigError::NoCollisionReach {
                reach,
                margin: self.collision_margin,
            });
        }
        Ok(())
    }

    pub fn power_duration(&self) -> Duration {
        Duration::from_secs_f32(self.power_duration_secs)
    }

    pub fn ghost_respawn(&self) -> Duration {
        Duration::from_secs_f32(self.ghost_respawn_secs)
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.fps.max(1))
    }

    pub fn player_radius(&self) -> i32 {
        self.tile_size / 2 - 2
    }

    pub fn ghost_radius(&self) -> i32 {
        self.tile_size / 2 - 3
    }

    /// Centre distance below which the player and a ghost touch.
    pub fn collision_reach(&self) -> i32 {
        self.player_radius() + self.ghost_radius() - self.collision_margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = GameConfig::from_toml_str("power_duration_secs = 5.0\nseed = 9\n").unwrap();
        assert_eq!(cfg.power_duration_secs, 5.0);
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.tile_size, TILE_SIZE);
        assert_eq!(cfg.starting_lives, STARTING_LIVES);
    }

    #[test]
    fn rejects_speed_faster_than_a_tile() {
        let cfg = GameConfig {
            ghost_speed: TILE_SIZE + 1,
            ..GameConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::BadSpeed {
                name: "ghost_speed",
                ..
            })
        ));
    }

    #[test]
    fn rejects_zero_lives_and_durations() {
        let cfg = GameConfig {
            starting_lives: 0,
            ..GameConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NoLives));

        let cfg = GameConfig {
            power_duration_secs: 0.0,
            ..GameConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::BadDuration { .. })
        ));
    }

    #[test]
    fn rejects_timers_that_do_not_fit_a_duration() {
        for value in [1e20, f32::INFINITY, f32::NAN, -1.0, 3600.5] {
            let cfg = GameConfig {
                power_duration_secs: value,
                ..GameConfig::default()
            };
            assert!(
                matches!(
                    cfg.validate(),
                    Err(ConfigError::BadDuration {
                        name: "power_duration_secs",
                        ..
                    })
                ),
                "accepted power_duration_secs = {value}"
            );
        }
        let cfg = GameConfig {
            ghost_respawn_secs: 1e20,
            ..GameConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::BadDuration {
                name: "ghost_respawn_secs",
                ..
            })
        ));

        // The largest accepted timer still converts.
        let cfg = GameConfig {
            power_duration_secs: MAX_TIMER_SECS,
            ..GameConfig::default()
        };
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.power_duration(), Duration::from_secs(3600));
    }

    #[test]
    fn ghost_speeds_keep_their_order() {
        let cfg = GameConfig {
            frightened_speed: 6,
            eaten_speed: 1,
            ..GameConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::SpeedOrder {
                frightened: 6,
                chase: GHOST_SPEED,
                eaten: 1
            })
        );

        let cfg = GameConfig {
            frightened_speed: GHOST_SPEED,
            ..GameConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::SpeedOrder { .. })));

        let cfg = GameConfig {
            eaten_speed: GHOST_SPEED,
            ..GameConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::SpeedOrder { .. })));
    }

    #[test]
    fn collisions_cannot_be_disabled() {
        let cfg = GameConfig {
            tile_size: 4,
            player_speed: 2,
            ghost_speed: 2,
            frightened_speed: 1,
            eaten_speed: 3,
            ..GameConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::TileTooSmall(4)));

        let cfg = GameConfig {
            collision_margin: -1,
            ..GameConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NegativeMargin(-1)));

        let cfg = GameConfig {
            collision_margin: 19,
            ..GameConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::NoCollisionReach {
                reach: 0,
                margin: 19
            })
        );

        // Smallest tile: radii 2 and 1, reach 3 with no margin.
        let cfg = GameConfig {
            tile_size: 8,
            player_speed: 2,
            ghost_speed: 2,
            frightened_speed: 1,
            eaten_speed: 3,
            collision_margin: 0,
            ..GameConfig::default()
        };
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.collision_reach(), 3);
    }

    #[test]
    fn zero_fps_is_rejected() {
        let cfg = GameConfig {
            fps: 0,
            ..GameConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NoFrameRate));
    }

    #[test]
    fn radii_follow_tile_size() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.player_radius(), 10);
        assert_eq!(cfg.ghost_radius(), 9);
    }
}
