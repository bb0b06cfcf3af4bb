//! Tunable arena layout and pacing parameters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Lane, Position, Team};

/// Number of horizontal lanes on the board.
pub const LANE_COUNT: usize = 3;

/// Complete description of the board and its pacing.
///
/// The defaults describe a 960×540 board. Every
/// section deserializes with `#[serde(default)]`, so configuration files only
/// need to name the values they override.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Board width in world units.
    pub width: f32,
    /// Board height in world units.
    pub height: f32,
    /// Horizontal distance between each tower and its board edge.
    pub tower_inset: f32,
    /// Starting hit points of both towers.
    pub tower_hp: f32,
    /// Vertical lane centres as fractions of the board height, top to bottom.
    pub lanes: [f32; LANE_COUNT],
    /// River band and its movement penalty.
    pub river: RiverConfig,
    /// Elixir pool parameters.
    pub elixir: ElixirConfig,
    /// Engagement distances.
    pub combat: CombatConfig,
    /// Unit placement spread.
    pub swarm: SwarmConfig,
    /// Enemy spawn cadence.
    pub enemy: EnemyConfig,
    /// Seed for every random stream of the match.
    pub seed: u64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 540.0,
            tower_inset: 80.0,
            tower_hp: 1_000.0,
            lanes: [0.28, 0.5, 0.72],
            river: RiverConfig::default(),
            elixir: ElixirConfig::default(),
            combat: CombatConfig::default(),
            swarm: SwarmConfig::default(),
            enemy: EnemyConfig::default(),
            seed: 0x1a4e_b477_1e5e_ed00,
        }
    }
}

impl ArenaConfig {
    /// Checks that every value describes a playable board.
    ///
    /// Sizes, rates, spacing and enemy intervals must be positive and
    /// finite. Offsets, allowances, jitter and delays must be finite and not
    /// negative. Lane and river fractions must lie inside the board, and the
    /// enemy interval must not be inverted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("tower_hp", self.tower_hp),
            ("elixir.max", self.elixir.max),
            ("elixir.per_second", self.elixir.per_second),
            ("swarm.spacing", self.swarm.spacing),
            ("enemy.min_interval_secs", self.enemy.min_interval_secs),
            ("enemy.max_interval_secs", self.enemy.max_interval_secs),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let non_negative = [
            ("tower_inset", self.tower_inset),
            ("elixir.initial", self.elixir.initial),
            ("river.top", self.river.top),
            ("river.depth", self.river.depth),
            ("river.friction", self.river.friction),
            ("combat.melee_reach", self.combat.melee_reach),
            ("combat.tower_reach", self.combat.tower_reach),
            ("swarm.swarm_jitter", self.swarm.swarm_jitter),
            ("swarm.single_jitter", self.swarm.single_jitter),
            ("enemy.first_spawn_secs", self.enemy.first_spawn_secs),
            ("enemy.deploy_inset", self.enemy.deploy_inset),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }

        for (index, value) in self.lanes.into_iter().enumerate() {
            if !(value > 0.0 && value < 1.0) {
                return Err(ConfigError::LaneOutsideBoard { index, value });
            }
        }

        if self.river.top + self.river.depth > 1.0 {
            return Err(ConfigError::RiverOutsideBoard {
                top: self.river.top,
                depth: self.river.depth,
            });
        }

        if self.enemy.min_interval_secs > self.enemy.max_interval_secs {
            return Err(ConfigError::InvertedInterval {
                min: self.enemy.min_interval_secs,
                max: self.enemy.max_interval_secs,
            });
        }

        Ok(())
    }

    /// Vertical centre of `lane` in world units.
    #[must_use]
    pub fn lane_y(&self, lane: Lane) -> f32 {
        self.lanes[lane.index()] * self.height
    }

    /// Lane whose centre lies closest to `y`. Ties resolve to the upper lane.
    #[must_use]
    pub fn nearest_lane(&self, y: f32) -> Lane {
        let mut best = Lane::ALL[0];
        let mut best_distance = f32::INFINITY;
        for lane in Lane::ALL {
            let distance = (y - self.lane_y(lane)).abs();
            if distance < best_distance {
                best_distance = distance;
                best = lane;
            }
        }
        best
    }

    /// Reports whether `y` lies strictly inside the river band.
    #[must_use]
    pub fn in_river(&self, y: f32) -> bool {
        let top = self.river.top * self.height;
        let bottom = top + self.river.depth * self.height;
        y > top && y < bottom
    }

    /// Fixed position of the tower owned by `team`.
    #[must_use]
    pub fn tower_position(&self, team: Team) -> Position {
        let x = match team {
            Team::Player => self.tower_inset,
            Team::Enemy => self.width - self.tower_inset,
        };
        Position::new(x, self.height / 2.0)
    }

    /// Reports whether `x` lies on the half of the board `team` may deploy to.
    ///
    /// The centre line belongs to both halves.
    #[must_use]
    pub fn owns_half(&self, team: Team, x: f32) -> bool {
        let centre = self.width / 2.0;
        match team {
            Team::Player => x <= centre,
            Team::Enemy => x >= centre,
        }
    }
}

/// Reasons an arena configuration may fail validation.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A size, rate, spacing or interval is zero, negative, or not finite.
    #[error("`{field}` must be a positive finite number, found {value}")]
    NotPositive {
        /// Name of the offending value.
        field: &'static str,
        /// Value found in the configuration.
        value: f32,
    },
    /// An offset, allowance, jitter or delay is negative or not finite.
    #[error("`{field}` must be a finite number of at least zero, found {value}")]
    Negative {
        /// Name of the offending value.
        field: &'static str,
        /// Value found in the configuration.
        value: f32,
    },
    /// A lane centre lies on or beyond the board edge.
    #[error("lane {index} sits at {value}, expected a fraction strictly between 0 and 1")]
    LaneOutsideBoard {
        /// Zero-based lane index.
        index: usize,
        /// Fraction found in the configuration.
        value: f32,
    },
    /// The river band extends below the board.
    #[error("river band {top} + {depth} extends past the bottom of the board")]
    RiverOutsideBoard {
        /// Upper edge fraction.
        top: f32,
        /// Height fraction.
        depth: f32,
    },
    /// The enemy's shortest interval exceeds its longest.
    #[error("enemy interval {min}..{max} seconds is inverted")]
    InvertedInterval {
        /// Configured lower bound.
        min: f32,
        /// Configured upper bound.
        max: f32,
    },
}

/// Horizontal river band expressed in fractions of the board height.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiverConfig {
    /// Upper edge of the band.
    pub top: f32,
    /// Height of the band.
    pub depth: f32,
    /// Fraction of a unit's speed given back while it moves through the band.
    pub friction: f32,
}

impl Default for RiverConfig {
    fn default() -> Self {
        Self {
            top: 0.42,
            depth: 0.16,
            friction: 0.15,
        }
    }
}

/// Elixir accrual and bounds, shared by both teams.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElixirConfig {
    /// Upper bound of a pool.
    pub max: f32,
    /// Elixir gained per simulated second.
    pub per_second: f32,
    /// Pool contents when the match starts.
    pub initial: f32,
}

impl Default for ElixirConfig {
    fn default() -> Self {
        Self {
            max: 10.0,
            per_second: 1.0 / 1.5,
            initial: 0.0,
        }
    }
}

/// Extra reach added to a unit's range when testing engagement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Allowance used against enemy units.
    pub melee_reach: f32,
    /// Allowance used against the enemy tower, modelling its hitbox.
    pub tower_reach: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            melee_reach: 6.0,
            tower_reach: 20.0,
        }
    }
}

/// Placement spread applied by the spawner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    /// Horizontal gap between members of a multi-unit card.
    pub spacing: f32,
    /// Maximum vertical offset from the lane for members of a multi-unit card.
    pub swarm_jitter: f32,
    /// Maximum vertical offset from the lane for single units.
    pub single_jitter: f32,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            spacing: 10.0,
            swarm_jitter: 4.0,
            single_jitter: 3.0,
        }
    }
}

/// Timer-driven enemy deployment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Disables the enemy AI entirely when `false`.
    pub enabled: bool,
    /// Seconds before the first enemy deployment.
    pub first_spawn_secs: f32,
    /// Lower bound of the delay between later deployments, in seconds.
    pub min_interval_secs: f32,
    /// Upper bound of the delay between later deployments, in seconds.
    pub max_interval_secs: f32,
    /// Distance between the right board edge and the enemy deployment line.
    pub deploy_inset: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            first_spawn_secs: 1.5,
            min_interval_secs: 2.0,
            max_interval_secs: 4.0,
            deploy_inset: 120.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lanes_follow_board_height() {
        let config = ArenaConfig::default();
        assert!((config.lane_y(Lane::ALL[0]) - 151.2).abs() < 1e-3);
        assert!((config.lane_y(Lane::ALL[1]) - 270.0).abs() < 1e-3);
        assert!((config.lane_y(Lane::ALL[2]) - 388.8).abs() < 1e-3);
    }

    #[test]
    fn nearest_lane_picks_closest_centre() {
        let config = ArenaConfig::default();
        assert_eq!(config.nearest_lane(0.0), Lane::ALL[0]);
        assert_eq!(config.nearest_lane(260.0), Lane::ALL[1]);
        assert_eq!(config.nearest_lane(540.0), Lane::ALL[2]);
    }

    #[test]
    fn river_band_is_exclusive() {
        let config = ArenaConfig::default();
        let top = 0.42 * 540.0;
        assert!(!config.in_river(top));
        assert!(config.in_river(top + 1.0));
        assert!(config.in_river(config.lane_y(Lane::ALL[1])));
        assert!(!config.in_river(config.lane_y(Lane::ALL[0])));
    }

    #[test]
    fn towers_sit_at_opposite_ends() {
        let config = ArenaConfig::default();
        assert_eq!(config.tower_position(Team::Player), Position::new(80.0, 270.0));
        assert_eq!(config.tower_position(Team::Enemy), Position::new(880.0, 270.0));
    }

    #[test]
    fn halves_are_split_at_the_centre_line() {
        let config = ArenaConfig::default();
        assert!(config.owns_half(Team::Player, 100.0));
        assert!(!config.owns_half(Team::Player, 600.0));
        assert!(config.owns_half(Team::Enemy, 600.0));
        assert!(!config.owns_half(Team::Enemy, 100.0));
        assert!(config.owns_half(Team::Player, 480.0));
    }

    #[test]
    fn defaults_are_valid() {
        assert_eq!(ArenaConfig::default().validate(), Ok(()));
    }

    #[test]
    fn draining_elixir_rate_is_rejected() {
        let config = ArenaConfig {
            elixir: ElixirConfig {
                per_second: -1.0,
                ..ElixirConfig::default()
            },
            ..ArenaConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "elixir.per_second",
                value: -1.0,
            })
        );
    }

    #[test]
    fn unbounded_jitter_is_rejected() {
        let config = ArenaConfig {
            swarm: SwarmConfig {
                single_jitter: f32::INFINITY,
                ..SwarmConfig::default()
            },
            ..ArenaConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Negative {
                field: "swarm.single_jitter",
                ..
            })
        ));
    }

    #[test]
    fn enemy_intervals_must_be_positive_and_ordered() {
        let negative = ArenaConfig {
            enemy: EnemyConfig {
                min_interval_secs: -2.0,
                ..EnemyConfig::default()
            },
            ..ArenaConfig::default()
        };
        assert!(matches!(
            negative.validate(),
            Err(ConfigError::NotPositive {
                field: "enemy.min_interval_secs",
                ..
            })
        ));

        let inverted = ArenaConfig {
            enemy: EnemyConfig {
                min_interval_secs: 5.0,
                max_interval_secs: 3.0,
                ..EnemyConfig::default()
            },
            ..ArenaConfig::default()
        };
        assert_eq!(
            inverted.validate(),
            Err(ConfigError::InvertedInterval { min: 5.0, max: 3.0 })
        );
    }

    #[test]
    fn lanes_and_river_must_stay_on_the_board() {
        let lanes = ArenaConfig {
            lanes: [0.28, 1.0, 0.72],
            ..ArenaConfig::default()
        };
        assert_eq!(
            lanes.validate(),
            Err(ConfigError::LaneOutsideBoard {
                index: 1,
                value: 1.0,
            })
        );

        let river = ArenaConfig {
            river: RiverConfig {
                top: 0.9,
                ..RiverConfig::default()
            },
            ..ArenaConfig::default()
        };
        assert!(matches!(
            river.validate(),
            Err(ConfigError::RiverOutsideBoard { .. })
        ));
    }

    #[test]
    fn partial_sections_fall_back_to_defaults() {
        let json = r#"{ "width": 1200.0, "elixir": { "initial": 5.0 } }"#;
        let config: ArenaConfig = serde_json::from_str(json).expect("config json");
        assert!((config.width - 1200.0).abs() < f32::EPSILON);
        assert!((config.elixir.initial - 5.0).abs() < f32::EPSILON);
        assert!((config.elixir.max - 10.0).abs() < f32::EPSILON);
        assert_eq!(config.enemy, EnemyConfig::default());
    }
}
