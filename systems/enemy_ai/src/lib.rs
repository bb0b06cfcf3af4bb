#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Timer-driven opponent that deploys random cards for the enemy team.

use std::time::Duration;

use lane_battle_core::{ArenaConfig, Catalog, Command, Event, Lane, MatchState, Team};
use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

/// Configuration parameters required to construct the enemy AI.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    enabled: bool,
    first_spawn: Duration,
    min_interval: Duration,
    max_interval: Duration,
    deploy_x: f32,
}

impl Config {
    /// Creates a configuration from explicit cadence values.
    #[must_use]
    pub const fn new(
        first_spawn: Duration,
        min_interval: Duration,
        max_interval: Duration,
        deploy_x: f32,
    ) -> Self {
        Self {
            enabled: true,
            first_spawn,
            min_interval,
            max_interval,
            deploy_x,
        }
    }

    /// Derives the cadence and deployment line from an arena configuration.
    #[must_use]
    pub fn from_arena(arena: &ArenaConfig) -> Self {
        let enemy = &arena.enemy;
        Self {
            enabled: enemy.enabled,
            first_spawn: seconds(enemy.first_spawn_secs),
            min_interval: seconds(enemy.min_interval_secs),
            max_interval: seconds(enemy.max_interval_secs),
            deploy_x: arena.width - enemy.deploy_inset,
        }
    }

    /// Returns a copy that never deploys anything.
    #[must_use]
    pub const fn disabled(self) -> Self {
        Self {
            enabled: false,
            ..self
        }
    }
}

/// Pure system that counts down between deployments and emits
/// `Command::SummonCard` for the enemy team.
///
/// The enemy ignores elixir entirely; its pace is set by the countdown alone.
#[derive(Debug)]
pub struct EnemyAi<R = ChaCha8Rng> {
    config: Config,
    countdown: Duration,
    rng: R,
}

impl EnemyAi<ChaCha8Rng> {
    /// Creates an AI whose choices come from a ChaCha stream seeded with `seed`.
    #[must_use]
    pub fn seeded(config: Config, seed: u64) -> Self {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> EnemyAi<R> {
    /// Creates an AI drawing card, lane, and interval choices from `rng`.
    #[must_use]
    pub fn with_rng(config: Config, rng: R) -> Self {
        Self {
            countdown: config.first_spawn,
            config,
            rng,
        }
    }

    /// Time left before the next deployment.
    #[must_use]
    pub fn countdown(&self) -> Duration {
        self.countdown
    }

    /// Consumes tick events and emits at most one deployment per call.
    pub fn handle(
        &mut self,
        events: &[Event],
        state: MatchState,
        catalog: &Catalog,
        out: &mut Vec<Command>,
    ) {
        if !self.config.enabled || !state.is_active() || catalog.is_empty() {
            return;
        }

        let elapsed = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .fold(Duration::ZERO, Duration::saturating_add);
        if elapsed.is_zero() {
            return;
        }

        self.countdown = self.countdown.saturating_sub(elapsed);
        if !self.countdown.is_zero() {
            return;
        }

        self.countdown = self.next_interval();
        let index = self.rng.gen_range(0..catalog.len());
        let Some(card) = catalog.nth(index) else {
            return;
        };
        let lane = Lane::ALL[self.rng.gen_range(0..Lane::ALL.len())];

        out.push(Command::SummonCard {
            card: card.id.clone(),
            team: Team::Enemy,
            x: self.config.deploy_x,
            lane,
        });
    }

    fn next_interval(&mut self) -> Duration {
        let low = self.config.min_interval;
        let high = self.config.max_interval;
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..high)
    }
}

fn seconds(value: f32) -> Duration {
    Duration::try_from_secs_f32(value).unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_durations_collapse_to_zero() {
        assert_eq!(seconds(-1.0), Duration::ZERO);
        assert_eq!(seconds(f32::NAN), Duration::ZERO);
        assert_eq!(seconds(1.5), Duration::from_millis(1_500));
    }

    #[test]
    fn degenerate_interval_uses_lower_bound() {
        let config = Config::new(
            Duration::from_secs(1),
            Duration::from_secs(3),
            Duration::from_secs(2),
            840.0,
        );
        let mut ai = EnemyAi::seeded(config, 1);
        assert_eq!(ai.next_interval(), Duration::from_secs(3));
    }
}
