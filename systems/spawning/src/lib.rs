#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawning system that turns accepted card deployments into live units.

use lane_battle_core::{
    ArenaConfig, Card, Catalog, Command, Event, Position, SwarmConfig, Team, UnitBlueprint,
};
use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

/// Pure system that emits `Command::SpawnUnit` for every deployed card.
///
/// Vertical jitter is drawn from the injected random source, so a seeded
/// source yields identical placements across runs.
#[derive(Debug)]
pub struct Spawner<R = ChaCha8Rng> {
    rng: R,
}

impl Spawner<ChaCha8Rng> {
    /// Creates a spawner backed by a ChaCha stream seeded with `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Spawner<R> {
    /// Creates a spawner drawing jitter from the provided random source.
    #[must_use]
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Consumes deployment events and emits one spawn command per produced unit.
    pub fn handle(
        &mut self,
        events: &[Event],
        catalog: &Catalog,
        config: &ArenaConfig,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            let Event::CardDeployed {
                card, team, x, lane, ..
            } = event
            else {
                continue;
            };

            let Some(template) = catalog.get(card.as_str()) else {
                continue;
            };

            let blueprints = self.spawn(template, *team, *x, config.lane_y(*lane), &config.swarm);
            out.extend(
                blueprints
                    .into_iter()
                    .map(|blueprint| Command::SpawnUnit { blueprint }),
            );
        }
    }

    /// Produces the units a single deployment of `card` creates.
    ///
    /// Multi-unit cards are spread horizontally around `x` in steps of the
    /// configured spacing, with member `i` offset by `i - count / 2` steps.
    /// Every unit is jittered vertically around `lane_y` so that squads do not
    /// stack perfectly.
    pub fn spawn(
        &mut self,
        card: &Card,
        team: Team,
        x: f32,
        lane_y: f32,
        swarm: &SwarmConfig,
    ) -> Vec<UnitBlueprint> {
        if !card.is_swarm() {
            let y = lane_y + self.jitter(swarm.single_jitter);
            return vec![blueprint(card, team, Position::new(x, y))];
        }

        let centre = i64::from(card.count / 2);
        (0..card.count)
            .map(|index| {
                let slot = (i64::from(index) - centre) as f32;
                let y = lane_y + self.jitter(swarm.swarm_jitter);
                blueprint(card, team, Position::new(x + slot * swarm.spacing, y))
            })
            .collect()
    }

    fn jitter(&mut self, bound: f32) -> f32 {
        if bound > 0.0 && bound.is_finite() {
            self.rng.gen_range(-bound..bound)
        } else {
            0.0
        }
    }
}

fn blueprint(card: &Card, team: Team, position: Position) -> UnitBlueprint {
    UnitBlueprint {
        card: card.id.clone(),
        team,
        position,
        hp: card.hp,
        attack: card.attack,
        speed: card.speed,
        range: card.range,
        targets: card.targets,
        layer: card.layer,
        splash: card.splash,
    }
}
