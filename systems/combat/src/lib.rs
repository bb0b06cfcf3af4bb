#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that resolves per-tick targeting, attacks, and movement.
//!
//! Every unit decides its action from the same immutable snapshot, so the
//! order units are visited in never changes the outcome. Each unit either
//! attacks or moves in a tick, never both.

use std::time::Duration;

use lane_battle_core::{
    ArenaConfig, Command, Event, MatchState, Team, TowerView, UnitId, UnitSnapshot, UnitView,
};

/// Action a unit takes during a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Engagement {
    /// Attacks the nearest eligible enemy unit.
    Unit(UnitId),
    /// Attacks the opposing team's tower.
    Tower(Team),
    /// Nothing in reach; the unit moves toward the opposing tower.
    Advance,
}

/// Combat system that reuses a scratch buffer to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct Combat {
    scratch: Vec<Command>,
}

impl Combat {
    /// Creates a new combat system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits strike and advance commands for every live unit.
    ///
    /// The tick duration is read from `Event::TimeAdvanced` entries in
    /// `events`; without one the system stays silent.
    pub fn handle(
        &mut self,
        events: &[Event],
        state: MatchState,
        units: &UnitView,
        towers: &TowerView,
        config: &ArenaConfig,
        out: &mut Vec<Command>,
    ) {
        if !state.is_active() || units.is_empty() {
            return;
        }

        let dt = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .fold(Duration::ZERO, Duration::saturating_add);
        if dt.is_zero() {
            return;
        }
        let seconds = dt.as_secs_f32();

        self.scratch.clear();
        for unit in units.iter() {
            let command = match engagement(unit, units, towers, config) {
                Engagement::Unit(target) => Command::StrikeUnit {
                    attacker: unit.id,
                    target,
                    damage: unit.attack * seconds,
                },
                Engagement::Tower(tower) => Command::StrikeTower {
                    attacker: unit.id,
                    tower,
                    damage: unit.attack * seconds,
                },
                Engagement::Advance => Command::AdvanceUnit {
                    unit: unit.id,
                    dx: advance_distance(unit, config, seconds),
                },
            };
            self.scratch.push(command);
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

/// Decides what `unit` does this tick.
///
/// The nearest eligible enemy unit is attacked when it lies within range plus
/// the melee allowance. Otherwise the opposing tower is attacked when it lies
/// within range plus the tower allowance. Otherwise the unit advances.
#[must_use]
pub fn engagement(
    unit: &UnitSnapshot,
    units: &UnitView,
    towers: &TowerView,
    config: &ArenaConfig,
) -> Engagement {
    let opponent = unit.team.opponent();

    if let Some(nearest) = nearest_target(unit, units) {
        if nearest.distance <= unit.range + config.combat.melee_reach {
            return Engagement::Unit(nearest.id);
        }
    }

    let tower = towers.get(opponent);
    if unit.position.distance(tower.position) <= unit.range + config.combat.tower_reach {
        return Engagement::Tower(opponent);
    }

    Engagement::Advance
}

/// Signed horizontal displacement of an unengaged unit over `seconds`.
///
/// Inside the river band a share of the step is taken back after the move.
#[must_use]
pub fn advance_distance(unit: &UnitSnapshot, config: &ArenaConfig, seconds: f32) -> f32 {
    let direction = unit.team.direction();
    let step = unit.speed * seconds * direction;
    if config.in_river(unit.position.y()) {
        step - direction * unit.speed * config.river.friction * seconds
    } else {
        step
    }
}

fn nearest_target(unit: &UnitSnapshot, units: &UnitView) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;

    for enemy in units.team(unit.team.opponent()) {
        if !unit.targets.covers(enemy.layer) {
            continue;
        }

        let current = Candidate {
            id: enemy.id,
            distance: unit.position.distance(enemy.position),
        };

        match &mut best {
            Some(existing) => {
                if current.precedes(existing) {
                    *existing = current;
                }
            }
            None => best = Some(current),
        }
    }

    best
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Candidate {
    id: UnitId,
    distance: f32,
}

impl Candidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.distance != other.distance {
            return self.distance < other.distance;
        }

        self.id < other.id
    }
}
