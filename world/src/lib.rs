#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Lane Battle.
//!
//! The world owns every unit, both towers, live spells, and the elixir pools.
//! It changes only through [`apply`], which validates each [`Command`] and
//! reports outcomes as [`Event`] values. Once a tower falls the match is
//! ended and every further command is dropped.

use std::time::Duration;

use lane_battle_core::{
    ArenaConfig, CardId, CastError, Catalog, Command, DeployError, Event, MatchState, Position,
    SpellId, SpellKind, Team, UnitBlueprint, UnitId,
};
use log::{debug, info};

mod roster;

use roster::{PerTeam, Unit};

/// Represents the authoritative Lane Battle world state.
#[derive(Debug)]
pub struct World {
    config: ArenaConfig,
    catalog: Catalog,
    state: MatchState,
    units: PerTeam<Vec<Unit>>,
    towers: PerTeam<Tower>,
    spells: Vec<Spell>,
    elixir: PerTeam<f32>,
    next_unit: u32,
    next_spell: u32,
    tick_index: u64,
}

impl World {
    /// Creates a fresh, active world for the provided arena and card set.
    #[must_use]
    pub fn new(config: ArenaConfig, catalog: Catalog) -> Self {
        let towers = PerTeam::from_fn(|team| Tower {
            position: config.tower_position(team),
            hp: config.tower_hp,
            max_hp: config.tower_hp,
        });
        let initial = config.elixir.initial.min(config.elixir.max).max(0.0);

        Self {
            state: MatchState::Active,
            units: PerTeam::default(),
            towers,
            spells: Vec::new(),
            elixir: PerTeam::new(initial, initial),
            next_unit: 0,
            next_spell: 0,
            tick_index: 0,
            catalog,
            config,
        }
    }

    fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units
            .iter_mut()
            .flat_map(|roster| roster.iter_mut())
            .find(|unit| unit.id == id)
    }

    fn spawn(&mut self, blueprint: UnitBlueprint, out_events: &mut Vec<Event>) {
        let id = UnitId::new(self.next_unit);
        self.next_unit = self.next_unit.wrapping_add(1);

        let unit = Unit::from_blueprint(id, blueprint);
        out_events.push(Event::UnitSpawned {
            unit: id,
            team: unit.team,
            card: unit.card.clone(),
            position: unit.position,
        });
        self.units.get_mut(unit.team).push(unit);
    }

    fn deploy(
        &mut self,
        card: CardId,
        team: Team,
        position: Position,
        out_events: &mut Vec<Event>,
    ) {
        let reject = |reason: DeployError, out_events: &mut Vec<Event>| {
            debug!("rejected deploy of `{card}` for {team:?}: {reason}");
            out_events.push(Event::DeployRejected {
                card: card.clone(),
                team,
                reason,
            });
        };

        let Some(cost) = self.catalog.get(card.as_str()).map(|template| template.cost) else {
            reject(DeployError::UnknownCard, out_events);
            return;
        };

        if !self.config.owns_half(team, position.x()) {
            reject(DeployError::OpposingHalf, out_events);
            return;
        }

        if !self.spend(team, cost) {
            reject(DeployError::InsufficientElixir, out_events);
            return;
        }

        let lane = self.config.nearest_lane(position.y());
        out_events.push(Event::CardDeployed {
            card,
            team,
            x: position.x(),
            lane,
            elixir_spent: cost,
        });
    }

    fn cast(&mut self, kind: SpellKind, team: Team, origin: Position, out_events: &mut Vec<Event>) {
        if !self.spend(team, kind.cost()) {
            debug!("rejected {kind:?} cast for {team:?}: not enough elixir");
            out_events.push(Event::CastRejected {
                kind,
                team,
                reason: CastError::InsufficientElixir,
            });
            return;
        }

        let id = SpellId::new(self.next_spell);
        self.next_spell = self.next_spell.wrapping_add(1);
        self.spells.push(Spell {
            id,
            kind,
            team,
            origin,
            elapsed: Duration::ZERO,
            applied: false,
        });
        out_events.push(Event::SpellCast {
            spell: id,
            kind,
            team,
            origin,
        });
    }

    /// Deducts `cost` from the team's pool when affordable.
    fn spend(&mut self, team: Team, cost: u32) -> bool {
        let pool = self.elixir.get_mut(team);
        let cost = cost as f32;
        if *pool < cost {
            return false;
        }
        *pool -= cost;
        true
    }

    fn damage_unit(&mut self, id: UnitId, damage: f32, out_events: &mut Vec<Event>) {
        if let Some(unit) = self.unit_mut(id) {
            unit.hp -= damage;
            out_events.push(Event::UnitDamaged {
                unit: id,
                amount: damage,
                hp: unit.hp,
            });
        }
    }

    fn damage_tower(&mut self, team: Team, damage: f32, out_events: &mut Vec<Event>) {
        let tower = self.towers.get_mut(team);
        tower.hp -= damage;
        out_events.push(Event::TowerDamaged {
            tower: team,
            amount: damage,
            hp: tower.hp,
        });
    }

    fn detonate(
        &mut self,
        id: SpellId,
        units: &[UnitId],
        towers: &[Team],
        out_events: &mut Vec<Event>,
    ) {
        let Some(spell) = self.spells.iter_mut().find(|spell| spell.id == id) else {
            return;
        };
        if spell.applied {
            debug!("spell {} already detonated", id.get());
            return;
        }
        spell.applied = true;
        let damage = spell.kind.damage();

        for unit in units {
            self.damage_unit(*unit, damage, out_events);
        }
        for tower in towers {
            self.damage_tower(*tower, damage, out_events);
        }

        debug!(
            "spell {} detonated on {} units and {} towers",
            id.get(),
            units.len(),
            towers.len()
        );
        out_events.push(Event::SpellDetonated {
            spell: id,
            units_hit: units.len(),
            towers_hit: towers.len(),
        });
    }

    fn resolve_casualties(&mut self, out_events: &mut Vec<Event>) {
        for team in Team::ALL {
            self.units.get_mut(team).retain(|unit| {
                if unit.hp > 0.0 {
                    return true;
                }
                out_events.push(Event::UnitDefeated {
                    unit: unit.id,
                    team,
                });
                false
            });
        }

        let player_down = self.towers.get(Team::Player).hp <= 0.0;
        let enemy_down = self.towers.get(Team::Enemy).hp <= 0.0;
        let winner = match (player_down, enemy_down) {
            (false, false) => return,
            (true, true) => None,
            (true, false) => Some(Team::Enemy),
            (false, true) => Some(Team::Player),
        };

        self.state = MatchState::Ended { winner };
        info!(
            "match ended after {} ticks, winner: {winner:?}",
            self.tick_index
        );
        out_events.push(Event::MatchEnded { winner });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(ArenaConfig::default(), Catalog::reference())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if !world.state.is_active() {
        debug!("match over, dropping {command:?}");
        return;
    }

    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            let max = world.config.elixir.max;
            let gained = world.config.elixir.per_second * dt.as_secs_f32();
            for pool in world.elixir.iter_mut() {
                *pool = (*pool + gained).min(max).max(0.0);
            }
            for spell in &mut world.spells {
                spell.elapsed = spell.elapsed.saturating_add(dt);
            }
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::DeployCard {
            card,
            team,
            position,
        } => world.deploy(card, team, position, out_events),
        Command::SummonCard {
            card,
            team,
            x,
            lane,
        } => {
            if world.catalog.get(card.as_str()).is_none() {
                out_events.push(Event::DeployRejected {
                    card,
                    team,
                    reason: DeployError::UnknownCard,
                });
                return;
            }
            out_events.push(Event::CardDeployed {
                card,
                team,
                x,
                lane,
                elixir_spent: 0,
            });
        }
        Command::SpawnUnit { blueprint } => world.spawn(blueprint, out_events),
        Command::CastSpell {
            kind,
            team,
            position,
        } => world.cast(kind, team, position, out_events),
        Command::StrikeUnit { target, damage, .. } => {
            if damage > 0.0 {
                world.damage_unit(target, damage, out_events);
            }
        }
        Command::StrikeTower { tower, damage, .. } => {
            if damage > 0.0 {
                world.damage_tower(tower, damage, out_events);
            }
        }
        Command::AdvanceUnit { unit, dx } => {
            if dx == 0.0 {
                return;
            }
            if let Some(unit) = world.unit_mut(unit) {
                let from = unit.position;
                unit.position = from.offset_x(dx);
                out_events.push(Event::UnitAdvanced {
                    unit: unit.id,
                    from,
                    to: unit.position,
                });
            }
        }
        Command::DetonateSpell {
            spell,
            units,
            towers,
        } => world.detonate(spell, &units, &towers, out_events),
        Command::ExpireSpells => {
            world.spells.retain(|spell| {
                if spell.elapsed <= spell.kind.lifetime() {
                    return true;
                }
                out_events.push(Event::SpellExpired { spell: spell.id });
                false
            });
        }
        Command::ResolveCasualties => world.resolve_casualties(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use lane_battle_core::{
        ArenaConfig, Catalog, MatchState, SpellSnapshot, SpellView, Team, TowerSnapshot,
        TowerView, UnitSnapshot, UnitView,
    };

    use super::World;

    /// Arena layout and pacing the world was built with.
    #[must_use]
    pub fn config(world: &World) -> &ArenaConfig {
        &world.config
    }

    /// Cards available to deploy requests.
    #[must_use]
    pub fn catalog(world: &World) -> &Catalog {
        &world.catalog
    }

    /// Current lifecycle state of the match.
    #[must_use]
    pub fn match_state(world: &World) -> MatchState {
        world.state
    }

    /// Elixir currently held by `team`.
    #[must_use]
    pub fn elixir(world: &World, team: Team) -> f32 {
        *world.elixir.get(team)
    }

    /// Number of ticks the world has processed.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures a read-only view of every live unit.
    #[must_use]
    pub fn unit_view(world: &World) -> UnitView {
        let snapshots = world
            .units
            .iter()
            .flat_map(|roster| roster.iter())
            .map(|unit| UnitSnapshot {
                id: unit.id,
                card: unit.card.clone(),
                team: unit.team,
                position: unit.position,
                hp: unit.hp,
                max_hp: unit.max_hp,
                attack: unit.attack,
                speed: unit.speed,
                range: unit.range,
                targets: unit.targets,
                layer: unit.layer,
                splash: unit.splash,
            })
            .collect();
        UnitView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of both towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        let snapshot = |team: Team| {
            let tower = world.towers.get(team);
            TowerSnapshot {
                team,
                position: tower.position,
                hp: tower.hp,
                max_hp: tower.max_hp,
            }
        };
        TowerView::new(snapshot(Team::Player), snapshot(Team::Enemy))
    }

    /// Captures a read-only view of every live spell.
    #[must_use]
    pub fn spell_view(world: &World) -> SpellView {
        let snapshots = world
            .spells
            .iter()
            .map(|spell| SpellSnapshot {
                id: spell.id,
                kind: spell.kind,
                team: spell.team,
                origin: spell.origin,
                elapsed: spell.elapsed,
                applied: spell.applied,
            })
            .collect();
        SpellView::from_snapshots(snapshots)
    }
}

#[derive(Clone, Debug)]
struct Tower {
    position: Position,
    hp: f32,
    max_hp: f32,
}

#[derive(Clone, Debug)]
struct Spell {
    id: SpellId,
    kind: SpellKind,
    team: Team,
    origin: Position,
    elapsed: Duration,
    applied: bool,
}
