//! Owned presentation snapshots handed to renderers and hosts.

use lane_battle_core::{
    MatchState, Position, SpellId, SpellKind, Team, TowerSnapshot, UnitSnapshot,
};
use lane_battle_world::{query, World};
use serde::Serialize;

/// Pair of values, one per team.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Sides<T> {
    /// Value belonging to the player.
    pub player: T,
    /// Value belonging to the enemy.
    pub enemy: T,
}

impl<T> Sides<T> {
    /// Value belonging to `team`.
    #[must_use]
    pub const fn get(&self, team: Team) -> &T {
        match team {
            Team::Player => &self.player,
            Team::Enemy => &self.enemy,
        }
    }
}

/// Spell as a presentation adapter should draw it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SpellFrame {
    /// Identifier assigned when the spell was cast.
    pub id: SpellId,
    /// Spell kind.
    pub kind: SpellKind,
    /// Casting team.
    pub team: Team,
    /// Centre of the spell's area.
    pub origin: Position,
    /// Radius to draw at this instant.
    pub radius: f32,
    /// Opacity to draw with at this instant.
    pub opacity: f32,
    /// Whether the damage already landed.
    pub applied: bool,
}

/// Owned, read-only snapshot of everything a renderer needs for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frame {
    /// Number of ticks processed so far.
    pub tick: u64,
    /// Lifecycle state of the match.
    pub state: MatchState,
    /// Live units split by team, each list in spawn order.
    pub units: Sides<Vec<UnitSnapshot>>,
    /// Both towers.
    pub towers: Sides<TowerSnapshot>,
    /// Live spells in cast order.
    pub spells: Vec<SpellFrame>,
    /// Elixir held by each team.
    pub elixir: Sides<f32>,
}

impl Frame {
    pub(crate) fn capture(world: &World) -> Self {
        let (player, enemy): (Vec<UnitSnapshot>, Vec<UnitSnapshot>) = query::unit_view(world)
            .into_vec()
            .into_iter()
            .partition(|unit| unit.team == Team::Player);
        let towers = query::tower_view(world);
        let spells = query::spell_view(world)
            .iter()
            .map(|spell| SpellFrame {
                id: spell.id,
                kind: spell.kind,
                team: spell.team,
                origin: spell.origin,
                radius: spell.visual_radius(),
                opacity: spell.opacity(),
                applied: spell.applied,
            })
            .collect();

        Self {
            tick: query::tick_index(world),
            state: query::match_state(world),
            units: Sides { player, enemy },
            towers: Sides {
                player: *towers.get(Team::Player),
                enemy: *towers.get(Team::Enemy),
            },
            spells,
            elixir: Sides {
                player: query::elixir(world, Team::Player),
                enemy: query::elixir(world, Team::Enemy),
            },
        }
    }

    /// Total number of live units on the board.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.units.player.len() + self.units.enemy.len()
    }
}
