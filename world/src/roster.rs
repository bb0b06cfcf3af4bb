//! Live units and the per-team storage the world keeps them in.

use lane_battle_core::{CardId, Layer, Position, TargetMask, Team, UnitBlueprint, UnitId};

/// One value per team, addressed by [`Team`].
#[derive(Clone, Debug, Default)]
pub(crate) struct PerTeam<T> {
    player: T,
    enemy: T,
}

impl<T> PerTeam<T> {
    pub(crate) const fn new(player: T, enemy: T) -> Self {
        Self { player, enemy }
    }

    pub(crate) fn from_fn(mut make: impl FnMut(Team) -> T) -> Self {
        Self {
            player: make(Team::Player),
            enemy: make(Team::Enemy),
        }
    }

    pub(crate) const fn get(&self, team: Team) -> &T {
        match team {
            Team::Player => &self.player,
            Team::Enemy => &self.enemy,
        }
    }

    pub(crate) fn get_mut(&mut self, team: Team) -> &mut T {
        match team {
            Team::Player => &mut self.player,
            Team::Enemy => &mut self.enemy,
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &T> {
        [&self.player, &self.enemy].into_iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        [&mut self.player, &mut self.enemy].into_iter()
    }
}

/// Mutable state of a unit on the board.
#[derive(Clone, Debug)]
pub(crate) struct Unit {
    pub(crate) id: UnitId,
    pub(crate) card: CardId,
    pub(crate) team: Team,
    pub(crate) position: Position,
    pub(crate) hp: f32,
    pub(crate) max_hp: f32,
    pub(crate) attack: f32,
    pub(crate) speed: f32,
    pub(crate) range: f32,
    pub(crate) targets: TargetMask,
    pub(crate) layer: Layer,
    pub(crate) splash: bool,
}

impl Unit {
    pub(crate) fn from_blueprint(id: UnitId, blueprint: UnitBlueprint) -> Self {
        Self {
            id,
            card: blueprint.card,
            team: blueprint.team,
            position: blueprint.position,
            hp: blueprint.hp,
            max_hp: blueprint.hp,
            attack: blueprint.attack,
            speed: blueprint.speed,
            range: blueprint.range,
            targets: blueprint.targets,
            layer: blueprint.layer,
            splash: blueprint.splash,
        }
    }
}
