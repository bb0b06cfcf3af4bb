#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that detonates and expires timed area spells.

use lane_battle_core::{Command, MatchState, SpellSnapshot, SpellView, TowerView, UnitView};

/// Spell resolution system emitting detonation and expiry commands.
#[derive(Debug, Default)]
pub struct SpellResolver;

impl SpellResolver {
    /// Creates a new spell resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits `Command::DetonateSpell` for spells past their impact delay and
    /// `Command::ExpireSpells` when any spell outlived its lifetime.
    ///
    /// Detonations are queued ahead of the expiry so a single long tick that
    /// carries a spell past both thresholds still applies its damage.
    pub fn handle(
        &self,
        state: MatchState,
        spells: &SpellView,
        units: &UnitView,
        towers: &TowerView,
        out: &mut Vec<Command>,
    ) {
        if !state.is_active() {
            return;
        }

        for spell in spells.iter().filter(|spell| spell.awaiting_impact()) {
            out.push(detonation(spell, units, towers));
        }

        if spells
            .iter()
            .any(|spell| spell.elapsed > spell.kind.lifetime())
        {
            out.push(Command::ExpireSpells);
        }
    }
}

/// Collects every unit and tower strictly inside the spell's radius,
/// regardless of team.
fn detonation(spell: &SpellSnapshot, units: &UnitView, towers: &TowerView) -> Command {
    let radius = spell.kind.radius();
    let units = units
        .iter()
        .filter(|unit| unit.position.distance(spell.origin) < radius)
        .map(|unit| unit.id)
        .collect();
    let towers = towers
        .iter()
        .filter(|tower| tower.position.distance(spell.origin) < radius)
        .map(|tower| tower.team)
        .collect();

    Command::DetonateSpell {
        spell: spell.id,
        units,
        towers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_battle_core::{Position, SpellId, SpellKind, Team, TowerSnapshot};
    use std::time::Duration;

    fn spell(elapsed_ms: u64, applied: bool) -> SpellSnapshot {
        SpellSnapshot {
            id: SpellId::new(3),
            kind: SpellKind::Fire,
            team: Team::Player,
            origin: Position::new(850.0, 270.0),
            elapsed: Duration::from_millis(elapsed_ms),
            applied,
        }
    }

    fn towers() -> TowerView {
        let tower = |team, x| TowerSnapshot {
            team,
            position: Position::new(x, 270.0),
            hp: 1_000.0,
            max_hp: 1_000.0,
        };
        TowerView::new(tower(Team::Player, 80.0), tower(Team::Enemy, 880.0))
    }

    #[test]
    fn pending_spells_wait_for_impact_delay() {
        let mut out = Vec::new();
        SpellResolver::new().handle(
            MatchState::Active,
            &SpellView::from_snapshots(vec![spell(100, false)]),
            &UnitView::default(),
            &towers(),
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn tower_inside_radius_is_listed() {
        let mut out = Vec::new();
        SpellResolver::new().handle(
            MatchState::Active,
            &SpellView::from_snapshots(vec![spell(130, false)]),
            &UnitView::default(),
            &towers(),
            &mut out,
        );
        assert_eq!(
            out,
            vec![Command::DetonateSpell {
                spell: SpellId::new(3),
                units: Vec::new(),
                towers: vec![Team::Enemy],
            }]
        );
    }

    #[test]
    fn applied_spells_only_expire() {
        let mut out = Vec::new();
        SpellResolver::new().handle(
            MatchState::Active,
            &SpellView::from_snapshots(vec![spell(1_300, true)]),
            &UnitView::default(),
            &towers(),
            &mut out,
        );
        assert_eq!(out, vec![Command::ExpireSpells]);
    }

    #[test]
    fn overdue_spell_detonates_before_expiring() {
        let mut out = Vec::new();
        SpellResolver::new().handle(
            MatchState::Active,
            &SpellView::from_snapshots(vec![spell(2_000, false)]),
            &UnitView::default(),
            &towers(),
            &mut out,
        );
        assert_eq!(out.len(), 2);
        assert!(matches!(out[0], Command::DetonateSpell { .. }));
        assert_eq!(out[1], Command::ExpireSpells);
    }
}
