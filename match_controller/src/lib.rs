#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Match controller that owns a Lane Battle world and drives its systems.
//!
//! Hosts own the clock: they call [`Match::tick`] with the elapsed time and
//! submit player intent through [`Match::request_deploy`] and
//! [`Match::request_cast`] between ticks. Every tick runs the same pipeline:
//! elixir and spell clocks, the enemy opponent, combat, then spells. Each
//! phase's commands are applied to the world before the next phase reads it.

use std::{collections::VecDeque, time::Duration};

use lane_battle_core::{
    ArenaConfig, CardId, Catalog, Command, Event, MatchState, Position, SpellKind, SpellView,
    Team, TowerView, UnitView,
};
use lane_battle_system_combat::Combat;
use lane_battle_system_enemy_ai::{self as enemy_ai, EnemyAi};
use lane_battle_system_spawning::Spawner;
use lane_battle_system_spells::SpellResolver;
use lane_battle_world::{self as world, query, World};
use log::debug;
use rand::{Rng, RngCore};
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

mod frame;

pub use frame::{Frame, Sides, SpellFrame};

/// Number of undrained events a match keeps before discarding the oldest.
pub const DEFAULT_JOURNAL_LIMIT: usize = 8_192;

/// A single lane battle between the player and the enemy opponent.
#[derive(Debug)]
pub struct Match<R = ChaCha8Rng> {
    world: World,
    spawner: Spawner<R>,
    enemy: EnemyAi<R>,
    combat: Combat,
    spells: SpellResolver,
    journal: VecDeque<Event>,
    journal_limit: usize,
}

impl Match<ChaCha8Rng> {
    /// Creates an active match whose random sources derive from `config.seed`.
    #[must_use]
    pub fn new(config: ArenaConfig, catalog: Catalog) -> Self {
        let mut seeds = ChaCha8Rng::seed_from_u64(config.seed);
        let spawn_rng = ChaCha8Rng::seed_from_u64(seeds.next_u64());
        let enemy_rng = ChaCha8Rng::seed_from_u64(seeds.next_u64());
        Self::with_rngs(config, catalog, spawn_rng, enemy_rng)
    }
}

impl Default for Match<ChaCha8Rng> {
    fn default() -> Self {
        Self::new(ArenaConfig::default(), Catalog::reference())
    }
}

impl<R: Rng> Match<R> {
    /// Creates an active match with explicit random sources for unit
    /// placement jitter and the enemy's choices.
    #[must_use]
    pub fn with_rngs(config: ArenaConfig, catalog: Catalog, spawn_rng: R, enemy_rng: R) -> Self {
        let enemy = EnemyAi::with_rng(enemy_ai::Config::from_arena(&config), enemy_rng);
        Self {
            world: World::new(config, catalog),
            spawner: Spawner::with_rng(spawn_rng),
            enemy,
            combat: Combat::new(),
            spells: SpellResolver::new(),
            journal: VecDeque::new(),
            journal_limit: DEFAULT_JOURNAL_LIMIT,
        }
    }

    /// Keeps at most `limit` undrained events, discarding the oldest first.
    /// A limit of zero turns the journal off.
    #[must_use]
    pub fn with_journal_limit(mut self, limit: usize) -> Self {
        self.journal_limit = limit;
        self.trim_journal();
        self
    }

    /// Advances the match by `dt`. Does nothing once the match has ended.
    pub fn tick(&mut self, dt: Duration) {
        if !self.accepts("tick") {
            return;
        }

        let clock = self.execute(vec![Command::Tick { dt }]);

        let mut commands = Vec::new();
        self.enemy.handle(
            &clock,
            query::match_state(&self.world),
            query::catalog(&self.world),
            &mut commands,
        );
        let summoned = self.execute(commands);
        self.spawn_deployed(&summoned);

        let mut commands = Vec::new();
        self.combat.handle(
            &clock,
            query::match_state(&self.world),
            &query::unit_view(&self.world),
            &query::tower_view(&self.world),
            query::config(&self.world),
            &mut commands,
        );
        commands.push(Command::ResolveCasualties);
        let _ = self.execute(commands);
        if !self.state().is_active() {
            return;
        }

        let mut commands = Vec::new();
        self.spells.handle(
            query::match_state(&self.world),
            &query::spell_view(&self.world),
            &query::unit_view(&self.world),
            &query::tower_view(&self.world),
            &mut commands,
        );
        if commands.is_empty() {
            return;
        }
        commands.push(Command::ResolveCasualties);
        let _ = self.execute(commands);
    }

    /// Asks to deploy `card_id` for `team` at `position`.
    ///
    /// Unknown cards, positions on the opposing half, and unaffordable cards
    /// are rejected without changing the match; the rejection is reported as
    /// an [`Event::DeployRejected`] in the journal. Accepted cards spend
    /// elixir and spawn on the lane nearest to `position`.
    pub fn request_deploy(&mut self, card_id: &str, position: Position, team: Team) {
        if !self.accepts("deploy") {
            return;
        }

        let deployed = self.execute(vec![Command::DeployCard {
            card: CardId::new(card_id),
            team,
            position,
        }]);
        self.spawn_deployed(&deployed);
    }

    /// Asks to cast `kind` for `team` centred on `position`.
    ///
    /// Spells may target any point on the board. An unaffordable cast is
    /// reported as an [`Event::CastRejected`] in the journal.
    pub fn request_cast(&mut self, kind: SpellKind, position: Position, team: Team) {
        if !self.accepts("cast") {
            return;
        }

        let _ = self.execute(vec![Command::CastSpell {
            kind,
            team,
            position,
        }]);
    }

    /// Captures an owned snapshot for presentation.
    #[must_use]
    pub fn frame(&self) -> Frame {
        Frame::capture(&self.world)
    }

    /// Removes and returns the events recorded since the previous drain.
    ///
    /// Only the newest events up to the journal limit are kept, so hosts
    /// that need a complete history should drain after every tick.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.journal.drain(..).collect()
    }

    /// Current lifecycle state of the match.
    #[must_use]
    pub fn state(&self) -> MatchState {
        query::match_state(&self.world)
    }

    /// Elixir currently held by `team`.
    #[must_use]
    pub fn elixir(&self, team: Team) -> f32 {
        query::elixir(&self.world, team)
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(&self) -> u64 {
        query::tick_index(&self.world)
    }

    /// Arena layout and pacing the match was built with.
    #[must_use]
    pub fn config(&self) -> &ArenaConfig {
        query::config(&self.world)
    }

    /// Cards the match accepts deploy requests for.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        query::catalog(&self.world)
    }

    /// Read-only view of every live unit.
    #[must_use]
    pub fn units(&self) -> UnitView {
        query::unit_view(&self.world)
    }

    /// Read-only view of both towers.
    #[must_use]
    pub fn towers(&self) -> TowerView {
        query::tower_view(&self.world)
    }

    /// Read-only view of every live spell.
    #[must_use]
    pub fn spells(&self) -> SpellView {
        query::spell_view(&self.world)
    }

    fn accepts(&self, request: &str) -> bool {
        let state = self.state();
        if !state.is_active() {
            debug!("ignoring {request} request, match is {state:?}");
        }
        state.is_active()
    }

    /// Applies `commands` in order, journals the outcome, and returns the
    /// events the batch produced.
    fn execute(&mut self, commands: Vec<Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        if self.journal_limit > 0 {
            self.journal.extend(events.iter().cloned());
            self.trim_journal();
        }
        events
    }

    fn trim_journal(&mut self) {
        let excess = self.journal.len().saturating_sub(self.journal_limit);
        let _ = self.journal.drain(..excess);
    }

    fn spawn_deployed(&mut self, events: &[Event]) {
        let mut commands = Vec::new();
        self.spawner.handle(
            events,
            query::catalog(&self.world),
            query::config(&self.world),
            &mut commands,
        );
        let _ = self.execute(commands);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_seeds_share_a_history() {
        let mut first = Match::default();
        let mut second = Match::default();
        for _ in 0..400 {
            first.tick(Duration::from_millis(16));
            second.tick(Duration::from_millis(16));
        }
        assert_eq!(first.frame(), second.frame());
        assert_eq!(first.drain_events(), second.drain_events());
    }

    #[test]
    fn draining_empties_the_journal() {
        let mut battle = Match::default();
        battle.tick(Duration::from_millis(16));
        assert!(!battle.drain_events().is_empty());
        assert!(battle.drain_events().is_empty());
    }

    #[test]
    fn undrained_journal_keeps_only_the_newest_events() {
        let script = |battle: &mut Match| {
            for _ in 0..500 {
                battle.tick(Duration::from_millis(16));
            }
        };
        let mut full = Match::default().with_journal_limit(usize::MAX);
        let mut capped = Match::default().with_journal_limit(64);
        script(&mut full);
        script(&mut capped);

        let history = full.drain_events();
        let recent = capped.drain_events();
        assert!(history.len() > 64);
        assert_eq!(recent.as_slice(), &history[history.len() - 64..]);
    }

    #[test]
    fn default_journal_is_bounded() {
        let mut battle = Match::default();
        for _ in 0..(DEFAULT_JOURNAL_LIMIT + 10) {
            battle.tick(Duration::from_millis(16));
        }
        assert!(battle.drain_events().len() <= DEFAULT_JOURNAL_LIMIT);
    }

    #[test]
    fn zero_limit_disables_the_journal() {
        let mut battle = Match::default().with_journal_limit(0);
        battle.tick(Duration::from_millis(16));
        battle.request_deploy("skel", Position::new(300.0, 270.0), Team::Player);
        assert!(battle.drain_events().is_empty());
        assert_eq!(battle.tick_index(), 1);
    }
}
