#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Battle engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The match controller submits
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable views, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod catalog;
mod config;

pub use catalog::{Card, CardId, Catalog, CatalogError, MAX_SQUAD};
pub use config::{
    ArenaConfig, CombatConfig, ConfigError, ElixirConfig, EnemyConfig, RiverConfig, SwarmConfig,
    LANE_COUNT,
};

/// Side of the board a unit, tower, or spell belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    /// Human-controlled side defending the left tower and advancing right.
    Player,
    /// AI-controlled side defending the right tower and advancing left.
    Enemy,
}

impl Team {
    /// Both teams in a stable order.
    pub const ALL: [Team; 2] = [Team::Player, Team::Enemy];

    /// Returns the team on the other side of the river.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }

    /// Horizontal sign of travel: `+1` for the player, `-1` for the enemy.
    #[must_use]
    pub const fn direction(self) -> f32 {
        match self {
            Self::Player => 1.0,
            Self::Enemy => -1.0,
        }
    }
}

/// Point on the board expressed in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a new position from world coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Returns a copy shifted horizontally by `dx`.
    #[must_use]
    pub fn offset_x(self, dx: f32) -> Self {
        Self::new(self.x + dx, self.y)
    }

    /// Euclidean distance between two positions.
    #[must_use]
    pub fn distance(self, other: Position) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Unique identifier assigned to a live unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a cast spell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpellId(u32);

impl SpellId {
    /// Creates a new spell identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Index into the fixed, ordered set of horizontal lanes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Lane(usize);

impl Lane {
    /// Every lane from top to bottom.
    pub const ALL: [Lane; LANE_COUNT] = [Lane(0), Lane(1), Lane(2)];

    /// Creates a lane from its index, returning `None` when out of range.
    #[must_use]
    pub const fn new(index: usize) -> Option<Self> {
        if index < LANE_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Zero-based lane index counted from the top of the board.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0
    }
}

/// Altitude a unit moves at, used to decide who may target it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Walks along the ground.
    #[default]
    Ground,
    /// Flies over the board.
    Air,
}

/// Layers a unit is able to attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetMask {
    /// Only ground units.
    Ground,
    /// Only air units.
    Air,
    /// Ground and air units.
    AirGround,
}

impl TargetMask {
    /// Reports whether a unit on `layer` is an eligible target.
    #[must_use]
    pub const fn covers(self, layer: Layer) -> bool {
        matches!(
            (self, layer),
            (Self::AirGround, _) | (Self::Ground, Layer::Ground) | (Self::Air, Layer::Air)
        )
    }
}

/// Kinds of spells that can be cast onto the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpellKind {
    /// Delayed fireball that burns everything inside its radius once.
    Fire,
}

impl SpellKind {
    /// Elixir spent when the spell is cast.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Fire => 4,
        }
    }

    /// Time between the cast and the damage being applied.
    #[must_use]
    pub const fn impact_delay(self) -> Duration {
        match self {
            Self::Fire => Duration::from_millis(120),
        }
    }

    /// Time after which the spell is removed from the board.
    #[must_use]
    pub const fn lifetime(self) -> Duration {
        match self {
            Self::Fire => Duration::from_millis(1_200),
        }
    }

    /// Radius of the damage area in world units. Targets must lie strictly inside.
    #[must_use]
    pub const fn radius(self) -> f32 {
        match self {
            Self::Fire => 60.0,
        }
    }

    /// Damage dealt to every unit and tower caught in the area.
    #[must_use]
    pub const fn damage(self) -> f32 {
        match self {
            Self::Fire => 120.0,
        }
    }

    /// Radius presentation adapters should draw after `elapsed` time.
    ///
    /// The blast grows from 20 units to its full size over the first two
    /// thirds of a second.
    #[must_use]
    pub fn visual_radius(self, elapsed: Duration) -> f32 {
        match self {
            Self::Fire => 20.0 + 60.0 * (elapsed.as_secs_f32() * 1.5).min(1.0),
        }
    }

    /// Opacity in `0.0..=1.0` that fades linearly over the spell lifetime.
    #[must_use]
    pub fn opacity(self, elapsed: Duration) -> f32 {
        let lifetime = self.lifetime().as_secs_f32();
        (1.0 - elapsed.as_secs_f32() / lifetime).max(0.0)
    }
}

/// Lifecycle of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchState {
    /// Units move and fight, timers run, requests are honoured.
    Active,
    /// A tower fell. Terminal until the host builds a fresh match.
    Ended {
        /// Team whose tower survived, or `None` when both fell in the same tick.
        winner: Option<Team>,
    },
}

impl MatchState {
    /// Reports whether the match still accepts ticks and requests.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Reasons a deploy request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum DeployError {
    /// The requested card id is not part of the catalog.
    #[error("card is not part of the catalog")]
    UnknownCard,
    /// The requested position lies on the opposing team's half of the board.
    #[error("position lies on the opposing half of the board")]
    OpposingHalf,
    /// The team cannot afford the card.
    #[error("not enough elixir to deploy the card")]
    InsufficientElixir,
}

/// Reasons a spell cast may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum CastError {
    /// The team cannot afford the spell.
    #[error("not enough elixir to cast the spell")]
    InsufficientElixir,
}

/// Everything required to materialise one live unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitBlueprint {
    /// Card the unit was produced from.
    pub card: CardId,
    /// Team that owns the unit.
    pub team: Team,
    /// Starting position.
    pub position: Position,
    /// Starting and maximum hit points.
    pub hp: f32,
    /// Damage dealt per second while engaged.
    pub attack: f32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Attack range in world units.
    pub range: f32,
    /// Layers the unit may attack.
    pub targets: TargetMask,
    /// Layer the unit itself moves on.
    pub layer: Layer,
    /// Reserved area-attack flag; combat treats it as a single-target attack.
    pub splash: bool,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock, accrues elixir and ages spells.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests a paid deployment of a card at a board position.
    DeployCard {
        /// Catalog id of the card to deploy.
        card: CardId,
        /// Team requesting the deployment.
        team: Team,
        /// Requested board position; its `y` picks the nearest lane.
        position: Position,
    },
    /// Deploys a card without consulting elixir, used by the enemy AI.
    SummonCard {
        /// Catalog id of the card to deploy.
        card: CardId,
        /// Team receiving the units.
        team: Team,
        /// Horizontal deployment coordinate.
        x: f32,
        /// Lane the units are placed in.
        lane: Lane,
    },
    /// Materialises a single unit produced by the spawner.
    SpawnUnit {
        /// Stats and placement for the new unit.
        blueprint: UnitBlueprint,
    },
    /// Requests a paid spell cast at a board position.
    CastSpell {
        /// Spell to cast.
        kind: SpellKind,
        /// Team casting the spell.
        team: Team,
        /// Centre of the spell's area.
        position: Position,
    },
    /// Applies attack damage from one unit to another.
    StrikeUnit {
        /// Unit dealing the damage.
        attacker: UnitId,
        /// Unit receiving the damage.
        target: UnitId,
        /// Hit points removed from the target.
        damage: f32,
    },
    /// Applies attack damage from a unit to a tower.
    StrikeTower {
        /// Unit dealing the damage.
        attacker: UnitId,
        /// Team whose tower receives the damage.
        tower: Team,
        /// Hit points removed from the tower.
        damage: f32,
    },
    /// Moves an unengaged unit horizontally.
    AdvanceUnit {
        /// Unit to move.
        unit: UnitId,
        /// Signed horizontal displacement in world units.
        dx: f32,
    },
    /// Applies a spell's area damage to the listed targets, once.
    DetonateSpell {
        /// Spell that detonates.
        spell: SpellId,
        /// Units inside the blast.
        units: Vec<UnitId>,
        /// Towers inside the blast.
        towers: Vec<Team>,
    },
    /// Removes every spell that outlived its lifetime.
    ExpireSpells,
    /// Removes defeated units and ends the match when a tower fell.
    ResolveCasualties,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a card was accepted for deployment.
    CardDeployed {
        /// Card that was deployed.
        card: CardId,
        /// Team receiving the units.
        team: Team,
        /// Horizontal deployment coordinate.
        x: f32,
        /// Lane the units will occupy.
        lane: Lane,
        /// Elixir deducted from the team's pool.
        elixir_spent: u32,
    },
    /// Reports that a deploy request was rejected without any state change.
    DeployRejected {
        /// Card id provided in the request.
        card: CardId,
        /// Team that issued the request.
        team: Team,
        /// Specific reason the request failed.
        reason: DeployError,
    },
    /// Confirms that a unit entered the board.
    UnitSpawned {
        /// Identifier assigned to the new unit.
        unit: UnitId,
        /// Team owning the unit.
        team: Team,
        /// Card the unit came from.
        card: CardId,
        /// Starting position.
        position: Position,
    },
    /// Confirms that a spell was cast.
    SpellCast {
        /// Identifier assigned to the spell.
        spell: SpellId,
        /// Spell kind.
        kind: SpellKind,
        /// Casting team.
        team: Team,
        /// Centre of the spell's area.
        origin: Position,
    },
    /// Reports that a cast request was rejected without any state change.
    CastRejected {
        /// Spell requested.
        kind: SpellKind,
        /// Team that issued the request.
        team: Team,
        /// Specific reason the request failed.
        reason: CastError,
    },
    /// Reports damage dealt to a unit.
    UnitDamaged {
        /// Unit that lost hit points.
        unit: UnitId,
        /// Hit points removed.
        amount: f32,
        /// Remaining hit points, possibly negative until cleanup.
        hp: f32,
    },
    /// Reports damage dealt to a tower.
    TowerDamaged {
        /// Team owning the tower.
        tower: Team,
        /// Hit points removed.
        amount: f32,
        /// Remaining hit points.
        hp: f32,
    },
    /// Confirms that a unit moved.
    UnitAdvanced {
        /// Unit that moved.
        unit: UnitId,
        /// Position before the move.
        from: Position,
        /// Position after the move.
        to: Position,
    },
    /// Reports that a unit ran out of hit points and left the board.
    UnitDefeated {
        /// Unit that was removed.
        unit: UnitId,
        /// Team that owned the unit.
        team: Team,
    },
    /// Reports that a spell applied its damage.
    SpellDetonated {
        /// Spell that detonated.
        spell: SpellId,
        /// Number of units caught in the blast.
        units_hit: usize,
        /// Number of towers caught in the blast.
        towers_hit: usize,
    },
    /// Reports that a spell left the board.
    SpellExpired {
        /// Spell that was removed.
        spell: SpellId,
    },
    /// Announces the terminal transition of the match. Emitted once.
    MatchEnded {
        /// Team whose tower survived, if any.
        winner: Option<Team>,
    },
}

/// Immutable representation of a single unit used for queries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    /// Unique identifier assigned to the unit.
    pub id: UnitId,
    /// Card the unit came from.
    pub card: CardId,
    /// Team owning the unit.
    pub team: Team,
    /// Current position.
    pub position: Position,
    /// Remaining hit points.
    pub hp: f32,
    /// Hit points the unit spawned with.
    pub max_hp: f32,
    /// Damage dealt per second while engaged.
    pub attack: f32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Attack range in world units.
    pub range: f32,
    /// Layers the unit may attack.
    pub targets: TargetMask,
    /// Layer the unit moves on.
    pub layer: Layer,
    /// Reserved area-attack flag.
    pub splash: bool,
}

/// Read-only snapshot describing every live unit.
#[derive(Clone, Debug, Default, Serialize)]
pub struct UnitView {
    snapshots: Vec<UnitSnapshot>,
}

impl UnitView {
    /// Creates a new unit view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<UnitSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter()
    }

    /// Iterator over the units owned by `team`, in spawn order.
    pub fn team(&self, team: Team) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots
            .iter()
            .filter(move |snapshot| snapshot.team == team)
    }

    /// Looks up a single unit by identifier.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&UnitSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of captured units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<UnitSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a tower used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerSnapshot {
    /// Team owning the tower.
    pub team: Team,
    /// Fixed tower position.
    pub position: Position,
    /// Remaining hit points.
    pub hp: f32,
    /// Hit points the tower started with.
    pub max_hp: f32,
}

/// Read-only snapshot of both towers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TowerView {
    player: TowerSnapshot,
    enemy: TowerSnapshot,
}

impl TowerView {
    /// Creates a tower view from the two team towers.
    #[must_use]
    pub const fn new(player: TowerSnapshot, enemy: TowerSnapshot) -> Self {
        Self { player, enemy }
    }

    /// Snapshot of the tower owned by `team`.
    #[must_use]
    pub const fn get(&self, team: Team) -> &TowerSnapshot {
        match team {
            Team::Player => &self.player,
            Team::Enemy => &self.enemy,
        }
    }

    /// Iterator over both towers, player first.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        [&self.player, &self.enemy].into_iter()
    }
}

/// Immutable representation of a live spell used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpellSnapshot {
    /// Identifier assigned to the spell.
    pub id: SpellId,
    /// Spell kind.
    pub kind: SpellKind,
    /// Casting team.
    pub team: Team,
    /// Centre of the spell's area.
    pub origin: Position,
    /// Time since the cast.
    pub elapsed: Duration,
    /// Whether the damage has been applied.
    pub applied: bool,
}

impl SpellSnapshot {
    /// Radius presentation adapters should draw for this spell.
    #[must_use]
    pub fn visual_radius(&self) -> f32 {
        self.kind.visual_radius(self.elapsed)
    }

    /// Opacity presentation adapters should draw this spell with.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.kind.opacity(self.elapsed)
    }

    /// Reports whether the spell passed its impact delay but has not detonated.
    #[must_use]
    pub fn awaiting_impact(&self) -> bool {
        !self.applied && self.elapsed > self.kind.impact_delay()
    }
}

/// Read-only snapshot of every live spell.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SpellView {
    snapshots: Vec<SpellSnapshot>,
}

impl SpellView {
    /// Creates a new spell view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<SpellSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in cast order.
    pub fn iter(&self) -> impl Iterator<Item = &SpellSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<SpellSnapshot> {
        self.snapshots
    }
}
