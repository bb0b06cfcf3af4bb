//! Card templates and the validated catalog they are deployed from.

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Layer, TargetMask};

/// Lowest elixir cost a card may carry.
const MIN_COST: u32 = 1;
/// Highest elixir cost a card may carry.
const MAX_COST: u32 = 10;
/// Largest number of units a single deployment may produce.
pub const MAX_SQUAD: u32 = 16;

/// Stable identifier of a card inside a catalog.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// Creates a card identifier from its textual form.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Textual form of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable template units are produced from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Stable identifier used by deploy requests.
    pub id: CardId,
    /// Human readable name.
    pub name: String,
    /// Elixir spent when the card is deployed.
    pub cost: u32,
    /// Hit points of every produced unit.
    pub hp: f32,
    /// Damage per second while engaged.
    pub attack: f32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Attack range in world units.
    pub range: f32,
    /// Layers produced units may attack.
    pub targets: TargetMask,
    /// Layer produced units move on.
    #[serde(default)]
    pub layer: Layer,
    /// Reserved area-attack flag.
    #[serde(default)]
    pub splash: bool,
    /// Number of units produced per deployment.
    #[serde(default = "single")]
    pub count: u32,
}

const fn single() -> u32 {
    1
}

impl Card {
    /// Checks the card against the catalog invariants.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if !(MIN_COST..=MAX_COST).contains(&self.cost) {
            return Err(CatalogError::InvalidCost {
                card: self.id.clone(),
                cost: self.cost,
            });
        }

        let stats = [
            ("hp", self.hp),
            ("attack", self.attack),
            ("speed", self.speed),
            ("range", self.range),
        ];
        for (stat, value) in stats {
            // NaN fails this comparison as well.
            if !(value > 0.0) {
                return Err(CatalogError::NonPositiveStat {
                    card: self.id.clone(),
                    stat,
                });
            }
        }

        if self.count == 0 {
            return Err(CatalogError::EmptySquad {
                card: self.id.clone(),
            });
        }
        if self.count > MAX_SQUAD {
            return Err(CatalogError::OversizedSquad {
                card: self.id.clone(),
                count: self.count,
            });
        }

        Ok(())
    }

    /// Reports whether one deployment produces several units.
    #[must_use]
    pub const fn is_swarm(&self) -> bool {
        self.count > 1
    }
}

/// Reasons a catalog may fail validation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The catalog contains no cards.
    #[error("catalog contains no cards")]
    Empty,
    /// Two cards share an identifier.
    #[error("card id `{card}` appears more than once")]
    DuplicateId {
        /// Identifier that collided.
        card: CardId,
    },
    /// A card's cost lies outside `1..=10`.
    #[error("card `{card}` costs {cost} elixir, expected 1..=10")]
    InvalidCost {
        /// Offending card.
        card: CardId,
        /// Cost found on the card.
        cost: u32,
    },
    /// A combat stat is zero, negative, or not a number.
    #[error("card `{card}` has a non-positive {stat}")]
    NonPositiveStat {
        /// Offending card.
        card: CardId,
        /// Name of the stat that failed.
        stat: &'static str,
    },
    /// A card produces zero units.
    #[error("card `{card}` spawns zero units")]
    EmptySquad {
        /// Offending card.
        card: CardId,
    },
    /// A card produces more units than one deployment may hold.
    #[error("card `{card}` spawns {count} units, at most 16 are allowed")]
    OversizedSquad {
        /// Offending card.
        card: CardId,
        /// Squad size found on the card.
        count: u32,
    },
}

/// Ordered, validated set of cards available to a match.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    cards: Vec<Card>,
}

impl Catalog {
    /// Validates the provided cards and builds a catalog from them.
    pub fn new(cards: Vec<Card>) -> Result<Self, CatalogError> {
        if cards.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(cards.len());
        for card in &cards {
            card.validate()?;
            if !seen.insert(card.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    card: card.id.clone(),
                });
            }
        }

        Ok(Self { cards })
    }

    /// The seven-card reference set every default match plays with.
    #[must_use]
    pub fn reference() -> Self {
        Self {
            cards: vec![
                card("foot", "Footman", 3, 140.0, 25.0, 50.0, 18.0, TargetMask::Ground),
                card("bow", "Bowman", 3, 60.0, 15.0, 80.0, 140.0, TargetMask::AirGround),
                card("big", "Brute", 5, 340.0, 35.0, 32.0, 18.0, TargetMask::Ground),
                Card {
                    splash: true,
                    ..card("mage", "Mage", 4, 90.0, 28.0, 40.0, 110.0, TargetMask::AirGround)
                },
                Card {
                    splash: true,
                    ..card("bomb", "Bomber", 3, 80.0, 40.0, 46.0, 18.0, TargetMask::Ground)
                },
                Card {
                    layer: Layer::Air,
                    count: 3,
                    ..card("wing", "Winglings", 3, 40.0, 18.0, 95.0, 60.0, TargetMask::Air)
                },
                Card {
                    count: 4,
                    ..card("skel", "Skeletons", 2, 28.0, 10.0, 80.0, 16.0, TargetMask::Ground)
                },
            ],
        }
    }

    /// Looks up a card by its textual identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|card| card.id.as_str() == id)
    }

    /// Card at `index` in catalog order.
    #[must_use]
    pub fn nth(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    /// Iterator over the cards in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Number of cards in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Always `false` for a validated catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::reference()
    }
}

#[allow(clippy::too_many_arguments)]
fn card(
    id: &str,
    name: &str,
    cost: u32,
    hp: f32,
    attack: f32,
    speed: f32,
    range: f32,
    targets: TargetMask,
) -> Card {
    Card {
        id: CardId::new(id),
        name: name.to_owned(),
        cost,
        hp,
        attack,
        speed,
        range,
        targets,
        layer: Layer::Ground,
        splash: false,
        count: 1,
    }
}
