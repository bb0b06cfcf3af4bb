use std::{fs, path::Path};

use anyhow::{Context, Result};
use lane_battle_core::{ArenaConfig, Card, Catalog};
use serde::Deserialize;

/// Contents of a `--config` file.
///
/// ```toml
/// [arena]
/// tower_hp = 1500.0
///
/// [arena.enemy]
/// min_interval_secs = 1.0
///
/// [[cards]]
/// id = "foot"
/// name = "Footman"
/// cost = 3
/// hp = 140.0
/// attack = 25.0
/// speed = 50.0
/// range = 18.0
/// targets = "ground"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Settings {
    #[serde(default)]
    arena: ArenaConfig,
    #[serde(default)]
    cards: Option<Vec<Card>>,
}

impl Settings {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse arena config toml contents")
    }

    /// Splits the settings into a validated arena and catalog. Without a
    /// card list the reference catalog is used.
    pub(crate) fn into_parts(self) -> Result<(ArenaConfig, Catalog)> {
        self.arena
            .validate()
            .context("arena section in config file is invalid")?;
        let catalog = match self.cards {
            Some(cards) => Catalog::new(cards).context("card list in config file is invalid")?,
            None => Catalog::reference(),
        };
        Ok((self.arena, catalog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let (arena, catalog) = Settings::parse("")
            .and_then(Settings::into_parts)
            .expect("defaults");
        assert_eq!(arena, ArenaConfig::default());
        assert_eq!(catalog, Catalog::reference());
    }

    #[test]
    fn partial_sections_override_only_named_values() {
        let (arena, _) = Settings::parse(
            r#"
            [arena]
            tower_hp = 1500.0
            seed = 9

            [arena.enemy]
            enabled = false
            "#,
        )
        .and_then(Settings::into_parts)
        .expect("parsed");

        assert!((arena.tower_hp - 1_500.0).abs() < f32::EPSILON);
        assert_eq!(arena.seed, 9);
        assert!(!arena.enemy.enabled);
        assert!((arena.enemy.first_spawn_secs - 1.5).abs() < f32::EPSILON);
        assert!((arena.width - 960.0).abs() < f32::EPSILON);
    }

    #[test]
    fn custom_cards_replace_the_reference_catalog() {
        let (_, catalog) = Settings::parse(
            r#"
            [[cards]]
            id = "pike"
            name = "Pikeman"
            cost = 4
            hp = 200.0
            attack = 20.0
            speed = 45.0
            range = 30.0
            targets = "ground"
            "#,
        )
        .and_then(Settings::into_parts)
        .expect("parsed");

        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("pike").is_some_and(|card| card.count == 1));
    }

    #[test]
    fn invalid_cards_are_reported() {
        let error = Settings::parse(
            r#"
            [[cards]]
            id = "free"
            name = "Freebie"
            cost = 0
            hp = 1.0
            attack = 1.0
            speed = 1.0
            range = 1.0
            targets = "air"
            "#,
        )
        .and_then(Settings::into_parts)
        .expect_err("cost zero");

        assert!(format!("{error:#}").contains("card list"));
    }

    #[test]
    fn unbounded_jitter_is_rejected() {
        let error = Settings::parse("[arena.swarm]\nsingle_jitter = inf\n")
            .and_then(Settings::into_parts)
            .expect_err("infinite jitter");

        let message = format!("{error:#}");
        assert!(message.contains("arena section"));
        assert!(message.contains("swarm.single_jitter"));
    }

    #[test]
    fn draining_elixir_rate_is_rejected() {
        let error = Settings::parse("[arena.elixir]\nper_second = -1.0\n")
            .and_then(Settings::into_parts)
            .expect_err("negative rate");

        assert!(format!("{error:#}").contains("elixir.per_second"));
    }

    #[test]
    fn oversized_squads_are_rejected() {
        let error = Settings::parse(
            r#"
            [[cards]]
            id = "horde"
            name = "Horde"
            cost = 5
            hp = 10.0
            attack = 1.0
            speed = 40.0
            range = 10.0
            targets = "ground"
            count = 4294967295
            "#,
        )
        .and_then(Settings::into_parts)
        .expect_err("squad too large");

        assert!(format!("{error:#}").contains("at most 16"));
    }

    #[test]
    fn unknown_sections_are_rejected() {
        assert!(Settings::parse("[arena]\nwidth = 800.0\n[bogus]\nx = 1\n").is_err());
    }
}
