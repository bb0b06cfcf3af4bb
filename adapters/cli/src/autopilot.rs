use lane_battle_core::{Lane, Position, SpellKind, Team, UnitSnapshot, UnitView};
use lane_battle_match::Match;

/// Elixir the autopilot banks before it deploys anything.
const DEPLOY_RESERVE: f32 = 5.0;
/// Enemy units that must stand inside one blast before fire is worth casting.
const CLUSTER_SIZE: usize = 2;

/// Scripted stand-in for a human player.
///
/// Each step the autopilot first looks for enemy units that crossed into the
/// player's half. It casts fire on the densest group of them once at least
/// [`CLUSTER_SIZE`] would be caught, or on any intruder when the elixir pool
/// is full. Otherwise it deploys the next card of the catalog rotation on the
/// next lane once the reserve and the card's cost are covered.
#[derive(Debug, Default)]
pub(crate) struct Autopilot {
    next_card: usize,
    next_lane: usize,
}

impl Autopilot {
    pub(crate) fn step(&mut self, battle: &mut Match) {
        let elixir = battle.elixir(Team::Player);
        let config = battle.config();
        let flush = elixir >= config.elixir.max;
        let fire = SpellKind::Fire;

        if elixir >= fire.cost() as f32 {
            let units = battle.units();
            if let Some(target) = fire_target(&units, config.width / 2.0, fire.radius(), flush) {
                battle.request_cast(fire, target, Team::Player);
                return;
            }
        }

        if elixir < DEPLOY_RESERVE || battle.catalog().is_empty() {
            return;
        }
        let Some(card) = battle.catalog().nth(self.next_card % battle.catalog().len()) else {
            return;
        };
        if (card.cost as f32) > elixir {
            return;
        }

        let card = card.id.as_str().to_owned();
        let lane = Lane::ALL[self.next_lane % Lane::ALL.len()];
        let position = Position::new(config.width / 4.0, config.lane_y(lane));
        self.next_card = self.next_card.wrapping_add(1);
        self.next_lane = self.next_lane.wrapping_add(1);
        battle.request_deploy(&card, position, Team::Player);
    }
}

/// Picks the enemy intruder whose blast would catch the most intruders.
fn fire_target(units: &UnitView, centre_x: f32, radius: f32, flush: bool) -> Option<Position> {
    let intruders: Vec<&UnitSnapshot> = units
        .team(Team::Enemy)
        .filter(|unit| unit.position.x() <= centre_x)
        .collect();

    let mut best: Option<(Position, usize)> = None;
    for candidate in &intruders {
        let caught = intruders
            .iter()
            .filter(|other| other.position.distance(candidate.position) < radius)
            .count();
        if best.map_or(true, |(_, most)| caught > most) {
            best = Some((candidate.position, caught));
        }
    }

    let (position, caught) = best?;
    (caught >= CLUSTER_SIZE || flush).then_some(position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_battle_core::{ArenaConfig, Catalog, ElixirConfig, EnemyConfig, Event};

    fn battle(initial: f32) -> Match {
        Match::new(
            ArenaConfig {
                elixir: ElixirConfig {
                    initial,
                    ..ElixirConfig::default()
                },
                enemy: EnemyConfig {
                    enabled: false,
                    ..EnemyConfig::default()
                },
                ..ArenaConfig::default()
            },
            Catalog::reference(),
        )
    }

    #[test]
    fn waits_for_the_reserve() {
        let mut battle = battle(4.0);
        Autopilot::default().step(&mut battle);
        assert!(battle.drain_events().is_empty());
    }

    #[test]
    fn deploys_in_rotation_across_lanes() {
        let mut battle = battle(10.0);
        let mut pilot = Autopilot::default();

        pilot.step(&mut battle);
        pilot.step(&mut battle);

        let deployed: Vec<(String, usize)> = battle
            .drain_events()
            .into_iter()
            .filter_map(|event| match event {
                Event::CardDeployed { card, lane, .. } => {
                    Some((card.as_str().to_owned(), lane.index()))
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            deployed,
            vec![("foot".to_owned(), 0), ("bow".to_owned(), 1)]
        );
    }

    #[test]
    fn casts_on_a_cluster_of_intruders() {
        let mut battle = battle(10.0);
        battle.request_deploy("skel", Position::new(480.0, 151.2), Team::Enemy);
        let _ = battle.drain_events();

        Autopilot::default().step(&mut battle);

        assert!(battle
            .drain_events()
            .iter()
            .any(|event| matches!(event, Event::SpellCast { team: Team::Player, .. })));
    }

    #[test]
    fn lone_intruders_wait_for_a_full_pool() {
        let mut battle = battle(9.0);
        battle.request_deploy("foot", Position::new(480.0, 151.2), Team::Enemy);
        let units = battle.units();

        assert_eq!(fire_target(&units, 480.0, 60.0, false), None);
        assert_eq!(
            fire_target(&units, 480.0, 60.0, true).map(|target| target.x()),
            Some(480.0)
        );
        assert_eq!(
            fire_target(&UnitView::default(), 480.0, 60.0, true),
            None
        );
    }
}
