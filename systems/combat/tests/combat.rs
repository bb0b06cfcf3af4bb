use std::time::Duration;

use lane_battle_core::{
    ArenaConfig, CardId, Catalog, Command, EnemyConfig, Event, Layer, MatchState, Position,
    TargetMask, Team, UnitBlueprint, UnitId,
};
use lane_battle_system_combat::Combat;
use lane_battle_world::{self as world, query, World};

const TICK: Duration = Duration::from_millis(100);
const DRY_LANE_Y: f32 = 151.2;

#[test]
fn unengaged_units_advance_by_speed_times_dt() {
    let mut world = quiet_world();
    spawn(&mut world, footman(Team::Player, 200.0, DRY_LANE_Y));
    spawn(&mut world, footman(Team::Enemy, 700.0, DRY_LANE_Y));

    let mut combat = Combat::new();
    let events = tick(&mut world, &mut combat, TICK);

    let units = query::unit_view(&world);
    let player = units.get(UnitId::new(0)).expect("player unit");
    let enemy = units.get(UnitId::new(1)).expect("enemy unit");
    assert!((player.position.x() - 205.0).abs() < 1e-4);
    assert!((enemy.position.x() - 695.0).abs() < 1e-4);
    assert!((player.position.y() - DRY_LANE_Y).abs() < f32::EPSILON);
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::UnitAdvanced { .. }))
            .count(),
        2
    );
}

#[test]
fn river_crossing_gives_back_a_share_of_the_step() {
    let mut world = quiet_world();
    let river_y = query::config(&world).lane_y(lane_battle_core::Lane::ALL[1]);
    spawn(&mut world, footman(Team::Player, 400.0, river_y));

    let mut combat = Combat::new();
    let _ = tick(&mut world, &mut combat, Duration::from_secs(1));

    let units = query::unit_view(&world);
    let unit = units.get(UnitId::new(0)).expect("unit");
    assert!((unit.position.x() - 442.5).abs() < 1e-3);
}

#[test]
fn engaged_units_hold_position_while_fighting() {
    let mut world = quiet_world();
    spawn(&mut world, footman(Team::Player, 400.0, DRY_LANE_Y));
    spawn(&mut world, footman(Team::Enemy, 420.0, DRY_LANE_Y));

    let mut combat = Combat::new();
    for _ in 0..5 {
        let _ = tick(&mut world, &mut combat, TICK);
    }

    let units = query::unit_view(&world);
    let player = units.get(UnitId::new(0)).expect("player unit");
    let enemy = units.get(UnitId::new(1)).expect("enemy unit");
    assert!((player.position.x() - 400.0).abs() < f32::EPSILON);
    assert!((enemy.position.x() - 420.0).abs() < f32::EPSILON);
    assert!((player.hp - 127.5).abs() < 1e-3);
    assert!((enemy.hp - 127.5).abs() < 1e-3);
}

#[test]
fn defeated_units_leave_after_the_tick() {
    let mut world = quiet_world();
    spawn(&mut world, footman(Team::Player, 400.0, DRY_LANE_Y));
    spawn(
        &mut world,
        UnitBlueprint {
            hp: 2.0,
            ..footman(Team::Enemy, 420.0, DRY_LANE_Y)
        },
    );

    let mut combat = Combat::new();
    let events = tick(&mut world, &mut combat, TICK);

    assert!(events.contains(&Event::UnitDefeated {
        unit: UnitId::new(1),
        team: Team::Enemy,
    }));
    let units = query::unit_view(&world);
    assert_eq!(units.len(), 1);
    let survivor = units.get(UnitId::new(0)).expect("survivor");
    assert!((survivor.hp - 137.5).abs() < 1e-3, "doomed unit still strikes");
}

#[test]
fn ground_attackers_ignore_air_units() {
    let mut world = quiet_world();
    spawn(&mut world, footman(Team::Player, 400.0, DRY_LANE_Y));
    spawn(
        &mut world,
        UnitBlueprint {
            layer: Layer::Air,
            targets: TargetMask::Air,
            ..footman(Team::Enemy, 410.0, DRY_LANE_Y)
        },
    );

    let mut combat = Combat::new();
    let _ = tick(&mut world, &mut combat, TICK);

    let units = query::unit_view(&world);
    let player = units.get(UnitId::new(0)).expect("player unit");
    let flyer = units.get(UnitId::new(1)).expect("flyer");
    assert!((player.position.x() - 405.0).abs() < 1e-4);
    assert!((flyer.position.x() - 405.0).abs() < 1e-4);
    assert!((player.hp - 140.0).abs() < f32::EPSILON);
    assert!((flyer.hp - 140.0).abs() < f32::EPSILON);
}

#[test]
fn destroying_a_tower_ends_the_match_and_freezes_combat() {
    let mut world = World::new(
        ArenaConfig {
            tower_hp: 5.0,
            enemy: EnemyConfig {
                enabled: false,
                ..EnemyConfig::default()
            },
            ..ArenaConfig::default()
        },
        Catalog::reference(),
    );
    spawn(&mut world, footman(Team::Player, 850.0, 270.0));

    let mut combat = Combat::new();
    let events = tick(&mut world, &mut combat, Duration::from_millis(500));
    assert!(events.contains(&Event::MatchEnded {
        winner: Some(Team::Player),
    }));
    assert_eq!(
        query::match_state(&world),
        MatchState::Ended {
            winner: Some(Team::Player),
        }
    );

    let frozen = query::unit_view(&world).into_vec();
    let later = tick(&mut world, &mut combat, Duration::from_millis(500));
    assert!(later.is_empty());
    assert_eq!(query::unit_view(&world).into_vec(), frozen);
}

fn quiet_world() -> World {
    World::new(ArenaConfig::default(), Catalog::reference())
}

fn footman(team: Team, x: f32, y: f32) -> UnitBlueprint {
    UnitBlueprint {
        card: CardId::new("foot"),
        team,
        position: Position::new(x, y),
        hp: 140.0,
        attack: 25.0,
        speed: 50.0,
        range: 18.0,
        targets: TargetMask::Ground,
        layer: Layer::Ground,
        splash: false,
    }
}

fn spawn(world: &mut World, blueprint: UnitBlueprint) {
    let mut events = Vec::new();
    world::apply(world, Command::SpawnUnit { blueprint }, &mut events);
}

fn tick(world: &mut World, combat: &mut Combat, dt: Duration) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt }, &mut events);

    let units = query::unit_view(world);
    let towers = query::tower_view(world);
    let mut commands = Vec::new();
    combat.handle(
        &events,
        query::match_state(world),
        &units,
        &towers,
        query::config(world),
        &mut commands,
    );

    for command in commands {
        world::apply(world, command, &mut events);
    }
    world::apply(world, Command::ResolveCasualties, &mut events);
    events
}
