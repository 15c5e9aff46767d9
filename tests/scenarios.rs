//! End-to-end decision scenarios driving the full strategy against small
//! fixture levels.

use platbot::*;

fn world_from(level: &str) -> World {
    let mut grid = TileGrid::from_ascii(level).unwrap();
    grid.fix_borders();
    let mut world = World::new(grid);
    world.players = vec![Player { id: 0, score: 0 }, Player { id: 1, score: 0 }];
    world
}

fn armed(mut unit: Unit, typ: WeaponType) -> Unit {
    unit.weapon = Some(Weapon::new(typ));
    unit
}

fn weapon_loot(x: f64, y: f64, typ: WeaponType) -> LootBox {
    LootBox {
        position: Vec2::new(x, y),
        size: Vec2::new(0.5, 0.5),
        item: Item::Weapon { typ },
    }
}

fn health_loot(x: f64, y: f64) -> LootBox {
    LootBox {
        position: Vec2::new(x, y),
        size: Vec2::new(0.5, 0.5),
        item: Item::HealthPack { health: 50 },
    }
}

const FLAT: &str = "\
########################
#......................#
#......................#
#......................#
#......................#
#......................#
########################";

#[test]
fn flat_run_to_a_pickup_goes_full_speed_without_jumping() {
    let mut world = world_from(FLAT);
    world.units.push(Unit::new(1, 0, Vec2::new(5.5, 1.0)));
    world
        .units
        .push(armed(Unit::new(2, 1, Vec2::new(21.5, 1.0)), WeaponType::Pistol));
    world
        .loot_boxes
        .push(weapon_loot(10.5, 1.0, WeaponType::AssaultRifle));

    let mut strategy = Strategy::new();
    let action = strategy.act(1, &world, &mut NoDebug);

    assert_eq!(action.velocity, SPEED);
    assert!(!action.jump);
    assert!(!action.jump_down);
    // The pursued loot is a weapon pickup, so the swap flag is up.
    assert!(action.swap_weapon);
}

#[test]
fn a_wall_in_the_way_makes_the_plan_jump() {
    let level = "\
########################
#......................#
#......................#
#......................#
#......................#
#........#.............#
########################";
    let mut world = world_from(level);
    world.units.push(Unit::new(1, 0, Vec2::new(5.5, 1.0)));
    world
        .units
        .push(armed(Unit::new(2, 1, Vec2::new(21.5, 1.0)), WeaponType::Pistol));
    world
        .loot_boxes
        .push(weapon_loot(14.5, 1.0, WeaponType::AssaultRifle));

    let mut strategy = Strategy::new();
    let action = strategy.act(1, &world, &mut NoDebug);

    assert_eq!(action.velocity, SPEED);
    assert!(action.jump, "the unit must jump to clear the wall");

    // The committed plan jumps before the unit's footprint crosses the wall
    // column at x = 9..10.
    let plan = strategy.last_movement_plans.get(&1).expect("committed plan");
    let sim = Simulator::real(world.level.clone());
    let states = sim.simulate(&UnitState::of_unit(world.unit(1).unwrap()), plan);
    let crossing = states
        .iter()
        .position(|s| s.position.x > 10.0)
        .expect("the best plan crosses the wall");
    assert!(plan.moves()[..crossing].iter().any(|mv| mv.jump));
}

#[test]
fn incoming_bullet_triggers_a_strictly_safer_dodge() {
    let level = "\
########################
#......................#
#......................#
#......................#
#......................#
#......................#
#......................#
#......................#
#......................#
#......................#
#......................#
########################";
    let mut world = world_from(level);
    world.units.push(Unit::new(1, 0, Vec2::new(5.5, 1.0)));
    world
        .units
        .push(armed(Unit::new(2, 1, Vec2::new(18.5, 1.0)), WeaponType::Pistol));
    world.bullets.push(Bullet {
        unit_id: 2,
        player_id: 1,
        position: Vec2::new(12.5, 1.9),
        velocity: Vec2::new(-20.0, 0.0),
        damage: 5,
        size: 0.2,
        explosion: None,
    });

    let mut strategy = Strategy::new();
    strategy.prepare(&world);
    let me = world.unit(1).unwrap();
    let held = MoveCommand::idle();
    let overridden = strategy
        .try_dodge(me, held, &world, &mut NoDebug)
        .expect("the dodge search must override the held course");

    let sim = Simulator::real(world.level.clone());
    let start = UnitState::of_unit(me);
    let margin = strategy.config.safety_margin;
    let held_states = sim.simulate(&start, &Plan::of(strategy.config.dodge_ticks, held));
    let held_danger = danger_factor(&world, me, &held_states, &sim, margin);
    let dodge_plan = strategy.last_dodge_plans.get(&1).expect("committed dodge");
    assert_eq!(dodge_plan.get(0), overridden);
    let dodge_states = sim.simulate(&start, dodge_plan);
    let dodge_danger = danger_factor(&world, me, &dodge_states, &sim, margin);

    assert!(held_danger > 0.0);
    assert!(dodge_danger < held_danger);
}

#[test]
fn shooting_position_prefers_the_own_side_of_the_enemy() {
    let level = "\
##############################
#............................#
#............................#
#............................#
#............................#
##############################";
    let mut world = world_from(level);
    world
        .units
        .push(armed(Unit::new(1, 0, Vec2::new(9.5, 1.0)), WeaponType::Pistol));
    world
        .units
        .push(armed(Unit::new(2, 1, Vec2::new(10.5, 1.0)), WeaponType::Pistol));

    let mut strategy = Strategy::new();
    strategy.prepare(&world);
    let me = world.unit(1).unwrap();
    let enemy = world.unit(2).unwrap();
    let point = strategy
        .safe_shooting_position(me, enemy)
        .expect("open room must offer a shooting position");

    // The far side of the room offers much larger raw distances, but those
    // points sit on the wrong side of the enemy.
    assert!(point.x < enemy.position.x);
}

#[test]
fn fire_is_held_without_line_of_sight() {
    let level = "\
########################
#..........#...........#
#..........#...........#
#..........#...........#
#..........#...........#
#..........#...........#
########################";
    let mut world = world_from(level);
    world
        .units
        .push(armed(Unit::new(1, 0, Vec2::new(5.5, 1.0)), WeaponType::Pistol));
    world
        .units
        .push(armed(Unit::new(2, 1, Vec2::new(18.5, 1.0)), WeaponType::Pistol));

    let mut strategy = Strategy::new();
    let action = strategy.act(1, &world, &mut NoDebug);
    assert!(!action.shoot);
}

#[test]
fn fire_is_released_with_a_clear_line() {
    let mut world = world_from(FLAT);
    world
        .units
        .push(armed(Unit::new(1, 0, Vec2::new(5.5, 1.0)), WeaponType::Pistol));
    world
        .units
        .push(armed(Unit::new(2, 1, Vec2::new(18.5, 1.0)), WeaponType::Pistol));

    let mut strategy = Strategy::new();
    let action = strategy.act(1, &world, &mut NoDebug);
    assert!(action.shoot);
    assert!(!action.swap_weapon);
    // Raw displacement aim, no prediction.
    assert_eq!(action.aim, Vec2::new(13.0, 0.0));
}

#[test]
fn fire_is_held_when_a_teammate_is_in_the_spread_cone() {
    let mut world = world_from(FLAT);
    world
        .units
        .push(armed(Unit::new(1, 0, Vec2::new(5.5, 1.0)), WeaponType::Pistol));
    world
        .units
        .push(armed(Unit::new(2, 0, Vec2::new(8.5, 1.0)), WeaponType::Pistol));
    world
        .units
        .push(armed(Unit::new(3, 1, Vec2::new(15.5, 1.0)), WeaponType::Pistol));

    let mut strategy = Strategy::new();
    let action = strategy.act(1, &world, &mut NoDebug);
    assert!(!action.shoot);
}

#[test]
fn rocket_fire_is_held_when_the_opponent_can_dodge() {
    let level = "\
##############################
#............................#
#............................#
#............................#
#............................#
#............................#
#............................#
#............................#
#............................#
#............................#
##############################";
    let mut world = world_from(level);
    world.units.push(armed(
        Unit::new(1, 0, Vec2::new(5.5, 1.0)),
        WeaponType::RocketLauncher,
    ));
    world
        .units
        .push(armed(Unit::new(2, 1, Vec2::new(18.5, 1.0)), WeaponType::Pistol));

    let mut strategy = Strategy::new();
    let action = strategy.act(1, &world, &mut NoDebug);
    // An open field always leaves the opponent a zero-danger escape.
    assert!(!action.shoot);
}

#[test]
fn the_second_unit_cannot_reclaim_loot_or_cross_the_first_trajectory() {
    let mut world = world_from(FLAT);
    let mut one = armed(Unit::new(1, 0, Vec2::new(5.5, 1.0)), WeaponType::Pistol);
    one.health = 50;
    let mut two = armed(Unit::new(2, 0, Vec2::new(7.5, 1.0)), WeaponType::Pistol);
    two.health = 50;
    world.units.push(one);
    world.units.push(two);
    world
        .units
        .push(armed(Unit::new(3, 1, Vec2::new(20.5, 1.0)), WeaponType::Pistol));
    world.loot_boxes.push(health_loot(12.5, 1.0));

    let mut strategy = Strategy::new();
    let first = strategy.act(1, &world, &mut NoDebug);
    let second = strategy.act(2, &world, &mut NoDebug);

    // One pack, one claim: the second unit must not pursue the same box.
    assert_eq!(strategy.claims.loot_points.len(), 1);
    assert!(!second.swap_weapon);
    // Both units committed a trajectory for this tick.
    assert_eq!(strategy.claims.trajectories.len(), 2);
    let _ = first;
}

#[test]
fn plan_memory_feeds_the_next_tick() {
    let mut world = world_from(FLAT);
    world.units.push(Unit::new(1, 0, Vec2::new(5.5, 1.0)));
    world
        .units
        .push(armed(Unit::new(2, 1, Vec2::new(21.5, 1.0)), WeaponType::Pistol));
    world
        .loot_boxes
        .push(weapon_loot(10.5, 1.0, WeaponType::AssaultRifle));

    let mut strategy = Strategy::new();
    strategy.act(1, &world, &mut NoDebug);
    let committed = strategy.last_movement_plans.get(&1).unwrap().clone();

    // Next tick from the simulated position: claims roll over, memory stays.
    let mut next = world.clone();
    next.current_tick = 1;
    let sim = Simulator::real(world.level.clone());
    let states = sim.simulate(
        &UnitState::of_unit(world.unit(1).unwrap()),
        &Plan::of(1, MoveCommand::new(SPEED, false, false)),
    );
    next.units[0].position = states[0].position;
    strategy.act(1, &next, &mut NoDebug);

    assert_eq!(strategy.claims.tick, 1);
    assert_eq!(strategy.claims.trajectories.len(), 1);
    assert_eq!(committed.len(), strategy.config.step_budget);
}
