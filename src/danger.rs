use super::simulation::{Simulator, UnitState, HEIGHT, WIDTH};
use super::vec2::{Segment, Vec2};
use super::world::{Bullet, Mine, MineState, Unit, World};

/// Separation between the unit footprint at `unit_pos` and a square of side
/// `size` centered at `center`: the larger per-axis gap, 0 on contact.
pub fn unit_rect_dist(unit_pos: Vec2, center: Vec2, size: f64) -> f64 {
    let ax = Segment::new(unit_pos.x - WIDTH / 2.0, unit_pos.x + WIDTH / 2.0);
    let ay = Segment::new(unit_pos.y, unit_pos.y + HEIGHT);
    let bx = Segment::new(center.x - size / 2.0, center.x + size / 2.0);
    let by = Segment::new(center.y - size / 2.0, center.y + size / 2.0);
    ax.dist(bx).max(ay.dist(by))
}

/// Risk contribution from a minimum separation: full damage on contact, a
/// positive decreasing penalty inside the safety margin, nothing beyond it.
/// Continuous on purpose so the search can rank least-bad options.
pub fn danger_value(margin: f64, dist: f64, damage: f64) -> f64 {
    if dist == 0.0 {
        return damage;
    }
    if dist < margin {
        return margin - dist;
    }
    0.0
}

/// Danger of one bullet against a simulated unit trajectory: minimum
/// footprint separation over the flight window, plus the wall-burst
/// explosion when the bullet carries one and dies inside the window.
pub fn bullet_danger(bullet: &Bullet, states: &[UnitState], sim: &Simulator, margin: f64) -> f64 {
    let traj = sim.simulate_bullet(bullet, states.len());
    let mut min_dist = f64::INFINITY;
    let mut contact = false;
    for (i, bullet_pos) in traj.positions.iter().enumerate() {
        let dist = unit_rect_dist(states[i].position, *bullet_pos, bullet.size);
        min_dist = min_dist.min(dist);
        if dist == 0.0 {
            contact = true;
            break;
        }
    }

    let mut danger = 0.0;
    if !contact {
        if let (Some(collision), Some(explosion)) = (traj.collision, bullet.explosion.as_ref()) {
            let tick = traj.len() - 1;
            let dist = unit_rect_dist(states[tick].position, collision, explosion.radius * 2.0);
            danger += danger_value(margin, dist, explosion.damage as f64);
        }
    }

    let mut damage = bullet.damage as f64;
    if let Some(explosion) = &bullet.explosion {
        damage += explosion.damage as f64;
    }
    danger + danger_value(margin, min_dist, damage)
}

/// Danger of one triggered mine: the trajectory position at the detonation
/// tick against the explosion footprint. Trajectories shorter than the timer
/// are unaffected.
pub fn mine_danger(mine: &Mine, states: &[UnitState], sim: &Simulator, margin: f64) -> f64 {
    if mine.state != MineState::Triggered {
        return 0.0;
    }
    let (Some(timer), Some(explosion)) = (mine.timer, mine.explosion.as_ref()) else {
        return 0.0;
    };
    let explosion_tick = (timer / sim.tick_duration) as usize;
    if explosion_tick >= states.len() {
        return 0.0;
    }
    let mine_center = mine.position + Vec2::new(0.0, mine.size.y / 2.0);
    let dist = unit_rect_dist(
        states[explosion_tick].position,
        mine_center,
        explosion.radius * 2.0,
    );
    danger_value(margin, dist, explosion.damage as f64)
}

/// Total danger of a trajectory for `me` against every live threat in the
/// snapshot. Own non-explosive bullets are harmless to their shooter and are
/// skipped; own explosive ordnance still counts.
pub fn danger_factor(
    world: &World,
    me: &Unit,
    states: &[UnitState],
    sim: &Simulator,
    margin: f64,
) -> f64 {
    if states.is_empty() {
        return 0.0;
    }
    let mut danger = 0.0;
    for bullet in &world.bullets {
        if bullet.player_id == me.player_id && bullet.explosion.is_none() {
            continue;
        }
        danger += bullet_danger(bullet, states, sim, margin);
    }
    for mine in &world.mines {
        danger += mine_danger(mine, states, sim, margin);
    }
    danger
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileGrid;
    use crate::world::ExplosionParams;

    const ROOM: &str = "\
####################
#..................#
#..................#
#..................#
#..................#
#..................#
####################";

    fn sim() -> Simulator {
        let mut grid = TileGrid::from_ascii(ROOM).unwrap();
        grid.fix_borders();
        Simulator::real(grid)
    }

    fn stationary(pos: Vec2, ticks: usize) -> Vec<UnitState> {
        vec![UnitState::new(pos, 0.0, false, false); ticks]
    }

    fn bullet_at(x: f64, y: f64, vx: f64, player_id: i32) -> Bullet {
        Bullet {
            unit_id: 10 * player_id,
            player_id,
            position: Vec2::new(x, y),
            velocity: Vec2::new(vx, 0.0),
            damage: 5,
            size: 0.2,
            explosion: None,
        }
    }

    #[test]
    fn contact_scores_the_full_damage() {
        let sim = sim();
        // Bullet flying straight through the unit's chest.
        let bullet = bullet_at(10.5, 2.0, -30.0, 2);
        let states = stationary(Vec2::new(5.5, 1.0), 80);
        let danger = bullet_danger(&bullet, &states, &sim, 0.5);
        assert_eq!(danger, 5.0);
    }

    #[test]
    fn distant_bullet_is_harmless() {
        let sim = sim();
        // Parallel track two tiles above the unit's head.
        let bullet = bullet_at(10.5, 4.9, -30.0, 2);
        let states = stationary(Vec2::new(5.5, 1.0), 80);
        assert_eq!(bullet_danger(&bullet, &states, &sim, 0.5), 0.0);
    }

    #[test]
    fn near_miss_scores_the_margin_gap() {
        let sim = sim();
        // Closest approach leaves a 0.2 gap above the head: head at y = 2.8,
        // bullet bottom edge at 3.0.
        let bullet = bullet_at(10.5, 3.1, -30.0, 2);
        let states = stationary(Vec2::new(5.5, 1.0), 80);
        let danger = bullet_danger(&bullet, &states, &sim, 0.5);
        assert!((danger - 0.3).abs() < 1e-9, "danger {danger}");
    }

    #[test]
    fn own_plain_bullet_is_ignored_but_own_rocket_is_not() {
        let sim = sim();
        let me = Unit::new(1, 1, Vec2::new(5.5, 1.0));
        let states = stationary(me.position, 80);

        let mut world = World::new(sim.grid().clone());
        world.bullets.push(bullet_at(10.5, 2.0, -30.0, 1));
        assert_eq!(danger_factor(&world, &me, &states, &sim, 0.5), 0.0);

        world.bullets[0].explosion = Some(ExplosionParams {
            radius: 3.0,
            damage: 50,
        });
        assert!(danger_factor(&world, &me, &states, &sim, 0.5) > 0.0);
    }

    #[test]
    fn wall_burst_explosion_reaches_around_the_flight_line() {
        let sim = sim();
        // Rocket passing overhead into the right border wall; the direct
        // flight misses but the burst footprint catches the unit below.
        let mut rocket = bullet_at(10.5, 4.5, 30.0, 2);
        rocket.size = 0.4;
        rocket.explosion = Some(ExplosionParams {
            radius: 3.0,
            damage: 50,
        });
        let states = stationary(Vec2::new(17.5, 1.0), 80);
        let danger = bullet_danger(&rocket, &states, &sim, 0.5);
        assert_eq!(danger, 50.0);
    }

    #[test]
    fn triggered_mine_scores_at_its_detonation_tick() {
        let sim = sim();
        let mine = Mine {
            position: Vec2::new(6.5, 1.0),
            size: Vec2::new(0.5, 0.5),
            state: MineState::Triggered,
            timer: Some(0.2),
            explosion: Some(ExplosionParams {
                radius: 3.0,
                damage: 50,
            }),
        };
        let close = stationary(Vec2::new(5.5, 1.0), 40);
        assert_eq!(mine_danger(&mine, &close, &sim, 0.5), 50.0);

        let far = stationary(Vec2::new(15.5, 1.0), 40);
        assert_eq!(mine_danger(&mine, &far, &sim, 0.5), 0.0);

        // Trajectory ends before the mine detonates.
        let short = stationary(Vec2::new(5.5, 1.0), 5);
        assert_eq!(mine_danger(&mine, &short, &sim, 0.5), 0.0);

        let idle = Mine {
            state: MineState::Idle,
            ..mine.clone()
        };
        assert_eq!(mine_danger(&idle, &close, &sim, 0.5), 0.0);
    }

    #[test]
    fn danger_is_monotone_in_separation() {
        let sim = sim();
        let bullet = bullet_at(10.5, 2.0, -30.0, 2);
        // Trajectory A keeps strictly more distance than B at every sample.
        let a = stationary(Vec2::new(2.5, 4.0), 60);
        let b = stationary(Vec2::new(5.5, 2.5), 60);
        assert!(bullet_danger(&bullet, &a, &sim, 0.5) <= bullet_danger(&bullet, &b, &sim, 0.5));
    }
}
