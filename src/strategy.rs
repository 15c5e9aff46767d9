use std::collections::HashMap;

use log::debug;

use super::danger::{bullet_danger, danger_factor, unit_rect_dist};
use super::debug::{DebugSink, GREEN, RED, TRANSPARENT_RED, WHITE};
use super::pathfinding::{DistanceField, DistanceOracle};
use super::plans::{dodge_plans, movement_plans, Plan};
use super::simulation::{
    bullet_collides_with_wall, unit_collides_with_wall, MoveCommand, Simulator, UnitState, HEIGHT,
    SPEED, WIDTH,
};
use super::vec2::{Segment, Vec2};
use super::world::{
    Bullet, Item, LootBox, Unit, UnitAction, Weapon, WeaponType, World,
};

/// Empirically tuned scoring knobs. The defaults are the values the bot
/// plays with; the fields exist so the tie-break weights and hard gates can
/// be adjusted without touching the search code.
#[derive(Debug, Clone)]
pub struct Config {
    /// Plan length of the movement search, in ticks.
    pub step_budget: usize,
    /// Phase-split granularity of the two-phase movement sweeps.
    pub phase_step: usize,
    /// Horizon of the dodge search, in ticks.
    pub dodge_ticks: usize,
    /// Duration granularity of the dodge sweeps.
    pub dodge_sweep_step: usize,
    /// Separation below which a near miss starts to score danger.
    pub safety_margin: f64,
    /// Per-tick-index weight breaking progress ties toward earlier arrival.
    pub arrival_weight: f64,
    /// Flat score added when a candidate trajectory touches another unit.
    pub collision_penalty: f64,
    /// Distance handicap for shooting positions on the far side of the enemy.
    pub wrong_side_penalty: f64,
    /// Health below which a health pack becomes the movement target.
    pub health_pack_threshold: i32,
    /// Fraction of the match after which a losing bot rushes the enemy.
    pub endgame_fraction: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            step_budget: 64,
            phase_step: 6,
            dodge_ticks: 50,
            dodge_sweep_step: 2,
            safety_margin: 0.5,
            arrival_weight: 0.1,
            collision_penalty: 100.0,
            wrong_side_penalty: 1000.0,
            health_pack_threshold: 75,
            endgame_fraction: 0.75,
        }
    }
}

/// Intentions already fixed by teammates this tick. Reset whenever the tick
/// index changes, so the second controlled unit can avoid the first one's
/// trajectory and loot claim.
#[derive(Debug, Default)]
pub struct TickClaims {
    pub tick: i32,
    pub trajectories: Vec<(i32, Vec<UnitState>)>,
    pub target_points: Vec<(i32, Vec2)>,
    pub loot_points: Vec<Vec2>,
}

impl TickClaims {
    fn reset(&mut self, tick: i32) {
        self.tick = tick;
        self.trajectories.clear();
        self.target_points.clear();
        self.loot_points.clear();
    }
}

pub struct Strategy {
    pub config: Config,
    sim: Option<Simulator>,
    oracle: Option<DistanceOracle>,
    pub stable_points: Vec<Vec2>,
    pub last_movement_plans: HashMap<i32, Plan>,
    pub last_dodge_plans: HashMap<i32, Plan>,
    pub claims: TickClaims,
}

impl Strategy {
    pub fn new() -> Self {
        Strategy::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Strategy {
            config,
            sim: None,
            oracle: None,
            stable_points: Vec::new(),
            last_movement_plans: HashMap::new(),
            last_dodge_plans: HashMap::new(),
            claims: TickClaims {
                tick: -1,
                ..TickClaims::default()
            },
        }
    }

    /// Freezes the level and precomputes the stable-point set on first call;
    /// afterwards only rolls the per-tick claim state over.
    pub fn prepare(&mut self, world: &World) {
        if self.sim.is_none() {
            let mut grid = world.level.clone();
            grid.fix_borders();
            let sim = Simulator::new(
                grid.clone(),
                world.properties.ticks_per_second,
                world.properties.updates_per_tick,
            );
            self.stable_points = find_stable_points(&sim);
            debug!("froze level, {} stable points", self.stable_points.len());
            self.oracle = Some(DistanceOracle::new(grid));
            self.sim = Some(sim);
        }
        if self.claims.tick != world.current_tick {
            self.claims.reset(world.current_tick);
        }
    }

    /// Full per-unit decision for one tick. Call once per controlled unit,
    /// in a fixed order: the second call sees the first unit's claims.
    pub fn act(&mut self, me_id: i32, world: &World, debug: &mut dyn DebugSink) -> UnitAction {
        self.prepare(world);
        let Some(me) = world.unit(me_id) else {
            return UnitAction::noop();
        };
        let Some(enemy) = nearest_enemy(me, world) else {
            return UnitAction::noop();
        };

        let loot = self.choose_target_loot(me, enemy, world);
        let move_cmd = self.movement(me, enemy, loot, world, debug);
        let aim = enemy.position - me.position;
        let shoot = self.should_shoot(me, enemy, world);
        let swap_weapon = matches!(loot.map(|l| &l.item), Some(Item::Weapon { .. }));

        UnitAction {
            velocity: move_cmd.speed.clamp(-SPEED, SPEED),
            jump: move_cmd.jump,
            jump_down: move_cmd.jump_down,
            aim,
            shoot,
            swap_weapon,
            plant_mine: false,
        }
    }

    fn movement(
        &mut self,
        me: &Unit,
        enemy: &Unit,
        loot: Option<&LootBox>,
        world: &World,
        debug: &mut dyn DebugSink,
    ) -> MoveCommand {
        let base = match self.resolve_target(me, enemy, loot, world) {
            Some((target_pos, pursues_loot)) => {
                self.claims.target_points.push((me.id, target_pos));
                if pursues_loot {
                    if let Some(lb) = loot {
                        self.claims.loot_points.push(lb.position);
                    }
                }
                self.best_movement(me, target_pos, world, debug)
            }
            None => MoveCommand::idle(),
        };
        self.try_dodge(me, base, world, debug).unwrap_or(base)
    }

    /// Resolves this tick's movement destination. The second element marks a
    /// pursued loot box, which the unit claims for the tick.
    fn resolve_target(
        &self,
        me: &Unit,
        enemy: &Unit,
        loot: Option<&LootBox>,
        world: &World,
    ) -> Option<(Vec2, bool)> {
        if let Some(lb) = loot {
            match &lb.item {
                Item::HealthPack { .. } if self.should_go_to_health_pack(me, world) => {
                    return Some((self.health_pack_target_point(me, lb, world), true));
                }
                Item::Weapon { .. } => return Some((lb.position, true)),
                _ => {}
            }
        }
        self.find_shooting_position(me, enemy, world)
            .map(|p| (p, false))
    }

    /// Best-plan search toward the target point: enumerate, simulate, score,
    /// commit. Falls back to standing still when nothing scores.
    fn best_movement(
        &mut self,
        me: &Unit,
        target_pos: Vec2,
        world: &World,
        debug: &mut dyn DebugSink,
    ) -> MoveCommand {
        debug.line(me.position, target_pos, WHITE);
        let sim = self.sim.as_ref().unwrap();
        let cfg = &self.config;
        let speed_to_target =
            sim.clamp_speed(sim.from_tick_speed(target_pos.x - me.position.x));
        let plans = movement_plans(
            cfg.step_budget,
            cfg.phase_step,
            speed_to_target,
            self.last_movement_plans.get(&me.id),
        );
        let candidates = plans.len();
        let field = self.oracle.as_mut().unwrap().field_for_point(target_pos);

        let start = UnitState::of_unit(me);
        let mut best_score = f64::INFINITY;
        let mut best: Option<(Plan, Vec<UnitState>)> = None;
        for plan in plans {
            let states = sim.simulate(&start, &plan);
            let mut score =
                progress_score(field, target_pos, &states, sim.tick_speed, cfg.arrival_weight);
            score += danger_factor(world, me, &states, sim, cfg.safety_margin);
            if overlaps_enemy(&states, me, world)
                || overlaps_claimed_trajectory(&states, me, &self.claims)
            {
                score += cfg.collision_penalty;
            }
            if score < best_score {
                best_score = score;
                best = Some((plan, states));
            }
        }
        debug!(
            "unit {}: movement search over {candidates} candidates, best score {best_score:.3}",
            me.id
        );

        match best {
            Some((plan, states)) if best_score.is_finite() => {
                show_states(debug, &states, GREEN);
                let first = plan.get(0);
                self.claims.trajectories.push((me.id, states));
                self.last_movement_plans.insert(me.id, plan);
                first
            }
            _ => MoveCommand::idle(),
        }
    }

    /// Short-horizon dodge check: hold the chosen command and look at the
    /// danger; if it is positive, search the dodge candidates for strictly
    /// less danger and override only the first tick.
    pub fn try_dodge(
        &mut self,
        me: &Unit,
        base: MoveCommand,
        world: &World,
        debug: &mut dyn DebugSink,
    ) -> Option<MoveCommand> {
        let sim = self.sim.as_ref().unwrap();
        let cfg = &self.config;
        let start = UnitState::of_unit(me);
        let held = sim.simulate(&start, &Plan::of(cfg.dodge_ticks, base));
        let default_danger = danger_factor(world, me, &held, sim, cfg.safety_margin);
        if default_danger <= 0.0 {
            return None;
        }

        for bullet in &world.bullets {
            if bullet.player_id == me.player_id {
                continue;
            }
            let traj = sim.simulate_bullet(bullet, cfg.dodge_ticks);
            for p in &traj.positions {
                debug.square(*p, bullet.size, RED);
            }
            if let (Some(collision), Some(explosion)) = (traj.collision, bullet.explosion.as_ref())
            {
                debug.square(collision, explosion.radius * 2.0, TRANSPARENT_RED);
            }
        }

        let plans = dodge_plans(
            cfg.dodge_ticks,
            cfg.dodge_sweep_step,
            self.last_dodge_plans.get(&me.id),
        );
        let mut best_danger = f64::INFINITY;
        let mut best_plan: Option<Plan> = None;
        for plan in plans {
            let states = sim.simulate(&start, &plan);
            let danger = danger_factor(world, me, &states, sim, cfg.safety_margin);
            if danger < best_danger {
                best_danger = danger;
                best_plan = Some(plan);
            }
        }
        let best_plan = best_plan?;
        if best_danger >= default_danger {
            return None;
        }
        debug!(
            "unit {}: dodging, danger {default_danger:.3} -> {best_danger:.3}",
            me.id
        );
        let first = best_plan.get(0);
        self.last_dodge_plans.insert(me.id, best_plan);
        Some(first)
    }

    fn choose_target_loot<'a>(
        &self,
        me: &Unit,
        enemy: &Unit,
        world: &'a World,
    ) -> Option<&'a LootBox> {
        let needs_weapon = me.weapon.as_ref().map_or(true, |w| w.is_explosive());
        if needs_weapon {
            self.choose_weapon_loot(me, enemy, world)
        } else {
            self.choose_health_pack(me, enemy, world)
        }
    }

    /// Non-explosive ranged weapons only, preferring a type the team does
    /// not hold yet. An armed unit cedes pickups the enemy would reach
    /// first; an unarmed one cannot afford to.
    fn choose_weapon_loot<'a>(
        &self,
        me: &Unit,
        enemy: &Unit,
        world: &'a World,
    ) -> Option<&'a LootBox> {
        let team_types: Vec<WeaponType> = world
            .units
            .iter()
            .filter(|u| u.player_id == me.player_id)
            .filter_map(|u| u.weapon.as_ref().map(|w| w.typ))
            .collect();
        let cede_contested = me.weapon.is_some();
        world
            .loot_boxes
            .iter()
            .filter(|lb| !self.claims.loot_points.contains(&lb.position))
            .filter(|lb| {
                matches!(&lb.item, Item::Weapon { typ } if *typ != WeaponType::RocketLauncher)
            })
            .filter(|lb| {
                !cede_contested
                    || lb.position.dist(me.position) <= lb.position.dist(enemy.position)
            })
            .min_by(|a, b| {
                let key = |lb: &LootBox| {
                    let duplicate = match &lb.item {
                        Item::Weapon { typ } => team_types.contains(typ),
                        _ => false,
                    };
                    (duplicate, lb.position.dist(me.position))
                };
                let (da, ka) = key(a);
                let (db, kb) = key(b);
                da.cmp(&db).then(ka.total_cmp(&kb))
            })
    }

    fn choose_health_pack<'a>(
        &self,
        me: &Unit,
        enemy: &Unit,
        world: &'a World,
    ) -> Option<&'a LootBox> {
        let center_x = world.level.width() as f64 / 2.0;
        world
            .loot_boxes
            .iter()
            .filter(|lb| !self.claims.loot_points.contains(&lb.position))
            .filter(|lb| matches!(lb.item, Item::HealthPack { .. }))
            .min_by(|a, b| {
                let key = |lb: &LootBox| {
                    (
                        lb.position.dist(me.position) > lb.position.dist(enemy.position),
                        (lb.position.x - center_x).abs(),
                        lb.position.dist(me.position),
                    )
                };
                let ka = key(a);
                let kb = key(b);
                ka.0.cmp(&kb.0)
                    .then(ka.1.total_cmp(&kb.1))
                    .then(ka.2.total_cmp(&kb.2))
            })
    }

    fn should_go_to_health_pack(&self, me: &Unit, world: &World) -> bool {
        me.health < self.config.health_pack_threshold || self.leading_on_score(me, world)
    }

    fn leading_on_score(&self, me: &Unit, world: &World) -> bool {
        let mine = world.player(me.player_id).map_or(0, |p| p.score);
        let theirs = world.opponent_of(me.player_id).map_or(0, |p| p.score);
        mine > theirs
    }

    /// Topping up next to a pack we do not urgently need: stand beside it,
    /// offset away from the map center, so the pickup only happens when the
    /// health actually drops.
    fn health_pack_target_point(&self, me: &Unit, pack: &LootBox, world: &World) -> Vec2 {
        if me.health < self.config.health_pack_threshold {
            return pack.position;
        }
        if me.position.y as i32 != pack.position.y as i32 {
            return pack.position;
        }
        let center_x = world.level.width() as f64 / 2.0;
        let delta = pack.size.x / 2.0 + WIDTH / 2.0 + 0.1;
        if pack.position.x < center_x {
            pack.position + Vec2::new(delta, 0.0)
        } else {
            pack.position - Vec2::new(delta, 0.0)
        }
    }

    fn find_shooting_position(&self, me: &Unit, enemy: &Unit, world: &World) -> Option<Vec2> {
        let endgame =
            world.current_tick as f64 > world.properties.max_tick_count as f64 * self.config.endgame_fraction;
        if endgame && !self.leading_on_score(me, world) {
            return Some(enemy.position);
        }
        self.safe_shooting_position(me, enemy)
    }

    /// Stable point with a clear line of fire, not claimed by a teammate,
    /// maximizing distance with a heavy handicap for standing on the wrong
    /// side of the enemy.
    pub fn safe_shooting_position(&self, me: &Unit, enemy: &Unit) -> Option<Vec2> {
        let bullet_size = me
            .weapon
            .as_ref()
            .map_or(0.2, |w| w.params.bullet.size);
        let my_x = me.position.x;
        let enemy_x = enemy.position.x;
        let mut best = None;
        let mut max_dist = f64::NEG_INFINITY;
        for p in &self.stable_points {
            if self
                .claims
                .target_points
                .iter()
                .any(|(uid, t)| *uid != me.id && *t == *p)
            {
                continue;
            }
            let muzzle = Vec2::new(p.x, p.y + HEIGHT / 2.0);
            if !self.line_of_sight(muzzle, muzzle_point(enemy), bullet_size) {
                continue;
            }
            let mut dist = muzzle.dist(enemy.position);
            let same_side =
                (my_x - enemy_x).abs() < 1.0 || ((my_x < enemy_x) == (muzzle.x < enemy_x));
            if !same_side {
                dist -= self.config.wrong_side_penalty;
            }
            if dist > max_dist {
                max_dist = dist;
                best = Some(*p);
            }
        }
        best
    }

    fn should_shoot(&self, me: &Unit, enemy: &Unit, world: &World) -> bool {
        let Some(weapon) = &me.weapon else {
            return false;
        };
        if !weapon.is_ready() {
            return false;
        }
        if self.spread_hits_teammate(me, weapon, enemy, world) {
            return false;
        }
        if weapon.is_explosive() {
            !self.rocket_catches_self(me, weapon) && self.opponent_cannot_dodge(me, weapon, enemy, world)
        } else {
            self.line_of_sight(
                muzzle_point(me),
                muzzle_point(enemy),
                weapon.params.bullet.size,
            )
        }
    }

    fn line_of_sight(&self, a: Vec2, b: Vec2, bullet_size: f64) -> bool {
        let grid = self.sim.as_ref().unwrap().grid();
        let n = 1000;
        let delta = (b - a) * (1.0 / n as f64);
        for i in 0..n {
            let t = a + delta * i as f64;
            if bullet_collides_with_wall(grid, t, bullet_size) {
                return false;
            }
        }
        true
    }

    /// Walks both spread extremes of the shot and suppresses the trigger when
    /// either ray crosses a teammate before dying on a wall.
    fn spread_hits_teammate(&self, me: &Unit, weapon: &Weapon, enemy: &Unit, world: &World) -> bool {
        if world.teammates_of(me).next().is_none() {
            return false;
        }
        let sim = self.sim.as_ref().unwrap();
        let aim_angle = (enemy.position - me.position).angle();
        let step = sim.to_tick_speed(weapon.params.bullet.speed);
        for angle in [aim_angle + weapon.spread, aim_angle - weapon.spread] {
            let delta = Vec2::dir(angle) * step;
            let mut pos = muzzle_point(me);
            loop {
                pos = pos + delta;
                if bullet_collides_with_wall(sim.grid(), pos, weapon.params.bullet.size) {
                    break;
                }
                if world
                    .teammates_of(me)
                    .any(|mate| unit_rect_dist(mate.position, pos, weapon.params.bullet.size) == 0.0)
                {
                    return true;
                }
            }
        }
        false
    }

    /// A rocket fired along either spread extreme that bursts close enough to
    /// catch the shooter is never worth it.
    fn rocket_catches_self(&self, me: &Unit, weapon: &Weapon) -> bool {
        let Some(explosion) = weapon.params.explosion else {
            return false;
        };
        let angle = weapon.last_angle.unwrap_or(0.0);
        [angle + weapon.spread, angle - weapon.spread]
            .into_iter()
            .any(|a| {
                let sim = self.sim.as_ref().unwrap();
                let delta = Vec2::dir(a) * sim.to_tick_speed(weapon.params.bullet.speed);
                let mut pos = muzzle_point(me);
                loop {
                    pos = pos + delta;
                    if bullet_collides_with_wall(sim.grid(), pos, weapon.params.bullet.size) {
                        return unit_rect_dist(me.position, pos, explosion.radius * 2.0) <= 0.1;
                    }
                }
            })
    }

    /// Explosive fire gate: launch only when no candidate dodge plan of any
    /// opposing unit brings that unit's danger from this rocket to zero.
    /// This checks the opponent's own option pool, nothing adversarial.
    fn opponent_cannot_dodge(&self, me: &Unit, weapon: &Weapon, enemy: &Unit, world: &World) -> bool {
        let sim = self.sim.as_ref().unwrap();
        let cfg = &self.config;
        let aim = enemy.position - me.position;
        if aim.len() < 1e-9 {
            return false;
        }
        let dir = aim * (1.0 / aim.len());
        let rocket = Bullet {
            unit_id: me.id,
            player_id: me.player_id,
            position: muzzle_point(me),
            velocity: dir * weapon.params.bullet.speed,
            damage: weapon.params.bullet.damage,
            size: weapon.params.bullet.size,
            explosion: weapon.params.explosion,
        };
        for opponent in world.enemies_of(me.player_id) {
            let start = UnitState::of_unit(opponent);
            let plans = dodge_plans(cfg.dodge_ticks, cfg.dodge_sweep_step, None);
            let can_dodge = plans.iter().any(|plan| {
                let states = sim.simulate(&start, plan);
                bullet_danger(&rocket, &states, sim, cfg.safety_margin) == 0.0
            });
            if can_dodge {
                return false;
            }
        }
        true
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::new()
    }
}

pub fn nearest_enemy<'a>(me: &Unit, world: &'a World) -> Option<&'a Unit> {
    world
        .enemies_of(me.player_id)
        .min_by(|a, b| {
            me.position
                .sqr_dist(a.position)
                .total_cmp(&me.position.sqr_dist(b.position))
        })
}

pub fn muzzle_point(unit: &Unit) -> Vec2 {
    unit.position + Vec2::new(0.0, HEIGHT / 2.0)
}

/// Tile-aligned locations where a stationary unit stays motionless under a
/// no-op command, computed once per match by probing the simulator on a
/// half-tile lattice.
pub fn find_stable_points(sim: &Simulator) -> Vec<Vec2> {
    let grid = sim.grid();
    let mut points = Vec::new();
    let delta = 0.5;
    let mut x = 1.0 + WIDTH / 2.0;
    while x < grid.width() as f64 - 1.0 - WIDTH / 2.0 {
        let mut y = 1.0;
        while y < grid.height() as f64 - 1.0 - HEIGHT {
            if is_stable(sim, x, y) {
                points.push(Vec2::new(x, y));
            }
            y = round_if_close(y + delta);
        }
        x = round_if_close(x + delta);
    }
    points
}

pub fn is_stable(sim: &Simulator, x: f64, y: f64) -> bool {
    if unit_collides_with_wall(sim.grid(), x, y) {
        return false;
    }
    let start = UnitState::new(Vec2::new(x, y), 0.0, false, false);
    let states = sim.simulate(&start, &Plan::of(1, MoveCommand::idle()));
    states.iter().all(|s| s.position == start.position)
}

fn round_if_close(v: f64) -> f64 {
    if (v - v.round()).abs() < 1e-9 {
        v.round()
    } else {
        v
    }
}

fn progress_score(
    field: &DistanceField,
    target: Vec2,
    states: &[UnitState],
    tick_speed: f64,
    arrival_weight: f64,
) -> f64 {
    let mut best = f64::INFINITY;
    for (i, state) in states.iter().enumerate() {
        let dist = field.progress(target, state.position) + i as f64 * tick_speed * arrival_weight;
        best = best.min(dist);
    }
    best
}

fn unit_footprints_overlap(a: Vec2, b: Vec2) -> bool {
    Segment::new(a.x - WIDTH / 2.0, a.x + WIDTH / 2.0)
        .intersects(Segment::new(b.x - WIDTH / 2.0, b.x + WIDTH / 2.0))
        && Segment::new(a.y, a.y + HEIGHT).intersects(Segment::new(b.y, b.y + HEIGHT))
}

fn overlaps_enemy(states: &[UnitState], me: &Unit, world: &World) -> bool {
    states.iter().any(|s| {
        world
            .enemies_of(me.player_id)
            .any(|enemy| unit_footprints_overlap(s.position, enemy.position))
    })
}

fn overlaps_claimed_trajectory(states: &[UnitState], me: &Unit, claims: &TickClaims) -> bool {
    claims
        .trajectories
        .iter()
        .filter(|(unit_id, _)| *unit_id != me.id)
        .any(|(_, trajectory)| {
            states
                .iter()
                .zip(trajectory.iter())
                .any(|(a, b)| unit_footprints_overlap(a.position, b.position))
        })
}

fn show_states(debug: &mut dyn DebugSink, states: &[UnitState], color: u32) {
    for state in states {
        debug.square(state.position, 0.1, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileGrid;

    const ROOM: &str = "\
####################
#..................#
#..................#
#....^^^...........#
#..................#
#..................#
####################";

    fn room_sim() -> Simulator {
        let mut grid = TileGrid::from_ascii(ROOM).unwrap();
        grid.fix_borders();
        Simulator::real(grid)
    }

    #[test]
    fn stable_points_sit_on_floors_and_platforms() {
        let sim = room_sim();
        let points = find_stable_points(&sim);
        assert!(!points.is_empty());
        // Only whole-tile heights can be stable; fractional heights free-fall.
        assert!(points.iter().all(|p| p.y.fract() == 0.0));
        // The floor is stable...
        assert!(points.iter().any(|p| p.y == 1.0 && (p.x - 5.45).abs() < 1e-9));
        // ...and so is the platform top (platform row y = 3).
        assert!(points.iter().any(|p| p.y == 4.0));
    }

    #[test]
    fn every_stable_point_survives_a_noop_tick() {
        let sim = room_sim();
        for p in find_stable_points(&sim) {
            assert!(is_stable(&sim, p.x, p.y), "unstable point {p:?}");
        }
    }

    #[test]
    fn round_if_close_snaps_accumulated_halves() {
        let mut v = 1.0;
        for _ in 0..8 {
            v = round_if_close(v + 0.5);
        }
        assert_eq!(v, 5.0);
    }
}
