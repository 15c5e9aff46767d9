use super::grid::{Tile, TileGrid};
use super::vec2::Vec2;
use super::world::{Bullet, Unit};

/// Server movement constants: horizontal speed in tiles per second and the
/// unit footprint. A unit's position is the bottom center of its footprint.
pub const SPEED: f64 = 10.0;
pub const WIDTH: f64 = 0.9;
pub const HEIGHT: f64 = 1.8;
const EPS: f64 = 1e-9;

const JUMP_DURATION: f64 = 0.55;
const JUMP_PAD_DURATION: f64 = 0.525;

/// One tick of movement input. `jump` and `jump_down` are mutually exclusive;
/// constructing both is a programming defect and panics.
#[derive(Debug, Copy, Clone)]
pub struct MoveCommand {
    pub speed: f64,
    pub jump: bool,
    pub jump_down: bool,
}

impl MoveCommand {
    pub fn new(speed: f64, jump: bool, jump_down: bool) -> Self {
        assert!(
            !(jump && jump_down),
            "jump and jump_down are mutually exclusive"
        );
        MoveCommand {
            speed,
            jump,
            jump_down,
        }
    }

    pub fn idle() -> Self {
        MoveCommand::new(0.0, false, false)
    }
}

impl PartialEq for MoveCommand {
    fn eq(&self, other: &Self) -> bool {
        self.speed.to_bits() == other.speed.to_bits()
            && self.jump == other.jump
            && self.jump_down == other.jump_down
    }
}

impl Eq for MoveCommand {}

impl std::hash::Hash for MoveCommand {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.speed.to_bits().hash(state);
        self.jump.hash(state);
        self.jump_down.hash(state);
    }
}

/// Kinematic state of one unit between microticks. Produced only by the
/// simulator; equality compares position and jump timer, not the derived
/// capability flags.
#[derive(Debug, Clone)]
pub struct UnitState {
    pub position: Vec2,
    pub remaining_jump_time: f64,
    pub can_jump: bool,
    pub can_cancel: bool,
}

impl UnitState {
    pub fn new(position: Vec2, remaining_jump_time: f64, can_jump: bool, can_cancel: bool) -> Self {
        UnitState {
            position,
            remaining_jump_time,
            can_jump,
            can_cancel,
        }
    }

    pub fn of_unit(unit: &Unit) -> Self {
        UnitState {
            position: unit.position,
            remaining_jump_time: unit.jump_state.max_time,
            can_jump: unit.jump_state.can_jump,
            can_cancel: unit.jump_state.can_cancel,
        }
    }
}

impl PartialEq for UnitState {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position && self.remaining_jump_time == other.remaining_jump_time
    }
}

/// Per-tick bullet positions plus the wall hit that ended the flight, if any.
#[derive(Debug, Clone)]
pub struct BulletTrajectory {
    pub positions: Vec<Vec2>,
    pub collision: Option<Vec2>,
}

impl BulletTrajectory {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Six-point probe of the unit footprint against one tile kind: the four
/// corners plus both mid-height edges, so a 1.8-tall unit cannot straddle a
/// tile unnoticed.
pub fn unit_collides_with(grid: &TileGrid, x: f64, y: f64, tile: Tile) -> bool {
    grid.tile_at(x + WIDTH / 2.0, y) == tile
        || grid.tile_at(x - WIDTH / 2.0, y) == tile
        || grid.tile_at(x + WIDTH / 2.0, y + HEIGHT) == tile
        || grid.tile_at(x - WIDTH / 2.0, y + HEIGHT) == tile
        || grid.tile_at(x - WIDTH / 2.0, y + HEIGHT / 2.0) == tile
        || grid.tile_at(x + WIDTH / 2.0, y + HEIGHT / 2.0) == tile
}

pub fn unit_collides_with_wall(grid: &TileGrid, x: f64, y: f64) -> bool {
    unit_collides_with(grid, x, y, Tile::Wall)
}

/// Four-corner probe of a square bullet footprint centered at `p`.
pub fn bullet_collides_with_wall(grid: &TileGrid, p: Vec2, size: f64) -> bool {
    grid.tile_at(p.x - size / 2.0, p.y - size / 2.0) == Tile::Wall
        || grid.tile_at(p.x - size / 2.0, p.y + size / 2.0) == Tile::Wall
        || grid.tile_at(p.x + size / 2.0, p.y - size / 2.0) == Tile::Wall
        || grid.tile_at(p.x + size / 2.0, p.y + size / 2.0) == Tile::Wall
}

/// Deterministic forward model of the server's per-microtick movement rules.
/// Owns a frozen copy of the level; every simulation call is a pure function
/// of (grid, start state, plan).
pub struct Simulator {
    grid: TileGrid,
    ticks_per_second: f64,
    microticks_per_tick: u32,
    microtick_duration: f64,
    microtick_speed: f64,
    pub tick_speed: f64,
    pub tick_duration: f64,
}

impl Simulator {
    pub fn new(grid: TileGrid, ticks_per_second: f64, microticks_per_tick: u32) -> Self {
        let microtick_duration = 1.0 / ticks_per_second / microticks_per_tick as f64;
        let microtick_speed = SPEED / ticks_per_second / microticks_per_tick as f64;
        Simulator {
            grid,
            ticks_per_second,
            microticks_per_tick,
            microtick_duration,
            microtick_speed,
            tick_speed: microtick_speed * microticks_per_tick as f64,
            tick_duration: 1.0 / ticks_per_second,
        }
    }

    /// Server resolution: 100 microticks per tick at 60 ticks per second.
    pub fn real(grid: TileGrid) -> Self {
        Simulator::new(grid, 60.0, 100)
    }

    /// Same microtick length as `real`, but every tick exposes a single
    /// microtick, which lets tests step the integrator one microtick at a
    /// time.
    pub fn for_testing(grid: TileGrid) -> Self {
        Simulator::new(grid, 6000.0, 1)
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn clamp_speed(&self, speed: f64) -> f64 {
        speed.clamp(-SPEED, SPEED)
    }

    pub fn to_tick_speed(&self, speed: f64) -> f64 {
        speed / self.ticks_per_second
    }

    pub fn from_tick_speed(&self, speed: f64) -> f64 {
        speed * self.ticks_per_second
    }

    /// Advances `start` through the whole plan, one output state per tick.
    pub fn simulate(&self, start: &UnitState, plan: &super::plans::Plan) -> Vec<UnitState> {
        let mut cur = start.clone();
        let mut result = Vec::with_capacity(plan.len());
        for mv in plan.moves() {
            for _ in 0..self.microticks_per_tick {
                cur = self.microtick(&cur, mv);
            }
            result.push(cur.clone());
        }
        result
    }

    fn microtick(&self, cur: &UnitState, mv: &MoveCommand) -> UnitState {
        let mut new_x = cur.position.x;
        let mut new_y = cur.position.y;
        let mut remaining_jump_time = cur.remaining_jump_time;
        let mut can_jump = cur.can_jump;
        let mut can_cancel = cur.can_cancel;

        // Horizontal step, clamped against walls without ever moving past the
        // previous position.
        new_x += mv.speed * self.microtick_duration;
        if unit_collides_with_wall(&self.grid, new_x, new_y) {
            if mv.speed > 0.0 {
                new_x = cur
                    .position
                    .x
                    .max((new_x + WIDTH / 2.0).floor() - WIDTH / 2.0 - EPS);
            } else {
                new_x = cur
                    .position
                    .x
                    .min((new_x - WIDTH / 2.0).floor() + 1.0 + WIDTH / 2.0 + EPS);
            }
        }

        let was_standing = self.is_standing(new_x, new_y);
        let can_move_down = !self.standing_on_wall(new_x, new_y);

        // Vertical resolution. A jump pad launch (can_jump without cancel)
        // overrides the unit's own input and ascends at double speed.
        if can_jump && !can_cancel {
            new_y += self.microtick_speed * 2.0;
            remaining_jump_time -= self.microtick_duration;
        } else if can_move_down && mv.jump_down {
            new_y -= self.microtick_speed;
            remaining_jump_time = 0.0;
        } else if can_jump && mv.jump {
            new_y += self.microtick_speed;
            remaining_jump_time -= self.microtick_duration;
        } else if !was_standing {
            new_y -= self.microtick_speed;
            remaining_jump_time = 0.0;
            can_jump = false;
            can_cancel = false;
        }

        let will_be_standing = self.is_standing(new_x, new_y);

        if unit_collides_with(&self.grid, new_x, new_y, Tile::JumpPad) {
            remaining_jump_time = JUMP_PAD_DURATION;
            can_jump = true;
            can_cancel = false;
        } else if (was_standing && will_be_standing) || self.on_ladder(new_x, new_y) {
            can_jump = true;
            can_cancel = true;
            remaining_jump_time = JUMP_DURATION;
        } else if remaining_jump_time <= 0.0 {
            can_jump = false;
            can_cancel = false;
            remaining_jump_time = 0.0;
        }

        // Residual vertical penetration snaps to the tile boundary in the
        // direction of travel.
        if unit_collides_with_wall(&self.grid, new_x, new_y) {
            if new_y < cur.position.y {
                new_y = new_y.floor() + 1.0;
            } else {
                new_y = (new_y + HEIGHT).floor() - HEIGHT;
            }
        }

        UnitState::new(
            Vec2::new(new_x, new_y),
            remaining_jump_time,
            can_jump,
            can_cancel,
        )
    }

    fn on_ladder(&self, x: f64, y: f64) -> bool {
        self.grid.tile_at(x, y) == Tile::Ladder
            || self.grid.tile_at(x, y + HEIGHT / 2.0) == Tile::Ladder
    }

    fn is_standing(&self, x: f64, y: f64) -> bool {
        self.point_is_standing(x - WIDTH / 2.0, y, false)
            || self.point_is_standing(x + WIDTH / 2.0, y, false)
            || self.point_is_standing(x, y, true)
    }

    /// Jump-down falls through platforms and ladders, but never through a
    /// wall the unit is fully standing on.
    fn standing_on_wall(&self, x: f64, y: f64) -> bool {
        self.point_is_standing_on_wall(x - WIDTH / 2.0, y)
            && self.point_is_standing_on_wall(x + WIDTH / 2.0, y)
    }

    fn point_is_standing_on_wall(&self, px: f64, py: f64) -> bool {
        self.grid.tile_at(px, py - 1.0) == Tile::Wall && (py - py.floor()).abs() < 1e-9
    }

    /// The tolerance absorbs the float error accumulated by microtick steps
    /// around integer tile boundaries.
    fn point_is_standing(&self, px: f64, py: f64, allow_ladder: bool) -> bool {
        let below = self.grid.tile_at(px, py - 1.0);
        (below == Tile::Platform
            || below == Tile::Wall
            || (allow_ladder && below == Tile::Ladder))
            && (py - py.floor()).abs() < 1e-8
    }

    /// Constant-velocity flight, stopping the first tick the bullet footprint
    /// touches a wall and recording that point.
    pub fn simulate_bullet(&self, bullet: &Bullet, ticks: usize) -> BulletTrajectory {
        let step = Vec2::new(
            self.to_tick_speed(bullet.velocity.x),
            self.to_tick_speed(bullet.velocity.y),
        );
        let mut positions = Vec::with_capacity(ticks);
        let mut pos = bullet.position;
        let mut collision = None;
        for _ in 0..ticks {
            pos = pos + step;
            positions.push(pos);
            if bullet_collides_with_wall(&self.grid, pos, bullet.size) {
                collision = Some(pos);
                break;
            }
        }
        BulletTrajectory {
            positions,
            collision,
        }
    }
}
