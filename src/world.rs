use super::grid::TileGrid;
use super::vec2::Vec2;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WeaponType {
    Pistol,
    AssaultRifle,
    RocketLauncher,
}

#[derive(Debug, Copy, Clone)]
pub struct BulletParams {
    pub speed: f64,
    pub size: f64,
    pub damage: i32,
}

#[derive(Debug, Copy, Clone)]
pub struct ExplosionParams {
    pub radius: f64,
    pub damage: i32,
}

#[derive(Debug, Copy, Clone)]
pub struct WeaponParams {
    pub bullet: BulletParams,
    pub explosion: Option<ExplosionParams>,
    pub min_spread: f64,
    pub max_spread: f64,
    pub fire_rate: f64,
}

#[derive(Debug, Clone)]
pub struct Weapon {
    pub typ: WeaponType,
    pub params: WeaponParams,
    pub spread: f64,
    /// None when the weapon is ready to fire.
    pub fire_timer: Option<f64>,
    pub last_angle: Option<f64>,
}

impl Weapon {
    pub fn new(typ: WeaponType) -> Self {
        let params = match typ {
            WeaponType::Pistol => WeaponParams {
                bullet: BulletParams {
                    speed: 50.0,
                    size: 0.2,
                    damage: 20,
                },
                explosion: None,
                min_spread: 0.05,
                max_spread: 0.5,
                fire_rate: 0.4,
            },
            WeaponType::AssaultRifle => WeaponParams {
                bullet: BulletParams {
                    speed: 50.0,
                    size: 0.2,
                    damage: 5,
                },
                explosion: None,
                min_spread: 0.1,
                max_spread: 0.5,
                fire_rate: 0.1,
            },
            WeaponType::RocketLauncher => WeaponParams {
                bullet: BulletParams {
                    speed: 30.0,
                    size: 0.4,
                    damage: 30,
                },
                explosion: Some(ExplosionParams {
                    radius: 3.0,
                    damage: 50,
                }),
                min_spread: 0.1,
                max_spread: 0.5,
                fire_rate: 1.0,
            },
        };
        Weapon {
            typ,
            params,
            spread: params.min_spread,
            fire_timer: None,
            last_angle: None,
        }
    }

    pub fn is_explosive(&self) -> bool {
        self.params.explosion.is_some()
    }

    pub fn is_ready(&self) -> bool {
        self.fire_timer.unwrap_or(0.0) <= 0.0
    }
}

/// Server-side jump bookkeeping carried by each unit snapshot.
#[derive(Debug, Copy, Clone, Default)]
pub struct JumpState {
    pub can_jump: bool,
    pub speed: f64,
    pub max_time: f64,
    pub can_cancel: bool,
}

impl JumpState {
    pub fn standing() -> Self {
        JumpState {
            can_jump: true,
            speed: 10.0,
            max_time: 0.55,
            can_cancel: true,
        }
    }

    pub fn falling() -> Self {
        JumpState::default()
    }
}

#[derive(Debug, Clone)]
pub struct Unit {
    pub id: i32,
    pub player_id: i32,
    pub health: i32,
    pub position: Vec2,
    pub jump_state: JumpState,
    pub weapon: Option<Weapon>,
    pub mines: i32,
}

impl Unit {
    pub fn new(id: i32, player_id: i32, position: Vec2) -> Self {
        Unit {
            id,
            player_id,
            health: 100,
            position,
            jump_state: JumpState::standing(),
            weapon: None,
            mines: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Bullet {
    pub unit_id: i32,
    pub player_id: i32,
    pub position: Vec2,
    pub velocity: Vec2,
    pub damage: i32,
    pub size: f64,
    pub explosion: Option<ExplosionParams>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MineState {
    Preparing,
    Idle,
    Triggered,
    Exploded,
}

#[derive(Debug, Clone)]
pub struct Mine {
    pub position: Vec2,
    pub size: Vec2,
    pub state: MineState,
    /// Remaining seconds until detonation while triggered.
    pub timer: Option<f64>,
    pub explosion: Option<ExplosionParams>,
}

#[derive(Debug, Clone)]
pub enum Item {
    HealthPack { health: i32 },
    Weapon { typ: WeaponType },
    Mine,
}

#[derive(Debug, Clone)]
pub struct LootBox {
    pub position: Vec2,
    pub size: Vec2,
    pub item: Item,
}

#[derive(Debug, Copy, Clone)]
pub struct Player {
    pub id: i32,
    pub score: i32,
}

#[derive(Debug, Copy, Clone)]
pub struct Properties {
    pub ticks_per_second: f64,
    pub updates_per_tick: u32,
    pub max_tick_count: i32,
}

impl Default for Properties {
    fn default() -> Self {
        Properties {
            ticks_per_second: 60.0,
            updates_per_tick: 100,
            max_tick_count: 3600,
        }
    }
}

/// Authoritative per-tick snapshot handed to the strategy by the transport
/// layer. The level is identical every tick and gets frozen on first use.
#[derive(Debug, Clone)]
pub struct World {
    pub current_tick: i32,
    pub properties: Properties,
    pub level: TileGrid,
    pub players: Vec<Player>,
    pub units: Vec<Unit>,
    pub bullets: Vec<Bullet>,
    pub mines: Vec<Mine>,
    pub loot_boxes: Vec<LootBox>,
}

impl World {
    pub fn new(level: TileGrid) -> Self {
        World {
            current_tick: 0,
            properties: Properties::default(),
            level,
            players: Vec::new(),
            units: Vec::new(),
            bullets: Vec::new(),
            mines: Vec::new(),
            loot_boxes: Vec::new(),
        }
    }

    pub fn unit(&self, id: i32) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn enemies_of(&self, player_id: i32) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(move |u| u.player_id != player_id)
    }

    pub fn teammates_of(&self, unit: &Unit) -> impl Iterator<Item = &Unit> {
        let player_id = unit.player_id;
        let unit_id = unit.id;
        self.units
            .iter()
            .filter(move |u| u.player_id == player_id && u.id != unit_id)
    }

    pub fn player(&self, id: i32) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn opponent_of(&self, player_id: i32) -> Option<&Player> {
        self.players.iter().find(|p| p.id != player_id)
    }
}

/// Per-unit command returned to the server each tick.
#[derive(Debug, Clone, Default)]
pub struct UnitAction {
    pub velocity: f64,
    pub jump: bool,
    pub jump_down: bool,
    pub aim: Vec2,
    pub shoot: bool,
    pub swap_weapon: bool,
    pub plant_mine: bool,
}

impl UnitAction {
    pub fn noop() -> Self {
        UnitAction::default()
    }
}
