extern crate platbot;

use platbot::*;

use flo_canvas::*;
use flo_draw::*;

use futures::executor;
use futures::prelude::*;

use rand::Rng;

const LEVEL: &str = "\
########################################
#......................................#
#......................................#
#..........H...................H.......#
#..........H...................H.......#
#....^^^^^^H^^^....^^^^....^^^^H^......#
#..........H...................H.......#
#..........H...................H.......#
#...###....H.....T.....T.......H..###..#
#......................................#
#......................................#
#.........^^^^^..........^^^^^.........#
#......................................#
#......................................#
########################################";

fn random_world(rng: &mut impl Rng) -> World {
    let mut grid = TileGrid::from_ascii(LEVEL).unwrap();
    grid.fix_borders();
    let sim = Simulator::real(grid.clone());
    let spots = find_stable_points(&sim);

    let mut world = World::new(grid);
    world.players = vec![Player { id: 0, score: 0 }, Player { id: 1, score: 0 }];

    for (i, player_id) in [(0, 0), (1, 0), (2, 1), (3, 1)] {
        let spot = spots[rng.gen_range(0..spots.len())];
        let mut unit = Unit::new(i + 1, player_id, spot);
        unit.health = rng.gen_range(40..=100);
        unit.weapon = match rng.gen_range(0..3) {
            0 => Some(Weapon::new(WeaponType::Pistol)),
            1 => Some(Weapon::new(WeaponType::AssaultRifle)),
            _ => None,
        };
        world.units.push(unit);
    }

    for _ in 0..rng.gen_range(1..4) {
        let shooter = &world.units[rng.gen_range(2..4)];
        let target = &world.units[rng.gen_range(0..2)];
        let from = muzzle_point(shooter);
        let aim = muzzle_point(target) - from;
        let dir = aim * (1.0 / aim.len().max(1e-9));
        world.bullets.push(Bullet {
            unit_id: shooter.id,
            player_id: shooter.player_id,
            position: from,
            velocity: dir * 50.0,
            damage: 5,
            size: 0.2,
            explosion: None,
        });
    }

    for typ in [WeaponType::Pistol, WeaponType::RocketLauncher] {
        let spot = spots[rng.gen_range(0..spots.len())];
        world.loot_boxes.push(LootBox {
            position: spot,
            size: Vec2::new(0.5, 0.5),
            item: Item::Weapon { typ },
        });
    }
    let spot = spots[rng.gen_range(0..spots.len())];
    world.loot_boxes.push(LootBox {
        position: spot,
        size: Vec2::new(0.5, 0.5),
        item: Item::HealthPack { health: 50 },
    });

    world
}

fn color_of(raw: u32, default_alpha: f32) -> Color {
    let a = (raw >> 24) as f32 / 255.0;
    Color::Rgba(
        ((raw >> 16) & 0xff) as f32 / 255.0,
        ((raw >> 8) & 0xff) as f32 / 255.0,
        (raw & 0xff) as f32 / 255.0,
        if a == 0.0 { default_alpha } else { a },
    )
}

struct App {
    world: World,
    strategy: Strategy,
    actions: Vec<(i32, UnitAction)>,
    sink: RecordingDebug,
    canvas: Canvas,
    scale: f32,

    draw_stable_points: bool,
    draw_search: bool,
}

impl App {
    fn new(canvas: Canvas) -> Self {
        let mut app = App {
            world: random_world(&mut rand::thread_rng()),
            strategy: Strategy::new(),
            actions: Vec::new(),
            sink: RecordingDebug::new(),
            canvas,
            scale: 1.0,
            draw_stable_points: false,
            draw_search: true,
        };
        app.scale = 1000.0 / app.world.level.width() as f32;
        app.decide();
        app
    }

    fn decide(&mut self) {
        self.sink.clear();
        self.actions.clear();
        let my_units: Vec<i32> = self
            .world
            .units
            .iter()
            .filter(|u| u.player_id == 0)
            .map(|u| u.id)
            .collect();
        for id in my_units {
            let action = self.strategy.act(id, &self.world, &mut self.sink);
            eprintln!(
                "unit {id}: velocity {:.1} jump {} jump_down {} shoot {} swap {}",
                action.velocity, action.jump, action.jump_down, action.shoot, action.swap_weapon
            );
            self.actions.push((id, action));
        }
    }

    fn regenerate(&mut self) {
        self.world = random_world(&mut rand::thread_rng());
        self.strategy = Strategy::new();
        self.decide();
        self.redraw();
    }

    fn redraw(&mut self) {
        let scale = self.scale;
        let world = &self.world;
        let sink = &self.sink;
        let stable_points = &self.strategy.stable_points;
        let draw_stable_points = self.draw_stable_points;
        let draw_search = self.draw_search;

        self.canvas.draw(|gc| {
            gc.clear_all_layers();
            gc.canvas_height(1000.0);
            let h = world.level.height() as f32 * scale;
            gc.center_region(0.0, 0.0, 1000.0, h);

            for x in 0..world.level.width() {
                for y in 0..world.level.height() {
                    let tile = world.level.get(x, y);
                    if tile == Tile::Empty {
                        continue;
                    }
                    let color = match tile {
                        Tile::Wall => Color::Rgba(0.25, 0.25, 0.25, 1.0),
                        Tile::Platform => Color::Rgba(0.55, 0.4, 0.2, 1.0),
                        Tile::Ladder => Color::Rgba(0.75, 0.65, 0.2, 1.0),
                        Tile::JumpPad => Color::Rgba(0.7, 0.2, 0.7, 1.0),
                        Tile::Empty => unreachable!(),
                    };
                    gc.new_path();
                    gc.rect(
                        x as f32 * scale,
                        y as f32 * scale,
                        (x + 1) as f32 * scale,
                        (y + 1) as f32 * scale,
                    );
                    gc.fill_color(color);
                    gc.fill();
                }
            }

            if draw_stable_points {
                for p in stable_points {
                    gc.new_path();
                    let (x, y) = (p.x as f32 * scale, p.y as f32 * scale);
                    gc.circle(x, y, 2.0);
                    gc.fill_color(Color::Rgba(0.0, 0.6, 0.0, 0.6));
                    gc.fill();
                }
            }

            for lb in &world.loot_boxes {
                let (x, y) = (lb.position.x as f32 * scale, lb.position.y as f32 * scale);
                let color = match lb.item {
                    Item::HealthPack { .. } => Color::Rgba(0.1, 0.9, 0.1, 1.0),
                    Item::Weapon { .. } => Color::Rgba(0.9, 0.9, 0.1, 1.0),
                    Item::Mine => Color::Rgba(0.9, 0.1, 0.1, 1.0),
                };
                gc.new_path();
                gc.rect(x - 4.0, y, x + 4.0, y + 8.0);
                gc.fill_color(color);
                gc.fill();
            }

            for unit in &world.units {
                let (x, y) = (unit.position.x as f32 * scale, unit.position.y as f32 * scale);
                let w = 0.45 * scale;
                let h = 1.8 * scale;
                gc.new_path();
                gc.rect(x - w, y, x + w, y + h);
                gc.fill_color(if unit.player_id == 0 {
                    Color::Rgba(0.2, 0.4, 0.9, 0.9)
                } else {
                    Color::Rgba(0.9, 0.3, 0.2, 0.9)
                });
                gc.fill();
            }

            for bullet in &world.bullets {
                let (x, y) = (bullet.position.x as f32 * scale, bullet.position.y as f32 * scale);
                gc.new_path();
                gc.circle(x, y, 3.0);
                gc.fill_color(Color::Rgba(1.0, 1.0, 1.0, 1.0));
                gc.fill();
            }

            if draw_search {
                for shape in &sink.shapes {
                    match *shape {
                        Shape::Line { a, b, color } => {
                            gc.new_path();
                            gc.move_to(a.x as f32 * scale, a.y as f32 * scale);
                            gc.line_to(b.x as f32 * scale, b.y as f32 * scale);
                            gc.line_width(1.5);
                            gc.stroke_color(color_of(color, 0.8));
                            gc.stroke();
                        }
                        Shape::Square { center, size, color } => {
                            let r = (size * 0.5).max(0.08) as f32 * scale;
                            let (x, y) = (center.x as f32 * scale, center.y as f32 * scale);
                            gc.new_path();
                            gc.rect(x - r, y - r, x + r, y + r);
                            gc.fill_color(color_of(color, 0.5));
                            gc.fill();
                        }
                        Shape::Rect {
                            bottom_left,
                            top_right,
                            color,
                        } => {
                            gc.new_path();
                            gc.rect(
                                bottom_left.x as f32 * scale,
                                bottom_left.y as f32 * scale,
                                top_right.x as f32 * scale,
                                top_right.y as f32 * scale,
                            );
                            gc.fill_color(color_of(color, 0.3));
                            gc.fill();
                        }
                    }
                }
            }
        });
    }
}

fn main() {
    with_2d_graphics(|| {
        executor::block_on(async {
            let (canvas, mut events) = create_canvas_window_with_events("platbot sandbox");

            let mut app = App::new(canvas);

            app.redraw();

            while let Some(event) = events.next().await {
                match event {
                    DrawEvent::KeyDown(_, Some(Key::KeySpace)) => {
                        app.regenerate();
                    }
                    DrawEvent::KeyDown(_, Some(Key::KeyEscape)) => {
                        std::process::exit(0);
                    }
                    DrawEvent::KeyDown(_, Some(Key::Key1)) => {
                        app.draw_stable_points = !app.draw_stable_points;
                        app.redraw();
                    }
                    DrawEvent::KeyDown(_, Some(Key::Key2)) => {
                        app.draw_search = !app.draw_search;
                        app.redraw();
                    }
                    _ => {}
                }
            }
        });
    });
}
