use std::collections::{HashMap, VecDeque};

use super::grid::{Tile, TileGrid};
use super::vec2::Vec2;

/// Sentinel hop distance for cells the BFS never reached.
pub const UNREACHED: i32 = 1_000_000_000;

/// Integer hop distances from one target cell, produced by a single BFS over
/// the grid. An edge exists between axis-adjacent non-wall cells unless the
/// destination is suspended (wall directly above and below) — a conservative
/// reachability prune, not a completeness guarantee.
#[derive(Clone, Debug)]
pub struct DistanceField {
    width: usize,
    height: usize,
    target: (usize, usize),
    dist: Vec<i32>,
}

impl DistanceField {
    pub fn build(grid: &TileGrid, target: (usize, usize)) -> Self {
        let width = grid.width();
        let height = grid.height();
        let mut field = DistanceField {
            width,
            height,
            target,
            dist: vec![UNREACHED; width * height],
        };

        let mut queue = VecDeque::new();
        field.dist[target.0 * height + target.1] = 0;
        queue.push_back(target);
        while let Some((cx, cy)) = queue.pop_front() {
            let cur = field.get(cx, cy);
            for (dx, dy) in [(1i32, 0i32), (-1, 0), (0, 1), (0, -1)] {
                let to_x = cx as i32 + dx;
                let to_y = cy as i32 + dy;
                if !grid.inside(to_x, to_y) {
                    continue;
                }
                let (to_x, to_y) = (to_x as usize, to_y as usize);
                if grid.get(to_x, to_y) == Tile::Wall {
                    continue;
                }
                if grid.get(to_x, to_y + 1) == Tile::Wall
                    && to_y > 0
                    && grid.get(to_x, to_y - 1) == Tile::Wall
                {
                    continue;
                }
                if field.get(to_x, to_y) != UNREACHED {
                    continue;
                }
                field.dist[to_x * height + to_y] = cur + 1;
                queue.push_back((to_x, to_y));
            }
        }
        field
    }

    pub fn get(&self, x: usize, y: usize) -> i32 {
        if x >= self.width || y >= self.height {
            return UNREACHED;
        }
        self.dist[x * self.height + y]
    }

    pub fn target(&self) -> (usize, usize) {
        self.target
    }

    /// Continuous progress distance of a position toward `target_point`. In
    /// the target cell this is the Chebyshev distance to the exact point;
    /// elsewhere, the best of the four axis neighbors plus the in-cell offset
    /// toward that neighbor plus one hop.
    pub fn progress(&self, target_point: Vec2, pos: Vec2) -> f64 {
        let cx = pos.x as usize;
        let cy = pos.y as usize;
        if self.get(cx, cy) == 0 {
            return (pos.x - target_point.x)
                .abs()
                .max((pos.y - target_point.y).abs());
        }
        let mut min_dist = f64::INFINITY;
        for (dx, dy) in [(1i32, 0i32), (-1, 0), (0, 1), (0, -1)] {
            let to_x = cx as i32 + dx;
            let to_y = cy as i32 + dy;
            if to_x < 0 || to_y < 0 {
                continue;
            }
            let to_neighbour = match (dx, dy) {
                (1, 0) => to_x as f64 - pos.x,
                (-1, 0) => pos.x - cx as f64,
                (0, 1) => to_y as f64 - pos.y,
                (0, -1) => pos.y - cy as f64,
                _ => unreachable!(),
            };
            let dist = self.get(to_x as usize, to_y as usize) as f64 + to_neighbour + 1.0;
            min_dist = min_dist.min(dist);
        }
        min_dist
    }
}

/// Owns the frozen grid and builds each per-cell distance field exactly once;
/// fields are immutable after construction and shared across ticks.
pub struct DistanceOracle {
    grid: TileGrid,
    fields: HashMap<(usize, usize), DistanceField>,
}

impl DistanceOracle {
    pub fn new(grid: TileGrid) -> Self {
        DistanceOracle {
            grid,
            fields: HashMap::new(),
        }
    }

    pub fn field(&mut self, target: (usize, usize)) -> &DistanceField {
        let grid = &self.grid;
        self.fields
            .entry(target)
            .or_insert_with(|| DistanceField::build(grid, target))
    }

    pub fn field_for_point(&mut self, target_point: Vec2) -> &DistanceField {
        self.field((target_point.x as usize, target_point.y as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(level: &str) -> TileGrid {
        let mut grid = TileGrid::from_ascii(level).unwrap();
        grid.fix_borders();
        grid
    }

    #[test]
    fn hop_distances_follow_the_grid() {
        let g = grid(
            "\
########
#......#
#......#
########",
        );
        let field = DistanceField::build(&g, (1, 1));
        assert_eq!(field.get(1, 1), 0);
        assert_eq!(field.get(2, 1), 1);
        assert_eq!(field.get(6, 2), 6);
        assert_eq!(field.get(0, 0), UNREACHED);
    }

    #[test]
    fn walls_force_a_detour() {
        let g = grid(
            "\
#######
#.....#
#.....#
#..#..#
#######",
        );
        let field = DistanceField::build(&g, (1, 1));
        // The wall at (3, 1) blocks the floor row, and the cell directly
        // above it is the only way around.
        assert_eq!(field.get(5, 1), 6);
    }

    #[test]
    fn suspended_cells_are_pruned() {
        let g = grid(
            "\
#######
#.###.#
#.....#
#.###.#
#######",
        );
        // (2..4, 2) sit between wall above and below; the corridor through
        // them is closed even though the cells themselves are empty.
        let field = DistanceField::build(&g, (1, 2));
        assert_eq!(field.get(2, 2), UNREACHED);
        assert_eq!(field.get(5, 2), UNREACHED);
    }

    #[test]
    fn progress_is_chebyshev_inside_the_target_cell() {
        let g = grid(
            "\
########
#......#
#......#
########",
        );
        let field = DistanceField::build(&g, (3, 1));
        let target = Vec2::new(3.5, 1.0);
        assert!((field.progress(target, Vec2::new(3.1, 1.0)) - 0.4).abs() < 1e-9);
        // One cell to the left: hop distance of the right neighbour (0) plus
        // offset to it plus one.
        let p = Vec2::new(2.5, 1.0);
        assert!((field.progress(target, p) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn progress_decreases_along_an_approach() {
        let g = grid(
            "\
########
#......#
#......#
########",
        );
        let field = DistanceField::build(&g, (6, 1));
        let target = Vec2::new(6.5, 1.0);
        let mut last = f64::INFINITY;
        for step in 0..20 {
            let p = Vec2::new(1.5 + step as f64 * 0.25, 1.0);
            let d = field.progress(target, p);
            assert!(d <= last, "progress must not increase while approaching");
            last = d;
        }
    }
}
