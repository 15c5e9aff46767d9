use thiserror::Error;

use super::vec2::Vec2;

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tile {
    #[default]
    Empty,
    Wall,
    Platform,
    Ladder,
    JumpPad,
}

impl Tile {
    pub fn from_char(c: char) -> Result<Self, LevelError> {
        match c {
            '.' => Ok(Tile::Empty),
            '#' => Ok(Tile::Wall),
            '^' => Ok(Tile::Platform),
            'H' => Ok(Tile::Ladder),
            'T' => Ok(Tile::JumpPad),
            _ => Err(LevelError::UnknownTile(c)),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Wall => '#',
            Tile::Platform => '^',
            Tile::Ladder => 'H',
            Tile::JumpPad => 'T',
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("level has no tiles")]
    Empty,
    #[error("level rows have different lengths")]
    Ragged,
    #[error("unknown tile character {0:?}")]
    UnknownTile(char),
}

/// Static tile map, indexed as `(x, y)` with y pointing up. Frozen for the
/// match once the borders have been forced to wall.
#[derive(Clone, Debug)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    pub fn new(width: usize, height: usize) -> Self {
        TileGrid {
            width,
            height,
            tiles: vec![Tile::Empty; width * height],
        }
    }

    /// Parses the textual level form: one line per row, top row first.
    pub fn from_ascii(text: &str) -> Result<Self, LevelError> {
        let rows: Vec<&str> = text
            .lines()
            .map(|l| l.trim_end())
            .filter(|l| !l.is_empty())
            .collect();
        if rows.is_empty() {
            return Err(LevelError::Empty);
        }
        let width = rows[0].chars().count();
        let height = rows.len();
        if width == 0 {
            return Err(LevelError::Empty);
        }
        if rows.iter().any(|r| r.chars().count() != width) {
            return Err(LevelError::Ragged);
        }
        let mut grid = TileGrid::new(width, height);
        for (row_idx, row) in rows.iter().enumerate() {
            let y = height - 1 - row_idx;
            for (x, c) in row.chars().enumerate() {
                grid.set(x, y, Tile::from_char(c)?);
            }
        }
        Ok(grid)
    }

    pub fn to_ascii(&self) -> String {
        let mut s = String::with_capacity((self.width + 1) * self.height);
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                s.push(self.get(x, y).to_char());
            }
            s.push('\n');
        }
        s
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Tile {
        if x >= self.width || y >= self.height {
            return Tile::Wall;
        }
        self.tiles[x * self.height + y]
    }

    pub fn set(&mut self, x: usize, y: usize, tile: Tile) {
        assert!(x < self.width && y < self.height);
        self.tiles[x * self.height + y] = tile;
    }

    /// Tile under a continuous point. Anything outside the map reads as wall,
    /// matching the forced wall border.
    pub fn tile_at(&self, x: f64, y: f64) -> Tile {
        if x < 0.0 || y < 0.0 {
            return Tile::Wall;
        }
        self.get(x as usize, y as usize)
    }

    pub fn tile_at_point(&self, p: Vec2) -> Tile {
        self.tile_at(p.x, p.y)
    }

    pub fn inside(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height
    }

    /// Forces every border cell to wall; the simulator and the search rely on
    /// the map being sealed.
    pub fn fix_borders(&mut self) {
        for x in 0..self.width {
            self.set(x, 0, Tile::Wall);
            self.set(x, self.height - 1, Tile::Wall);
        }
        for y in 0..self.height {
            self.set(0, y, Tile::Wall);
            self.set(self.width - 1, y, Tile::Wall);
        }
    }
}
