use serde::Serialize;

use crate::components::{Direction, GridPos, PixelPos};
use crate::constants::MAZE_LAYOUT;
use crate::error::MazeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tile {
    Wall,
    Open,
    Gate,
}

/// Immutable tile grid plus the collectible markers it was drawn with.
#[derive(Debug, Clone)]
pub struct Maze {
    grid: Vec<Vec<Tile>>,
    width: usize,
    height: usize,
    tile_size: i32,
    pellet_cells: Vec<GridPos>,
    power_cells: Vec<GridPos>,
}

impl Maze {
    /// The built-in layout.
    pub fn standard(tile_size: i32) -> Result<Self, MazeError> {
        Self::parse(&MAZE_LAYOUT, tile_size)
    }

    /// Legend: `#` wall, `.` pellet, `o` power pellet, space open floor, `G` gate.
    pub fn parse<S: AsRef<str>>(rows: &[S], tile_size: i32) -> Result<Self, MazeError> {
        let width = rows
            .first()
            .map(|r| r.as_ref().chars().count())
            .ok_or(MazeError::Empty)?;
        if width == 0 {
            return Err(MazeError::Empty);
        }

        let mut grid = Vec::with_capacity(rows.len());
        let mut pellet_cells = Vec::new();
        let mut power_cells = Vec::new();
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let actual = row.chars().count();
            if actual != width {
                return Err(MazeError::RaggedRow {
                    row: y,
                    expected: width,
                    actual,
                });
            }
            let mut tiles = Vec::with_capacity(width);
            for (x, ch) in row.chars().enumerate() {
                let pos = GridPos::new(x as i32, y as i32);
                let tile = match ch {
                    '#' => Tile::Wall,
                    'G' => Tile::Gate,
                    ' ' => Tile::Open,
                    '.' => {
                        pellet_cells.push(pos);
                        Tile::Open
                    }
                    'o' => {
                        power_cells.push(pos);
                        Tile::Open
                    }
                    _ => return Err(MazeError::UnknownTile { ch, col: x, row: y }),
                };
                tiles.push(tile);
            }
            grid.push(tiles);
        }
        check_border(&grid)?;

        Ok(Self {
            height: grid.len(),
            grid,
            width,
            tile_size,
            pellet_cells,
            power_cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    /// Playfield width in pixels.
    pub fn pixel_width(&self) -> i32 {
        self.width as i32 * self.tile_size
    }

    pub fn rows(&self) -> &[Vec<Tile>] {
        &self.grid
    }

    pub fn pellet_cells(&self) -> &[GridPos] {
        &self.pellet_cells
    }

    pub fn power_cells(&self) -> &[GridPos] {
        &self.power_cells
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.col >= 0
            && pos.row >= 0
            && (pos.col as usize) < self.width
            && (pos.row as usize) < self.height
    }

    /// Off-grid cells read as walls.
    pub fn tile(&self, pos: GridPos) -> Tile {
        if self.in_bounds(pos) {
            self.grid[pos.row as usize][pos.col as usize]
        } else {
            Tile::Wall
        }
    }

    pub fn is_wall(&self, pos: GridPos) -> bool {
        self.tile(pos) == Tile::Wall
    }

    pub fn is_gate(&self, pos: GridPos) -> bool {
        self.tile(pos) == Tile::Gate
    }

    pub fn is_walkable(&self, pos: GridPos, allow_gate: bool) -> bool {
        match self.tile(pos) {
            Tile::Wall => false,
            Tile::Gate => allow_gate,
            Tile::Open => true,
        }
    }

    /// Adjacent cell in `dir`, wrapping columns so tunnel exits connect.
    pub fn neighbor(&self, pos: GridPos, dir: Direction) -> GridPos {
        let next = pos.step(dir);
        GridPos::new(next.col.rem_euclid(self.width as i32), next.row)
    }

    /// Number of walkable (non-gate) neighbours of a cell. Tunnel exits do not count.
    pub fn open_neighbors(&self, pos: GridPos) -> usize {
        Direction::ALL
            .iter()
            .filter(|&&dir| self.is_walkable(pos.step(dir), false))
            .count()
    }

    pub fn ensure_walkable(&self, pos: GridPos, what: &'static str) -> Result<(), MazeError> {
        if self.is_walkable(pos, false) {
            Ok(())
        } else {
            Err(MazeError::BlockedSpawn { what, pos })
        }
    }

    /// Pixel centre of a cell.
    pub fn grid_to_pixel(&self, pos: GridPos) -> PixelPos {
        let half = self.tile_size / 2;
        PixelPos::new(
            pos.col * self.tile_size + half,
            pos.row * self.tile_size + half,
        )
    }

    pub fn pixel_to_grid(&self, pos: PixelPos) -> GridPos {
        GridPos::new(
            pos.x.div_euclid(self.tile_size),
            pos.y.div_euclid(self.tile_size),
        )
    }

    /// True when the position sits exactly on a cell centre.
    pub fn is_aligned(&self, pos: PixelPos) -> bool {
        let half = self.tile_size / 2;
        (pos.x - half).rem_euclid(self.tile_size) == 0
            && (pos.y - half).rem_euclid(self.tile_size) == 0
    }

    /// Horizontal tunnel wrap. There is no vertical wrap.
    pub fn wrap(&self, pos: PixelPos) -> PixelPos {
        let width = self.pixel_width();
        if pos.x < 0 {
            PixelPos::new(width - 1, pos.y)
        } else if pos.x >= width {
            PixelPos::new(0, pos.y)
        } else {
            pos
        }
    }
}

/// Top and bottom rows are solid; a side opening needs a partner on the same row.
fn check_border(grid: &[Vec<Tile>]) -> Result<(), MazeError> {
    let last_row = grid.len() - 1;
    for &y in &[0, last_row] {
        if let Some(x) = grid[y].iter().position(|&t| t != Tile::Wall) {
            return Err(MazeError::OpenBorder { col: x, row: y });
        }
    }
    for (y, row) in grid.iter().enumerate() {
        let (Some(&left), Some(&right)) = (row.first(), row.last()) else {
            continue;
        };
        if (left == Tile::Wall) != (right == Tile::Wall) {
            return Err(MazeError::UnpairedTunnel { row: y });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{GHOST_HOME, GHOST_STARTS, PLAYER_START, TILE_SIZE};

    fn maze() -> Maze {
        Maze::standard(TILE_SIZE).unwrap()
    }

    #[test]
    fn standard_layout_dimensions() {
        let m = maze();
        assert_eq!(m.width(), 28);
        assert_eq!(m.height(), 27);
        assert_eq!(m.pixel_width(), 28 * TILE_SIZE);
        assert_eq!(m.power_cells().len(), 4);
        assert!(!m.pellet_cells().is_empty());
    }

    #[test]
    fn collectible_markers_are_disjoint() {
        let m = maze();
        for p in m.power_cells() {
            assert!(!m.pellet_cells().contains(p));
        }
    }

    #[test]
    fn off_grid_fails_closed() {
        let m = maze();
        for pos in [
            GridPos::new(-1, 0),
            GridPos::new(0, -1),
            GridPos::new(28, 5),
            GridPos::new(5, 27),
        ] {
            assert!(m.is_wall(pos));
            assert!(!m.is_gate(pos));
            assert!(!m.is_walkable(pos, true));
        }
    }

    #[test]
    fn gates_only_pass_when_allowed() {
        let m = maze();
        let gate = GridPos::new(13, 12);
        assert!(m.is_gate(gate));
        assert!(!m.is_walkable(gate, false));
        assert!(m.is_walkable(gate, true));
        assert!(!m.is_walkable(GridPos::new(0, 0), true));
    }

    #[test]
    fn spawn_points_are_walkable() {
        let m = maze();
        assert!(m.ensure_walkable(PLAYER_START, "player start").is_ok());
        assert!(m.ensure_walkable(GHOST_HOME, "ghost home").is_ok());
        for start in GHOST_STARTS {
            assert!(m.ensure_walkable(start, "ghost start").is_ok());
        }
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Maze::parse(&["###", "#.", "###"], TILE_SIZE).unwrap_err();
        assert_eq!(
            err,
            MazeError::RaggedRow {
                row: 1,
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn unknown_characters_are_rejected() {
        let err = Maze::parse(&["###", "#x#", "###"], TILE_SIZE).unwrap_err();
        assert_eq!(
            err,
            MazeError::UnknownTile {
                ch: 'x',
                col: 1,
                row: 1
            }
        );
        let empty: [&str; 0] = [];
        assert_eq!(Maze::parse(&empty, TILE_SIZE).unwrap_err(), MazeError::Empty);
    }

    #[test]
    fn pixel_conversion_round_trips_on_centres() {
        let m = maze();
        let cell = GridPos::new(6, 8);
        let px = m.grid_to_pixel(cell);
        assert_eq!(px, PixelPos::new(6 * 24 + 12, 8 * 24 + 12));
        assert!(m.is_aligned(px));
        assert_eq!(m.pixel_to_grid(px), cell);
        assert!(!m.is_aligned(px.offset(Direction::Right, 1)));
    }

    #[test]
    fn neighbors_wrap_through_tunnels() {
        let m = maze();
        let west_exit = GridPos::new(0, 13);
        assert_eq!(m.neighbor(west_exit, Direction::Left), GridPos::new(27, 13));
        assert!(m.is_walkable(m.neighbor(west_exit, Direction::Left), false));
        assert_eq!(m.neighbor(GridPos::new(4, 0), Direction::Up), GridPos::new(4, -1));
        assert_eq!(m.open_neighbors(GridPos::new(6, 5)), 4);
        assert_eq!(m.open_neighbors(GridPos::new(1, 2)), 2);
        // The wrapped cell beyond a tunnel exit is not an intersection arm.
        assert_eq!(m.open_neighbors(west_exit), 1);
    }

    #[test]
    fn border_must_be_closed() {
        let err = Maze::parse(&["## ##", "#   #", "#####"], TILE_SIZE).unwrap_err();
        assert_eq!(err, MazeError::OpenBorder { col: 2, row: 0 });
        let err = Maze::parse(&["#####", "#   #", "#G###"], TILE_SIZE).unwrap_err();
        assert_eq!(err, MazeError::OpenBorder { col: 1, row: 2 });
    }

    #[test]
    fn side_openings_come_in_pairs() {
        let err = Maze::parse(&["#####", "    #", "#####"], TILE_SIZE).unwrap_err();
        assert_eq!(err, MazeError::UnpairedTunnel { row: 1 });
        assert!(Maze::parse(&["#####", "     ", "#####"], TILE_SIZE).is_ok());
    }

    #[test]
    fn wrap_is_horizontal_only() {
        let m = maze();
        assert_eq!(m.wrap(PixelPos::new(-4, 324)), PixelPos::new(m.pixel_width() - 1, 324));
        assert_eq!(m.wrap(PixelPos::new(m.pixel_width(), 324)), PixelPos::new(0, 324));
        assert_eq!(m.wrap(PixelPos::new(30, -5)), PixelPos::new(30, -5));
    }
}
