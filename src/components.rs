use serde::Serialize;

/// Heading of an agent. `None` is the idle direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    None,
}

impl Direction {
    /// The four moving directions in evaluation order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::None => (0, 0),
        }
    }

    pub fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::None => Direction::None,
        }
    }

    pub fn is_moving(self) -> bool {
        self != Direction::None
    }
}

/// Tile coordinate. Signed so that neighbours of edge cells can be expressed
/// and rejected by the maze instead of underflowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GridPos {
    pub col: i32,
    pub row: i32,
}

impl GridPos {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    pub fn step(self, dir: Direction) -> GridPos {
        let (dx, dy) = dir.delta();
        GridPos {
            col: self.col + dx,
            row: self.row + dy,
        }
    }

    pub fn distance_sq(self, other: GridPos) -> i32 {
        let dx = self.col - other.col;
        let dy = self.row - other.row;
        dx * dx + dy * dy
    }
}

/// Position in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelPos {
    pub x: i32,
    pub y: i32,
}

impl PixelPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dir: Direction, amount: i32) -> PixelPos {
        let (dx, dy) = dir.delta();
        PixelPos {
            x: self.x + dx * amount,
            y: self.y + dy * amount,
        }
    }

    pub fn distance(self, other: PixelPos) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        dx.hypot(dy)
    }
}
