use crate::components::GridPos;

/// Fatal problems with the maze definition, detected before a round starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    #[error("maze layout has no rows")]
    Empty,

    #[error("maze row {row} is {actual} tiles wide, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("unknown maze character {ch:?} at column {col}, row {row}")]
    UnknownTile { ch: char, col: usize, row: usize },

    #[error("border cell ({col}, {row}) must be a wall")]
    OpenBorder { col: usize, row: usize },

    #[error("maze row {row} opens on one side only")]
    UnpairedTunnel { row: usize },

    #[error("{what} at ({}, {}) is not walkable", .pos.col, .pos.row)]
    BlockedSpawn { what: &'static str, pos: GridPos },
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("tile size must be at least 8 pixels, got {0}")]
    TileTooSmall(i32),

    #[error("{name} must be between 1 and the tile size ({tile_size}), got {value}")]
    BadSpeed {
        name: &'static str,
        value: i32,
        tile_size: i32,
    },

    #[error(
        "ghost speeds must satisfy frightened < chase < eaten, got {frightened} / {chase} / {eaten}"
    )]
    SpeedOrder {
        frightened: i32,
        chase: i32,
        eaten: i32,
    },

    #[error("{name} must be a positive number of seconds no larger than {max}, got {value}")]
    BadDuration {
        name: &'static str,
        value: f32,
        max: f32,
    },

    #[error("fps must be at least 1")]
    NoFrameRate,

    #[error("starting lives must be at least 1")]
    NoLives,

    #[error("collision margin must not be negative, got {0}")]
    NegativeMargin(i32),

    #[error("collision margin {margin} leaves a reach of {reach}px, agents could never touch")]
    NoCollisionReach { reach: i32, margin: i32 },
}

/// Anything that prevents a round from being built.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Maze(#[from] MazeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
