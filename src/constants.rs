use crate::components::GridPos;

pub const TILE_SIZE: i32 = 24;
pub const DEFAULT_FPS: u64 = 60;

/// Pixels per tick.
pub const PLAYER_SPEED: i32 = 4;
pub const GHOST_SPEED: i32 = 3;
pub const FRIGHTENED_SPEED: i32 = 2;
pub const EATEN_SPEED: i32 = GHOST_SPEED + 1;

pub const POWER_DURATION_SECS: f32 = 7.0;
pub const GHOST_RESPAWN_SECS: f32 = 3.0;
pub const STARTING_LIVES: u32 = 3;
/// Subtracted from the radius sum before the distance test.
pub const COLLISION_MARGIN: i32 = 4;

pub const PELLET_SCORE: u32 = 10;
pub const POWER_PELLET_SCORE: u32 = 50;
pub const GHOST_SCORE: u32 = 200;

/// Power pellets blink at this rate (phases per second).
pub const BLINK_HZ: f32 = 2.0;

pub const PLAYER_START: GridPos = GridPos::new(13, 21);
pub const GHOST_HOME: GridPos = GridPos::new(13, 11);
pub const GHOST_STARTS: [GridPos; 4] = [
    GridPos::new(10, 11),
    GridPos::new(12, 11),
    GridPos::new(15, 11),
    GridPos::new(17, 11),
];

pub const MAZE_LAYOUT: [&str; 27] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "     #.##### ## #####.#     ",
    "     #.##          ##.#     ",
    "######.## ###GG### ##.######",
    "          # G  G #          ",
    "######.## ######## ##.######",
    "     #.##          ##.#     ",
    "     #.##### ## #####.#     ",
    "######.##### ## #####.######",
    "#......##....##....##......#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#..........................#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#............##............#",
    "############################",
];
