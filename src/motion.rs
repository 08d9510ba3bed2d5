//! Grid-aligned movement shared by the player and the ghosts.
//!
//! An agent only changes direction while sitting exactly on a cell centre.
//! Between centres it keeps its committed direction, and a step never carries
//! it past the next centre, so every agent lands on each centre it crosses.

use crate::components::{Direction, GridPos, PixelPos};
use crate::level::Maze;

/// Position of a moving agent in both pixel and grid space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Body {
    pub pixel: PixelPos,
    pub cell: GridPos,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    /// The candidate cell was not walkable; the body was snapped to its cell centre.
    Blocked,
    Idle,
}

impl Body {
    pub fn at(maze: &Maze, cell: GridPos) -> Self {
        Self {
            pixel: maze.grid_to_pixel(cell),
            cell,
            direction: Direction::None,
        }
    }

    /// Teleports to the centre of `cell`, keeping the direction.
    pub fn place(&mut self, maze: &Maze, cell: GridPos) {
        self.pixel = maze.grid_to_pixel(cell);
        self.cell = cell;
    }

    pub fn is_aligned(&self, maze: &Maze) -> bool {
        maze.is_aligned(self.pixel)
    }
}

/// Advances `body` by one tick.
///
/// `choose` runs only on aligned ticks and returns the direction to commit.
pub fn advance<F>(
    body: &mut Body,
    maze: &Maze,
    speed: i32,
    allow_gate: bool,
    choose: F,
) -> StepOutcome
where
    F: FnOnce(&Body) -> Direction,
{
    if body.is_aligned(maze) {
        body.cell = maze.pixel_to_grid(body.pixel);
        body.direction = choose(body);
    }
    if !body.direction.is_moving() {
        return StepOutcome::Idle;
    }

    let candidate = maze.wrap(step_to_centre(maze, body.pixel, body.direction, speed));
    let next_cell = maze.pixel_to_grid(candidate);
    if maze.is_walkable(next_cell, allow_gate) {
        body.pixel = candidate;
        body.cell = next_cell;
        StepOutcome::Moved
    } else {
        body.pixel = maze.grid_to_pixel(body.cell);
        StepOutcome::Blocked
    }
}

/// Moves `speed` pixels along `dir`, stopping early on the first cell centre ahead.
fn step_to_centre(maze: &Maze, pixel: PixelPos, dir: Direction, speed: i32) -> PixelPos {
    let tile = maze.tile_size();
    let half = tile / 2;
    let next_above = |v: i32| ((v - half).div_euclid(tile) + 1) * tile + half;
    let next_below = |v: i32| (v - half - 1).div_euclid(tile) * tile + half;

    let target = pixel.offset(dir, speed);
    match dir {
        Direction::Right => PixelPos::new(target.x.min(next_above(pixel.x)), pixel.y),
        Direction::Left => PixelPos::new(target.x.max(next_below(pixel.x)), pixel.y),
        Direction::Down => PixelPos::new(pixel.x, target.y.min(next_above(pixel.y))),
        Direction::Up => PixelPos::new(pixel.x, target.y.max(next_below(pixel.y))),
        Direction::None => pixel,
    }
}
