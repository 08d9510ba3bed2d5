use crate::components::{Direction, GridPos};
use crate::constants::{PELLET_SCORE, POWER_PELLET_SCORE};
use crate::level::Maze;
use crate::motion::{self, Body};
use crate::pellets::{Collectibles, PelletKind};

/// The player-controlled agent. Owns the score and remaining lives.
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    /// Latched input, applied at the next aligned tick where it is walkable.
    pub requested: Direction,
    pub score: u32,
    pub lives: u32,
    pub radius: i32,
    start: GridPos,
}

impl Player {
    pub fn new(maze: &Maze, start: GridPos, lives: u32, radius: i32) -> Self {
        Self {
            body: Body::at(maze, start),
            requested: Direction::None,
            score: 0,
            lives,
            radius,
            start,
        }
    }

    pub fn start(&self) -> GridPos {
        self.start
    }

    /// Latches a requested direction. `Direction::None` leaves the latch alone.
    pub fn request(&mut self, dir: Direction) {
        if dir.is_moving() {
            self.requested = dir;
        }
    }

    /// Back to the start cell, idle, with no pending request. Score and lives stay.
    pub fn reset(&mut self, maze: &Maze) {
        self.body = Body::at(maze, self.start);
        self.requested = Direction::None;
    }

    /// Moves one tick and eats whatever lies on the resulting cell.
    pub fn update(
        &mut self,
        maze: &Maze,
        speed: i32,
        collectibles: &mut Collectibles,
    ) -> Option<PelletKind> {
        let requested = self.requested;
        motion::advance(&mut self.body, maze, speed, false, |body| {
            steer(maze, body, requested)
        });
        self.consume(collectibles)
    }

    fn consume(&mut self, collectibles: &mut Collectibles) -> Option<PelletKind> {
        let eaten = collectibles.take(self.body.cell)?;
        self.score += match eaten {
            PelletKind::Normal => PELLET_SCORE,
            PelletKind::Power => POWER_PELLET_SCORE,
        };
        Some(eaten)
    }
}

fn steer(maze: &Maze, body: &Body, requested: Direction) -> Direction {
    let open = |dir: Direction| {
        dir.is_moving() && maze.is_walkable(maze.neighbor(body.cell, dir), false)
    };
    if open(requested) {
        requested
    } else if open(body.direction) {
        body.direction
    } else {
        Direction::None
    }
}
