use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::components::{Direction, GridPos};
use crate::config::GameConfig;
use crate::level::Maze;
use crate::motion::{self, Body};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum GhostKind {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostKind {
    /// Update and collision order.
    pub const ALL: [GhostKind; 4] = [
        GhostKind::Blinky,
        GhostKind::Pinky,
        GhostKind::Inky,
        GhostKind::Clyde,
    ];
}

/// Behaviour state; each variant carries its own deadline.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum GhostState {
    Chase,
    Frightened { until: Instant },
    Eaten { respawn_at: Instant },
}

/// What a renderer needs to pick a colour.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum GhostLook {
    Normal,
    Frightened,
    Eaten,
}

#[derive(Debug, Clone)]
pub struct Ghost {
    pub kind: GhostKind,
    pub body: Body,
    pub state: GhostState,
    pub radius: i32,
    start: GridPos,
    home: GridPos,
}

impl Ghost {
    pub fn new(
        kind: GhostKind,
        maze: &Maze,
        start: GridPos,
        home: GridPos,
        radius: i32,
        rng: &mut impl Rng,
    ) -> Self {
        let mut body = Body::at(maze, start);
        body.direction = random_direction(rng);
        Self {
            kind,
            body,
            state: GhostState::Chase,
            radius,
            start,
            home,
        }
    }

    pub fn start(&self) -> GridPos {
        self.start
    }

    pub fn home(&self) -> GridPos {
        self.home
    }

    pub fn look(&self) -> GhostLook {
        match self.state {
            GhostState::Chase => GhostLook::Normal,
            GhostState::Frightened { .. } => GhostLook::Frightened,
            GhostState::Eaten { .. } => GhostLook::Eaten,
        }
    }

    pub fn is_frightened(&self) -> bool {
        matches!(self.state, GhostState::Frightened { .. })
    }

    pub fn is_eaten(&self) -> bool {
        matches!(self.state, GhostState::Eaten { .. })
    }

    pub fn reset(&mut self, maze: &Maze, rng: &mut impl Rng) {
        self.body = Body::at(maze, self.start);
        self.body.direction = random_direction(rng);
        self.state = GhostState::Chase;
    }

    /// Power pellet reaction. Eaten ghosts ignore it.
    pub fn frighten(&mut self, now: Instant, duration: Duration) -> bool {
        if self.is_eaten() {
            return false;
        }
        self.state = GhostState::Frightened {
            until: now + duration,
        };
        true
    }

    /// Caught by the player: teleports home and waits out the respawn delay.
    pub fn get_eaten(&mut self, maze: &Maze, now: Instant, delay: Duration, rng: &mut impl Rng) {
        self.state = GhostState::Eaten {
            respawn_at: now + delay,
        };
        self.body.place(maze, self.home);
        self.body.direction = random_direction(rng);
    }

    pub fn speed(&self, config: &GameConfig) -> i32 {
        match self.state {
            GhostState::Chase => config.ghost_speed,
            GhostState::Frightened { .. } => config.frightened_speed,
            GhostState::Eaten { .. } => config.eaten_speed,
        }
    }

    /// Applies deadline-driven transitions. Returns true when the ghost went back to Chase.
    pub fn update_timers(&mut self, now: Instant) -> bool {
        let revived = match self.state {
            GhostState::Chase => false,
            GhostState::Frightened { until } => now > until,
            GhostState::Eaten { respawn_at } => now > respawn_at && self.body.cell == self.home,
        };
        if revived {
            self.state = GhostState::Chase;
        }
        revived
    }

    /// One tick of timers and movement. `target` is the player's cell.
    pub fn update(
        &mut self,
        maze: &Maze,
        config: &GameConfig,
        now: Instant,
        target: GridPos,
        rng: &mut impl Rng,
    ) {
        if self.update_timers(now) {
            tracing::debug!(ghost = ?self.kind, "ghost back to chase");
        }
        let speed = self.speed(config);
        let allow_gate = self.is_eaten();
        let state = self.state;
        let home = self.home;
        let kind = self.kind;
        motion::advance(&mut self.body, maze, speed, allow_gate, |body| {
            let dir = choose_direction(maze, body, state, home, target, rng);
            tracing::trace!(ghost = ?kind, cell = ?body.cell, ?dir, "ghost turn");
            dir
        });
    }
}

fn random_direction(rng: &mut impl Rng) -> Direction {
    *Direction::ALL
        .choose(rng)
        .unwrap_or(&Direction::Left)
}

/// Walkable directions from `body.cell`, excluding the reverse of the current heading.
fn candidates(maze: &Maze, body: &Body, allow_gate: bool) -> Vec<Direction> {
    let reverse = body.direction.reverse();
    Direction::ALL
        .iter()
        .copied()
        .filter(|&dir| dir != reverse)
        .filter(|&dir| maze.is_walkable(maze.neighbor(body.cell, dir), allow_gate))
        .collect()
}

/// Picks the direction to commit at an aligned tick.
///
/// The reverse heading is only chosen when nothing else is walkable.
pub fn choose_direction(
    maze: &Maze,
    body: &Body,
    state: GhostState,
    home: GridPos,
    target: GridPos,
    rng: &mut impl Rng,
) -> Direction {
    let allow_gate = matches!(state, GhostState::Eaten { .. });
    let options = candidates(maze, body, allow_gate);
    if options.is_empty() {
        return body.direction.reverse();
    }
    match state {
        GhostState::Chase => wander(maze, body, &options, rng),
        GhostState::Frightened { .. } => flee(maze, body.cell, &options, target),
        GhostState::Eaten { .. } => head_home(maze, body.cell, &options, home),
    }
}

/// Random at intersections, otherwise straight ahead while possible.
fn wander(maze: &Maze, body: &Body, options: &[Direction], rng: &mut impl Rng) -> Direction {
    let straight = body.direction;
    let at_intersection = maze.open_neighbors(body.cell) >= 3;
    if !at_intersection && options.contains(&straight) {
        return straight;
    }
    *options.choose(rng).unwrap_or(&straight)
}

/// Maximises squared distance from the player. Ties keep the earlier direction.
fn flee(maze: &Maze, cell: GridPos, options: &[Direction], player: GridPos) -> Direction {
    let mut best = options[0];
    let mut best_dist = i32::MIN;
    for &dir in options {
        let dist = maze.neighbor(cell, dir).distance_sq(player);
        if dist > best_dist {
            best_dist = dist;
            best = dir;
        }
    }
    best
}

/// Greedy step towards home. Ties keep the earlier direction.
fn head_home(maze: &Maze, cell: GridPos, options: &[Direction], home: GridPos) -> Direction {
    let mut best = options[0];
    let mut best_dist = i32::MAX;
    for &dir in options {
        let dist = maze.neighbor(cell, dir).distance_sq(home);
        if dist < best_dist {
            best_dist = dist;
            best = dir;
        }
    }
    best
}
