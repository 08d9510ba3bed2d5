//! Per-tick orchestration of the player, the ghosts and the round outcome.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::components::Direction;
use crate::config::GameConfig;
use crate::constants::{BLINK_HZ, GHOST_HOME, GHOST_SCORE, GHOST_STARTS, PLAYER_START};
use crate::error::SetupError;
use crate::ghost::{Ghost, GhostKind};
use crate::level::Maze;
use crate::pellets::{Collectibles, PelletKind};
use crate::player::Player;
use crate::snapshot::{AgentView, GhostView, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoundState {
    Playing,
    Win,
    GameOver,
}

/// Things that happened during a tick, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEvent {
    PelletEaten,
    PowerActivated,
    GhostEaten(GhostKind),
    LifeLost { lives_left: u32 },
    Won,
    GameOver,
}

pub struct Round<R = StdRng> {
    config: GameConfig,
    maze: Maze,
    collectibles: Collectibles,
    player: Player,
    ghosts: Vec<Ghost>,
    state: RoundState,
    power_until: Option<Instant>,
    started_at: Instant,
    rng: R,
}

impl Round<StdRng> {
    /// Standard maze with a seeded generator. Uses the config seed when present.
    pub fn with_seed(config: GameConfig, seed: u64, now: Instant) -> Result<Self, SetupError> {
        let seed = config.seed.unwrap_or(seed);
        let maze = Maze::standard(config.tile_size)?;
        Round::new(config, maze, StdRng::seed_from_u64(seed), now)
    }
}

impl<R: Rng> Round<R> {
    pub fn new(config: GameConfig, maze: Maze, mut rng: R, now: Instant) -> Result<Self, SetupError> {
        config.validate()?;
        maze.ensure_walkable(PLAYER_START, "player start")?;
        maze.ensure_walkable(GHOST_HOME, "ghost home")?;
        for start in GHOST_STARTS {
            maze.ensure_walkable(start, "ghost start")?;
        }

        let player = spawn_player(&config, &maze);
        let ghosts = spawn_ghosts(&config, &maze, &mut rng);
        let collectibles = Collectibles::from_maze(&maze);
        info!(
            pellets = collectibles.len(),
            lives = config.starting_lives,
            "new round"
        );
        Ok(Self {
            config,
            maze,
            collectibles,
            player,
            ghosts,
            state: RoundState::Playing,
            power_until: None,
            started_at: now,
            rng,
        })
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn collectibles(&self) -> &Collectibles {
        &self.collectibles
    }

    pub fn power_until(&self) -> Option<Instant> {
        self.power_until
    }

    pub fn power_remaining(&self, now: Instant) -> Duration {
        self.power_until
            .map(|until| until.saturating_duration_since(now))
            .unwrap_or_default()
    }

    /// Advances the simulation by one frame. Does nothing unless Playing.
    ///
    /// `now` is read once by the caller and used for every deadline in the tick.
    pub fn tick(&mut self, input: Direction, now: Instant) -> Vec<RoundEvent> {
        let mut events = Vec::new();
        if self.state != RoundState::Playing {
            return events;
        }

        self.player.request(input);
        match self
            .player
            .update(&self.maze, self.config.player_speed, &mut self.collectibles)
        {
            Some(PelletKind::Normal) => events.push(RoundEvent::PelletEaten),
            Some(PelletKind::Power) => {
                self.activate_power(now);
                events.push(RoundEvent::PowerActivated);
            }
            None => {}
        }

        let target = self.player.body.cell;
        for ghost in &mut self.ghosts {
            ghost.update(&self.maze, &self.config, now, target, &mut self.rng);
        }

        self.resolve_collisions(now, &mut events);

        if self.state == RoundState::Playing && self.collectibles.is_empty() {
            self.state = RoundState::Win;
            info!(score = self.player.score, "round won");
            events.push(RoundEvent::Won);
        }
        events
    }

    fn activate_power(&mut self, now: Instant) {
        let duration = self.config.power_duration();
        self.power_until = Some(now + duration);
        let frightened = self
            .ghosts
            .iter_mut()
            .map(|g| g.frighten(now, duration))
            .filter(|&f| f)
            .count();
        debug!(frightened, "power pellet eaten");
    }

    fn resolve_collisions(&mut self, now: Instant, events: &mut Vec<RoundEvent>) {
        for idx in 0..self.ghosts.len() {
            if !collides(&self.player, &self.ghosts[idx], self.config.collision_margin) {
                continue;
            }
            let ghost = &mut self.ghosts[idx];
            if ghost.is_frightened() {
                self.player.score += GHOST_SCORE;
                ghost.get_eaten(&self.maze, now, self.config.ghost_respawn(), &mut self.rng);
                debug!(ghost = ?ghost.kind, score = self.player.score, "ghost eaten");
                events.push(RoundEvent::GhostEaten(ghost.kind));
            } else if !ghost.is_eaten() {
                self.lose_life(events);
                break;
            }
        }
    }

    fn lose_life(&mut self, events: &mut Vec<RoundEvent>) {
        self.player.lives = self.player.lives.saturating_sub(1);
        let lives_left = self.player.lives;
        events.push(RoundEvent::LifeLost { lives_left });
        if lives_left == 0 {
            self.state = RoundState::GameOver;
            info!(score = self.player.score, "game over");
            events.push(RoundEvent::GameOver);
            return;
        }
        debug!(lives_left, "life lost");
        self.player.reset(&self.maze);
        for ghost in &mut self.ghosts {
            ghost.reset(&self.maze, &mut self.rng);
        }
        self.power_until = None;
    }

    /// Starts over after Win or GameOver. Ignored while Playing.
    pub fn restart(&mut self, now: Instant) -> bool {
        if self.state == RoundState::Playing {
            debug!("restart ignored while playing");
            return false;
        }
        self.player = spawn_player(&self.config, &self.maze);
        self.ghosts = spawn_ghosts(&self.config, &self.maze, &mut self.rng);
        self.collectibles = Collectibles::from_maze(&self.maze);
        self.state = RoundState::Playing;
        self.power_until = None;
        self.started_at = now;
        info!("round restarted");
        true
    }

    /// Read-only view for rendering.
    pub fn snapshot(&self, now: Instant) -> Snapshot<'_> {
        let phase = (now.saturating_duration_since(self.started_at).as_secs_f32() * BLINK_HZ) as u64;
        Snapshot {
            tiles: self.maze.rows(),
            pellets: self.collectibles.pellets().collect(),
            power_pellets: self.collectibles.power_pellets().collect(),
            power_pellet_blink: phase % 2 == 0,
            player: AgentView::of(&self.player.body, self.player.radius),
            ghosts: self
                .ghosts
                .iter()
                .map(|g| GhostView {
                    kind: g.kind,
                    agent: AgentView::of(&g.body, g.radius),
                    look: g.look(),
                })
                .collect(),
            score: self.player.score,
            lives: self.player.lives,
            state: self.state,
            power_remaining_secs: self.power_remaining(now).as_secs_f32(),
        }
    }
}

fn spawn_player(config: &GameConfig, maze: &Maze) -> Player {
    Player::new(maze, PLAYER_START, config.starting_lives, config.player_radius())
}

fn spawn_ghosts(config: &GameConfig, maze: &Maze, rng: &mut impl Rng) -> Vec<Ghost> {
    GhostKind::ALL
        .iter()
        .zip(GHOST_STARTS)
        .map(|(&kind, start)| Ghost::new(kind, maze, start, GHOST_HOME, config.ghost_radius(), rng))
        .collect()
}

/// Pixel-distance test against the radius sum less a margin.
pub fn collides(player: &Player, ghost: &Ghost, margin: i32) -> bool {
    let reach = (player.radius + ghost.radius - margin) as f32;
    player.body.pixel.distance(ghost.body.pixel) < reach
}
