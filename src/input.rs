use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};

use maze_chase::Direction;

/// Key presses collected between two simulation ticks.
#[derive(Debug, Default)]
pub struct InputState {
    pending: Option<Direction>,
    restart: bool,
    quit: bool,
}

impl InputState {
    /// Drains every queued terminal event without blocking.
    pub fn poll(&mut self) -> io::Result<()> {
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                    self.apply(key.code);
                }
            }
        }
        Ok(())
    }

    fn apply(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('r') => self.restart = true,
            other => {
                if let Some(dir) = direction_for(other) {
                    self.pending = Some(dir);
                }
            }
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn take_restart(&mut self) -> bool {
        std::mem::take(&mut self.restart)
    }

    /// Last direction pressed since the previous call, or `Direction::None`.
    pub fn take_direction(&mut self) -> Direction {
        self.pending.take().unwrap_or(Direction::None)
    }
}

fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => Some(Direction::Right),
        _ => None,
    }
}
