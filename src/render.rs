use std::io::{self, Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use maze_chase::ghost::{GhostKind, GhostLook};
use maze_chase::level::Tile;
use maze_chase::{GridPos, RoundState, Snapshot};

const CELL_W: usize = 2;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player,
    Ghost,
    Frightened,
    Eaten,
    Wall,
    Empty,
    Pellet,
    PowerLarge,
    PowerSmall,
    Gate,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

const EMPTY: Cell = Cell {
    glyph: Glyph::Empty,
    color: Color::Reset,
};

/// Diffing terminal renderer; only cells that changed since the last frame are redrawn.
pub struct Renderer {
    width: usize,
    height: usize,
    last: Vec<Cell>,
    last_hud: String,
    last_banner: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            last: vec![EMPTY; width * height],
            last_hud: String::new(),
            last_banner: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }

    pub fn invalidate(&mut self) {
        self.needs_full = true;
    }

    pub fn draw(&mut self, stdout: &mut Stdout, snap: &Snapshot<'_>) -> io::Result<()> {
        let needed_h = (self.height + 2) as u16;
        let needed_w = (self.width * CELL_W) as u16;

        stdout.queue(MoveTo(0, 0))?;

        let (term_w, term_h) = terminal::size()?;
        if term_w < needed_w || term_h < needed_h {
            stdout.queue(Clear(ClearType::All))?;
            let msg = format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                needed_w, needed_h, term_w, term_h
            );
            stdout.queue(Print(msg))?;
            stdout.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + 1;
        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
        }
        if self.needs_full {
            stdout.queue(Clear(ClearType::All))?;
        }

        let hud = hud_line(snap);
        if self.needs_full || hud != self.last_hud {
            self.print_line(stdout, self.origin_y - 1, &hud, Color::White)?;
            self.last_hud = hud;
        }

        let frame = compose(snap, self.width, self.height);
        for (idx, &cell) in frame.iter().enumerate() {
            if self.needs_full || cell != self.last[idx] {
                self.last[idx] = cell;
                self.draw_cell(stdout, idx % self.width, idx / self.width, cell)?;
            }
        }

        let banner = banner_line(snap.state);
        if self.needs_full || banner != self.last_banner {
            let row = self.origin_y + self.height as u16;
            self.print_line(stdout, row, &banner, Color::Yellow)?;
            self.last_banner = banner;
        }
        self.needs_full = false;

        stdout.flush()?;
        Ok(())
    }

    fn print_line(&self, stdout: &mut Stdout, row: u16, text: &str, color: Color) -> io::Result<()> {
        stdout.queue(MoveTo(self.origin_x, row))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(SetForegroundColor(color))?;
        stdout.queue(Print(text))?;
        stdout.queue(ResetColor)?;
        Ok(())
    }

    fn draw_cell(&self, stdout: &mut Stdout, x: usize, y: usize, cell: Cell) -> io::Result<()> {
        let text = match cell.glyph {
            Glyph::Player => "😃",
            Glyph::Ghost => "👻",
            Glyph::Frightened => "😱",
            Glyph::Eaten => "👀",
            Glyph::Wall => "██",
            Glyph::Empty => "  ",
            Glyph::Pellet => "· ",
            Glyph::PowerLarge => "● ",
            Glyph::PowerSmall => "• ",
            Glyph::Gate => "==",
        };
        let x_pos = self.origin_x + (x * CELL_W) as u16;
        let y_pos = self.origin_y + y as u16;
        stdout.queue(MoveTo(x_pos, y_pos))?;
        stdout.queue(SetForegroundColor(cell.color))?;
        stdout.queue(Print(text))?;
        let w = UnicodeWidthStr::width(text);
        if w < CELL_W {
            for _ in 0..(CELL_W - w) {
                stdout.queue(Print(' '))?;
            }
        }
        stdout.queue(ResetColor)?;
        Ok(())
    }
}

fn hud_line(snap: &Snapshot<'_>) -> String {
    format!(
        "Score: {}  Lives: {}  Pellets: {}  Power: {:.1}s  (q to quit)",
        snap.score,
        snap.lives,
        snap.pellets.len() + snap.power_pellets.len(),
        snap.power_remaining_secs
    )
}

fn banner_line(state: RoundState) -> String {
    match state {
        RoundState::Playing => String::new(),
        RoundState::Win => "YOU WIN! Press r to restart".to_string(),
        RoundState::GameOver => "GAME OVER! Press r to restart".to_string(),
    }
}

/// Flattens the snapshot into one cell per tile, agents drawn over the maze.
fn compose(snap: &Snapshot<'_>, width: usize, height: usize) -> Vec<Cell> {
    let mut frame: Vec<Cell> = snap
        .tiles
        .iter()
        .flat_map(|row| row.iter())
        .map(|tile| match tile {
            Tile::Wall => Cell {
                glyph: Glyph::Wall,
                color: Color::Blue,
            },
            Tile::Gate => Cell {
                glyph: Glyph::Gate,
                color: Color::DarkGrey,
            },
            Tile::Open => EMPTY,
        })
        .collect();
    frame.resize(width * height, EMPTY);

    let index = |pos: GridPos| -> Option<usize> {
        let in_bounds =
            pos.col >= 0 && pos.row >= 0 && (pos.col as usize) < width && (pos.row as usize) < height;
        in_bounds.then(|| pos.row as usize * width + pos.col as usize)
    };

    for &pos in &snap.pellets {
        if let Some(i) = index(pos) {
            frame[i] = Cell {
                glyph: Glyph::Pellet,
                color: Color::White,
            };
        }
    }
    let power = if snap.power_pellet_blink {
        Glyph::PowerLarge
    } else {
        Glyph::PowerSmall
    };
    for &pos in &snap.power_pellets {
        if let Some(i) = index(pos) {
            frame[i] = Cell {
                glyph: power,
                color: Color::Magenta,
            };
        }
    }
    for ghost in &snap.ghosts {
        if let Some(i) = index(ghost.agent.cell) {
            frame[i] = match ghost.look {
                GhostLook::Normal => Cell {
                    glyph: Glyph::Ghost,
                    color: ghost_color(ghost.kind),
                },
                GhostLook::Frightened => Cell {
                    glyph: Glyph::Frightened,
                    color: Color::Blue,
                },
                GhostLook::Eaten => Cell {
                    glyph: Glyph::Eaten,
                    color: Color::Grey,
                },
            };
        }
    }
    if let Some(i) = index(snap.player.cell) {
        frame[i] = Cell {
            glyph: Glyph::Player,
            color: Color::Yellow,
        };
    }
    frame
}

fn ghost_color(kind: GhostKind) -> Color {
    match kind {
        GhostKind::Blinky => Color::Red,
        GhostKind::Pinky => Color::Magenta,
        GhostKind::Inky => Color::Cyan,
        GhostKind::Clyde => Color::DarkYellow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use maze_chase::{GameConfig, Round};

    #[test]
    fn compose_places_agents_over_maze() {
        let t0 = Instant::now();
        let round = Round::with_seed(GameConfig::default(), 1, t0).unwrap();
        let snap = round.snapshot(t0);
        let width = round.maze().width();
        let frame = compose(&snap, width, round.maze().height());

        assert_eq!(frame.len(), width * round.maze().height());
        assert!(frame[0] == Cell { glyph: Glyph::Wall, color: Color::Blue });
        let player = snap.player.cell;
        assert!(frame[player.row as usize * width + player.col as usize].glyph == Glyph::Player);
        let blinky = snap.ghosts[0].agent.cell;
        assert!(frame[blinky.row as usize * width + blinky.col as usize].glyph == Glyph::Ghost);
        let power = snap.power_pellets[0];
        assert!(frame[power.row as usize * width + power.col as usize].glyph == Glyph::PowerLarge);
    }

    #[test]
    fn banner_only_when_round_over() {
        assert!(banner_line(RoundState::Playing).is_empty());
        assert!(banner_line(RoundState::Win).contains("WIN"));
        assert!(banner_line(RoundState::GameOver).contains("GAME OVER"));
    }
}
