mod input;
mod render;

use std::io::{self, Stdout, Write};
use std::thread;
use std::time::Instant;

use crossterm::cursor::{Hide, Show};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use tracing_subscriber::EnvFilter;

use maze_chase::{Direction, GameConfig, Round};

use input::InputState;
use render::Renderer;

/// Direction the scripted headless player cycles through, one per second.
const HEADLESS_ROUTE: [Direction; 4] = [
    Direction::Left,
    Direction::Up,
    Direction::Right,
    Direction::Down,
];

fn main() -> io::Result<()> {
    init_logging();

    let config = GameConfig::load();
    let seed = config.seed.unwrap_or_else(rand::random);
    let round = Round::with_seed(config, seed, Instant::now())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    tracing::info!(seed, "starting");

    if let Some(ticks) = headless_ticks() {
        return run_headless(round, ticks);
    }

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    let result = stdout
        .execute(EnterAlternateScreen)
        .and_then(|out| out.execute(Hide))
        .and_then(|out| run(out, round));
    let restored = restore_terminal(&mut stdout);
    result.and(restored)
}

/// Undoes every terminal change even if one step fails; reports the first failure.
fn restore_terminal<W: Write>(out: &mut W) -> io::Result<()> {
    let show = out.execute(Show).map(|_| ());
    let leave = out.execute(LeaveAlternateScreen).map(|_| ());
    let raw = terminal::disable_raw_mode();
    show.and(leave).and(raw)
}

/// Logs go to the file named by `MAZE_CHASE_LOG`; the terminal belongs to the renderer.
fn init_logging() {
    let Some(path) = std::env::var_os("MAZE_CHASE_LOG") else {
        return;
    };
    let file = match std::fs::File::create(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("cannot open log file {}: {e}", path.to_string_lossy());
            return;
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();
}

/// Accepts `--headless N` and `--headless=N`.
fn headless_ticks() -> Option<u64> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let value = args.iter().enumerate().find_map(|(i, arg)| {
        if arg == "--headless" {
            args.get(i + 1).map(String::as_str)
        } else {
            arg.strip_prefix("--headless=")
        }
    })?;
    value.parse().ok()
}

fn run(stdout: &mut Stdout, mut round: Round) -> io::Result<()> {
    let frame_time = round.config().frame_time();
    let mut renderer = Renderer::new(round.maze().width(), round.maze().height());
    let mut input = InputState::default();

    loop {
        let frame_start = Instant::now();
        input.poll()?;
        if input.quit_requested() {
            return Ok(());
        }

        let now = Instant::now();
        if input.take_restart() && round.restart(now) {
            renderer.invalidate();
        }
        round.tick(input.take_direction(), now);
        renderer.draw(stdout, &round.snapshot(now))?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

/// Runs on a synthetic clock and prints the final snapshot as JSON.
fn run_headless(mut round: Round, ticks: u64) -> io::Result<()> {
    let frame_time = round.config().frame_time();
    let per_leg = round.config().fps.max(1);
    let start = Instant::now();
    let mut now = start;
    for tick in 0..ticks {
        now = start + frame_time * tick as u32;
        let leg = (tick / per_leg) as usize % HEADLESS_ROUTE.len();
        for event in round.tick(HEADLESS_ROUTE[leg], now) {
            tracing::debug!(tick, ?event, "headless");
        }
    }
    let json = serde_json::to_string_pretty(&round.snapshot(now)).map_err(io::Error::other)?;
    println!("{json}");
    Ok(())
}
