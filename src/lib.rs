//! Tile-maze chase simulation: one player collecting pellets, four ghosts hunting it.
//!
//! The core is deterministic for a given random generator and clock readings;
//! rendering and input live in the `maze-chase` binary.

pub mod components;
pub mod config;
pub mod constants;
pub mod error;
pub mod ghost;
pub mod level;
pub mod motion;
pub mod pellets;
pub mod player;
pub mod round;
pub mod snapshot;

pub use components::{Direction, GridPos, PixelPos};
pub use config::GameConfig;
pub use error::{ConfigError, MazeError, SetupError};
pub use round::{Round, RoundEvent, RoundState};
pub use snapshot::Snapshot;
