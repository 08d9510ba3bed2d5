use serde::Serialize;

use crate::components::{Direction, GridPos, PixelPos};
use crate::ghost::{GhostKind, GhostLook};
use crate::level::Tile;
use crate::motion::Body;
use crate::round::RoundState;

/// Everything a renderer may read for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub tiles: &'a [Vec<Tile>],
    pub pellets: Vec<GridPos>,
    pub power_pellets: Vec<GridPos>,
    /// Large/small phase of the power pellet blink.
    pub power_pellet_blink: bool,
    pub player: AgentView,
    pub ghosts: Vec<GhostView>,
    pub score: u32,
    pub lives: u32,
    pub state: RoundState,
    pub power_remaining_secs: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgentView {
    pub pixel: PixelPos,
    pub cell: GridPos,
    pub radius: i32,
    pub direction: Direction,
}

impl AgentView {
    pub fn of(body: &Body, radius: i32) -> Self {
        Self {
            pixel: body.pixel,
            cell: body.cell,
            radius,
            direction: body.direction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GhostView {
    pub kind: GhostKind,
    pub agent: AgentView,
    pub look: GhostLook,
}
