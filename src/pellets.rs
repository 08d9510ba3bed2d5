use std::collections::BTreeSet;

use crate::components::GridPos;
use crate::level::Maze;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PelletKind {
    Normal,
    Power,
}

/// Remaining pellets and power pellets, keyed by cell.
#[derive(Debug, Clone, Default)]
pub struct Collectibles {
    pellets: BTreeSet<GridPos>,
    power: BTreeSet<GridPos>,
}

impl Collectibles {
    pub fn from_maze(maze: &Maze) -> Self {
        Self {
            pellets: maze.pellet_cells().iter().copied().collect(),
            power: maze.power_cells().iter().copied().collect(),
        }
    }

    /// Removes whatever collectible sits on `pos`.
    pub fn take(&mut self, pos: GridPos) -> Option<PelletKind> {
        if self.pellets.remove(&pos) {
            Some(PelletKind::Normal)
        } else if self.power.remove(&pos) {
            Some(PelletKind::Power)
        } else {
            None
        }
    }

    pub fn contains(&self, pos: GridPos) -> Option<PelletKind> {
        if self.pellets.contains(&pos) {
            Some(PelletKind::Normal)
        } else if self.power.contains(&pos) {
            Some(PelletKind::Power)
        } else {
            None
        }
    }

    pub fn pellets(&self) -> impl Iterator<Item = GridPos> + '_ {
        self.pellets.iter().copied()
    }

    pub fn power_pellets(&self) -> impl Iterator<Item = GridPos> + '_ {
        self.power.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.pellets.len() + self.power.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pellets.is_empty() && self.power.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TILE_SIZE;

    #[test]
    fn populated_from_markers() {
        let maze = Maze::standard(TILE_SIZE).unwrap();
        let c = Collectibles::from_maze(&maze);
        assert_eq!(
            c.len(),
            maze.pellet_cells().len() + maze.power_cells().len()
        );
        assert_eq!(c.contains(GridPos::new(1, 1)), Some(PelletKind::Normal));
        assert_eq!(c.contains(GridPos::new(1, 3)), Some(PelletKind::Power));
        assert_eq!(c.contains(GridPos::new(0, 0)), None);
    }

    #[test]
    fn take_removes_once() {
        let maze = Maze::parse(&["#####", "#.o #", "#####"], TILE_SIZE).unwrap();
        let mut c = Collectibles::from_maze(&maze);
        assert_eq!(c.len(), 2);
        assert_eq!(c.take(GridPos::new(1, 1)), Some(PelletKind::Normal));
        assert_eq!(c.take(GridPos::new(1, 1)), None);
        assert_eq!(c.take(GridPos::new(3, 1)), None);
        assert_eq!(c.take(GridPos::new(2, 1)), Some(PelletKind::Power));
        assert!(c.is_empty());
    }
}
