//! Fixed-point world coordinates.
//!
//! The world is a 128 x 128 grid of cells. Each cell is 256 leptons wide and
//! renders as 24 x 24 pixels. A [`Coordinate`] packs an X/Y lepton pair into
//! 32 bits (X low, Y high); a [`Cell`] is the row-major index of a grid square.
//! Every conversion here is integer-exact so repeated round trips never drift.

use serde::{Deserialize, Serialize};

pub const CELL_LEPTON_W: i32 = 256;
pub const CELL_LEPTON_H: i32 = 256;
pub const CELL_PIXEL_W: i32 = 24;
pub const CELL_PIXEL_H: i32 = 24;
pub const MAP_CELL_W: i32 = 128;
pub const MAP_CELL_H: i32 = 128;
pub const MAP_CELL_TOTAL: i32 = MAP_CELL_W * MAP_CELL_H;

/// Padding added around the view so partially visible sprites still project.
pub const EDGE_ZONE: i32 = CELL_LEPTON_W * 2;

/// Marker that may lead a refresh list to say the side panel also needs work.
pub const REFRESH_SIDEBAR: i32 = 32766;

const HIGH_COORD_MASK: u32 = 0x8000_8000;

pub fn lepton_to_pixel(lepton: i32) -> i32 {
    let bias = if lepton < 0 { 255 } else { 0 };
    (lepton * CELL_PIXEL_W + (CELL_LEPTON_W / 2) - bias) / CELL_LEPTON_W
}

pub fn pixel_to_lepton(pixel: i32) -> i32 {
    let bias = if pixel < 0 { CELL_PIXEL_W - 1 } else { 0 };
    (pixel * CELL_LEPTON_W + (CELL_PIXEL_W / 2) - bias) / CELL_PIXEL_W
}

/// Rounds to the nearest whole cell.
pub fn lepton_to_cell(lepton: i32) -> i32 {
    let cells = lepton >> 8;
    if (lepton & 0xFF) >= CELL_LEPTON_W / 2 {
        cells + 1
    } else {
        cells
    }
}

pub fn cell_to_lepton(cells: i32) -> i32 {
    cells * CELL_LEPTON_W
}

/// Snaps a lepton value to the nearest value a pixel can represent.
pub fn pixel_snap(lepton: i32) -> i32 {
    pixel_to_lepton(lepton_to_pixel(lepton))
}

/// Distance approximation used throughout the map: long axis plus half the short axis.
pub fn distance(a: Coordinate, b: Coordinate) -> i32 {
    let dy = (a.y() - b.y()).abs();
    let dx = (a.x() - b.x()).abs();
    if dy > dx {
        dy + dx / 2
    } else {
        dx + dy / 2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Cell(pub i32);

impl Cell {
    pub const fn from_xy(x: i32, y: i32) -> Self {
        Self(y * MAP_CELL_W + x)
    }

    pub const fn x(self) -> i32 {
        self.0 & (MAP_CELL_W - 1)
    }

    pub const fn y(self) -> i32 {
        (self.0 >> 7) & (MAP_CELL_H - 1)
    }

    pub const fn offset(self, delta: i32) -> Self {
        Self(self.0 + delta)
    }

    /// True when the index addresses a square of the 128 x 128 grid.
    pub const fn is_on_grid(self) -> bool {
        self.0 >= 0 && self.0 < MAP_CELL_TOTAL
    }

    pub fn index(self) -> Option<usize> {
        self.is_on_grid().then_some(self.0 as usize)
    }

    /// Coordinate of the cell centre.
    pub fn coord(self) -> Coordinate {
        Coordinate::from_xy(
            cell_to_lepton(self.x()) + CELL_LEPTON_W / 2,
            cell_to_lepton(self.y()) + CELL_LEPTON_H / 2,
        )
    }

    /// Coordinate of the cell's upper left corner.
    pub fn whole_coord(self) -> Coordinate {
        self.coord().whole()
    }

    pub fn adjacent(self, facing: Facing) -> Self {
        self.offset(facing.cell_offset())
    }

    /// Adjacent cell, or `None` when the step would leave the grid or wrap
    /// across the east/west edge.
    pub fn neighbor(self, facing: Facing) -> Option<Self> {
        let next = self.adjacent(facing);
        if !next.is_on_grid() || (next.x() - self.x()).abs() > 1 {
            return None;
        }
        Some(next)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coordinate(pub u32);

impl Coordinate {
    pub const NONE: Coordinate = Coordinate(0);

    pub fn from_xy(x: i32, y: i32) -> Self {
        Self(((y as u16 as u32) << 16) | (x as u16 as u32))
    }

    /// Converts a pixel offset pair into a lepton offset coordinate.
    pub fn from_pixels(x: i32, y: i32) -> Self {
        Self::from_xy(pixel_to_lepton(x), pixel_to_lepton(y))
    }

    pub fn x(self) -> i32 {
        (self.0 & 0xFFFF) as u16 as i16 as i32
    }

    pub fn y(self) -> i32 {
        (self.0 >> 16) as u16 as i16 as i32
    }

    pub fn x_cell(self) -> i32 {
        (self.0 >> 8) as i32 & 0xFF
    }

    pub fn y_cell(self) -> i32 {
        (self.0 >> 24) as i32 & 0xFF
    }

    pub fn x_lepton(self) -> i32 {
        (self.0 & 0xFF) as i32
    }

    pub fn y_lepton(self) -> i32 {
        ((self.0 >> 16) & 0xFF) as i32
    }

    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Off-map coordinates carry a set sign bit on either axis.
    pub fn is_off_map(self) -> bool {
        self.0 & HIGH_COORD_MASK != 0
    }

    pub fn cell(self) -> Cell {
        Cell::from_xy(self.x_cell(), self.y_cell())
    }

    pub fn whole(self) -> Self {
        Self(self.0 & 0xFF00_FF00)
    }

    pub fn fraction(self) -> Self {
        Self(self.0 & 0x00FF_00FF)
    }

    pub fn snap(self) -> Self {
        Self(self.whole().0 | 0x0080_0080)
    }

    /// Per-axis addition with 16-bit wrap, matching packed arithmetic.
    pub fn add(self, other: Coordinate) -> Self {
        Self::from_xy(self.x() + other.x(), self.y() + other.y())
    }

    /// Moves along one of the eight facings. Diagonal steps are scaled so the
    /// travelled distance matches a straight step.
    pub fn moved(self, facing: Facing, distance: i32) -> Self {
        let (dx, dy) = facing.unit_vector();
        let step = if facing.is_diagonal() {
            distance * 181 / 256
        } else {
            distance
        };
        Self::from_xy(self.x() + dx * step, self.y() + dy * step)
    }

    /// Snaps both axes to pixel granularity.
    pub fn pixel_snapped(self) -> Self {
        Self::from_xy(pixel_snap(self.x()), pixel_snap(self.y()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Facing {
    pub const ALL: [Facing; 8] = [
        Facing::North,
        Facing::NorthEast,
        Facing::East,
        Facing::SouthEast,
        Facing::South,
        Facing::SouthWest,
        Facing::West,
        Facing::NorthWest,
    ];

    pub const CARDINALS: [Facing; 4] = [Facing::North, Facing::East, Facing::South, Facing::West];

    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Facing::NorthEast | Facing::SouthEast | Facing::SouthWest | Facing::NorthWest
        )
    }

    pub const fn cell_offset(self) -> i32 {
        match self {
            Facing::North => -MAP_CELL_W,
            Facing::NorthEast => -(MAP_CELL_W - 1),
            Facing::East => 1,
            Facing::SouthEast => MAP_CELL_W + 1,
            Facing::South => MAP_CELL_W,
            Facing::SouthWest => MAP_CELL_W - 1,
            Facing::West => -1,
            Facing::NorthWest => -(MAP_CELL_W + 1),
        }
    }

    const fn unit_vector(self) -> (i32, i32) {
        match self {
            Facing::North => (0, -1),
            Facing::NorthEast => (1, -1),
            Facing::East => (1, 0),
            Facing::SouthEast => (1, 1),
            Facing::South => (0, 1),
            Facing::SouthWest => (-1, 1),
            Facing::West => (-1, 0),
            Facing::NorthWest => (-1, -1),
        }
    }
}

/// Bounded list of cell offsets describing a multi-cell shape, such as a
/// building's occupied cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint {
    offsets: Vec<i32>,
}

impl Footprint {
    pub fn new(offsets: impl Into<Vec<i32>>) -> Self {
        Self {
            offsets: offsets.into(),
        }
    }

    /// Solid `width` x `height` block anchored at its upper left cell.
    pub fn rectangle(width: i32, height: i32) -> Self {
        let mut offsets = Vec::with_capacity((width.max(0) * height.max(0)) as usize);
        for y in 0..height {
            for x in 0..width {
                offsets.push(y * MAP_CELL_W + x);
            }
        }
        Self { offsets }
    }

    pub fn offsets(&self) -> &[i32] {
        &self.offsets
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn cells(&self, origin: Cell) -> impl Iterator<Item = Cell> + '_ {
        self.offsets.iter().map(move |offset| origin.offset(*offset))
    }

    /// Bounding box in cells. Offsets may be negative, so each one is split
    /// with remainder/division against the row width instead of bit masks.
    pub fn dimensions(&self) -> (i32, i32) {
        let mut min_x = MAP_CELL_W;
        let mut max_x = -MAP_CELL_W;
        let mut min_y = MAP_CELL_H;
        let mut max_y = -MAP_CELL_H;

        for offset in &self.offsets {
            let x = offset % MAP_CELL_W;
            let y = offset / MAP_CELL_W;
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }

        if self.offsets.is_empty() {
            return (1, 1);
        }
        ((max_x - min_x + 1).max(1), (max_y - min_y + 1).max(1))
    }
}
