use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::coord::{Cell, Coordinate, MAP_CELL_H, MAP_CELL_TOTAL, MAP_CELL_W};
use crate::house::{HouseId, HouseSet};
use crate::object::ObjectId;

bitflags! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct CellFlags: u8 {
        /// Covered by the building placement cursor.
        const CURSOR_HERE = 1 << 0;
        const WAYPOINT = 1 << 1;
        /// Marked by the first pass of a shroud creep.
        const TO_SHROUD = 1 << 2;
        /// Ground patch laid under a building.
        const BIB = 1 << 3;
        /// Wall overlay present.
        const WALL = 1 << 4;
    }
}

pub const SPOT_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theater {
    #[default]
    Temperate,
    Snow,
    Interior,
}

impl Theater {
    pub fn name(self) -> &'static str {
        match self {
            Theater::Temperate => "TEMPERATE",
            Theater::Snow => "SNOW",
            Theater::Interior => "INTERIOR",
        }
    }

    pub fn from_name(name: &str) -> Option<Theater> {
        match name.trim().to_ascii_uppercase().as_str() {
            "TEMPERATE" => Some(Theater::Temperate),
            "SNOW" => Some(Theater::Snow),
            "INTERIOR" => Some(Theater::Interior),
            _ => None,
        }
    }
}

/// Playable ("radar") rectangle inside the fixed cell grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapBounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Default for MapBounds {
    fn default() -> Self {
        Self {
            x: 1,
            y: 1,
            width: MAP_CELL_W - 2,
            height: MAP_CELL_H - 2,
        }
    }
}

impl MapBounds {
    pub fn contains(&self, cell: Cell) -> bool {
        if !cell.is_on_grid() {
            return false;
        }
        ((cell.x() - self.x) as u32) < self.width as u32
            && ((cell.y() - self.y) as u32) < self.height as u32
    }

    pub fn origin(&self) -> Cell {
        Cell::from_xy(self.x, self.y)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CellState {
    pub mapped: HouseSet,
    pub visible: HouseSet,
    /// Houses whose view of this cell is being jammed.
    pub jammed: HouseSet,
    pub flags: CellFlags,
    pub owner: Option<HouseId>,
    /// Everything standing in the cell, buildings included, in arrival order.
    pub occupiers: Vec<ObjectId>,
    /// Objects whose image spills into this cell without occupying it.
    pub overlappers: Vec<ObjectId>,
    spots: u8,
    pub vehicle_blocked: bool,
    pub template: u16,
    pub icon: u8,
    pub trigger: Option<String>,
}

impl CellState {
    pub fn is_mapped(&self, house: HouseId) -> bool {
        self.mapped.contains(house)
    }

    pub fn is_visible(&self, house: HouseId) -> bool {
        self.visible.contains(house)
    }

    pub fn is_spot_free(&self, spot: usize) -> bool {
        spot < SPOT_COUNT && self.spots & (1 << spot) == 0
    }

    pub fn occupy_spot(&mut self, spot: usize) {
        if spot < SPOT_COUNT {
            self.spots |= 1 << spot;
        }
    }

    pub fn vacate_spot(&mut self, spot: usize) {
        if spot < SPOT_COUNT {
            self.spots &= !(1 << spot);
        }
    }

    /// Resets per-house visibility and transient markers, keeping terrain.
    fn clear_visibility(&mut self) {
        self.mapped = HouseSet::EMPTY;
        self.visible = HouseSet::EMPTY;
        self.flags.remove(CellFlags::TO_SHROUD | CellFlags::CURSOR_HERE);
    }
}

/// Cell storage for the whole 128 x 128 grid.
#[derive(Debug, Clone)]
pub struct TacticalMap {
    cells: Vec<CellState>,
    bounds: MapBounds,
    pub theater: Theater,
}

impl Default for TacticalMap {
    fn default() -> Self {
        Self::new(MapBounds::default())
    }
}

impl TacticalMap {
    pub fn new(bounds: MapBounds) -> Self {
        Self {
            cells: vec![CellState::default(); MAP_CELL_TOTAL as usize],
            bounds,
            theater: Theater::default(),
        }
    }

    pub fn bounds(&self) -> MapBounds {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: MapBounds) {
        self.bounds = bounds;
    }

    pub fn in_radar(&self, cell: Cell) -> bool {
        self.bounds.contains(cell)
    }

    pub fn cell(&self, cell: Cell) -> Option<&CellState> {
        self.cells.get(cell.index()?)
    }

    pub fn cell_mut(&mut self, cell: Cell) -> Option<&mut CellState> {
        self.cells.get_mut(cell.index()?)
    }

    pub fn is_mapped(&self, cell: Cell, house: HouseId) -> bool {
        self.cell(cell).map(|state| state.is_mapped(house)).unwrap_or(false)
    }

    pub fn is_visible(&self, cell: Cell, house: HouseId) -> bool {
        self.cell(cell).map(|state| state.is_visible(house)).unwrap_or(false)
    }

    /// Every cell of the radar area, row by row.
    pub fn radar_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let bounds = self.bounds;
        (bounds.y..bounds.y + bounds.height)
            .flat_map(move |y| (bounds.x..bounds.x + bounds.width).map(move |x| Cell::from_xy(x, y)))
    }

    pub fn all_cells(&self) -> impl Iterator<Item = (Cell, &CellState)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, state)| (Cell(index as i32), state))
    }

    pub fn clear_visibility(&mut self) {
        for state in &mut self.cells {
            state.clear_visibility();
        }
    }

    /// Discards every cell's contents for a fresh scenario load.
    pub fn reset(&mut self) {
        for state in &mut self.cells {
            *state = CellState::default();
        }
    }
}

/// Which of the five infantry sub-spots a coordinate falls in: the centre
/// when near it, otherwise the quadrant.
pub fn spot_index(coord: Coordinate) -> usize {
    let fraction = coord.fraction();
    let centre = Coordinate::from_xy(0x80, 0x80);
    if crate::coord::distance(fraction, centre) < 60 {
        return 0;
    }
    let mut index = 1;
    if fraction.x() > 0x80 {
        index += 1;
    }
    if fraction.y() > 0x80 {
        index += 2;
    }
    index
}

/// Offsets of each sub-spot from the cell's upper left corner.
pub const SPOT_OFFSETS: [(i32, i32); SPOT_COUNT] =
    [(128, 128), (64, 64), (192, 64), (64, 192), (192, 192)];
