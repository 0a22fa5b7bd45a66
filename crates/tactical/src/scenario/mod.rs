//! Scenario file persistence for the map layer: bounds, theater, waypoints,
//! cell triggers and the packed terrain template data.

mod ini;

pub use ini::{IniError, IniStore};

use thiserror::Error;
use tracing::{info, warn};

use crate::coord::{Cell, MAP_CELL_H, MAP_CELL_TOTAL, MAP_CELL_W};
use crate::display::Display;
use crate::map::{CellFlags, MapBounds, Theater};

pub const WAYPT_COUNT: usize = 101;
/// Where the player's view starts.
pub const WAYPT_HOME: usize = 98;
pub const WAYPT_REINF: usize = 99;
pub const WAYPT_SPECIAL: usize = 100;

/// Largest playable area older network sessions could address.
const LEGACY_MAP_AREA: i32 = 96 * 96;

const MAP_SECTION: &str = "Map";
const WAYPOINT_SECTION: &str = "Waypoints";
const TRIGGER_SECTION: &str = "CellTriggers";
const MAP_PACK_SECTION: &str = "MapPack";

/// Template ids (little endian u16) for every cell, then one icon byte each.
pub const MAP_PACK_LEN: usize = MAP_CELL_TOTAL as usize * 3;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Ini(#[from] IniError),
    #[error("map pack holds {actual} bytes, expected {expected}")]
    MapPackSize { expected: usize, actual: usize },
    #[error("[{section}] {key}={value}: cell is outside the map")]
    CellOutOfRange {
        section: &'static str,
        key: String,
        value: String,
    },
    #[error("map bounds {x},{y} {width}x{height} do not fit the cell grid")]
    MapBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waypoints {
    cells: [Option<Cell>; WAYPT_COUNT],
}

impl Default for Waypoints {
    fn default() -> Self {
        Self {
            cells: [None; WAYPT_COUNT],
        }
    }
}

impl Waypoints {
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied().flatten()
    }

    /// Out of range indices are ignored.
    pub fn set(&mut self, index: usize, cell: Option<Cell>) {
        if let Some(slot) = self.cells.get_mut(index) {
            *slot = cell;
        }
    }

    pub fn home(&self) -> Option<Cell> {
        self.get(WAYPT_HOME)
    }

    /// Assigned waypoints as `(index, cell)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| cell.map(|cell| (index, cell)))
    }
}

fn parse_cell(section: &'static str, key: &str, value: &str) -> Result<Cell, ScenarioError> {
    value
        .trim()
        .parse::<i32>()
        .ok()
        .map(Cell)
        .filter(|cell| cell.is_on_grid())
        .ok_or_else(|| ScenarioError::CellOutOfRange {
            section,
            key: key.to_string(),
            value: value.to_string(),
        })
}

impl Display {
    /// Loads the map portion of a scenario. The display is cleared first;
    /// objects are expected to be added afterwards.
    pub fn read_ini(&mut self, ini: &IniStore) -> Result<(), ScenarioError> {
        let theater = match ini.get_string(MAP_SECTION, "Theater") {
            None => Theater::default(),
            Some(name) => Theater::from_name(name).unwrap_or_else(|| {
                warn!(theater = name, "unknown_theater");
                Theater::default()
            }),
        };

        let x = ini.get_int(MAP_SECTION, "X", 1)?;
        let y = ini.get_int(MAP_SECTION, "Y", 1)?;
        let width = ini.get_int(MAP_SECTION, "Width", 126)?;
        let mut height = ini.get_int(MAP_SECTION, "Height", 126)?;
        if self.session.kind.has_legacy_map_limit() && width > 0 && width * height > LEGACY_MAP_AREA
        {
            height -= (width * height - LEGACY_MAP_AREA) / width + 1;
        }
        let bounds = MapBounds {
            x,
            y,
            width,
            height,
        };
        if x < 0 || y < 0 || width < 1 || height < 1 || x + width > MAP_CELL_W || y + height > MAP_CELL_H
        {
            return Err(ScenarioError::MapBounds {
                x,
                y,
                width,
                height,
            });
        }

        self.init_clear();
        self.map.theater = theater;
        self.map.set_bounds(bounds);

        for index in 0..WAYPT_COUNT {
            let key = index.to_string();
            let Some(value) = ini.get_string(WAYPOINT_SECTION, &key) else {
                continue;
            };
            if value.trim() == "-1" {
                continue;
            }
            let cell = parse_cell(WAYPOINT_SECTION, &key, value)?;
            self.waypoints.set(index, Some(cell));
            if let Some(state) = self.map.cell_mut(cell) {
                state.flags.insert(CellFlags::WAYPOINT);
            }
        }
        if self.waypoints.home().is_none() {
            self.waypoints
                .set(WAYPT_HOME, Some(Cell::from_xy(bounds.x + 5, bounds.y + 4)));
        }

        for (key, name) in ini.entries(TRIGGER_SECTION) {
            let cell = parse_cell(TRIGGER_SECTION, key, key)?;
            if let Some(state) = self.map.cell_mut(cell) {
                if state.trigger.is_none() {
                    state.trigger = Some(name.to_string());
                }
            }
        }

        let pack = ini.get_blob(MAP_PACK_SECTION)?;
        if !pack.is_empty() {
            self.unpack_templates(&pack)?;
        }

        if let Some(home) = self.waypoints.home() {
            let view = Cell((home.0 - MAP_CELL_W * 4 - 5).max(0));
            self.viewport.scenario_init += 1;
            self.set_tactical_position(view.coord());
            self.viewport.scenario_init -= 1;
        }

        info!(
            theater = theater.name(),
            x,
            y,
            width,
            height,
            waypoints = self.waypoints.iter().count(),
            "scenario_map_read"
        );
        Ok(())
    }

    /// Writes the map portion of a scenario, replacing the sections it owns.
    pub fn write_ini(&self, ini: &mut IniStore) {
        let bounds = self.map.bounds();
        ini.clear_section(MAP_SECTION);
        ini.put_string(MAP_SECTION, "Theater", self.map.theater.name());
        ini.put_int(MAP_SECTION, "X", bounds.x);
        ini.put_int(MAP_SECTION, "Y", bounds.y);
        ini.put_int(MAP_SECTION, "Width", bounds.width);
        ini.put_int(MAP_SECTION, "Height", bounds.height);

        ini.clear_section(WAYPOINT_SECTION);
        for (index, cell) in self.waypoints.iter() {
            ini.put_int(WAYPOINT_SECTION, &index.to_string(), cell.0);
        }

        ini.clear_section(TRIGGER_SECTION);
        for (cell, state) in self.map.all_cells() {
            if let Some(name) = &state.trigger {
                ini.put_string(TRIGGER_SECTION, &cell.0.to_string(), name.as_str());
            }
        }

        ini.put_blob(MAP_PACK_SECTION, &self.pack_templates());
        info!(theater = self.map.theater.name(), "scenario_map_written");
    }

    fn pack_templates(&self) -> Vec<u8> {
        let mut pack = Vec::with_capacity(MAP_PACK_LEN);
        for (_, state) in self.map.all_cells() {
            pack.extend_from_slice(&state.template.to_le_bytes());
        }
        pack.extend(self.map.all_cells().map(|(_, state)| state.icon));
        pack
    }

    fn unpack_templates(&mut self, pack: &[u8]) -> Result<(), ScenarioError> {
        if pack.len() != MAP_PACK_LEN {
            return Err(ScenarioError::MapPackSize {
                expected: MAP_PACK_LEN,
                actual: pack.len(),
            });
        }
        let (templates, icons) = pack.split_at(MAP_CELL_TOTAL as usize * 2);
        for (index, (template, icon)) in templates.chunks_exact(2).zip(icons).enumerate() {
            if let Some(state) = self.map.cell_mut(Cell(index as i32)) {
                state.template = u16::from_le_bytes([template[0], template[1]]);
                state.icon = *icon;
            }
        }
        Ok(())
    }
}
