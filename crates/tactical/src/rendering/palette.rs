use crate::map::{CellFlags, CellState, Theater};

pub const BLACK: [u8; 4] = [0, 0, 0, 255];
pub const WHITE: [u8; 4] = [255, 255, 255, 255];
pub const BAND_COLOR: [u8; 4] = WHITE;
pub const CURSOR_OK_COLOR: [u8; 4] = [96, 255, 96, 255];
pub const CURSOR_BLOCKED_COLOR: [u8; 4] = [255, 64, 64, 255];
pub const WAYPOINT_COLOR: [u8; 4] = [255, 220, 64, 255];
pub const WALL_COLOR: [u8; 4] = [140, 140, 150, 255];
pub const BIB_COLOR: [u8; 4] = [92, 84, 70, 255];

/// Light left in a pixel under a partial shadow edge.
pub const SHADOW_GHOST_LEVEL: u8 = 96;
/// Light left along the sides of an edge cell that face unmapped ground.
pub const SHADOW_EDGE_LEVEL: u8 = 32;

const TEMPERATE_GROUND: [[u8; 4]; 4] = [
    [72, 112, 52, 255],
    [80, 120, 58, 255],
    [66, 104, 48, 255],
    [86, 116, 60, 255],
];
const SNOW_GROUND: [[u8; 4]; 4] = [
    [214, 220, 228, 255],
    [224, 228, 236, 255],
    [204, 212, 222, 255],
    [230, 232, 238, 255],
];
const INTERIOR_GROUND: [[u8; 4]; 4] = [
    [96, 92, 88, 255],
    [104, 100, 94, 255],
    [88, 86, 82, 255],
    [110, 104, 98, 255],
];
const WATER: [u8; 4] = [36, 72, 140, 255];

/// Template ids at or above this value are water tiles.
pub const WATER_TEMPLATE_BASE: u16 = 0x100;

/// Flat colour used for a terrain icon in place of tile art.
pub fn terrain_color(theater: Theater, cell: &CellState) -> [u8; 4] {
    if cell.flags.contains(CellFlags::WALL) {
        return WALL_COLOR;
    }
    if cell.flags.contains(CellFlags::BIB) {
        return BIB_COLOR;
    }
    if cell.template >= WATER_TEMPLATE_BASE {
        return WATER;
    }
    let shades = match theater {
        Theater::Temperate => &TEMPERATE_GROUND,
        Theater::Snow => &SNOW_GROUND,
        Theater::Interior => &INTERIOR_GROUND,
    };
    shades[(cell.template as usize + cell.icon as usize) % shades.len()]
}

/// Colour for a house's units and buildings.
pub fn house_color(house: u8) -> [u8; 4] {
    const COLORS: [[u8; 4]; 8] = [
        [224, 196, 40, 255],
        [200, 40, 40, 255],
        [56, 96, 224, 255],
        [224, 120, 32, 255],
        [40, 180, 80, 255],
        [150, 150, 150, 255],
        [160, 80, 200, 255],
        [40, 200, 200, 255],
    ];
    COLORS[house as usize % COLORS.len()]
}
