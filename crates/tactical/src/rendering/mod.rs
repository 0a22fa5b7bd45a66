//! Software drawing of the tactical map into an RGBA back buffer.

mod draw;
mod palette;
mod surface;

pub use draw::{FrameStats, MAX_MESSAGE_ROWS};
pub use palette::{
    house_color, terrain_color, BAND_COLOR, BIB_COLOR, BLACK, CURSOR_BLOCKED_COLOR,
    CURSOR_OK_COLOR, SHADOW_EDGE_LEVEL, SHADOW_GHOST_LEVEL, WALL_COLOR, WATER_TEMPLATE_BASE,
    WAYPOINT_COLOR, WHITE,
};
pub use surface::{Canvas, Surface, SurfaceError};
