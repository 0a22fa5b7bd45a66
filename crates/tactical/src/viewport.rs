//! Camera position and the screen/world transforms that depend on it.

use tracing::{info, trace};

use crate::coord::{
    cell_to_lepton, distance, lepton_to_pixel, pixel_snap, pixel_to_lepton, Cell, Coordinate,
    Facing, CELL_LEPTON_H, CELL_LEPTON_W, CELL_PIXEL_H, CELL_PIXEL_W, EDGE_ZONE,
};
use crate::display::{Display, ScreenRect};

/// Projection of a world coordinate onto the tactical window. `x`/`y` are
/// relative to the window origin and name the upper left of the cell image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    /// World coordinate of the window's upper left corner.
    pub tactical_coord: Coordinate,
    /// Where the camera is heading; the renderer catches up on the next frame.
    pub desired_coord: Coordinate,
    pub lepton_width: i32,
    pub lepton_height: i32,
    /// Screen position of the tactical window.
    pub pixel_x: i32,
    pub pixel_y: i32,
    /// Skip bounds checks in the screen transforms; another renderer owns
    /// the picture.
    pub ignore_view_constraints: bool,
    /// While non-zero, camera moves take effect immediately instead of
    /// waiting for the next frame.
    pub scenario_init: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            tactical_coord: Coordinate::from_xy(CELL_LEPTON_W, CELL_LEPTON_H),
            desired_coord: Coordinate::from_xy(CELL_LEPTON_W, CELL_LEPTON_H),
            lepton_width: 20 * CELL_LEPTON_W,
            lepton_height: 15 * CELL_LEPTON_H,
            pixel_x: 0,
            pixel_y: 0,
            ignore_view_constraints: false,
            scenario_init: 0,
        }
    }
}

impl Viewport {
    pub fn pixel_width(&self) -> i32 {
        lepton_to_pixel(self.lepton_width)
    }

    pub fn pixel_height(&self) -> i32 {
        lepton_to_pixel(self.lepton_height)
    }

    fn relative_leptons(&self, x: i32, y: i32) -> Option<(i32, i32)> {
        let lx = pixel_to_lepton(x - self.pixel_x);
        let ly = pixel_to_lepton(y - self.pixel_y);
        let inside =
            (lx as u32) < self.lepton_width as u32 && (ly as u32) < self.lepton_height as u32;
        (self.ignore_view_constraints || inside).then_some((lx, ly))
    }

    /// Cell under an absolute screen pixel, or `None` outside the window.
    pub fn click_cell_calc(&self, x: i32, y: i32) -> Option<Cell> {
        let (lx, ly) = self.relative_leptons(x, y)?;
        let origin = self.tactical_coord.pixel_snapped();
        Some(origin.add(Coordinate::from_xy(lx, ly)).cell())
    }

    /// World coordinate under an absolute screen pixel.
    pub fn pixel_to_coord(&self, x: i32, y: i32) -> Option<Coordinate> {
        let (lx, ly) = self.relative_leptons(x, y)?;
        Some(self.tactical_coord.add(Coordinate::from_xy(lx, ly)))
    }

    /// Projects a world coordinate into the window, padded by [`EDGE_ZONE`]
    /// on every side so partly visible images still get a position.
    pub fn coord_to_pixel(&self, coord: Coordinate) -> ScreenPoint {
        if coord.is_none() {
            return ScreenPoint {
                x: 0,
                y: 0,
                visible: false,
            };
        }
        let xoff = pixel_snap(coord.x()) + EDGE_ZONE - pixel_snap(self.tactical_coord.x());
        let yoff = pixel_snap(coord.y()) + EDGE_ZONE - pixel_snap(self.tactical_coord.y());
        let inside_x = (xoff as u32) <= (self.lepton_width + EDGE_ZONE * 2) as u32;
        let inside_y = (yoff as u32) <= (self.lepton_height + EDGE_ZONE * 2) as u32;
        ScreenPoint {
            x: lepton_to_pixel(xoff) - lepton_to_pixel(EDGE_ZONE),
            y: lepton_to_pixel(yoff) - lepton_to_pixel(EDGE_ZONE),
            visible: self.ignore_view_constraints || (inside_x && inside_y),
        }
    }

    /// Whether any part of the cell can show in the window. The trailing
    /// partial cell counts as in view.
    pub fn in_view(&self, cell: Cell) -> bool {
        if !cell.is_on_grid() {
            return false;
        }
        let coord = cell.whole_coord();
        let origin = self.tactical_coord.whole();
        coord.x() - origin.x() <= self.lepton_width + CELL_LEPTON_W - 1
            && coord.y() - origin.y() <= self.lepton_height + CELL_LEPTON_H - 1
    }

    /// Clips a world-space segment into the tactical rectangle. Returns
    /// false, leaving both ends alone, when nothing of it can be shown.
    pub fn push_onto_tacmap(&self, source: &mut Coordinate, dest: &mut Coordinate) -> bool {
        if source.is_none() || dest.is_none() {
            return false;
        }
        let left = self.tactical_coord.x();
        let top = self.tactical_coord.y();
        let right = left + self.lepton_width;
        let bottom = top + self.lepton_height;

        let (sx, sy, dx, dy) = (source.x(), source.y(), dest.x(), dest.y());
        if (sx < left && dx < left)
            || (sx > right && dx > right)
            || (sy < top && dy < top)
            || (sy > bottom && dy > bottom)
        {
            return false;
        }
        *source = Coordinate::from_xy(sx.clamp(left, right), sy.clamp(top, bottom));
        *dest = Coordinate::from_xy(dx.clamp(left, right), dy.clamp(top, bottom));
        true
    }

    /// Cell holding the window's upper left corner.
    pub fn origin_cell(&self) -> Cell {
        self.tactical_coord.cell()
    }

    pub(crate) fn screen_rect(&self) -> ScreenRect {
        ScreenRect {
            x: self.pixel_x,
            y: self.pixel_y,
            width: self.pixel_width(),
            height: self.pixel_height(),
        }
    }
}

/// Shifts a `w` x `h` rectangle at (`x`, `y`) so it fits inside
/// `width` x `height`. Returns whether either axis moved.
pub fn confine_rect(x: &mut i32, y: &mut i32, w: i32, h: i32, width: i32, height: i32) -> bool {
    fn confine(value: &mut i32, size: i32, limit: i32) -> bool {
        let before = *value;
        if *value < 0 {
            *value = 0;
        } else if *value + size > limit {
            *value = limit - size;
        }
        *value != before
    }
    let moved_x = confine(x, w, width);
    let moved_y = confine(y, h, height);
    moved_x || moved_y
}

impl Display {
    /// Places the tactical window at pixel (`x`, `y`) with a size in cells;
    /// `None` fills the remaining screen in whole cells.
    pub fn set_view_dimensions(
        &mut self,
        x: i32,
        y: i32,
        width_cells: Option<i32>,
        height_cells: Option<i32>,
    ) {
        let width_cells =
            width_cells.unwrap_or(((self.screen_width - x) / CELL_PIXEL_W).max(1));
        let height_cells =
            height_cells.unwrap_or(((self.screen_height - y) / CELL_PIXEL_H).max(1));
        self.viewport.lepton_width = cell_to_lepton(width_cells);
        self.viewport.lepton_height = cell_to_lepton(height_cells);
        self.viewport.pixel_x = x;
        self.viewport.pixel_y = y;

        let current = self.viewport.tactical_coord;
        self.viewport.scenario_init += 1;
        self.set_tactical_position(current);
        self.viewport.scenario_init -= 1;

        self.tactical_button = self.viewport.screen_rect();
        self.redraw.flag_all();
        info!(
            x,
            y,
            width_cells,
            height_cells,
            "view_dimensions_set"
        );
    }

    /// Moves the camera, keeping the whole window inside the playable map
    /// plus any side panel allowance.
    pub fn set_tactical_position(&mut self, coord: Coordinate) {
        let bounds = self.map.bounds();
        let origin_x = cell_to_lepton(bounds.x);
        let origin_y = cell_to_lepton(bounds.y);
        let mut xx = coord.x() - origin_x;
        let mut yy = coord.y() - origin_y;
        confine_rect(
            &mut xx,
            &mut yy,
            self.viewport.lepton_width,
            self.viewport.lepton_height,
            cell_to_lepton(bounds.width) + self.options.sidebar_leptons,
            cell_to_lepton(bounds.height),
        );
        let clamped = Coordinate::from_xy(xx.max(0) + origin_x, yy.max(0) + origin_y);

        if self.viewport.scenario_init > 0 {
            self.viewport.tactical_coord = clamped;
        }
        self.viewport.desired_coord = clamped;
        self.redraw.request();
        trace!(x = clamped.x(), y = clamped.y(), "tactical_position_set");
    }

    /// Attempts to scroll `distance` leptons toward `facing`. A diagonal that
    /// is blocked on one axis slides along the other. Returns whether any
    /// movement is possible; with `really` the move is committed. The
    /// distance is reduced to what was actually travelled when an edge cut
    /// it short.
    pub fn scroll_map(&mut self, facing: Facing, distance_leptons: &mut i32, really: bool) -> bool {
        if *distance_leptons == 0 {
            return false;
        }
        let bounds = self.map.bounds();
        let tactical = self.viewport.tactical_coord;
        let left = cell_to_lepton(bounds.x);
        let top = cell_to_lepton(bounds.y);
        let right = cell_to_lepton(bounds.x + bounds.width);
        let bottom = cell_to_lepton(bounds.y + bounds.height);

        let mut facing = facing;
        let crude = facing;
        if tactical.x() == left && crude != Facing::West {
            facing = match crude {
                Facing::SouthWest => Facing::South,
                Facing::NorthWest => Facing::North,
                _ => facing,
            };
        }
        if tactical.y() == top && crude != Facing::North {
            facing = match crude {
                Facing::NorthWest => Facing::West,
                Facing::NorthEast => Facing::East,
                _ => facing,
            };
        }
        if tactical.x() + self.viewport.lepton_width == right && crude != Facing::East {
            facing = match crude {
                Facing::NorthEast => Facing::North,
                Facing::SouthEast => Facing::South,
                _ => facing,
            };
        }
        if tactical.y() + self.viewport.lepton_height == bottom && crude != Facing::South {
            facing = match crude {
                Facing::SouthEast => Facing::East,
                Facing::SouthWest => Facing::West,
                _ => facing,
            };
        }

        let target = tactical.moved(facing, *distance_leptons);
        let mut xx = target.x() - left;
        let mut yy = target.y() - top;
        let mut shifted = confine_rect(
            &mut xx,
            &mut yy,
            self.viewport.lepton_width,
            self.viewport.lepton_height,
            cell_to_lepton(bounds.width),
            cell_to_lepton(bounds.height),
        );
        if xx < 0 {
            xx = 0;
            shifted = true;
        }
        if yy < 0 {
            yy = 0;
            shifted = true;
        }
        let target = Coordinate::from_xy(xx + left, yy + top);
        if shifted {
            *distance_leptons = distance(tactical, target);
        }
        if *distance_leptons == 0 || target == tactical {
            return false;
        }

        if really {
            self.set_tactical_position(target);
            self.redraw.request();
            self.mark_top_and_air_changed();
        }
        true
    }

    /// Centres the camera on the selection's average position, or on
    /// `center` when given. Returns the point centred on.
    pub fn center_map(&mut self, center: Option<Coordinate>) -> Option<Coordinate> {
        let center = match center.filter(|coord| !coord.is_none()) {
            Some(coord) => coord,
            None => self.selection_center()?,
        };

        let bounds = self.map.bounds();
        let x = (center.x() - self.viewport.lepton_width / 2).max(cell_to_lepton(bounds.x));
        let y = (center.y() - self.viewport.lepton_height / 2).max(cell_to_lepton(bounds.y));
        self.set_tactical_position(Coordinate::from_xy(x, y));
        Some(center)
    }

    fn selection_center(&self) -> Option<Coordinate> {
        let centers: Vec<Coordinate> = self
            .selected()
            .iter()
            .filter_map(|id| self.objects.get(*id))
            .map(|object| object.center_coord())
            .collect();
        if centers.is_empty() {
            return None;
        }
        let count = centers.len() as i64;
        let x: i64 = centers.iter().map(|coord| coord.x() as i64).sum();
        let y: i64 = centers.iter().map(|coord| coord.y() as i64).sum();
        Some(Coordinate::from_xy((x / count) as i32, (y / count) as i32))
    }
}
