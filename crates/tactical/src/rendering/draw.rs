use tracing::{trace, warn};

use super::palette::{
    terrain_color, BAND_COLOR, BLACK, CURSOR_BLOCKED_COLOR, CURSOR_OK_COLOR, SHADOW_EDGE_LEVEL,
    SHADOW_GHOST_LEVEL, WAYPOINT_COLOR,
};
use super::surface::{Canvas, Surface};
use crate::coord::{
    lepton_to_cell, lepton_to_pixel, Cell, Coordinate, CELL_LEPTON_H, CELL_LEPTON_W, CELL_PIXEL_H,
    CELL_PIXEL_W, MAP_CELL_W,
};
use crate::display::Display;
use crate::interaction::RubberBand;
use crate::layer::LayerKind;
use crate::map::CellFlags;
use crate::object::ObjectId;
use crate::shroud::ShadowIcon;

/// Message lines that can sit over the map at once.
pub const MAX_MESSAGE_ROWS: usize = 4;

/// Cells around the vortex centre that its distortion touches.
const VORTEX_RADIUS: i32 = 2;

/// Scroll deltas at or beyond this many pixels skip the edge-band repaint and
/// fall back to the full exposed-area scan.
const EDGE_BAND_LIMIT: i32 = 0x25;

/// Summary of one [`Display::draw_it`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// False when the frame had nothing to do or the surface could not be locked.
    pub drawn: bool,
    pub full_redraw: bool,
    /// The previous picture was shifted instead of repainted.
    pub blitted: bool,
    /// Flagged cells visited by the terrain pass.
    pub cells_redrawn: usize,
    pub objects_drawn: usize,
    pub shadow_cells: usize,
}

impl Display {
    /// Brings the back buffer up to date with the map.
    ///
    /// Nothing happens unless `forced` is set or something requested a
    /// redraw since the last frame. A pending camera move is applied here:
    /// the still valid part of the old picture is shifted and only the
    /// exposed cells are repainted.
    pub fn draw_it(&mut self, surface: &mut Surface, forced: bool) -> FrameStats {
        if !forced && !self.redraw.is_pending() {
            return FrameStats::default();
        }

        let mut canvas = match surface.lock() {
            Ok(canvas) => canvas,
            Err(error) => {
                warn!(error = %error, "surface_lock_failed");
                self.redraw.flag_all();
                return FrameStats::default();
            }
        };
        canvas.set_clip(
            self.viewport.pixel_x,
            self.viewport.pixel_y,
            self.viewport.pixel_width(),
            self.viewport.pixel_height(),
        );

        let mut stats = FrameStats {
            drawn: true,
            ..FrameStats::default()
        };
        let mut forced = forced;

        self.refresh_band();
        self.flag_vortex();
        self.flag_message_rows();

        let tactical = self.viewport.tactical_coord;
        let desired = self.viewport.desired_coord;
        let shifted = lepton_to_pixel(desired.x()) != lepton_to_pixel(tactical.x())
            || lepton_to_pixel(desired.y()) != lepton_to_pixel(tactical.y());
        if shifted {
            let view_w = self.viewport.pixel_width();
            let view_h = self.viewport.pixel_height();
            let mut old_x = lepton_to_pixel(tactical.x()) - lepton_to_pixel(desired.x());
            let mut old_y = lepton_to_pixel(tactical.y()) - lepton_to_pixel(desired.y());
            let mut old_w = view_w - old_x.abs();
            let mut old_h = view_h - old_y.abs();
            if old_w < 1 || old_h < 1 {
                forced = true;
            }
            let exposed = ExposedEdges {
                right: old_x < 0,
                left: old_x > 0,
                bottom: old_y < 0,
                top: old_y > 0,
            };

            if !forced && (old_w != view_w || old_h != view_h) {
                let (px, py) = (self.viewport.pixel_x, self.viewport.pixel_y);
                canvas.blit_within(
                    old_x.min(0).abs() + px,
                    old_y.min(0).abs() + py,
                    old_x.max(0) + px,
                    old_y.max(0) + py,
                    old_w,
                    old_h,
                );
                stats.blitted = true;
                trace!(dx = old_x, dy = old_y, "view_blitted");
            } else {
                forced = true;
            }
            old_x = old_x.max(0);
            old_y = old_y.max(0);

            self.commit_desired_position();

            if !forced {
                old_w -= CELL_PIXEL_W;
                old_h -= CELL_PIXEL_H;
                if old_x.abs() < EDGE_BAND_LIMIT && old_y.abs() < EDGE_BAND_LIMIT {
                    self.flag_edge_bands(exposed, old_x, old_y);
                } else {
                    self.flag_outside_copy(old_x, old_y, old_w, old_h);
                }
            }
        } else if desired != tactical {
            self.commit_desired_position();
        }

        if forced {
            self.redraw.flag_all();
        }
        stats.full_redraw = forced;

        let (cells_redrawn, shadow_present) = self.redraw_icons(&mut canvas);
        stats.cells_redrawn = cells_redrawn;
        stats.objects_drawn = self.render_layers(&mut canvas, forced);
        if shadow_present {
            stats.shadow_cells = self.redraw_shadow(&mut canvas);
        }

        if let RubberBand::Active { start, end } = self.interaction.band {
            let (px, py) = (self.viewport.pixel_x, self.viewport.pixel_y);
            canvas.draw_rect(start.0 + px, start.1 + py, end.0 + px, end.1 + py, BAND_COLOR);
        }

        self.redraw.clear();
        self.redraw.take_pending();
        trace!(
            cells = stats.cells_redrawn,
            objects = stats.objects_drawn,
            shadow = stats.shadow_cells,
            full = stats.full_redraw,
            "frame_drawn"
        );
        stats
    }

    /// Flags the cells along the rubber band outline and marks overhead
    /// objects so they are drawn on top of it.
    pub(crate) fn refresh_band(&mut self) {
        let RubberBand::Active { start, end } = self.interaction.band else {
            return;
        };
        let (px, py) = (self.viewport.pixel_x, self.viewport.pixel_y);
        let (x1, x2) = (start.0.min(end.0) + px, start.0.max(end.0) + px);
        let (y1, y2) = (start.1.min(end.1) + py, start.1.max(end.1) + py);
        let max_x = px + self.viewport.pixel_width();
        let max_y = py + self.viewport.pixel_height();

        let mut cells = Vec::new();
        for y in (y1..=y2 + CELL_PIXEL_H).step_by(CELL_PIXEL_H as usize) {
            let y = y.clamp(0, max_y);
            cells.extend(self.viewport.click_cell_calc(x1, y));
            cells.extend(self.viewport.click_cell_calc(x2, y));
        }
        for x in (x1..=x2 + CELL_PIXEL_W).step_by(CELL_PIXEL_W as usize) {
            let x = x.clamp(0, max_x);
            cells.extend(self.viewport.click_cell_calc(x, y1));
            cells.extend(self.viewport.click_cell_calc(x, y2));
        }
        for cell in cells {
            self.redraw_objects(cell);
        }
        self.mark_top_and_air_changed();
    }

    fn flag_vortex(&mut self) {
        let Some(center) = self.vortex else {
            return;
        };
        for dy in -VORTEX_RADIUS..=VORTEX_RADIUS {
            for dx in -VORTEX_RADIUS..=VORTEX_RADIUS {
                let cell = Cell::from_xy(center.x() + dx, center.y() + dy);
                if cell.is_on_grid() && (cell.x() - center.x()).abs() <= VORTEX_RADIUS {
                    self.redraw_objects(cell);
                }
            }
        }
    }

    fn flag_message_rows(&mut self) {
        let origin = self.viewport.tactical_coord.cell();
        let row_len = lepton_to_cell(self.viewport.lepton_width) + 1;
        for row in 0..self.message_rows.min(MAX_MESSAGE_ROWS) as i32 {
            let first = origin.0 + row * MAP_CELL_W;
            for index in first..first + row_len {
                self.redraw_objects(Cell(index));
            }
        }
    }

    fn commit_desired_position(&mut self) {
        let desired = self.viewport.desired_coord;
        self.viewport.scenario_init += 1;
        self.set_tactical_position(desired);
        self.viewport.scenario_init -= 1;
    }

    /// Window-relative pixel scan origin: the upper left corner of the cell
    /// under the window's upper left pixel.
    fn scan_origin(&self) -> (i32, i32) {
        let tactical = self.viewport.tactical_coord;
        (
            -lepton_to_pixel(tactical.x_lepton()),
            -lepton_to_pixel(tactical.y_lepton()),
        )
    }

    fn flag_window_pixel(&mut self, x: i32, y: i32) {
        let x = x.clamp(0, self.viewport.pixel_width() - 1) + self.viewport.pixel_x;
        let y = y.clamp(0, self.viewport.pixel_height() - 1) + self.viewport.pixel_y;
        if let Some(cell) = self.viewport.click_cell_calc(x, y) {
            if cell.0 > 0 {
                self.redraw_objects(cell);
            }
        }
    }

    /// Small scrolls: repaint a strip one or two cells deep along each edge
    /// that came into view.
    fn flag_edge_bands(&mut self, exposed: ExposedEdges, old_x: i32, old_y: i32) {
        let (start_x, start_y) = self.scan_origin();
        let view_w = self.viewport.pixel_width();
        let view_h = self.viewport.pixel_height();
        let extra_x = if old_x.abs() >= 16 { 2 } else { 1 };
        let extra_y = if old_y.abs() >= 16 { 2 } else { 1 };
        let step_x = CELL_PIXEL_W as usize;
        let step_y = CELL_PIXEL_H as usize;

        let mut points = Vec::new();
        if exposed.top {
            for y in (start_y..=start_y + CELL_PIXEL_H * extra_y).step_by(step_y) {
                for x in (start_x..=view_w + CELL_PIXEL_W * 2).step_by(step_x) {
                    points.push((x, y));
                }
            }
        }
        if exposed.bottom {
            let first = view_h - CELL_PIXEL_H * (1 + extra_y);
            for y in (first..=view_h + CELL_PIXEL_H * 3).step_by(step_y) {
                for x in (start_x..=view_w + CELL_PIXEL_W * 2).step_by(step_x) {
                    points.push((x, y));
                }
            }
        }
        if exposed.left {
            for x in (start_x..=start_x + CELL_PIXEL_W * extra_x).step_by(step_x) {
                for y in (start_y..=view_h + CELL_PIXEL_H * 2).step_by(step_y) {
                    points.push((x, y));
                }
            }
        }
        if exposed.right {
            let first = view_w - CELL_PIXEL_W * (extra_x + 1);
            for x in (first..=view_w + CELL_PIXEL_W * 3).step_by(step_x) {
                for y in (start_y..=view_h + CELL_PIXEL_H * 2).step_by(step_y) {
                    points.push((x, y));
                }
            }
        }
        for (x, y) in points {
            self.flag_window_pixel(x, y);
        }
    }

    /// Large scrolls: repaint every cell outside the copied rectangle.
    fn flag_outside_copy(&mut self, old_x: i32, old_y: i32, old_w: i32, old_h: i32) {
        let (start_x, start_y) = self.scan_origin();
        let view_w = self.viewport.pixel_width();
        let view_h = self.viewport.pixel_height();
        for y in (start_y..=view_h + CELL_PIXEL_H * 2).step_by(CELL_PIXEL_H as usize) {
            for x in (start_x..=view_w + CELL_PIXEL_W * 2).step_by(CELL_PIXEL_W as usize) {
                if x <= old_x || x >= old_x + old_w || y <= old_y || y >= old_y + old_h {
                    self.flag_window_pixel(x, y);
                }
            }
        }
    }

    /// Every cell whose image can appear in the window, with its
    /// window-relative pixel position.
    fn window_cells(&self) -> Vec<(Cell, i32, i32)> {
        let tactical = self.viewport.tactical_coord;
        let mut cells = Vec::new();
        let mut y = -tactical.y_lepton();
        while y <= self.viewport.lepton_height {
            let mut x = -tactical.x_lepton();
            while x <= self.viewport.lepton_width {
                let cell = tactical.add(Coordinate::from_xy(x, y)).cell();
                if self.viewport.in_view(cell) {
                    let point = self.viewport.coord_to_pixel(cell.whole_coord());
                    if point.visible {
                        cells.push((cell, point.x, point.y));
                    }
                }
                x += CELL_LEPTON_W;
            }
            y += CELL_LEPTON_H;
        }
        cells
    }

    /// Terrain pass. Returns how many flagged cells were visited and whether
    /// any of them is not fully visible to the player.
    fn redraw_icons(&mut self, canvas: &mut Canvas<'_>) -> (usize, bool) {
        let player = self.player();
        let mut visited = 0;
        let mut shadow_present = false;
        for (cell, x, y) in self.window_cells() {
            if !self.redraw.is_flagged(cell) {
                continue;
            }
            visited += 1;
            let screen_x = x + self.viewport.pixel_x;
            let screen_y = y + self.viewport.pixel_y;
            if self.map.is_mapped(cell, player) {
                self.draw_cell(canvas, cell, screen_x, screen_y);
            }
            if !self.map.is_visible(cell, player) {
                shadow_present = true;
            }
        }
        (visited, shadow_present)
    }

    fn draw_cell(&mut self, canvas: &mut Canvas<'_>, cell: Cell, x: i32, y: i32) {
        let Some(state) = self.map.cell(cell) else {
            return;
        };
        canvas.fill_rect(x, y, CELL_PIXEL_W, CELL_PIXEL_H, terrain_color(self.map.theater, state));
        if state.flags.contains(CellFlags::WAYPOINT) {
            canvas.draw_square_outline(
                x + CELL_PIXEL_W / 2,
                y + CELL_PIXEL_H / 2,
                4,
                WAYPOINT_COLOR,
            );
        }
        if state.flags.contains(CellFlags::CURSOR_HERE) {
            let color = if self.interaction.proximity_ok {
                CURSOR_OK_COLOR
            } else {
                CURSOR_BLOCKED_COLOR
            };
            canvas.draw_rect(x, y, x + CELL_PIXEL_W - 1, y + CELL_PIXEL_H - 1, color);
        }

        if self.options.sorted_draw {
            let occupiers = state.occupiers.clone();
            for id in occupiers {
                if self.layers.layer(LayerKind::Ground).contains(id) {
                    self.render_object(canvas, id, true);
                }
            }
        }
    }

    fn render_object(&mut self, canvas: &mut Canvas<'_>, id: ObjectId, forced: bool) -> bool {
        let Some(object) = self.objects.get_mut(id) else {
            return false;
        };
        let point = self.viewport.coord_to_pixel(object.coord());
        if !point.visible {
            return false;
        }
        object.render(
            canvas,
            point.x + self.viewport.pixel_x,
            point.y + self.viewport.pixel_y,
            forced,
        );
        true
    }

    fn render_layers(&mut self, canvas: &mut Canvas<'_>, forced: bool) -> usize {
        let mut drawn = 0;
        for kind in LayerKind::DRAW_ORDER {
            let ids: Vec<_> = self.layers.layer(kind).iter().collect();
            for id in ids {
                let skip = self.options.sorted_draw
                    && kind == LayerKind::Ground
                    && self
                        .objects
                        .get(id)
                        .map(|object| object.rtti().is_techno())
                        .unwrap_or(false);
                if !skip && self.render_object(canvas, id, forced) {
                    drawn += 1;
                }
            }
        }
        drawn
    }

    fn redraw_shadow(&mut self, canvas: &mut Canvas<'_>) -> usize {
        let player = self.player();
        let (px, py) = (self.viewport.pixel_x, self.viewport.pixel_y);
        let mut shaded = 0;
        for (cell, x, y) in self.window_cells() {
            if !self.redraw.is_flagged(cell) || self.map.is_visible(cell, player) {
                continue;
            }
            let shadow = if self.map.is_mapped(cell, player) {
                self.cell_shadow(cell, player)
            } else {
                ShadowIcon::Solid
            };
            match shadow {
                ShadowIcon::Clear => continue,
                ShadowIcon::Edge(_) => {
                    let mask = self.unmapped_neighbors(cell, player);
                    shade_edge_cell(canvas, x + px, y + py, mask);
                }
                ShadowIcon::Solid => {
                    canvas.fill_rect(x + px, y + py, CELL_PIXEL_W, CELL_PIXEL_H, BLACK);
                }
            }
            shaded += 1;
        }
        shaded
    }
}

/// Neighbour bits that darken each third of an edge cell, row by row. A
/// corner darkens with its diagonal or either adjoining side; the middle
/// never does.
const EDGE_ZONE_BITS: [[u8; 3]; 3] = [
    [0x40 | 0x80 | 0x20, 0x80, 0x01 | 0x80 | 0x02],
    [0x20, 0x00, 0x02],
    [0x10 | 0x08 | 0x20, 0x08, 0x04 | 0x08 | 0x02],
];

/// Ghosts a mapped cell on the shroud boundary: the whole cell dims, and
/// the parts facing unmapped neighbours go nearly black.
fn shade_edge_cell(canvas: &mut Canvas<'_>, x: i32, y: i32, mask: u8) {
    let zone_w = CELL_PIXEL_W / 3;
    let zone_h = CELL_PIXEL_H / 3;
    for (row, bits_row) in EDGE_ZONE_BITS.iter().enumerate() {
        for (column, bits) in bits_row.iter().enumerate() {
            let level = if mask & bits != 0 {
                SHADOW_EDGE_LEVEL
            } else {
                SHADOW_GHOST_LEVEL
            };
            let left = x + column as i32 * zone_w;
            let top = y + row as i32 * zone_h;
            for py in top..top + zone_h {
                for px in left..left + zone_w {
                    canvas.shade_pixel(px, py, level);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ExposedEdges {
    right: bool,
    left: bool,
    bottom: bool,
    top: bool,
}
