//! Building placement: the footprint cursor and the adjacency rules.

use tracing::{debug, info, warn};

use crate::coord::{distance, lepton_to_cell, Cell, Facing, Footprint, CELL_LEPTON_W, MAP_CELL_W};
use crate::display::Display;
use crate::house::HouseId;
use crate::interaction::{InteractionMode, PendingPlacement, RubberBand};
use crate::map::CellFlags;
use crate::object::{ObjectType, Rtti, TypeRef};

impl Display {
    /// Enters placement mode for `kind` on behalf of `house` and attaches
    /// its footprint to the cursor.
    pub fn set_pending_placement(&mut self, kind: TypeRef, house: HouseId) {
        if self.interaction.mode.pending().is_some() {
            self.clear_pending_placement();
        }
        let footprint = kind.footprint.clone();
        info!(kind = %kind.name, house = house.0, "placement_started");
        self.interaction.band = RubberBand::Idle;
        self.interaction.mode = InteractionMode::Placement(PendingPlacement { kind, house });
        self.set_cursor_shape(Some(footprint));
        self.set_cursor_pos(None);
    }

    pub fn clear_pending_placement(&mut self) {
        if self.interaction.mode.pending().is_none() {
            return;
        }
        self.set_cursor_shape(None);
        self.interaction.mode = InteractionMode::Normal;
        info!("placement_cleared");
    }

    /// Installs or removes the placement footprint. The footprint is centred
    /// on the hovered cell.
    pub fn set_cursor_shape(&mut self, footprint: Option<Footprint>) {
        if self.interaction.cursor_footprint.is_some() {
            let anchor = self.zone_anchor();
            self.cursor_mark(anchor, false);
        }
        self.interaction.zone_offset = 0;

        match footprint.filter(|footprint| !footprint.is_empty()) {
            Some(footprint) => {
                let (w, h) = footprint.dimensions();
                self.interaction.zone_offset = -((h / 2) * MAP_CELL_W + w / 2);
                self.interaction.cursor_footprint = Some(footprint);
                let anchor = self.zone_anchor();
                self.cursor_mark(anchor, true);
            }
            None => self.interaction.cursor_footprint = None,
        }
    }

    /// Anchor cell of the footprint under the cursor.
    fn zone_anchor(&self) -> Option<Cell> {
        self.interaction
            .zone_cell
            .map(|zone| zone.offset(self.interaction.zone_offset))
    }

    /// Sets or clears the cursor marker on every footprint cell anchored at
    /// `anchor` and flags them, along with the pending object's overlap
    /// cells.
    pub fn cursor_mark(&mut self, anchor: Option<Cell>, on: bool) {
        let Some(anchor) = anchor else {
            return;
        };
        let Some(footprint) = self.interaction.cursor_footprint.clone() else {
            return;
        };

        for cell in footprint.cells(anchor) {
            if !self.map.in_radar(cell) {
                continue;
            }
            self.redraw_objects(cell);
            let Some(state) = self.map.cell_mut(cell) else {
                continue;
            };
            if state.flags.contains(CellFlags::CURSOR_HERE) == on {
                debug_assert!(false, "cursor marker already {on} at cell {}", cell.0);
                warn!(cell = cell.0, on, "cursor_mark_repeated");
            }
            state.flags.set(CellFlags::CURSOR_HERE, on);
        }

        let overlap = self
            .interaction
            .mode
            .pending()
            .map(|pending| pending.kind.overlap.clone());
        for cell in overlap.iter().flat_map(|overlap| overlap.cells(anchor)) {
            if self.map.in_radar(cell) {
                self.redraw_objects(cell);
            }
        }
    }

    /// Moves the placement cursor, `None` following the mouse. A footprint
    /// is kept inside the tactical window. Returns the previous zone cell.
    pub fn set_cursor_pos(&mut self, pos: Option<Cell>) -> Option<Cell> {
        let pos = pos.or_else(|| {
            let (x, y) = self.mouse_position();
            self.viewport.click_cell_calc(x, y)
        });
        let previous = self.interaction.zone_cell;

        let Some(footprint) = self.interaction.cursor_footprint.clone() else {
            self.interaction.zone_cell = pos;
            return previous;
        };
        let Some(pos) = pos else {
            return previous;
        };

        let (w, h) = footprint.dimensions();
        let offset = self.interaction.zone_offset;
        let origin = self.viewport.origin_cell();
        let view_w = lepton_to_cell(self.viewport.lepton_width);
        let view_h = lepton_to_cell(self.viewport.lepton_height);

        let anchor = pos.offset(offset);
        let mut x = anchor.x().max(origin.x());
        let mut y = anchor.y().max(origin.y());
        if x + w >= origin.x() + view_w {
            x = origin.x() + view_w - w;
        }
        if y + h >= origin.y() + view_h {
            y = origin.y() + view_h - h;
        }
        let pos = Cell::from_xy(x, y).offset(-offset);

        if Some(pos) == previous {
            return Some(pos);
        }
        if let Some(old) = previous {
            self.cursor_mark(Some(old.offset(offset)), false);
        }
        self.cursor_mark(Some(pos.offset(offset)), true);
        self.interaction.zone_cell = Some(pos);

        let pending = self
            .interaction
            .mode
            .pending()
            .map(|pending| (pending.kind.clone(), pending.house));
        let (kind, house) = match pending {
            Some((kind, house)) => (Some(kind), house),
            None => (None, self.player()),
        };
        self.interaction.proximity_ok = self.passes_proximity_check(
            kind.as_deref(),
            house,
            Some(&footprint),
            Some(pos.offset(offset)),
        );
        previous
    }

    /// Whether a building of `kind` may stand at `cell` for `house`: next
    /// to (or one cell removed from) the house's base, or within the type's
    /// adjacency distance of a base building.
    pub fn passes_proximity_check(
        &mut self,
        kind: Option<&ObjectType>,
        house: HouseId,
        footprint: Option<&Footprint>,
        cell: Option<Cell>,
    ) -> bool {
        let for_player = house == self.player();
        if for_player {
            self.interaction.passed_proximity = false;
        }
        if self.options.editor_mode {
            return true;
        }
        let (Some(footprint), Some(cell)) = (footprint, cell) else {
            return true;
        };
        let Some(kind) = kind.filter(|kind| kind.is_building()) else {
            return true;
        };

        let mut passed = false;
        let mut off_radar = false;
        if kind.adjacent == 1 {
            for target in footprint.cells(cell) {
                if !self.map.in_radar(target) {
                    off_radar = true;
                    break;
                }
                if self.touches_base(target, kind, house) {
                    passed = true;
                    break;
                }
            }
        }

        if for_player {
            self.interaction.passed_proximity = passed;
        }

        if !passed && !off_radar && kind.adjacent > 1 {
            passed = self.objects.iter().any(|(_, object)| {
                if object.rtti() != Rtti::Building
                    || object.is_in_limbo()
                    || object.owner() != house
                    || !object.class_of().is_base
                {
                    return false;
                }
                let (w, h) = object.class_of().footprint.dimensions();
                let reach =
                    distance(object.center_coord(), cell.coord()) / CELL_LEPTON_W - (w + h) / 2;
                reach <= kind.adjacent
            });
        }

        debug!(
            kind = %kind.name,
            house = house.0,
            cell = cell.0,
            passed,
            "proximity_checked"
        );
        passed
    }

    fn touches_base(&self, cell: Cell, kind: &ObjectType, house: HouseId) -> bool {
        for facing in Facing::ALL {
            let Some(neighbor) = cell.neighbor(facing) else {
                continue;
            };
            if !self.map.in_radar(neighbor) {
                continue;
            }
            if self.anchors_base(neighbor, kind, house) {
                return true;
            }
            let second_ring = Facing::CARDINALS
                .iter()
                .filter_map(|facing| neighbor.neighbor(*facing));
            for further in second_ring {
                if self.anchors_base(further, kind, house) {
                    return true;
                }
            }
        }
        false
    }

    /// A neighbouring cell that lets `house` build next to it: an owned bib
    /// (or any owned cell when placing a wall), or an owned base building.
    fn anchors_base(&self, cell: Cell, kind: &ObjectType, house: HouseId) -> bool {
        let Some(state) = self.map.cell(cell) else {
            return false;
        };
        if (kind.is_wall || state.flags.contains(CellFlags::BIB)) && state.owner == Some(house) {
            return true;
        }
        self.cell_building(cell)
            .and_then(|id| self.objects.get(id))
            .map(|base| base.owner() == house && base.class_of().is_base)
            .unwrap_or(false)
    }
}
