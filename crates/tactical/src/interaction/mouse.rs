//! Mouse input over the tactical window: hover cursors, clicks, the rubber
//! band and order dispatch.

use tracing::{debug, trace, warn};

use crate::coord::{pixel_to_lepton, Cell, Coordinate};
use crate::display::Display;
use crate::events::{OutgoingEvent, Speech};
use crate::interaction::{
    shadowed_cursor, visible_cursor, InteractionMode, KeyFlags, MouseShape, RubberBand,
    BAND_THRESHOLD,
};
use crate::map::CellFlags;
use crate::object::{
    Action, ClickContext, FormationMove, ObjectId, Rtti, SpecialWeapon, Target, TargetInfo,
    NO_GROUP,
};

impl Display {
    /// Entry point for input delivered to the tactical window. The mouse
    /// position must be current. Never consumes the input, so always
    /// returns false.
    pub fn tactical_action(&mut self, flags: KeyFlags) -> bool {
        let (mouse_x, mouse_y) = self.mouse_position();
        let edge = mouse_x == 0
            || mouse_y == 0
            || mouse_x == self.screen_width - 1
            || mouse_y == self.screen_height - 1;
        let Some(coord) = self.viewport.pixel_to_coord(mouse_x, mouse_y) else {
            return false;
        };
        let cell = coord.cell();
        let shadow = !self.map.is_mapped(cell, self.player());
        let x = mouse_x - self.viewport.pixel_x;
        let y = mouse_y - self.viewport.pixel_y;

        if Some(cell) != self.interaction.zone_cell {
            self.set_cursor_pos(Some(cell));
        }

        let object = if shadow { None } else { self.close_object(coord) };
        let action = if self.selected().is_empty() {
            self.idle_action(cell, shadow, object)
        } else {
            let target = self.click_target(Some(cell), object);
            target
                .map(|target| self.best_object_action(&target))
                .unwrap_or(Action::None)
        };
        trace!(cell = cell.0, shadow, action = ?action, flags = flags.bits(), "tactical_input");

        let mut flags = flags;
        if flags.contains(KeyFlags::RIGHT_PRESS) {
            self.mouse_right_press();
        }
        if flags.contains(KeyFlags::LEFT_UP) && self.interaction.band.is_active() {
            flags |= KeyFlags::LEFT_RELEASE;
        }
        if !edge && flags.contains(KeyFlags::LEFT_UP) {
            self.mouse_left_up(Some(cell), shadow, object, action);
        }
        if flags.contains(KeyFlags::LEFT_RELEASE) {
            self.mouse_left_release(Some(cell), x, y, object, action);
        }
        if !edge && flags.contains(KeyFlags::LEFT_PRESS) {
            self.mouse_left_up(Some(cell), shadow, object, action);
            self.mouse_left_press(x, y);
        }
        if flags.contains(KeyFlags::LEFT_HELD) {
            self.mouse_left_held(x, y);
        }
        false
    }

    /// Action a click would take with nothing selected; the active mode
    /// overrides plain selection.
    fn idle_action(&mut self, cell: Cell, shadow: bool, object: Option<ObjectId>) -> Action {
        let player = self.player();
        let picked = object.and_then(|id| self.objects.get(id));
        let owned = picked.filter(|picked| picked.owner() == player);

        let mut action = match picked {
            Some(picked) if picked.class_of().selectable => Action::Select,
            _ => Action::None,
        };
        match self.interaction.mode.clone() {
            InteractionMode::Normal => {}
            InteractionMode::Repair => {
                action = match owned {
                    Some(owned) if owned.can_repair() => Action::Repair,
                    _ => Action::NoRepair,
                };
            }
            InteractionMode::Sell => {
                action = match owned {
                    Some(owned) if owned.can_demolish() => {
                        if owned.rtti() == Rtti::Building {
                            Action::Sell
                        } else {
                            Action::SellUnit
                        }
                    }
                    _ => {
                        let own_wall = self
                            .map
                            .cell(cell)
                            .map(|state| {
                                state.flags.contains(CellFlags::WALL) && state.owner == Some(player)
                            })
                            .unwrap_or(false);
                        if own_wall {
                            Action::Sell
                        } else {
                            Action::NoSell
                        }
                    }
                };
            }
            InteractionMode::Targeting(SpecialWeapon::Chrono2) => {
                action = if shadow { Action::NoMove } else { Action::Chrono2 };
                let can_teleport = self
                    .interaction
                    .teleport_unit
                    .and_then(|id| self.objects.get(id))
                    .filter(|unit| unit.rtti().is_techno())
                    .map(|unit| unit.can_teleport_here(cell));
                match can_teleport {
                    Some(true) => {}
                    Some(false) => action = Action::NoMove,
                    None => {
                        action = Action::NoMove;
                        self.clear_targeting();
                    }
                }
            }
            InteractionMode::Targeting(weapon) => action = weapon.action(),
            InteractionMode::Placement(_) => action = Action::None,
        }
        action
    }

    fn click_target(&self, cell: Option<Cell>, object: Option<ObjectId>) -> Option<TargetInfo> {
        match object {
            Some(id) => self.target_info(id),
            None => cell.map(TargetInfo::cell),
        }
    }

    /// Cancels whatever the player is in the middle of, one step at a time.
    pub fn mouse_right_press(&mut self) {
        match self.interaction.mode {
            InteractionMode::Placement(_) => self.clear_pending_placement(),
            InteractionMode::Repair | InteractionMode::Sell => {
                debug!(mode = ?self.interaction.mode, "mode_cancelled");
                self.interaction.mode = InteractionMode::Normal;
            }
            InteractionMode::Targeting(_) => self.clear_targeting(),
            InteractionMode::Normal => self.unselect_all(),
        }
        self.interaction.mouse_shape = MouseShape::Normal;
    }

    /// Hover with the button up: shows what a click here would do.
    pub fn mouse_left_up(
        &mut self,
        cell: Option<Cell>,
        shadow: bool,
        object: Option<ObjectId>,
        action: Action,
    ) {
        if self.interaction.band.is_tentative() {
            self.interaction.band = RubberBand::Idle;
        }

        self.interaction.mouse_shape = if shadow {
            let aircraft_only = (!self.selected().is_empty()).then(|| {
                self.selected().iter().all(|id| {
                    self.objects
                        .get(*id)
                        .map(|object| object.rtti() == Rtti::Aircraft)
                        .unwrap_or(false)
                })
            });
            shadowed_cursor(action, aircraft_only)
        } else {
            let stay_attack = match (self.click_target(cell, object), self.selected()) {
                (Some(target), [only]) => self
                    .objects
                    .get(*only)
                    .map(|selected| selected.rtti().is_techno() && selected.in_range_of(&target))
                    .unwrap_or(false),
                _ => false,
            };
            visible_cursor(action, stay_attack)
        };
    }

    /// Button released over the map: places, finishes a band, selects, or
    /// orders the selection. `x`/`y` are relative to the tactical window.
    pub fn mouse_left_release(
        &mut self,
        cell: Option<Cell>,
        x: i32,
        y: i32,
        object: Option<ObjectId>,
        action: Action,
    ) {
        if let Some(pending) = self.interaction.mode.pending() {
            let (rtti, kind) = (pending.kind.rtti, pending.kind.key);
            let zone = self.interaction.zone_cell.or(cell);
            match zone {
                Some(zone) if self.interaction.proximity_ok => {
                    let cell = zone.offset(self.interaction.zone_offset);
                    self.push_event(OutgoingEvent::Place { rtti, kind, cell });
                }
                _ => {
                    warn!(cell = ?zone.map(|zone| zone.0), "placement_rejected");
                    self.speak(Speech::Deploy);
                }
            }
            return;
        }

        if let RubberBand::Active { start, .. } = self.interaction.band {
            self.refresh_band();
            let corner = |(px, py): (i32, i32)| {
                Coordinate::from_xy(pixel_to_lepton(px), pixel_to_lepton(py))
            };
            self.select_these(corner(start), corner((x, y)), false);
            self.interaction.mouse_shape = MouseShape::Normal;
            self.interaction.band = RubberBand::Idle;
            self.redraw.request();
            return;
        }

        let mut action = action;
        if action == Action::ToggleSelect {
            match object {
                Some(id) if !self.selected().is_empty() => {
                    if self.is_selected(id) {
                        self.unselect_object(id);
                    } else {
                        self.select_object(id, true);
                    }
                }
                _ => action = Action::Select,
            }
        }

        let selectable_unselected = object
            .filter(|id| !self.is_selected(*id))
            .and_then(|id| self.objects.get(id))
            .map(|picked| picked.class_of().selectable)
            .unwrap_or(false);
        if action == Action::Select || (action == Action::None && selectable_unselected) {
            if let Some(id) = object {
                if self.is_selected(id) {
                    self.unselect_object(id);
                }
                if self.select_object(id, true) {
                    self.unselect_all_except(id);
                    self.interaction.mouse_shape = MouseShape::Normal;
                }
            }
        }

        if !matches!(action, Action::None | Action::Select | Action::ToggleSelect) {
            self.order_selection(cell, object, action);
            self.emit_orders(cell, object, action);
        }
        self.interaction.band = RubberBand::Idle;
    }

    /// Hands the click to every selected object, each choosing its own
    /// reaction to the target. Only the first one acknowledges.
    fn order_selection(&mut self, cell: Option<Cell>, object: Option<ObjectId>, action: Action) {
        let formation = match action {
            Action::Move | Action::NoMove => self.formation_move(),
            _ => None,
        };
        let target = object.and_then(|id| self.target_info(id));
        let selection = self.selected().to_vec();
        debug!(
            action = ?action,
            selected = selection.len(),
            formation = formation.is_some(),
            "selection_ordered"
        );

        for (index, id) in selection.into_iter().enumerate() {
            let context = ClickContext {
                allow_voice: index == 0,
                formation,
            };
            let Some(unit) = self.objects.get_mut(id) else {
                continue;
            };
            match (object, &target) {
                (Some(target_id), Some(target)) => {
                    let own = unit.what_action(target);
                    unit.active_click_with(own, Target::Object(target_id), &context);
                }
                _ => {
                    let Some(cell) = cell else {
                        continue;
                    };
                    let keeps_place = action == Action::Move
                        && unit.rtti().is_foot()
                        && formation.map(|f| f.group != NO_GROUP).unwrap_or(false);
                    let dest = if keeps_place {
                        unit.adjust_dest(cell)
                    } else {
                        cell
                    };
                    let own = unit.what_action(&TargetInfo::cell(cell));
                    unit.active_click_with(own, Target::Cell(dest), &context);
                }
            }
        }
    }

    /// A move keeps its formation when every selected object is a mobile
    /// member of one group with a formation slot and no unselected unit of
    /// the player's belongs to that group. The group moves at its slowest
    /// member's speed.
    fn formation_move(&self) -> Option<FormationMove> {
        let first = self.objects.get(*self.selected().first()?)?;
        if !first.rtti().is_foot() {
            return None;
        }
        let group = first.group();
        let mut max_speed = i32::MAX;
        for id in self.selected() {
            let member = self.objects.get(*id)?;
            if !member.rtti().is_foot() || member.group() != group || !member.has_formation_offset()
            {
                return None;
            }
            max_speed = max_speed.min(member.max_speed());
        }

        let player = self.player();
        let straggler = self.objects.iter().any(|(id, other)| {
            !self.is_selected(id)
                && other.rtti().is_foot()
                && other.owner() == player
                && other.group() == group
        });
        (!straggler).then_some(FormationMove { group, max_speed })
    }

    /// Orders that go straight to the game layer instead of to the units.
    fn emit_orders(&mut self, cell: Option<Cell>, object: Option<ObjectId>, action: Action) {
        let object_rtti = object
            .and_then(|id| self.objects.get(id))
            .map(|picked| picked.rtti());
        match (action, object) {
            (Action::Repair, Some(id)) if object_rtti == Some(Rtti::Building) => {
                self.push_event(OutgoingEvent::Repair(id));
            }
            (Action::SellUnit, Some(id))
                if matches!(object_rtti, Some(Rtti::Unit | Rtti::Aircraft)) =>
            {
                self.push_event(OutgoingEvent::Sell(id));
            }
            (Action::Sell, Some(id)) => self.push_event(OutgoingEvent::Sell(id)),
            (Action::Sell, None) => {
                if let Some(cell) = cell {
                    self.push_event(OutgoingEvent::SellCell(cell));
                }
            }
            _ => {
                if let (Some(weapon), Some(cell)) = (SpecialWeapon::from_action(action), cell) {
                    self.push_event(OutgoingEvent::SpecialPlace { weapon, cell });
                }
            }
        }
    }

    /// Button pressed in normal mode; may become a rubber band once dragged.
    pub fn mouse_left_press(&mut self, x: i32, y: i32) {
        if self.interaction.mode.is_normal() {
            self.interaction.band = RubberBand::Tentative { x, y };
        }
    }

    pub fn mouse_left_held(&mut self, x: i32, y: i32) {
        match self.interaction.band {
            RubberBand::Active { start, end } => {
                if (x, y) != end {
                    let end = self.clamp_to_window(x, y);
                    self.refresh_band();
                    self.interaction.band = RubberBand::Active { start, end };
                    self.redraw.request();
                }
            }
            RubberBand::Tentative { x: bx, y: by } => {
                if (x - bx).abs() > BAND_THRESHOLD || (y - by).abs() > BAND_THRESHOLD {
                    let end = self.clamp_to_window(x, y);
                    self.interaction.band = RubberBand::Active {
                        start: (bx, by),
                        end,
                    };
                    self.redraw.request();
                    self.mark_top_and_air_changed();
                    debug!(x = bx, y = by, "band_started");
                }
            }
            RubberBand::Idle => {}
        }
    }

    fn clamp_to_window(&self, x: i32, y: i32) -> (i32, i32) {
        (
            x.clamp(0, (self.viewport.pixel_width() - 1).max(0)),
            y.clamp(0, (self.viewport.pixel_height() - 1).max(0)),
        )
    }

    /// Per-frame upkeep: a band dragged out of the window is finished as if
    /// the button had come up.
    pub fn tick(&mut self) {
        if !self.interaction.band.is_active() {
            return;
        }
        let (mouse_x, mouse_y) = self.mouse_position();
        if self.tactical_button.contains(mouse_x, mouse_y) {
            return;
        }
        let (x, y) = self.clamp_to_window(
            mouse_x - self.viewport.pixel_x,
            mouse_y - self.viewport.pixel_y,
        );
        self.mouse_left_release(None, x, y, None, Action::None);
    }
}
