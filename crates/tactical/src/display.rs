//! The tactical display context.
//!
//! [`Display`] owns every piece of state the map view reads or writes: cell
//! storage, houses, the object pool and its layers, the camera, the redraw
//! flags and the interaction state. It is handed to each entry point
//! explicitly; nothing here is global.

use tracing::{debug, info};

use crate::coord::{distance, Cell, Coordinate, REFRESH_SIDEBAR};
use crate::events::{OutgoingEvent, Speech};
use crate::house::{House, HouseId, Houses, Session};
use crate::interaction::Interaction;
use crate::layer::{LayerKind, Layers};
use crate::map::{spot_index, TacticalMap, SPOT_OFFSETS};
use crate::object::{ObjectId, ObjectPool, Rtti, TacticalObject, Target, TargetInfo};
use crate::redraw::RedrawFlags;
use crate::scenario::Waypoints;
use crate::viewport::Viewport;

/// Farthest an object may be from the click point and still be picked.
pub const CLOSE_OBJECT_RANGE: i32 = 0xC0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayOptions {
    /// Ground technos are drawn with their cells instead of in the object pass.
    pub sorted_draw: bool,
    /// Scenario editing: placement skips proximity rules.
    pub editor_mode: bool,
    /// Extra lepton width the camera may scroll past the east edge.
    pub sidebar_leptons: i32,
}

/// Screen rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl ScreenRect {
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.width && y < self.y + self.height
    }
}

#[derive(Debug)]
pub struct Display {
    pub map: TacticalMap,
    pub houses: Houses,
    pub session: Session,
    pub objects: ObjectPool,
    pub layers: Layers,
    pub viewport: Viewport,
    pub redraw: RedrawFlags,
    pub options: DisplayOptions,
    pub interaction: Interaction,
    pub waypoints: Waypoints,
    /// Number of on-screen message lines currently shown over the map.
    pub message_rows: usize,
    /// Cell under a full-screen distortion effect, if one is running.
    pub vortex: Option<Cell>,
    pub(crate) tactical_button: ScreenRect,
    pub(crate) screen_width: i32,
    pub(crate) screen_height: i32,
    mouse: (i32, i32),
    selection: Vec<ObjectId>,
    events: Vec<OutgoingEvent>,
    speech: Vec<Speech>,
}

impl Display {
    pub fn new(player: House, screen_width: i32, screen_height: i32) -> Self {
        info!(
            player = %player.name,
            screen_width,
            screen_height,
            "display_created"
        );
        Self {
            map: TacticalMap::default(),
            houses: Houses::new(player),
            session: Session::default(),
            objects: ObjectPool::default(),
            layers: Layers::default(),
            viewport: Viewport::default(),
            redraw: RedrawFlags::default(),
            options: DisplayOptions::default(),
            interaction: Interaction::default(),
            waypoints: Waypoints::default(),
            message_rows: 0,
            vortex: None,
            tactical_button: ScreenRect::default(),
            screen_width,
            screen_height,
            mouse: (0, 0),
            selection: Vec::new(),
            events: Vec::new(),
            speech: Vec::new(),
        }
    }

    /// Returns the display to its freshly constructed state ahead of a
    /// scenario load. Houses, session and options survive.
    pub fn init_clear(&mut self) {
        self.map.reset();
        self.objects.clear();
        self.layers.clear();
        self.selection.clear();
        self.interaction = Interaction::default();
        self.waypoints = Waypoints::default();
        self.events.clear();
        self.speech.clear();
        self.redraw.flag_all();
        debug!("display_cleared");
    }

    pub fn player(&self) -> HouseId {
        self.houses.player()
    }

    pub fn screen_size(&self) -> (i32, i32) {
        (self.screen_width, self.screen_height)
    }

    pub fn set_screen_size(&mut self, width: i32, height: i32) {
        self.screen_width = width;
        self.screen_height = height;
    }

    pub fn tactical_button(&self) -> ScreenRect {
        self.tactical_button
    }

    pub fn mouse_position(&self) -> (i32, i32) {
        self.mouse
    }

    pub fn set_mouse_position(&mut self, x: i32, y: i32) {
        self.mouse = (x, y);
    }

    // Redraw bookkeeping.

    pub fn flag_cell(&mut self, cell: Cell) {
        self.redraw.flag_cell(cell);
    }

    /// Flags a visible cell and tells everything drawn in it to redraw.
    pub fn redraw_objects(&mut self, cell: Cell) {
        if !self.viewport.in_view(cell) {
            return;
        }
        self.redraw.flag_cell(cell);
        let Some(state) = self.map.cell(cell) else {
            return;
        };
        let ids: Vec<ObjectId> = state
            .occupiers
            .iter()
            .chain(state.overlappers.iter())
            .copied()
            .collect();
        for id in ids {
            if let Some(object) = self.objects.get_mut(id) {
                object.mark_changed();
            }
        }
    }

    /// Flags every cell of an offset list relative to `cell`. A leading side
    /// panel marker is skipped.
    pub fn refresh_cells(&mut self, cell: Cell, offsets: &[i32]) {
        let offsets = match offsets.first() {
            Some(&REFRESH_SIDEBAR) => &offsets[1..],
            _ => offsets,
        };
        for offset in offsets {
            let target = cell.offset(*offset);
            if self.map.in_radar(target) {
                self.redraw_objects(target);
            }
        }
    }

    pub(crate) fn mark_layer_changed(&mut self, kind: LayerKind) {
        let ids: Vec<ObjectId> = self.layers.layer(kind).iter().collect();
        for id in ids {
            if let Some(object) = self.objects.get_mut(id) {
                object.mark_changed();
            }
        }
    }

    pub(crate) fn mark_top_and_air_changed(&mut self) {
        self.mark_layer_changed(LayerKind::Top);
        self.mark_layer_changed(LayerKind::Air);
    }

    // Object registry.

    /// Takes ownership of an object, stands it on the map and registers it in
    /// a layer.
    pub fn add_object(&mut self, object: Box<dyn TacticalObject>, layer: LayerKind) -> ObjectId {
        let id = self.objects.insert(object);
        self.place_down(id);
        self.layers.submit(id, layer, &self.objects);
        id
    }

    pub fn remove_object(&mut self, id: ObjectId) -> Option<Box<dyn TacticalObject>> {
        self.pick_up(id);
        self.layers.purge(id);
        self.selection.retain(|selected| *selected != id);
        if self.interaction.teleport_unit == Some(id) {
            self.interaction.teleport_unit = None;
        }
        self.objects.remove(id)
    }

    pub fn submit(&mut self, id: ObjectId, layer: LayerKind) {
        self.layers.submit(id, layer, &self.objects);
    }

    pub fn remove_from_layer(&mut self, id: ObjectId, layer: LayerKind) {
        self.layers.remove(id, layer, &self.objects);
    }

    /// Records the object in the cells it occupies and overlaps.
    pub fn place_down(&mut self, id: ObjectId) {
        let Some(object) = self.objects.get(id) else {
            return;
        };
        let anchor = object.coord().cell();
        let rtti = object.rtti();
        let spot = spot_index(object.coord());
        let owner = object.owner();
        let kind = object.class_of();
        let occupied: Vec<Cell> = kind.footprint.cells(anchor).collect();
        let overlapped: Vec<Cell> = kind.overlap.cells(anchor).collect();

        for cell in occupied {
            let Some(state) = self.map.cell_mut(cell) else {
                continue;
            };
            state.occupiers.push(id);
            match rtti {
                Rtti::Infantry => state.occupy_spot(spot),
                Rtti::Unit | Rtti::Vessel => state.vehicle_blocked = true,
                Rtti::Building => state.owner = Some(owner),
                _ => {}
            }
            self.redraw.flag_cell(cell);
        }
        for cell in overlapped {
            if let Some(state) = self.map.cell_mut(cell) {
                state.overlappers.push(id);
                self.redraw.flag_cell(cell);
            }
        }
    }

    /// Reverses [`Display::place_down`].
    pub fn pick_up(&mut self, id: ObjectId) {
        let Some(object) = self.objects.get(id) else {
            return;
        };
        let anchor = object.coord().cell();
        let rtti = object.rtti();
        let spot = spot_index(object.coord());
        let kind = object.class_of();
        let occupied: Vec<Cell> = kind.footprint.cells(anchor).collect();
        let overlapped: Vec<Cell> = kind.overlap.cells(anchor).collect();

        for cell in occupied {
            let Some(state) = self.map.cell_mut(cell) else {
                continue;
            };
            state.occupiers.retain(|other| *other != id);
            match rtti {
                Rtti::Infantry => state.vacate_spot(spot),
                Rtti::Unit | Rtti::Vessel => state.vehicle_blocked = false,
                _ => {}
            }
            self.redraw.flag_cell(cell);
        }
        for cell in overlapped {
            if let Some(state) = self.map.cell_mut(cell) {
                state.overlappers.retain(|other| *other != id);
                self.redraw.flag_cell(cell);
            }
        }
    }

    /// Moves an object to a new coordinate, keeping cell occupancy current.
    pub fn relocate<F>(&mut self, id: ObjectId, update: F)
    where
        F: FnOnce(&mut dyn TacticalObject),
    {
        self.pick_up(id);
        if let Some(object) = self.objects.get_mut(id) {
            update(object);
        }
        self.place_down(id);
        self.layers.sort_ground(&self.objects);
    }

    pub fn target_info(&self, id: ObjectId) -> Option<TargetInfo> {
        let object = self.objects.get(id)?;
        Some(TargetInfo {
            target: Target::Object(id),
            coord: object.center_coord(),
            owner: Some(object.owner()),
            rtti: Some(object.rtti()),
            type_key: Some(object.class_of().key),
        })
    }

    /// First techno standing in the cell.
    pub fn cell_techno(&self, cell: Cell) -> Option<ObjectId> {
        let state = self.map.cell(cell)?;
        state.occupiers.iter().copied().find(|id| {
            self.objects
                .get(*id)
                .map(|object| object.rtti().is_techno())
                .unwrap_or(false)
        })
    }

    pub fn cell_building(&self, cell: Cell) -> Option<ObjectId> {
        let state = self.map.cell(cell)?;
        state.occupiers.iter().copied().find(|id| {
            self.objects
                .get(*id)
                .map(|object| object.rtti() == Rtti::Building)
                .unwrap_or(false)
        })
    }

    // Selection.

    pub fn selected(&self) -> &[ObjectId] {
        &self.selection
    }

    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.selection.contains(&id)
    }

    /// Asks the object to become selected and records it when it agrees.
    pub fn select_object(&mut self, id: ObjectId, allow_voice: bool) -> bool {
        if self.is_selected(id) {
            return false;
        }
        let Some(object) = self.objects.get_mut(id) else {
            return false;
        };
        if !object.class_of().selectable || !object.select(allow_voice) {
            return false;
        }
        object.mark_changed();
        self.selection.push(id);
        debug!(object = id.0, "object_selected");
        true
    }

    pub fn unselect_object(&mut self, id: ObjectId) {
        let before = self.selection.len();
        self.selection.retain(|selected| *selected != id);
        if self.selection.len() == before {
            return;
        }
        if let Some(object) = self.objects.get_mut(id) {
            object.unselect();
            object.mark_changed();
        }
        debug!(object = id.0, "object_unselected");
    }

    pub fn unselect_all(&mut self) {
        for id in std::mem::take(&mut self.selection) {
            if let Some(object) = self.objects.get_mut(id) {
                object.unselect();
                object.mark_changed();
            }
        }
    }

    pub fn unselect_all_except(&mut self, keep: ObjectId) {
        let others: Vec<ObjectId> = self
            .selection
            .iter()
            .copied()
            .filter(|id| *id != keep)
            .collect();
        for id in others {
            self.unselect_object(id);
        }
    }

    // Outbound queues.

    pub(crate) fn push_event(&mut self, event: OutgoingEvent) {
        debug!(event = ?event, "event_queued");
        self.events.push(event);
    }

    pub(crate) fn speak(&mut self, speech: Speech) {
        self.speech.push(speech);
    }

    pub fn drain_events(&mut self) -> Vec<OutgoingEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn drain_speech(&mut self) -> Vec<Speech> {
        std::mem::take(&mut self.speech)
    }

    // Cell queries.

    pub fn is_spot_free(&self, coord: Coordinate) -> bool {
        self.map
            .cell(coord.cell())
            .map(|state| state.is_spot_free(spot_index(coord)))
            .unwrap_or(false)
    }

    /// Nearest free infantry sub-spot in the coordinate's cell. With `any`
    /// the requested spot is returned regardless of occupancy.
    pub fn closest_free_spot(&self, coord: Coordinate, any: bool) -> Option<Coordinate> {
        const SEQUENCE: [[usize; 4]; 5] = [
            [1, 2, 3, 4],
            [0, 2, 3, 4],
            [0, 1, 4, 3],
            [0, 1, 4, 2],
            [0, 2, 3, 1],
        ];
        const ALTERNATE: [[usize; 4]; 4] = [[1, 2, 3, 4], [2, 3, 4, 1], [3, 4, 1, 2], [4, 1, 2, 3]];

        if coord.is_off_map() {
            return Some(Coordinate(0x0080_0080));
        }
        let cell = coord.cell();
        let state = self.map.cell(cell)?;
        let requested = spot_index(coord);
        let whole = coord.whole();
        let spot_coord = |spot: usize| {
            let (x, y) = SPOT_OFFSETS[spot];
            whole.add(Coordinate::from_xy(x, y))
        };

        if !any && state.vehicle_blocked {
            return None;
        }
        if any || state.is_spot_free(requested) {
            return Some(spot_coord(requested));
        }
        let sequence = if requested == 0 {
            &ALTERNATE[cell.0.rem_euclid(4) as usize]
        } else {
            &SEQUENCE[requested]
        };
        sequence
            .iter()
            .copied()
            .find(|spot| state.is_spot_free(*spot))
            .map(spot_coord)
    }

    /// Object nearest the coordinate among the cell and its neighbours.
    pub fn close_object(&self, coord: Coordinate) -> Option<ObjectId> {
        const OFFSETS: [i32; 9] = [0, -1, 1, -128, 128, 127, 129, -127, -129];
        let player = self.player();
        let center = coord.cell();
        let mut best: Option<(ObjectId, i32)> = None;
        let mut consider = |id: ObjectId, d: i32| {
            if best.map(|(_, current)| d < current).unwrap_or(true) {
                best = Some((id, d));
            }
        };

        for offset in OFFSETS {
            let cell = center.offset(offset);
            if !self.map.in_radar(cell) {
                continue;
            }
            let Some(state) = self.map.cell(cell) else {
                continue;
            };
            for id in &state.occupiers {
                let Some(object) = self.objects.get(*id) else {
                    continue;
                };
                let hidden = object.rtti().is_techno()
                    && object.owner() != player
                    && object.is_cloaked();
                if hidden {
                    continue;
                }
                if object.rtti() == Rtti::Building {
                    let d = distance(coord, cell.coord());
                    if d <= CLOSE_OBJECT_RANGE {
                        consider(*id, d);
                    }
                } else {
                    consider(*id, distance(coord, object.center_coord()));
                }
            }
        }

        for (id, object) in self.objects.iter() {
            if object.rtti() != Rtti::Aircraft
                || self.layers.layer(LayerKind::Ground).contains(id)
            {
                continue;
            }
            if object.owner() != player && object.is_cloaked() {
                continue;
            }
            let apparent = object
                .center_coord()
                .add(Coordinate::from_xy(0, -object.height()));
            consider(id, distance(coord, apparent));
        }

        best.filter(|(_, d)| *d <= CLOSE_OBJECT_RANGE).map(|(id, _)| id)
    }

    /// Average cell position of the player's forces, buildings weighted
    /// sixteen times. `(0, 0)` when the player has nothing on the map.
    pub fn compute_start_pos(&self) -> (i32, i32) {
        let player = self.player();
        let mut x = 0i64;
        let mut y = 0i64;
        let mut count = 0i64;
        for (_, object) in self.objects.iter() {
            if object.is_in_limbo() || object.owner() != player {
                continue;
            }
            let weight = match object.rtti() {
                Rtti::Infantry | Rtti::Unit | Rtti::Vessel => 1,
                Rtti::Building => 16,
                _ => continue,
            };
            let coord = object.coord();
            x += coord.x_cell() as i64 * weight;
            y += coord.y_cell() as i64 * weight;
            count += weight;
        }
        if count == 0 {
            return (0, 0);
        }
        ((x / count) as i32, (y / count) as i32)
    }

    fn is_players_army(&self, id: ObjectId) -> bool {
        self.objects
            .get(id)
            .map(|object| {
                object.owner() == self.player()
                    && object.rtti().is_foot()
                    && object.class_of().selectable
                    && object.is_active()
                    && !object.is_in_limbo()
            })
            .unwrap_or(false)
    }

    /// Next ground object in the player's army after `current`, wrapping.
    pub fn next_object(&self, current: Option<ObjectId>) -> Option<ObjectId> {
        self.cycle_army(self.layers.layer(LayerKind::Ground).iter(), current)
    }

    pub fn prev_object(&self, current: Option<ObjectId>) -> Option<ObjectId> {
        self.cycle_army(self.layers.layer(LayerKind::Ground).iter().rev(), current)
    }

    fn cycle_army(
        &self,
        order: impl Iterator<Item = ObjectId>,
        current: Option<ObjectId>,
    ) -> Option<ObjectId> {
        let mut first = None;
        let mut found = current.is_none();
        for id in order.filter(|id| self.is_players_army(*id)) {
            if first.is_none() {
                first = Some(id);
            }
            if found {
                return Some(id);
            }
            if Some(id) == current {
                found = true;
            }
        }
        first
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Cell;
    use crate::testkit::{display_with_view, spawn, TestUnit};

    #[test]
    fn add_object_registers_occupancy_and_layer() {
        let mut display = display_with_view();
        let id = spawn(&mut display, TestUnit::tank(HouseId(0), Cell::from_xy(12, 12)));
        let state = display.map.cell(Cell::from_xy(12, 12)).expect("cell");
        assert_eq!(state.occupiers, vec![id]);
        assert!(state.vehicle_blocked);
        assert_eq!(display.layers.layer_of(id), Some(LayerKind::Ground));

        display.remove_object(id);
        let state = display.map.cell(Cell::from_xy(12, 12)).expect("cell");
        assert!(state.occupiers.is_empty());
        assert!(!state.vehicle_blocked);
        assert_eq!(display.layers.count(LayerKind::Ground), 0);
    }

    #[test]
    fn removed_object_id_never_names_a_later_object() {
        let mut display = display_with_view();
        let cell = Cell::from_xy(12, 12);
        let sold = spawn(&mut display, TestUnit::building(HouseId(0), cell));
        assert!(display.remove_object(sold).is_some());
        let rebuilt = spawn(&mut display, TestUnit::building(HouseId(0), cell));
        assert_ne!(rebuilt, sold);
        assert!(display.target_info(sold).is_none());
        assert!(display.remove_object(sold).is_none());
        assert!(display.objects.contains(rebuilt));
    }

    #[test]
    fn closest_free_spot_walks_sequence_when_requested_spot_taken() {
        let mut display = display_with_view();
        let cell = Cell::from_xy(20, 20);
        let corner = cell.whole_coord();
        let top_left = corner.add(Coordinate::from_xy(0x20, 0x20));
        assert_eq!(
            display.closest_free_spot(top_left, false),
            Some(corner.add(Coordinate::from_xy(64, 64)))
        );
        display.map.cell_mut(cell).expect("cell").occupy_spot(1);
        assert_eq!(
            display.closest_free_spot(top_left, false),
            Some(corner.add(Coordinate::from_xy(128, 128)))
        );
        assert!(!display.is_spot_free(top_left));
    }

    #[test]
    fn closest_free_spot_centre_request_is_deterministic() {
        let mut display = display_with_view();
        let cell = Cell::from_xy(21, 20);
        display.map.cell_mut(cell).expect("cell").occupy_spot(0);
        let first = display.closest_free_spot(cell.coord(), false);
        assert_eq!(first, display.closest_free_spot(cell.coord(), false));
        assert!(first.is_some());
    }

    #[test]
    fn closest_free_spot_special_cases() {
        let mut display = display_with_view();
        assert_eq!(
            display.closest_free_spot(Coordinate::from_xy(-5, 300), false),
            Some(Coordinate(0x0080_0080))
        );
        let cell = Cell::from_xy(22, 20);
        display.map.cell_mut(cell).expect("cell").vehicle_blocked = true;
        assert_eq!(display.closest_free_spot(cell.coord(), false), None);
        assert_eq!(display.closest_free_spot(cell.coord(), true), Some(cell.coord()));
        let state = display.map.cell_mut(cell).expect("cell");
        state.vehicle_blocked = false;
        for spot in 0..5 {
            state.occupy_spot(spot);
        }
        assert_eq!(display.closest_free_spot(cell.coord(), false), None);
    }

    #[test]
    fn close_object_skips_cloaked_enemies_and_far_buildings() {
        let mut display = display_with_view();
        let cell = Cell::from_xy(30, 30);
        let mut ghost = TestUnit::tank(HouseId(1), cell);
        ghost.cloaked = true;
        spawn(&mut display, ghost);
        assert_eq!(display.close_object(cell.coord()), None);

        let friend = spawn(&mut display, TestUnit::tank(HouseId(0), Cell::from_xy(31, 30)));
        assert_eq!(display.close_object(cell.coord()), None);
        let near = cell.coord().add(Coordinate::from_xy(0x90, 0));
        assert_eq!(display.close_object(near), Some(friend));
    }

    #[test]
    fn close_object_sees_aircraft_at_apparent_height() {
        let mut display = display_with_view();
        let cell = Cell::from_xy(40, 40);
        let mut plane = TestUnit::aircraft(HouseId(0), cell);
        plane.height = 0x100;
        let id = display.add_object(Box::new(plane), LayerKind::Air);
        let above = cell.coord().add(Coordinate::from_xy(0, -0x100));
        assert_eq!(display.close_object(above), Some(id));
    }

    #[test]
    fn compute_start_pos_weights_buildings() {
        let mut display = display_with_view();
        assert_eq!(display.compute_start_pos(), (0, 0));
        spawn(&mut display, TestUnit::tank(HouseId(0), Cell::from_xy(10, 10)));
        spawn(&mut display, TestUnit::building(HouseId(0), Cell::from_xy(27, 27)));
        spawn(&mut display, TestUnit::building(HouseId(1), Cell::from_xy(100, 100)));
        assert_eq!(display.compute_start_pos(), ((10 + 27 * 16) / 17, (10 + 27 * 16) / 17));
    }

    #[test]
    fn next_and_prev_cycle_through_army() {
        let mut display = display_with_view();
        let a = spawn(&mut display, TestUnit::tank(HouseId(0), Cell::from_xy(10, 10)));
        let b = spawn(&mut display, TestUnit::tank(HouseId(0), Cell::from_xy(10, 12)));
        spawn(&mut display, TestUnit::tank(HouseId(1), Cell::from_xy(10, 11)));
        assert_eq!(display.next_object(None), Some(a));
        assert_eq!(display.next_object(Some(a)), Some(b));
        assert_eq!(display.next_object(Some(b)), Some(a));
        assert_eq!(display.prev_object(Some(b)), Some(a));
        assert_eq!(display.prev_object(None), Some(b));
    }

    #[test]
    fn selection_respects_object_refusal() {
        let mut display = display_with_view();
        let mut stubborn = TestUnit::tank(HouseId(0), Cell::from_xy(10, 10));
        stubborn.refuse_select = true;
        let stubborn = spawn(&mut display, stubborn);
        let willing = spawn(&mut display, TestUnit::tank(HouseId(0), Cell::from_xy(11, 10)));
        assert!(!display.select_object(stubborn, true));
        assert!(display.select_object(willing, true));
        assert!(!display.select_object(willing, true));
        assert_eq!(display.selected(), &[willing]);
        display.unselect_all();
        assert!(display.selected().is_empty());
    }

    #[test]
    fn refresh_cells_skips_sidebar_marker_and_off_radar_cells() {
        let mut display = display_with_view();
        display.redraw.clear();
        let origin = Cell::from_xy(5, 5);
        display.refresh_cells(origin, &[REFRESH_SIDEBAR, 0, 1, -(5 * 128)]);
        assert!(display.redraw.is_flagged(origin));
        assert!(display.redraw.is_flagged(Cell::from_xy(6, 5)));
        assert_eq!(display.redraw.flagged_count(), 2);
    }
}
