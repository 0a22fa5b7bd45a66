//! Per-house fog of war.
//!
//! Every house has its own mapped and visible bits on each cell. A mapped
//! cell that borders unmapped ground is drawn with one of a fixed set of
//! partial shadow pieces, picked from its eight neighbours. The piece set
//! cannot draw every neighbour pattern, so revealing a cell may force its
//! neighbours to be revealed or cleared as well. That cascade runs off an
//! explicit work queue.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, trace};

use crate::coord::{distance, Cell, Coordinate, Facing, CELL_LEPTON_W, MAP_CELL_H, MAP_CELL_W};
use crate::display::Display;
use crate::house::{HouseId, SessionKind};
use crate::layer::LayerKind;
use crate::map::CellFlags;
use crate::object::Rtti;

/// Longest sight range, in cells, that [`Display::sight_from`] honours.
pub const MAX_SIGHT_RANGE: i32 = 10;

/// Shadow drawn over a cell for one house.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowIcon {
    /// Nothing drawn.
    Clear,
    /// Solid black.
    Solid,
    /// Partial shadow piece by index.
    Edge(u8),
}

// Indexed by a neighbour mask with one bit per unmapped neighbour, clockwise
// from the north-east corner: NE 0x01, E 0x02, SE 0x04, S 0x08, SW 0x10,
// W 0x20, NW 0x40, N 0x80. -1 is clear and -2 solid.
#[rustfmt::skip]
const SHADOW_TABLE: [i8; 256] = [
    -1,33, 2, 2,34,37, 2, 2,
     4,26, 6, 6, 4,26, 6, 6,
    35,45,17,17,38,41,17,17,
     4,26, 6, 6, 4,26, 6, 6,
     8,21,10,10,27,31,10,10,
    12,23,14,14,12,23,14,14,
     8,21,10,10,27,31,10,10,
    12,23,14,14,12,23,14,14,

    32,36,25,25,44,40,25,25,
    19,30,20,20,19,30,20,20,
    39,43,29,29,42,46,29,29,
    19,30,20,20,19,30,20,20,
     8,21,10,10,27,31,10,10,
    12,23,14,14,12,23,14,14,
     8,21,10,10,27,31,10,10,
    12,23,14,14,12,23,14,14,

     1, 1, 3, 3,16,16, 3, 3,
     5, 5, 7, 7, 5, 5, 7, 7,
    24,24,18,18,28,28,18,18,
     5, 5, 7, 7, 5, 5, 7, 7,
     9, 9,11,11,22,22,11,11,
    13,13,-2,-2,13,13,-2,-2,
     9, 9,11,11,22,22,11,11,
    13,13,-2,-2,13,13,-2,-2,

     1, 1, 3, 3,16,16, 3, 3,
     5, 5, 7, 7, 5, 5, 7, 7,
    24,24,18,18,28,28,18,18,
     5, 5, 7, 7, 5, 5, 7, 7,
     9, 9,11,11,22,22,11,11,
    13,13,-2,-2,13,13,-2,-2,
     9, 9,11,11,22,22,11,11,
    13,13,-2,-2,13,13,-2,-2,
];

const NEIGHBOR_BITS: [(Facing, u8); 8] = [
    (Facing::NorthWest, 0x40),
    (Facing::North, 0x80),
    (Facing::NorthEast, 0x01),
    (Facing::West, 0x20),
    (Facing::East, 0x02),
    (Facing::SouthWest, 0x10),
    (Facing::South, 0x08),
    (Facing::SouthEast, 0x04),
];

fn lookup(mask: u8) -> ShadowIcon {
    match SHADOW_TABLE[mask as usize] {
        -1 => ShadowIcon::Clear,
        -2 => ShadowIcon::Solid,
        piece => ShadowIcon::Edge(piece as u8),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Reveal {
    cell: Cell,
    house: HouseId,
    check_radar_spied: bool,
    and_for_allies: bool,
}

impl Display {
    /// Shadow piece for a cell as seen by `house`. The outermost ring of the
    /// grid is always clear.
    pub fn cell_shadow(&self, cell: Cell, house: HouseId) -> ShadowIcon {
        if (cell.x() - 1) as u32 >= (MAP_CELL_W - 2) as u32
            || (cell.y() - 1) as u32 >= (MAP_CELL_H - 2) as u32
        {
            return ShadowIcon::Clear;
        }
        let Some(state) = self.map.cell(cell) else {
            return ShadowIcon::Clear;
        };
        if !state.is_mapped(house) {
            return if state.is_visible(house) {
                ShadowIcon::Clear
            } else {
                ShadowIcon::Solid
            };
        }

        lookup(self.unmapped_neighbors(cell, house))
    }

    /// Neighbour mask of a cell: one bit per adjacent radar cell that
    /// `house` has not mapped. N is 0x80, then clockwise NE 0x01 to NW 0x40.
    pub fn unmapped_neighbors(&self, cell: Cell, house: HouseId) -> u8 {
        let mut mask = 0u8;
        for (facing, bit) in NEIGHBOR_BITS {
            let neighbor = cell.adjacent(facing);
            if self.map.in_radar(neighbor) && !self.map.is_mapped(neighbor, house) {
                mask |= bit;
            }
        }
        mask
    }

    /// Reveals a cell for `house`. Returns true when the cell was newly
    /// mapped; false when it already was, lies outside the radar area, or
    /// the house does not keep a map.
    pub fn map_cell(
        &mut self,
        cell: Cell,
        house: HouseId,
        check_radar_spied: bool,
        and_for_allies: bool,
    ) -> bool {
        let first = Reveal {
            cell,
            house,
            check_radar_spied,
            and_for_allies,
        };
        let mut queue = VecDeque::from([first]);
        let mut seen = HashSet::from([first]);
        let mut result = None;

        while let Some(job) = queue.pop_front() {
            let mut follow_ups = Vec::new();
            let mapped = self.map_one(job, &mut follow_ups);
            result.get_or_insert(mapped);
            for next in follow_ups {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        result.unwrap_or(false)
    }

    fn map_one(&mut self, job: Reveal, follow_ups: &mut Vec<Reveal>) -> bool {
        let Reveal {
            cell,
            mut house,
            check_radar_spied,
            and_for_allies,
        } = job;
        if !self.map.in_radar(cell) {
            return false;
        }
        let Some(source) = self.houses.get(house) else {
            return false;
        };
        let share = self.session.share_ally_visibility;
        if !source.is_human && (!share || (!and_for_allies && !check_radar_spied)) {
            return false;
        }
        let spied_by = source.radar_spied;
        let allies = source.allies;
        let client_server = self.session.kind.is_client_server();

        if !client_server {
            let player = self.player();
            if house != player
                && (spied_by.contains(player)
                    || (self.session.kind == SessionKind::Normal && allies.contains(player)))
            {
                house = player;
            }
        } else if check_radar_spied {
            for spy in self.human_session_players() {
                if spied_by.contains(spy) {
                    follow_ups.push(Reveal {
                        cell,
                        house: spy,
                        check_radar_spied: false,
                        and_for_allies: false,
                    });
                }
            }
        }

        if share && and_for_allies && client_server {
            for other in self.human_session_players() {
                let active = self.houses.get(other).map(|h| h.is_active).unwrap_or(false);
                if active && other != house && allies.contains(other) {
                    follow_ups.push(Reveal {
                        cell,
                        house: other,
                        check_radar_spied,
                        and_for_allies: false,
                    });
                }
            }
        }

        let Some(state) = self.map.cell_mut(cell) else {
            return false;
        };
        if state.is_mapped(house) {
            if !state.is_visible(house) {
                self.redraw_objects(cell);
            }
            return false;
        }
        state.mapped.insert(house);
        self.redraw_objects(cell);
        if self.cell_shadow(cell, house) == ShadowIcon::Clear {
            self.set_visible(cell, house, true);
        }
        trace!(cell = cell.0, house = house.0, "cell_mapped");

        for facing in Facing::ALL {
            let Some(neighbor) = cell.neighbor(facing) else {
                continue;
            };
            self.redraw_objects(neighbor);
            if self.map.is_visible(neighbor, house) {
                continue;
            }
            let neighbor_mapped = self.map.is_mapped(neighbor, house);
            match self.cell_shadow(neighbor, house) {
                ShadowIcon::Clear if neighbor_mapped => self.set_visible(neighbor, house, true),
                ShadowIcon::Solid => {}
                _ if !neighbor_mapped => follow_ups.push(Reveal {
                    cell: neighbor,
                    house,
                    check_radar_spied,
                    and_for_allies: false,
                }),
                _ => {}
            }
        }

        if let Some(techno) = self.cell_techno(cell) {
            if let Some(object) = self.objects.get_mut(techno) {
                object.revealed(house);
            }
        }
        true
    }

    fn human_session_players(&self) -> Vec<HouseId> {
        self.session
            .players
            .iter()
            .copied()
            .filter(|id| self.houses.get(*id).map(|h| h.is_human).unwrap_or(false))
            .collect()
    }

    fn set_visible(&mut self, cell: Cell, house: HouseId, visible: bool) {
        if let Some(state) = self.map.cell_mut(cell) {
            if visible {
                state.visible.insert(house);
            } else {
                state.visible.remove(house);
            }
        }
    }

    /// Returns a mapped cell to the shroud. Its neighbours stay mapped but
    /// lose visibility so their shadow edges are recomputed.
    pub fn shroud_cell(&mut self, cell: Cell, house: HouseId) {
        let gps = self.houses.get(house).map(|h| h.gps_active).unwrap_or(false);
        let jammed = self
            .map
            .cell(cell)
            .map(|state| state.jammed.contains(house))
            .unwrap_or(false);
        if gps && jammed {
            return;
        }
        if !self.map.in_radar(cell) || !self.map.is_mapped(cell, house) {
            return;
        }
        if let Some(state) = self.map.cell_mut(cell) {
            state.mapped.remove(house);
            state.visible.remove(house);
        }
        self.redraw_objects(cell);
        for facing in Facing::ALL {
            if let Some(neighbor) = cell.neighbor(facing) {
                self.set_visible(neighbor, house, false);
                self.redraw_objects(neighbor);
            }
        }
        trace!(cell = cell.0, house = house.0, "cell_shrouded");
    }

    /// Lets the shroud creep back over every mapped cell the house cannot
    /// currently see, then has the house's forces look around again.
    pub fn encroach_shadow(&mut self, house: HouseId) {
        let cells: Vec<Cell> = self.map.radar_cells().collect();
        for cell in &cells {
            if let Some(state) = self.map.cell_mut(*cell) {
                if state.is_mapped(house) && !state.is_visible(house) {
                    state.flags.insert(CellFlags::TO_SHROUD);
                }
            }
        }
        let mut shrouded = 0usize;
        for cell in cells {
            let marked = self
                .map
                .cell_mut(cell)
                .map(|state| {
                    let marked = state.flags.contains(CellFlags::TO_SHROUD);
                    state.flags.remove(CellFlags::TO_SHROUD);
                    marked
                })
                .unwrap_or(false);
            if marked {
                self.shroud_cell(cell, house);
                shrouded += 1;
            }
        }
        self.all_to_look(house, false);
        self.redraw.flag_all();
        debug!(house = house.0, shrouded, "shadow_encroached");
    }

    /// Maps every cell within `range` cells of `cell` for `house`.
    pub fn sight_from(&mut self, cell: Cell, range: i32, house: HouseId) {
        if !self.map.in_radar(cell) || range <= 0 || range > MAX_SIGHT_RANGE {
            return;
        }
        let center = cell.coord();
        let reach = range * CELL_LEPTON_W;
        for dy in -range..=range {
            for dx in -range..=range {
                let target = cell.offset(dy * MAP_CELL_W + dx);
                if !target.is_on_grid() || (target.x() - cell.x()).abs() > range {
                    continue;
                }
                if distance(target.coord(), center) > reach {
                    continue;
                }
                self.map_cell(target, house, true, true);
            }
        }
    }

    /// Ground technos that can see for `house`: its own discovered forces,
    /// and allied buildings that share their sight.
    fn lookers(&self, house: HouseId, units_only: bool) -> Vec<(Cell, i32, Coordinate)> {
        self.layers
            .layer(LayerKind::Ground)
            .iter()
            .filter_map(|id| {
                let object = self.objects.get(id)?;
                let rtti = object.rtti();
                if !rtti.is_techno() || (units_only && rtti == Rtti::Building) {
                    return None;
                }
                let owner = object.owner();
                let sees = if owner == house {
                    object.is_discovered_by(house)
                } else {
                    rtti == Rtti::Building
                        && object.class_of().ally_reveal
                        && self.houses.are_allied(owner, house)
                };
                sees.then(|| {
                    (
                        object.coord().cell(),
                        object.class_of().sight_range,
                        object.center_coord(),
                    )
                })
            })
            .collect()
    }

    /// Every object seeing for `house` reveals its surroundings.
    pub fn all_to_look(&mut self, house: HouseId, units_only: bool) {
        for (cell, range, _) in self.lookers(house, units_only) {
            self.sight_from(cell, range, house);
        }
    }

    /// As [`Display::all_to_look`], limited to objects whose sight could
    /// reach within `reach` leptons of `center`.
    pub fn constrained_look(&mut self, center: Coordinate, reach: i32, house: HouseId) {
        for (cell, range, object_center) in self.lookers(house, false) {
            if distance(object_center, center) <= range * CELL_LEPTON_W + reach {
                self.sight_from(cell, range, house);
            }
        }
    }

    /// Forgets everything `house` has seen.
    pub fn shroud_the_map(&mut self, house: HouseId) {
        let cells: Vec<Cell> = self.map.radar_cells().collect();
        for cell in cells {
            if let Some(state) = self.map.cell_mut(cell) {
                state.mapped.remove(house);
                state.visible.remove(house);
            }
        }
        self.redraw.flag_all();
        debug!(house = house.0, "map_shrouded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::house::{House, HouseSet};
    use crate::map::MapBounds;
    use crate::testkit::{display_with_view, spawn, TestUnit};

    const PLAYER: HouseId = HouseId(0);
    const ENEMY: HouseId = HouseId(1);

    fn small_map() -> Display {
        let mut display = display_with_view();
        display.map.set_bounds(MapBounds {
            x: 1,
            y: 1,
            width: 64,
            height: 64,
        });
        display
    }

    fn map_block(display: &mut Display, x0: i32, y0: i32, x1: i32, y1: i32, house: HouseId) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                display
                    .map
                    .cell_mut(Cell::from_xy(x, y))
                    .expect("cell")
                    .mapped
                    .insert(house);
            }
        }
    }

    #[test]
    fn mapping_a_lone_cell_flags_its_neighbours() {
        let mut display = small_map();
        let cell = Cell::from_xy(5, 5);
        assert!(display.map_cell(cell, PLAYER, false, false));
        assert!(display.map.is_mapped(cell, PLAYER));
        assert!(!display.map.is_visible(cell, PLAYER));
        assert_eq!(display.cell_shadow(cell, PLAYER), ShadowIcon::Solid);
        for facing in Facing::ALL {
            assert!(display.redraw.is_flagged(cell.adjacent(facing)), "{facing:?}");
        }
    }

    #[test]
    fn mapping_twice_changes_nothing() {
        let mut display = small_map();
        let cell = Cell::from_xy(9, 9);
        assert!(display.map_cell(cell, PLAYER, false, false));
        let snapshot: Vec<_> = display.map.all_cells().map(|(_, s)| (s.mapped, s.visible)).collect();
        assert!(!display.map_cell(cell, PLAYER, false, false));
        let after: Vec<_> = display.map.all_cells().map(|(_, s)| (s.mapped, s.visible)).collect();
        assert_eq!(snapshot, after);
    }

    #[test]
    fn shroud_then_map_restores_mapped_state() {
        let mut display = small_map();
        let cell = Cell::from_xy(12, 12);
        map_block(&mut display, 10, 10, 14, 14, PLAYER);
        display.shroud_cell(cell, PLAYER);
        assert!(!display.map.is_mapped(cell, PLAYER));
        assert!(display.map.is_mapped(Cell::from_xy(13, 12), PLAYER));
        display.map_cell(cell, PLAYER, false, false);
        assert!(display.map.is_mapped(cell, PLAYER));
    }

    #[test]
    fn fully_surrounded_cell_becomes_visible() {
        let mut display = small_map();
        map_block(&mut display, 20, 20, 22, 22, PLAYER);
        let center = Cell::from_xy(21, 21);
        display.map.cell_mut(center).expect("cell").mapped.remove(PLAYER);
        assert!(display.map_cell(center, PLAYER, false, false));
        assert!(display.map.is_visible(center, PLAYER));
        assert_eq!(display.cell_shadow(center, PLAYER), ShadowIcon::Clear);
    }

    #[test]
    fn shadow_mask_picks_edge_piece() {
        let mut display = small_map();
        map_block(&mut display, 30, 30, 32, 32, PLAYER);
        let top_edge = Cell::from_xy(31, 30);
        // North row unmapped: NW, N and NE bits.
        assert_eq!(
            display.cell_shadow(top_edge, PLAYER),
            lookup(0x40 | 0x80 | 0x01)
        );
        assert!(matches!(display.cell_shadow(top_edge, PLAYER), ShadowIcon::Edge(_)));
        assert_eq!(display.cell_shadow(Cell::from_xy(31, 31), PLAYER), ShadowIcon::Clear);
        assert_eq!(display.cell_shadow(Cell::from_xy(0, 5), PLAYER), ShadowIcon::Clear);
        assert_eq!(display.cell_shadow(Cell::from_xy(50, 50), PLAYER), ShadowIcon::Solid);
    }

    #[test]
    fn cells_outside_radar_are_never_mapped() {
        let mut display = small_map();
        assert!(!display.map_cell(Cell::from_xy(100, 100), PLAYER, false, false));
        assert!(!display.map.is_mapped(Cell::from_xy(100, 100), PLAYER));
    }

    #[test]
    fn computer_houses_keep_no_map_without_sharing() {
        let mut display = small_map();
        let cell = Cell::from_xy(6, 6);
        assert!(!display.map_cell(cell, ENEMY, true, true));
        display.session.share_ally_visibility = true;
        assert!(!display.map_cell(cell, ENEMY, false, false));
        assert!(display.map_cell(cell, ENEMY, true, false));
        assert!(display.map.is_mapped(cell, ENEMY));
    }

    #[test]
    fn radar_spy_redirects_reveals_to_the_player() {
        let mut display = small_map();
        let mut rival = House::human(HouseId(2), "England");
        rival.radar_spied = HouseSet::EMPTY.with(PLAYER);
        display.houses.add(rival);
        let cell = Cell::from_xy(7, 7);
        assert!(display.map_cell(cell, HouseId(2), false, false));
        assert!(display.map.is_mapped(cell, PLAYER));
        assert!(!display.map.is_mapped(cell, HouseId(2)));
    }

    #[test]
    fn client_server_shares_with_spies_and_allies() {
        let mut display = small_map();
        display.session.kind = SessionKind::ClientServer;
        display.session.share_ally_visibility = true;
        let mut host = House::human(HouseId(2), "host");
        host.radar_spied = HouseSet::EMPTY.with(HouseId(3));
        host.allies = HouseSet::EMPTY.with(HouseId(4));
        display.houses.add(host);
        display.houses.add(House::human(HouseId(3), "spy"));
        display.houses.add(House::human(HouseId(4), "friend"));
        display.session.players = vec![HouseId(2), HouseId(3), HouseId(4)];

        let cell = Cell::from_xy(8, 8);
        assert!(display.map_cell(cell, HouseId(2), true, true));
        for house in [2, 3, 4] {
            assert!(display.map.is_mapped(cell, HouseId(house)), "house {house}");
        }
        assert!(!display.map.is_mapped(cell, PLAYER));
    }

    #[test]
    fn revealing_an_occupied_cell_notifies_the_occupant() {
        let mut display = small_map();
        let tank = TestUnit::tank(ENEMY, Cell::from_xy(15, 15));
        let reveals = tank.reveals.clone();
        spawn(&mut display, tank);
        display.map_cell(Cell::from_xy(15, 15), PLAYER, false, false);
        assert_eq!(reveals.borrow().as_slice(), &[PLAYER]);
    }

    #[test]
    fn jammed_cells_survive_shrouding_for_gps_houses() {
        let mut display = small_map();
        let cell = Cell::from_xy(18, 18);
        map_block(&mut display, 17, 17, 19, 19, PLAYER);
        display.map.cell_mut(cell).expect("cell").jammed.insert(PLAYER);
        if let Some(house) = display.houses.get_mut(PLAYER) {
            house.gps_active = true;
        }
        display.shroud_cell(cell, PLAYER);
        assert!(display.map.is_mapped(cell, PLAYER));
        if let Some(house) = display.houses.get_mut(PLAYER) {
            house.gps_active = false;
        }
        display.shroud_cell(cell, PLAYER);
        assert!(!display.map.is_mapped(cell, PLAYER));
    }

    #[test]
    fn shrouding_keeps_neighbours_mapped_but_hidden() {
        let mut display = small_map();
        map_block(&mut display, 40, 40, 42, 42, PLAYER);
        let east = Cell::from_xy(42, 41);
        display.map.cell_mut(east).expect("cell").visible.insert(PLAYER);
        display.shroud_cell(Cell::from_xy(41, 41), PLAYER);
        assert!(display.map.is_mapped(east, PLAYER));
        assert!(!display.map.is_visible(east, PLAYER));
    }

    #[test]
    fn sight_range_is_distance_bounded() {
        let mut display = small_map();
        let cell = Cell::from_xy(25, 25);
        display.sight_from(cell, 1, PLAYER);
        assert!(display.map.is_mapped(cell, PLAYER));
        assert!(display.map.is_mapped(Cell::from_xy(26, 25), PLAYER));
        assert!(display.map.is_mapped(Cell::from_xy(25, 24), PLAYER));
        assert!(!display.map.is_mapped(Cell::from_xy(26, 26), PLAYER));

        let far = Cell::from_xy(50, 50);
        display.sight_from(far, 0, PLAYER);
        display.sight_from(far, MAX_SIGHT_RANGE + 1, PLAYER);
        assert!(!display.map.is_mapped(far, PLAYER));
    }

    #[test]
    fn encroach_reshrouds_unwatched_ground_and_units_look_again() {
        let mut display = small_map();
        map_block(&mut display, 10, 30, 20, 40, PLAYER);
        spawn(&mut display, TestUnit::tank(PLAYER, Cell::from_xy(12, 32)));
        display.encroach_shadow(PLAYER);
        assert!(display.map.is_mapped(Cell::from_xy(12, 32), PLAYER));
        assert!(!display.map.is_mapped(Cell::from_xy(18, 38), PLAYER));
        assert!(display.redraw.is_flagged(Cell::from_xy(60, 60)));
    }

    #[test]
    fn allied_reveal_buildings_look_for_their_allies() {
        let mut display = small_map();
        let mut ally = House::new(HouseId(2), "France");
        ally.allies = HouseSet::EMPTY.with(PLAYER);
        display.houses.add(ally);
        let mut tower = TestUnit::building(HouseId(2), Cell::from_xy(30, 10));
        std::sync::Arc::make_mut(&mut tower.kind).ally_reveal = true;
        spawn(&mut display, tower);
        spawn(&mut display, TestUnit::tank(ENEMY, Cell::from_xy(50, 10)));

        display.all_to_look(PLAYER, true);
        assert!(!display.map.is_mapped(Cell::from_xy(30, 10), PLAYER));
        display.all_to_look(PLAYER, false);
        assert!(display.map.is_mapped(Cell::from_xy(30, 10), PLAYER));
        assert!(!display.map.is_mapped(Cell::from_xy(50, 10), PLAYER));
    }

    #[test]
    fn constrained_look_skips_distant_units() {
        let mut display = small_map();
        spawn(&mut display, TestUnit::tank(PLAYER, Cell::from_xy(10, 10)));
        spawn(&mut display, TestUnit::tank(PLAYER, Cell::from_xy(50, 50)));
        display.constrained_look(Cell::from_xy(11, 11).coord(), 256, PLAYER);
        assert!(display.map.is_mapped(Cell::from_xy(10, 10), PLAYER));
        assert!(!display.map.is_mapped(Cell::from_xy(50, 50), PLAYER));
    }

    #[test]
    fn shroud_the_map_forgets_everything() {
        let mut display = small_map();
        map_block(&mut display, 5, 5, 8, 8, PLAYER);
        display.shroud_the_map(PLAYER);
        assert_eq!(
            display.map.all_cells().filter(|(_, s)| s.is_mapped(PLAYER)).count(),
            0
        );
    }
}
