//! Box selection, the sell/repair/targeting modes, and picking which
//! selected object speaks for the group.

use tracing::{debug, info};

use crate::coord::Coordinate;
use crate::display::Display;
use crate::interaction::{InteractionMode, MouseShape, RubberBand};
use crate::layer::LayerKind;
use crate::object::{Action, ObjectId, Rtti, SpecialWeapon, TargetInfo, TypeKey};

/// Requested change to a toggleable mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeControl {
    Off,
    On,
    Toggle,
}

impl ModeControl {
    fn resolve(self, current: bool) -> bool {
        match self {
            ModeControl::Off => false,
            ModeControl::On => true,
            ModeControl::Toggle => !current,
        }
    }
}

impl Display {
    pub fn sell_mode_control(&mut self, control: ModeControl) {
        let current = matches!(self.interaction.mode, InteractionMode::Sell);
        self.switch_mode(control.resolve(current), current, InteractionMode::Sell);
    }

    pub fn repair_mode_control(&mut self, control: ModeControl) {
        let current = matches!(self.interaction.mode, InteractionMode::Repair);
        self.switch_mode(control.resolve(current), current, InteractionMode::Repair);
    }

    fn switch_mode(&mut self, wanted: bool, current: bool, mode: InteractionMode) {
        if wanted == current || self.interaction.mode.pending().is_some() {
            return;
        }
        self.interaction.teleport_unit = None;
        if wanted {
            info!(mode = ?mode, "mode_entered");
            self.interaction.mode = mode;
            self.interaction.band = RubberBand::Idle;
            self.unselect_all();
        } else {
            info!(mode = ?mode, "mode_left");
            self.interaction.mode = InteractionMode::Normal;
            self.interaction.mouse_shape = MouseShape::Normal;
        }
    }

    /// Arms a special weapon; the next left click picks its target cell.
    pub fn set_targeting(&mut self, weapon: SpecialWeapon) {
        self.clear_pending_placement();
        self.interaction.band = RubberBand::Idle;
        self.interaction.mode = InteractionMode::Targeting(weapon);
        info!(weapon = ?weapon, "targeting_started");
    }

    pub fn clear_targeting(&mut self) {
        if self.interaction.mode.targeting().is_none() {
            return;
        }
        self.interaction.mode = InteractionMode::Normal;
        self.interaction.teleport_unit = None;
        self.interaction.mouse_shape = MouseShape::Normal;
        info!("targeting_cleared");
    }

    /// Selects what lies inside the box spanned by two corners given in
    /// leptons relative to the tactical window.
    pub fn select_these(&mut self, corner1: Coordinate, corner2: Coordinate, additive: bool) {
        let origin = self.viewport.tactical_coord;
        let a = origin.add(corner1);
        let b = origin.add(corner2);
        let (x1, x2) = (a.x().min(b.x()), a.x().max(b.x()));
        let (y1, y2) = (a.y().min(b.y()), a.y().max(b.y()));
        let inside = |coord: Coordinate| {
            (x1..=x2).contains(&coord.x()) && (y1..=y2).contains(&coord.y())
        };

        if !additive {
            self.unselect_all();
        }

        let ground: Vec<ObjectId> = self.layers.layer(LayerKind::Ground).iter().collect();
        let aircraft: Vec<ObjectId> = self
            .objects
            .iter()
            .filter(|(_, object)| object.rtti() == Rtti::Aircraft)
            .map(|(id, _)| id)
            .collect();

        // Only the first player-controlled object swept up acknowledges.
        let mut allow_voice = true;
        for id in ground.into_iter().chain(aircraft) {
            let Some(object) = self.objects.get(id) else {
                continue;
            };
            if !object.class_of().selectable
                || object.rtti() == Rtti::Building
                || self.is_selected(id)
                || !inside(object.center_coord())
            {
                continue;
            }
            let player_controlled = self.houses.is_player_control(object.owner());
            if self.select_object(id, allow_voice && player_controlled) && player_controlled {
                allow_voice = false;
            }
        }

        let player_controlled: Vec<bool> = self
            .selected()
            .iter()
            .map(|id| self.is_player_controlled(*id))
            .collect();
        let any_player = player_controlled.iter().any(|controlled| *controlled);
        if any_player && player_controlled.iter().any(|controlled| !controlled) {
            let foreign: Vec<ObjectId> = self
                .selected()
                .iter()
                .copied()
                .filter(|id| !self.is_player_controlled(*id))
                .collect();
            for id in foreign {
                self.unselect_object(id);
            }
        }

        if !additive && any_player {
            let economy: Vec<ObjectId> = self
                .selected()
                .iter()
                .copied()
                .filter(|id| self.is_economy_unit(*id))
                .collect();
            if !economy.is_empty() && economy.len() < self.selected().len() {
                for id in economy {
                    self.unselect_object(id);
                }
            }
        }

        debug!(
            selected = self.selected().len(),
            additive,
            "box_selected"
        );
    }

    fn is_player_controlled(&self, id: ObjectId) -> bool {
        self.objects
            .get(id)
            .map(|object| self.houses.is_player_control(object.owner()))
            .unwrap_or(false)
    }

    fn is_economy_unit(&self, id: ObjectId) -> bool {
        self.objects
            .get(id)
            .map(|object| object.rtti() == Rtti::Unit && object.class_of().economy_unit)
            .unwrap_or(false)
    }

    /// Object among `candidates` whose reaction to `target` ranks highest.
    /// Only the first object of each type is asked; ties go to the earlier
    /// candidate.
    pub fn best_object_with_action(
        &self,
        candidates: &[ObjectId],
        target: &TargetInfo,
    ) -> Option<ObjectId> {
        let mut checked: Vec<TypeKey> = Vec::new();
        let mut best: Option<(ObjectId, usize)> = None;
        for id in candidates {
            let Some(object) = self.objects.get(*id) else {
                continue;
            };
            let key = object.class_of().key;
            if checked.contains(&key) {
                continue;
            }
            checked.push(key);
            let priority = object.what_action(target).priority();
            if best.map(|(_, current)| priority < current).unwrap_or(true) {
                best = Some((*id, priority));
                if priority == 0 {
                    break;
                }
            }
        }
        best.map(|(id, _)| id)
    }

    /// What a click on `target` would make the current selection do.
    pub fn best_object_action(&self, target: &TargetInfo) -> Action {
        self.best_object_with_action(self.selected(), target)
            .and_then(|id| self.objects.get(id))
            .map(|object| object.what_action(target))
            .unwrap_or(Action::None)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;
    use std::sync::Arc;

    use super::*;
    use crate::coord::{Cell, CELL_LEPTON_W};
    use crate::house::HouseId;
    use crate::object::ObjectType;
    use crate::testkit::{display_with_view, spawn, unit_type, TestUnit};

    const PLAYER: HouseId = HouseId(0);
    const ENEMY: HouseId = HouseId(1);

    fn box_of_cells(cells: i32) -> (Coordinate, Coordinate) {
        (
            Coordinate::from_xy(0, 0),
            Coordinate::from_xy(cells * CELL_LEPTON_W, cells * CELL_LEPTON_W),
        )
    }

    #[test]
    fn box_selects_units_inside_but_not_buildings() {
        let mut display = display_with_view();
        let inside = spawn(&mut display, TestUnit::tank(PLAYER, Cell::from_xy(3, 3)));
        let outside = spawn(&mut display, TestUnit::tank(PLAYER, Cell::from_xy(12, 3)));
        let base = spawn(&mut display, TestUnit::building(PLAYER, Cell::from_xy(2, 2)));
        let (a, b) = box_of_cells(5);
        display.select_these(b, a, false);
        assert_eq!(display.selected(), &[inside]);
        assert!(!display.is_selected(outside));
        assert!(!display.is_selected(base));
    }

    #[test]
    fn only_first_player_unit_acknowledges() {
        let mut display = display_with_view();
        let first = TestUnit::tank(PLAYER, Cell::from_xy(2, 2));
        let second = TestUnit::tank(PLAYER, Cell::from_xy(3, 2));
        let voiced = [first.voiced.clone(), second.voiced.clone()];
        spawn(&mut display, first);
        spawn(&mut display, second);
        let (a, b) = box_of_cells(5);
        display.select_these(a, b, false);
        assert_eq!(voiced[0].borrow().as_slice(), &[true]);
        assert_eq!(voiced[1].borrow().as_slice(), &[false]);
    }

    #[test]
    fn mixed_ownership_keeps_only_player_units() {
        let mut display = display_with_view();
        let enemy = TestUnit::tank(ENEMY, Cell::from_xy(2, 2));
        let enemy_voice = enemy.voiced.clone();
        let enemy = spawn(&mut display, enemy);
        let own = spawn(&mut display, TestUnit::tank(PLAYER, Cell::from_xy(3, 3)));
        let (a, b) = box_of_cells(5);
        display.select_these(a, b, false);
        assert_eq!(display.selected(), &[own]);
        assert!(!display.is_selected(enemy));
        assert_eq!(enemy_voice.borrow().as_slice(), &[false]);
    }

    #[test]
    fn enemy_only_box_keeps_enemies() {
        let mut display = display_with_view();
        let enemy = spawn(&mut display, TestUnit::tank(ENEMY, Cell::from_xy(2, 2)));
        let (a, b) = box_of_cells(5);
        display.select_these(a, b, false);
        assert_eq!(display.selected(), &[enemy]);
    }

    #[test]
    fn harvesters_drop_out_of_mixed_boxes() {
        let mut display = display_with_view();
        let harvester = spawn(&mut display, TestUnit::harvester(PLAYER, Cell::from_xy(2, 2)));
        let tank = spawn(&mut display, TestUnit::tank(PLAYER, Cell::from_xy(3, 3)));
        let (a, b) = box_of_cells(5);
        display.select_these(a, b, false);
        assert_eq!(display.selected(), &[tank]);

        display.unselect_all();
        display.select_these(a, Coordinate::from_xy(2 * CELL_LEPTON_W, 2 * CELL_LEPTON_W), false);
        assert_eq!(display.selected(), &[harvester]);

        display.select_these(a, b, true);
        assert!(display.is_selected(harvester));
        assert!(display.is_selected(tank));
    }

    #[test]
    fn aircraft_outside_ground_layer_are_boxed() {
        let mut display = display_with_view();
        let plane = display.add_object(
            Box::new(TestUnit::aircraft(PLAYER, Cell::from_xy(4, 4))),
            LayerKind::Air,
        );
        let (a, b) = box_of_cells(5);
        display.select_these(a, b, false);
        assert_eq!(display.selected(), &[plane]);
    }

    #[test]
    fn sell_and_repair_modes_exclude_each_other() {
        let mut display = display_with_view();
        let tank = spawn(&mut display, TestUnit::tank(PLAYER, Cell::from_xy(3, 3)));
        display.select_object(tank, false);
        display.sell_mode_control(ModeControl::On);
        assert!(matches!(display.interaction.mode, InteractionMode::Sell));
        assert!(display.selected().is_empty());

        display.repair_mode_control(ModeControl::Toggle);
        assert!(matches!(display.interaction.mode, InteractionMode::Repair));
        display.sell_mode_control(ModeControl::Off);
        assert!(matches!(display.interaction.mode, InteractionMode::Repair));
        display.repair_mode_control(ModeControl::Toggle);
        assert!(display.interaction.mode.is_normal());
        assert_eq!(display.interaction.mouse_shape, MouseShape::Normal);
    }

    #[test]
    fn modes_are_locked_while_placing() {
        let mut display = display_with_view();
        display.set_pending_placement(Arc::new(unit_type(Rtti::Building)), PLAYER);
        display.sell_mode_control(ModeControl::On);
        assert!(display.interaction.mode.pending().is_some());
    }

    #[test]
    fn targeting_replaces_placement_and_clears_back_to_normal() {
        let mut display = display_with_view();
        display.set_pending_placement(Arc::new(unit_type(Rtti::Building)), PLAYER);
        display.set_targeting(SpecialWeapon::ParaBomb);
        assert_eq!(
            display.interaction.mode.targeting(),
            Some(SpecialWeapon::ParaBomb)
        );
        assert!(display.interaction.cursor_footprint.is_none());
        display.clear_targeting();
        assert!(display.interaction.mode.is_normal());
    }

    #[test]
    fn best_action_prefers_attack_and_asks_each_type_once() {
        let mut display = display_with_view();
        let mut rifle = TestUnit::infantry(PLAYER, Cell::from_xy(3, 3));
        rifle.versus_enemy = Action::Move;
        let rifle = spawn(&mut display, rifle);
        let mut second_rifle = TestUnit::infantry(PLAYER, Cell::from_xy(4, 3));
        second_rifle.versus_enemy = Action::Attack;
        let second_rifle = spawn(&mut display, second_rifle);
        let tank = spawn(&mut display, TestUnit::tank(PLAYER, Cell::from_xy(5, 3)));
        let enemy = spawn(&mut display, TestUnit::tank(ENEMY, Cell::from_xy(9, 9)));
        let target = display.target_info(enemy).expect("enemy");

        let candidates = [rifle, second_rifle, tank];
        assert_eq!(display.best_object_with_action(&candidates, &target), Some(tank));
        assert_eq!(display.best_object_with_action(&[], &target), None);

        for id in candidates {
            display.select_object(id, false);
        }
        assert_eq!(display.best_object_action(&target), Action::Attack);
    }

    #[test]
    fn best_action_picks_attack_in_either_order_and_stops_at_attack() {
        let mut display = display_with_view();
        let mut rifle = TestUnit::infantry(PLAYER, Cell::from_xy(3, 3));
        rifle.versus_enemy = Action::Move;
        let rifle_asked = Rc::clone(&rifle.asked);
        let rifle = spawn(&mut display, rifle);
        let tank = TestUnit::tank(PLAYER, Cell::from_xy(4, 3));
        let tank_asked = Rc::clone(&tank.asked);
        let tank = spawn(&mut display, tank);
        let enemy = spawn(&mut display, TestUnit::tank(ENEMY, Cell::from_xy(9, 9)));
        let target = display.target_info(enemy).expect("enemy");

        assert_eq!(display.best_object_with_action(&[rifle, tank], &target), Some(tank));
        assert_eq!((*rifle_asked.borrow(), *tank_asked.borrow()), (1, 1));

        *rifle_asked.borrow_mut() = 0;
        *tank_asked.borrow_mut() = 0;
        assert_eq!(display.best_object_with_action(&[tank, rifle], &target), Some(tank));
        assert_eq!(*tank_asked.borrow(), 1);
        assert_eq!(*rifle_asked.borrow(), 0);
    }

    #[test]
    fn best_action_ties_go_to_first_candidate() {
        let mut display = display_with_view();
        let tank = spawn(&mut display, TestUnit::tank(PLAYER, Cell::from_xy(3, 3)));
        let heli_kind = ObjectType {
            key: TypeKey(40),
            ..unit_type(Rtti::Aircraft)
        };
        let heli = spawn(
            &mut display,
            TestUnit::of_type(heli_kind, PLAYER, Cell::from_xy(4, 3)),
        );
        let cell = TargetInfo::cell(Cell::from_xy(10, 10));
        assert_eq!(display.best_object_with_action(&[heli, tank], &cell), Some(heli));
        assert_eq!(display.best_object_action(&cell), Action::None);
    }
}
