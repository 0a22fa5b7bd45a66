//! Fixtures shared by the unit tests of several modules.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::coord::{Cell, Coordinate, Footprint};
use crate::display::Display;
use crate::house::{House, HouseId};
use crate::layer::LayerKind;
use crate::object::{
    Action, ClickContext, ObjectId, ObjectType, Rtti, TacticalObject, Target, TargetInfo, TypeKey,
    TypeRef, NO_GROUP,
};
use crate::rendering::{house_color, Canvas};

pub type ClickLog = Rc<RefCell<Vec<(String, Action, Target, ClickContext)>>>;

pub fn unit_type(rtti: Rtti) -> ObjectType {
    match rtti {
        Rtti::Infantry => ObjectType {
            max_speed: 4,
            ..ObjectType::new(TypeKey(1), "rifle", rtti)
        },
        Rtti::Building => ObjectType {
            is_base: true,
            sight_range: 3,
            footprint: Footprint::rectangle(2, 2),
            ..ObjectType::new(TypeKey(5), "yard", rtti)
        },
        Rtti::Aircraft => ObjectType {
            max_speed: 40,
            ..ObjectType::new(TypeKey(4), "heli", rtti)
        },
        _ => ObjectType {
            max_speed: 10,
            ..ObjectType::new(TypeKey(2), "tank", rtti)
        },
    }
}

pub fn harvester_type() -> ObjectType {
    ObjectType {
        economy_unit: true,
        max_speed: 6,
        ..ObjectType::new(TypeKey(3), "harv", Rtti::Unit)
    }
}

#[derive(Debug)]
pub struct TestUnit {
    pub name: String,
    pub kind: TypeRef,
    pub owner: HouseId,
    pub coord: Coordinate,
    pub cloaked: bool,
    pub height: i32,
    pub refuse_select: bool,
    pub limbo: bool,
    pub group: u8,
    pub formation_offset: bool,
    pub in_range: bool,
    pub can_repair: bool,
    pub can_demolish: bool,
    pub can_teleport: bool,
    /// Reaction to an enemy object; friends are selected, cells moved to.
    pub versus_enemy: Action,
    pub versus_cell: Action,
    pub log: Option<ClickLog>,
    pub reveals: Rc<RefCell<Vec<HouseId>>>,
    /// `allow_voice` of every successful select call.
    pub voiced: Rc<RefCell<Vec<bool>>>,
    pub changed: Rc<RefCell<u32>>,
    /// Number of `what_action` calls.
    pub asked: Rc<RefCell<u32>>,
}

impl TestUnit {
    pub fn of_type(kind: ObjectType, owner: HouseId, cell: Cell) -> Self {
        let coord = if kind.rtti == Rtti::Building {
            cell.whole_coord()
        } else {
            cell.coord()
        };
        Self {
            name: kind.name.clone(),
            kind: Arc::new(kind),
            owner,
            coord,
            cloaked: false,
            height: 0,
            refuse_select: false,
            limbo: false,
            group: NO_GROUP,
            formation_offset: false,
            in_range: false,
            can_repair: false,
            can_demolish: false,
            can_teleport: false,
            versus_enemy: Action::Attack,
            versus_cell: Action::Move,
            log: None,
            reveals: Rc::default(),
            voiced: Rc::default(),
            changed: Rc::default(),
            asked: Rc::default(),
        }
    }

    pub fn tank(owner: HouseId, cell: Cell) -> Self {
        Self::of_type(unit_type(Rtti::Unit), owner, cell)
    }

    pub fn infantry(owner: HouseId, cell: Cell) -> Self {
        Self::of_type(unit_type(Rtti::Infantry), owner, cell)
    }

    pub fn aircraft(owner: HouseId, cell: Cell) -> Self {
        Self::of_type(unit_type(Rtti::Aircraft), owner, cell)
    }

    pub fn building(owner: HouseId, cell: Cell) -> Self {
        Self::of_type(unit_type(Rtti::Building), owner, cell)
    }

    pub fn harvester(owner: HouseId, cell: Cell) -> Self {
        Self::of_type(harvester_type(), owner, cell)
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn logging(mut self, log: &ClickLog) -> Self {
        self.log = Some(Rc::clone(log));
        self
    }
}

impl TacticalObject for TestUnit {
    fn class_of(&self) -> &ObjectType {
        &self.kind
    }

    fn owner(&self) -> HouseId {
        self.owner
    }

    fn coord(&self) -> Coordinate {
        self.coord
    }

    fn center_coord(&self) -> Coordinate {
        if self.kind.rtti != Rtti::Building {
            return self.coord;
        }
        let (w, h) = self.kind.footprint.dimensions();
        self.coord.add(Coordinate::from_xy(w * 128, h * 128))
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn is_in_limbo(&self) -> bool {
        self.limbo
    }

    fn is_cloaked(&self) -> bool {
        self.cloaked
    }

    fn can_repair(&self) -> bool {
        self.can_repair
    }

    fn can_demolish(&self) -> bool {
        self.can_demolish
    }

    fn can_teleport_here(&self, _cell: Cell) -> bool {
        self.can_teleport
    }

    fn in_range_of(&self, _target: &TargetInfo) -> bool {
        self.in_range
    }

    fn group(&self) -> u8 {
        self.group
    }

    fn has_formation_offset(&self) -> bool {
        self.formation_offset
    }

    fn adjust_dest(&self, cell: Cell) -> Cell {
        if self.formation_offset {
            cell.offset(1)
        } else {
            cell
        }
    }

    fn what_action(&self, target: &TargetInfo) -> Action {
        *self.asked.borrow_mut() += 1;
        match (target.target, target.owner) {
            (Target::Object(_), Some(owner)) if owner == self.owner => Action::Select,
            (Target::Object(_), _) => self.versus_enemy,
            (Target::Cell(_), _) => self.versus_cell,
        }
    }

    fn select(&mut self, allow_voice: bool) -> bool {
        if self.refuse_select {
            return false;
        }
        self.voiced.borrow_mut().push(allow_voice);
        true
    }

    fn active_click_with(&mut self, action: Action, target: Target, context: &ClickContext) {
        if let Some(log) = &self.log {
            log.borrow_mut()
                .push((self.name.clone(), action, target, *context));
        }
    }

    fn mark_changed(&mut self) {
        *self.changed.borrow_mut() += 1;
    }

    fn revealed(&mut self, house: HouseId) {
        self.reveals.borrow_mut().push(house);
    }

    fn render(&mut self, canvas: &mut Canvas<'_>, x: i32, y: i32, _forced: bool) {
        canvas.fill_rect(x + 8, y + 8, 8, 8, house_color(self.owner.0));
    }
}

/// Two houses, the human player as house 0, a 20 x 15 cell window at the
/// screen origin looking at the map's upper left corner.
pub fn display_with_view() -> Display {
    let mut display = Display::new(House::human(HouseId(0), "Greece"), 640, 480);
    display.houses.add(House::new(HouseId(1), "USSR"));
    display.set_view_dimensions(0, 0, Some(20), Some(15));
    display.redraw.clear();
    display
}

pub fn spawn(display: &mut Display, unit: TestUnit) -> ObjectId {
    display.add_object(Box::new(unit), LayerKind::Ground)
}
