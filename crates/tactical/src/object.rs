//! Interface to the game objects the display draws and commands.
//!
//! Unit behaviour, combat and type catalogues live outside this crate. The
//! display only sees objects through [`TacticalObject`], stores them in an
//! [`ObjectPool`], and refers to them by [`ObjectId`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::coord::{Cell, Coordinate, Footprint};
use crate::house::HouseId;
use crate::rendering::Canvas;

/// Group number of an object that belongs to no team.
pub const NO_GROUP: u8 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rtti {
    Infantry,
    Unit,
    Vessel,
    Aircraft,
    Building,
    Terrain,
    Overlay,
    Animation,
    Bullet,
}

impl Rtti {
    pub fn is_techno(self) -> bool {
        matches!(
            self,
            Rtti::Infantry | Rtti::Unit | Rtti::Vessel | Rtti::Aircraft | Rtti::Building
        )
    }

    /// Objects that move under their own power.
    pub fn is_foot(self) -> bool {
        matches!(self, Rtti::Infantry | Rtti::Unit | Rtti::Vessel | Rtti::Aircraft)
    }
}

/// Identity of an object type. Objects of the same type answer every
/// action query identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeKey(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    None,
    Move,
    NoMove,
    Enter,
    SelfAction,
    Attack,
    Harvest,
    Select,
    ToggleSelect,
    Capture,
    Repair,
    Sell,
    SellUnit,
    NoSell,
    NoRepair,
    Sabotage,
    ParaBomb,
    ParaInfantry,
    ParaSaboteur,
    NukeBomb,
    AirStrike,
    Chronosphere,
    Chrono2,
    IronCurtain,
    SpyMission,
    GuardArea,
    Heal,
    Damage,
    GroundRepair,
    NoDeploy,
    NoEnter,
    NoGroundRepair,
    TogglePrimary,
}

impl Action {
    const PRIORITY: [Action; 7] = [
        Action::Attack,
        Action::Enter,
        Action::Heal,
        Action::Repair,
        Action::Sabotage,
        Action::Capture,
        Action::Move,
    ];

    /// Rank used when several objects propose different actions; lower wins.
    pub fn priority(self) -> usize {
        Self::PRIORITY
            .iter()
            .position(|candidate| *candidate == self)
            .unwrap_or(Self::PRIORITY.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialWeapon {
    NuclearBomb,
    ParaBomb,
    ParaInfantry,
    SpyMission,
    IronCurtain,
    /// Pick the object to teleport.
    Chronosphere,
    /// Pick where the chosen object goes.
    Chrono2,
}

impl SpecialWeapon {
    pub fn action(self) -> Action {
        match self {
            SpecialWeapon::NuclearBomb => Action::NukeBomb,
            SpecialWeapon::ParaBomb => Action::ParaBomb,
            SpecialWeapon::ParaInfantry => Action::ParaInfantry,
            SpecialWeapon::SpyMission => Action::SpyMission,
            SpecialWeapon::IronCurtain => Action::IronCurtain,
            SpecialWeapon::Chronosphere => Action::Chronosphere,
            SpecialWeapon::Chrono2 => Action::Chrono2,
        }
    }

    pub fn from_action(action: Action) -> Option<SpecialWeapon> {
        match action {
            Action::NukeBomb => Some(SpecialWeapon::NuclearBomb),
            Action::ParaBomb => Some(SpecialWeapon::ParaBomb),
            Action::ParaInfantry => Some(SpecialWeapon::ParaInfantry),
            Action::SpyMission => Some(SpecialWeapon::SpyMission),
            Action::IronCurtain => Some(SpecialWeapon::IronCurtain),
            Action::Chronosphere => Some(SpecialWeapon::Chronosphere),
            Action::Chrono2 => Some(SpecialWeapon::Chrono2),
            _ => None,
        }
    }
}

/// Static description shared by every object of one type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectType {
    pub key: TypeKey,
    pub name: String,
    pub rtti: Rtti,
    #[serde(default = "default_true")]
    pub selectable: bool,
    #[serde(default)]
    pub is_wall: bool,
    /// Counts as part of the owner's base for placement adjacency.
    #[serde(default)]
    pub is_base: bool,
    /// How far from the base a new building of this type may go, in cells.
    #[serde(default = "default_adjacent")]
    pub adjacent: i32,
    /// Harvesters and construction vehicles; dropped from mixed box selections.
    #[serde(default)]
    pub economy_unit: bool,
    /// Buildings that share their sight with allied houses.
    #[serde(default)]
    pub ally_reveal: bool,
    #[serde(default = "default_sight")]
    pub sight_range: i32,
    #[serde(default)]
    pub max_speed: i32,
    #[serde(default)]
    pub footprint: Footprint,
    /// Cells drawn over but not occupied, relative to the anchor cell.
    #[serde(default)]
    pub overlap: Footprint,
}

fn default_true() -> bool {
    true
}

fn default_adjacent() -> i32 {
    1
}

fn default_sight() -> i32 {
    2
}

impl ObjectType {
    pub fn new(key: TypeKey, name: impl Into<String>, rtti: Rtti) -> Self {
        Self {
            key,
            name: name.into(),
            rtti,
            selectable: true,
            is_wall: false,
            is_base: false,
            adjacent: default_adjacent(),
            economy_unit: false,
            ally_reveal: false,
            sight_range: default_sight(),
            max_speed: 0,
            footprint: Footprint::new(vec![0]),
            overlap: Footprint::default(),
        }
    }

    pub fn is_building(&self) -> bool {
        self.rtti == Rtti::Building
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Object(ObjectId),
    Cell(Cell),
}

/// What an object sees when asked how it would react to a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetInfo {
    pub target: Target,
    pub coord: Coordinate,
    pub owner: Option<HouseId>,
    pub rtti: Option<Rtti>,
    pub type_key: Option<TypeKey>,
}

impl TargetInfo {
    pub fn cell(cell: Cell) -> Self {
        Self {
            target: Target::Cell(cell),
            coord: cell.coord(),
            owner: None,
            rtti: None,
            type_key: None,
        }
    }

    pub fn target_cell(&self) -> Cell {
        self.coord.cell()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormationMove {
    pub group: u8,
    /// Slowest member's top speed; the whole formation moves at it.
    pub max_speed: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickContext {
    pub allow_voice: bool,
    pub formation: Option<FormationMove>,
}

pub trait TacticalObject: fmt::Debug {
    fn class_of(&self) -> &ObjectType;
    fn owner(&self) -> HouseId;
    /// Anchor coordinate (upper left cell for buildings).
    fn coord(&self) -> Coordinate;

    fn rtti(&self) -> Rtti {
        self.class_of().rtti
    }

    fn center_coord(&self) -> Coordinate {
        self.coord()
    }

    fn sort_y(&self) -> i32 {
        self.center_coord().y()
    }

    /// Altitude in leptons; non-zero only for airborne objects.
    fn height(&self) -> i32 {
        0
    }

    fn is_active(&self) -> bool {
        true
    }

    fn is_in_limbo(&self) -> bool {
        false
    }

    fn is_cloaked(&self) -> bool {
        false
    }

    fn is_discovered_by(&self, _house: HouseId) -> bool {
        true
    }

    fn can_repair(&self) -> bool {
        false
    }

    fn can_demolish(&self) -> bool {
        false
    }

    fn can_teleport_here(&self, _cell: Cell) -> bool {
        false
    }

    fn in_range_of(&self, _target: &TargetInfo) -> bool {
        false
    }

    fn group(&self) -> u8 {
        NO_GROUP
    }

    fn has_formation_offset(&self) -> bool {
        false
    }

    fn max_speed(&self) -> i32 {
        self.class_of().max_speed
    }

    /// Destination that keeps this object's place in its formation.
    fn adjust_dest(&self, cell: Cell) -> Cell {
        cell
    }

    fn what_action(&self, target: &TargetInfo) -> Action;

    /// Returns false when the object refuses to become selected.
    fn select(&mut self, _allow_voice: bool) -> bool {
        true
    }

    fn unselect(&mut self) {}

    fn active_click_with(&mut self, action: Action, target: Target, context: &ClickContext);

    /// The object's screen image is stale and must be redrawn.
    fn mark_changed(&mut self) {}

    fn revealed(&mut self, _house: HouseId) {}

    /// Draws at the given absolute pixel position. Called every frame that
    /// draws; `forced` is set on a full repaint.
    fn render(&mut self, canvas: &mut Canvas<'_>, x: i32, y: i32, forced: bool);
}

/// Owner of every object the display knows about. Ids are handed out in
/// increasing order and never reused, so an order still naming a removed
/// object cannot reach one added later.
#[derive(Debug, Default)]
pub struct ObjectPool {
    objects: BTreeMap<ObjectId, Box<dyn TacticalObject>>,
    next: u32,
}

impl ObjectPool {
    pub fn insert(&mut self, object: Box<dyn TacticalObject>) -> ObjectId {
        let id = ObjectId(self.next);
        self.next = self.next.saturating_add(1);
        self.objects.insert(id, object);
        id
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<Box<dyn TacticalObject>> {
        self.objects.remove(&id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&dyn TacticalObject> {
        self.objects.get(&id).map(|object| object.as_ref())
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut (dyn TacticalObject + 'static)> {
        self.objects.get_mut(&id).map(|object| object.as_mut())
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &dyn TacticalObject)> {
        self.objects
            .iter()
            .map(|(id, object)| (*id, object.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Drops every object. The id counter keeps running.
    pub fn clear(&mut self) {
        self.objects.clear();
    }
}

/// Shared type handle; one allocation per type, cloned into each object.
pub type TypeRef = Arc<ObjectType>;
