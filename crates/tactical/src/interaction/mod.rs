//! Mouse-driven interaction with the tactical map.
//!
//! One [`InteractionMode`] is active at a time. The rubber band is a sub-state
//! of normal mode and is reset whenever another mode is entered.

mod mouse;
mod placement;
mod selection;

use bitflags::bitflags;

use crate::coord::{Cell, Footprint};
use crate::house::HouseId;
use crate::object::{Action, ObjectId, SpecialWeapon, TypeRef};

pub use selection::ModeControl;

bitflags! {
    /// Input events delivered with one call to the tactical map handler.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct KeyFlags: u16 {
        const LEFT_PRESS = 1 << 0;
        const LEFT_HELD = 1 << 1;
        const LEFT_RELEASE = 1 << 2;
        const LEFT_UP = 1 << 3;
        const RIGHT_PRESS = 1 << 4;
        const RIGHT_HELD = 1 << 5;
        const RIGHT_RELEASE = 1 << 6;
        const RIGHT_UP = 1 << 7;
    }
}

impl KeyFlags {
    /// Events that carry the mouse position captured with the button change.
    pub const BUTTON_EDGES: KeyFlags = KeyFlags::LEFT_PRESS
        .union(KeyFlags::LEFT_RELEASE)
        .union(KeyFlags::RIGHT_PRESS)
        .union(KeyFlags::RIGHT_RELEASE);
}

/// Object type waiting to be placed, and who is placing it.
#[derive(Debug, Clone)]
pub struct PendingPlacement {
    pub kind: TypeRef,
    pub house: HouseId,
}

#[derive(Debug, Clone, Default)]
pub enum InteractionMode {
    #[default]
    Normal,
    Repair,
    Sell,
    Targeting(SpecialWeapon),
    Placement(PendingPlacement),
}

impl InteractionMode {
    pub fn is_normal(&self) -> bool {
        matches!(self, InteractionMode::Normal)
    }

    pub fn pending(&self) -> Option<&PendingPlacement> {
        match self {
            InteractionMode::Placement(pending) => Some(pending),
            _ => None,
        }
    }

    pub fn targeting(&self) -> Option<SpecialWeapon> {
        match self {
            InteractionMode::Targeting(weapon) => Some(*weapon),
            _ => None,
        }
    }
}

/// Pixel offsets are relative to the tactical window origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RubberBand {
    #[default]
    Idle,
    /// Button down, not yet dragged far enough to count as a box.
    Tentative { x: i32, y: i32 },
    Active { start: (i32, i32), end: (i32, i32) },
}

impl RubberBand {
    pub fn is_active(&self) -> bool {
        matches!(self, RubberBand::Active { .. })
    }

    pub fn is_tentative(&self) -> bool {
        matches!(self, RubberBand::Tentative { .. })
    }
}

/// Drag distance, in pixels on either axis, that turns a press into a box.
pub const BAND_THRESHOLD: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseShape {
    #[default]
    Normal,
    NoMove,
    CanMove,
    Enter,
    Deploy,
    CanSelect,
    CanAttack,
    SellBack,
    SellUnit,
    Repair,
    NoRepair,
    NoSellBack,
    NuclearBomb,
    AirStrike,
    Demolitions,
    AreaGuard,
    Heal,
    Damage,
    GroundRepair,
    StayAttack,
    NoDeploy,
    NoEnter,
    NoGroundRepair,
    ChronoSelect,
    ChronoDest,
}

/// Cursor for an action over shrouded ground. Most specific actions collapse
/// so the cursor never hints at what the shroud hides.
pub fn shadowed_cursor(action: Action, all_selected_are_aircraft: Option<bool>) -> MouseShape {
    match action {
        Action::NoDeploy => MouseShape::NoDeploy,
        Action::NoEnter => MouseShape::NoEnter,
        Action::NoGroundRepair => MouseShape::NoGroundRepair,
        Action::Damage | Action::GroundRepair | Action::None => MouseShape::Normal,
        Action::GuardArea => MouseShape::AreaGuard,
        Action::NoSell | Action::Sell | Action::SellUnit => MouseShape::NoSellBack,
        Action::NoRepair | Action::Repair => MouseShape::NoRepair,
        Action::NukeBomb => MouseShape::NuclearBomb,
        Action::AirStrike
        | Action::ParaBomb
        | Action::ParaInfantry
        | Action::SpyMission
        | Action::IronCurtain => MouseShape::AirStrike,
        Action::Chronosphere => MouseShape::ChronoSelect,
        Action::Chrono2 => MouseShape::ChronoDest,
        Action::Heal => MouseShape::Heal,
        Action::NoMove => match all_selected_are_aircraft {
            Some(true) => MouseShape::NoMove,
            _ => MouseShape::CanMove,
        },
        _ => MouseShape::CanMove,
    }
}

/// Cursor for an action over mapped ground. `stay_attack` is whether the
/// lone selected object can already hit the target from where it stands.
pub fn visible_cursor(action: Action, stay_attack: bool) -> MouseShape {
    match action {
        Action::NoDeploy => MouseShape::NoDeploy,
        Action::NoEnter => MouseShape::NoEnter,
        Action::NoGroundRepair => MouseShape::NoGroundRepair,
        Action::Damage => MouseShape::Damage,
        Action::GroundRepair => MouseShape::GroundRepair,
        Action::ToggleSelect | Action::Select => MouseShape::CanSelect,
        Action::Move => MouseShape::CanMove,
        Action::GuardArea => MouseShape::AreaGuard,
        Action::Attack if stay_attack => MouseShape::StayAttack,
        Action::Attack | Action::Harvest => MouseShape::CanAttack,
        Action::Sabotage => MouseShape::Demolitions,
        Action::Enter | Action::Capture => MouseShape::Enter,
        Action::NoMove => MouseShape::NoMove,
        Action::NoSell => MouseShape::NoSellBack,
        Action::NoRepair => MouseShape::NoRepair,
        Action::SelfAction | Action::TogglePrimary => MouseShape::Deploy,
        Action::Repair => MouseShape::Repair,
        Action::SellUnit => MouseShape::SellUnit,
        Action::Sell => MouseShape::SellBack,
        Action::NukeBomb => MouseShape::NuclearBomb,
        Action::AirStrike
        | Action::ParaBomb
        | Action::ParaInfantry
        | Action::SpyMission
        | Action::IronCurtain => MouseShape::AirStrike,
        Action::Chronosphere => MouseShape::ChronoSelect,
        Action::Chrono2 => MouseShape::ChronoDest,
        Action::Heal => MouseShape::Heal,
        _ => MouseShape::Normal,
    }
}

/// Everything the tactical map remembers between input events.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    pub mode: InteractionMode,
    pub band: RubberBand,
    /// Cell under the placement cursor.
    pub zone_cell: Option<Cell>,
    /// Added to `zone_cell` to find the footprint's anchor cell.
    pub zone_offset: i32,
    pub cursor_footprint: Option<Footprint>,
    /// Cached proximity result for the cursor's current position.
    pub proximity_ok: bool,
    /// Proximity result of the last check made on behalf of the local player.
    pub passed_proximity: bool,
    pub mouse_shape: MouseShape,
    /// Object chosen in the first chronosphere step.
    pub teleport_unit: Option<ObjectId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shadow_hides_attack_intent() {
        assert_eq!(shadowed_cursor(Action::Attack, None), MouseShape::CanMove);
        assert_eq!(shadowed_cursor(Action::Damage, None), MouseShape::Normal);
        assert_eq!(visible_cursor(Action::Attack, false), MouseShape::CanAttack);
        assert_eq!(visible_cursor(Action::Attack, true), MouseShape::StayAttack);
    }

    #[test]
    fn shadowed_no_move_depends_on_aircraft_only_selection() {
        assert_eq!(shadowed_cursor(Action::NoMove, Some(true)), MouseShape::NoMove);
        assert_eq!(shadowed_cursor(Action::NoMove, Some(false)), MouseShape::CanMove);
        assert_eq!(shadowed_cursor(Action::NoMove, None), MouseShape::CanMove);
    }

    #[test]
    fn sell_cursors_differ_by_shadow() {
        assert_eq!(shadowed_cursor(Action::Sell, None), MouseShape::NoSellBack);
        assert_eq!(visible_cursor(Action::Sell, false), MouseShape::SellBack);
        assert_eq!(visible_cursor(Action::SellUnit, false), MouseShape::SellUnit);
    }

    #[test]
    fn special_weapons_share_cursors_in_both_tables() {
        for action in [Action::ParaBomb, Action::SpyMission, Action::IronCurtain] {
            assert_eq!(shadowed_cursor(action, None), MouseShape::AirStrike);
            assert_eq!(visible_cursor(action, false), MouseShape::AirStrike);
        }
        assert_eq!(visible_cursor(Action::Chrono2, false), MouseShape::ChronoDest);
        assert_eq!(visible_cursor(Action::GuardArea, false), MouseShape::AreaGuard);
        assert_eq!(visible_cursor(Action::ParaSaboteur, false), MouseShape::Normal);
    }

    #[test]
    fn band_state_queries() {
        assert!(RubberBand::Tentative { x: 1, y: 2 }.is_tentative());
        assert!(RubberBand::Active {
            start: (0, 0),
            end: (9, 9)
        }
        .is_active());
        assert!(!RubberBand::Idle.is_active());
    }
}
