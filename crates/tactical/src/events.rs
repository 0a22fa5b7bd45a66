use crate::coord::Cell;
use crate::object::{ObjectId, Rtti, SpecialWeapon, TypeKey};

/// Orders produced by the tactical view for the game layer to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutgoingEvent {
    Place { rtti: Rtti, kind: TypeKey, cell: Cell },
    Sell(ObjectId),
    /// Sell whatever sellable overlay lies in the cell (walls).
    SellCell(Cell),
    Repair(ObjectId),
    SpecialPlace { weapon: SpecialWeapon, cell: Cell },
}

/// Voice cues requested by the tactical view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speech {
    /// "Cannot deploy here."
    Deploy,
}
