use serde::{Deserialize, Serialize};

pub const MAX_HOUSES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HouseId(pub u8);

impl HouseId {
    fn bit(self) -> u32 {
        1u32 << (self.0 as u32 % MAX_HOUSES as u32)
    }
}

/// Compact set of houses, one bit per house id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HouseSet(u32);

impl HouseSet {
    pub const EMPTY: HouseSet = HouseSet(0);

    pub fn contains(self, house: HouseId) -> bool {
        self.0 & house.bit() != 0
    }

    pub fn insert(&mut self, house: HouseId) {
        self.0 |= house.bit();
    }

    pub fn remove(&mut self, house: HouseId) {
        self.0 &= !house.bit();
    }

    pub fn with(mut self, house: HouseId) -> Self {
        self.insert(house);
        self
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = HouseId> {
        (0..MAX_HOUSES as u8)
            .map(HouseId)
            .filter(move |house| self.contains(*house))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct House {
    pub id: HouseId,
    pub name: String,
    pub is_human: bool,
    /// Controlled by a local or remote player rather than by the AI.
    pub player_control: bool,
    pub is_active: bool,
    pub allies: HouseSet,
    /// Houses that have infiltrated this house's radar and see what it sees.
    pub radar_spied: HouseSet,
    pub gps_active: bool,
}

impl House {
    pub fn new(id: HouseId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_human: false,
            player_control: false,
            is_active: true,
            allies: HouseSet::EMPTY,
            radar_spied: HouseSet::EMPTY,
            gps_active: false,
        }
    }

    pub fn human(id: HouseId, name: impl Into<String>) -> Self {
        Self {
            is_human: true,
            player_control: true,
            ..Self::new(id, name)
        }
    }

    pub fn is_ally(&self, other: HouseId) -> bool {
        self.id == other || self.allies.contains(other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    /// Single player campaign.
    #[default]
    Normal,
    Skirmish,
    /// Peer-to-peer multiplayer.
    Network,
    /// Authoritative server with every human tracked independently.
    ClientServer,
}

impl SessionKind {
    pub fn is_client_server(self) -> bool {
        self == SessionKind::ClientServer
    }

    /// Sessions that historically capped the playable area at 96 x 96 cells.
    pub fn has_legacy_map_limit(self) -> bool {
        self == SessionKind::Network
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub kind: SessionKind,
    pub share_ally_visibility: bool,
    /// Human participants, in join order.
    pub players: Vec<HouseId>,
}

/// Every house in play plus the one the local display renders for.
#[derive(Debug, Clone)]
pub struct Houses {
    houses: Vec<House>,
    player: HouseId,
}

impl Houses {
    pub fn new(player: House) -> Self {
        let id = player.id;
        Self {
            houses: vec![player],
            player: id,
        }
    }

    pub fn add(&mut self, house: House) {
        if let Some(existing) = self.get_mut(house.id) {
            *existing = house;
        } else {
            self.houses.push(house);
        }
    }

    pub fn get(&self, id: HouseId) -> Option<&House> {
        self.houses.iter().find(|house| house.id == id)
    }

    pub fn get_mut(&mut self, id: HouseId) -> Option<&mut House> {
        self.houses.iter_mut().find(|house| house.id == id)
    }

    pub fn player(&self) -> HouseId {
        self.player
    }

    pub fn set_player(&mut self, id: HouseId) {
        self.player = id;
    }

    pub fn is_player_control(&self, id: HouseId) -> bool {
        self.get(id).map(|house| house.player_control).unwrap_or(false)
    }

    pub fn are_allied(&self, a: HouseId, b: HouseId) -> bool {
        self.get(a).map(|house| house.is_ally(b)).unwrap_or(a == b)
    }

    pub fn iter(&self) -> impl Iterator<Item = &House> {
        self.houses.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn house_set_tracks_membership() {
        let mut set = HouseSet::EMPTY.with(HouseId(3));
        set.insert(HouseId(7));
        assert!(set.contains(HouseId(3)));
        assert!(!set.contains(HouseId(4)));
        set.remove(HouseId(3));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![HouseId(7)]);
    }

    #[test]
    fn a_house_is_always_its_own_ally() {
        let house = House::new(HouseId(2), "soviet");
        assert!(house.is_ally(HouseId(2)));
        assert!(!house.is_ally(HouseId(1)));
    }

    #[test]
    fn adding_an_existing_house_replaces_it() {
        let mut houses = Houses::new(House::human(HouseId(0), "greece"));
        houses.add(House::new(HouseId(1), "ussr"));
        let mut replacement = House::new(HouseId(1), "ussr");
        replacement.allies.insert(HouseId(0));
        houses.add(replacement);
        assert_eq!(houses.iter().count(), 2);
        assert!(houses.are_allied(HouseId(1), HouseId(0)));
        assert!(!houses.are_allied(HouseId(0), HouseId(1)));
    }
}
